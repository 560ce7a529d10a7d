//! ---
//! pw_section: "03-logging-observability"
//! pw_subsection: "module"
//! pw_type: "source"
//! pw_scope: "code"
//! pw_description: "Structured logging adapters and sinks."
//! pw_version: "v0.1.0"
//! pw_owner: "tbd"
//! ---
/// Emit an informational log enriched with packwatch context.
#[macro_export]
macro_rules! pw_info {
    (context = $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            tracing::Level::INFO,
            source = ctx.source.unwrap_or(""),
            rows = ctx.rows.unwrap_or_default(),
            seed = ctx.seed.unwrap_or_default(),
            stage = ctx.stage.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
    ($($arg:tt)+) => {{
        let ctx = &$crate::LogContext::default();
        tracing::event!(
            tracing::Level::INFO,
            source = ctx.source.unwrap_or(""),
            rows = ctx.rows.unwrap_or_default(),
            seed = ctx.seed.unwrap_or_default(),
            stage = ctx.stage.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
}

/// Emit a debug log enriched with packwatch context.
#[macro_export]
macro_rules! pw_debug {
    (context = $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            tracing::Level::DEBUG,
            source = ctx.source.unwrap_or(""),
            rows = ctx.rows.unwrap_or_default(),
            seed = ctx.seed.unwrap_or_default(),
            stage = ctx.stage.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
    ($($arg:tt)+) => {{
        let ctx = &$crate::LogContext::default();
        tracing::event!(
            tracing::Level::DEBUG,
            source = ctx.source.unwrap_or(""),
            rows = ctx.rows.unwrap_or_default(),
            seed = ctx.seed.unwrap_or_default(),
            stage = ctx.stage.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
}

/// Emit a warning log enriched with packwatch context.
#[macro_export]
macro_rules! pw_warn {
    (context = $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            tracing::Level::WARN,
            source = ctx.source.unwrap_or(""),
            rows = ctx.rows.unwrap_or_default(),
            seed = ctx.seed.unwrap_or_default(),
            stage = ctx.stage.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
    ($($arg:tt)+) => {{
        let ctx = &$crate::LogContext::default();
        tracing::event!(
            tracing::Level::WARN,
            source = ctx.source.unwrap_or(""),
            rows = ctx.rows.unwrap_or_default(),
            seed = ctx.seed.unwrap_or_default(),
            stage = ctx.stage.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
}

/// Emit an error log enriched with packwatch context.
#[macro_export]
macro_rules! pw_error {
    (context = $ctx:expr, $($arg:tt)+) => {{
        let ctx = &$ctx;
        tracing::event!(
            tracing::Level::ERROR,
            source = ctx.source.unwrap_or(""),
            rows = ctx.rows.unwrap_or_default(),
            seed = ctx.seed.unwrap_or_default(),
            stage = ctx.stage.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
    ($($arg:tt)+) => {{
        let ctx = &$crate::LogContext::default();
        tracing::event!(
            tracing::Level::ERROR,
            source = ctx.source.unwrap_or(""),
            rows = ctx.rows.unwrap_or_default(),
            seed = ctx.seed.unwrap_or_default(),
            stage = ctx.stage.unwrap_or(""),
            message = %format_args!($($arg)+)
        );
    }};
}
