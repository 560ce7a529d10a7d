//! ---
//! pw_section: "03-logging-observability"
//! pw_subsection: "module"
//! pw_type: "source"
//! pw_scope: "code"
//! pw_description: "Structured logging adapters and sinks."
//! pw_version: "v0.1.0"
//! pw_owner: "tbd"
//! ---
#![warn(missing_docs)]

use tracing::Level;
use tracing_subscriber::{fmt as subscriber_fmt, prelude::*, EnvFilter, Registry};

pub mod macros;

/// Initialize a baseline tracing subscriber suitable for development.
pub fn init() {
    let _ = Registry::default()
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(subscriber_fmt::layer())
        .try_init();
}

/// Structured logging context propagated by the convenience macros.
#[derive(Debug, Default, Clone)]
pub struct LogContext<'a> {
    /// Telemetry source (file path, "simulated", etc.) associated with the log event.
    pub source: Option<&'a str>,
    /// Number of telemetry rows involved in the operation.
    pub rows: Option<usize>,
    /// Generator or model seed in effect, when deterministic behaviour matters.
    pub seed: Option<u64>,
    /// Processing stage (simulate, detect, export, etc.).
    pub stage: Option<&'a str>,
}

impl<'a> LogContext<'a> {
    /// Create an empty logging context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a telemetry source descriptor.
    pub fn with_source(mut self, source: &'a str) -> Self {
        self.source = Some(source);
        self
    }

    /// Attach a row count.
    pub fn with_rows(mut self, rows: usize) -> Self {
        self.rows = Some(rows);
        self
    }

    /// Attach a seed value.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Attach a processing stage descriptor.
    pub fn with_stage(mut self, stage: &'a str) -> Self {
        self.stage = Some(stage);
        self
    }
}

/// High-level outcome used when emitting run lifecycle log events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEventOutcome {
    /// The operation completed successfully.
    Success,
    /// The operation completed but with reduced coverage (e.g. rule-only detection).
    Degraded,
    /// The operation failed or was aborted.
    Fault,
}

impl RunEventOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            RunEventOutcome::Success => "success",
            RunEventOutcome::Degraded => "degraded",
            RunEventOutcome::Fault => "fault",
        }
    }

    fn level(&self) -> Level {
        match self {
            RunEventOutcome::Success => Level::INFO,
            RunEventOutcome::Degraded => Level::WARN,
            RunEventOutcome::Fault => Level::ERROR,
        }
    }
}

/// Emit a standardized run event with a success/degraded/fault outcome.
pub fn log_run_event(
    context: Option<&LogContext>,
    event: &str,
    message: &str,
    outcome: RunEventOutcome,
) {
    let default_ctx = LogContext::default();
    let ctx = context.unwrap_or(&default_ctx);
    let level = outcome.level();
    // `tracing::event!` requires a const level, so dispatch per level while
    // keeping the emitted fields identical.
    macro_rules! emit {
        ($lvl:expr) => {
            tracing::event!(
                $lvl,
                event,
                outcome = outcome.as_str(),
                source = ctx.source.unwrap_or(""),
                rows = ctx.rows.unwrap_or_default(),
                seed = ctx.seed.unwrap_or_default(),
                stage = ctx.stage.unwrap_or(""),
                message = %message
            )
        };
    }
    match level {
        Level::ERROR => emit!(Level::ERROR),
        Level::WARN => emit!(Level::WARN),
        Level::INFO => emit!(Level::INFO),
        Level::DEBUG => emit!(Level::DEBUG),
        Level::TRACE => emit!(Level::TRACE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{pw_debug, pw_info, pw_warn};

    #[test]
    fn macros_emit_without_panic() {
        init();
        let ctx = LogContext::new().with_source("capture.csv").with_rows(2000);
        pw_info!(context = ctx.clone(), "detection pass started");
        pw_debug!("debug message");
        pw_warn!(context = ctx, "fallback engaged: {}", "rule-only");
    }

    #[test]
    fn init_does_not_panic() {
        init();
    }

    #[test]
    fn run_event_helper_emits() {
        init();
        let ctx = LogContext::new().with_stage("detect");
        log_run_event(
            Some(&ctx),
            "test.event",
            "run event helper executed",
            RunEventOutcome::Success,
        );
        log_run_event(
            None,
            "test.event",
            "run event helper fault",
            RunEventOutcome::Fault,
        );
    }
}
