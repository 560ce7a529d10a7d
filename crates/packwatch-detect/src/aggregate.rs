//! ---
//! pw_section: "02-detection-analytics"
//! pw_subsection: "module"
//! pw_type: "source"
//! pw_scope: "code"
//! pw_description: "Detection and scoring routines for pack telemetry."
//! pw_version: "v0.1.0"
//! pw_owner: "tbd"
//! ---
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::rules::RuleHits;

/// Unified per-row verdict, index-aligned with the input series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnomalyResult {
    pub rule_flag: bool,
    pub ml_flag: bool,
    pub any_flag: bool,
}

/// Merge rule and model flags row by row. Purely combinational:
/// `any_flag = rule_flag OR ml_flag`.
pub fn merge_flags(hits: &[RuleHits], ml_flags: &[bool]) -> Vec<AnomalyResult> {
    hits.iter()
        .zip(ml_flags.iter())
        .map(|(hit, &ml_flag)| {
            let rule_flag = hit.any();
            AnomalyResult {
                rule_flag,
                ml_flag,
                any_flag: rule_flag || ml_flag,
            }
        })
        .collect()
}

/// Run-level counts handed to the report exporter and the CLI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionSummary {
    pub total_rows: usize,
    pub rule_flagged: usize,
    pub ml_flagged: usize,
    pub rule_only: usize,
    pub ml_only: usize,
    pub both: usize,
    pub total_flagged: usize,
    /// Rows fired per rule predicate, in declaration order.
    pub rule_breakdown: IndexMap<String, usize>,
}

/// Tally the merged results. `rule_only + ml_only + both == total_flagged`
/// holds by construction.
pub fn summarize(hits: &[RuleHits], results: &[AnomalyResult]) -> DetectionSummary {
    let mut summary = DetectionSummary {
        total_rows: results.len(),
        ..DetectionSummary::default()
    };
    for (name, _) in RuleHits::default().labelled() {
        summary.rule_breakdown.insert(name.to_owned(), 0);
    }
    for (hit, result) in hits.iter().zip(results.iter()) {
        if result.rule_flag {
            summary.rule_flagged += 1;
        }
        if result.ml_flag {
            summary.ml_flagged += 1;
        }
        match (result.rule_flag, result.ml_flag) {
            (true, true) => summary.both += 1,
            (true, false) => summary.rule_only += 1,
            (false, true) => summary.ml_only += 1,
            (false, false) => {}
        }
        if result.any_flag {
            summary.total_flagged += 1;
        }
        for (name, fired) in hit.labelled() {
            if fired {
                *summary.rule_breakdown.entry(name.to_owned()).or_default() += 1;
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(temp_high: bool, over_current: bool) -> RuleHits {
        RuleHits {
            temp_high,
            over_current,
            ..RuleHits::default()
        }
    }

    #[test]
    fn any_flag_is_the_union() {
        let hits = vec![hit(false, false), hit(true, false), hit(false, false), hit(true, true)];
        let ml = vec![false, false, true, true];
        let results = merge_flags(&hits, &ml);
        for (result, (h, m)) in results.iter().zip(hits.iter().zip(ml.iter())) {
            assert_eq!(result.rule_flag, h.any());
            assert_eq!(result.ml_flag, *m);
            assert_eq!(result.any_flag, h.any() || *m);
        }
    }

    #[test]
    fn summary_counts_satisfy_partition_law() {
        let hits = vec![
            hit(true, false),
            hit(false, true),
            hit(false, false),
            hit(true, true),
            hit(false, false),
        ];
        let ml = vec![false, true, true, false, false];
        let results = merge_flags(&hits, &ml);
        let summary = summarize(&hits, &results);

        assert_eq!(summary.total_rows, 5);
        assert_eq!(summary.rule_flagged, 3);
        assert_eq!(summary.ml_flagged, 2);
        assert_eq!(
            summary.rule_only + summary.ml_only + summary.both,
            summary.total_flagged
        );
        assert_eq!(
            summary.total_flagged,
            results.iter().filter(|r| r.any_flag).count()
        );
    }

    #[test]
    fn breakdown_counts_each_predicate() {
        let hits = vec![hit(true, true), hit(true, false), hit(false, false)];
        let ml = vec![false, false, false];
        let results = merge_flags(&hits, &ml);
        let summary = summarize(&hits, &results);
        assert_eq!(summary.rule_breakdown["temp_high"], 2);
        assert_eq!(summary.rule_breakdown["over_current"], 1);
        assert_eq!(summary.rule_breakdown["cell_imbalance"], 0);
        assert_eq!(summary.rule_breakdown["fast_temp_rise"], 0);
    }

    #[test]
    fn empty_input_summarizes_to_zeroes() {
        let summary = summarize(&[], &[]);
        assert_eq!(summary.total_rows, 0);
        assert_eq!(summary.total_flagged, 0);
        assert!(summary.rule_breakdown.values().all(|&count| count == 0));
    }
}
