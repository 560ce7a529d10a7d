//! ---
//! pw_section: "04-simulation-test-harness"
//! pw_subsection: "module"
//! pw_type: "source"
//! pw_scope: "code"
//! pw_description: "Fault episode planning and signal perturbation."
//! pw_version: "v0.1.0"
//! pw_owner: "tbd"
//! ---
use packwatch_telemetry::TelemetrySample;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Keep random fault placement away from the warm-up rows at the start of a
/// capture.
const PLACEMENT_MARGIN: usize = 50;

const OVERHEAT_MAGNITUDE_C: f64 = 32.0;
const SPIKE_MAGNITUDE_A: f64 = 240.0;
const SPIKE_LEN: usize = 10;
const IMBALANCE_MAGNITUDE_V: f64 = 0.3;
const RAPID_RISE_MAGNITUDE_C: f64 = 12.0;
const RAPID_RISE_LEN: usize = 8;

/// The fault families the generator can inject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FaultKind {
    /// Sustained over-temperature: ramps to full magnitude and holds.
    Overheat,
    /// Short triangular current surge.
    CurrentSpike,
    /// Widened min/max cell voltage spread.
    CellImbalance,
    /// Steep, short-lived temperature excursion.
    RapidTempRise,
}

/// One injected fault: `len` rows starting at `start`, perturbed by
/// `magnitude` in the unit of the affected signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaultEpisode {
    pub kind: FaultKind,
    pub start: usize,
    pub len: usize,
    pub magnitude: f64,
}

/// Where fault episodes come from: none at all, seeded random placement, or
/// an explicit list for regression scenarios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FaultPlan {
    None,
    Random {
        overheat: usize,
        current_spikes: usize,
        imbalance: usize,
        rapid_rise: usize,
    },
    Episodes(Vec<FaultEpisode>),
}

impl Default for FaultPlan {
    fn default() -> Self {
        FaultPlan::Random {
            overheat: 1,
            current_spikes: 2,
            imbalance: 2,
            rapid_rise: 1,
        }
    }
}

/// Resolve a plan into concrete episodes. Random placements that do not fit
/// the series (too few rows for the margin plus the episode) are skipped, so
/// short captures stay fault-free.
pub fn plan_episodes(plan: &FaultPlan, rows: usize, rng: &mut StdRng) -> Vec<FaultEpisode> {
    match plan {
        FaultPlan::None => Vec::new(),
        FaultPlan::Episodes(list) => list.clone(),
        FaultPlan::Random {
            overheat,
            current_spikes,
            imbalance,
            rapid_rise,
        } => {
            let mut episodes = Vec::new();
            for _ in 0..*overheat {
                let len = rng.gen_range(30..80);
                if let Some(start) = place(rows, len, rng) {
                    episodes.push(FaultEpisode {
                        kind: FaultKind::Overheat,
                        start,
                        len,
                        magnitude: OVERHEAT_MAGNITUDE_C,
                    });
                }
            }
            for _ in 0..*current_spikes {
                if let Some(start) = place(rows, SPIKE_LEN, rng) {
                    episodes.push(FaultEpisode {
                        kind: FaultKind::CurrentSpike,
                        start,
                        len: SPIKE_LEN,
                        magnitude: SPIKE_MAGNITUDE_A,
                    });
                }
            }
            for _ in 0..*imbalance {
                let len = rng.gen_range(20..60);
                if let Some(start) = place(rows, len, rng) {
                    episodes.push(FaultEpisode {
                        kind: FaultKind::CellImbalance,
                        start,
                        len,
                        magnitude: IMBALANCE_MAGNITUDE_V,
                    });
                }
            }
            for _ in 0..*rapid_rise {
                if let Some(start) = place(rows, RAPID_RISE_LEN, rng) {
                    episodes.push(FaultEpisode {
                        kind: FaultKind::RapidTempRise,
                        start,
                        len: RAPID_RISE_LEN,
                        magnitude: RAPID_RISE_MAGNITUDE_C,
                    });
                }
            }
            episodes
        }
    }
}

fn place(rows: usize, len: usize, rng: &mut StdRng) -> Option<usize> {
    if rows <= PLACEMENT_MARGIN + len {
        return None;
    }
    Some(rng.gen_range(PLACEMENT_MARGIN..rows - len))
}

/// Apply one episode to an already-generated series. Episodes running past
/// the end of the series are truncated.
pub fn apply_episode(series: &mut [TelemetrySample], episode: &FaultEpisode) {
    if episode.len == 0 || episode.start >= series.len() {
        return;
    }
    let end = (episode.start + episode.len).min(series.len());
    let span = end - episode.start;
    for offset in 0..span {
        let factor = shape_factor(episode.kind, offset, episode.len);
        let sample = &mut series[episode.start + offset];
        match episode.kind {
            FaultKind::Overheat | FaultKind::RapidTempRise => {
                sample.pack_temp += episode.magnitude * factor;
            }
            FaultKind::CurrentSpike => {
                sample.pack_current += episode.magnitude * factor;
            }
            FaultKind::CellImbalance => {
                sample.cell_v_min -= episode.magnitude * factor / 2.0;
                sample.cell_v_max += episode.magnitude * factor / 2.0;
            }
        }
    }
}

/// Per-row envelope of an episode, in [0, 1].
///
/// Overheat ramps from half magnitude to full over the first quarter and
/// holds, so every affected row is materially hotter. Spikes and rapid rises
/// are symmetric tents peaking mid-episode. Imbalance is a flat burst.
fn shape_factor(kind: FaultKind, offset: usize, len: usize) -> f64 {
    match kind {
        FaultKind::Overheat => {
            let ramp = (len / 4).max(1);
            if offset >= ramp {
                1.0
            } else {
                0.5 + 0.5 * (offset + 1) as f64 / ramp as f64
            }
        }
        FaultKind::CurrentSpike | FaultKind::RapidTempRise => {
            if len <= 1 {
                return 1.0;
            }
            let mid = (len - 1) as f64 / 2.0;
            1.0 - ((offset as f64 - mid).abs() / mid)
        }
        FaultKind::CellImbalance => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn flat_series(rows: usize) -> Vec<TelemetrySample> {
        (0..rows)
            .map(|i| TelemetrySample {
                time_s: i as f64,
                pack_voltage: 360.0,
                pack_current: 0.0,
                pack_temp: 30.0,
                cell_v_min: 3.59,
                cell_v_max: 3.61,
            })
            .collect()
    }

    #[test]
    fn overheat_holds_at_least_half_magnitude() {
        let mut series = flat_series(200);
        let episode = FaultEpisode {
            kind: FaultKind::Overheat,
            start: 50,
            len: 40,
            magnitude: 30.0,
        };
        apply_episode(&mut series, &episode);
        for row in 50..90 {
            assert!(series[row].pack_temp > 30.0 + 15.0, "row {row} not heated");
        }
        assert!((series[89].pack_temp - 60.0).abs() < 1e-9);
        assert!((series[49].pack_temp - 30.0).abs() < 1e-12);
        assert!((series[90].pack_temp - 30.0).abs() < 1e-12);
    }

    #[test]
    fn current_spike_peaks_at_magnitude_mid_episode() {
        let mut series = flat_series(100);
        let episode = FaultEpisode {
            kind: FaultKind::CurrentSpike,
            start: 20,
            len: 11,
            magnitude: 300.0,
        };
        apply_episode(&mut series, &episode);
        assert!((series[25].pack_current - 300.0).abs() < 1e-9);
        assert!((series[20].pack_current).abs() < 1e-9);
        assert!((series[30].pack_current).abs() < 1e-9);
    }

    #[test]
    fn imbalance_widens_the_spread_symmetrically() {
        let mut series = flat_series(100);
        let episode = FaultEpisode {
            kind: FaultKind::CellImbalance,
            start: 10,
            len: 5,
            magnitude: 0.3,
        };
        apply_episode(&mut series, &episode);
        let delta = series[12].cell_v_max - series[12].cell_v_min;
        assert!((delta - 0.32).abs() < 1e-9);
    }

    #[test]
    fn episodes_truncate_at_series_end() {
        let mut series = flat_series(100);
        let episode = FaultEpisode {
            kind: FaultKind::Overheat,
            start: 95,
            len: 50,
            magnitude: 30.0,
        };
        apply_episode(&mut series, &episode);
        assert_eq!(series.len(), 100);
        assert!(series[99].pack_temp > 30.0);
    }

    #[test]
    fn out_of_range_episode_is_a_no_op() {
        let mut series = flat_series(10);
        let episode = FaultEpisode {
            kind: FaultKind::CurrentSpike,
            start: 50,
            len: 10,
            magnitude: 300.0,
        };
        apply_episode(&mut series, &episode);
        assert!(series.iter().all(|s| s.pack_current == 0.0));
    }

    #[test]
    fn random_plan_skips_series_without_room() {
        let mut rng = StdRng::seed_from_u64(3);
        let episodes = plan_episodes(&FaultPlan::default(), 40, &mut rng);
        assert!(episodes.is_empty());
    }

    #[test]
    fn random_plan_respects_requested_counts() {
        let mut rng = StdRng::seed_from_u64(3);
        let plan = FaultPlan::Random {
            overheat: 2,
            current_spikes: 3,
            imbalance: 1,
            rapid_rise: 1,
        };
        let episodes = plan_episodes(&plan, 5000, &mut rng);
        assert_eq!(episodes.len(), 7);
        let spikes = episodes
            .iter()
            .filter(|e| e.kind == FaultKind::CurrentSpike)
            .count();
        assert_eq!(spikes, 3);
        for episode in &episodes {
            assert!(episode.start >= PLACEMENT_MARGIN);
            assert!(episode.start + episode.len <= 5000);
        }
    }

    #[test]
    fn plan_round_trips_through_serde() {
        let plan = FaultPlan::Episodes(vec![FaultEpisode {
            kind: FaultKind::RapidTempRise,
            start: 100,
            len: 8,
            magnitude: 12.0,
        }]);
        let json = serde_json::to_string(&plan).unwrap();
        let back: FaultPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(back, plan);
    }
}
