pub mod config;
pub mod cycle;
pub mod delay;
pub mod frequency;
pub mod summary;

use serde::Serialize;

use megasena_data::models::{DrawRecord, Pool};

use crate::cycle::{compute_cycles, compute_statistics, CycleReport, CycleStatistics};
use crate::delay::{compute_delays, DelayReport};
use crate::frequency::{compute_frequency, FrequencyTable};

/// A single pass over draws sorted by contest id.
/// All state lives in the scanner, so every run starts from scratch.
pub trait DrawScan {
    type Output;
    fn observe(&mut self, draw: &DrawRecord);
    fn finish(self) -> Self::Output;
}

pub fn run_scan<S: DrawScan>(mut scan: S, draws: &[DrawRecord]) -> S::Output {
    for draw in draws {
        scan.observe(draw);
    }
    scan.finish()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub draw_count: usize,
    pub delays: DelayReport,
    pub frequency: FrequencyTable,
    pub cycles: CycleReport,
    pub cycle_statistics: CycleStatistics,
}

/// Runs the three scans side by side over the same draws.
pub fn analyze(draws: &[DrawRecord], pool: Pool, default_cycle_start: u32) -> Analysis {
    let (delays, (frequency, cycles)) = rayon::join(
        || compute_delays(draws, pool),
        || {
            rayon::join(
                || compute_frequency(draws, pool),
                || compute_cycles(draws, pool, default_cycle_start),
            )
        },
    );
    let cycle_statistics = compute_statistics(&cycles.closed);
    Analysis {
        draw_count: draws.len(),
        delays,
        frequency,
        cycles,
        cycle_statistics,
    }
}
