use log::debug;
use serde::Serialize;

use megasena_data::models::{DrawRecord, Pool};

use crate::summary::{mean, median, modes};
use crate::DrawScan;

/// A run of contests over which every pool number appeared at least once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClosedCycle {
    pub index: u32,
    pub start_contest: u32,
    pub end_contest: u32,
    pub length: u32,
}

/// The cycle still waiting for its missing numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenCycle {
    pub index: u32,
    pub start_contest: u32,
    /// Last contest scanned, if any.
    pub last_contest: Option<u32>,
    pub seen: Vec<u8>,
    pub missing: Vec<u8>,
}

impl OpenCycle {
    /// Contests elapsed in this cycle, 0 before its first draw.
    pub fn elapsed(&self) -> u32 {
        match self.last_contest {
            Some(last) if last >= self.start_contest => last - self.start_contest + 1,
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleReport {
    pub closed: Vec<ClosedCycle>,
    pub open: OpenCycle,
}

pub struct CycleSegmenter {
    pool: Pool,
    seen: Vec<bool>,
    seen_count: usize,
    start: u32,
    index: u32,
    last_contest: Option<u32>,
    closed: Vec<ClosedCycle>,
}

impl CycleSegmenter {
    /// `default_start` is the open cycle's start when no draw is scanned.
    pub fn new(pool: Pool, default_start: u32) -> Self {
        Self {
            pool,
            seen: vec![false; pool.size()],
            seen_count: 0,
            start: default_start,
            index: 1,
            last_contest: None,
            closed: Vec::new(),
        }
    }

    fn close(&mut self, end_contest: u32) {
        let cycle = ClosedCycle {
            index: self.index,
            start_contest: self.start,
            end_contest,
            length: end_contest.saturating_sub(self.start) + 1,
        };
        debug!(
            "Ciclo {} fechado : concursos {} a {} ({} sorteios)",
            cycle.index, cycle.start_contest, cycle.end_contest, cycle.length
        );
        self.closed.push(cycle);

        self.seen.iter_mut().for_each(|s| *s = false);
        self.seen_count = 0;
        self.start = end_contest.saturating_add(1);
        self.index += 1;
    }
}

impl DrawScan for CycleSegmenter {
    type Output = CycleReport;

    fn observe(&mut self, draw: &DrawRecord) {
        if self.last_contest.is_none() {
            self.start = draw.contest_id;
        }
        for &n in &draw.numbers {
            if let Some(idx) = self.pool.index(n) {
                if !self.seen[idx] {
                    self.seen[idx] = true;
                    self.seen_count += 1;
                }
            }
        }
        if self.seen_count == self.pool.size() {
            self.close(draw.contest_id);
        }
        self.last_contest = Some(draw.contest_id);
    }

    fn finish(self) -> CycleReport {
        let (seen, missing): (Vec<u8>, Vec<u8>) = self
            .pool
            .numbers()
            .partition(|&n| self.seen[(n - 1) as usize]);
        CycleReport {
            closed: self.closed,
            open: OpenCycle {
                index: self.index,
                start_contest: self.start,
                last_contest: self.last_contest,
                seen,
                missing,
            },
        }
    }
}

pub fn compute_cycles(draws: &[DrawRecord], pool: Pool, default_start: u32) -> CycleReport {
    crate::run_scan(CycleSegmenter::new(pool, default_start), draws)
}

/// Duration statistics over closed cycles; `None` fields mean "undefined",
/// never zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleStatistics {
    pub closed_count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    /// Every most frequent length, ascending; `None` when no length repeats.
    pub modes: Option<Vec<u32>>,
}

pub fn compute_statistics(closed: &[ClosedCycle]) -> CycleStatistics {
    let lengths: Vec<u32> = closed.iter().map(|c| c.length).collect();
    CycleStatistics {
        closed_count: lengths.len(),
        mean: mean(&lengths),
        median: median(&lengths),
        modes: modes(&lengths),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use megasena_data::models::{draw, make_test_draws};

    fn closing(id: u32) -> DrawRecord {
        let base = ((id - 1) % 10 * 6) as u8;
        draw(id, [base + 1, base + 2, base + 3, base + 4, base + 5, base + 6])
    }

    #[test]
    fn test_single_cycle_of_ten() {
        let draws = make_test_draws(10);
        let report = compute_cycles(&draws, Pool::MEGA_SENA, 1);
        assert_eq!(
            report.closed,
            vec![ClosedCycle {
                index: 1,
                start_contest: 1,
                end_contest: 10,
                length: 10
            }]
        );
        assert_eq!(report.open.index, 2);
        assert_eq!(report.open.start_contest, 11);
        assert_eq!(report.open.elapsed(), 0);
        assert!(report.open.seen.is_empty());
        assert_eq!(report.open.missing.len(), 60);
    }

    #[test]
    fn test_empty_draws() {
        let report = compute_cycles(&[], Pool::MEGA_SENA, 1);
        assert!(report.closed.is_empty());
        assert_eq!(report.open.index, 1);
        assert_eq!(report.open.start_contest, 1);
        assert_eq!(report.open.last_contest, None);
        assert_eq!(report.open.missing, (1..=60).collect::<Vec<u8>>());
        assert_eq!(report.open.elapsed(), 0);
    }

    #[test]
    fn test_open_cycle_accounts_for_every_draw() {
        let draws = make_test_draws(25);
        let report = compute_cycles(&draws, Pool::MEGA_SENA, 1);
        assert_eq!(report.closed.len(), 2);
        assert_eq!(report.closed[1].start_contest, 11);
        assert_eq!(report.closed[1].end_contest, 20);

        let open = &report.open;
        assert_eq!(open.index, 3);
        assert_eq!(open.start_contest, 21);
        assert_eq!(open.last_contest, Some(25));
        assert_eq!(open.seen, (1..=30).collect::<Vec<u8>>());
        assert_eq!(open.missing, (31..=60).collect::<Vec<u8>>());

        let closed_total: u32 = report.closed.iter().map(|c| c.length).sum();
        assert_eq!(closed_total + open.elapsed(), 25);
    }

    #[test]
    fn test_starts_at_first_contest() {
        let draws: Vec<DrawRecord> = (501..=512).map(closing).collect();
        let report = compute_cycles(&draws, Pool::MEGA_SENA, 1);
        assert_eq!(report.closed.len(), 1);
        assert_eq!(report.closed[0].start_contest, 501);
        assert_eq!(report.closed[0].end_contest, 510);
        assert_eq!(report.open.start_contest, 511);
        assert_eq!(report.open.elapsed(), 2);
    }

    #[test]
    fn test_length_counts_contest_gaps() {
        let mut draws: Vec<DrawRecord> = (1..=9).map(closing).collect();
        draws.push(draw(15, [55, 56, 57, 58, 59, 60]));
        let report = compute_cycles(&draws, Pool::MEGA_SENA, 1);
        assert_eq!(report.closed[0].length, 15);
    }

    #[test]
    fn test_repeated_numbers_delay_closure() {
        let mut draws: Vec<DrawRecord> = (1..=9).map(closing).collect();
        draws.push(draw(10, [1, 2, 3, 4, 5, 6]));
        let report = compute_cycles(&draws, Pool::MEGA_SENA, 1);
        assert!(report.closed.is_empty());
        assert_eq!(report.open.missing, vec![55, 56, 57, 58, 59, 60]);
        assert_eq!(report.open.elapsed(), 10);
    }

    #[test]
    fn test_closure_at_last_contest_id() {
        let pool = Pool::new(6).unwrap();
        let draws = vec![draw(u32::MAX, [1, 2, 3, 4, 5, 6])];
        let report = compute_cycles(&draws, pool, 1);
        assert_eq!(report.closed.len(), 1);
        assert_eq!(report.closed[0].length, 1);
        assert_eq!(report.open.index, 2);
        assert_eq!(report.open.start_contest, u32::MAX);
    }

    #[test]
    fn test_statistics_undefined_without_cycles() {
        let stats = compute_statistics(&[]);
        assert_eq!(stats.closed_count, 0);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.median, None);
        assert_eq!(stats.modes, None);
    }

    #[test]
    fn test_statistics_mode_and_fallback() {
        let cycle = |index, length| ClosedCycle {
            index,
            start_contest: 0,
            end_contest: 0,
            length,
        };
        let stats = compute_statistics(&[cycle(1, 10), cycle(2, 12), cycle(3, 10), cycle(4, 12)]);
        assert_eq!(stats.mean, Some(11.0));
        assert_eq!(stats.median, Some(11.0));
        assert_eq!(stats.modes, Some(vec![10, 12]));

        let stats = compute_statistics(&[cycle(1, 10), cycle(2, 11), cycle(3, 12)]);
        assert_eq!(stats.modes, None);
        assert_eq!(stats.median, Some(11.0));
    }

    #[test]
    fn test_idempotent() {
        let draws = make_test_draws(47);
        assert_eq!(
            compute_cycles(&draws, Pool::MEGA_SENA, 1),
            compute_cycles(&draws, Pool::MEGA_SENA, 1)
        );
    }
}
