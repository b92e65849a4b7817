use log::trace;
use serde::Serialize;

use megasena_data::models::{DrawRecord, Pool};

use crate::summary::{typical, Typical};
use crate::DrawScan;

#[derive(Debug, Clone, Default)]
struct DelayState {
    current: u32,
    leading: bool,
    leadership_count: u32,
    closed_maxima: Vec<u32>,
    open_max: u32,
}

impl DelayState {
    fn start_period(&mut self) {
        self.leading = true;
        self.leadership_count += 1;
        self.open_max = self.current;
    }

    fn close_period(&mut self) {
        if self.leading && self.open_max > 0 {
            self.closed_maxima.push(self.open_max);
        }
        self.open_max = 0;
        self.leading = false;
    }
}

/// Delay of one number at the end of the scan, with the history of the
/// periods during which it was the most delayed number ("Top1").
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumberDelay {
    pub number: u8,
    pub current_delay: u32,
    pub leadership_count: u32,
    /// Peak delay of each finished Top1 period, in order.
    pub top1_maxima: Vec<u32>,
    pub typical_top1: Option<Typical>,
    pub min_top1: Option<u32>,
    pub max_top1: Option<u32>,
}

/// Numbers with a non-zero delay, most delayed first.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DelayReport {
    pub entries: Vec<NumberDelay>,
}

impl DelayReport {
    pub fn top(&self, n: usize) -> &[NumberDelay] {
        &self.entries[..n.min(self.entries.len())]
    }

    pub fn get(&self, number: u8) -> Option<&NumberDelay> {
        self.entries.iter().find(|e| e.number == number)
    }

    pub fn most_delayed(&self) -> Option<&NumberDelay> {
        self.entries.first()
    }
}

pub struct DelayTracker {
    pool: Pool,
    states: Vec<DelayState>,
    previous_contest: Option<u32>,
}

impl DelayTracker {
    pub fn new(pool: Pool) -> Self {
        Self {
            pool,
            states: vec![DelayState::default(); pool.size()],
            previous_contest: None,
        }
    }

    /// Contests elapsed since the previous draw; never less than one, so
    /// duplicated or out-of-order ids cannot move a delay backwards.
    fn gap(&self, contest_id: u32) -> u32 {
        match self.previous_contest {
            None => 1,
            Some(prev) => contest_id.saturating_sub(prev).max(1),
        }
    }
}

impl DrawScan for DelayTracker {
    type Output = DelayReport;

    fn observe(&mut self, draw: &DrawRecord) {
        let gap = self.gap(draw.contest_id);
        for state in &mut self.states {
            state.current += gap;
        }
        for &n in &draw.numbers {
            if let Some(idx) = self.pool.index(n) {
                self.states[idx].current = 0;
            }
        }

        let max_delay = self.states.iter().map(|s| s.current).max().unwrap_or(0);
        if max_delay == 0 {
            for state in &mut self.states {
                state.close_period();
            }
        } else {
            for (idx, state) in self.states.iter_mut().enumerate() {
                if state.current == max_delay {
                    if state.leading {
                        state.open_max = state.open_max.max(state.current);
                    } else {
                        state.start_period();
                        trace!(
                            "Concurso {} : dezena {} assume Top1 com atraso {}",
                            draw.contest_id,
                            idx + 1,
                            state.current
                        );
                    }
                } else if state.leading {
                    state.close_period();
                }
            }
        }

        self.previous_contest = Some(draw.contest_id);
    }

    fn finish(mut self) -> DelayReport {
        for state in &mut self.states {
            state.close_period();
        }

        let mut entries: Vec<NumberDelay> = self
            .pool
            .numbers()
            .zip(self.states)
            .filter(|(_, s)| s.current > 0)
            .map(|(number, s)| NumberDelay {
                number,
                current_delay: s.current,
                leadership_count: s.leadership_count,
                typical_top1: typical(&s.closed_maxima),
                min_top1: s.closed_maxima.iter().copied().min(),
                max_top1: s.closed_maxima.iter().copied().max(),
                top1_maxima: s.closed_maxima,
            })
            .collect();
        entries.sort_by(|a, b| {
            b.current_delay
                .cmp(&a.current_delay)
                .then(a.number.cmp(&b.number))
        });

        DelayReport { entries }
    }
}

pub fn compute_delays(draws: &[DrawRecord], pool: Pool) -> DelayReport {
    crate::run_scan(DelayTracker::new(pool), draws)
}
