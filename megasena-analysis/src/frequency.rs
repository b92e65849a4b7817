use serde::Serialize;

use megasena_data::models::{DrawRecord, Pool};

use crate::DrawScan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FrequencyEntry {
    pub number: u8,
    pub count: u32,
}

/// Occurrences of every pool number, zero counts included, in number order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyTable {
    pub entries: Vec<FrequencyEntry>,
    pub draw_count: usize,
}

impl FrequencyTable {
    pub fn count(&self, number: u8) -> Option<u32> {
        self.entries
            .iter()
            .find(|e| e.number == number)
            .map(|e| e.count)
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count as u64).sum()
    }

    /// Highest counts first, lower number wins ties.
    pub fn most_frequent(&self, n: usize) -> Vec<FrequencyEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.count.cmp(&a.count).then(a.number.cmp(&b.number)));
        sorted.truncate(n);
        sorted
    }

    /// Lowest counts first, lower number wins ties.
    pub fn least_frequent(&self, n: usize) -> Vec<FrequencyEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| a.count.cmp(&b.count).then(a.number.cmp(&b.number)));
        sorted.truncate(n);
        sorted
    }
}

pub struct FrequencyCounter {
    pool: Pool,
    counts: Vec<u32>,
    draw_count: usize,
}

impl FrequencyCounter {
    pub fn new(pool: Pool) -> Self {
        Self {
            pool,
            counts: vec![0; pool.size()],
            draw_count: 0,
        }
    }
}

impl DrawScan for FrequencyCounter {
    type Output = FrequencyTable;

    fn observe(&mut self, draw: &DrawRecord) {
        self.draw_count += 1;
        for &n in &draw.numbers {
            if let Some(idx) = self.pool.index(n) {
                self.counts[idx] += 1;
            }
        }
    }

    fn finish(self) -> FrequencyTable {
        FrequencyTable {
            entries: self
                .pool
                .numbers()
                .zip(self.counts)
                .map(|(number, count)| FrequencyEntry { number, count })
                .collect(),
            draw_count: self.draw_count,
        }
    }
}

pub fn compute_frequency(draws: &[DrawRecord], pool: Pool) -> FrequencyTable {
    crate::run_scan(FrequencyCounter::new(pool), draws)
}
