use std::ops::RangeInclusive;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Numbers drawn per contest.
pub const PICK_COUNT: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawRecord {
    pub contest_id: u32,
    pub date: Option<NaiveDate>,
    pub numbers: [u8; PICK_COUNT],
}

/// The closed set of numbers a draw picks from, `1..=size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    size: u8,
}

impl Pool {
    pub const MEGA_SENA: Pool = Pool { size: 60 };

    pub fn new(size: u8) -> Result<Self> {
        if (size as usize) < PICK_COUNT {
            bail!(
                "Universo de {} dezenas menor que as {} dezenas sorteadas",
                size,
                PICK_COUNT
            );
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size as usize
    }

    pub fn numbers(&self) -> RangeInclusive<u8> {
        1..=self.size
    }

    pub fn contains(&self, number: u8) -> bool {
        number >= 1 && number <= self.size
    }

    /// Slot of `number` in a per-number table, `None` outside the pool.
    pub fn index(&self, number: u8) -> Option<usize> {
        if self.contains(number) {
            Some((number - 1) as usize)
        } else {
            None
        }
    }
}

impl Default for Pool {
    fn default() -> Self {
        Pool::MEGA_SENA
    }
}

pub fn validate_draw(numbers: &[u8], pool: Pool) -> Result<()> {
    if numbers.len() != PICK_COUNT {
        bail!(
            "{} dezenas encontradas, {} esperadas",
            numbers.len(),
            PICK_COUNT
        );
    }
    for &n in numbers {
        if !pool.contains(n) {
            bail!("Dezena {} fora dos limites (1-{})", n, pool.size());
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Dezena repetida : {}", numbers[i]);
            }
        }
    }
    Ok(())
}

/// Builds a dateless record, for fixtures and manual input.
pub fn draw(contest_id: u32, numbers: [u8; PICK_COUNT]) -> DrawRecord {
    DrawRecord {
        contest_id,
        date: None,
        numbers,
    }
}

/// `n` consecutive contests starting at 1 that sweep the 60-number pool
/// in blocks of six, so every tenth draw completes a full pass.
pub fn make_test_draws(n: usize) -> Vec<DrawRecord> {
    (0..n)
        .map(|i| {
            let base = ((i % 10) * PICK_COUNT) as u8;
            DrawRecord {
                contest_id: i as u32 + 1,
                date: NaiveDate::from_ymd_opt(2024, 1, 1)
                    .and_then(|d| d.checked_add_days(chrono::Days::new(i as u64 * 3))),
                numbers: [
                    base + 1,
                    base + 2,
                    base + 3,
                    base + 4,
                    base + 5,
                    base + 6,
                ],
            }
        })
        .collect()
}
