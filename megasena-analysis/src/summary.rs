use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// Representative value of a list: its smallest true mode, or its median
/// when no value repeats.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Typical {
    Mode(u32),
    Median(f64),
}

impl fmt::Display for Typical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Typical::Mode(v) => write!(f, "{v}"),
            Typical::Median(v) if v.fract() == 0.0 => write!(f, "{v:.0}"),
            Typical::Median(v) => write!(f, "{v:.1}"),
        }
    }
}

pub fn mean(values: &[u32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let sum: u64 = values.iter().map(|&v| v as u64).sum();
    Some(sum as f64 / values.len() as f64)
}

pub fn median(values: &[u32]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] as f64 + sorted[mid] as f64) / 2.0)
    } else {
        Some(sorted[mid] as f64)
    }
}

/// Every value tied for the highest multiplicity, ascending.
/// `None` when the list is empty or no value repeats.
pub fn modes(values: &[u32]) -> Option<Vec<u32>> {
    let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
    for &v in values {
        *counts.entry(v).or_insert(0) += 1;
    }
    let top = counts.values().copied().max()?;
    if top < 2 {
        return None;
    }
    Some(
        counts
            .into_iter()
            .filter(|&(_, c)| c == top)
            .map(|(v, _)| v)
            .collect(),
    )
}

pub fn typical(values: &[u32]) -> Option<Typical> {
    match modes(values) {
        Some(m) => m.first().copied().map(Typical::Mode),
        None => median(values).map(Typical::Median),
    }
}
