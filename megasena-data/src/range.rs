use anyhow::{bail, Result};

use crate::models::DrawRecord;

/// Lowest and highest contest ids of a sorted slice.
pub fn contest_bounds(draws: &[DrawRecord]) -> Option<(u32, u32)> {
    match (draws.first(), draws.last()) {
        (Some(first), Some(last)) => Some((first.contest_id, last.contest_id)),
        _ => None,
    }
}

/// Inclusive contest-id window over draws sorted by contest id.
/// Missing bounds default to the data's own bounds.
pub fn select_range(draws: &[DrawRecord], from: Option<u32>, to: Option<u32>) -> Result<&[DrawRecord]> {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            bail!("Intervalo inválido : {} > {}", from, to);
        }
    }
    let start = match from {
        Some(from) => draws.partition_point(|d| d.contest_id < from),
        None => 0,
    };
    let end = match to {
        Some(to) => draws.partition_point(|d| d.contest_id <= to),
        None => draws.len(),
    };
    Ok(&draws[start..end.max(start)])
}

pub fn check_strictly_increasing(draws: &[DrawRecord]) -> Result<()> {
    for pair in draws.windows(2) {
        if pair[1].contest_id <= pair[0].contest_id {
            bail!(
                "Concursos fora de ordem : {} seguido de {}",
                pair[0].contest_id,
                pair[1].contest_id
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{draw, make_test_draws};

    #[test]
    fn test_bounds() {
        assert_eq!(contest_bounds(&[]), None);
        assert_eq!(contest_bounds(&make_test_draws(12)), Some((1, 12)));
    }

    #[test]
    fn test_select_inclusive() {
        let draws = make_test_draws(20);
        let sel = select_range(&draws, Some(5), Some(8)).unwrap();
        assert_eq!(sel.len(), 4);
        assert_eq!(sel[0].contest_id, 5);
        assert_eq!(sel[3].contest_id, 8);
    }

    #[test]
    fn test_select_open_bounds() {
        let draws = make_test_draws(20);
        assert_eq!(select_range(&draws, None, None).unwrap().len(), 20);
        assert_eq!(select_range(&draws, Some(18), None).unwrap().len(), 3);
        assert_eq!(select_range(&draws, None, Some(2)).unwrap().len(), 2);
    }

    #[test]
    fn test_select_empty_and_invalid() {
        let draws = make_test_draws(20);
        assert!(select_range(&draws, Some(30), Some(40)).unwrap().is_empty());
        assert!(select_range(&draws, Some(8), Some(5)).is_err());
    }

    #[test]
    fn test_select_with_gaps() {
        let draws = vec![
            draw(100, [1, 2, 3, 4, 5, 6]),
            draw(105, [1, 2, 3, 4, 5, 6]),
            draw(110, [1, 2, 3, 4, 5, 6]),
        ];
        let sel = select_range(&draws, Some(101), Some(110)).unwrap();
        assert_eq!(sel.len(), 2);
        assert_eq!(sel[0].contest_id, 105);
    }

    #[test]
    fn test_strictly_increasing() {
        assert!(check_strictly_increasing(&make_test_draws(5)).is_ok());
        let draws = vec![draw(2, [1, 2, 3, 4, 5, 6]), draw(2, [7, 8, 9, 10, 11, 12])];
        assert!(check_strictly_increasing(&draws).is_err());
        let draws = vec![draw(3, [1, 2, 3, 4, 5, 6]), draw(1, [7, 8, 9, 10, 11, 12])];
        assert!(check_strictly_increasing(&draws).is_err());
    }
}
