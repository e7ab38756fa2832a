//! Helper functions for laying out exchange buffers.
use crate::traits::types::{Count, Error, Result};

/// Fill `displacements` with the exclusive prefix sum of `counts`, returning the total.
///
/// # Arguments
/// * `counts` - Records per rank.
/// * `displacements` - Offset of the first record of each rank, same length as `counts`.
pub fn exclusive_scan(counts: &[Count], displacements: &mut [Count]) -> Result<usize> {
    let mut total: usize = 0;
    for (displacement, &count) in displacements.iter_mut().zip(counts) {
        *displacement = Count::try_from(total).map_err(|_| Error::CountOverflow(total))?;
        total += count as usize;
    }
    Ok(total)
}

/// Sum of per rank counts.
pub fn total(counts: &[Count]) -> usize {
    counts.iter().map(|&c| c as usize).sum()
}

/// Hands out record indices within each rank's segment of an exchange buffer, in visiting order.
pub(crate) struct SegmentCursor {
    next: Vec<usize>,
    end: Vec<usize>,
}

impl SegmentCursor {
    pub(crate) fn new(counts: &[Count], displacements: &[Count]) -> Self {
        let next = displacements.iter().map(|&d| d as usize).collect::<Vec<_>>();
        let end = next
            .iter()
            .zip(counts)
            .map(|(&n, &c)| n + c as usize)
            .collect();
        Self { next, end }
    }

    /// Next record index in the segment of `rank`, `None` once the segment is full.
    pub(crate) fn advance(&mut self, rank: usize) -> Option<usize> {
        let index = self.next[rank];
        if index < self.end[rank] {
            self.next[rank] += 1;
            Some(index)
        } else {
            None
        }
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_exclusive_scan() {
        let counts = vec![3, 0, 2, 5];
        let mut displacements = vec![0; 4];
        let total = exclusive_scan(&counts, &mut displacements).unwrap();
        assert_eq!(total, 10);
        assert_eq!(displacements, vec![0, 3, 3, 5]);
        assert_eq!(super::total(&counts), 10);
    }

    #[test]
    fn test_segment_cursor() {
        let counts = vec![2, 0, 1];
        let displacements = vec![0, 2, 2];
        let mut cursor = SegmentCursor::new(&counts, &displacements);

        assert_eq!(cursor.advance(2), Some(2));
        assert_eq!(cursor.advance(0), Some(0));
        assert_eq!(cursor.advance(1), None);
        assert_eq!(cursor.advance(0), Some(1));
        assert_eq!(cursor.advance(0), None);
        assert_eq!(cursor.advance(2), None);
    }
}
