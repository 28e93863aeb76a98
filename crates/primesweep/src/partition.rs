//! Division of the search range `[1, upper_bound]` among workers.
//!
//! Both strategies uphold the coverage invariant: every integer in the range
//! belongs to exactly one partition, whatever the worker count.
//!
//! - [`PartitionKind::Contiguous`] hands each worker one block of
//!   `ceil(upper_bound / worker_count)` consecutive values. When there are
//!   more workers than values, trailing workers receive nothing and are
//!   omitted.
//! - [`PartitionKind::Interleaved`] hands worker `i` every value congruent to
//!   `i + 1` modulo `worker_count`. Every worker gets a partition, which may be
//!   empty for high worker indices.

use core::fmt;

/// Strategy used to split the range across workers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PartitionKind {
    /// Consecutive blocks, one per worker.
    #[default]
    Contiguous,
    /// Round-robin stride assignment.
    Interleaved,
}

impl fmt::Display for PartitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contiguous => f.write_str("Contiguous"),
            Self::Interleaved => f.write_str("Interleaved"),
        }
    }
}

/// The values of `[1, upper_bound]` assigned to a single worker.
///
/// Immutable once built and owned by exactly one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    /// Inclusive block `[start, end]`, with `start <= end`.
    Contiguous { start: u64, end: u64 },
    /// `offset, offset + stride, ...` while `<= upper_bound`.
    Interleaved {
        offset: u64,
        stride: u64,
        upper_bound: u64,
    },
}

impl Partition {
    /// Iterates the assigned values in increasing order.
    pub const fn values(&self) -> PartitionValues {
        match *self {
            Self::Contiguous { start, end } => PartitionValues {
                next: if start <= end { Some(start) } else { None },
                step: 1,
                last: end,
            },
            Self::Interleaved {
                offset,
                stride,
                upper_bound,
            } => PartitionValues {
                next: if offset <= upper_bound && stride > 0 {
                    Some(offset)
                } else {
                    None
                },
                step: stride,
                last: upper_bound,
            },
        }
    }

    /// Number of assigned values, computed without iterating.
    pub const fn len(&self) -> u64 {
        match *self {
            Self::Contiguous { start, end } => {
                if start > end {
                    0
                } else {
                    end - start + 1
                }
            }
            Self::Interleaved {
                offset,
                stride,
                upper_bound,
            } => {
                if offset > upper_bound || stride == 0 {
                    0
                } else {
                    (upper_bound - offset) / stride + 1
                }
            }
        }
    }

    /// `true` if the partition has no values to evaluate.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `true` if `value` is assigned to this partition.
    pub const fn contains(&self, value: u64) -> bool {
        match *self {
            Self::Contiguous { start, end } => start <= value && value <= end,
            Self::Interleaved {
                offset,
                stride,
                upper_bound,
            } => {
                stride > 0
                    && offset <= value
                    && value <= upper_bound
                    && (value - offset) % stride == 0
            }
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Contiguous { start, end } => write!(f, "[{start}, {end}]"),
            Self::Interleaved {
                offset,
                stride,
                upper_bound,
            } => write!(f, "{offset} + {stride}k <= {upper_bound}"),
        }
    }
}

/// Iterator over the values of a [`Partition`].
#[derive(Debug, Clone)]
pub struct PartitionValues {
    next: Option<u64>,
    step: u64,
    last: u64,
}

impl Iterator for PartitionValues {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let current = self.next?;
        self.next = current
            .checked_add(self.step)
            .filter(|&value| value <= self.last);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.next {
            None => (0, Some(0)),
            Some(current) => {
                let remaining = (self.last - current) / self.step + 1;
                match usize::try_from(remaining) {
                    Ok(n) => (n, Some(n)),
                    Err(_) => (usize::MAX, None),
                }
            }
        }
    }
}

/// Splits `[1, upper_bound]` across `worker_count` workers.
///
/// The returned vector is indexed by worker id. It is empty when
/// `upper_bound < 1` or `worker_count == 0`, and never longer than
/// `worker_count`.
///
/// # Example
///
/// ```
/// use primesweep::{Partition, PartitionKind, partition};
///
/// let parts = partition(30, 3, PartitionKind::Contiguous);
/// assert_eq!(parts[1], Partition::Contiguous { start: 11, end: 20 });
/// ```
pub fn partition(upper_bound: u64, worker_count: usize, kind: PartitionKind) -> Vec<Partition> {
    if upper_bound < 1 || worker_count == 0 {
        return Vec::new();
    }
    match kind {
        PartitionKind::Contiguous => contiguous(upper_bound, worker_count),
        PartitionKind::Interleaved => interleaved(upper_bound, worker_count),
    }
}

fn contiguous(upper_bound: u64, worker_count: usize) -> Vec<Partition> {
    let workers = worker_count as u64;
    let chunk = upper_bound.div_ceil(workers);
    let capacity = usize::try_from(upper_bound).map_or(worker_count, |n| n.min(worker_count));
    let mut partitions = Vec::with_capacity(capacity);

    for i in 0..workers {
        // Starts grow monotonically, so the first worker past the end ends
        // the assignment.
        let Some(start) = i.checked_mul(chunk).and_then(|s| s.checked_add(1)) else {
            break;
        };
        if start > upper_bound {
            break;
        }
        let end = (i + 1).saturating_mul(chunk).min(upper_bound);
        partitions.push(Partition::Contiguous { start, end });
    }

    partitions
}

fn interleaved(upper_bound: u64, worker_count: usize) -> Vec<Partition> {
    let stride = worker_count as u64;
    (0..stride)
        .map(|i| Partition::Interleaved {
            offset: i + 1,
            stride,
            upper_bound,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: [PartitionKind; 2] = [PartitionKind::Contiguous, PartitionKind::Interleaved];

    fn assert_coverage(upper_bound: u64, worker_count: usize, kind: PartitionKind) {
        let parts = partition(upper_bound, worker_count, kind);
        assert!(parts.len() <= worker_count);

        let mut seen = vec![0_u8; upper_bound as usize + 1];
        for part in &parts {
            let mut count = 0;
            for value in part.values() {
                assert!(
                    (1..=upper_bound).contains(&value),
                    "{value} outside range ({kind}, n={upper_bound}, w={worker_count})"
                );
                assert!(part.contains(value));
                seen[value as usize] += 1;
                count += 1;
            }
            assert_eq!(count, part.len(), "len mismatch for {part}");
        }

        for (value, &hits) in seen.iter().enumerate().skip(1) {
            assert_eq!(
                hits, 1,
                "value {value} covered {hits} times ({kind}, n={upper_bound}, w={worker_count})"
            );
        }
    }

    #[test]
    fn coverage_holds_for_all_small_inputs() {
        for kind in KINDS {
            for upper_bound in 1..=64 {
                for worker_count in 1..=20 {
                    assert_coverage(upper_bound, worker_count, kind);
                }
            }
        }
    }

    #[test]
    fn coverage_holds_for_uneven_large_inputs() {
        for kind in KINDS {
            assert_coverage(10_007, 7, kind);
            assert_coverage(9_999, 16, kind);
            assert_coverage(1_000, 999, kind);
        }
    }

    #[test]
    fn contiguous_scenario() {
        let parts = partition(30, 3, PartitionKind::Contiguous);
        assert_eq!(
            parts,
            vec![
                Partition::Contiguous { start: 1, end: 10 },
                Partition::Contiguous { start: 11, end: 20 },
                Partition::Contiguous { start: 21, end: 30 },
            ]
        );
    }

    #[test]
    fn contiguous_last_block_is_short() {
        let parts = partition(10, 3, PartitionKind::Contiguous);
        assert_eq!(
            parts,
            vec![
                Partition::Contiguous { start: 1, end: 4 },
                Partition::Contiguous { start: 5, end: 8 },
                Partition::Contiguous { start: 9, end: 10 },
            ]
        );
    }

    #[test]
    fn interleaved_scenario() {
        let parts = partition(30, 3, PartitionKind::Interleaved);
        assert_eq!(parts.len(), 3);

        let first: Vec<_> = parts[0].values().collect();
        assert_eq!(first, (1..=28).step_by(3).collect::<Vec<_>>());
        let second: Vec<_> = parts[1].values().collect();
        assert_eq!(second, (2..=29).step_by(3).collect::<Vec<_>>());
        let third: Vec<_> = parts[2].values().collect();
        assert_eq!(third, (3..=30).step_by(3).collect::<Vec<_>>());
    }

    #[test]
    fn more_workers_than_values() {
        let contiguous = partition(3, 8, PartitionKind::Contiguous);
        assert_eq!(contiguous.len(), 3);
        assert!(contiguous.iter().all(|p| p.len() == 1));

        let interleaved = partition(3, 8, PartitionKind::Interleaved);
        assert_eq!(interleaved.len(), 8);
        assert_eq!(interleaved.iter().filter(|p| p.is_empty()).count(), 5);
        assert_eq!(interleaved[7].values().next(), None);
    }

    #[test]
    fn degenerate_range_has_no_partitions() {
        for kind in KINDS {
            assert!(partition(0, 4, kind).is_empty());
            assert!(partition(10, 0, kind).is_empty());
        }
    }

    #[test]
    fn values_stop_at_u64_max() {
        let part = Partition::Interleaved {
            offset: u64::MAX - 1,
            stride: 4,
            upper_bound: u64::MAX,
        };
        assert_eq!(part.values().collect::<Vec<_>>(), vec![u64::MAX - 1]);
        assert_eq!(part.len(), 1);

        let block = Partition::Contiguous {
            start: u64::MAX - 2,
            end: u64::MAX,
        };
        assert_eq!(block.values().count(), 3);
    }

    #[test]
    fn size_hint_is_exact() {
        let part = Partition::Interleaved {
            offset: 2,
            stride: 5,
            upper_bound: 100,
        };
        let values = part.values();
        assert_eq!(values.size_hint(), (20, Some(20)));
        assert_eq!(values.count(), 20);
    }
}
