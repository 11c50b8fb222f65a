//! Binary search as a step sequence.
//!
//! The producer sorts its own copy of the input before searching, so the
//! array it shows and the indices it reports refer to the ascending order,
//! not to the caller's order.

use std::iter::FusedIterator;

use crate::Step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    AnnounceSort,
    MarkSorted,
    Goal,
    Probe,
    Judge { mid: usize },
    Window,
    Done,
}

/// Repeatedly halves the window `[lo, hi)` around the middle element.
///
/// Once the preparatory steps have marked the array sorted, every later step
/// keeps the full `sorted` set.
#[derive(Debug, Clone)]
pub struct BinarySearch {
    a: Vec<i64>,
    target: i64,
    lo: usize,
    /// Exclusive upper bound of the window
    hi: usize,
    phase: Phase,
}

impl BinarySearch {
    pub fn new(input: &[i64], target: i64) -> Self {
        let mut a = input.to_vec();
        a.sort_unstable();
        let hi = a.len();
        Self {
            a,
            target,
            lo: 0,
            hi,
            phase: Phase::AnnounceSort,
        }
    }

    fn sorted_step(&self) -> Step {
        Step::new(&self.a).all_sorted()
    }
}

impl Iterator for BinarySearch {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        let target = self.target;
        loop {
            match self.phase {
                Phase::AnnounceSort => {
                    if self.a.is_empty() {
                        self.phase = Phase::Done;
                        return Some(crate::not_found_step(&self.a, target));
                    }
                    self.phase = Phase::MarkSorted;
                    return Some(
                        Step::new(&self.a)
                            .describe("Binary Search requires a sorted array. Let's sort it first."),
                    );
                }
                Phase::MarkSorted => {
                    self.phase = Phase::Goal;
                    return Some(
                        self.sorted_step()
                            .describe("Array is sorted. Starting Binary Search."),
                    );
                }
                Phase::Goal => {
                    self.phase = Phase::Probe;
                    return Some(self.sorted_step().describe(format!(
                        "Goal: Find {target}. We will repeatedly halve the search range."
                    )));
                }
                Phase::Probe => {
                    let (lo, hi) = (self.lo, self.hi);
                    if lo >= hi {
                        self.phase = Phase::Done;
                        return Some(
                            self.sorted_step()
                                .describe(format!("Range exhausted. {target} is not in the array.")),
                        );
                    }
                    let mid = lo + (hi - 1 - lo) / 2;
                    self.phase = Phase::Judge { mid };
                    return Some(
                        self.sorted_step()
                            .comparing([mid])
                            .range(lo, hi - 1)
                            .describe(format!(
                                "Calculating mid index: {mid}. Checking value {}.",
                                self.a[mid]
                            )),
                    );
                }
                Phase::Judge { mid } => {
                    let value = self.a[mid];
                    if value == target {
                        self.phase = Phase::Done;
                        return Some(self.sorted_step().found(mid).describe(format!(
                            "Target found at the middle! Found {target} at index {mid}."
                        )));
                    }
                    self.phase = Phase::Window;
                    if value < target {
                        let step = self
                            .sorted_step()
                            .range(self.lo, mid)
                            .describe(format!("{value} is too small. Discarding everything to the left."));
                        self.lo = mid + 1;
                        return Some(step);
                    }
                    let step = self
                        .sorted_step()
                        .range(mid, self.hi - 1)
                        .describe(format!("{value} is too big. Discarding everything to the right."));
                    self.hi = mid;
                    return Some(step);
                }
                Phase::Window => {
                    self.phase = Phase::Probe;
                    let (lo, hi) = (self.lo, self.hi);
                    if lo < hi {
                        return Some(
                            self.sorted_step()
                                .range(lo, hi - 1)
                                .describe(format!("Searching within indices [{lo} - {}].", hi - 1)),
                        );
                    }
                }
                Phase::Done => return None,
            }
        }
    }
}

impl FusedIterator for BinarySearch {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presorts_unsorted_input() {
        let steps: Vec<_> = BinarySearch::new(&[9, 2, 7, 4], 7).collect();

        assert_eq!(steps[0].array, vec![2, 4, 7, 9]);
        assert_eq!(steps[1].array, vec![2, 4, 7, 9]);
        assert_eq!(steps[1].sorted, vec![0, 1, 2, 3]);

        let last = steps.last().unwrap();
        assert_eq!(last.found, Some(2));
        assert_eq!(last.array[2], 7);
    }

    #[test]
    fn probes_are_logarithmic() {
        let input: Vec<i64> = (0..100).collect();
        for target in [-1, 0, 37, 99, 150] {
            let probes = BinarySearch::new(&input, target)
                .filter(Step::is_comparison)
                .count();
            // ceil(log2(100)) + 1
            assert!(probes <= 8, "target {target} took {probes} probes");
        }
    }

    #[test]
    fn too_small_then_window_announcement() {
        let steps: Vec<_> = BinarySearch::new(&[1, 3, 5], 5).collect();
        // prep x3, probe mid=1, too small, window [2-2], probe mid=2, found
        assert_eq!(steps.len(), 8);
        assert_eq!(steps[3].comparing, vec![1]);
        assert_eq!(steps[3].range, Some((0, 2)));
        assert_eq!(steps[4].range, Some((0, 1)));
        assert_eq!(steps[5].description.as_deref(), Some("Searching within indices [2 - 2]."));
        assert_eq!(steps[7].found, Some(2));
    }

    #[test]
    fn missing_target_ends_with_not_found() {
        let steps: Vec<_> = BinarySearch::new(&[10, 20], 5).collect();
        let last = steps.last().unwrap();
        assert_eq!(last.found, None);
        assert_eq!(last.description.as_deref(), Some("Range exhausted. 5 is not in the array."));
        // prep x3, probe mid=0, too big, not found: no window announcement
        // once the window is empty
        assert_eq!(steps.len(), 6);
    }

    #[test]
    fn empty_array_emits_only_not_found() {
        let steps: Vec<_> = BinarySearch::new(&[], 1).collect();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].found, None);
    }
}
