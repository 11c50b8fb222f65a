//! Merge sort as a step sequence.
//!
//! Recursion is unrolled onto an explicit frame stack. A `Split` frame
//! announces its window, then replaces itself with a pending `Merge` frame
//! and pushes its two halves above it, so the halves drain (left first)
//! before the merge resumes. Merge frames copy their halves only when they
//! start, after both children have finished.

use std::iter::FusedIterator;

use crate::Step;

#[derive(Debug, Clone)]
enum Frame {
    Split { l: usize, r: usize },
    Merge { l: usize, m: usize, r: usize, cursor: Option<MergeCursor> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MergePhase {
    Compare,
    Place,
    Drain,
}

#[derive(Debug, Clone)]
struct MergeCursor {
    left: Vec<i64>,
    right: Vec<i64>,
    i: usize,
    j: usize,
    k: usize,
    phase: MergePhase,
}

/// Top-down merge sort with a stable (left-wins) merge.
#[derive(Debug, Clone)]
pub struct MergeSort {
    a: Vec<i64>,
    stack: Vec<Frame>,
    done: bool,
}

impl MergeSort {
    pub fn new(input: &[i64]) -> Self {
        let stack = if input.is_empty() {
            Vec::new()
        } else {
            vec![Frame::Split { l: 0, r: input.len() - 1 }]
        };
        Self {
            a: input.to_vec(),
            stack,
            done: false,
        }
    }

    fn windowed(&self, l: usize, r: usize) -> Step {
        Step::new(&self.a).range(l, r)
    }

    /// Advance the merge frame on top of the stack by at most one step.
    fn advance_merge(&mut self, l: usize, m: usize, r: usize) -> Option<Step> {
        let Some(Frame::Merge { cursor, .. }) = self.stack.last_mut() else {
            return None;
        };

        if cursor.is_none() {
            *cursor = Some(MergeCursor {
                left: self.a[l..=m].to_vec(),
                right: self.a[m + 1..=r].to_vec(),
                i: 0,
                j: 0,
                k: l,
                phase: MergePhase::Compare,
            });
            return Some(self.windowed(l, r).describe(format!(
                "Merging left [{l}-{m}] and right [{}-{r}] subarrays.",
                m + 1
            )));
        }
        let c = cursor.as_mut()?;

        match c.phase {
            MergePhase::Compare => {
                if c.i < c.left.len() && c.j < c.right.len() {
                    c.phase = MergePhase::Place;
                    let text = format!("Comparing {} and {}.", c.left[c.i], c.right[c.j]);
                    let pair = [l + c.i, m + 1 + c.j];
                    return Some(self.windowed(l, r).comparing(pair).describe(text));
                }
                c.phase = MergePhase::Drain;
                None
            }
            MergePhase::Place => {
                let value = if c.left[c.i] <= c.right[c.j] {
                    c.i += 1;
                    c.left[c.i - 1]
                } else {
                    c.j += 1;
                    c.right[c.j - 1]
                };
                let k = c.k;
                c.k += 1;
                c.phase = MergePhase::Compare;
                self.a[k] = value;
                Some(
                    self.windowed(l, r)
                        .swapping([k])
                        .describe(format!("Placing {value} back in correct order.")),
                )
            }
            MergePhase::Drain => {
                let k = c.k;
                let (value, text) = if c.i < c.left.len() {
                    c.i += 1;
                    (c.left[c.i - 1], "Appending remaining left elements.")
                } else if c.j < c.right.len() {
                    c.j += 1;
                    (c.right[c.j - 1], "Appending remaining right elements.")
                } else {
                    self.stack.pop();
                    return None;
                };
                c.k += 1;
                self.a[k] = value;
                Some(self.windowed(l, r).swapping([k]).describe(text))
            }
        }
    }
}

impl Iterator for MergeSort {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.done {
            return None;
        }
        if self.a.is_empty() {
            self.done = true;
            return Some(crate::empty_sort_step());
        }

        while let Some(frame) = self.stack.last() {
            match *frame {
                Frame::Split { l, r } => {
                    self.stack.pop();
                    if l >= r {
                        continue;
                    }
                    let m = l + (r - l) / 2;
                    self.stack.push(Frame::Merge { l, m, r, cursor: None });
                    self.stack.push(Frame::Split { l: m + 1, r });
                    self.stack.push(Frame::Split { l, r: m });
                    return Some(
                        self.windowed(l, r)
                            .describe(format!("Splitting range [{l}-{r}] at midpoint {m}.")),
                    );
                }
                Frame::Merge { l, m, r, .. } => {
                    if let Some(step) = self.advance_merge(l, m, r) {
                        return Some(step);
                    }
                }
            }
        }

        self.done = true;
        Some(Step::new(&self.a).all_sorted().describe("Merge Sort complete!"))
    }
}

impl FusedIterator for MergeSort {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_and_finishes_fully_sorted() {
        let steps: Vec<_> = MergeSort::new(&[38, 27, 43, 3, 9, 82, 10]).collect();
        let last = steps.last().unwrap();
        assert_eq!(last.array, vec![3, 9, 10, 27, 38, 43, 82]);
        assert_eq!(last.sorted, (0..7).collect::<Vec<_>>());
        assert_eq!(last.description.as_deref(), Some("Merge Sort complete!"));
    }

    #[test]
    fn split_order_is_depth_first_left_to_right() {
        let splits: Vec<_> = MergeSort::new(&[4, 3, 2, 1])
            .filter(|s| {
                s.description
                    .as_deref()
                    .is_some_and(|d| d.starts_with("Splitting"))
            })
            .map(|s| s.range.unwrap())
            .collect();
        assert_eq!(splits, vec![(0, 3), (0, 1), (2, 3)]);
    }

    #[test]
    fn two_element_trace() {
        let steps: Vec<_> = MergeSort::new(&[2, 1]).collect();
        let texts: Vec<_> = steps
            .iter()
            .map(|s| s.description.clone().unwrap_or_default())
            .collect();
        assert_eq!(
            texts,
            vec![
                "Splitting range [0-1] at midpoint 0.",
                "Merging left [0-0] and right [1-1] subarrays.",
                "Comparing 2 and 1.",
                "Placing 1 back in correct order.",
                "Appending remaining left elements.",
                "Merge Sort complete!",
            ]
        );
        assert_eq!(steps[2].comparing, vec![0, 1]);
        assert_eq!(steps[3].swapping, vec![0]);
        assert_eq!(steps[4].swapping, vec![1]);
        assert!(steps[..5].iter().all(|s| s.range == Some((0, 1))));
    }

    #[test]
    fn merge_is_stable_on_ties() {
        // Equal heads: the left element is placed first and the right one drains.
        let steps: Vec<_> = MergeSort::new(&[5, 5]).collect();
        let placed = steps.iter().find(|s| s.is_exchange()).unwrap();
        assert_eq!(placed.swapping, vec![0]);
        assert_eq!(steps.iter().filter(|s| s.is_comparison()).count(), 1);
        let drains: Vec<_> = steps
            .iter()
            .filter_map(|s| s.description.as_deref())
            .filter(|d| d.starts_with("Appending"))
            .collect();
        assert_eq!(drains, vec!["Appending remaining right elements."]);
    }

    #[test]
    fn single_element_only_completes() {
        let steps: Vec<_> = MergeSort::new(&[7]).collect();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].sorted, vec![0]);
    }

    #[test]
    fn fused_after_completion() {
        let mut producer = MergeSort::new(&[3, 1, 2]);
        for _ in producer.by_ref() {}
        assert!(producer.next().is_none());
        assert!(producer.next().is_none());
    }
}
