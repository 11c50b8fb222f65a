//! Quick sort (Lomuto partition) as a step sequence.

use std::iter::FusedIterator;

use crate::Step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PartitionPhase {
    Announce,
    Scan,
    Decide,
    PlacePivot,
}

#[derive(Debug, Clone, Copy)]
enum Frame {
    /// Sort the inclusive window `[low, high]`
    Sort { low: usize, high: usize },
    Partition {
        low: usize,
        high: usize,
        pivot: i64,
        /// Next slot for an element smaller than the pivot
        store: usize,
        j: usize,
        phase: PartitionPhase,
    },
}

/// Quick sort using the last element of each window as pivot.
///
/// Each recursive call is a frame on an explicit stack; partition frames
/// keep their scan position so the sort can be suspended between any two
/// steps.
#[derive(Debug, Clone)]
pub struct QuickSort {
    a: Vec<i64>,
    stack: Vec<Frame>,
    done: bool,
}

impl QuickSort {
    pub fn new(input: &[i64]) -> Self {
        let stack = if input.is_empty() {
            Vec::new()
        } else {
            vec![Frame::Sort { low: 0, high: input.len() - 1 }]
        };
        Self {
            a: input.to_vec(),
            stack,
            done: false,
        }
    }

    fn windowed(&self, low: usize, high: usize) -> Step {
        Step::new(&self.a).range(low, high)
    }

    fn advance_partition(&mut self) -> Option<Step> {
        let Some(Frame::Partition { low, high, pivot, store, j, phase }) = self.stack.last_mut()
        else {
            return None;
        };
        let (low, high, pivot) = (*low, *high, *pivot);

        match *phase {
            PartitionPhase::Announce => {
                *phase = PartitionPhase::Scan;
                Some(
                    self.windowed(low, high)
                        .comparing([high])
                        .describe(format!("Partitioning: Using {pivot} as the pivot.")),
                )
            }
            PartitionPhase::Scan => {
                if *j < high {
                    *phase = PartitionPhase::Decide;
                    let j = *j;
                    return Some(
                        self.windowed(low, high)
                            .comparing([j, high])
                            .describe(format!("Is {} < {pivot}?", self.a[j])),
                    );
                }
                *phase = PartitionPhase::PlacePivot;
                None
            }
            PartitionPhase::Decide => {
                let scanned = *j;
                *j += 1;
                *phase = PartitionPhase::Scan;
                if self.a[scanned] < pivot {
                    let slot = *store;
                    *store += 1;
                    self.a.swap(slot, scanned);
                    return Some(
                        self.windowed(low, high)
                            .swapping([slot, scanned])
                            .describe("Yes! Moving it to the left side."),
                    );
                }
                None
            }
            PartitionPhase::PlacePivot => {
                let slot = *store;
                self.stack.pop();
                self.a.swap(slot, high);
                if slot < high {
                    self.stack.push(Frame::Sort { low: slot + 1, high });
                }
                if slot > low {
                    self.stack.push(Frame::Sort { low, high: slot - 1 });
                }
                Some(
                    self.windowed(low, high)
                        .swapping([slot, high])
                        .describe(format!("Placing pivot {pivot} in its final spot at index {slot}.")),
                )
            }
        }
    }
}

impl Iterator for QuickSort {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.done {
            return None;
        }
        if self.a.is_empty() {
            self.done = true;
            return Some(crate::empty_sort_step());
        }

        while let Some(&frame) = self.stack.last() {
            match frame {
                Frame::Sort { low, high } => {
                    self.stack.pop();
                    if low == high {
                        return Some(
                            self.windowed(low, high)
                                .describe("Single element is already sorted."),
                        );
                    }
                    self.stack.push(Frame::Partition {
                        low,
                        high,
                        pivot: self.a[high],
                        store: low,
                        j: low,
                        phase: PartitionPhase::Announce,
                    });
                }
                Frame::Partition { .. } => {
                    if let Some(step) = self.advance_partition() {
                        return Some(step);
                    }
                }
            }
        }

        self.done = true;
        Some(Step::new(&self.a).all_sorted().describe("Quick Sort complete!"))
    }
}

impl FusedIterator for QuickSort {}
