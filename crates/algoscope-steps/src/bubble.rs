//! Bubble sort as a step sequence.

use std::iter::FusedIterator;

use crate::Step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    Scan,
    Exchange,
    Done,
}

/// Compares adjacent pairs and swaps them when out of order; each pass locks
/// the largest remaining element at the end of the array.
#[derive(Debug, Clone)]
pub struct BubbleSort {
    a: Vec<i64>,
    sorted: Vec<usize>,
    /// Pass number
    i: usize,
    /// Left index of the pair under inspection
    j: usize,
    phase: Phase,
}

impl BubbleSort {
    pub fn new(input: &[i64]) -> Self {
        Self {
            a: input.to_vec(),
            sorted: Vec::new(),
            i: 0,
            j: 0,
            phase: Phase::Start,
        }
    }

    fn snapshot(&self) -> Step {
        Step::new(&self.a).sorted(self.sorted.clone())
    }
}

impl Iterator for BubbleSort {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        let n = self.a.len();
        loop {
            match self.phase {
                Phase::Start => {
                    if n == 0 {
                        self.phase = Phase::Done;
                        return Some(crate::empty_sort_step());
                    }
                    self.phase = Phase::Scan;
                    return Some(self.snapshot().describe(
                        "Starting Bubble Sort: adjacent elements will 'bubble up' to their correct position.",
                    ));
                }
                Phase::Scan => {
                    if self.i >= n {
                        self.phase = Phase::Done;
                        continue;
                    }
                    let j = self.j;
                    if j + 1 < n - self.i {
                        self.phase = Phase::Exchange;
                        return Some(self.snapshot().comparing([j, j + 1]).describe(format!(
                            "Checking: Is {} > {}?",
                            self.a[j],
                            self.a[j + 1]
                        )));
                    }
                    let fixed = n - 1 - self.i;
                    self.sorted.push(fixed);
                    self.i += 1;
                    self.j = 0;
                    return Some(
                        self.snapshot()
                            .describe(format!(
                                "End of pass: {} is locked in place.",
                                self.a[fixed]
                            )),
                    );
                }
                Phase::Exchange => {
                    let j = self.j;
                    self.j += 1;
                    self.phase = Phase::Scan;
                    if self.a[j] > self.a[j + 1] {
                        self.a.swap(j, j + 1);
                        return Some(self.snapshot().swapping([j, j + 1]).describe(format!(
                            "Yes! Swapping {} and {}.",
                            self.a[j + 1],
                            self.a[j]
                        )));
                    }
                }
                Phase::Done => return None,
            }
        }
    }
}

impl FusedIterator for BubbleSort {}
