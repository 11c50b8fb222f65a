//! Selection sort as a step sequence.

use std::iter::FusedIterator;

use crate::Step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    Outer,
    Scan,
    Update,
    Place,
    Finalize,
    Done,
}

/// Scans the unsorted suffix for its minimum and swaps it to the front.
#[derive(Debug, Clone)]
pub struct SelectionSort {
    a: Vec<i64>,
    sorted: Vec<usize>,
    i: usize,
    j: usize,
    min: usize,
    phase: Phase,
}

impl SelectionSort {
    pub fn new(input: &[i64]) -> Self {
        Self {
            a: input.to_vec(),
            sorted: Vec::new(),
            i: 0,
            j: 0,
            min: 0,
            phase: Phase::Start,
        }
    }

    fn snapshot(&self) -> Step {
        Step::new(&self.a).sorted(self.sorted.clone())
    }
}

impl Iterator for SelectionSort {
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
                    self.phase = Phase::Outer;
                    return Some(self.snapshot().describe(
                        "Starting Selection Sort: finding the minimum element in each pass.",
                    ));
                }
                Phase::Outer => {
                    if self.i >= n {
                        self.phase = Phase::Done;
                        continue;
                    }
                    self.min = self.i;
                    self.j = self.i + 1;
                    self.phase = Phase::Scan;
                }
                Phase::Scan => {
                    if self.j >= n {
                        self.phase = Phase::Place;
                        continue;
                    }
                    self.phase = Phase::Update;
                    return Some(self.snapshot().comparing([self.min, self.j]).describe(format!(
                        "Current minimum is {}. Comparing with {}.",
                        self.a[self.min], self.a[self.j]
                    )));
                }
                Phase::Update => {
                    let j = self.j;
                    self.j += 1;
                    self.phase = Phase::Scan;
                    if self.a[j] < self.a[self.min] {
                        self.min = j;
                        return Some(
                            self.snapshot()
                                .comparing([j])
                                .describe(format!("New minimum found: {}!", self.a[j])),
                        );
                    }
                }
                Phase::Place => {
                    self.phase = Phase::Finalize;
                    if self.min != self.i {
                        self.a.swap(self.i, self.min);
                        return Some(
                            self.snapshot()
                                .swapping([self.i, self.min])
                                .describe(format!(
                                    "Swapping {} into its correct spot.",
                                    self.a[self.i]
                                )),
                        );
                    }
                }
                Phase::Finalize => {
                    let i = self.i;
                    self.sorted.push(i);
                    self.i += 1;
                    self.phase = Phase::Outer;
                    return Some(
                        self.snapshot()
                            .describe(format!("Position {i} is now finalized.")),
                    );
                }
                Phase::Done => return None,
            }
        }
    }
}

impl FusedIterator for SelectionSort {}
