//! Linear search as a step sequence.

use std::iter::FusedIterator;

use crate::Step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    Probe,
    Test,
    Done,
}

/// Checks every element left to right and stops at the first match.
#[derive(Debug, Clone)]
pub struct LinearSearch {
    a: Vec<i64>,
    target: i64,
    i: usize,
    phase: Phase,
}

impl LinearSearch {
    pub fn new(input: &[i64], target: i64) -> Self {
        Self {
            a: input.to_vec(),
            target,
            i: 0,
            phase: Phase::Start,
        }
    }
}

impl Iterator for LinearSearch {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        let target = self.target;
        loop {
            match self.phase {
                Phase::Start => {
                    if self.a.is_empty() {
                        self.phase = Phase::Done;
                        return Some(crate::not_found_step(&self.a, target));
                    }
                    self.phase = Phase::Probe;
                    return Some(Step::new(&self.a).describe(format!(
                        "Starting Linear Search for {target}. We'll check every element one by one."
                    )));
                }
                Phase::Probe => {
                    let i = self.i;
                    if i >= self.a.len() {
                        self.phase = Phase::Done;
                        return Some(Step::new(&self.a).describe(format!(
                            "Target {target} was not found after checking the entire array."
                        )));
                    }
                    self.phase = Phase::Test;
                    return Some(
                        Step::new(&self.a)
                            .comparing([i])
                            .describe(format!("Checking index {i}: is {} == {target}?", self.a[i])),
                    );
                }
                Phase::Test => {
                    let i = self.i;
                    if self.a[i] == target {
                        self.phase = Phase::Done;
                        return Some(
                            Step::new(&self.a)
                                .found(i)
                                .describe(format!("Success! Target found at index {i}.")),
                        );
                    }
                    self.i += 1;
                    self.phase = Phase::Probe;
                }
                Phase::Done => return None,
            }
        }
    }
}

impl FusedIterator for LinearSearch {}
