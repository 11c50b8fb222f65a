//! Insertion sort as a step sequence.

use std::iter::FusedIterator;

use crate::Step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Start,
    Pick,
    Shift,
    Write,
    Place,
    Done,
}

/// Grows a sorted prefix by picking the next element and shifting larger
/// elements right until its slot opens up.
///
/// The prefix `0..i` is reported as sorted while element `i` is in flight.
#[derive(Debug, Clone)]
pub struct InsertionSort {
    a: Vec<i64>,
    i: usize,
    /// Current hole position for the key being inserted
    hole: usize,
    key: i64,
    phase: Phase,
}

impl InsertionSort {
    pub fn new(input: &[i64]) -> Self {
        Self {
            a: input.to_vec(),
            i: 1,
            hole: 0,
            key: 0,
            phase: Phase::Start,
        }
    }

    fn snapshot(&self, sorted_len: usize) -> Step {
        Step::new(&self.a).sorted((0..sorted_len).collect::<Vec<_>>())
    }
}

impl Iterator for InsertionSort {
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
                    self.phase = Phase::Pick;
                    return Some(self.snapshot(1).describe(
                        "Starting Insertion Sort: picking elements and inserting them into the sorted portion.",
                    ));
                }
                Phase::Pick => {
                    let i = self.i;
                    if i >= n {
                        self.phase = Phase::Done;
                        continue;
                    }
                    self.key = self.a[i];
                    self.hole = i;
                    self.phase = Phase::Shift;
                    return Some(self.snapshot(i).comparing([i]).describe(format!(
                        "Picking {} to insert into the sorted section (indices 0 to {}).",
                        self.key,
                        i - 1
                    )));
                }
                Phase::Shift => {
                    let hole = self.hole;
                    if hole > 0 && self.a[hole - 1] > self.key {
                        self.phase = Phase::Write;
                        let larger = self.a[hole - 1];
                        return Some(
                            self.snapshot(self.i)
                                .comparing([hole - 1, hole])
                                .describe(format!(
                                    "{larger} > {}. Shifting {larger} to the right.",
                                    self.key
                                )),
                        );
                    }
                    self.phase = Phase::Place;
                }
                Phase::Write => {
                    let hole = self.hole;
                    self.a[hole] = self.a[hole - 1];
                    self.hole -= 1;
                    self.phase = Phase::Shift;
                    return Some(self.snapshot(self.i).swapping([hole - 1, hole]));
                }
                Phase::Place => {
                    let (i, hole, key) = (self.i, self.hole, self.key);
                    self.a[hole] = key;
                    self.i += 1;
                    self.phase = Phase::Pick;
                    return Some(
                        self.snapshot(i + 1)
                            .swapping([hole])
                            .describe(format!("Inserted {key} at position {hole}.")),
                    );
                }
                Phase::Done => return None,
            }
        }
    }
}

impl FusedIterator for InsertionSort {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_reverse_input() {
        let last = InsertionSort::new(&[9, 7, 5, 3]).last().unwrap();
        assert_eq!(last.array, vec![3, 5, 7, 9]);
        assert_eq!(last.sorted, vec![0, 1, 2, 3]);
    }

    #[test]
    fn shift_writes_are_unnarrated() {
        let steps: Vec<_> = InsertionSort::new(&[2, 1]).collect();
        // start, pick, compare, shift-write, place
        assert_eq!(steps.len(), 5);
        assert_eq!(steps[2].comparing, vec![0, 1]);
        assert_eq!(steps[3].swapping, vec![0, 1]);
        assert_eq!(steps[3].array, vec![2, 2]);
        assert!(!steps[3].is_narrated());
        assert_eq!(steps[4].array, vec![1, 2]);
        assert_eq!(steps[4].description.as_deref(), Some("Inserted 1 at position 0."));
    }

    #[test]
    fn prefix_is_reported_sorted_while_picking() {
        let picks: Vec<_> = InsertionSort::new(&[1, 2, 3])
            .filter(|s| s.comparing.len() == 1)
            .map(|s| s.sorted)
            .collect();
        assert_eq!(picks, vec![vec![0], vec![0, 1]]);
    }

    #[test]
    fn single_element_is_trivially_sorted() {
        let steps: Vec<_> = InsertionSort::new(&[42]).collect();
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].sorted, vec![0]);
    }
}
