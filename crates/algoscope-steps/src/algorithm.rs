//! The algorithm catalogue and the one-shot producer that runs an entry.

use std::fmt;
use std::iter::FusedIterator;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::{
    BinarySearch, BubbleSort, InsertionSort, LinearSearch, MergeSort, QuickSort, SelectionSort,
    Step,
};

/// Whether an algorithm orders its input or looks for a target in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AlgorithmKind {
    Sorting,
    Searching,
}

/// One of the seven visualized algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Algorithm {
    #[default]
    Bubble,
    Selection,
    Insertion,
    Merge,
    Quick,
    Linear,
    Binary,
}

/// Static description of an algorithm for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AlgorithmInfo {
    pub id: Algorithm,
    pub name: &'static str,
    pub kind: AlgorithmKind,
    /// Time complexity in big-O notation
    pub time: &'static str,
    /// Space complexity in big-O notation
    pub space: &'static str,
    pub description: &'static str,
}

impl Algorithm {
    /// Every algorithm, in catalogue order.
    pub const ALL: [Algorithm; 7] = [
        Algorithm::Bubble,
        Algorithm::Selection,
        Algorithm::Insertion,
        Algorithm::Merge,
        Algorithm::Quick,
        Algorithm::Linear,
        Algorithm::Binary,
    ];

    /// The lowercase identifier used on the wire and in configuration.
    pub const fn id(&self) -> &'static str {
        match self {
            Algorithm::Bubble => "bubble",
            Algorithm::Selection => "selection",
            Algorithm::Insertion => "insertion",
            Algorithm::Merge => "merge",
            Algorithm::Quick => "quick",
            Algorithm::Linear => "linear",
            Algorithm::Binary => "binary",
        }
    }

    pub const fn info(&self) -> AlgorithmInfo {
        let (name, kind, time, space, description) = match self {
            Algorithm::Bubble => (
                "Bubble Sort",
                AlgorithmKind::Sorting,
                "O(n²)",
                "O(1)",
                "Repeatedly compares and swaps adjacent elements.",
            ),
            Algorithm::Selection => (
                "Selection Sort",
                AlgorithmKind::Sorting,
                "O(n²)",
                "O(1)",
                "Repeatedly finds the minimum element and moves it to the beginning.",
            ),
            Algorithm::Insertion => (
                "Insertion Sort",
                AlgorithmKind::Sorting,
                "O(n²)",
                "O(1)",
                "Builds a sorted array one element at a time by shifting larger elements.",
            ),
            Algorithm::Merge => (
                "Merge Sort",
                AlgorithmKind::Sorting,
                "O(n log n)",
                "O(n)",
                "Divide and conquer algorithm that recursively splits and merges halves.",
            ),
            Algorithm::Quick => (
                "Quick Sort",
                AlgorithmKind::Sorting,
                "O(n log n)",
                "O(log n)",
                "Divide and conquer algorithm that partitions the array around a pivot.",
            ),
            Algorithm::Linear => (
                "Linear Search",
                AlgorithmKind::Searching,
                "O(n)",
                "O(1)",
                "Checks every element sequentially until the target is found.",
            ),
            Algorithm::Binary => (
                "Binary Search",
                AlgorithmKind::Searching,
                "O(log n)",
                "O(1)",
                "Efficiently searches a sorted array by repeatedly halving the search range.",
            ),
        };
        AlgorithmInfo {
            id: *self,
            name,
            kind,
            time,
            space,
            description,
        }
    }

    pub const fn kind(&self) -> AlgorithmKind {
        self.info().kind
    }

    pub const fn is_search(&self) -> bool {
        matches!(self.kind(), AlgorithmKind::Searching)
    }

    /// Whether the algorithm expects its input in ascending order.
    pub const fn requires_sorted_input(&self) -> bool {
        matches!(self, Algorithm::Binary)
    }

    /// Start a fresh run over `input`. Sorting algorithms ignore `target`.
    pub fn producer(&self, input: &[i64], target: i64) -> StepProducer {
        let steps: Box<dyn Iterator<Item = Step> + Send + Sync> = match self {
            Algorithm::Bubble => Box::new(BubbleSort::new(input)),
            Algorithm::Selection => Box::new(SelectionSort::new(input)),
            Algorithm::Insertion => Box::new(InsertionSort::new(input)),
            Algorithm::Merge => Box::new(MergeSort::new(input)),
            Algorithm::Quick => Box::new(QuickSort::new(input)),
            Algorithm::Linear => Box::new(LinearSearch::new(input, target)),
            Algorithm::Binary => Box::new(BinarySearch::new(input, target)),
        };
        StepProducer {
            algorithm: *self,
            steps,
            yielded: 0,
            exhausted: false,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Algorithm::ALL
            .into_iter()
            .find(|a| a.id().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownAlgorithm(s.to_string()))
    }
}

/// A lazy, finite, one-shot sequence of steps bound to one input.
///
/// Once it returns `None` it stays exhausted; start a new run with
/// [`Algorithm::producer`] instead of reusing it.
pub struct StepProducer {
    algorithm: Algorithm,
    steps: Box<dyn Iterator<Item = Step> + Send + Sync>,
    yielded: u64,
    exhausted: bool,
}

impl StepProducer {
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Number of steps handed out so far.
    pub fn yielded(&self) -> u64 {
        self.yielded
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

impl fmt::Debug for StepProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StepProducer")
            .field("algorithm", &self.algorithm)
            .field("yielded", &self.yielded)
            .field("exhausted", &self.exhausted)
            .finish_non_exhaustive()
    }
}

impl Iterator for StepProducer {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.exhausted {
            return None;
        }
        match self.steps.next() {
            Some(step) => {
                self.yielded += 1;
                Some(step)
            }
            None => {
                self.exhausted = true;
                None
            }
        }
    }
}

impl FusedIterator for StepProducer {}
