//! Algoscope Step Producers
//!
//! Sorting and searching algorithms re-expressed as lazy sequences of
//! inspectable [`Step`] snapshots.
//!
//! # Model
//!
//! Every algorithm is an explicit state machine implementing
//! `Iterator<Item = Step>`. A caller pulls one step at a time and may stop
//! between any two steps; resuming continues from exactly the next step.
//! Divide-and-conquer algorithms (merge sort, quick sort) keep their
//! recursion on an explicit frame stack instead of the call stack, so they
//! suspend mid-recursion the same way.
//!
//! Each producer emits one step per comparison (non-empty `comparing`) and
//! one per exchange or write (non-empty `swapping`), so counting steps gives
//! the statistics shown alongside the visualization.
//!
//! # Usage
//!
//! ```
//! use algoscope_steps::Algorithm;
//!
//! let last = Algorithm::Merge.producer(&[5, 3, 8, 1], 0).last().unwrap();
//! assert_eq!(last.array, vec![1, 3, 5, 8]);
//! ```

mod algorithm;
mod binary;
mod bubble;
mod error;
mod insertion;
mod linear;
mod merge;
mod quick;
mod selection;
mod step;

pub use algorithm::{Algorithm, AlgorithmInfo, AlgorithmKind, StepProducer};
pub use binary::BinarySearch;
pub use bubble::BubbleSort;
pub use error::{Error, Result};
pub use insertion::InsertionSort;
pub use linear::LinearSearch;
pub use merge::MergeSort;
pub use quick::QuickSort;
pub use selection::SelectionSort;
pub use step::Step;

/// Terminal step of a sort over an empty array.
pub(crate) fn empty_sort_step() -> Step {
    Step::new(&[]).describe("Nothing to sort: the array is empty, so it is already sorted.")
}

/// Terminal step of a search that found nothing to look at.
pub(crate) fn not_found_step(array: &[i64], target: i64) -> Step {
    Step::new(array).describe(format!("The array is empty. {target} is not in the array."))
}
