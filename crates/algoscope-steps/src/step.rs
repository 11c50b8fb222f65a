//! The unit of playback: one immutable snapshot of algorithm progress.
//!
//! Producers build steps with the chained setters below and hand them out by
//! value. Nothing mutates a step after it has been yielded.

/// One frame of algorithm progress.
///
/// All index fields refer to positions in [`Step::array`] at the moment the
/// step was emitted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step {
    /// Full array state at this instant
    pub array: Vec<i64>,
    /// Indices currently under comparison
    pub comparing: Vec<usize>,
    /// Indices currently being exchanged or written
    pub swapping: Vec<usize>,
    /// Indices already in their final position
    pub sorted: Vec<usize>,
    /// Index where a search target was located
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub found: Option<usize>,
    /// Active sub-array window `[lo, hi]`, inclusive on both ends
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub range: Option<(usize, usize)>,
    /// Narration of the transition being shown
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub description: Option<String>,
}

impl Step {
    /// A step showing `array` with nothing highlighted.
    pub fn new(array: &[i64]) -> Self {
        Self {
            array: array.to_vec(),
            ..Self::default()
        }
    }

    pub fn comparing(mut self, indices: impl Into<Vec<usize>>) -> Self {
        self.comparing = indices.into();
        self
    }

    pub fn swapping(mut self, indices: impl Into<Vec<usize>>) -> Self {
        self.swapping = indices.into();
        self
    }

    pub fn sorted(mut self, indices: impl Into<Vec<usize>>) -> Self {
        self.sorted = indices.into();
        self
    }

    /// Mark every index of the array as sorted.
    pub fn all_sorted(mut self) -> Self {
        self.sorted = (0..self.array.len()).collect();
        self
    }

    pub fn found(mut self, index: usize) -> Self {
        self.found = Some(index);
        self
    }

    pub fn range(mut self, lo: usize, hi: usize) -> Self {
        self.range = Some((lo, hi));
        self
    }

    pub fn describe(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Whether this step counts toward the comparison statistic.
    pub fn is_comparison(&self) -> bool {
        !self.comparing.is_empty()
    }

    /// Whether this step counts toward the swap statistic.
    pub fn is_exchange(&self) -> bool {
        !self.swapping.is_empty()
    }

    /// Whether the step carries narration text.
    pub fn is_narrated(&self) -> bool {
        self.description.as_deref().is_some_and(|d| !d.is_empty())
    }

    /// Check that every index in the step points into `array`.
    pub fn indices_in_bounds(&self) -> bool {
        let n = self.array.len();
        let in_bounds = |i: &usize| *i < n;
        self.comparing.iter().all(in_bounds)
            && self.swapping.iter().all(in_bounds)
            && self.sorted.iter().all(in_bounds)
            && self.found.map_or(true, |i| i < n)
            && self.range.map_or(true, |(lo, hi)| lo <= hi && hi < n)
    }
}
