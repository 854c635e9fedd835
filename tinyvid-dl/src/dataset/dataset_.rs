use super::Sample;
use crate::common::*;

/// The generic dataset trait.
pub trait GenericDataset
where
    Self: Debug,
{
    /// The number of color channels of the dataset.
    fn input_channels(&self) -> usize;

    /// The list of class names of the dataset.
    fn classes(&self) -> &IndexSet<String>;
}

/// The dataset that can be random accessed.
pub trait RandomAccessDataset
where
    Self: GenericDataset,
{
    /// Get number of records in the dataset.
    fn num_records(&self) -> usize;

    /// Compose the nth sample, drawing augmentation decisions from `rng`.
    fn nth(&self, index: usize, rng: &mut dyn RngCore) -> Result<Sample>;
}
