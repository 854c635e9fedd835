use crate::common::*;

/// Entries per class taken by the training split, from the head of the
/// sorted directory listing.
pub const TRAIN_PER_CLASS: usize = 150;
/// Entries per class taken by the validation split, immediately after the
/// training slice.
pub const VAL_PER_CLASS: usize = 30;

/// The dataset partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Val,
}

impl Split {
    /// Per-class index range into the directory listing and annotation rows.
    pub fn per_class_range(&self) -> Range<usize> {
        match self {
            Self::Train => 0..TRAIN_PER_CLASS,
            Self::Val => TRAIN_PER_CLASS..TRAIN_PER_CLASS + VAL_PER_CLASS,
        }
    }

    pub fn per_class_len(&self) -> usize {
        self.per_class_range().len()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Train => "train",
            Self::Val => "val",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Split {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        match text {
            "train" => Ok(Self::Train),
            "val" => Ok(Self::Val),
            _ => Err(Error::UnsupportedSplit {
                given: text.to_owned(),
            }),
        }
    }
}

/// The class label sequence for a split: `per_class_len()` repeats of each
/// class id, concatenated in class order.
///
/// Pure function of the split; its length and order match the record
/// sequence assembled by [`TinyVidDataset::load`](crate::TinyVidDataset::load)
/// for the same class ordering.
pub fn class_labels(split: Split, num_classes: usize) -> Vec<usize> {
    (0..num_classes)
        .flat_map(|class| iter::repeat(class).take(split.per_class_len()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_ranges_are_disjoint() {
        assert_eq!(Split::Train.per_class_range(), 0..150);
        assert_eq!(Split::Val.per_class_range(), 150..180);
        assert_eq!(Split::Train.per_class_len(), 150);
        assert_eq!(Split::Val.per_class_len(), 30);
    }

    #[test]
    fn split_parsing() {
        assert_eq!("train".parse::<Split>().unwrap(), Split::Train);
        assert_eq!("val".parse::<Split>().unwrap(), Split::Val);
        let err = "test".parse::<Split>().unwrap_err();
        assert!(matches!(err, Error::UnsupportedSplit { given } if given == "test"));
    }

    #[test]
    fn training_label_sequence() {
        let labels = class_labels(Split::Train, 5);
        assert_eq!(labels.len(), 750);
        (0..5).for_each(|class| {
            assert!(labels[class * 150..(class + 1) * 150]
                .iter()
                .all(|&label| label == class));
        });
    }

    #[test]
    fn validation_label_sequence() {
        let labels = class_labels(Split::Val, 5);
        assert_eq!(labels.len(), 150);
        assert_eq!(labels[0], 0);
        assert_eq!(labels[149], 4);
    }
}
