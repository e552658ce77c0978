use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::splits::{
    ALL_SPLITS, DEFAULT_TEST_RATIO, DEFAULT_TRAIN_RATIO, DEFAULT_VALIDATION_RATIO,
    RATIO_SUM_EPSILON,
};
use crate::errors::DatasetError;

/// Logical dataset partitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitLabel {
    /// Training split.
    Train,
    /// Validation split.
    Validation,
    /// Test split.
    Test,
}

impl SplitLabel {
    /// Lowercase split name.
    pub const fn as_str(self) -> &'static str {
        match self {
            SplitLabel::Train => "train",
            SplitLabel::Validation => "validation",
            SplitLabel::Test => "test",
        }
    }
}

impl fmt::Display for SplitLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitLabel {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_SPLITS
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                DatasetError::Configuration(format!(
                    "unknown split '{s}' (expected train, validation, or test)"
                ))
            })
    }
}

/// Ratio configuration for train/validation/test assignment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SplitRatios {
    /// Fraction assigned to train.
    pub train: f64,
    /// Fraction assigned to validation.
    pub validation: f64,
    /// Fraction assigned to test.
    pub test: f64,
}

impl Default for SplitRatios {
    fn default() -> Self {
        Self {
            train: DEFAULT_TRAIN_RATIO,
            validation: DEFAULT_VALIDATION_RATIO,
            test: DEFAULT_TEST_RATIO,
        }
    }
}

impl SplitRatios {
    /// Build ratios from explicit fractions without validating them.
    pub const fn new(train: f64, validation: f64, test: f64) -> Self {
        Self {
            train,
            validation,
            test,
        }
    }

    /// Validate that ratios are non-negative and sum to `1.0` (within epsilon).
    pub fn normalized(self) -> Result<Self, DatasetError> {
        let sum = self.train + self.validation + self.test;
        if (sum - 1.0).abs() >= RATIO_SUM_EPSILON {
            return Err(DatasetError::Configuration(format!(
                "split ratios must sum to 1.0, got {sum:.6} (train={}, validation={}, test={})",
                self.train, self.validation, self.test
            )));
        }
        if self.train < 0.0 || self.validation < 0.0 || self.test < 0.0 {
            return Err(DatasetError::Configuration(
                "split ratios must be non-negative".to_string(),
            ));
        }
        Ok(self)
    }
}

impl From<[f64; 3]> for SplitRatios {
    fn from([train, validation, test]: [f64; 3]) -> Self {
        Self::new(train, validation, test)
    }
}

/// The three partitions produced by [`split_records`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitSet<T> {
    /// Training items.
    pub train: Vec<T>,
    /// Validation items.
    pub validation: Vec<T>,
    /// Test items.
    pub test: Vec<T>,
}

impl<T> SplitSet<T> {
    /// Borrow the items assigned to `label`.
    pub fn get(&self, label: SplitLabel) -> &[T] {
        match label {
            SplitLabel::Train => &self.train,
            SplitLabel::Validation => &self.validation,
            SplitLabel::Test => &self.test,
        }
    }

    /// Take ownership of the items assigned to `label`.
    pub fn into_split(self, label: SplitLabel) -> Vec<T> {
        match label {
            SplitLabel::Train => self.train,
            SplitLabel::Validation => self.validation,
            SplitLabel::Test => self.test,
        }
    }

    /// Sizes in `[train, validation, test]` order.
    pub fn lengths(&self) -> [usize; 3] {
        [self.train.len(), self.validation.len(), self.test.len()]
    }
}

/// Shuffle `items` with a ChaCha8 stream seeded by `seed` and slice them into
/// splits.
///
/// `train` receives `floor(len * ratios.train)` items, `validation` the next
/// `floor(len * ratios.validation)`, and `test` the remainder, which may be
/// empty for small inputs. Identical `(items, seed)` always yield identical
/// membership and order.
pub fn split_records<T>(
    mut items: Vec<T>,
    ratios: SplitRatios,
    seed: u64,
) -> Result<SplitSet<T>, DatasetError> {
    let ratios = ratios.normalized()?;
    items.shuffle(&mut ChaCha8Rng::seed_from_u64(seed));

    let total = items.len();
    let train_len = ((total as f64) * ratios.train).floor() as usize;
    let val_len = ((total as f64) * ratios.validation).floor() as usize;
    let train_len = train_len.min(total);
    let val_len = val_len.min(total - train_len);

    let mut validation = items.split_off(train_len);
    let test = validation.split_off(val_len);

    tracing::debug!(
        total,
        train = items.len(),
        validation = validation.len(),
        test = test.len(),
        seed,
        "split corpus"
    );

    Ok(SplitSet {
        train: items,
        validation,
        test,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ratios_must_sum_to_one() {
        assert!(SplitRatios::default().normalized().is_ok());
        assert!(SplitRatios::new(0.7, 0.2, 0.1).normalized().is_ok());
        let err = SplitRatios::new(0.8, 0.1, 0.2).normalized().unwrap_err();
        assert!(matches!(err, DatasetError::Configuration(_)));
        assert!(SplitRatios::new(1.2, -0.1, -0.1).normalized().is_err());
    }

    #[test]
    fn invalid_ratios_fail_before_shuffling() {
        let err = split_records(vec![1, 2, 3], SplitRatios::new(0.5, 0.5, 0.5), 42).unwrap_err();
        assert!(matches!(err, DatasetError::Configuration(_)));
    }

    #[test]
    fn split_is_deterministic_for_same_seed() {
        let items: Vec<usize> = (0..50).collect();
        let a = split_records(items.clone(), SplitRatios::default(), 42).unwrap();
        let b = split_records(items, SplitRatios::default(), 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_change_order() {
        let items: Vec<usize> = (0..50).collect();
        let a = split_records(items.clone(), SplitRatios::default(), 1).unwrap();
        let b = split_records(items, SplitRatios::default(), 2).unwrap();
        assert_ne!(a.train, b.train);
    }

    #[test]
    fn ten_items_split_eight_one_one() {
        let items: Vec<usize> = (0..10).collect();
        let split = split_records(items, SplitRatios::default(), 42).unwrap();
        assert_eq!(split.lengths(), [8, 1, 1]);
    }

    #[test]
    fn seeded_shuffle_matches_a_fresh_chacha_stream() {
        let items: Vec<usize> = (0..10).collect();
        let mut expected = items.clone();
        expected.shuffle(&mut ChaCha8Rng::seed_from_u64(42));
        let split = split_records(items, SplitRatios::default(), 42).unwrap();
        let order: Vec<usize> = split
            .train
            .iter()
            .chain(&split.validation)
            .chain(&split.test)
            .copied()
            .collect();
        assert_eq!(order, expected);
    }

    #[test]
    fn all_items_are_preserved_exactly_once() {
        for total in [0_usize, 1, 2, 3, 7, 19, 101] {
            let items: Vec<usize> = (0..total).collect();
            let split = split_records(items, SplitRatios::new(0.6, 0.3, 0.1), 9).unwrap();
            let [train, validation, test] = split.lengths();
            assert_eq!(train + validation + test, total);
            let seen: HashSet<usize> = split
                .train
                .iter()
                .chain(&split.validation)
                .chain(&split.test)
                .copied()
                .collect();
            assert_eq!(seen.len(), total);
        }
    }

    #[test]
    fn small_inputs_may_leave_test_empty() {
        let split = split_records(vec!["a", "b"], SplitRatios::new(0.5, 0.5, 0.0), 3).unwrap();
        assert_eq!(split.lengths(), [1, 1, 0]);
        assert!(split.get(SplitLabel::Test).is_empty());
    }

    #[test]
    fn train_fraction_converges_with_size() {
        let items: Vec<usize> = (0..10_000).collect();
        let split = split_records(items, SplitRatios::new(0.73, 0.17, 0.1), 5).unwrap();
        let fraction = split.train.len() as f64 / 10_000.0;
        assert!((fraction - 0.73).abs() < 1e-3);
    }

    #[test]
    fn labels_parse_and_display() {
        for label in ALL_SPLITS {
            assert_eq!(label.to_string().parse::<SplitLabel>().unwrap(), label);
        }
        assert_eq!("Validation".parse::<SplitLabel>().unwrap(), SplitLabel::Validation);
        assert!("holdout".parse::<SplitLabel>().is_err());
    }

    #[test]
    fn into_split_selects_partition() {
        let split = split_records((0..10).collect::<Vec<_>>(), SplitRatios::default(), 42).unwrap();
        let expected = split.validation.clone();
        assert_eq!(split.into_split(SplitLabel::Validation), expected);
    }
}
