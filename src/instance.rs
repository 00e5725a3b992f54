//! Immutable WR/WQ instance records (component B).

use num_bigint::BigInt;
use num_traits::Zero;
use thiserror::Error;

use crate::arith::{ceil_rational, Rational};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum DomainError {
    #[error("the weighted threshold must be smaller than the nominal threshold in Weight Restriction")]
    WrThresholdOrder,
    #[error("the weighted threshold must be greater than the nominal threshold in Weight Qualification")]
    WqThresholdOrder,
    #[error("thresholds must lie in [0, 1]")]
    ThresholdOutOfRange,
    #[error("at least one party is required")]
    EmptyWeights,
    #[error("party weights must be nonnegative")]
    NegativeWeight,
    #[error("at least one party must have a positive weight")]
    AllZeroWeights,
}

/// Checks shared by both instance constructors: nonempty, nonnegative, not
/// all-zero weights, and both thresholds within `[0, 1]`.
fn validate(weights: &[BigInt], tw: &Rational, tn: &Rational) -> Result<(), DomainError> {
    if weights.is_empty() {
        return Err(DomainError::EmptyWeights);
    }
    if weights.iter().any(|w| w.sign() == num_bigint::Sign::Minus) {
        return Err(DomainError::NegativeWeight);
    }
    if weights.iter().all(BigInt::is_zero) {
        return Err(DomainError::AllZeroWeights);
    }
    let zero = Rational::from_integer(BigInt::from(0));
    let one = Rational::from_integer(BigInt::from(1));
    if tw < &zero || tw > &one || tn < &zero || tn > &one {
        return Err(DomainError::ThresholdOutOfRange);
    }
    Ok(())
}

/// An instance of the Weight Restriction problem.
///
/// Immutable after construction: `n`, the weight vector, and both thresholds
/// never change. `total_weight` and `threshold_weight` are cached because
/// every phase of the solver needs them repeatedly.
#[derive(Debug, Clone)]
pub struct WeightRestriction {
    pub weights: Vec<BigInt>,
    pub tw: Rational,
    pub tn: Rational,
    pub total_weight: BigInt,
    pub threshold_weight: Rational,
}

impl WeightRestriction {
    /// `tw` is the weighted threshold (`alpha_w`), `tn` the nominal threshold
    /// (`alpha_n`). Requires `0 <= tw < tn <= 1`, `n >= 1`, and at least one
    /// positive weight.
    pub fn new(weights: Vec<BigInt>, tw: Rational, tn: Rational) -> Result<Self, DomainError> {
        validate(&weights, &tw, &tn)?;
        if tw >= tn {
            return Err(DomainError::WrThresholdOrder);
        }

        let total_weight: BigInt = weights.iter().sum();
        let threshold_weight = &tw * Rational::from_integer(total_weight.clone());

        Ok(WeightRestriction {
            weights,
            tw,
            tn,
            total_weight,
            threshold_weight,
        })
    }

    pub fn n(&self) -> usize {
        self.weights.len()
    }

    /// The largest integer strictly below the (possibly non-integer) adversary
    /// weight budget `alpha_w * W`: the knapsack capacity every validity check
    /// uses to mean "less than `alpha_w` of the total weight".
    pub fn adversary_capacity(&self) -> BigInt {
        ceil_rational(&self.threshold_weight) - BigInt::from(1)
    }
}

/// An instance of the Weight Qualification problem. Same shape as
/// [`WeightRestriction`] but with the inequality reversed: `beta_n < beta_w`.
#[derive(Debug, Clone)]
pub struct WeightQualification {
    pub weights: Vec<BigInt>,
    pub tw: Rational,
    pub tn: Rational,
}

impl WeightQualification {
    /// `tw` is the weighted threshold (`beta_w`), `tn` the nominal threshold
    /// (`beta_n`). Requires `0 <= tn < tw <= 1`, `n >= 1`, and at least one
    /// positive weight.
    pub fn new(weights: Vec<BigInt>, tw: Rational, tn: Rational) -> Result<Self, DomainError> {
        validate(&weights, &tw, &tn)?;
        if tw <= tn {
            return Err(DomainError::WqThresholdOrder);
        }

        Ok(WeightQualification { weights, tw, tn })
    }

    /// Reduces WQ to WR via `(alpha_w, alpha_n) = (1 - beta_w, 1 - beta_n)`
    /// on the same weight vector.
    pub fn to_wr(&self) -> WeightRestriction {
        let one = Rational::from_integer(BigInt::from(1));
        WeightRestriction::new(self.weights.clone(), &one - &self.tw, &one - &self.tn)
            .expect("WQ invariant tn < tw guarantees the derived WR thresholds are well ordered")
    }
}
