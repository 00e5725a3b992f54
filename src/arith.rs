//! Exact rational/integer utilities shared by every other component.
//!
//! Thresholds are user-supplied fractions and weights can grow very large once
//! normalized by an LCM, so everything here works over arbitrary-precision
//! integers and rationals rather than floats.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};
use thiserror::Error;

pub type Rational = BigRational;

/// Smallest integer `>= r`.
pub fn ceil_rational(r: &Rational) -> BigInt {
    let (q, rem) = r.numer().div_mod_floor(r.denom());
    if rem.is_zero() {
        q
    } else {
        q + BigInt::from(1)
    }
}

/// Largest integer `<= r`, as a `u64`. Only ever called on values known to be
/// small and nonnegative (ticket counts and ticket-count fractions).
pub fn floor_rational_u64(r: &Rational) -> u64 {
    r.numer()
        .div_floor(r.denom())
        .to_u64()
        .expect("floor(r) is always a small nonnegative integer in this solver")
}

/// lcm of a nonempty sequence of positive integers, seed 1.
pub fn lcm<'a, I>(xs: I) -> BigInt
where
    I: IntoIterator<Item = &'a BigInt>,
{
    xs.into_iter().fold(BigInt::one(), |acc, x| acc.lcm(x))
}

/// gcd of a sequence of integers, seed 0 (gcd of an empty sequence is 0).
pub fn gcd<'a, I>(xs: I) -> BigInt
where
    I: IntoIterator<Item = &'a BigInt>,
{
    xs.into_iter().fold(BigInt::zero(), |acc, x| acc.gcd(x))
}

/// The elements of `start..stop` stepping by `step`, in reverse order.
///
/// Some of the knapsack oracle's inner loops must walk high-to-low to avoid
/// reusing an item twice within the same pass; this makes that traversal
/// explicit rather than relying on `.rev()` over a forward range at the call
/// site every time.
pub fn reverse_range(start: i64, stop: i64, step: i64) -> impl Iterator<Item = i64> {
    debug_assert!(step != 0);
    let len = if stop > start {
        (stop - start + step - 1) / step
    } else {
        0
    };
    let last = start + (len - 1) * step;
    (0..len).map(move |i| last - i * step)
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseTokenError {
    #[error("malformed numeric literal: {0:?}")]
    Malformed(String),
    #[error("zero denominator in literal: {0:?}")]
    ZeroDenominator(String),
}

/// Parses a single whitespace-delimited token into an exact rational.
///
/// Accepts three surface forms, matching the input grammar described for
/// the command line: a plain integer (`"42"`), a fraction (`"p/q"`), or a
/// fixed-point decimal (`"d.ddd"`).
pub fn parse_rational(token: &str) -> Result<Rational, ParseTokenError> {
    if token.is_empty() {
        return Err(ParseTokenError::Malformed(token.to_string()));
    }

    if let Some((num, den)) = token.split_once('/') {
        let numerator = parse_bigint(num, token)?;
        let denominator = parse_bigint(den, token)?;
        if denominator.is_zero() {
            return Err(ParseTokenError::ZeroDenominator(token.to_string()));
        }
        return Ok(Rational::new(numerator, denominator));
    }

    if let Some((whole, frac)) = token.split_once('.') {
        if whole.is_empty() && frac.is_empty() {
            return Err(ParseTokenError::Malformed(token.to_string()));
        }
        let sign = if whole.starts_with('-') { -BigInt::one() } else { BigInt::one() };
        let whole_digits = whole.trim_start_matches(['-', '+']);
        let whole_part: BigInt = if whole_digits.is_empty() {
            BigInt::zero()
        } else {
            parse_bigint(whole_digits, token)?
        };
        if frac.is_empty() || !frac.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseTokenError::Malformed(token.to_string()));
        }
        let frac_part: BigInt = parse_bigint(frac, token)?;
        let scale = BigInt::from(10u32).pow(frac.len() as u32);
        let numerator = sign * (whole_part * &scale + frac_part);
        return Ok(Rational::new(numerator, scale));
    }

    let value = parse_bigint(token, token)?;
    Ok(Rational::from_integer(value))
}

fn parse_bigint(s: &str, original_token: &str) -> Result<BigInt, ParseTokenError> {
    let trimmed = s.trim_start_matches('+');
    if trimmed.is_empty() || trimmed == "-" {
        return Err(ParseTokenError::Malformed(original_token.to_string()));
    }
    let digits = trimmed.trim_start_matches('-');
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseTokenError::Malformed(original_token.to_string()));
    }
    trimmed
        .parse::<BigInt>()
        .map_err(|_| ParseTokenError::Malformed(original_token.to_string()))
}

/// Parses every whitespace-separated token in `input` into an exact rational.
pub fn parse_rationals(input: &str) -> Result<Vec<Rational>, ParseTokenError> {
    input.split_whitespace().map(parse_rational).collect()
}

/// Normalizes a list of rational weights to nonnegative integers, preserving
/// all ratios between them.
///
/// The normalization multiplies every weight by the LCM of all denominators
/// appearing among the weights and the two thresholds, then divides by the
/// GCD of the resulting numerators. The thresholds themselves are left
/// untouched: they are independent exact rationals in `[0, 1]`, not subject
/// to this rescaling.
pub fn normalize_weights(weights: &[Rational], tw: &Rational, tn: &Rational) -> Vec<BigInt> {
    let denominators = weights
        .iter()
        .chain([tw, tn])
        .map(|r| r.denom())
        .collect::<Vec<_>>();
    let denominator_lcm = lcm(denominators);

    let scaled_numerators = weights
        .iter()
        .map(|w| w.numer() * &denominator_lcm / w.denom())
        .collect::<Vec<_>>();

    let numerator_gcd = gcd(scaled_numerators.iter());
    if numerator_gcd.is_zero() {
        return scaled_numerators;
    }

    scaled_numerators
        .into_iter()
        .map(|n| n / &numerator_gcd)
        .collect()
}
