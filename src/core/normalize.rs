//! Schmidt quasi-normalization factors for spherical-harmonic coefficients.
//!
//! ```text
//! factor(n, m) = sqrt((2 - δ(m,0)) (n-m)! / (n+m)!) * (2n-1)!! / (n-m)!
//! ```
//!
//! The double factorial term comes in two flavours, see [`DoubleFactorial`].

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the `(2n-1)!!` term of the factor is evaluated.
///
/// `Legacy` multiplies the odd integers up to `n` instead of `2n-1`. Tables
/// already compiled into downstream firmware were produced this way, so it is
/// the default; switching to `Textbook` changes every coefficient with
/// `n >= 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DoubleFactorial {
    #[default]
    Legacy,
    Textbook,
}

impl DoubleFactorial {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Legacy => "legacy",
            Self::Textbook => "textbook",
        }
    }
}

impl fmt::Display for DoubleFactorial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DoubleFactorial {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(Self::Legacy),
            "textbook" => Ok(Self::Textbook),
            other => Err(format!(
                "unknown double factorial mode '{}', expected 'legacy' or 'textbook'",
                other
            )),
        }
    }
}

fn product<I>(terms: I) -> BigInt
where
    I: Iterator<Item = u32>,
{
    terms.fold(BigInt::one(), |acc, t| acc * t)
}

fn factorial(k: u32) -> BigInt {
    product(1..=k)
}

/// Nearest `f64` (ties to even); `inf` once the magnitude passes `f64::MAX`.
fn nearest_f64(value: &BigInt) -> f64 {
    value.to_f64().unwrap_or(f64::INFINITY)
}

fn exact_double_factorial(degree: u32, mode: DoubleFactorial) -> BigInt {
    let upper = match mode {
        DoubleFactorial::Legacy => degree,
        DoubleFactorial::Textbook => (2 * degree).saturating_sub(1),
    };
    product((1..=upper).step_by(2))
}

/// Odd-integer product used by [`factor`] for a given degree.
pub fn double_factorial(degree: u32, mode: DoubleFactorial) -> f64 {
    nearest_f64(&exact_double_factorial(degree, mode))
}

/// Normalization factor for degree `n >= 1` and order `m <= n`.
///
/// The ratio `(2 - δ) (n-m)! / (n+m)!` is reduced exactly and rounded once,
/// then `sqrt(ratio) * dfac / (n-m)!` is evaluated left to right in `f64`.
/// Returns NaN when `order > degree`.
pub fn factor(degree: u32, order: u32, mode: DoubleFactorial) -> f64 {
    let Some(diff) = degree.checked_sub(order) else {
        return f64::NAN;
    };

    let kron_m_0: u32 = if order == 0 { 1 } else { 0 };
    let diff_factorial = factorial(diff);
    let ratio = BigRational::new(
        BigInt::from(2 - kron_m_0) * &diff_factorial,
        factorial(degree + order),
    )
    .to_f64()
    .unwrap_or(0.0);

    ratio.sqrt() * double_factorial(degree, mode) / nearest_f64(&diff_factorial)
}

/// Scales `value` by `factor`; a zero result is always `+0.0`.
pub fn normalize(value: f64, factor: f64) -> f64 {
    let scaled = factor * value;
    if scaled == 0.0 {
        0.0
    } else {
        scaled
    }
}
