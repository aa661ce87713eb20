//! Exact amount arithmetic.
//!
//! [`Mutez`] is the base unit for every stored or computed amount. Reward
//! splitting chains exact [`Fraction`]s and only truncates when an amount is
//! finalized with [`Fraction::floor_of`], so no rounding error accumulates
//! across chained multiplications.
//!
//! ```text
//! payment = floor(amount * numerator / denominator)
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

use crate::{AmountError, Result, MUTEZ_FACTOR};

/// Decimal places carried by a [`Percentage`].
pub const PERCENT_DECIMALS: u32 = 4;

/// Scaled value of 100% (100 with [`PERCENT_DECIMALS`] decimal places).
pub const FULL_PERCENT: u32 = 1_000_000;

/// Decimal places carried by a [`Tez`] amount.
const TEZ_DECIMALS: u32 = 6;

/// An amount in mutez, the smallest indivisible currency unit.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Mutez(u128);

impl Mutez {
    /// Zero mutez.
    pub const ZERO: Mutez = Mutez(0);

    /// Wrap a raw mutez count.
    pub const fn new(mutez: u128) -> Self {
        Self(mutez)
    }

    /// Convert whole tez into mutez.
    pub fn from_tez(tez: u64) -> Self {
        Self(u128::from(tez) * MUTEZ_FACTOR)
    }

    /// Raw mutez count.
    pub const fn as_u128(self) -> u128 {
        self.0
    }

    /// Whether the amount is zero.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked addition.
    ///
    /// # Errors
    ///
    /// - [`AmountError::Overflow`] if the sum does not fit
    pub fn checked_add(self, other: Mutez) -> Result<Mutez> {
        self.0
            .checked_add(other.0)
            .map(Mutez)
            .ok_or(AmountError::Overflow)
    }

    /// Checked subtraction.
    ///
    /// # Errors
    ///
    /// - [`AmountError::Underflow`] if `other` exceeds `self`
    pub fn checked_sub(self, other: Mutez) -> Result<Mutez> {
        self.0
            .checked_sub(other.0)
            .map(Mutez)
            .ok_or(AmountError::Underflow {
                minuend: self.0,
                subtrahend: other.0,
            })
    }

    /// Subtraction floored at zero.
    pub fn saturating_sub(self, other: Mutez) -> Mutez {
        Mutez(self.0.saturating_sub(other.0))
    }

    /// Sum a sequence of amounts.
    ///
    /// # Errors
    ///
    /// - [`AmountError::Overflow`] if the total does not fit
    pub fn checked_sum<I>(amounts: I) -> Result<Mutez>
    where
        I: IntoIterator<Item = Mutez>,
    {
        amounts
            .into_iter()
            .try_fold(Mutez::ZERO, |acc, amount| acc.checked_add(amount))
    }
}

impl fmt::Display for Mutez {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Mutez {
    fn from(mutez: u64) -> Self {
        Self(u128::from(mutez))
    }
}

/// A tez amount as written in configuration, e.g. `"0.5"`.
///
/// Parsed exactly to six decimal places and converted with [`Tez::to_mutez`].
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, SerializeDisplay, DeserializeFromStr,
)]
pub struct Tez(Mutez);

impl Tez {
    /// Wrap an amount already expressed in mutez.
    pub const fn from_mutez(mutez: Mutez) -> Self {
        Self(mutez)
    }

    /// The amount in mutez.
    pub const fn to_mutez(self) -> Mutez {
        self.0
    }
}

impl FromStr for Tez {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self> {
        parse_scaled(s, TEZ_DECIMALS)
            .map(|mutez| Tez(Mutez(mutez)))
            .ok_or_else(|| AmountError::InvalidAmount(s.to_string()))
    }
}

impl fmt::Display for Tez {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_scaled(self.0.as_u128(), TEZ_DECIMALS))
    }
}

/// A percentage between 0 and 100 with four decimal places, e.g. `"7.5"`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, SerializeDisplay, DeserializeFromStr,
)]
pub struct Percentage(u32);

impl Percentage {
    /// 0%.
    pub const ZERO: Percentage = Percentage(0);

    /// 100%.
    pub const HUNDRED: Percentage = Percentage(FULL_PERCENT);

    /// Build from a whole percent value.
    ///
    /// # Errors
    ///
    /// - [`AmountError::InvalidPercentage`] if `percent` exceeds 100
    pub fn from_percent(percent: u32) -> Result<Self> {
        percent
            .checked_mul(FULL_PERCENT / 100)
            .ok_or_else(|| AmountError::InvalidPercentage(percent.to_string()))
            .and_then(Self::from_scaled)
    }

    /// Build from a value scaled so that [`FULL_PERCENT`] is 100%.
    ///
    /// # Errors
    ///
    /// - [`AmountError::InvalidPercentage`] if `scaled` exceeds [`FULL_PERCENT`]
    pub fn from_scaled(scaled: u32) -> Result<Self> {
        if scaled > FULL_PERCENT {
            return Err(AmountError::InvalidPercentage(format_scaled(
                u128::from(scaled),
                PERCENT_DECIMALS,
            )));
        }
        Ok(Self(scaled))
    }

    /// The scaled value (100% = [`FULL_PERCENT`]).
    pub const fn scaled(self) -> u32 {
        self.0
    }

    /// `100% - self`.
    pub const fn complement(self) -> Percentage {
        Percentage(FULL_PERCENT - self.0)
    }

    /// The percentage as an exact fraction of one (`value / 100`).
    pub fn as_fraction(self) -> Fraction {
        Fraction::reduced(u128::from(self.0), u128::from(FULL_PERCENT))
    }
}

impl FromStr for Percentage {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self> {
        let scaled = parse_scaled(s, PERCENT_DECIMALS)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| AmountError::InvalidPercentage(s.to_string()))?;
        Self::from_scaled(scaled)
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_scaled(u128::from(self.0), PERCENT_DECIMALS))
    }
}

/// An exact non-negative rational number, always kept in lowest terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fraction {
    numerator: u128,
    denominator: u128,
}

impl Fraction {
    /// The fraction 1/1.
    pub const ONE: Fraction = Fraction {
        numerator: 1,
        denominator: 1,
    };

    /// Build `numerator / denominator`.
    ///
    /// # Errors
    ///
    /// - [`AmountError::DivisionByZero`] if `denominator` is zero
    pub fn new(numerator: u128, denominator: u128) -> Result<Self> {
        if denominator == 0 {
            return Err(AmountError::DivisionByZero);
        }
        Ok(Self::reduced(numerator, denominator))
    }

    /// The share `part / whole` of two amounts.
    ///
    /// # Errors
    ///
    /// - [`AmountError::DivisionByZero`] if `whole` is zero
    pub fn ratio(part: Mutez, whole: Mutez) -> Result<Self> {
        Self::new(part.as_u128(), whole.as_u128())
    }

    // Callers guarantee a non-zero denominator.
    fn reduced(numerator: u128, denominator: u128) -> Self {
        let g = gcd(numerator, denominator);
        Self {
            numerator: numerator / g,
            denominator: denominator / g,
        }
    }

    /// Numerator in lowest terms.
    pub const fn numerator(self) -> u128 {
        self.numerator
    }

    /// Denominator in lowest terms.
    pub const fn denominator(self) -> u128 {
        self.denominator
    }

    /// Exact product of two fractions.
    ///
    /// # Errors
    ///
    /// - [`AmountError::Overflow`] if the reduced product does not fit
    pub fn checked_mul(self, other: Fraction) -> Result<Fraction> {
        let g1 = gcd(self.numerator, other.denominator);
        let g2 = gcd(other.numerator, self.denominator);
        let numerator = (self.numerator / g1)
            .checked_mul(other.numerator / g2)
            .ok_or(AmountError::Overflow)?;
        let denominator = (self.denominator / g2)
            .checked_mul(other.denominator / g1)
            .ok_or(AmountError::Overflow)?;
        Ok(Self::reduced(numerator, denominator))
    }

    /// `floor(amount * self)`, truncating toward zero.
    ///
    /// # Errors
    ///
    /// - [`AmountError::Overflow`] if the intermediate product does not fit
    pub fn floor_of(self, amount: Mutez) -> Result<Mutez> {
        let g = gcd(amount.as_u128(), self.denominator);
        let scaled = (amount.as_u128() / g)
            .checked_mul(self.numerator)
            .ok_or(AmountError::Overflow)?;
        Ok(Mutez(scaled / (self.denominator / g)))
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a.max(1)
}

fn parse_scaled(input: &str, decimals: u32) -> Option<u128> {
    let s = input.trim();
    let (whole, frac) = s.split_once('.').unwrap_or((s, ""));
    if whole.is_empty() && frac.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let frac_len = u32::try_from(frac.len()).ok()?;
    if frac_len > decimals {
        return None;
    }
    let whole_value: u128 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let frac_value: u128 = if frac.is_empty() {
        0
    } else {
        frac.parse::<u128>().ok()? * 10u128.pow(decimals - frac_len)
    };
    whole_value
        .checked_mul(10u128.pow(decimals))?
        .checked_add(frac_value)
}

fn format_scaled(value: u128, decimals: u32) -> String {
    let scale = 10u128.pow(decimals);
    let (whole, frac) = (value / scale, value % scale);
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0width$}", frac, width = decimals as usize);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
