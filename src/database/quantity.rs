use std::{
    fmt::{self, Display},
    iter::Sum,
    ops::{Add, Mul, Sub},
    str::FromStr,
};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use super::error::TypeError;

/*
Quantities are exact fractions. User input is a list of whitespace separated
terms which are summed together:

    "1 1/2"   -> 3/2
    "1.5"     -> 3/2
    "2/3"     -> 2/3

Stored form is always "<numer>/<denom>", e.g. "4/1".
*/

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quantity(BigRational);

impl Quantity {
    pub fn zero() -> Self {
        Self(BigRational::zero())
    }

    pub fn from_integer(value: i64) -> Self {
        Self(BigRational::from_integer(BigInt::from(value)))
    }

    /// `None` when `denom` is zero.
    pub fn ratio(numer: i64, denom: i64) -> Option<Self> {
        if denom == 0 {
            return None;
        }
        Some(Self(BigRational::new(BigInt::from(numer), BigInt::from(denom))))
    }

    /// Parses an amount such as `"1 1/2"`, `"0.25"` or `"4/1"`. An empty or
    /// blank string is zero.
    pub fn parse(text: &str) -> Result<Self, TypeError> {
        text.split_whitespace()
            .map(parse_term)
            .sum::<Result<BigRational, TypeError>>()
            .map(Self)
    }

    /// Parses a cost, ignoring any dollar signs.
    pub fn parse_cost(text: &str) -> Result<Self, TypeError> {
        Self::parse(&text.replace('$', ""))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_positive()
    }

    /// Zero is never written anywhere; it becomes absence.
    pub fn normalized(self) -> Option<Self> {
        if self.is_zero() {
            None
        } else {
            Some(self)
        }
    }

    pub fn checked_div(&self, other: &Self) -> Option<Self> {
        if other.is_zero() {
            return None;
        }
        Some(Self(&self.0 / &other.0))
    }

    pub fn numer(&self) -> &BigInt {
        self.0.numer()
    }

    pub fn denom(&self) -> &BigInt {
        self.0.denom()
    }

    /// Exact textual form used for storage.
    pub fn as_fraction(&self) -> String {
        format!("{}/{}", self.0.numer(), self.0.denom())
    }

    /// Decimal rendering rounded half away from zero, e.g. `to_decimal(2)`
    /// gives `"12.00"`.
    pub fn to_decimal(&self, places: u32) -> String {
        let scale = num_traits::pow(BigInt::from(10), places as usize);
        let scaled = (&self.0 * BigRational::from_integer(scale.clone()))
            .round()
            .to_integer();

        let sign = if scaled.is_negative() { "-" } else { "" };
        let scaled = scaled.abs();
        let whole = &scaled / &scale;

        if places == 0 {
            return format!("{sign}{whole}");
        }

        let fraction = (&scaled % &scale).to_string();
        format!(
            "{sign}{whole}.{fraction:0>width$}",
            width = places as usize
        )
    }
}

fn parse_term(term: &str) -> Result<BigRational, TypeError> {
    match term.split_once('/') {
        Some((numer, denom)) => {
            let numer = parse_decimal(numer)?;
            let denom = parse_decimal(denom)?;
            if denom.is_zero() {
                return Err(TypeError::new("Invalid amount; zero denominator"));
            }
            Ok(numer / denom)
        }
        None => parse_decimal(term),
    }
}

fn parse_decimal(text: &str) -> Result<BigRational, TypeError> {
    let (whole, fraction) = text.split_once('.').unwrap_or((text, ""));
    let digits = format!("{whole}{fraction}");

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(TypeError::new("Invalid amount; expected a decimal or fraction"));
    }

    let numer = BigInt::from_str(&digits).map_err(|_| TypeError::new("Invalid amount"))?;
    let denom = num_traits::pow(BigInt::from(10), fraction.len());

    Ok(BigRational::new(numer, denom))
}

impl FromStr for Quantity {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for Quantity {
    // 3/2 -> "1 1/2", 4 -> "4", 1/5 -> "1/5", 0 -> ""
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_zero() {
            return Ok(());
        }

        let sign = if self.0.is_negative() { "-" } else { "" };
        let value = self.0.abs();
        let whole = value.to_integer();
        let remainder = value.fract();

        match (whole.is_zero(), remainder.is_zero()) {
            (false, true) => write!(f, "{sign}{whole}"),
            (true, _) => write!(f, "{sign}{}/{}", remainder.numer(), remainder.denom()),
            (false, false) => write!(
                f,
                "{sign}{whole} {}/{}",
                remainder.numer(),
                remainder.denom()
            ),
        }
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl<'a> Add<&'a Quantity> for &'a Quantity {
    type Output = Quantity;

    fn add(self, rhs: Self) -> Self::Output {
        Quantity(&self.0 + &rhs.0)
    }
}

impl Sub for Quantity {
    type Output = Quantity;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl<'a> Sub<&'a Quantity> for &'a Quantity {
    type Output = Quantity;

    fn sub(self, rhs: Self) -> Self::Output {
        Quantity(&self.0 - &rhs.0)
    }
}

impl Mul for Quantity {
    type Output = Quantity;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl<'a> Mul<&'a Quantity> for &'a Quantity {
    type Output = Quantity;

    fn mul(self, rhs: Self) -> Self::Output {
        Quantity(&self.0 * &rhs.0)
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::zero(), |acc, q| acc + q)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_fraction())
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(de::Error::custom)
    }
}

/// Renders an optional amount the way pages show it; absence renders empty.
pub fn formatted_amount(amount: Option<&Quantity>) -> String {
    amount.map(|a| a.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(text: &str) -> Quantity {
        Quantity::parse(text).unwrap()
    }

    #[test]
    fn parses_mixed_numbers_as_a_sum() {
        assert_eq!(q("1 1/2"), Quantity::ratio(3, 2).unwrap());
        assert_eq!(q("1.5"), Quantity::ratio(3, 2).unwrap());
        assert_eq!(q("  2/3  "), Quantity::ratio(2, 3).unwrap());
        assert_eq!(q("4/1"), Quantity::from_integer(4));
        assert_eq!(q(".25"), Quantity::ratio(1, 4).unwrap());
        assert!(q("").is_zero());
    }

    #[test]
    fn rejects_malformed_terms() {
        assert!(Quantity::parse("abc").is_err());
        assert!(Quantity::parse("1/0").is_err());
        assert!(Quantity::parse("1/2/3").is_err());
        assert!(Quantity::parse("/").is_err());
        assert!(Quantity::parse("1..2").is_err());
        assert!(Quantity::parse("-1").is_err());
    }

    #[test]
    fn costs_ignore_dollar_signs() {
        assert_eq!(Quantity::parse_cost("$5.50").unwrap(), Quantity::ratio(11, 2).unwrap());
        assert_eq!(Quantity::parse_cost("3").unwrap(), Quantity::from_integer(3));
    }

    #[test]
    fn formats_whole_and_remainder() {
        assert_eq!(Quantity::ratio(3, 2).unwrap().to_string(), "1 1/2");
        assert_eq!(Quantity::ratio(1, 5).unwrap().to_string(), "1/5");
        assert_eq!(Quantity::from_integer(4).to_string(), "4");
        assert_eq!(Quantity::zero().to_string(), "");
        assert_eq!(Quantity::ratio(-3, 2).unwrap().to_string(), "-1 1/2");
    }

    #[test]
    fn formatting_round_trips_numerically() {
        for text in ["1 1/2", "0.125", "7/3", "10", "2 2/4", "1.5 1/3", "100.01"] {
            let value = q(text);
            assert_eq!(q(&value.to_string()), value, "{text}");
        }
    }

    #[test]
    fn subtraction_to_zero_normalizes_to_absent() {
        let pantry = q("1/5");
        let used = q("0.2");
        assert_eq!((pantry - used).normalized(), None);
        assert_eq!(q("0").normalized(), None);
        assert_eq!(q("1").normalized(), Some(Quantity::from_integer(1)));
    }

    #[test]
    fn decimal_rendering_rounds() {
        assert_eq!(Quantity::from_integer(12).to_decimal(2), "12.00");
        assert_eq!(q("1.005").to_decimal(2), "1.01");
        assert_eq!(q("15.994").to_decimal(2), "15.99");
        assert_eq!(q("1/3").to_decimal(2), "0.33");
    }

    #[test]
    fn serializes_as_exact_fraction() {
        let value = Quantity::ratio(3, 2).unwrap();
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, "\"3/2\"");
        let back: Quantity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn division_by_zero_is_refused() {
        assert_eq!(Quantity::from_integer(3).checked_div(&Quantity::zero()), None);
        assert_eq!(
            Quantity::from_integer(3).checked_div(&Quantity::from_integer(2)),
            Quantity::ratio(3, 2)
        );
    }
}
