//! Exact fractional multipliers for beats, velocity and tempo.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValueError;

pub const MIN_NUMERATOR: i32 = 1;
pub const MAX_NUMERATOR: i32 = 199;
pub const MIN_DENOMINATOR: i32 = 1;
pub const MAX_DENOMINATOR: i32 = 199;

/// A bounded positive fraction. Both parts stay within `1..=199`; the only
/// way to build one is through [`Rational::new`], so an out-of-range value
/// never reaches the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRational", into = "RawRational")]
pub struct Rational {
    numerator: i32,
    denominator: i32,
}

impl Rational {
    pub const ONE: Rational = Rational {
        numerator: 1,
        denominator: 1,
    };

    pub fn new(numerator: i32, denominator: i32) -> Result<Self, ValueError> {
        if !(MIN_NUMERATOR..=MAX_NUMERATOR).contains(&numerator) {
            return Err(ValueError::NumeratorOutOfRange(numerator));
        }
        if !(MIN_DENOMINATOR..=MAX_DENOMINATOR).contains(&denominator) {
            return Err(ValueError::DenominatorOutOfRange(denominator));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Build a rational, clamping each part into range.
    pub fn clamped(numerator: i32, denominator: i32) -> Self {
        Self {
            numerator: numerator.clamp(MIN_NUMERATOR, MAX_NUMERATOR),
            denominator: denominator.clamp(MIN_DENOMINATOR, MAX_DENOMINATOR),
        }
    }

    pub fn numerator(self) -> i32 {
        self.numerator
    }

    pub fn denominator(self) -> i32 {
        self.denominator
    }

    pub fn ratio(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    pub fn is_default(&self) -> bool {
        *self == Self::ONE
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denominator == 1 {
            write!(f, "{}", self.numerator)
        } else {
            write!(f, "{}/{}", self.numerator, self.denominator)
        }
    }
}

/// Accepts `n`, `n/d` and `/d` (numerator 1).
impl FromStr for Rational {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let parse_part = |part: &str, default: i32| -> Result<i32, ValueError> {
            let part = part.trim();
            if part.is_empty() {
                Ok(default)
            } else {
                part.parse().map_err(|_| ValueError::Parse(s.to_string()))
            }
        };
        match text.split_once('/') {
            Some((numerator, denominator)) => {
                if denominator.trim().is_empty() {
                    return Err(ValueError::Parse(s.to_string()));
                }
                Rational::new(parse_part(numerator, 1)?, parse_part(denominator, 1)?)
            }
            None => {
                if text.is_empty() {
                    return Err(ValueError::Parse(s.to_string()));
                }
                Rational::new(parse_part(text, 1)?, 1)
            }
        }
    }
}

fn one() -> i32 {
    1
}

fn is_one(value: &i32) -> bool {
    *value == 1
}

/// On-disk shape: each part is omitted when it is 1.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawRational {
    #[serde(default = "one", skip_serializing_if = "is_one")]
    numerator: i32,
    #[serde(default = "one", skip_serializing_if = "is_one")]
    denominator: i32,
}

impl TryFrom<RawRational> for Rational {
    type Error = ValueError;

    fn try_from(raw: RawRational) -> Result<Self, Self::Error> {
        Rational::new(raw.numerator, raw.denominator)
    }
}

impl From<Rational> for RawRational {
    fn from(rational: Rational) -> Self {
        RawRational {
            numerator: rational.numerator,
            denominator: rational.denominator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_one() {
        let r = Rational::default();
        assert!(r.is_default());
        assert_eq!(r.ratio(), 1.0);
    }

    #[test]
    fn rejects_out_of_range_parts() {
        assert_eq!(Rational::new(0, 1), Err(ValueError::NumeratorOutOfRange(0)));
        assert_eq!(Rational::new(200, 1), Err(ValueError::NumeratorOutOfRange(200)));
        assert_eq!(Rational::new(1, 0), Err(ValueError::DenominatorOutOfRange(0)));
        assert!(Rational::new(199, 199).is_ok());
    }

    #[test]
    fn clamped_stays_in_bounds() {
        let r = Rational::clamped(500, -3);
        assert_eq!(r.numerator(), MAX_NUMERATOR);
        assert_eq!(r.denominator(), MIN_DENOMINATOR);
    }

    #[test]
    fn display_and_parse() {
        let r = Rational::new(3, 2).unwrap();
        assert_eq!(r.to_string(), "3/2");
        assert_eq!("3/2".parse::<Rational>().unwrap(), r);
        assert_eq!("5".parse::<Rational>().unwrap(), Rational::new(5, 1).unwrap());
        assert_eq!("/4".parse::<Rational>().unwrap(), Rational::new(1, 4).unwrap());
        assert!("3/".parse::<Rational>().is_err());
        assert!("abc".parse::<Rational>().is_err());
        assert!("0".parse::<Rational>().is_err());
    }

    #[test]
    fn serializes_only_non_default_parts() {
        assert_eq!(serde_json::to_string(&Rational::ONE).unwrap(), "{}");
        let r = Rational::new(3, 1).unwrap();
        assert_eq!(serde_json::to_string(&r).unwrap(), r#"{"numerator":3}"#);
        let back: Rational = serde_json::from_str(r#"{"numerator":3}"#).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Rational>(r#"{"denominator":200}"#).is_err());
        assert!(serde_json::from_str::<Rational>(r#"{"bogus":2}"#).is_err());
    }
}
