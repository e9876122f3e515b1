//! Pitch intervals: a bounded ratio shifted by whole octaves.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::rational::Rational;
use crate::ValueError;

pub const MIN_OCTAVE: i32 = -9;
pub const MAX_OCTAVE: i32 = 9;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawInterval", into = "RawInterval")]
pub struct Interval {
    ratio: Rational,
    octave: i32,
}

impl Interval {
    pub fn new(numerator: i32, denominator: i32, octave: i32) -> Result<Self, ValueError> {
        Self::from_parts(Rational::new(numerator, denominator)?, octave)
    }

    pub fn from_parts(ratio: Rational, octave: i32) -> Result<Self, ValueError> {
        if !(MIN_OCTAVE..=MAX_OCTAVE).contains(&octave) {
            return Err(ValueError::OctaveOutOfRange(octave));
        }
        Ok(Self { ratio, octave })
    }

    pub fn numerator(self) -> i32 {
        self.ratio.numerator()
    }

    pub fn denominator(self) -> i32 {
        self.ratio.denominator()
    }

    pub fn octave(self) -> i32 {
        self.octave
    }

    pub fn rational(self) -> Rational {
        self.ratio
    }

    pub fn ratio(self) -> f64 {
        self.ratio.ratio() * 2.0_f64.powi(self.octave)
    }

    pub fn is_default(&self) -> bool {
        self.ratio.is_default() && self.octave == 0
    }
}

/// `3/2`, `3/2o1`, `o-1`; the default interval renders as `1`.
impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.octave == 0 {
            write!(f, "{}", self.ratio)
        } else if self.ratio.is_default() {
            write!(f, "o{}", self.octave)
        } else {
            write!(f, "{}o{}", self.ratio, self.octave)
        }
    }
}

impl FromStr for Interval {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let (ratio_text, octave) = match text.split_once('o') {
            Some((ratio_text, octave_text)) => {
                let octave = octave_text
                    .trim()
                    .parse::<i32>()
                    .map_err(|_| ValueError::Parse(s.to_string()))?;
                (ratio_text.trim(), octave)
            }
            None => (text, 0),
        };
        let ratio = if ratio_text.is_empty() {
            Rational::ONE
        } else {
            ratio_text.parse()?
        };
        Interval::from_parts(ratio, octave)
    }
}

fn one() -> i32 {
    1
}

fn is_one(value: &i32) -> bool {
    *value == 1
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawInterval {
    #[serde(default = "one", skip_serializing_if = "is_one")]
    numerator: i32,
    #[serde(default = "one", skip_serializing_if = "is_one")]
    denominator: i32,
    #[serde(default, skip_serializing_if = "is_zero")]
    octave: i32,
}

impl TryFrom<RawInterval> for Interval {
    type Error = ValueError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Interval::new(raw.numerator, raw.denominator, raw.octave)
    }
}

impl From<Interval> for RawInterval {
    fn from(interval: Interval) -> Self {
        RawInterval {
            numerator: interval.numerator(),
            denominator: interval.denominator(),
            octave: interval.octave,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_includes_octave() {
        let fifth_up = Interval::new(3, 2, 1).unwrap();
        assert!((fifth_up.ratio() - 3.0).abs() < 1e-12);
        let down = Interval::new(1, 1, -2).unwrap();
        assert!((down.ratio() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn octave_bounds() {
        assert_eq!(Interval::new(1, 1, 10), Err(ValueError::OctaveOutOfRange(10)));
        assert!(Interval::new(1, 1, -9).is_ok());
    }

    #[test]
    fn text_forms() {
        let i = Interval::new(3, 2, 1).unwrap();
        assert_eq!(i.to_string(), "3/2o1");
        assert_eq!("3/2o1".parse::<Interval>().unwrap(), i);
        assert_eq!("o-1".parse::<Interval>().unwrap(), Interval::new(1, 1, -1).unwrap());
        assert_eq!(Interval::default().to_string(), "1");
        assert!("3/2o".parse::<Interval>().is_err());
    }

    #[test]
    fn serde_omits_defaults() {
        assert_eq!(serde_json::to_string(&Interval::default()).unwrap(), "{}");
        let i = Interval::new(5, 4, -1).unwrap();
        let json = serde_json::to_string(&i).unwrap();
        assert_eq!(json, r#"{"numerator":5,"denominator":4,"octave":-1}"#);
        assert_eq!(serde_json::from_str::<Interval>(&json).unwrap(), i);
    }
}
