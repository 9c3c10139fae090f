// src/filter/numeric.rs

use once_cell::sync::Lazy;
use regex::Regex;

use crate::record::Scalar;

/// Optional operator, then a non-negative decimal. No sign, no exponent.
static COMPARISON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(<=|>=|<|>|=)?\s*(\d+(?:\.\d*)?|\.\d+)\s*$")
        .expect("comparison pattern should compile")
});

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
}

impl Operator {
    fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "<" => Some(Operator::Lt),
            "<=" => Some(Operator::Le),
            ">" => Some(Operator::Gt),
            ">=" => Some(Operator::Ge),
            "=" | "" => Some(Operator::Eq),
            _ => None,
        }
    }
}

/// A parsed `<op><number>` constraint such as `>=120` or bare `12.5`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Comparison {
    pub op: Operator,
    pub threshold: f64,
}

impl Comparison {
    /// `None` when the input does not fit the pattern.
    pub fn parse(input: &str) -> Option<Self> {
        let caps = COMPARISON.captures(input)?;
        let op = Operator::from_symbol(caps.get(1).map_or("", |m| m.as_str()))?;
        let threshold = caps[2].parse::<f64>().ok()?;
        Some(Self { op, threshold })
    }

    /// NaN fails every operator.
    pub fn test(&self, value: f64) -> bool {
        match self.op {
            Operator::Lt => value < self.threshold,
            Operator::Le => value <= self.threshold,
            Operator::Gt => value > self.threshold,
            Operator::Ge => value >= self.threshold,
            Operator::Eq => value == self.threshold,
        }
    }

    /// Test a stored value; absent counts as NaN.
    pub fn test_stored(&self, stored: Option<&Scalar>) -> bool {
        self.test(stored.map_or(f64::NAN, Scalar::as_f64))
    }
}

/// Compare a stored value against a raw constraint string. Malformed input
/// and absent values never match.
pub fn matches(stored: Option<&Scalar>, constraint: &str) -> bool {
    Comparison::parse(constraint).is_some_and(|cmp| cmp.test_stored(stored))
}
