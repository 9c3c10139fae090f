// src/filter/mod.rs

use anyhow::{anyhow, Context, Result};
use std::collections::BTreeMap;

use crate::record::{Collection, Field, FieldKind, Record, Scalar};
use crate::render::dropdown::{NullPolicy, NA_LABEL};

pub mod numeric;

pub use numeric::{Comparison, Operator};

/// The current user-entered value for each field. Empty means "match any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintSet {
    values: BTreeMap<Field, String>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) -> &mut Self {
        self.values.insert(field, value.into());
        self
    }

    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn clear(&mut self, field: Field) {
        self.values.remove(&field);
    }

    pub fn get(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Constraints that actually restrict something.
    pub fn active(&self) -> impl Iterator<Item = (Field, &str)> {
        self.values
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(f, v)| (*f, v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }

    /// Parse a `FIELD=VALUE` assignment. The value may itself contain `=`,
    /// as in `Total_fsi==12` (field `Total_fsi`, value `=12`).
    pub fn parse_assignment(input: &str) -> Result<(Field, String)> {
        let (name, value) = input
            .split_once('=')
            .ok_or_else(|| anyhow!("expected FIELD=VALUE, got {:?}", input))?;
        let field = name
            .parse::<Field>()
            .with_context(|| format!("in filter {:?}", input))?;
        Ok((field, value.to_string()))
    }
}

impl FromIterator<(Field, String)> for ConstraintSet {
    fn from_iter<I: IntoIterator<Item = (Field, String)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// One active constraint, prepared for repeated evaluation.
#[derive(Debug, Clone, PartialEq)]
enum Predicate {
    Contains { field: Field, needle: String },
    Equals {
        field: Field,
        wanted: String,
        na_selects_null: bool,
    },
    Compare { field: Field, cmp: Option<Comparison> },
}

impl Predicate {
    fn compile(field: Field, raw: &str, nulls: NullPolicy) -> Self {
        match field.kind() {
            FieldKind::FreeText => Predicate::Contains {
                field,
                needle: raw.to_lowercase(),
            },
            FieldKind::ExactChoice => Predicate::Equals {
                field,
                wanted: raw.to_string(),
                na_selects_null: nulls == NullPolicy::Placeholder,
            },
            FieldKind::Numeric => Predicate::Compare {
                field,
                cmp: Comparison::parse(raw),
            },
        }
    }

    fn test(&self, record: &Record) -> bool {
        match self {
            Predicate::Contains { field, needle } => record
                .field(*field)
                .and_then(Scalar::as_text)
                .is_some_and(|text| text.to_lowercase().contains(needle.as_str())),
            Predicate::Equals {
                field,
                wanted,
                na_selects_null,
            } => match record.field(*field) {
                Some(Scalar::Null) => *na_selects_null && wanted == NA_LABEL,
                Some(value) => value.as_text().is_some_and(|text| text == wanted.as_str()),
                None => false,
            },
            Predicate::Compare { field, cmp } => {
                cmp.is_some_and(|cmp| cmp.test_stored(record.field(*field)))
            }
        }
    }
}

/// A constraint set compiled once, for filtering many records.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    pub fn new(constraints: &ConstraintSet) -> Self {
        Self::with_null_policy(constraints, NullPolicy::default())
    }

    /// Under `NullPolicy::Exclude` there is no `N/A` option, so `N/A` is
    /// compared as plain text and never selects nulls.
    pub fn with_null_policy(constraints: &ConstraintSet, nulls: NullPolicy) -> Self {
        Self {
            predicates: constraints
                .active()
                .map(|(field, raw)| Predicate::compile(field, raw, nulls))
                .collect(),
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.predicates.iter().all(|p| p.test(record))
    }

    pub fn apply<'a>(&self, collection: &'a Collection) -> Vec<&'a Record> {
        collection.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Whether `record` satisfies every non-empty constraint.
pub fn evaluate(record: &Record, constraints: &ConstraintSet) -> bool {
    Filter::new(constraints).matches(record)
}

/// The records satisfying `constraints`, in collection order.
pub fn filter_collection<'a>(
    collection: &'a Collection,
    constraints: &ConstraintSet,
) -> Vec<&'a Record> {
    Filter::new(constraints).apply(collection)
}
