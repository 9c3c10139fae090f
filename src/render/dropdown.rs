// src/render/dropdown.rs

use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashSet},
    str::FromStr,
};

use crate::load::{JurisdictionLayout, LookupTables};
use crate::record::{Collection, Field, Scalar};

/// Label of the leading "match any" option.
pub const ALL_LABEL: &str = "All";
/// Placeholder shown for null values.
pub const NA_LABEL: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownOption {
    pub value: String,
    pub label: String,
}

impl DropdownOption {
    /// The sentinel: empty value, label `All`.
    pub fn any() -> Self {
        Self {
            value: String::new(),
            label: ALL_LABEL.to_string(),
        }
    }

    pub fn is_any(&self) -> bool {
        self.value.is_empty()
    }
}

/// What to do with null candidate values. The filter follows the same
/// policy: `N/A` selects nulls only under `Placeholder`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullPolicy {
    #[default]
    Placeholder,
    Exclude,
}

impl FromStr for NullPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "placeholder" | "na" => Ok(NullPolicy::Placeholder),
            "exclude" => Ok(NullPolicy::Exclude),
            other => Err(anyhow::anyhow!("unknown null policy {:?}", other)),
        }
    }
}

/// Where dropdown candidates come from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionStrategy {
    /// The lookup tables, independent of what loaded.
    #[default]
    Lookup,
    /// Distinct values of the column in the loaded collection.
    Derived,
}

impl FromStr for OptionStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lookup" => Ok(OptionStrategy::Lookup),
            "derived" => Ok(OptionStrategy::Derived),
            other => Err(anyhow::anyhow!("unknown option strategy {:?}", other)),
        }
    }
}

/// Option lists keyed by field, in field order.
pub type Dropdowns = BTreeMap<Field, Vec<DropdownOption>>;

/// Sentinel first, then one option per distinct value in input order.
///
/// Empty strings are skipped since their option would be indistinguishable
/// from the sentinel.
pub fn build_dropdown_options<'a, I>(values: I, policy: NullPolicy) -> Vec<DropdownOption>
where
    I: IntoIterator<Item = &'a Scalar>,
{
    let mut options = vec![DropdownOption::any()];
    let mut seen = HashSet::new();

    for value in values {
        let text = match value.as_text() {
            Some(text) => text.into_owned(),
            None if policy == NullPolicy::Placeholder => NA_LABEL.to_string(),
            None => continue,
        };
        if text.is_empty() || !seen.insert(text.clone()) {
            continue;
        }
        options.push(DropdownOption {
            value: text.clone(),
            label: text,
        });
    }
    options
}

/// Option lists for every exact-choice field.
pub fn dropdowns(
    collection: &Collection,
    lookups: &LookupTables,
    strategy: OptionStrategy,
    layout: JurisdictionLayout,
    policy: NullPolicy,
) -> Dropdowns {
    Field::exact_choice()
        .map(|field| {
            let options = match strategy {
                OptionStrategy::Lookup => {
                    let values = lookups.values_for(field, layout).unwrap_or_default();
                    build_dropdown_options(&values, policy)
                }
                OptionStrategy::Derived => {
                    build_dropdown_options(collection.iter().filter_map(|r| r.field(field)), policy)
                }
            };
            (field, options)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use serde_json::json;

    #[test]
    fn test_sentinel_always_first() {
        let none: Vec<Scalar> = Vec::new();
        let options = build_dropdown_options(&none, NullPolicy::Placeholder);
        assert_eq!(options, vec![DropdownOption::any()]);
        assert!(options[0].is_any());
        assert_eq!(options[0].label, "All");

        let values = vec![Scalar::from("B"), Scalar::from("A")];
        let options = build_dropdown_options(&values, NullPolicy::Exclude);
        assert_eq!(options[0], DropdownOption::any());
        assert_eq!(options.len(), 3);
    }

    #[test]
    fn test_distinct_in_input_order() {
        let values = vec![
            Scalar::from("2022-23"),
            Scalar::from("2021-22"),
            Scalar::from("2022-23"),
            Scalar::Number(2020.0),
            Scalar::from("2020"),
            Scalar::from(""),
        ];
        let labels: Vec<String> = build_dropdown_options(&values, NullPolicy::Placeholder)
            .into_iter()
            .map(|o| o.label)
            .collect();
        assert_eq!(labels, vec!["All", "2022-23", "2021-22", "2020"]);
    }

    #[test]
    fn test_null_policy() {
        let values = vec![Scalar::Null, Scalar::from("Yes"), Scalar::Null];
        let placeholder = build_dropdown_options(&values, NullPolicy::Placeholder);
        assert_eq!(placeholder.len(), 3);
        assert_eq!(placeholder[1].label, NA_LABEL);
        assert_eq!(placeholder[1].value, NA_LABEL);

        let excluded = build_dropdown_options(&values, NullPolicy::Exclude);
        assert_eq!(excluded.len(), 2);
        assert_eq!(excluded[1].label, "Yes");
    }

    #[test]
    fn test_strategies() {
        let collection: Collection = vec![
            Record::new().with("Pro", "Residential").with("Range", "R2"),
            Record::new().with("Pro", "Commercial"),
            Record::new().with("Pro", "Residential"),
        ]
        .into();
        let lookups = LookupTables {
            unique_values: json!({"Pro": ["Commercial", "Mixed"]})
                .as_object()
                .cloned()
                .unwrap(),
            jurisdictions: json!({"Range": ["R1", "R2"]})
                .as_object()
                .cloned()
                .unwrap(),
        };
        let labels = |d: &Dropdowns, f: Field| -> Vec<String> {
            d[&f].iter().map(|o| o.label.clone()).collect()
        };

        let from_lookup = dropdowns(
            &collection,
            &lookups,
            OptionStrategy::Lookup,
            JurisdictionLayout::FieldLists,
            NullPolicy::Placeholder,
        );
        assert_eq!(from_lookup.len(), 9);
        assert_eq!(labels(&from_lookup, Field::Pro), vec!["All", "Commercial", "Mixed"]);
        assert_eq!(labels(&from_lookup, Field::Range), vec!["All", "R1", "R2"]);
        assert_eq!(labels(&from_lookup, Field::Fy), vec!["All"]);

        let derived = dropdowns(
            &collection,
            &lookups,
            OptionStrategy::Derived,
            JurisdictionLayout::FieldLists,
            NullPolicy::Placeholder,
        );
        assert_eq!(
            labels(&derived, Field::Pro),
            vec!["All", "Residential", "Commercial"]
        );
        assert_eq!(labels(&derived, Field::Range), vec!["All", "R2"]);
    }

    #[test]
    fn test_policy_and_strategy_from_str() {
        assert_eq!("exclude".parse::<NullPolicy>().unwrap(), NullPolicy::Exclude);
        assert_eq!("Derived".parse::<OptionStrategy>().unwrap(), OptionStrategy::Derived);
        assert!("sometimes".parse::<NullPolicy>().is_err());
    }
}
