// src/load/lookups.rs

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use tracing::{debug, info, instrument, warn};

use crate::fetch::Source;
use crate::record::{Field, Scalar};

pub const UNIQUE_VALUES_FILE: &str = "unique_values.json";
pub const JURISDICTION_FILE: &str = "jur_dict.json";

/// Names of the two lookup resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupFiles {
    pub unique_values: String,
    pub jurisdictions: String,
}

impl Default for LookupFiles {
    fn default() -> Self {
        Self {
            unique_values: UNIQUE_VALUES_FILE.to_string(),
            jurisdictions: JURISDICTION_FILE.to_string(),
        }
    }
}

/// Shape of the jurisdiction lookup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JurisdictionLayout {
    /// `{"Commissionerate": [...], "Division": [...], "Range": [...]}`
    #[default]
    FieldLists,
    /// `{"<commissionerate>": {"<division>": ["<range>", ...]}}`
    KeysAsValues,
}

impl FromStr for JurisdictionLayout {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "lists" | "field_lists" => Ok(JurisdictionLayout::FieldLists),
            "keys" | "keys_as_values" => Ok(JurisdictionLayout::KeysAsValues),
            other => Err(anyhow::anyhow!("unknown jurisdiction layout {:?}", other)),
        }
    }
}

/// Both lookup tables; either may be empty when its resource failed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupTables {
    pub unique_values: Map<String, Value>,
    pub jurisdictions: Map<String, Value>,
}

impl LookupTables {
    /// Candidate dropdown values for `field`, in lookup order.
    ///
    /// `None` when the relevant table has no entry for the field. Nested
    /// entries inside a value list are dropped.
    pub fn values_for(&self, field: Field, layout: JurisdictionLayout) -> Option<Vec<Scalar>> {
        if !field.is_jurisdiction() {
            return self.unique_values.get(field.key()).and_then(scalar_list);
        }
        match layout {
            JurisdictionLayout::FieldLists => {
                self.jurisdictions.get(field.key()).and_then(scalar_list)
            }
            JurisdictionLayout::KeysAsValues => self.nested_values(field),
        }
    }

    fn nested_values(&self, field: Field) -> Option<Vec<Scalar>> {
        if self.jurisdictions.is_empty() {
            return None;
        }
        let values = match field {
            Field::Commissionerate => self
                .jurisdictions
                .keys()
                .map(|k| Scalar::Text(k.clone()))
                .collect(),
            Field::Division => self
                .jurisdictions
                .values()
                .filter_map(Value::as_object)
                .flat_map(|divisions| divisions.keys())
                .map(|k| Scalar::Text(k.clone()))
                .collect(),
            Field::Range => self
                .jurisdictions
                .values()
                .filter_map(Value::as_object)
                .flat_map(|divisions| divisions.values())
                .flat_map(|ranges| match ranges {
                    Value::Array(_) => scalar_list(ranges).unwrap_or_default(),
                    Value::Object(m) => m.keys().map(|k| Scalar::Text(k.clone())).collect(),
                    other => Scalar::from_json(other).into_iter().collect(),
                })
                .collect(),
            _ => return None,
        };
        Some(values)
    }
}

fn scalar_list(value: &Value) -> Option<Vec<Scalar>> {
    let items = value.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| {
                let scalar = Scalar::from_json(item);
                if scalar.is_none() {
                    debug!(?item, "dropping nested lookup entry");
                }
                scalar
            })
            .collect(),
    )
}

fn parse_table(name: &str, body: Result<String>) -> Map<String, Value> {
    let parsed = body.and_then(|text| {
        serde_json::from_str::<Map<String, Value>>(&text)
            .with_context(|| format!("{} is not a JSON object", name))
    });
    match parsed {
        Ok(map) => {
            debug!(lookup = name, keys = map.len(), "lookup parsed");
            map
        }
        Err(e) => {
            let reason = format!("{:#}", e);
            warn!(lookup = name, error = %reason, "lookup unavailable, using empty table");
            Map::new()
        }
    }
}

/// Fetch both lookup tables concurrently; a failure on either yields an
/// empty table rather than an error.
#[instrument(level = "info", skip(source))]
pub async fn load_lookups<S: Source>(source: &S, files: &LookupFiles) -> LookupTables {
    let (unique, jur) = tokio::join!(
        source.fetch(&files.unique_values),
        source.fetch(&files.jurisdictions)
    );
    let tables = LookupTables {
        unique_values: parse_table(&files.unique_values, unique),
        jurisdictions: parse_table(&files.jurisdictions, jur),
    };
    info!(
        unique_values = tables.unique_values.len(),
        jurisdictions = tables.jurisdictions.len(),
        "lookups loaded"
    );
    tables
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::tests::{init_test_logging, FakeSource};
    use serde_json::json;

    fn texts(values: Option<Vec<Scalar>>) -> Vec<String> {
        values
            .unwrap_or_default()
            .iter()
            .map(Scalar::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_missing_lookup_is_empty() {
        init_test_logging();
        let mut source = FakeSource::default();
        source.put(UNIQUE_VALUES_FILE, r#"{"FY": ["2020-21", "2021-22"]}"#);
        source.fail(JURISDICTION_FILE, 500);

        let tables = load_lookups(&source, &LookupFiles::default()).await;

        assert_eq!(tables.unique_values.len(), 1);
        assert!(tables.jurisdictions.is_empty());
        assert_eq!(
            texts(tables.values_for(Field::Fy, JurisdictionLayout::FieldLists)),
            vec!["2020-21", "2021-22"]
        );
        assert!(tables
            .values_for(Field::Division, JurisdictionLayout::FieldLists)
            .is_none());
    }

    #[tokio::test]
    async fn test_non_object_lookup_is_empty() {
        let mut source = FakeSource::default();
        source.put(UNIQUE_VALUES_FILE, r#"["Pro", "Pex"]"#);
        source.put(JURISDICTION_FILE, r#"{"Range": ["R1"]}"#);

        let tables = load_lookups(&source, &LookupFiles::default()).await;

        assert!(tables.unique_values.is_empty());
        assert_eq!(
            texts(tables.values_for(Field::Range, JurisdictionLayout::FieldLists)),
            vec!["R1"]
        );
    }

    #[test]
    fn test_field_lists_keep_nulls_and_drop_nested() {
        let tables = LookupTables {
            unique_values: json!({"Pex": ["Yes", null, ["bad"], 3]})
                .as_object()
                .cloned()
                .unwrap(),
            jurisdictions: Map::new(),
        };
        let values = tables
            .values_for(Field::Pex, JurisdictionLayout::FieldLists)
            .unwrap();
        assert_eq!(
            values,
            vec![Scalar::from("Yes"), Scalar::Null, Scalar::Number(3.0)]
        );
    }

    #[test]
    fn test_keys_as_values_layout() {
        let tables = LookupTables {
            unique_values: Map::new(),
            jurisdictions: json!({
                "Mumbai East": {"Division I": ["Range A", "Range B"], "Division II": ["Range C"]},
                "Pune": {"Division I": ["Range A"]}
            })
            .as_object()
            .cloned()
            .unwrap(),
        };
        let layout = JurisdictionLayout::KeysAsValues;
        assert_eq!(
            texts(tables.values_for(Field::Commissionerate, layout)),
            vec!["Mumbai East", "Pune"]
        );
        assert_eq!(
            texts(tables.values_for(Field::Division, layout)),
            vec!["Division I", "Division II", "Division I"]
        );
        assert_eq!(
            texts(tables.values_for(Field::Range, layout)),
            vec!["Range A", "Range B", "Range C", "Range A"]
        );
    }

    #[test]
    fn test_layout_from_str() {
        assert_eq!(
            "keys".parse::<JurisdictionLayout>().unwrap(),
            JurisdictionLayout::KeysAsValues
        );
        assert_eq!(
            "Field_Lists".parse::<JurisdictionLayout>().unwrap(),
            JurisdictionLayout::FieldLists
        );
        assert!("nested".parse::<JurisdictionLayout>().is_err());
    }
}
