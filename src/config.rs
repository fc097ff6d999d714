//! Constraint configuration.
//!
//! Constraint selection is declared in the model settings as a bare name, a
//! `{name, ...params}` table, or a list of such tables:
//!
//! ```ignore
//! let spec: ConstraintSpec = serde_json::from_str(r#"
//!     [{"name": "max_capacity_expansion", "forecast": 10}, {"name": "demand"}]
//! "#)?;
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tensor::Interpolation;

/// Default number of years between the current and the forecast year.
pub const DEFAULT_FORECAST: u32 = 5;

/// Default constraint when nothing is configured.
pub const DEFAULT_CONSTRAINT: &str = "max_capacity_expansion";

/// Parameters shared by the constraint generators. Unset fields take defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConstraintParams {
    /// Years between the current year and the forecast year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forecast: Option<u32>,
    /// Interpolation along the year axis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpolation: Option<Interpolation>,
    /// Current year; defaults to the market's earliest year.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
}

impl ConstraintParams {
    pub fn forecast(&self) -> u32 {
        self.forecast.unwrap_or(DEFAULT_FORECAST)
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interpolation.unwrap_or_default()
    }

    pub fn with_forecast(mut self, forecast: u32) -> Self {
        self.forecast = Some(forecast);
        self
    }

    pub fn with_year(mut self, year: i64) -> Self {
        self.year = Some(year);
        self
    }

    /// Fields set on `overrides` replace those on `self`.
    pub fn overridden_by(&self, overrides: &ConstraintParams) -> ConstraintParams {
        ConstraintParams {
            forecast: overrides.forecast.or(self.forecast),
            interpolation: overrides.interpolation.or(self.interpolation),
            year: overrides.year.or(self.year),
        }
    }
}

/// One configured constraint: a generator name and its stored parameters.
///
/// Written as a flat table; keys other than `name` and the parameter fields
/// are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EntryFields", into = "EntryFields")]
pub struct ConstraintEntry {
    pub name: String,
    pub params: ConstraintParams,
}

/// Wire form of [`ConstraintEntry`]. `deny_unknown_fields` does not combine
/// with `flatten`, so the parameter fields are inlined here.
#[derive(Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntryFields {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    forecast: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    interpolation: Option<Interpolation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    year: Option<i64>,
}

impl From<EntryFields> for ConstraintEntry {
    fn from(fields: EntryFields) -> Self {
        ConstraintEntry {
            name: fields.name,
            params: ConstraintParams {
                forecast: fields.forecast,
                interpolation: fields.interpolation,
                year: fields.year,
            },
        }
    }
}

impl From<ConstraintEntry> for EntryFields {
    fn from(entry: ConstraintEntry) -> Self {
        EntryFields {
            name: entry.name,
            forecast: entry.params.forecast,
            interpolation: entry.params.interpolation,
            year: entry.params.year,
        }
    }
}

impl ConstraintEntry {
    pub fn new(name: impl Into<String>) -> Self {
        ConstraintEntry {
            name: name.into(),
            params: ConstraintParams::default(),
        }
    }

    pub fn with_params(mut self, params: ConstraintParams) -> Self {
        self.params = params;
        self
    }
}

/// Constraint selection as written in settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConstraintSpec {
    Name(String),
    Entry(ConstraintEntry),
    List(Vec<ConstraintEntry>),
}

impl Default for ConstraintSpec {
    fn default() -> Self {
        ConstraintSpec::Name(DEFAULT_CONSTRAINT.to_string())
    }
}

impl ConstraintSpec {
    /// Parse from JSON.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Configured entries, in declaration order.
    pub fn entries(&self) -> Vec<ConstraintEntry> {
        match self {
            ConstraintSpec::Name(name) => vec![ConstraintEntry::new(name.clone())],
            ConstraintSpec::Entry(entry) => vec![entry.clone()],
            ConstraintSpec::List(entries) => entries.clone(),
        }
    }
}

impl From<&str> for ConstraintSpec {
    fn from(name: &str) -> Self {
        ConstraintSpec::Name(name.to_string())
    }
}

impl From<ConstraintEntry> for ConstraintSpec {
    fn from(entry: ConstraintEntry) -> Self {
        ConstraintSpec::Entry(entry)
    }
}

impl From<Vec<ConstraintEntry>> for ConstraintSpec {
    fn from(entries: Vec<ConstraintEntry>) -> Self {
        ConstraintSpec::List(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_name() {
        let spec = ConstraintSpec::from_json(r#""demand""#).unwrap();
        assert_eq!(spec.entries(), vec![ConstraintEntry::new("demand")]);
    }

    #[test]
    fn test_parse_entry_with_params() {
        let spec = ConstraintSpec::from_json(
            r#"{"name": "max_capacity_expansion", "forecast": 10, "interpolation": "nearest"}"#,
        )
        .unwrap();
        let entries = spec.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].params.forecast(), 10);
        assert_eq!(entries[0].params.interpolation(), Interpolation::Nearest);
    }

    #[test]
    fn test_parse_list() {
        let spec = ConstraintSpec::from_json(
            r#"[{"name": "max_capacity_expansion"}, {"name": "demand", "forecast": 3}]"#,
        )
        .unwrap();
        let names: Vec<_> = spec.entries().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["max_capacity_expansion", "demand"]);
    }

    #[test]
    fn test_default_spec() {
        assert_eq!(
            ConstraintSpec::default().entries(),
            vec![ConstraintEntry::new(DEFAULT_CONSTRAINT)]
        );
    }

    #[test]
    fn test_invalid_config() {
        assert!(ConstraintSpec::from_json("42").is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(
            ConstraintSpec::from_json(r#"{"name":"max_capacity_expansion","forcast":10}"#).is_err()
        );
        assert!(ConstraintSpec::from_json(
            r#"[{"name": "demand"}, {"name": "max_production", "year": 2020, "extra": 1}]"#
        )
        .is_err());
    }

    #[test]
    fn test_entry_serializes_flat() {
        let entry = ConstraintEntry::new("demand")
            .with_params(ConstraintParams::default().with_forecast(3));
        let text = serde_json::to_string(&entry).unwrap();
        assert_eq!(text, r#"{"name":"demand","forecast":3}"#);
        let spec = ConstraintSpec::from_json(&text).unwrap();
        assert_eq!(spec.entries(), vec![entry]);
    }

    #[test]
    fn test_override_precedence() {
        let stored = ConstraintParams::default().with_forecast(10).with_year(2020);
        let shared = ConstraintParams::default().with_forecast(3);
        let merged = stored.overridden_by(&shared);
        assert_eq!(merged.forecast(), 3);
        assert_eq!(merged.year, Some(2020));
        assert_eq!(merged.interpolation(), Interpolation::Linear);
    }
}
