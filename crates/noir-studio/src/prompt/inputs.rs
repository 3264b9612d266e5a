use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::StudioError;
use crate::schema::Feature;

/// Free-text values keyed by input name.
///
/// Values are stored exactly as given. A value that is empty or only
/// whitespace counts as not provided.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Inputs(BTreeMap<String, String>);

impl Inputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// The provided value, untrimmed, or `None` if absent or blank.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Check every required input of `feature` is provided.
    ///
    /// Reports the first missing one in declared order.
    pub fn validate(&self, feature: Feature) -> Result<(), StudioError> {
        match feature
            .inputs()
            .iter()
            .find(|spec| spec.required && self.get(spec.name).is_none())
        {
            Some(spec) => Err(StudioError::Validation {
                feature,
                field: spec.name,
            }),
            None => Ok(()),
        }
    }

    /// Parse a `name=value` pair as given on the command line.
    pub fn parse_pair(s: &str) -> Result<(String, String), String> {
        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| format!("expected name=value, got '{s}'"))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(format!("missing input name in '{s}'"));
        }
        Ok((name.to_string(), value.to_string()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Inputs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_count_as_missing() {
        let inputs = Inputs::new().with("name", "   ").with("concept", "\n");
        assert_eq!(inputs.get("name"), None);
        assert_eq!(inputs.get("concept"), None);
        assert_eq!(inputs.get("absent"), None);
    }

    #[test]
    fn values_kept_verbatim() {
        let inputs = Inputs::new().with("name", "  Rei  ");
        assert_eq!(inputs.get("name"), Some("  Rei  "));
    }

    #[test]
    fn validate_reports_first_missing_required() {
        let inputs = Inputs::new().with("mood", "bleak");
        let err = inputs.validate(Feature::ArtPrompt).unwrap_err();
        assert!(matches!(
            err,
            StudioError::Validation {
                feature: Feature::ArtPrompt,
                field: "transformation"
            }
        ));
    }

    #[test]
    fn validate_ignores_optional_inputs() {
        let inputs = Inputs::new()
            .with("premise", "a chase")
            .with("location", "the docks");
        assert!(inputs.validate(Feature::Scene).is_ok());
    }

    #[test]
    fn parse_pair_splits_on_first_equals() {
        let (k, v) = Inputs::parse_pair("concept=a=b").unwrap();
        assert_eq!(k, "concept");
        assert_eq!(v, "a=b");
        assert!(Inputs::parse_pair("novalue").is_err());
        assert!(Inputs::parse_pair("=x").is_err());
    }

    #[test]
    fn deserializes_from_plain_object() {
        let inputs: Inputs = serde_json::from_str(r#"{"theme":"slang"}"#).unwrap();
        assert_eq!(inputs.get("theme"), Some("slang"));
    }
}
