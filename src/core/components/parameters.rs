//! Per-operation named configuration, separate from simulation state.
//!
//! A parameter's type is fixed by the runtime type of its declared default and
//! never changes afterwards. Parameters survive `init()`; only state is reset.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Runtime type of a parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterKind {
    Number,
    Text,
}

impl std::fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterKind::Number => write!(f, "number"),
            ParameterKind::Text => write!(f, "string"),
        }
    }
}

/// A parameter value: either a number or a string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Number(f64),
    Text(String),
}

impl ParameterValue {
    pub fn kind(&self) -> ParameterKind {
        match self {
            ParameterValue::Number(_) => ParameterKind::Number,
            ParameterValue::Text(_) => ParameterKind::Text,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParameterValue::Number(value) => Some(*value),
            ParameterValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParameterValue::Text(value) => Some(value),
            ParameterValue::Number(_) => None,
        }
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Number(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::Text(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::Text(value)
    }
}

/// Declaration of one parameter inside an operation spec
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub display_name: String,
    pub description: String,
    pub default_value: ParameterValue,
}

impl ParameterSpec {
    pub fn new(
        display_name: impl Into<String>,
        description: impl Into<String>,
        default_value: impl Into<ParameterValue>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            description: description.into(),
            default_value: default_value.into(),
        }
    }
}

/// Read-only metadata about a declared parameter, for UI consumption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescription {
    pub key: String,
    pub display_name: String,
    pub description: String,
    pub kind: ParameterKind,
}

/// Why a parameter write was refused
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ParameterWriteError {
    Undeclared,
    Mismatch {
        expected: ParameterKind,
        found: ParameterKind,
    },
}

/// Live parameter values of one operation, in declaration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    values: IndexMap<String, ParameterValue>,
}

impl Parameters {
    /// Seed the store with every declared default
    pub(crate) fn from_specs(specs: &IndexMap<String, ParameterSpec>) -> Self {
        Self {
            values: specs
                .iter()
                .map(|(key, spec)| (key.clone(), spec.default_value.clone()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParameterValue> {
        self.values.get(key)
    }

    /// Numeric parameter, `None` if undeclared or a string
    pub fn number(&self, key: &str) -> Option<f64> {
        self.values.get(key).and_then(ParameterValue::as_number)
    }

    /// String parameter, `None` if undeclared or a number
    pub fn text(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(ParameterValue::as_text)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overwrite a declared value, keeping its original type
    pub(crate) fn set(
        &mut self,
        key: &str,
        value: ParameterValue,
    ) -> Result<(), ParameterWriteError> {
        let slot = self
            .values
            .get_mut(key)
            .ok_or(ParameterWriteError::Undeclared)?;

        if slot.kind() != value.kind() {
            return Err(ParameterWriteError::Mismatch {
                expected: slot.kind(),
                found: value.kind(),
            });
        }

        *slot = value;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declared() -> IndexMap<String, ParameterSpec> {
        let mut specs = IndexMap::new();
        specs.insert("gain".to_string(), ParameterSpec::new("Gain", "Multiplier", 2.0));
        specs.insert("label".to_string(), ParameterSpec::new("Label", "Display label", "x"));
        specs
    }

    #[test]
    fn defaults_seed_the_store_in_order() {
        let params = Parameters::from_specs(&declared());
        assert_eq!(params.number("gain"), Some(2.0));
        assert_eq!(params.text("label"), Some("x"));
        assert_eq!(params.keys().collect::<Vec<_>>(), vec!["gain", "label"]);
    }

    #[test]
    fn type_is_fixed_by_default_value() {
        let mut params = Parameters::from_specs(&declared());

        assert!(params.set("gain", 3.5.into()).is_ok());
        assert_eq!(params.number("gain"), Some(3.5));

        assert_eq!(
            params.set("gain", "big".into()),
            Err(ParameterWriteError::Mismatch {
                expected: ParameterKind::Number,
                found: ParameterKind::Text,
            })
        );
        assert_eq!(params.set("missing", 1.0.into()), Err(ParameterWriteError::Undeclared));
        assert_eq!(params.number("gain"), Some(3.5));
    }
}
