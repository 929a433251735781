//! Typed variable values for rendering.
//!
//! A [`PromptContext`] maps registry variables to string values. A variable
//! with no entry is UNSET, which is distinct from being set to `""`.

use super::error::TemplateError;
use super::registry::Variable;
use crate::error::{PromptError, Result};
use std::collections::BTreeMap;
use std::path::Path;

/// Values for the closed set of template variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptContext {
    values: BTreeMap<Variable, String>,
}

impl PromptContext {
    /// Create a context with every variable UNSET.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from `(name, value)` pairs.
    ///
    /// A `None` value leaves the variable UNSET. Unknown names are reported
    /// together in one [`TemplateError::UnknownVariables`]; values rejected by
    /// a variable's kind are reported together in one
    /// [`TemplateError::InvalidContextValues`].
    pub fn from_pairs<I, K, V>(pairs: I) -> std::result::Result<Self, TemplateError>
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut ctx = Self::new();
        let mut unknown = Vec::new();
        let mut invalid = Vec::new();

        for (name, value) in pairs {
            let name = name.as_ref();
            let Some(var) = Variable::from_name(name) else {
                unknown.push(name.to_string());
                continue;
            };
            let Some(value) = value else {
                ctx.values.remove(&var);
                continue;
            };
            let value = value.into();
            match var.kind().check(&value) {
                Ok(()) => {
                    ctx.values.insert(var, value);
                }
                Err(reason) => invalid.push(format!("{}: {}", name, reason)),
            }
        }

        if !unknown.is_empty() {
            unknown.sort();
            unknown.dedup();
            return Err(TemplateError::UnknownVariables { names: unknown });
        }
        if !invalid.is_empty() {
            return Err(TemplateError::InvalidContextValues { issues: invalid });
        }
        Ok(ctx)
    }

    /// Set a variable, checking the value against the variable's kind.
    pub fn set(
        &mut self,
        var: Variable,
        value: impl Into<String>,
    ) -> std::result::Result<(), TemplateError> {
        let value = value.into();
        var.kind()
            .check(&value)
            .map_err(|reason| TemplateError::InvalidContextValues {
                issues: vec![format!("{}: {}", var.name(), reason)],
            })?;
        self.values.insert(var, value);
        Ok(())
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(
        mut self,
        var: Variable,
        value: impl Into<String>,
    ) -> std::result::Result<Self, TemplateError> {
        self.set(var, value)?;
        Ok(self)
    }

    /// Mark a variable UNSET, returning its previous value.
    pub fn unset(&mut self, var: Variable) -> Option<String> {
        self.values.remove(&var)
    }

    /// The value of a variable, or `None` when UNSET.
    pub fn get(&self, var: Variable) -> Option<&str> {
        self.values.get(&var).map(String::as_str)
    }

    /// The value of a variable looked up by dotted name.
    ///
    /// Unknown names behave like UNSET variables.
    pub fn get_by_name(&self, name: &str) -> Option<&str> {
        Variable::from_name(name).and_then(|var| self.get(var))
    }

    /// Whether a variable has a value (possibly empty).
    pub fn is_set(&self, var: Variable) -> bool {
        self.values.contains_key(&var)
    }

    /// Iterate over the variables that have values, in registry order.
    pub fn defined(&self) -> impl Iterator<Item = (Variable, &str)> {
        self.values.iter().map(|(var, value)| (*var, value.as_str()))
    }

    /// Number of variables with values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether every variable is UNSET.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Load a context from a YAML file.
    ///
    /// See [`from_yaml`](Self::from_yaml) for the format.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PromptError::UserError(format!(
                "failed to read context file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse a context from YAML.
    ///
    /// The document is a flat mapping from dotted variable names to scalars.
    /// Numbers and booleans are stored in their canonical text form; `null`
    /// leaves the variable UNSET.
    ///
    /// ```text
    /// topic.entity: kale
    /// research.runId: run-42
    /// seo.wordCountMin: 1500
    /// standards.disclaimer: null
    /// ```
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::new());
        }

        let raw: BTreeMap<String, serde_yaml::Value> = serde_yaml::from_str(yaml)
            .map_err(|e| PromptError::UserError(format!("failed to parse context YAML: {}", e)))?;

        let mut pairs = Vec::with_capacity(raw.len());
        let mut not_scalar = Vec::new();
        for (name, value) in raw {
            let value = match value {
                serde_yaml::Value::Null => None,
                serde_yaml::Value::String(s) => Some(s),
                serde_yaml::Value::Number(n) => Some(n.to_string()),
                serde_yaml::Value::Bool(b) => Some(b.to_string()),
                _ => {
                    not_scalar.push(format!("{}: value must be a scalar", name));
                    continue;
                }
            };
            pairs.push((name, value));
        }

        let ctx = Self::from_pairs(pairs)?;
        if !not_scalar.is_empty() {
            return Err(TemplateError::InvalidContextValues { issues: not_scalar }.into());
        }
        Ok(ctx)
    }
}
