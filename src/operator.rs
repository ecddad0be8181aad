use crate::error::{Error, Result};
use crate::fragment::Annotation;
use crate::naming::capitalize;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Operation-level metadata. `summary` is the one required field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationOptions {
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
}

impl OperationOptions {
    pub fn new<S: Into<String>>(summary: S) -> Self {
        Self {
            summary: summary.into(),
            ..Self::default()
        }
    }

    pub fn description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn operation_id<S: Into<String>>(mut self, id: S) -> Self {
        self.operation_id = Some(id.into());
        self
    }

    pub fn tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }
}

type OperationFn = Box<dyn Fn(OperationOptions) -> Result<Annotation> + Send + Sync>;

/// Per-endpoint documentation table of one controller.
///
/// Entries are keyed by the capitalized endpoint method name, so an entry
/// registered as `createUser` is invoked as `CreateUser`. Since an
/// [`Annotation`] only comes out of a builder's `build`, every entry ends in
/// exactly one finalized builder.
#[derive(Default)]
pub struct OperationTable {
    name: String,
    entries: BTreeMap<String, OperationFn>,
}

impl OperationTable {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds an entry for `method`. Re-registering a method replaces it.
    pub fn entry<F>(mut self, method: &str, f: F) -> Result<Self>
    where
        F: Fn(OperationOptions) -> Result<Annotation> + Send + Sync + 'static,
    {
        let key = capitalize(method).ok_or_else(|| Error::InvalidKey {
            key: method.to_string(),
            reason: "operation name must not be empty",
        })?;
        if self.entries.insert(key.clone(), Box::new(f)).is_some() {
            log::warn!("{}: operation {} registered twice", self.name, key);
        }
        Ok(self)
    }

    pub fn contains(&self, operation: &str) -> bool {
        self.entries.contains_key(operation)
    }

    pub fn operations(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Runs the entry `operation` with `options`.
    pub fn invoke(&self, operation: &str, options: OperationOptions) -> Result<Annotation> {
        let f = self
            .entries
            .get(operation)
            .ok_or_else(|| Error::UnknownOperation(format!("{}.{}", self.name, operation)))?;

        if options.summary.trim().is_empty() {
            return Err(Error::MissingRequiredOption {
                operation: format!("{}.{}", self.name, operation),
                option: "summary",
            });
        }

        f(options)
    }
}
