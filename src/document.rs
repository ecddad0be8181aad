use crate::error::{Error, Result};
use crate::fragment::Annotation;
use crate::registry::ModelRegistry;
use http::Method;
use serde_json::{Map, Value, json};

pub const OPENAPI_VERSION: &str = "3.1.0";

/// An OpenAPI document assembled from annotated routes.
#[derive(Debug)]
pub struct ApiDocument {
    title: String,
    version: String,
    description: Option<String>,
    paths: Map<String, Value>,
    registry: ModelRegistry,
}

impl ApiDocument {
    pub fn new<T: Into<String>, V: Into<String>>(title: T, version: V) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: None,
            paths: Map::new(),
            registry: ModelRegistry::new(),
        }
    }

    pub fn with_description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attaches `annotation` as the operation for `method path` and registers
    /// every component it refers to.
    ///
    /// Nothing is changed when registration fails.
    pub fn route(&mut self, method: Method, path: &str, annotation: &Annotation) -> Result<()> {
        let method_key = method.as_str().to_lowercase();
        let exists = self
            .paths
            .get(path)
            .and_then(|item| item.get(&method_key))
            .is_some();
        if exists {
            return Err(Error::DuplicateOperation {
                method,
                path: path.to_string(),
            });
        }

        // Dry run so a conflict leaves the document untouched.
        let mut staged = self.registry.clone();
        for component in annotation.components() {
            staged.register(component)?;
        }
        self.registry = staged;

        log::debug!(
            "Documented {} {} ({} fragments)",
            method,
            path,
            annotation.len()
        );
        let item = self
            .paths
            .entry(path.to_string())
            .or_insert_with(|| json!({}));
        if let Value::Object(item) = item {
            item.insert(method_key, annotation.to_operation());
        }
        Ok(())
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn to_value(&self) -> Value {
        let mut info = Map::new();
        info.insert("title".into(), json!(self.title));
        info.insert("version".into(), json!(self.version));
        if let Some(description) = &self.description {
            info.insert("description".into(), json!(description));
        }

        let mut doc = json!({
            "openapi": OPENAPI_VERSION,
            "info": info,
            "paths": self.paths,
        });
        if !self.registry.is_empty() {
            doc["components"] = self.registry.to_components();
        }
        doc
    }
}
