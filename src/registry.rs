use crate::error::{Error, Result};
use crate::schema::ModelSchema;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A component a fragment needs present in the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Schema(ModelSchema),
    SecurityScheme { name: String, scheme: Value },
}

/// Component registry of one documentation run.
///
/// Registering the same name with the same definition any number of times is
/// a no-op; a different definition under an existing name is an error.
#[derive(Default, Debug, Clone)]
pub struct ModelRegistry {
    /// components/schemas
    pub schemas: BTreeMap<String, Value>,
    /// components/securitySchemes
    pub security_schemes: BTreeMap<String, Value>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, component: &Component) -> Result<()> {
        match component {
            Component::Schema(model) => self.register_schema(model),
            Component::SecurityScheme { name, scheme } => {
                self.register_security_scheme(name, scheme)
            }
        }
    }

    pub fn register_schema(&mut self, model: &ModelSchema) -> Result<()> {
        match self.schemas.get(&model.name) {
            Some(existing) if *existing == model.schema => Ok(()),
            Some(_) => Err(Error::AmbiguousTypeName {
                name: model.name.clone(),
            }),
            None => {
                log::debug!("Registered schema component {}", model.name);
                self.schemas
                    .insert(model.name.clone(), model.schema.clone());
                Ok(())
            }
        }
    }

    pub fn register_security_scheme(&mut self, name: &str, scheme: &Value) -> Result<()> {
        match self.security_schemes.get(name) {
            Some(existing) if existing == scheme => Ok(()),
            Some(_) => Err(Error::AmbiguousSecurityScheme {
                name: name.to_string(),
            }),
            None => {
                log::debug!("Registered security scheme {}", name);
                self.security_schemes
                    .insert(name.to_string(), scheme.clone());
                Ok(())
            }
        }
    }

    pub fn contains_schema(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty() && self.security_schemes.is_empty()
    }

    /// The `components` object of the document.
    pub fn to_components(&self) -> Value {
        let mut components = Map::new();
        if !self.schemas.is_empty() {
            let schemas: Map<String, Value> = self
                .schemas
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            components.insert("schemas".into(), Value::Object(schemas));
        }
        if !self.security_schemes.is_empty() {
            let schemes: Map<String, Value> = self
                .security_schemes
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            components.insert("securitySchemes".into(), Value::Object(schemes));
        }
        Value::Object(components)
    }
}
