use crate::error::{Error, Result};
use crate::merger;
use crate::operator::OperationOptions;
use crate::registry::Component;
use http::StatusCode;
use serde_json::{Value, json};
use std::collections::HashMap;

pub const DEFAULT_BEARER_NAME: &str = "bearer";
pub const DEFAULT_COOKIE_NAME: &str = "cookie";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Operation,
    Security,
    Response(StatusCode),
    RequestBody,
    Custom,
}

/// One unit of documentation metadata: a partial OpenAPI operation object
/// plus the components it refers to.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    kind: FragmentKind,
    operation: Value,
    components: Vec<Component>,
}

impl Fragment {
    pub(crate) fn new(kind: FragmentKind, operation: Value, components: Vec<Component>) -> Self {
        Self {
            kind,
            operation,
            components,
        }
    }

    /// Arbitrary operation metadata, merged like any other fragment.
    pub fn custom(operation: Value) -> Self {
        Self::new(FragmentKind::Custom, operation, Vec::new())
    }

    /// Adds a component the custom metadata refers to.
    pub fn with_component(mut self, component: Component) -> Self {
        self.components.push(component);
        self
    }

    /// Operation summary, description, tags and the like.
    pub fn operation_info(options: &OperationOptions) -> Result<Self> {
        let operation = serde_json::to_value(options)?;
        Ok(Self::new(FragmentKind::Operation, operation, Vec::new()))
    }

    /// Bearer (JWT) authentication requirement.
    pub fn bearer_auth(name: Option<&str>) -> Self {
        let name = name.unwrap_or(DEFAULT_BEARER_NAME);
        let scheme = json!({ "type": "http", "scheme": "bearer", "bearerFormat": "JWT" });
        Self::security(name, scheme)
    }

    /// Cookie authentication requirement. The scheme name doubles as the
    /// cookie name.
    pub fn cookie_auth(name: Option<&str>) -> Self {
        let name = name.unwrap_or(DEFAULT_COOKIE_NAME);
        let scheme = json!({ "type": "apiKey", "in": "cookie", "name": name });
        Self::security(name, scheme)
    }

    fn security(name: &str, scheme: Value) -> Self {
        Self::new(
            FragmentKind::Security,
            json!({ "security": [{ name: [] }] }),
            vec![Component::SecurityScheme {
                name: name.to_string(),
                scheme,
            }],
        )
    }

    pub fn kind(&self) -> FragmentKind {
        self.kind
    }

    pub fn operation(&self) -> &Value {
        &self.operation
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }
}

/// The combined, finalized metadata of one endpoint.
///
/// Only [`crate::builder::ApiDecoratorBuilder::build`] produces one.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    fragments: Vec<Fragment>,
}

impl Annotation {
    pub(crate) fn new(fragments: Vec<Fragment>) -> Result<Self> {
        let annotation = Self { fragments };
        annotation.check_components()?;
        Ok(annotation)
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    pub fn kinds(&self) -> Vec<FragmentKind> {
        self.fragments.iter().map(Fragment::kind).collect()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// The OpenAPI operation object all fragments fold into.
    pub fn to_operation(&self) -> Value {
        merger::merge_operations(self.fragments.iter().map(Fragment::operation))
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.fragments.iter().flat_map(|f| f.components.iter())
    }

    // Catches a name reused for two different schemas before the annotation
    // ever reaches a document.
    fn check_components(&self) -> Result<()> {
        let mut seen: HashMap<&str, &Value> = HashMap::new();
        for component in self.components() {
            if let Component::Schema(model) = component {
                match seen.get(model.name.as_str()) {
                    Some(schema) if **schema != model.schema => {
                        return Err(Error::AmbiguousTypeName {
                            name: model.name.clone(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        seen.insert(&model.name, &model.schema);
                    }
                }
            }
        }
        Ok(())
    }
}
