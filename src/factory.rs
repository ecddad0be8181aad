//! Construction of response and request fragments.
//!
//! Every function here is pure: it synthesizes whatever named types the shape
//! needs and returns a [`Fragment`] carrying them as components. Nothing is
//! registered until the fragment is applied to a document.

use crate::error::{Error, Result};
use crate::fragment::{Fragment, FragmentKind};
use crate::naming::{REQUEST_SUFFIX, RESPONSE_SUFFIX, STATUS_RESPONSE_SUFFIX, derive_type_name};
use crate::registry::Component;
use crate::schema::{
    FieldOptions, Payload, SchemaFieldSpec, SynthesizedType, TypeRef, synthesize_single_field_type,
};
use http::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::sync::OnceLock;

/// Field carrying the payload when only a status key is configured.
pub const DEFAULT_WRAPPER_KEY: &str = "data";

const JSON_CONTENT: &str = "application/json";
const MULTIPART_CONTENT: &str = "multipart/form-data";

/// Controls which envelope fields are synthesized around a payload.
/// With neither key set the payload is documented as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResponseEnvelopeConfig {
    pub status_key: Option<String>,
    pub wrapper_key: Option<String>,
}

impl ResponseEnvelopeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_key<S: Into<String>>(mut self, key: S) -> Self {
        self.status_key = Some(key.into());
        self
    }

    pub fn wrapper_key<S: Into<String>>(mut self, key: S) -> Self {
        self.wrapper_key = Some(key.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.status_key.is_none() && self.wrapper_key.is_none()
    }

    /// `self` wins where set, `defaults` fill the gaps.
    pub fn merged_over(&self, defaults: &ResponseEnvelopeConfig) -> Self {
        Self {
            status_key: self
                .status_key
                .clone()
                .or_else(|| defaults.status_key.clone()),
            wrapper_key: self
                .wrapper_key
                .clone()
                .or_else(|| defaults.wrapper_key.clone()),
        }
    }
}

/// Per-call options of a status or body response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseOptions {
    pub envelope: ResponseEnvelopeConfig,
    /// Response description. Defaults to the status's reason phrase.
    pub description: Option<String>,
    /// Property options of the payload field inside an envelope.
    pub field: FieldOptions,
}

impl ResponseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_key<S: Into<String>>(mut self, key: S) -> Self {
        self.envelope.status_key = Some(key.into());
        self
    }

    pub fn wrapper_key<S: Into<String>>(mut self, key: S) -> Self {
        self.envelope.wrapper_key = Some(key.into());
        self
    }

    pub fn description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn field(mut self, field: FieldOptions) -> Self {
        self.field = field;
        self
    }

    fn response_description(&self, status: StatusCode) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| reason(status).to_string())
    }
}

impl From<ResponseEnvelopeConfig> for ResponseOptions {
    fn from(envelope: ResponseEnvelopeConfig) -> Self {
        Self {
            envelope,
            ..Self::default()
        }
    }
}

/// One named example of an error response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorExample {
    pub name: String,
    pub error: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl ErrorExample {
    pub fn new<N: Into<String>, E: Into<String>>(name: N, error: E) -> Self {
        Self {
            name: name.into(),
            error: error.into(),
            description: None,
        }
    }

    pub fn description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Every status code with a canonical reason phrase, as integers.
pub fn known_status_codes() -> &'static [Value] {
    static KNOWN: OnceLock<Vec<Value>> = OnceLock::new();
    KNOWN.get_or_init(|| {
        (100..=599u16)
            .filter_map(|code| StatusCode::from_u16(code).ok())
            .filter(|status| status.canonical_reason().is_some())
            .map(|status| json!(status.as_u16()))
            .collect()
    })
}

/// A response with no body, or with a single status field when
/// `status_key` is configured (`<Key>StatusResponseDto`).
pub fn status_only(status: StatusCode, key: &str, options: &ResponseOptions) -> Result<Fragment> {
    ensure_non_error(status, "a status response")?;
    let description = options.response_description(status);

    let Some(status_key) = &options.envelope.status_key else {
        return Ok(response_fragment(
            status,
            json!({ "description": description }),
            Vec::new(),
        ));
    };

    let spec = status_field(status_key, status);
    let ty = synthesize_single_field_type(key, STATUS_RESPONSE_SUFFIX, spec)?;
    Ok(response_fragment(
        status,
        json_response(&description, ty.schema_ref()),
        components_of(&ty),
    ))
}

/// A response carrying `payload`, enveloped as configured.
///
/// With no envelope keys the payload schema is used directly and no type is
/// synthesized. Otherwise `<Key>ResponseDto` holds a status field iff
/// `status_key` is set and the payload under `wrapper_key`, or under
/// [`DEFAULT_WRAPPER_KEY`] when only the status key is set.
pub fn detail_body(
    status: StatusCode,
    key: &str,
    payload: Payload,
    options: &ResponseOptions,
) -> Result<Fragment> {
    ensure_non_error(status, "a body response")?;
    let description = options.response_description(status);
    let (element, is_array) = payload.into_parts();
    let envelope = &options.envelope;

    if envelope.is_empty() {
        let item = element.schema();
        let schema = if is_array {
            json!({ "type": "array", "items": item })
        } else {
            item
        };
        let components = element
            .model_schema()
            .cloned()
            .map(Component::Schema)
            .into_iter()
            .collect();
        return Ok(response_fragment(
            status,
            json_response(&description, schema),
            components,
        ));
    }

    let data_key = envelope
        .wrapper_key
        .as_deref()
        .unwrap_or(DEFAULT_WRAPPER_KEY);
    if envelope.status_key.as_deref() == Some(data_key) {
        return Err(Error::InvalidKey {
            key: data_key.to_string(),
            reason: "status and wrapper fields must have different names",
        });
    }

    let mut ty = SynthesizedType::new(derive_type_name(key, RESPONSE_SUFFIX)?);
    if let Some(status_key) = &envelope.status_key {
        ty = ty.field(status_field(status_key, status));
    }
    ty = ty.field(
        SchemaFieldSpec::new(data_key, element)
            .array(is_array)
            .with_options(&options.field),
    );
    log::debug!(
        "Synthesized envelope {} ({} fields)",
        ty.name(),
        ty.fields().len()
    );

    Ok(response_fragment(
        status,
        json_response(&description, ty.schema_ref()),
        components_of(&ty),
    ))
}

/// An error response whose body is documented by named examples, one per
/// entry of `errors`, in order.
pub fn exception_set(status: StatusCode, errors: &[ErrorExample]) -> Result<Fragment> {
    if !(status.is_client_error() || status.is_server_error()) {
        return Err(Error::UnexpectedStatus {
            status,
            context: "an exception response",
        });
    }

    let mut examples = Map::new();
    for ErrorExample {
        name,
        error,
        description,
    } in errors
    {
        if examples.contains_key(name) {
            return Err(Error::DuplicateExampleName {
                status,
                name: name.clone(),
            });
        }
        let mut value = json!({ "status": status.as_u16(), "error": error });
        if let Some(description) = description {
            value["description"] = json!(description);
        }
        examples.insert(name.clone(), json!({ "value": value }));
    }

    let mut response = json!({ "description": reason(status) });
    if !examples.is_empty() {
        response["content"] = json!({ JSON_CONTENT: { "examples": examples } });
    }
    Ok(response_fragment(status, response, Vec::new()))
}

/// A multipart request body with one binary field `file_field_name`,
/// documented as `<Key>RequestDto`.
pub fn file_upload_request(
    key: &str,
    file_field_name: &str,
    options: &FieldOptions,
) -> Result<Fragment> {
    if file_field_name.is_empty() {
        return Err(Error::InvalidKey {
            key: file_field_name.to_string(),
            reason: "file field name must not be empty",
        });
    }

    let spec = SchemaFieldSpec::new(file_field_name, TypeRef::string())
        .format("binary")
        .with_options(options);
    let ty = synthesize_single_field_type(key, REQUEST_SUFFIX, spec)?;

    let operation = json!({
        "requestBody": {
            "required": true,
            "content": {
                MULTIPART_CONTENT: { "schema": ty.schema_ref() }
            }
        }
    });
    Ok(Fragment::new(
        FragmentKind::RequestBody,
        operation,
        components_of(&ty),
    ))
}

fn status_field(status_key: &str, status: StatusCode) -> SchemaFieldSpec {
    SchemaFieldSpec::new(status_key, TypeRef::integer())
        .enum_values(known_status_codes().to_vec())
        .example(status.as_u16())
}

fn ensure_non_error(status: StatusCode, context: &'static str) -> Result<()> {
    if status.is_client_error() || status.is_server_error() {
        return Err(Error::UnexpectedStatus { status, context });
    }
    Ok(())
}

fn reason(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("")
}

fn json_response(description: &str, schema: Value) -> Value {
    json!({
        "description": description,
        "content": {
            JSON_CONTENT: { "schema": schema }
        }
    })
}

fn response_fragment(status: StatusCode, response: Value, components: Vec<Component>) -> Fragment {
    Fragment::new(
        FragmentKind::Response(status),
        json!({ "responses": { status.as_str(): response } }),
        components,
    )
}

fn components_of(ty: &SynthesizedType) -> Vec<Component> {
    ty.models().into_iter().map(Component::Schema).collect()
}
