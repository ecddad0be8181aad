use crate::error::Result;
use crate::naming::derive_type_name;
use serde_json::{Map, Value, json};

/// Types that can describe themselves as an OpenAPI component schema.
///
/// Implement this for the request/response models an endpoint refers to.
/// The model is registered under [`ApiModel::schema_name`] whenever a
/// fragment referencing it is applied to a document.
pub trait ApiModel {
    /// Component name, e.g. `"UserDto"`.
    fn schema_name() -> &'static str;

    /// JSON Schema of the model.
    fn schema() -> Value;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    String,
    Integer,
    Number,
    Boolean,
}

impl Primitive {
    pub fn type_name(self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Integer => "integer",
            Primitive::Number => "number",
            Primitive::Boolean => "boolean",
        }
    }
}

/// A named component schema: either a caller model or a synthesized type.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSchema {
    pub name: String,
    pub schema: Value,
}

impl ModelSchema {
    pub fn of<T: ApiModel>() -> Self {
        Self {
            name: T::schema_name().to_string(),
            schema: T::schema(),
        }
    }
}

/// Reference to the type a field or payload carries.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeRef {
    Primitive(Primitive),
    Model(ModelSchema),
}

impl TypeRef {
    pub fn model<T: ApiModel>() -> Self {
        TypeRef::Model(ModelSchema::of::<T>())
    }

    pub fn string() -> Self {
        TypeRef::Primitive(Primitive::String)
    }

    pub fn integer() -> Self {
        TypeRef::Primitive(Primitive::Integer)
    }

    pub fn number() -> Self {
        TypeRef::Primitive(Primitive::Number)
    }

    pub fn boolean() -> Self {
        TypeRef::Primitive(Primitive::Boolean)
    }

    /// Inline schema used where this type is referenced: a `$ref` for models,
    /// a `type` object for primitives.
    pub fn schema(&self) -> Value {
        match self {
            TypeRef::Primitive(p) => json!({ "type": p.type_name() }),
            TypeRef::Model(model) => schema_ref(&model.name),
        }
    }

    /// The component this type needs registered, if any.
    pub fn model_schema(&self) -> Option<&ModelSchema> {
        match self {
            TypeRef::Model(model) => Some(model),
            TypeRef::Primitive(_) => None,
        }
    }
}

/// A response payload: a single type or an array of it.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    One(TypeRef),
    Many(TypeRef),
}

impl Payload {
    /// Normalizes into the element type and an array flag.
    pub fn into_parts(self) -> (TypeRef, bool) {
        match self {
            Payload::One(ty) => (ty, false),
            Payload::Many(ty) => (ty, true),
        }
    }
}

impl From<TypeRef> for Payload {
    fn from(ty: TypeRef) -> Self {
        Payload::One(ty)
    }
}

pub fn schema_ref(name: &str) -> Value {
    json!({ "$ref": format!("#/components/schemas/{}", name) })
}

/// Caller supplied property options merged over a synthesized field.
/// Only the options that are set override the field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldOptions {
    pub is_array: Option<bool>,
    pub description: Option<String>,
    pub example: Option<Value>,
    pub format: Option<String>,
    pub required: Option<bool>,
}

impl FieldOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn array(mut self) -> Self {
        self.is_array = Some(true);
        self
    }

    pub fn description<S: Into<String>>(mut self, description: S) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn example<V: Into<Value>>(mut self, example: V) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn format<S: Into<String>>(mut self, format: S) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }
}

/// One documented field of a synthesized type.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaFieldSpec {
    pub field_name: String,
    pub ty: TypeRef,
    pub example: Option<Value>,
    pub enum_values: Option<Vec<Value>>,
    pub is_array: bool,
    pub format: Option<String>,
    pub description: Option<String>,
    pub required: bool,
}

impl SchemaFieldSpec {
    pub fn new<S: Into<String>>(field_name: S, ty: TypeRef) -> Self {
        Self {
            field_name: field_name.into(),
            ty,
            example: None,
            enum_values: None,
            is_array: false,
            format: None,
            description: None,
            required: true,
        }
    }

    pub fn example<V: Into<Value>>(mut self, example: V) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn enum_values(mut self, values: Vec<Value>) -> Self {
        self.enum_values = Some(values);
        self
    }

    pub fn array(mut self, is_array: bool) -> Self {
        self.is_array = is_array;
        self
    }

    pub fn format<S: Into<String>>(mut self, format: S) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_options(mut self, options: &FieldOptions) -> Self {
        if let Some(is_array) = options.is_array {
            self.is_array = is_array;
        }
        if let Some(description) = &options.description {
            self.description = Some(description.clone());
        }
        if let Some(example) = &options.example {
            self.example = Some(example.clone());
        }
        if let Some(format) = &options.format {
            self.format = Some(format.clone());
        }
        if let Some(required) = options.required {
            self.required = required;
        }
        self
    }

    /// Property schema. Format and enum describe the element; example and
    /// description sit on the outer property.
    pub fn property_schema(&self) -> Value {
        let mut item = self.ty.schema();
        if let Value::Object(obj) = &mut item {
            if let Some(format) = &self.format {
                obj.insert("format".into(), json!(format));
            }
            if let Some(values) = &self.enum_values {
                obj.insert("enum".into(), Value::Array(values.clone()));
            }
        }

        let mut property = if self.is_array {
            json!({ "type": "array", "items": item })
        } else {
            item
        };

        if let Value::Object(obj) = &mut property {
            if let Some(description) = &self.description {
                obj.insert("description".into(), json!(description));
            }
            if let Some(example) = &self.example {
                obj.insert("example".into(), example.clone());
            }
        }
        property
    }
}

/// A generated, named object type with no source-level definition.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedType {
    name: String,
    fields: Vec<SchemaFieldSpec>,
}

impl SynthesizedType {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, spec: SchemaFieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[SchemaFieldSpec] {
        &self.fields
    }

    pub fn schema_ref(&self) -> Value {
        schema_ref(&self.name)
    }

    pub fn to_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for field in &self.fields {
            properties.insert(field.field_name.clone(), field.property_schema());
            if field.required {
                required.push(json!(field.field_name));
            }
        }

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });
        if !required.is_empty() {
            schema["required"] = Value::Array(required);
        }
        schema
    }

    /// Component schemas this type and the models it references need.
    /// The element type is listed for array fields, never the array itself.
    pub fn models(&self) -> Vec<ModelSchema> {
        let mut models = vec![ModelSchema {
            name: self.name.clone(),
            schema: self.to_schema(),
        }];
        for field in &self.fields {
            if let Some(model) = field.ty.model_schema() {
                if !models.contains(model) {
                    models.push(model.clone());
                }
            }
        }
        models
    }
}

/// Synthesizes an object type with exactly one field, named
/// `<Key><suffix>` by [`derive_type_name`].
pub fn synthesize_single_field_type(
    key: &str,
    suffix: &str,
    spec: SchemaFieldSpec,
) -> Result<SynthesizedType> {
    let name = derive_type_name(key, suffix)?;
    log::debug!(
        "Synthesized type {} with field '{}'",
        name,
        spec.field_name
    );
    Ok(SynthesizedType::new(name).field(spec))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct Pet;

    impl ApiModel for Pet {
        fn schema_name() -> &'static str {
            "Pet"
        }

        fn schema() -> Value {
            json!({ "type": "object", "properties": { "name": { "type": "string" } } })
        }
    }

    #[test]
    fn test_single_field_type() {
        let spec = SchemaFieldSpec::new("code", TypeRef::integer()).example(201);
        let ty = synthesize_single_field_type("createPet", "StatusResponseDto", spec).unwrap();

        assert_eq!(ty.name(), "CreatePetStatusResponseDto");
        assert_eq!(ty.fields().len(), 1);

        let schema = ty.to_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["code"]["type"], "integer");
        assert_eq!(schema["properties"]["code"]["example"], json!(201));
        assert_eq!(schema["required"], json!(["code"]));
    }

    #[test]
    fn test_array_field_references_element() {
        let spec = SchemaFieldSpec::new("pets", TypeRef::model::<Pet>()).array(true);
        let ty = synthesize_single_field_type("listPets", "ResponseDto", spec).unwrap();

        let schema = ty.to_schema();
        let pets = &schema["properties"]["pets"];
        assert_eq!(pets["type"], "array");
        assert_eq!(pets["items"]["$ref"], "#/components/schemas/Pet");

        let names: Vec<_> = ty.models().into_iter().map(|m| m.name).collect();
        assert_eq!(names, vec!["ListPetsResponseDto", "Pet"]);
    }

    #[test]
    fn test_format_and_enum_apply_to_items() {
        let spec = SchemaFieldSpec::new("files", TypeRef::string())
            .format("binary")
            .array(true)
            .example("a.png");
        let prop = spec.property_schema();
        assert_eq!(prop["items"]["format"], "binary");
        assert_eq!(prop["example"], "a.png");
        assert!(prop.get("format").is_none());
    }

    #[test]
    fn test_options_override_only_set_values() {
        let spec = SchemaFieldSpec::new("image", TypeRef::string())
            .format("binary")
            .with_options(&FieldOptions::new().description("avatar").required(false));

        assert_eq!(spec.format.as_deref(), Some("binary"));
        assert_eq!(spec.description.as_deref(), Some("avatar"));
        assert!(!spec.required);
        assert!(!spec.is_array);
    }

    #[test]
    fn test_empty_key_fails() {
        let spec = SchemaFieldSpec::new("code", TypeRef::integer());
        let res = synthesize_single_field_type("", "StatusResponseDto", spec);
        assert!(matches!(res, Err(Error::InvalidKey { .. })));
    }

    #[test]
    fn test_payload_normalization() {
        let (ty, is_array) = Payload::Many(TypeRef::model::<Pet>()).into_parts();
        assert!(is_array);
        assert_eq!(ty.model_schema().unwrap().name, "Pet");

        let (ty, is_array) = Payload::from(TypeRef::string()).into_parts();
        assert!(!is_array);
        assert_eq!(ty.schema(), json!({ "type": "string" }));
    }
}
