//! Sample user API, documented end to end through an [`OperationTable`].

use crate::builder::ApiDecoratorBuilder;
use crate::config::Config;
use crate::error::Result;
use crate::factory::{ErrorExample, ResponseEnvelopeConfig, ResponseOptions};
use crate::fragment::Fragment;
use crate::operator::{OperationOptions, OperationTable};
use crate::registry::Component;
use crate::schema::{ApiModel, FieldOptions, Payload, TypeRef};
use crate::Route;
use http::{Method, StatusCode};
use serde_json::{Value, json};

pub struct UserDto;

impl ApiModel for UserDto {
    fn schema_name() -> &'static str {
        "UserDto"
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "id": { "type": "integer", "description": "User ID", "example": 1 },
                "name": { "type": "string", "description": "User Name", "example": "Kimsoo0119" }
            },
            "required": ["id", "name"]
        })
    }
}

pub struct CreateUserDto;

impl ApiModel for CreateUserDto {
    fn schema_name() -> &'static str {
        "CreateUserDto"
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "example": "Kimsoo0119" },
                "password": { "type": "string", "format": "password" }
            },
            "required": ["name", "password"]
        })
    }
}

fn sample_errors() -> Vec<ErrorExample> {
    vec![
        ErrorExample::new("case1", "error1").description("description1"),
        ErrorExample::new("case2", "error2").description("description2"),
    ]
}

/// Documentation table of the user controller. `GetUser` uses a builder
/// preset to `envelope`.
pub fn api_user(envelope: ResponseEnvelopeConfig) -> Result<OperationTable> {
    OperationTable::new("ApiUser")
        .entry("createUser", |options| {
            ApiDecoratorBuilder::new()
                .with_operation(options)
                .with_bearer_auth(None)
                .with_decorator(request_body::<CreateUserDto>())
                .with_status_response(StatusCode::CREATED, "ApiUser_CreateUser")
                .with_exception(StatusCode::BAD_REQUEST, &sample_errors())
                .with_unauthorized_response(&sample_errors())
                .build()
        })?
        .entry("getUsers", |options| {
            ApiDecoratorBuilder::new()
                .with_operation(options)
                .with_cookie_auth(None)
                .with_body_response_options(
                    StatusCode::OK,
                    "ApiUser_GetUsers",
                    Payload::Many(TypeRef::model::<UserDto>()),
                    ResponseOptions::new().status_key("status").wrapper_key("data"),
                )
                .build()
        })?
        .entry("getUser", move |options| {
            ApiDecoratorBuilder::with_config(envelope.clone())
                .with_operation(options)
                .with_bearer_auth(None)
                .with_body_response(StatusCode::OK, "ApiUser_GetUser", TypeRef::model::<UserDto>())
                .with_not_found_response(&[ErrorExample::new("notFound", "USER_NOT_FOUND")])
                .build()
        })?
        .entry("uploadImageFile", |options| {
            ApiDecoratorBuilder::new()
                .with_operation(options)
                .with_form_data_request("ApiUser_UploadFile", "image")
                .with_body_response(StatusCode::CREATED, "ApiUser_UploadImageFile", TypeRef::string())
                .build()
        })?
        .entry("uploadImageFiles", |options| {
            ApiDecoratorBuilder::new()
                .with_operation(options)
                .with_form_data_request_options(
                    "ApiUser_UploadFiles",
                    "images",
                    FieldOptions::new().array(),
                )
                .with_body_response(
                    StatusCode::CREATED,
                    "ApiUser_UploadImageFiles",
                    Payload::Many(TypeRef::string()),
                )
                .build()
        })
}

/// The routes of the user controller with their annotations.
pub fn user_routes(config: &Config) -> Result<Vec<Route>> {
    let table = api_user(config.envelope())?;
    let tagged = |summary: &str| OperationOptions::new(summary).tag("users");

    Ok(vec![
        Route::new(
            Method::POST,
            "/users",
            table.invoke("CreateUser", tagged("Create New User"))?,
        ),
        Route::new(
            Method::GET,
            "/users",
            table.invoke("GetUsers", tagged("Get All Users"))?,
        ),
        Route::new(
            Method::GET,
            "/users/{id}",
            table.invoke("GetUser", tagged("Get User"))?,
        ),
        Route::new(
            Method::POST,
            "/users/upload",
            table.invoke("UploadImageFile", tagged("Upload File"))?,
        ),
        Route::new(
            Method::POST,
            "/users/upload-files",
            table.invoke("UploadImageFiles", tagged("Upload Files"))?,
        ),
    ])
}

fn request_body<T: ApiModel>() -> Fragment {
    let model = TypeRef::model::<T>();
    let body = json!({
        "requestBody": {
            "required": true,
            "content": { "application/json": { "schema": model.schema() } }
        }
    });
    let mut fragment = Fragment::custom(body);
    if let Some(schema) = model.model_schema() {
        fragment = fragment.with_component(Component::Schema(schema.clone()));
    }
    fragment
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::FragmentKind;

    #[test]
    fn test_table_entries() {
        let table = api_user(ResponseEnvelopeConfig::default()).unwrap();
        assert_eq!(
            table.operations().collect::<Vec<_>>(),
            vec![
                "CreateUser",
                "GetUser",
                "GetUsers",
                "UploadImageFile",
                "UploadImageFiles"
            ]
        );
    }

    #[test]
    fn test_create_user_order() {
        let table = api_user(ResponseEnvelopeConfig::default()).unwrap();
        let annotation = table
            .invoke("CreateUser", OperationOptions::new("Create New User"))
            .unwrap();
        assert_eq!(
            annotation.kinds(),
            vec![
                FragmentKind::Operation,
                FragmentKind::Security,
                FragmentKind::Custom,
                FragmentKind::Response(StatusCode::CREATED),
                FragmentKind::Response(StatusCode::BAD_REQUEST),
                FragmentKind::Response(StatusCode::UNAUTHORIZED),
            ]
        );
    }

    #[test]
    fn test_get_user_follows_preset() {
        let plain = api_user(ResponseEnvelopeConfig::default())
            .unwrap()
            .invoke("GetUser", OperationOptions::new("Get User"))
            .unwrap();
        let operation = plain.to_operation();
        let schema = &operation["responses"]["200"]["content"]["application/json"]["schema"];
        assert_eq!(schema["$ref"], "#/components/schemas/UserDto");

        let preset = ResponseEnvelopeConfig::new().status_key("status").wrapper_key("data");
        let enveloped = api_user(preset)
            .unwrap()
            .invoke("GetUser", OperationOptions::new("Get User"))
            .unwrap();
        let operation = enveloped.to_operation();
        let schema = &operation["responses"]["200"]["content"]["application/json"]["schema"];
        assert_eq!(schema["$ref"], "#/components/schemas/ApiUser_GetUserResponseDto");
    }

    #[test]
    fn test_routes() {
        let routes = user_routes(&Config::default()).unwrap();
        assert_eq!(routes.len(), 5);
        assert!(routes.iter().all(|r| !r.annotation.is_empty()));
    }
}
