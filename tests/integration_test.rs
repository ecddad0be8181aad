use http::{Method, StatusCode};
use openapi_compose::config::Config;
use openapi_compose::factory::ErrorExample;
use openapi_compose::schema::{ApiModel, Payload, TypeRef};
use openapi_compose::{
    ApiDecoratorBuilder, Error, Generator, OperationOptions, OperationTable, Route, demo,
};
use serde_json::{Value, json};
use tempfile::tempdir;

struct ArticleDto;

impl ApiModel for ArticleDto {
    fn schema_name() -> &'static str {
        "ArticleDto"
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "properties": { "title": { "type": "string" } }
        })
    }
}

#[test]
fn test_full_pipeline_json() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("docs").join("openapi.json");

    let config = Config {
        title: Some("Users".to_string()),
        version: Some("2.0.0".to_string()),
        ..Config::default()
    };
    let routes = demo::user_routes(&config).unwrap();
    Generator::new()
        .with_config(config)
        .output(&output)
        .routes(routes)
        .generate()
        .expect("Generation failed");

    let doc: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(doc["info"]["title"], "Users");
    assert_eq!(doc["info"]["version"], "2.0.0");

    // 1. Status-only response, no body
    let create = &doc["paths"]["/users"]["post"];
    assert_eq!(create["summary"], "Create New User");
    assert_eq!(create["tags"], json!(["users"]));
    assert!(create["responses"]["201"].get("content").is_none());

    // 2. Exception examples
    let examples = &create["responses"]["400"]["content"]["application/json"]["examples"];
    assert_eq!(examples.as_object().unwrap().len(), 2);
    assert_eq!(examples["case1"]["value"]["status"], json!(400));
    assert_eq!(examples["case2"]["value"]["error"], "error2");
    assert_eq!(
        create["responses"]["401"]["content"]["application/json"]["examples"]["case1"]["value"]
            ["status"],
        json!(401)
    );

    // 3. Enveloped array response
    let schemas = &doc["components"]["schemas"];
    let envelope = &schemas["ApiUser_GetUsersResponseDto"];
    assert_eq!(envelope["properties"]["status"]["example"], json!(200));
    assert_eq!(
        envelope["properties"]["data"]["items"]["$ref"],
        "#/components/schemas/UserDto"
    );
    assert!(schemas.get("UserDto").is_some());

    // 4. Direct passthrough
    assert_eq!(
        doc["paths"]["/users/{id}"]["get"]["responses"]["200"]["content"]["application/json"]
            ["schema"]["$ref"],
        "#/components/schemas/UserDto"
    );
    assert!(schemas.get("ApiUser_GetUserResponseDto").is_none());

    // 5. Multipart uploads
    assert_eq!(
        schemas["ApiUser_UploadFilesRequestDto"]["properties"]["images"],
        json!({ "type": "array", "items": { "type": "string", "format": "binary" } })
    );
    assert_eq!(
        schemas["ApiUser_UploadFileRequestDto"]["properties"]["image"]["format"],
        "binary"
    );

    // 6. Security schemes
    let schemes = &doc["components"]["securitySchemes"];
    assert_eq!(schemes["bearer"]["type"], "http");
    assert_eq!(schemes["cookie"]["in"], "cookie");
}

#[test]
fn test_yaml_output_with_envelope_defaults() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("openapi.yaml");

    let config = Config {
        status_key: Some("code".to_string()),
        wrapper_key: Some("result".to_string()),
        ..Config::default()
    };
    let routes = demo::user_routes(&config).unwrap();
    Generator::new()
        .with_config(config)
        .output(&output)
        .routes(routes)
        .generate()
        .unwrap();

    let content = std::fs::read_to_string(&output).unwrap();
    assert!(content.contains("openapi:"));
    assert!(content.contains("ApiUser_GetUserResponseDto:"));

    let doc: Value = serde_yaml::from_str(&content).unwrap();
    let props = &doc["components"]["schemas"]["ApiUser_GetUserResponseDto"]["properties"];
    assert_eq!(props["code"]["example"], json!(200));
    assert_eq!(props["result"]["$ref"], "#/components/schemas/UserDto");
}

#[test]
fn test_custom_table_conflict_aborts_generation() {
    let table = OperationTable::new("ApiArticle")
        .entry("getArticle", |options| {
            ApiDecoratorBuilder::new()
                .with_operation(options)
                .with_body_response_options(
                    StatusCode::OK,
                    "getArticle",
                    TypeRef::model::<ArticleDto>(),
                    openapi_compose::factory::ResponseOptions::new().wrapper_key("data"),
                )
                .build()
        })
        .unwrap()
        .entry("getArticles", |options| {
            ApiDecoratorBuilder::new()
                .with_operation(options)
                // Same key as getArticle, different payload shape.
                .with_body_response_options(
                    StatusCode::OK,
                    "getArticle",
                    Payload::Many(TypeRef::model::<ArticleDto>()),
                    openapi_compose::factory::ResponseOptions::new().wrapper_key("data"),
                )
                .with_not_found_response(&[ErrorExample::new("missing", "NOT_FOUND")])
                .build()
        })
        .unwrap();

    let one = table
        .invoke("GetArticle", OperationOptions::new("Get Article"))
        .unwrap();
    let many = table
        .invoke("GetArticles", OperationOptions::new("List Articles"))
        .unwrap();

    let res = Generator::new()
        .route(Route::new(Method::GET, "/articles/{id}", one))
        .route(Route::new(Method::GET, "/articles", many))
        .document();
    assert!(matches!(res, Err(Error::AmbiguousTypeName { name }) if name == "GetArticleResponseDto"));
}

#[test]
fn test_missing_summary_is_rejected() {
    let table = demo::api_user(Default::default()).unwrap();
    let res = table.invoke("GetUsers", OperationOptions::default());
    assert!(matches!(res, Err(Error::MissingRequiredOption { .. })));
}
