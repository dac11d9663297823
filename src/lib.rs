//! Fluent builders for OpenAPI 3.x documents.
//!
//! Assemble a document from [`OpenApi`], [`Path`], [`Operation`] and friends,
//! then flatten the root once with [`Flatten::to_mapping`] (or
//! [`flatten()`]) to get a plain `serde_json` mapping ready for any JSON or
//! YAML encoder.

pub mod components;
pub mod document;
pub mod error;
pub mod flatten;
pub mod models;
pub mod operation;
pub mod schema;
pub mod security;
pub mod validation;

pub use components::{Component, Components};
pub use document::{OpenApi, OPENAPI_VERSION};
pub use error::{BuildError, Result};
pub use flatten::{flatten, Flatten, Mapping};
pub use models::{
    Contact, Encoding, Example, ExternalDocumentation, Header, Info, License, Link, Logo,
    MediaType, RequestBody, Response, Server, ServerVariable, Tag,
};
pub use operation::{Callback, Operation, Parameter, ParameterLocation, ParameterStyle, Path};
pub use schema::RawSchema;
pub use security::{
    ApiKeyLocation, HttpAuthScheme, OAuthFlow, OAuthFlowKind, SecurityRequirement,
    SecurityScheme, SecuritySchemeKind,
};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn pet_store() -> anyhow::Result<OpenApi> {
        let pets = Path::new().get(
            Operation::new()
                .operation_id("listPets")
                .response(200, Response::new("A list of pets")),
        );
        Ok(OpenApi::new("3.0.0", Info::new("Pet Store", "1.0.0"), [("/pets", pets)])?)
    }

    #[test]
    fn test_pet_store_end_to_end() -> anyhow::Result<()> {
        init_logger();

        let mapping = flatten(&pet_store()?);

        assert_eq!(mapping["openapi"], json!("3.0.0"));
        assert_eq!(mapping["info"]["title"], json!("Pet Store"));
        assert_eq!(mapping["paths"]["/pets"]["get"]["operationId"], json!("listPets"));
        assert_eq!(
            mapping["paths"]["/pets"]["get"]["responses"]["200"]["description"],
            json!("A list of pets")
        );
        Ok(())
    }

    #[test]
    fn test_full_document() -> anyhow::Result<()> {
        init_logger();

        let pet = RawSchema::try_from(json!({
            "type": "object",
            "required": ["id", "name"],
            "properties": {
                "id": {"type": "integer", "format": "int64"},
                "name": {"type": "string"},
                "tags": {"type": "array", "items": {"type": "string"}}
            }
        }))?;

        let components = Components::new()
            .schema("Pet", pet)?
            .security_scheme(
                "petstore_auth",
                SecurityScheme::oauth2().flow(
                    OAuthFlow::implicit("https://petstore.example.com/oauth/dialog")
                        .scope("read:pets", "read your pets"),
                ),
            )?
            .security_scheme("api_key", SecurityScheme::api_key("api_key", "header")?)?;

        let show_pet = Operation::new()
            .tag("pets")
            .summary("Info for a specific pet")
            .operation_id("showPetById")
            .parameter(
                Parameter::new("petId", "path", RawSchema::of_type("string"))?
                    .description("The id of the pet to retrieve")
                    .required(false),
            )
            .response(
                200,
                Response::new("Expected response to a valid request").content(
                    "application/json",
                    MediaType::new().schema(RawSchema::reference("#/components/schemas/Pet")),
                ),
            )
            .security_requirement(SecurityRequirement::new("petstore_auth", ["read:pets"]));

        let doc = OpenApi::new(
            "3.0.0",
            Info::new("Swagger Petstore", "1.0.0")
                .license(License::new("MIT"))
                .logo(Logo::new().url("https://petstore.example.com/logo.png")),
            [("/pets/{petId}", Path::new().get(show_pet))],
        )?
        .server(
            Server::new("https://{env}.petstore.example.com/v1")
                .variable("env", ServerVariable::new("prod").enum_values(["prod", "dev"])),
        )
        .components(components)
        .security_requirement(SecurityRequirement::new("api_key", Vec::<String>::new()))
        .tag(Tag::new("pets").description("Pet operations"));

        assert_eq!(
            doc.to_value(),
            json!({
                "openapi": "3.0.0",
                "info": {
                    "title": "Swagger Petstore",
                    "version": "1.0.0",
                    "x-logo": {"url": "https://petstore.example.com/logo.png"},
                    "license": {"name": "MIT"}
                },
                "paths": {
                    "/pets/{petId}": {
                        "get": {
                            "tags": ["pets"],
                            "summary": "Info for a specific pet",
                            "operationId": "showPetById",
                            "parameters": [{
                                "name": "petId",
                                "in": "path",
                                "description": "The id of the pet to retrieve",
                                "required": true,
                                "schema": {"type": "string"}
                            }],
                            "responses": {
                                "200": {
                                    "description": "Expected response to a valid request",
                                    "content": {
                                        "application/json": {
                                            "schema": {"$ref": "#/components/schemas/Pet"}
                                        }
                                    }
                                }
                            },
                            "deprecated": false,
                            "security": [{"petstore_auth": ["read:pets"]}]
                        }
                    }
                },
                "servers": [{
                    "url": "https://{env}.petstore.example.com/v1",
                    "variables": {"env": {"default": "prod", "enum": ["prod", "dev"]}}
                }],
                "components": {
                    "schemas": {
                        "Pet": {
                            "type": "object",
                            "required": ["id", "name"],
                            "properties": {
                                "id": {"type": "integer", "format": "int64"},
                                "name": {"type": "string"},
                                "tags": {"type": "array", "items": {"type": "string"}}
                            }
                        }
                    },
                    "securitySchemes": {
                        "petstore_auth": {
                            "type": "oauth2",
                            "flows": {
                                "implicit": {
                                    "authorizationUrl": "https://petstore.example.com/oauth/dialog",
                                    "scopes": {"read:pets": "read your pets"}
                                }
                            }
                        },
                        "api_key": {"type": "apiKey", "name": "api_key", "in": "header"}
                    }
                },
                "security": [{"api_key": []}],
                "tags": [{"name": "pets", "description": "Pet operations"}]
            })
        );
        Ok(())
    }

    #[test]
    fn test_flattening_is_idempotent() -> anyhow::Result<()> {
        let doc = pet_store()?;
        let first = doc.to_mapping();

        let rewrapped = RawSchema::new(first.clone());
        let components = Components::new().schema("Document", rewrapped)?;
        let second = components.to_value();

        assert_eq!(second["schemas"]["Document"], Value::Object(first.clone()));
        assert_eq!(doc.to_mapping(), first);
        Ok(())
    }

    #[test]
    fn test_mapping_has_no_nulls() -> anyhow::Result<()> {
        fn assert_no_nulls(value: &Value) {
            match value {
                Value::Null => panic!("flattened output contains null"),
                Value::Array(items) => items.iter().for_each(assert_no_nulls),
                Value::Object(map) => map.values().for_each(assert_no_nulls),
                _ => {}
            }
        }

        assert_no_nulls(&pet_store()?.to_value());
        assert_no_nulls(&Info::new("t", "v").contact(Contact::new()).to_value());
        Ok(())
    }

    #[test]
    fn test_mapping_feeds_text_encoders() -> anyhow::Result<()> {
        let value = pet_store()?.to_value();

        let yaml = serde_yaml::to_string(&value)?;
        assert!(yaml.contains("operationId: listPets"));
        let reparsed: Value = serde_yaml::from_str(&yaml)?;
        assert_eq!(reparsed, value);

        let json = serde_json::to_string(&value)?;
        assert!(json.starts_with(r#"{"openapi":"3.0.0","info":{"title":"Pet Store""#));
        Ok(())
    }

    #[test]
    fn test_bad_path_key_rejects_whole_document() {
        let result = OpenApi::new(
            "3.0.0",
            Info::new("Pet Store", "1.0.0"),
            vec![("/pets".to_string(), Path::new()), ("items".to_string(), Path::new())],
        );
        assert!(matches!(result, Err(BuildError::InvalidPathEntry { .. })));
    }
}
