use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{BuildError, Result};
use crate::flatten::{Field, Flatten, Node};
use crate::schema::RawSchema;

/// Contact information for the API
#[derive(Debug, Clone, Default)]
pub struct Contact {
    name: Option<String>,
    url: Option<String>,
    email: Option<String>,
}

impl Contact {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

impl Flatten for Contact {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            ("name", Node::optional(&self.name)),
            ("url", Node::optional(&self.url)),
            ("email", Node::optional(&self.email)),
        ]
    }
}

/// License information for the API
#[derive(Debug, Clone)]
pub struct License {
    name: String,
    url: Option<String>,
}

impl License {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
        }
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

impl Flatten for License {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            ("name", Node::scalar(self.name.clone())),
            ("url", Node::optional(&self.url)),
        ]
    }
}

/// Logo rendered by ReDoc-style viewers, emitted under the `x-logo` extension
#[derive(Debug, Clone, Default)]
pub struct Logo {
    url: Option<String>,
    background_color: Option<String>,
    alt_text: Option<String>,
}

impl Logo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    pub fn alt_text(mut self, text: impl Into<String>) -> Self {
        self.alt_text = Some(text.into());
        self
    }
}

impl Flatten for Logo {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            ("url", Node::optional(&self.url)),
            ("backgroundColor", Node::optional(&self.background_color)),
            ("altText", Node::optional(&self.alt_text)),
        ]
    }
}

/// Information about the API
#[derive(Debug, Clone)]
pub struct Info {
    title: String,
    version: String,
    description: Option<String>,
    terms_of_service: Option<String>,
    contact: Option<Contact>,
    logo: Option<Logo>,
    license: Option<License>,
}

impl Info {
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: None,
            terms_of_service: None,
            contact: None,
            logo: None,
            license: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn terms_of_service(mut self, url: impl Into<String>) -> Self {
        self.terms_of_service = Some(url.into());
        self
    }

    pub fn contact(mut self, contact: Contact) -> Self {
        self.contact = Some(contact);
        self
    }

    pub fn logo(mut self, logo: Logo) -> Self {
        self.logo = Some(logo);
        self
    }

    pub fn license(mut self, license: License) -> Self {
        self.license = Some(license);
        self
    }
}

impl Flatten for Info {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            ("title", Node::scalar(self.title.clone())),
            ("version", Node::scalar(self.version.clone())),
            ("description", Node::optional(&self.description)),
            ("termsOfService", Node::optional(&self.terms_of_service)),
            ("contact", Node::optional_entity(&self.contact)),
            ("x_logo", Node::optional_entity(&self.logo)),
            ("license", Node::optional_entity(&self.license)),
        ]
    }
}

/// External documentation for the API
#[derive(Debug, Clone)]
pub struct ExternalDocumentation {
    url: String,
    description: Option<String>,
}

impl ExternalDocumentation {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Flatten for ExternalDocumentation {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            ("description", Node::optional(&self.description)),
            ("url", Node::scalar(self.url.clone())),
        ]
    }
}

/// Tag information for API operations
#[derive(Debug, Clone)]
pub struct Tag {
    name: String,
    description: Option<String>,
    external_docs: Option<ExternalDocumentation>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            external_docs: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn external_docs(mut self, docs: ExternalDocumentation) -> Self {
        self.external_docs = Some(docs);
        self
    }
}

impl Flatten for Tag {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            ("name", Node::scalar(self.name.clone())),
            ("description", Node::optional(&self.description)),
            ("externalDocs", Node::optional_entity(&self.external_docs)),
        ]
    }
}

/// Server variable for templated server URLs
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerVariable {
    default: String,
    #[serde(rename = "enum", default)]
    enum_values: Vec<String>,
    #[serde(default)]
    description: Option<String>,
}

impl ServerVariable {
    pub fn new(default: impl Into<String>) -> Self {
        Self {
            default: default.into(),
            enum_values: Vec::new(),
            description: None,
        }
    }

    /// Appends one allowed value.
    pub fn enum_value(mut self, value: impl Into<String>) -> Self {
        self.enum_values.push(value.into());
        self
    }

    /// Replaces the allowed values.
    pub fn enum_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Flatten for ServerVariable {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            ("default", Node::scalar(self.default.clone())),
            ("enum", Node::scalars(&self.enum_values)),
            ("description", Node::optional(&self.description)),
        ]
    }
}

/// Server object used for API endpoints
#[derive(Debug, Clone)]
pub struct Server {
    url: String,
    description: Option<String>,
    variables: IndexMap<String, ServerVariable>,
}

impl Server {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            description: None,
            variables: IndexMap::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn variable(mut self, name: impl Into<String>, variable: ServerVariable) -> Self {
        self.variables.insert(name.into(), variable);
        self
    }

    /// Replaces all variables.
    pub fn variables(mut self, variables: IndexMap<String, ServerVariable>) -> Self {
        self.variables = variables;
        self
    }

    /// Replaces all variables from an untyped JSON object of
    /// `name -> {"default", "enum"?, "description"?}` entries. The whole
    /// object is checked before anything is replaced.
    pub fn variables_from_value(mut self, variables: Value) -> Result<Self> {
        let entries = match variables {
            Value::Object(entries) => entries,
            _ => {
                return Err(BuildError::InvalidElementType {
                    collection: "variables",
                    key: String::new(),
                    expected: "an object of ServerVariable entries",
                })
            }
        };

        let mut parsed = IndexMap::with_capacity(entries.len());
        for (name, entry) in entries {
            match serde_json::from_value::<ServerVariable>(entry) {
                Ok(variable) => {
                    parsed.insert(name, variable);
                }
                Err(e) => {
                    debug!("Server variable {} rejected: {}", name, e);
                    return Err(BuildError::InvalidElementType {
                        collection: "variables",
                        key: name,
                        expected: "ServerVariable",
                    });
                }
            }
        }

        self.variables = parsed;
        Ok(self)
    }
}

impl Flatten for Server {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            ("url", Node::scalar(self.url.clone())),
            ("description", Node::optional(&self.description)),
            ("variables", Node::keyed(&self.variables)),
        ]
    }
}

/// Example object
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Example {
    summary: Option<String>,
    description: Option<String>,
    value: Option<Value>,
    external_value: Option<String>,
}

impl Example {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Literal example value, emitted as given.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn external_value(mut self, url: impl Into<String>) -> Self {
        self.external_value = Some(url.into());
        self
    }
}

impl Flatten for Example {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            ("summary", Node::optional(&self.summary)),
            ("description", Node::optional(&self.description)),
            ("value", Node::optional(&self.value)),
            ("externalValue", Node::optional(&self.external_value)),
        ]
    }
}

/// Encoding object
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Encoding {
    content_type: Option<String>,
    headers: IndexMap<String, Header>,
    style: Option<String>,
    explode: bool,
    allow_reserved: bool,
}

impl Default for Encoding {
    fn default() -> Self {
        Self {
            content_type: None,
            headers: IndexMap::new(),
            style: None,
            explode: true,
            allow_reserved: false,
        }
    }
}

impl Encoding {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, header: Header) -> Self {
        self.headers.insert(name.into(), header);
        self
    }

    pub fn style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn explode(mut self, explode: bool) -> Self {
        self.explode = explode;
        self
    }

    pub fn allow_reserved(mut self, allow: bool) -> Self {
        self.allow_reserved = allow;
        self
    }
}

impl Flatten for Encoding {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            ("contentType", Node::optional(&self.content_type)),
            ("headers", Node::keyed(&self.headers)),
            ("style", Node::optional(&self.style)),
            ("explode", Node::scalar(self.explode)),
            ("allowReserved", Node::scalar(self.allow_reserved)),
        ]
    }
}

/// Response header
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Header {
    description: Option<String>,
    required: Option<bool>,
    deprecated: Option<bool>,
    schema: RawSchema,
    example: Option<Value>,
}

impl Header {
    pub fn new(schema: RawSchema) -> Self {
        Self {
            description: None,
            required: None,
            deprecated: None,
            schema,
            example: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = Some(deprecated);
        self
    }

    pub fn example(mut self, example: impl Into<Value>) -> Self {
        self.example = Some(example.into());
        self
    }
}

impl Flatten for Header {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            ("description", Node::optional(&self.description)),
            ("required", Node::optional(&self.required)),
            ("deprecated", Node::optional(&self.deprecated)),
            ("schema", Node::raw(&self.schema)),
            ("example", Node::optional(&self.example)),
        ]
    }
}

/// Media type object
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MediaType {
    schema: Option<RawSchema>,
    example: Option<Value>,
    examples: IndexMap<String, Example>,
    encoding: IndexMap<String, Encoding>,
}

impl MediaType {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema(mut self, schema: RawSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn example(mut self, example: impl Into<Value>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn named_example(mut self, name: impl Into<String>, example: Example) -> Self {
        self.examples.insert(name.into(), example);
        self
    }

    /// Encoding for one property of a multipart or form body.
    pub fn encoding(mut self, property: impl Into<String>, encoding: Encoding) -> Self {
        self.encoding.insert(property.into(), encoding);
        self
    }
}

impl Flatten for MediaType {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            ("schema", Node::optional_raw(&self.schema)),
            ("example", Node::optional(&self.example)),
            ("examples", Node::keyed(&self.examples)),
            ("encoding", Node::keyed(&self.encoding)),
        ]
    }
}

/// Link object
#[derive(Debug, Clone)]
pub struct Link {
    operation_ref: Option<String>,
    operation_id: String,
    parameters: IndexMap<String, String>,
    request_body: Option<String>,
    description: Option<String>,
}

impl Link {
    pub fn new(operation_id: impl Into<String>) -> Self {
        Self {
            operation_ref: None,
            operation_id: operation_id.into(),
            parameters: IndexMap::new(),
            request_body: None,
            description: None,
        }
    }

    pub fn operation_ref(mut self, reference: impl Into<String>) -> Self {
        self.operation_ref = Some(reference.into());
        self
    }

    /// Maps a parameter of the linked operation to a runtime expression.
    pub fn parameter(mut self, name: impl Into<String>, expression: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), expression.into());
        self
    }

    pub fn request_body(mut self, expression: impl Into<String>) -> Self {
        self.request_body = Some(expression.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl Flatten for Link {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            ("operationRef", Node::optional(&self.operation_ref)),
            ("operationId", Node::scalar(self.operation_id.clone())),
            ("parameters", Node::keyed_scalars(&self.parameters)),
            ("requestBody", Node::optional(&self.request_body)),
            ("description", Node::optional(&self.description)),
        ]
    }
}

/// API response
#[derive(Debug, Clone)]
pub struct Response {
    description: String,
    headers: IndexMap<String, Header>,
    content: IndexMap<String, MediaType>,
    links: IndexMap<String, Link>,
}

impl Response {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            headers: IndexMap::new(),
            content: IndexMap::new(),
            links: IndexMap::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, header: Header) -> Self {
        self.headers.insert(name.into(), header);
        self
    }

    pub fn content(mut self, media_type: impl Into<String>, content: MediaType) -> Self {
        self.content.insert(media_type.into(), content);
        self
    }

    pub fn link(mut self, name: impl Into<String>, link: Link) -> Self {
        self.links.insert(name.into(), link);
        self
    }
}

impl Flatten for Response {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            ("description", Node::scalar(self.description.clone())),
            ("headers", Node::keyed(&self.headers)),
            ("content", Node::keyed(&self.content)),
            ("links", Node::keyed(&self.links)),
        ]
    }
}

/// Request body object
#[derive(Debug, Clone, Default)]
pub struct RequestBody {
    description: Option<String>,
    content: IndexMap<String, MediaType>,
    required: bool,
}

impl RequestBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn content(mut self, media_type: impl Into<String>, content: MediaType) -> Self {
        self.content.insert(media_type.into(), content);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

impl Flatten for RequestBody {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            ("description", Node::optional(&self.description)),
            ("content", Node::keyed(&self.content)),
            ("required", Node::scalar(self.required)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::flatten;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_license_is_sparse() {
        assert_eq!(License::new("MIT").to_value(), json!({"name": "MIT"}));
    }

    #[test]
    fn test_info_logo_uses_extension_key() {
        let info = Info::new("Pet Store", "1.0.0")
            .contact(Contact::new().email("api@example.com"))
            .logo(Logo::new().url("https://example.com/logo.png").alt_text("Pets"));

        let mapping = flatten(&info);
        assert!(mapping.get("x_logo").is_none());
        assert_eq!(
            mapping.get("x-logo"),
            Some(&json!({"url": "https://example.com/logo.png", "altText": "Pets"}))
        );
        assert_eq!(mapping.get("contact"), Some(&json!({"email": "api@example.com"})));
    }

    #[test]
    fn test_server_with_variables() {
        let server = Server::new("https://{env}.example.com")
            .description("Main server")
            .variable(
                "env",
                ServerVariable::new("prod")
                    .enum_value("prod")
                    .enum_value("staging")
                    .description("Deployment"),
            );

        assert_eq!(
            server.to_value(),
            json!({
                "url": "https://{env}.example.com",
                "description": "Main server",
                "variables": {
                    "env": {"default": "prod", "enum": ["prod", "staging"], "description": "Deployment"}
                }
            })
        );
    }

    #[test]
    fn test_server_variables_from_value() {
        let server = Server::new("https://{region}.example.com")
            .variables_from_value(json!({
                "region": {"default": "eu", "enum": ["eu", "us"]},
                "port": {"default": "443"}
            }))
            .unwrap();
        assert_eq!(
            server.to_value()["variables"],
            json!({"region": {"default": "eu", "enum": ["eu", "us"]}, "port": {"default": "443"}})
        );

        let err = Server::new("https://example.com")
            .variables_from_value(json!({"region": {"default": "eu"}, "port": 443}))
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::InvalidElementType {
                collection: "variables",
                key: "port".to_string(),
                expected: "ServerVariable",
            }
        );

        assert!(matches!(
            Server::new("https://example.com").variables_from_value(json!(["eu"])),
            Err(BuildError::InvalidElementType { .. })
        ));
    }

    #[test]
    fn test_encoding_emits_defaults() {
        let encoding = Encoding::new()
            .content_type("image/png")
            .header("X-Rate-Limit", Header::new(RawSchema::of_type("integer")));

        assert_eq!(
            encoding.to_value(),
            json!({
                "contentType": "image/png",
                "headers": {"X-Rate-Limit": {"schema": {"type": "integer"}}},
                "explode": true,
                "allowReserved": false
            })
        );
    }

    #[test]
    fn test_response_with_content_and_links() {
        let response = Response::new("A pet")
            .header(
                "X-Request-Id",
                Header::new(RawSchema::of_type("string")).description("Trace id"),
            )
            .content(
                "application/json",
                MediaType::new()
                    .schema(RawSchema::reference("#/components/schemas/Pet"))
                    .named_example("cat", Example::new().summary("A cat").value(json!({"name": "Tom"}))),
            )
            .link(
                "GetOwner",
                Link::new("getOwner").parameter("ownerId", "$response.body#/ownerId"),
            );

        assert_eq!(
            response.to_value(),
            json!({
                "description": "A pet",
                "headers": {
                    "X-Request-Id": {"description": "Trace id", "schema": {"type": "string"}}
                },
                "content": {
                    "application/json": {
                        "schema": {"$ref": "#/components/schemas/Pet"},
                        "examples": {"cat": {"summary": "A cat", "value": {"name": "Tom"}}}
                    }
                },
                "links": {
                    "GetOwner": {
                        "operationId": "getOwner",
                        "parameters": {"ownerId": "$response.body#/ownerId"}
                    }
                }
            })
        );
    }

    #[test]
    fn test_request_body_required_defaults_to_false() {
        let body = RequestBody::new().content(
            "application/json",
            MediaType::new().schema(RawSchema::of_type("object")),
        );
        assert_eq!(
            body.to_value(),
            json!({"content": {"application/json": {"schema": {"type": "object"}}}, "required": false})
        );
        assert_eq!(body.required(true).to_value()["required"], json!(true));
    }

    #[test]
    fn test_tag_with_external_docs() {
        let tag = Tag::new("pets")
            .description("Everything about pets")
            .external_docs(ExternalDocumentation::new("https://example.com/docs"));
        assert_eq!(
            tag.to_value(),
            json!({
                "name": "pets",
                "description": "Everything about pets",
                "externalDocs": {"url": "https://example.com/docs"}
            })
        );
    }
}
