use indexmap::IndexMap;
use log::debug;
use serde::Deserialize;
use serde_json::Value;
use std::{fmt, str::FromStr};

use crate::error::{BuildError, Result};
use crate::flatten::{Field, Flatten, Mapping, Node};
use crate::models::{Example, ExternalDocumentation, MediaType, RequestBody, Response, Server};
use crate::schema::RawSchema;
use crate::security::SecurityRequirement;
use crate::validation::parse_enum;

/// Where a parameter is carried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
}

impl ParameterLocation {
    const ALLOWED: &'static [&'static str] = &["query", "header", "path", "cookie"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Header => "header",
            Self::Path => "path",
            Self::Cookie => "cookie",
        }
    }
}

impl FromStr for ParameterLocation {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match parse_enum("in", s, Self::ALLOWED)? {
            0 => Self::Query,
            1 => Self::Header,
            2 => Self::Path,
            _ => Self::Cookie,
        })
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialization style of a parameter value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterStyle {
    Form,
    Simple,
}

impl ParameterStyle {
    const ALLOWED: &'static [&'static str] = &["form", "simple"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Simple => "simple",
        }
    }
}

impl FromStr for ParameterStyle {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match parse_enum("style", s, Self::ALLOWED)? {
            0 => Self::Form,
            _ => Self::Simple,
        })
    }
}

/// Parameter for an operation
#[derive(Debug, Clone)]
pub struct Parameter {
    name: String,
    location: ParameterLocation,
    description: Option<String>,
    required: Option<bool>,
    deprecated: Option<bool>,
    allow_empty_value: Option<bool>,
    style: Option<ParameterStyle>,
    explode: Option<bool>,
    allow_reserved: Option<bool>,
    schema: Option<RawSchema>,
    example: Option<Value>,
    examples: IndexMap<String, Example>,
    content: IndexMap<String, MediaType>,
}

impl Parameter {
    /// Creates a parameter, validating `location` against
    /// `query`, `header`, `path` and `cookie`.
    pub fn new(name: impl Into<String>, location: &str, schema: RawSchema) -> Result<Self> {
        let location = location.parse::<ParameterLocation>()?;
        Ok(Self::with_location(name, location, schema))
    }

    pub fn with_location(
        name: impl Into<String>,
        location: ParameterLocation,
        schema: RawSchema,
    ) -> Self {
        let mut parameter = Self::blank(name.into(), location);
        parameter.schema = Some(schema);
        parameter
    }

    /// Creates a parameter described by a single media type instead of a
    /// schema.
    pub fn with_content(
        name: impl Into<String>,
        location: ParameterLocation,
        media_type: impl Into<String>,
        content: MediaType,
    ) -> Self {
        Self::blank(name.into(), location).content(media_type, content)
    }

    fn blank(name: String, location: ParameterLocation) -> Self {
        Self {
            name,
            location,
            description: None,
            required: (location == ParameterLocation::Path).then_some(true),
            deprecated: None,
            allow_empty_value: None,
            style: None,
            explode: None,
            allow_reserved: None,
            schema: None,
            example: None,
            examples: IndexMap::new(),
            content: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> ParameterLocation {
        self.location
    }

    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Path parameters stay required whatever is passed here.
    pub fn required(mut self, required: bool) -> Self {
        let required = required || self.location == ParameterLocation::Path;
        self.required = Some(required);
        self
    }

    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = Some(deprecated);
        self
    }

    pub fn allow_empty_value(mut self, allow: bool) -> Self {
        self.allow_empty_value = Some(allow);
        self
    }

    /// Sets the style from its OpenAPI name, `form` or `simple`.
    pub fn style(self, style: &str) -> Result<Self> {
        let style = style.parse::<ParameterStyle>()?;
        Ok(self.with_style(style))
    }

    pub fn with_style(mut self, style: ParameterStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn explode(mut self, explode: bool) -> Self {
        self.explode = Some(explode);
        self
    }

    pub fn allow_reserved(mut self, allow: bool) -> Self {
        self.allow_reserved = Some(allow);
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

    /// The content map holds exactly one entry, a later call replaces it.
    pub fn content(mut self, media_type: impl Into<String>, content: MediaType) -> Self {
        self.content.clear();
        self.content.insert(media_type.into(), content);
        self
    }
}

impl Flatten for Parameter {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            ("name", Node::scalar(self.name.clone())),
            ("in", Node::scalar(self.location.as_str())),
            ("description", Node::optional(&self.description)),
            ("required", Node::optional(&self.required)),
            ("deprecated", Node::optional(&self.deprecated)),
            ("allowEmptyValue", Node::optional(&self.allow_empty_value)),
            ("style", Node::optional(&self.style.map(|s| s.as_str()))),
            ("explode", Node::optional(&self.explode)),
            ("allowReserved", Node::optional(&self.allow_reserved)),
            ("schema", Node::optional_raw(&self.schema)),
            ("example", Node::optional(&self.example)),
            ("examples", Node::keyed(&self.examples)),
            ("content", Node::keyed(&self.content)),
        ]
    }
}

/// Untyped parameter definition accepted by `Path::parameters_from_value`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct ParameterDef {
    name: String,
    #[serde(rename = "in")]
    location: String,
    description: Option<String>,
    required: Option<bool>,
    deprecated: Option<bool>,
    allow_empty_value: Option<bool>,
    style: Option<String>,
    explode: Option<bool>,
    allow_reserved: Option<bool>,
    schema: Option<RawSchema>,
    example: Option<Value>,
    #[serde(default)]
    examples: IndexMap<String, Example>,
    #[serde(default)]
    content: IndexMap<String, MediaType>,
}

impl ParameterDef {
    fn build(self, index: usize) -> Result<Parameter> {
        let location = self.location.parse::<ParameterLocation>()?;
        if self.content.len() > 1 {
            return Err(invalid_parameter(index, "Parameter with a single content entry"));
        }

        let content = self.content.into_iter().next();
        let mut parameter = match (self.schema, content) {
            (Some(schema), None) => Parameter::with_location(self.name, location, schema),
            (Some(schema), Some((media_type, content))) => {
                Parameter::with_location(self.name, location, schema).content(media_type, content)
            }
            (None, Some((media_type, content))) => {
                Parameter::with_content(self.name, location, media_type, content)
            }
            (None, None) => {
                return Err(invalid_parameter(index, "Parameter with a schema or content"))
            }
        };

        if let Some(description) = self.description {
            parameter = parameter.description(description);
        }
        if let Some(required) = self.required {
            parameter = parameter.required(required);
        }
        if let Some(deprecated) = self.deprecated {
            parameter = parameter.deprecated(deprecated);
        }
        if let Some(allow) = self.allow_empty_value {
            parameter = parameter.allow_empty_value(allow);
        }
        if let Some(style) = self.style {
            parameter = parameter.style(&style)?;
        }
        if let Some(explode) = self.explode {
            parameter = parameter.explode(explode);
        }
        if let Some(allow) = self.allow_reserved {
            parameter = parameter.allow_reserved(allow);
        }
        if let Some(example) = self.example {
            parameter = parameter.example(example);
        }
        for (name, example) in self.examples {
            parameter = parameter.named_example(name, example);
        }
        Ok(parameter)
    }
}

fn invalid_parameter(index: usize, expected: &'static str) -> BuildError {
    debug!("Path parameter {} rejected: expected {}", index, expected);
    BuildError::InvalidElementType {
        collection: "parameters",
        key: index.to_string(),
        expected,
    }
}

/// An operation (endpoint) of the API
#[derive(Debug, Clone, Default)]
pub struct Operation {
    tags: Vec<String>,
    summary: Option<String>,
    description: Option<String>,
    external_docs: Option<ExternalDocumentation>,
    operation_id: Option<String>,
    parameters: Vec<Parameter>,
    request_body: Option<RequestBody>,
    responses: IndexMap<String, Response>,
    callbacks: IndexMap<String, Callback>,
    deprecated: bool,
    security: Vec<SecurityRequirement>,
    servers: Vec<Server>,
}

impl Operation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn external_docs(mut self, docs: ExternalDocumentation) -> Self {
        self.external_docs = Some(docs);
        self
    }

    /// Should be unique across the document; uniqueness is not checked.
    pub fn operation_id(mut self, operation_id: impl Into<String>) -> Self {
        self.operation_id = Some(operation_id.into());
        self
    }

    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn request_body(mut self, body: RequestBody) -> Self {
        self.request_body = Some(body);
        self
    }

    /// Adds a response keyed by status code (`200`, `"4XX"`, `"default"`).
    pub fn response(mut self, status: impl ToString, response: Response) -> Self {
        self.responses.insert(status.to_string(), response);
        self
    }

    pub fn callback(mut self, name: impl Into<String>, callback: Callback) -> Self {
        self.callbacks.insert(name.into(), callback);
        self
    }

    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    pub fn security_requirement(mut self, requirement: SecurityRequirement) -> Self {
        self.security.push(requirement);
        self
    }

    pub fn server(mut self, server: Server) -> Self {
        self.servers.push(server);
        self
    }
}

impl Flatten for Operation {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            ("tags", Node::scalars(&self.tags)),
            ("summary", Node::optional(&self.summary)),
            ("description", Node::optional(&self.description)),
            ("externalDocs", Node::optional_entity(&self.external_docs)),
            ("operationId", Node::optional(&self.operation_id)),
            ("parameters", Node::list(&self.parameters)),
            ("requestBody", Node::optional_entity(&self.request_body)),
            ("responses", Node::keyed(&self.responses)),
            ("callbacks", Node::keyed(&self.callbacks)),
            ("deprecated", Node::scalar(self.deprecated)),
            ("security", Node::list(&self.security)),
            ("servers", Node::list(&self.servers)),
        ]
    }
}

/// A single path item with all its operations
#[derive(Debug, Clone, Default)]
pub struct Path {
    summary: Option<String>,
    description: Option<String>,
    get: Option<Operation>,
    put: Option<Operation>,
    post: Option<Operation>,
    delete: Option<Operation>,
    options: Option<Operation>,
    head: Option<Operation>,
    patch: Option<Operation>,
    trace: Option<Operation>,
    servers: Vec<Server>,
    parameters: Vec<Parameter>,
}

impl Path {
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

    pub fn get(mut self, operation: Operation) -> Self {
        self.get = Some(operation);
        self
    }

    pub fn put(mut self, operation: Operation) -> Self {
        self.put = Some(operation);
        self
    }

    pub fn post(mut self, operation: Operation) -> Self {
        self.post = Some(operation);
        self
    }

    pub fn delete(mut self, operation: Operation) -> Self {
        self.delete = Some(operation);
        self
    }

    pub fn options(mut self, operation: Operation) -> Self {
        self.options = Some(operation);
        self
    }

    pub fn head(mut self, operation: Operation) -> Self {
        self.head = Some(operation);
        self
    }

    pub fn patch(mut self, operation: Operation) -> Self {
        self.patch = Some(operation);
        self
    }

    pub fn trace(mut self, operation: Operation) -> Self {
        self.trace = Some(operation);
        self
    }

    pub fn server(mut self, server: Server) -> Self {
        self.servers.push(server);
        self
    }

    pub fn servers(mut self, servers: Vec<Server>) -> Self {
        self.servers = servers;
        self
    }

    /// Adds a parameter shared by every operation under this path.
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn parameters(mut self, parameters: Vec<Parameter>) -> Self {
        self.parameters = parameters;
        self
    }

    /// Replaces the shared parameters from an untyped JSON array of
    /// parameter objects. Nothing is replaced unless every element builds.
    pub fn parameters_from_value(mut self, parameters: Value) -> Result<Self> {
        let elements = match parameters {
            Value::Array(elements) => elements,
            _ => {
                return Err(BuildError::InvalidElementType {
                    collection: "parameters",
                    key: String::new(),
                    expected: "an array of Parameter objects",
                })
            }
        };

        let mut parsed = Vec::with_capacity(elements.len());
        for (index, element) in elements.into_iter().enumerate() {
            let def = serde_json::from_value::<ParameterDef>(element).map_err(|e| {
                debug!("Path parameter {} is not a parameter object: {}", index, e);
                invalid_parameter(index, "Parameter")
            })?;
            parsed.push(def.build(index)?);
        }

        self.parameters = parsed;
        Ok(self)
    }
}

impl Flatten for Path {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            ("summary", Node::optional(&self.summary)),
            ("description", Node::optional(&self.description)),
            ("get", Node::optional_entity(&self.get)),
            ("put", Node::optional_entity(&self.put)),
            ("post", Node::optional_entity(&self.post)),
            ("delete", Node::optional_entity(&self.delete)),
            ("options", Node::optional_entity(&self.options)),
            ("head", Node::optional_entity(&self.head)),
            ("patch", Node::optional_entity(&self.patch)),
            ("trace", Node::optional_entity(&self.trace)),
            ("servers", Node::list(&self.servers)),
            ("parameters", Node::list(&self.parameters)),
        ]
    }
}

/// Out-of-band requests the API may make, keyed by runtime expression
#[derive(Debug, Clone, Default)]
pub struct Callback {
    expressions: IndexMap<String, Path>,
}

impl Callback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expression(mut self, expression: impl Into<String>, path: Path) -> Self {
        self.expressions.insert(expression.into(), path);
        self
    }
}

impl Flatten for Callback {
    fn fields(&self) -> Vec<Field<'_>> {
        Vec::new()
    }

    // Keys are runtime expressions, not field names, so they bypass the
    // field-name rewrite.
    fn to_mapping(&self) -> Mapping {
        self.expressions
            .iter()
            .map(|(expression, path)| (expression.clone(), path.to_value()))
            .collect()
    }
}
