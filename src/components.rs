use indexmap::IndexMap;

use crate::error::Result;
use crate::flatten::{Field, Flatten, Node};
use crate::models::{Example, Header, Link, RequestBody, Response};
use crate::operation::{Callback, Parameter};
use crate::schema::RawSchema;
use crate::security::SecurityScheme;
use crate::validation::validate_identifier;

/// Components object for reusable components.
///
/// Every registry key must match `^[A-Za-z0-9._-]+$`; registration fails
/// with `BuildError::InvalidIdentifier` otherwise and leaves the registry
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct Components {
    schemas: IndexMap<String, RawSchema>,
    responses: IndexMap<String, Response>,
    parameters: IndexMap<String, Parameter>,
    examples: IndexMap<String, Example>,
    request_bodies: IndexMap<String, RequestBody>,
    headers: IndexMap<String, Header>,
    security_schemes: IndexMap<String, SecurityScheme>,
    links: IndexMap<String, Link>,
    callbacks: IndexMap<String, Callback>,
}

fn register<T>(registry: &mut IndexMap<String, T>, name: String, value: T) -> Result<()> {
    validate_identifier(&name)?;
    registry.insert(name, value);
    Ok(())
}

impl Components {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schema(mut self, name: impl Into<String>, schema: RawSchema) -> Result<Self> {
        register(&mut self.schemas, name.into(), schema)?;
        Ok(self)
    }

    pub fn response(mut self, name: impl Into<String>, response: Response) -> Result<Self> {
        register(&mut self.responses, name.into(), response)?;
        Ok(self)
    }

    pub fn parameter(mut self, name: impl Into<String>, parameter: Parameter) -> Result<Self> {
        register(&mut self.parameters, name.into(), parameter)?;
        Ok(self)
    }

    pub fn example(mut self, name: impl Into<String>, example: Example) -> Result<Self> {
        register(&mut self.examples, name.into(), example)?;
        Ok(self)
    }

    pub fn request_body(mut self, name: impl Into<String>, body: RequestBody) -> Result<Self> {
        register(&mut self.request_bodies, name.into(), body)?;
        Ok(self)
    }

    pub fn header(mut self, name: impl Into<String>, header: Header) -> Result<Self> {
        register(&mut self.headers, name.into(), header)?;
        Ok(self)
    }

    pub fn security_scheme(
        mut self,
        name: impl Into<String>,
        scheme: SecurityScheme,
    ) -> Result<Self> {
        register(&mut self.security_schemes, name.into(), scheme)?;
        Ok(self)
    }

    pub fn link(mut self, name: impl Into<String>, link: Link) -> Result<Self> {
        register(&mut self.links, name.into(), link)?;
        Ok(self)
    }

    pub fn callback(mut self, name: impl Into<String>, callback: Callback) -> Result<Self> {
        register(&mut self.callbacks, name.into(), callback)?;
        Ok(self)
    }

    /// Registers every populated slot of `component` under its name.
    pub fn component(mut self, component: Component) -> Self {
        let Component {
            name,
            schema,
            response,
            parameter,
            example,
            request_body,
            header,
            security_scheme,
            link,
            callback,
        } = component;

        // The name was validated when the component was created.
        if let Some(schema) = schema {
            self.schemas.insert(name.clone(), schema);
        }
        if let Some(response) = response {
            self.responses.insert(name.clone(), response);
        }
        if let Some(parameter) = parameter {
            self.parameters.insert(name.clone(), parameter);
        }
        if let Some(example) = example {
            self.examples.insert(name.clone(), example);
        }
        if let Some(body) = request_body {
            self.request_bodies.insert(name.clone(), body);
        }
        if let Some(header) = header {
            self.headers.insert(name.clone(), header);
        }
        if let Some(scheme) = security_scheme {
            self.security_schemes.insert(name.clone(), scheme);
        }
        if let Some(link) = link {
            self.links.insert(name.clone(), link);
        }
        if let Some(callback) = callback {
            self.callbacks.insert(name, callback);
        }
        self
    }
}

impl Flatten for Components {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            ("schemas", Node::keyed_raw(&self.schemas)),
            ("responses", Node::keyed(&self.responses)),
            ("parameters", Node::keyed(&self.parameters)),
            ("examples", Node::keyed(&self.examples)),
            ("requestBodies", Node::keyed(&self.request_bodies)),
            ("headers", Node::keyed(&self.headers)),
            ("securitySchemes", Node::keyed(&self.security_schemes)),
            ("links", Node::keyed(&self.links)),
            ("callbacks", Node::keyed(&self.callbacks)),
        ]
    }
}

/// A named bundle of reusable definitions, registered all at once with
/// [`Components::component`].
#[derive(Debug, Clone)]
pub struct Component {
    name: String,
    schema: Option<RawSchema>,
    response: Option<Response>,
    parameter: Option<Parameter>,
    example: Option<Example>,
    request_body: Option<RequestBody>,
    header: Option<Header>,
    security_scheme: Option<SecurityScheme>,
    link: Option<Link>,
    callback: Option<Callback>,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_identifier(&name)?;
        Ok(Self {
            name,
            schema: None,
            response: None,
            parameter: None,
            example: None,
            request_body: None,
            header: None,
            security_scheme: None,
            link: None,
            callback: None,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(mut self, schema: RawSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn response(mut self, response: Response) -> Self {
        self.response = Some(response);
        self
    }

    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.parameter = Some(parameter);
        self
    }

    pub fn example(mut self, example: Example) -> Self {
        self.example = Some(example);
        self
    }

    pub fn request_body(mut self, body: RequestBody) -> Self {
        self.request_body = Some(body);
        self
    }

    pub fn header(mut self, header: Header) -> Self {
        self.header = Some(header);
        self
    }

    pub fn security_scheme(mut self, scheme: SecurityScheme) -> Self {
        self.security_scheme = Some(scheme);
        self
    }

    pub fn link(mut self, link: Link) -> Self {
        self.link = Some(link);
        self
    }

    pub fn callback(mut self, callback: Callback) -> Self {
        self.callback = Some(callback);
        self
    }
}
