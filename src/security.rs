//! Security schemes and requirements.
//!
//! A [`SecurityScheme`] is one of four fixed variants. The OAuth2 variant
//! nests [`OAuthFlow`]s keyed by their own flow type; once nested, a flow's
//! `type` field is removed from its mapping since the key already carries it.

use indexmap::IndexMap;
use log::debug;
use serde_json::Value;
use std::str::FromStr;

use crate::error::{BuildError, Result};
use crate::flatten::{flatten_fields, Field, Flatten, Mapping, Node};
use crate::validation::parse_enum;

/// Where an API key is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKeyLocation {
    Query,
    Header,
    Cookie,
}

impl ApiKeyLocation {
    const ALLOWED: &'static [&'static str] = &["query", "header", "cookie"];

    pub fn as_str(&self) -> &'static str {
        Self::ALLOWED[*self as usize]
    }
}

impl FromStr for ApiKeyLocation {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self> {
        Ok(match parse_enum("in", s, Self::ALLOWED)? {
            0 => Self::Query,
            1 => Self::Header,
            _ => Self::Cookie,
        })
    }
}

/// HTTP authentication schemes registered with IANA
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpAuthScheme {
    Basic,
    Bearer,
    Digest,
    Hoba,
    Mutual,
    Negotiate,
    OAuth,
    ScramSha1,
    ScramSha256,
    Vapid,
}

impl HttpAuthScheme {
    const ALLOWED: &'static [&'static str] = &[
        "basic",
        "bearer",
        "digest",
        "hoba",
        "mutual",
        "negotiate",
        "oauth",
        "scram-sha-1",
        "scram-sha-256",
        "vapid",
    ];

    const VARIANTS: [Self; 10] = [
        Self::Basic,
        Self::Bearer,
        Self::Digest,
        Self::Hoba,
        Self::Mutual,
        Self::Negotiate,
        Self::OAuth,
        Self::ScramSha1,
        Self::ScramSha256,
        Self::Vapid,
    ];

    pub fn as_str(&self) -> &'static str {
        Self::ALLOWED[*self as usize]
    }
}

impl FromStr for HttpAuthScheme {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self> {
        let index = parse_enum("scheme", s, Self::ALLOWED)?;
        Ok(Self::VARIANTS[index])
    }
}

/// The four kinds of OAuth2 flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OAuthFlowKind {
    Implicit {
        authorization_url: String,
    },
    Password {
        token_url: String,
    },
    ClientCredentials {
        token_url: String,
    },
    AuthorizationCode {
        authorization_url: String,
        token_url: String,
    },
}

impl OAuthFlowKind {
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Implicit { .. } => "implicit",
            Self::Password { .. } => "password",
            Self::ClientCredentials { .. } => "clientCredentials",
            Self::AuthorizationCode { .. } => "authorizationCode",
        }
    }
}

/// OAuth Flow Object
#[derive(Debug, Clone)]
pub struct OAuthFlow {
    kind: OAuthFlowKind,
    refresh_url: Option<String>,
    scopes: IndexMap<String, String>,
}

impl OAuthFlow {
    fn from_kind(kind: OAuthFlowKind) -> Self {
        Self {
            kind,
            refresh_url: None,
            scopes: IndexMap::new(),
        }
    }

    pub fn implicit(authorization_url: impl Into<String>) -> Self {
        Self::from_kind(OAuthFlowKind::Implicit {
            authorization_url: authorization_url.into(),
        })
    }

    pub fn password(token_url: impl Into<String>) -> Self {
        Self::from_kind(OAuthFlowKind::Password {
            token_url: token_url.into(),
        })
    }

    pub fn client_credentials(token_url: impl Into<String>) -> Self {
        Self::from_kind(OAuthFlowKind::ClientCredentials {
            token_url: token_url.into(),
        })
    }

    pub fn authorization_code(
        authorization_url: impl Into<String>,
        token_url: impl Into<String>,
    ) -> Self {
        Self::from_kind(OAuthFlowKind::AuthorizationCode {
            authorization_url: authorization_url.into(),
            token_url: token_url.into(),
        })
    }

    pub fn kind(&self) -> &OAuthFlowKind {
        &self.kind
    }

    pub fn refresh_url(mut self, url: impl Into<String>) -> Self {
        self.refresh_url = Some(url.into());
        self
    }

    pub fn scope(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.scopes.insert(name.into(), description.into());
        self
    }
}

impl Flatten for OAuthFlow {
    fn fields(&self) -> Vec<Field<'_>> {
        let (authorization_url, token_url) = match &self.kind {
            OAuthFlowKind::Implicit { authorization_url } => (Some(authorization_url), None),
            OAuthFlowKind::Password { token_url }
            | OAuthFlowKind::ClientCredentials { token_url } => (None, Some(token_url)),
            OAuthFlowKind::AuthorizationCode {
                authorization_url,
                token_url,
            } => (Some(authorization_url), Some(token_url)),
        };

        vec![
            ("type", Node::scalar(self.kind.type_tag())),
            ("authorizationUrl", Node::optional(&authorization_url.cloned())),
            ("tokenUrl", Node::optional(&token_url.cloned())),
            ("refreshUrl", Node::optional(&self.refresh_url)),
            ("scopes", Node::keyed_scalars(&self.scopes)),
        ]
    }
}

/// Variant-specific part of a security scheme
#[derive(Debug, Clone)]
pub enum SecuritySchemeKind {
    ApiKey {
        name: String,
        location: ApiKeyLocation,
    },
    Http {
        scheme: HttpAuthScheme,
        bearer_format: Option<String>,
    },
    OAuth2 {
        flows: IndexMap<&'static str, OAuthFlow>,
    },
    OpenIdConnect {
        url: String,
    },
}

impl SecuritySchemeKind {
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::ApiKey { .. } => "apiKey",
            Self::Http { .. } => "http",
            Self::OAuth2 { .. } => "oauth2",
            Self::OpenIdConnect { .. } => "openIdConnect",
        }
    }
}

/// Security scheme object
#[derive(Debug, Clone)]
pub struct SecurityScheme {
    description: Option<String>,
    kind: SecuritySchemeKind,
}

impl SecurityScheme {
    fn from_kind(kind: SecuritySchemeKind) -> Self {
        Self {
            description: None,
            kind,
        }
    }

    /// An API key scheme. `location` must be `query`, `header` or `cookie`.
    pub fn api_key(name: impl Into<String>, location: &str) -> Result<Self> {
        let location = location.parse::<ApiKeyLocation>()?;
        Ok(Self::from_kind(SecuritySchemeKind::ApiKey {
            name: name.into(),
            location,
        }))
    }

    /// An HTTP auth scheme named by its IANA token, e.g. `bearer`.
    pub fn http(scheme: &str) -> Result<Self> {
        let scheme = scheme.parse::<HttpAuthScheme>()?;
        Ok(Self::http_scheme(scheme))
    }

    pub fn http_scheme(scheme: HttpAuthScheme) -> Self {
        Self::from_kind(SecuritySchemeKind::Http {
            scheme,
            bearer_format: None,
        })
    }

    pub fn oauth2() -> Self {
        Self::from_kind(SecuritySchemeKind::OAuth2 {
            flows: IndexMap::new(),
        })
    }

    pub fn open_id_connect(url: impl Into<String>) -> Self {
        Self::from_kind(SecuritySchemeKind::OpenIdConnect { url: url.into() })
    }

    pub fn kind(&self) -> &SecuritySchemeKind {
        &self.kind
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Hint for the bearer token format. Ignored unless this is an HTTP scheme.
    pub fn bearer_format(mut self, format: impl Into<String>) -> Self {
        match &mut self.kind {
            SecuritySchemeKind::Http { bearer_format, .. } => {
                *bearer_format = Some(format.into());
            }
            other => debug!("bearerFormat ignored for {} security scheme", other.type_tag()),
        }
        self
    }

    /// Adds a flow to an OAuth2 scheme, replacing any flow of the same type.
    /// Ignored for other schemes.
    pub fn flow(mut self, flow: OAuthFlow) -> Self {
        match &mut self.kind {
            SecuritySchemeKind::OAuth2 { flows } => {
                flows.insert(flow.kind().type_tag(), flow);
            }
            other => debug!("OAuth flow ignored for {} security scheme", other.type_tag()),
        }
        self
    }
}

impl Flatten for SecurityScheme {
    fn fields(&self) -> Vec<Field<'_>> {
        let mut fields = vec![
            ("description", Node::optional(&self.description)),
            ("type", Node::scalar(self.kind.type_tag())),
        ];

        match &self.kind {
            SecuritySchemeKind::ApiKey { name, location } => {
                fields.push(("name", Node::scalar(name.clone())));
                fields.push(("in", Node::scalar(location.as_str())));
            }
            SecuritySchemeKind::Http {
                scheme,
                bearer_format,
            } => {
                fields.push(("scheme", Node::scalar(scheme.as_str())));
                fields.push(("bearerFormat", Node::optional(bearer_format)));
            }
            // Flows are attached in `to_mapping`.
            SecuritySchemeKind::OAuth2 { .. } => {}
            SecuritySchemeKind::OpenIdConnect { url } => {
                fields.push(("openIdConnectUrl", Node::scalar(url.clone())));
            }
        }

        fields
    }

    fn to_mapping(&self) -> Mapping {
        let mut mapping = flatten_fields(self.fields());

        if let SecuritySchemeKind::OAuth2 { flows } = &self.kind {
            let nested: Mapping = flows
                .iter()
                .map(|(tag, flow)| {
                    let mut flow_mapping = flow.to_mapping();
                    flow_mapping.remove("type");
                    (tag.to_string(), Value::Object(flow_mapping))
                })
                .collect();
            mapping.insert("flows".to_string(), Value::Object(nested));
        }

        mapping
    }
}

/// Security requirement object: scheme name to required scopes. Every
/// listed scheme must be satisfied.
#[derive(Debug, Clone)]
pub struct SecurityRequirement {
    schemes: IndexMap<String, Vec<String>>,
}

impl SecurityRequirement {
    pub fn new<I, S>(name: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut schemes = IndexMap::new();
        schemes.insert(name.into(), scopes.into_iter().map(Into::into).collect());
        Self { schemes }
    }

    /// Builds a requirement from untyped scopes. `scopes` must be an array of
    /// strings; any other element is rejected.
    pub fn from_value(name: impl Into<String>, scopes: &Value) -> Result<Self> {
        let name = name.into();
        let scopes = parse_scopes(&name, scopes)?;
        Ok(Self::new(name, scopes))
    }

    /// Requires another scheme alongside the existing ones.
    pub fn and<I, S>(mut self, name: impl Into<String>, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.schemes
            .insert(name.into(), scopes.into_iter().map(Into::into).collect());
        self
    }
}

fn parse_scopes(requirement: &str, scopes: &Value) -> Result<Vec<String>> {
    let elements = match scopes {
        Value::Array(elements) => elements,
        Value::Null => return Ok(Vec::new()),
        _ => {
            return Err(BuildError::InvalidScopeType {
                requirement: requirement.to_string(),
                index: 0,
            })
        }
    };

    elements
        .iter()
        .enumerate()
        .map(|(index, scope)| match scope {
            Value::String(scope) => Ok(scope.clone()),
            _ => {
                debug!("Non-string scope {} in requirement {}", scope, requirement);
                Err(BuildError::InvalidScopeType {
                    requirement: requirement.to_string(),
                    index,
                })
            }
        })
        .collect()
}

impl Flatten for SecurityRequirement {
    fn fields(&self) -> Vec<Field<'_>> {
        Vec::new()
    }

    // Scheme names are keys, and an empty scope list must still be emitted.
    fn to_mapping(&self) -> Mapping {
        self.schemes
            .iter()
            .map(|(name, scopes)| {
                let scopes = scopes.iter().cloned().map(Value::String).collect();
                (name.clone(), Value::Array(scopes))
            })
            .collect()
    }
}
