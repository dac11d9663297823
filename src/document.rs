use indexmap::IndexMap;
use log::debug;

use crate::components::Components;
use crate::error::Result;
use crate::flatten::{Field, Flatten, Node};
use crate::models::{ExternalDocumentation, Info, Server, Tag};
use crate::operation::Path;
use crate::security::SecurityRequirement;
use crate::validation::validate_path_key;

/// OpenAPI version used by [`OpenApi::with_default_version`].
pub const OPENAPI_VERSION: &str = "3.0.3";

/// Represents a complete OpenAPI 3.x document
#[derive(Debug, Clone)]
pub struct OpenApi {
    openapi: String,
    info: Info,
    paths: IndexMap<String, Path>,
    servers: Vec<Server>,
    components: Option<Components>,
    security: Vec<SecurityRequirement>,
    tags: Vec<Tag>,
    external_docs: Option<ExternalDocumentation>,
}

impl OpenApi {
    /// Creates a document. Every path key must start with `/`; the whole set
    /// is checked up front and a single bad key rejects the call. Values are
    /// `Path` by type, so no per-value check is needed.
    pub fn new<I, K>(version: impl Into<String>, info: Info, paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Path)>,
        K: Into<String>,
    {
        let paths: IndexMap<String, Path> = paths
            .into_iter()
            .map(|(key, path)| (key.into(), path))
            .collect();

        for key in paths.keys() {
            validate_path_key(key)?;
        }
        debug!("Created OpenAPI document with {} paths", paths.len());

        Ok(Self {
            openapi: version.into(),
            info,
            paths,
            servers: Vec::new(),
            components: None,
            security: Vec::new(),
            tags: Vec::new(),
            external_docs: None,
        })
    }

    /// Like [`OpenApi::new`] with the version set to [`OPENAPI_VERSION`].
    pub fn with_default_version<I, K>(info: Info, paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Path)>,
        K: Into<String>,
    {
        Self::new(OPENAPI_VERSION, info, paths)
    }

    pub fn version(&self) -> &str {
        &self.openapi
    }

    pub fn server(mut self, server: Server) -> Self {
        self.servers.push(server);
        self
    }

    pub fn components(mut self, components: Components) -> Self {
        self.components = Some(components);
        self
    }

    pub fn security_requirement(mut self, requirement: SecurityRequirement) -> Self {
        self.security.push(requirement);
        self
    }

    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn external_docs(mut self, docs: ExternalDocumentation) -> Self {
        self.external_docs = Some(docs);
        self
    }
}

impl Flatten for OpenApi {
    fn fields(&self) -> Vec<Field<'_>> {
        vec![
            ("openapi", Node::scalar(self.openapi.clone())),
            ("info", Node::entity(&self.info)),
            ("paths", Node::keyed(&self.paths)),
            ("servers", Node::list(&self.servers)),
            ("components", Node::optional_entity(&self.components)),
            ("security", Node::list(&self.security)),
            ("tags", Node::list(&self.tags)),
            ("externalDocs", Node::optional_entity(&self.external_docs)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BuildError;
    use crate::operation::Operation;
    use serde_json::json;

    #[test]
    fn test_rejects_path_without_leading_slash() {
        let err = OpenApi::new(
            "3.0.0",
            Info::new("Pet Store", "1.0.0"),
            [("/pets", Path::new()), ("items", Path::new())],
        )
        .unwrap_err();

        assert!(matches!(
            err,
            BuildError::InvalidPathEntry { ref path, .. } if path == "items"
        ));
    }

    #[test]
    fn test_default_version() {
        let doc = OpenApi::with_default_version(
            Info::new("Pet Store", "1.0.0"),
            Vec::<(String, Path)>::new(),
        )
        .unwrap();
        assert_eq!(doc.version(), OPENAPI_VERSION);
        assert_eq!(
            doc.to_value(),
            json!({"openapi": "3.0.3", "info": {"title": "Pet Store", "version": "1.0.0"}})
        );
    }

    #[test]
    fn test_root_collections() {
        let doc = OpenApi::new(
            "3.0.0",
            Info::new("Pet Store", "1.0.0"),
            [("/pets", Path::new().get(Operation::new()))],
        )
        .unwrap()
        .server(Server::new("https://api.example.com/v1"))
        .tag(Tag::new("pets"))
        .security_requirement(SecurityRequirement::new("api_key", Vec::<String>::new()))
        .external_docs(ExternalDocumentation::new("https://example.com/docs"));

        let value = doc.to_value();
        assert_eq!(value["servers"], json!([{"url": "https://api.example.com/v1"}]));
        assert_eq!(value["tags"], json!([{"name": "pets"}]));
        assert_eq!(value["security"], json!([{"api_key": []}]));
        assert_eq!(value["externalDocs"], json!({"url": "https://example.com/docs"}));
        assert!(value.get("components").is_none());
    }
}
