//! Conversion of builder trees into plain JSON mappings.
//!
//! Every builder implements [`Flatten`] by listing its fields, in output
//! order, as [`Node`] slots. The one shared routine, [`flatten_fields`],
//! turns that list into a mapping:
//!
//! * absent slots are omitted, never emitted as `null`;
//! * a [`RawSchema`] is substituted verbatim;
//! * nested builders are flattened recursively;
//! * sequences and keyed collections are flattened element by element, and
//!   omitted when nothing survives. An element that is itself a collection is
//!   dropped, the walk only descends one collection level;
//! * `_` in a field name becomes `-`, so `x_logo` is emitted as `x-logo`.

use indexmap::IndexMap;
use log::trace;
use serde_json::{Map, Value};

use crate::schema::RawSchema;

/// The plain mapping produced by flattening.
pub type Mapping = Map<String, Value>;

/// A named slot of a builder, in output order.
pub type Field<'a> = (&'static str, Node<'a>);

/// Something that can be flattened into a [`Mapping`].
pub trait Flatten {
    /// The builder's fields in output order.
    fn fields(&self) -> Vec<Field<'_>>;

    fn to_mapping(&self) -> Mapping {
        flatten_fields(self.fields())
    }

    fn to_value(&self) -> Value {
        Value::Object(self.to_mapping())
    }
}

/// Flattens `entity` into a plain mapping.
pub fn flatten(entity: &dyn Flatten) -> Mapping {
    entity.to_mapping()
}

/// The value held by one field slot.
pub enum Node<'a> {
    Absent,
    Scalar(Value),
    Raw(&'a RawSchema),
    Entity(&'a dyn Flatten),
    Seq(Vec<Node<'a>>),
    Keyed(Vec<(String, Node<'a>)>),
}

impl<'a> Node<'a> {
    pub fn scalar(value: impl Into<Value>) -> Self {
        Node::Scalar(value.into())
    }

    pub fn optional<T: Clone + Into<Value>>(value: &Option<T>) -> Self {
        match value {
            Some(value) => Node::Scalar(value.clone().into()),
            None => Node::Absent,
        }
    }

    pub fn entity<T: Flatten>(entity: &'a T) -> Self {
        Node::Entity(entity)
    }

    pub fn optional_entity<T: Flatten>(entity: &'a Option<T>) -> Self {
        match entity {
            Some(entity) => Node::Entity(entity),
            None => Node::Absent,
        }
    }

    pub fn raw(schema: &'a RawSchema) -> Self {
        Node::Raw(schema)
    }

    pub fn optional_raw(schema: &'a Option<RawSchema>) -> Self {
        match schema {
            Some(schema) => Node::Raw(schema),
            None => Node::Absent,
        }
    }

    pub fn list<T: Flatten>(items: &'a [T]) -> Self {
        Node::Seq(items.iter().map(|item| Node::Entity(item)).collect())
    }

    pub fn scalars<T: Clone + Into<Value>>(items: &[T]) -> Self {
        Node::Seq(items.iter().map(|item| Node::Scalar(item.clone().into())).collect())
    }

    pub fn keyed<T: Flatten>(items: &'a IndexMap<String, T>) -> Self {
        Node::Keyed(
            items
                .iter()
                .map(|(key, item)| (key.clone(), Node::Entity(item)))
                .collect(),
        )
    }

    pub fn keyed_raw(items: &'a IndexMap<String, RawSchema>) -> Self {
        Node::Keyed(
            items
                .iter()
                .map(|(key, schema)| (key.clone(), Node::Raw(schema)))
                .collect(),
        )
    }

    pub fn keyed_scalars<T: Clone + Into<Value>>(items: &IndexMap<String, T>) -> Self {
        Node::Keyed(
            items
                .iter()
                .map(|(key, item)| (key.clone(), Node::Scalar(item.clone().into())))
                .collect(),
        )
    }

    /// Resolves a field slot. `None` means the field is left out.
    pub fn resolve(self) -> Option<Value> {
        match self {
            Node::Absent => None,
            Node::Scalar(value) => Some(value),
            Node::Raw(schema) => Some(Value::Object(schema.schema().clone())),
            Node::Entity(entity) => Some(Value::Object(entity.to_mapping())),
            Node::Seq(items) => {
                let values: Vec<Value> = items
                    .into_iter()
                    .filter_map(Node::resolve_element)
                    .collect();
                (!values.is_empty()).then_some(Value::Array(values))
            }
            Node::Keyed(entries) => {
                let mapping: Mapping = entries
                    .into_iter()
                    .filter_map(|(key, node)| node.resolve_element().map(|value| (key, value)))
                    .collect();
                (!mapping.is_empty()).then_some(Value::Object(mapping))
            }
        }
    }

    fn resolve_element(self) -> Option<Value> {
        match self {
            Node::Seq(_) | Node::Keyed(_) => {
                trace!("Dropping collection nested inside a collection");
                None
            }
            node => node.resolve(),
        }
    }
}

/// Flattens an ordered field list. This is the only flattening routine;
/// builders that need special handling post-process its result.
pub fn flatten_fields(fields: Vec<Field<'_>>) -> Mapping {
    let mut mapping = Mapping::new();
    for (name, node) in fields {
        if let Some(value) = node.resolve() {
            mapping.insert(output_key(name), value);
        }
    }
    mapping
}

fn output_key(name: &str) -> String {
    name.replace('_', "-")
}
