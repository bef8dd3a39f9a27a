//! Untyped schema graph nodes.
//!
//! A [`SchemaNode`] is one XML element with its resolved namespace, ordered
//! attributes and ordered children. Declarations reference each other by
//! name only, so the graph may be cyclic even though every node owns its
//! children.

use indexmap::IndexMap;

use crate::span::Span;

/// One element of a schema or service description document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaNode {
    name: String,
    namespace: Option<String>,
    attributes: IndexMap<String, String>,
    children: Vec<SchemaNode>,
    span: Span,
}

impl SchemaNode {
    /// Creates a node with the local tag `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn with_child(mut self, child: SchemaNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Local tag name, without prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace URI the tag resolved to, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn children(&self) -> &[SchemaNode] {
        &self.children
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// Whether the local tag equals `tag`, ignoring ASCII case.
    pub fn is(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
    }

    /// Direct children whose local tag is `tag`.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a SchemaNode> {
        self.children.iter().filter(move |child| child.is(tag))
    }

    pub(crate) fn push_child(&mut self, child: SchemaNode) {
        self.children.push(child);
    }

    pub(crate) fn set_span(&mut self, span: Span) {
        self.span = span;
    }
}
