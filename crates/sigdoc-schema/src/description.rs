//! Service descriptions extracted from WSDL-shaped documents.
//!
//! A [`ServiceDescription`] keeps what the documenting pipeline needs from a
//! `definitions` document: its messages with their parts, its port types
//! with their operations, and every `schema` element found under `types`.
//! Structural problems are collected and reported together.

use indexmap::IndexMap;
use log::{debug, info};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    flatten::local_type_name,
    node::SchemaNode,
    span::Span,
    xml::parse_document,
};

/// Grid name used when an operation names none.
pub const DEFAULT_THEMATIC_GRID: &str = "default";

/// One part of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    name: String,
    element: Option<String>,
    type_name: Option<String>,
}

impl Part {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            element: None,
            type_name: None,
        }
    }

    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Qualified `element` reference, if any.
    pub fn element(&self) -> Option<&str> {
        self.element.as_deref()
    }

    /// Qualified `type` reference, if any.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    /// Name under which the part's declaration is looked up: the local part
    /// of its element reference, else of its type reference, else the part
    /// name itself.
    pub fn local_name(&self) -> &str {
        self.element
            .as_deref()
            .or(self.type_name.as_deref())
            .map_or(self.name.as_str(), local_type_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    name: String,
    parts: Vec<Part>,
}

impl Message {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parts: Vec::new(),
        }
    }

    pub fn with_part(mut self, part: Part) -> Self {
        self.parts.push(part);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }
}

/// A fault of an operation, referencing its message by local name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    name: String,
    message: String,
}

impl Fault {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// An operation of a port type. Messages are referenced by local name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDecl {
    name: String,
    thematic_grid: String,
    input: Option<String>,
    output: Option<String>,
    faults: Vec<Fault>,
}

impl OperationDecl {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn thematic_grid(&self) -> &str {
        &self.thematic_grid
    }

    pub fn input(&self) -> Option<&str> {
        self.input.as_deref()
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn faults(&self) -> &[Fault] {
        &self.faults
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortType {
    name: String,
    operations: Vec<OperationDecl>,
}

impl PortType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operations(&self) -> &[OperationDecl] {
        &self.operations
    }
}

/// The interface content of one service description document.
#[derive(Debug, Clone, Default)]
pub struct ServiceDescription {
    name: Option<String>,
    target_namespace: Option<String>,
    messages: Vec<Message>,
    port_types: Vec<PortType>,
    schemas: Vec<SchemaNode>,
}

impl ServiceDescription {
    /// Reads XML text and extracts its service description.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] when the text is not well-formed XML or does
    /// not describe a service (see [`ServiceDescription::from_document`]).
    pub fn parse(source: &str) -> Result<Self, ParseError> {
        let root = parse_document(source)?;
        Self::from_document(&root)
    }

    /// Extracts a service description from a loaded `definitions` element.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] carrying every problem found: a root that is
    /// not `definitions` ([`ErrorCode::E100`]), a nameless declaration
    /// ([`ErrorCode::E101`]), an operation message without reference
    /// ([`ErrorCode::E102`]), a duplicate message or port type
    /// ([`ErrorCode::E103`]) and a reference to an undeclared message
    /// ([`ErrorCode::E200`]).
    pub fn from_document(root: &SchemaNode) -> Result<Self, ParseError> {
        if !root.is("definitions") {
            return Err(Diagnostic::error(format!(
                "expected a `definitions` root element, found `{}`",
                root.name()
            ))
            .with_code(ErrorCode::E100)
            .with_label(root.span(), ErrorCode::E100.description())
            .into());
        }

        let mut extractor = Extractor::default();
        let messages = extractor.messages(root);
        let port_types = extractor.port_types(root, &messages);
        extractor.diagnostics.finish()?;

        let schemas: Vec<SchemaNode> = root
            .children_named("types")
            .flat_map(|types| types.children_named("schema"))
            .cloned()
            .collect();

        let description = Self {
            name: root.attribute("name").map(str::to_string),
            target_namespace: root.attribute("targetNamespace").map(str::to_string),
            messages: messages.into_values().map(|(message, _)| message).collect(),
            port_types,
            schemas,
        };
        info!(
            name:? = description.name(),
            messages = description.messages.len(),
            port_types = description.port_types.len(),
            schemas = description.schemas.len();
            "Extracted service description"
        );
        Ok(description)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn target_namespace(&self) -> Option<&str> {
        self.target_namespace.as_deref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn port_types(&self) -> &[PortType] {
        &self.port_types
    }

    /// Every `schema` element under `types`, in document order.
    pub fn schemas(&self) -> &[SchemaNode] {
        &self.schemas
    }

    /// Looks a message up by local name.
    pub fn message(&self, name: &str) -> Option<&Message> {
        self.messages.iter().find(|message| message.name == name)
    }
}

#[derive(Default)]
struct Extractor {
    diagnostics: DiagnosticCollector,
}

impl Extractor {
    fn required_name<'a>(&mut self, node: &'a SchemaNode) -> Option<&'a str> {
        let name = node.attribute("name");
        if name.is_none() {
            self.diagnostics.emit(
                Diagnostic::error(format!("`{}` has no name", node.name()))
                    .with_code(ErrorCode::E101)
                    .with_label(node.span(), ErrorCode::E101.description())
                    .with_help("add a `name` attribute"),
            );
        }
        name
    }

    fn duplicate(&mut self, kind: &str, name: &str, span: Span, first: Span) {
        self.diagnostics.emit(
            Diagnostic::error(format!("{kind} `{name}` is declared twice"))
                .with_code(ErrorCode::E103)
                .with_label(span, ErrorCode::E103.description())
                .with_secondary_label(first, "first declared here"),
        );
    }

    fn messages(&mut self, root: &SchemaNode) -> IndexMap<String, (Message, Span)> {
        let mut messages: IndexMap<String, (Message, Span)> = IndexMap::new();
        for node in root.children_named("message") {
            let Some(name) = self.required_name(node) else {
                continue;
            };
            if let Some((_, first)) = messages.get(name) {
                let first = *first;
                self.duplicate("message", name, node.span(), first);
                continue;
            }

            let mut message = Message::new(name);
            for part_node in node.children_named("part") {
                let Some(part_name) = self.required_name(part_node) else {
                    continue;
                };
                let mut part = Part::new(part_name);
                if let Some(element) = part_node.attribute("element") {
                    part = part.with_element(element);
                }
                if let Some(type_name) = part_node.attribute("type") {
                    part = part.with_type(type_name);
                }
                message = message.with_part(part);
            }
            debug!(message = name, parts = message.parts.len(); "Read message");
            messages.insert(name.to_string(), (message, node.span()));
        }
        messages
    }

    fn port_types(
        &mut self,
        root: &SchemaNode,
        messages: &IndexMap<String, (Message, Span)>,
    ) -> Vec<PortType> {
        let mut port_types = Vec::new();
        let mut seen: IndexMap<String, Span> = IndexMap::new();
        for node in root.children_named("portType") {
            let Some(name) = self.required_name(node) else {
                continue;
            };
            if let Some(first) = seen.get(name) {
                let first = *first;
                self.duplicate("port type", name, node.span(), first);
                continue;
            }
            seen.insert(name.to_string(), node.span());

            let operations = node
                .children_named("operation")
                .filter_map(|operation| self.operation(operation, messages))
                .collect();
            port_types.push(PortType {
                name: name.to_string(),
                operations,
            });
        }
        port_types
    }

    fn operation(
        &mut self,
        node: &SchemaNode,
        messages: &IndexMap<String, (Message, Span)>,
    ) -> Option<OperationDecl> {
        let name = self.required_name(node)?;
        let input = node
            .children_named("input")
            .next()
            .and_then(|input| self.message_reference(input, messages));
        let output = node
            .children_named("output")
            .next()
            .and_then(|output| self.message_reference(output, messages));
        let faults = node
            .children_named("fault")
            .filter_map(|fault| {
                let message = self.message_reference(fault, messages)?;
                Some(Fault {
                    name: fault.attribute("name").unwrap_or(message.as_str()).to_string(),
                    message,
                })
            })
            .collect();

        Some(OperationDecl {
            name: name.to_string(),
            thematic_grid: thematic_grid(node)
                .unwrap_or(DEFAULT_THEMATIC_GRID)
                .to_string(),
            input,
            output,
            faults,
        })
    }

    /// Local name of the message `node` references, if it is declared.
    fn message_reference(
        &mut self,
        node: &SchemaNode,
        messages: &IndexMap<String, (Message, Span)>,
    ) -> Option<String> {
        let Some(reference) = node.attribute("message") else {
            self.diagnostics.emit(
                Diagnostic::error(format!("`{}` does not reference a message", node.name()))
                    .with_code(ErrorCode::E102)
                    .with_label(node.span(), ErrorCode::E102.description())
                    .with_help("add a `message` attribute"),
            );
            return None;
        };

        let local = local_type_name(reference);
        if !messages.contains_key(local) {
            self.diagnostics.emit(
                Diagnostic::error(format!("message `{local}` is not declared"))
                    .with_code(ErrorCode::E200)
                    .with_label(node.span(), "referenced here")
                    .with_help("declare the message or fix the reference"),
            );
            return None;
        }
        Some(local.to_string())
    }
}

/// Grid name from the operation's `thematicgrid` attribute, or from one of
/// its `documentation` elements.
fn thematic_grid(operation: &SchemaNode) -> Option<&str> {
    operation.attribute("thematicgrid").or_else(|| {
        operation
            .children_named("documentation")
            .find_map(|documentation| find_attribute(documentation, "thematicgrid"))
    })
}

fn find_attribute<'a>(node: &'a SchemaNode, key: &str) -> Option<&'a str> {
    node.attribute(key).or_else(|| {
        node.children()
            .iter()
            .find_map(|child| find_attribute(child, key))
    })
}
