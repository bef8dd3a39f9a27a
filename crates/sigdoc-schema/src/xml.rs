//! Loading XML text into a [`SchemaNode`] tree.
//!
//! Tags and attributes are read with a namespace-resolving reader. Text
//! content, comments and processing instructions are skipped: the schema
//! graph is built from element structure and attributes alone.

use log::{debug, trace};
use quick_xml::{
    NsReader,
    events::{BytesStart, Event},
    name::ResolveResult,
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    node::SchemaNode,
    span::Span,
};

/// Parse XML text into its root element.
///
/// # Errors
///
/// Returns a [`ParseError`] when the text is not well-formed XML, is empty,
/// or holds more than one root element.
pub fn parse_document(source: &str) -> Result<SchemaNode, ParseError> {
    let mut reader = NsReader::from_str(source);
    reader.config_mut().trim_text(true);
    // Closing tags are checked against the open stack below, with spans.
    reader.config_mut().check_end_names = false;

    let mut open: Vec<SchemaNode> = Vec::new();
    let mut root: Option<SchemaNode> = None;
    let mut diagnostics = DiagnosticCollector::new();

    loop {
        let start = offset(reader.buffer_position());
        let read = reader
            .read_resolved_event()
            .map(|(resolved, event)| (namespace_of(&resolved), event));
        let (namespace, event) = match read {
            Ok(pair) => pair,
            Err(err) => {
                let at = offset(reader.error_position());
                return Err(Diagnostic::error(format!("malformed XML: {err}"))
                    .with_code(ErrorCode::E001)
                    .with_label(Span::new(at..at + 1), ErrorCode::E001.description())
                    .into());
            }
        };
        let span = Span::new(start..offset(reader.buffer_position()));

        match event {
            Event::Start(tag) => {
                open.push(open_node(namespace, &tag, span)?);
            }
            Event::Empty(tag) => {
                let node = open_node(namespace, &tag, span)?;
                close_node(&mut open, &mut root, node, &mut diagnostics);
            }
            Event::End(tag) => {
                let Some(mut node) = open.pop() else {
                    return Err(Diagnostic::error("closing tag without an open element")
                        .with_code(ErrorCode::E002)
                        .with_label(span, ErrorCode::E002.description())
                        .into());
                };
                let local = tag.local_name();
                let closing = String::from_utf8_lossy(local.as_ref());
                if closing != node.name() {
                    return Err(Diagnostic::error(format!(
                        "closing tag `{closing}` does not match `{}`",
                        node.name()
                    ))
                    .with_code(ErrorCode::E002)
                    .with_label(span, ErrorCode::E002.description())
                    .with_secondary_label(node.span(), "opened here")
                    .into());
                }
                node.set_span(node.span().union(span));
                close_node(&mut open, &mut root, node, &mut diagnostics);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(
            Diagnostic::error(format!("element `{}` is never closed", unclosed.name()))
                .with_code(ErrorCode::E003)
                .with_label(unclosed.span(), ErrorCode::E003.description())
                .into(),
        );
    }

    diagnostics.finish()?;

    let root = root.ok_or_else(|| {
        Diagnostic::error("document has no root element")
            .with_code(ErrorCode::E005)
            .with_label(Span::new(0..source.len()), ErrorCode::E005.description())
    })?;
    debug!(root = root.name(), children = root.children().len(); "Loaded XML document");
    Ok(root)
}

fn offset(position: u64) -> usize {
    usize::try_from(position).unwrap_or(usize::MAX)
}

fn namespace_of(resolved: &ResolveResult<'_>) -> Option<String> {
    match resolved {
        ResolveResult::Bound(namespace) => {
            Some(String::from_utf8_lossy(namespace.as_ref()).into_owned())
        }
        ResolveResult::Unbound | ResolveResult::Unknown(_) => None,
    }
}

fn open_node(
    namespace: Option<String>,
    tag: &BytesStart<'_>,
    span: Span,
) -> Result<SchemaNode, Diagnostic> {
    let local = tag.local_name();
    let mut node = SchemaNode::new(String::from_utf8_lossy(local.as_ref())).with_span(span);
    if let Some(namespace) = namespace {
        node = node.with_namespace(namespace);
    }

    for attribute in tag.attributes() {
        let attribute = attribute.map_err(|err| malformed_attribute(err.to_string(), span))?;
        if attribute.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|err| malformed_attribute(err.to_string(), span))?;
        node = node.with_attribute(key, value.into_owned());
    }

    trace!(tag = node.name(); "Opened element");
    Ok(node)
}

fn malformed_attribute(reason: String, span: Span) -> Diagnostic {
    Diagnostic::error(format!("malformed attribute: {reason}"))
        .with_code(ErrorCode::E004)
        .with_label(span, ErrorCode::E004.description())
}

/// Hands a finished node to its parent, or makes it the document root.
fn close_node(
    open: &mut [SchemaNode],
    root: &mut Option<SchemaNode>,
    node: SchemaNode,
    diagnostics: &mut DiagnosticCollector,
) {
    if let Some(parent) = open.last_mut() {
        parent.push_child(node);
        return;
    }
    match root {
        Some(first) => diagnostics.emit(
            Diagnostic::error(format!("second root element `{}`", node.name()))
                .with_code(ErrorCode::E006)
                .with_label(node.span(), ErrorCode::E006.description())
                .with_secondary_label(first.span(), "first root element"),
        ),
        None => *root = Some(node),
    }
}
