//! Signature element paths.
//!
//! A path addresses one Parameter inside an artifact by joining one segment
//! per ancestor parameter, each segment being the qualified identifier and
//! the qualified type name separated by the type delimiter:
//!
//! ```text
//! GetQuoteRequest;range+DateRange;from+date
//! └──container──┘ └───segment───┘ └segment┘
//! ```
//!
//! Paths are stamped on parameters after a tree is built and recomputed live
//! when documentation is re-attached, so both sides must use
//! [`compose_path`].

use log::{debug, trace};

use crate::{
    TreeError,
    delimiters::Delimiters,
    tree::{ElementVariant, NodeId, Payload, SignatureTree},
};

/// Appends one segment to `parent_path`.
///
/// The path delimiter is only inserted when `parent_path` is non-empty.
pub fn compose_path(
    delimiters: &Delimiters,
    parent_path: &str,
    qualified_identifier: &str,
    qualified_type_name: &str,
) -> String {
    let mut path = String::with_capacity(
        parent_path.len() + qualified_identifier.len() + qualified_type_name.len() + 2,
    );
    if !parent_path.is_empty() {
        path.push_str(parent_path);
        path.push_str(delimiters.path());
    }
    path.push_str(qualified_identifier);
    path.push_str(delimiters.type_delimiter());
    path.push_str(qualified_type_name);
    path
}

/// The path segment of one Parameter node, built from its live fields.
pub(crate) fn node_path<P: Payload>(
    tree: &SignatureTree<P>,
    delimiters: &Delimiters,
    parent_path: &str,
    node: NodeId,
) -> Option<String> {
    let element = tree.element(node);
    let data = element.as_parameter()?;
    Some(compose_path(
        delimiters,
        parent_path,
        element.qualified_identifier(),
        data.qualified_data_type_name(),
    ))
}

/// Stamps the path of `node` and of every nested parameter below it.
///
/// Running it twice with the same inputs yields the same strings.
///
/// # Errors
///
/// Returns [`TreeError::NotA`] when `node` is not a Parameter.
pub fn set_parameters_paths<P: Payload>(
    tree: &mut SignatureTree<P>,
    delimiters: &Delimiters,
    parent_path: &str,
    node: NodeId,
) -> Result<(), TreeError> {
    let path = node_path(tree, delimiters, parent_path, node).ok_or(TreeError::NotA {
        expected: ElementVariant::Parameter.as_str(),
        found: tree.variant(node).as_str(),
    })?;
    trace!(path = path.as_str(); "Stamped parameter path");

    let children = tree.parameters(node)?.to_vec();
    if let Some(data) = tree.element_mut(node).as_parameter_mut() {
        data.set_signature_element_path(Some(path.clone()));
    }
    for child in children {
        set_parameters_paths(tree, delimiters, &path, child)?;
    }
    Ok(())
}

/// Stamps every parameter of a Parameters container, using the container's
/// qualified identifier as the parent path.
///
/// # Errors
///
/// Returns [`TreeError::NotA`] when `container` is not a Parameters node.
pub fn set_container_paths<P: Payload>(
    tree: &mut SignatureTree<P>,
    delimiters: &Delimiters,
    container: NodeId,
) -> Result<(), TreeError> {
    if tree.variant(container) != ElementVariant::Parameters {
        return Err(TreeError::NotA {
            expected: ElementVariant::Parameters.as_str(),
            found: tree.variant(container).as_str(),
        });
    }

    let parent_path = tree.element(container).qualified_identifier().to_string();
    let parameters = tree.parameters(container)?.to_vec();
    for parameter in parameters {
        set_parameters_paths(tree, delimiters, &parent_path, parameter)?;
    }
    Ok(())
}

/// Recomputes the path of `parameter` from its ancestors without reading
/// any cached value.
///
/// # Errors
///
/// Returns [`TreeError::NotA`] when `parameter` is not a Parameter.
pub fn live_path<P: Payload>(
    tree: &SignatureTree<P>,
    delimiters: &Delimiters,
    parameter: NodeId,
) -> Result<String, TreeError> {
    if tree.variant(parameter) != ElementVariant::Parameter {
        return Err(TreeError::NotA {
            expected: ElementVariant::Parameter.as_str(),
            found: tree.variant(parameter).as_str(),
        });
    }

    let mut chain = vec![parameter];
    let mut root_path = String::new();
    for ancestor in tree.ancestors(parameter) {
        match tree.variant(ancestor) {
            ElementVariant::Parameter => chain.push(ancestor),
            ElementVariant::Parameters => {
                root_path = tree.element(ancestor).qualified_identifier().to_string();
                break;
            }
            _ => break,
        }
    }

    let path = chain.into_iter().rev().fold(root_path, |parent, node| {
        node_path(tree, delimiters, &parent, node).unwrap_or(parent)
    });
    Ok(path)
}

/// Identifier and type name of one path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathElement<'a> {
    qualified_identifier: &'a str,
    qualified_type_name: Option<&'a str>,
}

impl<'a> PathElement<'a> {
    pub fn qualified_identifier(&self) -> &'a str {
        self.qualified_identifier
    }

    /// `None` when the segment carried no type delimiter.
    pub fn qualified_type_name(&self) -> Option<&'a str> {
        self.qualified_type_name
    }
}

/// Splits one segment on the first type delimiter.
///
/// A segment without a type delimiter is taken as a bare identifier.
pub fn parse_path_element<'a>(delimiters: &Delimiters, segment: &'a str) -> PathElement<'a> {
    let type_delimiter = delimiters.type_delimiter();
    match segment.split_once(type_delimiter) {
        Some((identifier, type_name)) if !type_delimiter.is_empty() => PathElement {
            qualified_identifier: identifier,
            qualified_type_name: Some(type_name),
        },
        _ => {
            debug!(segment; "Path segment without type delimiter");
            PathElement {
                qualified_identifier: segment,
                qualified_type_name: None,
            }
        }
    }
}

/// Splits a full path into its segments.
pub fn split_path<'a>(delimiters: &Delimiters, path: &'a str) -> Vec<&'a str> {
    if path.is_empty() {
        return Vec::new();
    }
    path.split(delimiters.path()).collect()
}

/// Local part of a qualified name: the text after the last namespace
/// delimiter, or the whole name when there is none.
pub fn local_identifier<'a>(delimiters: &Delimiters, qualified: &'a str) -> &'a str {
    let namespace = delimiters.namespace();
    if namespace.is_empty() {
        return qualified;
    }
    qualified
        .rsplit_once(namespace)
        .map_or(qualified, |(_, local)| local)
}

/// Checks that every parameter of `container` carries the path it would get
/// if stamped now.
///
/// # Errors
///
/// Returns [`TreeError::StalePath`] for the first parameter whose cached
/// path is missing or differs, in pre-order.
pub fn verify_cached_paths<P: Payload>(
    tree: &SignatureTree<P>,
    delimiters: &Delimiters,
    container: NodeId,
) -> Result<(), TreeError> {
    for node in tree.descendants(container) {
        let Some(data) = tree.element(node).as_parameter() else {
            continue;
        };
        let recomputed = live_path(tree, delimiters, node)?;
        let cached = data.signature_element_path().unwrap_or_default();
        if cached != recomputed {
            return Err(TreeError::StalePath {
                node: tree.element(node).qualified_identifier().to_string(),
                cached: cached.to_string(),
                recomputed,
            });
        }
    }
    Ok(())
}

/// Prepares a tree for write-back.
///
/// Re-stamps the paths of every Parameters container, then rewrites the key
/// of every documentation from the live node it is attached to: a Parameter
/// uses its path, any other element its qualified identifier.
pub fn refresh_documentation_keys<P: Payload>(
    tree: &mut SignatureTree<P>,
    delimiters: &Delimiters,
) -> Result<(), TreeError> {
    let nodes = tree.descendants(tree.root());

    for &node in &nodes {
        if tree.variant(node) == ElementVariant::Parameters {
            set_container_paths(tree, delimiters, node)?;
        }
    }

    let mut refreshed = 0usize;
    for node in nodes {
        if tree.element(node).documentations().is_empty() {
            continue;
        }
        let element = tree.element(node);
        let key = match element.as_parameter() {
            Some(data) => data.signature_element_path().map(str::to_string),
            None => Some(element.qualified_identifier().to_string()),
        };
        for documentation in tree.element_mut(node).documentations_mut() {
            documentation.set_signature_element_identifier(key.clone());
            refreshed += 1;
        }
    }

    debug!(refreshed; "Refreshed documentation keys");
    Ok(())
}
