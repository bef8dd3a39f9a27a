//! Re-attaching persisted documentation to a freshly parsed tree.
//!
//! A documentation record carries the path of the element it was written
//! for. After a new parse, the matcher walks the candidate subtree in
//! depth-first pre-order, recomputes every visited path from the live nodes
//! and hands the record to the first node whose path equals the key.
//!
//! Cached paths stamped by the path builder are never trusted for the
//! comparison. A cached path that disagrees with the recomputed one is
//! logged as a warning.

use log::{debug, warn};

use crate::{
    TreeError,
    delimiters::Delimiters,
    documentation::Documentation,
    path::{live_path, node_path},
    tree::{ElementVariant, NodeId, Payload, SignatureTree},
};

/// Result of offering one documentation to a subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachOutcome {
    /// The documentation was appended to this node.
    Attached(NodeId),
    /// The documentation carries no path key.
    Unassignable,
    /// No node of the subtree has the documentation's path.
    NotFound,
}

impl AttachOutcome {
    pub fn is_attached(&self) -> bool {
        matches!(self, Self::Attached(_))
    }
}

/// Offers `documentation` to the Parameter subtree rooted at `parameter`.
///
/// Paths are computed from the root's actual position in the tree.
///
/// # Errors
///
/// Returns [`TreeError::NotA`] when `parameter` is not a Parameter.
pub fn attach<P: Payload>(
    tree: &mut SignatureTree<P>,
    delimiters: &Delimiters,
    documentation: Documentation,
    parameter: NodeId,
) -> Result<AttachOutcome, TreeError> {
    if tree.variant(parameter) != ElementVariant::Parameter {
        return Err(TreeError::NotA {
            expected: ElementVariant::Parameter.as_str(),
            found: tree.variant(parameter).as_str(),
        });
    }
    let Some(target) = documentation.signature_element_identifier() else {
        debug!("Documentation has no signature element identifier");
        return Ok(AttachOutcome::Unassignable);
    };

    let parent_path = match tree.parent(parameter) {
        Some(parent) if tree.variant(parent) == ElementVariant::Parameter => {
            live_path(tree, delimiters, parent)?
        }
        Some(parent) if tree.variant(parent) == ElementVariant::Parameters => {
            tree.element(parent).qualified_identifier().to_string()
        }
        _ => String::new(),
    };

    let found = find_in_subtree(tree, delimiters, target, &parent_path, parameter);
    Ok(place(tree, documentation, found))
}

/// Offers `documentation` to a Parameters container.
///
/// The container's own qualified identifier is compared first, then its
/// parameters are walked in declaration order with that identifier as the
/// parent path.
///
/// # Errors
///
/// Returns [`TreeError::NotA`] when `container` is not a Parameters node.
pub fn attach_to_container<P: Payload>(
    tree: &mut SignatureTree<P>,
    delimiters: &Delimiters,
    documentation: Documentation,
    container: NodeId,
) -> Result<AttachOutcome, TreeError> {
    let Some(target) = documentation.signature_element_identifier() else {
        debug!("Documentation has no signature element identifier");
        return Ok(AttachOutcome::Unassignable);
    };
    let found = find_in_container(tree, delimiters, target, container)?;
    Ok(place(tree, documentation, found))
}

/// Attaches a batch of documentations to one container.
///
/// Returns the documentations that found no node, in input order.
pub fn attach_all<P: Payload>(
    tree: &mut SignatureTree<P>,
    delimiters: &Delimiters,
    documentations: impl IntoIterator<Item = Documentation>,
    container: NodeId,
) -> Result<Vec<Documentation>, TreeError> {
    let mut unmatched = Vec::new();
    for documentation in documentations {
        let found = match documentation.signature_element_identifier() {
            Some(target) => find_in_container(tree, delimiters, target, container)?,
            None => None,
        };
        match found {
            Some(node) => {
                place(tree, documentation, Some(node));
            }
            None => unmatched.push(documentation),
        }
    }
    Ok(unmatched)
}

/// Attaches a batch of documentations to one operation.
///
/// Each documentation is compared with the operation's own qualified
/// identifier, then offered to the input, the output and every exception
/// container in turn. Returns the documentations that found no node.
///
/// # Errors
///
/// Returns [`TreeError::NotA`] when `operation` is not an Operation.
pub fn attach_to_operation<P: Payload>(
    tree: &mut SignatureTree<P>,
    delimiters: &Delimiters,
    documentations: impl IntoIterator<Item = Documentation>,
    operation: NodeId,
) -> Result<Vec<Documentation>, TreeError> {
    let mut containers = vec![
        tree.input_parameters(operation)?,
        tree.output_parameters(operation)?,
    ];
    containers.extend_from_slice(tree.exceptions(operation)?);

    let mut unmatched = Vec::new();
    'documentations: for documentation in documentations {
        let Some(target) = documentation.signature_element_identifier() else {
            unmatched.push(documentation);
            continue;
        };

        if tree.element(operation).qualified_identifier() == target {
            place(tree, documentation, Some(operation));
            continue;
        }
        for &container in &containers {
            if let Some(node) = find_in_container(tree, delimiters, target, container)? {
                place(tree, documentation, Some(node));
                continue 'documentations;
            }
        }
        unmatched.push(documentation);
    }
    Ok(unmatched)
}

fn place<P: Payload>(
    tree: &mut SignatureTree<P>,
    documentation: Documentation,
    found: Option<NodeId>,
) -> AttachOutcome {
    match found {
        Some(node) => {
            // Loading persisted documentation is not an edit.
            tree.element_mut(node)
                .documentations_mut()
                .push(documentation);
            AttachOutcome::Attached(node)
        }
        None => {
            let key = documentation.signature_element_identifier();
            debug!(key:?; "No node matches documentation path");
            AttachOutcome::NotFound
        }
    }
}

fn find_in_container<P: Payload>(
    tree: &SignatureTree<P>,
    delimiters: &Delimiters,
    target: &str,
    container: NodeId,
) -> Result<Option<NodeId>, TreeError> {
    if tree.variant(container) != ElementVariant::Parameters {
        return Err(TreeError::NotA {
            expected: ElementVariant::Parameters.as_str(),
            found: tree.variant(container).as_str(),
        });
    }

    let container_path = tree.element(container).qualified_identifier();
    if container_path == target {
        return Ok(Some(container));
    }

    for &parameter in tree.parameters(container)? {
        if let Some(found) = find_in_subtree(tree, delimiters, target, container_path, parameter)
        {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

fn find_in_subtree<P: Payload>(
    tree: &SignatureTree<P>,
    delimiters: &Delimiters,
    target: &str,
    parent_path: &str,
    node: NodeId,
) -> Option<NodeId> {
    let path = node_path(tree, delimiters, parent_path, node)?;

    let cached = tree
        .element(node)
        .as_parameter()
        .and_then(|data| data.signature_element_path());
    if let Some(cached) = cached.filter(|cached| *cached != path) {
        warn!(cached, recomputed = path.as_str(); "Cached parameter path is stale");
    }

    if path == target {
        return Some(node);
    }

    tree.parameters(node)
        .ok()?
        .iter()
        .find_map(|&child| find_in_subtree(tree, delimiters, target, &path, child))
}
