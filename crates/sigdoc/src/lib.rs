//! Sigdoc - documenting service interfaces with thematic roles.
//!
//! Loads interface description documents into signature element trees,
//! re-attaches persisted documentation to them, prepares them for
//! write-back and lists the flattened message paths of every operation.

pub mod config;

mod error;

pub use sigdoc_core::{delimiters, documentation, identifier, matcher, path, roles, tree};
pub use sigdoc_schema::metadata::{MetadataReport, OperationMetadata};

pub use error::SigdocError;

use std::iter;

use log::{debug, info, trace};

use sigdoc_core::{
    delimiters::Delimiters,
    documentation::Documentation,
    matcher::attach_to_operation,
    tree::{NodeId, SignatureElement, SignatureTree},
};
use sigdoc_schema::{
    description::{Message, ServiceDescription},
    flatten::Notation,
    hierarchy::build_message_parameters,
    metadata::message_paths,
};

use config::AppConfig;

/// Category of an Interface built from a port type.
pub const PORT_TYPE_CATEGORY: &str = "PortType";
/// Category of an Operation.
pub const OPERATION_CATEGORY: &str = "Operation";
/// Category of an operation's input container.
pub const INPUT_MESSAGE_CATEGORY: &str = "InputMessage";
/// Category of an operation's output container.
pub const OUTPUT_MESSAGE_CATEGORY: &str = "OutputMessage";
/// Category of a fault container.
pub const FAULT_MESSAGE_CATEGORY: &str = "FaultMessage";

/// Entry point for loading, documenting and inspecting interface artifacts.
///
/// # Examples
///
/// ```rust
/// use sigdoc::{Documenter, config::AppConfig};
///
/// let source = r#"
///     <definitions name="Echo">
///       <message name="Ping"/>
///       <portType name="EchoPort">
///         <operation name="ping"><input message="Ping"/></operation>
///       </portType>
///     </definitions>
/// "#;
///
/// let documenter = Documenter::new(AppConfig::default());
/// let tree = documenter.load_artifact("echo.wsdl", source)
///     .expect("Failed to load artifact");
/// assert_eq!(tree.element(tree.root()).identifier(), "echo.wsdl");
/// ```
#[derive(Default)]
pub struct Documenter {
    config: AppConfig,
}

impl Documenter {
    /// Create a new documenter with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Load a service description document into a signature element tree.
    ///
    /// The artifact is named `name`. Every port type becomes an Interface,
    /// every operation an Operation whose input, output and fault containers
    /// hold the Parameter hierarchy of the referenced messages.
    ///
    /// # Errors
    ///
    /// Returns [`SigdocError::UnsupportedArtifact`] when the document is not
    /// well-formed or does not describe a service. No partial tree is
    /// returned.
    pub fn load_artifact(&self, name: &str, source: &str) -> Result<SignatureTree, SigdocError> {
        info!(artifact = name; "Loading artifact");

        let description = ServiceDescription::parse(source)
            .map_err(|err| SigdocError::new_unsupported_artifact(name, err, source))?;

        let delimiters = self.config.delimiters().interface_description();
        let mut tree = SignatureTree::new(SignatureElement::artifact(name))?;

        for port_type in description.port_types() {
            let interface = tree.add_interface(
                tree.root(),
                SignatureElement::interface(port_type.name()).with_category(PORT_TYPE_CATEGORY),
            )?;

            for declaration in port_type.operations() {
                let operation = tree.add_operation(
                    interface,
                    SignatureElement::operation(declaration.name(), declaration.thematic_grid())
                        .with_category(OPERATION_CATEGORY),
                )?;

                let input = tree.input_parameters(operation)?;
                let output = tree.output_parameters(operation)?;
                let containers = [
                    (input, declaration.input(), INPUT_MESSAGE_CATEGORY),
                    (output, declaration.output(), OUTPUT_MESSAGE_CATEGORY),
                ];
                for (container, reference, category) in containers {
                    tree.element_mut(container).set_category(category);
                    let Some(message) = reference.and_then(|name| description.message(name))
                    else {
                        continue;
                    };
                    fill_container(&mut tree, container, message, &description, delimiters)?;
                }

                for fault in declaration.faults() {
                    let Some(message) = description.message(fault.message()) else {
                        continue;
                    };
                    let container = tree.add_exception(
                        operation,
                        SignatureElement::parameters(fault.name())
                            .with_category(FAULT_MESSAGE_CATEGORY),
                    )?;
                    fill_container(&mut tree, container, message, &description, delimiters)?;
                }
                let size = tree.size(operation);
                trace!(operation = declaration.name(), size; "Built operation");
            }
        }

        info!(
            artifact = name,
            interfaces = description.port_types().len(),
            nodes = tree.node_count();
            "Artifact loaded"
        );
        Ok(tree)
    }

    /// Attach persisted documentation to `tree`.
    ///
    /// Keys are the ones written by [`Documenter::prepare_write_back`]. A key
    /// equal to the artifact's or an interface's qualified identifier
    /// documents that element. Any other key must start with the scope of one
    /// operation, `<interface><path delimiter><operation>`; the remainder is
    /// matched inside that operation only, so operations sharing a message
    /// never take each other's documentation.
    ///
    /// # Errors
    ///
    /// Returns [`SigdocError::Tree`] when the tree violates its structure.
    ///
    /// # Returns
    ///
    /// The documentations no element matched, in input order and with their
    /// keys unchanged.
    pub fn attach_documentation(
        &self,
        tree: &mut SignatureTree,
        documentations: impl IntoIterator<Item = Documentation>,
    ) -> Result<Vec<Documentation>, SigdocError> {
        let delimiters = self.config.delimiters().interface_description();
        let root = tree.root();
        let interfaces = tree.interfaces(root)?.to_vec();
        let mut scopes = Vec::new();
        for &interface in &interfaces {
            for &operation in tree.operations(interface)? {
                scopes.push((operation, operation_scope(tree, delimiters, operation)));
            }
        }

        let mut unmatched = Vec::new();
        let mut attached = 0usize;
        for mut documentation in documentations {
            let Some(key) = documentation.signature_element_identifier() else {
                unmatched.push(documentation);
                continue;
            };
            let key = key.to_string();

            let owner = iter::once(root)
                .chain(interfaces.iter().copied())
                .find(|&node| tree.element(node).qualified_identifier() == key);
            if let Some(node) = owner {
                // Loading persisted documentation is not an edit.
                tree.element_mut(node).documentations_mut().push(documentation);
                attached += 1;
                continue;
            }

            let Some((operation, inner)) = scopes.iter().find_map(|(operation, scope)| {
                unscope(delimiters, scope, &key).map(|inner| (*operation, inner))
            }) else {
                debug!(key = key.as_str(); "Documentation key names no operation");
                unmatched.push(documentation);
                continue;
            };
            let inner = inner
                .unwrap_or_else(|| tree.element(operation).qualified_identifier())
                .to_string();

            documentation.set_signature_element_identifier(Some(inner));
            let rest = attach_to_operation(tree, delimiters, [documentation], operation)?;
            if rest.is_empty() {
                attached += 1;
            }
            for mut documentation in rest {
                documentation.set_signature_element_identifier(Some(key.clone()));
                unmatched.push(documentation);
            }
        }

        debug!(attached, unmatched = unmatched.len(); "Attached documentation");
        Ok(unmatched)
    }

    /// Re-stamp paths and documentation keys before `tree` is persisted.
    ///
    /// Artifact and interface documentation is keyed by the element's
    /// qualified identifier. Documentation on an operation is keyed by the
    /// operation's scope, and documentation below it by that scope joined
    /// with the element's path.
    ///
    /// # Errors
    ///
    /// Returns [`SigdocError::Tree`] when the tree violates its structure.
    pub fn prepare_write_back(&self, tree: &mut SignatureTree) -> Result<(), SigdocError> {
        let delimiters = self.config.delimiters().interface_description();
        sigdoc_core::path::refresh_documentation_keys(tree, delimiters)?;

        let interfaces = tree.interfaces(tree.root())?.to_vec();
        for interface in interfaces {
            let operations = tree.operations(interface)?.to_vec();
            for operation in operations {
                let scope = operation_scope(tree, delimiters, operation);
                for node in tree.descendants(operation) {
                    for documentation in tree.element_mut(node).documentations_mut() {
                        let key = match documentation.signature_element_identifier() {
                            Some(_) if node == operation => scope.clone(),
                            Some(path) => format!("{scope}{}{path}", delimiters.path()),
                            None => continue,
                        };
                        documentation.set_signature_element_identifier(Some(key));
                    }
                }
            }
        }
        Ok(())
    }

    /// List the message paths of every operation in `documents`.
    ///
    /// `documents` are `(name, source)` pairs; paths use the configured
    /// notation. Unreadable documents and repeated port types are recorded
    /// in the report.
    pub fn extract_metadata<'a>(
        &self,
        documents: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> MetadataReport {
        sigdoc_schema::metadata::extract_metadata(documents, &self.config.notation())
    }
}

/// `<interface><path delimiter><operation>`, the key prefix of everything
/// documented inside `operation`.
fn operation_scope(tree: &SignatureTree, delimiters: &Delimiters, operation: NodeId) -> String {
    let interface = tree
        .parent(operation)
        .map(|parent| tree.element(parent).qualified_identifier())
        .unwrap_or_default();
    let operation = tree.element(operation).qualified_identifier();
    format!("{interface}{}{operation}", delimiters.path())
}

/// Strips `scope` from `key`.
///
/// `None` when `key` lies outside `scope`, `Some(None)` when it is the scope
/// itself.
fn unscope<'k>(delimiters: &Delimiters, scope: &str, key: &'k str) -> Option<Option<&'k str>> {
    let rest = key.strip_prefix(scope)?;
    if rest.is_empty() {
        return Some(None);
    }
    rest.strip_prefix(delimiters.path()).map(Some)
}

fn fill_container(
    tree: &mut SignatureTree,
    container: NodeId,
    message: &Message,
    description: &ServiceDescription,
    delimiters: &Delimiters,
) -> Result<(), SigdocError> {
    // Named even when no part yields a path.
    let element = tree.element_mut(container);
    element.set_identifier(message.name());
    element.set_qualified_identifier(message.name());
    element.set_documentation_allowed(true);

    let notation = Notation::Delimited(delimiters.clone());
    let paths = message_paths(message, description.schemas(), &notation);
    build_message_parameters(tree, container, &paths, delimiters)?;
    Ok(())
}
