//! Per-operation message path metadata.
//!
//! [`extract_metadata`] reads a batch of service description documents and
//! lists, for every operation of every port type, the flattened paths of its
//! input and output messages. A port type whose content was already seen in
//! an earlier document is reported as a duplicate instead of being listed
//! again, and documents that cannot be read are reported, not fatal.

use std::collections::HashSet;

use log::{debug, info, warn};

use crate::{
    description::{Message, PortType, ServiceDescription},
    error::ParseError,
    flatten::{Flattener, Notation, is_primitive_type},
    node::SchemaNode,
};

/// Flattened paths of every part of `message`, in part order.
///
/// A part of primitive type yields its root path alone. Other parts are
/// expanded from their declaration in `schemas`; a part whose declaration
/// cannot be found contributes nothing. A message without parts yields its
/// own name.
pub fn message_paths(
    message: &Message,
    schemas: &[SchemaNode],
    notation: &Notation,
) -> Vec<String> {
    if message.parts().is_empty() {
        return vec![message.name().to_string()];
    }

    let flattener = Flattener::new(schemas, notation);
    let mut paths = Vec::new();
    for part in message.parts() {
        let local = part.local_name();
        let root = notation.message_root(message.name(), part.name(), local);
        if is_primitive_type(local) {
            paths.push(root);
            continue;
        }

        let Some(declaration) = flattener.find_declaration(local) else {
            debug!(message = message.name(), part = part.name(), local; "Part has no declaration");
            continue;
        };
        let children = flattener.flatten(declaration);
        if children.is_empty() {
            paths.push(root);
            continue;
        }
        paths.extend(children.iter().map(|child| notation.join(&root, child)));
    }
    paths
}

/// Message paths of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationMetadata {
    id: usize,
    operation: String,
    port_type: String,
    source: String,
    input_paths: Vec<String>,
    output_paths: Vec<String>,
}

impl OperationMetadata {
    /// Sequential number across every document of one extraction.
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    pub fn port_type(&self) -> &str {
        &self.port_type
    }

    /// Name of the document the operation was read from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn input_paths(&self) -> &[String] {
        &self.input_paths
    }

    pub fn output_paths(&self) -> &[String] {
        &self.output_paths
    }
}

/// A port type skipped because identical content was already extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicatePortType {
    pub source: String,
    pub port_type: String,
}

/// A document that could not be read as a service description.
#[derive(Debug, Clone)]
pub struct UnparseableDocument {
    pub source: String,
    pub error: ParseError,
}

/// Result of one metadata extraction run.
#[derive(Debug, Clone, Default)]
pub struct MetadataReport {
    operations: Vec<OperationMetadata>,
    duplicates: Vec<DuplicatePortType>,
    failures: Vec<UnparseableDocument>,
    documents: usize,
}

impl MetadataReport {
    pub fn operations(&self) -> &[OperationMetadata] {
        &self.operations
    }

    pub fn duplicates(&self) -> &[DuplicatePortType] {
        &self.duplicates
    }

    pub fn failures(&self) -> &[UnparseableDocument] {
        &self.failures
    }

    /// Number of documents the run was given.
    pub fn documents(&self) -> usize {
        self.documents
    }
}

/// Identity of a port type's content, independent of the document it is in.
#[derive(Debug, PartialEq, Eq, Hash)]
struct Fingerprint {
    port_type: String,
    operations: Vec<String>,
    paths: Vec<String>,
}

/// Extracts operation metadata from `(name, source)` documents, in order.
pub fn extract_metadata<'a>(
    documents: impl IntoIterator<Item = (&'a str, &'a str)>,
    notation: &Notation,
) -> MetadataReport {
    let mut report = MetadataReport::default();
    let mut seen: HashSet<Fingerprint> = HashSet::new();

    for (name, source) in documents {
        report.documents += 1;
        let description = match ServiceDescription::parse(source) {
            Ok(description) => description,
            Err(error) => {
                warn!(source = name, error:% = error; "Skipping unparseable document");
                report.failures.push(UnparseableDocument {
                    source: name.to_string(),
                    error,
                });
                continue;
            }
        };

        for port_type in description.port_types() {
            let operations = port_metadata(&description, port_type, name, notation);
            let fingerprint = Fingerprint {
                port_type: port_type.name().to_string(),
                operations: operations.iter().map(|op| op.operation.clone()).collect(),
                paths: operations
                    .iter()
                    .flat_map(|op| op.input_paths.iter().chain(&op.output_paths))
                    .cloned()
                    .collect(),
            };
            if seen.contains(&fingerprint) {
                debug!(source = name, port_type = port_type.name(); "Skipping duplicate port type");
                report.duplicates.push(DuplicatePortType {
                    source: name.to_string(),
                    port_type: port_type.name().to_string(),
                });
                continue;
            }
            seen.insert(fingerprint);

            for mut metadata in operations {
                metadata.id = report.operations.len();
                report.operations.push(metadata);
            }
        }
    }

    info!(
        documents = report.documents,
        operations = report.operations.len(),
        duplicates = report.duplicates.len(),
        failures = report.failures.len();
        "Extracted operation metadata"
    );
    report
}

fn port_metadata(
    description: &ServiceDescription,
    port_type: &PortType,
    source: &str,
    notation: &Notation,
) -> Vec<OperationMetadata> {
    let paths_of = |reference: Option<&str>| {
        reference
            .and_then(|name| description.message(name))
            .map(|message| message_paths(message, description.schemas(), notation))
            .unwrap_or_default()
    };

    port_type
        .operations()
        .iter()
        .map(|operation| OperationMetadata {
            id: 0,
            operation: operation.name().to_string(),
            port_type: port_type.name().to_string(),
            source: source.to_string(),
            input_paths: paths_of(operation.input()),
            output_paths: paths_of(operation.output()),
        })
        .collect()
}
