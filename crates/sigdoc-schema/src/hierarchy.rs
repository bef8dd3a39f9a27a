//! Rebuilding Parameter hierarchies from flattened message paths.

use log::trace;
use sigdoc_core::{
    TreeError,
    delimiters::Delimiters,
    path::{local_identifier, parse_path_element, set_container_paths, split_path},
    tree::{ElementVariant, NodeId, ParameterData, Payload, SignatureElement, SignatureTree},
};

/// Category of the parameters directly below a message container.
pub const PART_CATEGORY: &str = "Part";

/// Fills `container` with the Parameters described by `paths`.
///
/// `paths` are message paths in [`Notation::Delimited`] form. The first
/// segment names the container; every further segment is one Parameter
/// level. Segments with the same qualified identifier and type below the
/// same parent share one node. Paths are stamped once the hierarchy is
/// complete, so every leaf's path equals the input string it came from.
///
/// [`Notation::Delimited`]: crate::flatten::Notation::Delimited
///
/// # Errors
///
/// Returns [`TreeError::NotA`] when `container` is not a Parameters node.
pub fn build_message_parameters<P: Payload>(
    tree: &mut SignatureTree<P>,
    container: NodeId,
    paths: &[String],
    delimiters: &Delimiters,
) -> Result<(), TreeError> {
    if tree.variant(container) != ElementVariant::Parameters {
        return Err(TreeError::NotA {
            expected: ElementVariant::Parameters.as_str(),
            found: tree.variant(container).as_str(),
        });
    }

    let Some(first) = paths.first() else {
        return Ok(());
    };
    let message = split_path(delimiters, first)
        .first()
        .map(|segment| parse_path_element(delimiters, segment).qualified_identifier())
        .unwrap_or_default()
        .to_string();
    let element = tree.element_mut(container);
    element.set_identifier(local_identifier(delimiters, &message));
    element.set_qualified_identifier(message.as_str());
    element.set_documentation_allowed(true);

    for path in paths {
        let mut parent = container;
        for (depth, segment) in split_path(delimiters, path).into_iter().enumerate().skip(1) {
            let parsed = parse_path_element(delimiters, segment);
            let qualified_identifier = parsed.qualified_identifier();
            let qualified_type = parsed.qualified_type_name().unwrap_or_default();

            parent = match find_parameter(tree, parent, qualified_identifier, qualified_type)? {
                Some(existing) => existing,
                None => {
                    let data = ParameterData::new(local_identifier(delimiters, qualified_type))
                        .with_qualified_data_type_name(qualified_type);
                    let category = if depth == 1 { PART_CATEGORY } else { "" };
                    let parameter = SignatureElement::parameter(
                        local_identifier(delimiters, qualified_identifier),
                        data,
                    )
                    .with_qualified_identifier(qualified_identifier)
                    .with_category(category);
                    trace!(segment; "Added parameter");
                    tree.add_parameter(parent, parameter)?
                }
            };
        }
    }

    set_container_paths(tree, delimiters, container)
}

fn find_parameter<P: Payload>(
    tree: &SignatureTree<P>,
    parent: NodeId,
    qualified_identifier: &str,
    qualified_type: &str,
) -> Result<Option<NodeId>, TreeError> {
    Ok(tree.parameters(parent)?.iter().copied().find(|&child| {
        let element = tree.element(child);
        element.qualified_identifier() == qualified_identifier
            && element
                .as_parameter()
                .is_some_and(|data| data.qualified_data_type_name() == qualified_type)
    }))
}
