//! Collecting thematic roles already assigned around an element.
//!
//! When an editor documents one element of an operation, the roles already
//! used by that operation, its parameters and the enclosing interfaces are
//! needed to recommend the remaining ones of the thematic grid.

use std::collections::BTreeSet;

use log::trace;

use crate::{
    documentation::ThematicRole,
    tree::{ElementVariant, NodeId, Payload, SignatureTree},
};

/// Which container of its operation a parameter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Input,
    Output,
    Exception,
}

/// The nearest Operation at or above `node`.
pub fn find_operation<P: Payload>(tree: &SignatureTree<P>, node: NodeId) -> Option<NodeId> {
    std::iter::once(node)
        .chain(tree.ancestors(node))
        .find(|&id| tree.variant(id) == ElementVariant::Operation)
}

/// Tells whether `node` sits in the input, the output or an exception
/// container of its operation.
///
/// Returns `None` for nodes that are not a Parameters container or a
/// Parameter below one.
pub fn parameter_kind<P: Payload>(tree: &SignatureTree<P>, node: NodeId) -> Option<ParameterKind> {
    let container = std::iter::once(node)
        .chain(tree.ancestors(node))
        .take_while(|&id| {
            matches!(
                tree.variant(id),
                ElementVariant::Parameter | ElementVariant::Parameters
            )
        })
        .find(|&id| tree.variant(id) == ElementVariant::Parameters)?;
    let operation = tree.parent(container)?;

    if tree.input_parameters(operation).ok()? == container {
        Some(ParameterKind::Input)
    } else if tree.output_parameters(operation).ok()? == container {
        Some(ParameterKind::Output)
    } else {
        Some(ParameterKind::Exception)
    }
}

/// Roles on `node` and every ancestor, stopping below the Artifact.
pub fn collect_roles_upward<P: Payload>(
    tree: &SignatureTree<P>,
    node: NodeId,
) -> BTreeSet<ThematicRole> {
    let mut roles = BTreeSet::new();
    let chain = std::iter::once(node)
        .chain(tree.ancestors(node))
        .take_while(|&id| tree.variant(id) != ElementVariant::Artifact);
    for id in chain {
        add_roles(tree, id, &mut roles);
    }
    roles
}

/// Roles on `node` and every descendant.
///
/// For an Operation this covers the input, the output and every exception
/// container.
pub fn collect_roles_downward<P: Payload>(
    tree: &SignatureTree<P>,
    node: NodeId,
) -> BTreeSet<ThematicRole> {
    let mut roles = BTreeSet::new();
    for id in tree.descendants(node) {
        add_roles(tree, id, &mut roles);
    }
    roles
}

/// All roles associated with the operation enclosing `node`.
///
/// This is the union of the roles above the operation (its parent up to,
/// not including, the Artifact) and the roles of the operation and all of
/// its parameters. A node outside any operation has no associated roles.
pub fn collect_associated_thematic_roles<P: Payload>(
    tree: &SignatureTree<P>,
    node: NodeId,
) -> BTreeSet<ThematicRole> {
    let Some(operation) = find_operation(tree, node) else {
        return BTreeSet::new();
    };

    let mut roles = match tree.parent(operation) {
        Some(parent) => collect_roles_upward(tree, parent),
        None => BTreeSet::new(),
    };
    roles.extend(collect_roles_downward(tree, operation));
    trace!(roles:?; "Collected associated thematic roles");
    roles
}

/// Whether the documentation of `operation` or of anything below it was
/// edited.
pub fn is_operation_documentation_changed<P: Payload>(
    tree: &SignatureTree<P>,
    operation: NodeId,
) -> bool {
    tree.descendants(operation)
        .into_iter()
        .any(|id| tree.element(id).is_documentation_changed())
}

fn add_roles<P: Payload>(tree: &SignatureTree<P>, id: NodeId, roles: &mut BTreeSet<ThematicRole>) {
    roles.extend(
        tree.element(id)
            .documentations()
            .iter()
            .filter_map(|doc| doc.thematic_role().cloned()),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        documentation::Documentation,
        testing::{Sample, sample},
        tree::SignatureElement,
    };

    fn role(name: &str) -> Documentation {
        Documentation::new().with_thematic_role(ThematicRole::new(name))
    }

    fn names(roles: &BTreeSet<ThematicRole>) -> Vec<&str> {
        roles.iter().map(ThematicRole::name).collect()
    }

    fn documented() -> Sample {
        let mut sample = sample();
        let root = sample.tree.root();
        sample.tree.add_documentation(root, role("ARTIFACT"));
        sample.tree.add_documentation(sample.interface, role("COMPONENT"));
        sample.tree.add_documentation(sample.operation, role("ACTION"));
        sample.tree.add_documentation(sample.range_from, role("SOURCE"));
        sample.tree.add_documentation(sample.price, role("OBJECT"));
        sample.tree.add_documentation(sample.fault, role("OBJECT"));
        sample.tree.add_documentation(sample.symbol, Documentation::new());
        sample
    }

    #[test]
    fn test_find_operation() {
        let sample = sample();
        assert_eq!(
            find_operation(&sample.tree, sample.range_from),
            Some(sample.operation)
        );
        assert_eq!(
            find_operation(&sample.tree, sample.operation),
            Some(sample.operation)
        );
        assert_eq!(find_operation(&sample.tree, sample.interface), None);
    }

    #[test]
    fn test_collect_associated_roles() {
        let sample = documented();
        let roles = collect_associated_thematic_roles(&sample.tree, sample.window_from);
        assert_eq!(names(&roles), ["ACTION", "COMPONENT", "OBJECT", "SOURCE"]);
    }

    #[test]
    fn test_associated_is_union_of_both_directions() {
        let sample = documented();
        let mut expected = collect_roles_upward(&sample.tree, sample.interface);
        expected.extend(collect_roles_downward(&sample.tree, sample.operation));

        assert_eq!(
            collect_associated_thematic_roles(&sample.tree, sample.price),
            expected
        );
    }

    #[test]
    fn test_no_operation_no_roles() {
        let sample = documented();
        assert!(collect_associated_thematic_roles(&sample.tree, sample.interface).is_empty());
    }

    #[test]
    fn test_upward_excludes_artifact() {
        let sample = documented();
        let roles = collect_roles_upward(&sample.tree, sample.operation);
        assert_eq!(names(&roles), ["ACTION", "COMPONENT"]);
    }

    #[test]
    fn test_parameter_kind() {
        let sample = sample();
        let tree = &sample.tree;
        assert_eq!(parameter_kind(tree, sample.range_from), Some(ParameterKind::Input));
        assert_eq!(parameter_kind(tree, sample.input), Some(ParameterKind::Input));
        assert_eq!(parameter_kind(tree, sample.price), Some(ParameterKind::Output));
        assert_eq!(parameter_kind(tree, sample.fault), Some(ParameterKind::Exception));
        assert_eq!(parameter_kind(tree, sample.operation), None);
        assert_eq!(parameter_kind(tree, sample.interface), None);
    }

    #[test]
    fn test_operation_documentation_changed() {
        let mut sample = sample();
        assert!(!is_operation_documentation_changed(&sample.tree, sample.operation));

        sample.tree.add_documentation(sample.window_from, role("SOURCE"));
        assert!(is_operation_documentation_changed(&sample.tree, sample.operation));

        let other = sample
            .tree
            .add_operation(
                sample.interface,
                SignatureElement::operation("listQuotes", "default"),
            )
            .unwrap();
        assert!(!is_operation_documentation_changed(&sample.tree, other));
    }
}
