//! The signature element tree.
//!
//! Every parsed artifact is represented as a [`SignatureTree`]: an arena of
//! nodes addressed by [`NodeId`]. Each node owns its children by index and
//! keeps a non-owning back-reference to its parent for upward traversal.
//!
//! The structural roles are a closed set ([`ElementVariant`]):
//!
//! ```text
//! Artifact
//! └── Interface ──┬── Interface (inner)
//!                 └── Operation ──┬── Parameters (input)
//!                                 ├── Parameters (output)
//!                                 └── Parameters (exception)*
//!                                       └── Parameter
//!                                             └── Parameter*
//! ```
//!
//! Dialect specific data travels as an opaque payload `P` on every element
//! instead of one concrete type per dialect.
//!
//! # Equality
//!
//! Tree equality is structural. It compares the element fields, the
//! documentation lists and the payloads of all owned children in order. The
//! [`ElementHandle`] of a node and its parent link never take part.

use std::{fmt, iter};

use crate::{TreeError, documentation::Documentation, identifier::ElementHandle};

/// Bounds required from the dialect payload carried by every element.
pub trait Payload: Clone + PartialEq + Default + fmt::Debug {}

impl<T> Payload for T where T: Clone + PartialEq + Default + fmt::Debug {}

/// Index of a node inside one [`SignatureTree`].
///
/// A `NodeId` is only meaningful for the tree that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node {}", self.0)
    }
}

/// The structural role of a signature element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementVariant {
    Artifact,
    Interface,
    Operation,
    Parameters,
    Parameter,
}

impl ElementVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Artifact => "artifact",
            Self::Interface => "interface",
            Self::Operation => "operation",
            Self::Parameters => "parameters",
            Self::Parameter => "parameter",
        }
    }

    /// Whether an element of this variant may own a child of `child`'s variant.
    pub fn can_own(&self, child: ElementVariant) -> bool {
        matches!(
            (self, child),
            (Self::Artifact, Self::Interface)
                | (Self::Interface, Self::Interface | Self::Operation)
                | (Self::Operation, Self::Parameters)
                | (Self::Parameters, Self::Parameter)
                | (Self::Parameter, Self::Parameter)
        )
    }
}

impl fmt::Display for ElementVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar data of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OperationData {
    thematic_grid_name: String,
}

impl OperationData {
    /// Name of the thematic grid used to recommend roles for the operation.
    pub fn thematic_grid_name(&self) -> &str {
        &self.thematic_grid_name
    }

    pub fn set_thematic_grid_name(&mut self, name: impl Into<String>) {
        self.thematic_grid_name = name.into();
    }
}

/// Scalar data of a parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterData {
    data_type_name: String,
    qualified_data_type_name: String,
    signature_element_path: Option<String>,
}

impl ParameterData {
    /// Creates parameter data whose qualified type name equals `data_type_name`.
    pub fn new(data_type_name: impl Into<String>) -> Self {
        let data_type_name = data_type_name.into();
        Self {
            qualified_data_type_name: data_type_name.clone(),
            data_type_name,
            signature_element_path: None,
        }
    }

    pub fn with_qualified_data_type_name(mut self, name: impl Into<String>) -> Self {
        self.qualified_data_type_name = name.into();
        self
    }

    pub fn data_type_name(&self) -> &str {
        &self.data_type_name
    }

    pub fn qualified_data_type_name(&self) -> &str {
        &self.qualified_data_type_name
    }

    /// The path stamped by the last path builder run, if any.
    pub fn signature_element_path(&self) -> Option<&str> {
        self.signature_element_path.as_deref()
    }

    pub fn set_signature_element_path(&mut self, path: Option<String>) {
        self.signature_element_path = path;
    }
}

/// Variant specific part of a signature element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Artifact,
    Interface,
    Operation(OperationData),
    Parameters,
    Parameter(ParameterData),
}

impl ElementKind {
    pub fn variant(&self) -> ElementVariant {
        match self {
            Self::Artifact => ElementVariant::Artifact,
            Self::Interface => ElementVariant::Interface,
            Self::Operation(_) => ElementVariant::Operation,
            Self::Parameters => ElementVariant::Parameters,
            Self::Parameter(_) => ElementVariant::Parameter,
        }
    }
}

/// The content of one tree node, without its links.
///
/// Elements are built detached and then handed to a [`SignatureTree`],
/// which places them and allocates their identity.
#[derive(Debug, Clone)]
pub struct SignatureElement<P = ()> {
    identifier: String,
    qualified_identifier: String,
    category: String,
    documentation_allowed: bool,
    documentation_changed: bool,
    documentations: Vec<Documentation>,
    kind: ElementKind,
    payload: P,
}

impl<P: Payload> SignatureElement<P> {
    fn new(identifier: impl Into<String>, kind: ElementKind) -> Self {
        let identifier = identifier.into();
        Self {
            qualified_identifier: identifier.clone(),
            identifier,
            category: String::new(),
            documentation_allowed: true,
            documentation_changed: false,
            documentations: Vec::new(),
            kind,
            payload: P::default(),
        }
    }

    pub fn artifact(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Artifact)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Interface)
    }

    pub fn operation(name: impl Into<String>, thematic_grid_name: impl Into<String>) -> Self {
        Self::new(
            name,
            ElementKind::Operation(OperationData {
                thematic_grid_name: thematic_grid_name.into(),
            }),
        )
    }

    pub fn parameters(name: impl Into<String>) -> Self {
        Self::new(name, ElementKind::Parameters)
    }

    pub fn parameter(name: impl Into<String>, data: ParameterData) -> Self {
        Self::new(name, ElementKind::Parameter(data))
    }

    /// The empty container an operation starts with for its input and output.
    fn message_container() -> Self {
        Self::parameters("").with_documentation_allowed(false)
    }

    pub fn with_qualified_identifier(mut self, qualified_identifier: impl Into<String>) -> Self {
        self.qualified_identifier = qualified_identifier.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_documentation_allowed(mut self, allowed: bool) -> Self {
        self.documentation_allowed = allowed;
        self
    }

    pub fn with_documentation(mut self, documentation: Documentation) -> Self {
        self.documentations.push(documentation);
        self
    }

    pub fn with_payload(mut self, payload: P) -> Self {
        self.payload = payload;
        self
    }
}

impl<P> SignatureElement<P> {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn set_identifier(&mut self, identifier: impl Into<String>) {
        self.identifier = identifier.into();
    }

    pub fn qualified_identifier(&self) -> &str {
        &self.qualified_identifier
    }

    pub fn set_qualified_identifier(&mut self, qualified_identifier: impl Into<String>) {
        self.qualified_identifier = qualified_identifier.into();
    }

    /// Label describing the structural role in the source dialect, such as
    /// `PortType` or `InputMessage`.
    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.category = category.into();
    }

    pub fn is_documentation_allowed(&self) -> bool {
        self.documentation_allowed
    }

    pub fn set_documentation_allowed(&mut self, allowed: bool) {
        self.documentation_allowed = allowed;
    }

    pub fn is_documentation_changed(&self) -> bool {
        self.documentation_changed
    }

    pub fn set_documentation_changed(&mut self, changed: bool) {
        self.documentation_changed = changed;
    }

    pub fn documentations(&self) -> &[Documentation] {
        &self.documentations
    }

    pub fn documentations_mut(&mut self) -> &mut Vec<Documentation> {
        &mut self.documentations
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn variant(&self) -> ElementVariant {
        self.kind.variant()
    }

    pub fn as_operation(&self) -> Option<&OperationData> {
        match &self.kind {
            ElementKind::Operation(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_operation_mut(&mut self) -> Option<&mut OperationData> {
        match &mut self.kind {
            ElementKind::Operation(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_parameter(&self) -> Option<&ParameterData> {
        match &self.kind {
            ElementKind::Parameter(data) => Some(data),
            _ => None,
        }
    }

    pub fn as_parameter_mut(&mut self) -> Option<&mut ParameterData> {
        match &mut self.kind {
            ElementKind::Parameter(data) => Some(data),
            _ => None,
        }
    }

    pub fn payload(&self) -> &P {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut P {
        &mut self.payload
    }

    /// Name shown to a human editor, e.g. `symbol (Type: string) [Part]`.
    pub fn display_name(&self) -> String {
        let type_name = self.as_parameter().map(ParameterData::data_type_name);
        Self::decorate(&self.identifier, type_name, &self.category)
    }

    /// Same as [`display_name`](Self::display_name) with qualified names.
    pub fn qualified_display_name(&self) -> String {
        let type_name = self
            .as_parameter()
            .map(ParameterData::qualified_data_type_name);
        Self::decorate(&self.qualified_identifier, type_name, &self.category)
    }

    fn decorate(name: &str, type_name: Option<&str>, category: &str) -> String {
        let mut text = name.to_string();
        if let Some(type_name) = type_name {
            text.push_str(&format!(" (Type: {type_name})"));
        }
        if !category.is_empty() {
            text.push_str(&format!(" [{category}]"));
        }
        text
    }
}

impl<P: PartialEq> PartialEq for SignatureElement<P> {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier
            && self.qualified_identifier == other.qualified_identifier
            && self.category == other.category
            && self.documentation_allowed == other.documentation_allowed
            && self.documentations == other.documentations
            && self.kind == other.kind
            && self.payload == other.payload
    }
}

/// Owned children of a node, by role.
#[derive(Debug)]
enum Links {
    Artifact {
        interfaces: Vec<NodeId>,
    },
    Interface {
        operations: Vec<NodeId>,
        inner_interfaces: Vec<NodeId>,
    },
    Operation {
        input: NodeId,
        output: NodeId,
        exceptions: Vec<NodeId>,
    },
    Parameters {
        parameters: Vec<NodeId>,
    },
    Parameter {
        children: Vec<NodeId>,
    },
}

#[derive(Debug)]
struct Node<P> {
    handle: ElementHandle,
    parent: Option<NodeId>,
    element: SignatureElement<P>,
    links: Links,
}

/// Arena holding every signature element of one artifact.
///
/// The root is always an Artifact. Nodes are never removed, so a [`NodeId`]
/// stays valid for the lifetime of the tree.
///
/// # Examples
///
/// ```
/// use sigdoc_core::tree::{ParameterData, SignatureElement, SignatureTree};
///
/// let mut tree: SignatureTree = SignatureTree::new(SignatureElement::artifact("Stock")).unwrap();
/// let port = tree.add_interface(tree.root(), SignatureElement::interface("StockPort")).unwrap();
/// let op = tree.add_operation(port, SignatureElement::operation("getQuote", "default")).unwrap();
/// let input = tree.input_parameters(op).unwrap();
/// tree.add_parameter(input, SignatureElement::parameter("symbol", ParameterData::new("string")))
///     .unwrap();
///
/// assert_eq!(tree.size(op), 1);
/// assert_eq!(tree.copy(), tree);
/// ```
#[derive(Debug)]
pub struct SignatureTree<P = ()> {
    nodes: Vec<Node<P>>,
}

impl<P: Payload> SignatureTree<P> {
    /// Creates a tree rooted at `artifact`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotA`] when `artifact` is not an Artifact element.
    pub fn new(artifact: SignatureElement<P>) -> Result<Self, TreeError> {
        expect_variant(&artifact, ElementVariant::Artifact)?;
        let mut tree = Self { nodes: Vec::new() };
        tree.push(None, artifact);
        Ok(tree)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the arena, the root included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn element(&self, id: NodeId) -> &SignatureElement<P> {
        &self.nodes[id.0].element
    }

    pub fn element_mut(&mut self, id: NodeId) -> &mut SignatureElement<P> {
        &mut self.nodes[id.0].element
    }

    pub fn variant(&self, id: NodeId) -> ElementVariant {
        self.element(id).variant()
    }

    pub fn handle(&self, id: NodeId) -> ElementHandle {
        self.nodes[id.0].handle
    }

    /// Finds the node currently carrying `handle`.
    pub fn find_by_handle(&self, handle: ElementHandle) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.handle == handle)
            .map(NodeId)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Ancestors of `id`, nearest first, `id` itself excluded.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// Owned children of `id` in declaration order.
    ///
    /// An Interface lists its operations before its inner interfaces; an
    /// Operation lists input, output, then its exception containers.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match &self.nodes[id.0].links {
            Links::Artifact { interfaces } => interfaces.clone(),
            Links::Interface {
                operations,
                inner_interfaces,
            } => operations.iter().chain(inner_interfaces).copied().collect(),
            Links::Operation {
                input,
                output,
                exceptions,
            } => [*input, *output]
                .into_iter()
                .chain(exceptions.iter().copied())
                .collect(),
            Links::Parameters { parameters } => parameters.clone(),
            Links::Parameter { children } => children.clone(),
        }
    }

    /// `id` and all of its descendants in depth-first pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).into_iter().rev());
        }
        out
    }

    /// Interfaces owned by an Artifact, or inner interfaces of an Interface.
    pub fn interfaces(&self, id: NodeId) -> Result<&[NodeId], TreeError> {
        match &self.nodes[id.0].links {
            Links::Artifact { interfaces } => Ok(interfaces),
            Links::Interface {
                inner_interfaces, ..
            } => Ok(inner_interfaces),
            _ => Err(self.not_a(id, ElementVariant::Interface)),
        }
    }

    pub fn operations(&self, interface: NodeId) -> Result<&[NodeId], TreeError> {
        match &self.nodes[interface.0].links {
            Links::Interface { operations, .. } => Ok(operations),
            _ => Err(self.not_a(interface, ElementVariant::Interface)),
        }
    }

    pub fn input_parameters(&self, operation: NodeId) -> Result<NodeId, TreeError> {
        match &self.nodes[operation.0].links {
            Links::Operation { input, .. } => Ok(*input),
            _ => Err(self.not_a(operation, ElementVariant::Operation)),
        }
    }

    pub fn output_parameters(&self, operation: NodeId) -> Result<NodeId, TreeError> {
        match &self.nodes[operation.0].links {
            Links::Operation { output, .. } => Ok(*output),
            _ => Err(self.not_a(operation, ElementVariant::Operation)),
        }
    }

    pub fn exceptions(&self, operation: NodeId) -> Result<&[NodeId], TreeError> {
        match &self.nodes[operation.0].links {
            Links::Operation { exceptions, .. } => Ok(exceptions),
            _ => Err(self.not_a(operation, ElementVariant::Operation)),
        }
    }

    /// Parameters of a Parameters container, or nested parameters of a Parameter.
    pub fn parameters(&self, id: NodeId) -> Result<&[NodeId], TreeError> {
        match &self.nodes[id.0].links {
            Links::Parameters { parameters } => Ok(parameters),
            Links::Parameter { children } => Ok(children),
            _ => Err(self.not_a(id, ElementVariant::Parameters)),
        }
    }

    /// Places `element` as the last child of `parent`.
    ///
    /// An Operation is created together with its empty input and output
    /// containers.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::InvalidChild`] when `parent` cannot own an
    /// element of that variant.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        element: SignatureElement<P>,
    ) -> Result<NodeId, TreeError> {
        let parent_variant = self.variant(parent);
        let child_variant = element.variant();
        if !parent_variant.can_own(child_variant) {
            return Err(TreeError::InvalidChild {
                parent: parent_variant.as_str(),
                child: child_variant.as_str(),
            });
        }

        let id = self.push(Some(parent), element);
        match &mut self.nodes[parent.0].links {
            Links::Artifact { interfaces } => interfaces.push(id),
            Links::Interface {
                operations,
                inner_interfaces,
            } => {
                if child_variant == ElementVariant::Operation {
                    operations.push(id);
                } else {
                    inner_interfaces.push(id);
                }
            }
            Links::Operation { exceptions, .. } => exceptions.push(id),
            Links::Parameters { parameters } => parameters.push(id),
            Links::Parameter { children } => children.push(id),
        }
        Ok(id)
    }

    pub fn add_interface(
        &mut self,
        parent: NodeId,
        interface: SignatureElement<P>,
    ) -> Result<NodeId, TreeError> {
        expect_variant(&interface, ElementVariant::Interface)?;
        self.add_child(parent, interface)
    }

    pub fn add_operation(
        &mut self,
        interface: NodeId,
        operation: SignatureElement<P>,
    ) -> Result<NodeId, TreeError> {
        expect_variant(&operation, ElementVariant::Operation)?;
        self.add_child(interface, operation)
    }

    pub fn add_exception(
        &mut self,
        operation: NodeId,
        exception: SignatureElement<P>,
    ) -> Result<NodeId, TreeError> {
        expect_variant(&exception, ElementVariant::Parameters)?;
        self.add_child(operation, exception)
    }

    pub fn add_parameter(
        &mut self,
        parent: NodeId,
        parameter: SignatureElement<P>,
    ) -> Result<NodeId, TreeError> {
        expect_variant(&parameter, ElementVariant::Parameter)?;
        self.add_child(parent, parameter)
    }

    /// Appends a documentation to `id` and marks the element as changed.
    pub fn add_documentation(&mut self, id: NodeId, documentation: Documentation) {
        let element = self.element_mut(id);
        element.documentations.push(documentation);
        element.documentation_changed = true;
    }

    /// Number of Parameter nodes below `id`.
    pub fn size(&self, id: NodeId) -> usize {
        self.children(id)
            .into_iter()
            .map(|child| {
                let own = usize::from(self.variant(child) == ElementVariant::Parameter);
                own + self.size(child)
            })
            .sum()
    }

    /// Deep copy of the whole tree with fresh handles.
    pub fn copy(&self) -> Self {
        let mut copy = Self {
            nodes: Vec::with_capacity(self.nodes.len()),
        };
        let root = copy.push(None, self.element(self.root()).clone());
        self.copy_children(self.root(), &mut copy, root);
        copy
    }

    /// Deep copies the subtree at `source` into `dest` as the last child of
    /// `parent`, returning the new subtree root.
    ///
    /// # Panics
    ///
    /// Panics when `parent` in `dest` cannot own the variant of `source`.
    /// Asking for such a copy is a programming error.
    pub fn copy_subtree(&self, source: NodeId, dest: &mut Self, parent: NodeId) -> NodeId {
        let id = match dest.add_child(parent, self.element(source).clone()) {
            Ok(id) => id,
            Err(err) => panic!("cannot copy {source} under {parent}: {err}"),
        };
        self.copy_children(source, dest, id);
        id
    }

    /// Structural equality of the subtree at `id` with the subtree at
    /// `other_id` in `other`.
    pub fn subtree_eq(&self, id: NodeId, other: &Self, other_id: NodeId) -> bool {
        if self.element(id) != other.element(other_id) {
            return false;
        }
        let left = self.children(id);
        let right = other.children(other_id);
        left.len() == right.len()
            && left
                .iter()
                .zip(&right)
                .all(|(l, r)| self.subtree_eq(*l, other, *r))
    }

    fn copy_children(&self, source: NodeId, dest: &mut Self, dest_id: NodeId) {
        if let Links::Operation {
            input,
            output,
            exceptions,
        } = &self.nodes[source.0].links
        {
            // The operation's own containers already exist in `dest`.
            if let Some((dest_input, dest_output)) = dest.operation_containers(dest_id) {
                for (from, to) in [(*input, dest_input), (*output, dest_output)] {
                    dest.nodes[to.0].element = self.element(from).clone();
                    self.copy_children(from, dest, to);
                }
            }
            for exception in exceptions {
                self.copy_subtree(*exception, dest, dest_id);
            }
            return;
        }

        for child in self.children(source) {
            self.copy_subtree(child, dest, dest_id);
        }
    }

    fn operation_containers(&self, id: NodeId) -> Option<(NodeId, NodeId)> {
        match &self.nodes[id.0].links {
            Links::Operation { input, output, .. } => Some((*input, *output)),
            _ => None,
        }
    }

    fn push(&mut self, parent: Option<NodeId>, element: SignatureElement<P>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let links = match element.variant() {
            ElementVariant::Artifact => Links::Artifact {
                interfaces: Vec::new(),
            },
            ElementVariant::Interface => Links::Interface {
                operations: Vec::new(),
                inner_interfaces: Vec::new(),
            },
            ElementVariant::Operation => Links::Operation {
                input: NodeId(id.0 + 1),
                output: NodeId(id.0 + 2),
                exceptions: Vec::new(),
            },
            ElementVariant::Parameters => Links::Parameters {
                parameters: Vec::new(),
            },
            ElementVariant::Parameter => Links::Parameter {
                children: Vec::new(),
            },
        };
        let is_operation = matches!(links, Links::Operation { .. });

        self.nodes.push(Node {
            handle: ElementHandle::next(),
            parent,
            element,
            links,
        });

        if is_operation {
            for _ in 0..2 {
                self.nodes.push(Node {
                    handle: ElementHandle::next(),
                    parent: Some(id),
                    element: SignatureElement::message_container(),
                    links: Links::Parameters {
                        parameters: Vec::new(),
                    },
                });
            }
        }

        id
    }

    fn not_a(&self, id: NodeId, expected: ElementVariant) -> TreeError {
        TreeError::NotA {
            expected: expected.as_str(),
            found: self.variant(id).as_str(),
        }
    }
}

impl<P: Payload> PartialEq for SignatureTree<P> {
    fn eq(&self, other: &Self) -> bool {
        self.subtree_eq(self.root(), other, other.root())
    }
}

fn expect_variant<P>(
    element: &SignatureElement<P>,
    expected: ElementVariant,
) -> Result<(), TreeError> {
    if element.variant() == expected {
        Ok(())
    } else {
        Err(TreeError::NotA {
            expected: expected.as_str(),
            found: element.variant().as_str(),
        })
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::testing::{ParamShape, param_forest_strategy, tree_from_shapes};

    // ===================
    // Property Test Functions
    // ===================

    /// A copy is structurally equal to its source.
    fn check_copy_equals_source(shapes: &[ParamShape]) -> Result<(), TestCaseError> {
        let (tree, _) = tree_from_shapes(shapes);
        let copy = tree.copy();
        prop_assert!(copy == tree);
        prop_assert_eq!(copy.size(copy.root()), tree.size(tree.root()));
        Ok(())
    }

    /// Renaming any single parameter of the copy breaks equality.
    fn check_rename_breaks_equality(
        shapes: &[ParamShape],
        pick: prop::sample::Index,
    ) -> Result<(), TestCaseError> {
        let (tree, input) = tree_from_shapes(shapes);
        let parameters: Vec<NodeId> = tree.descendants(input).into_iter().skip(1).collect();
        let target = parameters[pick.index(parameters.len())];

        let mut copy = tree.copy();
        let renamed = format!("{}_renamed", copy.element(target).identifier());
        copy.element_mut(target).set_identifier(renamed);
        prop_assert!(copy != tree);
        Ok(())
    }

    // ===================
    // Proptest Wrappers
    // ===================

    proptest! {
        #[test]
        fn copy_equals_source(shapes in param_forest_strategy()) {
            check_copy_equals_source(&shapes)?;
        }

        #[test]
        fn rename_breaks_equality(
            shapes in param_forest_strategy(),
            pick in any::<prop::sample::Index>(),
        ) {
            check_rename_breaks_equality(&shapes, pick)?;
        }
    }
}
