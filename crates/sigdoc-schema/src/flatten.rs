//! Schema graph flattening.
//!
//! A type declaration graph may reference itself, directly or through other
//! declarations. [`Flattener::flatten`] walks it from one node and produces
//! one path per reachable primitive leaf, in document order. A named type
//! that shows up again inside its own expansion is cut with a
//! [`RECURSION_MARKER`] leaf, which is what guarantees termination.
//!
//! ```text
//! <complexType name="Node">            :head(Node).:value(string)
//!   <element name="value" type="string"/>   ──►
//!   <element name="next"  type="Node"/>     :head(Node).:next(Node[recursion])
//! </complexType>
//! ```

use std::collections::HashSet;

use log::trace;
use sigdoc_core::delimiters::Delimiters;

use crate::node::SchemaNode;

/// Name and type used for nodes that carry none.
pub const ANONYMOUS: &str = "anonymous";

/// Type of an element whose type resolves to nothing expandable.
pub const NO_DEFINITION: &str = "no_definition";

/// Suffix appended to a type revisited within its own expansion.
pub const RECURSION_MARKER: &str = "[recursion]";

const SIMPLE_TYPE_TAG: &str = "simpleType";

const PRIMITIVE_TYPES: &[&str] = &[
    "string",
    "normalizedString",
    "token",
    "base64Binary",
    "hexBinary",
    "integer",
    "positiveInteger",
    "negativeInteger",
    "nonNegativeInteger",
    "nonPositiveInteger",
    "long",
    "unsignedLong",
    "int",
    "unsignedInt",
    "short",
    "unsignedShort",
    "byte",
    "unsignedByte",
    "decimal",
    "float",
    "double",
    "boolean",
    "duration",
    "dateTime",
    "date",
    "time",
    "gYear",
    "gYearMonth",
    "gMonth",
    "gMonthDay",
    "gDay",
    "Name",
    "QName",
    "NCName",
    "anyURI",
    "language",
    "ID",
    "IDREF",
    "IDREFS",
    "ENTITY",
    "ENTITIES",
    "NOTATION",
    "NMTOKEN",
    "NMTOKENS",
    "anyType",
    SIMPLE_TYPE_TAG,
];

/// Whether `type_name` is a built-in XML Schema type, ignoring case.
pub fn is_primitive_type(type_name: &str) -> bool {
    PRIMITIVE_TYPES
        .iter()
        .any(|primitive| primitive.eq_ignore_ascii_case(type_name))
}

/// Drops the prefix of a qualified type reference: `xsd:string` → `string`.
pub fn local_type_name(reference: &str) -> &str {
    reference
        .split_once(':')
        .map_or(reference, |(_, local)| local)
}

/// The type a node declares.
///
/// That is the local part of its `type` attribute, the `simpleType` tag for
/// an inline simple type, and [`ANONYMOUS`] otherwise.
pub fn derive_type_name(node: &SchemaNode) -> &str {
    if let Some(reference) = node.attribute("type") {
        local_type_name(reference)
    } else if node.is(SIMPLE_TYPE_TAG) {
        SIMPLE_TYPE_TAG
    } else {
        ANONYMOUS
    }
}

fn name_of(node: &SchemaNode) -> &str {
    node.attribute("name").unwrap_or(ANONYMOUS)
}

/// How flattened segments are rendered and joined.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Notation {
    /// `<namespace?>:<name>(<type>)` segments joined by `.`.
    #[default]
    Dotted,
    /// `<name><type delimiter><type>` segments joined by the path delimiter,
    /// so the result can be read back by the path parser.
    Delimited(Delimiters),
}

impl Notation {
    /// The segment for `node` typed `type_name`.
    pub fn leaf(&self, node: &SchemaNode, type_name: &str) -> String {
        let name = name_of(node);
        match self {
            Self::Dotted => {
                let namespace = node
                    .namespace()
                    .map(|namespace| format!("{namespace}:"))
                    .unwrap_or_default();
                format!("{namespace}:{name}({type_name})")
            }
            Self::Delimited(delimiters) => {
                format!("{name}{}{type_name}", delimiters.type_delimiter())
            }
        }
    }

    /// Appends `rest` below `prefix`.
    pub fn join(&self, prefix: &str, rest: &str) -> String {
        match self {
            Self::Dotted => format!("{prefix}.{rest}"),
            Self::Delimited(delimiters) => format!("{prefix}{}{rest}", delimiters.path()),
        }
    }

    /// The path of one message part, before any flattened child.
    pub fn message_root(&self, message: &str, part: &str, type_name: &str) -> String {
        match self {
            Self::Dotted => format!("{message}.{part}({type_name})"),
            Self::Delimited(delimiters) => format!(
                "{message}{}{part}{}{type_name}",
                delimiters.path(),
                delimiters.type_delimiter()
            ),
        }
    }
}

/// Flattens nodes against an ordered list of schema roots.
///
/// Named types are looked up in the roots in order; the first root holding
/// a matching declaration wins.
#[derive(Debug, Clone, Copy)]
pub struct Flattener<'a> {
    schemas: &'a [SchemaNode],
    notation: &'a Notation,
}

impl<'a> Flattener<'a> {
    pub fn new(schemas: &'a [SchemaNode], notation: &'a Notation) -> Self {
        Self { schemas, notation }
    }

    pub fn notation(&self) -> &'a Notation {
        self.notation
    }

    /// One path per primitive leaf reachable from `node`, in document order.
    pub fn flatten(&self, node: &SchemaNode) -> Vec<String> {
        let mut visited = HashSet::new();
        self.flatten_node(node, &mut visited)
    }

    /// First `element`, `complexType` or `simpleType` named `type_name`,
    /// searching each root depth-first.
    pub fn find_declaration(&self, type_name: &str) -> Option<&'a SchemaNode> {
        self.schemas
            .iter()
            .find_map(|root| find_in(root, type_name))
    }

    fn flatten_node(&self, node: &SchemaNode, visited: &mut HashSet<String>) -> Vec<String> {
        let type_name = derive_type_name(node);

        if is_primitive_type(type_name) {
            return vec![self.notation.leaf(node, type_name)];
        }

        let anonymous = type_name == ANONYMOUS;
        if !anonymous && visited.contains(type_name) {
            trace!(name = name_of(node), type_name; "Cut recursive type");
            let marked = format!("{type_name}{RECURSION_MARKER}");
            return vec![self.notation.leaf(node, &marked)];
        }

        let inserted = !anonymous && visited.insert(type_name.to_string());
        let mut declaration = None;
        let mut child_paths = Vec::new();
        if anonymous {
            for child in node.children() {
                child_paths.extend(self.flatten_node(child, visited));
            }
        } else {
            declaration = self.find_declaration(type_name);
            for child in declaration.map(SchemaNode::children).unwrap_or_default() {
                child_paths.extend(self.flatten_node(child, visited));
            }
        }
        // Siblings of the same type must still expand.
        if inserted {
            visited.remove(type_name);
        }

        if !node.is("element") {
            return child_paths;
        }

        if !child_paths.is_empty() {
            let prefix = self.notation.leaf(node, type_name);
            return child_paths
                .iter()
                .map(|child| self.notation.join(&prefix, child))
                .collect();
        }

        match declaration.filter(|declaration| declaration.is(SIMPLE_TYPE_TAG)) {
            Some(simple) => vec![self.notation.leaf(node, name_of(simple))],
            None => vec![self.notation.leaf(node, NO_DEFINITION)],
        }
    }
}

fn is_declaration(node: &SchemaNode) -> bool {
    node.is("element") || node.is("complexType") || node.is(SIMPLE_TYPE_TAG)
}

fn find_in<'a>(node: &'a SchemaNode, type_name: &str) -> Option<&'a SchemaNode> {
    if is_declaration(node) && name_of(node) == type_name {
        return Some(node);
    }
    node.children()
        .iter()
        .find_map(|child| find_in(child, type_name))
}


#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    // =========================================================================
    // Strategies
    // =========================================================================

    /// Field type references: either another declared type or a primitive.
    fn field_type_strategy(type_count: usize) -> impl Strategy<Value = String> {
        prop_oneof![
            (0..type_count).prop_map(|index| format!("T{index}")),
            Just("string".to_string()),
            Just("Missing".to_string()),
        ]
    }

    /// A schema of `T0..Tn` complex types whose fields reference each other.
    fn schema_strategy() -> impl Strategy<Value = SchemaNode> {
        (1usize..5).prop_flat_map(|type_count| {
            prop::collection::vec(
                prop::collection::vec(field_type_strategy(type_count), 0..4),
                type_count,
            )
            .prop_map(|types| {
                types.into_iter().enumerate().fold(
                    SchemaNode::new("schema"),
                    |schema, (index, fields)| {
                        let sequence = fields.into_iter().enumerate().fold(
                            SchemaNode::new("sequence"),
                            |sequence, (field, type_name)| {
                                sequence.with_child(
                                    SchemaNode::new("element")
                                        .with_attribute("name", format!("f{field}"))
                                        .with_attribute("type", type_name),
                                )
                            },
                        );
                        schema.with_child(
                            SchemaNode::new("complexType")
                                .with_attribute("name", format!("T{index}"))
                                .with_child(sequence),
                        )
                    },
                )
            })
        })
    }

    // =========================================================================
    // Property Test Functions
    // =========================================================================

    /// Flattening any generated schema terminates, and every path ends in a
    /// leaf with at most one recursion cut, placed on the last segment.
    fn check_flatten_terminates(schema: SchemaNode) -> Result<(), TestCaseError> {
        let schemas = [schema];
        let notation = Notation::Dotted;
        let flattener = Flattener::new(&schemas, &notation);
        let root = SchemaNode::new("element")
            .with_attribute("name", "root")
            .with_attribute("type", "T0");

        for path in flattener.flatten(&root) {
            prop_assert!(path.ends_with(')'), "path `{}` is not a leaf", path);
            let cuts = path.matches(RECURSION_MARKER).count();
            prop_assert!(cuts <= 1, "path `{}` cut twice", path);
            if cuts == 1 {
                let last = path.rsplit('.').next().unwrap_or_default();
                prop_assert!(last.contains(RECURSION_MARKER));
            }
        }
        Ok(())
    }

    /// No type occurs twice along one path unless the second occurrence is
    /// the recursion cut.
    fn check_types_unique_per_branch(schema: SchemaNode) -> Result<(), TestCaseError> {
        let schemas = [schema];
        let notation = Notation::Dotted;
        let flattener = Flattener::new(&schemas, &notation);
        let root = SchemaNode::new("element")
            .with_attribute("name", "root")
            .with_attribute("type", "T0");

        for path in flattener.flatten(&root) {
            let mut seen = HashSet::new();
            for segment in path.split('.') {
                let Some(type_name) = segment
                    .split_once('(')
                    .map(|(_, rest)| rest.trim_end_matches(')'))
                else {
                    continue;
                };
                if type_name.ends_with(RECURSION_MARKER) {
                    continue;
                }
                if type_name.starts_with('T') {
                    prop_assert!(seen.insert(type_name.to_string()), "`{}` repeats", path);
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Proptest Wrappers
    // =========================================================================

    proptest! {
        #[test]
        fn flatten_terminates(schema in schema_strategy()) {
            check_flatten_terminates(schema)?;
        }

        #[test]
        fn types_unique_per_branch(schema in schema_strategy()) {
            check_types_unique_per_branch(schema)?;
        }
    }
}
