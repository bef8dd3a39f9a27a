//! Shared fixtures for unit and property tests.

use proptest::prelude::*;

use crate::tree::{NodeId, ParameterData, SignatureElement, SignatureTree};

/// A stock quote service with one operation:
///
/// ```text
/// getQuote
/// ├── GetQuoteRequest: symbol(string), range(DateRange){from, to}, window(DateRange){from}
/// ├── GetQuoteResponse: price(decimal)
/// └── QuoteFault: reason(string)
/// ```
pub(crate) struct Sample {
    pub tree: SignatureTree,
    pub interface: NodeId,
    pub operation: NodeId,
    pub input: NodeId,
    pub output: NodeId,
    pub fault: NodeId,
    pub symbol: NodeId,
    pub range: NodeId,
    pub range_from: NodeId,
    pub window: NodeId,
    pub window_from: NodeId,
    pub price: NodeId,
}

pub(crate) fn parameter(name: &str, type_name: &str) -> SignatureElement {
    SignatureElement::parameter(name, ParameterData::new(type_name))
}

pub(crate) fn sample() -> Sample {
    let mut tree = SignatureTree::new(SignatureElement::artifact("StockQuote")).unwrap();
    let interface = tree
        .add_interface(
            tree.root(),
            SignatureElement::interface("StockQuotePortType").with_category("PortType"),
        )
        .unwrap();
    let operation = tree
        .add_operation(
            interface,
            SignatureElement::operation("getQuote", "default").with_category("Operation"),
        )
        .unwrap();

    let input = tree.input_parameters(operation).unwrap();
    *tree.element_mut(input) = SignatureElement::parameters("GetQuoteRequest")
        .with_category("InputMessage");
    let output = tree.output_parameters(operation).unwrap();
    *tree.element_mut(output) = SignatureElement::parameters("GetQuoteResponse")
        .with_category("OutputMessage");
    let fault = tree
        .add_exception(
            operation,
            SignatureElement::parameters("QuoteFault").with_category("FaultMessage"),
        )
        .unwrap();

    let symbol = tree.add_parameter(input, parameter("symbol", "string")).unwrap();
    let range = tree.add_parameter(input, parameter("range", "DateRange")).unwrap();
    let range_from = tree.add_parameter(range, parameter("from", "date")).unwrap();
    tree.add_parameter(range, parameter("to", "date")).unwrap();
    let window = tree.add_parameter(input, parameter("window", "DateRange")).unwrap();
    let window_from = tree.add_parameter(window, parameter("from", "date")).unwrap();

    let price = tree.add_parameter(output, parameter("price", "decimal")).unwrap();
    tree.add_parameter(fault, parameter("reason", "string")).unwrap();

    Sample {
        tree,
        interface,
        operation,
        input,
        output,
        fault,
        symbol,
        range,
        range_from,
        window,
        window_from,
        price,
    }
}

/// Shape of one generated parameter.
#[derive(Debug, Clone)]
pub(crate) struct ParamShape {
    pub name: String,
    pub type_name: String,
    pub children: Vec<ParamShape>,
}

fn identifier_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9]{0,8}"
}

fn type_name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("string".to_string()),
        Just("int".to_string()),
        "[A-Z][a-zA-Z]{0,8}",
    ]
}

pub(crate) fn param_strategy() -> impl Strategy<Value = ParamShape> {
    let leaf = (identifier_strategy(), type_name_strategy()).prop_map(|(name, type_name)| {
        ParamShape {
            name,
            type_name,
            children: Vec::new(),
        }
    });
    leaf.prop_recursive(3, 24, 4, |inner| {
        (
            identifier_strategy(),
            type_name_strategy(),
            prop::collection::vec(inner, 1..4),
        )
            .prop_map(|(name, type_name, children)| ParamShape {
                name,
                type_name,
                children,
            })
    })
}

/// Non-empty list of top-level parameters.
pub(crate) fn param_forest_strategy() -> impl Strategy<Value = Vec<ParamShape>> {
    prop::collection::vec(param_strategy(), 1..4)
}

/// Builds a one-operation tree whose input container holds `shapes`.
pub(crate) fn tree_from_shapes(shapes: &[ParamShape]) -> (SignatureTree, NodeId) {
    let mut tree = SignatureTree::new(SignatureElement::artifact("Generated")).unwrap();
    let interface = tree
        .add_interface(tree.root(), SignatureElement::interface("Port"))
        .unwrap();
    let operation = tree
        .add_operation(interface, SignatureElement::operation("op", "default"))
        .unwrap();
    let input = tree.input_parameters(operation).unwrap();
    tree.element_mut(input).set_identifier("Request");
    tree.element_mut(input).set_qualified_identifier("Request");

    for shape in shapes {
        add_shape(&mut tree, input, shape);
    }
    (tree, input)
}

fn add_shape(tree: &mut SignatureTree, parent: NodeId, shape: &ParamShape) {
    let id = tree
        .add_parameter(parent, parameter(&shape.name, &shape.type_name))
        .unwrap();
    for child in &shape.children {
        add_shape(tree, id, child);
    }
}
