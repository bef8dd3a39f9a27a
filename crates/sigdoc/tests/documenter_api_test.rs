//! Integration tests for the Documenter API

use sigdoc::{
    Documenter, FAULT_MESSAGE_CATEGORY, INPUT_MESSAGE_CATEGORY, OPERATION_CATEGORY,
    OUTPUT_MESSAGE_CATEGORY, PORT_TYPE_CATEGORY, SigdocError,
    config::{AppConfig, DelimitersConfig, FlattenConfig, NotationKind},
    documentation::{Addressee, Documentation, ThematicRole},
    tree::{ElementVariant, NodeId, SignatureTree},
};

const STOCK: &str = r#"
    <definitions name="StockQuote" targetNamespace="urn:stock">
      <types>
        <schema>
          <complexType name="DateRange">
            <sequence>
              <element name="from" type="date"/>
              <element name="to" type="date"/>
            </sequence>
          </complexType>
        </schema>
      </types>
      <message name="GetQuoteRequest">
        <part name="symbol" type="xsd:string"/>
        <part name="range" type="tns:DateRange"/>
      </message>
      <message name="GetQuoteResponse">
        <part name="price" type="xsd:decimal"/>
      </message>
      <message name="UnknownSymbol">
        <part name="symbol" type="xsd:string"/>
      </message>
      <portType name="StockQuotePortType">
        <operation name="getQuote" thematicgrid="transfer">
          <input message="tns:GetQuoteRequest"/>
          <output message="tns:GetQuoteResponse"/>
          <fault name="unknown" message="tns:UnknownSymbol"/>
        </operation>
        <operation name="ping">
          <input message="tns:GetQuoteResponse"/>
        </operation>
      </portType>
    </definitions>
"#;

fn operations(tree: &SignatureTree) -> Vec<NodeId> {
    tree.descendants(tree.root())
        .into_iter()
        .filter(|&node| tree.variant(node) == ElementVariant::Operation)
        .collect()
}

fn keyed(key: &str, text: &str) -> Documentation {
    Documentation::new()
        .with_signature_element_identifier(key)
        .with_text(Addressee::new("developer", "API users"), text)
}

#[test]
fn test_documenter_api_exists() {
    let _documenter = Documenter::default();
}

#[test]
fn test_load_artifact_builds_tree() {
    let documenter = Documenter::default();
    let tree = documenter
        .load_artifact("stock.wsdl", STOCK)
        .expect("Failed to load artifact");

    let interfaces = tree.interfaces(tree.root()).unwrap();
    assert_eq!(interfaces.len(), 1);
    let interface = tree.element(interfaces[0]);
    assert_eq!(interface.identifier(), "StockQuotePortType");
    assert_eq!(interface.category(), PORT_TYPE_CATEGORY);

    let operations = operations(&tree);
    assert_eq!(operations.len(), 2);
    let get_quote = operations[0];
    let element = tree.element(get_quote);
    assert_eq!(element.identifier(), "getQuote");
    assert_eq!(element.category(), OPERATION_CATEGORY);
    assert_eq!(element.as_operation().unwrap().thematic_grid_name(), "transfer");
    assert_eq!(
        tree.element(operations[1])
            .as_operation()
            .unwrap()
            .thematic_grid_name(),
        "default"
    );

    let input = tree.input_parameters(get_quote).unwrap();
    assert_eq!(tree.element(input).identifier(), "GetQuoteRequest");
    assert_eq!(tree.element(input).category(), INPUT_MESSAGE_CATEGORY);
    // symbol, range, range.from, range.to
    assert_eq!(tree.size(input), 4);

    let output = tree.output_parameters(get_quote).unwrap();
    assert_eq!(tree.element(output).category(), OUTPUT_MESSAGE_CATEGORY);
    assert_eq!(tree.size(output), 1);

    let exceptions = tree.exceptions(get_quote).unwrap();
    assert_eq!(exceptions.len(), 1);
    assert_eq!(tree.element(exceptions[0]).category(), FAULT_MESSAGE_CATEGORY);
    assert_eq!(tree.element(exceptions[0]).identifier(), "UnknownSymbol");
}

#[test]
fn test_missing_output_keeps_empty_container() {
    let documenter = Documenter::default();
    let tree = documenter.load_artifact("stock.wsdl", STOCK).unwrap();

    let ping = operations(&tree)[1];
    let output = tree.output_parameters(ping).unwrap();
    let element = tree.element(output);
    assert_eq!(element.identifier(), "");
    assert!(!element.is_documentation_allowed());
    assert_eq!(element.category(), OUTPUT_MESSAGE_CATEGORY);
}

#[test]
fn test_load_artifact_rejects_malformed_document() {
    let documenter = Documenter::default();
    let result = documenter.load_artifact("broken.wsdl", "<definitions><message>");

    match result {
        Err(SigdocError::UnsupportedArtifact { name, err, src }) => {
            assert_eq!(name, "broken.wsdl");
            assert!(!err.diagnostics().is_empty());
            assert_eq!(src, "<definitions><message>");
        }
        other => panic!("expected an unsupported artifact, got {other:?}"),
    }
}

#[test]
fn test_load_artifact_rejects_non_service_document() {
    let documenter = Documenter::default();
    let result = documenter.load_artifact("schema.xsd", "<schema/>");

    assert!(matches!(result, Err(SigdocError::UnsupportedArtifact { .. })));
}

#[test]
fn test_attach_documentation_by_path() {
    let documenter = Documenter::default();
    let mut tree = documenter.load_artifact("stock.wsdl", STOCK).unwrap();

    let docs = vec![
        keyed("StockQuotePortType;getQuote", "Returns the latest quote."),
        keyed(
            "StockQuotePortType;getQuote;GetQuoteRequest;range+DateRange;to+date",
            "Inclusive end.",
        ),
        keyed("StockQuotePortType;getQuote;UnknownSymbol;symbol+string", "The rejected symbol."),
        keyed("StockQuotePortType;getQuote;GetQuoteRequest;ghost+string", "Lost."),
        keyed("GetQuoteRequest;symbol+string", "No operation scope."),
        Documentation::new().with_thematic_role(ThematicRole::new("Agent")),
    ];
    let unmatched = documenter.attach_documentation(&mut tree, docs).unwrap();

    let keys: Vec<_> = unmatched
        .iter()
        .map(|doc| doc.signature_element_identifier())
        .collect();
    assert_eq!(
        keys,
        [
            Some("StockQuotePortType;getQuote;GetQuoteRequest;ghost+string"),
            Some("GetQuoteRequest;symbol+string"),
            None,
        ]
    );

    let get_quote = operations(&tree)[0];
    assert_eq!(tree.element(get_quote).documentations().len(), 1);
    assert!(!tree.element(get_quote).is_documentation_changed());

    let input = tree.input_parameters(get_quote).unwrap();
    let range = tree.parameters(input).unwrap()[1];
    let to = tree.parameters(range).unwrap()[1];
    assert_eq!(tree.element(to).identifier(), "to");
    assert_eq!(tree.element(to).documentations().len(), 1);

    let fault = tree.exceptions(get_quote).unwrap()[0];
    let symbol = tree.parameters(fault).unwrap()[0];
    assert_eq!(tree.element(symbol).documentations().len(), 1);
}

#[test]
fn test_write_back_round_trip() {
    let documenter = Documenter::default();
    let mut tree = documenter.load_artifact("stock.wsdl", STOCK).unwrap();
    let interface = tree.interfaces(tree.root()).unwrap()[0];
    let ping = operations(&tree)[1];
    let ping_price = price_of(&tree, tree.input_parameters(ping).unwrap());

    tree.add_documentation(tree.root(), keyed("stale", "Quotes for listed stocks."));
    tree.add_documentation(interface, keyed("stale", "Read-only quote service."));
    tree.add_documentation(ping, keyed("stale", "Echoes a price."));
    tree.add_documentation(ping_price, keyed("stale", "The echoed price."));
    documenter
        .attach_documentation(
            &mut tree,
            vec![keyed(
                "StockQuotePortType;getQuote;GetQuoteRequest;range+DateRange;from+date",
                "Inclusive start.",
            )],
        )
        .unwrap();

    documenter.prepare_write_back(&mut tree).unwrap();
    let saved: Vec<Documentation> = tree
        .descendants(tree.root())
        .into_iter()
        .flat_map(|node| tree.element(node).documentations().to_vec())
        .collect();
    let keys: Vec<_> = saved
        .iter()
        .map(|doc| doc.signature_element_identifier())
        .collect();
    assert_eq!(
        keys,
        [
            Some("stock.wsdl"),
            Some("StockQuotePortType"),
            Some("StockQuotePortType;getQuote;GetQuoteRequest;range+DateRange;from+date"),
            Some("StockQuotePortType;ping"),
            Some("StockQuotePortType;ping;GetQuoteResponse;price+decimal"),
        ]
    );

    let mut fresh = documenter.load_artifact("stock.wsdl", STOCK).unwrap();
    let unmatched = documenter.attach_documentation(&mut fresh, saved).unwrap();
    assert!(unmatched.is_empty());

    let interface = fresh.interfaces(fresh.root()).unwrap()[0];
    assert_eq!(fresh.element(fresh.root()).documentations().len(), 1);
    assert_eq!(fresh.element(interface).documentations().len(), 1);

    let operations = operations(&fresh);
    let (get_quote, ping) = (operations[0], operations[1]);
    assert_eq!(fresh.element(ping).documentations().len(), 1);
    let ping_price = price_of(&fresh, fresh.input_parameters(ping).unwrap());
    assert_eq!(fresh.element(ping_price).documentations().len(), 1);
    let quote_price = price_of(&fresh, fresh.output_parameters(get_quote).unwrap());
    assert!(fresh.element(quote_price).documentations().is_empty());
}

fn price_of(tree: &SignatureTree, container: NodeId) -> NodeId {
    let price = tree.parameters(container).unwrap()[0];
    assert_eq!(tree.element(price).identifier(), "price");
    price
}

const TWIN_PORTS: &str = r#"
    <definitions name="Twins">
      <message name="Lookup">
        <part name="key" type="xsd:string"/>
      </message>
      <portType name="Primary">
        <operation name="get"><input message="Lookup"/></operation>
      </portType>
      <portType name="Replica">
        <operation name="get"><input message="Lookup"/></operation>
      </portType>
    </definitions>
"#;

#[test]
fn test_same_named_operations_keep_their_documentation() {
    let documenter = Documenter::default();
    let mut tree = documenter.load_artifact("twins.wsdl", TWIN_PORTS).unwrap();
    let replica_get = operations(&tree)[1];
    let replica_input = tree.input_parameters(replica_get).unwrap();
    let replica_key = tree.parameters(replica_input).unwrap()[0];
    tree.add_documentation(replica_key, keyed("stale", "Served from the replica."));

    documenter.prepare_write_back(&mut tree).unwrap();
    let saved = tree.element(replica_key).documentations().to_vec();
    assert_eq!(
        saved[0].signature_element_identifier(),
        Some("Replica;get;Lookup;key+string")
    );

    let mut fresh = documenter.load_artifact("twins.wsdl", TWIN_PORTS).unwrap();
    let unmatched = documenter.attach_documentation(&mut fresh, saved).unwrap();
    assert!(unmatched.is_empty());

    let documented: Vec<usize> = operations(&fresh)
        .into_iter()
        .map(|operation| {
            let input = fresh.input_parameters(operation).unwrap();
            let key = fresh.parameters(input).unwrap()[0];
            fresh.element(key).documentations().len()
        })
        .collect();
    assert_eq!(documented, [0, 1]);
}

#[test]
fn test_extract_metadata_with_configured_notation() {
    let config = AppConfig::new(
        DelimitersConfig::default(),
        FlattenConfig::new(NotationKind::Delimited),
    );
    let documenter = Documenter::new(config);

    let report = documenter.extract_metadata([("stock.wsdl", STOCK)]);

    assert_eq!(report.operations().len(), 2);
    let get_quote = &report.operations()[0];
    assert_eq!(
        get_quote.input_paths(),
        [
            "GetQuoteRequest;symbol+string",
            "GetQuoteRequest;range+DateRange;from+date",
            "GetQuoteRequest;range+DateRange;to+date",
        ]
    );
    assert_eq!(get_quote.output_paths(), ["GetQuoteResponse;price+decimal"]);
    assert!(report.operations()[1].output_paths().is_empty());
}

#[test]
fn test_extract_metadata_default_notation() {
    let documenter = Documenter::default();

    let report = documenter.extract_metadata([("stock.wsdl", STOCK)]);

    assert_eq!(
        report.operations()[0].output_paths(),
        ["GetQuoteResponse.price(decimal)"]
    );
}
