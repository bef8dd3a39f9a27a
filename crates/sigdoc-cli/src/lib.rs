//! CLI logic for the sigdoc metadata tool.
//!
//! Reads service description documents, extracts the message paths of
//! every operation and writes them as plain text blocks.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, NotationArg};

use std::{
    fs,
    io::{self, BufWriter, Write},
};

use log::{info, warn};

use sigdoc::{Documenter, MetadataReport, OperationMetadata, SigdocError};

/// Run the sigdoc CLI application
///
/// Every input is read and handed to the metadata extraction. Inputs that
/// cannot be read or parsed, and port types already seen in an earlier
/// input, are reported as warnings and skipped.
///
/// # Errors
///
/// Returns `SigdocError` for:
/// - Configuration loading errors
/// - Output write errors
/// - No input that could be read and parsed
pub fn run(args: &Args) -> Result<(), SigdocError> {
    info!(inputs = args.inputs.len(), output_path:? = args.output; "Extracting metadata");

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(notation) = args.notation {
        app_config = app_config.with_notation(notation.into());
    }
    let documenter = Documenter::new(app_config);

    let mut documents = Vec::with_capacity(args.inputs.len());
    let mut read_error = None;
    for input in &args.inputs {
        match fs::read_to_string(input) {
            Ok(source) => documents.push((input.clone(), source)),
            Err(err) => {
                warn!(input = input.as_str(), err:%; "Skipping unreadable input");
                read_error.get_or_insert(err);
            }
        }
    }

    let report = documenter.extract_metadata(
        documents
            .iter()
            .map(|(name, source)| (name.as_str(), source.as_str())),
    );
    for duplicate in report.duplicates() {
        warn!(
            input = duplicate.source,
            port_type = duplicate.port_type;
            "Skipped port type already extracted from an earlier input"
        );
    }

    if report.failures().len() == report.documents() {
        return Err(nothing_processed(&report, &documents, read_error));
    }
    for failure in report.failures() {
        warn!(input = failure.source, error:% = failure.error; "Skipped unparseable input");
    }

    match &args.output {
        Some(path) => {
            let mut writer = BufWriter::new(fs::File::create(path)?);
            write_metadata(&mut writer, report.operations())?;
            writer.flush()?;
            info!(output_file = path; "Metadata written");
        }
        None => write_metadata(&mut io::stdout().lock(), report.operations())?,
    }

    Ok(())
}

/// The error reported when every input failed.
///
/// A parse failure is preferred so its diagnostics can be rendered against
/// the document source.
fn nothing_processed(
    report: &MetadataReport,
    documents: &[(String, String)],
    read_error: Option<io::Error>,
) -> SigdocError {
    let parse_failure = report.failures().first().and_then(|failure| {
        documents
            .iter()
            .find(|(name, _)| *name == failure.source)
            .map(|(name, source)| {
                SigdocError::new_unsupported_artifact(name, failure.error.clone(), source)
            })
    });
    match (parse_failure, read_error) {
        (Some(err), _) => err,
        (None, Some(err)) => SigdocError::Io(err),
        (None, None) => SigdocError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no input document",
        )),
    }
}

/// Writes one block per operation, blocks separated by a blank line.
///
/// ```text
/// port type: StockQuotePortType
/// operation: getQuote
/// in: GetQuoteRequest.symbol(string)
/// out: GetQuoteResponse.price(decimal)
/// ```
fn write_metadata(writer: &mut impl Write, operations: &[OperationMetadata]) -> io::Result<()> {
    for (index, operation) in operations.iter().enumerate() {
        if index > 0 {
            writeln!(writer)?;
        }
        writeln!(writer, "port type: {}", operation.port_type())?;
        writeln!(writer, "operation: {}", operation.operation())?;
        for path in operation.input_paths() {
            writeln!(writer, "in: {path}")?;
        }
        for path in operation.output_paths() {
            writeln!(writer, "out: {path}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ECHO: &str = r#"
        <definitions name="Echo">
          <message name="EchoRequest">
            <part name="text" type="xsd:string"/>
          </message>
          <message name="Ping"/>
          <portType name="EchoPort">
            <operation name="echo">
              <input message="EchoRequest"/>
              <output message="EchoRequest"/>
            </operation>
            <operation name="ping">
              <input message="Ping"/>
            </operation>
          </portType>
        </definitions>
    "#;

    #[test]
    fn test_write_metadata_blocks() {
        let report = Documenter::default().extract_metadata([("echo.wsdl", ECHO)]);
        let mut out = Vec::new();

        write_metadata(&mut out, report.operations()).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "port type: EchoPort\n\
             operation: echo\n\
             in: EchoRequest.text(string)\n\
             out: EchoRequest.text(string)\n\
             \n\
             port type: EchoPort\n\
             operation: ping\n\
             in: Ping\n"
        );
    }

    #[test]
    fn test_nothing_processed_prefers_parse_failure() {
        let documents = vec![("bad.wsdl".to_string(), "<definitions>".to_string())];
        let report = Documenter::default().extract_metadata([("bad.wsdl", "<definitions>")]);
        let read_error = Some(io::Error::new(io::ErrorKind::NotFound, "missing"));

        let err = nothing_processed(&report, &documents, read_error);

        assert!(matches!(
            err,
            SigdocError::UnsupportedArtifact { ref name, .. } if name == "bad.wsdl"
        ));
    }

    #[test]
    fn test_nothing_processed_falls_back_to_read_error() {
        let report = Documenter::default().extract_metadata(Vec::<(&str, &str)>::new());
        let read_error = Some(io::Error::new(io::ErrorKind::NotFound, "missing"));

        let err = nothing_processed(&report, &[], read_error);

        assert!(matches!(err, SigdocError::Io(_)));
    }
}
