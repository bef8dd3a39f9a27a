//! # Sigdoc Schema
//!
//! Schema graph front-end for sigdoc. This crate turns interface description
//! documents into the inputs the core tree works with:
//!
//! - **Nodes**: an untyped, namespace-aware XML node graph ([`node`] module)
//! - **Loading**: reading XML text into that graph ([`xml`] module)
//! - **Flattening**: expanding type declarations into flat leaf paths ([`flatten`] module)
//! - **Descriptions**: messages, port types and schemas of a service ([`description`] module)
//! - **Metadata**: per-operation message paths across documents ([`metadata`] module)
//! - **Hierarchy**: rebuilding Parameter trees from flattened paths ([`hierarchy`] module)
//!
//! ## Usage
//!
//! ```
//! # use sigdoc_schema::{description::ServiceDescription, flatten::Notation, metadata};
//! # use sigdoc_schema::error::ParseError;
//!
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//!         <definitions name="Stock" xmlns="http://schemas.xmlsoap.org/wsdl/">
//!           <message name="GetQuoteRequest">
//!             <part name="symbol" type="xsd:string"/>
//!           </message>
//!         </definitions>
//!     "#;
//!
//!     let description = ServiceDescription::parse(source)?;
//!     let message = &description.messages()[0];
//!     let paths = metadata::message_paths(message, description.schemas(), &Notation::Dotted);
//!     assert_eq!(paths, vec!["GetQuoteRequest.symbol(string)"]);
//!     Ok(())
//! }
//! ```

pub mod description;
pub mod error;
pub mod flatten;
pub mod hierarchy;
pub mod metadata;
pub mod node;
pub mod xml;

mod span;

pub use span::Span;
