//! Path delimiters for one artifact dialect.
//!
//! A [`Delimiters`] value tells the path builder how to join path segments,
//! how to separate an identifier from its type, and how to strip a namespace
//! prefix from a qualified name. Each dialect has its own set; the active set
//! is always passed explicitly to the functions that need it.

use serde::Deserialize;

/// Delimiter configuration for one artifact dialect.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Delimiters {
    /// Separates ancestor and descendant segments of a path.
    path: String,
    /// Separates an identifier from its type name inside a segment.
    #[serde(rename = "type")]
    type_: String,
    /// Separates a namespace prefix from a local name.
    namespace: String,
}

impl Delimiters {
    /// Creates a delimiter set from its three components.
    pub fn new(
        path: impl Into<String>,
        type_: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            type_: type_.into(),
            namespace: namespace.into(),
        }
    }

    /// Delimiters of the interface-description dialect.
    pub fn interface_description() -> Self {
        Self::new(";", "+", "#")
    }

    /// Delimiters of the procedural-source dialect.
    pub fn procedural_source() -> Self {
        Self::new("/", ":", ".")
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn type_delimiter(&self) -> &str {
        &self.type_
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Checks that every delimiter is non-empty and that the three are
    /// pairwise distinct.
    ///
    /// # Errors
    ///
    /// Returns a human readable reason when the set is unusable.
    pub fn validate(&self) -> Result<(), String> {
        let named = [
            ("path", &self.path),
            ("type", &self.type_),
            ("namespace", &self.namespace),
        ];

        for (name, value) in named {
            if value.is_empty() {
                return Err(format!("{name} delimiter must not be empty"));
            }
        }

        for (i, (left_name, left)) in named.iter().enumerate() {
            for (right_name, right) in &named[i + 1..] {
                if left == right {
                    return Err(format!(
                        "{left_name} and {right_name} delimiters must differ, both are `{left}`"
                    ));
                }
            }
        }

        Ok(())
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::interface_description()
    }
}
