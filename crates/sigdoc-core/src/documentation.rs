//! Documentation records attached to signature elements.
//!
//! A [`Documentation`] carries free text per [`Addressee`], an optional
//! [`ThematicRole`] and the path key used to re-attach it to a tree after a
//! fresh parse.

use std::fmt;

use indexmap::IndexMap;

/// The audience a documentation text is written for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Addressee {
    name: String,
    description: String,
    is_default: bool,
}

impl Addressee {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            is_default: false,
        }
    }

    /// Marks this addressee as the one selected when none is chosen.
    pub fn with_default(mut self, is_default: bool) -> Self {
        self.is_default = is_default;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_default(&self) -> bool {
        self.is_default
    }
}

impl fmt::Display for Addressee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Where a thematic role may be assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum RoleScope {
    #[default]
    Both,
    OperationLevel,
    ParameterLevel,
}

impl RoleScope {
    pub fn allows_operation(&self) -> bool {
        matches!(self, Self::Both | Self::OperationLevel)
    }

    pub fn allows_parameter(&self) -> bool {
        matches!(self, Self::Both | Self::ParameterLevel)
    }
}

/// A linguistic label describing the semantic function of an element,
/// such as `OBJECT`, `SOURCE` or `ACTION`.
///
/// Roles order by name first, so a set of roles iterates alphabetically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ThematicRole {
    name: String,
    description: Option<String>,
    scope: RoleScope,
}

impl ThematicRole {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            scope: RoleScope::default(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_scope(mut self, scope: RoleScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn scope(&self) -> RoleScope {
        self.scope
    }
}

impl fmt::Display for ThematicRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// One documentation record.
///
/// The addressee sequence and the per-addressee texts are kept in a single
/// insertion-ordered map, so a text can only exist for an addressee that is
/// part of the sequence.
#[derive(Debug, Clone, Default)]
pub struct Documentation {
    signature_element_identifier: Option<String>,
    thematic_role: Option<ThematicRole>,
    error_case: bool,
    texts: IndexMap<Addressee, String>,
}

impl Documentation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the path key used to re-attach this record to a tree.
    pub fn with_signature_element_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.signature_element_identifier = Some(identifier.into());
        self
    }

    pub fn with_thematic_role(mut self, role: ThematicRole) -> Self {
        self.thematic_role = Some(role);
        self
    }

    pub fn with_error_case(mut self, error_case: bool) -> Self {
        self.error_case = error_case;
        self
    }

    pub fn with_text(mut self, addressee: Addressee, text: impl Into<String>) -> Self {
        self.set_text(addressee, text);
        self
    }

    pub fn signature_element_identifier(&self) -> Option<&str> {
        self.signature_element_identifier.as_deref()
    }

    pub fn set_signature_element_identifier(&mut self, identifier: Option<String>) {
        self.signature_element_identifier = identifier;
    }

    pub fn thematic_role(&self) -> Option<&ThematicRole> {
        self.thematic_role.as_ref()
    }

    pub fn set_thematic_role(&mut self, role: Option<ThematicRole>) {
        self.thematic_role = role;
    }

    pub fn is_error_case(&self) -> bool {
        self.error_case
    }

    /// Returns the text written for `addressee`, if it is in the sequence.
    pub fn text_for(&self, addressee: &Addressee) -> Option<&str> {
        self.texts.get(addressee).map(String::as_str)
    }

    /// Sets the text for `addressee`.
    ///
    /// A new addressee is appended to the end of the sequence; an existing
    /// one keeps its position.
    pub fn set_text(&mut self, addressee: Addressee, text: impl Into<String>) {
        self.texts.insert(addressee, text.into());
    }

    /// Addressees in sequence order.
    pub fn addressees(&self) -> impl Iterator<Item = &Addressee> {
        self.texts.keys()
    }

    /// Addressee and text pairs in sequence order.
    pub fn texts(&self) -> impl Iterator<Item = (&Addressee, &str)> {
        self.texts.iter().map(|(a, t)| (a, t.as_str()))
    }
}

impl PartialEq for Documentation {
    fn eq(&self, other: &Self) -> bool {
        self.signature_element_identifier == other.signature_element_identifier
            && self.thematic_role == other.thematic_role
            && self.error_case == other.error_case
            && self.texts.iter().eq(other.texts.iter())
    }
}

impl Eq for Documentation {}
