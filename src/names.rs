//! Schema Name Normalization
//!
//! Maps fully-qualified definition names (`pkg.some_message`) to schema
//! identifiers (`PkgSomeMessage`) matching `[a-zA-Z][a-zA-Z0-9]*`.
//!
//! Normalization is lossy, so two definitions can land on the same
//! identifier. [`NameTable`] remembers which definition claimed each
//! identifier first and refuses to hand it to anyone else.

use std::collections::HashMap;

use crate::error::{Result, SchemaError};

/// Camel-case a definition name, dropping every non-alphanumeric character.
///
/// Each alphanumeric run gets its first character upper-cased; the rest of
/// the run is kept as-is. This is the pure half of normalization and does
/// not check collisions or validity.
pub fn normalize_definition_name(definition_name: &str) -> String {
    let mut result = String::with_capacity(definition_name.len());

    for part in definition_name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
    {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            result.push(first.to_ascii_uppercase());
            result.push_str(chars.as_str());
        }
    }

    result
}

/// Whether `identifier` is usable as a schema key
pub fn is_valid_identifier(identifier: &str) -> bool {
    let mut chars = identifier.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => chars.all(|c| c.is_ascii_alphanumeric()),
        _ => false,
    }
}

/// Identifier -> originating definition name, used to detect collisions.
///
/// Bindings are permanent for the lifetime of the table.
#[derive(Debug, Default, Clone)]
pub struct NameTable {
    origins: HashMap<String, String>,
}

impl NameTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize `definition_name` and bind the identifier to it.
    ///
    /// Returns the existing identifier if this definition was seen before,
    /// and fails if the identifier already belongs to another definition.
    pub fn normalize(&mut self, definition_name: &str) -> Result<String> {
        if let Some(identifier) = self.lookup(definition_name)? {
            return Ok(identifier);
        }

        let identifier = normalize_definition_name(definition_name);
        self.origins
            .insert(identifier.clone(), definition_name.to_string());
        Ok(identifier)
    }

    /// Like [`normalize`](Self::normalize) but never binds.
    ///
    /// `Ok(None)` means the identifier is still free.
    pub fn lookup(&self, definition_name: &str) -> Result<Option<String>> {
        let identifier = normalize_definition_name(definition_name);
        if !is_valid_identifier(&identifier) {
            return Err(SchemaError::InvalidName {
                name: definition_name.to_string(),
            });
        }

        match self.origins.get(&identifier) {
            Some(previous) if previous == definition_name => Ok(Some(identifier)),
            Some(previous) => Err(SchemaError::NameCollision {
                name: definition_name.to_string(),
                previous: previous.clone(),
                identifier,
            }),
            None => Ok(None),
        }
    }

    /// Definition name that owns `identifier`
    pub fn origin(&self, identifier: &str) -> Option<&str> {
        self.origins.get(identifier).map(String::as_str)
    }

    /// Number of bound identifiers
    pub fn len(&self) -> usize {
        self.origins.len()
    }

    /// Whether no identifier has been bound yet
    pub fn is_empty(&self) -> bool {
        self.origins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_definition_name() {
        assert_eq!(normalize_definition_name("pkg.some_message"), "PkgSomeMessage");
        assert_eq!(normalize_definition_name("Outer"), "Outer");
        assert_eq!(normalize_definition_name("a.b.CamelCase"), "ABCamelCase");
        // Runs of separators collapse, leading/trailing ones vanish
        assert_eq!(normalize_definition_name("__pkg..v1--Thing__"), "PkgV1Thing");
        // Only the first character of a segment changes
        assert_eq!(normalize_definition_name("api.HTTPRequest"), "ApiHTTPRequest");
        assert_eq!(normalize_definition_name("..."), "");
    }

    #[test]
    fn test_valid_identifier() {
        assert!(is_valid_identifier("PkgSomeMessage"));
        assert!(is_valid_identifier("V1"));
        assert!(!is_valid_identifier(""));
        assert!(!is_valid_identifier("1Thing"));
        assert!(!is_valid_identifier("Some_Thing"));
    }

    #[test]
    fn test_idempotent_binding() {
        let mut names = NameTable::new();
        let first = names.normalize("pkg.some_message").unwrap();
        let second = names.normalize("pkg.some_message").unwrap();
        assert_eq!(first, second);
        assert_eq!(names.len(), 1);
        assert_eq!(names.origin("PkgSomeMessage"), Some("pkg.some_message"));
    }

    #[test]
    fn test_collision_reports_both_names() {
        let mut names = NameTable::new();
        names.normalize("pkg.some_message").unwrap();

        match names.normalize("pkg.SomeMessage") {
            Err(SchemaError::NameCollision { name, previous, identifier }) => {
                assert_eq!(name, "pkg.SomeMessage");
                assert_eq!(previous, "pkg.some_message");
                assert_eq!(identifier, "PkgSomeMessage");
            }
            other => panic!("Expected NameCollision, got {:?}", other),
        }

        // The original binding survives
        assert_eq!(names.origin("PkgSomeMessage"), Some("pkg.some_message"));
        assert_eq!(names.len(), 1);
    }

    #[test]
    fn test_lookup_does_not_bind() {
        let names = NameTable::new();
        assert_eq!(names.lookup("pkg.Thing").unwrap(), None);
        assert!(names.is_empty());
    }

    #[test]
    fn test_invalid_names_rejected() {
        let mut names = NameTable::new();
        assert!(matches!(names.normalize("..."), Err(SchemaError::InvalidName { .. })));
        assert!(matches!(names.normalize("1pkg.Thing"), Err(SchemaError::InvalidName { .. })));
        assert!(names.is_empty());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Output never contains anything but ASCII alphanumerics.
        #[test]
        fn normalized_is_alphanumeric(name in "[ -~]{0,40}") {
            let normalized = normalize_definition_name(&name);
            prop_assert!(normalized.chars().all(|c| c.is_ascii_alphanumeric()));
        }

        /// Normalizing an identifier again changes nothing.
        #[test]
        fn normalization_is_idempotent(name in "[a-zA-Z][a-zA-Z0-9_.]{0,30}") {
            let once = normalize_definition_name(&name);
            prop_assert_eq!(normalize_definition_name(&once), once.clone());
        }

        /// Dotted names built from letter-led segments are always valid.
        #[test]
        fn dotted_names_are_valid(parts in prop::collection::vec("[a-z][a-z0-9_]{0,8}", 1..5)) {
            let name = parts.join(".");
            prop_assert!(is_valid_identifier(&normalize_definition_name(&name)));
        }
    }
}
