//! Message and field introspection contract
//!
//! The converter never inspects message types directly. Anything that can
//! describe itself through [`MessageDescriptor`] can be turned into JSON
//! Schema: generated bindings, a runtime type registry, or the file-backed
//! [`MessageCatalog`](crate::catalog::MessageCatalog).

use serde_json::Value;

use crate::schema::SchemaType;

/// Category of a field's value
///
/// `M` is the handle of the referenced message type, so only message
/// fields can carry a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind<M> {
    Integer,
    Float,
    Boolean,
    Bytes,
    String,
    Message(M),
    Enum,
    /// Any kind without a dedicated JSON Schema mapping
    Other,
}

impl<M> FieldKind<M> {
    /// JSON Schema type for this kind.
    ///
    /// Message fields map to `object` but are emitted as `$ref`.
    pub fn schema_type(&self) -> SchemaType {
        match self {
            FieldKind::Integer => SchemaType::Integer,
            FieldKind::Float => SchemaType::Number,
            FieldKind::Boolean => SchemaType::Boolean,
            FieldKind::Bytes => SchemaType::String,
            FieldKind::String => SchemaType::String,
            FieldKind::Message(_) => SchemaType::Object,
            FieldKind::Enum => SchemaType::String,
            FieldKind::Other => SchemaType::String,
        }
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, FieldKind::Enum)
    }

    /// Convert the message handle, keeping every other kind as-is
    pub fn map<N>(self, f: impl FnOnce(M) -> N) -> FieldKind<N> {
        match self {
            FieldKind::Integer => FieldKind::Integer,
            FieldKind::Float => FieldKind::Float,
            FieldKind::Boolean => FieldKind::Boolean,
            FieldKind::Bytes => FieldKind::Bytes,
            FieldKind::String => FieldKind::String,
            FieldKind::Message(m) => FieldKind::Message(f(m)),
            FieldKind::Enum => FieldKind::Enum,
            FieldKind::Other => FieldKind::Other,
        }
    }

    /// Referenced message type, for message fields
    pub fn message(&self) -> Option<&M> {
        match self {
            FieldKind::Message(m) => Some(m),
            _ => None,
        }
    }
}

/// Read-only view of one field of a message type
#[derive(Debug, Clone)]
pub struct FieldDescriptor<'a, M> {
    pub name: &'a str,
    pub kind: FieldKind<M>,
    pub required: bool,
    pub repeated: bool,
    pub default: Option<&'a Value>,
}

/// Introspection surface of a message type
pub trait MessageDescriptor: Sized {
    /// Fully-qualified definition name, e.g. `pkg.SomeMessage`
    fn definition_name(&self) -> &str;

    /// Documentation string, if the type has one
    fn description(&self) -> Option<&str>;

    /// Fields in declaration order
    fn fields(&self) -> Vec<FieldDescriptor<'_, Self>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_to_schema_type_table() {
        let kinds: [(FieldKind<()>, SchemaType); 8] = [
            (FieldKind::Integer, SchemaType::Integer),
            (FieldKind::Float, SchemaType::Number),
            (FieldKind::Boolean, SchemaType::Boolean),
            (FieldKind::Bytes, SchemaType::String),
            (FieldKind::String, SchemaType::String),
            (FieldKind::Message(()), SchemaType::Object),
            (FieldKind::Enum, SchemaType::String),
            (FieldKind::Other, SchemaType::String),
        ];
        for (kind, expected) in kinds {
            assert_eq!(kind.schema_type(), expected, "{:?}", kind);
        }
    }

    #[test]
    fn test_message_accessor() {
        assert_eq!(FieldKind::Message(7).message(), Some(&7));
        assert_eq!(FieldKind::<u32>::Enum.message(), None);
        assert!(FieldKind::<u32>::Enum.is_enum());
        assert_eq!(FieldKind::Message(7).map(|i| i * 2), FieldKind::Message(14));
        assert_eq!(FieldKind::<u32>::Bytes.map(|i| i * 2), FieldKind::Bytes);
    }
}
