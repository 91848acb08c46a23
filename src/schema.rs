//! JSON Schema output types

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON Schema primitive type names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    Integer,
    Number,
    Boolean,
    String,
    Object,
    Array,
}

impl SchemaType {
    /// The JSON Schema keyword for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Integer => "integer",
            SchemaType::Number => "number",
            SchemaType::Boolean => "boolean",
            SchemaType::String => "string",
            SchemaType::Object => "object",
            SchemaType::Array => "array",
        }
    }
}

/// Element descriptor of an array property: either a type or a reference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsDescriptor {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Schema of a single message field
///
/// Exactly one of three shapes: `{type}`, `{$ref}` or
/// `{type: "array", items}`. Use the constructors to keep that invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,

    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<ItemsDescriptor>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl PropertyDescriptor {
    /// A plain `{type}` property
    pub fn of_type(schema_type: SchemaType) -> Self {
        Self {
            schema_type: Some(schema_type),
            reference: None,
            items: None,
            required: false,
            default: None,
            description: None,
        }
    }

    /// A `{$ref}` property pointing at another schema
    pub fn reference(identifier: impl Into<String>) -> Self {
        Self {
            schema_type: None,
            reference: Some(identifier.into()),
            items: None,
            required: false,
            default: None,
            description: None,
        }
    }

    /// Wrap this descriptor into `{type: "array", items: ...}`.
    ///
    /// Only one level of repetition exists; wrapping an array again is a no-op.
    pub fn into_array(mut self) -> Self {
        if self.is_array() {
            return self;
        }
        self.items = Some(ItemsDescriptor {
            schema_type: self.schema_type.take(),
            reference: self.reference.take(),
        });
        self.schema_type = Some(SchemaType::Array);
        self
    }

    pub fn is_array(&self) -> bool {
        self.schema_type == Some(SchemaType::Array) && self.items.is_some()
    }

    /// The referenced identifier, looking through array items
    pub fn referenced_id(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .or_else(|| self.items.as_ref().and_then(|i| i.reference.as_deref()))
    }
}

/// JSON Schema for one message type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaObject {
    /// Normalized identifier, also the key in the registry
    pub id: String,

    #[serde(rename = "type")]
    pub schema_type: SchemaType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub properties: BTreeMap<String, PropertyDescriptor>,
}

impl SchemaObject {
    /// Create an empty object schema
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            schema_type: SchemaType::Object,
            description: None,
            properties: BTreeMap::new(),
        }
    }

    /// Get a property by field name
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    /// Identifiers of all schemas this one references, in property order
    pub fn references(&self) -> Vec<&str> {
        self.properties
            .values()
            .filter_map(PropertyDescriptor::referenced_id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scalar_property_serialization() {
        let mut prop = PropertyDescriptor::of_type(SchemaType::Integer);
        prop.required = true;
        assert_eq!(
            serde_json::to_value(&prop).unwrap(),
            json!({"type": "integer", "required": true})
        );
    }

    #[test]
    fn test_array_wrapping() {
        let prop = PropertyDescriptor::of_type(SchemaType::String).into_array();
        assert_eq!(
            serde_json::to_value(&prop).unwrap(),
            json!({"type": "array", "items": {"type": "string"}})
        );

        let prop = PropertyDescriptor::reference("Item").into_array();
        assert_eq!(
            serde_json::to_value(&prop).unwrap(),
            json!({"type": "array", "items": {"$ref": "Item"}})
        );
        assert_eq!(prop.referenced_id(), Some("Item"));

        // Wrapping twice keeps a single level
        let twice = prop.clone().into_array();
        assert_eq!(twice, prop);
    }

    #[test]
    fn test_schema_object_shape() {
        let mut schema = SchemaObject::new("Outer");
        schema.description = Some("An outer message".to_string());
        schema
            .properties
            .insert("inner".to_string(), PropertyDescriptor::reference("Inner"));

        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({
                "id": "Outer",
                "type": "object",
                "description": "An outer message",
                "properties": {"inner": {"$ref": "Inner"}}
            })
        );
        assert_eq!(schema.references(), vec!["Inner"]);
    }
}
