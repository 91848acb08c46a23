//! Schema Registry
//!
//! Converts message types into JSON Schema objects, recursively registering
//! every message type reachable through message fields.
//!
//! One registry is one conversion session: create it, add the root message
//! types, then take the `identifier -> schema` mapping out with
//! [`SchemaRegistry::schemas`] or [`SchemaRegistry::into_schemas`].

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use tracing::{debug, trace};

use crate::descriptor::{FieldDescriptor, FieldKind, MessageDescriptor};
use crate::error::{Result, SchemaError};
use crate::names::{normalize_definition_name, NameTable};
use crate::schema::{PropertyDescriptor, SchemaObject};

/// Registration state of one identifier
#[derive(Debug, Clone)]
enum Registration {
    /// Identifier reserved, fields still being converted
    InProgress,
    Registered(SchemaObject),
}

/// The message-to-schema converter and its accumulated schemas
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Registration>,
    names: NameTable,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert `message` and everything it references.
    ///
    /// Returns the schema identifier. Adding a type that was already added
    /// (or is being added further up the call stack) returns its identifier
    /// without converting it again, so self-referencing types terminate.
    ///
    /// On failure every schema registered during this call is removed again,
    /// so the registry never holds a `$ref` to a missing schema. Name
    /// bindings made along the way are kept.
    pub fn add_message<M: MessageDescriptor>(&mut self, message: &M) -> Result<String> {
        let mut added = Vec::new();
        let result = self.register(message, &mut added);

        if result.is_err() {
            debug!(rolled_back = added.len(), "discarding schemas from failed registration");
            for identifier in &added {
                self.schemas.remove(identifier);
            }
        }

        result
    }

    fn register<M: MessageDescriptor>(
        &mut self,
        message: &M,
        added: &mut Vec<String>,
    ) -> Result<String> {
        let identifier = self.names.normalize(message.definition_name())?;

        if self.schemas.contains_key(&identifier) {
            trace!(%identifier, "message already registered");
            return Ok(identifier);
        }

        self.schemas.insert(identifier.clone(), Registration::InProgress);
        added.push(identifier.clone());

        let schema = self.message_to_schema(&identifier, message, added)?;
        debug!(
            %identifier,
            definition = message.definition_name(),
            properties = schema.properties.len(),
            "registered message schema"
        );
        self.schemas
            .insert(identifier.clone(), Registration::Registered(schema));
        Ok(identifier)
    }

    /// Identifier of a message type previously passed to [`add_message`](Self::add_message)
    pub fn ref_for<M: MessageDescriptor>(&self, message: &M) -> Result<String> {
        let name = message.definition_name();
        match self.names.lookup(name)? {
            Some(identifier) if self.schemas.contains_key(&identifier) => Ok(identifier),
            Some(identifier) => Err(SchemaError::NotRegistered {
                name: name.to_string(),
                identifier,
            }),
            None => Err(SchemaError::NotRegistered {
                name: name.to_string(),
                identifier: normalize_definition_name(name),
            }),
        }
    }

    /// Snapshot of all completed schemas, keyed by identifier
    pub fn schemas(&self) -> BTreeMap<String, SchemaObject> {
        self.schemas
            .iter()
            .filter_map(|(id, registration)| match registration {
                Registration::Registered(schema) => Some((id.clone(), schema.clone())),
                Registration::InProgress => None,
            })
            .collect()
    }

    /// Consume the registry, returning all completed schemas
    pub fn into_schemas(self) -> BTreeMap<String, SchemaObject> {
        self.schemas
            .into_iter()
            .filter_map(|(id, registration)| match registration {
                Registration::Registered(schema) => Some((id, schema)),
                Registration::InProgress => None,
            })
            .collect()
    }

    /// Get a completed schema by identifier
    pub fn get(&self, identifier: &str) -> Option<&SchemaObject> {
        match self.schemas.get(identifier) {
            Some(Registration::Registered(schema)) => Some(schema),
            _ => None,
        }
    }

    /// Definition name an identifier was derived from
    pub fn definition_name(&self, identifier: &str) -> Option<&str> {
        self.names.origin(identifier)
    }

    /// Number of completed schemas
    pub fn len(&self) -> usize {
        self.schemas
            .values()
            .filter(|r| matches!(r, Registration::Registered(_)))
            .count()
    }

    /// Whether no schema has been completed yet
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn message_to_schema<M: MessageDescriptor>(
        &mut self,
        identifier: &str,
        message: &M,
        added: &mut Vec<String>,
    ) -> Result<SchemaObject> {
        let mut schema = SchemaObject::new(identifier);
        schema.description = message.description().map(str::to_string);

        for field in message.fields() {
            let descriptor = self.field_to_property(&field, added)?;
            schema.properties.insert(field.name.to_string(), descriptor);
        }

        Ok(schema)
    }

    fn field_to_property<M: MessageDescriptor>(
        &mut self,
        field: &FieldDescriptor<'_, M>,
        added: &mut Vec<String>,
    ) -> Result<PropertyDescriptor> {
        let mut descriptor = match &field.kind {
            FieldKind::Message(target) => {
                let reference = self.register(target, added)?;
                let mut descriptor = PropertyDescriptor::reference(reference);
                descriptor.description = target.description().map(str::to_string);
                descriptor
            }
            kind => PropertyDescriptor::of_type(kind.schema_type()),
        };

        if field.required {
            descriptor.required = true;
        }

        if let Some(default) = field.default.filter(|v| carries_default(v)) {
            descriptor.default = Some(if field.kind.is_enum() {
                Value::String(stringify_default(default))
            } else {
                default.clone()
            });
        }

        if field.repeated {
            descriptor = descriptor.into_array();
        }

        Ok(descriptor)
    }
}

/// Whether a default value is worth emitting.
///
/// Empty and zero-like values (`null`, `false`, `0`, `""`, `[]`, `{}`) count
/// as no default.
fn carries_default(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

fn stringify_default(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
