//! Message Catalog
//!
//! A file-backed implementation of [`MessageDescriptor`]. Message types are
//! declared in TOML or JSON definition files and loaded into a
//! [`MessageCatalog`], which resolves every message reference up front so
//! conversion never meets a dangling type.
//!
//! ## Example definition file (messages.toml):
//! ```toml
//! [[message]]
//! name = "shop.Order"
//! description = "A customer order."
//!
//! [[message.field]]
//! name = "id"
//! type = "int64"
//! required = true
//!
//! [[message.field]]
//! name = "lines"
//! type = "message"
//! message = "shop.OrderLine"
//! repeated = true
//!
//! [[message]]
//! name = "shop.OrderLine"
//!
//! [[message.field]]
//! name = "sku"
//! type = "string"
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::descriptor::{FieldDescriptor, FieldKind, MessageDescriptor};
use crate::error::{Result, SchemaError};
use crate::registry::SchemaRegistry;
use crate::schema::SchemaObject;

/// One definition file: a list of message types
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefinitionFile {
    #[serde(rename = "message", default)]
    pub messages: Vec<MessageDefinition>,
}

/// Declared message type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDefinition {
    /// Fully-qualified definition name
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(rename = "field", default)]
    pub fields: Vec<FieldDefinition>,
}

impl MessageDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }
}

/// Declared field of a message type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,

    /// Type name, e.g. `string`, `int32`, `message`
    #[serde(rename = "type")]
    pub type_name: String,

    /// Definition name of the referenced type when `type = "message"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub repeated: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            message: None,
            required: false,
            repeated: false,
            default: None,
        }
    }

    /// A field of message type `target`
    pub fn message(name: impl Into<String>, target: impl Into<String>) -> Self {
        let mut field = Self::new(name, "message");
        field.message = Some(target.into());
        field
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn repeated(mut self) -> Self {
        self.repeated = true;
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// Map a declared type name to a field kind.
///
/// Returns `None` for `message`, which needs a resolved target.
fn scalar_kind(type_name: &str) -> Option<FieldKind<usize>> {
    let kind = match type_name.to_ascii_lowercase().as_str() {
        "integer" | "int32" | "int64" | "uint32" | "uint64" | "sint32" | "sint64"
        | "fixed32" | "fixed64" | "sfixed32" | "sfixed64" => FieldKind::Integer,
        "float" | "double" | "number" => FieldKind::Float,
        "boolean" | "bool" => FieldKind::Boolean,
        "bytes" => FieldKind::Bytes,
        "string" => FieldKind::String,
        "enum" => FieldKind::Enum,
        "message" => return None,
        other => {
            debug!(type_name = other, "unrecognized field type, treating as other");
            FieldKind::Other
        }
    };
    Some(kind)
}

#[derive(Debug, Clone)]
struct ResolvedField {
    name: String,
    kind: FieldKind<usize>,
    required: bool,
    repeated: bool,
    default: Option<Value>,
}

#[derive(Debug, Clone)]
struct ResolvedMessage {
    name: String,
    description: Option<String>,
    fields: Vec<ResolvedField>,
}

/// Set of message types with all references resolved
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    messages: Vec<ResolvedMessage>,
    by_name: HashMap<String, usize>,
}

/// Handle to one message type inside a [`MessageCatalog`]
#[derive(Debug, Clone, Copy)]
pub struct MessageRef<'a> {
    catalog: &'a MessageCatalog,
    index: usize,
}

impl MessageCatalog {
    /// Build a catalog, resolving every message-typed field.
    pub fn from_definitions(definitions: Vec<MessageDefinition>) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(definitions.len());
        for (index, definition) in definitions.iter().enumerate() {
            if by_name.insert(definition.name.clone(), index).is_some() {
                return Err(SchemaError::DuplicateMessage(definition.name.clone()));
            }
        }

        let mut messages = Vec::with_capacity(definitions.len());
        for definition in definitions {
            let mut fields = Vec::with_capacity(definition.fields.len());
            for field in definition.fields {
                let kind = match scalar_kind(&field.type_name) {
                    Some(kind) => kind,
                    None => {
                        let target = field.message.as_deref().ok_or_else(|| {
                            SchemaError::MissingMessageType {
                                message: definition.name.clone(),
                                field: field.name.clone(),
                            }
                        })?;
                        let index = by_name.get(target).copied().ok_or_else(|| {
                            SchemaError::UnknownMessage {
                                message: definition.name.clone(),
                                field: field.name.clone(),
                                target: target.to_string(),
                            }
                        })?;
                        FieldKind::Message(index)
                    }
                };

                fields.push(ResolvedField {
                    name: field.name,
                    kind,
                    required: field.required,
                    repeated: field.repeated,
                    default: field.default,
                });
            }

            messages.push(ResolvedMessage {
                name: definition.name,
                description: definition.description,
                fields,
            });
        }

        Ok(Self { messages, by_name })
    }

    /// Load definition files and directories into one catalog.
    ///
    /// Directories are walked recursively; hidden directories and `target/`
    /// are skipped, as are files that are neither `.toml` nor `.json`.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut definitions = Vec::new();

        for path in paths {
            let path = path.as_ref();
            if path.is_dir() {
                for file in definition_files(path) {
                    definitions.extend(load_definition_file(&file)?.messages);
                }
            } else {
                definitions.extend(load_definition_file(path)?.messages);
            }
        }

        let catalog = Self::from_definitions(definitions)?;
        info!(messages = catalog.len(), "loaded message catalog");
        Ok(catalog)
    }

    /// Look up a message type by definition name
    pub fn get(&self, name: &str) -> Option<MessageRef<'_>> {
        self.by_name
            .get(name)
            .map(|&index| MessageRef { catalog: self, index })
    }

    /// All message types in definition order
    pub fn iter(&self) -> impl Iterator<Item = MessageRef<'_>> {
        (0..self.messages.len()).map(move |index| MessageRef { catalog: self, index })
    }

    /// Convert the named root messages, or every message when `roots` is empty.
    pub fn to_schemas<S: AsRef<str>>(&self, roots: &[S]) -> Result<BTreeMap<String, SchemaObject>> {
        let mut registry = SchemaRegistry::new();

        if roots.is_empty() {
            for message in self.iter() {
                registry.add_message(&message)?;
            }
        } else {
            for root in roots {
                let root = root.as_ref();
                let message = self
                    .get(root)
                    .ok_or_else(|| SchemaError::MessageNotFound(root.to_string()))?;
                registry.add_message(&message)?;
            }
        }

        Ok(registry.into_schemas())
    }

    /// Number of message types
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the catalog has no message types
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

impl<'a> MessageRef<'a> {
    fn resolved(&self) -> &'a ResolvedMessage {
        &self.catalog.messages[self.index]
    }
}

impl MessageDescriptor for MessageRef<'_> {
    fn definition_name(&self) -> &str {
        &self.resolved().name
    }

    fn description(&self) -> Option<&str> {
        self.resolved().description.as_deref()
    }

    fn fields(&self) -> Vec<FieldDescriptor<'_, Self>> {
        self.resolved()
            .fields
            .iter()
            .map(|field| FieldDescriptor {
                name: &field.name,
                kind: field.kind.map(|index| MessageRef {
                    catalog: self.catalog,
                    index,
                }),
                required: field.required,
                repeated: field.repeated,
                default: field.default.as_ref(),
            })
            .collect()
    }
}

/// Parse one definition file, choosing the format by extension
pub fn load_definition_file(path: &Path) -> Result<DefinitionFile> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let file = match extension.as_deref() {
        Some("toml") => toml::from_str(&fs::read_to_string(path)?)?,
        Some("json") => serde_json::from_str(&fs::read_to_string(path)?)?,
        _ => return Err(SchemaError::UnsupportedFile(path.display().to_string())),
    };

    debug!(path = %path.display(), "parsed definition file");
    Ok(file)
}

/// Definition files under `dir`, sorted for stable load order
fn definition_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0
                || !entry.file_type().is_dir()
                || !is_skipped_dir(&entry.file_name().to_string_lossy())
        })
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .map(|ext| ext == "toml" || ext == "json")
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    files
}

fn is_skipped_dir(name: &str) -> bool {
    name.starts_with('.') || name == "target" || name == "node_modules"
}
