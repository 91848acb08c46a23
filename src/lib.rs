//! Message Schemas
//!
//! Converts typed message definitions into JSON Schema documents.
//!
//! ## Features
//!
//! - **Name Normalization**: `pkg.some_message` becomes the schema id `PkgSomeMessage`
//! - **Collision Detection**: two definitions sharing an id is a hard error
//! - **Recursive Registration**: referenced message types get their own schemas
//! - **Cycle Safety**: self- and mutually-referencing types convert and terminate
//! - **File-backed Catalogs**: message types declared in TOML or JSON
//!
//! ## Output
//!
//! ```text
//! {
//!   "ShopOrder": {
//!     "id": "ShopOrder",
//!     "type": "object",
//!     "properties": {
//!       "id":    { "type": "integer", "required": true },
//!       "lines": { "type": "array", "items": { "$ref": "ShopOrderLine" } }
//!     }
//!   },
//!   "ShopOrderLine": { ... }
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod names;
pub mod registry;
pub mod schema;

pub use catalog::{FieldDefinition, MessageCatalog, MessageDefinition, MessageRef};
pub use config::SchemaConfig;
pub use descriptor::{FieldDescriptor, FieldKind, MessageDescriptor};
pub use error::{Result, SchemaError};
pub use names::{normalize_definition_name, NameTable};
pub use registry::SchemaRegistry;
pub use schema::{ItemsDescriptor, PropertyDescriptor, SchemaObject, SchemaType};
