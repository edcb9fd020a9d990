//! GraphQL type registry, type expansion and selection-set synthesis.
//!
//! This crate works on the schema described by an introspection query. It
//! answers two questions for code generators:
//!
//! - which types are needed to represent a set of root types
//!   ([`expand_types`]),
//! - which fields to request for a type in a generated query or mutation
//!   ([`selection_set`]).
//!
//! # Examples
//!
//! ```no_run
//! use graphql_schema::{expand_types, selection_set, ExpansionMode, Schema, SelectionOptions};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let schema = Schema::load(Path::new("schema.json"))?;
//!
//!     for ty in expand_types(&schema, ["Account"], ExpansionMode::SingleHop)? {
//!         println!("{}", ty.name);
//!     }
//!
//!     let account = schema.lookup_type_by_name("Account")?;
//!     println!("{}", selection_set(&schema, account, &SelectionOptions::new(2)));
//!     Ok(())
//! }
//! ```

mod error;
mod expand;
mod schema;
mod selection;
mod types;

pub use error::{Result, SchemaError};
pub use expand::{expand_type, expand_types, ExpansionMode};
pub use schema::{RootTypeRef, Schema, SchemaDocument};
pub use selection::{
    operation_selection, selection_set, selection_set_at, OperationKind, OperationSelection,
    SelectionOptions, DEFAULT_MAX_DEPTH,
};
pub use types::{EnumValue, Field, InputValue, Type, TypeKind, TypeRef, TYPENAME_FIELD};
