//! Fetches a GraphQL schema over HTTP with the standard introspection query.
//!
//! # Examples
//!
//! ```no_run
//! use graphql_introspect::IntrospectionClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let schema = IntrospectionClient::new()
//!         .with_retries(2)
//!         .fetch_schema("https://api.example.com/graphql")
//!         .await?;
//!     schema.save(std::path::Path::new("schema.json"))?;
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod query;
mod response;

pub use client::IntrospectionClient;
pub use error::{IntrospectionError, Result};
pub use query::INTROSPECTION_QUERY;
pub use response::{GraphQLError, IntrospectionData, IntrospectionResponse};
