//! Remote document-store collaborator.
//!
//! The importer only needs a narrow surface from the store: point-query
//! resources by id, create a collection with an optional indexing policy,
//! register or fetch a stored procedure, and execute a stored procedure with
//! positional arguments. `DocumentStore` captures that surface;
//! `HttpDocumentStore` is the REST-backed implementation.

pub mod client;
pub mod error;
pub mod types;

pub use client::{DocumentStore, HttpDocumentStore};
pub use error::StoreError;
pub use types::{Collection, IncludedPath, IndexKind, IndexingPolicy, StoredProcedure};
