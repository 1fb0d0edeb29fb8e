//! Resilient bulk loader for a rate-limited remote document store.
//!
//! Documents are pushed through a server-side batch-insert stored procedure
//! in size- and count-bounded chunks, with exponential-backoff retries around
//! every remote call and partial-progress accounting driven by the count of
//! documents the server actually committed.

pub mod config;
pub mod import;
pub mod store;
