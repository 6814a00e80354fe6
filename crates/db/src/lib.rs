//! `db` crate — pure persistence layer.
//!
//! Provides a connection pool, typed row structs, and repository functions
//! for the flowline schema.  No business logic lives here: workflows are
//! stored as opaque JSON documents next to the columns needed to query them.

pub mod error;
pub mod models;
pub mod pool;
pub mod repository;

pub use error::DbError;
pub use pool::DbPool;
