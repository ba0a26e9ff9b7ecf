//! Holonet Graph — Neo4j data access for Character nodes.
//!
//! Every Character read and write flows through this crate. Queries are
//! built in [`cypher`] with all client values bound as named parameters,
//! executed by [`GraphClient`], and shaped back into
//! [`holonet_core::Character`] records.

pub mod client;
pub mod cypher;
pub mod memory;
pub mod mutations;
pub mod queries;
pub mod store;

pub use client::{GraphClient, GraphConfig, GraphError};
pub use cypher::Schema;
pub use memory::MemoryStore;
pub use store::CharacterStore;
