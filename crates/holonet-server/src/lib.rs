//! holonet-server: HTTP CRUD endpoints for Character nodes.
//!
//! Routes requests to handlers, which call a [`holonet_graph::CharacterStore`]
//! and map the outcome to a status code and JSON body. A background
//! keep-alive task pings the store and publishes a health snapshot.

pub mod config;
pub mod error;
pub mod handlers;
pub mod keepalive;
pub mod routes;
pub mod server;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::{router, AppState};
