//! The storage seam the HTTP layer is generic over.

use std::future::Future;

use holonet_core::{Character, CharacterPatch};

use crate::client::{GraphClient, GraphError};

/// Character persistence operations.
///
/// `GraphClient` is the production implementation; `MemoryStore` backs
/// tests and database-less runs. Business outcomes are reported through
/// [`GraphError::NotFound`] and [`GraphError::ConstraintViolation`].
pub trait CharacterStore: Clone + Send + Sync + 'static {
    fn create(
        &self,
        character: &Character,
    ) -> impl Future<Output = Result<Character, GraphError>> + Send;

    fn list(&self) -> impl Future<Output = Result<Vec<Character>, GraphError>> + Send;

    fn get(&self, name: &str) -> impl Future<Output = Result<Character, GraphError>> + Send;

    fn update(
        &self,
        name: &str,
        patch: &CharacterPatch,
    ) -> impl Future<Output = Result<Character, GraphError>> + Send;

    fn delete(&self, name: &str) -> impl Future<Output = Result<(), GraphError>> + Send;

    /// Reachability check used by the keep-alive monitor.
    fn ping(&self) -> impl Future<Output = Result<(), GraphError>> + Send;
}

impl CharacterStore for GraphClient {
    async fn create(&self, character: &Character) -> Result<Character, GraphError> {
        self.create_character(character).await
    }

    async fn list(&self) -> Result<Vec<Character>, GraphError> {
        self.list_characters().await
    }

    async fn get(&self, name: &str) -> Result<Character, GraphError> {
        self.get_character(name).await
    }

    async fn update(&self, name: &str, patch: &CharacterPatch) -> Result<Character, GraphError> {
        self.update_character(name, patch).await
    }

    async fn delete(&self, name: &str) -> Result<(), GraphError> {
        self.delete_character(name).await
    }

    async fn ping(&self) -> Result<(), GraphError> {
        GraphClient::ping(self).await
    }
}
