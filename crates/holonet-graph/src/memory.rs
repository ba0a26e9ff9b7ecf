//! In-process Character store with the same observable semantics as
//! the Neo4j implementation.
//!
//! Nodes keep insertion order. Relationships are tracked by endpoint name
//! so cascade deletes can be observed, and the store can be switched
//! offline to exercise fault paths.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;

use holonet_core::{Character, CharacterPatch};

use crate::client::GraphError;
use crate::cypher::Schema;
use crate::store::CharacterStore;

/// A directed, typed edge between two Character names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub from: String,
    pub rel_type: String,
    pub to: String,
}

impl Relationship {
    fn touches(&self, name: &str) -> bool {
        self.from == name || self.to == name
    }
}

#[derive(Debug, Default)]
struct MemoryGraph {
    nodes: Vec<Character>,
    relationships: Vec<Relationship>,
}

impl MemoryGraph {
    fn position(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|c| c.name == name)
    }
}

#[derive(Clone)]
pub struct MemoryStore {
    schema: Schema,
    graph: Arc<RwLock<MemoryGraph>>,
    available: Arc<AtomicBool>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            schema: Schema::default(),
            graph: Arc::new(RwLock::new(MemoryGraph::default())),
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Take the store offline (every call fails) or bring it back.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Add a relationship between two existing Characters.
    pub async fn relate(&self, from: &str, rel_type: &str, to: &str) -> Result<(), GraphError> {
        self.check_available()?;
        let mut graph = self.graph.write().await;
        for name in [from, to] {
            if graph.position(name).is_none() {
                return Err(self.not_found(name));
            }
        }
        graph.relationships.push(Relationship {
            from: from.to_string(),
            rel_type: rel_type.to_string(),
            to: to.to_string(),
        });
        Ok(())
    }

    /// Relationships with `name` at either end.
    pub async fn relationships_of(&self, name: &str) -> Vec<Relationship> {
        let graph = self.graph.read().await;
        graph
            .relationships
            .iter()
            .filter(|r| r.touches(name))
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.graph.read().await.nodes.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_available(&self) -> Result<(), GraphError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(GraphError::Connection(
                "memory store is offline".to_string(),
            ))
        }
    }

    fn not_found(&self, name: &str) -> GraphError {
        GraphError::NotFound {
            label: self.schema.label().to_string(),
            name: name.to_string(),
        }
    }
}

impl CharacterStore for MemoryStore {
    async fn create(&self, character: &Character) -> Result<Character, GraphError> {
        self.check_available()?;
        let mut graph = self.graph.write().await;
        if graph.position(&character.name).is_some() {
            return Err(GraphError::ConstraintViolation {
                label: self.schema.label().to_string(),
                name: character.name.clone(),
            });
        }
        graph.nodes.push(character.clone());
        Ok(character.clone())
    }

    async fn list(&self) -> Result<Vec<Character>, GraphError> {
        self.check_available()?;
        Ok(self.graph.read().await.nodes.clone())
    }

    async fn get(&self, name: &str) -> Result<Character, GraphError> {
        self.check_available()?;
        let graph = self.graph.read().await;
        graph
            .nodes
            .iter()
            .find(|c| c.name == name)
            .cloned()
            .ok_or_else(|| self.not_found(name))
    }

    async fn update(&self, name: &str, patch: &CharacterPatch) -> Result<Character, GraphError> {
        self.check_available()?;
        let mut graph = self.graph.write().await;
        let idx = graph.position(name).ok_or_else(|| self.not_found(name))?;
        let node = &mut graph.nodes[idx];
        node.apply(patch);
        Ok(node.clone())
    }

    async fn delete(&self, name: &str) -> Result<(), GraphError> {
        self.check_available()?;
        let mut graph = self.graph.write().await;
        let idx = graph.position(name).ok_or_else(|| self.not_found(name))?;
        graph.relationships.retain(|r| !r.touches(name));
        graph.nodes.remove(idx);
        Ok(())
    }

    async fn ping(&self) -> Result<(), GraphError> {
        self.check_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holonet_core::CharacterField;

    fn luke() -> Character {
        Character::new("Luke Skywalker")
            .with(CharacterField::Height, "172")
            .with(CharacterField::Mass, "77")
            .with(CharacterField::HairColor, "blond")
            .with(CharacterField::Species, "Human")
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let store = MemoryStore::new();
        let created = store.create(&luke()).await.unwrap();
        assert_eq!(created, luke());
        assert_eq!(store.get("Luke Skywalker").await.unwrap(), luke());
    }

    #[tokio::test]
    async fn test_duplicate_name_is_constraint_violation() {
        let store = MemoryStore::new();
        store.create(&luke()).await.unwrap();
        let err = store.create(&Character::new("Luke Skywalker")).await.unwrap_err();
        assert!(matches!(err, GraphError::ConstraintViolation { .. }));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_name_lookup_is_exact() {
        let store = MemoryStore::new();
        store.create(&luke()).await.unwrap();
        for lookup in ["luke skywalker", "Luke Skywalker ", "Luke"] {
            let err = store.get(lookup).await.unwrap_err();
            assert!(matches!(err, GraphError::NotFound { .. }), "{lookup}");
        }
    }

    #[tokio::test]
    async fn test_update_missing_creates_nothing() {
        let store = MemoryStore::new();
        let patch = CharacterPatch {
            height: Some("175".into()),
            ..Default::default()
        };
        let err = store.update("Ghost", &patch).await.unwrap_err();
        assert!(matches!(err, GraphError::NotFound { .. }));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_leaves_other_fields_alone() {
        let store = MemoryStore::new();
        store.create(&luke()).await.unwrap();
        let patch = CharacterPatch {
            birth_year: Some("19BBY".into()),
            ..Default::default()
        };
        let updated = store.update("Luke Skywalker", &patch).await.unwrap();

        let mut expected = luke();
        expected.birth_year = Some("19BBY".into());
        assert_eq!(updated, expected);
    }

    #[tokio::test]
    async fn test_delete_cascades_relationships() {
        let store = MemoryStore::new();
        store.create(&luke()).await.unwrap();
        store.create(&Character::new("Leia Organa")).await.unwrap();
        store.create(&Character::new("Han Solo")).await.unwrap();
        store
            .relate("Luke Skywalker", "SIBLING_OF", "Leia Organa")
            .await
            .unwrap();
        store
            .relate("Han Solo", "FRIEND_OF", "Luke Skywalker")
            .await
            .unwrap();
        store.relate("Han Solo", "MARRIED_TO", "Leia Organa").await.unwrap();

        store.delete("Luke Skywalker").await.unwrap();

        assert!(store.relationships_of("Luke Skywalker").await.is_empty());
        assert_eq!(store.relationships_of("Leia Organa").await.len(), 1);
        assert!(matches!(
            store.get("Luke Skywalker").await,
            Err(GraphError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_has_no_side_effect() {
        let store = MemoryStore::new();
        store.create(&luke()).await.unwrap();
        let err = store.delete("Darth Vader").await.unwrap_err();
        assert!(matches!(err, GraphError::NotFound { .. }));
        assert_eq!(store.list().await.unwrap(), vec![luke()]);
    }

    #[tokio::test]
    async fn test_offline_store_fails_every_call() {
        let store = MemoryStore::new();
        store.set_available(false);
        assert!(matches!(store.ping().await, Err(GraphError::Connection(_))));
        assert!(matches!(store.list().await, Err(GraphError::Connection(_))));
        store.set_available(true);
        assert!(store.ping().await.is_ok());
    }
}
