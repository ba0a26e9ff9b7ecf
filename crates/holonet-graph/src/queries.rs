//! Read operations for Character nodes.

use holonet_core::{AttrValue, Character, CharacterField};

use crate::client::{GraphClient, GraphError};
use crate::cypher;

impl GraphClient {
    // ── Single Node Lookups ──────────────────────────────────────

    /// Get a Character by exact name. Only the first record is used.
    pub async fn get_character(&self, name: &str) -> Result<Character, GraphError> {
        let q = cypher::match_by_name(self.schema(), name).into_query();

        match self.query_one(q).await? {
            Some(row) => row_to_character(&row),
            None => Err(GraphError::NotFound {
                label: self.schema().label().to_string(),
                name: name.to_string(),
            }),
        }
    }

    // ── List Queries ─────────────────────────────────────────────

    /// List every Character in whatever order Neo4j yields them.
    pub async fn list_characters(&self) -> Result<Vec<Character>, GraphError> {
        let q = cypher::match_all(self.schema()).into_query();

        let rows = self.query_rows(q).await?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            results.push(row_to_character(&row)?);
        }
        Ok(results)
    }

    // ── Connectivity ─────────────────────────────────────────────

    /// Round-trip a trivial query to prove the database is reachable.
    pub async fn ping(&self) -> Result<(), GraphError> {
        match self.query_one(cypher::ping().into_query()).await? {
            Some(_) => Ok(()),
            None => Err(GraphError::Connection("ping returned no row".to_string())),
        }
    }
}

/// Pull the `c` column out of a row and shape it into a Character.
pub(crate) fn row_to_character(row: &neo4rs::Row) -> Result<Character, GraphError> {
    let node: neo4rs::Node = row
        .get("c")
        .map_err(|e| GraphError::Serialization(format!("Failed to deserialize node: {e}")))?;
    node_to_character(&node)
}

fn node_to_character(node: &neo4rs::Node) -> Result<Character, GraphError> {
    let name: String = node
        .get("name")
        .map_err(|e| GraphError::Serialization(format!("Character node without name: {e}")))?;

    let mut character = Character::new(name);
    for field in CharacterField::ALL {
        character.set(field, read_attr(node, field.as_str()));
    }
    Ok(character)
}

/// Read a scalar property, keeping whichever type it was stored as.
fn read_attr(node: &neo4rs::Node, key: &str) -> Option<AttrValue> {
    if let Ok(s) = node.get::<String>(key) {
        return Some(AttrValue::Text(s));
    }
    if let Ok(n) = node.get::<i64>(key) {
        return Some(AttrValue::Integer(n));
    }
    if let Ok(f) = node.get::<f64>(key) {
        return Some(AttrValue::Float(f));
    }
    if let Ok(b) = node.get::<bool>(key) {
        return Some(AttrValue::Boolean(b));
    }
    None
}
