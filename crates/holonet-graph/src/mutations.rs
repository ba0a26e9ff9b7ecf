//! Write operations for Character nodes.
//!
//! Nodes are identified by `name`. Creation relies on the store's
//! uniqueness constraint to reject duplicates; deletion removes incident
//! relationships and the node inside a single transaction.

use holonet_core::{Character, CharacterPatch};

use crate::client::{GraphClient, GraphError};
use crate::cypher::{self, Schema};
use crate::queries::row_to_character;

/// Neo4j status code raised when a uniqueness constraint rejects a write.
const CONSTRAINT_VALIDATION_FAILED: &str = "Neo.ClientError.Schema.ConstraintValidationFailed";

impl GraphClient {
    /// Install the `name` uniqueness constraint if it is missing.
    pub async fn ensure_schema(&self) -> Result<(), GraphError> {
        self.run(cypher::ensure_name_constraint(self.schema()).into_query())
            .await?;
        tracing::info!(
            label = self.schema().label(),
            constraint = cypher::NAME_CONSTRAINT,
            "Uniqueness constraint ensured"
        );
        Ok(())
    }

    /// Create a Character node and return it as stored.
    pub async fn create_character(&self, character: &Character) -> Result<Character, GraphError> {
        let q = cypher::create(self.schema(), character).into_query();

        match self.query_one(q).await {
            Ok(Some(row)) => row_to_character(&row),
            Ok(None) => Err(GraphError::Serialization(
                "CREATE returned no record".to_string(),
            )),
            Err(GraphError::Query(e)) if is_constraint_violation(&e) => {
                Err(GraphError::ConstraintViolation {
                    label: self.schema().label().to_string(),
                    name: character.name.clone(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Overwrite the supplied updatable fields and return the new state.
    pub async fn update_character(
        &self,
        name: &str,
        patch: &CharacterPatch,
    ) -> Result<Character, GraphError> {
        let q = cypher::update(self.schema(), name, patch).into_query();

        match self.query_one(q).await? {
            Some(row) => row_to_character(&row),
            None => Err(GraphError::NotFound {
                label: self.schema().label().to_string(),
                name: name.to_string(),
            }),
        }
    }

    /// Delete a Character and every relationship touching it.
    ///
    /// Both writes share one transaction: it commits only when a node was
    /// actually removed, and rolls back on a miss or on any fault.
    pub async fn delete_character(&self, name: &str) -> Result<(), GraphError> {
        let mut txn = self.start_txn().await?;

        match delete_in_txn(&mut txn, self.schema(), name).await {
            Ok(deleted) if deleted > 0 => {
                txn.commit().await?;
                tracing::debug!(name, deleted, "Character deleted");
                Ok(())
            }
            Ok(_) => {
                txn.rollback().await?;
                Err(GraphError::NotFound {
                    label: self.schema().label().to_string(),
                    name: name.to_string(),
                })
            }
            Err(e) => {
                if let Err(rollback) = txn.rollback().await {
                    tracing::warn!(name, error = %rollback, "Rollback after failed delete also failed");
                }
                Err(e)
            }
        }
    }
}

async fn delete_in_txn(
    txn: &mut neo4rs::Txn,
    schema: &Schema,
    name: &str,
) -> Result<i64, GraphError> {
    txn.run(cypher::detach_relationships(schema, name).into_query())
        .await?;

    let mut stream = txn
        .execute(cypher::delete_node(schema, name).into_query())
        .await?;
    match stream.next(txn.handle()).await? {
        Some(row) => deleted_count(&row),
        None => Ok(0),
    }
}

/// Read the `deleted` column; a row that cannot be decoded is a fault,
/// not a miss.
fn deleted_count(row: &neo4rs::Row) -> Result<i64, GraphError> {
    row.get::<i64>("deleted")
        .map_err(|e| GraphError::Serialization(format!("Failed to read deleted count: {e}")))
}

fn is_constraint_violation(err: &neo4rs::Error) -> bool {
    matches!(err, neo4rs::Error::Neo4j(e) if e.code() == CONSTRAINT_VALIDATION_FAILED)
}
