//! Cypher statement builder for Character operations.
//!
//! Statements are plain data (text plus named parameters) so they can be
//! inspected without a database. Property keys come from
//! [`CharacterField`] and the label from a validated [`Schema`]; every
//! client-supplied value is bound as a `$parameter`.

use neo4rs::{query, BoltType, Query};

use holonet_core::{AttrValue, Character, CharacterPatch};

use crate::client::GraphError;

/// Name of the uniqueness constraint on `Character.name`.
pub const NAME_CONSTRAINT: &str = "character_name_unique";

/// Validated node label for Character nodes.
///
/// Labels cannot be bound as parameters, so they are restricted to
/// ASCII identifiers before being written into Cypher text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    label: String,
}

impl Schema {
    pub fn new(label: &str) -> Result<Self, GraphError> {
        let mut chars = label.chars();
        let valid = match chars.next() {
            Some(first) => {
                (first.is_ascii_alphabetic() || first == '_')
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            None => false,
        };
        if !valid {
            return Err(GraphError::InvalidSchema(format!(
                "label {label:?} must be an ASCII identifier"
            )));
        }
        Ok(Self {
            label: label.to_string(),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            label: "Character".to_string(),
        }
    }
}

/// A Cypher statement with its named parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    text: String,
    params: Vec<(String, AttrValue)>,
}

impl Statement {
    fn new(text: String) -> Self {
        Self {
            text,
            params: Vec::new(),
        }
    }

    fn bind(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.params.push((key.to_string(), value.into()));
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn params(&self) -> &[(String, AttrValue)] {
        &self.params
    }

    /// Look up a bound parameter by name.
    pub fn param(&self, key: &str) -> Option<&AttrValue> {
        self.params.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Convert into a neo4rs query ready for execution.
    pub fn into_query(self) -> Query {
        self.params
            .into_iter()
            .fold(query(&self.text), |q, (key, value)| {
                q.param(&key, bolt_value(value))
            })
    }
}

fn bolt_value(value: AttrValue) -> BoltType {
    match value {
        AttrValue::Boolean(b) => b.into(),
        AttrValue::Integer(n) => n.into(),
        AttrValue::Float(f) => f.into(),
        AttrValue::Text(s) => s.into(),
    }
}

// ── Builders ─────────────────────────────────────────────────────

/// `CREATE` a node carrying the name and every supplied attribute.
pub fn create(schema: &Schema, character: &Character) -> Statement {
    let mut props = vec!["name: $name".to_string()];
    let mut params = vec![("name", AttrValue::from(character.name.as_str()))];
    for (field, value) in character.attributes() {
        let key = field.as_str();
        props.push(format!("{key}: ${key}"));
        params.push((key, value.clone()));
    }

    let text = format!(
        "CREATE (c:{label} {{{props}}})\nRETURN c",
        label = schema.label(),
        props = props.join(", ")
    );
    params
        .into_iter()
        .fold(Statement::new(text), |s, (k, v)| s.bind(k, v))
}

/// Match every Character node. No ordering is imposed.
pub fn match_all(schema: &Schema) -> Statement {
    Statement::new(format!("MATCH (c:{})\nRETURN c", schema.label()))
}

pub fn match_by_name(schema: &Schema, name: &str) -> Statement {
    Statement::new(format!(
        "MATCH (c:{} {{name: $name}})\nRETURN c",
        schema.label()
    ))
    .bind("name", name)
}

/// Sparse update: only the supplied updatable fields get a `SET` item.
/// An empty patch degrades to a plain match so existence is still checked.
pub fn update(schema: &Schema, name: &str, patch: &CharacterPatch) -> Statement {
    let entries = patch.entries();
    let mut text = format!("MATCH (c:{} {{name: $name}})\n", schema.label());
    if !entries.is_empty() {
        let sets: Vec<String> = entries
            .iter()
            .map(|(field, _)| format!("c.{key} = ${key}", key = field.as_str()))
            .collect();
        text.push_str(&format!("SET {}\n", sets.join(", ")));
    }
    text.push_str("RETURN c");

    entries.into_iter().fold(
        Statement::new(text).bind("name", name),
        |s, (field, value)| s.bind(field.as_str(), value.clone()),
    )
}

/// First half of a delete: drop every relationship touching the node.
pub fn detach_relationships(schema: &Schema, name: &str) -> Statement {
    Statement::new(format!(
        "MATCH (c:{} {{name: $name}})-[r]-()\nDELETE r",
        schema.label()
    ))
    .bind("name", name)
}

/// Second half of a delete: drop the node and report how many went.
pub fn delete_node(schema: &Schema, name: &str) -> Statement {
    Statement::new(format!(
        "MATCH (c:{} {{name: $name}})\nDELETE c\nRETURN count(c) AS deleted",
        schema.label()
    ))
    .bind("name", name)
}

pub fn ensure_name_constraint(schema: &Schema) -> Statement {
    Statement::new(format!(
        "CREATE CONSTRAINT {NAME_CONSTRAINT} IF NOT EXISTS\nFOR (c:{}) REQUIRE c.name IS UNIQUE",
        schema.label()
    ))
}

pub fn ping() -> Statement {
    Statement::new("RETURN 1 AS ok".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use holonet_core::CharacterField;

    fn luke() -> Character {
        Character::new("Luke Skywalker")
            .with(CharacterField::Height, "172")
            .with(CharacterField::Mass, "77")
            .with(CharacterField::Species, "Human")
    }

    #[test]
    fn test_schema_rejects_non_identifiers() {
        assert!(Schema::new("Character").is_ok());
        assert!(Schema::new("_Legacy2").is_ok());
        assert!(Schema::new("").is_err());
        assert!(Schema::new("9Lives").is_err());
        assert!(Schema::new("Character) DETACH DELETE (n").is_err());
    }

    #[test]
    fn test_create_binds_only_supplied_fields() {
        let stmt = create(&Schema::default(), &luke());
        assert_eq!(
            stmt.text(),
            "CREATE (c:Character {name: $name, height: $height, mass: $mass, species: $species})\nRETURN c"
        );
        assert_eq!(stmt.params().len(), 4);
        assert_eq!(stmt.param("name"), Some(&"Luke Skywalker".into()));
        assert_eq!(stmt.param("species"), Some(&"Human".into()));
        assert_eq!(stmt.param("gender"), None);
    }

    #[test]
    fn test_values_never_reach_query_text() {
        let hostile = "x'}) MATCH (n) DETACH DELETE n //";
        let c = Character::new(hostile).with(CharacterField::Homeworld, hostile);
        for stmt in [
            create(&Schema::default(), &c),
            match_by_name(&Schema::default(), hostile),
            detach_relationships(&Schema::default(), hostile),
            delete_node(&Schema::default(), hostile),
        ] {
            assert!(!stmt.text().contains(hostile));
            assert_eq!(stmt.param("name"), Some(&hostile.into()));
        }
    }

    #[test]
    fn test_update_sets_only_supplied_fields() {
        let patch = CharacterPatch {
            height: Some("175".into()),
            ..Default::default()
        };
        let stmt = update(&Schema::default(), "Luke Skywalker", &patch);
        assert_eq!(
            stmt.text(),
            "MATCH (c:Character {name: $name})\nSET c.height = $height\nRETURN c"
        );
        assert_eq!(stmt.params().len(), 2);
    }

    #[test]
    fn test_update_with_empty_patch_only_matches() {
        let stmt = update(&Schema::default(), "Han Solo", &CharacterPatch::default());
        assert_eq!(stmt.text(), "MATCH (c:Character {name: $name})\nRETURN c");
    }

    #[test]
    fn test_label_flows_into_every_statement() {
        let schema = Schema::new("Characters").unwrap();
        assert!(match_all(&schema).text().starts_with("MATCH (c:Characters)"));
        assert!(delete_node(&schema, "Yoda").text().contains("(c:Characters {name: $name})"));
        assert!(ensure_name_constraint(&schema)
            .text()
            .contains("FOR (c:Characters) REQUIRE c.name IS UNIQUE"));
    }

    #[test]
    fn test_delete_counts_nodes() {
        let stmt = delete_node(&Schema::default(), "Yoda");
        assert!(stmt.text().ends_with("RETURN count(c) AS deleted"));
        let detach = detach_relationships(&Schema::default(), "Yoda");
        assert!(detach.text().contains("-[r]-()"));
    }
}
