//! Core domain types for the Holonet Character graph.
//!
//! A Character is a graph node keyed by `name`. Every other attribute is
//! optional and untyped: whatever JSON scalar the client sends is stored
//! on the node as-is and returned unchanged.

use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

// ── Attribute Values ──────────────────────────────────────────────

/// A single attribute value, passed through to the graph without coercion.
///
/// Only scalars are accepted because graph node properties cannot hold
/// nested maps. Integers must fit in an `i64` (the graph's integer type);
/// larger ones are rejected rather than widened to a float.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for AttrValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(AttrValueVisitor)
    }
}

struct AttrValueVisitor;

impl<'de> Visitor<'de> for AttrValueVisitor {
    type Value = AttrValue;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("a string, boolean, 64-bit integer or float")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<AttrValue, E> {
        Ok(AttrValue::Boolean(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<AttrValue, E> {
        Ok(AttrValue::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<AttrValue, E> {
        i64::try_from(v)
            .map(AttrValue::Integer)
            .map_err(|_| E::custom(format!("integer {v} does not fit in 64-bit signed range")))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<AttrValue, E> {
        Ok(AttrValue::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<AttrValue, E> {
        Ok(AttrValue::Text(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<AttrValue, E> {
        Ok(AttrValue::Text(v))
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

// ── Fields ────────────────────────────────────────────────────────

/// The fixed set of optional Character attributes.
///
/// Property names in Cypher are taken from this whitelist only, never
/// from client input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterField {
    Height,
    Mass,
    SkinColor,
    HairColor,
    EyeColor,
    BirthYear,
    Gender,
    Homeworld,
    Species,
}

impl CharacterField {
    /// Every attribute, in the order they are written on create.
    pub const ALL: [CharacterField; 9] = [
        Self::Height,
        Self::Mass,
        Self::SkinColor,
        Self::HairColor,
        Self::EyeColor,
        Self::BirthYear,
        Self::Gender,
        Self::Homeworld,
        Self::Species,
    ];

    /// Attributes that may change after creation.
    pub const UPDATABLE: [CharacterField; 3] = [Self::HairColor, Self::Height, Self::BirthYear];

    /// Property name on the graph node and key in JSON bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Height => "height",
            Self::Mass => "mass",
            Self::SkinColor => "skin_color",
            Self::HairColor => "hair_color",
            Self::EyeColor => "eye_color",
            Self::BirthYear => "birth_year",
            Self::Gender => "gender",
            Self::Homeworld => "homeworld",
            Self::Species => "species",
        }
    }

    pub fn is_updatable(&self) -> bool {
        Self::UPDATABLE.contains(self)
    }
}

impl std::fmt::Display for CharacterField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Character ─────────────────────────────────────────────────────

/// A Character node. `name` is the unique key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mass: Option<AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skin_color: Option<AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hair_color: Option<AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eye_color: Option<AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homeworld: Option<AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub species: Option<AttrValue>,
}

impl Character {
    /// A Character with only its name set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            height: None,
            mass: None,
            skin_color: None,
            hair_color: None,
            eye_color: None,
            birth_year: None,
            gender: None,
            homeworld: None,
            species: None,
        }
    }

    /// Builder-style setter, mostly for tests and fixtures.
    pub fn with(mut self, field: CharacterField, value: impl Into<AttrValue>) -> Self {
        *self.slot_mut(field) = Some(value.into());
        self
    }

    pub fn get(&self, field: CharacterField) -> Option<&AttrValue> {
        match field {
            CharacterField::Height => self.height.as_ref(),
            CharacterField::Mass => self.mass.as_ref(),
            CharacterField::SkinColor => self.skin_color.as_ref(),
            CharacterField::HairColor => self.hair_color.as_ref(),
            CharacterField::EyeColor => self.eye_color.as_ref(),
            CharacterField::BirthYear => self.birth_year.as_ref(),
            CharacterField::Gender => self.gender.as_ref(),
            CharacterField::Homeworld => self.homeworld.as_ref(),
            CharacterField::Species => self.species.as_ref(),
        }
    }

    pub fn set(&mut self, field: CharacterField, value: Option<AttrValue>) {
        *self.slot_mut(field) = value;
    }

    /// Supplied attributes in `CharacterField::ALL` order.
    pub fn attributes(&self) -> impl Iterator<Item = (CharacterField, &AttrValue)> + '_ {
        CharacterField::ALL
            .into_iter()
            .filter_map(move |f| self.get(f).map(|v| (f, v)))
    }

    /// Merge a patch: supplied fields overwrite, absent fields are kept.
    pub fn apply(&mut self, patch: &CharacterPatch) {
        for (field, value) in patch.entries() {
            self.set(field, Some(value.clone()));
        }
    }

    fn slot_mut(&mut self, field: CharacterField) -> &mut Option<AttrValue> {
        match field {
            CharacterField::Height => &mut self.height,
            CharacterField::Mass => &mut self.mass,
            CharacterField::SkinColor => &mut self.skin_color,
            CharacterField::HairColor => &mut self.hair_color,
            CharacterField::EyeColor => &mut self.eye_color,
            CharacterField::BirthYear => &mut self.birth_year,
            CharacterField::Gender => &mut self.gender,
            CharacterField::Homeworld => &mut self.homeworld,
            CharacterField::Species => &mut self.species,
        }
    }
}

/// Body of a partial update. Only the updatable subset is representable;
/// any other key in the request body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hair_color: Option<AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<AttrValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_year: Option<AttrValue>,
}

impl CharacterPatch {
    /// Supplied fields in `CharacterField::UPDATABLE` order.
    pub fn entries(&self) -> Vec<(CharacterField, &AttrValue)> {
        [
            (CharacterField::HairColor, self.hair_color.as_ref()),
            (CharacterField::Height, self.height.as_ref()),
            (CharacterField::BirthYear, self.birth_year.as_ref()),
        ]
        .into_iter()
        .filter_map(|(f, v)| v.map(|v| (f, v)))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_values_keep_json_type() {
        let c: Character = serde_json::from_str(
            r#"{"name":"R2-D2","height":96,"mass":32.5,"gender":"n/a","species":null}"#,
        )
        .unwrap();
        assert_eq!(c.height, Some(AttrValue::Integer(96)));
        assert_eq!(c.mass, Some(AttrValue::Float(32.5)));
        assert_eq!(c.gender, Some(AttrValue::Text("n/a".into())));
        assert_eq!(c.species, None);

        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["height"], 96);
        assert_eq!(json["mass"], 32.5);
        assert!(json.get("species").is_none());
    }

    #[test]
    fn test_out_of_range_integer_is_rejected() {
        let err = serde_json::from_str::<Character>(
            r#"{"name":"Big","height":18446744073709551615}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("64-bit"));

        let max: Character =
            serde_json::from_str(r#"{"name":"Big","height":9223372036854775807}"#).unwrap();
        assert_eq!(max.height, Some(AttrValue::Integer(i64::MAX)));
    }

    #[test]
    fn test_nested_values_are_rejected() {
        assert!(serde_json::from_str::<Character>(r#"{"name":"X","mass":[1,2]}"#).is_err());
        assert!(serde_json::from_str::<Character>(r#"{"name":"X","mass":{"kg":1}}"#).is_err());
    }

    #[test]
    fn test_character_requires_name() {
        let err = serde_json::from_str::<Character>(r#"{"height":"172"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn test_plural_colour_keys_are_not_aliases() {
        let c: Character =
            serde_json::from_str(r#"{"name":"Leia Organa","hair_colors":"brown"}"#).unwrap();
        assert_eq!(c.hair_color, None);
    }

    #[test]
    fn test_attributes_follow_field_order() {
        let c = Character::new("Luke Skywalker")
            .with(CharacterField::Species, "Human")
            .with(CharacterField::Height, "172");
        let keys: Vec<&str> = c.attributes().map(|(f, _)| f.as_str()).collect();
        assert_eq!(keys, vec!["height", "species"]);
    }

    #[test]
    fn test_patch_ignores_immutable_fields() {
        let patch: CharacterPatch =
            serde_json::from_str(r#"{"height":"175","species":"Droid"}"#).unwrap();
        let entries = patch.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, CharacterField::Height);
    }

    #[test]
    fn test_apply_is_sparse_merge() {
        let mut c = Character::new("Luke Skywalker")
            .with(CharacterField::Height, "172")
            .with(CharacterField::HairColor, "blond")
            .with(CharacterField::Species, "Human");
        c.apply(&CharacterPatch {
            height: Some("175".into()),
            ..Default::default()
        });
        assert_eq!(c.height, Some("175".into()));
        assert_eq!(c.hair_color, Some("blond".into()));
        assert_eq!(c.species, Some("Human".into()));
    }

    #[test]
    fn test_updatable_subset() {
        assert!(CharacterField::HairColor.is_updatable());
        assert!(CharacterField::Height.is_updatable());
        assert!(CharacterField::BirthYear.is_updatable());
        assert!(!CharacterField::Species.is_updatable());
        assert!(CharacterPatch::default().is_empty());
    }
}
