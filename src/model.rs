use crate::StoreError;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Keys owned by the service or the storage layer; never taken from clients
/// and never returned to them.
const RESERVED_KEYS: [&str; 3] = ["id", "_id", "__v"];

/// Storage-internal keys stripped from every document read back.
const STORAGE_KEYS: [&str; 2] = ["_id", "__v"];

/// Field names must be plain top-level keys: a dot would address a nested
/// path and a leading `$` would be read as an operator by the store.
fn check_field_key(key: &str) -> Result<(), StoreError> {
    if key.is_empty() || key.contains('.') || key.starts_with('$') {
        return Err(StoreError::validation(format!("invalid field name `{key}`")));
    }
    Ok(())
}

fn check_field_keys<'a>(keys: impl IntoIterator<Item = &'a String>) -> Result<(), StoreError> {
    keys.into_iter().try_for_each(|key| check_field_key(key))
}

/// Externally visible, service-assigned record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PokemonId(i64);

impl PokemonId {
    /// Identifier handed out when the collection is empty.
    pub const FIRST: PokemonId = PokemonId(1);

    pub const fn new(value: i64) -> Self {
        PokemonId(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }

    /// The identifier following `self` in allocation order, if any.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(PokemonId)
    }

    /// Id for a new record given the current maximum: `max + 1`, or
    /// [`PokemonId::FIRST`] for an empty collection.
    pub fn allocate(max: Option<PokemonId>) -> Result<Self, StoreError> {
        match max {
            None => Ok(PokemonId::FIRST),
            Some(max) => max.next().ok_or(StoreError::IdAllocation { attempts: 1 }),
        }
    }
}

impl fmt::Display for PokemonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A path segment that does not parse as an integer id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid pokemon id: {0}")]
pub struct ParseIdError(pub String);

impl FromStr for PokemonId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(PokemonId)
            .map_err(|_| ParseIdError(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for PokemonId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Documents imported by other tools may carry integral doubles.
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Float(f64),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Int(value) => Ok(PokemonId(value)),
            RawId::Float(value) if value.fract() == 0.0 && value.is_finite() => {
                Ok(PokemonId(value as i64))
            }
            RawId::Float(value) => Err(serde::de::Error::custom(format!(
                "pokemon id must be an integer, got {value}"
            ))),
        }
    }
}

/// Localized names. `english` and `french` are searchable; any other
/// language keys ride along untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonName {
    pub english: String,
    pub french: String,
    #[serde(flatten)]
    pub translations: Map<String, Value>,
}

impl PokemonName {
    pub fn new(english: impl Into<String>, french: impl Into<String>) -> Self {
        Self {
            english: english.into(),
            french: french.into(),
            translations: Map::new(),
        }
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        check_field_keys(self.translations.keys())?;
        if self.english.trim().is_empty() {
            return Err(StoreError::validation("name.english: Path `english` is required."));
        }
        if self.french.trim().is_empty() {
            return Err(StoreError::validation("name.french: Path `french` is required."));
        }
        Ok(())
    }

    /// True when either searchable name matches `pattern`.
    pub fn matches(&self, pattern: &Regex) -> bool {
        pattern.is_match(&self.english) || pattern.is_match(&self.french)
    }
}

/// A stored pokemon: typed `id` and `name`, everything else pass-through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pokemon {
    pub id: PokemonId,
    pub name: PokemonName,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Pokemon {
    /// Decode a document read from storage, dropping storage-internal keys.
    pub fn from_stored(mut fields: Map<String, Value>) -> Result<Self, StoreError> {
        for key in STORAGE_KEYS {
            fields.remove(key);
        }
        Ok(serde_json::from_value(Value::Object(fields))?)
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        check_field_keys(self.attributes.keys())?;
        self.name.validate()
    }

    /// Replace the top-level fields named by `patch` and re-validate.
    pub fn apply(&self, patch: &PokemonPatch) -> Result<Pokemon, StoreError> {
        let mut fields = match serde_json::to_value(self)? {
            Value::Object(fields) => fields,
            other => {
                return Err(StoreError::Serialization(format!(
                    "pokemon serialized to non-object {other}"
                )));
            }
        };
        for (key, value) in patch.fields() {
            fields.insert(key.clone(), value.clone());
        }

        let updated: Pokemon =
            serde_json::from_value(Value::Object(fields)).map_err(StoreError::validation)?;
        updated.validate()?;
        Ok(updated)
    }
}

/// Body of a create request. The service assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPokemon {
    pub name: PokemonName,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl NewPokemon {
    pub fn new(name: PokemonName) -> Self {
        Self {
            name,
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        check_field_keys(
            self.attributes
                .keys()
                .filter(|key| !RESERVED_KEYS.contains(&key.as_str())),
        )?;
        self.name.validate()
    }

    pub fn into_pokemon(mut self, id: PokemonId) -> Pokemon {
        for key in RESERVED_KEYS {
            self.attributes.remove(key);
        }
        Pokemon {
            id,
            name: self.name,
            attributes: self.attributes,
        }
    }
}

/// Body of an update request: top-level fields to replace.
///
/// Reserved keys are dropped on construction, so a patch can never move a
/// record to another id.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct PokemonPatch {
    fields: Map<String, Value>,
}

impl From<Map<String, Value>> for PokemonPatch {
    fn from(mut fields: Map<String, Value>) -> Self {
        for key in RESERVED_KEYS {
            fields.remove(key);
        }
        Self { fields }
    }
}

impl PokemonPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if !RESERVED_KEYS.contains(&key.as_str()) {
            self.fields.insert(key, value);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Check the fields the patch touches: every key must be a plain
    /// top-level name, and `name`, if present, must be a complete name.
    pub fn validate(&self) -> Result<(), StoreError> {
        check_field_keys(self.fields.keys())?;
        if let Some(name) = self.fields.get("name") {
            let name = PokemonName::deserialize(name)
                .map_err(|err| StoreError::validation(format!("name: {err}")))?;
            name.validate()?;
        }
        Ok(())
    }
}

/// Case-insensitive literal substring pattern for name search.
pub fn name_pattern(fragment: &str) -> Result<Regex, StoreError> {
    regex::RegexBuilder::new(&regex::escape(fragment))
        .case_insensitive(true)
        .build()
        .map_err(StoreError::validation)
}
