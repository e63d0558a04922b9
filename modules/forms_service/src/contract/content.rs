//! Ordered, duplicate-rejecting key/value map for submitted entry content

use super::error::FormsError;
use indexmap::IndexMap;

/// One submitted `{key, value}` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentField {
    pub key: String,
    pub value: String,
}

impl ContentField {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Insertion-ordered content map whose keys are unique
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentMap {
    fields: IndexMap<String, String>,
}

impl ContentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a key, failing if it is already present.
    ///
    /// The existing value is left untouched on failure.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), FormsError> {
        match self.fields.entry(key.into()) {
            indexmap::map::Entry::Occupied(occupied) => Err(FormsError::DuplicateFieldKey {
                key: occupied.key().clone(),
            }),
            indexmap::map::Entry::Vacant(vacant) => {
                vacant.insert(value.into());
                Ok(())
            }
        }
    }

    /// Build a map from submitted pairs in one pass; the first repeated key aborts.
    pub fn from_fields<I>(fields: I) -> Result<Self, FormsError>
    where
        I: IntoIterator<Item = ContentField>,
    {
        let mut map = Self::new();
        for field in fields {
            map.insert(field.key, field.value)?;
        }
        Ok(map)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Back to `{key, value}` pairs, in insertion order
    pub fn to_fields(&self) -> Vec<ContentField> {
        self.iter().map(|(k, v)| ContentField::new(k, v)).collect()
    }
}
