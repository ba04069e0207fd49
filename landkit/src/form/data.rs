//! Flat field-name to value mapping collected from a form.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// Submitted form fields in document order. Serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    entries: Vec<(String, String)>,
}

impl FormData {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Set `name` to `value`, replacing an earlier entry with the same name
    /// in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == name) {
            slot.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = Self::new();
        for (name, value) in iter {
            data.insert(name, value);
        }
        data
    }
}

impl Serialize for FormData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut data = FormData::new();
        data.insert("name", "Jane");
        data.insert("email", "jane@example.com");
        data.insert("name", "Janet");
        assert_eq!(data.len(), 2);
        assert_eq!(data.get("name"), Some("Janet"));
        assert_eq!(
            data.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            vec!["name", "email"]
        );
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let data: FormData = [("subject", "Hello"), ("message", "Hi there")]
            .into_iter()
            .collect();
        assert_eq!(
            serde_json::to_string(&data).unwrap(),
            r#"{"subject":"Hello","message":"Hi there"}"#
        );
    }
}
