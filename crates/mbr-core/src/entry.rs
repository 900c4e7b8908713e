//! Directory entries.
//!
//! An entry is keyed by its distinguished name and carries multi-valued
//! attributes. Attribute names are case-insensitive: they are stored
//! lowercased and every accessor lowercases the requested name.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A read-only record returned by a directory search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    dn: String,
    attributes: HashMap<String, Vec<String>>,
    binary_attributes: HashMap<String, Vec<Vec<u8>>>,
}

impl DirectoryEntry {
    /// Creates an entry with no attributes.
    #[must_use]
    pub fn new(dn: impl Into<String>) -> Self {
        Self {
            dn: dn.into(),
            ..Self::default()
        }
    }

    /// Creates an entry from raw attribute maps, folding names to lowercase.
    ///
    /// Values of attributes that differ only in case are concatenated.
    #[must_use]
    pub fn from_parts(
        dn: impl Into<String>,
        attributes: HashMap<String, Vec<String>>,
        binary_attributes: HashMap<String, Vec<Vec<u8>>>,
    ) -> Self {
        let mut entry = Self::new(dn);
        for (name, values) in attributes {
            entry
                .attributes
                .entry(name.to_ascii_lowercase())
                .or_default()
                .extend(values);
        }
        for (name, values) in binary_attributes {
            entry
                .binary_attributes
                .entry(name.to_ascii_lowercase())
                .or_default()
                .extend(values);
        }
        entry
    }

    /// Adds text values to an attribute.
    #[must_use]
    pub fn with_attr<I, V>(mut self, name: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.insert_attr(name, values);
        self
    }

    /// Adds a binary value to an attribute.
    #[must_use]
    pub fn with_binary_attr(mut self, name: &str, value: impl Into<Vec<u8>>) -> Self {
        self.binary_attributes
            .entry(name.to_ascii_lowercase())
            .or_default()
            .push(value.into());
        self
    }

    /// Appends text values to an attribute, creating it if needed.
    ///
    /// An empty iterator still creates the attribute with no values.
    pub fn insert_attr<I, V>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.attributes
            .entry(name.to_ascii_lowercase())
            .or_default()
            .extend(values.into_iter().map(Into::into));
    }

    /// Distinguished name.
    #[must_use]
    pub fn dn(&self) -> &str {
        &self.dn
    }

    /// Gets the first value of a text attribute.
    #[must_use]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.get_attrs(name)
            .and_then(<[String]>::first)
            .map(String::as_str)
    }

    /// Gets all values of a text attribute.
    #[must_use]
    pub fn get_attrs(&self, name: &str) -> Option<&[String]> {
        self.attributes
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
    }

    /// Gets all values of a text attribute, or an empty slice if missing.
    #[must_use]
    pub fn values(&self, name: &str) -> &[String] {
        self.get_attrs(name).unwrap_or(&[])
    }

    /// Gets the first value of a binary attribute.
    ///
    /// Backends that decode values as text when they happen to be valid
    /// UTF-8 store some binary attributes as strings, so the text value is
    /// used as a fallback.
    #[must_use]
    pub fn get_binary_attr(&self, name: &str) -> Option<&[u8]> {
        let key = name.to_ascii_lowercase();
        self.binary_attributes
            .get(&key)
            .and_then(|v| v.first())
            .map(Vec::as_slice)
            .or_else(|| self.get_attr(&key).map(str::as_bytes))
    }

    /// Gets all values of a binary attribute.
    #[must_use]
    pub fn get_binary_attrs(&self, name: &str) -> Option<&[Vec<u8>]> {
        self.binary_attributes
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
    }

    /// Checks if the entry has an attribute (text or binary).
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        let key = name.to_ascii_lowercase();
        self.attributes.contains_key(&key) || self.binary_attributes.contains_key(&key)
    }

    /// Lowercased `objectClass` values.
    #[must_use]
    pub fn object_classes(&self) -> Vec<String> {
        self.values("objectclass")
            .iter()
            .map(|c| c.to_ascii_lowercase())
            .collect()
    }

    /// Checks whether any of the given object classes is present.
    #[must_use]
    pub fn has_any_object_class<S: AsRef<str>>(&self, classes: &[S]) -> bool {
        let present = self.object_classes();
        classes
            .iter()
            .any(|c| present.iter().any(|p| p.eq_ignore_ascii_case(c.as_ref())))
    }

    /// Returns a copy restricted to the requested attributes.
    ///
    /// An empty request or one containing `*` keeps every attribute.
    #[must_use]
    pub fn project<S: AsRef<str>>(&self, requested: &[S]) -> Self {
        if requested.is_empty() || requested.iter().any(|a| a.as_ref() == "*") {
            return self.clone();
        }
        let wanted: Vec<String> = requested
            .iter()
            .map(|a| a.as_ref().to_ascii_lowercase())
            .collect();
        Self {
            dn: self.dn.clone(),
            attributes: self
                .attributes
                .iter()
                .filter(|(k, _)| wanted.contains(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            binary_attributes: self
                .binary_attributes
                .iter()
                .filter(|(k, _)| wanted.contains(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}
