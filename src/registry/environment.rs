// ABOUTME: A named key to value table with the substitution pipeline bound to it
// ABOUTME: Lookups are exact and case-sensitive against the keys as stored

use std::borrow::Cow;

use indexmap::IndexMap;

use crate::template::{transform_with, ValueMapper};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    name: String,
    values: IndexMap<String, String>,
}

impl Environment {
    pub fn new(name: impl Into<String>, values: IndexMap<String, String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Keys in the order their rows appeared in the grid
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn values(&self) -> &IndexMap<String, String> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Substitute every `${key}` marker in `text` with this environment's value.
    ///
    /// Markers whose key is not defined here are left exactly as written.
    pub fn transform(&self, text: &str) -> String {
        transform_with(text, self)
    }
}

impl ValueMapper for Environment {
    fn value_for(&self, key: &str) -> Option<Cow<'_, str>> {
        self.get(key).map(Cow::Borrowed)
    }
}
