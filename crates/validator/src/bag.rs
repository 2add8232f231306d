//! The error bag: ordered, per-field rendered failure messages.

use indexmap::IndexMap;

/// Accumulated validation messages, keyed by field.
///
/// Fields appear in the order their first failure was recorded; messages
/// within a field keep the declared rule order. The bag is append-only
/// during a run and replaced wholesale at the start of the next run.
#[derive(Debug, Clone, Default)]
pub struct ErrorBag {
    messages: IndexMap<String, Vec<String>>,
}

impl ErrorBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message for a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.messages
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// Whether the field has any messages.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.messages.contains_key(field)
    }

    /// All messages for a field, in insertion order.
    #[must_use]
    pub fn get(&self, field: &str) -> &[String] {
        self.messages.get(field).map_or(&[], Vec::as_slice)
    }

    /// The first message for a field, if any.
    #[must_use]
    pub fn first(&self, field: &str) -> Option<&str> {
        self.get(field).first().map(String::as_str)
    }

    /// Every field with its messages.
    #[must_use]
    pub fn all(&self) -> &IndexMap<String, Vec<String>> {
        &self.messages
    }

    /// Total message count across all fields.
    #[must_use]
    pub fn count(&self) -> usize {
        self.messages.values().map(Vec::len).sum()
    }

    /// Whether the bag holds no messages at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Inverse of [`is_empty`](Self::is_empty).
    #[must_use]
    pub fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.messages.clear();
    }
}
