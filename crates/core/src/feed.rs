//! Feed State
//!
//! What a live view over an external collection exposes to its readers: the
//! latest snapshot plus loading/error flags.

/// Feed State
#[derive(Debug, Clone, PartialEq)]
pub struct FeedState<T> {
    items: Vec<T>,
    loading: bool,
    error: Option<String>,
    revision: u64,
}

impl<T> FeedState<T> {
    /// A feed that has not received anything yet.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            loading: true,
            error: None,
            revision: 0,
        }
    }

    /// Replace the list with a fresh snapshot.
    pub fn apply_snapshot(&mut self, items: Vec<T>) {
        self.items = items;
        self.loading = false;
        self.error = None;
        self.revision = self.revision.wrapping_add(1);
    }

    /// Record a subscription failure, keeping the last good snapshot.
    pub fn apply_error(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.error = Some(message.into());
        self.revision = self.revision.wrapping_add(1);
    }

    /// Latest snapshot.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// `true` until the first snapshot or error arrives.
    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Message of the last subscription failure, cleared by the next snapshot.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Number of updates applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl<T> Default for FeedState<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_loading_without_error() {
        let state: FeedState<u8> = FeedState::new();

        assert!(state.loading());
        assert!(state.items().is_empty());
        assert_eq!(state.error(), None);
    }

    #[test]
    fn error_keeps_items_and_snapshot_clears_error() {
        let mut state = FeedState::new();

        state.apply_snapshot(vec![1, 2]);
        state.apply_error("connection lost");

        assert!(!state.loading());
        assert_eq!(state.items(), [1, 2]);
        assert_eq!(state.error(), Some("connection lost"));

        state.apply_snapshot(vec![3]);

        assert_eq!(state.items(), [3]);
        assert_eq!(state.error(), None);
        assert_eq!(state.revision(), 3);
    }
}
