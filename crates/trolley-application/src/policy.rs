//! Persistence policy for the cart store.

/// What the store does when loading the persisted list fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadFallback {
    /// Log a warning and start with an empty cart (default).
    #[default]
    StartEmpty,
    /// Propagate the load error from `CartStore::open`.
    Fail,
}

/// Storage behavior injected into the cart store.
///
/// # Example
///
/// ```
/// use trolley_application::policy::{LoadFallback, StorePolicy};
///
/// let policy = StorePolicy::new()
///     .with_load_fallback(LoadFallback::StartEmpty)
///     .with_save_retries(1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorePolicy {
    /// Fallback applied when the initial load fails.
    pub load_fallback: LoadFallback,
    /// How many times a failed save is retried before the failure is
    /// logged and dropped.
    pub save_retries: u32,
}

impl Default for StorePolicy {
    fn default() -> Self {
        Self {
            load_fallback: LoadFallback::StartEmpty,
            save_retries: 1,
        }
    }
}

impl StorePolicy {
    /// Creates the default policy: start empty on load failure, one save retry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the load-failure fallback.
    pub fn with_load_fallback(mut self, fallback: LoadFallback) -> Self {
        self.load_fallback = fallback;
        self
    }

    /// Sets the number of save retries.
    pub fn with_save_retries(mut self, retries: u32) -> Self {
        self.save_retries = retries;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = StorePolicy::default();
        assert_eq!(policy.load_fallback, LoadFallback::StartEmpty);
        assert_eq!(policy.save_retries, 1);
    }

    #[test]
    fn test_builder() {
        let policy = StorePolicy::new()
            .with_load_fallback(LoadFallback::Fail)
            .with_save_retries(3);
        assert_eq!(policy.load_fallback, LoadFallback::Fail);
        assert_eq!(policy.save_retries, 3);
    }
}
