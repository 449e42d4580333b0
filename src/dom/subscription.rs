//! Listener handles with explicit teardown.

#[cfg(test)]
#[path = "subscription_test.rs"]
mod subscription_test;

/// Keeps a listener (or observer) registered until dropped or unsubscribed.
#[must_use = "dropping a Subscription removes its listener"]
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wrap the closure that unregisters the listener.
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self { teardown: Some(Box::new(teardown)) }
    }

    /// Fold several subscriptions into one that tears all of them down.
    pub fn all(parts: Vec<Subscription>) -> Self {
        Self::new(move || drop(parts))
    }

    pub fn unsubscribe(mut self) {
        self.run_teardown();
    }

    fn run_teardown(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_teardown();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("active", &self.teardown.is_some()).finish()
    }
}
