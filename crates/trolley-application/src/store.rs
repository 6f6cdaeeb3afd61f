//! Cart store service.
//!
//! Owns the current cart list, applies mutations, notifies subscribers and
//! mirrors every new list to the configured repository. The in-memory list
//! is authoritative: a persistence failure never rolls a mutation back.

use std::sync::{Arc, Weak};

use tokio::sync::{Mutex, watch};

use trolley_core::TrolleyError;
use trolley_core::cart::{Cart, CartRepository, NewCartItem};
use trolley_core::error::Result;

use crate::policy::{LoadFallback, StorePolicy};

/// The cart store.
///
/// Construct one at application startup with [`CartStore::open`] and hand
/// [`CartHandle`]s to consumers. The current list lives in a watch channel,
/// so every consumer reads the same snapshot and observes each replacement
/// on its next notification cycle.
pub struct CartStore {
    inner: Arc<StoreInner>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore").finish_non_exhaustive()
    }
}

struct StoreInner {
    repository: Arc<dyn CartRepository>,
    policy: StorePolicy,
    /// Serializes the compute-publish-persist sequence of each mutation.
    writer: Mutex<()>,
    /// Latest published list.
    tx: watch::Sender<Cart>,
}

impl CartStore {
    /// Opens the store, loading the previously persisted list once.
    ///
    /// A read or decode failure is decided by the policy: with
    /// [`LoadFallback::StartEmpty`] the store logs a warning and starts with
    /// an empty cart; with [`LoadFallback::Fail`] the error is returned.
    pub async fn open(repository: Arc<dyn CartRepository>, policy: StorePolicy) -> Result<Self> {
        let initial = match repository.load().await {
            Ok(Some(cart)) => cart,
            Ok(None) => Cart::new(),
            Err(e) => match policy.load_fallback {
                LoadFallback::StartEmpty => {
                    tracing::warn!(error = %e, "cart cache unavailable, starting empty");
                    Cart::new()
                }
                LoadFallback::Fail => return Err(e),
            },
        };

        let (tx, _rx) = watch::channel(initial);

        Ok(Self {
            inner: Arc::new(StoreInner {
                repository,
                policy,
                writer: Mutex::new(()),
                tx,
            }),
        })
    }

    /// Adds a product to the cart.
    ///
    /// An already present id bumps the existing entry's quantity instead of
    /// creating a duplicate. The new list is published and persisted;
    /// persistence failure is handled by the store's policy and not
    /// reported to the caller.
    pub async fn add_to_cart(&self, product: NewCartItem) {
        self.inner.apply(move |cart| cart.add(product)).await;
    }

    /// Increments the quantity of the entry matching `id`.
    ///
    /// An absent id leaves the list unchanged; the unchanged list is still
    /// re-persisted.
    pub async fn increment(&self, id: &str) {
        self.inner.apply(|cart| cart.increment(id)).await;
    }

    /// Decrements the quantity of the entry matching `id`, removing the
    /// entry when its quantity is one.
    ///
    /// An absent id leaves the list unchanged; the unchanged list is still
    /// re-persisted.
    pub async fn decrement(&self, id: &str) {
        self.inner.apply(|cart| cart.decrement(id)).await;
    }

    /// Returns the current list snapshot.
    pub fn items(&self) -> Cart {
        self.inner.tx.borrow().clone()
    }

    /// Subscribes to list replacements.
    ///
    /// The receiver's `borrow()` is always the latest published list.
    pub fn subscribe(&self) -> watch::Receiver<Cart> {
        self.inner.tx.subscribe()
    }

    /// Returns a consumer handle scoped to this store's lifetime.
    pub fn handle(&self) -> CartHandle {
        CartHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl StoreInner {
    /// Applies a functional mutation to the current list, publishes the new
    /// list and mirrors it to storage.
    ///
    /// The writer lock is held across the whole sequence so back-to-back
    /// mutations never compute against the same stale base list.
    async fn apply(&self, mutate: impl FnOnce(&Cart) -> Cart) {
        let _guard = self.writer.lock().await;

        let current = self.tx.borrow().clone();
        let next = mutate(&current);
        self.tx.send_replace(next.clone());

        self.persist(&next).await;
    }

    /// Mirrors the list to the repository, retrying per policy.
    ///
    /// The in-memory list stays authoritative whatever happens here.
    async fn persist(&self, cart: &Cart) {
        let mut attempts = 0;
        loop {
            match self.repository.save(cart).await {
                Ok(()) => return,
                Err(e) if attempts < self.policy.save_retries => {
                    attempts += 1;
                    tracing::warn!(error = %e, attempt = attempts, "cart save failed, retrying");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "cart save failed, keeping in-memory state");
                    return;
                }
            }
        }
    }
}

/// Consumer-facing handle to a [`CartStore`].
///
/// Handles are cheap to clone and hand out across the application. Every
/// operation fails with [`TrolleyError::StoreClosed`] once the owning store
/// has been dropped, rather than silently acting on a defunct cart.
#[derive(Clone)]
pub struct CartHandle {
    inner: Weak<StoreInner>,
}

impl CartHandle {
    fn inner(&self) -> Result<Arc<StoreInner>> {
        self.inner.upgrade().ok_or(TrolleyError::StoreClosed)
    }

    /// Adds a product to the cart. See [`CartStore::add_to_cart`].
    pub async fn add_to_cart(&self, product: NewCartItem) -> Result<()> {
        let inner = self.inner()?;
        inner.apply(move |cart| cart.add(product)).await;
        Ok(())
    }

    /// Increments the entry matching `id`. See [`CartStore::increment`].
    pub async fn increment(&self, id: &str) -> Result<()> {
        let inner = self.inner()?;
        inner.apply(|cart| cart.increment(id)).await;
        Ok(())
    }

    /// Decrements the entry matching `id`. See [`CartStore::decrement`].
    pub async fn decrement(&self, id: &str) -> Result<()> {
        let inner = self.inner()?;
        inner.apply(|cart| cart.decrement(id)).await;
        Ok(())
    }

    /// Returns the current list snapshot.
    pub fn items(&self) -> Result<Cart> {
        Ok(self.inner()?.tx.borrow().clone())
    }

    /// Subscribes to list replacements.
    pub fn subscribe(&self) -> Result<watch::Receiver<Cart>> {
        Ok(self.inner()?.tx.subscribe())
    }
}
