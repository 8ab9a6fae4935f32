//! The cart engine: owns the cart state for one shopping session.

use std::sync::Arc;

use chrono::Utc;
use jewel_cache::KvStore;
use jewel_observability::StructuredLogger;
use tokio::sync::watch;

use crate::cart::reducer::{INVALID_PRODUCT_MESSAGE, LOAD_FAILED_MESSAGE};
use crate::cart::writer::SnapshotWriter;
use crate::cart::{reduce, CartAction, CartState, PersistedCart, CART_STORAGE_KEY};
use crate::catalog::Product;
use crate::money::{Currency, Money};

/// Shopping-cart state container.
///
/// Mutations are synchronous and apply to the in-memory state immediately.
/// Every settled change to the persisted fields queues a full snapshot for
/// the key-value store; write failures are logged and otherwise ignored.
///
/// # Example
///
/// ```rust,ignore
/// let store: Arc<dyn KvStore> = Arc::new(FileStore::open(".jewel").await?);
/// let mut cart = CartEngine::open(store, StructuredLogger::new("cart")).await;
///
/// cart.add_item(Some(&product), 2);
/// println!("Total: {}", cart.state().total.display(cart.state().currency));
/// cart.flush().await;
/// ```
pub struct CartEngine {
    state: CartState,
    store: Arc<dyn KvStore>,
    writer: SnapshotWriter,
    updates: watch::Sender<CartState>,
    logger: StructuredLogger,
    load_started: bool,
}

impl CartEngine {
    /// Create an engine in the loading state. Call [`CartEngine::load`] next.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn new(store: Arc<dyn KvStore>, logger: StructuredLogger) -> Self {
        let state = CartState::initial();
        let (updates, _) = watch::channel(state.clone());
        let writer = SnapshotWriter::spawn(store.clone(), CART_STORAGE_KEY, logger.clone());
        Self {
            state,
            store,
            writer,
            updates,
            logger,
            load_started: false,
        }
    }

    /// Create an engine and load the persisted cart.
    pub async fn open(store: Arc<dyn KvStore>, logger: StructuredLogger) -> Self {
        let mut engine = Self::new(store, logger);
        engine.load().await;
        engine
    }

    /// Read the persisted snapshot once and leave the loading state.
    ///
    /// A missing snapshot yields an empty cart. A corrupt one is deleted
    /// and yields an empty cart without an error. A failed read yields an
    /// empty cart with `error` set. Calling this again does nothing.
    pub async fn load(&mut self) {
        if self.load_started {
            return;
        }
        self.load_started = true;
        self.dispatch(CartAction::Loading);

        match self.store.get(CART_STORAGE_KEY).await {
            Ok(Some(bytes)) => match PersistedCart::decode(&bytes) {
                Ok(snapshot) => {
                    self.logger
                        .info_builder("cart loaded")
                        .field_i64("items", snapshot.items.len() as i64)
                        .field("currency", snapshot.currency.code())
                        .emit();
                    self.dispatch(CartAction::Loaded(snapshot));
                }
                Err(e) => {
                    self.logger
                        .warn_builder("discarding corrupt cart snapshot")
                        .field("reason", e.to_string())
                        .emit();
                    self.discard_snapshot().await;
                    self.dispatch(CartAction::Loaded(PersistedCart::empty()));
                }
            },
            Ok(None) => {
                self.logger.debug("no saved cart; starting empty");
                self.dispatch(CartAction::Loaded(PersistedCart::empty()));
            }
            Err(e) => {
                self.logger
                    .error_builder("failed to load cart")
                    .field("error", e.to_string())
                    .emit();
                self.discard_snapshot().await;
                self.dispatch(CartAction::LoadFailed(LOAD_FAILED_MESSAGE.to_string()));
            }
        }
    }

    /// Current state.
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// Receive every settled state, starting with the current one.
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.updates.subscribe()
    }

    /// Add `quantity` of a product, merging with an existing line.
    ///
    /// Non-positive quantities are ignored. A missing product, or one
    /// without an id, a name or a valid price, sets `error` and changes
    /// nothing else.
    pub fn add_item(&mut self, product: Option<&Product>, quantity: i64) {
        if quantity <= 0 {
            return;
        }
        let product = match product {
            Some(p) => p,
            None => return self.reject_product("no product given"),
        };
        if let Err(e) = product.validate_for_cart() {
            return self.reject_product(&e.to_string());
        }
        self.dispatch(CartAction::AddItem {
            product: product.clone(),
            quantity,
        });
    }

    /// Remove a product's line. Unknown or empty ids are ignored.
    pub fn remove_item(&mut self, product_id: &str) {
        if product_id.is_empty() {
            return;
        }
        self.dispatch(CartAction::RemoveItem(product_id.into()));
    }

    /// Set a product's quantity exactly; 0 removes the line.
    ///
    /// Empty ids and negative quantities are ignored.
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) {
        if product_id.is_empty() || quantity < 0 {
            return;
        }
        self.dispatch(CartAction::UpdateQuantity {
            product_id: product_id.into(),
            quantity,
        });
    }

    /// Empty the cart and zero the totals; the currency is kept.
    pub fn clear_cart(&mut self) {
        self.dispatch(CartAction::ClearCart);
    }

    /// Change the display currency. Prices are not converted.
    pub fn update_currency(&mut self, currency: Currency) {
        self.dispatch(CartAction::UpdateCurrency(currency));
    }

    /// Acknowledge the current error.
    pub fn clear_error(&mut self) {
        self.dispatch(CartAction::ClearError);
    }

    /// Quantity of a product in the cart, 0 if absent.
    pub fn item_quantity(&self, product_id: &str) -> i64 {
        self.state.item_quantity(product_id)
    }

    /// `price × quantity` for a product, 0 if absent.
    pub fn item_total(&self, product_id: &str) -> Money {
        self.state.item_total(product_id)
    }

    /// Wait for every queued snapshot write to finish.
    pub async fn flush(&self) {
        self.writer.flush().await;
    }

    fn reject_product(&mut self, reason: &str) {
        self.logger
            .warn_builder("rejected add to cart")
            .field("reason", reason)
            .emit();
        self.dispatch(CartAction::Rejected(INVALID_PRODUCT_MESSAGE.to_string()));
    }

    fn dispatch(&mut self, action: CartAction) {
        let next = reduce(&self.state, action);
        let persist =
            !next.is_loading && (self.state.is_loading || !next.same_persisted_fields(&self.state));
        self.state = next;
        if persist {
            self.persist();
        }
        self.updates.send_replace(self.state.clone());
    }

    fn persist(&self) {
        match PersistedCart::from_state(&self.state, Utc::now()).encode() {
            Ok(bytes) => self.writer.persist(bytes),
            Err(e) => self
                .logger
                .error_builder("failed to encode cart")
                .field("error", e.to_string())
                .emit(),
        }
    }

    async fn discard_snapshot(&self) {
        if let Err(e) = self.store.delete(CART_STORAGE_KEY).await {
            self.logger
                .warn_builder("failed to delete cart snapshot")
                .field("error", e.to_string())
                .emit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::reducer::INVALID_QUANTITY_MESSAGE;
    use async_trait::async_trait;
    use jewel_cache::{CacheError, MemoryStore};
    use jewel_observability::{LogLevel, MemorySink};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Memory store with switchable failures and a write counter.
    #[derive(Default)]
    struct TestStore {
        inner: MemoryStore,
        fail_reads: AtomicBool,
        fail_writes: AtomicBool,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl KvStore for TestStore {
        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
            if self.fail_reads.load(Ordering::SeqCst) {
                return Err(CacheError::StoreError("disk on fire".to_string()));
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: &[u8]) -> Result<(), CacheError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(CacheError::StoreError("quota exceeded".to_string()));
            }
            self.inner.set(key, value).await
        }

        async fn delete(&self, key: &str) -> Result<(), CacheError> {
            self.inner.delete(key).await
        }

        async fn keys(&self) -> Result<Vec<String>, CacheError> {
            self.inner.keys().await
        }
    }

    impl TestStore {
        fn writes(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }

        async fn saved(&self) -> Option<PersistedCart> {
            let bytes = self.inner.get(CART_STORAGE_KEY).await.unwrap()?;
            Some(PersistedCart::decode(&bytes).unwrap())
        }
    }

    fn logger(sink: &Arc<MemorySink>) -> StructuredLogger {
        StructuredLogger::new("cart")
            .with_min_level(LogLevel::Debug)
            .with_sink(sink.clone())
    }

    async fn open(store: &Arc<TestStore>) -> CartEngine {
        let sink = Arc::new(MemorySink::default());
        CartEngine::open(store.clone(), logger(&sink)).await
    }

    fn ring(price_units: i64) -> Product {
        Product::new("ring-1", "Solitaire Ring", Money::from_units(price_units))
    }

    fn necklace(price_units: i64) -> Product {
        Product::new("neck-1", "Pearl Necklace", Money::from_units(price_units))
    }

    #[tokio::test]
    async fn test_starts_loading_then_ready_empty() {
        let store = Arc::new(TestStore::default());
        let sink = Arc::new(MemorySink::default());
        let mut engine = CartEngine::new(store.clone(), logger(&sink));
        assert!(engine.state().is_loading);

        engine.load().await;
        assert!(!engine.state().is_loading);
        assert!(engine.state().is_empty());
        assert_eq!(engine.state().currency, Currency::EUR);
        assert!(engine.state().error.is_none());
    }

    #[tokio::test]
    async fn test_add_merges_quantities() {
        let store = Arc::new(TestStore::default());
        let mut engine = open(&store).await;

        engine.add_item(Some(&ring(100)), 2);
        engine.add_item(Some(&ring(100)), 3);

        assert_eq!(engine.state().items.len(), 1);
        assert_eq!(engine.item_quantity("ring-1"), 5);
        assert_eq!(engine.item_total("ring-1"), Money::from_units(500));
    }

    #[tokio::test]
    async fn test_add_none_sets_error_and_keeps_items() {
        let store = Arc::new(TestStore::default());
        let mut engine = open(&store).await;
        engine.add_item(Some(&ring(100)), 1);
        let before = engine.state().items.clone();

        engine.add_item(None, 1);

        assert_eq!(engine.state().items, before);
        assert_eq!(engine.state().error.as_deref(), Some(INVALID_PRODUCT_MESSAGE));
    }

    #[tokio::test]
    async fn test_add_invalid_product_sets_error() {
        let store = Arc::new(TestStore::default());
        let mut engine = open(&store).await;

        engine.add_item(Some(&Product::new("", "Nameless", Money::from_units(1))), 1);
        assert_eq!(engine.state().error.as_deref(), Some(INVALID_PRODUCT_MESSAGE));
        assert!(engine.state().is_empty());

        engine.clear_error();
        engine.add_item(Some(&Product::new("x", "", Money::from_units(1))), 1);
        assert_eq!(engine.state().error.as_deref(), Some(INVALID_PRODUCT_MESSAGE));
    }

    #[tokio::test]
    async fn test_add_non_positive_quantity_ignored_even_for_bad_product() {
        let store = Arc::new(TestStore::default());
        let mut engine = open(&store).await;

        engine.add_item(None, 0);
        assert!(engine.state().error.is_none());
    }

    #[tokio::test]
    async fn test_update_quantity_rules() {
        let store = Arc::new(TestStore::default());
        let mut engine = open(&store).await;
        engine.add_item(Some(&ring(100)), 2);

        engine.update_quantity("ring-1", -1);
        assert_eq!(engine.item_quantity("ring-1"), 2);

        engine.update_quantity("", 4);
        assert_eq!(engine.item_quantity("ring-1"), 2);

        // only an exact id match is touched
        engine.update_quantity(" ", 4);
        engine.remove_item(" ");
        assert_eq!(engine.item_quantity("ring-1"), 2);

        engine.update_quantity("ring-1", 4);
        assert_eq!(engine.item_quantity("ring-1"), 4);

        engine.update_quantity("ring-1", 0);
        assert!(engine.state().is_empty());
    }

    #[tokio::test]
    async fn test_totals_follow_thresholds() {
        let store = Arc::new(TestStore::default());
        let mut engine = open(&store).await;

        engine.add_item(Some(&ring(100)), 1);
        assert_eq!(engine.state().shipping, Money::from_units(15));

        engine.add_item(Some(&necklace(500)), 1);
        let state = engine.state();
        assert_eq!(state.subtotal, Money::from_units(600));
        assert_eq!(state.shipping, Money::ZERO);
        assert_eq!(state.tax, Money::from_units(126));
        assert_eq!(state.total, Money::from_units(726));
    }

    #[tokio::test]
    async fn test_clear_cart_keeps_currency() {
        let store = Arc::new(TestStore::default());
        let mut engine = open(&store).await;
        engine.update_currency(Currency::USD);
        engine.add_item(Some(&ring(1000)), 1);

        engine.clear_cart();

        let state = engine.state();
        assert!(state.is_empty());
        assert_eq!(state.subtotal, Money::ZERO);
        assert_eq!(state.tax, Money::ZERO);
        assert_eq!(state.shipping, Money::ZERO);
        assert_eq!(state.total, Money::ZERO);
        assert_eq!(state.currency, Currency::USD);
    }

    #[tokio::test]
    async fn test_update_currency_keeps_amounts() {
        let store = Arc::new(TestStore::default());
        let mut engine = open(&store).await;
        engine.add_item(Some(&ring(1000)), 1);
        let before = engine.state().totals();

        engine.update_currency(Currency::USD);

        assert_eq!(engine.state().currency, Currency::USD);
        assert_eq!(engine.state().totals(), before);
        assert_eq!(engine.state().total, Money::from_units(1210));
    }

    #[tokio::test]
    async fn test_persists_every_settled_change_in_order() {
        let store = Arc::new(TestStore::default());
        let mut engine = open(&store).await;
        engine.add_item(Some(&ring(100)), 1);
        engine.add_item(Some(&necklace(50)), 2);
        engine.update_currency(Currency::USD);
        engine.flush().await;

        let saved = store.saved().await.unwrap();
        assert_eq!(saved.items.len(), 2);
        assert_eq!(saved.currency, Currency::USD);
        assert_eq!(saved.subtotal, Money::from_units(200));
        assert!(saved.updated_at.is_some());
        // load + three mutations
        assert_eq!(store.writes(), 4);
    }

    #[tokio::test]
    async fn test_noops_do_not_persist() {
        let store = Arc::new(TestStore::default());
        let mut engine = open(&store).await;
        engine.add_item(Some(&ring(100)), 1);
        engine.flush().await;
        let writes = store.writes();

        engine.remove_item("missing");
        engine.remove_item("");
        engine.remove_item("  ");
        engine.clear_error();
        engine.add_item(None, 1);
        engine.flush().await;

        assert_eq!(store.writes(), writes);
    }

    #[tokio::test]
    async fn test_nothing_persisted_while_loading() {
        let store = Arc::new(TestStore::default());
        let sink = Arc::new(MemorySink::default());
        let mut engine = CartEngine::new(store.clone(), logger(&sink));

        engine.add_item(Some(&ring(100)), 1);
        engine.flush().await;

        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_round_trip_across_sessions() {
        let store = Arc::new(TestStore::default());
        {
            let mut engine = open(&store).await;
            engine.update_currency(Currency::USD);
            engine.add_item(Some(&ring(300)), 2);
            engine.flush().await;
        }

        let engine = open(&store).await;
        let state = engine.state();
        assert_eq!(state.item_quantity("ring-1"), 2);
        assert_eq!(state.currency, Currency::USD);
        assert_eq!(state.subtotal, Money::from_units(600));
        assert_eq!(state.total, Money::from_units(726));
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_discarded_silently() {
        let store = Arc::new(TestStore::default());
        let missing_currency =
            br#"{"items": [], "subtotal": 0, "tax": 0, "shipping": 0, "total": 0}"#;
        store.inner.set(CART_STORAGE_KEY, missing_currency).await.unwrap();

        let sink = Arc::new(MemorySink::default());
        let engine = CartEngine::open(store.clone(), logger(&sink)).await;
        engine.flush().await;

        assert!(engine.state().is_empty());
        assert_eq!(engine.state().currency, Currency::EUR);
        assert!(engine.state().error.is_none());
        assert_eq!(sink.lines_at(LogLevel::Warn).len(), 1);
        // The corrupt blob is replaced by the empty default.
        assert_eq!(store.saved().await.unwrap().currency, Currency::EUR);
    }

    #[tokio::test]
    async fn test_read_failure_sets_error() {
        let store = Arc::new(TestStore::default());
        store.fail_reads.store(true, Ordering::SeqCst);

        let mut engine = open(&store).await;
        assert!(!engine.state().is_loading);
        assert!(engine.state().is_empty());
        assert_eq!(engine.state().error.as_deref(), Some(LOAD_FAILED_MESSAGE));

        engine.clear_error();
        assert!(engine.state().error.is_none());
    }

    #[tokio::test]
    async fn test_write_failure_is_logged_not_surfaced() {
        let store = Arc::new(TestStore::default());
        store.fail_writes.store(true, Ordering::SeqCst);
        let sink = Arc::new(MemorySink::default());
        let mut engine = CartEngine::open(store.clone(), logger(&sink)).await;

        engine.add_item(Some(&ring(100)), 1);
        engine.flush().await;

        assert!(engine.state().error.is_none());
        assert_eq!(engine.item_quantity("ring-1"), 1);
        let errors = sink.lines_at(LogLevel::Error);
        assert!(!errors.is_empty());
        assert!(errors[0].contains("failed to save cart"));
    }

    #[tokio::test]
    async fn test_load_runs_once() {
        let store = Arc::new(TestStore::default());
        let mut engine = open(&store).await;
        engine.add_item(Some(&ring(100)), 1);

        engine.load().await;
        assert_eq!(engine.item_quantity("ring-1"), 1);
    }

    #[tokio::test]
    async fn test_subscribers_see_settled_state() {
        let store = Arc::new(TestStore::default());
        let mut engine = open(&store).await;
        let mut rx = engine.subscribe();

        engine.add_item(Some(&ring(100)), 3);

        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.item_quantity("ring-1"), 3);
    }

    #[tokio::test]
    async fn test_overflowing_merge_is_rejected() {
        let store = Arc::new(TestStore::default());
        let mut engine = open(&store).await;
        let pin = Product::new("pin", "Lapel Pin", Money::ZERO);
        engine.add_item(Some(&pin), i64::MAX);

        engine.add_item(Some(&pin), 1);

        assert_eq!(engine.item_quantity("pin"), i64::MAX);
        assert_eq!(engine.state().error.as_deref(), Some(INVALID_QUANTITY_MESSAGE));
    }
}
