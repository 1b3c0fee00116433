//! The cart store: one source of truth for cart contents across pages.

use std::collections::HashSet;

use grimhide_storage::{Cache, StorageEvent, WebStorage};
use tracing::{debug, warn};

use crate::cart::listener::{CartChange, ChangeSource, ListenerId, Listeners};
use crate::cart::{CartLine, CartPricing, DisplayFields, PricingPolicy, Variant};
use crate::config::StorefrontConfig;
use crate::error::{CommerceError, ErrorKind};
use crate::ids::{LineId, ProductId};
use crate::money::Money;

/// Storage key every page reads and writes the cart under.
pub const DEFAULT_CART_KEY: &str = "grimhide_cart_v1";

/// Owns the cart for one tab and keeps it in sync with storage.
///
/// The store is loaded when it is opened. Every mutation runs
/// validate, mutate, persist and notify as one step: by the time a mutating
/// method returns, storage holds the new cart (or the write failure has been
/// recorded) and every listener has seen the change.
///
/// When a write fails the in-memory cart stays authoritative for the
/// session. The failure is reported to listeners as a storage warning and
/// through [`CartStore::last_storage_error`], and the write is retried by
/// the next mutation, [`CartStore::persist`] or [`CartStore::load`].
///
/// Other tabs' writes arrive through [`CartStore::handle_storage_event`],
/// which replaces the in-memory cart with theirs. Two tabs writing on the
/// same tick can lose one update; the last write wins.
///
/// # Example
///
/// ```rust
/// use grimhide_commerce::cart::{CartStore, DisplayFields, Variant};
/// use grimhide_commerce::ids::ProductId;
/// use grimhide_commerce::money::Money;
/// use grimhide_storage::MemoryOrigin;
///
/// let origin = MemoryOrigin::new();
/// let mut store = CartStore::open(origin.open_tab());
///
/// store
///     .add_item(
///         ProductId::new("p1"),
///         Variant::color_size("Black", "M"),
///         Money::from_cents(29900),
///         1,
///         DisplayFields::new("Warrior Armor", "/images/product1/front.avif"),
///     )
///     .unwrap();
///
/// assert_eq!(store.item_count(), 1);
/// assert_eq!(store.subtotal().display(), "$299.00");
/// ```
#[derive(Debug)]
pub struct CartStore<S> {
    cache: Cache<S>,
    key: String,
    policy: PricingPolicy,
    lines: Vec<CartLine>,
    listeners: Listeners,
    persist_pending: bool,
    last_storage_error: Option<CommerceError>,
}

impl<S: WebStorage> CartStore<S> {
    /// Open the cart under [`DEFAULT_CART_KEY`] with the default pricing.
    pub fn open(storage: S) -> Self {
        Self::with_settings(storage, DEFAULT_CART_KEY, PricingPolicy::default())
    }

    /// Open the cart using the storage key and pricing from `config`.
    pub fn from_config(storage: S, config: &StorefrontConfig) -> Self {
        Self::with_settings(storage, config.cart.storage_key.clone(), config.pricing)
    }

    /// Open the cart under `key` with `policy`.
    pub fn with_settings(storage: S, key: impl Into<String>, policy: PricingPolicy) -> Self {
        let mut store = Self {
            cache: Cache::new(storage),
            key: key.into(),
            policy,
            lines: Vec::new(),
            listeners: Listeners::default(),
            persist_pending: false,
            last_storage_error: None,
        };
        store.refresh_from_storage();
        store
    }

    /// Re-read the persisted cart and make it the in-memory cart.
    ///
    /// Missing, malformed or mistyped data reads as an empty cart. If an
    /// earlier write is still pending it is retried first; while storage
    /// keeps failing the in-memory cart is returned unchanged.
    pub fn load(&mut self) -> &[CartLine] {
        if self.persist_pending && self.write_through().is_err() {
            return &self.lines;
        }
        self.refresh_from_storage();
        &self.lines
    }

    /// Write the in-memory cart to storage.
    pub fn persist(&mut self) -> Result<(), CommerceError> {
        self.write_through()
    }

    /// Add `quantity` of a product variant.
    ///
    /// If the product + variant already has a line its quantity grows; the
    /// price and display fields of the first add are kept. Otherwise a new
    /// line is appended.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        variant: Variant,
        unit_price: Money,
        quantity: u32,
        display: DisplayFields,
    ) -> Result<&[CartLine], CommerceError> {
        validate_new_line(unit_price, quantity)?;

        let line_id = LineId::for_product(&product_id, &variant);
        if let Some(index) = self.lines.iter().position(|l| l.line_id == line_id) {
            let existing = &self.lines[index];
            let new_quantity = existing
                .quantity
                .checked_add(quantity)
                .ok_or(CommerceError::Overflow)?;
            let new_total = existing
                .unit_price
                .checked_mul(new_quantity)
                .ok_or(CommerceError::Overflow)?;
            self.ensure_subtotal_fits(Some(&line_id), new_total)?;
            self.lines[index].quantity = new_quantity;
        } else {
            let line = CartLine::new(product_id, variant, unit_price, quantity, display);
            let total = line.line_total().ok_or(CommerceError::Overflow)?;
            self.ensure_subtotal_fits(None, total)?;
            self.lines.push(line);
        }

        debug!(line_id = %line_id, quantity, "cart add");
        self.commit(ChangeSource::Added(line_id));
        Ok(&self.lines)
    }

    /// Set a line's quantity. Zero or below removes the line; an unknown
    /// line is left alone.
    pub fn set_quantity(
        &mut self,
        line_id: &LineId,
        quantity: i64,
    ) -> Result<&[CartLine], CommerceError> {
        let Some(index) = self.lines.iter().position(|l| &l.line_id == line_id) else {
            return Ok(&self.lines);
        };

        if quantity <= 0 {
            self.lines.remove(index);
            debug!(line_id = %line_id, "cart line dropped to zero");
            self.commit(ChangeSource::Removed(line_id.clone()));
            return Ok(&self.lines);
        }

        let quantity = u32::try_from(quantity).map_err(|_| CommerceError::InvalidQuantity(quantity))?;
        let line = &self.lines[index];
        if line.quantity == quantity {
            return Ok(&self.lines);
        }
        let new_total = line
            .unit_price
            .checked_mul(quantity)
            .ok_or(CommerceError::Overflow)?;
        self.ensure_subtotal_fits(Some(line_id), new_total)?;
        self.lines[index].quantity = quantity;

        debug!(line_id = %line_id, quantity, "cart quantity set");
        self.commit(ChangeSource::QuantityChanged(line_id.clone()));
        Ok(&self.lines)
    }

    /// Change a line's quantity by `delta`, removing it at zero or below.
    ///
    /// This is what +/- buttons call.
    pub fn adjust_quantity(
        &mut self,
        line_id: &LineId,
        delta: i64,
    ) -> Result<&[CartLine], CommerceError> {
        let Some(current) = self.get_line(line_id).map(|l| l.quantity) else {
            return Ok(&self.lines);
        };
        let target = i64::from(current)
            .checked_add(delta)
            .ok_or(CommerceError::Overflow)?;
        self.set_quantity(line_id, target)
    }

    /// Remove a line if present.
    pub fn remove_item(&mut self, line_id: &LineId) -> &[CartLine] {
        let len_before = self.lines.len();
        self.lines.retain(|l| &l.line_id != line_id);
        if self.lines.len() < len_before {
            debug!(line_id = %line_id, "cart remove");
            self.commit(ChangeSource::Removed(line_id.clone()));
        }
        &self.lines
    }

    /// Empty the cart and persist the empty list.
    pub fn clear(&mut self) {
        self.lines.clear();
        debug!("cart cleared");
        self.commit(ChangeSource::Cleared);
    }

    /// Replace the whole cart with a single line, as one change.
    pub fn replace_with(
        &mut self,
        product_id: ProductId,
        variant: Variant,
        unit_price: Money,
        quantity: u32,
        display: DisplayFields,
    ) -> Result<&[CartLine], CommerceError> {
        validate_new_line(unit_price, quantity)?;
        let line = CartLine::new(product_id, variant, unit_price, quantity, display);
        line.line_total().ok_or(CommerceError::Overflow)?;

        let line_id = line.line_id.clone();
        self.lines = vec![line];
        debug!(line_id = %line_id, quantity, "cart replaced");
        self.commit(ChangeSource::Replaced(line_id));
        Ok(&self.lines)
    }

    /// Apply a storage change made by another tab.
    ///
    /// Returns `true` when the event concerned the cart. The other tab's
    /// value replaces the in-memory cart outright; a removed key or a
    /// cleared storage area empties it, and an unreadable value is treated
    /// as empty.
    pub fn handle_storage_event(&mut self, event: &StorageEvent) -> bool {
        if !event.touches(&self.key) {
            return false;
        }

        self.lines = match (&event.key, event.new_value.as_deref()) {
            (Some(_), Some(text)) => parse_lines(text).unwrap_or_else(|e| {
                warn!(key = %self.key, error = %e, "ignoring malformed cart from another tab");
                Vec::new()
            }),
            _ => Vec::new(),
        };
        self.persist_pending = false;
        self.last_storage_error = None;

        debug!(lines = self.lines.len(), "cart replaced by another tab");
        self.notify(ChangeSource::External);
        true
    }

    /// Register a callback for every cart change.
    pub fn on_change(&mut self, callback: impl FnMut(&CartChange<'_>) + 'static) -> ListenerId {
        self.listeners.add(Box::new(callback))
    }

    /// Unregister a callback. Returns `false` if it was already gone.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// The cart lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up a line.
    pub fn get_line(&self, line_id: &LineId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.line_id == line_id)
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of `unit_price * quantity` over all lines, exact to the cent.
    ///
    /// Mutations and loads refuse any cart whose subtotal would not fit, so
    /// the sum is always representable.
    pub fn subtotal(&self) -> Money {
        checked_subtotal(&self.lines).unwrap_or(Money::from_cents(i64::MAX))
    }

    /// Total quantity across lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Number of distinct lines.
    pub fn unique_item_count(&self) -> usize {
        self.lines.len()
    }

    /// Subtotal, tax, shipping and total under the store's pricing policy.
    pub fn pricing(&self) -> CartPricing {
        self.policy
            .quote(self.subtotal(), self.item_count(), self.unique_item_count())
    }

    /// Tax and shipping rules this store prices with.
    pub fn policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// The storage key this store owns.
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// Whether the last write failed and is waiting to be retried.
    pub fn is_persist_pending(&self) -> bool {
        self.persist_pending
    }

    /// The last storage failure, cleared by the next successful write.
    pub fn last_storage_error(&self) -> Option<&CommerceError> {
        self.last_storage_error.as_ref()
    }

    /// The underlying storage area.
    pub fn storage(&self) -> &S {
        self.cache.store()
    }

    /// Check that the cart subtotal stays representable once `line_id` (or
    /// a new line, for `None`) totals `line_total`.
    fn ensure_subtotal_fits(
        &self,
        line_id: Option<&LineId>,
        line_total: Money,
    ) -> Result<(), CommerceError> {
        let others: Option<Vec<Money>> = self
            .lines
            .iter()
            .filter(|l| Some(&l.line_id) != line_id)
            .map(CartLine::line_total)
            .collect();
        others
            .and_then(|totals| Money::try_sum(totals.into_iter().chain([line_total])))
            .map(|_| ())
            .ok_or(CommerceError::Overflow)
    }

    fn refresh_from_storage(&mut self) {
        let read = self
            .cache
            .get_raw(&self.key)
            .map_err(CommerceError::from)
            .and_then(|text| match text {
                Some(text) => parse_lines(&text),
                None => Ok(Vec::new()),
            });

        match read {
            Ok(lines) => {
                debug!(key = %self.key, lines = lines.len(), "cart loaded");
                self.lines = lines;
            }
            Err(e) if e.kind() == ErrorKind::MalformedPersistedData => {
                warn!(key = %self.key, error = %e, "stored cart is malformed, starting empty");
                self.lines.clear();
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "cart storage unreadable, keeping cart in memory");
                self.last_storage_error = Some(e);
            }
        }
    }

    fn write_through(&mut self) -> Result<(), CommerceError> {
        match self.cache.set(&self.key, &self.lines) {
            Ok(()) => {
                self.persist_pending = false;
                self.last_storage_error = None;
                Ok(())
            }
            Err(e) => {
                let err = CommerceError::from(e);
                warn!(key = %self.key, error = %err, "cart write failed, will retry on next change");
                self.persist_pending = true;
                self.last_storage_error = Some(err.clone());
                Err(err)
            }
        }
    }

    fn commit(&mut self, source: ChangeSource) {
        // Failures are recorded on the store and surfaced to listeners.
        let _ = self.write_through();
        self.notify(source);
    }

    fn notify(&mut self, source: ChangeSource) {
        let change = CartChange {
            source,
            lines: &self.lines,
            storage_warning: self.last_storage_error.as_ref(),
        };
        self.listeners.dispatch(&change);
    }
}

fn validate_new_line(unit_price: Money, quantity: u32) -> Result<(), CommerceError> {
    if quantity == 0 {
        return Err(CommerceError::InvalidQuantity(0));
    }
    if unit_price.is_negative() {
        return Err(CommerceError::InvalidPrice(unit_price.display()));
    }
    Ok(())
}

/// Decode and check a persisted cart.
fn parse_lines(text: &str) -> Result<Vec<CartLine>, CommerceError> {
    let lines: Vec<CartLine> = serde_json::from_str(text)
        .map_err(|e| CommerceError::MalformedPersistedData(e.to_string()))?;

    let mut seen = HashSet::new();
    for line in &lines {
        if line.quantity == 0 {
            return Err(CommerceError::MalformedPersistedData(format!(
                "line {} has quantity 0",
                line.line_id
            )));
        }
        if !seen.insert(line.line_id.as_str()) {
            return Err(CommerceError::MalformedPersistedData(format!(
                "duplicate line {}",
                line.line_id
            )));
        }
    }
    if checked_subtotal(&lines).is_none() {
        return Err(CommerceError::MalformedPersistedData(
            "subtotal out of range".to_string(),
        ));
    }
    Ok(lines)
}

fn checked_subtotal(lines: &[CartLine]) -> Option<Money> {
    let totals: Option<Vec<Money>> = lines.iter().map(CartLine::line_total).collect();
    Money::try_sum(totals?)
}
