//! The storefront facade.
//!
//! [`Storefront`] owns every piece of commerce state and is the only way to
//! reach it. Reads hand out shared references; writes go through methods
//! that publish a [`StoreEvent`] once the change is committed.
//!
//! Catalog writes need a [`CatalogAdmin`] handle, and the only way to get
//! one is [`Storefront::catalog_admin`], which asks the capability gate.

use cannabiabuds_core::{ProductId, Role};
use tokio::sync::broadcast;

use crate::cart::CartStore;
use crate::catalog::{CatalogError, CatalogStore, Product, ProductDraft, ProductPatch};
use crate::events::{EventBus, StoreEvent};
use crate::filter::{self, FilterCriteria};
use crate::session::{self, AccessDenied, Capability, SessionStore, SessionUser};

/// Number of products on the home page shelf.
pub const FEATURED_LIMIT: usize = 4;

/// Catalog, cart, session and change feed for one shopper.
#[derive(Debug, Default)]
pub struct Storefront {
    catalog: CatalogStore,
    cart: CartStore,
    session: SessionStore,
    events: EventBus,
}

impl Storefront {
    /// A storefront stocked with the launch assortment, an empty cart and
    /// nobody logged in.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(CatalogStore::seeded())
    }

    #[must_use]
    pub fn with_catalog(catalog: CatalogStore) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    // -- reads --------------------------------------------------------------

    #[must_use]
    pub const fn catalog(&self) -> &CatalogStore {
        &self.catalog
    }

    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Catalog products passing `criteria`, in catalog order.
    pub fn filtered<'a>(
        &'a self,
        criteria: &FilterCriteria,
    ) -> impl Iterator<Item = &'a Product> + use<'a> {
        filter::apply(self.catalog.list(), criteria)
    }

    /// The home page shelf.
    pub fn featured(&self) -> impl Iterator<Item = &Product> {
        self.catalog.featured(FEATURED_LIMIT)
    }

    /// Receive every change committed from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    // -- cart ---------------------------------------------------------------

    /// Add one unit of a catalog product to the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if the product is not in the
    /// catalog.
    pub fn add_to_cart(&mut self, id: &ProductId) -> Result<(), CatalogError> {
        let product = self
            .catalog
            .get(id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;
        self.cart.add_item(product);
        self.cart_changed();
        Ok(())
    }

    /// Drop a line. Unknown ids are ignored.
    pub fn remove_from_cart(&mut self, id: &ProductId) {
        if self.cart.remove_item(id) {
            self.cart_changed();
        }
    }

    /// Set a line's quantity; below one removes it.
    pub fn set_cart_quantity(&mut self, id: &ProductId, quantity: i64) {
        if self.cart.set_quantity(id, quantity) {
            self.cart_changed();
        }
    }

    /// Flip the cart drawer. Returns the new open state.
    pub const fn toggle_cart(&mut self) -> bool {
        self.cart.toggle()
    }

    pub const fn close_cart(&mut self) {
        self.cart.close();
    }

    fn cart_changed(&self) {
        self.events.publish(StoreEvent::CartChanged {
            item_count: self.cart.item_count(),
        });
    }

    // -- session ------------------------------------------------------------

    /// Log in as the demo administrator.
    pub fn login(&mut self) -> SessionUser {
        let user = self.session.login().clone();
        self.events.publish(StoreEvent::SessionChanged {
            role: Some(user.role),
        });
        user
    }

    pub fn logout(&mut self) {
        if self.session.is_logged_in() {
            self.session.logout();
            self.events.publish(StoreEvent::SessionChanged { role: None });
        }
    }

    #[must_use]
    pub fn current_role(&self) -> Option<Role> {
        self.session.current_role()
    }

    // -- administration -----------------------------------------------------

    /// Obtain the catalog write handle for the current session.
    ///
    /// # Errors
    ///
    /// Returns [`AccessDenied`] unless an administrator is logged in.
    pub fn catalog_admin(&mut self) -> Result<CatalogAdmin<'_>, AccessDenied> {
        session::require(self.session.current_role(), Capability::ManageCatalog).inspect_err(
            |denied| tracing::warn!(capability = ?denied.capability, "catalog write refused"),
        )?;
        Ok(CatalogAdmin {
            catalog: &mut self.catalog,
            events: &self.events,
        })
    }
}

/// Catalog write access, granted to administrators only.
#[derive(Debug)]
pub struct CatalogAdmin<'a> {
    catalog: &'a mut CatalogStore,
    events: &'a EventBus,
}

impl CatalogAdmin<'_> {
    /// See [`CatalogStore::create`].
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] if the draft is malformed.
    pub fn create(&mut self, draft: ProductDraft) -> Result<Product, CatalogError> {
        let product = self.catalog.create(draft)?;
        self.events.publish(StoreEvent::ProductCreated {
            id: product.id.clone(),
        });
        Ok(product)
    }

    /// See [`CatalogStore::update`].
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] or [`CatalogError::Validation`].
    pub fn update(&mut self, id: &ProductId, patch: ProductPatch) -> Result<Product, CatalogError> {
        let product = self.catalog.update(id, patch)?;
        self.events
            .publish(StoreEvent::ProductUpdated { id: id.clone() });
        Ok(product)
    }

    /// See [`CatalogStore::delete`].
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if `id` is unknown.
    pub fn delete(&mut self, id: &ProductId) -> Result<Product, CatalogError> {
        let product = self.catalog.delete(id)?;
        self.events
            .publish(StoreEvent::ProductDeleted { id: id.clone() });
        Ok(product)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn draft(name: &str) -> ProductDraft {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "category": "Edibles",
            "strain_type": "Hybrid",
            "price": "12.00",
        }))
        .unwrap()
    }

    #[test]
    fn test_new_storefront_is_seeded_and_logged_out() {
        let shop = Storefront::new();
        assert_eq!(shop.catalog().len(), 6);
        assert!(shop.cart().is_empty());
        assert_eq!(shop.current_role(), None);
        assert_eq!(shop.featured().count(), FEATURED_LIMIT);
    }

    #[test]
    fn test_catalog_admin_denied_when_logged_out() {
        let mut shop = Storefront::new();
        let err = shop.catalog_admin().unwrap_err();
        assert_eq!(err.capability, Capability::ManageCatalog);
        assert_eq!(shop.catalog().len(), 6);
    }

    #[test]
    fn test_admin_can_create_then_logout_revokes() {
        let mut shop = Storefront::new();
        shop.login();

        let created = shop.catalog_admin().unwrap().create(draft("Mint Chews")).unwrap();
        assert_eq!(shop.catalog().len(), 7);
        assert_eq!(shop.catalog().get(&created.id).unwrap().name, "Mint Chews");

        shop.logout();
        assert!(shop.catalog_admin().is_err());
    }

    #[test]
    fn test_add_to_cart_unknown_product_is_not_found() {
        let mut shop = Storefront::new();
        let err = shop.add_to_cart(&ProductId::new("missing")).unwrap_err();
        assert_eq!(err, CatalogError::NotFound(ProductId::new("missing")));
        assert!(shop.cart().is_empty());
    }

    #[test]
    fn test_cart_keeps_snapshot_after_catalog_edit_and_delete() {
        let mut shop = Storefront::new();
        let id = ProductId::new("2");
        shop.add_to_cart(&id).unwrap();
        shop.login();

        let patch: ProductPatch = serde_json::from_value(serde_json::json!({ "price": "99.00" })).unwrap();
        shop.catalog_admin().unwrap().update(&id, patch).unwrap();
        assert_eq!(shop.cart().total(), Decimal::new(50, 0));

        shop.catalog_admin().unwrap().delete(&id).unwrap();
        assert!(shop.catalog().get(&id).is_none());
        assert_eq!(shop.cart().line(&id).unwrap().quantity(), 1);
    }

    #[tokio::test]
    async fn test_mutations_publish_events_in_order() {
        let mut shop = Storefront::new();
        let mut rx = shop.subscribe();

        shop.login();
        shop.add_to_cart(&ProductId::new("1")).unwrap();
        shop.set_cart_quantity(&ProductId::new("1"), 3);
        let removed = shop.catalog_admin().unwrap().delete(&ProductId::new("5")).unwrap();
        shop.logout();

        assert_eq!(
            rx.recv().await.unwrap(),
            StoreEvent::SessionChanged { role: Some(Role::Admin) }
        );
        assert_eq!(rx.recv().await.unwrap(), StoreEvent::CartChanged { item_count: 1 });
        assert_eq!(rx.recv().await.unwrap(), StoreEvent::CartChanged { item_count: 3 });
        assert_eq!(
            rx.recv().await.unwrap(),
            StoreEvent::ProductDeleted { id: removed.id }
        );
        assert_eq!(rx.recv().await.unwrap(), StoreEvent::SessionChanged { role: None });
    }

    #[test]
    fn test_noop_cart_changes_publish_nothing() {
        let mut shop = Storefront::new();
        let mut rx = shop.subscribe();

        shop.remove_from_cart(&ProductId::new("1"));
        shop.set_cart_quantity(&ProductId::new("1"), 2);
        shop.logout();

        assert!(rx.try_recv().is_err());
    }
}
