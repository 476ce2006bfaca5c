//! App Context

use std::sync::Arc;

use cafe::{admin::AdminAllowList, checkout::PaymentInstructions, documents};
use jiff::tz::TimeZone;

use crate::{
    backend::{
        CatalogStore, SalesStore,
        firestore::{FirestoreClient, FirestoreConfig},
        memory::MemoryBackend,
    },
    checkout::CheckoutService,
    feeds::{CatalogFeed, SalesFeed},
    identity::{AuthToken, FirebaseAuth, FirebaseAuthConfig, FixedIdentity, IdentityProvider},
    inventory::InventoryService,
    session::AdminSession,
};

/// The shop's collections and identity provider.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub catalog: CatalogStore,
    pub sales: SalesStore,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppContext {
    /// Context over an in-process backend with the offline identity provider.
    #[must_use]
    pub fn in_memory(backend: &MemoryBackend) -> Self {
        Self {
            catalog: Arc::new(backend.products()),
            sales: Arc::new(backend.sales()),
            identity: Arc::new(FixedIdentity::new()),
        }
    }

    /// Context over a Firestore project, signing in through Firebase Auth.
    ///
    /// Both clients share one token, so writes made after an admin signs in
    /// carry that admin's credentials.
    #[must_use]
    pub fn firestore(config: FirestoreConfig, auth: FirebaseAuthConfig) -> Self {
        let token = AuthToken::default();
        let client = FirestoreClient::new(config, token.clone());

        Self {
            catalog: Arc::new(client.collection(documents::PRODUCTS_COLLECTION)),
            sales: Arc::new(client.collection(documents::SALES_COLLECTION)),
            identity: Arc::new(FirebaseAuth::new(auth, token)),
        }
    }

    /// Start a live product feed.
    #[must_use]
    pub fn catalog_feed(&self) -> CatalogFeed {
        CatalogFeed::catalog(self.catalog.clone())
    }

    /// Start a live sales feed.
    #[must_use]
    pub fn sales_feed(&self) -> SalesFeed {
        SalesFeed::sales(self.sales.clone())
    }

    #[must_use]
    pub fn inventory(&self) -> InventoryService {
        InventoryService::new(self.catalog.clone())
    }

    #[must_use]
    pub fn checkout(&self, time_zone: TimeZone, instructions: PaymentInstructions) -> CheckoutService {
        CheckoutService::new(self.sales.clone(), time_zone, instructions)
    }

    #[must_use]
    pub fn admin_session(&self, allow_list: AdminAllowList) -> AdminSession {
        AdminSession::new(self.identity.clone(), allow_list)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use zeroize::Zeroizing;

    use cafe::{
        cart::Cart,
        checkout::{CheckoutFlow, CheckoutState},
        products::storefront,
        sales::sales_listing,
    };

    use crate::{
        errors::AppError,
        test::{
            TestContext,
            helpers::{create_product, product_form},
        },
    };

    #[tokio::test]
    async fn admin_edits_show_up_on_the_storefront() -> TestResult {
        let ctx = TestContext::new();

        ctx.session
            .sign_in("admin@cafe.test", &Zeroizing::new("secret".to_string()))
            .await?;
        ctx.session.require_admin().await?;

        let cortado = create_product(&ctx, "Cortado", "2.50").await?;
        create_product(&ctx, "Latte", "3").await?;

        let mut feed = ctx.app.catalog_feed();
        let mut state = feed.wait_until_loaded().await?;

        while state.items().len() < 2 {
            state = feed.changed().await?;
        }

        ctx.inventory.toggle_stock(&cortado, true).await?;

        while storefront(state.items()).count() == 2 {
            state = feed.changed().await?;
        }

        let visible: Vec<_> = storefront(state.items())
            .map(|product| product.name.as_str())
            .collect();

        assert_eq!(visible, ["Latte"]);

        ctx.inventory
            .update(&cortado, &product_form("Cortado doble", "3.20"))
            .await?;
        ctx.inventory.delete(&cortado).await?;

        assert_eq!(ctx.backend.products().documents().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_lands_in_the_sales_listing() -> TestResult {
        let ctx = TestContext::new();

        create_product(&ctx, "Alfajor", "4").await?;

        let mut catalog = ctx.app.catalog_feed();
        let mut state = catalog.wait_until_loaded().await?;

        while state.items().is_empty() {
            state = catalog.changed().await?;
        }

        let alfajor = state.items().first().ok_or("no product")?;

        let mut cart = Cart::new();
        cart.add_item(alfajor);
        cart.add_item(alfajor);

        let mut flow = CheckoutFlow::new();
        flow.open_cart()?;
        flow.request_payment(&cart)?;

        ctx.checkout.confirm_payment(&mut flow, &mut cart).await?;

        assert_eq!(flow.state(), CheckoutState::Completed);
        assert!(cart.is_empty());

        let mut sales = ctx.app.sales_feed();
        let mut sales_state = sales.wait_until_loaded().await?;

        while sales_state.items().is_empty() {
            sales_state = sales.changed().await?;
        }

        let listing = sales_listing(sales_state.items());
        let sale = listing.first().ok_or("sale not listed")?;

        assert_eq!(sale.units(), 2);
        assert_eq!(sale.total, cafe::money::from_minor(800));

        Ok(())
    }

    #[tokio::test]
    async fn require_admin_without_sign_in_is_unauthenticated() {
        let ctx = TestContext::new();

        assert!(matches!(
            ctx.session.require_admin().await,
            Err(AppError::Unauthenticated)
        ));
    }
}
