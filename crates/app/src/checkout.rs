//! Checkout service.

use jiff::tz::{self, TimeZone};
use tracing::{error, info, warn};

use cafe::{
    cart::Cart,
    checkout::{CheckoutFlow, PaymentInstructions},
    documents::encode_sale,
    money::format_money,
    sales::{SaleDate, SaleId},
};

use crate::{backend::SalesStore, errors::AppError};

/// Time zone the shop dates its sales in.
pub const DEFAULT_TIME_ZONE: &str = "America/Argentina/Buenos_Aires";

/// Resolve a time zone name, falling back to the shop's fixed UTC-3 offset
/// when the name is unknown or no time zone database is available.
pub fn store_time_zone(name: &str) -> TimeZone {
    TimeZone::get(name).unwrap_or_else(|err| {
        warn!(time_zone = name, error = %err, "unknown time zone, using UTC-3");

        TimeZone::fixed(tz::offset(-3))
    })
}

/// Records completed checkouts in the sales collection.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    sales: SalesStore,
    time_zone: TimeZone,
    instructions: PaymentInstructions,
}

impl CheckoutService {
    #[must_use]
    pub fn new(sales: SalesStore, time_zone: TimeZone, instructions: PaymentInstructions) -> Self {
        Self {
            sales,
            time_zone,
            instructions,
        }
    }

    /// What to show the customer while payment is pending.
    #[must_use]
    pub fn instructions(&self) -> &PaymentInstructions {
        &self.instructions
    }

    /// The customer says they paid: append the sale dated today, then empty
    /// the cart.
    ///
    /// Retrying after a failure may store the same sale twice if the first
    /// write did land; the backend offers no idempotency key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Checkout`] when the flow is not awaiting payment
    /// and [`AppError::Write`] when the sale could not be stored. On a write
    /// failure the cart is left untouched.
    #[tracing::instrument(name = "checkout.service.confirm_payment", skip_all)]
    pub async fn confirm_payment(
        &self,
        flow: &mut CheckoutFlow,
        cart: &mut Cart,
    ) -> Result<SaleId, AppError> {
        let sale = flow.prepare_sale(cart, SaleDate::today_in(&self.time_zone))?;

        let id = match self.sales.create(encode_sale(&sale)).await {
            Ok(id) => id,
            Err(err) => {
                error!(error = %err, "failed to record sale");

                flow.payment_failed();

                return Err(AppError::Write(err));
            }
        };

        flow.payment_recorded(cart);

        info!(
            sale_id = %id,
            total = %format_money(&sale.total),
            date = %sale.date,
            "recorded sale"
        );

        Ok(SaleId::from_string(id))
    }
}
