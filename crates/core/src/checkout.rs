//! Checkout
//!
//! The purchase sequence: review the cart, show the transfer details, then
//! record the sale once the customer says the transfer was made.

use thiserror::Error;

use crate::{
    cart::Cart,
    sales::{NewSale, SaleDate},
};

/// Bank transfer alias customers pay to.
pub const DEFAULT_TRANSFER_ALIAS: &str = "rm.lecafe.vcp";

/// Where the customer is in the purchase sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutState {
    /// Looking at the catalog.
    #[default]
    Browsing,

    /// Cart panel open.
    ReviewingCart,

    /// Payment instructions shown.
    AwaitingPayment,

    /// Sale recorded and cart emptied.
    Completed,
}

/// Checkout transition errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// Payment was requested for an empty cart.
    #[error("the cart is empty")]
    EmptyCart,

    /// The step is not allowed from the current state.
    #[error("cannot {action} while {state:?}")]
    InvalidTransition {
        /// Current state.
        state: CheckoutState,

        /// Attempted step.
        action: &'static str,
    },
}

/// Payment instructions shown while awaiting payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentInstructions {
    /// Transfer alias.
    pub alias: String,
}

impl Default for PaymentInstructions {
    fn default() -> Self {
        Self {
            alias: DEFAULT_TRANSFER_ALIAS.to_string(),
        }
    }
}

/// Checkout Flow
#[derive(Debug, Clone, Default)]
pub struct CheckoutFlow {
    state: CheckoutState,
}

impl CheckoutFlow {
    /// A flow in [`CheckoutState::Browsing`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> CheckoutState {
        self.state
    }

    /// Open the cart panel.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidTransition`] while payment is pending.
    pub fn open_cart(&mut self) -> Result<(), CheckoutError> {
        match self.state {
            CheckoutState::Browsing | CheckoutState::Completed | CheckoutState::ReviewingCart => {
                self.state = CheckoutState::ReviewingCart;

                Ok(())
            }
            CheckoutState::AwaitingPayment => Err(self.invalid("open the cart")),
        }
    }

    /// Confirm the intent to buy and show payment instructions.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] for an empty cart and
    /// [`CheckoutError::InvalidTransition`] unless the cart is being reviewed.
    pub fn request_payment(&mut self, cart: &Cart) -> Result<(), CheckoutError> {
        if self.state != CheckoutState::ReviewingCart {
            return Err(self.invalid("request payment"));
        }

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.state = CheckoutState::AwaitingPayment;

        Ok(())
    }

    /// Build the sale to record for the confirmed payment.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidTransition`] unless awaiting payment and
    /// [`CheckoutError::EmptyCart`] if the cart was emptied in the meantime.
    pub fn prepare_sale(&self, cart: &Cart, date: SaleDate) -> Result<NewSale, CheckoutError> {
        if self.state != CheckoutState::AwaitingPayment {
            return Err(self.invalid("confirm payment"));
        }

        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        Ok(NewSale::from_cart(cart, date))
    }

    /// The sale was stored: empty the cart and finish.
    pub fn payment_recorded(&mut self, cart: &mut Cart) {
        cart.clear_cart();
        self.state = CheckoutState::Completed;
    }

    /// The sale could not be stored; the cart stays as it was so the
    /// customer can confirm again.
    pub fn payment_failed(&mut self) {
        self.state = CheckoutState::AwaitingPayment;
    }

    /// Close whatever panel is open.
    pub fn cancel(&mut self) {
        self.state = CheckoutState::Browsing;
    }

    fn invalid(&self, action: &'static str) -> CheckoutError {
        CheckoutError::InvalidTransition {
            state: self.state,
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{fixtures::product, money};

    use super::*;

    fn cart_with_one_item() -> Cart {
        let mut cart = Cart::new();

        cart.add_item(&product("a", "Chocotorta", 350));

        cart
    }

    #[test]
    fn happy_path_records_and_clears() -> TestResult {
        let mut cart = cart_with_one_item();
        let mut flow = CheckoutFlow::new();

        flow.open_cart()?;
        flow.request_payment(&cart)?;

        let sale = flow.prepare_sale(&cart, SaleDate::new("1/1/2025"))?;

        assert_eq!(sale.total, money::from_minor(350));

        flow.payment_recorded(&mut cart);

        assert_eq!(flow.state(), CheckoutState::Completed);
        assert!(cart.is_empty());

        flow.open_cart()?;

        assert_eq!(flow.state(), CheckoutState::ReviewingCart);

        Ok(())
    }

    #[test]
    fn empty_cart_cannot_request_payment() -> TestResult {
        let cart = Cart::new();
        let mut flow = CheckoutFlow::new();

        flow.open_cart()?;

        assert_eq!(flow.request_payment(&cart), Err(CheckoutError::EmptyCart));
        assert_eq!(flow.state(), CheckoutState::ReviewingCart);

        Ok(())
    }

    #[test]
    fn payment_requires_review_first() {
        let cart = cart_with_one_item();
        let mut flow = CheckoutFlow::new();

        let result = flow.request_payment(&cart);

        assert!(
            matches!(result, Err(CheckoutError::InvalidTransition { state: CheckoutState::Browsing, .. })),
            "expected InvalidTransition, got {result:?}"
        );
    }

    #[test]
    fn failed_payment_keeps_cart() -> TestResult {
        let cart = cart_with_one_item();
        let mut flow = CheckoutFlow::new();

        flow.open_cart()?;
        flow.request_payment(&cart)?;
        flow.payment_failed();

        assert_eq!(flow.state(), CheckoutState::AwaitingPayment);
        assert_eq!(cart.len(), 1);
        assert!(flow.prepare_sale(&cart, SaleDate::new("1/1/2025")).is_ok());

        Ok(())
    }

    #[test]
    fn cancel_returns_to_browsing_from_anywhere() -> TestResult {
        let cart = cart_with_one_item();
        let mut flow = CheckoutFlow::new();

        flow.open_cart()?;
        flow.request_payment(&cart)?;
        flow.cancel();

        assert_eq!(flow.state(), CheckoutState::Browsing);
        assert!(flow.prepare_sale(&cart, SaleDate::new("1/1/2025")).is_err());

        Ok(())
    }

    #[test]
    fn default_instructions_use_shop_alias() {
        assert_eq!(PaymentInstructions::default().alias, DEFAULT_TRANSFER_ALIAS);
    }
}
