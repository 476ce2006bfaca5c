//! Cart
//!
//! The session cart: an insertion-ordered set of product lines with a total
//! that is recomputed after every mutation. The cart is plain owned state;
//! whoever renders it holds it and funnels changes through these methods.

use rusty_money::iso::Currency;

use crate::{
    money::{self, CURRENCY, Price},
    products::{Product, ProductId},
    sales::SaleLine,
};

/// A product in the cart and how many of it were picked.
///
/// The quantity is never zero: a line is removed instead.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    product: Product,
    quantity: u32,
}

impl CartItem {
    /// The product snapshot taken when the line was first added.
    pub fn product(&self) -> &Product {
        &self.product
    }

    /// Units of this product in the cart.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price multiplied by quantity.
    pub fn line_total(&self) -> Price {
        money::from_minor(self.line_total_minor())
    }

    fn line_total_minor(&self) -> i64 {
        self.product
            .price
            .to_minor_units()
            .saturating_mul(i64::from(self.quantity))
    }
}

/// Cart
#[derive(Debug, Clone)]
pub struct Cart {
    items: Vec<CartItem>,
    total: Price,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            total: money::zero(),
        }
    }

    /// Add one unit of `product`, merging with an existing line for the same id.
    pub fn add_item(&mut self, product: &Product) {
        match self.position(&product.id) {
            Some(index) => {
                if let Some(item) = self.items.get_mut(index) {
                    item.quantity = item.quantity.saturating_add(1);
                }
            }
            None => self.items.push(CartItem {
                product: product.clone(),
                quantity: 1,
            }),
        }

        self.recompute_total();
    }

    /// Remove one unit of the product with `id`. The line disappears when its
    /// last unit goes; unknown ids are ignored.
    pub fn remove_item(&mut self, id: &ProductId) {
        let Some(index) = self.position(id) else {
            return;
        };

        let emptied = self.items.get_mut(index).is_some_and(|item| {
            item.quantity -= 1;
            item.quantity == 0
        });

        if emptied {
            self.items.remove(index);
        }

        self.recompute_total();
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.recompute_total();
    }

    /// Sum of price × quantity over every line.
    pub fn total(&self) -> &Price {
        &self.total
    }

    /// Lines in the order they were first added.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units, as shown on the cart badge.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Units of the product with `id`, zero when absent.
    pub fn quantity_of(&self, id: &ProductId) -> u32 {
        self.position(id)
            .and_then(|index| self.items.get(index))
            .map_or(0, CartItem::quantity)
    }

    /// Currency of the cart total.
    pub fn currency(&self) -> &'static Currency {
        CURRENCY
    }

    /// Snapshot of the lines for a sale record.
    pub fn sale_lines(&self) -> Vec<SaleLine> {
        self.items
            .iter()
            .map(|item| SaleLine {
                name: item.product.name.clone(),
                quantity: item.quantity,
                unit_price: item.product.price,
            })
            .collect()
    }

    fn position(&self, id: &ProductId) -> Option<usize> {
        self.items.iter().position(|item| &item.product.id == id)
    }

    fn recompute_total(&mut self) {
        let total_minor = self
            .items
            .iter()
            .fold(0_i64, |acc, item| acc.saturating_add(item.line_total_minor()));

        self.total = money::from_minor(total_minor);
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::fixtures::product;

    use super::*;

    fn expected_total(cart: &Cart) -> i64 {
        cart.items()
            .iter()
            .map(|item| item.product().price.to_minor_units() * i64::from(item.quantity()))
            .sum()
    }

    #[test]
    fn adding_same_product_twice_merges_lines() {
        let latte = product("latte", "Latte", 250);
        let mut cart = Cart::new();

        cart.add_item(&latte);
        cart.add_item(&latte);

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(&latte.id), 2);
        assert_eq!(cart.total(), &money::from_minor(500));
    }

    #[test]
    fn two_products_total_example() {
        let a = product("a", "Chocotorta", 350);
        let b = product("b", "Cortado", 200);
        let mut cart = Cart::new();

        cart.add_item(&a);
        cart.add_item(&a);
        cart.add_item(&b);

        let quantities: Vec<u32> = cart.items().iter().map(CartItem::quantity).collect();

        assert_eq!(cart.total(), &money::from_minor(900));
        assert_eq!(quantities, [2, 1]);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn removing_last_unit_drops_the_line() {
        let a = product("a", "Chocotorta", 350);
        let mut cart = Cart::new();

        cart.add_item(&a);
        cart.remove_item(&a.id);

        assert!(cart.is_empty());
        assert_eq!(cart.total(), &money::zero());
    }

    #[test]
    fn removing_decrements_quantity() {
        let a = product("a", "Chocotorta", 350);
        let mut cart = Cart::new();

        cart.add_item(&a);
        cart.add_item(&a);
        cart.add_item(&a);
        cart.remove_item(&a.id);

        assert_eq!(cart.quantity_of(&a.id), 2);
        assert_eq!(cart.total(), &money::from_minor(700));
    }

    #[test]
    fn removing_unknown_id_is_a_no_op() {
        let a = product("a", "Chocotorta", 350);
        let mut cart = Cart::new();

        cart.add_item(&a);
        cart.remove_item(&ProductId::from("missing"));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), &money::from_minor(350));
    }

    #[test]
    fn clear_cart_empties_and_zeroes() {
        let mut cart = Cart::new();

        cart.add_item(&product("a", "Chocotorta", 350));
        cart.add_item(&product("b", "Cortado", 200));
        cart.clear_cart();

        assert!(cart.is_empty());
        assert_eq!(cart.total(), &money::zero());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn lines_keep_insertion_order() {
        let mut cart = Cart::new();

        cart.add_item(&product("b", "Cortado", 200));
        cart.add_item(&product("a", "Chocotorta", 350));
        cart.add_item(&product("b", "Cortado", 200));

        let ids: Vec<&str> = cart.items().iter().map(|i| i.product().id.as_str()).collect();

        assert_eq!(ids, ["b", "a"]);
    }

    fn menu() -> [Product; 3] {
        [
            product("a", "Chocotorta", 350),
            product("b", "Cortado", 200),
            product("c", "Medialuna", 125),
        ]
    }

    proptest! {
        #[test]
        fn total_matches_lines_for_any_sequence(
            ops in prop::collection::vec((any::<bool>(), 0..3_usize), 0..200)
        ) {
            let menu = menu();
            let mut cart = Cart::new();
            let mut counts = [0_u32; 3];

            for (add, index) in ops {
                let (Some(picked), Some(count)) = (menu.get(index), counts.get_mut(index)) else {
                    continue;
                };

                if add {
                    cart.add_item(picked);
                    *count += 1;
                } else {
                    cart.remove_item(&picked.id);
                    *count = count.saturating_sub(1);
                }

                let expected: i64 = menu
                    .iter()
                    .zip(counts)
                    .map(|(item, count)| item.price.to_minor_units() * i64::from(count))
                    .sum();
                let mut ids: Vec<&str> = cart.items().iter().map(|i| i.product().id.as_str()).collect();
                ids.sort_unstable();
                ids.dedup();

                prop_assert_eq!(cart.total().to_minor_units(), expected);
                prop_assert_eq!(cart.total().to_minor_units(), expected_total(&cart));
                prop_assert!(cart.items().iter().all(|item| item.quantity() >= 1));
                prop_assert_eq!(ids.len(), cart.len());
            }
        }
    }

    #[test]
    fn sale_lines_snapshot_names_quantities_and_prices() {
        let a = product("a", "Chocotorta", 350);
        let mut cart = Cart::new();

        cart.add_item(&a);
        cart.add_item(&a);

        let lines = cart.sale_lines();

        assert_eq!(
            lines,
            [SaleLine {
                name: "Chocotorta".to_string(),
                quantity: 2,
                unit_price: money::from_minor(350),
            }]
        );
    }
}
