//! Render models
//!
//! What each screen shows, already formatted. Front-ends turn these into
//! widgets or table rows; they carry no styling.

use crate::{
    cart::Cart,
    money::format_money,
    products::{Product, ProductId},
    sales::SaleRecord,
};

/// Image used when a product has none.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150";

/// Storefront card for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: String,
    pub image: String,
    pub in_stock: bool,

    /// Whether the add-to-cart action is enabled.
    pub can_add: bool,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.as_str().to_string(),
            price: format_money(&product.price),
            image: product
                .image
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            in_stock: product.in_stock,
            can_add: product.in_stock,
        }
    }
}

/// One line in the cart panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub line_total: String,
}

/// Cart panel contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartPanel {
    pub lines: Vec<CartLine>,
    pub total: String,

    /// Units shown on the cart badge.
    pub badge: u64,

    /// Whether the pay action is enabled.
    pub can_checkout: bool,
}

impl From<&Cart> for CartPanel {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart
                .items()
                .iter()
                .map(|item| CartLine {
                    id: item.product().id.clone(),
                    name: item.product().name.clone(),
                    quantity: item.quantity(),
                    line_total: format_money(&item.line_total()),
                })
                .collect(),
            total: format_money(cart.total()),
            badge: cart.item_count(),
            can_checkout: !cart.is_empty(),
        }
    }
}

/// Admin inventory table row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRow {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub image: String,
    pub price: String,
    pub stock: &'static str,

    /// Label of the stock toggle action.
    pub toggle: &'static str,
}

impl From<&Product> for InventoryRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.as_str().to_string(),
            image: product
                .image
                .clone()
                .unwrap_or_else(|| "No image".to_string()),
            price: format_money(&product.price),
            stock: if product.in_stock {
                "In stock"
            } else {
                "Out of stock"
            },
            toggle: if product.in_stock {
                "Mark out of stock"
            } else {
                "Restock"
            },
        }
    }
}

/// Sales listing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleRow {
    pub products: Vec<String>,
    pub quantities: Vec<u32>,
    pub total: String,
    pub date: String,
}

impl From<&SaleRecord> for SaleRow {
    fn from(record: &SaleRecord) -> Self {
        Self {
            products: record.lines.iter().map(|line| line.name.clone()).collect(),
            quantities: record.lines.iter().map(|line| line.quantity).collect(),
            total: format_money(&record.total),
            date: record.date.as_str().to_string(),
        }
    }
}
