//! Products

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::{ids::TypedId, money::Price};

/// Product Id
pub type ProductId = TypedId<Product>;

/// Product category.
///
/// Stored as free text; the shop only ever offers the values in
/// [`Category::known`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category(String);

impl Category {
    /// Cakes.
    pub const TORTAS: &'static str = "TORTAS";

    /// Coffees.
    pub const CAFES: &'static str = "CAFES";

    /// Wrap a stored category value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The categories offered in the admin forms.
    pub fn known() -> [Category; 2] {
        [Category::new(Self::TORTAS), Category::new(Self::CAFES)]
    }

    /// Raw category value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::new(Self::TORTAS)
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Product category
    pub category: Category,

    /// Product price
    pub price: Price,

    /// Whether the product can be sold
    pub in_stock: bool,

    /// Image URL
    pub image: Option<String>,
}

/// New Product
///
/// Products are always created in stock.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub category: Category,
    pub price: Price,
    pub image: Option<String>,
}

/// Product Update
///
/// Replaces name, category, price and image; the stock flag is untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub category: Category,
    pub price: Price,
    pub image: Option<String>,
}

/// Products shown on the public storefront, in feed order.
pub fn storefront(products: &[Product]) -> impl Iterator<Item = &Product> {
    products.iter().filter(|product| product.in_stock)
}
