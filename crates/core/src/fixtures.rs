//! Test fixtures shared by the unit tests.

use crate::{
    money,
    products::{Category, Product, ProductId},
};

/// An in-stock cake with the given id, name and price in cents.
pub(crate) fn product(id: &str, name: &str, price_minor: i64) -> Product {
    Product {
        id: ProductId::from(id),
        name: name.to_string(),
        category: Category::default(),
        price: money::from_minor(price_minor),
        in_stock: true,
        image: None,
    }
}
