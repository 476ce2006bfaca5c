//! Test Helpers

use cafe::{products::ProductId, validation::ProductForm};

use crate::{errors::AppError, test::TestContext};

pub(crate) fn product_form(name: &str, price: &str) -> ProductForm {
    ProductForm {
        name: name.to_string(),
        category: "CAFES".to_string(),
        price: price.to_string(),
        image: format!("https://img.cafe.test/{}.png", name.to_lowercase()),
    }
}

pub(crate) async fn create_product(
    ctx: &TestContext,
    name: &str,
    price: &str,
) -> Result<ProductId, AppError> {
    ctx.inventory.create(&product_form(name, price)).await
}
