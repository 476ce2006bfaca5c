//! Documents
//!
//! Mapping between domain records and the field maps stored in the external
//! collections. Decoding never fails: missing or mistyped fields fall back to
//! the defaults the storefront has always displayed.

use serde_json::{Map, Value, json};

use crate::{
    money::{self, Price},
    products::{Category, NewProduct, Product, ProductId, ProductUpdate},
    sales::{NewSale, SaleDate, SaleId, SaleLine, SaleRecord},
};

/// Catalog collection name.
pub const PRODUCTS_COLLECTION: &str = "products";

/// Sales collection name.
pub const SALES_COLLECTION: &str = "ventas";

const NAME: &str = "name";
const CATEGORY: &str = "category";
const PRICE: &str = "price";
const IN_STOCK: &str = "inStock";
const IMAGE: &str = "imagen";

const SALE_LINES: &str = "productos";
const SALE_LINE_NAME: &str = "nombre";
const SALE_LINE_QUANTITY: &str = "cantidad";
const SALE_LINE_PRICE: &str = "precio";
const SALE_TOTAL: &str = "total";
const SALE_DATE: &str = "fecha";

/// Field map of a stored document.
pub type Fields = Map<String, Value>;

/// A stored document: the backend's id plus its fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    /// Build a document from an id and a field map.
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    fn price_field(&self, key: &str) -> Price {
        price_value(self.fields.get(key))
    }
}

fn price_value(value: Option<&Value>) -> Price {
    value
        .and_then(Value::as_f64)
        .and_then(|amount| money::price_from_f64(amount).ok())
        .unwrap_or_else(money::zero)
}

fn image_value(image: Option<&str>) -> Option<String> {
    image
        .map(str::trim)
        .filter(|image| !image.is_empty())
        .map(str::to_string)
}

/// Decode a catalog document.
pub fn decode_product(document: &Document) -> Product {
    Product {
        id: ProductId::from(document.id.as_str()),
        name: document.str_field(NAME).unwrap_or_default().to_string(),
        category: Category::new(document.str_field(CATEGORY).unwrap_or_default()),
        price: document.price_field(PRICE),
        in_stock: document
            .fields
            .get(IN_STOCK)
            .and_then(Value::as_bool)
            .unwrap_or(true),
        image: image_value(document.str_field(IMAGE)),
    }
}

fn product_fields(name: &str, category: &Category, price: &Price, image: Option<&str>) -> Fields {
    let mut fields = Fields::new();

    fields.insert(NAME.to_string(), json!(name));
    fields.insert(CATEGORY.to_string(), json!(category.as_str()));
    fields.insert(PRICE.to_string(), json!(money::to_f64(price)));
    fields.insert(IMAGE.to_string(), json!(image.unwrap_or_default()));

    fields
}

/// Fields written when creating a product; new products start in stock.
pub fn encode_new_product(product: &NewProduct) -> Fields {
    let mut fields = product_fields(
        &product.name,
        &product.category,
        &product.price,
        product.image.as_deref(),
    );

    fields.insert(IN_STOCK.to_string(), json!(true));

    fields
}

/// Fields replaced by an admin edit.
pub fn encode_product_update(update: &ProductUpdate) -> Fields {
    product_fields(
        &update.name,
        &update.category,
        &update.price,
        update.image.as_deref(),
    )
}

/// Fields written when toggling stock.
pub fn encode_stock(in_stock: bool) -> Fields {
    let mut fields = Fields::new();

    fields.insert(IN_STOCK.to_string(), json!(in_stock));

    fields
}

fn decode_sale_line(value: &Value) -> SaleLine {
    SaleLine {
        name: value
            .get(SALE_LINE_NAME)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        quantity: value
            .get(SALE_LINE_QUANTITY)
            .and_then(Value::as_u64)
            .and_then(|quantity| u32::try_from(quantity).ok())
            .unwrap_or(1),
        unit_price: price_value(value.get(SALE_LINE_PRICE)),
    }
}

/// Decode a sales document.
pub fn decode_sale(document: &Document) -> SaleRecord {
    let lines = document
        .fields
        .get(SALE_LINES)
        .and_then(Value::as_array)
        .map(|lines| lines.iter().map(decode_sale_line).collect())
        .unwrap_or_default();

    SaleRecord {
        id: SaleId::from(document.id.as_str()),
        lines,
        total: document.price_field(SALE_TOTAL),
        date: SaleDate::new(document.str_field(SALE_DATE).unwrap_or_default()),
    }
}

/// Fields appended for a completed checkout.
pub fn encode_sale(sale: &NewSale) -> Fields {
    let lines: Vec<Value> = sale
        .lines
        .iter()
        .map(|line| {
            json!({
                SALE_LINE_NAME: line.name,
                SALE_LINE_QUANTITY: line.quantity,
                SALE_LINE_PRICE: money::to_f64(&line.unit_price),
            })
        })
        .collect();

    let mut fields = Fields::new();

    fields.insert(SALE_LINES.to_string(), Value::Array(lines));
    fields.insert(SALE_TOTAL.to_string(), json!(money::to_f64(&sale.total)));
    fields.insert(SALE_DATE.to_string(), json!(sale.date.as_str()));

    fields
}
