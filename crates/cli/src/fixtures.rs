//! Catalog fixtures

use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;

use cafe::validation::ProductForm;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub(crate) enum FixtureError {
    /// IO error reading fixture files
    #[error("failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),
}

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
pub(crate) struct CatalogFixture {
    pub products: Vec<ProductFixture>,
}

/// Product Fixture
#[derive(Debug, Deserialize)]
pub(crate) struct ProductFixture {
    /// Document id; derived from the name when omitted.
    #[serde(default)]
    pub id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub category: String,

    pub price: PriceFixture,

    #[serde(default)]
    pub image: String,
}

/// Prices may be written as text (`"3.50"`) or as a bare number.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum PriceFixture {
    Text(String),
    Number(f64),
}

impl ProductFixture {
    /// Id the product is stored under when preloaded, stable across runs.
    pub(crate) fn catalog_id(&self) -> String {
        match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => slug(&self.name),
        }
    }
}

/// Lower-case ASCII letters and digits, with every other run collapsed to `-`.
fn slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    slug.trim_end_matches('-').to_string()
}

impl From<ProductFixture> for ProductForm {
    fn from(fixture: ProductFixture) -> Self {
        Self {
            name: fixture.name,
            category: fixture.category,
            price: match fixture.price {
                PriceFixture::Text(text) => text,
                PriceFixture::Number(number) => number.to_string(),
            },
            image: fixture.image,
        }
    }
}

impl CatalogFixture {
    /// Parse a catalog from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error when the YAML does not describe a catalog.
    pub(crate) fn from_yaml(yaml: &str) -> Result<Self, FixtureError> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Read a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub(crate) fn from_file(path: &Path) -> Result<Self, FixtureError> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    /// Product forms in file order.
    pub(crate) fn into_forms(self) -> Vec<ProductForm> {
        self.products.into_iter().map(ProductForm::from).collect()
    }

    /// Product forms keyed by their stable catalog id, in file order.
    pub(crate) fn into_keyed_forms(self) -> Vec<(String, ProductForm)> {
        self.products
            .into_iter()
            .map(|product| (product.catalog_id(), ProductForm::from(product)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use testresult::TestResult;

    use super::*;

    #[test]
    fn reads_text_and_numeric_prices() -> TestResult {
        let fixture = CatalogFixture::from_yaml(
            "products:\n  - name: Cortado\n    category: CAFES\n    price: \"2,50\"\n    image: https://img.test/c.png\n  - name: Flan\n    price: 3\n",
        )?;

        let forms = fixture.into_forms();

        assert_eq!(forms.len(), 2);

        let flan = forms.last().ok_or("missing flan")?;

        assert_eq!(flan.price, "3");
        assert_eq!(flan.category, "");
        assert_eq!(flan.image, "");

        let cortado = forms.first().ok_or("missing cortado")?;

        assert!(cortado.validate_new().is_ok());

        Ok(())
    }

    #[test]
    fn reads_bundled_catalog_file() -> TestResult {
        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(include_str!("../fixtures/products.yml").as_bytes())?;

        let forms = CatalogFixture::from_file(file.path())?.into_forms();

        assert_eq!(forms.len(), 6);
        assert!(forms.iter().all(|form| form.validate_new().is_ok()));

        Ok(())
    }

    #[test]
    fn catalog_ids_come_from_the_file_or_the_name() -> TestResult {
        let fixture = CatalogFixture::from_yaml(
            "products:\n  - id: cortado-doble\n    name: Cortado\n    price: 3\n  - name: \"Lemon pie (porción)\"\n    price: 3\n",
        )?;

        let ids: Vec<String> = fixture.into_keyed_forms().into_iter().map(|(id, _)| id).collect();

        assert_eq!(ids, ["cortado-doble", "lemon-pie-porci-n"]);

        Ok(())
    }

    #[test]
    fn rejects_missing_products_key() {
        assert!(matches!(
            CatalogFixture::from_yaml("items: []"),
            Err(FixtureError::Yaml(_))
        ));
    }
}
