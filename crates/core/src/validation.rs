//! Inventory form validation
//!
//! Superficial checks run before any catalog write. Nothing here is a
//! guarantee; the backend stores whatever passes.

use thiserror::Error;

use crate::{
    money::{self, MoneyError, Price},
    products::{Category, NewProduct, Product, ProductUpdate},
};

/// Reasons a product form is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Name is blank.
    #[error("the name cannot be empty")]
    EmptyName,

    /// Price is not a number.
    #[error("the price must be a number")]
    InvalidPrice,

    /// Price is below zero.
    #[error("the price must be zero or more")]
    NegativePrice,

    /// No image given for a new product.
    #[error("an image URL is required")]
    MissingImage,

    /// Image does not look like an http(s) URL.
    #[error("the image URL must start with http:// or https://")]
    InvalidImageUrl,
}

impl From<MoneyError> for ValidationError {
    fn from(error: MoneyError) -> Self {
        match error {
            MoneyError::Negative => Self::NegativePrice,
            MoneyError::Invalid(_) | MoneyError::NotFinite | MoneyError::OutOfRange => {
                Self::InvalidPrice
            }
        }
    }
}

/// Raw values typed into the add/edit product forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub category: String,
    pub price: String,
    pub image: String,
}

impl ProductForm {
    /// Pre-fill the edit form from a product.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.as_str().to_string(),
            price: money::to_decimal(&product.price).to_string(),
            image: product.image.clone().unwrap_or_default(),
        }
    }

    /// Validate the add form.
    ///
    /// # Errors
    ///
    /// Returns the first failing check.
    pub fn validate_new(&self) -> Result<NewProduct, ValidationError> {
        let (name, category, price) = self.validate_common()?;

        if self.image.trim().is_empty() {
            return Err(ValidationError::MissingImage);
        }

        Ok(NewProduct {
            name,
            category,
            price,
            image: Some(self.validate_image()?),
        })
    }

    /// Validate the edit form; the image may be left blank.
    ///
    /// # Errors
    ///
    /// Returns the first failing check.
    pub fn validate_update(&self) -> Result<ProductUpdate, ValidationError> {
        let (name, category, price) = self.validate_common()?;

        let image = if self.image.trim().is_empty() {
            None
        } else {
            Some(self.validate_image()?)
        };

        Ok(ProductUpdate {
            name,
            category,
            price,
            image,
        })
    }

    fn validate_common(&self) -> Result<(String, Category, Price), ValidationError> {
        let name = self.name.trim();

        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }

        let category = match self.category.trim() {
            "" => Category::default(),
            category => Category::new(category),
        };

        let price = money::parse_price(&self.price)?;

        Ok((name.to_string(), category, price))
    }

    fn validate_image(&self) -> Result<String, ValidationError> {
        let image = self.image.trim();

        if looks_like_url(image) {
            Ok(image.to_string())
        } else {
            Err(ValidationError::InvalidImageUrl)
        }
    }
}

/// `http(s)://` followed by something with a dot that is neither first nor last.
pub fn looks_like_url(candidate: &str) -> bool {
    let Some(rest) = candidate
        .strip_prefix("https://")
        .or_else(|| candidate.strip_prefix("http://"))
    else {
        return false;
    };

    rest.char_indices()
        .any(|(index, c)| c == '.' && index > 0 && index + 1 < rest.len())
}
