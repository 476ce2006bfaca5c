//! `cafe admin`

use std::io;

use clap::{Args, Subcommand};
use zeroize::Zeroizing;

use cafe::{
    admin::SessionAccess,
    products::{Product, ProductId},
    validation::ProductForm,
};
use cafe_app::{errors::AppError, session::AdminSession};

use crate::{
    commands::{Shop, snapshot},
    errors::CliError,
    render,
};

#[derive(Debug, Args)]
pub(crate) struct AdminArgs {
    /// Admin account email
    #[arg(long, env = "CAFE_ADMIN_EMAIL")]
    pub email: String,

    /// Admin account password
    #[arg(long, env = "CAFE_ADMIN_PASSWORD", hide_env_values = true)]
    pub password: String,

    #[command(subcommand)]
    pub action: AdminAction,
}

#[derive(Debug, Subcommand)]
pub(crate) enum AdminAction {
    /// Show the whole inventory, including products out of stock
    Products,

    /// Add a product; it starts in stock
    Add(AddArgs),

    /// Change name, category, price or image of a product
    Edit(EditArgs),

    /// Mark a product out of stock, or restock it
    ToggleStock(TargetArgs),

    /// Remove a product from the catalog
    Delete(TargetArgs),
}

#[derive(Debug, Args)]
pub(crate) struct AddArgs {
    #[arg(long)]
    pub name: String,

    /// TORTAS, CAFES or any other category
    #[arg(long, default_value = "")]
    pub category: String,

    /// Price, e.g. 3.50
    #[arg(long)]
    pub price: String,

    /// Image URL
    #[arg(long)]
    pub image: String,
}

impl From<AddArgs> for ProductForm {
    fn from(args: AddArgs) -> Self {
        Self {
            name: args.name,
            category: args.category,
            price: args.price,
            image: args.image,
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct EditArgs {
    pub id: String,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub price: Option<String>,

    /// New image URL; pass an empty value to clear it
    #[arg(long)]
    pub image: Option<String>,
}

impl EditArgs {
    /// The edit form pre-filled from `product` with the given changes.
    fn form(self, product: &Product) -> ProductForm {
        let current = ProductForm::from_product(product);

        ProductForm {
            name: self.name.unwrap_or(current.name),
            category: self.category.unwrap_or(current.category),
            price: self.price.unwrap_or(current.price),
            image: self.image.unwrap_or(current.image),
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct TargetArgs {
    pub id: String,
}

/// Sign in and fail unless the account is an admin.
///
/// # Errors
///
/// Returns [`AppError::SignIn`] for rejected credentials and
/// [`AppError::Forbidden`] for accounts outside the allow-list.
pub(crate) async fn sign_in(
    shop: &Shop,
    email: &str,
    password: String,
) -> Result<AdminSession, CliError> {
    let session = shop.app.admin_session(shop.allow_list.clone());
    let password = Zeroizing::new(password);

    match session.sign_in(email, &password).await? {
        SessionAccess::AuthenticatedAuthorized { .. } => Ok(session),
        SessionAccess::AuthenticatedUnauthorized { .. } | SessionAccess::Unauthenticated => {
            session.sign_out().await;

            Err(AppError::Forbidden.into())
        }
    }
}

fn find<'a>(products: &'a [Product], id: &str) -> Result<&'a Product, CliError> {
    products
        .iter()
        .find(|product| product.id.as_str() == id)
        .ok_or_else(|| CliError::UnknownProduct(id.to_string()))
}

pub(crate) async fn run(
    args: AdminArgs,
    shop: &Shop,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    let session = sign_in(shop, &args.email, args.password).await?;
    let result = manage(args.action, shop, out).await;

    session.sign_out().await;

    result
}

async fn manage(
    action: AdminAction,
    shop: &Shop,
    out: &mut impl io::Write,
) -> Result<(), CliError> {
    let inventory = shop.app.inventory();

    match action {
        AdminAction::Products => {
            let products = snapshot(shop.app.catalog_feed()).await?;

            render::write_inventory(out, &products)?;
        }
        AdminAction::Add(args) => {
            let id = inventory.create(&ProductForm::from(args)).await?;

            writeln!(out, "Product added: {id}")?;
        }
        AdminAction::Edit(args) => {
            let products = snapshot(shop.app.catalog_feed()).await?;
            let product = find(&products, &args.id)?;
            let id = product.id.clone();

            inventory.update(&id, &args.form(product)).await?;

            writeln!(out, "Product updated: {id}")?;
        }
        AdminAction::ToggleStock(TargetArgs { id }) => {
            let products = snapshot(shop.app.catalog_feed()).await?;
            let product = find(&products, &id)?;

            let in_stock = inventory.toggle_stock(&product.id, product.in_stock).await?;

            let label = if in_stock { "in stock" } else { "out of stock" };

            writeln!(out, "{} is now {label}", product.name)?;
        }
        AdminAction::Delete(TargetArgs { id }) => {
            inventory.delete(&ProductId::from(id.as_str())).await?;

            writeln!(out, "Product deleted: {id}")?;
        }
    }

    Ok(())
}
