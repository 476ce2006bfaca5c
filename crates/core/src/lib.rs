//! Cafe
//!
//! Domain model for a single-shop cafe storefront: the product catalog, the
//! session cart, sale records and the admin back-office rules. Everything in
//! this crate is pure state; persistence lives behind the seams in `cafe-app`.

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod documents;
pub mod feed;
pub mod ids;
pub mod money;
pub mod products;
pub mod sales;
pub mod validation;
pub mod views;

#[cfg(test)]
mod fixtures;
