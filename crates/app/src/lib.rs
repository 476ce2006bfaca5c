//! Storefront services over an external document backend.
//!
//! The catalog and the sales record live in a remote store; this crate
//! listens to them, validates admin writes and records checkouts.

pub mod backend;
pub mod checkout;
pub mod context;
pub mod errors;
pub mod feeds;
pub mod identity;
pub mod inventory;
pub mod session;

#[cfg(test)]
mod test;
