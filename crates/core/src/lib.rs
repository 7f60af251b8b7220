//! CloudMart Core - Shared domain types.
//!
//! This crate provides the types shared by every CloudMart client component:
//! - `storefront` - Client-local state (cart, user profile, support threads) and the REST client
//! - `cli` - Command-line front end over the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Identifiers, prices, emails, statuses and the records persisted by the client

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
