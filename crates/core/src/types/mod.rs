//! Core types for CloudMart.
//!
//! This module provides type-safe wrappers for common domain concepts and the
//! record shapes exchanged with local storage and the backend API.

pub mod cart;
pub mod email;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod status;
pub mod support;
pub mod user;

pub use cart::{CartItem, item_count, subtotal};
pub use email::{Email, EmailError};
pub use id::*;
pub use order::{NewOrder, Order, OrderLine};
pub use price::{Price, PriceError};
pub use product::{NewProduct, Product, filter_products};
pub use status::*;
pub use support::{ChatMessage, ChatSender, SupportThread, Ticket};
pub use user::UserProfile;
