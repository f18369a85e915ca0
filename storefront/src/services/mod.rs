//! Business services
//!
//! - [`catalog`] - category, subcategory and product listings
//! - [`order_intake`] - cart pricing and order persistence
//! - [`notify`] - operator notifications
//! - [`image_proxy`] - third-party image relay

pub mod catalog;
pub mod image_proxy;
pub mod notify;
pub mod order_intake;
