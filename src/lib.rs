//! Three-dimensional bin packing without rotation.
//!
//! Boxes are packed into identical bins in the order they are given; the
//! [`optimizer`] searches box orders that need fewer bins. [`api`] serves
//! both over HTTP.

pub mod api;
pub mod bin;
pub mod config;
pub mod error;
pub mod geometry;
pub mod model;
pub mod optimizer;
pub mod packer;
pub mod strategy;
pub mod types;
pub mod verify;

pub use error::{PackError, Result};
