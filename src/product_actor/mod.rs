//! Marketplace listing logic: creation rules, purchases and balance commands.

mod actions;
mod dtos;
pub mod entity;
pub mod error;

pub use actions::*;
pub use dtos::*;
pub use error::*;
