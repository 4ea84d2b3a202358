//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`ClickRecord`] - A persisted redirect, linked to its short link by id

pub mod click;

pub use click::ClickRecord;
