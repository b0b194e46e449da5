//! v1 API Data Transfer Objects.
//!
//! Wire types for the v1 REST API, kept apart from the domain models in
//! `src/models/`. Everything serializes as camelCase.

pub mod financial_items;
pub mod webhook;

pub use financial_items::*;
pub use webhook::*;
