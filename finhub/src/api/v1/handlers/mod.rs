pub mod financial_items;
pub(crate) mod health;
pub mod webhook;

pub use health::health_check;
