mod common;
mod financial_item;
mod highlight;

pub use common::*;
pub use financial_item::*;
pub use highlight::*;
