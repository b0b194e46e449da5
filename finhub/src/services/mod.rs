mod financial_items;

pub use financial_items::{FinancialItemService, FinancialItemWithContext};
