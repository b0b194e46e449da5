//! Prompt templates for the extraction model
//!
//! These templates use basic `format!()` interpolation for type safety.

/// Categories the model may assign to a transaction. `Other` is the catch-all.
pub const FINANCIAL_CATEGORIES: &[&str] = &[
    "Groceries",
    "Utilities",
    "Software",
    "Subscription",
    "Electronics",
    "Clothing",
    "Travel",
    "Transportation",
    "Food & Dining",
    "Entertainment",
    "Online Retail",
    "Professional Services",
    "Healthcare",
    "Education",
    "Home Goods",
    "Gifts & Donations",
    "Financial Services",
    "Business Services",
    "Cloud Services",
    "Other",
];

pub const FINANCIAL_SYSTEM_PROMPT: &str =
    "You are an expert financial assistant. You answer with a single JSON object and nothing else.";

/// Generate a prompt asking for the primary transaction described by an email
///
/// # Example
/// ```
/// use finhub::llm::prompts::financial_extraction_prompt;
///
/// let prompt = financial_extraction_prompt("Your Netflix receipt", "Netflix charged you 13.99");
/// assert!(prompt.contains("Your Netflix receipt"));
/// assert!(prompt.contains("Cloud Services"));
/// ```
pub fn financial_extraction_prompt(subject: &str, body: &str) -> String {
    let subject = if subject.trim().is_empty() { "N/A" } else { subject };
    let body = if body.trim().is_empty() { "N/A" } else { body };
    let categories = FINANCIAL_CATEGORIES.join(", ");

    format!(
        r#"Extract the single primary financial transaction (a purchase, a subscription start or renewal, an invoice payment) described by this email.

Email Subject:
{subject}

Email Body (plain text):
{body}

Return ONLY a JSON object with these fields. Use null for anything that cannot be determined confidently.
{{
  "vendor_name": "string, e.g. 'Netflix', 'Amazon', 'Spotify Inc.'",
  "product_name": "string, as specific as possible, e.g. 'Netflix Premium Plan Monthly'",
  "original_amount": "number, the primary transaction total without currency symbols or thousands separators, e.g. 1200.50. Use 0 for explicitly free items",
  "original_currency": "3-letter ISO code as seen in the email, e.g. USD, EUR, INR, GBP. $ without other context is USD, ₹ or Rs is INR",
  "purchase_date": "YYYY-MM-DD of the transaction or order",
  "billing_cycle": "one of 'one-time', 'monthly', 'quarterly', 'annually'",
  "category": "one of [{categories}]"
}}"#
    )
}
