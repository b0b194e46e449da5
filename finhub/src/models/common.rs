use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum BillingCycle {
    OneTime,
    Monthly,
    Quarterly,
    Annually,
    #[default]
    Unknown,
}

impl BillingCycle {
    /// Lenient mapping for free-form extractor output. Anything unrecognized is `Unknown`.
    pub fn from_loose(value: &str) -> Self {
        let normalized = value
            .trim()
            .to_lowercase()
            .replace(['_', ' '], "-");
        match normalized.as_str() {
            "one-time" | "onetime" | "once" | "single" | "one-off" => Self::OneTime,
            "monthly" | "month" | "per-month" => Self::Monthly,
            "quarterly" | "quarter" | "per-quarter" => Self::Quarterly,
            "annually" | "annual" | "yearly" | "year" | "per-year" => Self::Annually,
            _ => Self::Unknown,
        }
    }
}

impl std::fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OneTime => write!(f, "one-time"),
            Self::Monthly => write!(f, "monthly"),
            Self::Quarterly => write!(f, "quarterly"),
            Self::Annually => write!(f, "annually"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

impl std::str::FromStr for BillingCycle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "one-time" => Ok(Self::OneTime),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "annually" => Ok(Self::Annually),
            "unknown" => Ok(Self::Unknown),
            _ => Err(format!("Unknown billing cycle: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl Sentiment {
    /// Strict thresholds: exactly +/-0.3 stays neutral.
    pub fn from_score(score: f64) -> Self {
        if score > 0.3 {
            Self::Positive
        } else if score < -0.3 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Neutral => write!(f, "neutral"),
            Self::Negative => write!(f, "negative"),
        }
    }
}

impl std::str::FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "neutral" => Ok(Self::Neutral),
            "negative" => Ok(Self::Negative),
            _ => Err(format!("Unknown sentiment: {s}")),
        }
    }
}
