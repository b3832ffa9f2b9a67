use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "https://delivr.onrender.com/invoices";
pub const DEFAULT_ORGANIZATION_ID: &str = "820117212";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CURRENCY_SYMBOL: &str = "RM";
pub const DEFAULT_DATE_FORMAT: &str = "%-d %b %Y";

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub display: DisplaySettings,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiSettings {
    pub endpoint: String,
    /// Tenant whose invoices the API returns
    pub organization_id: String,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            organization_id: DEFAULT_ORGANIZATION_ID.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct DisplaySettings {
    pub currency_symbol: String,
    /// chrono format used to show dates and to read picker input
    pub date_format: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}
