use serde::{Deserialize, Serialize};

/// Verified renewal state of an auto-renewable subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenewalInfo {
    pub auto_renew_status: Option<AutoRenewStatus>,
    pub expiration_intent: Option<ExpirationIntent>,
    pub is_in_billing_retry_period: Option<bool>,
    /// The UNIX time, in milliseconds, that the billing grace period ends.
    pub grace_period_expires_date_ms: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "i64", into = "i64")]
pub enum AutoRenewStatus {
    /// The customer turned off automatic renewal; the subscription won't renew
    /// at the end of the current period.
    Off,
    /// The subscription renews at the end of the current period.
    On,
    Unknown(i64),
}

impl From<i64> for AutoRenewStatus {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::Off,
            1 => Self::On,
            other => Self::Unknown(other),
        }
    }
}

impl From<AutoRenewStatus> for i64 {
    fn from(status: AutoRenewStatus) -> Self {
        match status {
            AutoRenewStatus::Off => 0,
            AutoRenewStatus::On => 1,
            AutoRenewStatus::Unknown(code) => code,
        }
    }
}

/// Codes outside Apple's documented set decode as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "i64", into = "i64")]
pub enum ExpirationIntent {
    /// The customer canceled their subscription.
    VoluntaryCancellation,
    /// Billing error; for example, the customer's payment information is no
    /// longer valid.
    BillingError,
    /// The customer didn't consent to a price increase or offer conversion
    /// that required consent.
    PriceIncreaseDecline,
    /// The product wasn't available for purchase at the time of renewal.
    ProductUnavailable,
    Other,
    Unknown(i64),
}

impl From<i64> for ExpirationIntent {
    fn from(code: i64) -> Self {
        match code {
            1 => Self::VoluntaryCancellation,
            2 => Self::BillingError,
            3 => Self::PriceIncreaseDecline,
            4 => Self::ProductUnavailable,
            5 => Self::Other,
            other => Self::Unknown(other),
        }
    }
}

impl From<ExpirationIntent> for i64 {
    fn from(intent: ExpirationIntent) -> Self {
        match intent {
            ExpirationIntent::VoluntaryCancellation => 1,
            ExpirationIntent::BillingError => 2,
            ExpirationIntent::PriceIncreaseDecline => 3,
            ExpirationIntent::ProductUnavailable => 4,
            ExpirationIntent::Other => 5,
            ExpirationIntent::Unknown(code) => code,
        }
    }
}
