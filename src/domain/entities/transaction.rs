use serde::{Deserialize, Serialize};

/// Verified facts about a single App Store transaction, as needed to decide
/// entitlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    /// The transaction identifier of the original purchase. Stable across
    /// subscription renewals.
    pub original_transaction_id: String,
    pub transaction_id: String,
    pub product_id: String,
    /// The UNIX time, in milliseconds, that the subscription expires or renews.
    pub expires_date_ms: Option<i64>,
    /// The UNIX time, in milliseconds, that the App Store refunded the
    /// transaction or revoked it from Family Sharing.
    pub revocation_date_ms: Option<i64>,
    pub revocation_reason: Option<RevocationReason>,
}

impl Transaction {
    pub fn is_revoked(&self) -> bool {
        self.revocation_date_ms.is_some_and(|ms| ms > 0)
    }
}

/// Apple revocation reason code. Codes Apple adds later are kept as
/// `Unknown` instead of failing the whole payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "i64", into = "i64")]
pub enum RevocationReason {
    /// The App Store refunded the transaction on behalf of the customer for
    /// other reasons, for example, an accidental purchase.
    Other,
    /// The App Store refunded the transaction on behalf of the customer due to
    /// an actual or perceived issue within your app.
    Issue,
    Unknown(i64),
}

impl From<i64> for RevocationReason {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::Other,
            1 => Self::Issue,
            other => Self::Unknown(other),
        }
    }
}

impl From<RevocationReason> for i64 {
    fn from(reason: RevocationReason) -> Self {
        match reason {
            RevocationReason::Other => 0,
            RevocationReason::Issue => 1,
            RevocationReason::Unknown(code) => code,
        }
    }
}
