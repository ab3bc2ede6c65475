use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The canonical entitlement record handed to the status store.
///
/// A fresh record is produced for every notification and fully replaces the
/// previous one stored under the same key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatus {
    /// The app account token, or `tx:<originalTransactionId>` when the app
    /// did not supply one.
    pub entitlement_key: String,
    pub product_id: String,
    pub original_transaction_id: String,
    /// End of the entitlement, including any billing grace period. The UNIX
    /// epoch means no expiry is known.
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
}

impl SubscriptionStatus {
    pub fn has_known_expiry(&self) -> bool {
        self.expires_at != DateTime::<Utc>::UNIX_EPOCH
    }
}
