use serde::Deserialize;
use serde_with::{serde_as, NoneAsEmptyString};

/// A purchase forwarded by the client app right after StoreKit reports it.
/// Not signed as a whole; only the nested transaction is.
#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ClientNotificationModel {
    pub(crate) bundle_id: String,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub(crate) app_account_token: Option<String>,
    /// JWSTransaction as delivered to the device by StoreKit.
    pub(crate) signed_transaction_info: String,
}
