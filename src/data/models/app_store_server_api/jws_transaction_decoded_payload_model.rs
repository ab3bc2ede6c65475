#![allow(dead_code)]

use serde::Deserialize;
use serde_with::{serde_as, NoneAsEmptyString};

use super::common::Environment;
use crate::domain::entities::transaction::RevocationReason;

type TimestampMillis = i64;

/// Decoded payload of a JWSTransaction.
///
/// https://developer.apple.com/documentation/appstoreserverapi/jwstransactiondecodedpayload
///
/// Only the identifiers are required; everything else is optional so that
/// partial payloads (for example from StoreKit testing) still parse.
#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JwsTransactionDecodedPayloadModel {
    /// The transaction identifier of the original purchase.
    pub(crate) original_transaction_id: String,
    /// The unique identifier of the transaction.
    pub(crate) transaction_id: String,
    /// The unique identifier of the product.
    pub(crate) product_id: String,
    /// The UNIX time, in milliseconds, that the subscription expires or renews.
    pub(crate) expires_date: Option<TimestampMillis>,
    /// The UNIX time, in milliseconds, that the App Store refunded the
    /// transaction or revoked it from Family Sharing.
    pub(crate) revocation_date: Option<TimestampMillis>,
    /// The reason that the App Store refunded the transaction or revoked it
    /// from Family Sharing.
    pub(crate) revocation_reason: Option<RevocationReason>,
    /// A UUID that associates the transaction with a customer on your own
    /// service. Apple sends an empty string when the app didn't provide one.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub(crate) app_account_token: Option<String>,
    pub(crate) bundle_id: Option<String>,
    pub(crate) environment: Option<Environment>,
    pub(crate) purchase_date: Option<TimestampMillis>,
    pub(crate) original_purchase_date: Option<TimestampMillis>,
    pub(crate) signed_date: Option<TimestampMillis>,
    /// The type of the in-app purchase, e.g. "Auto-Renewable Subscription".
    #[serde(rename = "type")]
    pub(crate) transaction_type: Option<String>,
}
