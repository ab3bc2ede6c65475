#![allow(dead_code)]

use serde::Deserialize;

use super::common::Environment;
use crate::domain::entities::renewal_info::{AutoRenewStatus, ExpirationIntent};

type TimestampMillis = i64;

/// Decoded payload of a JWSRenewalInfo.
///
/// https://developer.apple.com/documentation/appstoreserverapi/jwsrenewalinfodecodedpayload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JwsRenewalInfoDecodedPayloadModel {
    /// The renewal status of the auto-renewable subscription.
    pub(crate) auto_renew_status: Option<AutoRenewStatus>,
    /// The reason the subscription expired.
    pub(crate) expiration_intent: Option<ExpirationIntent>,
    /// Whether the App Store is attempting to automatically renew the expired
    /// subscription.
    pub(crate) is_in_billing_retry_period: Option<bool>,
    /// The time when the Billing Grace Period for subscription renewals
    /// expires.
    pub(crate) grace_period_expires_date: Option<TimestampMillis>,
    /// The identifier of the product that renews at the next billing period.
    pub(crate) auto_renew_product_id: Option<String>,
    pub(crate) original_transaction_id: Option<String>,
    pub(crate) product_id: Option<String>,
    pub(crate) environment: Option<Environment>,
    pub(crate) renewal_date: Option<TimestampMillis>,
    pub(crate) signed_date: Option<TimestampMillis>,
}
