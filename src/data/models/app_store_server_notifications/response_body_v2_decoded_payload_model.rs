#![allow(dead_code)]

use chrono::serde::ts_milliseconds;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_with::{serde_as, NoneAsEmptyString};

use crate::data::models::app_store_server_api::common::Environment;

type AppleIdType = u64;
type JwsTransaction = String;
type JwsRenewalInfo = String;

/// Decoded payload of a V2 notification's signedPayload.
///
/// https://developer.apple.com/documentation/appstoreservernotifications/responsebodyv2decodedpayload
///
/// The notification type and subtype are kept as plain strings: new values
/// are accepted and only `EXPIRED` affects entitlement.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResponseBodyV2DecodedPayloadModel {
    /// The in-app purchase event for which the App Store sends this
    /// notification, e.g. `DID_RENEW` or `EXPIRED`.
    pub(crate) notification_type: String,
    /// Additional information that identifies the notification event, e.g.
    /// `VOLUNTARY` or `GRACE_PERIOD`.
    pub(crate) subtype: Option<String>,
    /// A unique identifier for the notification.
    #[serde(rename = "notificationUUID")]
    pub(crate) notification_uuid: String,
    /// The App Store Server Notification version number, "2.0".
    pub(crate) version: String,
    /// The UNIX time, in milliseconds, that the App Store signed the JSON Web
    /// Signature data.
    #[serde(with = "ts_milliseconds")]
    pub(crate) signed_date: DateTime<Utc>,
    /// App metadata and the signed renewal and transaction information. Absent
    /// for summary and external purchase token notifications.
    pub(crate) data: Option<NotificationData>,
}

#[serde_as]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NotificationData {
    pub(crate) app_apple_id: Option<AppleIdType>,
    pub(crate) bundle_id: String,
    pub(crate) bundle_version: Option<String>,
    pub(crate) environment: Environment,
    /// The account token the app attached to the purchase, if any.
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub(crate) app_account_token: Option<String>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub(crate) signed_transaction_info: Option<JwsTransaction>,
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub(crate) signed_renewal_info: Option<JwsRenewalInfo>,
}
