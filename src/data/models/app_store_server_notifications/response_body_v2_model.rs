use serde::Deserialize;

type SignedPayload = String;

/// Request body sent by App Store Server Notifications V2.
///
/// https://developer.apple.com/documentation/appstoreservernotifications/responsebodyv2
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub(crate) struct ResponseBodyV2Model {
    /// The payload in JSON Web Signature (JWS) format, signed by the App Store.
    #[serde(default)]
    pub(crate) signed_payload: SignedPayload,
}
