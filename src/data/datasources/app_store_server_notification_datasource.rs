use serde::de::DeserializeOwned;

use crate::{
    data::{
        datasources::{jws_decoder::JwsDecoder, jws_validator::JwsValidator},
        models::{
            app_store_server_api::{
                jws_renewal_info_decoded_payload_model::JwsRenewalInfoDecodedPayloadModel,
                jws_transaction_decoded_payload_model::JwsTransactionDecodedPayloadModel,
            },
            app_store_server_notifications::{
                response_body_v2_decoded_payload_model::ResponseBodyV2DecodedPayloadModel,
                response_body_v2_model::ResponseBodyV2Model,
            },
            client_notifications::client_notification_model::ClientNotificationModel,
        },
    },
    errors::ParseError,
};

pub(crate) trait AppStoreServerNotificationDatasource: Send + Sync {
    /// Parse App Store Server Notification (V2):
    /// https://developer.apple.com/documentation/appstoreservernotifications/app-store-server-notifications-v2
    ///
    /// body:
    ///   The raw POST body of the notification.
    ///
    /// The outer payload and both nested tokens are verified before anything
    /// is returned. A notification without transaction info is rejected.
    fn parse_notification(
        &self,
        body: &[u8],
    ) -> Result<
        (
            ResponseBodyV2DecodedPayloadModel,
            JwsTransactionDecodedPayloadModel,
            Option<JwsRenewalInfoDecodedPayloadModel>,
        ),
        ParseError,
    >;

    /// Parse a purchase forwarded by the client app. The body itself is plain
    /// JSON and carries no signature; its `signedTransactionInfo` still has to
    /// go through [`Self::parse_transaction`].
    fn parse_client_notification(&self, body: &[u8])
        -> Result<ClientNotificationModel, ParseError>;

    /// Verify and decode a JWSTransaction.
    fn parse_transaction(
        &self,
        signed_transaction_info: &str,
    ) -> Result<JwsTransactionDecodedPayloadModel, ParseError>;
}

pub(crate) struct AppStoreServerNotificationDatasourceImpl<V: JwsValidator> {
    decoder: JwsDecoder<V>,
}

impl<V: JwsValidator> AppStoreServerNotificationDatasource
    for AppStoreServerNotificationDatasourceImpl<V>
{
    fn parse_notification(
        &self,
        body: &[u8],
    ) -> Result<
        (
            ResponseBodyV2DecodedPayloadModel,
            JwsTransactionDecodedPayloadModel,
            Option<JwsRenewalInfoDecodedPayloadModel>,
        ),
        ParseError,
    > {
        let signed_payload = self.decode_raw_notification(body)?;
        let decoded = self.decoder.decode(&signed_payload)?;
        let notification = self.parse_envelope(&decoded.payload)?;
        let data = notification
            .data
            .as_ref()
            .ok_or(ParseError::MissingNotificationData)?;
        let transaction = self.parse_transaction(
            data.signed_transaction_info
                .as_deref()
                .ok_or(ParseError::MissingTransactionInfo)?,
        )?;
        let renewal_info = self.parse_renewal_info(data.signed_renewal_info.as_deref())?;
        Ok((notification, transaction, renewal_info))
    }

    fn parse_client_notification(
        &self,
        body: &[u8],
    ) -> Result<ClientNotificationModel, ParseError> {
        serde_json::from_slice(body).map_err(|e| ParseError::json("client notification", e))
    }

    fn parse_transaction(
        &self,
        signed_transaction_info: &str,
    ) -> Result<JwsTransactionDecodedPayloadModel, ParseError> {
        self.decode_jws_payload("transaction info", signed_transaction_info)
    }
}

impl<V: JwsValidator> AppStoreServerNotificationDatasourceImpl<V> {
    pub(crate) fn new(validator: V) -> Self {
        Self {
            decoder: JwsDecoder::new(validator),
        }
    }

    /// Extracts the compact token from `{"signedPayload": "..."}`.
    pub(crate) fn decode_raw_notification(&self, body: &[u8]) -> Result<String, ParseError> {
        let wrapper: ResponseBodyV2Model = serde_json::from_slice(body)
            .map_err(|e| ParseError::json("notification body", e))?;
        if wrapper.signed_payload.is_empty() {
            return Err(ParseError::MissingSignedPayload);
        }
        Ok(wrapper.signed_payload)
    }

    /// Unmarshals an already verified signedPayload.
    pub(crate) fn parse_envelope(
        &self,
        payload: &[u8],
    ) -> Result<ResponseBodyV2DecodedPayloadModel, ParseError> {
        serde_json::from_slice(payload).map_err(|e| ParseError::json("notification payload", e))
    }

    /// Renewal info is optional in the notification; a missing or empty token
    /// is `None`, not an error.
    pub(crate) fn parse_renewal_info(
        &self,
        signed_renewal_info: Option<&str>,
    ) -> Result<Option<JwsRenewalInfoDecodedPayloadModel>, ParseError> {
        signed_renewal_info
            .filter(|token| !token.is_empty())
            .map(|token| self.decode_jws_payload("renewal info", token))
            .transpose()
    }

    fn decode_jws_payload<T: DeserializeOwned>(
        &self,
        document: &'static str,
        token: &str,
    ) -> Result<T, ParseError> {
        let decoded = self.decoder.decode(token)?;
        serde_json::from_slice(&decoded.payload).map_err(|e| ParseError::json(document, e))
    }
}
