use tracing::{info, warn};

use crate::{
    config::EntitlementConfig,
    data::{
        datasources::{
            app_store_server_notification_datasource::{
                AppStoreServerNotificationDatasource, AppStoreServerNotificationDatasourceImpl,
            },
            jws_validator::AppStoreJwsValidator,
        },
        models::app_store_server_api::{
            jws_renewal_info_decoded_payload_model::JwsRenewalInfoDecodedPayloadModel,
            jws_transaction_decoded_payload_model::JwsTransactionDecodedPayloadModel,
        },
    },
    domain::{
        entities::{
            renewal_info::RenewalInfo, subscription_status::SubscriptionStatus,
            transaction::Transaction,
        },
        repositories::{
            entitlement_repository::EntitlementRepository,
            subscription_status_store::SubscriptionStatusStore,
        },
        resolvers::entitlement_resolver,
    },
    errors::{NotificationError, ParseError, StoreError, TrustError},
};

pub(crate) struct EntitlementRepositoryImpl<
    A: AppStoreServerNotificationDatasource,
    S: SubscriptionStatusStore,
> {
    app_store_server_notification_datasource: A,
    store: S,
    config: EntitlementConfig,
}

impl<A: AppStoreServerNotificationDatasource, S: SubscriptionStatusStore> EntitlementRepository
    for EntitlementRepositoryImpl<A, S>
{
    fn process_provider_notification(
        &self,
        body: &[u8],
    ) -> Result<SubscriptionStatus, NotificationError> {
        self.provider_notification(body)
            .inspect_err(|e| warn!(kind = ?e.kind(), error = %e, "rejected App Store notification"))
    }

    fn process_client_notification(
        &self,
        body: &[u8],
    ) -> Result<SubscriptionStatus, NotificationError> {
        self.client_notification(body)
            .inspect_err(|e| warn!(kind = ?e.kind(), error = %e, "rejected client notification"))
    }

    fn get_subscription_status(
        &self,
        entitlement_key: &str,
    ) -> Result<SubscriptionStatus, StoreError> {
        self.store.get(entitlement_key)
    }
}

impl<A: AppStoreServerNotificationDatasource, S: SubscriptionStatusStore>
    EntitlementRepositoryImpl<A, S>
{
    pub(crate) fn with_datasource(datasource: A, store: S, config: EntitlementConfig) -> Self {
        Self {
            app_store_server_notification_datasource: datasource,
            store,
            config,
        }
    }

    fn provider_notification(&self, body: &[u8]) -> Result<SubscriptionStatus, NotificationError> {
        self.config.check_body_size(body)?;
        let (notification, transaction_info, renewal_info) = self
            .app_store_server_notification_datasource
            .parse_notification(body)?;
        let data = notification
            .data
            .as_ref()
            .ok_or(ParseError::MissingNotificationData)?;
        self.config.check_bundle_id(&data.bundle_id)?;

        let status = entitlement_resolver::resolve(
            &Transaction::from(transaction_info),
            renewal_info.map(RenewalInfo::from).as_ref(),
            Some(&notification.notification_type),
            data.app_account_token.as_deref(),
        );
        self.write(status)
    }

    fn client_notification(&self, body: &[u8]) -> Result<SubscriptionStatus, NotificationError> {
        self.config.check_body_size(body)?;
        let notification = self
            .app_store_server_notification_datasource
            .parse_client_notification(body)?;
        self.config.check_bundle_id(&notification.bundle_id)?;
        let transaction_info = self
            .app_store_server_notification_datasource
            .parse_transaction(&notification.signed_transaction_info)?;

        let status = entitlement_resolver::resolve(
            &Transaction::from(transaction_info),
            None,
            None,
            notification.app_account_token.as_deref(),
        );
        self.write(status)
    }

    fn write(&self, status: SubscriptionStatus) -> Result<SubscriptionStatus, NotificationError> {
        self.store.set(status.clone())?;
        info!(
            entitlement_key = %status.entitlement_key,
            product_id = %status.product_id,
            is_active = status.is_active,
            expires_at = %status.expires_at,
            "stored subscription status"
        );
        Ok(status)
    }
}

impl<S: SubscriptionStatusStore>
    EntitlementRepositoryImpl<AppStoreServerNotificationDatasourceImpl<AppStoreJwsValidator>, S>
{
    /// Production wiring: tokens are verified against the embedded Apple root.
    pub(crate) fn new(store: S, config: EntitlementConfig) -> Result<Self, TrustError> {
        Ok(Self::with_datasource(
            AppStoreServerNotificationDatasourceImpl::new(AppStoreJwsValidator::new()?),
            store,
            config,
        ))
    }
}

impl From<JwsTransactionDecodedPayloadModel> for Transaction {
    fn from(m: JwsTransactionDecodedPayloadModel) -> Self {
        Self {
            original_transaction_id: m.original_transaction_id,
            transaction_id: m.transaction_id,
            product_id: m.product_id,
            expires_date_ms: m.expires_date,
            revocation_date_ms: m.revocation_date,
            revocation_reason: m.revocation_reason,
        }
    }
}

impl From<JwsRenewalInfoDecodedPayloadModel> for RenewalInfo {
    fn from(m: JwsRenewalInfoDecodedPayloadModel) -> Self {
        Self {
            auto_renew_status: m.auto_renew_status,
            expiration_intent: m.expiration_intent,
            is_in_billing_retry_period: m.is_in_billing_retry_period,
            grace_period_expires_date_ms: m.grace_period_expires_date,
        }
    }
}
