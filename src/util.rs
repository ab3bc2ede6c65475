use crate::{
    config::EntitlementConfig,
    data::{
        datasources::{
            app_store_server_notification_datasource::AppStoreServerNotificationDatasourceImpl,
            jws_validator::AppStoreJwsValidator,
        },
        repositories::entitlement_repository_impl::EntitlementRepositoryImpl,
    },
    domain::{
        entities::subscription_status::SubscriptionStatus,
        repositories::{
            entitlement_repository::EntitlementRepository,
            subscription_status_store::SubscriptionStatusStore,
        },
    },
    errors::{NotificationError, StoreError, TrustError},
};

/// Entry point for the HTTP layer: one call per incoming request.
///
/// Each call is independent; the only shared state is the status store.
pub struct EntitlementUtil<R: EntitlementRepository> {
    entitlement_repository: R,
}

impl<R: EntitlementRepository> EntitlementUtil<R> {
    /// Handle an App Store Server Notification (V2) POST body.
    ///
    /// On success the resolved status has already been written to the store.
    /// Any error means nothing was written; trust failures
    /// ([`NotificationError::trust_error`]) must not be retried.
    pub fn handle_app_store_notification(
        &self,
        body: &[u8],
    ) -> Result<SubscriptionStatus, NotificationError> {
        self.entitlement_repository.process_provider_notification(body)
    }

    /// Handle a purchase forwarded by the client app:
    /// `{"bundleId", "appAccountToken"?, "signedTransactionInfo"}`.
    pub fn handle_client_notification(
        &self,
        body: &[u8],
    ) -> Result<SubscriptionStatus, NotificationError> {
        self.entitlement_repository.process_client_notification(body)
    }

    pub fn get_subscription_status(
        &self,
        entitlement_key: &str,
    ) -> Result<SubscriptionStatus, StoreError> {
        self.entitlement_repository
            .get_subscription_status(entitlement_key)
    }
}

impl<S: SubscriptionStatusStore>
    EntitlementUtil<
        EntitlementRepositoryImpl<AppStoreServerNotificationDatasourceImpl<AppStoreJwsValidator>, S>,
    >
{
    /// Fails only if the embedded Apple root certificate cannot be loaded.
    pub fn new(store: S, config: EntitlementConfig) -> Result<Self, TrustError> {
        Ok(Self {
            entitlement_repository: EntitlementRepositoryImpl::new(store, config)?,
        })
    }
}
