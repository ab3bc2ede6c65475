use crate::{
    domain::entities::subscription_status::SubscriptionStatus,
    errors::{NotificationError, StoreError},
};

pub trait EntitlementRepository: Send + Sync {
    /// Verifies an App Store Server Notification (V2) body, resolves the
    /// entitlement it describes and stores the result.
    fn process_provider_notification(
        &self,
        body: &[u8],
    ) -> Result<SubscriptionStatus, NotificationError>;

    /// Verifies a transaction forwarded by the client app and stores the
    /// resolved entitlement.
    fn process_client_notification(
        &self,
        body: &[u8],
    ) -> Result<SubscriptionStatus, NotificationError>;

    fn get_subscription_status(
        &self,
        entitlement_key: &str,
    ) -> Result<SubscriptionStatus, StoreError>;
}
