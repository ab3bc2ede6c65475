use crate::{domain::entities::subscription_status::SubscriptionStatus, errors::StoreError};

/// Persistence for subscription status records, keyed by entitlement key.
///
/// Writes are full replacements (last write wins); implementations own any
/// locking.
pub trait SubscriptionStatusStore: Send + Sync {
    /// Returns the last record written for `entitlement_key`, or
    /// [`StoreError::NotFound`].
    fn get(&self, entitlement_key: &str) -> Result<SubscriptionStatus, StoreError>;

    fn set(&self, status: SubscriptionStatus) -> Result<(), StoreError>;
}
