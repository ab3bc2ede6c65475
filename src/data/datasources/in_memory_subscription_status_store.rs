use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use tracing::debug;

use crate::{
    domain::{
        entities::subscription_status::SubscriptionStatus,
        repositories::subscription_status_store::SubscriptionStatusStore,
    },
    errors::StoreError,
};

/// Process-local [`SubscriptionStatusStore`]. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemorySubscriptionStatusStore {
    statuses: RwLock<HashMap<String, SubscriptionStatus>>,
}

impl InMemorySubscriptionStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.statuses.read().map_err(poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }
}

impl SubscriptionStatusStore for InMemorySubscriptionStatusStore {
    fn get(&self, entitlement_key: &str) -> Result<SubscriptionStatus, StoreError> {
        let statuses = self.statuses.read().map_err(poisoned)?;
        statuses
            .get(entitlement_key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                entitlement_key: entitlement_key.to_string(),
            })
    }

    fn set(&self, status: SubscriptionStatus) -> Result<(), StoreError> {
        let mut statuses = self.statuses.write().map_err(poisoned)?;
        debug!(
            entitlement_key = %status.entitlement_key,
            is_active = status.is_active,
            "replacing subscription status"
        );
        statuses.insert(status.entitlement_key.clone(), status);
        Ok(())
    }
}

fn poisoned<T>(e: PoisonError<T>) -> StoreError {
    StoreError::Unavailable {
        message: e.to_string(),
    }
}
