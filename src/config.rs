use serde::Deserialize;

use crate::{constants::DEFAULT_MAX_NOTIFICATION_BYTES, errors::ParseError};

/// Runtime options for notification processing.
///
/// The pinned root certificate is deliberately not part of this
/// configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntitlementConfig {
    /// When set, notifications for any other bundle ID are rejected.
    pub bundle_id: Option<String>,
    /// Largest notification body accepted, in bytes.
    pub max_notification_bytes: usize,
}

impl Default for EntitlementConfig {
    fn default() -> Self {
        Self {
            bundle_id: None,
            max_notification_bytes: DEFAULT_MAX_NOTIFICATION_BYTES,
        }
    }
}

impl EntitlementConfig {
    pub fn with_bundle_id(bundle_id: impl Into<String>) -> Self {
        Self {
            bundle_id: Some(bundle_id.into()),
            ..Self::default()
        }
    }

    pub(crate) fn check_bundle_id(&self, actual: &str) -> Result<(), ParseError> {
        match &self.bundle_id {
            Some(expected) if expected != actual => Err(ParseError::BundleIdMismatch {
                expected: expected.clone(),
                actual: actual.to_string(),
            }),
            _ => Ok(()),
        }
    }

    pub(crate) fn check_body_size(&self, body: &[u8]) -> Result<(), ParseError> {
        if body.len() > self.max_notification_bytes {
            return Err(ParseError::BodyTooLarge {
                limit: self.max_notification_bytes,
            });
        }
        Ok(())
    }
}
