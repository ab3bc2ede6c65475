use chrono::{DateTime, Utc};

use crate::{
    constants::{EXPIRED_NOTIFICATION_TYPE, TRANSACTION_KEY_PREFIX},
    domain::entities::{
        renewal_info::RenewalInfo, subscription_status::SubscriptionStatus,
        transaction::Transaction,
    },
};

/// Computes the entitlement state for a verified transaction.
///
/// Every notification recomputes the status from scratch; the notification
/// type only matters when it is `EXPIRED`.
pub fn resolve(
    tx: &Transaction,
    renewal: Option<&RenewalInfo>,
    notification_type: Option<&str>,
    app_account_token: Option<&str>,
) -> SubscriptionStatus {
    resolve_at(Utc::now(), tx, renewal, notification_type, app_account_token)
}

/// Same as [`resolve`], evaluated at `now`.
pub fn resolve_at(
    now: DateTime<Utc>,
    tx: &Transaction,
    renewal: Option<&RenewalInfo>,
    notification_type: Option<&str>,
    app_account_token: Option<&str>,
) -> SubscriptionStatus {
    let entitlement_key = match app_account_token {
        Some(token) if !token.is_empty() => token.to_string(),
        _ => format!("{TRANSACTION_KEY_PREFIX}{}", tx.original_transaction_id),
    };

    let expires_at = epoch_millis_to_instant(tx.expires_date_ms);
    let grace = renewal
        .map(|r| epoch_millis_to_instant(r.grace_period_expires_date_ms))
        .filter(|t| *t != DateTime::<Utc>::UNIX_EPOCH);
    let active_until = match grace {
        Some(grace) if grace > expires_at => grace,
        _ => expires_at,
    };

    // Strictly before: the boundary instant itself is no longer active.
    let mut is_active = active_until != DateTime::<Utc>::UNIX_EPOCH && now < active_until;
    if tx.is_revoked() {
        is_active = false;
    }
    if notification_type == Some(EXPIRED_NOTIFICATION_TYPE) {
        is_active = false;
    }

    SubscriptionStatus {
        entitlement_key,
        product_id: tx.product_id.clone(),
        original_transaction_id: tx.original_transaction_id.clone(),
        expires_at: active_until,
        is_active,
    }
}

/// Absent, zero and out-of-range values all map to the UNIX epoch, which
/// stands for "no expiry known".
pub fn epoch_millis_to_instant(ms: Option<i64>) -> DateTime<Utc> {
    ms.filter(|ms| *ms != 0)
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::entities::transaction::RevocationReason;

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(1_750_000_000_000).unwrap()
    }

    fn ms(t: DateTime<Utc>) -> i64 {
        t.timestamp_millis()
    }

    fn tx(expires: Option<i64>) -> Transaction {
        Transaction {
            original_transaction_id: "2000000123456789".to_string(),
            transaction_id: "2000000987654321".to_string(),
            product_id: "com.example.pro.monthly".to_string(),
            expires_date_ms: expires,
            revocation_date_ms: None,
            revocation_reason: None,
        }
    }

    fn renewal_with_grace(grace: Option<i64>) -> RenewalInfo {
        RenewalInfo {
            grace_period_expires_date_ms: grace,
            ..RenewalInfo::default()
        }
    }

    #[test]
    fn future_expiry_is_active() {
        let expires = now() + Duration::days(3);
        let status = resolve_at(now(), &tx(Some(ms(expires))), None, Some("DID_RENEW"), None);
        assert!(status.is_active);
        assert_eq!(status.expires_at, expires);
        assert_eq!(status.product_id, "com.example.pro.monthly");
        assert_eq!(status.original_transaction_id, "2000000123456789");
    }

    #[test]
    fn boundary_instant_is_not_active() {
        let status = resolve_at(now(), &tx(Some(ms(now()))), None, None, None);
        assert!(!status.is_active);

        let status = resolve_at(
            now() - Duration::milliseconds(1),
            &tx(Some(ms(now()))),
            None,
            None,
            None,
        );
        assert!(status.is_active);
    }

    #[test]
    fn missing_or_zero_expiry_is_inactive_with_epoch_sentinel() {
        for expires in [None, Some(0)] {
            let status = resolve_at(now(), &tx(expires), None, None, None);
            assert!(!status.is_active);
            assert_eq!(status.expires_at, DateTime::<Utc>::UNIX_EPOCH);
            assert!(!status.has_known_expiry());
        }
    }

    #[test]
    fn grace_period_extends_past_expiry() {
        let expires = now() - Duration::days(1);
        let grace = now() + Duration::days(5);
        let status = resolve_at(
            now(),
            &tx(Some(ms(expires))),
            Some(&renewal_with_grace(Some(ms(grace)))),
            Some("DID_FAIL_TO_RENEW"),
            None,
        );
        assert!(status.is_active);
        assert_eq!(status.expires_at, grace);
    }

    #[test]
    fn earlier_or_absent_grace_keeps_expiry() {
        let expires = now() + Duration::days(10);
        for grace in [Some(ms(now() + Duration::days(2))), Some(ms(expires)), Some(0), None] {
            let status = resolve_at(
                now(),
                &tx(Some(ms(expires))),
                Some(&renewal_with_grace(grace)),
                None,
                None,
            );
            assert_eq!(status.expires_at, expires);
            assert!(status.is_active);
        }
    }

    #[test]
    fn grace_without_expiry_still_grants_access() {
        let grace = now() + Duration::hours(6);
        let status = resolve_at(
            now(),
            &tx(None),
            Some(&renewal_with_grace(Some(ms(grace)))),
            None,
            None,
        );
        assert!(status.is_active);
        assert_eq!(status.expires_at, grace);
    }

    #[test]
    fn revocation_dominates() {
        let mut revoked = tx(Some(ms(now() + Duration::days(30))));
        revoked.revocation_date_ms = Some(ms(now() - Duration::hours(1)));
        revoked.revocation_reason = Some(RevocationReason::Issue);
        let grace = renewal_with_grace(Some(ms(now() + Duration::days(60))));
        let status = resolve_at(now(), &revoked, Some(&grace), Some("DID_RENEW"), None);
        assert!(!status.is_active);

        // A zero revocation date is not a revocation.
        let mut not_revoked = tx(Some(ms(now() + Duration::days(30))));
        not_revoked.revocation_date_ms = Some(0);
        assert!(resolve_at(now(), &not_revoked, None, None, None).is_active);
    }

    #[test]
    fn expired_notification_dominates() {
        let status = resolve_at(
            now(),
            &tx(Some(ms(now() + Duration::days(30)))),
            None,
            Some("EXPIRED"),
            None,
        );
        assert!(!status.is_active);
        assert_eq!(status.expires_at, now() + Duration::days(30));
    }

    #[test]
    fn other_notification_types_do_not_branch() {
        let t = tx(Some(ms(now() + Duration::days(1))));
        let baseline = resolve_at(now(), &t, None, None, None);
        for kind in ["SUBSCRIBED", "DID_CHANGE_RENEWAL_STATUS", "GRACE_PERIOD_EXPIRED", "REFUND", "expired"] {
            assert_eq!(resolve_at(now(), &t, None, Some(kind), None), baseline);
        }
    }

    #[test]
    fn entitlement_key_prefers_account_token() {
        let t = tx(None);
        assert_eq!(
            resolve_at(now(), &t, None, None, Some("5d3c8f1e-user")).entitlement_key,
            "5d3c8f1e-user"
        );
        assert_eq!(
            resolve_at(now(), &t, None, None, Some("")).entitlement_key,
            "tx:2000000123456789"
        );
        assert_eq!(
            resolve_at(now(), &t, None, None, None).entitlement_key,
            "tx:2000000123456789"
        );
    }

    #[test]
    fn out_of_range_millis_mean_unknown() {
        assert_eq!(epoch_millis_to_instant(Some(i64::MAX)), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(
            epoch_millis_to_instant(Some(1_000)),
            DateTime::<Utc>::from_timestamp(1, 0).unwrap()
        );
    }

    #[test]
    fn resolution_is_deterministic_for_a_fixed_clock() {
        let t = tx(Some(ms(now() + Duration::minutes(5))));
        let r = renewal_with_grace(Some(ms(now() + Duration::minutes(10))));
        assert_eq!(
            resolve_at(now(), &t, Some(&r), None, Some("acct")),
            resolve_at(now(), &t, Some(&r), None, Some("acct"))
        );
    }
}
