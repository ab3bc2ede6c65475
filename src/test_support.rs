//! Throwaway certificate authorities and token signing for tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use base64::{
    prelude::{BASE64_STANDARD, BASE64_URL_SAFE_NO_PAD},
    Engine as _,
};
use chrono::Utc;
use openssl::{
    asn1::Asn1Time,
    bn::{BigNum, MsbOption},
    ec::{EcGroup, EcKey},
    ecdsa::EcdsaSig,
    hash::MessageDigest,
    nid::Nid,
    pkey::{PKey, Private},
    sha::sha256,
    x509::{
        extension::{AuthorityKeyIdentifier, BasicConstraints, KeyUsage, SubjectKeyIdentifier},
        X509Builder, X509NameBuilder, X509NameRef, X509,
    },
};
use serde_json::{json, Value};

use crate::{
    data::datasources::jws_validator::{AppStoreJwsValidator, JwsValidator},
    errors::TrustError,
};

/// Root -> intermediate -> leaf, all P-256.
pub(crate) struct TestPki {
    pub(crate) root: X509,
    pub(crate) root_key: PKey<Private>,
    pub(crate) intermediate: X509,
    pub(crate) intermediate_key: PKey<Private>,
    pub(crate) leaf: X509,
    pub(crate) leaf_key: PKey<Private>,
}

impl TestPki {
    pub(crate) fn generate() -> Self {
        let root_key = Self::p256_key();
        let root = build_cert("Test Root CA", &root_key, None, true);
        let intermediate_key = Self::p256_key();
        let intermediate = build_cert(
            "Test Intermediate CA",
            &intermediate_key,
            Some((&root, &root_key)),
            true,
        );
        let leaf_key = Self::p256_key();
        let leaf = build_cert(
            "Test Signing Leaf",
            &leaf_key,
            Some((&intermediate, &intermediate_key)),
            false,
        );
        Self {
            root,
            root_key,
            intermediate,
            intermediate_key,
            leaf,
            leaf_key,
        }
    }

    pub(crate) fn p256_key() -> PKey<Private> {
        let group = EcGroup::from_curve_name(Nid::X9_62_PRIME256V1).unwrap();
        PKey::from_ec_key(EcKey::generate(&group).unwrap()).unwrap()
    }

    pub(crate) fn validator(&self) -> AppStoreJwsValidator {
        AppStoreJwsValidator::with_root_ca(self.root.clone())
    }

    /// Leaf first, then the intermediate, as App Store tokens carry them.
    pub(crate) fn x5c(&self) -> Vec<String> {
        x5c_of(&[&self.leaf, &self.intermediate])
    }

    pub(crate) fn sign_json(&self, payload: &Value) -> String {
        let header = json!({"alg": "ES256", "x5c": self.x5c()});
        sign_token(&self.leaf_key, &header, payload.to_string().as_bytes())
    }
}

/// Certificate valid from an hour ago for the next 30 days.
pub(crate) fn build_cert(
    common_name: &str,
    subject_key: &PKey<Private>,
    issuer: Option<(&X509, &PKey<Private>)>,
    is_ca: bool,
) -> X509 {
    let now = Utc::now().timestamp();
    build_cert_valid_between(
        common_name,
        subject_key,
        issuer,
        is_ca,
        now - 3600,
        now + 30 * 24 * 3600,
    )
}

/// Like [`build_cert`], with an explicit validity window in UNIX seconds.
pub(crate) fn build_cert_valid_between(
    common_name: &str,
    subject_key: &PKey<Private>,
    issuer: Option<(&X509, &PKey<Private>)>,
    is_ca: bool,
    not_before: i64,
    not_after: i64,
) -> X509 {
    let mut name = X509NameBuilder::new().unwrap();
    name.append_entry_by_nid(Nid::COMMONNAME, common_name).unwrap();
    let name = name.build();

    let mut serial = BigNum::new().unwrap();
    serial.rand(64, MsbOption::MAYBE_ZERO, false).unwrap();

    let mut builder = X509Builder::new().unwrap();
    builder.set_version(2).unwrap();
    builder
        .set_serial_number(&serial.to_asn1_integer().unwrap())
        .unwrap();
    builder.set_subject_name(&name).unwrap();
    let issuer_name: &X509NameRef = match issuer {
        Some((issuer_cert, _)) => issuer_cert.subject_name(),
        None => &name,
    };
    builder.set_issuer_name(issuer_name).unwrap();
    builder.set_pubkey(subject_key).unwrap();
    builder
        .set_not_before(&Asn1Time::from_unix(not_before).unwrap())
        .unwrap();
    builder
        .set_not_after(&Asn1Time::from_unix(not_after).unwrap())
        .unwrap();

    if is_ca {
        builder
            .append_extension(BasicConstraints::new().critical().ca().build().unwrap())
            .unwrap();
        builder
            .append_extension(
                KeyUsage::new()
                    .critical()
                    .key_cert_sign()
                    .crl_sign()
                    .build()
                    .unwrap(),
            )
            .unwrap();
    } else {
        builder
            .append_extension(BasicConstraints::new().build().unwrap())
            .unwrap();
        builder
            .append_extension(KeyUsage::new().critical().digital_signature().build().unwrap())
            .unwrap();
    }
    let ski = SubjectKeyIdentifier::new()
        .build(&builder.x509v3_context(None, None))
        .unwrap();
    builder.append_extension(ski).unwrap();
    if let Some((issuer_cert, _)) = issuer {
        let aki = AuthorityKeyIdentifier::new()
            .keyid(false)
            .build(&builder.x509v3_context(Some(&**issuer_cert), None))
            .unwrap();
        builder.append_extension(aki).unwrap();
    }

    let signing_key = issuer.map(|(_, key)| key).unwrap_or(subject_key);
    builder.sign(signing_key, MessageDigest::sha256()).unwrap();
    builder.build()
}

pub(crate) fn x5c_of(certs: &[&X509]) -> Vec<String> {
    certs
        .iter()
        .map(|c| BASE64_STANDARD.encode(c.to_der().unwrap()))
        .collect()
}

/// Builds `header.payload.signature` with a DER ECDSA signature over the
/// encoded signing input.
pub(crate) fn sign_token(key: &PKey<Private>, header: &Value, payload: &[u8]) -> String {
    let header = BASE64_URL_SAFE_NO_PAD.encode(header.to_string());
    let payload = BASE64_URL_SAFE_NO_PAD.encode(payload);
    let digest = sha256(format!("{header}.{payload}").as_bytes());
    let signature = EcdsaSig::sign(&digest, &key.ec_key().unwrap())
        .unwrap()
        .to_der()
        .unwrap();
    format!("{header}.{payload}.{}", BASE64_URL_SAFE_NO_PAD.encode(signature))
}

pub(crate) fn split_token(token: &str) -> (&str, &str, &str) {
    let mut parts = token.split('.');
    (
        parts.next().unwrap(),
        parts.next().unwrap(),
        parts.next().unwrap(),
    )
}

/// Unsigned token with the given JSON payload, for use with mock validators.
pub(crate) fn unsigned_token(payload: &Value) -> String {
    format!(
        "eyJhbGciOiJFUzI1NiJ9.{}.c2ln",
        BASE64_URL_SAFE_NO_PAD.encode(payload.to_string())
    )
}

/// Accepts or rejects everything, counting calls.
pub(crate) struct MockJwsValidator {
    accept: bool,
    calls: AtomicUsize,
}

impl MockJwsValidator {
    pub(crate) fn accepting() -> Self {
        Self {
            accept: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn rejecting() -> Self {
        Self {
            accept: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl JwsValidator for MockJwsValidator {
    fn validate(&self, _header: &str, _payload: &str, _signature: &str) -> Result<(), TrustError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.accept {
            Ok(())
        } else {
            Err(TrustError::InvalidSignature {
                reason: "rejected by mock".to_string(),
            })
        }
    }
}

impl<V: JwsValidator + ?Sized> JwsValidator for &V {
    fn validate(&self, header: &str, payload: &str, signature: &str) -> Result<(), TrustError> {
        (**self).validate(header, payload, signature)
    }
}
