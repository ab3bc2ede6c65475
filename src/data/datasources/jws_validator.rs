use base64::{
    prelude::{BASE64_STANDARD, BASE64_URL_SAFE_NO_PAD},
    Engine as _,
};
use once_cell::sync::Lazy;
use openssl::{
    bn::BigNum,
    ec::EcKey,
    ecdsa::EcdsaSig,
    error::ErrorStack,
    nid::Nid,
    pkey::Public,
    sha::sha256,
    stack::Stack,
    x509::{store::X509StoreBuilder, X509StoreContext, X509},
};

use crate::{
    constants::{APPLE_ROOT_CA_G3_PEM, SUPPORTED_JWS_ALGORITHM},
    data::models::jws::jws_header_model::JwsHeaderModel,
    errors::TrustError,
};

/// Parsed once, on first use, and shared read-only for the life of the
/// process.
static APPLE_ROOT_CA_G3: Lazy<Result<X509, String>> = Lazy::new(|| {
    X509::from_pem(APPLE_ROOT_CA_G3_PEM.as_bytes()).map_err(|e| e.to_string())
});

/// Trust check for the three still-encoded parts of a compact JWS.
pub(crate) trait JwsValidator: Send + Sync {
    fn validate(&self, header: &str, payload: &str, signature: &str) -> Result<(), TrustError>;
}

/// Verifies App Store signed payloads: an ES256 signature by the leaf
/// certificate in the `x5c` header, and a chain from that leaf to the pinned
/// root.
pub(crate) struct AppStoreJwsValidator {
    root_ca: X509,
}

impl JwsValidator for AppStoreJwsValidator {
    fn validate(&self, header: &str, payload: &str, signature: &str) -> Result<(), TrustError> {
        if header.is_empty() || payload.is_empty() || signature.is_empty() {
            return Err(TrustError::IncompleteInput);
        }

        let header_model = parse_header(header)?;
        if header_model.alg != SUPPORTED_JWS_ALGORITHM {
            return Err(TrustError::UnsupportedAlgorithm {
                alg: header_model.alg,
            });
        }
        let (leaf, intermediates) = header_model
            .x5c
            .split_first()
            .ok_or(TrustError::MissingCertificateChain)?;

        let leaf = parse_certificate(leaf)
            .map_err(|reason| TrustError::LeafCertificateParse { reason })?;
        let public_key = p256_public_key(&leaf)?;

        // The signing input is the encoded header and payload, not the
        // decoded bytes.
        verify_signature(&public_key, &format!("{header}.{payload}"), signature)?;
        self.verify_chain(&leaf, intermediates)
    }
}

impl AppStoreJwsValidator {
    /// Validator pinned to Apple Root CA - G3.
    pub(crate) fn new() -> Result<Self, TrustError> {
        let root_ca = APPLE_ROOT_CA_G3
            .as_ref()
            .map_err(|reason| TrustError::TrustAnchorUnavailable {
                reason: reason.clone(),
            })?;
        Ok(Self::with_root_ca(root_ca.clone()))
    }

    pub(crate) fn with_root_ca(root_ca: X509) -> Self {
        Self { root_ca }
    }

    fn verify_chain(&self, leaf: &X509, intermediates: &[String]) -> Result<(), TrustError> {
        let mut chain: Stack<X509> = Stack::new().map_err(crypto_backend)?;
        for (i, encoded) in intermediates.iter().enumerate() {
            let cert = parse_certificate(encoded).map_err(|reason| {
                TrustError::IntermediateParse {
                    index: i + 1,
                    reason,
                }
            })?;
            chain.push(cert).map_err(crypto_backend)?;
        }

        let mut roots = X509StoreBuilder::new().map_err(crypto_backend)?;
        roots
            .add_cert(self.root_ca.clone())
            .map_err(crypto_backend)?;
        let roots = roots.build();

        let mut context = X509StoreContext::new().map_err(crypto_backend)?;
        let failure = context
            .init(&roots, leaf, &chain, |c| {
                Ok(if c.verify_cert()? {
                    None
                } else {
                    Some(c.error())
                })
            })
            .map_err(crypto_backend)?;
        match failure {
            None => Ok(()),
            Some(result) => Err(TrustError::ChainVerificationFailed {
                reason: result.error_string().to_string(),
            }),
        }
    }
}

fn parse_header(header: &str) -> Result<JwsHeaderModel, TrustError> {
    let bytes = BASE64_URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|e| TrustError::HeaderParse {
            reason: format!("invalid base64url: {e}"),
        })?;
    serde_json::from_slice(&bytes).map_err(|e| TrustError::HeaderParse {
        reason: e.to_string(),
    })
}

/// x5c entries are standard, padded base64 of DER.
fn parse_certificate(encoded: &str) -> Result<X509, String> {
    let der = BASE64_STANDARD
        .decode(encoded)
        .map_err(|e| format!("invalid base64: {e}"))?;
    X509::from_der(&der).map_err(|e| e.to_string())
}

fn p256_public_key(cert: &X509) -> Result<EcKey<Public>, TrustError> {
    let key = cert
        .public_key()
        .and_then(|k| k.ec_key())
        .map_err(|_| TrustError::UnsupportedKeyType)?;
    if key.group().curve_name() != Some(Nid::X9_62_PRIME256V1) {
        return Err(TrustError::UnsupportedKeyType);
    }
    Ok(key)
}

fn verify_signature(
    key: &EcKey<Public>,
    signing_input: &str,
    signature: &str,
) -> Result<(), TrustError> {
    let signature = BASE64_URL_SAFE_NO_PAD
        .decode(signature)
        .map_err(|e| TrustError::InvalidSignature {
            reason: format!("invalid base64url: {e}"),
        })?;
    let signature = decode_ecdsa_signature(&signature)?;
    let digest = sha256(signing_input.as_bytes());
    match signature.verify(&digest, key) {
        Ok(true) => Ok(()),
        Ok(false) => Err(TrustError::InvalidSignature {
            reason: "signature does not match the leaf certificate key".to_string(),
        }),
        Err(e) => Err(TrustError::InvalidSignature {
            reason: e.to_string(),
        }),
    }
}

/// DER first. A 64-byte value that isn't DER is read as the fixed-width
/// `r || s` form used by standard JWS ES256.
fn decode_ecdsa_signature(bytes: &[u8]) -> Result<EcdsaSig, TrustError> {
    match EcdsaSig::from_der(bytes) {
        Ok(sig) => Ok(sig),
        Err(_) if bytes.len() == 64 => {
            let (r, s) = bytes.split_at(32);
            BigNum::from_slice(r)
                .and_then(|r| Ok((r, BigNum::from_slice(s)?)))
                .and_then(|(r, s)| EcdsaSig::from_private_components(r, s))
                .map_err(|e| TrustError::InvalidSignature {
                    reason: e.to_string(),
                })
        }
        Err(e) => Err(TrustError::InvalidSignature {
            reason: format!("malformed ECDSA signature: {e}"),
        }),
    }
}

fn crypto_backend(e: ErrorStack) -> TrustError {
    TrustError::CryptoBackend {
        reason: e.to_string(),
    }
}
