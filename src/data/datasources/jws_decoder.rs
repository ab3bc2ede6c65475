use base64::{prelude::BASE64_URL_SAFE_NO_PAD, Engine as _};
use tracing::debug;

use crate::{
    data::datasources::jws_validator::JwsValidator,
    errors::{DecodeError, TokenPart},
};

/// Raw bytes of a compact JWS whose signature and chain have been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DecodedJws {
    pub(crate) header: Vec<u8>,
    pub(crate) payload: Vec<u8>,
    pub(crate) signature: Vec<u8>,
}

/// Splits compact tokens and only decodes them once the validator has
/// accepted the still-encoded parts. Holds no state between calls.
pub(crate) struct JwsDecoder<V: JwsValidator> {
    validator: V,
}

impl<V: JwsValidator> JwsDecoder<V> {
    pub(crate) fn new(validator: V) -> Self {
        Self { validator }
    }

    pub(crate) fn decode(&self, token: &str) -> Result<DecodedJws, DecodeError> {
        if token.is_empty() {
            return Err(DecodeError::EmptyToken);
        }
        let parts: Vec<&str> = token.split('.').collect();
        let [header, payload, signature] = parts.as_slice() else {
            return Err(DecodeError::MalformedFormat { parts: parts.len() });
        };

        self.validator
            .validate(header, payload, signature)
            .inspect_err(|e| debug!(error = %e, "JWS rejected by trust validation"))?;

        Ok(DecodedJws {
            header: decode_part(TokenPart::Header, header)?,
            payload: decode_part(TokenPart::Payload, payload)?,
            signature: decode_part(TokenPart::Signature, signature)?,
        })
    }
}

fn decode_part(part: TokenPart, encoded: &str) -> Result<Vec<u8>, DecodeError> {
    BASE64_URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|source| DecodeError::Encoding { part, source })
}
