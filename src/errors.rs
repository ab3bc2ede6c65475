use std::fmt;

/// Coarse classification of every failure the crate can return, for the
/// transport layer to map onto a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed JSON, wrong token shape, missing or mismatching fields.
    Format,
    /// Invalid base64 content.
    Encoding,
    /// Signature or certificate chain could not be trusted. The notification
    /// must be rejected outright.
    Trust,
    /// The status store failed or had no record.
    Store,
}

/// Failures of the JWS trust check (signature and certificate chain).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrustError {
    #[error("header, payload and signature must all be non-empty")]
    IncompleteInput,

    #[error("failed to parse JWS header: {reason}")]
    HeaderParse { reason: String },

    #[error("unsupported JWS algorithm: {alg}")]
    UnsupportedAlgorithm { alg: String },

    #[error("JWS header has no x5c certificate chain")]
    MissingCertificateChain,

    #[error("failed to parse leaf certificate: {reason}")]
    LeafCertificateParse { reason: String },

    #[error("leaf certificate key is not a P-256 elliptic-curve key")]
    UnsupportedKeyType,

    #[error("invalid JWS signature: {reason}")]
    InvalidSignature { reason: String },

    #[error("failed to parse intermediate certificate x5c[{index}]: {reason}")]
    IntermediateParse { index: usize, reason: String },

    #[error("certificate chain does not verify to the pinned root: {reason}")]
    ChainVerificationFailed { reason: String },

    #[error("pinned root certificate could not be loaded: {reason}")]
    TrustAnchorUnavailable { reason: String },

    #[error("crypto backend error: {reason}")]
    CryptoBackend { reason: String },
}

/// Which of the three compact-token parts an encoding error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenPart {
    Header,
    Payload,
    Signature,
}

impl fmt::Display for TokenPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TokenPart::Header => "header",
            TokenPart::Payload => "payload",
            TokenPart::Signature => "signature",
        })
    }
}

/// Failures of splitting and decoding a compact JWS.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("signed token is empty")]
    EmptyToken,

    #[error("invalid JWS format: want 3 parts, got {parts}")]
    MalformedFormat { parts: usize },

    #[error("failed to validate JWS: {0}")]
    Trust(#[from] TrustError),

    #[error("failed to base64url-decode JWS {part}: {source}")]
    Encoding {
        part: TokenPart,
        source: base64::DecodeError,
    },
}

/// Failures of turning a notification body or nested token into typed facts.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("failed to parse {document}: {source}")]
    Json {
        document: &'static str,
        source: serde_json::Error,
    },

    #[error("notification body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    #[error("notification is missing signedPayload")]
    MissingSignedPayload,

    #[error("notification payload has no data block")]
    MissingNotificationData,

    #[error("notification data has no signedTransactionInfo")]
    MissingTransactionInfo,

    #[error("bundle ID mismatch: expected {expected}, got {actual}")]
    BundleIdMismatch { expected: String, actual: String },
}

/// Failures reported by a subscription status store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("no subscription status for {entitlement_key}")]
    NotFound { entitlement_key: String },

    #[error("subscription status store unavailable: {message}")]
    Unavailable { message: String },
}

/// Error returned by the notification entry points.
#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl DecodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DecodeError::EmptyToken | DecodeError::MalformedFormat { .. } => ErrorKind::Format,
            DecodeError::Trust(_) => ErrorKind::Trust,
            DecodeError::Encoding { .. } => ErrorKind::Encoding,
        }
    }
}

impl ParseError {
    pub(crate) fn json(document: &'static str, source: serde_json::Error) -> Self {
        ParseError::Json { document, source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Decode(e) => e.kind(),
            _ => ErrorKind::Format,
        }
    }
}

impl NotificationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NotificationError::Parse(e) => e.kind(),
            NotificationError::Store(_) => ErrorKind::Store,
        }
    }

    /// The trust failure behind this error, if any.
    pub fn trust_error(&self) -> Option<&TrustError> {
        match self {
            NotificationError::Parse(ParseError::Decode(DecodeError::Trust(e))) => Some(e),
            _ => None,
        }
    }
}

impl From<DecodeError> for NotificationError {
    fn from(e: DecodeError) -> Self {
        NotificationError::Parse(ParseError::Decode(e))
    }
}
