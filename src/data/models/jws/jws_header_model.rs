use serde::Deserialize;

/// Protected header of an App Store compact JWS. Only the fields the trust
/// check reads are kept; the rest are ignored.
///
/// https://developer.apple.com/documentation/appstoreserverapi/jwsdecodedheader
#[derive(Debug, Deserialize)]
pub(crate) struct JwsHeaderModel {
    /// The algorithm used for signing. Only ES256 is accepted.
    #[serde(default)]
    pub(crate) alg: String,
    /// The X.509 certificate chain, leaf first. Each entry is standard
    /// (padded) base64 of a DER certificate.
    #[serde(default)]
    pub(crate) x5c: Vec<String>,
}
