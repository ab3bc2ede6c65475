use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) enum Environment {
    /// Indicates that the data applies to testing in the sandbox environment.
    Sandbox,
    /// Indicates that the data applies to the production environment.
    Production,
    /// StoreKit testing in Xcode.
    Xcode,
    LocalTesting,

    #[serde(untagged)]
    Unknown(String),
}
