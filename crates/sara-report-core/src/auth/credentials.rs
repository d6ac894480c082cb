use std::fmt;

/// Opaque access key, used verbatim as the `app-key` header value.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// How a deployment supplies the credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialScheme {
    /// No `app-key` header is sent
    None,
    /// The same deployment-wide key is sent on every request
    Fixed(Credential),
    /// The operator enters a key at login; it is probed before being accepted
    PerSession,
}

impl CredentialScheme {
    /// Whether sessions start behind a login gate
    pub fn is_gated(&self) -> bool {
        matches!(self, CredentialScheme::PerSession)
    }
}

/// Something that can validate a candidate credential with one request.
///
/// Every failure mode collapses into `false`.
#[allow(async_fn_in_trait)]
pub trait CredentialProbe {
    async fn probe(&self, credential: &Credential) -> bool;
}
