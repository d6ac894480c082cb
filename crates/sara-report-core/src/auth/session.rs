use tracing::{debug, info, warn};

use super::credentials::{Credential, CredentialProbe, CredentialScheme};
use crate::api::ReportError;

/// Login state of one interactive session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

/// Credential store for a single interactive session.
///
/// While `Authenticated`, `credential` holds the most recently accepted key
/// (or the fixed deployment key). Ungated schemes start authenticated and
/// never leave that state.
#[derive(Debug)]
pub struct Session {
    scheme: CredentialScheme,
    state: SessionState,
    credential: Option<Credential>,
}

impl Session {
    pub fn new(scheme: CredentialScheme) -> Self {
        let (state, credential) = match &scheme {
            CredentialScheme::None => (SessionState::Authenticated, None),
            CredentialScheme::Fixed(key) => (SessionState::Authenticated, Some(key.clone())),
            CredentialScheme::PerSession => (SessionState::Unauthenticated, None),
        };
        Self {
            scheme,
            state,
            credential,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    pub fn is_gated(&self) -> bool {
        self.scheme.is_gated()
    }

    /// Validate `candidate` with one probe request and accept it on success.
    ///
    /// On failure the session is left exactly as it was. Ungated schemes have
    /// nothing to log into and report success without probing.
    pub async fn attempt_login<P: CredentialProbe>(&mut self, prober: &P, candidate: Credential) -> bool {
        if !self.is_gated() {
            debug!("Login requested on an ungated session, nothing to do");
            return true;
        }

        if prober.probe(&candidate).await {
            self.credential = Some(candidate);
            self.state = SessionState::Authenticated;
            info!("Login successful");
            true
        } else {
            warn!("Login rejected by probe");
            false
        }
    }

    /// Forget the session credential. No network call is made.
    pub fn logout(&mut self) {
        if !self.is_gated() {
            debug!("Logout requested on an ungated session, ignoring");
            return;
        }
        self.credential = None;
        self.state = SessionState::Unauthenticated;
        info!("Logged out");
    }

    /// The credential to send with the next request, if any
    pub fn credential(&self) -> Option<&Credential> {
        match self.state {
            SessionState::Authenticated => self.credential.as_ref(),
            SessionState::Unauthenticated => None,
        }
    }

    /// Credential for a fetch, or `AuthDenied` if the gate is still closed
    pub fn require_authenticated(&self) -> Result<Option<&Credential>, ReportError> {
        match self.state {
            SessionState::Authenticated => Ok(self.credential.as_ref()),
            SessionState::Unauthenticated => Err(ReportError::AuthDenied),
        }
    }
}
