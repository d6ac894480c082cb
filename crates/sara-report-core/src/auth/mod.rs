//! Session-scoped authentication state.
//!
//! This module provides:
//! - `Credential`: the opaque access key sent as the `app-key` header
//! - `CredentialScheme`: how a deployment supplies credentials
//! - `Session`: the per-session credential store and its login gate
//!
//! Nothing here touches the disk. A session lives exactly as long as the
//! `Session` value; dropping it or calling `logout` forgets the key.

pub mod credentials;
pub mod session;

pub use credentials::{Credential, CredentialProbe, CredentialScheme};
pub use session::{Session, SessionState};
