//! Error taxonomy for the connection lifecycle core.
//!
//! Mirrors the two-tier split the wider corpus uses: transient client faults
//! that end in a kick/disconnect, and programming errors that are fatal to
//! the calling task.

use thiserror::Error;

/// Errors produced by the participant registry and the login/configuration
/// transitions.
#[derive(Error, Debug)]
pub enum PlayerNetError {
    /// [`crate::registry::PlayerRegistry::create`] was called for a
    /// connection that is already registered.
    #[error("connection is already registered")]
    AlreadyRegistered,

    /// One or more login-plugin-message replies failed or did not arrive
    /// within `LOGIN_PLUGIN_MESSAGE_TIMEOUT`.
    #[error("login plugin message reply failed or timed out")]
    LoginPluginReplyFailed,

    /// The `Configuration` event handler left `spawn-target` unset.
    #[error("configuration event handler did not set a spawn target")]
    SpawnMissing,

    /// The known-packs future resolved to an error (C4 step 9a "executor
    /// failure"), as distinct from it simply timing out. Propagated rather
    /// than disconnecting the participant: the caller remains in
    /// `config_set` and is cleaned up only by an explicit disconnect (§7).
    #[error("known packs request failed: {0}")]
    KnownPacksFailed(anyhow::Error),

    /// An operation was attempted after [`crate::shutdown`] completed.
    #[error("player registry has shut down")]
    ShuttingDown,
}
