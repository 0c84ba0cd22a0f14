//! Tunables for the connection lifecycle core.
//!
//! One settings struct, constructed once at startup and shared behind an
//! `Arc`, following the `NetworkSettings`/`Default` shape the corpus uses
//! elsewhere for subsystem configuration.

use std::time::Duration;

/// Settings for [`crate::PlayerNet`].
///
/// Mutating a clone after the manager has been constructed has no effect;
/// these are read once at the relevant call sites.
#[derive(Clone, Debug)]
pub struct PlayerNetSettings {
    /// Minimum packet size, in bytes, above which outgoing packets are
    /// compressed. A value `<= 0` disables compression entirely.
    ///
    /// # Default Value
    ///
    /// `256`
    pub compression_threshold: i32,

    /// Deadline for outstanding login-plugin-message replies during the
    /// login→config transition (C3 step 5).
    ///
    /// # Default Value
    ///
    /// `5` seconds
    pub login_plugin_message_timeout: Duration,

    /// Deadline for the known-packs reply during the configuration routine
    /// (C4 step 9a).
    ///
    /// # Default Value
    ///
    /// `10` seconds
    pub known_packs_response_timeout: Duration,

    /// Idle period after which a keep-alive is due for a participant.
    ///
    /// # Default Value
    ///
    /// `15` seconds
    pub keep_alive_delay: Duration,

    /// Silence beyond which an unresponsive participant is kicked.
    ///
    /// Must be greater than [`keep_alive_delay`][Self::keep_alive_delay].
    ///
    /// # Default Value
    ///
    /// `30` seconds
    pub keep_alive_kick: Duration,

    /// When `true`, the handoff-drain step of [`crate::tick::tick`] awaits
    /// the world-entry future inline instead of firing-and-forgetting it.
    /// Intended for deterministic tests only.
    ///
    /// # Default Value
    ///
    /// `false`
    pub inside_test: bool,
}

impl Default for PlayerNetSettings {
    fn default() -> Self {
        Self {
            compression_threshold: 256,
            login_plugin_message_timeout: Duration::from_secs(5),
            known_packs_response_timeout: Duration::from_secs(10),
            keep_alive_delay: Duration::from_secs(15),
            keep_alive_kick: Duration::from_secs(30),
            inside_test: false,
        }
    }
}

impl PlayerNetSettings {
    /// `true` iff [`compression_threshold`][Self::compression_threshold] is
    /// a value that should turn compression on.
    pub fn compression_enabled(&self) -> bool {
        self.compression_threshold > 0
    }
}
