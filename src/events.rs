//! The two in-out event records C3 and C4 dispatch (§9 "Event dispatch").
//!
//! Both are mutable configuration records: the core constructs one with
//! sensible defaults, hands it to [`EventBus::dispatch_pre_login`] /
//! [`EventBus::dispatch_configuration`], and observes whatever the handler
//! left behind. Dispatch is synchronous — matching `NetworkCallbacks`' plain
//! (non-`async_trait`) methods, since neither event is a suspension point
//! (§9 lists only three: the login-plugin barrier, the known-packs future,
//! and the resource-pack future).

use valence_ident::Ident;

use crate::connection::{Connection, LoginPluginMessageProcessor};
use crate::participant::{Participant, SpawnTarget};
use crate::profile::GameProfile;

/// Carried by the `PreLogin` event (C3 step 2).
///
/// The handler may replace `profile` wholesale (most commonly to apply a
/// proxy-forwarded uuid/username) and may register login-plugin-message
/// round trips through `login_plugin_message_processor`. It may also kick
/// `connection` directly; C3 observes this via `connection.is_online()`
/// after dispatch returns.
pub struct PreLoginEvent<'a, C: Connection> {
    pub connection: &'a C,
    pub profile: GameProfile,
    pub login_plugin_message_processor: &'a LoginPluginMessageProcessor,
}

/// Carried by the `Configuration` event (C4 step 4).
///
/// Defaults mirror a minimal, no-op configuration pass: no feature flags, no
/// chat reset, registry data sent only on first entry (re-entry from PLAY
/// has already seen it once), no spawn target, not hardcore. A handler must
/// set `spawn_target` or C4 fails with `SpawnMissing` (step 7).
pub struct ConfigurationEvent<'a, C: Connection, S: SpawnTarget> {
    pub participant: &'a Participant<C, S>,
    pub is_first_config: bool,
    pub features: Vec<Ident<String>>,
    pub reset_chat: bool,
    pub send_registry_data: bool,
    pub spawn_target: Option<S>,
    pub hardcore: bool,
}

impl<'a, C: Connection, S: SpawnTarget> ConfigurationEvent<'a, C, S> {
    pub(crate) fn new(participant: &'a Participant<C, S>, is_first_config: bool) -> Self {
        Self {
            participant,
            is_first_config,
            features: Vec::new(),
            reset_chat: false,
            send_registry_data: is_first_config,
            spawn_target: None,
            hardcore: false,
        }
    }
}

/// The synchronous, externally-supplied handler chain for both lifecycle
/// events (§6 `EventBus`).
///
/// Grounded on `valence_network::NetworkCallbacks`, minus the `async_trait`
/// wrapper: the corpus's own doc comments on that trait note handlers "run
/// to completion before the connection proceeds", i.e. synchronously.
pub trait EventBus<C: Connection, S: SpawnTarget>: Send + Sync + 'static {
    /// Default implementation leaves the event untouched.
    fn dispatch_pre_login(&self, event: &mut PreLoginEvent<'_, C>) {
        let _ = event;
    }

    /// Default implementation leaves the event untouched, which always
    /// yields `SpawnMissing` at C4 step 7 — callers must install a handler
    /// that sets `spawn_target`.
    fn dispatch_configuration(&self, event: &mut ConfigurationEvent<'_, C, S>) {
        let _ = event;
    }
}
