//! The per-connection state record (§3) and its phase machine.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use parking_lot::Mutex;

use crate::connection::Connection;
use crate::profile::GameProfile;

/// The protocol subset currently active for a participant.
///
/// Monotonic except for PLAY→CONFIG re-entry (`transition_play_to_config`),
/// which is the sole legal backwards transition.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Login,
    Config,
    Play,
}

/// An opaque handle identifying where a participant should be placed once it
/// enters PLAY. The world/instance simulator is an external collaborator
/// (out of scope here), so this crate only needs to carry the handle it is
/// handed, not interpret it.
pub trait SpawnTarget: Clone + Send + Sync + 'static {}

impl<T> SpawnTarget for T where T: Clone + Send + Sync + 'static {}

/// `{spawn-target, hardcore}` captured at the end of C4, consumed at PLAY
/// entry.
#[derive(Clone, Debug)]
pub struct PendingOptions<S: SpawnTarget> {
    pub spawn_target: S,
    pub hardcore: bool,
}

/// A future completing once every resource pack offered to a participant has
/// been accepted or declined.
pub type ResourcePackFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// One connected client (§3).
///
/// Identity for the registry's membership sets is this value's address: two
/// `Arc<Participant<_, _>>` clones of the same participant are the same
/// entry even though `profile` is mutable up through the end of C3.
pub struct Participant<C: Connection, S: SpawnTarget> {
    connection: C,
    profile: Mutex<GameProfile>,
    phase: Mutex<Phase>,
    last_keep_alive: AtomicI64,
    answered_keep_alive: AtomicBool,
    pending_resource_pack: Mutex<Option<ResourcePackFuture>>,
    pending_options: Mutex<Option<PendingOptions<S>>>,
}

impl<C: Connection, S: SpawnTarget> Participant<C, S> {
    /// Constructs a participant in the LOGIN phase. This is the default
    /// provider's behaviour (§3 `provider`); a replacement provider must
    /// produce an equivalent starting state.
    pub fn new(connection: C, profile: GameProfile) -> Self {
        Self {
            connection,
            profile: Mutex::new(profile),
            phase: Mutex::new(Phase::Login),
            last_keep_alive: AtomicI64::new(0),
            answered_keep_alive: AtomicBool::new(true),
            pending_resource_pack: Mutex::new(None),
            pending_options: Mutex::new(None),
        }
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn profile(&self) -> GameProfile {
        self.profile.lock().clone()
    }

    pub fn set_profile(&self, profile: GameProfile) {
        *self.profile.lock() = profile;
    }

    pub fn phase(&self) -> Phase {
        *self.phase.lock()
    }

    /// Set by [`crate::login`]/[`crate::configuration`]/[`crate::tick`] as a
    /// participant crosses each phase boundary; `pub` (rather than
    /// crate-private) so integration tests can stage a participant directly
    /// into a given phase without replaying the whole lifecycle.
    pub fn set_phase(&self, phase: Phase) {
        *self.phase.lock() = phase;
    }

    pub fn last_keep_alive(&self) -> i64 {
        self.last_keep_alive.load(Ordering::Relaxed)
    }

    pub fn set_last_keep_alive(&self, t: i64) {
        self.last_keep_alive.store(t, Ordering::Relaxed);
    }

    pub fn answered_keep_alive(&self) -> bool {
        self.answered_keep_alive.load(Ordering::Relaxed)
    }

    pub fn set_answered_keep_alive(&self, answered: bool) {
        self.answered_keep_alive.store(answered, Ordering::Relaxed);
    }

    pub fn is_online(&self) -> bool {
        self.connection.is_online()
    }

    /// Installs a resource-pack completion future, replacing any previous
    /// one (C4 step 10 only ever reads the most recent).
    pub fn set_pending_resource_pack(&self, fut: Option<ResourcePackFuture>) {
        *self.pending_resource_pack.lock() = fut;
    }

    pub(crate) fn take_pending_resource_pack(&self) -> Option<ResourcePackFuture> {
        self.pending_resource_pack.lock().take()
    }

    pub(crate) fn set_pending_options(&self, options: PendingOptions<S>) {
        *self.pending_options.lock() = Some(options);
    }

    /// Consumed at PLAY entry (C6 step a).
    pub(crate) fn take_pending_options(&self) -> Option<PendingOptions<S>> {
        self.pending_options.lock().take()
    }
}

/// A wrapper giving `Arc<Participant<_, _>>` pointer-identity `Eq`/`Hash`,
/// used as the key of the three membership sets (§3 invariant 2/3). Content
/// equality is wrong here: `profile` mutates during C3, and two distinct
/// participants could otherwise coincide on a transient empty state.
pub struct ById<T>(pub std::sync::Arc<T>);

impl<T> Clone for ById<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> PartialEq for ById<T> {
    fn eq(&self, other: &Self) -> bool {
        std::sync::Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Eq for ById<T> {}

impl<T> std::hash::Hash for ById<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (std::sync::Arc::as_ptr(&self.0) as usize).hash(state);
    }
}
