//! The participant registry (C2, §4.2) and lookup helpers (C8, §4.2).
//!
//! `by_connection` and the three membership sets are `dashmap` collections:
//! sharded, lock-striped maps that tolerate concurrent iteration and
//! mutation without the reader-starves-writer behaviour a single
//! `RwLock<HashMap<_>>` would have under the I/O-worker/simulation-thread
//! split in §5. Grounded on the concurrent-map usage in `rdaum-moor`'s
//! server crates, since the teacher's own connection registry lives behind
//! a single-threaded ECS `World` and has no concurrent analog here.

use std::hash::Hash;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::{DashMap, DashSet};
use parking_lot::Mutex;
use strsim::jaro_winkler;
use tracing::debug;
use uuid::Uuid;

use crate::connection::Connection;
use crate::error::PlayerNetError;
use crate::participant::{ById, Participant, SpawnTarget};
use crate::profile::GameProfile;

/// Constructs the participant for a newly-registered connection (§3
/// `provider`). Replaceable via [`PlayerRegistry::set_provider`]; the
/// default simply calls [`Participant::new`].
pub trait Provider<C: Connection, S: SpawnTarget>: Send + Sync + 'static {
    fn create(&self, connection: C, profile: GameProfile) -> Arc<Participant<C, S>>;
}

impl<C, S, F> Provider<C, S> for F
where
    C: Connection,
    S: SpawnTarget,
    F: Fn(C, GameProfile) -> Arc<Participant<C, S>> + Send + Sync + 'static,
{
    fn create(&self, connection: C, profile: GameProfile) -> Arc<Participant<C, S>> {
        self(connection, profile)
    }
}

struct DefaultProvider;

impl<C: Connection, S: SpawnTarget> Provider<C, S> for DefaultProvider {
    fn create(&self, connection: C, profile: GameProfile) -> Arc<Participant<C, S>> {
        Arc::new(Participant::new(connection, profile))
    }
}

/// The process-wide participant table (§3 "Registry state").
pub struct PlayerRegistry<C: Connection + Eq + Hash + Clone, S: SpawnTarget> {
    by_connection: DashMap<C, Arc<Participant<C, S>>>,
    config_set: DashSet<ById<Participant<C, S>>>,
    play_set: DashSet<ById<Participant<C, S>>>,
    keep_alive_set: DashSet<ById<Participant<C, S>>>,
    provider: Mutex<Arc<dyn Provider<C, S>>>,
    shut_down: AtomicBool,
}

impl<C: Connection + Eq + Hash + Clone, S: SpawnTarget> Default for PlayerRegistry<C, S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connection + Eq + Hash + Clone, S: SpawnTarget> PlayerRegistry<C, S> {
    pub fn new() -> Self {
        Self {
            by_connection: DashMap::new(),
            config_set: DashSet::new(),
            play_set: DashSet::new(),
            keep_alive_set: DashSet::new(),
            provider: Mutex::new(Arc::new(DefaultProvider)),
            shut_down: AtomicBool::new(false),
        }
    }

    /// Replaces the participant factory. Passing `None` resets to the
    /// built-in default.
    pub fn set_provider(&self, provider: Option<Arc<dyn Provider<C, S>>>) {
        let is_default = provider.is_none();
        *self.provider.lock() = provider.unwrap_or_else(|| Arc::new(DefaultProvider));
        debug!(reset_to_default = is_default, "participant provider replaced");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::Acquire)
    }

    pub(crate) fn mark_shut_down(&self) {
        self.shut_down.store(true, Ordering::Release);
    }

    /// Constructs a participant via the current provider and inserts it into
    /// `by_connection`. Fails with [`PlayerNetError::AlreadyRegistered`] if
    /// `connection` is already present, or [`PlayerNetError::ShuttingDown`]
    /// after [`crate::shutdown::shutdown`].
    pub fn create(
        &self,
        connection: C,
        profile: GameProfile,
    ) -> Result<Arc<Participant<C, S>>, PlayerNetError> {
        if self.is_shut_down() {
            return Err(PlayerNetError::ShuttingDown);
        }
        if self.by_connection.contains_key(&connection) {
            return Err(PlayerNetError::AlreadyRegistered);
        }
        let participant = self.provider.lock().clone().create(connection.clone(), profile);
        self.by_connection.insert(connection, participant.clone());
        Ok(participant)
    }

    pub fn get(&self, connection: &C) -> Option<Arc<Participant<C, S>>> {
        self.by_connection.get(connection).map(|entry| entry.clone())
    }

    /// Removes `connection` from `by_connection` and every membership set.
    /// Idempotent: removing an absent connection is a no-op.
    pub fn remove(&self, connection: &C) {
        if let Some((_, participant)) = self.by_connection.remove(connection) {
            let key = ById(participant);
            self.config_set.remove(&key);
            self.play_set.remove(&key);
            self.keep_alive_set.remove(&key);
        }
    }

    /// Adds `participant` to `config_set` (§3 invariant 2/3). Exposed
    /// alongside the other set-mutation methods below for callers (and
    /// tests) that drive set membership directly rather than through
    /// [`crate::configuration`]/[`crate::tick`]'s own calls.
    pub fn add_to_config_set(&self, participant: &Arc<Participant<C, S>>) {
        self.config_set.insert(ById(participant.clone()));
    }

    pub fn remove_from_config_set(&self, participant: &Arc<Participant<C, S>>) {
        self.config_set.remove(&ById(participant.clone()));
    }

    pub fn add_to_play_set(&self, participant: &Arc<Participant<C, S>>) {
        self.play_set.insert(ById(participant.clone()));
    }

    pub fn remove_from_play_set(&self, participant: &Arc<Participant<C, S>>) {
        self.play_set.remove(&ById(participant.clone()));
    }

    pub fn add_to_keep_alive_set(&self, participant: &Arc<Participant<C, S>>) {
        self.keep_alive_set.insert(ById(participant.clone()));
    }

    pub fn remove_from_keep_alive_set(&self, participant: &Arc<Participant<C, S>>) {
        self.keep_alive_set.remove(&ById(participant.clone()));
    }

    pub(crate) fn by_connection_values(&self) -> Vec<Arc<Participant<C, S>>> {
        self.by_connection.iter().map(|entry| entry.value().clone()).collect()
    }

    pub(crate) fn clear_all(&self) {
        self.by_connection.clear();
        self.config_set.clear();
        self.play_set.clear();
        self.keep_alive_set.clear();
    }

    pub fn config_participants(&self) -> Vec<Arc<Participant<C, S>>> {
        self.config_set.iter().map(|entry| entry.key().0.clone()).collect()
    }

    pub fn play_participants(&self) -> Vec<Arc<Participant<C, S>>> {
        self.play_set.iter().map(|entry| entry.key().0.clone()).collect()
    }

    pub fn keep_alive_participants(&self) -> Vec<Arc<Participant<C, S>>> {
        self.keep_alive_set.iter().map(|entry| entry.key().0.clone()).collect()
    }

    pub fn online_player_count(&self) -> usize {
        self.play_set.len()
    }

    /// Linear scan of `play_set` (C8).
    pub fn find_by_uuid(&self, uuid: Uuid) -> Option<Arc<Participant<C, S>>> {
        self.play_set
            .iter()
            .map(|entry| entry.key().0.clone())
            .find(|p| p.profile().uuid == uuid)
    }

    /// Case-insensitive linear scan of `play_set` (C8).
    pub fn find_by_exact_username(&self, username: &str) -> Option<Arc<Participant<C, S>>> {
        let needle = username.to_lowercase();
        self.play_set
            .iter()
            .map(|entry| entry.key().0.clone())
            .find(|p| p.profile().username.to_lowercase() == needle)
    }

    /// Exact case-insensitive match if any; otherwise the `play_set`
    /// participant maximising Jaro–Winkler similarity to
    /// `query.to_lowercase()`, ties broken by iteration order. `None` when
    /// `play_set` is empty or every similarity is `<= 0`.
    pub fn find_closest_username(&self, query: &str) -> Option<Arc<Participant<C, S>>> {
        if let Some(exact) = self.find_by_exact_username(query) {
            return Some(exact);
        }
        let needle = query.to_lowercase();
        let mut best: Option<(Arc<Participant<C, S>>, f64)> = None;
        for entry in self.play_set.iter() {
            let participant = entry.key().0.clone();
            let similarity = jaro_winkler(&participant.profile().username.to_lowercase(), &needle);
            if similarity <= 0.0 {
                continue;
            }
            match &best {
                Some((_, best_similarity)) if *best_similarity >= similarity => {}
                _ => best = Some((participant, similarity)),
            }
        }
        best.map(|(participant, _)| participant)
    }
}
