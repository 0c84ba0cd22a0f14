//! Connection lifecycle core for a voxel-world multiplayer game server.
//!
//! Owns every client from the end of login through disconnect: drives the
//! login→configuration→play handshake, keeps participants alive with a
//! periodic keep-alive exchange, and hands participants from the I/O layer
//! to the world simulation tick through a lock-free queue. Everything this
//! crate does *not* own — socket transport, packet framing, the event bus,
//! the world simulator, registry data sources — is consumed through the
//! narrow traits in [`connection`], [`events`], and [`registries`].
//!
//! [`PlayerNet`] is the facade tying the pieces (C1-C8) together behind the
//! operations callers actually use; grounded on `valence_network`'s
//! `SharedNetworkState`/`NetworkPlugin`, which plays the same "one resource,
//! many collaborators" role for the teacher's own connection lifecycle.

pub mod config;
pub mod configuration;
pub mod connection;
pub mod error;
pub mod events;
pub mod handoff;
pub mod login;
pub mod packets;
pub mod participant;
pub mod profile;
pub mod registries;
pub mod registry;
pub mod shutdown;
pub mod tags;
pub mod tick;

use std::sync::Arc;

use uuid::Uuid;
use valence_text::Text;

pub use config::PlayerNetSettings;
pub use error::PlayerNetError;
pub use participant::{Participant, Phase, SpawnTarget};
pub use profile::GameProfile;

use connection::Connection;
use events::EventBus;
use handoff::HandoffQueue;
use registries::Registries;
use registry::{PlayerRegistry, Provider};
use tags::TagPacketCache;

/// The facade other subsystems use (§6 "Exposed operations"). One instance
/// per running server; cheaply `Clone`able (every field is an `Arc` or a
/// concurrent collection behind one).
pub struct PlayerNet<C, S, B>
where
    C: Connection + Eq + std::hash::Hash + Clone,
    S: SpawnTarget,
    B: EventBus<C, S>,
{
    registry: Arc<PlayerRegistry<C, S>>,
    handoff: Arc<HandoffQueue<C, S>>,
    tags: Arc<TagPacketCache>,
    registries: Arc<dyn Registries>,
    event_bus: Arc<B>,
    settings: PlayerNetSettings,
}

impl<C, S, B> Clone for PlayerNet<C, S, B>
where
    C: Connection + Eq + std::hash::Hash + Clone,
    S: SpawnTarget,
    B: EventBus<C, S>,
{
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            handoff: self.handoff.clone(),
            tags: self.tags.clone(),
            registries: self.registries.clone(),
            event_bus: self.event_bus.clone(),
            settings: self.settings.clone(),
        }
    }
}

impl<C, S, B> PlayerNet<C, S, B>
where
    C: Connection + Eq + std::hash::Hash + Clone,
    S: SpawnTarget,
    B: EventBus<C, S>,
{
    pub fn new(settings: PlayerNetSettings, registries: Arc<dyn Registries>, event_bus: B) -> Self {
        Self {
            registry: Arc::new(PlayerRegistry::new()),
            handoff: Arc::new(HandoffQueue::new()),
            tags: Arc::new(TagPacketCache::new(registries.clone())),
            registries,
            event_bus: Arc::new(event_bus),
            settings,
        }
    }

    pub fn settings(&self) -> &PlayerNetSettings {
        &self.settings
    }

    /// `create_player(connection, profile) → participant` (§6).
    pub fn create_player(
        &self,
        connection: C,
        profile: GameProfile,
    ) -> Result<Arc<Participant<C, S>>, PlayerNetError> {
        self.registry.create(connection, profile)
    }

    /// `transition_login_to_config` (§6, C3 §4.3).
    pub async fn transition_login_to_config(
        &self,
        connection: &C,
        profile: GameProfile,
    ) -> Result<GameProfile, PlayerNetError> {
        login::transition_login_to_config(connection, profile, &self.settings, self.event_bus.as_ref()).await
    }

    /// `transition_play_to_config` (§6).
    pub fn transition_play_to_config(&self, participant: &Arc<Participant<C, S>>) {
        configuration::transition_play_to_config(participant, &self.registry);
    }

    /// `do_configuration` (§6, C4 §4.4).
    pub async fn do_configuration(
        &self,
        participant: &Arc<Participant<C, S>>,
        is_first_config: bool,
    ) -> Result<(), PlayerNetError> {
        configuration::do_configuration(
            participant,
            is_first_config,
            &self.registry,
            &self.registries,
            &self.tags,
            &self.settings,
            self.event_bus.as_ref(),
        )
        .await
    }

    /// `transition_config_to_play` (§6): offers `participant` to the
    /// handoff queue (C5), to be drained by the next [`tick`][Self::tick].
    pub fn transition_config_to_play(&self, participant: Arc<Participant<C, S>>) {
        self.handoff.offer(participant);
    }

    /// `remove_player` (§6).
    pub fn remove_player(&self, connection: &C) {
        self.registry.remove(connection);
    }

    /// `tick(t)` (§6, C6 §4.6). `t` is monotonic nanoseconds from the
    /// external [`Clock`][registries::Registries] collaborator's clock.
    pub fn tick(&self, t: i64) {
        tick::tick(t, &self.registry, &self.handoff, &self.settings);
    }

    /// `send_registry_tags` (§6): sends the cached tag-registry broadcast
    /// (C1) to `participant`, building it first if necessary.
    pub fn send_registry_tags(&self, participant: &Participant<C, S>) {
        participant.connection().write_packet(self.tags.get().as_ref());
    }

    /// `invalidate_tags` (§6, C1 §4.1).
    pub fn invalidate_tags(&self) {
        self.tags.invalidate();
    }

    /// `get_online_player_count` (§6).
    pub fn get_online_player_count(&self) -> usize {
        self.registry.online_player_count()
    }

    /// `get_online_players` (§6).
    pub fn get_online_players(&self) -> Vec<Arc<Participant<C, S>>> {
        self.registry.play_participants()
    }

    /// `get_config_players` (§6).
    pub fn get_config_players(&self) -> Vec<Arc<Participant<C, S>>> {
        self.registry.config_participants()
    }

    /// `find_online_player(name)` (§6, C8 fuzzy lookup).
    pub fn find_online_player(&self, name: &str) -> Option<Arc<Participant<C, S>>> {
        self.registry.find_closest_username(name)
    }

    /// `get_online_player_by_uuid` (§6).
    pub fn get_online_player_by_uuid(&self, uuid: Uuid) -> Option<Arc<Participant<C, S>>> {
        self.registry.find_by_uuid(uuid)
    }

    /// `set_player_provider` (§6). `None` resets to the default provider.
    pub fn set_player_provider(&self, provider: Option<Arc<dyn Provider<C, S>>>) {
        self.registry.set_provider(provider);
    }

    /// `shutdown()` (C7 §4.7): kicks every participant with `reason` and
    /// clears the registry.
    pub fn shutdown(&self, reason: Text) {
        shutdown::shutdown(&self.registry, reason);
    }
}
