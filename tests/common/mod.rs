//! Shared test fakes for the connection lifecycle core's integration tests.
//!
//! `FakeConnection` stands in for the real socket transport: every outbound
//! packet is recorded by name (`P::NAME`) instead of encoded to bytes, and
//! `is_online`/`kick`/`disconnect` flip a shared flag rather than touching a
//! socket. `ScriptedEventBus` lets each test install its own `PreLogin`/
//! `Configuration` handler without a new trait impl per scenario.

#![allow(dead_code)]

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use valence_protocol::{Encode, Packet};

use player_net::connection::{Connection, KickReason, KnownPack, KnownPacksFuture, LoginPluginMessageProcessor};
use player_net::events::{ConfigurationEvent, EventBus, PreLoginEvent};

/// The spawn-target type used by every test: an opaque world-slot id.
pub type TestSpawnTarget = u32;

#[derive(Clone)]
pub enum KnownPacksBehavior {
    Immediate(Vec<KnownPack>),
    Never,
    Err,
}

struct Inner {
    online: bool,
    sent: Vec<&'static str>,
    compression_threshold: Option<i32>,
    kick_reason: Option<KickReason>,
    disconnected: bool,
    known_packs_behavior: KnownPacksBehavior,
    pump_calls: u64,
}

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

/// A cheaply-clonable fake transport. Clones share the same underlying
/// connection state, the way a real `Connection` impl's clones would all
/// refer to the same socket.
#[derive(Clone)]
pub struct FakeConnection {
    id: u64,
    inner: Arc<Mutex<Inner>>,
    plugin_messages: Arc<LoginPluginMessageProcessor>,
}

impl FakeConnection {
    pub fn new() -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            inner: Arc::new(Mutex::new(Inner {
                online: true,
                sent: Vec::new(),
                compression_threshold: None,
                kick_reason: None,
                disconnected: false,
                known_packs_behavior: KnownPacksBehavior::Immediate(Vec::new()),
                pump_calls: 0,
            })),
            plugin_messages: Arc::new(LoginPluginMessageProcessor::new()),
        }
    }

    pub fn set_known_packs_behavior(&self, behavior: KnownPacksBehavior) {
        self.inner.lock().known_packs_behavior = behavior;
    }

    pub fn sent_packets(&self) -> Vec<&'static str> {
        self.inner.lock().sent.clone()
    }

    pub fn was_sent(&self, name: &str) -> bool {
        self.inner.lock().sent.iter().any(|sent| *sent == name)
    }

    pub fn compression_threshold(&self) -> Option<i32> {
        self.inner.lock().compression_threshold
    }

    pub fn kick_reason(&self) -> Option<KickReason> {
        self.inner.lock().kick_reason.clone()
    }

    pub fn was_disconnected(&self) -> bool {
        self.inner.lock().disconnected
    }

    pub fn set_online(&self, online: bool) {
        self.inner.lock().online = online;
    }

    pub fn plugin_message_processor(&self) -> &LoginPluginMessageProcessor {
        &self.plugin_messages
    }

    pub fn pump_calls(&self) -> u64 {
        self.inner.lock().pump_calls
    }
}

impl Default for FakeConnection {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for FakeConnection {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for FakeConnection {}

impl Hash for FakeConnection {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Connection for FakeConnection {
    fn write_packet<P>(&self, _packet: &P)
    where
        P: Packet + Encode,
    {
        self.inner.lock().sent.push(P::NAME);
    }

    fn kick(&self, reason: KickReason) {
        let mut inner = self.inner.lock();
        inner.online = false;
        inner.kick_reason = Some(reason);
    }

    fn is_online(&self) -> bool {
        self.inner.lock().online
    }

    fn disconnect(&self) {
        let mut inner = self.inner.lock();
        inner.online = false;
        inner.disconnected = true;
    }

    fn start_compression(&self, threshold: i32) {
        self.inner.lock().compression_threshold = Some(threshold);
    }

    fn login_plugin_message_processor(&self) -> &LoginPluginMessageProcessor {
        &self.plugin_messages
    }

    fn request_known_packs(&self, _packs: Vec<KnownPack>) -> KnownPacksFuture {
        match self.inner.lock().known_packs_behavior.clone() {
            KnownPacksBehavior::Immediate(packs) => Box::pin(async move { Ok(packs) }),
            KnownPacksBehavior::Never => Box::pin(std::future::pending()),
            KnownPacksBehavior::Err => Box::pin(async { Err(anyhow::anyhow!("known packs request failed")) }),
        }
    }

    fn pump_config_packets(&self) {
        self.inner.lock().pump_calls += 1;
    }
}

type PreLoginHandler = dyn Fn(&mut PreLoginEvent<'_, FakeConnection>) + Send + Sync;
type ConfigurationHandler = dyn Fn(&mut ConfigurationEvent<'_, FakeConnection, TestSpawnTarget>) + Send + Sync;

/// A per-test-configurable [`EventBus`] impl: install closures for either
/// event, leave the other at its no-op default.
pub struct ScriptedEventBus {
    pre_login: Box<PreLoginHandler>,
    configuration: Box<ConfigurationHandler>,
}

impl Default for ScriptedEventBus {
    fn default() -> Self {
        Self {
            pre_login: Box::new(|_| {}),
            configuration: Box::new(|event| {
                // A minimal non-trivial default so tests that don't care about
                // configuration behaviour still clear `SpawnMissing`.
                event.spawn_target = Some(0);
            }),
        }
    }
}

impl ScriptedEventBus {
    pub fn with_pre_login(
        mut self,
        handler: impl Fn(&mut PreLoginEvent<'_, FakeConnection>) + Send + Sync + 'static,
    ) -> Self {
        self.pre_login = Box::new(handler);
        self
    }

    pub fn with_configuration(
        mut self,
        handler: impl Fn(&mut ConfigurationEvent<'_, FakeConnection, TestSpawnTarget>) + Send + Sync + 'static,
    ) -> Self {
        self.configuration = Box::new(handler);
        self
    }
}

impl EventBus<FakeConnection, TestSpawnTarget> for ScriptedEventBus {
    fn dispatch_pre_login(&self, event: &mut PreLoginEvent<'_, FakeConnection>) {
        (self.pre_login)(event)
    }

    fn dispatch_configuration(&self, event: &mut ConfigurationEvent<'_, FakeConnection, TestSpawnTarget>) {
        (self.configuration)(event)
    }
}

/// An in-memory [`Registries`][player_net::registries::Registries] that
/// returns empty tag/registry data but counts calls, so tests can observe
/// cache-rebuild behaviour without caring about real registry contents.
#[derive(Default)]
pub struct CountingRegistries {
    tag_calls: AtomicU64,
    data_calls: AtomicU64,
}

impl CountingRegistries {
    pub fn tag_calls(&self) -> u64 {
        self.tag_calls.load(Ordering::Relaxed)
    }

    pub fn data_calls(&self) -> u64 {
        self.data_calls.load(Ordering::Relaxed)
    }
}

impl player_net::registries::Registries for CountingRegistries {
    fn tag_groups(&self, _kind: player_net::registries::TagRegistryKind) -> player_net::packets::TagEntries {
        self.tag_calls.fetch_add(1, Ordering::Relaxed);
        player_net::packets::TagEntries::new()
    }

    fn registry_entries(
        &self,
        _kind: player_net::registries::DataRegistryKind,
        _exclude_vanilla: bool,
    ) -> Vec<player_net::packets::RegistryEntry<'static>> {
        self.data_calls.fetch_add(1, Ordering::Relaxed);
        Vec::new()
    }
}
