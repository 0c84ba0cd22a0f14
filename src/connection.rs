//! The narrow interface this crate consumes from the raw socket transport
//! (§6). Packet encoding/framing itself is out of scope; implementors only
//! need to accept already-typed [`valence_protocol`] packets and ship them.

use std::future::Future;
use std::pin::Pin;

use parking_lot::Mutex;
use tokio::sync::oneshot;
use valence_protocol::{Encode, Packet};
use valence_text::Text;

/// Why a connection was kicked or disconnected.
///
/// Grounded on the disconnect-reason packets the corpus sends as `Text`
/// (e.g. `LoginDisconnectS2c { reason: Cow<Text> }`).
#[derive(Clone, Debug)]
pub enum KickReason {
    /// C3 step 5: a login-plugin-message reply failed or timed out.
    InvalidProxyResponse,
    /// C6(b): the client did not answer a keep-alive within
    /// `KEEP_ALIVE_KICK`.
    Timeout,
    /// C7: the server is shutting down.
    Shutdown(Text),
    /// Any other reason, typically supplied by a `Configuration` or
    /// `PreLogin` event handler.
    Custom(Text),
}

/// One entry of a known-packs list: `{namespace, id, version}`, owned.
///
/// Mirrors `valence_protocol::packets::configuration::select_known_packs_s2c::KnownPack`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct KnownPack {
    pub namespace: String,
    pub id: String,
    pub version: String,
}

impl KnownPack {
    /// The built-in pack this server always lists (C4 step 3); `version`
    /// is the implementation's reported game version.
    pub fn core(version: impl Into<String>) -> Self {
        Self {
            namespace: "minecraft".to_owned(),
            id: "core".to_owned(),
            version: version.into(),
        }
    }
}

/// Bookkeeping handle for the login-plugin-message barrier in C3 step 5.
///
/// A `PreLogin` event handler that wants to round-trip a plugin message
/// calls [`register`][Self::register] once per outstanding query and is
/// handed a [`oneshot::Sender`] that the transport completes when (and if)
/// a reply arrives. C3 then awaits every registered receiver with a single
/// deadline.
#[derive(Default)]
pub struct LoginPluginMessageProcessor {
    pending: Mutex<Vec<oneshot::Receiver<bool>>>,
}

impl LoginPluginMessageProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new outstanding reply. The returned sender should be
    /// completed with `true` on a successful reply and `false` (or
    /// dropped) on failure.
    pub fn register(&self) -> oneshot::Sender<bool> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().push(rx);
        tx
    }

    /// Takes every receiver registered so far, leaving the processor empty.
    pub(crate) fn take_pending(&self) -> Vec<oneshot::Receiver<bool>> {
        std::mem::take(&mut *self.pending.lock())
    }
}

/// A future resolving to the client's reported known-packs list.
pub type KnownPacksFuture =
    Pin<Box<dyn Future<Output = anyhow::Result<Vec<KnownPack>>> + Send>>;

/// The opaque transport handle backing a [`Participant`][crate::participant::Participant].
///
/// Implementors own the socket, the packet codec, and compression/encryption
/// state; this crate never touches bytes directly.
pub trait Connection: Send + Sync + 'static {
    /// Writes a packet to this connection's outgoing buffer. Encoding
    /// errors are the transport's concern, not the caller's; mirrors
    /// `WritePacket::write_packet` in the wider corpus.
    fn write_packet<P>(&self, packet: &P)
    where
        P: Packet + Encode;

    /// Kicks the connection with a displayed reason.
    fn kick(&self, reason: KickReason);

    /// `true` until the connection has been kicked or has disconnected on
    /// its own.
    fn is_online(&self) -> bool;

    /// Disconnects the connection without a displayed reason (used when the
    /// client itself is responsible for the interruption, e.g. a
    /// known-packs timeout).
    fn disconnect(&self);

    /// Enables zlib compression for packets larger than `threshold` bytes.
    fn start_compression(&self, threshold: i32);

    /// Returns the processor this connection will report login-plugin-message
    /// replies to.
    fn login_plugin_message_processor(&self) -> &LoginPluginMessageProcessor;

    /// Sends a known-packs request and returns a future completing with the
    /// client's reply.
    fn request_known_packs(&self, packs: Vec<KnownPack>) -> KnownPacksFuture;

    /// Cooperative scheduling point for config-phase inbound packets (C6c):
    /// hands whatever this connection has queued (e.g. resource-pack status,
    /// known-packs replies) to the transport's own decode/dispatch path.
    /// Packet framing and decoding stay the transport's concern; the tick
    /// driver only guarantees this is called once per tick for every
    /// participant still in `config_set`.
    fn pump_config_packets(&self) {}
}
