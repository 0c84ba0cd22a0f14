//! Packet re-exports and the one wire struct missing from the vendored
//! protocol crate.
//!
//! Everything here is a thin pass-through to real `valence_protocol`
//! packets; this module exists so the rest of the crate imports packets
//! from one place instead of reaching into `valence_protocol::packets::*`
//! directly.

use std::borrow::Cow;
use std::collections::BTreeMap;

use valence_ident::Ident;
use valence_protocol::{Decode, Encode, Packet, PacketState, VarInt};

pub use valence_protocol::packets::configuration::finish_configuration_s2c::FinishConfigurationS2c;
pub use valence_protocol::packets::configuration::update_enabled_features_s2c::UpdateEnabledFeaturesS2c;
pub use valence_protocol::packets::configuration::keep_alive_s2c::KeepAliveS2c as ConfigKeepAliveS2c;
pub use valence_protocol::packets::configuration::reset_chat_s2c::ResetChatS2c;
pub use valence_protocol::packets::configuration::select_known_packs_s2c::{
    KnownPack as WireKnownPack, SelectKnownPacksS2c,
};
pub use valence_protocol::packets::configuration::custom_payload_s2c::CustomPayloadS2c;
pub use valence_protocol::packets::login::login_success_s2c::LoginSuccessS2c;
pub use valence_protocol::packets::play::keep_alive_s2c::KeepAliveS2c as PlayKeepAliveS2c;

/// Plugin channel the brand announce (C4 step 2) is sent on.
pub const BRAND_CHANNEL: &str = "minecraft:brand";

/// Encodes `brand` as the client expects it on [`BRAND_CHANNEL`]: a
/// VarInt-prefixed UTF-8 string, not bare bytes — the plugin channel's
/// payload is the packet's remaining bytes, so without the length prefix a
/// real client has no way to know where the string ends.
///
/// Grounded on the manual length-prefix the corpus's own brand sender
/// builds by hand before wrapping the result in `RawBytes` (the vendored
/// `CustomPayloadS2c::data` field has no string type of its own to encode
/// through).
pub fn brand_payload(brand: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(brand.len() + 5);
    VarInt(brand.len() as i32)
        .encode(&mut buf)
        .expect("VarInt encoding into a Vec never fails");
    buf.extend_from_slice(brand.as_bytes());
    buf
}

/// Sent by the server during PLAY to move a participant back into
/// configuration (`transition_play_to_config`).
///
/// Not present in the vendored protocol snapshot — only the client-to-server
/// `AcknowledgeConfigurationC2s`/`EnterConfigurationC2s` analog was retrieved.
/// Defined here in the same derive-macro unit-struct shape as the sibling
/// zero-field configuration packets (`FinishConfigurationS2c`,
/// `ResetChatS2c`), carrying the real 1.20.2+ "Start Configuration" play-state
/// wire id (`0x65`).
#[derive(Copy, Clone, Debug, Encode, Decode, Packet)]
#[packet(id = 0x65, state = PacketState::Play)]
pub struct StartConfigurationS2c;

/// One registry's worth of tag groups, keyed by tag id, each value the
/// member entry ids (protocol `VarInt` indices, resolved by the registry
/// data already sent).
///
/// The vendored `synchronize_tags_s2c.rs` snapshot references an
/// unparameterised lifetime and does not compile as retrieved; this is the
/// corrected shape, grounded on the same module's documented field layout.
#[derive(Clone, Debug, Encode, Decode, Packet)]
#[packet(state = PacketState::Configuration)]
pub struct SynchronizeTagsS2c<'a> {
    pub groups: Cow<'a, TagGroups>,
}

/// Member entry ids of each tag, keyed by tag id.
pub type TagEntries = BTreeMap<Ident<String>, Vec<i32>>;

/// One registry's tag groups, keyed by registry id — the top-level shape of
/// [`SynchronizeTagsS2c::groups`].
pub type TagGroups = BTreeMap<Ident<String>, TagEntries>;

/// One registry's entries, each either a concrete NBT value or (when
/// `exclude_vanilla` suppressed it) absent so the client falls back to its
/// own built-in copy.
///
/// The vendored `registry_data_s2c.rs` snapshot derives `Decode` only, which
/// cannot be right for a server-to-client packet; this corrects that while
/// keeping the same field shape.
#[derive(Clone, Debug, Encode, Decode, Packet)]
#[packet(state = PacketState::Configuration)]
pub struct RegistryDataS2c<'a> {
    pub registry_id: Ident<Cow<'a, str>>,
    pub entries: Vec<RegistryEntry<'a>>,
}

#[derive(Clone, Debug, Encode, Decode)]
pub struct RegistryEntry<'a> {
    pub entry_id: Ident<Cow<'a, str>>,
    pub data: Option<valence_nbt::Compound>,
    _marker: std::marker::PhantomData<&'a ()>,
}

impl<'a> RegistryEntry<'a> {
    pub fn new(entry_id: Ident<Cow<'a, str>>, data: Option<valence_nbt::Compound>) -> Self {
        Self {
            entry_id,
            data,
            _marker: std::marker::PhantomData,
        }
    }
}
