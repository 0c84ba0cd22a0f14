//! The configuration routine (C4, §4.4) — the largest single component.
//!
//! Step order follows §4.4 exactly; module shape (one function per
//! suspension point, packet sends interleaved inline) follows
//! `valence_client`'s per-feature modules (`keepalive`, `resource_pack`,
//! `custom_payload`), which each wrap one request/response exchange the same
//! way.

use std::borrow::Cow;
use std::sync::Arc;

use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::PlayerNetSettings;
use crate::connection::{Connection, KnownPack};
use crate::error::PlayerNetError;
use crate::events::{ConfigurationEvent, EventBus};
use crate::packets::{
    brand_payload, CustomPayloadS2c, FinishConfigurationS2c, RegistryDataS2c, ResetChatS2c,
    UpdateEnabledFeaturesS2c, BRAND_CHANNEL,
};
use crate::participant::{Participant, PendingOptions, SpawnTarget};
use crate::registries::{DataRegistryKind, Registries};
use crate::registry::PlayerRegistry;
use crate::tags::TagPacketCache;

/// The implementation's reported game version, announced in the core
/// known-pack (C4 step 3).
const CORE_PACK_VERSION: &str = "1.0.0";

/// Runs C4 for `participant`. `is_first_config` is `true` on initial login,
/// `false` on PLAY→CONFIG re-entry.
pub async fn do_configuration<C, S, B>(
    participant: &Arc<Participant<C, S>>,
    is_first_config: bool,
    registry: &PlayerRegistry<C, S>,
    registries: &Arc<dyn Registries>,
    tags: &TagPacketCache,
    settings: &PlayerNetSettings,
    event_bus: &B,
) -> Result<(), PlayerNetError>
where
    C: Connection + Eq + std::hash::Hash + Clone,
    S: SpawnTarget,
    B: EventBus<C, S>,
{
    let connection = participant.connection();

    // Step 1.
    if is_first_config {
        participant.set_phase(crate::participant::Phase::Config);
        registry.add_to_config_set(participant);
        registry.add_to_keep_alive_set(participant);
    }

    // Step 2.
    let brand = brand_payload("player_net");
    connection.write_packet(&CustomPayloadS2c {
        channel: valence_ident::Ident::new(Cow::Borrowed(BRAND_CHANNEL)).unwrap(),
        data: valence_protocol::Bounded(valence_protocol::RawBytes(&brand)),
    });

    // Step 3.
    let known_packs_future = connection.request_known_packs(vec![KnownPack::core(CORE_PACK_VERSION)]);

    // Step 4.
    let mut event = ConfigurationEvent::new(participant, is_first_config);
    event_bus.dispatch_configuration(&mut event);
    let ConfigurationEvent {
        features,
        reset_chat,
        send_registry_data,
        spawn_target,
        hardcore,
        ..
    } = event;

    // Step 5.
    if !connection.is_online() {
        debug!(username = %participant.profile().username, "connection went offline during configuration event");
        return Ok(());
    }

    // Step 6. `UpdateEnabledFeaturesS2c` (unlike the sibling `FeaturesS2c`,
    // which sorts through a `BTreeSet`) is order-preserving, matching the
    // handler's iteration order.
    connection.write_packet(&UpdateEnabledFeaturesS2c {
        features: features
            .into_iter()
            .map(|ident| valence_ident::Ident::new_unchecked(Cow::Owned(ident.into_inner())))
            .collect(),
    });

    // Step 7.
    let spawn_target = spawn_target.ok_or(PlayerNetError::SpawnMissing)?;

    // Step 8.
    if reset_chat {
        connection.write_packet(&ResetChatS2c);
    }

    // Step 9.
    if send_registry_data {
        let known_packs_timeout = settings.known_packs_response_timeout;
        let known_packs = match timeout(known_packs_timeout, known_packs_future).await {
            Ok(Ok(packs)) => packs,
            Ok(Err(e)) => return Err(PlayerNetError::KnownPacksFailed(e)),
            Err(_) => {
                warn!(username = %participant.profile().username, "known-packs response timed out");
                connection.disconnect();
                return Ok(());
            }
        };
        let exclude_vanilla = known_packs.iter().any(|pack| {
            pack.namespace == "minecraft" && pack.id == "core"
        });

        for kind in DataRegistryKind::ALL {
            let entries = registries.registry_entries(kind, exclude_vanilla);
            connection.write_packet(&RegistryDataS2c {
                registry_id: crate::registries::ident_cow(kind.registry_id()),
                entries,
            });
        }

        connection.write_packet(tags.get().as_ref());
    }

    // Step 10.
    if let Some(resource_pack) = participant.take_pending_resource_pack() {
        resource_pack.await;
    }

    // Step 11.
    registry.remove_from_keep_alive_set(participant);

    // Step 12.
    participant.set_pending_options(PendingOptions {
        spawn_target,
        hardcore,
    });

    // Step 13.
    connection.write_packet(&FinishConfigurationS2c);
    debug!(username = %participant.profile().username, "finish-configuration sent");

    Ok(())
}

/// `transition_play_to_config` (§6): sends `StartConfiguration` and re-adds
/// the participant to `config_set` ahead of a fresh [`do_configuration`]
/// call with `is_first_config = false`.
pub fn transition_play_to_config<C, S>(participant: &Arc<Participant<C, S>>, registry: &PlayerRegistry<C, S>)
where
    C: Connection + Eq + std::hash::Hash + Clone,
    S: SpawnTarget,
{
    participant.connection().write_packet(&crate::packets::StartConfigurationS2c);
    participant.set_phase(crate::participant::Phase::Config);
    registry.remove_from_play_set(participant);
    registry.add_to_config_set(participant);
}
