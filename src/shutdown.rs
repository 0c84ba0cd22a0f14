//! Orderly shutdown (C7, §4.7).
//!
//! The teacher has no direct analog (its `NetworkPlugin` has no teardown
//! path beyond dropping the bevy `App`); this is built from §4.7 alone,
//! serialised with [`crate::registry::PlayerRegistry::remove`] the same
//! way the rest of the registry serialises membership-set mutation through
//! `dashmap`'s per-shard locks.

use tracing::info;
use valence_text::Text;

use crate::connection::{Connection, KickReason};
use crate::participant::SpawnTarget;
use crate::registry::PlayerRegistry;

/// Kicks every registered participant with `reason`, then clears every
/// membership set and `by_connection`. After this call the registry is
/// quiescent: [`PlayerRegistry::create`] rejects further connections with
/// [`crate::error::PlayerNetError::ShuttingDown`].
pub fn shutdown<C, S>(registry: &PlayerRegistry<C, S>, reason: Text)
where
    C: Connection + Eq + std::hash::Hash + Clone,
    S: SpawnTarget,
{
    registry.mark_shut_down();
    let participants = registry.by_connection_values();
    info!(count = participants.len(), "shutting down player registry");
    for participant in participants {
        participant.connection().kick(KickReason::Shutdown(reason.clone()));
    }
    registry.clear_all();
}
