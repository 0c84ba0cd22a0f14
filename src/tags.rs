//! The cached tag-registry broadcast packet (C1, §4.1).
//!
//! Grounded on `valence_registry::codec::RegistryCodec`'s cached-codec cell:
//! a build-on-read value behind a lock, invalidated by discarding it rather
//! than by versioning. Readers never observe a half-built packet because the
//! lock is held for the whole rebuild.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::packets::SynchronizeTagsS2c;
use crate::registries::{Registries, TagRegistryKind};

/// A lazily materialised, invalidatable cell wrapping the tag broadcast.
pub struct TagPacketCache {
    registries: Arc<dyn Registries>,
    cached: Mutex<Option<Arc<SynchronizeTagsS2c<'static>>>>,
}

impl TagPacketCache {
    pub fn new(registries: Arc<dyn Registries>) -> Self {
        Self {
            registries,
            cached: Mutex::new(None),
        }
    }

    /// Returns the cached packet, building it first if it was never built or
    /// was invalidated since the last build. Concurrent callers never see a
    /// partially-built value: the rebuild happens while holding the same
    /// lock that guards the cached slot.
    pub fn get(&self) -> Arc<SynchronizeTagsS2c<'static>> {
        let mut cached = self.cached.lock();
        if let Some(packet) = cached.as_ref() {
            return packet.clone();
        }
        let packet = Arc::new(self.build());
        *cached = Some(packet.clone());
        packet
    }

    /// Discards the memoised value. The next [`get`][Self::get] rebuilds.
    pub fn invalidate(&self) {
        *self.cached.lock() = None;
    }

    fn build(&self) -> SynchronizeTagsS2c<'static> {
        let mut groups = crate::packets::TagGroups::new();
        for kind in TagRegistryKind::ALL {
            let entries = self.registries.tag_groups(kind);
            groups.insert(crate::registries::ident_owned(kind.registry_id()), entries);
        }
        SynchronizeTagsS2c {
            groups: std::borrow::Cow::Owned(groups),
        }
    }
}
