//! The registry-data source this crate consumes (§6 `Registries`) and the
//! fixed, protocol-visible enumeration of registry kinds (§4.1, §4.4 step 9c).

use std::borrow::Cow;

use valence_ident::Ident;

use crate::packets::{RegistryEntry, TagEntries};

/// The 13 tag registries broadcast by the cached tag packet (C1), in
/// declaration order. The order is fixed by the protocol, not by this
/// crate's convenience.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TagRegistryKind {
    BannerPattern,
    Biome,
    Blocks,
    CatVariant,
    DamageType,
    Dialog,
    Enchantment,
    EntityType,
    Fluid,
    GameEvent,
    Instrument,
    Material,
    PaintingVariant,
}

impl TagRegistryKind {
    pub const ALL: [TagRegistryKind; 13] = [
        TagRegistryKind::BannerPattern,
        TagRegistryKind::Biome,
        TagRegistryKind::Blocks,
        TagRegistryKind::CatVariant,
        TagRegistryKind::DamageType,
        TagRegistryKind::Dialog,
        TagRegistryKind::Enchantment,
        TagRegistryKind::EntityType,
        TagRegistryKind::Fluid,
        TagRegistryKind::GameEvent,
        TagRegistryKind::Instrument,
        TagRegistryKind::Material,
        TagRegistryKind::PaintingVariant,
    ];

    /// The registry's protocol identifier, e.g. `minecraft:banner_pattern`.
    pub fn registry_id(&self) -> &'static str {
        match self {
            TagRegistryKind::BannerPattern => "minecraft:banner_pattern",
            TagRegistryKind::Biome => "minecraft:worldgen/biome",
            TagRegistryKind::Blocks => "minecraft:block",
            TagRegistryKind::CatVariant => "minecraft:cat_variant",
            TagRegistryKind::DamageType => "minecraft:damage_type",
            TagRegistryKind::Dialog => "minecraft:dialog",
            TagRegistryKind::Enchantment => "minecraft:enchantment",
            TagRegistryKind::EntityType => "minecraft:entity_type",
            TagRegistryKind::Fluid => "minecraft:fluid",
            TagRegistryKind::GameEvent => "minecraft:game_event",
            TagRegistryKind::Instrument => "minecraft:instrument",
            TagRegistryKind::Material => "minecraft:material",
            TagRegistryKind::PaintingVariant => "minecraft:painting_variant",
        }
    }
}

/// The 19 registries sent as individual `RegistryDataS2c` packets during
/// configuration (C4 step 9c), in declaration (and wire send) order.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DataRegistryKind {
    ChatType,
    DimensionType,
    Biome,
    Dialog,
    DamageType,
    TrimMaterial,
    TrimPattern,
    BannerPattern,
    Enchantment,
    PaintingVariant,
    JukeboxSong,
    Instrument,
    WolfVariant,
    WolfSoundVariant,
    CatVariant,
    ChickenVariant,
    CowVariant,
    FrogVariant,
    PigVariant,
}

impl DataRegistryKind {
    pub const ALL: [DataRegistryKind; 19] = [
        DataRegistryKind::ChatType,
        DataRegistryKind::DimensionType,
        DataRegistryKind::Biome,
        DataRegistryKind::Dialog,
        DataRegistryKind::DamageType,
        DataRegistryKind::TrimMaterial,
        DataRegistryKind::TrimPattern,
        DataRegistryKind::BannerPattern,
        DataRegistryKind::Enchantment,
        DataRegistryKind::PaintingVariant,
        DataRegistryKind::JukeboxSong,
        DataRegistryKind::Instrument,
        DataRegistryKind::WolfVariant,
        DataRegistryKind::WolfSoundVariant,
        DataRegistryKind::CatVariant,
        DataRegistryKind::ChickenVariant,
        DataRegistryKind::CowVariant,
        DataRegistryKind::FrogVariant,
        DataRegistryKind::PigVariant,
    ];

    pub fn registry_id(&self) -> &'static str {
        match self {
            DataRegistryKind::ChatType => "minecraft:chat_type",
            DataRegistryKind::DimensionType => "minecraft:dimension_type",
            DataRegistryKind::Biome => "minecraft:worldgen/biome",
            DataRegistryKind::Dialog => "minecraft:dialog",
            DataRegistryKind::DamageType => "minecraft:damage_type",
            DataRegistryKind::TrimMaterial => "minecraft:trim_material",
            DataRegistryKind::TrimPattern => "minecraft:trim_pattern",
            DataRegistryKind::BannerPattern => "minecraft:banner_pattern",
            DataRegistryKind::Enchantment => "minecraft:enchantment",
            DataRegistryKind::PaintingVariant => "minecraft:painting_variant",
            DataRegistryKind::JukeboxSong => "minecraft:jukebox_song",
            DataRegistryKind::Instrument => "minecraft:instrument",
            DataRegistryKind::WolfVariant => "minecraft:wolf_variant",
            DataRegistryKind::WolfSoundVariant => "minecraft:wolf_sound_variant",
            DataRegistryKind::CatVariant => "minecraft:cat_variant",
            DataRegistryKind::ChickenVariant => "minecraft:chicken_variant",
            DataRegistryKind::CowVariant => "minecraft:cow_variant",
            DataRegistryKind::FrogVariant => "minecraft:frog_variant",
            DataRegistryKind::PigVariant => "minecraft:pig_variant",
        }
    }
}

/// Source of registry contents (§6 `Registries`), external to this crate.
///
/// A production implementation reads these from loaded data-pack sources;
/// this crate only ever calls the two accessors below, once per registry
/// kind, in the fixed orders above.
pub trait Registries: Send + Sync + 'static {
    /// The tag groups declared for `kind`, keyed by tag id.
    fn tag_groups(&self, kind: TagRegistryKind) -> TagEntries;

    /// `kind`'s entries, each paired with its NBT payload — or `None` when
    /// `exclude_vanilla` is set and the entry is a built-in the client
    /// already has.
    fn registry_entries(&self, kind: DataRegistryKind, exclude_vanilla: bool) -> Vec<RegistryEntry<'static>>;
}

pub(crate) fn ident_owned(id: &str) -> Ident<String> {
    Ident::new(id.to_owned()).expect("registry ids are valid resource identifiers")
}

pub(crate) fn ident_cow(id: &'static str) -> Ident<Cow<'static, str>> {
    Ident::new(Cow::Borrowed(id)).expect("registry ids are valid resource identifiers")
}
