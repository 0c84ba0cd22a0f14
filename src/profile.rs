//! The identity tuple carried by a [`Participant`][crate::participant::Participant].

use uuid::Uuid;

/// A single property of a game profile (most commonly the `textures`
/// property carrying skin/cape URLs).
///
/// Mirrors `valence_protocol::profile::Property`, owned rather than
/// borrowed since a [`GameProfile`] outlives any single packet encode.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Property {
    pub name: String,
    pub value: String,
    pub signature: Option<String>,
}

/// `{uuid, username, properties[]}`, mutable up through the end of the
/// login→config transition (C3) and immutable thereafter (§3).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct GameProfile {
    pub uuid: Uuid,
    pub username: String,
    pub properties: Vec<Property>,
}

impl GameProfile {
    /// Constructs a profile with no properties.
    pub fn new(uuid: Uuid, username: impl Into<String>) -> Self {
        Self {
            uuid,
            username: username.into(),
            properties: Vec::new(),
        }
    }
}
