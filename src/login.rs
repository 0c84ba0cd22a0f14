//! The login→configuration transition (C3, §4.3).
//!
//! Grounded on `valence_network::connect::handle_login`'s await chain:
//! compression activation, a callback that may reject the connection, then
//! `LoginSuccess`. The login-plugin-message barrier has no teacher analog
//! (the retrieved snapshot doesn't negotiate plugin messages during login)
//! and is built from the deadline-then-propagate shape `valence_client`
//! uses for its other awaited barriers.

use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::config::PlayerNetSettings;
use crate::connection::Connection;
use crate::connection::KickReason;
use crate::error::PlayerNetError;
use crate::events::{EventBus, PreLoginEvent};
use crate::packets::LoginSuccessS2c;
use crate::participant::SpawnTarget;
use crate::profile::GameProfile;

/// Runs C3 for `connection`, starting in LOGIN phase. Returns the
/// (possibly handler-mutated) profile on success.
pub async fn transition_login_to_config<C, S, B>(
    connection: &C,
    profile: GameProfile,
    settings: &PlayerNetSettings,
    event_bus: &B,
) -> Result<GameProfile, PlayerNetError>
where
    C: Connection,
    S: SpawnTarget,
    B: EventBus<C, S>,
{
    if settings.compression_enabled() {
        connection.start_compression(settings.compression_threshold);
    }

    let mut event = PreLoginEvent {
        connection,
        profile,
        login_plugin_message_processor: connection.login_plugin_message_processor(),
    };
    event_bus.dispatch_pre_login(&mut event);
    let PreLoginEvent { profile, .. } = event;

    if !connection.is_online() {
        debug!(username = %profile.username, "connection went offline during pre-login");
        return Ok(profile);
    }

    let pending = connection.login_plugin_message_processor().take_pending();
    if !pending.is_empty() {
        let deadline = settings.login_plugin_message_timeout;
        let all_ok = timeout(deadline, await_all(pending)).await;
        match all_ok {
            Ok(true) => {}
            Ok(false) | Err(_) => {
                warn!(username = %profile.username, "login plugin message reply failed or timed out");
                connection.kick(KickReason::InvalidProxyResponse);
                return Err(PlayerNetError::LoginPluginReplyFailed);
            }
        }
    }

    connection.write_packet(&LoginSuccessS2c {
        uuid: profile.uuid,
        username: valence_protocol::Bounded(&profile.username),
        properties: std::borrow::Cow::Owned(
            profile
                .properties
                .iter()
                .map(|p| valence_protocol::profile::Property {
                    name: &p.name,
                    value: &p.value,
                    signature: p.signature.as_deref(),
                })
                .collect(),
        ),
    });

    debug!(username = %profile.username, uuid = %profile.uuid, "login complete, entering configuration");
    Ok(profile)
}

/// Awaits every outstanding login-plugin-message reply, short-circuiting to
/// `false` on the first failed/dropped receiver.
async fn await_all(receivers: Vec<oneshot::Receiver<bool>>) -> bool {
    for rx in receivers {
        match rx.await {
            Ok(true) => {}
            Ok(false) | Err(_) => return false,
        }
    }
    true
}
