//! The per-tick driver (C6, §4.6, §8 scenarios 1/2).

mod common;

use std::sync::Arc;

use player_net::handoff::HandoffQueue;
use player_net::participant::Phase;
use player_net::registry::PlayerRegistry;
use player_net::{GameProfile, PlayerNetSettings};
use uuid::Uuid;

use common::{FakeConnection, TestSpawnTarget};

const SECOND: i64 = 1_000_000_000;

fn settings() -> PlayerNetSettings {
    PlayerNetSettings {
        keep_alive_delay: std::time::Duration::from_secs(15),
        keep_alive_kick: std::time::Duration::from_secs(30),
        ..Default::default()
    }
}

#[test]
fn handoff_drain_moves_config_to_play_and_keep_alive() {
    let registry: PlayerRegistry<FakeConnection, TestSpawnTarget> = PlayerRegistry::new();
    let handoff: HandoffQueue<FakeConnection, TestSpawnTarget> = HandoffQueue::new();
    let settings = settings();

    let conn = FakeConnection::new();
    let participant = registry
        .create(conn, GameProfile::new(Uuid::new_v4(), "Notch"))
        .unwrap();
    registry.add_to_config_set(&participant);

    handoff.offer(participant.clone());
    player_net::tick::tick(0, &registry, &handoff, &settings);

    assert!(!registry
        .config_participants()
        .iter()
        .any(|p| Arc::ptr_eq(p, &participant)));
    assert!(registry
        .play_participants()
        .iter()
        .any(|p| Arc::ptr_eq(p, &participant)));
    assert!(registry
        .keep_alive_participants()
        .iter()
        .any(|p| Arc::ptr_eq(p, &participant)));
    assert!(participant.answered_keep_alive());
    assert_eq!(participant.phase(), Phase::Play);
}

#[test]
fn handoff_drain_skips_offline_participants() {
    let registry: PlayerRegistry<FakeConnection, TestSpawnTarget> = PlayerRegistry::new();
    let handoff: HandoffQueue<FakeConnection, TestSpawnTarget> = HandoffQueue::new();
    let settings = settings();

    let conn = FakeConnection::new();
    let participant = registry
        .create(conn.clone(), GameProfile::new(Uuid::new_v4(), "Notch"))
        .unwrap();
    registry.add_to_config_set(&participant);
    conn.set_online(false);

    handoff.offer(participant.clone());
    player_net::tick::tick(0, &registry, &handoff, &settings);

    assert!(!registry
        .play_participants()
        .iter()
        .any(|p| Arc::ptr_eq(p, &participant)));
    assert!(registry
        .config_participants()
        .iter()
        .any(|p| Arc::ptr_eq(p, &participant)),
        "a skipped offline participant is left wherever it already was");
}

#[test]
fn keep_alive_not_sent_exactly_at_delay_boundary() {
    let registry: PlayerRegistry<FakeConnection, TestSpawnTarget> = PlayerRegistry::new();
    let handoff: HandoffQueue<FakeConnection, TestSpawnTarget> = HandoffQueue::new();
    let settings = settings();

    let conn = FakeConnection::new();
    let participant = registry
        .create(conn.clone(), GameProfile::new(Uuid::new_v4(), "Notch"))
        .unwrap();
    registry.add_to_play_set(&participant);
    registry.add_to_keep_alive_set(&participant);
    participant.set_phase(Phase::Play);

    let delay_nanos = settings.keep_alive_delay.as_nanos() as i64;
    player_net::tick::tick(delay_nanos, &registry, &handoff, &settings);

    assert!(conn.sent_packets().is_empty(), "age == KEEP_ALIVE_DELAY is not yet due (strict >)");
}

#[test]
fn keep_alive_sent_one_nanosecond_past_delay() {
    let registry: PlayerRegistry<FakeConnection, TestSpawnTarget> = PlayerRegistry::new();
    let handoff: HandoffQueue<FakeConnection, TestSpawnTarget> = HandoffQueue::new();
    let settings = settings();

    let conn = FakeConnection::new();
    let participant = registry
        .create(conn.clone(), GameProfile::new(Uuid::new_v4(), "Notch"))
        .unwrap();
    registry.add_to_play_set(&participant);
    registry.add_to_keep_alive_set(&participant);
    participant.set_phase(Phase::Play);

    let t = settings.keep_alive_delay.as_nanos() as i64 + 1;
    player_net::tick::tick(t, &registry, &handoff, &settings);

    assert_eq!(conn.sent_packets(), vec!["KeepAliveS2c"]);
    assert_eq!(participant.last_keep_alive(), t);
    assert!(!participant.answered_keep_alive());
}

#[test]
fn config_phase_keep_alive_uses_configuration_variant() {
    let registry: PlayerRegistry<FakeConnection, TestSpawnTarget> = PlayerRegistry::new();
    let handoff: HandoffQueue<FakeConnection, TestSpawnTarget> = HandoffQueue::new();
    let settings = settings();

    let conn = FakeConnection::new();
    let participant = registry
        .create(conn.clone(), GameProfile::new(Uuid::new_v4(), "Notch"))
        .unwrap();
    registry.add_to_config_set(&participant);
    registry.add_to_keep_alive_set(&participant);
    participant.set_phase(Phase::Config);

    let t = settings.keep_alive_delay.as_nanos() as i64 + 1;
    player_net::tick::tick(t, &registry, &handoff, &settings);

    assert_eq!(conn.sent_packets(), vec!["KeepAliveS2c"]);
}

#[test]
fn unanswered_keep_alive_does_not_resend_before_kick_threshold() {
    let registry: PlayerRegistry<FakeConnection, TestSpawnTarget> = PlayerRegistry::new();
    let handoff: HandoffQueue<FakeConnection, TestSpawnTarget> = HandoffQueue::new();
    let settings = settings();

    let conn = FakeConnection::new();
    let participant = registry
        .create(conn.clone(), GameProfile::new(Uuid::new_v4(), "Notch"))
        .unwrap();
    registry.add_to_play_set(&participant);
    registry.add_to_keep_alive_set(&participant);
    participant.set_phase(Phase::Play);
    participant.set_answered_keep_alive(false);
    participant.set_last_keep_alive(0);

    let t = settings.keep_alive_kick.as_nanos() as i64 - 1;
    player_net::tick::tick(t, &registry, &handoff, &settings);

    assert!(conn.sent_packets().is_empty());
    assert!(conn.is_online());
}

#[test]
fn kicked_exactly_at_kick_boundary() {
    let registry: PlayerRegistry<FakeConnection, TestSpawnTarget> = PlayerRegistry::new();
    let handoff: HandoffQueue<FakeConnection, TestSpawnTarget> = HandoffQueue::new();
    let settings = settings();

    let conn = FakeConnection::new();
    let participant = registry
        .create(conn.clone(), GameProfile::new(Uuid::new_v4(), "Notch"))
        .unwrap();
    registry.add_to_play_set(&participant);
    registry.add_to_keep_alive_set(&participant);
    participant.set_phase(Phase::Play);
    participant.set_answered_keep_alive(false);
    participant.set_last_keep_alive(0);

    let t = settings.keep_alive_kick.as_nanos() as i64;
    player_net::tick::tick(t, &registry, &handoff, &settings);

    assert!(!conn.is_online(), "age == KEEP_ALIVE_KICK kicks (inclusive >=)");
    assert!(matches!(
        conn.kick_reason(),
        Some(player_net::connection::KickReason::Timeout)
    ));
}

#[test]
fn scenario_two_full_walkthrough() {
    let registry: PlayerRegistry<FakeConnection, TestSpawnTarget> = PlayerRegistry::new();
    let handoff: HandoffQueue<FakeConnection, TestSpawnTarget> = HandoffQueue::new();
    let settings = settings();

    let conn = FakeConnection::new();
    let participant = registry
        .create(conn.clone(), GameProfile::new(Uuid::new_v4(), "Notch"))
        .unwrap();
    registry.add_to_config_set(&participant);
    handoff.offer(participant.clone());

    let t0 = 0;
    player_net::tick::tick(t0, &registry, &handoff, &settings);
    assert!(participant.answered_keep_alive());

    let delay = settings.keep_alive_delay.as_nanos() as i64;
    let kick = settings.keep_alive_kick.as_nanos() as i64;

    // First tick past the delay: a keep-alive goes out and `last_keep_alive`
    // resets to this tick's time, so the kick clock restarts from here too.
    let t1 = t0 + delay + SECOND;
    player_net::tick::tick(t1, &registry, &handoff, &settings);
    assert_eq!(conn.sent_packets(), vec!["KeepAliveS2c"]);
    assert!(conn.is_online());

    // No reply arrives; once `kick` nanoseconds of silence have passed since
    // that reset, the participant is timed out.
    let t2 = t1 + kick;
    player_net::tick::tick(t2, &registry, &handoff, &settings);
    assert!(!conn.is_online());
    assert!(matches!(
        conn.kick_reason(),
        Some(player_net::connection::KickReason::Timeout)
    ));
}

#[test]
fn pump_config_packets_called_once_per_config_participant_per_tick() {
    let registry: PlayerRegistry<FakeConnection, TestSpawnTarget> = PlayerRegistry::new();
    let handoff: HandoffQueue<FakeConnection, TestSpawnTarget> = HandoffQueue::new();
    let settings = settings();

    let conn_a = FakeConnection::new();
    let conn_b = FakeConnection::new();
    let participant_a = registry
        .create(conn_a.clone(), GameProfile::new(Uuid::new_v4(), "Notch"))
        .unwrap();
    let participant_b = registry
        .create(conn_b.clone(), GameProfile::new(Uuid::new_v4(), "Steve"))
        .unwrap();
    registry.add_to_config_set(&participant_a);
    registry.add_to_play_set(&participant_b);

    player_net::tick::tick(0, &registry, &handoff, &settings);
    player_net::tick::tick(1, &registry, &handoff, &settings);

    assert_eq!(conn_a.pump_calls(), 2, "config_set member is pumped every tick");
    assert_eq!(conn_b.pump_calls(), 0, "play_set member is never pumped");
}
