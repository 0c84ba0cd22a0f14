//! The per-tick driver (C6, §4.6) — drains handoff, emits keep-alives, and
//! pumps config-phase inbound packets. Runs once per simulation tick on the
//! single simulation thread (§5).
//!
//! Grounded on `valence_client::keepalive::send_keepalive`'s
//! age-since-last-send check and got-keepalive/timeout branching, adapted
//! from a per-tick ECS `Query` over `(Client, KeepaliveState)` to a
//! `DashSet` iteration over the registry's `keep_alive_set`.

use std::sync::Arc;
use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

use tracing::warn;

use crate::config::PlayerNetSettings;
use crate::connection::{Connection, KickReason};
use crate::packets::{ConfigKeepAliveS2c, PlayKeepAliveS2c};
use crate::participant::{Participant, Phase, SpawnTarget};
use crate::registry::PlayerRegistry;

/// Runs C6 for tick start time `t` (monotonic nanoseconds).
pub fn tick<C, S>(
    t: i64,
    registry: &PlayerRegistry<C, S>,
    handoff: &crate::handoff::HandoffQueue<C, S>,
    settings: &PlayerNetSettings,
) where
    C: Connection + Eq + std::hash::Hash + Clone,
    S: SpawnTarget,
{
    drain_handoff(t, registry, handoff, settings);
    send_keep_alives(t, registry, settings);
    pump_config_packets(registry);
}

/// C6(a). Consumers of the spawn future may elect to block on it only in
/// `settings.inside_test`; production behaviour fires-and-forgets it (the
/// world/instance simulator is an external collaborator, out of scope
/// here — this crate only flips the bookkeeping and hands back the
/// consumed `pending_options`, which is as far as §4.6(a) reaches).
fn drain_handoff<C, S>(
    t: i64,
    registry: &PlayerRegistry<C, S>,
    handoff: &crate::handoff::HandoffQueue<C, S>,
    settings: &PlayerNetSettings,
) where
    C: Connection + Eq + std::hash::Hash + Clone,
    S: SpawnTarget,
{
    for participant in handoff.drain() {
        if !participant.is_online() {
            continue;
        }
        registry.remove_from_config_set(&participant);
        registry.add_to_play_set(&participant);
        registry.add_to_keep_alive_set(&participant);
        participant.set_answered_keep_alive(true);
        participant.set_phase(Phase::Play);
        let options = participant.take_pending_options();
        let entry = spawn_into_world(participant.clone(), options);
        if settings.inside_test {
            block_on_ready(entry);
        }
    }
}

/// Polls `future` to completion without yielding control anywhere else,
/// used only under `settings.inside_test` (§6 `INSIDE_TEST`) to make C6(a)
/// deterministic in tests. [`spawn_into_world`] always resolves on its
/// first poll, so a no-op waker is sufficient; this is not a general-purpose
/// executor.
fn block_on_ready<F: std::future::Future>(mut future: F) -> F::Output {
    fn noop_clone(_: *const ()) -> RawWaker {
        noop_raw_waker()
    }
    fn noop(_: *const ()) {}
    fn noop_raw_waker() -> RawWaker {
        RawWaker::new(std::ptr::null(), &RawWakerVTable::new(noop_clone, noop, noop, noop))
    }

    // Safety: `future` is not moved after being pinned on the stack.
    let mut future = unsafe { std::pin::Pin::new_unchecked(&mut future) };
    let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
    let mut cx = Context::from_waker(&waker);
    loop {
        if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
            return output;
        }
    }
}

/// The world-entry hook (§2 "initiate world entry"). The actual spawn
/// target interpretation belongs to the world/instance simulator (out of
/// scope, §1); this crate only produces the future that simulator-specific
/// code is expected to replace or await.
fn spawn_into_world<C, S>(
    _participant: Arc<Participant<C, S>>,
    _options: Option<crate::participant::PendingOptions<S>>,
) -> impl std::future::Future<Output = ()>
where
    C: Connection,
    S: SpawnTarget,
{
    std::future::ready(())
}

/// C6(b). Strict `>` for the keep-alive-due check, inclusive `>=` for the
/// kick check (§8 Boundary behaviour).
fn send_keep_alives<C, S>(t: i64, registry: &PlayerRegistry<C, S>, settings: &PlayerNetSettings)
where
    C: Connection + Eq + std::hash::Hash + Clone,
    S: SpawnTarget,
{
    let delay = settings.keep_alive_delay.as_nanos() as i64;
    let kick = settings.keep_alive_kick.as_nanos() as i64;

    for participant in registry.keep_alive_participants() {
        let age = t - participant.last_keep_alive();
        if age > delay && participant.answered_keep_alive() {
            participant.set_last_keep_alive(t);
            participant.set_answered_keep_alive(false);
            match participant.phase() {
                Phase::Config => participant.connection().write_packet(&ConfigKeepAliveS2c(t as i32)),
                _ => participant.connection().write_packet(&PlayKeepAliveS2c { id: t as u64 }),
            }
        } else if age >= kick {
            warn!(username = %participant.profile().username, "keep-alive timeout");
            participant.connection().kick(KickReason::Timeout);
        }
    }
}

/// C6(c). Cooperative scheduling for config-phase inbound packets on the
/// simulation thread.
fn pump_config_packets<C, S>(registry: &PlayerRegistry<C, S>)
where
    C: Connection + Eq + std::hash::Hash + Clone,
    S: SpawnTarget,
{
    for participant in registry.config_participants() {
        participant.connection().pump_config_packets();
    }
}
