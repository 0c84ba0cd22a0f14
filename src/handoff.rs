//! The config→play handoff queue (C5, §4.5).
//!
//! Grounded on `valence_network`'s `new_clients_send`/`new_clients_recv`
//! pair: an unbounded `flume` channel carrying participants from whichever
//! I/O worker finishes their transition to the single consumer that drains
//! it every tick. `flume::Sender::send` is lock-free and non-blocking for an
//! unbounded channel, matching §4.5's "*offer* is lock-free and
//! non-blocking"; `try_recv` in a loop gives drain-everything-enqueued-so-far
//! semantics without the consumer blocking the simulation thread (§5: "the
//! only blocking the simulation thread performs is the MPSC drain, which is
//! non-blocking").

use std::sync::Arc;

use flume::{Receiver, Sender};

use crate::participant::{Participant, SpawnTarget};

/// Multi-producer / single-consumer queue of participants that finished C4
/// without being kicked and are ready to enter PLAY.
pub struct HandoffQueue<C, S: SpawnTarget> {
    sender: Sender<Arc<Participant<C, S>>>,
    receiver: Receiver<Arc<Participant<C, S>>>,
}

impl<C, S: SpawnTarget> HandoffQueue<C, S> {
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self { sender, receiver }
    }

    /// A cloneable handle producers can hold independently of the queue
    /// itself.
    pub fn sender(&self) -> HandoffSender<C, S> {
        HandoffSender(self.sender.clone())
    }

    /// Offers `participant` to the queue. Lock-free, non-blocking; never
    /// fails while any sender (including the one owned by this queue) is
    /// alive.
    pub fn offer(&self, participant: Arc<Participant<C, S>>) {
        let _ = self.sender.send(participant);
    }

    /// Drains every entry enqueued strictly before this call. Does not
    /// block if the queue is empty or if producers stall mid-send.
    pub(crate) fn drain(&self) -> Vec<Arc<Participant<C, S>>> {
        self.receiver.drain().collect()
    }
}

impl<C, S: SpawnTarget> Default for HandoffQueue<C, S> {
    fn default() -> Self {
        Self::new()
    }
}

/// A cloneable producer handle, grounded on the same `flume::Sender` the
/// teacher stores on `SharedNetworkStateInner` for new-client handoff.
#[derive(Clone)]
pub struct HandoffSender<C, S: SpawnTarget>(Sender<Arc<Participant<C, S>>>);

impl<C, S: SpawnTarget> HandoffSender<C, S> {
    pub fn offer(&self, participant: Arc<Participant<C, S>>) {
        let _ = self.0.send(participant);
    }
}
