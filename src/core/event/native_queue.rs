//=========================================================================
// Native Event Queue
//=========================================================================
//
// Bounded platform event queue drained by the gameplay pass.
//
// Architecture:
//   Platform / EventSender ──try_send──► Receiver<Event> ──► drain()
//
// Length is sampled once per drain. Anything posted while the drained
// events are dispatched stays queued for the next frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::Event;

//=== NativeEventQueue ====================================================

/// Platform-facing event queue with snapshot draining.
pub struct NativeEventQueue {
    sender: Sender<Event>,
    receiver: Receiver<Event>,
}

impl NativeEventQueue {
    /// Creates a queue holding at most `capacity` pending events.
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Native queue capacity must be positive");
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Producer handle. Clones feed the same queue.
    pub fn sender(&self) -> Sender<Event> {
        self.sender.clone()
    }

    /// Pops the events present at call time, in FIFO order.
    pub fn drain(&self) -> Vec<Event> {
        let pending = self.receiver.len();
        let mut events = Vec::with_capacity(pending);

        for _ in 0..pending {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    warn!(target: "events", "Native queue disconnected mid-drain");
                    break;
                }
            }
        }

        events
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    pub fn capacity(&self) -> Option<usize> {
        self.receiver.capacity()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::{EventTypeId, Payload};

    fn notify(n: i64) -> Event {
        Event::broadcast(EventTypeId::NOTIFY, Payload::new().with("n", n))
    }

    #[test]
    fn drain_handles_empty_queue() {
        let queue = NativeEventQueue::new(8);
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn drain_preserves_fifo_order() {
        let queue = NativeEventQueue::new(8);
        let tx = queue.sender();
        for n in 0..3 {
            tx.send(notify(n)).unwrap();
        }

        let drained: Vec<i64> = queue
            .drain()
            .iter()
            .filter_map(|e| e.get("n").and_then(|v| v.as_int()))
            .collect();

        assert_eq!(drained, vec![0, 1, 2]);
        assert!(queue.is_empty());
    }

    #[test]
    fn events_posted_after_snapshot_stay_queued() {
        let queue = NativeEventQueue::new(8);
        let tx = queue.sender();
        tx.send(notify(1)).unwrap();

        let first = queue.drain();
        tx.send(notify(2)).unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn full_queue_rejects_try_send() {
        let queue = NativeEventQueue::new(1);
        let tx = queue.sender();
        tx.try_send(notify(1)).unwrap();
        assert!(tx.try_send(notify(2)).is_err());
        assert_eq!(queue.capacity(), Some(1));
    }

    #[test]
    #[should_panic(expected = "Native queue capacity must be positive")]
    fn zero_capacity_panics() {
        NativeEventQueue::new(0);
    }
}
