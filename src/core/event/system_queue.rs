//=========================================================================
// System Event Queue
//=========================================================================
//
// FIFO for engine-internal events, kept apart from the platform queue so
// bookkeeping events never compete with user input.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Receiver, Sender};

//=== Internal Dependencies ===============================================

use super::Event;

//=== SystemEventQueue ====================================================

/// Unbounded queue drained by [`EventSystem::update_system`].
///
/// Owned by the event system; producers hold cloned senders.
///
/// [`EventSystem::update_system`]: super::EventSystem::update_system
pub struct SystemEventQueue {
    sender: Sender<Event>,
    receiver: Receiver<Event>,
}

impl SystemEventQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Appends an event.
    pub fn put(&self, event: Event) {
        // Cannot fail: the receiver lives as long as `self`.
        let _ = self.sender.send(event);
    }

    /// Removes and returns exactly the events present at call time.
    pub fn get_all_and_clear(&self) -> Vec<Event> {
        let pending = self.receiver.len();
        (0..pending)
            .map_while(|_| self.receiver.try_recv().ok())
            .collect()
    }

    /// Producer handle. Clones feed the same queue.
    pub fn sender(&self) -> Sender<Event> {
        self.sender.clone()
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl Default for SystemEventQueue {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::{EventTypeId, Payload};

    fn notify() -> Event {
        Event::broadcast(EventTypeId::NOTIFY, Payload::new())
    }

    #[test]
    fn second_get_returns_empty() {
        let queue = SystemEventQueue::new();
        queue.put(notify());
        queue.put(notify());

        assert_eq!(queue.get_all_and_clear().len(), 2);
        assert!(queue.get_all_and_clear().is_empty());
    }

    #[test]
    fn put_through_cloned_sender() {
        let queue = SystemEventQueue::new();
        queue.sender().send(notify()).unwrap();
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn snapshot_excludes_later_puts() {
        let queue = SystemEventQueue::new();
        queue.put(notify());

        let snapshot = queue.get_all_and_clear();
        queue.put(notify());

        assert_eq!(snapshot.len(), 1);
        assert_eq!(queue.len(), 1);
    }
}
