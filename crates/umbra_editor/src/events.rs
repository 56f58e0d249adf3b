//! Change notifications.
//!
//! Command bodies do not publish events themselves; they return the events
//! their mutation produced, and the editor layer dispatches them after the
//! history bookkeeping has committed. Delivery is synchronous and in-process.

use umbra_scene::NodeId;

/// Events raised by successful editor operations.
///
/// `ObjectAdded`/`ObjectRemoved` and `SceneGraphChanged` are distinct on
/// purpose: outline views rebuild on the former and merely restyle on the
/// latter.
#[derive(Clone, Debug, PartialEq)]
pub enum EditorEvent {
    ObjectAdded(NodeId),
    ObjectRemoved(NodeId),
    ObjectChanged(NodeId),
    SceneGraphChanged,
    SelectionChanged(Option<NodeId>),
    HistoryChanged,
}

/// Handle returned by [`EventDispatcher::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListenerId(u64);

/// Synchronous publish/subscribe channel for [`EditorEvent`]s.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<(ListenerId, Box<dyn Fn(&EditorEvent)>)>,
    next_id: u64,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl Fn(&EditorEvent) + 'static) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.retain(|(lid, _)| *lid != id);
    }

    pub fn emit(&self, event: &EditorEvent) {
        for (_, listener) in &self.listeners {
            listener(event);
        }
    }

    pub fn emit_all(&self, events: &[EditorEvent]) {
        for event in events {
            self.emit(event);
        }
    }
}
