//! Pointer input delivered to simulations.
//!
//! Simulations never attach listeners to a window themselves. During `init`
//! they ask the [`InputBus`] for a subscription, during `step` they drain the
//! events queued since the previous frame, and during teardown the
//! subscription is released. Once released, dispatch no longer reaches it.
//!
//! ```ignore
//! let id = input.subscribe(PointerKind::Move);
//! // host side, whenever the pointer moves over the canvas:
//! input.dispatch(PointerEvent::moved(Vec2::new(120.0, 80.0)));
//! // simulation side, next frame:
//! for position in input.drain(id) { /* ... */ }
//! input.unsubscribe(id);
//! ```

use std::collections::VecDeque;

use glam::Vec2;

/// Events a subscription can hold before the oldest are dropped.
pub const MAX_QUEUED_EVENTS: usize = 256;

/// Kind of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Pointer moved over the canvas.
    Move,
    /// Primary button clicked on the canvas.
    Click,
}

/// A pointer event in canvas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Vec2,
}

impl PointerEvent {
    pub fn moved(position: Vec2) -> Self {
        Self { kind: PointerKind::Move, position }
    }

    pub fn clicked(position: Vec2) -> Self {
        Self { kind: PointerKind::Click, position }
    }
}

/// Handle returned by [`InputBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug)]
struct Subscription {
    id: SubscriptionId,
    kind: PointerKind,
    queue: VecDeque<Vec2>,
}

/// Routes pointer events to the subscriptions of the live simulation.
#[derive(Debug, Default)]
pub struct InputBus {
    next_id: u64,
    subscriptions: Vec<Subscription>,
    last_position: Option<Vec2>,
}

impl InputBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start receiving events of `kind`.
    pub fn subscribe(&mut self, kind: PointerKind) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, kind, queue: VecDeque::new() });
        id
    }

    /// Release a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.subscriptions.iter().any(|s| s.id == id)
    }

    /// Number of live subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Queue an event for every matching subscription.
    ///
    /// Returns how many subscriptions received it.
    pub fn dispatch(&mut self, event: PointerEvent) -> usize {
        if event.kind == PointerKind::Move {
            self.last_position = Some(event.position);
        }
        let mut delivered = 0;
        for sub in self.subscriptions.iter_mut().filter(|s| s.kind == event.kind) {
            if sub.queue.len() >= MAX_QUEUED_EVENTS {
                sub.queue.pop_front();
            }
            sub.queue.push_back(event.position);
            delivered += 1;
        }
        delivered
    }

    /// Take every position queued for `id` since the last drain.
    pub fn drain(&mut self, id: SubscriptionId) -> Vec<Vec2> {
        self.subscriptions
            .iter_mut()
            .find(|s| s.id == id)
            .map(|s| s.queue.drain(..).collect())
            .unwrap_or_default()
    }

    /// Last position seen by any move event, subscribed or not.
    pub fn last_position(&self) -> Option<Vec2> {
        self.last_position
    }
}
