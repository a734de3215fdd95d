//! Cross-view event bus
//!
//! The three charts never call each other. A histogram segment click, a
//! scatter point click, or a scatter point hover goes onto this bus as a
//! typed event, and whoever subscribed to that kind reacts: the album list
//! to clicks (commit), the line chart to hovers (preview). Producers don't
//! know their consumers exist.
//!
//! Delivery is synchronous and single-threaded, in registration order per
//! event kind: events only ever originate from discrete user gestures, so
//! there is no queue and nothing to drop. A panicking subscriber is isolated
//! and must not stop later subscribers of the same event.
//!
//! Payloads are owned values copied out of view state, never references into
//! it, so a consumer can hold onto them freely.

use std::cell::RefCell;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Everything that can cross between views.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardEvent {
    /// Histogram bar-segment click. Legend clicks stay local to the
    /// histogram and are never broadcast.
    SegmentSelected { genre: String, score: f64 },
    /// Scatter point click
    LabelSelected { label: String },
    /// Scatter point hover; deliberately distinct from a click so the line
    /// chart can preview without committing the album list
    LabelHovered { label: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    SegmentSelected,
    LabelSelected,
    LabelHovered,
}

impl DashboardEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            DashboardEvent::SegmentSelected { .. } => EventKind::SegmentSelected,
            DashboardEvent::LabelSelected { .. } => EventKind::LabelSelected,
            DashboardEvent::LabelHovered { .. } => EventKind::LabelHovered,
        }
    }
}

/// What happened to one emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delivery {
    /// Subscribers that ran to completion
    pub delivered: usize,
    /// Subscribers that panicked and were isolated
    pub panicked: usize,
}

type Subscriber = Box<dyn FnMut(&DashboardEvent)>;

/// Process-wide publish/subscribe channel. Constructed once at startup and
/// handed to every view that produces or consumes cross-view events.
///
/// Subscribers must not emit or subscribe from inside their callback; the
/// bus is single-threaded and dispatch holds the registry.
#[derive(Default)]
pub struct EventBus {
    subscribers: RefCell<Vec<(EventKind, Subscriber)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback for one event kind. Multiple subscribers per
    /// kind are supported; they run in registration order.
    pub fn subscribe<F>(&self, kind: EventKind, callback: F)
    where
        F: FnMut(&DashboardEvent) + 'static,
    {
        self.subscribers
            .borrow_mut()
            .push((kind, Box::new(callback)));
    }

    /// Deliver an event to every subscriber of its kind, synchronously.
    /// A panic in one subscriber is caught and counted; the rest still run.
    pub fn emit(&self, event: DashboardEvent) -> Delivery {
        let kind = event.kind();
        let mut outcome = Delivery::default();
        for (subscribed, callback) in self.subscribers.borrow_mut().iter_mut() {
            if *subscribed != kind {
                continue;
            }
            match catch_unwind(AssertUnwindSafe(|| callback(&event))) {
                Ok(()) => outcome.delivered += 1,
                Err(_) => outcome.panicked += 1,
            }
        }
        outcome
    }
}
