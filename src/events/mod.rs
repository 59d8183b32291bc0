//! # Events Module
//!
//! Event-driven progress reporting for UI layers.
//!
//! The core emits events through channels, allowing any orchestrator
//! (CLI, GUI, web) to subscribe and display progress without the core
//! depending on a UI runtime. Senders with no live receiver silently
//! drop events, so progress reporting stays optional.
//!
//! ## Example
//! ```rust,ignore
//! let (sender, receiver) = EventChannel::new();
//!
//! std::thread::spawn(move || {
//!     for event in receiver.iter() {
//!         match event {
//!             Event::Compare(CompareEvent::Completed { similarity_percent }) => {
//!                 println!("Similarity: {:.2}%", similarity_percent)
//!             }
//!             _ => {}
//!         }
//!     }
//! });
//!
//! scorer.score_with_events(&reference, &current, &sender);
//! ```

use std::path::PathBuf;

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};

/// All events emitted by the comparison pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    /// Comparison events
    Compare(CompareEvent),
    /// Live-capture session events
    Capture(CaptureEvent),
}

/// Events during a comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CompareEvent {
    /// Comparison has started
    Started {
        reference: PathBuf,
        current: PathBuf,
    },
    /// An input was decoded to a luminance buffer
    Decoded {
        path: PathBuf,
        width: u32,
        height: u32,
    },
    /// Mismatched inputs were resized to the canonical comparison frame
    Normalized { width: u32, height: u32 },
    /// Comparison finished with a valid score
    Completed { similarity_percent: f64 },
    /// Comparison could not be computed
    Failed { message: String },
}

/// Events during a live-capture session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CaptureEvent {
    /// Device opened and streaming
    Opened,
    /// A preview frame was grabbed
    FrameReady { index: usize },
    /// The confirmed frame was written to disk
    Saved { path: PathBuf },
    /// The session ended without saving
    Cancelled,
    /// An error ended the session
    Error { message: String },
}

/// Sends events from the core library.
///
/// Thin wrapper around a crossbeam sender; cloneable and sendable across
/// threads.
#[derive(Clone)]
pub struct EventSender {
    inner: Sender<Event>,
}

impl EventSender {
    /// Send an event.
    ///
    /// If the receiver is gone the event is discarded, so emitting
    /// progress never fails the operation being reported on.
    pub fn send(&self, event: Event) {
        let _ = self.inner.send(event);
    }
}

/// Receives events from the core library
pub struct EventReceiver {
    inner: Receiver<Event>,
}

impl EventReceiver {
    /// Block until the next event is received
    pub fn recv(&self) -> Option<Event> {
        self.inner.recv().ok()
    }

    /// Try to receive an event without blocking
    pub fn try_recv(&self) -> Option<Event> {
        self.inner.try_recv().ok()
    }

    /// Iterator over received events; ends when all senders are dropped
    pub fn iter(&self) -> impl Iterator<Item = Event> + '_ {
        self.inner.iter()
    }
}

/// Factory for event channel endpoints
pub struct EventChannel;

impl EventChannel {
    /// Create an unbounded event channel
    pub fn new() -> (EventSender, EventReceiver) {
        let (sender, receiver) = unbounded();
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }

    /// Create a bounded event channel for subscribers that need
    /// backpressure
    pub fn bounded(capacity: usize) -> (EventSender, EventReceiver) {
        let (sender, receiver) = bounded(capacity);
        (
            EventSender { inner: sender },
            EventReceiver { inner: receiver },
        )
    }
}

/// An event sender with no receiver, for event-free invocations and tests
pub fn null_sender() -> EventSender {
    let (sender, _receiver) = EventChannel::new();
    sender
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn events_are_serializable() {
        let event = Event::Compare(CompareEvent::Decoded {
            path: PathBuf::from("/photos/reference_product.jpg"),
            width: 640,
            height: 480,
        });

        let json = serde_json::to_string(&event).unwrap();
        let deserialized: Event = serde_json::from_str(&json).unwrap();

        match deserialized {
            Event::Compare(CompareEvent::Decoded { width, height, .. }) => {
                assert_eq!(width, 640);
                assert_eq!(height, 480);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn events_can_be_sent_across_threads() {
        let (sender, receiver) = EventChannel::new();

        let handle = thread::spawn(move || {
            sender.send(Event::Compare(CompareEvent::Completed {
                similarity_percent: 97.5,
            }));
        });

        handle.join().unwrap();

        match receiver.recv().unwrap() {
            Event::Compare(CompareEvent::Completed { similarity_percent }) => {
                assert_eq!(similarity_percent, 97.5);
            }
            _ => panic!("Wrong event type"),
        }
    }

    #[test]
    fn null_sender_does_not_panic() {
        let sender = null_sender();
        sender.send(Event::Capture(CaptureEvent::Opened));
    }

    #[test]
    fn bounded_channel_respects_capacity() {
        let (sender, receiver) = EventChannel::bounded(2);

        sender.send(Event::Capture(CaptureEvent::Opened));
        sender.send(Event::Capture(CaptureEvent::Cancelled));

        assert!(receiver.try_recv().is_some());
        assert!(receiver.try_recv().is_some());
        assert!(receiver.try_recv().is_none());
    }
}
