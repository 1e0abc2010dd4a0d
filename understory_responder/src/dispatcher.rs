// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two-phase accumulation and batch execution of synthetic events.
//!
//! Responder modules never run user listeners while the engine is walking the
//! tree. Instead they enqueue [`QueuedEvent`]s into an [`EventQueue`], and once
//! every responder has seen the native event the queue is executed as one batch:
//!
//! - Capture-phase events run first, in reverse insertion order. The tree walk
//!   goes from the target outward, so reversing yields outermost → innermost.
//! - Bubble-phase events run next, in insertion order (innermost → outermost).
//!
//! ## Minimal example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use understory_responder::dispatcher::{self, EventQueue};
//! use understory_responder::event::{EventData, Phase, QueuedEvent, ResponderEvent};
//! use understory_responder::types::PointerType;
//!
//! let log = Rc::new(RefCell::new(Vec::new()));
//! let mk = |name: &'static str, target: u32| {
//!     let log = log.clone();
//!     QueuedEvent {
//!         event: ResponderEvent {
//!             name,
//!             target,
//!             pointer_type: PointerType::Mouse,
//!             time_stamp: 0,
//!             data: EventData::None,
//!         },
//!         listener: Rc::new(move |e: &ResponderEvent<u32>| log.borrow_mut().push((e.name, e.target))),
//!     }
//! };
//!
//! // The walk visits the inner node (2) before the outer node (1).
//! let mut queue = EventQueue::new();
//! queue.push(Phase::Bubble, mk("bubble", 2));
//! queue.push(Phase::Capture, mk("capture", 2));
//! queue.push(Phase::Bubble, mk("bubble", 1));
//! queue.push(Phase::Capture, mk("capture", 1));
//!
//! assert_eq!(dispatcher::run(queue), 4);
//! assert_eq!(
//!     *log.borrow(),
//!     vec![("capture", 1), ("capture", 2), ("bubble", 2), ("bubble", 1)]
//! );
//! ```

use smallvec::SmallVec;

use crate::event::{Phase, QueuedEvent};

/// Synthetic events accumulated during one native-event dispatch.
#[derive(Debug)]
pub struct EventQueue<K> {
    captured: SmallVec<[QueuedEvent<K>; 4]>,
    bubbled: SmallVec<[QueuedEvent<K>; 4]>,
}

impl<K> Default for EventQueue<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> EventQueue<K> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            captured: SmallVec::new(),
            bubbled: SmallVec::new(),
        }
    }

    /// Enqueue an event for the given phase.
    pub fn push(&mut self, phase: Phase, queued: QueuedEvent<K>) {
        match phase {
            Phase::Capture => self.captured.push(queued),
            Phase::Bubble => self.bubbled.push(queued),
        }
    }

    /// Number of queued events across both phases.
    pub fn len(&self) -> usize {
        self.captured.len() + self.bubbled.len()
    }

    /// Returns `true` if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.captured.is_empty() && self.bubbled.is_empty()
    }

    /// Consume the queue, yielding events in execution order.
    pub fn into_ordered(self) -> impl Iterator<Item = (Phase, QueuedEvent<K>)> {
        self.captured
            .into_iter()
            .rev()
            .map(|q| (Phase::Capture, q))
            .chain(self.bubbled.into_iter().map(|q| (Phase::Bubble, q)))
    }
}

/// Execute every queued event in two-phase order and return how many ran.
///
/// A listener that panics aborts the rest of the batch.
pub fn run<K>(queue: EventQueue<K>) -> usize {
    let mut executed = 0;
    for (_, queued) in queue.into_ordered() {
        queued.execute();
        executed += 1;
    }
    executed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventData, ResponderEvent};
    use crate::types::PointerType;
    use alloc::rc::Rc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    type Log = Rc<RefCell<Vec<(&'static str, u32)>>>;

    fn queued(name: &'static str, target: u32, log: &Log) -> QueuedEvent<u32> {
        let log = log.clone();
        QueuedEvent {
            event: ResponderEvent {
                name,
                target,
                pointer_type: PointerType::Mouse,
                time_stamp: 0,
                data: EventData::None,
            },
            listener: Rc::new(move |e: &ResponderEvent<u32>| {
                log.borrow_mut().push((e.name, e.target));
            }),
        }
    }

    #[test]
    fn empty_queue_runs_nothing() {
        let queue = EventQueue::<u32>::new();
        assert!(queue.is_empty());
        assert_eq!(run(queue), 0);
    }

    #[test]
    fn capture_runs_reversed_before_bubble() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut queue = EventQueue::new();
        // Insertion order mirrors an inside-out walk: 3 (inner), 2, 1 (outer).
        for node in [3, 2, 1] {
            queue.push(Phase::Bubble, queued("b", node, &log));
            queue.push(Phase::Capture, queued("c", node, &log));
        }
        assert_eq!(queue.len(), 6);
        assert_eq!(run(queue), 6);
        assert_eq!(
            *log.borrow(),
            vec![("c", 1), ("c", 2), ("c", 3), ("b", 3), ("b", 2), ("b", 1)]
        );
    }

    #[test]
    fn ordered_reports_phases() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut queue = EventQueue::new();
        queue.push(Phase::Bubble, queued("b", 1, &log));
        queue.push(Phase::Capture, queued("c", 1, &log));
        let phases: Vec<Phase> = queue.into_ordered().map(|(p, _)| p).collect();
        assert_eq!(phases, vec![Phase::Capture, Phase::Bubble]);
        assert!(log.borrow().is_empty());
    }
}
