//! Time-stamped simulation events and the queue that orders them.

use std::cmp::Ordering;
use std::fmt::{self, Display};

use scheduler::{Pid, Ticks};

use crate::SimError;

/// What happens to a process when its event is due.
///
/// The declaration order is the tie-break order for events that are due
/// at the same time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    Arrival,
    Unblock,
}

impl Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Arrival => write!(f, "ARRIVAL"),
            EventKind::Unblock => write!(f, "UNBLOCK"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    pub pid: Pid,
    pub time: Ticks,
}

impl Event {
    pub fn new(kind: EventKind, pid: Pid, time: Ticks) -> Self {
        Event { kind, pid, time }
    }
}

// Earlier time first, then arrivals before unblocks, then lower PID.
impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .cmp(&other.time)
            .then_with(|| self.kind.cmp(&other.kind))
            .then_with(|| self.pid.cmp(&other.pid))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "At time {}, {} event for process {}",
            self.time, self.kind, self.pid
        )
    }
}

/// A priority queue of events that sorts lazily.
///
/// Pushing only appends. The backing vector is sorted, latest event first,
/// right before the next lookup, so a batch of pushes costs a single sort.
#[derive(Debug, Default)]
pub struct EventQueue {
    queue: Vec<Event>,
    dirty: bool,
}

impl EventQueue {
    pub fn new() -> Self {
        EventQueue {
            queue: Vec::new(),
            dirty: false,
        }
    }

    pub fn push(&mut self, event: Event) {
        self.queue.push(event);
        self.dirty = true;
    }

    fn sort(&mut self) {
        if self.dirty {
            self.queue.sort_unstable_by(|a, b| b.cmp(a));
            self.dirty = false;
        }
    }

    fn prepare_lookup(&mut self, operation: &'static str) -> Result<(), SimError> {
        if self.queue.is_empty() {
            return Err(SimError::EmptyQueue { operation });
        }
        self.sort();
        Ok(())
    }

    /// Remove and return the earliest event.
    pub fn pop(&mut self) -> Result<Event, SimError> {
        self.prepare_lookup("pop")?;
        self.queue.pop().ok_or(SimError::EmptyQueue { operation: "pop" })
    }

    /// Return the earliest event without removing it.
    pub fn peek(&mut self) -> Result<&Event, SimError> {
        self.prepare_lookup("peek")?;
        self.queue.last().ok_or(SimError::EmptyQueue { operation: "peek" })
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn has_event(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Iterate over the queued events, earliest first, without removing them.
    pub fn iter(&mut self) -> impl Iterator<Item = &Event> + '_ {
        self.sort();
        self.queue.iter().rev()
    }
}

impl Display for EventQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut events: Vec<&Event> = self.queue.iter().collect();
        events.sort();
        write!(f, "EventQueue(")?;
        for (i, event) in events.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", event)?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrival(pid: usize, time: Ticks) -> Event {
        Event::new(EventKind::Arrival, Pid::new(pid), time)
    }

    fn unblock(pid: usize, time: Ticks) -> Event {
        Event::new(EventKind::Unblock, Pid::new(pid), time)
    }

    #[test]
    fn ordering() {
        assert!(arrival(5, 1) < arrival(0, 2));
        assert!(arrival(5, 3) < unblock(0, 3));
        assert!(unblock(1, 3) < unblock(2, 3));
        assert_eq!(arrival(1, 3).cmp(&arrival(1, 3)), Ordering::Equal);
    }

    #[test]
    fn pops_in_order_regardless_of_push_order() {
        let events = [
            unblock(0, 4),
            arrival(3, 0),
            arrival(1, 4),
            unblock(2, 1),
            arrival(0, 0),
            unblock(1, 4),
            arrival(2, 1),
        ];
        let mut queue = EventQueue::new();
        for event in events.iter().rev() {
            queue.push(*event);
        }

        let mut popped = Vec::new();
        while queue.has_event() {
            popped.push(queue.pop().unwrap());
        }

        let mut expected = events.to_vec();
        expected.sort();
        assert_eq!(popped, expected);
        assert!(popped.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn simultaneous_arrivals_by_pid() {
        let mut queue = EventQueue::new();
        queue.push(arrival(1, 0));
        queue.push(arrival(0, 0));

        assert_eq!(queue.pop().unwrap().pid, Pid::new(0));
        assert_eq!(queue.pop().unwrap().pid, Pid::new(1));
    }

    #[test]
    fn empty_queue_lookups_fail() {
        let mut queue = EventQueue::new();
        assert!(queue.is_empty());
        assert!(matches!(
            queue.peek(),
            Err(SimError::EmptyQueue { operation: "peek" })
        ));
        assert!(matches!(
            queue.pop(),
            Err(SimError::EmptyQueue { operation: "pop" })
        ));
    }

    #[test]
    fn sorts_only_when_dirty() {
        let mut queue = EventQueue::new();
        queue.push(arrival(0, 9));
        queue.push(arrival(1, 2));
        assert!(queue.dirty);

        assert_eq!(queue.peek().unwrap().time, 2);
        assert!(!queue.dirty);
        assert_eq!(queue.pop().unwrap().time, 2);
        assert!(!queue.dirty);

        queue.push(arrival(2, 5));
        assert!(queue.dirty);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.peek().unwrap().time, 5);
    }

    #[test]
    fn iteration_is_ordered_and_repeatable() {
        let mut queue = EventQueue::new();
        queue.push(unblock(0, 7));
        queue.push(arrival(1, 3));
        queue.push(arrival(0, 3));

        let first: Vec<Event> = queue.iter().copied().collect();
        let second: Vec<Event> = queue.iter().copied().collect();
        assert_eq!(first, vec![arrival(0, 3), arrival(1, 3), unblock(0, 7)]);
        assert_eq!(first, second);
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn display() {
        let mut queue = EventQueue::new();
        assert_eq!(queue.to_string(), "EventQueue()");
        queue.push(unblock(1, 4));
        queue.push(arrival(0, 2));
        assert_eq!(
            queue.to_string(),
            "EventQueue(At time 2, ARRIVAL event for process 0; At time 4, UNBLOCK event for process 1)"
        );
    }
}
