//! Bounded input event queues
//!
//! Two independent FIFOs, one for grid keys and one for arc encoders. The
//! decoder pushes, the application pops. Either side may run in interrupt
//! context, so every index update happens inside a critical section that
//! covers only the update itself.
//!
//! When a queue is full the incoming event is dropped and the events
//! already queued keep their order.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use monome_protocol::{ArcEvent, GridEvent};

/// Slots per queue
pub const EVENT_QUEUE_CAPACITY: usize = 50;

/// Fixed-capacity circular buffer with explicit head and count
#[derive(Debug, Clone)]
pub struct RingBuffer<T: Copy, const N: usize> {
    slots: [T; N],
    head: usize,
    count: usize,
}

impl<T: Copy, const N: usize> RingBuffer<T, N> {
    /// Create an empty buffer; `empty` fills the unused slots
    pub const fn new(empty: T) -> Self {
        Self {
            slots: [empty; N],
            head: 0,
            count: 0,
        }
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn is_full(&self) -> bool {
        self.count == N
    }

    /// Append at the tail
    ///
    /// Returns false, leaving the buffer untouched, when it is full.
    pub fn push(&mut self, item: T) -> bool {
        if self.is_full() {
            return false;
        }
        let tail = (self.head + self.count) % N;
        self.slots[tail] = item;
        self.count += 1;
        true
    }

    /// Remove and return the oldest item
    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        let item = self.slots[self.head];
        self.head = (self.head + 1) % N;
        self.count -= 1;
        Some(item)
    }

    /// Drop everything
    pub fn clear(&mut self) {
        self.head = 0;
        self.count = 0;
    }
}

type SharedRing<T> = Mutex<CriticalSectionRawMutex, RefCell<RingBuffer<T, EVENT_QUEUE_CAPACITY>>>;

/// Grid and arc event queues
pub struct EventQueue {
    grid: SharedRing<GridEvent>,
    arc: SharedRing<ArcEvent>,
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventQueue {
    /// Create empty queues
    ///
    /// `const` so a queue can live in a `static` shared with an interrupt
    /// handler.
    pub const fn new() -> Self {
        Self {
            grid: Mutex::new(RefCell::new(RingBuffer::new(GridEvent::EMPTY))),
            arc: Mutex::new(RefCell::new(RingBuffer::new(ArcEvent::EMPTY))),
        }
    }

    /// Queue a grid key transition
    ///
    /// Returns false if the grid queue was full and the event was dropped.
    pub fn add_grid_event(&self, x: u8, y: u8, pressed: bool) -> bool {
        let accepted = self
            .grid
            .lock(|ring| ring.borrow_mut().push(GridEvent::new(x, y, pressed)));

        #[cfg(feature = "defmt")]
        if !accepted {
            defmt::debug!("grid queue full, dropping key ({}, {})", x, y);
        }

        accepted
    }

    /// Queue an encoder delta
    ///
    /// Returns false if the arc queue was full and the event was dropped.
    pub fn add_arc_event(&self, index: u8, delta: i8) -> bool {
        let accepted = self
            .arc
            .lock(|ring| ring.borrow_mut().push(ArcEvent::new(index, delta)));

        #[cfg(feature = "defmt")]
        if !accepted {
            defmt::debug!("arc queue full, dropping delta {} on {}", delta, index);
        }

        accepted
    }

    /// True iff at least one grid event is waiting
    pub fn grid_event_available(&self) -> bool {
        self.grid.lock(|ring| !ring.borrow().is_empty())
    }

    /// True iff at least one arc event is waiting
    pub fn arc_event_available(&self) -> bool {
        self.arc.lock(|ring| !ring.borrow().is_empty())
    }

    /// Pop the oldest grid event
    ///
    /// Returns [`GridEvent::EMPTY`] when nothing is queued; check
    /// [`Self::grid_event_available`] first.
    pub fn read_grid_event(&self) -> GridEvent {
        self.grid
            .lock(|ring| ring.borrow_mut().pop())
            .unwrap_or(GridEvent::EMPTY)
    }

    /// Pop the oldest arc event
    ///
    /// Returns [`ArcEvent::EMPTY`] when nothing is queued; check
    /// [`Self::arc_event_available`] first.
    pub fn read_arc_event(&self) -> ArcEvent {
        self.arc
            .lock(|ring| ring.borrow_mut().pop())
            .unwrap_or(ArcEvent::EMPTY)
    }

    /// Number of queued grid events
    pub fn grid_event_count(&self) -> usize {
        self.grid.lock(|ring| ring.borrow().len())
    }

    /// Number of queued arc events
    pub fn arc_event_count(&self) -> usize {
        self.arc.lock(|ring| ring.borrow().len())
    }

    /// Empty both queues
    pub fn reset(&self) {
        self.grid.lock(|ring| ring.borrow_mut().clear());
        self.arc.lock(|ring| ring.borrow_mut().clear());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ring_wraps_around() {
        let mut ring = RingBuffer::<u8, 3>::new(0);
        assert!(ring.push(1));
        assert!(ring.push(2));
        assert_eq!(ring.pop(), Some(1));
        assert!(ring.push(3));
        assert!(ring.push(4));
        assert!(ring.is_full());
        assert!(!ring.push(5));

        assert_eq!(ring.pop(), Some(2));
        assert_eq!(ring.pop(), Some(3));
        assert_eq!(ring.pop(), Some(4));
        assert_eq!(ring.pop(), None);
    }

    #[test]
    fn test_example_grid_event() {
        let queue = EventQueue::new();
        assert!(queue.add_grid_event(3, 4, true));
        assert!(queue.grid_event_available());
        assert_eq!(queue.read_grid_event(), GridEvent::new(3, 4, true));
        assert!(!queue.grid_event_available());
    }

    #[test]
    fn test_empty_read_returns_sentinel() {
        let queue = EventQueue::new();
        assert_eq!(queue.read_grid_event(), GridEvent::EMPTY);
        assert_eq!(queue.read_arc_event(), ArcEvent::EMPTY);
        // Still empty afterwards, nothing underflowed
        assert!(!queue.grid_event_available());
        assert_eq!(queue.grid_event_count(), 0);
        assert!(queue.add_grid_event(1, 1, true));
        assert_eq!(queue.read_grid_event(), GridEvent::new(1, 1, true));
    }

    #[test]
    fn test_overflow_drops_newest() {
        let queue = EventQueue::new();
        for i in 0..EVENT_QUEUE_CAPACITY as u8 {
            assert!(queue.add_grid_event(i, 0, true));
        }
        assert!(!queue.add_grid_event(99, 99, false));
        assert_eq!(queue.grid_event_count(), EVENT_QUEUE_CAPACITY);

        for i in 0..EVENT_QUEUE_CAPACITY as u8 {
            assert_eq!(queue.read_grid_event(), GridEvent::new(i, 0, true));
        }
        assert!(!queue.grid_event_available());
    }

    #[test]
    fn test_queues_are_independent() {
        let queue = EventQueue::new();
        for _ in 0..EVENT_QUEUE_CAPACITY {
            queue.add_grid_event(0, 0, true);
        }
        assert!(!queue.arc_event_available());
        assert!(queue.add_arc_event(2, -1));
        assert_eq!(queue.read_arc_event(), ArcEvent::new(2, -1));
        assert_eq!(queue.grid_event_count(), EVENT_QUEUE_CAPACITY);
    }

    #[test]
    fn test_reset() {
        let queue = EventQueue::new();
        queue.add_grid_event(1, 2, true);
        queue.add_arc_event(0, 5);
        queue.reset();
        assert!(!queue.grid_event_available());
        assert!(!queue.arc_event_available());
    }

    #[test]
    fn test_producer_on_another_thread() {
        const PRODUCED: u16 = 5000;
        let queue = EventQueue::new();
        let mut received = Vec::new();

        let (accepted, dropped) = std::thread::scope(|scope| {
            let producer = scope.spawn(|| {
                let (mut accepted, mut dropped) = (0u16, 0u16);
                for seq in 0..PRODUCED {
                    let [y, x] = seq.to_be_bytes();
                    if queue.add_grid_event(x, y, seq % 2 == 0) {
                        accepted += 1;
                    } else {
                        dropped += 1;
                    }
                }
                (accepted, dropped)
            });

            while !producer.is_finished() || queue.grid_event_available() {
                assert!(queue.grid_event_count() <= EVENT_QUEUE_CAPACITY);
                if queue.grid_event_available() {
                    received.push(queue.read_grid_event());
                } else {
                    std::thread::yield_now();
                }
            }
            producer.join().unwrap()
        });

        assert_eq!(accepted + dropped, PRODUCED);
        assert_eq!(received.len(), accepted as usize);

        // Accepted events keep production order
        let seqs: Vec<u16> = received
            .iter()
            .map(|event| u16::from_be_bytes([event.y, event.x]))
            .collect();
        assert!(seqs.windows(2).all(|pair| pair[0] < pair[1]));
        for (event, seq) in received.iter().zip(&seqs) {
            assert_eq!(event.pressed, seq % 2 == 0);
        }
        assert!(!queue.grid_event_available());
    }

    proptest! {
        #[test]
        fn prop_fifo_order(
            events in proptest::collection::vec((any::<u8>(), any::<u8>(), any::<bool>()), 0..=EVENT_QUEUE_CAPACITY)
        ) {
            let queue = EventQueue::new();
            for &(x, y, pressed) in &events {
                prop_assert!(queue.add_grid_event(x, y, pressed));
            }
            for &(x, y, pressed) in &events {
                prop_assert!(queue.grid_event_available());
                prop_assert_eq!(queue.read_grid_event(), GridEvent::new(x, y, pressed));
            }
            prop_assert!(!queue.grid_event_available());
        }

        #[test]
        fn prop_interleaved_matches_model(
            ops in proptest::collection::vec(proptest::option::of(any::<i8>()), 0..200)
        ) {
            // Some(delta) pushes, None pops; compare against a plain model
            let queue = EventQueue::new();
            let mut model = std::collections::VecDeque::new();
            for op in ops {
                match op {
                    Some(delta) => {
                        let accepted = queue.add_arc_event(1, delta);
                        prop_assert_eq!(accepted, model.len() < EVENT_QUEUE_CAPACITY);
                        if accepted {
                            model.push_back(delta);
                        }
                    }
                    None => {
                        let expected = model.pop_front().map(|d| ArcEvent::new(1, d));
                        prop_assert_eq!(queue.read_arc_event(), expected.unwrap_or(ArcEvent::EMPTY));
                    }
                }
                prop_assert_eq!(queue.arc_event_count(), model.len());
                prop_assert_eq!(queue.arc_event_available(), !model.is_empty());
            }
        }
    }
}
