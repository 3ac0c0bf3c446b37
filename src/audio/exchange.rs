//! Single-slot, non-blocking hand-off of the capture buffer.
//!
//! Two one-directional slots move ownership of one preallocated sample
//! buffer between the real-time producer and the consumer:
//!
//! - `returned`  (consumer → producer): an empty buffer ready to be filled
//! - `completed` (producer → consumer): a buffer holding a full window
//!
//! Neither side ever waits. A failed send or receive returns immediately and
//! the caller skips this cycle. Moving a `Box` through a slot never
//! allocates, and the slot transfer is the only synchronisation between the
//! writer and the next holder.

use crossbeam::queue::ArrayQueue;

/// One window of mono samples, allocated once and reused
pub type SampleBuffer = Box<[f32]>;

/// Minimal non-blocking channel capability
pub trait Slot<T>: Send + Sync {
    /// Hand `item` over, or give it back if the slot is occupied
    fn try_send(&self, item: T) -> Result<(), T>;

    /// Take the pending item, if any
    fn try_receive(&self) -> Option<T>;
}

/// Lock-free slot holding at most one item
pub struct SingleSlot<T> {
    queue: ArrayQueue<T>,
}

impl<T> SingleSlot<T> {
    pub fn new() -> Self {
        Self {
            queue: ArrayQueue::new(1),
        }
    }

    pub fn is_occupied(&self) -> bool {
        self.queue.is_full()
    }
}

impl<T> Default for SingleSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> Slot<T> for SingleSlot<T> {
    fn try_send(&self, item: T) -> Result<(), T> {
        self.queue.push(item)
    }

    fn try_receive(&self) -> Option<T> {
        self.queue.pop()
    }
}

/// The pair of slots shared by a capture stage and its reader
pub struct BufferExchange<S = SingleSlot<SampleBuffer>> {
    returned: S,
    completed: S,
    window_size: usize,
}

impl<S: Slot<SampleBuffer>> BufferExchange<S> {
    /// Build an exchange with `buffer` parked on the producer's side.
    ///
    /// The buffer's length fixes the window size for everything connected
    /// to this exchange.
    pub fn new(returned: S, completed: S, buffer: SampleBuffer) -> Self {
        let exchange = Self {
            returned,
            completed,
            window_size: buffer.len(),
        };
        if exchange.returned.try_send(buffer).is_err() {
            log::warn!("return slot occupied at startup; initial buffer discarded");
        }
        exchange
    }

    /// Samples per circulating buffer
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Producer: take an empty buffer to fill
    pub fn acquire(&self) -> Option<SampleBuffer> {
        self.returned.try_receive()
    }

    /// Producer: publish a filled buffer
    pub fn deliver(&self, buffer: SampleBuffer) -> Result<(), SampleBuffer> {
        self.completed.try_send(buffer)
    }

    /// Consumer: take the latest filled buffer
    pub fn take_completed(&self) -> Option<SampleBuffer> {
        self.completed.try_receive()
    }

    /// Consumer: give a drained buffer back for refilling
    pub fn give_back(&self, buffer: SampleBuffer) -> Result<(), SampleBuffer> {
        self.returned.try_send(buffer)
    }
}

impl BufferExchange {
    /// Exchange over lock-free single slots with one zeroed buffer of
    /// `window_size` samples
    pub fn with_window(window_size: usize) -> Self {
        Self::new(
            SingleSlot::new(),
            SingleSlot::new(),
            vec![0.0; window_size].into_boxed_slice(),
        )
    }
}
