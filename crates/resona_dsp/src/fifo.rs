//! Lock-Free FIFO
//!
//! Thin wrapper over an SPSC ring buffer for handing fixed-size payloads from
//! the audio thread to the analysis thread. Push never blocks; when the
//! buffer is full the newest payload is dropped, which degrades the
//! visualization but never the audio.

use rtrb::{Consumer, Producer, RingBuffer};

/// Create a bounded single-producer single-consumer pair.
///
/// `capacity` is the number of in-flight payloads; the buffer is allocated
/// once here and never grows.
pub fn fifo<T>(capacity: usize) -> (FifoProducer<T>, FifoConsumer<T>) {
    let (producer, consumer) = RingBuffer::new(capacity);
    (FifoProducer { producer }, FifoConsumer { consumer })
}

/// Writing half. Exactly one thread may hold this.
pub struct FifoProducer<T> {
    producer: Producer<T>,
}

impl<T> FifoProducer<T> {
    /// Push a payload without blocking.
    ///
    /// Returns `false` if the buffer is full, in which case the payload is
    /// dropped.
    ///
    /// # Real-time Safety
    /// No allocations, no locks, no syscalls.
    #[inline]
    pub fn push(&mut self, value: T) -> bool {
        self.producer.push(value).is_ok()
    }

    /// Free slots remaining.
    pub fn free(&self) -> usize {
        self.producer.slots()
    }
}

/// Reading half. Exactly one thread may hold this.
pub struct FifoConsumer<T> {
    consumer: Consumer<T>,
}

impl<T> FifoConsumer<T> {
    /// Pop the oldest payload, or `None` if the buffer is empty.
    #[inline]
    pub fn pull(&mut self) -> Option<T> {
        self.consumer.pop().ok()
    }

    /// Pop into an existing slot, avoiding a move through the return value
    /// for large payloads. Returns `false` if the buffer is empty.
    #[inline]
    pub fn pull_into(&mut self, dest: &mut T) -> bool {
        match self.consumer.pop() {
            Ok(value) => {
                *dest = value;
                true
            }
            Err(_) => false,
        }
    }

    /// Payloads currently waiting.
    pub fn available(&self) -> usize {
        self.consumer.slots()
    }
}
