//! Wait-free triple-buffer channels for single-producer single-consumer
//! frame handoff.
//!
//! A channel owns three equal-sized byte slots and a one-byte atomic
//! control word naming which slot is currently the write slot, the back
//! slot, and the read slot. The producer fills the write slot and
//! publishes ([`Producer::publish_frame`]) by swapping write and back;
//! the consumer ([`Consumer::swap_read`]) swaps read and back when the back
//! slot holds an unconsumed publish. Neither side ever blocks, and a
//! publish that lands before the previous one was consumed simply
//! replaces it. The consumer always observes the most recent complete
//! publish, never a partially written one.
//!
//! # Control word layout
//!
//! ```text
//! bit 6    bits 5..4    bits 3..2    bits 1..0
//! fresh    write idx    back idx     read idx
//! ```
//!
//! The three index fields are a permutation of `{0, 1, 2}` at all times.
//! The fresh bit is set by `publish` and cleared by a successful
//! `try_swap_read`.

#![allow(unsafe_code)]

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use triptych_core::{FrameConsumer, FramePublisher, SwapResult};

use crate::error::BufferError;

const READ_MASK: u8 = 0b0000_0011;
const BACK_MASK: u8 = 0b0000_1100;
const WRITE_MASK: u8 = 0b0011_0000;
const FRESH: u8 = 0b0100_0000;

/// Initial control word: read = 0, back = 1, write = 2, fresh clear.
const INITIAL_WORD: u8 = 0b10_01_00;

fn read_index(word: u8) -> usize {
    (word & READ_MASK) as usize
}

fn back_index(word: u8) -> usize {
    ((word & BACK_MASK) >> 2) as usize
}

fn write_index(word: u8) -> usize {
    ((word & WRITE_MASK) >> 4) as usize
}

fn is_fresh(word: u8) -> bool {
    word & FRESH != 0
}

/// Exchange the write and back fields and set the fresh bit.
fn swap_write_with_back(word: u8) -> u8 {
    FRESH | ((word & BACK_MASK) << 2) | ((word & WRITE_MASK) >> 2) | (word & READ_MASK)
}

/// Exchange the read and back fields and clear the fresh bit.
fn swap_read_with_back(word: u8) -> u8 {
    ((word & READ_MASK) << 2) | ((word & BACK_MASK) >> 2) | (word & WRITE_MASK)
}

/// Shared state behind a channel: three byte slots plus the control word.
struct Shared {
    slots: [UnsafeCell<Box<[u8]>>; 3],
    word: AtomicU8,
    byte_len: usize,
    producer_attached: AtomicBool,
    consumer_attached: AtomicBool,
}

// SAFETY: the slots are only ever accessed through `Producer` (write slot)
// and `Consumer` (read slot). The control word's index fields are a
// permutation of {0, 1, 2}, the producer only mutates the write field and
// the consumer only the read field, so the two sides can never name the
// same slot. Slot contents are handed across threads solely via the
// AcqRel exchanges on the word: each side releases the slot it gives up
// and acquires the slot it takes, in both the publish and the read-swap
// direction, so every access to a slot is ordered with respect to the
// other endpoint's accesses before the handoff.
unsafe impl Send for Shared {}
unsafe impl Sync for Shared {}

/// Handle to a triple-buffer channel.
///
/// Cheaply cloneable; all clones refer to the same three slots. The
/// channel supports exactly one [`Producer`] and one [`Consumer`] at a
/// time, enforced at attach.
#[derive(Clone)]
pub struct ChannelHandle {
    shared: Arc<Shared>,
}

impl ChannelHandle {
    /// Create a channel whose three slots are each `byte_len` zeroed bytes.
    pub fn new(byte_len: usize) -> Result<Self, BufferError> {
        if byte_len == 0 {
            return Err(BufferError::ZeroLength);
        }
        let slot = || UnsafeCell::new(vec![0u8; byte_len].into_boxed_slice());
        Ok(Self {
            shared: Arc::new(Shared {
                slots: [slot(), slot(), slot()],
                word: AtomicU8::new(INITIAL_WORD),
                byte_len,
                producer_attached: AtomicBool::new(false),
                consumer_attached: AtomicBool::new(false),
            }),
        })
    }

    /// Slot size in bytes.
    pub fn byte_len(&self) -> usize {
        self.shared.byte_len
    }

    /// Attach the channel's producer endpoint.
    ///
    /// Fails if a producer is already attached. The attachment is not
    /// released on drop; a channel's producer slot is claimed for the
    /// life of the channel.
    pub fn attach_producer(&self) -> Result<Producer, BufferError> {
        if self.shared.producer_attached.swap(true, Ordering::AcqRel) {
            return Err(BufferError::ProducerAttached);
        }
        Ok(Producer {
            shared: Arc::clone(&self.shared),
        })
    }

    /// Attach the channel's consumer endpoint.
    ///
    /// Fails if a consumer is already attached.
    pub fn attach_consumer(&self) -> Result<Consumer, BufferError> {
        if self.shared.consumer_attached.swap(true, Ordering::AcqRel) {
            return Err(BufferError::ConsumerAttached);
        }
        Ok(Consumer {
            shared: Arc::clone(&self.shared),
            swapped_reads: 0,
            stale_reads: 0,
        })
    }
}

impl std::fmt::Debug for ChannelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelHandle")
            .field("byte_len", &self.shared.byte_len)
            .finish()
    }
}

/// Write endpoint of a channel. At most one per channel.
pub struct Producer {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Producer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Producer")
            .field("byte_len", &self.shared.byte_len)
            .finish()
    }
}

impl Producer {
    /// Mutable access to the current write slot.
    ///
    /// The slot's previous contents are whatever was last written there;
    /// callers overwriting a prefix must not assume the rest is zeroed
    /// after the first three publishes.
    pub fn write_slot(&mut self) -> &mut [u8] {
        // Only this endpoint mutates the write field, so a relaxed load
        // always names the slot this producer last settled on.
        let idx = write_index(self.shared.word.load(Ordering::Relaxed));
        // SAFETY: the write index names a slot the consumer can never
        // access (the index fields are disjoint), and the returned borrow
        // holds `&mut self`, so no publish can retarget the write index
        // while the slice is live.
        unsafe { &mut **self.shared.slots[idx].get() }
    }

    /// Swap the write slot into the back position and mark it fresh.
    ///
    /// Never blocks. If the previous publish was not yet consumed it is
    /// silently replaced.
    pub fn publish_frame(&mut self) {
        let mut cur = self.shared.word.load(Ordering::Relaxed);
        loop {
            let next = swap_write_with_back(cur);
            // AcqRel: the release half orders this slot's writes before
            // any consumer that acquires the word; the acquire half
            // orders the producer's next writes to the incoming slot
            // after the consumer's reads that relinquished it.
            match self.shared.word.compare_exchange_weak(
                cur,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return,
                Err(observed) => cur = observed,
            }
        }
    }
}

impl FramePublisher for Producer {
    fn publish(&mut self) {
        self.publish_frame();
    }
}

/// Read endpoint of a channel. At most one per channel.
pub struct Consumer {
    shared: Arc<Shared>,
    swapped_reads: u64,
    stale_reads: u64,
}

impl std::fmt::Debug for Consumer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Consumer")
            .field("byte_len", &self.shared.byte_len)
            .field("swapped_reads", &self.swapped_reads)
            .field("stale_reads", &self.stale_reads)
            .finish()
    }
}

impl Consumer {
    /// Shared access to the current read slot.
    pub fn read_slot(&self) -> &[u8] {
        // Only this endpoint mutates the read field.
        let idx = read_index(self.shared.word.load(Ordering::Relaxed));
        // SAFETY: the read index names a slot the producer can never
        // access, and retargeting it requires `&mut self` via
        // `try_swap_read`, so the slice cannot be invalidated while
        // borrowed.
        unsafe { &**self.shared.slots[idx].get() }
    }

    /// Swap the back slot into the read position if it holds a fresh
    /// publish.
    ///
    /// Returns [`SwapResult::Stale`] without touching the indices when no
    /// publish has landed since the last successful swap. Never blocks.
    pub fn swap_read(&mut self) -> SwapResult {
        let mut cur = self.shared.word.load(Ordering::Acquire);
        loop {
            if !is_fresh(cur) {
                self.stale_reads += 1;
                return SwapResult::Stale;
            }
            let next = swap_read_with_back(cur);
            // AcqRel: the acquire half pairs with the producer's release
            // so the incoming slot's contents are visible before we read
            // them; the release half hands the outgoing read slot back,
            // ordering our reads of it before the producer's next writes.
            match self.shared.word.compare_exchange_weak(
                cur,
                next,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    self.swapped_reads += 1;
                    return SwapResult::Swapped;
                }
                Err(observed) => cur = observed,
            }
        }
    }

    /// Number of swaps that picked up a fresh publish.
    pub fn swapped_reads(&self) -> u64 {
        self.swapped_reads
    }

    /// Number of swaps that found nothing new.
    pub fn stale_reads(&self) -> u64 {
        self.stale_reads
    }
}

impl FrameConsumer for Consumer {
    fn try_swap_read(&mut self) -> SwapResult {
        self.swap_read()
    }
}

// Compile-time checks that endpoints can cross thread boundaries.
const _: fn() = || {
    fn assert_send<T: Send>() {}
    assert_send::<Producer>();
    assert_send::<Consumer>();
    assert_send::<ChannelHandle>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn indices(word: u8) -> [usize; 3] {
        [read_index(word), back_index(word), write_index(word)]
    }

    fn is_permutation(word: u8) -> bool {
        let mut seen = [false; 3];
        for idx in indices(word) {
            if idx > 2 || seen[idx] {
                return false;
            }
            seen[idx] = true;
        }
        true
    }

    // ── control word ──

    #[test]
    fn initial_word_is_valid_permutation() {
        assert!(is_permutation(INITIAL_WORD));
        assert_eq!(read_index(INITIAL_WORD), 0);
        assert_eq!(back_index(INITIAL_WORD), 1);
        assert_eq!(write_index(INITIAL_WORD), 2);
        assert!(!is_fresh(INITIAL_WORD));
    }

    #[test]
    fn publish_swap_sets_fresh_and_preserves_read() {
        let next = swap_write_with_back(INITIAL_WORD);
        assert!(is_fresh(next));
        assert_eq!(read_index(next), read_index(INITIAL_WORD));
        assert_eq!(back_index(next), write_index(INITIAL_WORD));
        assert_eq!(write_index(next), back_index(INITIAL_WORD));
    }

    #[test]
    fn read_swap_clears_fresh_and_preserves_write() {
        let published = swap_write_with_back(INITIAL_WORD);
        let next = swap_read_with_back(published);
        assert!(!is_fresh(next));
        assert_eq!(write_index(next), write_index(published));
        assert_eq!(read_index(next), back_index(published));
        assert_eq!(back_index(next), read_index(published));
    }

    proptest! {
        /// Any interleaving of swaps keeps the index fields a permutation
        /// of {0, 1, 2}.
        #[test]
        fn swaps_preserve_permutation(ops in proptest::collection::vec(any::<bool>(), 0..64)) {
            let mut word = INITIAL_WORD;
            for publish in ops {
                word = if publish {
                    swap_write_with_back(word)
                } else {
                    swap_read_with_back(word)
                };
                prop_assert!(is_permutation(word));
            }
        }
    }

    // ── single-thread protocol ──

    #[test]
    fn fresh_publish_reaches_reader() {
        let channel = ChannelHandle::new(4).unwrap();
        let mut producer = channel.attach_producer().unwrap();
        let mut consumer = channel.attach_consumer().unwrap();

        producer.write_slot().copy_from_slice(&7u32.to_le_bytes());
        producer.publish_frame();

        assert_eq!(consumer.swap_read(), SwapResult::Swapped);
        assert_eq!(consumer.read_slot(), 7u32.to_le_bytes());
    }

    #[test]
    fn swap_without_publish_is_stale() {
        let channel = ChannelHandle::new(4).unwrap();
        let _producer = channel.attach_producer().unwrap();
        let mut consumer = channel.attach_consumer().unwrap();

        assert_eq!(consumer.swap_read(), SwapResult::Stale);
        assert_eq!(consumer.stale_reads(), 1);
        assert_eq!(consumer.swapped_reads(), 0);
    }

    #[test]
    fn stale_swap_keeps_previous_contents() {
        let channel = ChannelHandle::new(4).unwrap();
        let mut producer = channel.attach_producer().unwrap();
        let mut consumer = channel.attach_consumer().unwrap();

        producer.write_slot().copy_from_slice(&3u32.to_le_bytes());
        producer.publish_frame();
        consumer.swap_read();

        assert_eq!(consumer.swap_read(), SwapResult::Stale);
        assert_eq!(consumer.read_slot(), 3u32.to_le_bytes());
    }

    #[test]
    fn double_publish_drops_older_frame() {
        let channel = ChannelHandle::new(4).unwrap();
        let mut producer = channel.attach_producer().unwrap();
        let mut consumer = channel.attach_consumer().unwrap();

        producer.write_slot().copy_from_slice(&1u32.to_le_bytes());
        producer.publish_frame();
        producer.write_slot().copy_from_slice(&2u32.to_le_bytes());
        producer.publish_frame();

        assert_eq!(consumer.swap_read(), SwapResult::Swapped);
        assert_eq!(consumer.read_slot(), 2u32.to_le_bytes());
        // The first frame is gone, not queued.
        assert_eq!(consumer.swap_read(), SwapResult::Stale);
    }

    #[test]
    fn alternating_publish_and_read_round_trips() {
        let channel = ChannelHandle::new(8).unwrap();
        let mut producer = channel.attach_producer().unwrap();
        let mut consumer = channel.attach_consumer().unwrap();

        for i in 0u64..32 {
            producer.write_slot().copy_from_slice(&i.to_le_bytes());
            producer.publish_frame();
            assert_eq!(consumer.swap_read(), SwapResult::Swapped);
            assert_eq!(consumer.read_slot(), i.to_le_bytes());
        }
        assert_eq!(consumer.swapped_reads(), 32);
    }

    // ── attachment ──

    #[test]
    fn second_producer_attach_rejected() {
        let channel = ChannelHandle::new(4).unwrap();
        let _first = channel.attach_producer().unwrap();
        assert_eq!(
            channel.attach_producer().unwrap_err(),
            BufferError::ProducerAttached
        );
    }

    #[test]
    fn second_consumer_attach_rejected() {
        let channel = ChannelHandle::new(4).unwrap();
        let _first = channel.attach_consumer().unwrap();
        assert_eq!(
            channel.attach_consumer().unwrap_err(),
            BufferError::ConsumerAttached
        );
    }

    #[test]
    fn attach_through_clone_sees_same_channel() {
        let channel = ChannelHandle::new(4).unwrap();
        let clone = channel.clone();
        let _producer = channel.attach_producer().unwrap();
        assert!(clone.attach_producer().is_err());
        assert!(clone.attach_consumer().is_ok());
    }

    #[test]
    fn zero_length_channel_rejected() {
        assert_eq!(ChannelHandle::new(0).unwrap_err(), BufferError::ZeroLength);
    }

    // ── cross-thread ──

    /// The consumer must only ever observe complete publishes: every slot
    /// it reads holds eight copies of a single byte value, and observed
    /// values never go backwards.
    #[test]
    fn concurrent_reader_sees_only_complete_monotonic_frames() {
        let channel = ChannelHandle::new(8).unwrap();
        let mut producer = channel.attach_producer().unwrap();
        let mut consumer = channel.attach_consumer().unwrap();

        let writer = std::thread::spawn(move || {
            for value in 1u8..=200 {
                producer.write_slot().fill(value);
                producer.publish_frame();
            }
        });

        let mut last = 0u8;
        let mut observed = 0u32;
        while last < 200 {
            if consumer.swap_read() == SwapResult::Swapped {
                let slot = consumer.read_slot();
                let value = slot[0];
                assert!(slot.iter().all(|&b| b == value), "torn frame observed");
                assert!(value > last, "frame went backwards: {value} after {last}");
                last = value;
                observed += 1;
            }
        }
        writer.join().unwrap();
        assert!(observed <= 200);
        assert_eq!(consumer.swapped_reads(), u64::from(observed));
    }

    /// A slot the consumer relinquishes becomes the producer's write slot
    /// two publishes later. Hammer that reuse path: the producer spins
    /// publishing while the consumer swaps and validates every adopted
    /// slot in full, so all three slots cycle through both endpoints many
    /// times.
    #[test]
    fn relinquished_slots_are_reused_untorn() {
        let channel = ChannelHandle::new(64).unwrap();
        let mut producer = channel.attach_producer().unwrap();
        let mut consumer = channel.attach_consumer().unwrap();

        let writer = std::thread::spawn(move || {
            for value in 0u8..=255 {
                producer.write_slot().fill(value);
                producer.publish_frame();
            }
        });

        let mut adopted = 0u32;
        let mut last = -1i32;
        while last < 255 {
            if consumer.swap_read() == SwapResult::Swapped {
                let slot = consumer.read_slot();
                let value = slot[0];
                assert!(
                    slot.iter().all(|&b| b == value),
                    "torn frame in reused slot"
                );
                assert!(i32::from(value) > last);
                last = i32::from(value);
                adopted += 1;
            }
        }
        writer.join().unwrap();
        assert!(adopted >= 1);
    }
}
