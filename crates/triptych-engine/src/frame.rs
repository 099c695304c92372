//! Channel-level frame scheduling.
//!
//! [`FrameSync`] is the thin hook surrounding-thread code calls at fixed
//! points in its loop: `begin_frame` swaps every inbound channel's read
//! slot, `end_frame` publishes every outbound channel. These are the
//! only two integration points, and they must be called in this order
//! within one loop iteration.

use triptych_core::{FrameConsumer, FrameId, FramePublisher, SwapResult};

use crate::metrics::FrameMetrics;

/// Per-thread registry of inbound and outbound channel endpoints.
pub struct FrameSync {
    inbound: Vec<Box<dyn FrameConsumer + Send>>,
    outbound: Vec<Box<dyn FramePublisher + Send>>,
    frame: FrameId,
    metrics: FrameMetrics,
}

impl FrameSync {
    /// Empty scheduler at frame zero.
    pub fn new() -> Self {
        Self {
            inbound: Vec::new(),
            outbound: Vec::new(),
            frame: FrameId(0),
            metrics: FrameMetrics::default(),
        }
    }

    /// Register a channel this thread consumes.
    pub fn add_inbound(&mut self, consumer: Box<dyn FrameConsumer + Send>) {
        self.inbound.push(consumer);
    }

    /// Register a channel this thread publishes.
    pub fn add_outbound(&mut self, publisher: Box<dyn FramePublisher + Send>) {
        self.outbound.push(publisher);
    }

    /// Swap every inbound channel's read slot. Returns `(swapped, stale)`
    /// counts for this frame.
    pub fn begin_frame(&mut self) -> (u64, u64) {
        let mut swapped = 0;
        let mut stale = 0;
        for consumer in &mut self.inbound {
            match consumer.try_swap_read() {
                SwapResult::Swapped => swapped += 1,
                SwapResult::Stale => stale += 1,
            }
        }
        self.metrics.swapped_reads += swapped;
        self.metrics.stale_reads += stale;
        (swapped, stale)
    }

    /// Publish every outbound channel and advance the frame counter.
    pub fn end_frame(&mut self) {
        for publisher in &mut self.outbound {
            publisher.publish();
        }
        self.metrics.snapshots_published += self.outbound.len() as u64;
        self.metrics.frames += 1;
        self.frame = FrameId(self.frame.0 + 1);
    }

    /// The frame about to run (completed frames so far).
    pub fn frame(&self) -> FrameId {
        self.frame
    }

    /// Accumulated counters.
    pub fn metrics(&self) -> &FrameMetrics {
        &self.metrics
    }
}

impl Default for FrameSync {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use triptych_buffer::ChannelHandle;

    #[test]
    fn begin_frame_counts_swapped_and_stale() {
        let fresh = ChannelHandle::new(4).unwrap();
        let quiet = ChannelHandle::new(4).unwrap();
        let mut producer = fresh.attach_producer().unwrap();
        let _quiet_producer = quiet.attach_producer().unwrap();

        let mut sync = FrameSync::new();
        sync.add_inbound(Box::new(fresh.attach_consumer().unwrap()));
        sync.add_inbound(Box::new(quiet.attach_consumer().unwrap()));

        producer.write_slot().fill(1);
        producer.publish();

        assert_eq!(sync.begin_frame(), (1, 1));
        assert_eq!(sync.metrics().swapped_reads, 1);
        assert_eq!(sync.metrics().stale_reads, 1);
    }

    #[test]
    fn end_frame_publishes_and_advances() {
        let channel = ChannelHandle::new(4).unwrap();
        let mut consumer = channel.attach_consumer().unwrap();

        let mut sync = FrameSync::new();
        sync.add_outbound(Box::new(channel.attach_producer().unwrap()));

        assert_eq!(sync.frame(), FrameId(0));
        sync.end_frame();
        assert_eq!(sync.frame(), FrameId(1));
        assert_eq!(sync.metrics().frames, 1);

        assert_eq!(consumer.try_swap_read(), SwapResult::Swapped);
    }
}
