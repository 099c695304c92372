//! Per-thread frame synchronization metrics.
//!
//! [`FrameMetrics`] accumulates over a thread's lifetime; consumers read
//! deltas between frames for telemetry. Stale reads in particular let
//! callers skip redundant derived work (a render thread does not
//! re-upload GPU state for a snapshot it has already processed).

/// Counters collected across `begin_frame`/`end_frame` cycles.
#[derive(Clone, Debug, Default)]
pub struct FrameMetrics {
    /// Completed frames (one `begin_frame`..`end_frame` cycle each).
    pub frames: u64,
    /// Read swaps that adopted a fresh snapshot.
    pub swapped_reads: u64,
    /// Read swaps that found no new snapshot. Not an error.
    pub stale_reads: u64,
    /// Creation/disposal/string notifications applied.
    pub notifications_processed: u64,
    /// Snapshots published to outbound channels.
    pub snapshots_published: u64,
    /// Resources fully reclaimed after their last mirror ack.
    pub resources_reclaimed: u64,
}
