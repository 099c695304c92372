//! Pooled byte-heap allocation for resource payloads.
//!
//! A [`HeapArena`] is a growable list of fixed-size segments with bump
//! allocation. Segments are pre-allocated `Vec<u8>`s and are never freed
//! during runtime, so a [`HeapRef`] stays valid for the life of the arena
//! (or until [`HeapArena::reset`]). Allocations never span a segment
//! boundary; a request that does not fit the current segment is placed
//! entirely in the next one.

use crate::error::HeapError;

/// Configuration for the heap arena.
///
/// Validated at construction; all values are immutable after creation.
#[derive(Clone, Debug)]
pub struct HeapConfig {
    /// Size of each segment in bytes.
    ///
    /// Default: 65_536. Must be a power of two and at least 256.
    pub segment_size: u32,

    /// Maximum number of segments the arena may grow to.
    ///
    /// Default: 64. Total capacity is `segment_size * max_segments`.
    pub max_segments: u16,
}

impl HeapConfig {
    /// Default segment size: 64KB.
    pub const DEFAULT_SEGMENT_SIZE: u32 = 65_536;

    /// Default maximum segment count.
    pub const DEFAULT_MAX_SEGMENTS: u16 = 64;

    /// Minimum accepted segment size.
    pub const MIN_SEGMENT_SIZE: u32 = 256;

    /// Total capacity of the arena in bytes if fully grown.
    pub fn capacity_bytes(&self) -> usize {
        self.segment_size as usize * self.max_segments as usize
    }

    fn validate(&self) -> Result<(), HeapError> {
        if self.segment_size < Self::MIN_SEGMENT_SIZE {
            return Err(HeapError::InvalidConfig {
                reason: format!(
                    "segment_size {} below minimum {}",
                    self.segment_size,
                    Self::MIN_SEGMENT_SIZE
                ),
            });
        }
        if !self.segment_size.is_power_of_two() {
            return Err(HeapError::InvalidConfig {
                reason: format!("segment_size {} is not a power of two", self.segment_size),
            });
        }
        if self.max_segments == 0 {
            return Err(HeapError::InvalidConfig {
                reason: "max_segments must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self {
            segment_size: Self::DEFAULT_SEGMENT_SIZE,
            max_segments: Self::DEFAULT_MAX_SEGMENTS,
        }
    }
}

/// Location of an allocation within a [`HeapArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HeapRef {
    /// Index of the segment holding the allocation.
    pub segment: u16,
    /// Byte offset within the segment.
    pub offset: u32,
    /// Length of the allocation in bytes.
    pub len: u32,
}

/// A single contiguous byte segment with bump allocation.
struct Segment {
    /// Backing storage. Allocated to full capacity at creation.
    data: Vec<u8>,
    /// Bump pointer: next free byte.
    cursor: usize,
}

impl Segment {
    fn new(capacity: u32) -> Self {
        Self {
            data: vec![0u8; capacity as usize],
            cursor: 0,
        }
    }

    /// Bump-allocate `len` bytes, zeroing the region. Returns the offset
    /// within this segment, or `None` if there is insufficient capacity.
    fn alloc(&mut self, len: u32) -> Option<u32> {
        let len = len as usize;
        let new_cursor = self.cursor.checked_add(len)?;
        if new_cursor > self.data.len() {
            return None;
        }
        let offset = self.cursor as u32;
        self.data[self.cursor..new_cursor].fill(0);
        self.cursor = new_cursor;
        Some(offset)
    }

    fn reset(&mut self) {
        self.cursor = 0;
    }
}

/// A growable pool of byte segments with overflow-based bump allocation.
pub struct HeapArena {
    segments: Vec<Segment>,
    config: HeapConfig,
    /// Index of the segment currently being filled.
    current: usize,
}

impl HeapArena {
    /// Create an arena with one pre-allocated segment.
    pub fn new(config: HeapConfig) -> Result<Self, HeapError> {
        config.validate()?;
        let mut segments = Vec::with_capacity(config.max_segments as usize);
        segments.push(Segment::new(config.segment_size));
        Ok(Self {
            segments,
            config,
            current: 0,
        })
    }

    /// Bump-allocate `len` zeroed bytes, growing into a new segment if
    /// needed.
    pub fn alloc(&mut self, len: u32) -> Result<HeapRef, HeapError> {
        // Reject allocations that can never fit in a single segment.
        if len > self.config.segment_size {
            return Err(HeapError::CapacityExceeded {
                requested: len as usize,
                capacity: self.config.segment_size as usize,
            });
        }

        // Try the current segment first.
        if let Some(offset) = self.segments[self.current].alloc(len) {
            return Ok(HeapRef {
                segment: self.current as u16,
                offset,
                len,
            });
        }

        // Current segment full; advance to the next existing segment or
        // create one.
        let next = self.current + 1;
        if next < self.segments.len() {
            // Reuse a segment allocated before the last reset.
            if let Some(offset) = self.segments[next].alloc(len) {
                self.current = next;
                return Ok(HeapRef {
                    segment: next as u16,
                    offset,
                    len,
                });
            }
        }

        if self.segments.len() >= self.config.max_segments as usize {
            return Err(HeapError::CapacityExceeded {
                requested: len as usize,
                capacity: self.config.capacity_bytes(),
            });
        }

        let mut seg = Segment::new(self.config.segment_size);
        let offset = seg.alloc(len).ok_or(HeapError::CapacityExceeded {
            requested: len as usize,
            capacity: self.config.segment_size as usize,
        })?;
        self.segments.push(seg);
        self.current = self.segments.len() - 1;
        Ok(HeapRef {
            segment: self.current as u16,
            offset,
            len,
        })
    }

    /// Allocate and fill in one step.
    pub fn alloc_with(&mut self, data: &[u8]) -> Result<HeapRef, HeapError> {
        let heap_ref = self.alloc(data.len() as u32)?;
        self.bytes_mut(heap_ref).copy_from_slice(data);
        Ok(heap_ref)
    }

    /// Shared view of an allocation.
    ///
    /// # Panics
    ///
    /// Panics if the ref does not name a live allocation in this arena.
    pub fn bytes(&self, heap_ref: HeapRef) -> &[u8] {
        let start = heap_ref.offset as usize;
        let end = start + heap_ref.len as usize;
        &self.segments[heap_ref.segment as usize].data[start..end]
    }

    /// Mutable view of an allocation.
    ///
    /// # Panics
    ///
    /// Panics if the ref does not name a live allocation in this arena.
    pub fn bytes_mut(&mut self, heap_ref: HeapRef) -> &mut [u8] {
        let start = heap_ref.offset as usize;
        let end = start + heap_ref.len as usize;
        &mut self.segments[heap_ref.segment as usize].data[start..end]
    }

    /// Reset all bump pointers without deallocating. All previously
    /// handed-out refs become invalid.
    pub fn reset(&mut self) {
        for seg in &mut self.segments {
            seg.reset();
        }
        self.current = 0;
    }

    /// Number of segments currently allocated.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Total bytes currently allocated out of the arena.
    pub fn used_bytes(&self) -> usize {
        self.segments.iter().map(|s| s.cursor).sum()
    }

    /// Memory held by the backing segments in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.segments.iter().map(|s| s.data.len()).sum()
    }
}
