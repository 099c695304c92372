//! Lock-free triple-buffer channels and pooled shared-heap allocation.
//!
//! This crate holds the synchronization primitive the rest of Triptych is
//! built on, plus the byte-level allocation machinery that backs resource
//! payloads and interned strings. It is the only crate in the workspace
//! that may contain `unsafe` code, and all of it lives in [`triple`].
//!
//! # Architecture
//!
//! ```text
//! ChannelHandle (Arc'd shared state)
//! ├── slots × 3 (equal-sized byte buffers)
//! ├── control word (AtomicU8: read/back/write indices + fresh flag)
//! ├── Producer (at most one, swaps write ↔ back on publish)
//! └── Consumer (at most one, swaps read ↔ back on try_swap_read)
//!
//! HeapArena
//! └── Segment[] (bump-allocated Vec<u8>, never freed during runtime)
//!
//! StringTable
//! └── HeapArena + dense id table + dedup index
//! ```
//!
//! # Safety
//!
//! The three slots are plain `UnsafeCell<Box<[u8]>>`. Soundness rests on
//! the control-word protocol: the producer only ever touches the slot
//! named by the write index, the consumer only the slot named by the read
//! index, and the back slot is touched by neither. Index handoff happens
//! exclusively through release/acquire exchanges on the control word.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod error;
pub mod heap;
pub mod strings;
pub mod triple;

// Public re-exports for the primary API surface.
pub use error::{BufferError, HeapError, StringError};
pub use heap::{HeapArena, HeapConfig, HeapRef};
pub use strings::StringTable;
pub use triple::{ChannelHandle, Consumer, Producer};
