//! Type-erased raw operand storage for stack-machine evaluators.
//!
//! Two containers store heterogeneous fixed-layout values directly as raw
//! bytes inside growable lists of fixed-capacity (default 4KB) blocks,
//! handling per-type alignment manually instead of boxing:
//!
//! - [`RawStack`] — LIFO: `push`, unchecked `pop`/`drop_top`, `is_empty`.
//! - [`RawSequence`] — append-only with stateless positional `read`.
//!
//! # Architecture
//!
//! ```text
//! RawStack ──────┐
//!                ├── BlockList → Block[] (zero-initialised, 64-aligned)
//! RawSequence ───┘          │
//!                            └── layout (alignment arithmetic)
//! raw — the only unsafe module: value ⇄ bytes moves
//! ```
//!
//! Each container owns its block list exclusively; blocks are never freed
//! while the container lives, and a value slot is never split across two
//! blocks.
//!
//! # The caller contract
//!
//! Neither container stores type information. The caller — typically an
//! expression-VM evaluator — tracks the exact type at every stack depth
//! and sequence position, and supplies it as the generic parameter of each
//! `pop`/`read`. Those operations are `unsafe`: a type mismatch is
//! undefined behavior, not a reported error. Values left inside a
//! container are never dropped; reconstitute them first if they own
//! resources.
//!
//! # Threading
//!
//! Single-owner, synchronous: all mutation goes through `&mut self` and no
//! operation blocks or suspends.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod block;
pub mod config;
pub mod error;
pub mod layout;
mod raw;
pub mod sequence;
pub mod stack;

// Public re-exports for the primary API surface.
pub use config::StoreConfig;
pub use error::StoreError;
pub use sequence::RawSequence;
pub use stack::RawStack;
