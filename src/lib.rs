// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Self-verifying LIFO stacks for plain-old-data elements.
//!
//! Every stack keeps its elements inside a framed byte image guarded by two
//! sentinels, a seeded checksum and poison-filled unused slots. Each mutating
//! call verifies the frame before and after it touches anything, so a stray
//! write is caught at the next operation instead of surfacing as bad data
//! much later.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  layout.rs  │────▶│  storage.rs  │────▶│   stack.rs   │
//! │ (offsets,   │     │ (HeapFrame,  │     │ (push, pop,  │
//! │  poison)    │     │ InlineFrame) │     │  verify)     │
//! └─────────────┘     └──────────────┘     └──────────────┘
//!        │                   │                    │
//!        ▼                   ▼                    ▼
//! ┌─────────────────────────────────────────────────────┐
//! │          integrity.rs  ·  growth.rs                 │
//! │  (checksum, ordered checks, Doubling / Refuse)      │
//! └─────────────────────────────────────────────────────┘
//!                            │
//!                            ▼
//! ┌─────────────────────────────────────────────────────┐
//! │     diagnostic.rs  ·  error.rs  ·  report.rs        │
//! │  (Snapshot, ErrorKind, StackError, dump rendering)  │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Variants
//!
//! | Type               | Frame                 | On overflow                     |
//! |--------------------|-----------------------|---------------------------------|
//! | `Stack<T>`         | heap, relocatable     | doubles capacity                |
//! | `FixedStack<T, N>` | inline, `N` slots     | fails with `GrowthOnFixedCapacity` |
//!
//! # Usage
//!
//! ```
//! use guardstack::{ErrorKind, FixedStack, Stack};
//!
//! let mut stack: Stack<u32> = Stack::with_capacity(2);
//! for value in 0..5 {
//!     stack.push(value)?;
//! }
//! assert_eq!(stack.capacity(), 8);
//! assert_eq!(stack.pop()?, 4);
//!
//! let mut fixed: FixedStack<u8, 1> = FixedStack::new();
//! fixed.push(1)?;
//! assert_eq!(fixed.push(2).unwrap_err().kind(), ErrorKind::GrowthOnFixedCapacity);
//! # Ok::<(), guardstack::StackError>(())
//! ```
//!
//! Any failure is terminal for the stack that raised it. The error carries a
//! [`Snapshot`] of the frame, which [`report::render`] turns into a dump.

pub mod diagnostic;
pub mod error;
pub mod growth;
pub mod identity;
pub mod integrity;
pub mod layout;
pub mod options;
pub mod report;
pub mod stack;
pub mod storage;

#[doc(hidden)]
pub mod testing;

pub use diagnostic::{SlotState, Snapshot};
pub use error::{ErrorKind, Result, StackError};
pub use growth::{Doubling, GrowthPolicy, Refuse};
pub use identity::{live_stacks, StackId};
pub use integrity::IntegrityReport;
pub use layout::{FrameLayout, DEFAULT_CAPACITY, DEFAULT_FIXED_CAPACITY, POISON_BYTE, SENTINEL};
pub use options::StackOptions;
pub use stack::{FixedStack, GuardedStack, Stack};
pub use storage::{Growable, HeapFrame, InlineFrame, Storage};
