// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Instance identity and the process-wide stack registry.
//!
//! Every stack has a [`StackId`]. It names the stack in logs and seeds the
//! frame checksum, so a frame copied from one stack into another never
//! verifies. Callers either pass an explicit id or let the registry hand out
//! the next one. Registry ids carry a tag bit that explicit ids never have,
//! and the tag survives into the seed, so a caller-chosen id cannot collide
//! with one the registry issued. Registration is RAII: it starts when a stack
//! is built and ends when it is dropped.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use serde::Serialize;
use tracing::trace;

static NEXT_ID: AtomicU64 = AtomicU64::new(0);
static LIVE_STACKS: AtomicUsize = AtomicUsize::new(0);

/// Top bit marks ids issued by the registry.
const ALLOCATED: u64 = 1 << 63;
const SEED_TAG: u32 = 1 << 31;

/// Identity of one stack instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StackId(u64);

impl StackId {
    /// Caller-chosen id. The top bit is reserved for the registry and is
    /// cleared.
    pub const fn new(raw: u64) -> Self {
        Self(raw & !ALLOCATED)
    }

    const fn allocated(serial: u64) -> Self {
        Self(serial | ALLOCATED)
    }

    /// Raw id without the registry tag.
    pub const fn get(self) -> u64 {
        self.0 & !ALLOCATED
    }

    /// Whether the registry issued this id.
    pub const fn is_allocated(self) -> bool {
        self.0 & ALLOCATED != 0
    }

    /// 32-bit fold used as the checksum seed. The top bit of the seed is the
    /// registry tag, so explicit and registry ids never share a seed.
    pub const fn seed(self) -> u32 {
        let raw = self.get();
        let folded = (raw ^ (raw >> 32)) as u32 & !SEED_TAG;
        if self.is_allocated() {
            folded | SEED_TAG
        } else {
            folded
        }
    }

    /// Name used for this stack's log lines.
    pub fn logger_name(self) -> String {
        format!("guard-stack-{}", self)
    }
}

impl fmt::Display for StackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_allocated() {
            write!(f, "auto-{}", self.get())
        } else {
            write!(f, "{}", self.get())
        }
    }
}

impl From<u64> for StackId {
    fn from(raw: u64) -> Self {
        Self::new(raw)
    }
}

/// Number of stacks currently alive in this process.
pub fn live_stacks() -> usize {
    LIVE_STACKS.load(Ordering::Relaxed)
}

/// Membership in the registry; released on drop.
#[derive(Debug)]
pub(crate) struct Registration {
    id: StackId,
}

impl Registration {
    /// Register under the next free id.
    pub(crate) fn allocate() -> Self {
        Self::register(StackId::allocated(NEXT_ID.fetch_add(1, Ordering::Relaxed)))
    }

    /// Register under a caller-chosen id. A registry id passed back in is
    /// demoted to the explicit id with the same raw value.
    pub(crate) fn explicit(id: StackId) -> Self {
        Self::register(StackId::new(id.get()))
    }

    fn register(id: StackId) -> Self {
        let live = LIVE_STACKS.fetch_add(1, Ordering::Relaxed) + 1;
        trace!(stack = %id, live, "registered");
        Self { id }
    }

    pub(crate) fn id(&self) -> StackId {
        self.id
    }
}

impl Drop for Registration {
    fn drop(&mut self) {
        let live = LIVE_STACKS.fetch_sub(1, Ordering::Relaxed) - 1;
        trace!(stack = %self.id, live, "released");
    }
}
