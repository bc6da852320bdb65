// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Failure taxonomy.
//!
//! The taxonomy is closed. Corruption kinds are listed in the order
//! `verify()` checks them; the two usage kinds sit outside that order. Every
//! kind is fatal to the instance that raised it.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::diagnostic::Snapshot;
use crate::identity::StackId;

pub type Result<T, E = StackError> = std::result::Result<T, E>;

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No instance to check.
    NullInstance,
    CorruptedLeadingSentinel,
    CorruptedTrailingSentinel,
    /// Stored checksum differs from the recomputed one.
    ChecksumMismatch,
    LiveCountExceedsCapacity,
    /// The first slot past the live region that is not poison.
    NonPoisonTailSlot { index: usize },
    PopOnEmpty,
    GrowthOnFixedCapacity,
}

impl ErrorKind {
    /// Stable numeric code.
    pub const fn code(self) -> u8 {
        match self {
            ErrorKind::NullInstance => 0,
            ErrorKind::CorruptedLeadingSentinel => 1,
            ErrorKind::CorruptedTrailingSentinel => 2,
            ErrorKind::ChecksumMismatch => 3,
            ErrorKind::LiveCountExceedsCapacity => 4,
            ErrorKind::NonPoisonTailSlot { .. } => 5,
            ErrorKind::PopOnEmpty => 6,
            ErrorKind::GrowthOnFixedCapacity => 7,
        }
    }

    /// Detected damage to the frame (as opposed to misuse of the API).
    pub const fn is_corruption(self) -> bool {
        !self.is_usage()
    }

    pub const fn is_usage(self) -> bool {
        matches!(self, ErrorKind::PopOnEmpty | ErrorKind::GrowthOnFixedCapacity)
    }

    pub const fn message(self) -> &'static str {
        match self {
            ErrorKind::NullInstance => {
                "no stack instance was supplied; was it ever initialized?"
            }
            ErrorKind::CorruptedLeadingSentinel => {
                "leading sentinel was overwritten, likely by a write before the frame"
            }
            ErrorKind::CorruptedTrailingSentinel => {
                "trailing sentinel was overwritten, likely by a write past the last slot"
            }
            ErrorKind::ChecksumMismatch => "stored checksum does not match the frame contents",
            ErrorKind::LiveCountExceedsCapacity => {
                "live count is larger than capacity, or capacity disagrees with the frame size"
            }
            ErrorKind::NonPoisonTailSlot { .. } => {
                "an unused slot no longer holds the poison pattern; something wrote into it"
            }
            ErrorKind::PopOnEmpty => "pop was called on an empty stack",
            ErrorKind::GrowthOnFixedCapacity => {
                "fixed-capacity stack overflowed; raise its capacity or use a growable stack"
            }
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NonPoisonTailSlot { index } => {
                write!(f, "{} (slot {})", self.message(), index)
            }
            _ => f.write_str(self.message()),
        }
    }
}

/// A fatal failure, with the frame as it looked when the failure was found.
#[derive(Debug, Clone, Error)]
#[error("guarded stack failure [{code}]: {kind}", code = .kind.code())]
pub struct StackError {
    kind: ErrorKind,
    stack: Option<StackId>,
    snapshot: Option<Box<Snapshot>>,
}

impl StackError {
    pub(crate) fn new(kind: ErrorKind, stack: StackId, snapshot: Snapshot) -> Self {
        Self {
            kind,
            stack: Some(stack),
            snapshot: Some(Box::new(snapshot)),
        }
    }

    pub(crate) fn null_instance() -> Self {
        Self {
            kind: ErrorKind::NullInstance,
            stack: None,
            snapshot: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Stack that raised the failure; `None` for a missing instance.
    pub fn stack(&self) -> Option<StackId> {
        self.stack
    }

    /// Frame snapshot; `None` for a missing instance.
    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_deref()
    }

    pub fn into_snapshot(self) -> Option<Snapshot> {
        self.snapshot.map(|snapshot| *snapshot)
    }
}
