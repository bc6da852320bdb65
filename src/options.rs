// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Construction options for growable stacks.

use crate::identity::StackId;
use crate::layout::DEFAULT_CAPACITY;

/// How to build a `Stack`.
///
/// ```
/// use guardstack::{Stack, StackId, StackOptions};
///
/// let options = StackOptions::default().initial_capacity(64).id(StackId::new(7));
/// let stack: Stack<u32> = Stack::with_options(options);
/// assert_eq!(stack.capacity(), 64);
/// assert_eq!(stack.id(), StackId::new(7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StackOptions {
    /// Slots allocated up front.
    pub initial_capacity: usize,
    /// Explicit identity; `None` draws the next id from the registry.
    pub id: Option<StackId>,
}

impl Default for StackOptions {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_CAPACITY,
            id: None,
        }
    }
}

impl StackOptions {
    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn id(mut self, id: StackId) -> Self {
        self.id = Some(id);
        self
    }
}
