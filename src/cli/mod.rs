// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the guardstack command-line interface.
//!
//! Three subcommands: `demo` walks a stack through growth and a failure,
//! `tamper` damages one region of a frame and prints the resulting dump, and
//! `layout` prints the frame offsets for a given element size.

pub mod display;

use clap::{Parser, Subcommand, ValueEnum};
use guardstack::testing::Target;

#[derive(Parser)]
#[command(
    name = "guardstack",
    about = "Self-verifying stack with sentinels, checksums and poison",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Emit machine-readable JSON instead of the boxed dump
    #[arg(long, global = true)]
    pub json: bool,

    /// Log lifecycle events (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Push past capacity, drain, then pop once more
    Demo {
        /// Initial capacity of the growable stack
        #[arg(short, long, default_value = "10")]
        capacity: usize,

        /// Number of values to push
        #[arg(short, long, default_value = "11")]
        pushes: u32,
    },

    /// Corrupt one region of a frame and show what verification reports
    Tamper {
        /// Region to damage
        #[arg(value_enum)]
        field: Field,

        /// Values pushed before tampering
        #[arg(short, long, default_value = "2")]
        pushes: u32,

        /// Use an inline fixed-capacity stack of 8 slots
        #[arg(long)]
        fixed: bool,
    },

    /// Print frame offsets for an element size
    Layout {
        /// Element size in bytes
        #[arg(short, long, default_value = "8")]
        width: usize,

        /// Slot count
        #[arg(short, long, default_value = "10")]
        capacity: usize,
    },
}

/// Frame regions `tamper` can damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Field {
    Leading,
    Trailing,
    Checksum,
    Live,
    Tail,
    Payload,
}

impl From<Field> for Target {
    fn from(field: Field) -> Self {
        match field {
            Field::Leading => Target::LeadingSentinel,
            Field::Trailing => Target::TrailingSentinel,
            Field::Checksum => Target::Checksum,
            Field::Live => Target::LiveCount,
            Field::Tail => Target::TailSlot,
            Field::Payload => Target::Payload,
        }
    }
}
