// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Dump rendering.
//!
//! Turns a [`Snapshot`] into text a human can read after a failure. Every
//! header field and every slot gets one line with a tag:
//!
//! ```text
//! (GOOD) [SENTINEL] == 0x0000dedda1c0ffee
//! (BAD) [CHECKSUM] == 0x0000002a5f3e11c0 (computed 0x0000002a90b4c2d1)
//! (GOOD) [LIVE] == 2
//! (GOOD) [CAPACITY] == 4
//! (GOOD) [0] == 01 00 00 00
//! (WARNING) [1] == 23 23 23 23
//! (BAD) [2] == 00 23 23 23
//! ```
//!
//! The renderer trusts the judgements already stored in the snapshot and
//! never re-verifies anything.

use std::fmt;

use serde::Serialize;

use crate::diagnostic::{SlotState, Snapshot};
use crate::layout::PAYLOAD_POS;

/// Verdict shown in front of a dump line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    Good,
    Bad,
    /// Legal but suspicious, e.g. a live slot equal to poison.
    Warning,
}

impl Tag {
    fn from_ok(ok: bool) -> Self {
        if ok {
            Tag::Good
        } else {
            Tag::Bad
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tag::Good => "GOOD",
            Tag::Bad => "BAD",
            Tag::Warning => "WARNING",
        }
    }
}

/// One tagged line of a dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DumpLine {
    pub tag: Tag,
    pub field: String,
    pub value: String,
}

/// Tagged field lines in frame order: header, slots, trailer.
pub fn dump_lines(snapshot: &Snapshot) -> Vec<DumpLine> {
    let mut lines = Vec::with_capacity(snapshot.slots.len() + 5);
    let counts_ok = snapshot.counts_consistent();

    lines.push(DumpLine {
        tag: Tag::from_ok(snapshot.leading_intact()),
        field: "SENTINEL".into(),
        value: format!("{:#018x}", snapshot.leading_sentinel),
    });

    let checksum = if snapshot.checksum_matches() {
        format!("{:#018x}", snapshot.stored_checksum)
    } else {
        format!(
            "{:#018x} (computed {:#018x})",
            snapshot.stored_checksum, snapshot.computed_checksum
        )
    };
    lines.push(DumpLine {
        tag: Tag::from_ok(snapshot.checksum_matches()),
        field: "CHECKSUM".into(),
        value: checksum,
    });
    lines.push(DumpLine {
        tag: Tag::from_ok(counts_ok),
        field: "LIVE".into(),
        value: snapshot.live_count.to_string(),
    });
    lines.push(DumpLine {
        tag: Tag::from_ok(counts_ok),
        field: "CAPACITY".into(),
        value: snapshot.capacity.to_string(),
    });

    for (index, state) in snapshot.slots.iter().enumerate() {
        let tag = match state {
            SlotState::Live if snapshot.is_poison_like(index) => Tag::Warning,
            SlotState::Live | SlotState::Poisoned => Tag::Good,
            SlotState::Anomalous => Tag::Bad,
        };
        let value = snapshot.slot_bytes(index).map(hex).unwrap_or_default();
        lines.push(DumpLine {
            tag,
            field: index.to_string(),
            value,
        });
    }

    lines.push(DumpLine {
        tag: Tag::from_ok(snapshot.trailing_intact()),
        field: "SENTINEL".into(),
        value: format!("{:#018x}", snapshot.trailing_sentinel),
    });

    lines
}

/// Plain-text dump of `snapshot`.
pub fn render(snapshot: &Snapshot) -> String {
    Dump(snapshot).to_string()
}

/// [`fmt::Display`] adapter behind [`render`].
pub struct Dump<'a>(pub &'a Snapshot);

impl fmt::Display for Dump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.0;

        writeln!(f, "- - - - - - guarded stack dump - - - - - -")?;
        writeln!(
            f,
            "stack: {} ({})",
            snapshot.stack,
            snapshot.stack.logger_name()
        )?;
        writeln!(
            f,
            "element: {} ({} bytes)",
            snapshot.element_type, snapshot.element_size
        )?;
        match snapshot.kind {
            Some(kind) => writeln!(f, "error [{}]: {}", kind.code(), kind)?,
            None => writeln!(f, "error: none")?,
        }

        writeln!(f, "\nframe ({} bytes):", snapshot.raw_bytes.len())?;
        for (row, chunk) in snapshot.raw_bytes.chunks(16).enumerate() {
            writeln!(f, "  {:04x}  {}", row * 16, hex(chunk))?;
        }

        writeln!(f, "\ndetailed:")?;
        for line in dump_lines(snapshot) {
            writeln!(f, "({}) [{}] == {}", line.tag.label(), line.field, line.value)?;
        }

        writeln!(f, "- - - - - end of guarded stack dump - - - - -")
    }
}

/// Machine-readable dump: the snapshot plus its tagged lines.
pub fn to_json(snapshot: &Snapshot) -> serde_json::Result<String> {
    #[derive(Serialize)]
    struct JsonDump<'a> {
        code: Option<u8>,
        message: Option<String>,
        payload_offset: usize,
        snapshot: &'a Snapshot,
        lines: Vec<DumpLine>,
    }

    serde_json::to_string_pretty(&JsonDump {
        code: snapshot.kind.map(|kind| kind.code()),
        message: snapshot.kind.map(|kind| kind.to_string()),
        payload_offset: PAYLOAD_POS,
        snapshot,
        lines: dump_lines(snapshot),
    })
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect::<Vec<_>>()
        .join(" ")
}
