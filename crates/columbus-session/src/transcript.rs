// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only chat transcript.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use columbus_core::TurnRecord;

/// Ordered record of user and assistant turns.
///
/// Entries are only ever appended; timestamps never go backwards in append order.
#[derive(Debug, Clone, Default)]
pub struct TranscriptLog {
    turns: Vec<TurnRecord>,
}

impl TranscriptLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `turn`, raising its timestamp to the previous entry's if it is earlier.
    pub fn append(&mut self, mut turn: TurnRecord) -> &TurnRecord {
        debug_assert!(
            self.turns.iter().all(|t| t.id != turn.id),
            "turn id {} appended twice",
            turn.id
        );
        if let Some(last) = self.turns.last()
            && turn.created_at < last.created_at
        {
            turn.created_at = last.created_at;
        }
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    /// All turns, oldest first.
    pub fn all(&self) -> &[TurnRecord] {
        &self.turns
    }

    pub fn last(&self) -> Option<&TurnRecord> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Empties the log. Idempotent.
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

/// Parses a server timestamp.
///
/// RFC 3339 values keep their offset. A naive ISO-8601 value is the server's
/// wall clock and is read in the local timezone; `None` if that local time
/// does not exist.
pub fn parse_server_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}
