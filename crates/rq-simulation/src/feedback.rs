//! Floating combat feedback: transient display records for the renderer.
//!
//! Feedback is a player-affordance side channel, not control flow: every
//! combat and gather event produces a record regardless of outcome, and a
//! record's lifetime is independent of any entity. Records live in the log
//! until their expiry passes; a copy of each new record is handed to the
//! external sink exactly once via [`FeedbackLog::drain_new`].

use serde::Serialize;

use rq_core::LatLng;

/// What a feedback record announces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    /// An attack that failed to land (including aborted attempts).
    Miss,
    /// Damage dealt by a landed sub-attack.
    Damage,
    /// Health restored.
    Heal,
    /// A level was gained.
    LevelUp,
    /// Loot dropped or picked up.
    Loot,
    /// Something appeared in the world.
    Spawn,
    /// A combatant was defeated.
    Defeat,
}

impl FeedbackKind {
    /// Display color for this kind, as a hex string.
    pub fn color(self) -> &'static str {
        match self {
            Self::Miss => "#95a5a6",
            Self::Damage => "#e74c3c",
            Self::Heal => "#1abc9c",
            Self::LevelUp => "#f1c40f",
            Self::Loot => "#2ecc71",
            Self::Spawn => "#3498db",
            Self::Defeat => "#8e44ad",
        }
    }
}

impl std::fmt::Display for FeedbackKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Miss => write!(f, "miss"),
            Self::Damage => write!(f, "damage"),
            Self::Heal => write!(f, "heal"),
            Self::LevelUp => write!(f, "level_up"),
            Self::Loot => write!(f, "loot"),
            Self::Spawn => write!(f, "spawn"),
            Self::Defeat => write!(f, "defeat"),
        }
    }
}

/// One transient display record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloatingFeedback {
    /// Monotonic record ID, unique within a session.
    pub id: u64,
    /// The kind of event announced.
    pub kind: FeedbackKind,
    /// Where to display the record.
    pub position: LatLng,
    /// Display text, such as a damage number or "Miss".
    pub text: String,
    /// Display color, fixed per kind.
    pub color: &'static str,
    /// Simulation milliseconds when the record was created.
    pub created_ms: u64,
    /// Simulation milliseconds after which the record is swept.
    pub expires_ms: u64,
}

/// Accumulates feedback records during a simulation run.
#[derive(Debug, Default)]
pub struct FeedbackLog {
    active: Vec<FloatingFeedback>,
    outbox: Vec<FloatingFeedback>,
    next_id: u64,
}

impl FeedbackLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, assigning it the next ID.
    pub fn push(
        &mut self,
        kind: FeedbackKind,
        position: LatLng,
        text: impl Into<String>,
        created_ms: u64,
        expires_ms: u64,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let record = FloatingFeedback {
            id,
            kind,
            position,
            text: text.into(),
            color: kind.color(),
            created_ms,
            expires_ms,
        };
        self.outbox.push(record.clone());
        self.active.push(record);
        id
    }

    /// Records whose expiry has not yet passed the last sweep.
    pub fn active(&self) -> &[FloatingFeedback] {
        &self.active
    }

    /// Remove records whose expiry has passed. Returns how many were
    /// removed.
    pub fn sweep(&mut self, now_ms: u64) -> usize {
        let before = self.active.len();
        self.active.retain(|r| r.expires_ms > now_ms);
        before - self.active.len()
    }

    /// Take every record pushed since the last drain. Each record is
    /// yielded exactly once, regardless of sweeping.
    pub fn drain_new(&mut self) -> Vec<FloatingFeedback> {
        std::mem::take(&mut self.outbox)
    }

    /// Number of active records.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// True if no records are active.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Remove all records and pending drains.
    pub fn clear(&mut self) {
        self.active.clear();
        self.outbox.clear();
    }
}
