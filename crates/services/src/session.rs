use std::collections::{BTreeMap, BTreeSet};
use uuid::Uuid;

use drive_core::model::{Account, Level, LessonId};

static EMPTY_COMPLETED: BTreeSet<LessonId> = BTreeSet::new();
static EMPTY_SCORES: BTreeMap<LessonId, f64> = BTreeMap::new();

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// The single active session: either a logged-in account, or the transient
/// draft a visitor builds up before signing in.
///
/// This is an explicitly owned object, created at login/sign-up (or as a
/// draft) and dropped at logout; nothing process-wide holds "the current
/// user".
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    id: Uuid,
    state: SessionState,
}

#[derive(Debug, Clone, PartialEq)]
enum SessionState {
    Draft { name: String, level: Level },
    Active { account: Account },
}

impl Session {
    /// A fresh pre-account draft: empty name, bottom-tier level.
    #[must_use]
    pub fn draft() -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Draft {
                name: String::new(),
                level: Level::default(),
            },
        }
    }

    /// A session bound to an account (after login or sign-up).
    #[must_use]
    pub fn for_account(account: Account) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Active { account },
        }
    }

    /// Stable id for log correlation.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active { .. })
    }

    #[must_use]
    pub fn account(&self) -> Option<&Account> {
        match &self.state {
            SessionState::Active { account } => Some(account),
            SessionState::Draft { .. } => None,
        }
    }

    pub(crate) fn account_mut(&mut self) -> Option<&mut Account> {
        match &mut self.state {
            SessionState::Active { account } => Some(account),
            SessionState::Draft { .. } => None,
        }
    }

    /// The display name: the account's username, or the draft name.
    #[must_use]
    pub fn name(&self) -> &str {
        match &self.state {
            SessionState::Active { account } => account.username(),
            SessionState::Draft { name, .. } => name,
        }
    }

    #[must_use]
    pub fn level(&self) -> Level {
        match &self.state {
            SessionState::Active { account } => account.level(),
            SessionState::Draft { level, .. } => *level,
        }
    }

    /// Completed lessons; a draft has none.
    #[must_use]
    pub fn completed_lessons(&self) -> &BTreeSet<LessonId> {
        match &self.state {
            SessionState::Active { account } => account.completed_lessons(),
            SessionState::Draft { .. } => &EMPTY_COMPLETED,
        }
    }

    /// Simulation scores; a draft has none.
    #[must_use]
    pub fn simulation_scores(&self) -> &BTreeMap<LessonId, f64> {
        match &self.state {
            SessionState::Active { account } => account.simulation_scores(),
            SessionState::Draft { .. } => &EMPTY_SCORES,
        }
    }

    /// Sets the draft name. A no-op on an active session, where the name
    /// belongs to the account.
    pub fn set_draft_name(&mut self, name: impl Into<String>) {
        if let SessionState::Draft { name: draft, .. } = &mut self.state {
            *draft = name.into();
        }
    }

    /// Sets the draft level. A no-op on an active session; level changes for
    /// accounts go through the progress engine.
    pub fn set_draft_level(&mut self, level: Level) {
        if let SessionState::Draft { level: draft, .. } = &mut self.state {
            *draft = level;
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
