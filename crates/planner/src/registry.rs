use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;
use wayfarer_storage::PlanRepository;

use crate::error::PlannerError;
use crate::session::PlanningSession;

/// Live sessions keyed by id.
pub struct SessionRegistry<S> {
    sessions: RwLock<HashMap<String, PlanningSession<S>>>,
}

impl<S> Default for SessionRegistry<S> {
    fn default() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }
}

impl<S> SessionRegistry<S>
where
    S: PlanRepository,
{
    pub fn insert(&self, session: PlanningSession<S>) {
        self.sessions
            .write()
            .insert(session.id().to_string(), session);
    }

    /// Looks a session up and marks it as used.
    pub fn get(&self, session_id: &str) -> Result<PlanningSession<S>, PlannerError> {
        let session = self
            .sessions
            .read()
            .get(session_id)
            .cloned()
            .ok_or_else(|| PlannerError::SessionNotFound(session_id.to_string()))?;
        session.touch_at(Utc::now());
        Ok(session)
    }

    /// Drops the session unless it is still generating.
    pub fn remove(&self, session_id: &str) -> Result<(), PlannerError> {
        let mut sessions = self.sessions.write();
        let session = sessions
            .get(session_id)
            .ok_or_else(|| PlannerError::SessionNotFound(session_id.to_string()))?;
        session.close()?;
        sessions.remove(session_id);
        Ok(())
    }

    /// Drops sessions untouched for longer than `ttl`. Generating sessions
    /// are kept regardless of age.
    pub fn purge_expired(&self, now: DateTime<Utc>, ttl: TimeDelta) -> u64 {
        let Some(cutoff) = now.checked_sub_signed(ttl) else {
            return 0;
        };

        let mut removed = 0_u64;
        self.sessions.write().retain(|_, session| {
            let keep = session.is_generating() || session.last_touched() > cutoff;
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}
