use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracker_core::model::{ActiveSession, SessionId};

/// In-process set of sessions that have been started but not ended.
///
/// Passed explicitly to the services that need it; clones share the same map.
/// Nothing here is persisted, so a restart drops any session that was never ended.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<SessionId, ActiveSession>>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, ActiveSession>> {
        // A panic mid-update leaves the map itself intact.
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn insert(&self, session: ActiveSession) {
        self.lock().insert(session.id(), session);
    }

    #[must_use]
    pub fn get(&self, id: SessionId) -> Option<ActiveSession> {
        self.lock().get(&id).cloned()
    }

    /// Run `f` against the session in place. Returns `None` for unknown ids.
    pub fn update<R>(&self, id: SessionId, f: impl FnOnce(&mut ActiveSession) -> R) -> Option<R> {
        self.lock().get_mut(&id).map(f)
    }

    pub fn remove(&self, id: SessionId) -> Option<ActiveSession> {
        self.lock().remove(&id)
    }

    /// Ids of all open sessions, oldest first.
    #[must_use]
    pub fn ids(&self) -> Vec<SessionId> {
        let guard = self.lock();
        let mut sessions: Vec<_> = guard.values().collect();
        sessions.sort_by_key(|s| (s.started_at(), s.id()));
        sessions.into_iter().map(ActiveSession::id).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tracker_core::time::fixed_now;

    #[test]
    fn clones_share_sessions() {
        let registry = SessionRegistry::new();
        let other = registry.clone();
        let session = ActiveSession::start(SessionId::generate(), fixed_now());
        let id = session.id();

        registry.insert(session);
        assert_eq!(other.get(id).map(|s| s.id()), Some(id));
        assert_eq!(other.len(), 1);

        other.remove(id);
        assert!(registry.is_empty());
    }

    #[test]
    fn ids_are_ordered_by_start_time() {
        let registry = SessionRegistry::new();
        let later = ActiveSession::start(SessionId::generate(), fixed_now() + Duration::hours(1));
        let earlier = ActiveSession::start(SessionId::generate(), fixed_now());
        let (later_id, earlier_id) = (later.id(), earlier.id());
        registry.insert(later);
        registry.insert(earlier);

        assert_eq!(registry.ids(), vec![earlier_id, later_id]);
    }

    #[test]
    fn update_on_unknown_id_is_none() {
        let registry = SessionRegistry::new();
        assert!(registry.update(SessionId::generate(), |_| ()).is_none());
    }
}
