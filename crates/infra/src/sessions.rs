//! Scanner session registry.
//!
//! Owns the set of running scanners; at most one running session per camera.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, Utc};
use thiserror::Error;

use stockmaster_core::SessionId;
use stockmaster_scanning::{Detection, Observation, ScannerConfig, ScannerSession, merge};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("scanner already running on camera {camera_id}")]
    AlreadyRunning { camera_id: u32 },

    #[error("scanner session {0} not found")]
    NotFound(SessionId),
}

#[derive(Debug, Default)]
pub struct ScannerSessionManager {
    sessions: RwLock<HashMap<SessionId, ScannerSession>>,
}

impl ScannerSessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, config: &ScannerConfig) -> Result<ScannerSession, SessionError> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);

        if sessions.values().any(|s| s.camera_id == config.camera_id) {
            return Err(SessionError::AlreadyRunning {
                camera_id: config.camera_id,
            });
        }

        let session = ScannerSession::start(config, Utc::now());
        sessions.insert(session.id, session.clone());
        tracing::info!(
            session_id = %session.id,
            camera_id = session.camera_id,
            device_id = %session.device_id,
            "scanner session started"
        );
        Ok(session)
    }

    pub fn stop(&self, id: SessionId) -> Result<ScannerSession, SessionError> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let session = sessions.remove(&id).ok_or(SessionError::NotFound(id))?;
        tracing::info!(
            session_id = %session.id,
            captures = session.captures,
            observations = session.observations,
            "scanner session stopped"
        );
        Ok(session)
    }

    pub fn get(&self, id: SessionId) -> Option<ScannerSession> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// All running sessions, oldest first.
    pub fn list(&self) -> Vec<ScannerSession> {
        let mut out: Vec<ScannerSession> = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect();
        out.sort_by_key(|s| (s.started_at, s.id));
        out
    }

    pub fn active_count(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Merge one capture cycle's detection passes and update the session counters.
    pub fn record_capture(
        &self,
        id: SessionId,
        detection_sets: Vec<Vec<Detection>>,
        captured_at: DateTime<Utc>,
    ) -> Result<Vec<Observation>, SessionError> {
        let observations = merge(detection_sets, captured_at);

        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let session = sessions.get_mut(&id).ok_or(SessionError::NotFound(id))?;
        session.record_capture(observations.len(), captured_at);

        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockmaster_scanning::{Region, Symbology};

    fn camera(id: u32) -> ScannerConfig {
        ScannerConfig {
            camera_id: id,
            ..ScannerConfig::default()
        }
    }

    #[test]
    fn one_session_per_camera() {
        let mgr = ScannerSessionManager::new();
        mgr.start(&camera(0)).unwrap();
        assert_eq!(
            mgr.start(&camera(0)).unwrap_err(),
            SessionError::AlreadyRunning { camera_id: 0 }
        );
        mgr.start(&camera(1)).unwrap();
        assert_eq!(mgr.active_count(), 2);
    }

    #[test]
    fn stop_frees_the_camera() {
        let mgr = ScannerSessionManager::new();
        let s = mgr.start(&camera(3)).unwrap();
        mgr.stop(s.id).unwrap();
        assert!(mgr.get(s.id).is_none());
        assert!(matches!(mgr.stop(s.id), Err(SessionError::NotFound(_))));
        mgr.start(&camera(3)).unwrap();
    }

    #[test]
    fn capture_merges_and_counts() {
        let mgr = ScannerSessionManager::new();
        let s = mgr.start(&camera(0)).unwrap();
        let d = |p: &str| Detection::new(p, Symbology::QrCode, Region::default());

        let obs = mgr
            .record_capture(s.id, vec![vec![d("A"), d("B")], vec![d("B"), d("C")]], Utc::now())
            .unwrap();
        assert_eq!(obs.len(), 3);

        let s = mgr.get(s.id).unwrap();
        assert_eq!(s.captures, 1);
        assert_eq!(s.observations, 3);
        assert!(s.last_capture_at.is_some());
    }

    #[test]
    fn capture_on_unknown_session_fails() {
        let mgr = ScannerSessionManager::new();
        let err = mgr.record_capture(SessionId::new(), vec![], Utc::now()).unwrap_err();
        assert!(matches!(err, SessionError::NotFound(_)));
    }
}
