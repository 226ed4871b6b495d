//! Realtime session lifecycle.
//!
//! A session is Active from start until it is ended, either explicitly or by
//! the countdown timer. Both paths route through the same compare-and-set
//! transition, so ending is effective exactly once no matter who gets there
//! first.

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::sync::watch;
use tracing::debug;

/// Lifecycle phase of a session. Idle is the absence of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Active,
    Ended,
}

/// Snapshot of a session's identity and state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionHandle {
    pub conversation_id: String,
    pub is_active: bool,
    pub started_at: SystemTime,
}

/// An active (or ended) conversation session with its countdown timer.
pub struct DebateSession {
    conversation_id: String,
    started_at: SystemTime,
    phase: watch::Sender<SessionPhase>,
}

impl DebateSession {
    /// Start a session and spawn its countdown.
    ///
    /// If nothing ends the session within `timeout`, the countdown ends it
    /// through the same transition as an explicit [`end`](Self::end) call.
    /// Must be called from within a Tokio runtime.
    pub fn start(conversation_id: impl Into<String>, timeout: Duration) -> Arc<Self> {
        let (phase, _) = watch::channel(SessionPhase::Active);
        let session = Arc::new(Self {
            conversation_id: conversation_id.into(),
            started_at: SystemTime::now(),
            phase,
        });

        let countdown = Arc::clone(&session);
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(timeout) => {
                    if countdown.end().is_some() {
                        debug!(
                            conversation_id = %countdown.conversation_id,
                            timeout_secs = timeout.as_secs(),
                            "session ended by countdown"
                        );
                    }
                }
                _ = countdown.wait_for_end() => {}
            }
        });

        session
    }

    /// End the session.
    ///
    /// Returns the conversation id if this call performed the transition,
    /// `None` if the session had already ended. Safe to call concurrently;
    /// exactly one caller observes `Some`.
    pub fn end(&self) -> Option<String> {
        let transitioned = self.phase.send_if_modified(|phase| {
            if *phase == SessionPhase::Active {
                *phase = SessionPhase::Ended;
                true
            } else {
                false
            }
        });

        transitioned.then(|| self.conversation_id.clone())
    }

    /// Suspend until the session has ended, then return the conversation id.
    pub async fn wait_for_end(&self) -> String {
        let mut rx = self.phase.subscribe();
        // The sender lives in self, so wait_for cannot fail while we borrow it.
        let _ = rx.wait_for(|phase| *phase == SessionPhase::Ended).await;
        self.conversation_id.clone()
    }

    pub fn is_active(&self) -> bool {
        *self.phase.borrow() == SessionPhase::Active
    }

    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Snapshot the session state.
    pub fn handle(&self) -> SessionHandle {
        SessionHandle {
            conversation_id: self.conversation_id.clone(),
            is_active: self.is_active(),
            started_at: self.started_at,
        }
    }
}
