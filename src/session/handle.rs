//! Shared handle wiring the engine to its question timer.
//!
//! The engine itself is synchronous; this handle owns it behind a mutex and
//! keeps exactly one countdown task alive for the question in progress. Every
//! transition that enters a question cancels the previous timer before arming
//! the next one, and expiries are routed back with the epoch they were armed
//! for so the engine can reject stale ones.
//!
//! Methods that arm a timer must be called from within a tokio runtime.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::model::Quiz;
use crate::prefs::UserPreferences;
use crate::session::engine::SessionEngine;
use crate::session::timer::{self, TimerHandle};

#[derive(Clone)]
pub struct SessionHandle {
    engine: Arc<Mutex<SessionEngine>>,
    timer: Arc<Mutex<Option<TimerHandle>>>,
}

impl SessionHandle {
    pub fn new(engine: SessionEngine) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            timer: Arc::new(Mutex::new(None)),
        }
    }

    fn lock_engine(&self) -> MutexGuard<'_, SessionEngine> {
        self.engine.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Run a closure against the engine; the lock is held for its duration.
    pub fn with_engine<R>(&self, f: impl FnOnce(&SessionEngine) -> R) -> R {
        f(&self.lock_engine())
    }

    pub fn load_quiz(&self, quiz: Quiz) {
        self.cancel_timer();
        self.lock_engine().load_quiz(quiz);
    }

    pub fn start(&self, prefs: &UserPreferences) -> bool {
        let accepted = self.lock_engine().start(prefs);
        if accepted {
            self.rearm_or_cancel();
        }
        accepted
    }

    pub fn answer(&self, option_id: &str) -> bool {
        let accepted = self.lock_engine().answer_question(option_id);
        if accepted {
            self.rearm_or_cancel();
        }
        accepted
    }

    pub fn next_question(&self) -> bool {
        let accepted = self.lock_engine().go_to_next_question();
        if accepted {
            self.rearm_or_cancel();
        }
        accepted
    }

    pub fn previous_question(&self) -> bool {
        let accepted = self.lock_engine().go_to_previous_question();
        if accepted {
            self.rearm_or_cancel();
        }
        accepted
    }

    pub fn end(&self) -> bool {
        let ended = self.lock_engine().end_session();
        if ended {
            self.cancel_timer();
        }
        ended
    }

    pub fn reset(&self) -> bool {
        self.cancel_timer();
        self.lock_engine().reset_session()
    }

    pub fn restart(&self, prefs: &UserPreferences) -> bool {
        let accepted = self.lock_engine().restart_session(prefs);
        if accepted {
            self.rearm_or_cancel();
        }
        accepted
    }

    /// Seconds left on the live countdown, if one is running.
    pub fn remaining_seconds(&self) -> Option<u32> {
        let slot = self.timer.lock().ok()?;
        slot.as_ref().map(|t| *t.remaining().borrow())
    }

    fn on_timer_fired(&self, epoch: u64) {
        let handled = self.lock_engine().time_expire(epoch);
        if handled {
            // The timeout may have advanced to the next question.
            self.rearm_or_cancel();
        }
    }

    fn rearm_or_cancel(&self) {
        let (active, epoch, secs) = {
            let engine = self.lock_engine();
            (engine.is_active(), engine.timer_epoch(), engine.time_limit())
        };
        if !active {
            self.cancel_timer();
            return;
        }

        let this = self.clone();
        let handle = timer::arm(secs, move || this.on_timer_fired(epoch));
        if let Ok(mut slot) = self.timer.lock() {
            if let Some(old) = slot.replace(handle) {
                old.cancel();
            }
        }
    }

    fn cancel_timer(&self) {
        if let Ok(mut slot) = self.timer.lock() {
            if let Some(old) = slot.take() {
                old.cancel();
            }
        }
    }
}
