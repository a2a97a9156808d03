//! Session timer for quests.
//!
//! Works on wall-clock instants supplied by the caller -- no internal
//! thread, no stored "live" value. The running session is represented only
//! by `last_started_at`, so a quest survives app suspension: whatever the
//! process was doing, the live value is recomputed from the persisted start.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --stop--> Idle
//! ```

use chrono::{DateTime, Utc};

use crate::error::TimerError;
use crate::model::Quest;

/// Begin a session at `now`.
///
/// Returns `AlreadyActive` and leaves the quest untouched if a session is
/// already running.
pub fn start(quest: &mut Quest, now: DateTime<Utc>) -> Result<(), TimerError> {
    if quest.is_timer_active {
        return Err(TimerError::AlreadyActive);
    }
    quest.last_started_at = Some(now);
    quest.is_timer_active = true;
    Ok(())
}

/// End the running session at `now` and fold it into `time_spent_secs`.
///
/// Returns the seconds added. A `now` earlier than the session start adds
/// nothing.
pub fn stop(quest: &mut Quest, now: DateTime<Utc>) -> Result<u64, TimerError> {
    if !quest.is_timer_active {
        return Err(TimerError::NotActive);
    }
    let elapsed = session_secs(quest.last_started_at, now);
    quest.time_spent_secs = quest.time_spent_secs.saturating_add(elapsed);
    quest.is_timer_active = false;
    quest.last_started_at = None;
    Ok(elapsed)
}

/// Accumulated time plus the running session, in seconds.
pub fn live_elapsed(quest: &Quest, now: DateTime<Utc>) -> u64 {
    let running = if quest.is_timer_active {
        session_secs(quest.last_started_at, now)
    } else {
        0
    };
    quest.time_spent_secs.saturating_add(running)
}

/// Drop all accumulated time and any running session.
pub fn reset(quest: &mut Quest) {
    quest.time_spent_secs = 0;
    quest.is_timer_active = false;
    quest.last_started_at = None;
}

fn session_secs(started: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u64 {
    started
        .map(|at| (now - at).num_seconds().max(0) as u64)
        .unwrap_or(0)
}
