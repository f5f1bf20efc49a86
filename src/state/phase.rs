//! Pure phase arithmetic: an immutable start instant plus the current time
//! fully determines where a room is in its focus/break cycle.

use std::time::SystemTime;

/// Where a running room currently sits in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSnapshot {
    /// `true` while the room is in its focus interval, `false` during break.
    pub is_focus: bool,
    /// Whole seconds until the current interval ends.
    pub seconds_remaining: u64,
}

/// Compute the current phase of a room that started counting at `started_at`.
///
/// The focus interval owns `[0, focus_seconds)` of each cycle and the break
/// interval owns `[focus_seconds, focus_seconds + break_seconds)`, so the
/// exact boundary second already belongs to the next interval. Elapsed time
/// is clamped at zero in case `now` reads earlier than `started_at` (clock
/// adjustment between the start write and a poll).
///
/// Callers must only invoke this for rooms that have started; a lobby room
/// has no phase. `focus_seconds` and `break_seconds` are positive by the
/// room construction invariant.
pub fn compute(
    focus_seconds: u32,
    break_seconds: u32,
    started_at: SystemTime,
    now: SystemTime,
) -> PhaseSnapshot {
    let cycle = u64::from(focus_seconds) + u64::from(break_seconds);
    let elapsed = now
        .duration_since(started_at)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let within = elapsed % cycle;

    if within < u64::from(focus_seconds) {
        PhaseSnapshot {
            is_focus: true,
            seconds_remaining: u64::from(focus_seconds) - within,
        }
    } else {
        PhaseSnapshot {
            is_focus: false,
            seconds_remaining: cycle - within,
        }
    }
}
