//! Heartbeat-driven presence tracking.
//!
//! Membership is never torn down: a participant row is created on first
//! contact and refreshed by every heartbeat, and absence is derived at read
//! time from heartbeat age. A client that disappears silently simply ages
//! out of the live count, and one that resumes heartbeating reappears with
//! no rejoin bookkeeping.

use std::time::{Duration, SystemTime};

use dashmap::{DashMap, mapref::entry::Entry};
use uuid::Uuid;

/// One user's membership in one room.
#[derive(Debug, Clone)]
pub struct Participant {
    /// Owning room.
    pub room_id: Uuid,
    /// Identity supplied by the external auth layer.
    pub user_id: String,
    /// First time this user contacted the room.
    pub joined_at: SystemTime,
    /// Most recent heartbeat (join itself counts as one).
    pub last_heartbeat_at: SystemTime,
}

/// In-memory participant table keyed by `(room_id, user_id)`.
#[derive(Default)]
pub struct PresenceTracker {
    participants: DashMap<(Uuid, String), Participant>,
}

impl PresenceTracker {
    /// Construct an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user in a room, or refresh their heartbeat if already
    /// registered. Join and heartbeat deliberately share this one upsert so
    /// a client that polls before it formally joins ends up in the same row.
    pub fn join(&self, room_id: Uuid, user_id: &str, now: SystemTime) -> Participant {
        match self.participants.entry((room_id, user_id.to_owned())) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().last_heartbeat_at = now;
                entry.get().clone()
            }
            Entry::Vacant(slot) => slot
                .insert(Participant {
                    room_id,
                    user_id: user_id.to_owned(),
                    joined_at: now,
                    last_heartbeat_at: now,
                })
                .clone(),
        }
    }

    /// Record a heartbeat, implicitly joining if the row does not exist yet.
    pub fn heartbeat(&self, room_id: Uuid, user_id: &str, now: SystemTime) {
        self.join(room_id, user_id, now);
    }

    /// Count participants whose last heartbeat is at most `timeout` old.
    ///
    /// Pure read; absence is never written back. A heartbeat that reads as
    /// being in the future (clock adjustment) counts as present.
    pub fn active_count(&self, room_id: Uuid, now: SystemTime, timeout: Duration) -> usize {
        self.participants
            .iter()
            .filter(|entry| entry.key().0 == room_id)
            .filter(|entry| {
                now.duration_since(entry.value().last_heartbeat_at)
                    .map(|age| age <= timeout)
                    .unwrap_or(true)
            })
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(30);
    // Wide enough that age never excludes anyone; counts rows, effectively.
    const FOREVER: Duration = Duration::from_secs(u64::MAX / 2);

    fn t(offset: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + offset)
    }

    #[test]
    fn join_twice_keeps_a_single_row() {
        let tracker = PresenceTracker::new();
        let room_id = Uuid::new_v4();

        let first = tracker.join(room_id, "user-a", t(0));
        let second = tracker.join(room_id, "user-a", t(5));

        assert_eq!(first.joined_at, t(0));
        assert_eq!(second.joined_at, t(0));
        assert_eq!(second.last_heartbeat_at, t(5));
        assert_eq!(tracker.active_count(room_id, t(5), FOREVER), 1);
    }

    #[test]
    fn heartbeat_before_join_creates_the_row() {
        let tracker = PresenceTracker::new();
        let room_id = Uuid::new_v4();

        tracker.heartbeat(room_id, "user-a", t(0));
        assert_eq!(tracker.active_count(room_id, t(0), TIMEOUT), 1);
    }

    #[test]
    fn timeout_boundary_is_inclusive() {
        let tracker = PresenceTracker::new();
        let room_id = Uuid::new_v4();
        tracker.join(room_id, "user-a", t(0));

        assert_eq!(tracker.active_count(room_id, t(29), TIMEOUT), 1);
        assert_eq!(tracker.active_count(room_id, t(30), TIMEOUT), 1);
        assert_eq!(tracker.active_count(room_id, t(31), TIMEOUT), 0);
    }

    #[test]
    fn lapsed_participant_reappears_on_next_heartbeat() {
        let tracker = PresenceTracker::new();
        let room_id = Uuid::new_v4();
        tracker.join(room_id, "user-a", t(0));

        assert_eq!(tracker.active_count(room_id, t(100), TIMEOUT), 0);

        tracker.heartbeat(room_id, "user-a", t(100));
        assert_eq!(tracker.active_count(room_id, t(100), TIMEOUT), 1);
        // Still one row, not a fresh membership.
        assert_eq!(tracker.active_count(room_id, t(100), FOREVER), 1);
    }

    #[test]
    fn counts_are_scoped_to_the_room() {
        let tracker = PresenceTracker::new();
        let room_a = Uuid::new_v4();
        let room_b = Uuid::new_v4();

        tracker.join(room_a, "user-a", t(0));
        tracker.join(room_b, "user-a", t(0));
        tracker.join(room_b, "user-b", t(0));

        assert_eq!(tracker.active_count(room_a, t(0), TIMEOUT), 1);
        assert_eq!(tracker.active_count(room_b, t(0), TIMEOUT), 2);
    }

    #[test]
    fn silent_client_ages_out_while_steady_one_stays() {
        let tracker = PresenceTracker::new();
        let room_id = Uuid::new_v4();

        tracker.join(room_id, "steady", t(0));
        tracker.join(room_id, "silent", t(0));

        for offset in [10, 20, 30] {
            tracker.heartbeat(room_id, "steady", t(offset));
        }

        assert_eq!(tracker.active_count(room_id, t(31), TIMEOUT), 1);
    }

    #[test]
    fn future_heartbeat_counts_as_present() {
        let tracker = PresenceTracker::new();
        let room_id = Uuid::new_v4();
        tracker.join(room_id, "user-a", t(60));

        assert_eq!(tracker.active_count(room_id, t(0), TIMEOUT), 1);
    }
}
