//! Time-overlap and speaker double-booking checks.
//!
//! # Responsibility
//! - Resolve the interval a cached session occupies.
//! - Scan the cached tree for sessions overlapping a proposed interval.
//!
//! # Invariants
//! - Pure reads: the tree is never mutated and results are never cached.
//! - Overlap is half-open: `[a0,a1)` and `[b0,b1)` overlap iff `b0 < a1 && a0 < b1`.
//! - Results are owned snapshots in tree order.
//!
//! # See also
//! - `model::interval::TimeInterval`

use crate::model::ids::EntityId;
use crate::model::interval::TimeInterval;
use crate::model::programme::TimeSlot;
use crate::model::session::Session;
use crate::store::ProgrammeTree;
use serde::{Deserialize, Serialize};

/// Which instants define a session's interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalPolicy {
    /// Each bound is the session override when set, else the slot's bound.
    #[default]
    InheritSlot,
    /// Only the session's own instants count; sessions missing either are skipped.
    SessionOnly,
}

/// Returns the interval `session` occupies inside `slot`, if it has one.
pub fn resolve_session_interval(
    session: &Session,
    slot: &TimeSlot,
    policy: IntervalPolicy,
) -> Option<TimeInterval> {
    match policy {
        IntervalPolicy::InheritSlot => Some(TimeInterval::new(
            session.start_time.unwrap_or(slot.start_time),
            session.end_time.unwrap_or(slot.end_time),
        )),
        IntervalPolicy::SessionOnly => match (session.start_time, session.end_time) {
            (Some(start), Some(end)) => Some(TimeInterval::new(start, end)),
            _ => None,
        },
    }
}

/// Every cached session overlapping `proposed`, except `exclude`.
pub fn check_time_conflicts(
    tree: &ProgrammeTree,
    proposed: TimeInterval,
    exclude: Option<&EntityId>,
    policy: IntervalPolicy,
) -> Vec<Session> {
    overlapping(tree, proposed, exclude, policy, |_| true)
}

/// Like [`check_time_conflicts`], restricted to sessions where `speaker_id`
/// is the speaker, the moderator or a panelist.
pub fn check_speaker_conflicts(
    tree: &ProgrammeTree,
    speaker_id: &EntityId,
    proposed: TimeInterval,
    exclude: Option<&EntityId>,
    policy: IntervalPolicy,
) -> Vec<Session> {
    overlapping(tree, proposed, exclude, policy, |session| {
        session.involves_speaker(speaker_id)
    })
}

fn overlapping(
    tree: &ProgrammeTree,
    proposed: TimeInterval,
    exclude: Option<&EntityId>,
    policy: IntervalPolicy,
    keep: impl Fn(&Session) -> bool,
) -> Vec<Session> {
    tree.scheduled_sessions()
        .filter(|(_, session)| exclude != Some(&session.id))
        .filter(|(_, session)| keep(*session))
        .filter(|(slot, session)| {
            resolve_session_interval(session, slot, policy)
                .is_some_and(|interval| interval.overlaps(&proposed))
        })
        .map(|(_, session)| session.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        check_speaker_conflicts, check_time_conflicts, resolve_session_interval, IntervalPolicy,
    };
    use crate::model::ids::EntityId;
    use crate::model::interval::TimeInterval;
    use crate::model::programme::{Day, Programme, TimeSlot};
    use crate::model::session::{Session, SessionType};
    use crate::store::ProgrammeTree;
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, hour, minute, 0).unwrap()
    }

    fn window(from: (u32, u32), to: (u32, u32)) -> TimeInterval {
        TimeInterval::new(at(from.0, from.1), at(to.0, to.1))
    }

    /// A=[09:00,10:00) with speaker sp-1, B=[10:00,11:00) moderated by sp-2.
    fn fixture() -> ProgrammeTree {
        let mut day = Day::new("d1", "evt", 1, NaiveDate::from_ymd_opt(2026, 5, 4).unwrap());
        let mut morning = TimeSlot::new("slot-a", "d1", at(9, 0), at(10, 0));
        let mut a = Session::new("A", "slot-a", "Opening keynote", SessionType::Keynote);
        a.speaker_id = Some(EntityId::from("sp-1"));
        morning.sessions.push(a);

        let mut late = TimeSlot::new("slot-b", "d1", at(10, 0), at(11, 0));
        let mut b = Session::new("B", "slot-b", "Panel", SessionType::Panel);
        b.moderator_id = Some(EntityId::from("sp-2"));
        b.panelist_ids = vec![EntityId::from("sp-3")];
        late.sessions.push(b);

        day.time_slots = vec![late, morning];
        let mut programme = Programme::new("evt");
        programme.days.push(day);
        let mut tree = ProgrammeTree::new();
        tree.replace_programme(programme);
        tree
    }

    fn ids(sessions: &[Session]) -> Vec<&str> {
        sessions.iter().map(|session| session.id.as_str()).collect()
    }

    #[test]
    fn time_conflicts_follow_half_open_overlap() {
        let tree = fixture();
        let policy = IntervalPolicy::InheritSlot;
        assert_eq!(
            ids(&check_time_conflicts(&tree, window((9, 30), (9, 45)), None, policy)),
            vec!["A"]
        );
        assert_eq!(
            ids(&check_time_conflicts(&tree, window((10, 0), (10, 30)), None, policy)),
            vec!["B"]
        );
        assert_eq!(
            ids(&check_time_conflicts(&tree, window((9, 0), (11, 0)), None, policy)),
            vec!["A", "B"]
        );
        assert!(check_time_conflicts(&tree, window((11, 0), (12, 0)), None, policy).is_empty());
    }

    #[test]
    fn excluded_session_is_skipped() {
        let tree = fixture();
        let conflicts = check_time_conflicts(
            &tree,
            window((9, 0), (11, 0)),
            Some(&EntityId::from("A")),
            IntervalPolicy::InheritSlot,
        );
        assert_eq!(ids(&conflicts), vec!["B"]);
    }

    #[test]
    fn speaker_conflicts_require_a_role() {
        let tree = fixture();
        let policy = IntervalPolicy::InheritSlot;
        let all_day = window((8, 0), (12, 0));

        let sp1 = check_speaker_conflicts(&tree, &EntityId::from("sp-1"), all_day, None, policy);
        assert_eq!(ids(&sp1), vec!["A"]);
        let sp2 = check_speaker_conflicts(&tree, &EntityId::from("sp-2"), all_day, None, policy);
        assert_eq!(ids(&sp2), vec!["B"]);
        let sp3 = check_speaker_conflicts(&tree, &EntityId::from("sp-3"), all_day, None, policy);
        assert_eq!(ids(&sp3), vec!["B"]);
        let nobody = check_speaker_conflicts(&tree, &EntityId::from("sp-9"), all_day, None, policy);
        assert!(nobody.is_empty());
    }

    #[test]
    fn inherit_slot_resolves_bounds_independently() {
        let slot = TimeSlot::new("slot", "d1", at(9, 0), at(11, 0));
        let mut session = Session::new("s", "slot", "Talk", SessionType::Keynote);
        session.start_time = Some(at(9, 30));

        let interval = resolve_session_interval(&session, &slot, IntervalPolicy::InheritSlot)
            .expect("inherited bounds");
        assert_eq!(interval, window((9, 30), (11, 0)));
        assert!(resolve_session_interval(&session, &slot, IntervalPolicy::SessionOnly).is_none());

        session.end_time = Some(at(10, 0));
        let own = resolve_session_interval(&session, &slot, IntervalPolicy::SessionOnly)
            .expect("own bounds");
        assert_eq!(own, window((9, 30), (10, 0)));
    }

    #[test]
    fn session_only_policy_skips_sessions_without_instants() {
        let tree = fixture();
        let conflicts = check_time_conflicts(
            &tree,
            window((9, 0), (11, 0)),
            None,
            IntervalPolicy::SessionOnly,
        );
        assert!(conflicts.is_empty());
    }
}
