use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use programme_core::{Day, EntityId, ProgrammeTree, Session, SessionType, TimeSlot};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    UpsertDay { day: u8, number: u32 },
    RemoveDay { day: u8 },
    UpsertSlot { day: u8, slot: u8, start: i64 },
    RemoveSlot { slot: u8 },
    UpsertSession { slot: u8, session: u8, offset: Option<i64> },
    RemoveSession { session: u8 },
}

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 8, 0, 0).unwrap()
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..5, 1u32..8).prop_map(|(day, number)| Op::UpsertDay { day, number }),
        (0u8..5).prop_map(|day| Op::RemoveDay { day }),
        (0u8..5, 0u8..8, 0i64..600).prop_map(|(day, slot, start)| Op::UpsertSlot { day, slot, start }),
        (0u8..8).prop_map(|slot| Op::RemoveSlot { slot }),
        (0u8..8, 0u8..12, proptest::option::of(0i64..120))
            .prop_map(|(slot, session, offset)| Op::UpsertSession { slot, session, offset }),
        (0u8..12).prop_map(|session| Op::RemoveSession { session }),
    ]
}

fn apply(tree: &mut ProgrammeTree, op: Op) {
    match op {
        Op::UpsertDay { day, number } => {
            let date = NaiveDate::from_ymd_opt(2026, 5, number).unwrap();
            tree.insert_day(Day::new(format!("d{day}"), "evt", number, date));
        }
        Op::RemoveDay { day } => {
            tree.remove_day(&EntityId::new(format!("d{day}")));
        }
        Op::UpsertSlot { day, slot, start } => {
            let start = base() + Duration::minutes(start);
            tree.insert_time_slot(TimeSlot::new(
                format!("t{slot}"),
                format!("d{day}"),
                start,
                start + Duration::minutes(60),
            ));
        }
        Op::RemoveSlot { slot } => {
            tree.remove_time_slot(&EntityId::new(format!("t{slot}")));
        }
        Op::UpsertSession { slot, session, offset } => {
            let mut value = Session::new(
                format!("s{session}"),
                format!("t{slot}"),
                "Generated",
                SessionType::Panel,
            );
            value.start_time = offset.map(|minutes| base() + Duration::minutes(minutes));
            tree.insert_session(value);
        }
        Op::RemoveSession { session } => {
            tree.remove_session(&EntityId::new(format!("s{session}")));
        }
    }
}

fn assert_ordered(tree: &ProgrammeTree) -> Result<(), TestCaseError> {
    let days = tree.days();
    prop_assert!(days.windows(2).all(|pair| pair[0].day_number <= pair[1].day_number));
    for day in days {
        prop_assert!(day
            .time_slots
            .windows(2)
            .all(|pair| pair[0].start_time <= pair[1].start_time));
        for slot in &day.time_slots {
            let sessions_ordered = slot.sessions.windows(2).all(|pair| {
                pair[0].effective_start(slot.start_time) <= pair[1].effective_start(slot.start_time)
            });
            prop_assert!(sessions_ordered);
            for session in &slot.sessions {
                prop_assert_eq!(tree.slot_of_session(&session.id), Some(&slot.id));
            }
        }
    }
    Ok(())
}

proptest! {
    #[test]
    fn every_mutation_sequence_keeps_tree_sorted_and_indexed(ops in proptest::collection::vec(op_strategy(), 1..60)) {
        let mut tree = ProgrammeTree::new();
        for op in ops {
            apply(&mut tree, op);
            assert_ordered(&tree)?;
        }
    }

    #[test]
    fn selection_never_dangles(ops in proptest::collection::vec(op_strategy(), 1..60), pick in 0u8..12) {
        let mut tree = ProgrammeTree::new();
        for op in ops {
            apply(&mut tree, op);
            let session_id = EntityId::new(format!("s{pick}"));
            tree.select_session(Some(&session_id));
            if let Some(current) = tree.current_session() {
                prop_assert!(tree.session(&current.id).is_some());
            }
        }
        if let Some(current) = tree.current_session() {
            prop_assert!(tree.sessions().any(|session| session.id == current.id));
        }
    }
}

#[test]
fn sessions_view_follows_day_then_slot_order() {
    let mut tree = ProgrammeTree::new();
    let date = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
    tree.insert_day(Day::new("d2", "evt", 2, date));
    tree.insert_day(Day::new("d1", "evt", 1, date));
    tree.insert_time_slot(TimeSlot::new("late", "d1", base() + Duration::hours(3), base() + Duration::hours(4)));
    tree.insert_time_slot(TimeSlot::new("other-day", "d2", base(), base() + Duration::hours(1)));
    tree.insert_time_slot(TimeSlot::new("early", "d1", base(), base() + Duration::hours(1)));
    tree.insert_session(Session::new("c", "other-day", "C", SessionType::Lunch));
    tree.insert_session(Session::new("b", "late", "B", SessionType::Tea));
    tree.insert_session(Session::new("a", "early", "A", SessionType::Keynote));

    let order: Vec<&str> = tree.sessions().map(|session| session.id.as_str()).collect();
    assert_eq!(order, vec!["a", "b", "c"]);
}
