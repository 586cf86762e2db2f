use crate::data::{RoomId, Schedule};
use std::collections::HashSet;

// a professor cannot teach two groups in the same period
pub fn is_professor_busy(professor: &str, weekday: &str, slot: &str, schedule: &Schedule) -> bool {
    schedule.assigned().any(|(variable, entry)| {
        variable.weekday == weekday
            && variable.slot == slot
            && entry.professor() == Some(professor)
    })
}

// a professor teaches a given group at most once per day
pub fn is_professor_assigned_to_group_on_day(
    professor: &str,
    group: &str,
    weekday: &str,
    schedule: &Schedule,
) -> bool {
    schedule.assigned().any(|(variable, entry)| {
        variable.group == group
            && variable.weekday == weekday
            && entry.professor() == Some(professor)
    })
}

/// Rooms from `rooms` not yet taken by any group in this period, in catalog order.
pub fn available_rooms<'r>(
    rooms: &'r [RoomId],
    weekday: &str,
    slot: &str,
    schedule: &Schedule,
) -> Vec<&'r str> {
    let occupied: HashSet<&str> = schedule
        .assigned()
        .filter(|(variable, _)| variable.weekday == weekday && variable.slot == slot)
        .filter_map(|(_, entry)| entry.room())
        .collect();

    rooms
        .iter()
        .map(String::as_str)
        .filter(|room| !occupied.contains(room))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ScheduleEntry, Subject, Variable};

    fn assigned(professor: &str, room: &str) -> ScheduleEntry {
        ScheduleEntry::Assigned {
            professor: professor.into(),
            subject: Subject::named("Algebra"),
            room: room.into(),
        }
    }

    fn rooms() -> Vec<RoomId> {
        vec!["101".into(), "102".into(), "103".into()]
    }

    fn sample_schedule() -> Schedule {
        let mut schedule = Schedule::new();
        schedule.commit(Variable::new("G1", "Mon", "08:00"), assigned("Smith", "101"));
        schedule.commit(Variable::new("G2", "Mon", "08:00"), assigned("Jones", "103"));
        schedule.commit(Variable::new("G1", "Mon", "10:00"), ScheduleEntry::Unassigned);
        schedule.commit(Variable::new("G1", "Tue", "08:00"), assigned("Brown", "102"));
        schedule
    }

    #[test]
    fn test_busy_across_groups() {
        let schedule = sample_schedule();
        assert!(is_professor_busy("Smith", "Mon", "08:00", &schedule));
        assert!(is_professor_busy("Jones", "Mon", "08:00", &schedule));
        assert!(!is_professor_busy("Smith", "Mon", "10:00", &schedule));
        assert!(!is_professor_busy("Smith", "Tue", "08:00", &schedule));
        assert!(!is_professor_busy("Brown", "Mon", "08:00", &schedule));
    }

    #[test]
    fn test_sentinel_never_makes_anyone_busy() {
        let schedule = sample_schedule();
        assert!(!is_professor_busy("Free", "Mon", "10:00", &schedule));
        assert_eq!(available_rooms(&rooms(), "Mon", "10:00", &schedule).len(), 3);
    }

    #[test]
    fn test_assigned_to_group_on_day() {
        let schedule = sample_schedule();
        assert!(is_professor_assigned_to_group_on_day("Smith", "G1", "Mon", &schedule));
        assert!(!is_professor_assigned_to_group_on_day("Smith", "G2", "Mon", &schedule));
        assert!(!is_professor_assigned_to_group_on_day("Smith", "G1", "Tue", &schedule));
        assert!(is_professor_assigned_to_group_on_day("Jones", "G2", "Mon", &schedule));
    }

    #[test]
    fn test_available_rooms() {
        let rooms = rooms();
        let schedule = sample_schedule();
        assert_eq!(available_rooms(&rooms, "Mon", "08:00", &schedule), vec!["102"]);
        assert_eq!(available_rooms(&rooms, "Tue", "08:00", &schedule), vec!["101", "103"]);
    }

    #[test]
    fn test_empty_schedule_frees_every_room() {
        let rooms = rooms();
        let schedule = Schedule::new();
        assert_eq!(
            available_rooms(&rooms, "Wed", "12:00", &schedule),
            vec!["101", "102", "103"]
        );
        assert!(!is_professor_busy("Smith", "Wed", "12:00", &schedule));
    }

    #[test]
    fn test_queries_are_idempotent() {
        let rooms = rooms();
        let schedule = sample_schedule();
        let first = available_rooms(&rooms, "Mon", "08:00", &schedule);
        let second = available_rooms(&rooms, "Mon", "08:00", &schedule);
        assert_eq!(first, second);
        assert_eq!(
            is_professor_busy("Smith", "Mon", "08:00", &schedule),
            is_professor_busy("Smith", "Mon", "08:00", &schedule)
        );
    }
}
