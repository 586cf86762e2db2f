use crate::constraints::{available_rooms, is_professor_assigned_to_group_on_day, is_professor_busy};
use crate::data::{
    Catalog, ConstraintViolation, ProfessorId, ProfessorRecord, Registry, Schedule,
    ScheduleEntry, TimetableOutput, TimetableRow, Variable,
};
use crate::ranking::rank_by_scarcity;
use itertools::{Itertools, iproduct};
use log::{debug, info, trace};
use rand::Rng;
use rand::seq::IndexedRandom;
use std::collections::HashMap;
use std::time::Instant;

/// Greedy single-pass timetable builder.
///
/// Every (group, weekday, slot) variable is visited once, group-major, and
/// gets the first feasible professor in scarcity order together with a random
/// subject of theirs and a random free room. Nothing is revisited: a variable
/// with no feasible professor or no free room stays a free period even when a
/// different earlier choice would have made room for it.
///
/// The catalog is borrowed mutably for the lifetime of the solve; professors'
/// `current_hours` are bumped in place as assignments are made.
pub struct Csp<'a, R: Rng> {
    variables: Vec<Variable>,
    domains: HashMap<Variable, Vec<ProfessorId>>,
    catalog: &'a mut Catalog,
    schedule: Schedule,
    rng: R,
}

impl<'a, R: Rng> Csp<'a, R> {
    pub fn new(catalog: &'a mut Catalog, rng: R) -> Self {
        let variables: Vec<Variable> = iproduct!(&catalog.groups, &catalog.weekdays, &catalog.slots)
            .map(|(group, weekday, slot)| Variable::new(group, weekday, slot))
            .collect();
        let domains = initialize_domains(&variables, &catalog.professors);
        info!(
            "Set up timetable with {} groups, {} weekdays, {} slots ({} variables), {} rooms and {} professors",
            catalog.groups.len(),
            catalog.weekdays.len(),
            catalog.slots.len(),
            variables.len(),
            catalog.rooms.len(),
            catalog.professors.len()
        );
        Self {
            variables,
            domains,
            catalog,
            schedule: Schedule::new(),
            rng,
        }
    }

    /// Variables in traversal order.
    #[cfg(test)]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    #[cfg(test)]
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Tries to fill `variable`, committing to the schedule on success.
    pub fn assign_one(&mut self, variable: &Variable) -> bool {
        let domain = self
            .domains
            .get(variable)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let feasible = feasible_professors(variable, domain, &self.catalog.professors, &self.schedule);
        if feasible.is_empty() {
            trace!("{variable}: no feasible professor");
            return false;
        }

        let mut choice = None;
        for (id, record) in rank_by_scarcity(feasible) {
            let Some(subject) = record.subjects.choose(&mut self.rng) else {
                continue;
            };
            let rooms = available_rooms(
                &self.catalog.rooms,
                &variable.weekday,
                &variable.slot,
                &self.schedule,
            );
            if let Some(room) = rooms.choose(&mut self.rng) {
                choice = Some((id.to_string(), subject.clone(), room.to_string()));
                break;
            }
        }

        let Some((professor, subject, room)) = choice else {
            trace!("{variable}: no free room for any candidate");
            return false;
        };

        trace!("{variable}: {professor} teaches {subject} in {room}");
        let committed = self.schedule.commit(
            variable.clone(),
            ScheduleEntry::Assigned {
                professor: professor.clone(),
                subject,
                room,
            },
        );
        if committed && let Some(record) = self.catalog.professors.get_mut(&professor) {
            record.current_hours += 1;
            debug_assert!(record.current_hours <= record.max_hours);
        }
        committed
    }

    /// Runs the single pass over every variable and returns the finished schedule.
    pub fn solve(mut self) -> Schedule {
        let start_time = Instant::now();
        let variables = std::mem::take(&mut self.variables);
        let mut unassigned = 0;
        for variable in &variables {
            if self.schedule.get(variable).is_some() {
                continue;
            }
            if !self.assign_one(variable) {
                unassigned += 1;
                let committed = self
                    .schedule
                    .commit(variable.clone(), ScheduleEntry::Unassigned);
                debug_assert!(committed, "{variable} was committed twice");
            }
        }
        info!(
            "Timetable built in {:.2?}: {} entries, {} assigned, {} free",
            start_time.elapsed(),
            self.schedule.len(),
            variables.len() - unassigned,
            unassigned
        );
        self.schedule
    }
}

// professors from `domain` that are free in this period, under quota and not
// yet teaching this group today
fn feasible_professors<'c>(
    variable: &Variable,
    domain: &[ProfessorId],
    professors: &'c Registry,
    schedule: &Schedule,
) -> Vec<(&'c str, &'c ProfessorRecord)> {
    let Variable {
        group,
        weekday,
        slot,
    } = variable;
    domain
        .iter()
        .filter_map(|id| professors.get_key_value(id))
        .filter(|(id, record)| {
            !is_professor_busy(id, weekday, slot, schedule)
                && record.has_capacity()
                && !is_professor_assigned_to_group_on_day(id, group, weekday, schedule)
        })
        .map(|(id, record)| (id.as_str(), record))
        .collect()
}

// every professor with at least one subject is a candidate for every variable
fn initialize_domains(
    variables: &[Variable],
    professors: &Registry,
) -> HashMap<Variable, Vec<ProfessorId>> {
    let eligible: Vec<ProfessorId> = professors
        .iter()
        .filter(|(_, record)| !record.subjects.is_empty())
        .map(|(id, _)| id.clone())
        .collect();
    debug!(
        "{} of {} professors are eligible",
        eligible.len(),
        professors.len()
    );
    variables
        .iter()
        .map(|variable| (variable.clone(), eligible.clone()))
        .collect()
}

/// Re-checks the hard constraints against a finished schedule.
pub fn audit(schedule: &Schedule, professors: &Registry) -> Vec<ConstraintViolation> {
    let mut violations = Vec::new();

    let by_period: HashMap<(&str, &str), Vec<(&Variable, &ScheduleEntry)>> = schedule
        .assigned()
        .map(|(v, e)| ((v.weekday.as_str(), v.slot.as_str()), (v, e)))
        .into_group_map();
    for ((weekday, slot), entries) in by_period.iter().sorted_by_key(|(k, _)| **k) {
        for professor in entries.iter().filter_map(|(_, e)| e.professor()).duplicates() {
            violations.push(ConstraintViolation {
                constraint_type: "Professor Time Conflict".to_string(),
                description: format!("{professor} teaches more than one group on {weekday} at {slot}."),
            });
        }
        for room in entries.iter().filter_map(|(_, e)| e.room()).duplicates() {
            violations.push(ConstraintViolation {
                constraint_type: "Room Conflict".to_string(),
                description: format!("Room {room} is used by more than one group on {weekday} at {slot}."),
            });
        }
    }

    let by_group_day: HashMap<(&str, &str), Vec<&str>> = schedule
        .assigned()
        .filter_map(|(v, e)| e.professor().map(|p| ((v.group.as_str(), v.weekday.as_str()), p)))
        .into_group_map();
    for ((group, weekday), professors_that_day) in by_group_day.iter().sorted_by_key(|(k, _)| **k) {
        for professor in professors_that_day.iter().duplicates() {
            violations.push(ConstraintViolation {
                constraint_type: "Professor Group Per Day".to_string(),
                description: format!("{professor} teaches group {group} more than once on {weekday}."),
            });
        }
    }

    let hours = schedule.assigned().filter_map(|(_, e)| e.professor()).counts();
    for (professor, taught) in hours.iter().sorted() {
        let taught_hours = u32::try_from(*taught).unwrap_or(u32::MAX);
        let within_quota = professors.get(*professor).is_some_and(|record| {
            taught_hours <= record.max_hours && record.current_hours <= record.max_hours
        });
        if !within_quota {
            violations.push(ConstraintViolation {
                constraint_type: "Hour Quota".to_string(),
                description: format!("{professor} is scheduled for {taught} hours, over their quota."),
            });
        }
    }

    violations
}

/// Flattens a schedule into rows in traversal order.
pub fn build_output(schedule: &Schedule, violations: Vec<ConstraintViolation>) -> TimetableOutput {
    let entries: Vec<TimetableRow> = schedule
        .iter()
        .map(|(variable, entry)| {
            let (professor, subject, room) = entry.as_triple();
            let subject_type = match entry {
                ScheduleEntry::Assigned { subject, .. } => subject.kind.clone(),
                ScheduleEntry::Unassigned => None,
            };
            TimetableRow {
                group: variable.group.clone(),
                weekday: variable.weekday.clone(),
                slot: variable.slot.clone(),
                assigned: entry.is_assigned(),
                professor: professor.to_string(),
                subject: subject.to_string(),
                subject_type,
                room: room.to_string(),
            }
        })
        .collect();
    let assigned_count = entries.iter().filter(|row| row.assigned).count();
    TimetableOutput {
        unassigned_count: entries.len() - assigned_count,
        assigned_count,
        entries,
        violations,
    }
}
