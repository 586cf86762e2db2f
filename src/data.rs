use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

// Type aliases for clarity
pub type GroupId = String;
pub type Weekday = String;
pub type Slot = String;
pub type RoomId = String;
pub type ProfessorId = String;

/// Professor registry keyed by id. Iteration is lexical by id, which fixes the
/// order candidates are considered in.
pub type Registry = BTreeMap<ProfessorId, ProfessorRecord>;

pub const FREE_PROFESSOR: &str = "Free";
pub const FREE_SUBJECT: &str = "No subject";
pub const FREE_ROOM: &str = "No room";

/// A subject a professor may teach, optionally tagged with its class type
/// (lecture, lab, seminar...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "SubjectSpec")]
pub struct Subject {
    #[serde(rename = "subject")]
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[cfg(test)]
impl Subject {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
        }
    }

    pub fn typed(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: Some(kind.into()),
        }
    }
}

// catalogs list subjects either as bare names or as {subject, type} objects
#[derive(Deserialize)]
#[serde(untagged)]
enum SubjectSpec {
    Plain(String),
    Tagged {
        subject: String,
        #[serde(rename = "type", default)]
        kind: Option<String>,
    },
}

impl From<SubjectSpec> for Subject {
    fn from(spec: SubjectSpec) -> Self {
        match spec {
            SubjectSpec::Plain(name) => Subject { name, kind: None },
            SubjectSpec::Tagged { subject, kind } => Subject {
                name: subject,
                kind,
            },
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            Some(kind) => write!(f, "{} ({})", self.name, kind),
            None => f.write_str(&self.name),
        }
    }
}

/// What a professor can teach and how many hours they have left to give.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessorRecord {
    pub subjects: Vec<Subject>,
    #[serde(alias = "max_hours")]
    pub max_hours: u32,
    #[serde(alias = "current_hours", default)]
    pub current_hours: u32,
}

impl ProfessorRecord {
    #[cfg(test)]
    pub fn new(subjects: Vec<Subject>, max_hours: u32) -> Self {
        Self {
            subjects,
            max_hours,
            current_hours: 0,
        }
    }

    pub fn remaining_hours(&self) -> u32 {
        self.max_hours.saturating_sub(self.current_hours)
    }

    pub fn has_capacity(&self) -> bool {
        self.current_hours < self.max_hours
    }
}

/// The static input: the timetable grid, the rooms and the professor registry.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    pub groups: Vec<GroupId>,
    pub weekdays: Vec<Weekday>,
    pub slots: Vec<Slot>,
    pub rooms: Vec<RoomId>,
    pub professors: Registry,
}

/// One teaching period of one group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Variable {
    pub group: GroupId,
    pub weekday: Weekday,
    pub slot: Slot,
}

impl Variable {
    pub fn new(group: &str, weekday: &str, slot: &str) -> Self {
        Self {
            group: group.to_string(),
            weekday: weekday.to_string(),
            slot: slot.to_string(),
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.group, self.weekday, self.slot)
    }
}

/// The value committed for a variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleEntry {
    Assigned {
        professor: ProfessorId,
        subject: Subject,
        room: RoomId,
    },
    Unassigned,
}

impl ScheduleEntry {
    pub fn professor(&self) -> Option<&str> {
        match self {
            ScheduleEntry::Assigned { professor, .. } => Some(professor),
            ScheduleEntry::Unassigned => None,
        }
    }

    pub fn room(&self) -> Option<&str> {
        match self {
            ScheduleEntry::Assigned { room, .. } => Some(room),
            ScheduleEntry::Unassigned => None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        matches!(self, ScheduleEntry::Assigned { .. })
    }

    /// (professor, subject, room), with the sentinel strings for a free period.
    pub fn as_triple(&self) -> (&str, &str, &str) {
        match self {
            ScheduleEntry::Assigned {
                professor,
                subject,
                room,
            } => (professor, &subject.name, room),
            ScheduleEntry::Unassigned => (FREE_PROFESSOR, FREE_SUBJECT, FREE_ROOM),
        }
    }
}

/// Variable -> entry mapping, remembering commit order.
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    order: Vec<Variable>,
    entries: HashMap<Variable, ScheduleEntry>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `entry` for `variable`. An entry, once committed, is never
    /// replaced; a second commit for the same variable is refused.
    pub fn commit(&mut self, variable: Variable, entry: ScheduleEntry) -> bool {
        if self.entries.contains_key(&variable) {
            return false;
        }
        self.order.push(variable.clone());
        self.entries.insert(variable, entry);
        true
    }

    pub fn get(&self, variable: &Variable) -> Option<&ScheduleEntry> {
        self.entries.get(variable)
    }

    /// Entries in commit order.
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &ScheduleEntry)> {
        self.order.iter().filter_map(|v| self.entries.get(v).map(|e| (v, e)))
    }

    /// Only the real assignments, in commit order.
    pub fn assigned(&self) -> impl Iterator<Item = (&Variable, &ScheduleEntry)> {
        self.iter().filter(|(_, entry)| entry.is_assigned())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }
}

/// Request body: a catalog plus an optional seed for subject/room choice.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableRequest {
    #[serde(flatten)]
    pub catalog: Catalog,
    #[serde(default)]
    pub seed: Option<u64>,
}

/// One row of the flattened timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableRow {
    pub group: GroupId,
    pub weekday: Weekday,
    pub slot: Slot,
    pub assigned: bool,
    pub professor: String,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_type: Option<String>,
    pub room: String,
}

/// A hard constraint found broken in a finished schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintViolation {
    pub constraint_type: String,
    pub description: String,
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.constraint_type, self.description)
    }
}

/// The final output of the solver.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableOutput {
    pub entries: Vec<TimetableRow>,
    pub assigned_count: usize,
    pub unassigned_count: usize,
    pub violations: Vec<ConstraintViolation>,
}
