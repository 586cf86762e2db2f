use crate::data::Catalog;
use itertools::Itertools;

/// Checks the catalog is well formed before it is handed to the solver.
///
/// The solver itself trusts its input; anything rejected here would otherwise
/// surface as a nonsensical timetable.
pub fn validate_catalog(catalog: &Catalog) -> Result<(), String> {
    let lists = [
        ("groups", &catalog.groups),
        ("weekdays", &catalog.weekdays),
        ("slots", &catalog.slots),
        ("rooms", &catalog.rooms),
    ];
    for (name, items) in lists {
        if items.is_empty() {
            return Err(format!("The catalog has no {name}."));
        }
        if let Some(item) = items.iter().find(|item| item.trim().is_empty()) {
            return Err(format!("The catalog lists a blank entry {item:?} among its {name}."));
        }
        if let Some(duplicate) = items.iter().duplicates().next() {
            return Err(format!("'{duplicate}' is listed more than once among the {name}."));
        }
    }

    for (id, record) in &catalog.professors {
        if id.trim().is_empty() {
            return Err("A professor has an empty id.".to_string());
        }
        if record.current_hours > record.max_hours {
            return Err(format!(
                "Professor {id} already has {} hours, over their maximum of {}.",
                record.current_hours, record.max_hours
            ));
        }
        if let Some(subject) = record.subjects.iter().find(|s| s.name.trim().is_empty()) {
            return Err(format!("Professor {id} has a subject with an empty name ({subject:?})."));
        }
    }

    Ok(())
}
