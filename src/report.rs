use crate::data::{Catalog, Schedule, ScheduleEntry, Variable};
use std::fmt::{self, Write};

const RULE_WIDTH: usize = 80;

/// Renders the timetable as plain text, one block per group, days in catalog
/// order and one line per slot.
pub fn render(catalog: &Catalog, schedule: &Schedule) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_timetable(&mut out, catalog, schedule);
    out
}

fn write_timetable(out: &mut impl Write, catalog: &Catalog, schedule: &Schedule) -> fmt::Result {
    let heavy = "=".repeat(RULE_WIDTH);
    let light = "-".repeat(RULE_WIDTH);

    for group in &catalog.groups {
        writeln!(out, "\n{heavy}")?;
        writeln!(out, "Timetable for group: {group}")?;
        writeln!(out, "{heavy}")?;
        write_row(out, "Weekday", "Time", "Subject", "Type", "Professor", "Room")?;
        writeln!(out, "{light}")?;

        for weekday in &catalog.weekdays {
            writeln!(out, "\n{weekday}")?;
            for slot in &catalog.slots {
                match schedule.get(&Variable::new(group, weekday, slot)) {
                    Some(ScheduleEntry::Assigned {
                        professor,
                        subject,
                        room,
                    }) => write_row(
                        out,
                        "",
                        slot,
                        &subject.name,
                        subject.kind.as_deref().unwrap_or(""),
                        professor,
                        room,
                    )?,
                    Some(ScheduleEntry::Unassigned) => write_row(out, "", slot, "Free", "", "", "")?,
                    None => write_row(out, "", slot, "No data", "", "", "")?,
                }
            }
        }
        writeln!(out, "{heavy}")?;
    }
    Ok(())
}

// one fixed-width line, trailing padding dropped
fn write_row(
    out: &mut impl Write,
    weekday: &str,
    slot: &str,
    subject: &str,
    kind: &str,
    professor: &str,
    room: &str,
) -> fmt::Result {
    let line = format!("{weekday:<15}{slot:<10}{subject:<35}{kind:<10}{professor:<30}{room:<10}");
    writeln!(out, "{}", line.trim_end())
}
