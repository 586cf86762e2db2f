use crate::data::ProfessorRecord;

/// Orders candidates by remaining teaching hours, scarcest first.
///
/// The sort is stable, so candidates with equal remaining hours keep the order
/// they were given in (registry order, i.e. lexical by professor id).
pub fn rank_by_scarcity<'p>(
    mut candidates: Vec<(&'p str, &'p ProfessorRecord)>,
) -> Vec<(&'p str, &'p ProfessorRecord)> {
    candidates.sort_by_key(|(_, record)| record.remaining_hours());
    candidates
}
