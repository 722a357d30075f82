//! Meeting schedule enrichment

use chrono::{NaiveDate, NaiveTime};
use futures::TryStreamExt;
use tracing::debug;

use crate::catalog::{CourseTable, Schedule, ScheduleRow, TermPartition};
use crate::error::{CatalogError, CatalogResult, RowKind};
use crate::source::RowStream;

/// Weekday symbols, Sunday through Saturday, indexed by bit position
const WEEKDAYS: [char; 7] = ['U', 'M', 'T', 'W', 'R', 'F', 'S'];

/// Term-code suffixes marking the second half of a split semester
const SECOND_HALF_SUFFIXES: [&str; 2] = ["F2", "P2"];

/// Decode a weekday bitmask into symbols in week order, e.g. `0b0101010` to `MWF`
pub fn decode_days(bits: u8) -> String {
    WEEKDAYS
        .iter()
        .enumerate()
        .filter(|(i, _)| (bits >> i) & 1 == 1)
        .map(|(_, day)| *day)
        .collect()
}

/// 24-hour `HH:MM`
pub fn format_time(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// `YYYY-MM-DD`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Infer which half of its semester a term covers.
///
/// The store only records term codes, not how a semester is partitioned. A
/// term whose code equals the semester label spans the whole semester;
/// anything else is assumed to be one of exactly two halves, the second half
/// being marked by an `F2` or `P2` suffix.
pub fn infer_partition(term: &str, semester: &str) -> TermPartition {
    if term == semester {
        return TermPartition::whole();
    }

    if SECOND_HALF_SUFFIXES
        .iter()
        .any(|suffix| term.ends_with(suffix))
    {
        TermPartition::half(1)
    } else {
        TermPartition::half(0)
    }
}

impl From<&ScheduleRow> for Schedule {
    fn from(row: &ScheduleRow) -> Self {
        Self {
            days: decode_days(row.days),
            start_time: format_time(row.start_time),
            end_time: format_time(row.end_time),
            start_date: format_date(row.start_date),
            end_date: format_date(row.end_date),
            partition: infer_partition(&row.term, &row.semester),
            location: row.location.clone(),
        }
    }
}

/// Append each meeting to the course its row references.
///
/// A row naming a course that was never built aborts the whole assembly.
pub async fn attach_schedules(
    courses: &mut CourseTable,
    mut rows: RowStream<'_, ScheduleRow>,
) -> CatalogResult<()> {
    let mut attached = 0usize;

    while let Some(row) = rows.try_next().await? {
        let schedule = Schedule::from(&row);
        let course = courses
            .get_mut(&row.course_code)
            .ok_or_else(|| CatalogError::dangling_course(RowKind::Schedule, &row.course_code))?;
        course.schedule.push(schedule);
        attached += 1;
    }

    debug!("Attached {} schedules", attached);
    Ok(())
}
