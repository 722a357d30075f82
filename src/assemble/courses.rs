//! Course table construction

use futures::TryStreamExt;
use tracing::{debug, warn};

use crate::catalog::{Course, CourseSortKey, CourseTable, MutualExclusionKey, SectionRow};
use crate::error::CatalogResult;
use crate::source::RowStream;

/// Code shared by every section of a course on one campus, e.g. `CS 101 A`
pub fn mutual_exclusion_code(department: &str, number: &str, campus: &str) -> String {
    format!("{department} {number} {campus}")
}

/// Composite section code, e.g. `CS 101 A-01`
pub fn course_code(department: &str, number: &str, campus: &str, section: i32) -> String {
    format!("{department} {number} {campus}-{section:02}")
}

impl From<SectionRow> for Course {
    fn from(row: SectionRow) -> Self {
        let exclusion = mutual_exclusion_code(&row.department, &row.number, &row.campus);
        let code = course_code(&row.department, &row.number, &row.campus, row.section);

        Self {
            sort_key: CourseSortKey { code: code.clone() },
            mutual_exclusion_key: MutualExclusionKey { course: exclusion },
            code,
            name: row.name,
            description: row.description,
            instructors: Vec::new(),
            term: row.term,
            schedule: Vec::new(),
            credits: row.credits,
            seats_total: row.seats_capacity,
            seats_filled: row.seats_enrolled,
            waitlist_length: None,
            enrollment_status: row.status,
        }
    }
}

/// Build the course table from the section stream.
///
/// Courses start with no instructors and no meetings. Codes are unique in
/// valid data; if one repeats, the later row replaces the earlier one.
pub async fn build_courses(mut rows: RowStream<'_, SectionRow>) -> CatalogResult<CourseTable> {
    let mut courses = CourseTable::new();

    while let Some(row) = rows.try_next().await? {
        let course = Course::from(row);
        if let Some(previous) = courses.insert(course.code.clone(), course) {
            warn!("Duplicate course code {:?}, keeping the later row", previous.code);
        }
    }

    debug!("Built {} courses", courses.len());
    Ok(courses)
}
