//! Snapshot assembly
//!
//! Joins the four row streams into one nested document:
//!
//! 1. `terms` - term code to term record
//! 2. `courses` - composite section code to course record, children empty
//! 3. `instructors` - instructor names appended to their course
//! 4. `schedules` - meetings appended to their course, with partition inferred
//! 5. `finalize` - children sorted, snapshot stamped
//!
//! The course table is owned by the assembly and lent mutably to one
//! enricher at a time, after both tables are complete.

pub mod courses;
pub mod finalize;
pub mod instructors;
pub mod schedules;
pub mod terms;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::catalog::Snapshot;
use crate::error::CatalogResult;
use crate::source::RowSource;

pub use courses::{build_courses, course_code, mutual_exclusion_code};
pub use finalize::{finalize, sort_children};
pub use instructors::attach_instructors;
pub use schedules::{attach_schedules, decode_days, format_date, format_time, infer_partition};
pub use terms::build_terms;

/// Assemble a snapshot stamped with the current time
pub async fn assemble<S>(source: &mut S) -> CatalogResult<Snapshot>
where
    S: RowSource + ?Sized,
{
    assemble_with_clock(source, Utc::now).await
}

/// Assemble a snapshot, reading the completion time from `clock` once all
/// enrichment is done. Any error aborts assembly; no partial snapshot is built.
pub async fn assemble_with_clock<S, C>(source: &mut S, clock: C) -> CatalogResult<Snapshot>
where
    S: RowSource + ?Sized,
    C: FnOnce() -> DateTime<Utc>,
{
    let terms = build_terms(source.terms()).await?;
    let mut courses = build_courses(source.sections()).await?;

    attach_instructors(&mut courses, source.instructors()).await?;
    attach_schedules(&mut courses, source.schedules()).await?;

    let snapshot = finalize(terms, courses, clock());
    debug!(
        "Assembled snapshot with {} terms and {} courses",
        snapshot.data.terms.len(),
        snapshot.data.courses.len()
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogRows, InstructorRow, SectionRow, TermRow};
    use crate::error::{CatalogError, RowKind};
    use crate::source::MemoryRowSource;

    fn rows() -> CatalogRows {
        CatalogRows {
            terms: vec![TermRow {
                code: "2021F1".to_string(),
                semester: "FA2021".to_string(),
            }],
            sections: vec![SectionRow {
                department: "CS".to_string(),
                number: "101".to_string(),
                campus: "A".to_string(),
                section: 1,
                term: "2021F1".to_string(),
                name: "Intro".to_string(),
                description: String::new(),
                credits: 1.0,
                seats_capacity: 20,
                seats_enrolled: 3,
                status: "O".to_string(),
            }],
            instructors: vec![
                InstructorRow {
                    course_code: "CS 101 A-01".to_string(),
                    name: "Zed Young".to_string(),
                },
                InstructorRow {
                    course_code: "CS 101 A-01".to_string(),
                    name: "Jane Doe".to_string(),
                },
            ],
            schedules: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_assemble_with_fixed_clock() {
        let mut source = MemoryRowSource::new(rows());
        let until = DateTime::from_timestamp(1_630_000_000, 0).unwrap();

        let snapshot = assemble_with_clock(&mut source, || until).await.unwrap();

        assert_eq!(snapshot.until, 1_630_000_000);
        assert_eq!(snapshot.data.terms.len(), 1);
        assert_eq!(
            snapshot.data.courses["CS 101 A-01"].instructors,
            vec!["Jane Doe", "Zed Young"]
        );
    }

    #[tokio::test]
    async fn test_dangling_instructor_yields_no_snapshot() {
        let mut rows = rows();
        rows.instructors.push(InstructorRow {
            course_code: "CS 999 X-01".to_string(),
            name: "Nobody".to_string(),
        });
        let mut source = MemoryRowSource::new(rows);

        let result = assemble(&mut source).await;
        assert!(matches!(
            result,
            Err(CatalogError::DanglingCourse {
                kind: RowKind::Instructor,
                ..
            })
        ));
    }
}
