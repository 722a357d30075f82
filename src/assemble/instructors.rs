//! Instructor enrichment

use futures::TryStreamExt;
use tracing::debug;

use crate::catalog::{CourseTable, InstructorRow};
use crate::error::{CatalogError, CatalogResult, RowKind};
use crate::source::RowStream;

/// Append each instructor to the course its row references.
///
/// Names are kept in delivery order; the finalizer sorts them. A row naming a
/// course that was never built aborts the whole assembly.
pub async fn attach_instructors(
    courses: &mut CourseTable,
    mut rows: RowStream<'_, InstructorRow>,
) -> CatalogResult<()> {
    let mut attached = 0usize;

    while let Some(row) = rows.try_next().await? {
        let course = courses
            .get_mut(&row.course_code)
            .ok_or_else(|| CatalogError::dangling_course(RowKind::Instructor, &row.course_code))?;
        course.instructors.push(row.name);
        attached += 1;
    }

    debug!("Attached {} instructors", attached);
    Ok(())
}
