//! Final ordering and packaging of the snapshot

use chrono::{DateTime, Utc};

use crate::catalog::{CatalogData, Course, CourseTable, Snapshot, TermTable};

/// Put a course's children into display order
pub fn sort_children(course: &mut Course) {
    course.instructors.sort();
    course.schedule.sort_by(|a, b| a.display_order(b));
}

/// Sort every course's children and wrap both tables into a complete snapshot
pub fn finalize(terms: TermTable, mut courses: CourseTable, until: DateTime<Utc>) -> Snapshot {
    courses.values_mut().for_each(sort_children);

    Snapshot {
        data: CatalogData { terms, courses },
        until: until.timestamp(),
        error: None,
        full: true,
    }
}
