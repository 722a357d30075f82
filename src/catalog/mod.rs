//! Catalog data model
//!
//! - `rows` - raw rows as delivered by the four catalog queries
//! - `types` - the nested snapshot document served to clients

pub mod rows;
pub mod types;

pub use rows::{CatalogRows, InstructorRow, ScheduleRow, SectionRow, TermRow};
pub use types::{
    CatalogData, Course, CourseSortKey, CourseTable, MutualExclusionKey, Schedule, Snapshot,
    Term, TermPartition, TermSortKey, TermTable,
};
