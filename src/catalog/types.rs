//! Snapshot document types
//!
//! Field names follow the JSON contract clients already consume, so every
//! serialized name is spelled out explicitly.

use serde::ser::{SerializeTuple, Serializer};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Terms keyed by term code
pub type TermTable = BTreeMap<String, Term>;

/// Courses keyed by composite course code
pub type CourseTable = BTreeMap<String, Course>;

/// Display sort key of a term: `[code, semester]`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TermSortKey {
    pub code: String,
    pub semester: String,
}

impl Serialize for TermSortKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(2)?;
        tuple.serialize_element(&self.code)?;
        tuple.serialize_element(&self.semester)?;
        tuple.end()
    }
}

/// Display sort key of a course: `[courseCode]`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CourseSortKey {
    pub code: String,
}

impl Serialize for CourseSortKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(1)?;
        tuple.serialize_element(&self.code)?;
        tuple.end()
    }
}

/// Key shared by every section of the same course on the same campus
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MutualExclusionKey {
    pub course: String,
}

impl Serialize for MutualExclusionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut tuple = serializer.serialize_tuple(1)?;
        tuple.serialize_element(&self.course)?;
        tuple.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Term {
    #[serde(rename = "termCode")]
    pub code: String,
    #[serde(rename = "termSortKey")]
    pub sort_key: TermSortKey,
    #[serde(rename = "termName")]
    pub name: String,
}

impl Term {
    pub fn new(code: impl Into<String>, semester: impl Into<String>) -> Self {
        let code = code.into();
        let semester = semester.into();
        Self {
            sort_key: TermSortKey {
                code: code.clone(),
                semester: semester.clone(),
            },
            code,
            name: semester,
        }
    }
}

/// Which halves of a semester a meeting occupies
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermPartition {
    #[serde(rename = "scheduleTermCount")]
    pub count: u8,
    #[serde(rename = "scheduleTerms")]
    pub terms: Vec<u8>,
}

impl TermPartition {
    pub fn whole() -> Self {
        Self {
            count: 1,
            terms: vec![0],
        }
    }

    pub fn half(index: u8) -> Self {
        Self {
            count: 2,
            terms: vec![index],
        }
    }
}

/// One weekly meeting of a section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    #[serde(rename = "scheduleDays")]
    pub days: String,
    #[serde(rename = "scheduleStartTime")]
    pub start_time: String,
    #[serde(rename = "scheduleEndTime")]
    pub end_time: String,
    #[serde(rename = "scheduleStartDate")]
    pub start_date: String,
    #[serde(rename = "scheduleEndDate")]
    pub end_date: String,
    #[serde(flatten)]
    pub partition: TermPartition,
    #[serde(rename = "scheduleLocation")]
    pub location: String,
}

impl Schedule {
    /// Display order: days, then start time, end time, and location.
    ///
    /// Times are zero-padded `HH:MM`, so string order is chronological.
    pub fn display_order(&self, other: &Self) -> Ordering {
        self.days
            .cmp(&other.days)
            .then_with(|| self.start_time.cmp(&other.start_time))
            .then_with(|| self.end_time.cmp(&other.end_time))
            .then_with(|| self.location.cmp(&other.location))
    }
}

/// One offered section
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Course {
    #[serde(rename = "courseCode")]
    pub code: String,
    #[serde(rename = "courseName")]
    pub name: String,
    #[serde(rename = "courseSortKey")]
    pub sort_key: CourseSortKey,
    #[serde(rename = "courseMutualExclusionKey")]
    pub mutual_exclusion_key: MutualExclusionKey,
    #[serde(rename = "courseDescription")]
    pub description: String,
    #[serde(rename = "courseInstructors")]
    pub instructors: Vec<String>,
    #[serde(rename = "courseTerm")]
    pub term: String,
    #[serde(rename = "courseSchedule")]
    pub schedule: Vec<Schedule>,
    #[serde(rename = "courseCredits")]
    pub credits: f64,
    #[serde(rename = "courseSeatsTotal")]
    pub seats_total: i32,
    #[serde(rename = "courseSeatsFilled")]
    pub seats_filled: i32,
    /// Not populated by any current query
    #[serde(rename = "courseWaitlistLength")]
    pub waitlist_length: Option<u32>,
    #[serde(rename = "courseEnrollmentStatus")]
    pub enrollment_status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogData {
    pub terms: TermTable,
    pub courses: CourseTable,
}

/// One complete, point-in-time catalog document
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub data: CatalogData,
    /// Unix timestamp (seconds) at which assembly finished
    pub until: i64,
    pub error: Option<String>,
    pub full: bool,
}
