//! Raw row shapes of the four catalog queries
//!
//! Field order matches the column order of each query.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// `(term code, semester)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRow {
    pub code: String,
    pub semester: String,
}

/// One section joined with its course and term
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionRow {
    pub department: String,
    pub number: String,
    pub campus: String,
    pub section: i32,
    pub term: String,
    pub name: String,
    pub description: String,
    pub credits: f64,
    pub seats_capacity: i32,
    pub seats_enrolled: i32,
    pub status: String,
}

/// `(course code, instructor full name)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorRow {
    pub course_code: String,
    pub name: String,
}

/// One weekly meeting joined with the term it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub course_code: String,
    /// Weekday bitmask, bit 0 is Sunday
    pub days: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub location: String,
    pub term: String,
    pub semester: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// All four row sets, fully materialized
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogRows {
    #[serde(default)]
    pub terms: Vec<TermRow>,
    #[serde(default)]
    pub sections: Vec<SectionRow>,
    #[serde(default)]
    pub instructors: Vec<InstructorRow>,
    #[serde(default)]
    pub schedules: Vec<ScheduleRow>,
}

impl CatalogRows {
    /// Parse a JSON fixture document
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    pub fn row_count(&self) -> usize {
        self.terms.len() + self.sections.len() + self.instructors.len() + self.schedules.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_parses_times_and_dates() {
        let rows = CatalogRows::from_json(
            r#"{
                "terms": [{"code": "2021F1", "semester": "FA2021"}],
                "schedules": [{
                    "course_code": "CS 101 A-01",
                    "days": 10,
                    "start_time": "09:00:00",
                    "end_time": "09:50:00",
                    "location": "Hall 1",
                    "term": "2021F1",
                    "semester": "FA2021",
                    "start_date": "2021-09-01",
                    "end_date": "2021-10-15"
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(rows.terms.len(), 1);
        assert!(rows.sections.is_empty());
        assert!(rows.instructors.is_empty());
        assert_eq!(rows.row_count(), 2);

        let schedule = &rows.schedules[0];
        assert_eq!(schedule.start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(
            schedule.end_date,
            NaiveDate::from_ymd_opt(2021, 10, 15).unwrap()
        );
    }

    #[test]
    fn test_fixture_rejects_wrong_types() {
        let err = CatalogRows::from_json(r#"{"sections": [{"department": 1}]}"#);
        assert!(err.is_err());
    }
}
