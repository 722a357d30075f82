//! Performance benchmarks for snapshot assembly

use chrono::{NaiveDate, NaiveTime};
use course_snapshot::assemble;
use course_snapshot::catalog::{CatalogRows, InstructorRow, ScheduleRow, SectionRow, TermRow};
use course_snapshot::source::MemoryRowSource;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use std::hint::black_box;
use std::time::Duration;
use tokio::runtime::Runtime;

const DEPARTMENTS: [&str; 6] = ["CS", "MATH", "PHYS", "CHEM", "BIO", "ENGR"];
const CAMPUSES: [&str; 3] = ["HM", "PO", "SC"];

/// Build a synthetic catalog with `sections` sections, two instructors and two
/// meetings each
fn create_test_rows(sections: usize) -> CatalogRows {
    let mut rows = CatalogRows {
        terms: vec![
            TermRow {
                code: "2021F1".to_string(),
                semester: "FA2021".to_string(),
            },
            TermRow {
                code: "2021F2".to_string(),
                semester: "FA2021".to_string(),
            },
            TermRow {
                code: "FA2021".to_string(),
                semester: "FA2021".to_string(),
            },
        ],
        ..Default::default()
    };

    for i in 0..sections {
        let department = DEPARTMENTS[i % DEPARTMENTS.len()];
        let campus = CAMPUSES[(i / DEPARTMENTS.len()) % CAMPUSES.len()];
        let number = format!("{:03}", i / 18);
        let section = (i % 4) as i32 + 1;
        let term = ["2021F1", "2021F2", "FA2021"][i % 3];
        let code = format!("{department} {number} {campus}-{section:02}");

        rows.sections.push(SectionRow {
            department: department.to_string(),
            number: number.clone(),
            campus: campus.to_string(),
            section,
            term: term.to_string(),
            name: format!("Course {i}"),
            description: "x".repeat(200),
            credits: 3.0,
            seats_capacity: 30,
            seats_enrolled: (i % 31) as i32,
            status: "O".to_string(),
        });

        for name in ["Zed Young", "Ann Lee"] {
            rows.instructors.push(InstructorRow {
                course_code: code.clone(),
                name: name.to_string(),
            });
        }

        for (days, hour) in [(0b0001_0100, 13), (0b0010_1010, 9)] {
            rows.schedules.push(ScheduleRow {
                course_code: code.clone(),
                days,
                start_time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
                end_time: NaiveTime::from_hms_opt(hour, 50, 0).unwrap(),
                location: format!("Room {}", i % 40),
                term: term.to_string(),
                semester: "FA2021".to_string(),
                start_date: NaiveDate::from_ymd_opt(2021, 9, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2021, 12, 10).unwrap(),
            });
        }
    }

    rows
}

fn bench_assemble(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();

    let mut group = c.benchmark_group("assemble");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(5));

    for size in [100, 1000, 4000].iter() {
        let rows = create_test_rows(*size);
        group.bench_with_input(BenchmarkId::new("sections", size), &rows, |b, rows| {
            b.to_async(&rt).iter_batched(
                || MemoryRowSource::new(rows.clone()),
                |mut source| async move {
                    let snapshot = assemble(&mut source).await.unwrap();
                    black_box(snapshot);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut source = MemoryRowSource::new(create_test_rows(4000));
    let snapshot = rt.block_on(assemble(&mut source)).unwrap();

    c.bench_function("serialize_snapshot", |b| {
        b.iter(|| serde_json::to_string(black_box(&snapshot)).unwrap())
    });
}

criterion_group!(benches, bench_assemble, bench_serialize);
criterion_main!(benches);
