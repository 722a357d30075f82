//! PostgreSQL row source

use futures::{StreamExt, TryStreamExt};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgRow};
use sqlx::{ConnectOptions, Postgres, Row, Transaction};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use super::{RowSource, RowStream};
use crate::catalog::{InstructorRow, ScheduleRow, SectionRow, TermRow};
use crate::config::{DatabaseConfig, Semester};
use crate::error::{CatalogError, CatalogResult, RowKind};

const TERMS_QUERY: &str = r#"SELECT "code", "semester" FROM "term""#;

const SECTIONS_QUERY: &str = r#"
    SELECT
      "course"."department"
    , "course"."code"
    , "course"."campus"
    , "section"."section"
    , "term"."code"
    , "course"."name"
    , "course"."description"
    , "section"."quarter_credits"::float8 / 4
    , "section"."seats_capacity"
    , "section"."seats_enrolled"
    , "section"."status"
    FROM "section"
    JOIN "course" ON "course"."id" = "section"."course_id"
    JOIN "term" ON "term"."code" = "section"."term_code"
    WHERE "term"."semester" = $1 AND "section"."deleted_at" IS NULL
"#;

const INSTRUCTORS_QUERY: &str = r#"
    SELECT
      "course"."department"
      || ' ' || "course"."code"
      || ' ' || "course"."campus"
      || '-' || to_char("section"."section", 'FM00')
    , "staff"."name_first" || ' ' || "staff"."name_last"
    FROM "section_staff"
    JOIN "staff" ON "staff"."id" = "section_staff"."staff_id"
    JOIN "section" ON "section"."id" = "section_staff"."section_id"
    JOIN "course" ON "course"."id" = "section"."course_id"
    JOIN "term" ON "term"."code" = "section"."term_code"
    WHERE "term"."semester" = $1 AND "section_staff"."deleted_at" IS NULL
"#;

const SCHEDULES_QUERY: &str = r#"
    SELECT
      "course"."department"
      || ' ' || "course"."code"
      || ' ' || "course"."campus"
      || '-' || to_char("section"."section", 'FM00')
    , "section_schedule"."days"
    , "section_schedule"."time_start"
    , "section_schedule"."time_end"
    , "section_schedule"."location"
    , "term"."code"
    , "term"."semester"
    , "term"."date_start"
    , "term"."date_end"
    FROM "section_schedule"
    JOIN "section" ON "section"."id" = "section_schedule"."section_id"
    JOIN "course" ON "course"."id" = "section"."course_id"
    JOIN "term" ON "term"."code" = "section"."term_code"
    WHERE "term"."semester" = $1 AND "section_schedule"."deleted_at" IS NULL
"#;

/// Create the connection pool shared by every snapshot request
pub async fn connect(url: &str, config: &DatabaseConfig) -> CatalogResult<PgPool> {
    info!("Connecting to PostgreSQL");

    let connect_options = PgConnectOptions::from_str(url)
        .map_err(|e| CatalogError::connection(format!("Invalid connection string: {e}")))?
        .statement_cache_capacity(100)
        .log_statements(log::LevelFilter::Debug)
        .log_slow_statements(log::LevelFilter::Warn, Duration::from_secs(1));

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(Some(Duration::from_secs(600)))
        .test_before_acquire(true)
        .connect_with(connect_options)
        .await
        .map_err(|e| CatalogError::connection(format!("Failed to connect to database: {e}")))
}

/// Row source reading one semester inside a single read-only transaction
pub struct PgRowSource {
    tx: Transaction<'static, Postgres>,
    semester: Semester,
}

impl PgRowSource {
    /// Open a repeatable-read transaction so all four queries see one point in time
    pub async fn begin(pool: &PgPool, semester: &Semester) -> CatalogResult<Self> {
        let mut tx = pool.begin().await.map_err(CatalogError::connection)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(CatalogError::connection)?;

        debug!("Opened catalog transaction for semester {}", semester);
        Ok(Self {
            tx,
            semester: semester.clone(),
        })
    }

    /// End the transaction. Nothing was written, so this only releases the snapshot.
    pub async fn finish(self) -> CatalogResult<()> {
        self.tx.rollback().await.map_err(CatalogError::connection)
    }
}

fn column<'r, T>(row: &'r PgRow, kind: RowKind, index: usize) -> CatalogResult<T>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get(index).map_err(|e| CatalogError::decode(kind, e))
}

fn decode_term(row: PgRow) -> CatalogResult<TermRow> {
    let kind = RowKind::Term;
    Ok(TermRow {
        code: column(&row, kind, 0)?,
        semester: column(&row, kind, 1)?,
    })
}

fn decode_section(row: PgRow) -> CatalogResult<SectionRow> {
    let kind = RowKind::Section;
    Ok(SectionRow {
        department: column(&row, kind, 0)?,
        number: column(&row, kind, 1)?,
        campus: column(&row, kind, 2)?,
        section: column(&row, kind, 3)?,
        term: column(&row, kind, 4)?,
        name: column(&row, kind, 5)?,
        description: column(&row, kind, 6)?,
        credits: column(&row, kind, 7)?,
        seats_capacity: column(&row, kind, 8)?,
        seats_enrolled: column(&row, kind, 9)?,
        status: column(&row, kind, 10)?,
    })
}

fn decode_instructor(row: PgRow) -> CatalogResult<InstructorRow> {
    let kind = RowKind::Instructor;
    Ok(InstructorRow {
        course_code: column(&row, kind, 0)?,
        name: column(&row, kind, 1)?,
    })
}

fn decode_schedule(row: PgRow) -> CatalogResult<ScheduleRow> {
    let kind = RowKind::Schedule;
    let days: i16 = column(&row, kind, 1)?;
    let days = u8::try_from(days)
        .map_err(|_| CatalogError::decode(kind, format!("weekday mask {days} out of range")))?;

    Ok(ScheduleRow {
        course_code: column(&row, kind, 0)?,
        days,
        start_time: column(&row, kind, 2)?,
        end_time: column(&row, kind, 3)?,
        location: column(&row, kind, 4)?,
        term: column(&row, kind, 5)?,
        semester: column(&row, kind, 6)?,
        start_date: column(&row, kind, 7)?,
        end_date: column(&row, kind, 8)?,
    })
}

impl RowSource for PgRowSource {
    fn terms(&mut self) -> RowStream<'_, TermRow> {
        sqlx::query(TERMS_QUERY)
            .fetch(&mut *self.tx)
            .map_err(|e| CatalogError::query(RowKind::Term, e))
            .and_then(|row| futures::future::ready(decode_term(row)))
            .boxed()
    }

    fn sections(&mut self) -> RowStream<'_, SectionRow> {
        let Self { tx, semester } = self;
        sqlx::query(SECTIONS_QUERY)
            .bind(semester.as_str())
            .fetch(&mut **tx)
            .map_err(|e| CatalogError::query(RowKind::Section, e))
            .and_then(|row| futures::future::ready(decode_section(row)))
            .boxed()
    }

    fn instructors(&mut self) -> RowStream<'_, InstructorRow> {
        let Self { tx, semester } = self;
        sqlx::query(INSTRUCTORS_QUERY)
            .bind(semester.as_str())
            .fetch(&mut **tx)
            .map_err(|e| CatalogError::query(RowKind::Instructor, e))
            .and_then(|row| futures::future::ready(decode_instructor(row)))
            .boxed()
    }

    fn schedules(&mut self) -> RowStream<'_, ScheduleRow> {
        let Self { tx, semester } = self;
        sqlx::query(SCHEDULES_QUERY)
            .bind(semester.as_str())
            .fetch(&mut **tx)
            .map_err(|e| CatalogError::query(RowKind::Schedule, e))
            .and_then(|row| futures::future::ready(decode_schedule(row)))
            .boxed()
    }
}
