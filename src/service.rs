//! Snapshot providers used by the HTTP handler and the CLI

use async_trait::async_trait;
use std::path::Path;
use tracing::{info, info_span, Instrument};

use crate::assemble::assemble;
use crate::catalog::{CatalogRows, Snapshot};
use crate::error::{CatalogError, CatalogResult};
use crate::source::MemoryRowSource;

#[cfg(feature = "postgres")]
use crate::config::Semester;
#[cfg(feature = "postgres")]
use crate::source::PgRowSource;
#[cfg(feature = "postgres")]
use sqlx::PgPool;

/// Produces one complete snapshot per call
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    async fn produce_snapshot(&self) -> CatalogResult<Snapshot>;
}

/// Assembles snapshots from the live store
#[cfg(feature = "postgres")]
pub struct PgCatalog {
    pool: PgPool,
    semester: Semester,
}

#[cfg(feature = "postgres")]
impl PgCatalog {
    pub fn new(pool: PgPool, semester: Semester) -> Self {
        Self { pool, semester }
    }

    pub fn semester(&self) -> &Semester {
        &self.semester
    }
}

#[cfg(feature = "postgres")]
#[async_trait]
impl SnapshotProvider for PgCatalog {
    async fn produce_snapshot(&self) -> CatalogResult<Snapshot> {
        let span = info_span!("snapshot", semester = %self.semester);
        async {
            let mut source = PgRowSource::begin(&self.pool, &self.semester).await?;
            let snapshot = assemble(&mut source).await?;
            source.finish().await?;

            info!(
                "Produced snapshot of {} courses",
                snapshot.data.courses.len()
            );
            Ok::<_, CatalogError>(snapshot)
        }
        .instrument(span)
        .await
    }
}

/// Assembles snapshots from rows loaded once from a fixture
pub struct FixtureCatalog {
    rows: CatalogRows,
}

impl FixtureCatalog {
    pub fn new(rows: CatalogRows) -> Self {
        Self { rows }
    }

    pub async fn load(path: &Path) -> CatalogResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let rows = CatalogRows::from_json(&content)?;
        info!(
            "Loaded {} fixture rows from {}",
            rows.row_count(),
            path.display()
        );
        Ok(Self::new(rows))
    }
}

#[async_trait]
impl SnapshotProvider for FixtureCatalog {
    async fn produce_snapshot(&self) -> CatalogResult<Snapshot> {
        let span = info_span!("snapshot", source = "fixture");
        async {
            let mut source = MemoryRowSource::new(self.rows.clone());
            let snapshot = assemble(&mut source).await?;

            info!(
                "Produced snapshot of {} courses",
                snapshot.data.courses.len()
            );
            Ok::<_, CatalogError>(snapshot)
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InstructorRow, TermRow};

    #[tokio::test]
    async fn test_fixture_catalog_is_repeatable() {
        let catalog = FixtureCatalog::new(CatalogRows {
            terms: vec![TermRow {
                code: "FA2021".to_string(),
                semester: "FA2021".to_string(),
            }],
            ..Default::default()
        });

        let first = catalog.produce_snapshot().await.unwrap();
        let second = catalog.produce_snapshot().await.unwrap();
        assert_eq!(first.data, second.data);
        assert_eq!(second.data.terms.len(), 1);
    }

    #[tokio::test]
    async fn test_fixture_catalog_surfaces_integrity_errors() {
        let catalog = FixtureCatalog::new(CatalogRows {
            instructors: vec![InstructorRow {
                course_code: "CS 999 X-01".to_string(),
                name: "Jane Doe".to_string(),
            }],
            ..Default::default()
        });

        let err = catalog.produce_snapshot().await.unwrap_err();
        assert!(err.is_integrity_violation());
    }
}
