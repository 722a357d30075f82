//! In-memory row source for fixtures, tests and benchmarks

use futures::stream::{self, StreamExt};

use super::{RowSource, RowStream};
use crate::catalog::{CatalogRows, InstructorRow, ScheduleRow, SectionRow, TermRow};

/// Row source backed by pre-built row vectors
///
/// Each stream can be taken once; a second call yields an empty stream.
#[derive(Debug, Clone, Default)]
pub struct MemoryRowSource {
    rows: CatalogRows,
}

impl MemoryRowSource {
    pub fn new(rows: CatalogRows) -> Self {
        Self { rows }
    }
}

impl From<CatalogRows> for MemoryRowSource {
    fn from(rows: CatalogRows) -> Self {
        Self::new(rows)
    }
}

fn drain<'a, T: Send + 'a>(rows: &mut Vec<T>) -> RowStream<'a, T> {
    stream::iter(std::mem::take(rows).into_iter().map(Ok)).boxed()
}

impl RowSource for MemoryRowSource {
    fn terms(&mut self) -> RowStream<'_, TermRow> {
        drain(&mut self.rows.terms)
    }

    fn sections(&mut self) -> RowStream<'_, SectionRow> {
        drain(&mut self.rows.sections)
    }

    fn instructors(&mut self) -> RowStream<'_, InstructorRow> {
        drain(&mut self.rows.instructors)
    }

    fn schedules(&mut self) -> RowStream<'_, ScheduleRow> {
        drain(&mut self.rows.schedules)
    }
}
