//! Row sources feeding snapshot assembly
//!
//! A source hands out the four row streams in query order. Every method takes
//! `&mut self` and the returned stream borrows the source, so a stream has to
//! be drained and dropped before the next one can be opened. This matches the
//! batched connection protocol, where the results of one query are only
//! available once the previous result set has been consumed.

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use futures::stream::BoxStream;

use crate::catalog::{InstructorRow, ScheduleRow, SectionRow, TermRow};
use crate::error::CatalogResult;

pub use memory::MemoryRowSource;
#[cfg(feature = "postgres")]
pub use postgres::{connect, PgRowSource};

/// A lazily decoded stream of rows
pub type RowStream<'a, T> = BoxStream<'a, CatalogResult<T>>;

/// Ordered access to the four catalog result sets
pub trait RowSource: Send {
    /// Term code and semester of every known term
    fn terms(&mut self) -> RowStream<'_, TermRow>;

    /// Sections of the targeted semester, joined with course and term
    fn sections(&mut self) -> RowStream<'_, SectionRow>;

    /// Instructor names keyed by composite course code
    fn instructors(&mut self) -> RowStream<'_, InstructorRow>;

    /// Weekly meetings keyed by composite course code
    fn schedules(&mut self) -> RowStream<'_, ScheduleRow>;
}
