//! Term table construction

use futures::TryStreamExt;
use tracing::{debug, warn};

use crate::catalog::{Term, TermRow, TermTable};
use crate::error::CatalogResult;
use crate::source::RowStream;

/// Build the term table from the term stream.
///
/// A repeated term code replaces the earlier entry.
pub async fn build_terms(mut rows: RowStream<'_, TermRow>) -> CatalogResult<TermTable> {
    let mut terms = TermTable::new();

    while let Some(row) = rows.try_next().await? {
        let term = Term::new(row.code, row.semester);
        if let Some(previous) = terms.insert(term.code.clone(), term) {
            warn!("Duplicate term code {:?}, keeping the later row", previous.code);
        }
    }

    debug!("Built {} terms", terms.len());
    Ok(terms)
}
