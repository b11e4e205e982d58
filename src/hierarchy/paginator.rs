//! Bounded cursor-following fetch loops.

use super::stats::PaginationStats;
use crate::error::{ErrorContext, HierarchyError, ProtocolErrorKind, Result};
use crate::model::{OccurrenceRecord, Page};
use crate::provider::{HierarchyProvider, RequestContext};
use std::collections::HashSet;
use std::time::Instant;

/// Default cap on pages fetched by one loop.
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// Follow cursors from `fetch` until the provider reports no further page.
///
/// The loop fails instead of spinning when the provider hands back a cursor
/// it already returned, or when more than `max_pages` pages would be needed.
/// The context is checked before every page. Any error discards the records
/// gathered so far.
pub fn collect_pages<T, F>(
    ctx: &RequestContext,
    what: &str,
    max_pages: usize,
    mut fetch: F,
) -> Result<(Vec<T>, PaginationStats)>
where
    F: FnMut(Option<&str>) -> Result<Page<T>>,
{
    let started = Instant::now();
    let mut items = Vec::new();
    let mut seen = HashSet::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
        if pages >= max_pages {
            return Err(HierarchyError::protocol(
                what,
                ProtocolErrorKind::PageLimitExceeded { limit: max_pages },
            ));
        }
        ctx.check()?;

        let page = fetch(cursor.as_deref()).with_context(|| format!("{what} page {}", pages + 1))?;
        pages += 1;
        let next = page.continuation().map(str::to_string);
        tracing::debug!(
            "{what}: page {pages} returned {} record(s), next cursor {next:?}",
            page.items.len()
        );
        items.extend(page.items);

        match next {
            None => break,
            Some(next) => {
                if !seen.insert(next.clone()) {
                    return Err(HierarchyError::protocol(
                        what,
                        ProtocolErrorKind::RepeatedCursor { cursor: next },
                    ));
                }
                cursor = Some(next);
            }
        }
    }

    let stats = PaginationStats {
        pages,
        records: items.len(),
        elapsed: started.elapsed(),
    };
    Ok((items, stats))
}

/// Accumulates the complete occurrence list below one component version.
pub struct OccurrencePaginator<'a, P: HierarchyProvider + ?Sized> {
    provider: &'a P,
    max_pages: usize,
}

impl<'a, P: HierarchyProvider + ?Sized> OccurrencePaginator<'a, P> {
    pub const fn new(provider: &'a P) -> Self {
        Self {
            provider,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    #[must_use]
    pub const fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// All occurrence records, in page order.
    pub fn fetch_all(
        &self,
        ctx: &RequestContext,
        component_version_id: &str,
    ) -> Result<Vec<OccurrenceRecord>> {
        self.fetch_all_with_stats(ctx, component_version_id)
            .map(|(records, _)| records)
    }

    pub fn fetch_all_with_stats(
        &self,
        ctx: &RequestContext,
        component_version_id: &str,
    ) -> Result<(Vec<OccurrenceRecord>, PaginationStats)> {
        let what = format!("occurrences of '{component_version_id}'");
        let (records, stats) = collect_pages(ctx, &what, self.max_pages, |cursor| {
            self.provider
                .fetch_occurrence_page(ctx, component_version_id, cursor)
        })?;
        stats.log_summary("occurrences");
        Ok((records, stats))
    }
}
