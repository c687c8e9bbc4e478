use std::io::Write;

use chrono::{DateTime, Utc};

use crate::domain::{Category, RetentionWindow, Verdict};
use crate::store::RecordStore;
use crate::utils::error_chain_fmt;
use crate::xrpc_client::ListError;

/// Counters for one category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySummary {
    pub category: Category,
    pub pages: usize,
    pub seen: usize,
    pub deleted: usize,
    pub failed: usize,
    pub unparseable: usize,
}

impl CategorySummary {
    fn new(category: Category) -> Self {
        Self {
            category,
            pages: 0,
            seen: 0,
            deleted: 0,
            failed: 0,
            unparseable: 0,
        }
    }

    /// Everything that was listed but not deleted, failed deletes included.
    pub fn skipped(&self) -> usize {
        self.seen - self.deleted
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub categories: Vec<CategorySummary>,
}

impl RunSummary {
    pub fn total_deleted(&self) -> usize {
        self.categories.iter().map(|c| c.deleted).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.categories.iter().map(|c| c.failed).sum()
    }
}

#[derive(thiserror::Error)]
pub enum SweepError {
    #[error("Failed to list {}.", .category.plural())]
    List {
        category: Category,
        #[source]
        source: ListError,
    },

    #[error("Failed to write the sweep report.")]
    Report(#[from] std::io::Error),
}

impl std::fmt::Debug for SweepError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Sweeps each category in turn, writing one line per delete attempt and a
/// summary per category to `out`.
///
/// A failed listing aborts the whole run, including categories not yet
/// reached. A failed delete is reported and the sweep moves on.
#[tracing::instrument(name = "Sweep", skip(store, out), fields(days = retention.days()))]
pub async fn run_sweep<S, W>(
    store: &S,
    categories: &[Category],
    retention: RetentionWindow,
    now: DateTime<Utc>,
    out: &mut W,
) -> Result<RunSummary, SweepError>
where
    S: RecordStore,
    W: Write,
{
    let mut summary = RunSummary::default();

    for &category in categories {
        let category_summary = sweep_category(store, category, retention, now, out).await?;
        summary.categories.push(category_summary);
    }

    Ok(summary)
}

async fn sweep_category<S, W>(
    store: &S,
    category: Category,
    retention: RetentionWindow,
    now: DateTime<Utc>,
    out: &mut W,
) -> Result<CategorySummary, SweepError>
where
    S: RecordStore,
    W: Write,
{
    let mut summary = CategorySummary::new(category);
    let mut cursor: Option<String> = None;

    loop {
        let page = store
            .list(category, cursor.as_deref())
            .await
            .map_err(|source| SweepError::List { category, source })?;

        summary.pages += 1;
        summary.seen += page.records.len();

        for record in &page.records {
            match retention.evaluate(record, now) {
                Verdict::Retained => {}
                Verdict::Unparseable(e) => {
                    summary.unparseable += 1;
                    tracing::warn!(
                        uri = %record.uri,
                        created_at = %record.value.created_at,
                        error.message = %e,
                        "Keeping a record whose timestamp cannot be parsed."
                    );
                }
                Verdict::Expired => match store.delete(record, category).await {
                    Ok(()) => {
                        summary.deleted += 1;
                        writeln!(out, "Deleted {category}: {}", record.uri)?;
                    }
                    Err(e) => {
                        summary.failed += 1;
                        tracing::warn!(
                            error.cause_chain = ?e,
                            error.message = %e,
                            uri = %record.uri,
                            "Failed to delete a record. Skipping."
                        );
                        writeln!(out, "Failed to delete {category}: {} ({e})", record.uri)?;
                    }
                },
            }
        }

        match page.cursor {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    write_category_summary(out, &summary, retention)?;
    tracing::info!(
        category = %category,
        pages = summary.pages,
        seen = summary.seen,
        deleted = summary.deleted,
        failed = summary.failed,
        "Category sweep completed"
    );

    Ok(summary)
}

fn write_category_summary<W: Write>(
    out: &mut W,
    summary: &CategorySummary,
    retention: RetentionWindow,
) -> std::io::Result<()> {
    let plural = summary.category.plural();

    if summary.deleted == 0 {
        writeln!(out, "No {plural} were deleted.")?;
    } else {
        writeln!(out, "Total {plural} deleted: {}", summary.deleted)?;
    }
    writeln!(
        out,
        "Total {plural} skipped (newer than {} days): {}",
        retention.days(),
        summary.skipped()
    )?;

    if summary.failed > 0 {
        writeln!(out, "Failed to delete {} {plural}.", summary.failed)?;
    }
    if summary.unparseable > 0 {
        writeln!(
            out,
            "Kept {} {plural} with unreadable timestamps.",
            summary.unparseable
        )?;
    }
    Ok(())
}
