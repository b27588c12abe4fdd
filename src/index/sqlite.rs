//! SQLite-backed index using FTS5.
//!
//! Each indexed item is stored as one row per field in `entries` plus a
//! matching FTS5 row in `entries_fts`. Phrase clauses translate to an FTS5
//! match expression (`"term" OR "term"*`), field restriction to a `field
//! IN (...)` predicate, and the control filter to a second MATCH against
//! the same table. FTS5 has no per-term boosting, so boosted and wildcard
//! clauses collapse to exact-or-prefix matching and relevance is plain
//! bm25, which is the native scoring the contract asks for.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{bail, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use crate::content::ContentItem;

use super::{IndexProvider, IndexQuery, IndexSearcher, SearchHit, SearchHits, TermKind};

/// Open (or create) an index database at the given path.
pub async fn connect(path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.display()))?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// SQLite FTS5 implementation of [`IndexSearcher`].
pub struct SqliteIndex {
    pool: SqlitePool,
}

impl SqliteIndex {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create the index schema if it does not exist.
    pub async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS entries (
                content_id TEXT NOT NULL,
                field      TEXT NOT NULL,
                value      TEXT NOT NULL,
                PRIMARY KEY (content_id, field)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE VIRTUAL TABLE IF NOT EXISTS entries_fts
            USING fts5(content_id UNINDEXED, field UNINDEXED, value)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Index an item's fields, replacing any previous entry with the same id.
    pub async fn add_item(&self, item: &ContentItem) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM entries WHERE content_id = ?")
            .bind(&item.id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM entries_fts WHERE content_id = ?")
            .bind(&item.id)
            .execute(&mut *tx)
            .await?;

        for (field, value) in &item.fields {
            sqlx::query("INSERT INTO entries (content_id, field, value) VALUES (?, ?, ?)")
                .bind(&item.id)
                .bind(field)
                .bind(value)
                .execute(&mut *tx)
                .await?;
            sqlx::query("INSERT INTO entries_fts (content_id, field, value) VALUES (?, ?, ?)")
                .bind(&item.id)
                .bind(field)
                .bind(value)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Quote a term for an FTS5 match expression.
fn fts_quote(term: &str) -> String {
    format!("\"{}\"", term.replace('"', "\"\""))
}

/// Translate the phrase clauses to a single FTS5 match expression.
fn fts_match_expr(query: &IndexQuery) -> String {
    let mut parts: Vec<String> = Vec::new();
    for clause in &query.terms {
        match clause.kind {
            TermKind::Boosted(_) => parts.push(fts_quote(&clause.term)),
            TermKind::Wildcard => parts.push(format!("{}*", fts_quote(&clause.term))),
        }
    }
    parts.join(" OR ")
}

enum QueryShape<'a> {
    /// Phrase clauses over a field set, optionally intersected with a
    /// control filter.
    Phrase {
        expr: String,
        fields: &'a [String],
        control: Option<&'a str>,
    },
    /// Control filter only.
    Control(&'a str),
    /// No filtering at all.
    All,
}

fn classify<'a>(query: &'a IndexQuery, expr: String) -> QueryShape<'a> {
    if query.has_phrase() && !expr.is_empty() {
        QueryShape::Phrase {
            expr,
            fields: &query.fields,
            control: query.control.as_deref(),
        }
    } else if let Some(control) = query.control.as_deref() {
        QueryShape::Control(control)
    } else {
        QueryShape::All
    }
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

#[async_trait]
impl IndexSearcher for SqliteIndex {
    async fn fields(&self) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT DISTINCT field FROM entries ORDER BY field")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.iter().map(|r| r.get("field")).collect())
    }

    async fn search(&self, query: &IndexQuery, skip: u64, take: u64) -> Result<SearchHits> {
        let total = self.count(query).await?;

        let rows = match classify(query, fts_match_expr(query)) {
            QueryShape::Phrase {
                expr,
                fields,
                control,
            } => {
                // bm25() is only valid directly against the FTS table, so
                // rank per row in an inner select and aggregate outside it.
                let mut sql = format!(
                    "SELECT content_id, MIN(r) AS r FROM ( \
                     SELECT content_id, bm25(entries_fts) AS r \
                     FROM entries_fts \
                     WHERE entries_fts MATCH ? AND field IN ({})",
                    placeholders(fields.len())
                );
                if control.is_some() {
                    sql.push_str(
                        " AND content_id IN \
                         (SELECT content_id FROM entries_fts WHERE entries_fts MATCH ?)",
                    );
                }
                // LIMIT -1 stops the query flattener from pulling bm25()
                // into the outer aggregate, where it is invalid.
                sql.push_str(" LIMIT -1) GROUP BY content_id ORDER BY r, content_id LIMIT ? OFFSET ?");

                let mut q = sqlx::query(&sql).bind(expr);
                for field in fields {
                    q = q.bind(field.as_str());
                }
                if let Some(control) = control {
                    q = q.bind(control);
                }
                q.bind(take as i64)
                    .bind(skip as i64)
                    .fetch_all(&self.pool)
                    .await?
            }
            QueryShape::Control(control) => {
                sqlx::query(
                    "SELECT content_id, MIN(r) AS r FROM ( \
                     SELECT content_id, bm25(entries_fts) AS r \
                     FROM entries_fts WHERE entries_fts MATCH ? LIMIT -1) \
                     GROUP BY content_id ORDER BY r, content_id LIMIT ? OFFSET ?",
                )
                .bind(control)
                .bind(take as i64)
                .bind(skip as i64)
                .fetch_all(&self.pool)
                .await?
            }
            QueryShape::All => {
                sqlx::query(
                    "SELECT content_id, 0.0 AS r FROM entries \
                     GROUP BY content_id ORDER BY MIN(rowid) LIMIT ? OFFSET ?",
                )
                .bind(take as i64)
                .bind(skip as i64)
                .fetch_all(&self.pool)
                .await?
            }
        };

        let hits: Vec<SearchHit> = rows
            .iter()
            .map(|row| {
                let rank: f64 = row.get("r");
                SearchHit {
                    id: row.get("content_id"),
                    // bm25 ranks smaller-is-better; negate like any other
                    // rank-to-score adaptation.
                    score: -rank as f32,
                }
            })
            .collect();

        Ok(SearchHits { total, hits })
    }

    async fn count(&self, query: &IndexQuery) -> Result<u64> {
        let row = match classify(query, fts_match_expr(query)) {
            QueryShape::Phrase {
                expr,
                fields,
                control,
            } => {
                let mut sql = format!(
                    "SELECT COUNT(DISTINCT content_id) AS n \
                     FROM entries_fts \
                     WHERE entries_fts MATCH ? AND field IN ({})",
                    placeholders(fields.len())
                );
                if control.is_some() {
                    sql.push_str(
                        " AND content_id IN \
                         (SELECT content_id FROM entries_fts WHERE entries_fts MATCH ?)",
                    );
                }
                let mut q = sqlx::query(&sql).bind(expr);
                for field in fields {
                    q = q.bind(field.as_str());
                }
                if let Some(control) = control {
                    q = q.bind(control);
                }
                q.fetch_one(&self.pool).await?
            }
            QueryShape::Control(control) => {
                sqlx::query(
                    "SELECT COUNT(DISTINCT content_id) AS n \
                     FROM entries_fts WHERE entries_fts MATCH ?",
                )
                .bind(control)
                .fetch_one(&self.pool)
                .await?
            }
            QueryShape::All => {
                sqlx::query("SELECT COUNT(DISTINCT content_id) AS n FROM entries")
                    .fetch_one(&self.pool)
                    .await?
            }
        };

        let n: i64 = row.get("n");
        Ok(n as u64)
    }
}

/// [`IndexProvider`] serving a single named SQLite index.
pub struct SqliteIndexProvider {
    name: String,
    index: Arc<SqliteIndex>,
}

impl SqliteIndexProvider {
    /// Serve `index` under the default index name.
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            name: super::DEFAULT_INDEX.to_string(),
            index: Arc::new(SqliteIndex::new(pool)),
        }
    }

    /// Serve the index under a different name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn index(&self) -> Arc<SqliteIndex> {
        self.index.clone()
    }
}

#[async_trait]
impl IndexProvider for SqliteIndexProvider {
    async fn searcher(&self, index_name: &str) -> Result<Arc<dyn IndexSearcher>> {
        if index_name != self.name {
            bail!("no such index: {index_name}");
        }
        Ok(self.index.clone() as Arc<dyn IndexSearcher>)
    }
}
