//! Vector similarity storage for subtopics and biolinks

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use std::cmp::Ordering;
use tracing::{debug, info};

use crate::error::{AppError, Result};

/// `LIMIT` bind value for a requested result count
fn row_limit(top_n: usize) -> Result<i64> {
    i64::try_from(top_n)
        .map_err(|_| AppError::InvalidRequest(format!("top_n {} is too large", top_n)))
}

/// Subtopic row ranked by similarity to a query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubtopicMatch {
    pub id: String,
    pub name: String,
    pub text: String,
    #[serde(rename = "topicId")]
    pub topic_id: String,
    /// Negative inner product; lower is closer
    pub similarity: f64,
}

/// Embedded anatomy link
#[derive(Debug, Clone, PartialEq)]
pub struct Biolink {
    pub name: String,
    pub href: String,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BiolinkMatch {
    pub name: String,
    pub href: String,
    pub similarity: f64,
}

#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create owned tables if missing
    async fn ensure_schema(&self) -> Result<()>;

    /// Closest subtopics by negative inner product, ascending
    async fn search_subtopics(&self, query: &[f32], top_n: usize) -> Result<Vec<SubtopicMatch>>;

    /// Insert biolinks, returning the number of rows written
    async fn insert_biolinks(&self, links: &[Biolink]) -> Result<usize>;

    /// Closest biolinks by negative inner product, ascending
    async fn search_biolinks(&self, query: &[f32], top_n: usize) -> Result<Vec<BiolinkMatch>>;
}

/// pgvector text literal, e.g. `[0.1,0.2]`
pub fn vector_literal(values: &[f32]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", parts.join(","))
}

/// Negative inner product, the pgvector `<#>` metric
pub fn negative_inner_product(a: &[f32], b: &[f32]) -> f64 {
    -a.iter()
        .zip(b)
        .map(|(x, y)| f64::from(*x) * f64::from(*y))
        .sum::<f64>()
}

/// PostgreSQL store using the pgvector extension.
///
/// Vectors are bound as text literals and cast with `::vector`.
#[derive(Clone)]
pub struct PgVectorStore {
    pool: PgPool,
}

impl PgVectorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VectorStore for PgVectorStore {
    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS biolinks (
                id SERIAL PRIMARY KEY,
                name TEXT,
                href TEXT,
                vector VECTOR(1536)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        info!("Biolinks schema ready");
        Ok(())
    }

    async fn search_subtopics(&self, query: &[f32], top_n: usize) -> Result<Vec<SubtopicMatch>> {
        let rows = sqlx::query(
            r#"
            SELECT id::text AS id, name, text, "topicId"::text AS topic_id,
                   ((embedding::vector) <#> $1::vector)::float8 AS similarity
            FROM subtopics
            ORDER BY similarity
            LIMIT $2
            "#,
        )
        .bind(vector_literal(query))
        .bind(row_limit(top_n)?)
        .fetch_all(&self.pool)
        .await?;

        let matches = rows
            .iter()
            .map(|row| -> Result<SubtopicMatch> {
                Ok(SubtopicMatch {
                    id: row.try_get::<Option<String>, _>("id")?.unwrap_or_default(),
                    name: row.try_get::<Option<String>, _>("name")?.unwrap_or_default(),
                    text: row.try_get::<Option<String>, _>("text")?.unwrap_or_default(),
                    topic_id: row.try_get::<Option<String>, _>("topic_id")?.unwrap_or_default(),
                    similarity: row.try_get::<Option<f64>, _>("similarity")?.unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(results = matches.len(), "Subtopic similarity search");
        Ok(matches)
    }

    async fn insert_biolinks(&self, links: &[Biolink]) -> Result<usize> {
        let mut tx = self.pool.begin().await?;

        for link in links {
            sqlx::query("INSERT INTO biolinks (name, href, vector) VALUES ($1, $2, $3::vector)")
                .bind(&link.name)
                .bind(&link.href)
                .bind(vector_literal(&link.embedding))
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(links.len())
    }

    async fn search_biolinks(&self, query: &[f32], top_n: usize) -> Result<Vec<BiolinkMatch>> {
        let rows = sqlx::query(
            r#"
            SELECT name, href, (vector <#> $1::vector)::float8 AS similarity
            FROM biolinks
            ORDER BY similarity
            LIMIT $2
            "#,
        )
        .bind(vector_literal(query))
        .bind(row_limit(top_n)?)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| -> Result<BiolinkMatch> {
                Ok(BiolinkMatch {
                    name: row.try_get::<Option<String>, _>("name")?.unwrap_or_default(),
                    href: row.try_get::<Option<String>, _>("href")?.unwrap_or_default(),
                    similarity: row.try_get::<Option<f64>, _>("similarity")?.unwrap_or_default(),
                })
            })
            .collect()
    }
}

/// Subtopic row held by [`InMemoryVectorStore`]
#[derive(Debug, Clone)]
pub struct SubtopicRecord {
    pub id: String,
    pub name: String,
    pub text: String,
    pub topic_id: String,
    pub embedding: Vec<f32>,
}

/// In-memory store with the same metric as pgvector `<#>`
#[derive(Default)]
pub struct InMemoryVectorStore {
    subtopics: RwLock<Vec<SubtopicRecord>>,
    biolinks: RwLock<Vec<Biolink>>,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_subtopics(subtopics: Vec<SubtopicRecord>) -> Self {
        Self {
            subtopics: RwLock::new(subtopics),
            biolinks: RwLock::new(Vec::new()),
        }
    }

    pub fn biolink_count(&self) -> usize {
        self.biolinks.read().len()
    }
}

fn by_similarity(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn ensure_schema(&self) -> Result<()> {
        Ok(())
    }

    async fn search_subtopics(&self, query: &[f32], top_n: usize) -> Result<Vec<SubtopicMatch>> {
        let mut matches: Vec<SubtopicMatch> = self
            .subtopics
            .read()
            .iter()
            .map(|record| SubtopicMatch {
                id: record.id.clone(),
                name: record.name.clone(),
                text: record.text.clone(),
                topic_id: record.topic_id.clone(),
                similarity: negative_inner_product(&record.embedding, query),
            })
            .collect();

        matches.sort_by(|a, b| by_similarity(a.similarity, b.similarity));
        matches.truncate(top_n);
        Ok(matches)
    }

    async fn insert_biolinks(&self, links: &[Biolink]) -> Result<usize> {
        self.biolinks.write().extend_from_slice(links);
        Ok(links.len())
    }

    async fn search_biolinks(&self, query: &[f32], top_n: usize) -> Result<Vec<BiolinkMatch>> {
        let mut matches: Vec<BiolinkMatch> = self
            .biolinks
            .read()
            .iter()
            .map(|link| BiolinkMatch {
                name: link.name.clone(),
                href: link.href.clone(),
                similarity: negative_inner_product(&link.embedding, query),
            })
            .collect();

        matches.sort_by(|a, b| by_similarity(a.similarity, b.similarity));
        matches.truncate(top_n);
        Ok(matches)
    }
}
