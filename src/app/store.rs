//! The document store.
//!
//! This module is the only collaborator that touches PostgreSQL. Each
//! collection is a table of JSONB documents with a top-level unique `id`
//! field; the internal `seq` column is the storage key that preserves
//! insertion order and is never exposed to callers.

use crate::domain::resource::{Filter, SortOrder};
use crate::infra::config;
use serde_json::Value as JsonValue;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

/// The main service that manages collection tables and document access.
pub struct DocumentStore {
    pool: PgPool,
    schema: String,
}

impl DocumentStore {
    /// Connects to the database and provisions every collection table.
    ///
    /// Table creation is idempotent, so restarting against an existing
    /// database is a no-op.
    pub async fn new(collections: &[String]) -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        let database_url = config::database_url();
        let schema = config::database_schema();
        ensure_ident(&schema)?;

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await?;

        sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", schema))
            .execute(&pool)
            .await?;

        for collection in collections {
            ensure_ident(collection)?;
            sqlx::query(&format!(
                "CREATE TABLE IF NOT EXISTS {}.{} (
                    seq BIGSERIAL,
                    id TEXT PRIMARY KEY,
                    doc JSONB NOT NULL
                )",
                schema, collection
            ))
            .execute(&pool)
            .await?;
        }

        // Wishlists are keyed by userId, not id; enforce one document per user.
        sqlx::query(&format!(
            "CREATE UNIQUE INDEX IF NOT EXISTS user_wishlists_user_id
             ON {}.user_wishlists ((doc->>'userId'))",
            schema
        ))
        .execute(&pool)
        .await?;

        Ok(Self { pool, schema })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Closes the connection pool. Called on graceful shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    fn table(&self, collection: &str) -> String {
        format!("{}.{}", self.schema, collection)
    }

    /// Lists documents, optionally filtered, in the resource's order.
    pub async fn list(
        &self,
        collection: &str,
        filter: Option<&Filter>,
        sort: SortOrder,
    ) -> anyhow::Result<Vec<JsonValue>> {
        ensure_ident(collection)?;
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT doc FROM ");
        qb.push(self.table(collection));

        if let Some(filter) = filter {
            qb.push(" WHERE ");
            push_filter(&mut qb, filter)?;
        }

        match sort {
            SortOrder::Insertion => {
                qb.push(" ORDER BY seq");
            }
            SortOrder::Ascending(field) => {
                // Numeric sort key (e.g. promo card `order`); unkeyed documents go last.
                qb.push(format!(
                    " ORDER BY (doc->>'{}')::numeric ASC NULLS LAST, seq",
                    field
                ));
            }
            SortOrder::Descending(field) => {
                // RFC 3339 strings sort chronologically as text.
                qb.push(format!(" ORDER BY doc->>'{}' DESC NULLS LAST, seq", field));
            }
        }

        let rows = qb.build().fetch_all(&self.pool).await?;
        let mut docs = Vec::with_capacity(rows.len());
        for row in rows {
            docs.push(row.try_get("doc")?);
        }
        Ok(docs)
    }

    /// Returns the document with the given id, if any.
    pub async fn get(&self, collection: &str, id: &str) -> anyhow::Result<Option<JsonValue>> {
        ensure_ident(collection)?;
        let sql = format!("SELECT doc FROM {} WHERE id = $1", self.table(collection));
        let row = sqlx::query(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.map(|r| r.try_get("doc")).transpose().map_err(Into::into)
    }

    /// Returns the first document matching the filter, if any.
    pub async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> anyhow::Result<Option<JsonValue>> {
        ensure_ident(collection)?;
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT doc FROM ");
        qb.push(self.table(collection)).push(" WHERE ");
        push_filter(&mut qb, filter)?;
        qb.push(" ORDER BY seq LIMIT 1");

        let row = qb.build().fetch_optional(&self.pool).await?;
        row.map(|r| r.try_get("doc")).transpose().map_err(Into::into)
    }

    /// Inserts a document. The document must already carry its `id`.
    pub async fn insert(&self, collection: &str, doc: &JsonValue) -> anyhow::Result<JsonValue> {
        ensure_ident(collection)?;
        let id = doc_id(doc)
            .ok_or_else(|| anyhow::anyhow!("Document must carry a string 'id' field"))?;
        let sql = format!(
            "INSERT INTO {} (id, doc) VALUES ($1, $2::jsonb) RETURNING doc",
            self.table(collection)
        );
        let row = sqlx::query(&sql)
            .bind(&id)
            .bind(doc)
            .fetch_one(&self.pool)
            .await?;
        row.try_get("doc").map_err(Into::into)
    }

    /// Merges the given fields onto the document matched by id ("patch"
    /// semantics: fields absent from the patch are left untouched).
    ///
    /// Returns the updated document, or None when no document matched.
    pub async fn update(
        &self,
        collection: &str,
        id: &str,
        patch: &JsonValue,
    ) -> anyhow::Result<Option<JsonValue>> {
        ensure_ident(collection)?;
        let sql = format!(
            "UPDATE {} SET doc = doc || $2::jsonb WHERE id = $1 RETURNING doc",
            self.table(collection)
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .bind(patch)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| r.try_get("doc")).transpose().map_err(Into::into)
    }

    /// Inserts or fully replaces a document by id. Used by the seed
    /// endpoints and the singleton/wishlist writers.
    pub async fn upsert(&self, collection: &str, doc: &JsonValue) -> anyhow::Result<JsonValue> {
        ensure_ident(collection)?;
        let id = doc_id(doc)
            .ok_or_else(|| anyhow::anyhow!("Document must carry a string 'id' field"))?;
        let sql = format!(
            "INSERT INTO {} (id, doc) VALUES ($1, $2::jsonb)
             ON CONFLICT (id) DO UPDATE SET doc = EXCLUDED.doc
             RETURNING doc",
            self.table(collection)
        );
        let row = sqlx::query(&sql)
            .bind(&id)
            .bind(doc)
            .fetch_one(&self.pool)
            .await?;
        row.try_get("doc").map_err(Into::into)
    }

    /// Deletes the document with the given id. Idempotent: deleting an
    /// absent id is not an error. Returns the number of rows removed.
    pub async fn delete(&self, collection: &str, id: &str) -> anyhow::Result<u64> {
        ensure_ident(collection)?;
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table(collection));
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Removes every document in the collection (bulk-replace seeding).
    pub async fn clear(&self, collection: &str) -> anyhow::Result<u64> {
        ensure_ident(collection)?;
        let sql = format!("DELETE FROM {}", self.table(collection));
        let result = sqlx::query(&sql).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Counts documents in the collection.
    pub async fn count(&self, collection: &str) -> anyhow::Result<i64> {
        ensure_ident(collection)?;
        let sql = format!("SELECT COUNT(*) FROM {}", self.table(collection));
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }
}

/// Extracts a document's id as a string, tolerating numeric ids the way the
/// rest of the contract does.
pub fn doc_id(doc: &JsonValue) -> Option<String> {
    match doc.get("id")? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Renders a filter tree into the query. Field names come from the static
/// resource catalog, but are validated anyway before being spliced into SQL.
fn push_filter(qb: &mut QueryBuilder<Postgres>, filter: &Filter) -> anyhow::Result<()> {
    match filter {
        Filter::Eq(field, value) => {
            ensure_ident(field)?;
            qb.push(format!("doc->>'{}' = ", field));
            qb.push_bind(value.clone());
        }
        Filter::In(field, values) => {
            ensure_ident(field)?;
            qb.push(format!("doc->>'{}' = ANY(", field));
            qb.push_bind(values.clone());
            qb.push(")");
        }
        Filter::Missing(field) => {
            ensure_ident(field)?;
            qb.push(format!(
                "(doc->'{f}' IS NULL OR doc->'{f}' = 'null'::jsonb)",
                f = field
            ));
        }
        Filter::And(parts) | Filter::Or(parts) => {
            if parts.is_empty() {
                qb.push("TRUE");
                return Ok(());
            }
            let joiner = if matches!(filter, Filter::And(_)) {
                " AND "
            } else {
                " OR "
            };
            qb.push("(");
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    qb.push(joiner);
                }
                push_filter(qb, part)?;
            }
            qb.push(")");
        }
    }
    Ok(())
}

fn ensure_ident(ident: &str) -> anyhow::Result<()> {
    let mut chars = ident.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(anyhow::anyhow!("Invalid identifier '{}'", ident))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn doc_id_accepts_string_and_numeric_ids() {
        assert_eq!(doc_id(&json!({"id": "u1"})), Some("u1".to_string()));
        assert_eq!(doc_id(&json!({"id": 42})), Some("42".to_string()));
        assert_eq!(doc_id(&json!({"id": null})), None);
        assert_eq!(doc_id(&json!({"name": "no id"})), None);
    }

    #[test]
    fn ensure_ident_rejects_sql_metacharacters() {
        assert!(ensure_ident("userId").is_ok());
        assert!(ensure_ident("_private").is_ok());
        assert!(ensure_ident("promo_cards").is_ok());
        assert!(ensure_ident("").is_err());
        assert!(ensure_ident("1col").is_err());
        assert!(ensure_ident("doc'; DROP TABLE users; --").is_err());
    }

    #[test]
    fn filter_rendering_produces_expected_sql() {
        let filter = Filter::Or(vec![
            Filter::eq("userId", "u1"),
            Filter::And(vec![
                Filter::Missing("userId".to_string()),
                Filter::In(
                    "target".to_string(),
                    vec!["user".to_string(), "all".to_string()],
                ),
            ]),
        ]);
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT doc FROM notifications WHERE ");
        push_filter(&mut qb, &filter).unwrap();
        assert_eq!(
            qb.sql(),
            "SELECT doc FROM notifications WHERE (doc->>'userId' = $1 OR \
             ((doc->'userId' IS NULL OR doc->'userId' = 'null'::jsonb) AND doc->>'target' = ANY($2)))"
        );
    }
}
