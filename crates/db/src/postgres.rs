//! PostgreSQL-backed [`EntryStore`].

use async_trait::async_trait;
use crosswordcoach_core::types::{CrosswordPuzzle, GetEntriesOptions};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::error::StoreError;
use crate::store::{EntryRecord, EntryStore, OrderField};

/// Column list for `entries` queries.
const ENTRY_COLUMNS: &str = "e.id, e.clue, e.answer, e.explanation";

pub struct PgEntryStore {
    pool: PgPool,
}

impl PgEntryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EntryStore for PgEntryStore {
    async fn get_entries(
        &self,
        options: &GetEntriesOptions,
    ) -> Result<Vec<EntryRecord>, StoreError> {
        let order = OrderField::parse(&options.order_by)?;
        let direction = options.order_direction.as_str();
        let offset = i64::try_from(options.offset()).map_err(|_| StoreError::PageOutOfRange)?;
        let filter = &options.filter;

        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {ENTRY_COLUMNS} FROM entries e WHERE TRUE"));

        if filter.source.is_some() || filter.day_of_week.is_some() {
            query.push(
                " AND EXISTS (SELECT 1 FROM entry_appearances ea \
                 JOIN puzzles p ON p.id = ea.puzzle_id \
                 WHERE ea.entry_id = e.id",
            );
            if let Some(source) = &filter.source {
                query.push(" AND p.source = ").push_bind(source.clone());
            }
            if let Some(day) = filter.day_of_week {
                query.push(" AND p.day_of_week = ").push_bind(i16::from(day));
            }
            query.push(")");
        }

        if let Some(range) = filter.answer_length {
            query
                .push(" AND char_length(e.answer) BETWEEN ")
                .push_bind(i64::from(range.min))
                .push(" AND ")
                .push_bind(i64::from(range.max));
        }

        query.push(format!(
            " ORDER BY {} {direction}, e.id {direction}",
            order.column()
        ));
        query
            .push(" LIMIT ")
            .push_bind(i64::from(options.page_size))
            .push(" OFFSET ")
            .push_bind(offset);

        let records = query
            .build_query_as::<EntryRecord>()
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!(
            page = options.page,
            page_size = options.page_size,
            returned = records.len(),
            "Fetched entries page"
        );

        Ok(records)
    }

    async fn save_puzzle(&self, puzzle: &CrosswordPuzzle) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO puzzles (id, source, puzzle_date, day_of_week) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (id) DO UPDATE SET \
                 source = EXCLUDED.source, \
                 puzzle_date = EXCLUDED.puzzle_date, \
                 day_of_week = EXCLUDED.day_of_week, \
                 updated_at = now()",
        )
        .bind(&puzzle.id)
        .bind(&puzzle.source)
        .bind(puzzle.date)
        .bind(i16::from(puzzle.day_of_week()))
        .execute(&mut *tx)
        .await?;

        for entry in &puzzle.entries {
            // DO UPDATE (not DO NOTHING) so RETURNING yields the existing id.
            let entry_id: i64 = sqlx::query_scalar(
                "INSERT INTO entries (clue, answer, explanation) \
                 VALUES ($1, $2, $3) \
                 ON CONFLICT (clue, answer) DO UPDATE SET \
                     explanation = COALESCE(entries.explanation, EXCLUDED.explanation) \
                 RETURNING id",
            )
            .bind(&entry.clue)
            .bind(&entry.answer)
            .bind(entry.explanation.as_deref())
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                "INSERT INTO entry_appearances (entry_id, puzzle_id) \
                 VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(entry_id)
            .bind(&puzzle.id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(
            puzzle_id = %puzzle.id,
            source = %puzzle.source,
            entries = puzzle.entries.len(),
            "Saved puzzle"
        );
        Ok(())
    }

    async fn find_explanation(
        &self,
        clue: &str,
        answer: &str,
    ) -> Result<Option<String>, StoreError> {
        let explanation: Option<Option<String>> = sqlx::query_scalar(
            "SELECT explanation FROM entries WHERE clue = $1 AND answer = $2",
        )
        .bind(clue)
        .bind(answer)
        .fetch_optional(&self.pool)
        .await?;

        Ok(explanation.flatten())
    }

    async fn set_explanation(
        &self,
        clue: &str,
        answer: &str,
        explanation: &str,
    ) -> Result<bool, StoreError> {
        let result =
            sqlx::query("UPDATE entries SET explanation = $3 WHERE clue = $1 AND answer = $2")
                .bind(clue)
                .bind(answer)
                .bind(explanation)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}
