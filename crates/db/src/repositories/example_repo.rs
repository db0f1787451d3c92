//! Repository for the `examples` table.

use async_trait::async_trait;
use stencil_core::types::DbId;

use crate::models::example::{table, ExampleEntity};
use crate::session::DbSession;

/// Storage operations for examples.
///
/// Every write is its own committed unit: `save` and `delete` commit before
/// returning, so two calls never share a transaction.
#[async_trait]
pub trait ExampleRepository: Send {
    /// Every row, in storage order. Empty when the table is empty.
    async fn find_all(&mut self) -> Result<Vec<ExampleEntity>, sqlx::Error>;

    /// The row with `id`, or `None`.
    async fn find_by_id(&mut self, id: DbId) -> Result<Option<ExampleEntity>, sqlx::Error>;

    /// The first row named `name`, or `None`. Names are not unique.
    async fn find_by_name(&mut self, name: &str) -> Result<Option<ExampleEntity>, sqlx::Error>;

    /// Insert `entity` if it has no id, otherwise update the row with its id.
    ///
    /// Returns the committed row, including storage-assigned id and
    /// timestamps.
    async fn save(&mut self, entity: ExampleEntity) -> Result<ExampleEntity, sqlx::Error>;

    /// Remove the row for `entity`. Returns `true` if a row was deleted.
    async fn delete(&mut self, entity: &ExampleEntity) -> Result<bool, sqlx::Error>;

    /// Whether a row with `id` exists.
    async fn exists_by_id(&mut self, id: DbId) -> Result<bool, sqlx::Error>;
}

/// Postgres-backed [`ExampleRepository`] bound to one session.
pub struct PgExampleRepo {
    session: DbSession,
}

impl PgExampleRepo {
    pub fn new(session: DbSession) -> Self {
        Self { session }
    }

    async fn insert(&mut self, entity: &ExampleEntity) -> Result<ExampleEntity, sqlx::Error> {
        let query = format!(
            "INSERT INTO {table} ({name}, {description}) VALUES ($1, $2) RETURNING {columns}",
            table = table::NAME,
            name = table::NAME_COL,
            description = table::DESCRIPTION,
            columns = table::COLUMNS,
        );
        let mut tx = self.session.begin().await?;
        let row = sqlx::query_as::<_, ExampleEntity>(&query)
            .bind(&entity.name)
            .bind(&entity.description)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(row)
    }

    async fn update(
        &mut self,
        id: DbId,
        entity: &ExampleEntity,
    ) -> Result<ExampleEntity, sqlx::Error> {
        let query = format!(
            "UPDATE {table} SET {name} = $2, {description} = $3, {updated_at} = NOW() \
             WHERE {id} = $1 RETURNING {columns}",
            table = table::NAME,
            name = table::NAME_COL,
            description = table::DESCRIPTION,
            updated_at = table::UPDATED_AT,
            id = table::ID,
            columns = table::COLUMNS,
        );
        let mut tx = self.session.begin().await?;
        // A row deleted since it was read surfaces as `RowNotFound`.
        let row = sqlx::query_as::<_, ExampleEntity>(&query)
            .bind(id)
            .bind(&entity.name)
            .bind(&entity.description)
            .fetch_one(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(row)
    }
}

#[async_trait]
impl ExampleRepository for PgExampleRepo {
    async fn find_all(&mut self) -> Result<Vec<ExampleEntity>, sqlx::Error> {
        let query = format!("SELECT {} FROM {}", table::COLUMNS, table::NAME);
        sqlx::query_as::<_, ExampleEntity>(&query)
            .fetch_all(self.session.connection())
            .await
    }

    async fn find_by_id(&mut self, id: DbId) -> Result<Option<ExampleEntity>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} WHERE {} = $1",
            table::COLUMNS,
            table::NAME,
            table::ID
        );
        sqlx::query_as::<_, ExampleEntity>(&query)
            .bind(id)
            .fetch_optional(self.session.connection())
            .await
    }

    async fn find_by_name(&mut self, name: &str) -> Result<Option<ExampleEntity>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM {} WHERE {} = $1 ORDER BY {} LIMIT 1",
            table::COLUMNS,
            table::NAME,
            table::NAME_COL,
            table::ID
        );
        sqlx::query_as::<_, ExampleEntity>(&query)
            .bind(name)
            .fetch_optional(self.session.connection())
            .await
    }

    async fn save(&mut self, entity: ExampleEntity) -> Result<ExampleEntity, sqlx::Error> {
        let saved = match entity.id {
            None => self.insert(&entity).await?,
            Some(id) => self.update(id, &entity).await?,
        };
        tracing::debug!(id = ?saved.id, "Example saved");
        Ok(saved)
    }

    async fn delete(&mut self, entity: &ExampleEntity) -> Result<bool, sqlx::Error> {
        let Some(id) = entity.id else {
            return Ok(false);
        };
        let query = format!("DELETE FROM {} WHERE {} = $1", table::NAME, table::ID);
        let mut tx = self.session.begin().await?;
        let result = sqlx::query(&query).bind(id).execute(&mut *tx).await?;
        tx.commit().await?;
        tracing::debug!(id, "Example deleted");
        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_id(&mut self, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!(
            "SELECT EXISTS (SELECT 1 FROM {} WHERE {} = $1)",
            table::NAME,
            table::ID
        );
        sqlx::query_scalar::<_, bool>(&query)
            .bind(id)
            .fetch_one(self.session.connection())
            .await
    }
}
