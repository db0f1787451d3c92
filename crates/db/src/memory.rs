//! In-memory storage for tests.
//!
//! Mirrors the Postgres behaviour the service relies on: ids are assigned on
//! insert, `created_at == updated_at` for a fresh row, and every update
//! refreshes `updated_at`.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use stencil_core::types::DbId;

use crate::models::example::ExampleEntity;
use crate::repositories::ExampleRepository;
use crate::source::DataSource;

#[derive(Debug, Default)]
struct Tables {
    next_id: DbId,
    examples: BTreeMap<DbId, ExampleEntity>,
}

/// Shared in-memory tables. Clones see the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored examples.
    pub fn len(&self) -> usize {
        self.lock().examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// [`ExampleRepository`] over a [`MemoryStore`].
#[derive(Debug, Clone)]
pub struct MemoryExampleRepo {
    store: MemoryStore,
}

impl MemoryExampleRepo {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ExampleRepository for MemoryExampleRepo {
    async fn find_all(&mut self) -> Result<Vec<ExampleEntity>, sqlx::Error> {
        Ok(self.store.lock().examples.values().cloned().collect())
    }

    async fn find_by_id(&mut self, id: DbId) -> Result<Option<ExampleEntity>, sqlx::Error> {
        Ok(self.store.lock().examples.get(&id).cloned())
    }

    async fn find_by_name(&mut self, name: &str) -> Result<Option<ExampleEntity>, sqlx::Error> {
        Ok(self
            .store
            .lock()
            .examples
            .values()
            .find(|e| e.name == name)
            .cloned())
    }

    async fn save(&mut self, mut entity: ExampleEntity) -> Result<ExampleEntity, sqlx::Error> {
        let mut tables = self.store.lock();
        let now = Utc::now();
        match entity.id {
            None => {
                tables.next_id += 1;
                entity.id = Some(tables.next_id);
                entity.created_at = Some(now);
                entity.updated_at = Some(now);
            }
            Some(id) => {
                let existing = tables.examples.get(&id).ok_or(sqlx::Error::RowNotFound)?;
                entity.created_at = existing.created_at;
                entity.updated_at = Some(now);
            }
        }
        if let Some(id) = entity.id {
            tables.examples.insert(id, entity.clone());
        }
        Ok(entity)
    }

    async fn delete(&mut self, entity: &ExampleEntity) -> Result<bool, sqlx::Error> {
        let Some(id) = entity.id else {
            return Ok(false);
        };
        Ok(self.store.lock().examples.remove(&id).is_some())
    }

    async fn exists_by_id(&mut self, id: DbId) -> Result<bool, sqlx::Error> {
        Ok(self.store.lock().examples.contains_key(&id))
    }
}

/// [`DataSource`] over a [`MemoryStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryDataSource {
    store: MemoryStore,
}

impl MemoryDataSource {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }
}

#[async_trait]
impl DataSource for MemoryDataSource {
    async fn examples(&self) -> Result<Box<dyn ExampleRepository>, sqlx::Error> {
        Ok(Box::new(MemoryExampleRepo::new(self.store.clone())))
    }

    async fn ping(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}
