//! Service for the Example resource.

use stencil_core::error::CoreError;
use stencil_core::example::{self, ExampleDto, ENTITY_NAME};
use stencil_core::types::DbId;
use stencil_db::models::example::ExampleEntity;
use stencil_db::repositories::ExampleRepository;
use stencil_db::DataSource;

use super::{ServiceError, ServiceResult};
use crate::schemas::example::{ExampleCreateRequest, ExampleUpdateRequest};

/// Example business rules over one request-scoped repository.
///
/// Dropping the service releases the repository's session.
pub struct ExampleService {
    repo: Box<dyn ExampleRepository>,
}

impl ExampleService {
    pub fn new(repo: Box<dyn ExampleRepository>) -> Self {
        Self { repo }
    }

    /// Open a service on a fresh session from `source`.
    pub async fn open(source: &dyn DataSource) -> ServiceResult<Self> {
        Ok(Self::new(source.examples().await?))
    }

    /// Every example. Empty when there are none.
    pub async fn get_all(&mut self) -> ServiceResult<Vec<ExampleDto>> {
        self.repo
            .find_all()
            .await?
            .into_iter()
            .map(to_dto)
            .collect()
    }

    /// The example with `id`, or `NotFound`.
    pub async fn get_by_id(&mut self, id: DbId) -> ServiceResult<ExampleDto> {
        to_dto(self.find_existing(id).await?)
    }

    /// Persist a new example; storage assigns its id and timestamps.
    pub async fn create(&mut self, request: ExampleCreateRequest) -> ServiceResult<ExampleDto> {
        example::validate_name(&request.name)?;

        let entity = ExampleEntity::new(request.name, request.description);
        let saved = self.repo.save(entity).await?;
        tracing::info!(id = ?saved.id, name = %saved.name, "Example created");
        to_dto(saved)
    }

    /// Apply the fields present in `request` to the example with `id`.
    ///
    /// Absent fields keep their stored values.
    pub async fn update(
        &mut self,
        id: DbId,
        request: ExampleUpdateRequest,
    ) -> ServiceResult<ExampleDto> {
        let mut entity = self.find_existing(id).await?;

        if let Some(name) = request.name {
            example::validate_name(&name)?;
            entity.name = name;
        }
        if let Some(description) = request.description {
            entity.description = Some(description);
        }

        let saved = self.repo.save(entity).await?;
        tracing::info!(id, "Example updated");
        to_dto(saved)
    }

    /// Delete the example with `id`, or fail with `NotFound`.
    pub async fn delete(&mut self, id: DbId) -> ServiceResult<bool> {
        let entity = self.find_existing(id).await?;
        let deleted = self.repo.delete(&entity).await?;
        tracing::info!(id, deleted, "Example deleted");
        Ok(deleted)
    }

    /// Whether an example with `id` exists. Never fails on absence.
    pub async fn exists(&mut self, id: DbId) -> ServiceResult<bool> {
        Ok(self.repo.exists_by_id(id).await?)
    }

    async fn find_existing(&mut self, id: DbId) -> ServiceResult<ExampleEntity> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::Domain(CoreError::NotFound {
                entity: ENTITY_NAME,
                id,
            }))
    }
}

/// Convert a stored row into the service's output type.
fn to_dto(entity: ExampleEntity) -> ServiceResult<ExampleDto> {
    let id = entity
        .id
        .ok_or_else(|| CoreError::Internal("stored example has no id".into()))?;
    Ok(ExampleDto {
        id,
        name: entity.name,
        description: entity.description,
        created_at: entity.created_at,
        updated_at: entity.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use stencil_db::memory::{MemoryDataSource, MemoryStore};

    use super::*;

    fn create_request(name: &str, description: Option<&str>) -> ExampleCreateRequest {
        ExampleCreateRequest {
            name: name.to_string(),
            description: description.map(str::to_string),
        }
    }

    async fn service(store: &MemoryStore) -> ExampleService {
        let source = MemoryDataSource::new(store.clone());
        ExampleService::open(&source).await.unwrap()
    }

    #[tokio::test]
    async fn get_all_on_empty_storage_is_empty() {
        let mut svc = service(&MemoryStore::new()).await;
        assert!(svc.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_all_maps_every_row() {
        let store = MemoryStore::new();
        let mut svc = service(&store).await;
        svc.create(create_request("A", None)).await.unwrap();
        svc.create(create_request("B", Some("b"))).await.unwrap();

        let all = svc.get_all().await.unwrap();
        let names: Vec<_> = all.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn create_assigns_id_and_equal_timestamps() {
        let mut svc = service(&MemoryStore::new()).await;
        let dto = svc
            .create(create_request("Widget", Some("blue")))
            .await
            .unwrap();

        assert!(dto.id > 0);
        assert_eq!(dto.name, "Widget");
        assert_eq!(dto.description.as_deref(), Some("blue"));
        assert!(dto.created_at.is_some());
        assert_eq!(dto.created_at, dto.updated_at);
    }

    #[tokio::test]
    async fn create_rejects_empty_name() {
        let store = MemoryStore::new();
        let mut svc = service(&store).await;

        let result = svc.create(create_request("", None)).await;
        assert_matches!(result, Err(ServiceError::Domain(CoreError::Validation(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn get_by_id_returns_created_example() {
        let mut svc = service(&MemoryStore::new()).await;
        let created = svc.create(create_request("Widget", None)).await.unwrap();

        let found = svc.get_by_id(created.id).await.unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn missing_id_is_not_found_for_get_update_delete() {
        let mut svc = service(&MemoryStore::new()).await;

        assert_matches!(
            svc.get_by_id(999).await,
            Err(ServiceError::Domain(CoreError::NotFound { id: 999, .. }))
        );
        assert_matches!(
            svc.update(999, ExampleUpdateRequest::default()).await,
            Err(ServiceError::Domain(CoreError::NotFound { id: 999, .. }))
        );
        assert_matches!(
            svc.delete(999).await,
            Err(ServiceError::Domain(CoreError::NotFound { id: 999, .. }))
        );
        assert!(!svc.exists(999).await.unwrap());
    }

    #[tokio::test]
    async fn update_name_only_keeps_description() {
        let mut svc = service(&MemoryStore::new()).await;
        let created = svc
            .create(create_request("Widget", Some("blue")))
            .await
            .unwrap();

        let updated = svc
            .update(
                created.id,
                ExampleUpdateRequest {
                    name: Some("Gadget".into()),
                    description: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Gadget");
        assert_eq!(updated.description.as_deref(), Some("blue"));
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn update_description_only_keeps_name() {
        let mut svc = service(&MemoryStore::new()).await;
        let created = svc.create(create_request("Widget", None)).await.unwrap();

        let updated = svc
            .update(
                created.id,
                ExampleUpdateRequest {
                    name: None,
                    description: Some("updated".into()),
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Widget");
        assert_eq!(updated.description.as_deref(), Some("updated"));
    }

    #[tokio::test]
    async fn empty_update_changes_nothing_but_updated_at() {
        let mut svc = service(&MemoryStore::new()).await;
        let created = svc
            .create(create_request("Widget", Some("blue")))
            .await
            .unwrap();

        let updated = svc
            .update(created.id, ExampleUpdateRequest::default())
            .await
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn delete_removes_the_example() {
        let mut svc = service(&MemoryStore::new()).await;
        let created = svc.create(create_request("Widget", None)).await.unwrap();

        assert!(svc.exists(created.id).await.unwrap());
        assert!(svc.delete(created.id).await.unwrap());
        assert!(!svc.exists(created.id).await.unwrap());
        assert_matches!(
            svc.get_by_id(created.id).await,
            Err(ServiceError::Domain(CoreError::NotFound { .. }))
        );
    }

    /// Repository whose every call fails with a connectivity error.
    struct UnreachableRepo;

    #[async_trait]
    impl ExampleRepository for UnreachableRepo {
        async fn find_all(&mut self) -> Result<Vec<ExampleEntity>, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }

        async fn find_by_id(&mut self, _id: DbId) -> Result<Option<ExampleEntity>, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }

        async fn find_by_name(
            &mut self,
            _name: &str,
        ) -> Result<Option<ExampleEntity>, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }

        async fn save(&mut self, _entity: ExampleEntity) -> Result<ExampleEntity, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }

        async fn delete(&mut self, _entity: &ExampleEntity) -> Result<bool, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }

        async fn exists_by_id(&mut self, _id: DbId) -> Result<bool, sqlx::Error> {
            Err(sqlx::Error::PoolTimedOut)
        }
    }

    #[tokio::test]
    async fn storage_errors_propagate_untouched() {
        let mut svc = ExampleService::new(Box::new(UnreachableRepo));

        assert_matches!(
            svc.get_all().await,
            Err(ServiceError::Storage(sqlx::Error::PoolTimedOut))
        );
        assert_matches!(
            svc.get_by_id(1).await,
            Err(ServiceError::Storage(sqlx::Error::PoolTimedOut))
        );
        assert_matches!(
            svc.exists(1).await,
            Err(ServiceError::Storage(sqlx::Error::PoolTimedOut))
        );
    }
}
