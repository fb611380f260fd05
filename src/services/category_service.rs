//! Category catalog service.
//!
//! Reads go through the Redis cache when one is configured; a cache failure
//! is logged and the database answers instead. Every mutation drops the
//! cached list.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::DEFAULT_CATEGORIES;
use crate::domain::category::normalize_category_name;
use crate::domain::{policy, Category, CategoryResponse, Identity};
use crate::errors::{AppResult, OptionExt};
use crate::infra::{Cache, UnitOfWork};

#[async_trait]
pub trait CategoryService: Send + Sync {
    /// Every live category, ordered by name
    async fn list(&self) -> AppResult<Vec<CategoryResponse>>;

    async fn create(&self, identity: &Identity, name: String) -> AppResult<Category>;

    async fn rename(&self, identity: &Identity, id: Uuid, name: String) -> AppResult<Category>;

    async fn delete(&self, identity: &Identity, id: Uuid) -> AppResult<()>;

    /// Insert any missing default category; returns how many were added
    async fn seed_defaults(&self) -> AppResult<usize>;
}

pub struct CategoryManager<U: UnitOfWork> {
    uow: Arc<U>,
    cache: Option<Arc<Cache>>,
}

impl<U: UnitOfWork> CategoryManager<U> {
    pub fn new(uow: Arc<U>, cache: Option<Arc<Cache>>) -> Self {
        Self { uow, cache }
    }

    async fn cached(&self) -> Option<Vec<CategoryResponse>> {
        let cache = self.cache.as_ref()?;
        match cache.get_categories().await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!("Category cache read failed: {}", e);
                None
            }
        }
    }

    async fn store_cached(&self, categories: &[CategoryResponse]) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set_categories(categories).await {
                tracing::warn!("Category cache write failed: {}", e);
            }
        }
    }

    async fn invalidate(&self) {
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.invalidate_categories().await {
                tracing::warn!("Category cache invalidation failed: {}", e);
            }
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> CategoryService for CategoryManager<U> {
    async fn list(&self) -> AppResult<Vec<CategoryResponse>> {
        if let Some(hit) = self.cached().await {
            tracing::debug!("Category list served from cache");
            return Ok(hit);
        }

        let categories: Vec<CategoryResponse> = self
            .uow
            .categories()
            .list()
            .await?
            .into_iter()
            .map(CategoryResponse::from)
            .collect();
        self.store_cached(&categories).await;
        Ok(categories)
    }

    async fn create(&self, identity: &Identity, name: String) -> AppResult<Category> {
        policy::require_admin(identity)?;
        let name = normalize_category_name(&name)?;

        let category = self
            .uow
            .categories()
            .create(name, Some(identity.id))
            .await?;
        self.invalidate().await;

        tracing::info!(category_id = %category.id, actor = %identity.id, "Category created");
        Ok(category)
    }

    async fn rename(&self, identity: &Identity, id: Uuid, name: String) -> AppResult<Category> {
        policy::require_admin(identity)?;
        let name = normalize_category_name(&name)?;

        let category = self.uow.categories().rename(id, name, identity.id).await?;
        self.invalidate().await;

        tracing::info!(category_id = %id, actor = %identity.id, "Category renamed");
        Ok(category)
    }

    async fn delete(&self, identity: &Identity, id: Uuid) -> AppResult<()> {
        policy::require_admin(identity)?;

        let deleted = self.uow.categories().soft_delete(id, identity.id).await?;
        deleted.then_some(()).ok_or_not_found()?;
        self.invalidate().await;

        tracing::info!(category_id = %id, actor = %identity.id, "Category deleted");
        Ok(())
    }

    async fn seed_defaults(&self) -> AppResult<usize> {
        let existing: HashSet<String> = self
            .uow
            .categories()
            .list()
            .await?
            .into_iter()
            .map(|c| c.name.to_lowercase())
            .collect();

        let mut added = 0;
        for name in DEFAULT_CATEGORIES {
            if existing.contains(&name.to_lowercase()) {
                continue;
            }
            self.uow.categories().create(name.to_string(), None).await?;
            added += 1;
        }
        if added > 0 {
            self.invalidate().await;
        }

        tracing::info!(added, "Default categories seeded");
        Ok(added)
    }
}
