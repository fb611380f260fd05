//! User service - profile lookup and admin account management.
//!
//! Users are only ever soft-deleted; roles are fixed at registration and
//! nothing here changes them.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{policy, Identity, User};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;
use crate::types::{Paginated, PaginationParams};

#[async_trait]
pub trait UserService: Send + Sync {
    /// The caller's own live profile
    async fn me(&self, identity: &Identity) -> AppResult<User>;

    /// Page through live users (admin)
    async fn list_users(
        &self,
        identity: &Identity,
        params: PaginationParams,
    ) -> AppResult<Paginated<User>>;

    /// Soft delete a user (admin, never oneself)
    async fn delete_user(&self, identity: &Identity, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn me(&self, identity: &Identity) -> AppResult<User> {
        self.uow
            .users()
            .find_by_id(identity.id)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    async fn list_users(
        &self,
        identity: &Identity,
        params: PaginationParams,
    ) -> AppResult<Paginated<User>> {
        policy::require_admin(identity)?;
        let (users, total) = self.uow.users().list(params).await?;
        Ok(Paginated::new(users, params, total))
    }

    async fn delete_user(&self, identity: &Identity, id: Uuid) -> AppResult<()> {
        policy::require_admin(identity)?;
        if identity.id == id {
            return Err(AppError::validation("You cannot delete your own account"));
        }

        let deleted = self.uow.users().soft_delete(id, identity.id).await?;
        deleted.then_some(()).ok_or_not_found()?;

        tracing::info!(user_id = %id, actor = %identity.id, "User deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserRole;
    use crate::infra::{MockPersistence, MockUserRepository};

    fn service(users: MockUserRepository) -> UserManager<MockPersistence> {
        UserManager::new(Arc::new(MockPersistence {
            users: Arc::new(users),
            ..Default::default()
        }))
    }

    fn admin() -> Identity {
        Identity::new(Uuid::new_v4(), UserRole::Admin)
    }

    #[tokio::test]
    async fn listing_users_requires_admin() {
        let employer = Identity::new(Uuid::new_v4(), UserRole::Employer);
        let err = service(MockUserRepository::new())
            .list_users(&employer, PaginationParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn admin_cannot_delete_self() {
        let admin = admin();
        let err = service(MockUserRepository::new())
            .delete_user(&admin, admin.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn deleting_unknown_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_soft_delete().returning(|_, _| Ok(false));

        let err = service(users)
            .delete_user(&admin(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn delete_records_the_admin_as_actor() {
        let admin = admin();
        let target = Uuid::new_v4();
        let mut users = MockUserRepository::new();
        users
            .expect_soft_delete()
            .withf(move |id, actor| *id == target && *actor == admin.id)
            .times(1)
            .returning(|_, _| Ok(true));

        service(users).delete_user(&admin, target).await.unwrap();
    }

    #[tokio::test]
    async fn deleted_caller_has_no_profile() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|_| Ok(None));

        let seeker = Identity::new(Uuid::new_v4(), UserRole::JobSeeker);
        assert!(matches!(
            service(users).me(&seeker).await,
            Err(AppError::Unauthorized)
        ));
    }
}
