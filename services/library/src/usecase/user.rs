use chrono::Utc;
use uuid::Uuid;

use lectern_domain::user::UserRole;

use crate::domain::reading::is_blank;
use crate::domain::repository::{SubscriptionRepository, UserRepository};
use crate::domain::types::{AdminEvent, ProfileUpdate, SyncUser, User};
use crate::error::LibraryServiceError;

pub const USER_ROLE_CHANGED: &str = "USER_ROLE_CHANGED";

// ── ResolveUser ──────────────────────────────────────────────────────────────

pub struct ResolveUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ResolveUserUseCase<R> {
    pub async fn execute(&self, firebase_uid: &str) -> Result<User, LibraryServiceError> {
        self.repo
            .find_by_firebase_uid(firebase_uid)
            .await?
            .ok_or(LibraryServiceError::UserNotFound)
    }

    pub async fn execute_admin(&self, firebase_uid: &str) -> Result<User, LibraryServiceError> {
        let user = self.execute(firebase_uid).await?;
        if !user.role.is_admin() {
            return Err(LibraryServiceError::Forbidden);
        }
        Ok(user)
    }
}

// ── SyncUser ─────────────────────────────────────────────────────────────────

pub struct SyncUserInput {
    pub email: Option<String>,
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

pub struct SyncUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> SyncUserUseCase<R> {
    /// The verified email from the gateway wins over the one in the body.
    pub async fn execute(
        &self,
        firebase_uid: &str,
        verified_email: Option<String>,
        input: SyncUserInput,
    ) -> Result<User, LibraryServiceError> {
        let email = verified_email
            .or(input.email)
            .map(|e| e.trim().to_owned())
            .filter(|e| !e.is_empty())
            .ok_or(LibraryServiceError::MissingData)?;
        let user = self
            .repo
            .sync(&SyncUser {
                firebase_uid: firebase_uid.to_owned(),
                email,
                name: input.name.filter(|n| !is_blank(n)),
                photo_url: input.photo_url.filter(|p| !is_blank(p)),
            })
            .await?;
        tracing::debug!(user_id = %user.id, "user synced");
        Ok(user)
    }
}

// ── GetMe ────────────────────────────────────────────────────────────────────

pub struct Me {
    pub user: User,
    pub is_premium: bool,
}

pub struct GetMeUseCase<S: SubscriptionRepository> {
    pub subscriptions: S,
}

impl<S: SubscriptionRepository> GetMeUseCase<S> {
    pub async fn execute(&self, user: User) -> Result<Me, LibraryServiceError> {
        let is_premium = self
            .subscriptions
            .find_by_user(user.id)
            .await?
            .is_some_and(|s| s.is_active_at(Utc::now()));
        Ok(Me { user, is_premium })
    }
}

// ── UpdateMe ─────────────────────────────────────────────────────────────────

pub struct UpdateMeUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateMeUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        update: ProfileUpdate,
    ) -> Result<User, LibraryServiceError> {
        if update.name.is_none() && update.photo_url.is_none() {
            return Err(LibraryServiceError::MissingData);
        }
        if update.name.as_deref().is_some_and(is_blank) {
            return Err(LibraryServiceError::EmptyField("name"));
        }
        self.repo.update_profile(user_id, &update).await
    }
}

// ── SetUserRole ──────────────────────────────────────────────────────────────

pub struct SetUserRoleUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> SetUserRoleUseCase<R> {
    pub async fn execute(
        &self,
        actor: &User,
        user_id: Uuid,
        role: UserRole,
    ) -> Result<User, LibraryServiceError> {
        let event = AdminEvent::new(USER_ROLE_CHANGED, format!("User role set to {role}"))
            .with_description(format!("by {}", actor.email))
            .with_metadata(serde_json::json!({
                "user_id": user_id,
                "role": role.as_str(),
                "actor_id": actor.id,
            }));
        let user = self
            .repo
            .set_role(user_id, role, &event)
            .await?
            .ok_or(LibraryServiceError::UserNotFound)?;
        tracing::info!(%user_id, %role, actor_id = %actor.id, "user role changed");
        Ok(user)
    }
}
