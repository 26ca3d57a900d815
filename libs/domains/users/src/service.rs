//! User Service - registration with email verification, login and profile management

use std::sync::Arc;

use axum_helpers::{JwtAuth, TokenSubject};
use bson::oid::ObjectId;
use chrono::Utc;
use core_accounts::{
    Actor, Credentials, Page, PageQuery, ProfileUpdate, Registration, VerificationCode,
    hash_password, resolve_password_change, verification::CODE_TTL_MINUTES, verify_password,
};
use core_uploads::UploadStore;
use domain_notifications::NotificationService;
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::models::{User, UserResponse, UserStatus, VerificationOutcome, VerifyRequest};
use crate::repository::UserRepository;

#[derive(Clone)]
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    auth: JwtAuth,
    uploads: UploadStore,
    notifications: NotificationService,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(
        repository: R,
        auth: JwtAuth,
        uploads: UploadStore,
        notifications: NotificationService,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            auth,
            uploads,
            notifications,
        }
    }

    async fn find(&self, id: ObjectId) -> UserResult<User> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound)
    }

    async fn ensure_unique(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
        exclude: Option<ObjectId>,
    ) -> UserResult<()> {
        if let Some(email) = email
            && self.repository.email_taken(email, exclude).await?
        {
            return Err(UserError::DuplicateEmail(email.to_string()));
        }
        if let Some(phone) = phone
            && self.repository.phone_taken(phone, exclude).await?
        {
            return Err(UserError::DuplicatePhone(phone.to_string()));
        }
        Ok(())
    }

    async fn send_code(&self, user: &User, code: &VerificationCode) -> UserResult<()> {
        self.notifications
            .send_verification_code(&user.email, &user.full_name(), &code.code, CODE_TTL_MINUTES)
            .await?;
        Ok(())
    }

    /// Create a NOTVERIFIED account and email its verification code.
    ///
    /// A failed send does not undo the account; the code can be re-sent.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: Registration) -> UserResult<UserResponse> {
        self.ensure_unique(Some(&input.email), Some(&input.mobile_phone), None)
            .await?;

        let hash = hash_password(&input.password)?;
        let code = VerificationCode::generate(Utc::now());
        let user = self
            .repository
            .create(User::new(input, hash, code.clone()))
            .await?;

        if let Err(err) = self.send_code(&user, &code).await {
            tracing::warn!(user_id = %user.id, error = %err, "Verification email not sent");
        }
        Ok(UserResponse::new(user, &self.uploads))
    }

    #[instrument(skip(self, request))]
    pub async fn verify(&self, request: VerifyRequest) -> UserResult<VerificationOutcome> {
        let (Some(email), Some(code)) = (
            request.email.filter(|e| !e.trim().is_empty()),
            request.code.filter(|c| !c.trim().is_empty()),
        ) else {
            return Err(UserError::MissingVerificationFields);
        };

        let mut user = self
            .repository
            .find_by_email(email.trim())
            .await?
            .ok_or(UserError::NotFound)?;

        match user.status {
            UserStatus::Verified => return Ok(VerificationOutcome::AlreadyVerified),
            UserStatus::Blocked => return Err(UserError::Blocked(user.block_reason)),
            UserStatus::NotVerified => {}
        }

        if !user.verify(&code, Utc::now()) {
            return Err(UserError::InvalidCode);
        }
        self.repository.update(user).await?;

        tracing::info!("User verified");
        Ok(VerificationOutcome::Verified)
    }

    /// Issue and email a fresh code, replacing any pending one
    #[instrument(skip(self))]
    pub async fn resend_verification(&self, email: &str) -> UserResult<VerificationOutcome> {
        let mut user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or(UserError::NotFound)?;

        match user.status {
            UserStatus::Verified => return Ok(VerificationOutcome::AlreadyVerified),
            UserStatus::Blocked => return Err(UserError::Blocked(user.block_reason)),
            UserStatus::NotVerified => {}
        }

        let code = VerificationCode::generate(Utc::now());
        user.verification = Some(code.clone());
        user.updated_at = Utc::now();
        let user = self.repository.update(user).await?;

        self.send_code(&user, &code).await?;
        Ok(VerificationOutcome::CodeSent)
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: Credentials) -> UserResult<String> {
        let mut user = self
            .repository
            .find_by_email(&credentials.email)
            .await?
            .ok_or(UserError::InvalidCredentials)?;

        if !verify_password(&credentials.password, &user.password)? {
            return Err(UserError::InvalidCredentials);
        }
        match user.status {
            UserStatus::NotVerified => return Err(UserError::NotVerified),
            UserStatus::Blocked => return Err(UserError::Blocked(user.block_reason)),
            UserStatus::Verified => {}
        }

        let id = user.id.to_hex();
        let name = user.full_name();
        let token = self.auth.issue(TokenSubject {
            id: &id,
            name: &name,
            email: &user.email,
            phone: &user.mobile_phone,
            role: user.role,
        })?;
        user.token = Some(token.clone());
        self.repository.update(user).await?;

        Ok(token)
    }

    #[instrument(skip_all)]
    pub async fn profile(&self, token: &str) -> UserResult<UserResponse> {
        let user = self
            .repository
            .find_by_token(token)
            .await?
            .ok_or(UserError::NotFound)?;
        Ok(UserResponse::new(user, &self.uploads))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: ObjectId) -> UserResult<UserResponse> {
        Ok(UserResponse::new(self.find(id).await?, &self.uploads))
    }

    /// Partial profile edit by the user themself or by staff
    #[instrument(skip(self, update))]
    pub async fn edit(
        &self,
        id: ObjectId,
        actor: Actor,
        update: ProfileUpdate,
    ) -> UserResult<UserResponse> {
        let existing = self.find(id).await?;
        let current_image = existing.image.clone();

        match self.apply_edit(existing, actor, &update).await {
            Ok(user) => Ok(UserResponse::new(user, &self.uploads)),
            Err(err) => {
                if let Some(image) = update.image.as_deref().filter(|i| *i != current_image) {
                    self.uploads.discard(image).await;
                }
                Err(err)
            }
        }
    }

    async fn apply_edit(&self, mut user: User, actor: Actor, update: &ProfileUpdate) -> UserResult<User> {
        if !actor.is_self_or_staff(user.id) {
            return Err(UserError::NotOwner);
        }

        self.ensure_unique(
            update.changed_email(&user.email),
            update.changed_phone(&user.mobile_phone),
            Some(user.id),
        )
        .await?;

        let new_hash = resolve_password_change(
            &user.password,
            update.current_password.as_deref(),
            update.new_password.as_deref(),
        )?;

        user.apply_update(update);
        if let Some(hash) = new_hash {
            user.password = hash;
        }
        self.repository.update(user).await
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: PageQuery) -> UserResult<Page<UserResponse>> {
        let page = self.repository.list(query).await?;
        Ok(page.map(|user| UserResponse::new(user, &self.uploads)))
    }

    /// Delete a user and return the refreshed first page
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ObjectId) -> UserResult<Page<UserResponse>> {
        let user = self.find(id).await?;
        if !self.repository.delete(id).await? {
            return Err(UserError::NotFound);
        }
        self.uploads.discard(&user.image).await;

        tracing::info!(user_id = %id, "User deleted");
        self.list(PageQuery::default()).await
    }

    /// Block with an optional reason, or lift the block
    #[instrument(skip(self))]
    pub async fn toggle_block(
        &self,
        id: ObjectId,
        reason: Option<String>,
    ) -> UserResult<UserResponse> {
        let mut user = self.find(id).await?;
        user.toggle_block(reason);
        let user = self.repository.update(user).await?;

        tracing::info!(user_id = %id, status = %user.status, "User block toggled");
        Ok(UserResponse::new(user, &self.uploads))
    }
}
