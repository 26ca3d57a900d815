//! Seller Service - registration with token activation, login and profile management

use std::sync::Arc;

use axum_helpers::{JwtAuth, TokenSubject};
use bson::oid::ObjectId;
use chrono::Utc;
use core_accounts::{
    Actor, Credentials, Page, PageQuery, hash_password, resolve_password_change, verify_password,
};
use core_uploads::UploadStore;
use tracing::instrument;

use crate::error::{SellerError, SellerResult};
use crate::models::{Activation, Seller, SellerRegistration, SellerResponse, SellerUpdate};
use crate::repository::SellerRepository;

pub struct SellerService<R: SellerRepository> {
    repository: Arc<R>,
    auth: JwtAuth,
    uploads: UploadStore,
}

impl<R: SellerRepository> SellerService<R> {
    pub fn new(repository: R, auth: JwtAuth, uploads: UploadStore) -> Self {
        Self {
            repository: Arc::new(repository),
            auth,
            uploads,
        }
    }

    fn issue_token(&self, seller: &Seller) -> SellerResult<String> {
        let id = seller.id.to_hex();
        let name = seller.full_name();
        Ok(self.auth.issue(TokenSubject {
            id: &id,
            name: &name,
            email: &seller.email,
            phone: &seller.mobile_phone,
            role: seller.role,
        })?)
    }

    async fn find(&self, id: ObjectId) -> SellerResult<Seller> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(SellerError::NotFound)
    }

    async fn ensure_unique(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
        exclude: Option<ObjectId>,
    ) -> SellerResult<()> {
        if let Some(email) = email
            && self.repository.email_taken(email, exclude).await?
        {
            return Err(SellerError::DuplicateEmail(email.to_string()));
        }
        if let Some(phone) = phone
            && self.repository.phone_taken(phone, exclude).await?
        {
            return Err(SellerError::DuplicatePhone(phone.to_string()));
        }
        Ok(())
    }

    /// Create an inactive seller. Returns the activation token, which is also
    /// stored on the record until the seller first logs in.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: SellerRegistration) -> SellerResult<String> {
        self.ensure_unique(Some(&input.email), Some(&input.mobile_phone), None)
            .await?;

        let hash = hash_password(&input.password)?;
        let mut seller = Seller::new(input, hash);
        let token = self.issue_token(&seller)?;
        seller.token = Some(token.clone());

        self.repository.create(seller).await?;
        Ok(token)
    }

    /// Activate the seller holding `token`
    #[instrument(skip_all)]
    pub async fn activate(&self, token: &str) -> SellerResult<Activation> {
        let mut seller = self
            .repository
            .find_by_token(token)
            .await?
            .ok_or(SellerError::NotFound)?;

        if seller.is_active {
            return Ok(Activation::AlreadyActive);
        }
        seller.is_active = true;
        seller.updated_at = Utc::now();
        let seller = self.repository.update(seller).await?;

        tracing::info!(seller_id = %seller.id, "Seller activated");
        Ok(Activation::Activated)
    }

    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: Credentials) -> SellerResult<String> {
        let mut seller = self
            .repository
            .find_by_email(&credentials.email)
            .await?
            .ok_or(SellerError::InvalidCredentials)?;

        if !verify_password(&credentials.password, &seller.password)? {
            return Err(SellerError::InvalidCredentials);
        }
        if !seller.is_active {
            return Err(SellerError::NotActivated);
        }

        let token = self.issue_token(&seller)?;
        seller.token = Some(token.clone());
        self.repository.update(seller).await?;
        Ok(token)
    }

    #[instrument(skip_all)]
    pub async fn profile(&self, token: &str) -> SellerResult<SellerResponse> {
        let seller = self
            .repository
            .find_by_token(token)
            .await?
            .ok_or(SellerError::NotFound)?;
        Ok(SellerResponse::new(seller, &self.uploads))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: ObjectId) -> SellerResult<SellerResponse> {
        Ok(SellerResponse::new(self.find(id).await?, &self.uploads))
    }

    /// Partial edit by the seller themself or by staff. A newly uploaded image
    /// is discarded when the edit fails.
    #[instrument(skip(self, update))]
    pub async fn edit(
        &self,
        id: ObjectId,
        actor: Actor,
        update: SellerUpdate,
    ) -> SellerResult<SellerResponse> {
        let existing = self.find(id).await?;
        let current_image = existing.image.clone();

        match self.apply_edit(existing, actor, &update).await {
            Ok(seller) => Ok(SellerResponse::new(seller, &self.uploads)),
            Err(err) => {
                if let Some(image) = update
                    .profile
                    .image
                    .as_deref()
                    .filter(|i| *i != current_image)
                {
                    self.uploads.discard(image).await;
                }
                Err(err)
            }
        }
    }

    async fn apply_edit(
        &self,
        mut seller: Seller,
        actor: Actor,
        update: &SellerUpdate,
    ) -> SellerResult<Seller> {
        if !actor.is_self_or_staff(seller.id) {
            return Err(SellerError::NotOwner);
        }

        let profile = &update.profile;
        self.ensure_unique(
            profile.changed_email(&seller.email),
            profile.changed_phone(&seller.mobile_phone),
            Some(seller.id),
        )
        .await?;

        let new_hash = resolve_password_change(
            &seller.password,
            profile.current_password.as_deref(),
            profile.new_password.as_deref(),
        )?;

        seller.apply_update(update);
        if let Some(hash) = new_hash {
            seller.password = hash;
        }
        self.repository.update(seller).await
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: PageQuery) -> SellerResult<Page<SellerResponse>> {
        let page = self.repository.list(query).await?;
        Ok(page.map(|seller| SellerResponse::new(seller, &self.uploads)))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: ObjectId) -> SellerResult<()> {
        let seller = self.find(id).await?;
        if !self.repository.delete(id).await? {
            return Err(SellerError::NotFound);
        }
        self.uploads.discard(&seller.image).await;

        tracing::info!(seller_id = %id, "Seller deleted");
        Ok(())
    }
}
