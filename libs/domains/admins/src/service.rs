//! Admin Service - Business logic layer

use std::sync::Arc;

use axum_helpers::{JwtAuth, TokenSubject};
use bson::oid::ObjectId;
use core_accounts::{
    Actor, Credentials, Page, PageQuery, ProfileUpdate, Registration, Role, hash_password,
    resolve_password_change, verify_password,
};
use core_uploads::UploadStore;
use tracing::instrument;

use crate::error::{AdminError, AdminResult};
use crate::models::{Admin, AdminResponse, BlockStatus, SuperAdminSeed};
use crate::repository::AdminRepository;

/// Admin service: registration, login, profile edits and super-admin management
pub struct AdminService<R: AdminRepository> {
    repository: Arc<R>,
    auth: JwtAuth,
    uploads: UploadStore,
}

impl<R: AdminRepository> AdminService<R> {
    pub fn new(repository: R, auth: JwtAuth, uploads: UploadStore) -> Self {
        Self {
            repository: Arc::new(repository),
            auth,
            uploads,
        }
    }

    pub fn auth(&self) -> &JwtAuth {
        &self.auth
    }

    fn issue_token(&self, admin: &Admin) -> AdminResult<String> {
        let id = admin.id.to_hex();
        let name = admin.full_name();
        Ok(self.auth.issue(TokenSubject {
            id: &id,
            name: &name,
            email: &admin.email,
            phone: &admin.mobile_phone,
            role: admin.role,
        })?)
    }

    /// Email is checked before phone
    async fn ensure_unique(
        &self,
        email: Option<&str>,
        phone: Option<&str>,
        exclude: Option<ObjectId>,
    ) -> AdminResult<()> {
        if let Some(email) = email
            && self.repository.email_taken(email, exclude).await?
        {
            return Err(AdminError::DuplicateEmail(email.to_string()));
        }
        if let Some(phone) = phone
            && self.repository.phone_taken(phone, exclude).await?
        {
            return Err(AdminError::DuplicatePhone(phone.to_string()));
        }
        Ok(())
    }

    async fn create_admin(&self, input: Registration, role: Role) -> AdminResult<Admin> {
        self.ensure_unique(Some(&input.email), Some(&input.mobile_phone), None)
            .await?;

        let hash = hash_password(&input.password)?;
        Ok(Admin::new(input, hash, role))
    }

    /// Self-registration. Returns the new admin's token.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: Registration) -> AdminResult<String> {
        let mut admin = self.create_admin(input, Role::Admin).await?;
        let token = self.issue_token(&admin)?;
        admin.token = Some(token.clone());

        self.repository.create(admin).await?;
        Ok(token)
    }

    /// Super-admin adds an admin on someone else's behalf
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn add_admin(&self, input: Registration) -> AdminResult<AdminResponse> {
        let admin = self.create_admin(input, Role::Admin).await?;
        let admin = self.repository.create(admin).await?;
        Ok(AdminResponse::new(admin, &self.uploads))
    }

    /// Verify credentials, rotate the stored token and return it
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: Credentials) -> AdminResult<String> {
        let mut admin = self
            .repository
            .find_by_email(&credentials.email)
            .await?
            .ok_or(AdminError::InvalidCredentials)?;

        if !verify_password(&credentials.password, &admin.password)? {
            return Err(AdminError::InvalidCredentials);
        }
        if !admin.is_active {
            return Err(AdminError::Blocked);
        }

        let token = self.issue_token(&admin)?;
        admin.token = Some(token.clone());
        self.repository.update(admin).await?;

        tracing::info!("Admin logged in");
        Ok(token)
    }

    /// The admin holding `token` as their current session
    #[instrument(skip_all)]
    pub async fn profile(&self, token: &str) -> AdminResult<AdminResponse> {
        let admin = self
            .repository
            .find_by_token(token)
            .await?
            .ok_or(AdminError::NotFound)?;
        Ok(AdminResponse::new(admin, &self.uploads))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: ObjectId) -> AdminResult<AdminResponse> {
        let admin = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(AdminError::NotFound)?;
        Ok(AdminResponse::new(admin, &self.uploads))
    }

    /// Partial profile edit.
    ///
    /// Only a super admin may edit another admin. When the edit is rejected, a
    /// freshly uploaded image it referenced is removed from disk.
    #[instrument(skip(self, update))]
    pub async fn edit(
        &self,
        id: ObjectId,
        actor: Actor,
        update: ProfileUpdate,
    ) -> AdminResult<AdminResponse> {
        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(AdminError::NotFound)?;
        let current_image = existing.image.clone();

        match self.apply_edit(existing, actor, &update).await {
            Ok(admin) => Ok(AdminResponse::new(admin, &self.uploads)),
            Err(err) => {
                if let Some(image) = update.image.as_deref().filter(|i| *i != current_image) {
                    self.uploads.discard(image).await;
                }
                Err(err)
            }
        }
    }

    async fn apply_edit(
        &self,
        mut admin: Admin,
        actor: Actor,
        update: &ProfileUpdate,
    ) -> AdminResult<Admin> {
        if actor.role != Role::SuperAdmin && !actor.is_self(admin.id) {
            return Err(AdminError::NotOwner);
        }

        self.ensure_unique(
            update.changed_email(&admin.email),
            update.changed_phone(&admin.mobile_phone),
            Some(admin.id),
        )
        .await?;

        let new_hash = resolve_password_change(
            &admin.password,
            update.current_password.as_deref(),
            update.new_password.as_deref(),
        )?;

        admin.apply_update(update);
        if let Some(hash) = new_hash {
            admin.password = hash;
        }
        self.repository.update(admin).await
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: PageQuery) -> AdminResult<Page<AdminResponse>> {
        let page = self.repository.list(query).await?;
        Ok(page.map(|admin| AdminResponse::new(admin, &self.uploads)))
    }

    /// Delete a regular admin. Super admins cannot be deleted.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ObjectId) -> AdminResult<()> {
        let admin = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(AdminError::NotFound)?;
        if admin.is_super_admin() {
            return Err(AdminError::SuperAdminProtected);
        }

        if !self.repository.delete(id).await? {
            return Err(AdminError::NotFound);
        }
        self.uploads.discard(&admin.image).await;

        tracing::info!(admin_id = %id, "Admin deleted");
        Ok(())
    }

    /// Flip `isActive`. Super admins cannot be blocked.
    #[instrument(skip(self))]
    pub async fn toggle_block(&self, id: ObjectId) -> AdminResult<BlockStatus> {
        let mut admin = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(AdminError::NotFound)?;
        if admin.is_super_admin() {
            return Err(AdminError::SuperAdminProtected);
        }

        admin.is_active = !admin.is_active;
        admin.updated_at = chrono::Utc::now();
        let admin = self.repository.update(admin).await?;

        tracing::info!(admin_id = %id, is_active = admin.is_active, "Admin block toggled");
        Ok(BlockStatus {
            id: admin.id.to_hex(),
            is_active: admin.is_active,
        })
    }

    /// Create the bootstrap super admin unless the email is already registered
    #[instrument(skip(self, seed), fields(email = %seed.email))]
    pub async fn ensure_super_admin(&self, seed: SuperAdminSeed) -> AdminResult<()> {
        if self.repository.find_by_email(&seed.email).await?.is_some() {
            tracing::debug!("Super admin already present");
            return Ok(());
        }

        let hash = hash_password(&seed.password)?;
        let admin = Admin::new(
            Registration {
                first_name: "Super".to_string(),
                last_name: "Admin".to_string(),
                email: seed.email,
                password: String::new(),
                mobile_phone: seed.mobile_phone,
                address: None,
            },
            hash,
            Role::SuperAdmin,
        );
        self.repository.create(admin).await?;

        tracing::info!("Super admin seeded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{InMemoryAdminRepository, MockAdminRepository};
    use axum_helpers::JwtConfig;
    use core_uploads::UploadConfig;

    fn auth() -> JwtAuth {
        JwtAuth::new(&JwtConfig::new("this-is-a-valid-secret-with-32-chars!").unwrap())
    }

    fn uploads() -> UploadStore {
        UploadStore::new(&UploadConfig::new("uploads", "http://localhost:8080"))
    }

    fn service() -> AdminService<InMemoryAdminRepository> {
        AdminService::new(InMemoryAdminRepository::new(), auth(), uploads())
    }

    fn service_in(uploads_dir: &std::path::Path) -> AdminService<InMemoryAdminRepository> {
        let repository = InMemoryAdminRepository::new();
        let uploads = UploadStore::new(&UploadConfig::new(uploads_dir, "http://localhost:8080"))
            .with_references(Arc::new(repository.clone()));
        AdminService::new(repository, auth(), uploads)
    }

    async fn admin_with_image(
        service: &AdminService<InMemoryAdminRepository>,
        n: u8,
        image: Option<&str>,
    ) -> ObjectId {
        let admin = service.add_admin(registration(n)).await.unwrap();
        let id = ObjectId::parse_str(&admin.id).unwrap();
        if let Some(image) = image {
            let update = ProfileUpdate {
                image: Some(image.to_string()),
                ..Default::default()
            };
            service
                .edit(id, Actor::new(ObjectId::new(), Role::SuperAdmin), update)
                .await
                .unwrap();
        }
        id
    }

    fn registration(n: u8) -> Registration {
        Registration {
            first_name: "Mona".to_string(),
            last_name: "Adel".to_string(),
            email: format!("mona{n}@example.com"),
            password: "long-enough-pass".to_string(),
            mobile_phone: format!("0100000000{n}"),
            address: None,
        }
    }

    fn login(n: u8, password: &str) -> Credentials {
        Credentials {
            email: format!("mona{n}@example.com"),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email_first() {
        let service = service();
        service.register(registration(1)).await.unwrap();

        let err = service.register(registration(1)).await.unwrap_err();
        assert!(matches!(err, AdminError::DuplicateEmail(_)));

        let mut same_phone = registration(2);
        same_phone.mobile_phone = registration(1).mobile_phone;
        let err = service.register(same_phone).await.unwrap_err();
        assert!(matches!(err, AdminError::DuplicatePhone(_)));
    }

    #[tokio::test]
    async fn test_login_returns_token_for_same_identity() {
        let service = service();
        let registered = service.register(registration(1)).await.unwrap();
        let id = service.auth().verify(&registered).unwrap().sub;

        let token = service.login(login(1, "long-enough-pass")).await.unwrap();
        let claims = service.auth().verify(&token).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, Role::Admin);

        // Second login rotates the stored token
        assert!(service.profile(&registered).await.is_err());
        assert_eq!(service.profile(&token).await.unwrap().id, id);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let service = service();
        service.register(registration(1)).await.unwrap();

        let err = service.login(login(1, "wrong-password")).await.unwrap_err();
        assert!(matches!(err, AdminError::InvalidCredentials));
        let err = service.login(login(9, "long-enough-pass")).await.unwrap_err();
        assert!(matches!(err, AdminError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_blocked_admin_cannot_login() {
        let service = service();
        let admin = service.add_admin(registration(1)).await.unwrap();
        let id = ObjectId::parse_str(&admin.id).unwrap();

        assert!(!service.toggle_block(id).await.unwrap().is_active);
        let err = service.login(login(1, "long-enough-pass")).await.unwrap_err();
        assert!(matches!(err, AdminError::Blocked));

        assert!(service.toggle_block(id).await.unwrap().is_active);
        assert!(service.login(login(1, "long-enough-pass")).await.is_ok());
    }

    #[tokio::test]
    async fn test_super_admin_cannot_be_deleted_or_blocked() {
        let service = service();
        service
            .ensure_super_admin(SuperAdminSeed {
                email: "root@example.com".to_string(),
                password: "root-password".to_string(),
                mobile_phone: "01099999999".to_string(),
            })
            .await
            .unwrap();
        let token = service
            .login(Credentials {
                email: "root@example.com".to_string(),
                password: "root-password".to_string(),
            })
            .await
            .unwrap();
        let id = ObjectId::parse_str(&service.auth().verify(&token).unwrap().sub).unwrap();

        assert!(matches!(
            service.delete(id).await,
            Err(AdminError::SuperAdminProtected)
        ));
        assert!(matches!(
            service.toggle_block(id).await,
            Err(AdminError::SuperAdminProtected)
        ));
    }

    #[tokio::test]
    async fn test_edit_conflict_leaves_record_untouched() {
        let service = service();
        let first = service.add_admin(registration(1)).await.unwrap();
        let second = service.add_admin(registration(2)).await.unwrap();
        let id = ObjectId::parse_str(&second.id).unwrap();

        let update = ProfileUpdate {
            first_name: Some("Changed".to_string()),
            email: Some(first.email.clone()),
            ..Default::default()
        };
        let err = service
            .edit(id, Actor::new(id, Role::Admin), update)
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::DuplicateEmail(_)));
        assert_eq!(service.get(id).await.unwrap().first_name, "Mona");
    }

    #[tokio::test]
    async fn test_edit_password_requires_current() {
        let service = service();
        let admin = service.add_admin(registration(1)).await.unwrap();
        let id = ObjectId::parse_str(&admin.id).unwrap();
        let actor = Actor::new(id, Role::Admin);

        let missing = ProfileUpdate {
            new_password: Some("brand-new-pass".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.edit(id, actor, missing).await,
            Err(AdminError::PasswordChange(_))
        ));

        let ok = ProfileUpdate {
            current_password: Some("long-enough-pass".to_string()),
            new_password: Some("brand-new-pass".to_string()),
            ..Default::default()
        };
        service.edit(id, actor, ok).await.unwrap();
        assert!(service.login(login(1, "brand-new-pass")).await.is_ok());
    }

    #[tokio::test]
    async fn test_admin_cannot_edit_another_admin() {
        let service = service();
        let target = service.add_admin(registration(1)).await.unwrap();
        let target_id = ObjectId::parse_str(&target.id).unwrap();

        let err = service
            .edit(
                target_id,
                Actor::new(ObjectId::new(), Role::Admin),
                ProfileUpdate::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::NotOwner));

        let edited = service
            .edit(
                target_id,
                Actor::new(ObjectId::new(), Role::SuperAdmin),
                ProfileUpdate {
                    last_name: Some("Samir".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(edited.last_name, "Samir");
    }

    #[tokio::test]
    async fn test_delete_missing_admin() {
        let mut repo = MockAdminRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        repo.expect_delete().never();

        let service = AdminService::new(repo, auth(), uploads());
        assert!(matches!(
            service.delete(ObjectId::new()).await,
            Err(AdminError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_rejected_edit_removes_its_fresh_upload() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("image-fresh.png"), b"png").unwrap();
        let service = service_in(tmp.path());
        let id = admin_with_image(&service, 1, None).await;

        let err = service
            .edit(
                id,
                Actor::new(id, Role::Admin),
                ProfileUpdate {
                    image: Some("uploads/image-fresh.png".to_string()),
                    new_password: Some("another-long-pass".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AdminError::PasswordChange(_)));
        assert!(!tmp.path().join("image-fresh.png").exists());
    }

    #[tokio::test]
    async fn test_rejected_edit_keeps_image_of_another_admin() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("image-victim.png"), b"png").unwrap();
        let service = service_in(tmp.path());
        admin_with_image(&service, 1, Some("uploads/image-victim.png")).await;
        let target = admin_with_image(&service, 2, None).await;

        let err = service
            .edit(
                target,
                Actor::new(ObjectId::new(), Role::Admin),
                ProfileUpdate {
                    image: Some("uploads/image-victim.png".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AdminError::NotOwner));
        assert!(tmp.path().join("image-victim.png").exists());
    }

    #[tokio::test]
    async fn test_delete_keeps_image_shared_with_another_admin() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("image-shared.png"), b"png").unwrap();
        let service = service_in(tmp.path());
        let first = admin_with_image(&service, 1, Some("uploads/image-shared.png")).await;
        let second = admin_with_image(&service, 2, Some("uploads/image-shared.png")).await;

        service.delete(first).await.unwrap();
        assert!(tmp.path().join("image-shared.png").exists());

        service.delete(second).await.unwrap();
        assert!(!tmp.path().join("image-shared.png").exists());
    }
}
