use async_trait::async_trait;
use bson::oid::ObjectId;
use core_accounts::{Page, PageQuery};
use core_uploads::{UploadReferences, points_to};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{AdminError, AdminResult};
use crate::models::Admin;

/// Repository trait for Admin persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Insert a new admin; duplicate email or phone is an error
    async fn create(&self, admin: Admin) -> AdminResult<Admin>;

    async fn find_by_id(&self, id: ObjectId) -> AdminResult<Option<Admin>>;

    async fn find_by_email(&self, email: &str) -> AdminResult<Option<Admin>>;

    /// The admin whose stored token equals `token`
    async fn find_by_token(&self, token: &str) -> AdminResult<Option<Admin>>;

    /// Whether another admin (other than `exclude`) uses this email
    async fn email_taken(&self, email: &str, exclude: Option<ObjectId>) -> AdminResult<bool>;

    /// Whether another admin (other than `exclude`) uses this phone
    async fn phone_taken(&self, phone: &str, exclude: Option<ObjectId>) -> AdminResult<bool>;

    /// Replace a stored admin
    async fn update(&self, admin: Admin) -> AdminResult<Admin>;

    async fn delete(&self, id: ObjectId) -> AdminResult<bool>;

    /// Page of non-super admins, newest first
    async fn list(&self, query: PageQuery) -> AdminResult<Page<Admin>>;
}

/// In-memory implementation of AdminRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryAdminRepository {
    admins: Arc<RwLock<HashMap<ObjectId, Admin>>>,
}

impl InMemoryAdminRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn conflict(existing: &HashMap<ObjectId, Admin>, admin: &Admin) -> Option<AdminError> {
    let others = existing.values().filter(|a| a.id != admin.id);
    for other in others {
        if other.email.eq_ignore_ascii_case(&admin.email) {
            return Some(AdminError::DuplicateEmail(admin.email.clone()));
        }
        if other.mobile_phone == admin.mobile_phone {
            return Some(AdminError::DuplicatePhone(admin.mobile_phone.clone()));
        }
    }
    None
}

#[async_trait]
impl AdminRepository for InMemoryAdminRepository {
    async fn create(&self, admin: Admin) -> AdminResult<Admin> {
        let mut admins = self.admins.write().await;
        if let Some(err) = conflict(&admins, &admin) {
            return Err(err);
        }
        admins.insert(admin.id, admin.clone());

        tracing::info!(admin_id = %admin.id, email = %admin.email, "Created admin");
        Ok(admin)
    }

    async fn find_by_id(&self, id: ObjectId) -> AdminResult<Option<Admin>> {
        Ok(self.admins.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AdminResult<Option<Admin>> {
        let admins = self.admins.read().await;
        Ok(admins
            .values()
            .find(|a| a.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_token(&self, token: &str) -> AdminResult<Option<Admin>> {
        let admins = self.admins.read().await;
        Ok(admins
            .values()
            .find(|a| a.token.as_deref() == Some(token))
            .cloned())
    }

    async fn email_taken(&self, email: &str, exclude: Option<ObjectId>) -> AdminResult<bool> {
        let admins = self.admins.read().await;
        Ok(admins
            .values()
            .any(|a| Some(a.id) != exclude && a.email.eq_ignore_ascii_case(email)))
    }

    async fn phone_taken(&self, phone: &str, exclude: Option<ObjectId>) -> AdminResult<bool> {
        let admins = self.admins.read().await;
        Ok(admins
            .values()
            .any(|a| Some(a.id) != exclude && a.mobile_phone == phone))
    }

    async fn update(&self, admin: Admin) -> AdminResult<Admin> {
        let mut admins = self.admins.write().await;
        if !admins.contains_key(&admin.id) {
            return Err(AdminError::NotFound);
        }
        if let Some(err) = conflict(&admins, &admin) {
            return Err(err);
        }
        admins.insert(admin.id, admin.clone());
        Ok(admin)
    }

    async fn delete(&self, id: ObjectId) -> AdminResult<bool> {
        Ok(self.admins.write().await.remove(&id).is_some())
    }

    async fn list(&self, query: PageQuery) -> AdminResult<Page<Admin>> {
        let admins = self.admins.read().await;
        let term = query.search();

        let mut result: Vec<Admin> = admins
            .values()
            .filter(|a| !a.is_super_admin())
            .filter(|a| term.as_ref().is_none_or(|t| a.matches(t)))
            .cloned()
            .collect();

        // Newest first, same as the MongoDB sort
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(query.slice(&result))
    }
}

#[async_trait]
impl UploadReferences for InMemoryAdminRepository {
    async fn is_referenced(&self, file_name: &str) -> bool {
        self.admins
            .read()
            .await
            .values()
            .any(|record| points_to(&record.image, file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_accounts::{Registration, Role};

    fn admin(n: usize, role: Role) -> Admin {
        Admin::new(
            Registration {
                first_name: format!("Admin{n}"),
                last_name: "Test".to_string(),
                email: format!("admin{n}@x.com"),
                password: String::new(),
                mobile_phone: format!("010000000{n:02}"),
                address: None,
            },
            "hash".to_string(),
            role,
        )
    }

    #[tokio::test]
    async fn test_create_rejects_duplicates() {
        let repo = InMemoryAdminRepository::new();
        repo.create(admin(1, Role::Admin)).await.unwrap();

        let mut same_email = admin(2, Role::Admin);
        same_email.email = "ADMIN1@x.com".to_string();
        assert!(matches!(
            repo.create(same_email).await,
            Err(AdminError::DuplicateEmail(_))
        ));

        let mut same_phone = admin(3, Role::Admin);
        same_phone.mobile_phone = admin(1, Role::Admin).mobile_phone;
        assert!(matches!(
            repo.create(same_phone).await,
            Err(AdminError::DuplicatePhone(_))
        ));
    }

    #[tokio::test]
    async fn test_list_excludes_super_admins_and_pages() {
        let repo = InMemoryAdminRepository::new();
        repo.create(admin(0, Role::SuperAdmin)).await.unwrap();
        for n in 1..=7 {
            repo.create(admin(n, Role::Admin)).await.unwrap();
        }

        let page = repo.list(PageQuery::new(3, 3)).await.unwrap();
        assert_eq!(page.total, 7);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 1);
        assert!(page.items.iter().all(|a| !a.is_super_admin()));
    }

    #[tokio::test]
    async fn test_list_search() {
        let repo = InMemoryAdminRepository::new();
        let target = repo.create(admin(1, Role::Admin)).await.unwrap();
        repo.create(admin(2, Role::Admin)).await.unwrap();

        let by_email = repo
            .list(PageQuery::default().with_search("ADMIN1@"))
            .await
            .unwrap();
        assert_eq!(by_email.total, 1);

        let by_id = repo
            .list(PageQuery::default().with_search(target.id.to_hex()))
            .await
            .unwrap();
        assert_eq!(by_id.items[0].id, target.id);
    }

    #[tokio::test]
    async fn test_taken_respects_exclude() {
        let repo = InMemoryAdminRepository::new();
        let a = repo.create(admin(1, Role::Admin)).await.unwrap();
        assert!(repo.email_taken("admin1@x.com", None).await.unwrap());
        assert!(!repo.email_taken("admin1@x.com", Some(a.id)).await.unwrap());
        assert!(!repo.phone_taken(&a.mobile_phone, Some(a.id)).await.unwrap());
    }
}
