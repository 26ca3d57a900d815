use async_trait::async_trait;
use bson::oid::ObjectId;
use core_accounts::{Page, PageQuery};
use core_uploads::{UploadReferences, points_to};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::User;

/// Repository trait for User persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> UserResult<User>;

    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;

    async fn find_by_token(&self, token: &str) -> UserResult<Option<User>>;

    async fn email_taken(&self, email: &str, exclude: Option<ObjectId>) -> UserResult<bool>;

    async fn phone_taken(&self, phone: &str, exclude: Option<ObjectId>) -> UserResult<bool>;

    async fn update(&self, user: User) -> UserResult<User>;

    async fn delete(&self, id: ObjectId) -> UserResult<bool>;

    /// Page of users, newest first
    async fn list(&self, query: PageQuery) -> UserResult<Page<User>>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<ObjectId, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn conflict(existing: &HashMap<ObjectId, User>, user: &User) -> Option<UserError> {
    existing
        .values()
        .filter(|u| u.id != user.id)
        .find_map(|other| {
            if other.email.eq_ignore_ascii_case(&user.email) {
                Some(UserError::DuplicateEmail(user.email.clone()))
            } else if other.mobile_phone == user.mobile_phone {
                Some(UserError::DuplicatePhone(user.mobile_phone.clone()))
            } else {
                None
            }
        })
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;
        if let Some(err) = conflict(&users, &user) {
            return Err(err);
        }
        users.insert(user.id, user.clone());

        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_token(&self, token: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.token.as_deref() == Some(token))
            .cloned())
    }

    async fn email_taken(&self, email: &str, exclude: Option<ObjectId>) -> UserResult<bool> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .any(|u| Some(u.id) != exclude && u.email.eq_ignore_ascii_case(email)))
    }

    async fn phone_taken(&self, phone: &str, exclude: Option<ObjectId>) -> UserResult<bool> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .any(|u| Some(u.id) != exclude && u.mobile_phone == phone))
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound);
        }
        if let Some(err) = conflict(&users, &user) {
            return Err(err);
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: ObjectId) -> UserResult<bool> {
        Ok(self.users.write().await.remove(&id).is_some())
    }

    async fn list(&self, query: PageQuery) -> UserResult<Page<User>> {
        let users = self.users.read().await;
        let term = query.search();

        let mut result: Vec<User> = users
            .values()
            .filter(|u| term.as_ref().is_none_or(|t| u.matches(t)))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(query.slice(&result))
    }
}

#[async_trait]
impl UploadReferences for InMemoryUserRepository {
    async fn is_referenced(&self, file_name: &str) -> bool {
        self.users
            .read()
            .await
            .values()
            .any(|record| points_to(&record.image, file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use core_accounts::{Registration, VerificationCode};

    fn user(n: usize) -> User {
        User::new(
            Registration {
                first_name: format!("User{n}"),
                last_name: "Test".to_string(),
                email: format!("user{n}@x.com"),
                password: String::new(),
                mobile_phone: format!("011000000{n:02}"),
                address: None,
            },
            "hash".to_string(),
            VerificationCode::generate(Utc::now()),
        )
    }

    #[tokio::test]
    async fn test_pagination_boundaries() {
        let repo = InMemoryUserRepository::new();
        for n in 0..23 {
            repo.create(user(n)).await.unwrap();
        }

        let last = repo.list(PageQuery::new(3, 10)).await.unwrap();
        assert_eq!(last.total, 23);
        assert_eq!(last.total_pages, 3);
        assert_eq!(last.items.len(), 3);

        let beyond = repo.list(PageQuery::new(4, 10)).await.unwrap();
        assert!(beyond.items.is_empty());
    }

    #[tokio::test]
    async fn test_search_is_literal_and_case_insensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create(user(1)).await.unwrap();
        let mut dotted = user(2);
        dotted.address = "Block 5.(A)".to_string();
        repo.create(dotted).await.unwrap();

        let page = repo
            .list(PageQuery::default().with_search("5.(a"))
            .await
            .unwrap();
        assert_eq!(page.total, 1);

        let page = repo
            .list(PageQuery::default().with_search("notverified"))
            .await
            .unwrap();
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn test_update_conflict() {
        let repo = InMemoryUserRepository::new();
        let first = repo.create(user(1)).await.unwrap();
        let mut second = repo.create(user(2)).await.unwrap();
        second.mobile_phone = first.mobile_phone.clone();
        assert!(matches!(
            repo.update(second).await,
            Err(UserError::DuplicatePhone(_))
        ));
    }
}
