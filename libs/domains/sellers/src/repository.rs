use async_trait::async_trait;
use bson::oid::ObjectId;
use core_accounts::{Page, PageQuery};
use core_uploads::{UploadReferences, points_to};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{SellerError, SellerResult};
use crate::models::Seller;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SellerRepository: Send + Sync {
    async fn create(&self, seller: Seller) -> SellerResult<Seller>;

    async fn find_by_id(&self, id: ObjectId) -> SellerResult<Option<Seller>>;

    async fn find_by_email(&self, email: &str) -> SellerResult<Option<Seller>>;

    /// Seller holding `token`, either as activation or session token
    async fn find_by_token(&self, token: &str) -> SellerResult<Option<Seller>>;

    async fn email_taken(&self, email: &str, exclude: Option<ObjectId>) -> SellerResult<bool>;

    async fn phone_taken(&self, phone: &str, exclude: Option<ObjectId>) -> SellerResult<bool>;

    async fn update(&self, seller: Seller) -> SellerResult<Seller>;

    async fn delete(&self, id: ObjectId) -> SellerResult<bool>;

    async fn list(&self, query: PageQuery) -> SellerResult<Page<Seller>>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemorySellerRepository {
    sellers: Arc<RwLock<HashMap<ObjectId, Seller>>>,
}

impl InMemorySellerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn conflict(existing: &HashMap<ObjectId, Seller>, seller: &Seller) -> Option<SellerError> {
    existing
        .values()
        .filter(|s| s.id != seller.id)
        .find_map(|other| {
            if other.email.eq_ignore_ascii_case(&seller.email) {
                Some(SellerError::DuplicateEmail(seller.email.clone()))
            } else if other.mobile_phone == seller.mobile_phone {
                Some(SellerError::DuplicatePhone(seller.mobile_phone.clone()))
            } else {
                None
            }
        })
}

#[async_trait]
impl SellerRepository for InMemorySellerRepository {
    async fn create(&self, seller: Seller) -> SellerResult<Seller> {
        let mut sellers = self.sellers.write().await;
        if let Some(err) = conflict(&sellers, &seller) {
            return Err(err);
        }
        sellers.insert(seller.id, seller.clone());

        tracing::info!(seller_id = %seller.id, "Created seller");
        Ok(seller)
    }

    async fn find_by_id(&self, id: ObjectId) -> SellerResult<Option<Seller>> {
        Ok(self.sellers.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> SellerResult<Option<Seller>> {
        let sellers = self.sellers.read().await;
        Ok(sellers
            .values()
            .find(|s| s.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_token(&self, token: &str) -> SellerResult<Option<Seller>> {
        let sellers = self.sellers.read().await;
        Ok(sellers
            .values()
            .find(|s| s.token.as_deref() == Some(token))
            .cloned())
    }

    async fn email_taken(&self, email: &str, exclude: Option<ObjectId>) -> SellerResult<bool> {
        let sellers = self.sellers.read().await;
        Ok(sellers
            .values()
            .any(|s| Some(s.id) != exclude && s.email.eq_ignore_ascii_case(email)))
    }

    async fn phone_taken(&self, phone: &str, exclude: Option<ObjectId>) -> SellerResult<bool> {
        let sellers = self.sellers.read().await;
        Ok(sellers
            .values()
            .any(|s| Some(s.id) != exclude && s.mobile_phone == phone))
    }

    async fn update(&self, seller: Seller) -> SellerResult<Seller> {
        let mut sellers = self.sellers.write().await;
        if !sellers.contains_key(&seller.id) {
            return Err(SellerError::NotFound);
        }
        if let Some(err) = conflict(&sellers, &seller) {
            return Err(err);
        }
        sellers.insert(seller.id, seller.clone());
        Ok(seller)
    }

    async fn delete(&self, id: ObjectId) -> SellerResult<bool> {
        Ok(self.sellers.write().await.remove(&id).is_some())
    }

    async fn list(&self, query: PageQuery) -> SellerResult<Page<Seller>> {
        let sellers = self.sellers.read().await;
        let term = query.search();

        let mut result: Vec<Seller> = sellers
            .values()
            .filter(|s| term.as_ref().is_none_or(|t| s.matches(t)))
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(query.slice(&result))
    }
}

#[async_trait]
impl UploadReferences for InMemorySellerRepository {
    async fn is_referenced(&self, file_name: &str) -> bool {
        self.sellers
            .read()
            .await
            .values()
            .any(|record| points_to(&record.image, file_name))
    }
}
