//! MongoDB implementation of SellerRepository

use async_trait::async_trait;
use bson::{Document, doc, oid::ObjectId};
use core_accounts::{Page, PageQuery};
use core_uploads::UploadReferences;
use database::mongodb::{ensure_unique_indexes, file_reference_filter, find_page, with_search};
use mongodb::{Collection, Database};
use tracing::instrument;

use crate::error::{SellerError, SellerResult};
use crate::models::{SEARCH_FIELDS, Seller};
use crate::repository::SellerRepository;

#[derive(Clone)]
pub struct MongoSellerRepository {
    collection: Collection<Seller>,
}

impl MongoSellerRepository {
    pub const COLLECTION: &'static str = "sellers";

    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Seller>(Self::COLLECTION),
        }
    }

    pub async fn init_indexes(&self) -> SellerResult<()> {
        ensure_unique_indexes(&self.collection, &["email", "mobilePhone"]).await?;
        Ok(())
    }

    async fn exists(&self, filter: Document) -> SellerResult<bool> {
        Ok(self.collection.count_documents(filter).await? > 0)
    }
}

fn excluding(mut filter: Document, exclude: Option<ObjectId>) -> Document {
    if let Some(id) = exclude {
        filter.insert("_id", doc! { "$ne": id });
    }
    filter
}

#[async_trait]
impl SellerRepository for MongoSellerRepository {
    #[instrument(skip(self, seller), fields(email = %seller.email))]
    async fn create(&self, seller: Seller) -> SellerResult<Seller> {
        self.collection.insert_one(&seller).await?;
        tracing::info!(seller_id = %seller.id, "Seller created successfully");
        Ok(seller)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ObjectId) -> SellerResult<Option<Seller>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> SellerResult<Option<Seller>> {
        Ok(self
            .collection
            .find_one(doc! { "email": email.to_lowercase() })
            .await?)
    }

    #[instrument(skip_all)]
    async fn find_by_token(&self, token: &str) -> SellerResult<Option<Seller>> {
        Ok(self.collection.find_one(doc! { "token": token }).await?)
    }

    #[instrument(skip(self))]
    async fn email_taken(&self, email: &str, exclude: Option<ObjectId>) -> SellerResult<bool> {
        self.exists(excluding(doc! { "email": email.to_lowercase() }, exclude))
            .await
    }

    #[instrument(skip(self))]
    async fn phone_taken(&self, phone: &str, exclude: Option<ObjectId>) -> SellerResult<bool> {
        self.exists(excluding(doc! { "mobilePhone": phone }, exclude))
            .await
    }

    #[instrument(skip(self, seller), fields(seller_id = %seller.id))]
    async fn update(&self, seller: Seller) -> SellerResult<Seller> {
        let result = self
            .collection
            .replace_one(doc! { "_id": seller.id }, &seller)
            .await?;
        if result.matched_count == 0 {
            return Err(SellerError::NotFound);
        }
        Ok(seller)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> SellerResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn list(&self, query: PageQuery) -> SellerResult<Page<Seller>> {
        let filter = with_search(doc! {}, query.search().as_ref(), &SEARCH_FIELDS);
        Ok(find_page(&self.collection, filter, &query).await?)
    }
}

#[async_trait]
impl UploadReferences for MongoSellerRepository {
    async fn is_referenced(&self, file_name: &str) -> bool {
        let filter = file_reference_filter(&["image"], file_name);
        match self.collection.count_documents(filter).limit(1).await {
            Ok(count) => count > 0,
            Err(e) => {
                tracing::warn!(error = %e, file = file_name, "Upload reference lookup failed");
                true
            }
        }
    }
}
