//! MongoDB implementation of AdminRepository

use async_trait::async_trait;
use bson::{Document, doc, oid::ObjectId};
use core_accounts::{Page, PageQuery, Role};
use core_uploads::UploadReferences;
use database::mongodb::{ensure_unique_indexes, file_reference_filter, find_page, with_search};
use mongodb::{Collection, Database};
use tracing::instrument;

use crate::error::{AdminError, AdminResult};
use crate::models::{Admin, SEARCH_FIELDS};
use crate::repository::AdminRepository;

/// MongoDB implementation of the AdminRepository
#[derive(Clone)]
pub struct MongoAdminRepository {
    collection: Collection<Admin>,
}

impl MongoAdminRepository {
    pub const COLLECTION: &'static str = "admins";

    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<Admin>(Self::COLLECTION),
        }
    }

    /// Unique indexes on `email` and `mobilePhone`
    pub async fn init_indexes(&self) -> AdminResult<()> {
        ensure_unique_indexes(&self.collection, &["email", "mobilePhone"]).await?;
        Ok(())
    }

    fn taken_filter(field: &str, value: &str, exclude: Option<ObjectId>) -> Document {
        let mut filter = doc! { field: value };
        if let Some(id) = exclude {
            filter.insert("_id", doc! { "$ne": id });
        }
        filter
    }
}

#[async_trait]
impl AdminRepository for MongoAdminRepository {
    #[instrument(skip(self, admin), fields(email = %admin.email))]
    async fn create(&self, admin: Admin) -> AdminResult<Admin> {
        self.collection.insert_one(&admin).await?;

        tracing::info!(admin_id = %admin.id, "Admin created successfully");
        Ok(admin)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ObjectId) -> AdminResult<Option<Admin>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> AdminResult<Option<Admin>> {
        Ok(self
            .collection
            .find_one(doc! { "email": email.to_lowercase() })
            .await?)
    }

    #[instrument(skip_all)]
    async fn find_by_token(&self, token: &str) -> AdminResult<Option<Admin>> {
        Ok(self.collection.find_one(doc! { "token": token }).await?)
    }

    #[instrument(skip(self))]
    async fn email_taken(&self, email: &str, exclude: Option<ObjectId>) -> AdminResult<bool> {
        let filter = Self::taken_filter("email", &email.to_lowercase(), exclude);
        Ok(self.collection.count_documents(filter).await? > 0)
    }

    #[instrument(skip(self))]
    async fn phone_taken(&self, phone: &str, exclude: Option<ObjectId>) -> AdminResult<bool> {
        let filter = Self::taken_filter("mobilePhone", phone, exclude);
        Ok(self.collection.count_documents(filter).await? > 0)
    }

    #[instrument(skip(self, admin), fields(admin_id = %admin.id))]
    async fn update(&self, admin: Admin) -> AdminResult<Admin> {
        let result = self
            .collection
            .replace_one(doc! { "_id": admin.id }, &admin)
            .await?;

        if result.matched_count == 0 {
            return Err(AdminError::NotFound);
        }
        Ok(admin)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> AdminResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn list(&self, query: PageQuery) -> AdminResult<Page<Admin>> {
        let filter = with_search(
            doc! { "role": { "$ne": Role::SuperAdmin.to_string() } },
            query.search().as_ref(),
            &SEARCH_FIELDS,
        );
        Ok(find_page(&self.collection, filter, &query).await?)
    }
}

#[async_trait]
impl UploadReferences for MongoAdminRepository {
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
