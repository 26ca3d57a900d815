//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use bson::{Document, doc, oid::ObjectId};
use core_accounts::{Page, PageQuery};
use core_uploads::UploadReferences;
use database::mongodb::{ensure_unique_indexes, file_reference_filter, find_page, with_search};
use mongodb::{Collection, Database};
use tracing::instrument;

use crate::error::{UserError, UserResult};
use crate::models::{SEARCH_FIELDS, User};
use crate::repository::UserRepository;

#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub const COLLECTION: &'static str = "users";

    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection::<User>(Self::COLLECTION),
        }
    }

    pub async fn init_indexes(&self) -> UserResult<()> {
        ensure_unique_indexes(&self.collection, &["email", "mobilePhone"]).await?;
        Ok(())
    }
}

fn taken_filter(field: &str, value: &str, exclude: Option<ObjectId>) -> Document {
    let mut filter = doc! { field: value };
    if let Some(id) = exclude {
        filter.insert("_id", doc! { "$ne": id });
    }
    filter
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(email = %user.email))]
    async fn create(&self, user: User) -> UserResult<User> {
        self.collection.insert_one(&user).await?;
        tracing::info!(user_id = %user.id, "User created successfully");
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ObjectId) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        Ok(self
            .collection
            .find_one(doc! { "email": email.to_lowercase() })
            .await?)
    }

    #[instrument(skip_all)]
    async fn find_by_token(&self, token: &str) -> UserResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "token": token }).await?)
    }

    #[instrument(skip(self))]
    async fn email_taken(&self, email: &str, exclude: Option<ObjectId>) -> UserResult<bool> {
        let filter = taken_filter("email", &email.to_lowercase(), exclude);
        Ok(self.collection.count_documents(filter).await? > 0)
    }

    #[instrument(skip(self))]
    async fn phone_taken(&self, phone: &str, exclude: Option<ObjectId>) -> UserResult<bool> {
        let filter = taken_filter("mobilePhone", phone, exclude);
        Ok(self.collection.count_documents(filter).await? > 0)
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn update(&self, user: User) -> UserResult<User> {
        let result = self
            .collection
            .replace_one(doc! { "_id": user.id }, &user)
            .await?;
        if result.matched_count == 0 {
            return Err(UserError::NotFound);
        }
        Ok(user)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ObjectId) -> UserResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn list(&self, query: PageQuery) -> UserResult<Page<User>> {
        let filter = with_search(doc! {}, query.search().as_ref(), &SEARCH_FIELDS);
        Ok(find_page(&self.collection, filter, &query).await?)
    }
}

#[async_trait]
impl UploadReferences for MongoUserRepository {
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
