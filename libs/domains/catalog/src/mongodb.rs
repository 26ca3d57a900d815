//! MongoDB implementation of CatalogRepository

use async_trait::async_trait;
use bson::{Document, doc, oid::ObjectId};
use core_accounts::{Page, PageQuery, SearchText};
use core_uploads::UploadReferences;
use database::mongodb::{ensure_unique_indexes, file_reference_filter, find_page, with_search};
use mongodb::{Collection, Database, IndexModel, options::IndexOptions};
use tracing::instrument;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Category, NAME_SEARCH_FIELDS, Product, ProductQuery, SubCategory, TITLE_SEARCH_FIELDS,
};
use crate::repository::CatalogRepository;

#[derive(Clone)]
pub struct MongoCatalogRepository {
    categories: Collection<Category>,
    sub_categories: Collection<SubCategory>,
    products: Collection<Product>,
}

impl MongoCatalogRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            categories: db.collection("categories"),
            sub_categories: db.collection("subcategories"),
            products: db.collection("products"),
        }
    }

    pub async fn init_indexes(&self) -> CatalogResult<()> {
        ensure_unique_indexes(&self.categories, &["name.en"]).await?;

        self.sub_categories
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "categoryId": 1, "name.en": 1 })
                    .options(
                        IndexOptions::builder()
                            .unique(true)
                            .name("category_name_unique".to_string())
                            .build(),
                    )
                    .build(),
            )
            .await?;

        let product_indexes = [
            ("idx_category", doc! { "categoryId": 1, "createdAt": -1 }),
            ("idx_seller", doc! { "sellerId": 1, "createdAt": -1 }),
            ("idx_status", doc! { "status": 1, "createdAt": -1 }),
        ]
        .into_iter()
        .map(|(name, keys)| {
            IndexModel::builder()
                .keys(keys)
                .options(IndexOptions::builder().name(name.to_string()).build())
                .build()
        });
        self.products.create_indexes(product_indexes).await?;

        tracing::info!("Catalog indexes created successfully");
        Ok(())
    }
}

/// Anchored, case-insensitive equality on an English name
fn name_filter(name_en: &str, exclude: Option<ObjectId>) -> Document {
    let pattern = format!("^{}$", SearchText::new(name_en).pattern());
    let mut filter = doc! { "name.en": { "$regex": pattern, "$options": "i" } };
    if let Some(id) = exclude {
        filter.insert("_id", doc! { "$ne": id });
    }
    filter
}

fn product_filter(filter: &ProductQuery) -> Document {
    let mut doc = doc! {};
    if let Some(id) = filter.category_id {
        doc.insert("categoryId", id);
    }
    if let Some(id) = filter.sub_category_id {
        doc.insert("subCategoryId", id);
    }
    if let Some(status) = filter.status {
        doc.insert("status", status.to_string());
    }
    if let Some(id) = filter.seller_id {
        doc.insert("sellerId", id);
    }
    doc
}

#[async_trait]
impl CatalogRepository for MongoCatalogRepository {
    #[instrument(skip(self, category), fields(name = %category.name.en))]
    async fn create_category(&self, category: Category) -> CatalogResult<Category> {
        self.categories.insert_one(&category).await?;
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn find_category(&self, id: ObjectId) -> CatalogResult<Option<Category>> {
        Ok(self.categories.find_one(doc! { "_id": id }).await?)
    }

    #[instrument(skip(self))]
    async fn category_name_taken(
        &self,
        name_en: &str,
        exclude: Option<ObjectId>,
    ) -> CatalogResult<bool> {
        let count = self
            .categories
            .count_documents(name_filter(name_en, exclude))
            .await?;
        Ok(count > 0)
    }

    #[instrument(skip(self, category), fields(category_id = %category.id))]
    async fn update_category(&self, category: Category) -> CatalogResult<Category> {
        let result = self
            .categories
            .replace_one(doc! { "_id": category.id }, &category)
            .await?;
        if result.matched_count == 0 {
            return Err(CatalogError::CategoryNotFound);
        }
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn delete_category(&self, id: ObjectId) -> CatalogResult<bool> {
        let result = self.categories.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn list_categories(&self, query: PageQuery) -> CatalogResult<Page<Category>> {
        let filter = with_search(doc! {}, query.search().as_ref(), &NAME_SEARCH_FIELDS);
        Ok(find_page(&self.categories, filter, &query).await?)
    }

    #[instrument(skip(self, sub_category), fields(name = %sub_category.name.en))]
    async fn create_sub_category(&self, sub_category: SubCategory) -> CatalogResult<SubCategory> {
        self.sub_categories.insert_one(&sub_category).await?;
        Ok(sub_category)
    }

    #[instrument(skip(self))]
    async fn find_sub_category(&self, id: ObjectId) -> CatalogResult<Option<SubCategory>> {
        Ok(self.sub_categories.find_one(doc! { "_id": id }).await?)
    }

    #[instrument(skip(self))]
    async fn sub_category_name_taken(
        &self,
        category_id: ObjectId,
        name_en: &str,
        exclude: Option<ObjectId>,
    ) -> CatalogResult<bool> {
        let mut filter = name_filter(name_en, exclude);
        filter.insert("categoryId", category_id);
        Ok(self.sub_categories.count_documents(filter).await? > 0)
    }

    #[instrument(skip(self, sub_category), fields(sub_category_id = %sub_category.id))]
    async fn update_sub_category(&self, sub_category: SubCategory) -> CatalogResult<SubCategory> {
        let result = self
            .sub_categories
            .replace_one(doc! { "_id": sub_category.id }, &sub_category)
            .await?;
        if result.matched_count == 0 {
            return Err(CatalogError::SubCategoryNotFound);
        }
        Ok(sub_category)
    }

    #[instrument(skip(self))]
    async fn delete_sub_category(&self, id: ObjectId) -> CatalogResult<bool> {
        let result = self.sub_categories.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn delete_sub_categories_of(&self, category_id: ObjectId) -> CatalogResult<u64> {
        let result = self
            .sub_categories
            .delete_many(doc! { "categoryId": category_id })
            .await?;
        Ok(result.deleted_count)
    }

    #[instrument(skip(self))]
    async fn list_sub_categories(
        &self,
        query: PageQuery,
        category_id: Option<ObjectId>,
    ) -> CatalogResult<Page<SubCategory>> {
        let base = match category_id {
            Some(id) => doc! { "categoryId": id },
            None => doc! {},
        };
        let filter = with_search(base, query.search().as_ref(), &NAME_SEARCH_FIELDS);
        Ok(find_page(&self.sub_categories, filter, &query).await?)
    }

    #[instrument(skip(self, product), fields(seller_id = %product.seller_id))]
    async fn create_product(&self, product: Product) -> CatalogResult<Product> {
        self.products.insert_one(&product).await?;
        tracing::info!(product_id = %product.id, "Product created successfully");
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn find_product(&self, id: ObjectId) -> CatalogResult<Option<Product>> {
        Ok(self.products.find_one(doc! { "_id": id }).await?)
    }

    #[instrument(skip(self, product), fields(product_id = %product.id))]
    async fn update_product(&self, product: Product) -> CatalogResult<Product> {
        let result = self
            .products
            .replace_one(doc! { "_id": product.id }, &product)
            .await?;
        if result.matched_count == 0 {
            return Err(CatalogError::ProductNotFound);
        }
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, id: ObjectId) -> CatalogResult<bool> {
        let result = self.products.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self))]
    async fn count_products(&self, filter: ProductQuery) -> CatalogResult<u64> {
        Ok(self.products.count_documents(product_filter(&filter)).await?)
    }

    #[instrument(skip(self))]
    async fn list_products(
        &self,
        query: PageQuery,
        filter: ProductQuery,
    ) -> CatalogResult<Page<Product>> {
        let filter = with_search(
            product_filter(&filter),
            query.search().as_ref(),
            &TITLE_SEARCH_FIELDS,
        );
        Ok(find_page(&self.products, filter, &query).await?)
    }
}

/// Categories and sub-categories hold one `image`, products an `images` array
#[async_trait]
impl UploadReferences for MongoCatalogRepository {
    async fn is_referenced(&self, file_name: &str) -> bool {
        let single = file_reference_filter(&["image"], file_name);
        let lookups = tokio::try_join!(
            self.categories.count_documents(single.clone()).limit(1).into_future(),
            self.sub_categories.count_documents(single).limit(1).into_future(),
            self.products
                .count_documents(file_reference_filter(&["images"], file_name))
                .limit(1)
                .into_future(),
        );
        match lookups {
            Ok((categories, sub_categories, products)) => categories + sub_categories + products > 0,
            Err(e) => {
                tracing::warn!(error = %e, file = file_name, "Upload reference lookup failed");
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProductStatus;

    #[test]
    fn test_name_filter_is_anchored_and_escaped() {
        let filter = name_filter("TV+Audio", None);
        let inner = filter.get_document("name.en").unwrap();
        assert_eq!(inner.get_str("$regex").unwrap(), r"^TV\+Audio$");
        assert!(!filter.contains_key("_id"));
    }

    #[test]
    fn test_product_filter_only_sets_given_fields() {
        let seller = ObjectId::new();
        let filter = product_filter(&ProductQuery {
            status: Some(ProductStatus::Accepted),
            ..ProductQuery::of_seller(seller)
        });
        assert_eq!(filter.get_str("status").unwrap(), "ACCEPTED");
        assert_eq!(filter.get_object_id("sellerId").unwrap(), seller);
        assert!(!filter.contains_key("categoryId"));
    }
}
