use async_trait::async_trait;
use bson::oid::ObjectId;
use core_accounts::{Page, PageQuery};
use core_uploads::{UploadReferences, points_to};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{Category, Product, ProductQuery, SubCategory};

/// Persistence for categories, sub-categories and products.
///
/// Listings are newest first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn create_category(&self, category: Category) -> CatalogResult<Category>;

    async fn find_category(&self, id: ObjectId) -> CatalogResult<Option<Category>>;

    /// Case-insensitive match on the English name
    async fn category_name_taken(
        &self,
        name_en: &str,
        exclude: Option<ObjectId>,
    ) -> CatalogResult<bool>;

    async fn update_category(&self, category: Category) -> CatalogResult<Category>;

    async fn delete_category(&self, id: ObjectId) -> CatalogResult<bool>;

    async fn list_categories(&self, query: PageQuery) -> CatalogResult<Page<Category>>;

    async fn create_sub_category(&self, sub_category: SubCategory) -> CatalogResult<SubCategory>;

    async fn find_sub_category(&self, id: ObjectId) -> CatalogResult<Option<SubCategory>>;

    /// Case-insensitive match on the English name within one category
    async fn sub_category_name_taken(
        &self,
        category_id: ObjectId,
        name_en: &str,
        exclude: Option<ObjectId>,
    ) -> CatalogResult<bool>;

    async fn update_sub_category(&self, sub_category: SubCategory) -> CatalogResult<SubCategory>;

    async fn delete_sub_category(&self, id: ObjectId) -> CatalogResult<bool>;

    /// Remove every sub-category of `category_id`, returning how many went
    async fn delete_sub_categories_of(&self, category_id: ObjectId) -> CatalogResult<u64>;

    async fn list_sub_categories(
        &self,
        query: PageQuery,
        category_id: Option<ObjectId>,
    ) -> CatalogResult<Page<SubCategory>>;

    async fn create_product(&self, product: Product) -> CatalogResult<Product>;

    async fn find_product(&self, id: ObjectId) -> CatalogResult<Option<Product>>;

    async fn update_product(&self, product: Product) -> CatalogResult<Product>;

    async fn delete_product(&self, id: ObjectId) -> CatalogResult<bool>;

    async fn count_products(&self, filter: ProductQuery) -> CatalogResult<u64>;

    async fn list_products(
        &self,
        query: PageQuery,
        filter: ProductQuery,
    ) -> CatalogResult<Page<Product>>;
}

#[derive(Debug, Default)]
struct Collections {
    categories: HashMap<ObjectId, Category>,
    sub_categories: HashMap<ObjectId, SubCategory>,
    products: HashMap<ObjectId, Product>,
}

/// In-memory implementation of CatalogRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogRepository {
    inner: Arc<RwLock<Collections>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Newest first, ties broken by id like the MongoDB sort
fn newest_first<T>(items: &mut [T], key: impl Fn(&T) -> (chrono::DateTime<chrono::Utc>, ObjectId)) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn create_category(&self, category: Category) -> CatalogResult<Category> {
        let mut inner = self.inner.write().await;
        let taken = inner
            .categories
            .values()
            .any(|c| c.name.en.eq_ignore_ascii_case(&category.name.en));
        if taken {
            return Err(CatalogError::DuplicateName(category.name.en));
        }
        inner.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn find_category(&self, id: ObjectId) -> CatalogResult<Option<Category>> {
        Ok(self.inner.read().await.categories.get(&id).cloned())
    }

    async fn category_name_taken(
        &self,
        name_en: &str,
        exclude: Option<ObjectId>,
    ) -> CatalogResult<bool> {
        let inner = self.inner.read().await;
        Ok(inner
            .categories
            .values()
            .any(|c| Some(c.id) != exclude && c.name.en.eq_ignore_ascii_case(name_en)))
    }

    async fn update_category(&self, category: Category) -> CatalogResult<Category> {
        let mut inner = self.inner.write().await;
        match inner.categories.get_mut(&category.id) {
            Some(slot) => {
                *slot = category.clone();
                Ok(category)
            }
            None => Err(CatalogError::CategoryNotFound),
        }
    }

    async fn delete_category(&self, id: ObjectId) -> CatalogResult<bool> {
        Ok(self.inner.write().await.categories.remove(&id).is_some())
    }

    async fn list_categories(&self, query: PageQuery) -> CatalogResult<Page<Category>> {
        let inner = self.inner.read().await;
        let term = query.search();
        let mut result: Vec<Category> = inner
            .categories
            .values()
            .filter(|c| term.as_ref().is_none_or(|t| c.matches(t)))
            .cloned()
            .collect();
        newest_first(&mut result, |c| (c.created_at, c.id));
        Ok(query.slice(&result))
    }

    async fn create_sub_category(&self, sub_category: SubCategory) -> CatalogResult<SubCategory> {
        let mut inner = self.inner.write().await;
        inner
            .sub_categories
            .insert(sub_category.id, sub_category.clone());
        Ok(sub_category)
    }

    async fn find_sub_category(&self, id: ObjectId) -> CatalogResult<Option<SubCategory>> {
        Ok(self.inner.read().await.sub_categories.get(&id).cloned())
    }

    async fn sub_category_name_taken(
        &self,
        category_id: ObjectId,
        name_en: &str,
        exclude: Option<ObjectId>,
    ) -> CatalogResult<bool> {
        let inner = self.inner.read().await;
        Ok(inner.sub_categories.values().any(|s| {
            Some(s.id) != exclude
                && s.category_id == category_id
                && s.name.en.eq_ignore_ascii_case(name_en)
        }))
    }

    async fn update_sub_category(&self, sub_category: SubCategory) -> CatalogResult<SubCategory> {
        let mut inner = self.inner.write().await;
        match inner.sub_categories.get_mut(&sub_category.id) {
            Some(slot) => {
                *slot = sub_category.clone();
                Ok(sub_category)
            }
            None => Err(CatalogError::SubCategoryNotFound),
        }
    }

    async fn delete_sub_category(&self, id: ObjectId) -> CatalogResult<bool> {
        Ok(self.inner.write().await.sub_categories.remove(&id).is_some())
    }

    async fn delete_sub_categories_of(&self, category_id: ObjectId) -> CatalogResult<u64> {
        let mut inner = self.inner.write().await;
        let before = inner.sub_categories.len();
        inner
            .sub_categories
            .retain(|_, s| s.category_id != category_id);
        Ok((before - inner.sub_categories.len()) as u64)
    }

    async fn list_sub_categories(
        &self,
        query: PageQuery,
        category_id: Option<ObjectId>,
    ) -> CatalogResult<Page<SubCategory>> {
        let inner = self.inner.read().await;
        let term = query.search();
        let mut result: Vec<SubCategory> = inner
            .sub_categories
            .values()
            .filter(|s| category_id.is_none_or(|id| s.category_id == id))
            .filter(|s| term.as_ref().is_none_or(|t| s.matches(t)))
            .cloned()
            .collect();
        newest_first(&mut result, |s| (s.created_at, s.id));
        Ok(query.slice(&result))
    }

    async fn create_product(&self, product: Product) -> CatalogResult<Product> {
        let mut inner = self.inner.write().await;
        inner.products.insert(product.id, product.clone());
        tracing::info!(product_id = %product.id, "Created product");
        Ok(product)
    }

    async fn find_product(&self, id: ObjectId) -> CatalogResult<Option<Product>> {
        Ok(self.inner.read().await.products.get(&id).cloned())
    }

    async fn update_product(&self, product: Product) -> CatalogResult<Product> {
        let mut inner = self.inner.write().await;
        match inner.products.get_mut(&product.id) {
            Some(slot) => {
                *slot = product.clone();
                Ok(product)
            }
            None => Err(CatalogError::ProductNotFound),
        }
    }

    async fn delete_product(&self, id: ObjectId) -> CatalogResult<bool> {
        Ok(self.inner.write().await.products.remove(&id).is_some())
    }

    async fn count_products(&self, filter: ProductQuery) -> CatalogResult<u64> {
        let inner = self.inner.read().await;
        Ok(inner
            .products
            .values()
            .filter(|p| p.matches_filter(&filter))
            .count() as u64)
    }

    async fn list_products(
        &self,
        query: PageQuery,
        filter: ProductQuery,
    ) -> CatalogResult<Page<Product>> {
        let inner = self.inner.read().await;
        let term = query.search();
        let mut result: Vec<Product> = inner
            .products
            .values()
            .filter(|p| p.matches_filter(&filter))
            .filter(|p| term.as_ref().is_none_or(|t| p.matches(t)))
            .cloned()
            .collect();
        newest_first(&mut result, |p| (p.created_at, p.id));
        Ok(query.slice(&result))
    }
}

#[async_trait]
impl UploadReferences for InMemoryCatalogRepository {
    async fn is_referenced(&self, file_name: &str) -> bool {
        let inner = self.inner.read().await;
        let single = |image: &Option<String>| {
            image.as_deref().is_some_and(|path| points_to(path, file_name))
        };
        inner.categories.values().any(|c| single(&c.image))
            || inner.sub_categories.values().any(|s| single(&s.image))
            || inner
                .products
                .values()
                .any(|p| p.images.iter().any(|path| points_to(path, file_name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryInput, LocalizedText, ProductStatus};
    use chrono::Utc;

    fn category(en: &str) -> Category {
        Category::new(CategoryInput {
            name: LocalizedText::new("قسم", en),
            image: None,
        })
    }

    fn product(category_id: ObjectId, seller_id: ObjectId, title: &str) -> Product {
        let now = Utc::now();
        Product {
            id: ObjectId::new(),
            title: LocalizedText::new("منتج", title),
            description: LocalizedText::new("وصف", "Description"),
            price: 10.0,
            final_price: 10.0,
            stock: 1,
            images: Vec::new(),
            category_id,
            sub_category_id: None,
            seller_id,
            status: ProductStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_category_name_is_unique_ignoring_case() {
        let repo = InMemoryCatalogRepository::new();
        let phones = repo.create_category(category("Phones")).await.unwrap();

        assert!(repo.category_name_taken("PHONES", None).await.unwrap());
        assert!(!repo.category_name_taken("phones", Some(phones.id)).await.unwrap());
        assert!(matches!(
            repo.create_category(category("phones")).await,
            Err(CatalogError::DuplicateName(_))
        ));
    }

    #[tokio::test]
    async fn test_product_filters_combine() {
        let repo = InMemoryCatalogRepository::new();
        let phones = ObjectId::new();
        let books = ObjectId::new();
        let seller = ObjectId::new();

        repo.create_product(product(phones, seller, "Galaxy")).await.unwrap();
        let mut accepted = product(phones, ObjectId::new(), "Pixel");
        accepted.status = ProductStatus::Accepted;
        repo.create_product(accepted).await.unwrap();
        repo.create_product(product(books, seller, "Novel")).await.unwrap();

        let in_phones = repo
            .list_products(PageQuery::default(), ProductQuery::in_category(phones))
            .await
            .unwrap();
        assert_eq!(in_phones.total, 2);

        let filter = ProductQuery {
            status: Some(ProductStatus::Accepted),
            ..ProductQuery::in_category(phones)
        };
        assert_eq!(repo.count_products(filter).await.unwrap(), 1);

        let searched = repo
            .list_products(
                PageQuery::default().with_search("gal"),
                ProductQuery::of_seller(seller),
            )
            .await
            .unwrap();
        assert_eq!(searched.total, 1);
        assert_eq!(searched.items[0].title.en, "Galaxy");
    }

    #[tokio::test]
    async fn test_delete_sub_categories_of_category() {
        let repo = InMemoryCatalogRepository::new();
        let parent = ObjectId::new();
        for en in ["Android", "iOS"] {
            repo.create_sub_category(SubCategory::new(LocalizedText::new("فرعي", en), parent, None))
                .await
                .unwrap();
        }
        repo.create_sub_category(SubCategory::new(
            LocalizedText::new("فرعي", "Other"),
            ObjectId::new(),
            None,
        ))
        .await
        .unwrap();

        assert_eq!(repo.delete_sub_categories_of(parent).await.unwrap(), 2);
        let left = repo
            .list_sub_categories(PageQuery::default(), None)
            .await
            .unwrap();
        assert_eq!(left.total, 1);
    }
}
