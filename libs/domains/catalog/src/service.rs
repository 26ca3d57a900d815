//! Catalog Service - categories, sub-categories and seller products

use std::sync::Arc;

use bson::oid::ObjectId;
use chrono::Utc;
use core_accounts::{Actor, Page, PageQuery};
use core_uploads::UploadStore;
use tracing::instrument;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Category, CategoryInput, CategoryResponse, CategoryUpdate, Product, ProductInput,
    ProductQuery, ProductResponse, ProductStatus, ProductUpdate, SubCategory, SubCategoryInput,
    SubCategoryResponse, SubCategoryUpdate, parse_id, resolve_prices,
};
use crate::repository::CatalogRepository;

pub struct CatalogService<R: CatalogRepository> {
    repository: Arc<R>,
    uploads: UploadStore,
}

impl<R: CatalogRepository> CatalogService<R> {
    pub fn new(repository: R, uploads: UploadStore) -> Self {
        Self {
            repository: Arc::new(repository),
            uploads,
        }
    }

    /// Delete files a rejected write referenced but nothing else does
    async fn discard_all<'a>(&self, images: impl IntoIterator<Item = &'a str>) {
        for image in images {
            self.uploads.discard(image).await;
        }
    }

    async fn find_category(&self, id: ObjectId) -> CatalogResult<Category> {
        self.repository
            .find_category(id)
            .await?
            .ok_or(CatalogError::CategoryNotFound)
    }

    async fn find_sub_category(&self, id: ObjectId) -> CatalogResult<SubCategory> {
        self.repository
            .find_sub_category(id)
            .await?
            .ok_or(CatalogError::SubCategoryNotFound)
    }

    async fn find_product(&self, id: ObjectId) -> CatalogResult<Product> {
        self.repository
            .find_product(id)
            .await?
            .ok_or(CatalogError::ProductNotFound)
    }

    // Categories

    #[instrument(skip(self))]
    pub async fn list_categories(&self, query: PageQuery) -> CatalogResult<Page<CategoryResponse>> {
        let page = self.repository.list_categories(query).await?;
        Ok(page.map(|c| CategoryResponse::new(c, &self.uploads)))
    }

    #[instrument(skip(self))]
    pub async fn get_category(&self, id: ObjectId) -> CatalogResult<CategoryResponse> {
        Ok(CategoryResponse::new(self.find_category(id).await?, &self.uploads))
    }

    #[instrument(skip(self, input), fields(name = %input.name.en))]
    pub async fn create_category(&self, input: CategoryInput) -> CatalogResult<CategoryResponse> {
        let image = input.image.clone();
        let result = async {
            if self
                .repository
                .category_name_taken(&input.name.en, None)
                .await?
            {
                return Err(CatalogError::DuplicateName(input.name.en.clone()));
            }
            self.repository.create_category(Category::new(input)).await
        }
        .await;

        match result {
            Ok(category) => Ok(CategoryResponse::new(category, &self.uploads)),
            Err(err) => {
                self.discard_all(image.as_deref()).await;
                Err(err)
            }
        }
    }

    #[instrument(skip(self, update))]
    pub async fn edit_category(
        &self,
        id: ObjectId,
        update: CategoryUpdate,
    ) -> CatalogResult<CategoryResponse> {
        let mut category = self.find_category(id).await?;
        let current_image = category.image.clone();

        let result = async {
            if let Some(name) = &update.name
                && self
                    .repository
                    .category_name_taken(&name.en, Some(id))
                    .await?
            {
                return Err(CatalogError::DuplicateName(name.en.clone()));
            }
            category.apply_update(&update);
            self.repository.update_category(category).await
        }
        .await;

        match result {
            Ok(category) => Ok(CategoryResponse::new(category, &self.uploads)),
            Err(err) => {
                let new_image = update.image.as_deref().filter(|i| Some(*i) != current_image.as_deref());
                self.discard_all(new_image).await;
                Err(err)
            }
        }
    }

    /// Refused while any product references the category; its
    /// sub-categories go with it.
    #[instrument(skip(self))]
    pub async fn delete_category(&self, id: ObjectId) -> CatalogResult<()> {
        let category = self.find_category(id).await?;
        if self
            .repository
            .count_products(ProductQuery::in_category(id))
            .await?
            > 0
        {
            return Err(CatalogError::CategoryInUse);
        }

        let removed = self.repository.delete_sub_categories_of(id).await?;
        if !self.repository.delete_category(id).await? {
            return Err(CatalogError::CategoryNotFound);
        }
        self.discard_all(category.image.as_deref()).await;

        tracing::info!(category_id = %id, sub_categories = removed, "Category deleted");
        Ok(())
    }

    // Sub-categories

    #[instrument(skip(self))]
    pub async fn list_sub_categories(
        &self,
        query: PageQuery,
        category_id: Option<ObjectId>,
    ) -> CatalogResult<Page<SubCategoryResponse>> {
        let page = self
            .repository
            .list_sub_categories(query, category_id)
            .await?;
        Ok(page.map(|s| SubCategoryResponse::new(s, &self.uploads)))
    }

    #[instrument(skip(self))]
    pub async fn get_sub_category(&self, id: ObjectId) -> CatalogResult<SubCategoryResponse> {
        Ok(SubCategoryResponse::new(
            self.find_sub_category(id).await?,
            &self.uploads,
        ))
    }

    #[instrument(skip(self, input), fields(name = %input.name.en))]
    pub async fn create_sub_category(
        &self,
        input: SubCategoryInput,
    ) -> CatalogResult<SubCategoryResponse> {
        let image = input.image.clone();
        let result = async {
            let category_id = parse_id(&input.category_id)?;
            self.find_category(category_id).await?;
            if self
                .repository
                .sub_category_name_taken(category_id, &input.name.en, None)
                .await?
            {
                return Err(CatalogError::DuplicateName(input.name.en.clone()));
            }
            self.repository
                .create_sub_category(SubCategory::new(input.name, category_id, input.image))
                .await
        }
        .await;

        match result {
            Ok(sub_category) => Ok(SubCategoryResponse::new(sub_category, &self.uploads)),
            Err(err) => {
                self.discard_all(image.as_deref()).await;
                Err(err)
            }
        }
    }

    #[instrument(skip(self, update))]
    pub async fn edit_sub_category(
        &self,
        id: ObjectId,
        update: SubCategoryUpdate,
    ) -> CatalogResult<SubCategoryResponse> {
        let mut sub_category = self.find_sub_category(id).await?;
        let current_image = sub_category.image.clone();

        let result = async {
            if let Some(category_id) = update.category_id.as_deref() {
                let category_id = parse_id(category_id)?;
                self.find_category(category_id).await?;
                sub_category.category_id = category_id;
            }
            if let Some(name) = &update.name {
                sub_category.name = name.clone();
            }
            if self
                .repository
                .sub_category_name_taken(sub_category.category_id, &sub_category.name.en, Some(id))
                .await?
            {
                return Err(CatalogError::DuplicateName(sub_category.name.en.clone()));
            }
            if let Some(image) = &update.image {
                sub_category.image = Some(image.clone());
            }
            sub_category.updated_at = Utc::now();
            self.repository.update_sub_category(sub_category).await
        }
        .await;

        match result {
            Ok(sub_category) => Ok(SubCategoryResponse::new(sub_category, &self.uploads)),
            Err(err) => {
                let new_image = update.image.as_deref().filter(|i| Some(*i) != current_image.as_deref());
                self.discard_all(new_image).await;
                Err(err)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_sub_category(&self, id: ObjectId) -> CatalogResult<()> {
        let sub_category = self.find_sub_category(id).await?;
        if self
            .repository
            .count_products(ProductQuery::in_sub_category(id))
            .await?
            > 0
        {
            return Err(CatalogError::SubCategoryInUse);
        }
        if !self.repository.delete_sub_category(id).await? {
            return Err(CatalogError::SubCategoryNotFound);
        }
        self.discard_all(sub_category.image.as_deref()).await;
        Ok(())
    }

    // Products

    /// Category and optional sub-category must exist, and the sub-category
    /// must sit under the category.
    async fn check_references(
        &self,
        category_id: ObjectId,
        sub_category_id: Option<ObjectId>,
    ) -> CatalogResult<()> {
        self.find_category(category_id).await?;
        if let Some(sub_category_id) = sub_category_id {
            let sub_category = self.find_sub_category(sub_category_id).await?;
            if sub_category.category_id != category_id {
                return Err(CatalogError::SubCategoryMismatch);
            }
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        query: PageQuery,
        filter: ProductQuery,
    ) -> CatalogResult<Page<ProductResponse>> {
        let page = self.repository.list_products(query, filter).await?;
        Ok(page.map(|p| ProductResponse::new(p, &self.uploads)))
    }

    /// Shopper-facing listing: ACCEPTED products only, whatever status was asked for
    #[instrument(skip(self))]
    pub async fn accepted_products(
        &self,
        query: PageQuery,
        filter: ProductQuery,
    ) -> CatalogResult<Page<ProductResponse>> {
        let filter = ProductQuery {
            status: Some(ProductStatus::Accepted),
            ..filter
        };
        self.list_products(query, filter).await
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ObjectId) -> CatalogResult<ProductResponse> {
        Ok(ProductResponse::new(self.find_product(id).await?, &self.uploads))
    }

    /// A new PENDING product owned by `seller`
    #[instrument(skip(self, input), fields(seller_id = %seller.id))]
    pub async fn create_product(
        &self,
        seller: Actor,
        input: ProductInput,
    ) -> CatalogResult<ProductResponse> {
        let result = async {
            let category_id = parse_id(&input.category_id)?;
            let sub_category_id = input.sub_category_id.as_deref().map(parse_id).transpose()?;
            self.check_references(category_id, sub_category_id).await?;
            let (price, final_price) = resolve_prices(input.price, input.final_price)?;

            let now = Utc::now();
            let product = Product {
                id: ObjectId::new(),
                title: input.title.clone(),
                description: input.description.clone(),
                price,
                final_price,
                stock: input.stock,
                images: input.images.clone(),
                category_id,
                sub_category_id,
                seller_id: seller.id,
                status: ProductStatus::Pending,
                created_at: now,
                updated_at: now,
            };
            self.repository.create_product(product).await
        }
        .await;

        match result {
            Ok(product) => Ok(ProductResponse::new(product, &self.uploads)),
            Err(err) => {
                self.discard_all(input.images.iter().map(String::as_str)).await;
                Err(err)
            }
        }
    }

    /// Owner-only edit. Any change sends the product back to PENDING review.
    ///
    /// Changing `price` without `finalPrice` clears the discount.
    #[instrument(skip(self, update))]
    pub async fn edit_product(
        &self,
        id: ObjectId,
        seller: Actor,
        update: ProductUpdate,
    ) -> CatalogResult<ProductResponse> {
        let product = self.find_product(id).await?;
        let current_images = product.images.clone();

        match self.apply_product_edit(product, seller, &update).await {
            Ok(product) => Ok(ProductResponse::new(product, &self.uploads)),
            Err(err) => {
                self.discard_all(update.new_images(&current_images)).await;
                Err(err)
            }
        }
    }

    async fn apply_product_edit(
        &self,
        mut product: Product,
        seller: Actor,
        update: &ProductUpdate,
    ) -> CatalogResult<Product> {
        if !seller.is_self(product.seller_id) {
            return Err(CatalogError::NotOwner);
        }

        let category_id = match update.category_id.as_deref() {
            Some(id) => parse_id(id)?,
            None => product.category_id,
        };
        let sub_category_id = match update.sub_category_id.as_deref() {
            Some(id) => Some(parse_id(id)?),
            None if category_id != product.category_id => None,
            None => product.sub_category_id,
        };
        self.check_references(category_id, sub_category_id).await?;

        let (price, final_price) = match (update.price, update.final_price) {
            (Some(price), final_price) => resolve_prices(price, final_price)?,
            (None, Some(final_price)) => resolve_prices(product.price, Some(final_price))?,
            (None, None) => (product.price, product.final_price),
        };

        if let Some(title) = &update.title {
            product.title = title.clone();
        }
        if let Some(description) = &update.description {
            product.description = description.clone();
        }
        if let Some(stock) = update.stock {
            product.stock = stock;
        }
        if let Some(images) = &update.images {
            product.images = images.clone();
        }
        product.category_id = category_id;
        product.sub_category_id = sub_category_id;
        product.price = price;
        product.final_price = final_price;
        product.status = ProductStatus::Pending;
        product.updated_at = Utc::now();

        self.repository.update_product(product).await
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ObjectId, seller: Actor) -> CatalogResult<()> {
        let product = self.find_product(id).await?;
        if !seller.is_self(product.seller_id) {
            return Err(CatalogError::NotOwner);
        }
        if !self.repository.delete_product(id).await? {
            return Err(CatalogError::ProductNotFound);
        }
        self.discard_all(product.images.iter().map(String::as_str))
            .await;

        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }

    /// Staff review decision
    #[instrument(skip(self))]
    pub async fn change_status(
        &self,
        id: ObjectId,
        status: ProductStatus,
    ) -> CatalogResult<ProductResponse> {
        let mut product = self.find_product(id).await?;
        product.status = status;
        product.updated_at = Utc::now();
        let product = self.repository.update_product(product).await?;

        tracing::info!(product_id = %id, status = %status, "Product status changed");
        Ok(ProductResponse::new(product, &self.uploads))
    }
}
