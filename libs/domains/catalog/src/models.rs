use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use core_accounts::{SearchText, validation::validate_not_blank};
use core_uploads::UploadStore;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::error::{CatalogError, CatalogResult};

fn validate_object_id(value: &str) -> Result<(), ValidationError> {
    ObjectId::parse_str(value)
        .map(|_| ())
        .map_err(|_| ValidationError::new("object_id"))
}

/// Parse an id taken from a body or query string.
pub fn parse_id(value: &str) -> CatalogResult<ObjectId> {
    ObjectId::parse_str(value).map_err(|_| CatalogError::InvalidId(value.to_string()))
}

fn parse_optional_id(value: Option<&str>) -> CatalogResult<Option<ObjectId>> {
    value.map(parse_id).transpose()
}

/// Text stored in both Arabic and English
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
pub struct LocalizedText {
    #[validate(custom(function = "validate_not_blank"), length(max = 2000))]
    #[schema(example = "إلكترونيات")]
    pub ar: String,
    #[validate(custom(function = "validate_not_blank"), length(max = 2000))]
    #[schema(example = "Electronics")]
    pub en: String,
}

impl LocalizedText {
    pub fn new(ar: impl Into<String>, en: impl Into<String>) -> Self {
        Self {
            ar: ar.into(),
            en: en.into(),
        }
    }

    fn both(&self) -> [&str; 2] {
        [self.ar.as_str(), self.en.as_str()]
    }
}

// Categories

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: LocalizedText,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Category {
    pub fn new(input: CategoryInput) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            name: input.name,
            image: input.image,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_update(&mut self, update: &CategoryUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(image) = &update.image {
            self.image = Some(image.clone());
        }
        self.updated_at = Utc::now();
    }

    pub fn matches(&self, term: &SearchText) -> bool {
        term.matches_any(Some(&self.id), self.name.both())
    }
}

/// Fields searched by category and sub-category listings
pub const NAME_SEARCH_FIELDS: [&str; 2] = ["name.ar", "name.en"];

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CategoryInput {
    #[validate(nested)]
    pub name: LocalizedText,
    /// Path returned by `POST /api/upload`
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CategoryUpdate {
    #[validate(nested)]
    pub name: Option<LocalizedText>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: String,
    pub name: LocalizedText,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CategoryResponse {
    pub fn new(category: Category, uploads: &UploadStore) -> Self {
        Self {
            id: category.id.to_hex(),
            image: uploads.asset_url_opt(category.image.as_deref()),
            name: category.name,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

// Sub-categories

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategory {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub name: LocalizedText,
    pub category_id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl SubCategory {
    pub fn new(name: LocalizedText, category_id: ObjectId, image: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            name,
            category_id,
            image,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn matches(&self, term: &SearchText) -> bool {
        term.matches_any(Some(&self.id), self.name.both())
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryInput {
    #[validate(nested)]
    pub name: LocalizedText,
    #[validate(custom(function = "validate_object_id"))]
    pub category_id: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryUpdate {
    #[validate(nested)]
    pub name: Option<LocalizedText>,
    #[validate(custom(function = "validate_object_id"))]
    pub category_id: Option<String>,
    pub image: Option<String>,
}

/// `GET /subcategories` filter
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SubCategoryFilter {
    /// Only sub-categories of this category
    pub category_id: Option<String>,
}

impl SubCategoryFilter {
    pub fn category_id(&self) -> CatalogResult<Option<ObjectId>> {
        parse_optional_id(self.category_id.as_deref())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryResponse {
    pub id: String,
    pub name: LocalizedText,
    pub category_id: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubCategoryResponse {
    pub fn new(sub_category: SubCategory, uploads: &UploadStore) -> Self {
        Self {
            id: sub_category.id.to_hex(),
            category_id: sub_category.category_id.to_hex(),
            image: uploads.asset_url_opt(sub_category.image.as_deref()),
            name: sub_category.name,
            created_at: sub_category.created_at,
            updated_at: sub_category.updated_at,
        }
    }
}

// Products

/// Review state of a product. Only ACCEPTED products are shown to shoppers.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum ProductStatus {
    #[default]
    Pending,
    Accepted,
    Blocked,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub price: f64,
    /// Price after discount; equal to `price` when there is none
    pub final_price: f64,
    pub stock: u32,
    #[serde(default)]
    pub images: Vec<String>,
    pub category_id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category_id: Option<ObjectId>,
    pub seller_id: ObjectId,
    pub status: ProductStatus,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn matches(&self, term: &SearchText) -> bool {
        term.matches_any(Some(&self.id), self.title.both())
    }

    pub fn matches_filter(&self, filter: &ProductQuery) -> bool {
        filter.category_id.is_none_or(|id| id == self.category_id)
            && filter
                .sub_category_id
                .is_none_or(|id| Some(id) == self.sub_category_id)
            && filter.status.is_none_or(|status| status == self.status)
            && filter.seller_id.is_none_or(|id| id == self.seller_id)
    }
}

pub const TITLE_SEARCH_FIELDS: [&str; 2] = ["title.ar", "title.en"];

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[validate(nested)]
    pub title: LocalizedText,
    #[validate(nested)]
    pub description: LocalizedText,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[validate(range(min = 0.0))]
    pub final_price: Option<f64>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub images: Vec<String>,
    #[validate(custom(function = "validate_object_id"))]
    pub category_id: String,
    #[validate(custom(function = "validate_object_id"))]
    pub sub_category_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    #[validate(nested)]
    pub title: Option<LocalizedText>,
    #[validate(nested)]
    pub description: Option<LocalizedText>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[validate(range(min = 0.0))]
    pub final_price: Option<f64>,
    pub stock: Option<u32>,
    /// Replaces the whole image list
    pub images: Option<Vec<String>>,
    #[validate(custom(function = "validate_object_id"))]
    pub category_id: Option<String>,
    #[validate(custom(function = "validate_object_id"))]
    pub sub_category_id: Option<String>,
}

impl ProductUpdate {
    /// Images in this update that the product does not already reference
    pub fn new_images<'a>(&'a self, current: &'a [String]) -> impl Iterator<Item = &'a str> {
        self.images
            .iter()
            .flatten()
            .filter(move |image| !current.contains(image))
            .map(String::as_str)
    }
}

/// Price pair for a product, with `final_price` defaulting to `price`
pub fn resolve_prices(price: f64, final_price: Option<f64>) -> CatalogResult<(f64, f64)> {
    let final_price = final_price.unwrap_or(price);
    if final_price > price {
        return Err(CatalogError::FinalPriceAbovePrice);
    }
    Ok((price, final_price))
}

/// Listing filters as received on the query string
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    pub category_id: Option<String>,
    pub sub_category_id: Option<String>,
    pub status: Option<ProductStatus>,
    pub seller_id: Option<String>,
}

impl TryFrom<ProductFilter> for ProductQuery {
    type Error = CatalogError;

    fn try_from(filter: ProductFilter) -> CatalogResult<Self> {
        Ok(Self {
            category_id: parse_optional_id(filter.category_id.as_deref())?,
            sub_category_id: parse_optional_id(filter.sub_category_id.as_deref())?,
            status: filter.status,
            seller_id: parse_optional_id(filter.seller_id.as_deref())?,
        })
    }
}

/// Parsed listing filters; every field narrows the result
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProductQuery {
    pub category_id: Option<ObjectId>,
    pub sub_category_id: Option<ObjectId>,
    pub status: Option<ProductStatus>,
    pub seller_id: Option<ObjectId>,
}

impl ProductQuery {
    pub fn in_category(id: ObjectId) -> Self {
        Self {
            category_id: Some(id),
            ..Self::default()
        }
    }

    pub fn in_sub_category(id: ObjectId) -> Self {
        Self {
            sub_category_id: Some(id),
            ..Self::default()
        }
    }

    pub fn of_seller(id: ObjectId) -> Self {
        Self {
            seller_id: Some(id),
            ..Self::default()
        }
    }
}

/// `GET /sellers/getSellerProducts` query
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct SellerProductsQuery {
    pub seller_id: String,
}

/// `PUT /products/changeStatus/{id}` body
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct StatusChange {
    pub status: ProductStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub price: f64,
    pub final_price: f64,
    pub stock: u32,
    pub images: Vec<String>,
    pub category_id: String,
    pub sub_category_id: Option<String>,
    pub seller_id: String,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductResponse {
    pub fn new(product: Product, uploads: &UploadStore) -> Self {
        Self {
            id: product.id.to_hex(),
            images: product
                .images
                .iter()
                .map(|image| uploads.asset_url(image))
                .collect(),
            category_id: product.category_id.to_hex(),
            sub_category_id: product.sub_category_id.map(|id| id.to_hex()),
            seller_id: product.seller_id.to_hex(),
            title: product.title,
            description: product.description,
            price: product.price,
            final_price: product.final_price,
            stock: product.stock,
            status: product.status,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_final_price_defaults_to_price() {
        assert_eq!(resolve_prices(100.0, None).unwrap(), (100.0, 100.0));
        assert_eq!(resolve_prices(100.0, Some(80.0)).unwrap(), (100.0, 80.0));
        assert!(matches!(
            resolve_prices(100.0, Some(120.0)),
            Err(CatalogError::FinalPriceAbovePrice)
        ));
    }

    #[test]
    fn test_filter_rejects_malformed_ids() {
        let filter = ProductFilter {
            seller_id: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            ProductQuery::try_from(filter),
            Err(CatalogError::InvalidId(_))
        ));
    }

    #[test]
    fn test_blank_name_fails_validation() {
        let input = CategoryInput {
            name: LocalizedText::new(" ", "Phones"),
            image: None,
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.errors().contains_key("name"));
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_value(ProductStatus::Accepted).unwrap(),
            "ACCEPTED"
        );
        assert_eq!(
            "BLOCKED".parse::<ProductStatus>().unwrap(),
            ProductStatus::Blocked
        );
    }

    #[test]
    fn test_new_images_skips_existing() {
        let update = ProductUpdate {
            images: Some(vec!["a.png".to_string(), "b.png".to_string()]),
            ..Default::default()
        };
        let current = vec!["a.png".to_string()];
        assert_eq!(update.new_images(&current).collect::<Vec<_>>(), vec!["b.png"]);
    }
}
