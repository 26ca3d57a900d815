use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    ApiResponse, AppResult, Authorized, JwtAuth, Message, ObjectIdPath, SellerOnly, Staff,
    ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    require_auth,
};
use core_accounts::{Page, PageQuery};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::CatalogResult;
use crate::models::{
    CategoryInput, CategoryResponse, CategoryUpdate, LocalizedText, ProductFilter, ProductInput,
    ProductQuery, ProductResponse, ProductStatus, ProductUpdate, SellerProductsQuery,
    StatusChange, SubCategoryFilter, SubCategoryInput, SubCategoryResponse, SubCategoryUpdate,
    parse_id,
};
use crate::repository::CatalogRepository;
use crate::service::CatalogService;

const CATEGORY_CREATED: Message = Message::new("تم إنشاء القسم بنجاح", "Category created successfully");
const CATEGORY_UPDATED: Message = Message::new("تم تحديث القسم بنجاح", "Category updated successfully");
const CATEGORY_DELETED: Message = Message::new("تم حذف القسم بنجاح", "Category deleted successfully");
const SUB_CATEGORY_CREATED: Message = Message::new(
    "تم إنشاء القسم الفرعي بنجاح",
    "Sub-category created successfully",
);
const SUB_CATEGORY_UPDATED: Message = Message::new(
    "تم تحديث القسم الفرعي بنجاح",
    "Sub-category updated successfully",
);
const SUB_CATEGORY_DELETED: Message = Message::new(
    "تم حذف القسم الفرعي بنجاح",
    "Sub-category deleted successfully",
);
const PRODUCT_CREATED: Message = Message::new(
    "تم إضافة المنتج بنجاح وهو قيد المراجعة",
    "Product created successfully and is pending review",
);
const PRODUCT_UPDATED: Message = Message::new("تم تحديث المنتج بنجاح", "Product updated successfully");
const PRODUCT_DELETED: Message = Message::new("تم حذف المنتج بنجاح", "Product deleted successfully");
const STATUS_CHANGED: Message = Message::new(
    "تم تغيير حالة المنتج بنجاح",
    "Product status changed successfully",
);

#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        get_category,
        create_category,
        edit_category,
        delete_category,
        list_sub_categories,
        get_sub_category,
        create_sub_category,
        edit_sub_category,
        delete_sub_category,
        list_products,
        accepted_products,
        get_product,
        create_product,
        edit_product,
        delete_product,
        change_status,
        seller_products,
    ),
    components(
        schemas(
            LocalizedText,
            CategoryResponse,
            CategoryInput,
            CategoryUpdate,
            SubCategoryResponse,
            SubCategoryInput,
            SubCategoryUpdate,
            ProductResponse,
            ProductInput,
            ProductUpdate,
            ProductStatus,
            StatusChange
        ),
        responses(
            BadRequestValidationResponse,
            BadRequestIdResponse,
            ConflictResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            NotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Categories", description = "Top-level product categories"),
        (name = "SubCategories", description = "Categories nested under a parent"),
        (name = "Products", description = "Seller listings reviewed by staff")
    )
)]
pub struct ApiDoc;

type SharedService<R> = Arc<CatalogService<R>>;

/// One router per mount point, all sharing a single service
pub struct CatalogRouters {
    /// `/api/categories`
    pub categories: Router,
    /// `/api/subcategories`
    pub sub_categories: Router,
    /// `/api/products`
    pub products: Router,
    /// Merged into `/api/sellers`
    pub seller_products: Router,
}

pub fn routers<R: CatalogRepository + 'static>(
    service: CatalogService<R>,
    auth: JwtAuth,
) -> CatalogRouters {
    let shared_service = Arc::new(service);

    let categories = Router::new()
        .route("/", get(list_categories))
        .route("/{id}", get(get_category))
        .merge(
            Router::new()
                .route("/", post(create_category))
                .route("/{id}", put(edit_category).delete(delete_category))
                .route_layer(from_fn_with_state(auth.clone(), require_auth)),
        )
        .with_state(shared_service.clone());

    let sub_categories = Router::new()
        .route("/", get(list_sub_categories))
        .route("/{id}", get(get_sub_category))
        .merge(
            Router::new()
                .route("/", post(create_sub_category))
                .route("/{id}", put(edit_sub_category).delete(delete_sub_category))
                .route_layer(from_fn_with_state(auth.clone(), require_auth)),
        )
        .with_state(shared_service.clone());

    let products = Router::new()
        .route("/", get(list_products))
        .route("/acceptedSellerProducts", get(accepted_products))
        .route("/{id}", get(get_product))
        .merge(
            Router::new()
                .route("/", post(create_product))
                .route("/{id}", put(edit_product).delete(delete_product))
                .route("/changeStatus/{id}", put(change_status))
                .route_layer(from_fn_with_state(auth, require_auth)),
        )
        .with_state(shared_service.clone());

    let seller_products = Router::new()
        .route("/getSellerProducts", get(seller_products))
        .with_state(shared_service);

    CatalogRouters {
        categories,
        sub_categories,
        products,
        seller_products,
    }
}

// Categories

#[utoipa::path(
    get,
    path = "/api/categories",
    tag = "Categories",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of categories", body = Page<CategoryResponse>)
    )
)]
async fn list_categories<R: CatalogRepository>(
    State(service): State<SharedService<R>>,
    Query(query): Query<PageQuery>,
) -> CatalogResult<impl IntoResponse> {
    Ok(ApiResponse::data(service.list_categories(query).await?))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    tag = "Categories",
    params(("id" = String, Path, description = "Category ObjectId")),
    responses(
        (status = 200, description = "Category found", body = CategoryResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_category<R: CatalogRepository>(
    State(service): State<SharedService<R>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CatalogResult<impl IntoResponse> {
    Ok(ApiResponse::data(service.get_category(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    tag = "Categories",
    request_body = CategoryInput,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, response = ConflictResponse),
        (status = 403, response = ForbiddenResponse)
    )
)]
async fn create_category<R: CatalogRepository>(
    State(service): State<SharedService<R>>,
    _caller: Authorized<Staff>,
    ValidatedJson(input): ValidatedJson<CategoryInput>,
) -> CatalogResult<impl IntoResponse> {
    let category = service.create_category(input).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::data(category).with_message(CATEGORY_CREATED),
    ))
}

#[utoipa::path(
    put,
    path = "/api/categories/{id}",
    tag = "Categories",
    params(("id" = String, Path, description = "Category ObjectId")),
    request_body = CategoryUpdate,
    responses(
        (status = 200, description = "Category updated", body = CategoryResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn edit_category<R: CatalogRepository>(
    State(service): State<SharedService<R>>,
    _caller: Authorized<Staff>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(update): ValidatedJson<CategoryUpdate>,
) -> CatalogResult<impl IntoResponse> {
    let category = service.edit_category(id, update).await?;
    Ok(ApiResponse::data(category).with_message(CATEGORY_UPDATED))
}

/// Fails while products still reference the category
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    tag = "Categories",
    params(("id" = String, Path, description = "Category ObjectId")),
    responses(
        (status = 200, description = "Category and its sub-categories deleted"),
        (status = 400, response = BadRequestIdResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_category<R: CatalogRepository>(
    State(service): State<SharedService<R>>,
    _caller: Authorized<Staff>,
    ObjectIdPath(id): ObjectIdPath,
) -> CatalogResult<impl IntoResponse> {
    service.delete_category(id).await?;
    Ok(ApiResponse::message(CATEGORY_DELETED))
}

// Sub-categories

#[utoipa::path(
    get,
    path = "/api/subcategories",
    tag = "SubCategories",
    params(PageQuery, SubCategoryFilter),
    responses(
        (status = 200, description = "Page of sub-categories", body = Page<SubCategoryResponse>),
        (status = 400, response = BadRequestIdResponse)
    )
)]
async fn list_sub_categories<R: CatalogRepository>(
    State(service): State<SharedService<R>>,
    Query(query): Query<PageQuery>,
    Query(filter): Query<SubCategoryFilter>,
) -> CatalogResult<impl IntoResponse> {
    let page = service
        .list_sub_categories(query, filter.category_id()?)
        .await?;
    Ok(ApiResponse::data(page))
}

#[utoipa::path(
    get,
    path = "/api/subcategories/{id}",
    tag = "SubCategories",
    params(("id" = String, Path, description = "Sub-category ObjectId")),
    responses(
        (status = 200, description = "Sub-category found", body = SubCategoryResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_sub_category<R: CatalogRepository>(
    State(service): State<SharedService<R>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CatalogResult<impl IntoResponse> {
    Ok(ApiResponse::data(service.get_sub_category(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/subcategories",
    tag = "SubCategories",
    request_body = SubCategoryInput,
    responses(
        (status = 201, description = "Sub-category created", body = SubCategoryResponse),
        (status = 400, response = ConflictResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn create_sub_category<R: CatalogRepository>(
    State(service): State<SharedService<R>>,
    _caller: Authorized<Staff>,
    ValidatedJson(input): ValidatedJson<SubCategoryInput>,
) -> CatalogResult<impl IntoResponse> {
    let sub_category = service.create_sub_category(input).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::data(sub_category).with_message(SUB_CATEGORY_CREATED),
    ))
}

#[utoipa::path(
    put,
    path = "/api/subcategories/{id}",
    tag = "SubCategories",
    params(("id" = String, Path, description = "Sub-category ObjectId")),
    request_body = SubCategoryUpdate,
    responses(
        (status = 200, description = "Sub-category updated", body = SubCategoryResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn edit_sub_category<R: CatalogRepository>(
    State(service): State<SharedService<R>>,
    _caller: Authorized<Staff>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(update): ValidatedJson<SubCategoryUpdate>,
) -> CatalogResult<impl IntoResponse> {
    let sub_category = service.edit_sub_category(id, update).await?;
    Ok(ApiResponse::data(sub_category).with_message(SUB_CATEGORY_UPDATED))
}

#[utoipa::path(
    delete,
    path = "/api/subcategories/{id}",
    tag = "SubCategories",
    params(("id" = String, Path, description = "Sub-category ObjectId")),
    responses(
        (status = 200, description = "Sub-category deleted"),
        (status = 400, response = BadRequestIdResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_sub_category<R: CatalogRepository>(
    State(service): State<SharedService<R>>,
    _caller: Authorized<Staff>,
    ObjectIdPath(id): ObjectIdPath,
) -> CatalogResult<impl IntoResponse> {
    service.delete_sub_category(id).await?;
    Ok(ApiResponse::message(SUB_CATEGORY_DELETED))
}

// Products

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    params(PageQuery, ProductFilter),
    responses(
        (status = 200, description = "Page of products", body = Page<ProductResponse>),
        (status = 400, response = BadRequestIdResponse)
    )
)]
async fn list_products<R: CatalogRepository>(
    State(service): State<SharedService<R>>,
    Query(query): Query<PageQuery>,
    Query(filter): Query<ProductFilter>,
) -> CatalogResult<impl IntoResponse> {
    let page = service.list_products(query, filter.try_into()?).await?;
    Ok(ApiResponse::data(page))
}

/// Same filters as the full listing, restricted to ACCEPTED
#[utoipa::path(
    get,
    path = "/api/products/acceptedSellerProducts",
    tag = "Products",
    params(PageQuery, ProductFilter),
    responses(
        (status = 200, description = "Page of accepted products", body = Page<ProductResponse>),
        (status = 400, response = BadRequestIdResponse)
    )
)]
async fn accepted_products<R: CatalogRepository>(
    State(service): State<SharedService<R>>,
    Query(query): Query<PageQuery>,
    Query(filter): Query<ProductFilter>,
) -> CatalogResult<impl IntoResponse> {
    let page = service.accepted_products(query, filter.try_into()?).await?;
    Ok(ApiResponse::data(page))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ObjectId")),
    responses(
        (status = 200, description = "Product found", body = ProductResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_product<R: CatalogRepository>(
    State(service): State<SharedService<R>>,
    ObjectIdPath(id): ObjectIdPath,
) -> CatalogResult<impl IntoResponse> {
    Ok(ApiResponse::data(service.get_product(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = ProductInput,
    responses(
        (status = 201, description = "Product created as PENDING", body = ProductResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn create_product<R: CatalogRepository>(
    State(service): State<SharedService<R>>,
    caller: Authorized<SellerOnly>,
    ValidatedJson(input): ValidatedJson<ProductInput>,
) -> AppResult<impl IntoResponse> {
    let product = service.create_product(caller.actor()?, input).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::data(product).with_message(PRODUCT_CREATED),
    ))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ObjectId")),
    request_body = ProductUpdate,
    responses(
        (status = 200, description = "Product updated and back to PENDING", body = ProductResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn edit_product<R: CatalogRepository>(
    State(service): State<SharedService<R>>,
    caller: Authorized<SellerOnly>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(update): ValidatedJson<ProductUpdate>,
) -> AppResult<impl IntoResponse> {
    let product = service.edit_product(id, caller.actor()?, update).await?;
    Ok(ApiResponse::data(product).with_message(PRODUCT_UPDATED))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ObjectId")),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_product<R: CatalogRepository>(
    State(service): State<SharedService<R>>,
    caller: Authorized<SellerOnly>,
    ObjectIdPath(id): ObjectIdPath,
) -> AppResult<impl IntoResponse> {
    service.delete_product(id, caller.actor()?).await?;
    Ok(ApiResponse::message(PRODUCT_DELETED))
}

#[utoipa::path(
    put,
    path = "/api/products/changeStatus/{id}",
    tag = "Products",
    params(("id" = String, Path, description = "Product ObjectId")),
    request_body = StatusChange,
    responses(
        (status = 200, description = "Status changed", body = ProductResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn change_status<R: CatalogRepository>(
    State(service): State<SharedService<R>>,
    _caller: Authorized<Staff>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(change): ValidatedJson<StatusChange>,
) -> CatalogResult<impl IntoResponse> {
    let product = service.change_status(id, change.status).await?;
    Ok(ApiResponse::data(product).with_message(STATUS_CHANGED))
}

/// Every product of one seller, whatever its review status
#[utoipa::path(
    get,
    path = "/api/sellers/getSellerProducts",
    tag = "Products",
    params(PageQuery, SellerProductsQuery),
    responses(
        (status = 200, description = "Page of the seller's products", body = Page<ProductResponse>),
        (status = 400, response = BadRequestIdResponse)
    )
)]
async fn seller_products<R: CatalogRepository>(
    State(service): State<SharedService<R>>,
    Query(query): Query<PageQuery>,
    Query(seller): Query<SellerProductsQuery>,
) -> CatalogResult<impl IntoResponse> {
    let seller_id = parse_id(&seller.seller_id)?;
    let page = service
        .list_products(query, ProductQuery::of_seller(seller_id))
        .await?;
    Ok(ApiResponse::data(page))
}
