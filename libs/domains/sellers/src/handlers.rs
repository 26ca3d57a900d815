use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    AnyRole, ApiResponse, AppResult, Authorized, CurrentIdentity, JwtAuth, Message, ObjectIdPath,
    SellerOnly, Staff, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    require_auth,
};
use core_accounts::{Credentials, Page, PageQuery, TokenResponse};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::SellerResult;
use crate::models::{
    Activation, ActivationRequest, SellerRegistration, SellerResponse, SellerUpdate,
};
use crate::repository::SellerRepository;
use crate::service::SellerService;

const ACCOUNT_CREATED: Message = Message::new(
    "تم إنشاء الحساب بنجاح، برجاء تفعيل الحساب",
    "Account created successfully, please activate your account",
);
const LOGGED_IN: Message = Message::new("تم تسجيل الدخول بنجاح", "logged in successfully");
const ACTIVATED: Message = Message::new("تم تفعيل الحساب بنجاح", "Account activated successfully");
const ALREADY_ACTIVE: Message = Message::new("الحساب مفعل بالفعل", "Account is already activated");
const ACCOUNT_UPDATED: Message =
    Message::new("تم تحديث الحساب بنجاح", "Account updated successfully");
const SELLER_DELETED: Message = Message::new("تم حذف البائع بنجاح", "Seller deleted successfully");

#[derive(OpenApi)]
#[openapi(
    paths(
        list_sellers,
        register,
        login,
        activate,
        get_seller_profile,
        get_seller,
        edit_seller,
        delete_seller,
    ),
    components(
        schemas(
            SellerResponse,
            SellerRegistration,
            SellerUpdate,
            ActivationRequest,
            Credentials,
            TokenResponse
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
        (name = "Sellers", description = "Store owner accounts activated by token")
    )
)]
pub struct ApiDoc;

type SharedService<R> = Arc<SellerService<R>>;

pub fn router<R: SellerRepository + 'static>(service: SellerService<R>, auth: JwtAuth) -> Router {
    let shared_service = Arc::new(service);

    let public = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/{id}", get(get_seller));

    // `/{id}` GET stays public; PUT and DELETE go through the gate
    let protected = Router::new()
        .route("/", get(list_sellers))
        .route("/activation", post(activate))
        .route("/getSellerProfile", get(get_seller_profile))
        .route("/{id}", put(edit_seller).delete(delete_seller))
        .route_layer(from_fn_with_state(auth, require_auth));

    public.merge(protected).with_state(shared_service)
}

#[utoipa::path(
    get,
    path = "",
    tag = "Sellers",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of sellers", body = Page<SellerResponse>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse)
    )
)]
async fn list_sellers<R: SellerRepository>(
    State(service): State<SharedService<R>>,
    _caller: Authorized<Staff>,
    Query(query): Query<PageQuery>,
) -> SellerResult<impl IntoResponse> {
    let page = service.list(query).await?;
    Ok(ApiResponse::data(page))
}

/// Register a store; responds with the activation token
#[utoipa::path(
    post,
    path = "/register",
    tag = "Sellers",
    request_body = SellerRegistration,
    responses(
        (status = 201, description = "Seller created, not yet active", body = TokenResponse),
        (status = 400, response = ConflictResponse)
    )
)]
async fn register<R: SellerRepository>(
    State(service): State<SharedService<R>>,
    ValidatedJson(input): ValidatedJson<SellerRegistration>,
) -> SellerResult<impl IntoResponse> {
    let token = service.register(input).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::data(TokenResponse { token }).with_message(ACCOUNT_CREATED),
    ))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Sellers",
    request_body = Credentials,
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse)
    )
)]
async fn login<R: SellerRepository>(
    State(service): State<SharedService<R>>,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> SellerResult<impl IntoResponse> {
    let token = service.login(credentials).await?;
    Ok(ApiResponse::data(TokenResponse { token }).with_message(LOGGED_IN))
}

/// Activate with the token returned by registration
#[utoipa::path(
    post,
    path = "/activation",
    tag = "Sellers",
    request_body = ActivationRequest,
    responses(
        (status = 200, description = "Activated, or already active"),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn activate<R: SellerRepository>(
    State(service): State<SharedService<R>>,
    caller: Authorized<SellerOnly>,
) -> SellerResult<impl IntoResponse> {
    let message = match service.activate(&caller.token).await? {
        Activation::Activated => ACTIVATED,
        Activation::AlreadyActive => ALREADY_ACTIVE,
    };
    Ok(ApiResponse::message(message))
}

#[utoipa::path(
    get,
    path = "/getSellerProfile",
    tag = "Sellers",
    responses(
        (status = 200, description = "Current seller", body = SellerResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_seller_profile<R: SellerRepository>(
    State(service): State<SharedService<R>>,
    identity: CurrentIdentity,
) -> SellerResult<impl IntoResponse> {
    let seller = service.profile(&identity.token).await?;
    Ok(ApiResponse::data(seller))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Sellers",
    params(("id" = String, Path, description = "Seller ObjectId")),
    responses(
        (status = 200, description = "Seller found", body = SellerResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_seller<R: SellerRepository>(
    State(service): State<SharedService<R>>,
    ObjectIdPath(id): ObjectIdPath,
) -> SellerResult<impl IntoResponse> {
    let seller = service.get(id).await?;
    Ok(ApiResponse::data(seller))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Sellers",
    params(("id" = String, Path, description = "Seller ObjectId")),
    request_body = SellerUpdate,
    responses(
        (status = 200, description = "Account updated", body = SellerResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn edit_seller<R: SellerRepository>(
    State(service): State<SharedService<R>>,
    caller: Authorized<AnyRole>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(update): ValidatedJson<SellerUpdate>,
) -> AppResult<impl IntoResponse> {
    let seller = service.edit(id, caller.actor()?, update).await?;
    Ok(ApiResponse::data(seller).with_message(ACCOUNT_UPDATED))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Sellers",
    params(("id" = String, Path, description = "Seller ObjectId")),
    responses(
        (status = 200, description = "Seller deleted"),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_seller<R: SellerRepository>(
    State(service): State<SharedService<R>>,
    _caller: Authorized<Staff>,
    ObjectIdPath(id): ObjectIdPath,
) -> SellerResult<impl IntoResponse> {
    service.delete(id).await?;
    Ok(ApiResponse::message(SELLER_DELETED))
}
