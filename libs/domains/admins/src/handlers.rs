use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post, put},
};
use axum_helpers::{
    ApiResponse, AppResult, Authorized, JwtAuth, Message, ObjectIdPath, Staff,
    SuperAdminOnly, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    require_auth,
};
use core_accounts::{Credentials, Page, PageQuery, ProfileUpdate, Registration, TokenResponse};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::AdminResult;
use crate::models::{AdminResponse, BlockStatus};
use crate::repository::AdminRepository;
use crate::service::AdminService;

const ACCOUNT_CREATED: Message = Message::new("تم إنشاء الحساب بنجاح", "Account created successfully");
const LOGGED_IN: Message = Message::new("تم تسجيل الدخول بنجاح", "logged in successfully");
const PROFILE_UPDATED: Message =
    Message::new("تم تحديث الملف الشخصي بنجاح", "Profile updated successfully");
const ADMIN_DELETED: Message = Message::new("تم حذف الادمن بنجاح", "Admin deleted successfully");
const STATUS_UPDATED: Message =
    Message::new("تم تحديث حالة الحساب بنجاح", "Account status updated successfully");

/// OpenAPI documentation for the Admins API
#[derive(OpenApi)]
#[openapi(
    paths(
        register,
        login,
        get_profile,
        list_admins,
        add_admin,
        block_admin,
        get_admin,
        edit_admin,
        delete_admin,
    ),
    components(
        schemas(AdminResponse, BlockStatus, Registration, Credentials, ProfileUpdate, TokenResponse),
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
        (name = "Admins", description = "Admin accounts and super-admin management")
    )
)]
pub struct ApiDoc;

type SharedService<R> = Arc<AdminService<R>>;

/// Create the admins router. `auth` guards everything except register and login.
pub fn router<R: AdminRepository + 'static>(service: AdminService<R>, auth: JwtAuth) -> Router {
    let shared_service = Arc::new(service);

    let public = Router::new()
        .route("/register", post(register))
        .route("/login", post(login));

    let protected = Router::new()
        .route("/getProfile", get(get_profile))
        .route("/all-admins", get(list_admins).post(add_admin))
        .route("/blockAdmin/{id}", put(block_admin))
        .route(
            "/{id}",
            get(get_admin).put(edit_admin).delete(delete_admin),
        )
        .route_layer(from_fn_with_state(auth, require_auth));

    public.merge(protected).with_state(shared_service)
}

/// Register a new admin
#[utoipa::path(
    post,
    path = "/register",
    tag = "Admins",
    request_body = Registration,
    responses(
        (status = 201, description = "Admin registered, token returned", body = TokenResponse),
        (status = 400, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register<R: AdminRepository>(
    State(service): State<SharedService<R>>,
    ValidatedJson(input): ValidatedJson<Registration>,
) -> AdminResult<impl IntoResponse> {
    let token = service.register(input).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::data(TokenResponse { token }).with_message(ACCOUNT_CREATED),
    ))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/login",
    tag = "Admins",
    request_body = Credentials,
    responses(
        (status = 200, description = "Logged in, token returned", body = TokenResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: AdminRepository>(
    State(service): State<SharedService<R>>,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> AdminResult<impl IntoResponse> {
    let token = service.login(credentials).await?;
    Ok(ApiResponse::data(TokenResponse { token }).with_message(LOGGED_IN))
}

/// The admin owning the presented token
#[utoipa::path(
    get,
    path = "/getProfile",
    tag = "Admins",
    responses(
        (status = 200, description = "Current admin", body = AdminResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_profile<R: AdminRepository>(
    State(service): State<SharedService<R>>,
    caller: Authorized<Staff>,
) -> AdminResult<impl IntoResponse> {
    let admin = service.profile(&caller.token).await?;
    Ok(ApiResponse::data(admin))
}

/// List admins (super admins excluded)
#[utoipa::path(
    get,
    path = "/all-admins",
    tag = "Admins",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of admins", body = Page<AdminResponse>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_admins<R: AdminRepository>(
    State(service): State<SharedService<R>>,
    _caller: Authorized<SuperAdminOnly>,
    Query(query): Query<PageQuery>,
) -> AdminResult<impl IntoResponse> {
    let page = service.list(query).await?;
    Ok(ApiResponse::data(page))
}

/// Add an admin
#[utoipa::path(
    post,
    path = "/all-admins",
    tag = "Admins",
    request_body = Registration,
    responses(
        (status = 201, description = "Admin created", body = AdminResponse),
        (status = 400, response = ConflictResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_admin<R: AdminRepository>(
    State(service): State<SharedService<R>>,
    _caller: Authorized<SuperAdminOnly>,
    ValidatedJson(input): ValidatedJson<Registration>,
) -> AdminResult<impl IntoResponse> {
    let admin = service.add_admin(input).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::data(admin).with_message(ACCOUNT_CREATED),
    ))
}

/// Toggle an admin's active flag
#[utoipa::path(
    put,
    path = "/blockAdmin/{id}",
    tag = "Admins",
    params(("id" = String, Path, description = "Admin ObjectId")),
    responses(
        (status = 200, description = "Status toggled", body = BlockStatus),
        (status = 400, response = BadRequestIdResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn block_admin<R: AdminRepository>(
    State(service): State<SharedService<R>>,
    _caller: Authorized<SuperAdminOnly>,
    ObjectIdPath(id): ObjectIdPath,
) -> AdminResult<impl IntoResponse> {
    let status = service.toggle_block(id).await?;
    Ok(ApiResponse::data(status).with_message(STATUS_UPDATED))
}

/// Get an admin by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Admins",
    params(("id" = String, Path, description = "Admin ObjectId")),
    responses(
        (status = 200, description = "Admin found", body = AdminResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_admin<R: AdminRepository>(
    State(service): State<SharedService<R>>,
    _caller: Authorized<Staff>,
    ObjectIdPath(id): ObjectIdPath,
) -> AdminResult<impl IntoResponse> {
    let admin = service.get(id).await?;
    Ok(ApiResponse::data(admin))
}

/// Edit an admin profile
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Admins",
    params(("id" = String, Path, description = "Admin ObjectId")),
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Profile updated", body = AdminResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn edit_admin<R: AdminRepository>(
    State(service): State<SharedService<R>>,
    caller: Authorized<Staff>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(update): ValidatedJson<ProfileUpdate>,
) -> AppResult<impl IntoResponse> {
    let admin = service.edit(id, caller.actor()?, update).await?;
    Ok(ApiResponse::data(admin).with_message(PROFILE_UPDATED))
}

/// Delete an admin
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Admins",
    params(("id" = String, Path, description = "Admin ObjectId")),
    responses(
        (status = 200, description = "Admin deleted"),
        (status = 400, response = BadRequestIdResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_admin<R: AdminRepository>(
    State(service): State<SharedService<R>>,
    _caller: Authorized<SuperAdminOnly>,
    ObjectIdPath(id): ObjectIdPath,
) -> AdminResult<impl IntoResponse> {
    service.delete(id).await?;
    Ok(ApiResponse::message(ADMIN_DELETED))
}
