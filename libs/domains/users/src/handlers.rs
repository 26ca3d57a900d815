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
    Staff, StaffOrUser, ValidatedJson,
    errors::responses::{
        BadRequestIdResponse, BadRequestValidationResponse, ConflictResponse, ForbiddenResponse,
        InternalServerErrorResponse, NotFoundResponse, UnauthorizedResponse,
    },
    require_auth,
};
use core_accounts::{Credentials, Page, PageQuery, ProfileUpdate, Registration, TokenResponse};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::UserResult;
use crate::models::{
    BlockRequest, ResendRequest, UserResponse, UserStatus, VerificationOutcome, VerifyRequest,
};
use crate::repository::UserRepository;
use crate::service::UserService;

const ACCOUNT_CREATED: Message = Message::new(
    "تم إنشاء الحساب بنجاح، تم ارسال رمز التحقق الى بريدك الالكتروني",
    "Account created successfully, a verification code was sent to your email",
);
const LOGGED_IN: Message = Message::new("تم تسجيل الدخول بنجاح", "logged in successfully");
const VERIFIED: Message = Message::new("تم تفعيل الحساب بنجاح", "Account verified successfully");
const ALREADY_VERIFIED: Message =
    Message::new("الحساب مفعل بالفعل", "Account is already verified");
const CODE_RESENT: Message = Message::new(
    "تم ارسال رمز التحقق مرة اخرى بنجاح",
    "Verification code sent again successfully",
);
const ACCOUNT_UPDATED: Message =
    Message::new("تم تحديث الحساب بنجاح", "Account updated successfully");
const USER_DELETED: Message = Message::new("تم حذف المستخدم بنجاح", "User deleted successfully");
const STATUS_UPDATED: Message =
    Message::new("تم تحديث حالة الحساب بنجاح", "Account status updated successfully");

#[derive(OpenApi)]
#[openapi(
    paths(
        list_users,
        register,
        login,
        verify,
        resend_verification,
        get_user_profile,
        block_user,
        get_user,
        edit_user,
        delete_user,
    ),
    components(
        schemas(
            UserResponse,
            UserStatus,
            Registration,
            Credentials,
            ProfileUpdate,
            TokenResponse,
            VerifyRequest,
            ResendRequest,
            BlockRequest
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
        (name = "Users", description = "Shopper accounts with email verification")
    )
)]
pub struct ApiDoc;

type SharedService<R> = Arc<UserService<R>>;

pub fn router<R: UserRepository + 'static>(service: UserService<R>, auth: JwtAuth) -> Router {
    let shared_service = Arc::new(service);

    let public = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/verify", post(verify))
        .route("/resendVerification", post(resend_verification));

    let protected = Router::new()
        .route("/", get(list_users))
        .route("/getUserProfile", get(get_user_profile))
        .route("/blockUser/{id}", put(block_user))
        .route("/{id}", get(get_user).put(edit_user).delete(delete_user))
        .route_layer(from_fn_with_state(auth, require_auth));

    public.merge(protected).with_state(shared_service)
}

/// List users
#[utoipa::path(
    get,
    path = "",
    tag = "Users",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of users", body = Page<UserResponse>),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse)
    )
)]
async fn list_users<R: UserRepository>(
    State(service): State<SharedService<R>>,
    _caller: Authorized<Staff>,
    Query(query): Query<PageQuery>,
) -> UserResult<impl IntoResponse> {
    let page = service.list(query).await?;
    Ok(ApiResponse::data(page))
}

/// Register and receive a verification code by email
#[utoipa::path(
    post,
    path = "/register",
    tag = "Users",
    request_body = Registration,
    responses(
        (status = 201, description = "Account created, not yet verified", body = UserResponse),
        (status = 400, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register<R: UserRepository>(
    State(service): State<SharedService<R>>,
    ValidatedJson(input): ValidatedJson<Registration>,
) -> UserResult<impl IntoResponse> {
    let user = service.register(input).await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::data(user).with_message(ACCOUNT_CREATED),
    ))
}

#[utoipa::path(
    post,
    path = "/login",
    tag = "Users",
    request_body = Credentials,
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse)
    )
)]
async fn login<R: UserRepository>(
    State(service): State<SharedService<R>>,
    ValidatedJson(credentials): ValidatedJson<Credentials>,
) -> UserResult<impl IntoResponse> {
    let token = service.login(credentials).await?;
    Ok(ApiResponse::data(TokenResponse { token }).with_message(LOGGED_IN))
}

/// Confirm the emailed code
#[utoipa::path(
    post,
    path = "/verify",
    tag = "Users",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Verified, or already verified"),
        (status = 400, description = "Missing fields or invalid/expired code"),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn verify<R: UserRepository>(
    State(service): State<SharedService<R>>,
    ValidatedJson(request): ValidatedJson<VerifyRequest>,
) -> UserResult<impl IntoResponse> {
    let message = match service.verify(request).await? {
        VerificationOutcome::AlreadyVerified => ALREADY_VERIFIED,
        _ => VERIFIED,
    };
    Ok(ApiResponse::message(message))
}

/// Send a fresh verification code
#[utoipa::path(
    post,
    path = "/resendVerification",
    tag = "Users",
    request_body = ResendRequest,
    responses(
        (status = 200, description = "Code re-sent, or already verified"),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn resend_verification<R: UserRepository>(
    State(service): State<SharedService<R>>,
    ValidatedJson(request): ValidatedJson<ResendRequest>,
) -> UserResult<impl IntoResponse> {
    let message = match service.resend_verification(&request.email).await? {
        VerificationOutcome::AlreadyVerified => ALREADY_VERIFIED,
        _ => CODE_RESENT,
    };
    Ok(ApiResponse::message(message))
}

/// The user owning the presented token
#[utoipa::path(
    get,
    path = "/getUserProfile",
    tag = "Users",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_user_profile<R: UserRepository>(
    State(service): State<SharedService<R>>,
    identity: CurrentIdentity,
) -> UserResult<impl IntoResponse> {
    let user = service.profile(&identity.token).await?;
    Ok(ApiResponse::data(user))
}

/// Block (with an optional reason) or unblock a user
#[utoipa::path(
    put,
    path = "/blockUser/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId")),
    request_body = BlockRequest,
    responses(
        (status = 200, description = "Status toggled", body = UserResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn block_user<R: UserRepository>(
    State(service): State<SharedService<R>>,
    _caller: Authorized<Staff>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(request): ValidatedJson<BlockRequest>,
) -> UserResult<impl IntoResponse> {
    let user = service.toggle_block(id, request.reason).await?;
    Ok(ApiResponse::data(user).with_message(STATUS_UPDATED))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId")),
    responses(
        (status = 200, description = "User found", body = UserResponse),
        (status = 400, response = BadRequestIdResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn get_user<R: UserRepository>(
    State(service): State<SharedService<R>>,
    _caller: Authorized<AnyRole>,
    ObjectIdPath(id): ObjectIdPath,
) -> UserResult<impl IntoResponse> {
    let user = service.get(id).await?;
    Ok(ApiResponse::data(user))
}

/// Edit a user profile (the user themself, or staff)
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId")),
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Account updated", body = UserResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn edit_user<R: UserRepository>(
    State(service): State<SharedService<R>>,
    caller: Authorized<StaffOrUser>,
    ObjectIdPath(id): ObjectIdPath,
    ValidatedJson(update): ValidatedJson<ProfileUpdate>,
) -> AppResult<impl IntoResponse> {
    let user = service.edit(id, caller.actor()?, update).await?;
    Ok(ApiResponse::data(user).with_message(ACCOUNT_UPDATED))
}

/// Delete a user; responds with the refreshed first page
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId")),
    responses(
        (status = 200, description = "User deleted", body = Page<UserResponse>),
        (status = 403, response = ForbiddenResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn delete_user<R: UserRepository>(
    State(service): State<SharedService<R>>,
    _caller: Authorized<Staff>,
    ObjectIdPath(id): ObjectIdPath,
) -> UserResult<impl IntoResponse> {
    let page = service.delete(id).await?;
    Ok(ApiResponse::data(page).with_message(USER_DELETED))
}
