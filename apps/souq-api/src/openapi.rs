//! OpenAPI documentation configuration

use utoipa::OpenApi;

/// Domains whose paths are relative to a single mount point
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Souq API",
        version = "0.1.0",
        description = "Marketplace backend for admins, sellers and shoppers. Every response \
                       carries a bilingual `{ar, en}` message.",
        license(name = "MIT")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server")
    ),
    nest(
        (path = "/api/admins", api = domain_admins::ApiDoc),
        (path = "/api/admins", api = domain_statistics::ApiDoc),
        (path = "/api/users", api = domain_users::ApiDoc),
        (path = "/api/sellers", api = domain_sellers::ApiDoc),
        (path = "/api", api = core_uploads::handlers::ApiDoc)
    )
)]
struct MountedDocs;

/// Combined OpenAPI documentation for all APIs.
///
/// The catalog spans several mount points and documents absolute paths, so
/// it is merged rather than nested.
pub struct ApiDoc;

impl OpenApi for ApiDoc {
    fn openapi() -> utoipa::openapi::OpenApi {
        MountedDocs::openapi().merge_from(domain_catalog::ApiDoc::openapi())
    }
}
