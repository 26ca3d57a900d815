use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_optional, server::ServerConfig};
use core_uploads::UploadConfig;
use axum_helpers::JwtConfig;
use database::mongodb::MongoConfig;
use domain_admins::SuperAdminSeed;
use domain_notifications::SmtpConfig;

pub use core_config::Environment;

const SEED_VARS: [&str; 3] = [
    "SUPER_ADMIN_EMAIL",
    "SUPER_ADMIN_PASSWORD",
    "SUPER_ADMIN_PHONE",
];

/// Application configuration composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub environment: Environment,
    pub jwt: JwtConfig,
    pub uploads: UploadConfig,
    /// `None` when `SMTP_HOST` is unset; mail is then only recorded in memory
    pub smtp: Option<SmtpConfig>,
    pub super_admin: Option<SuperAdminSeed>,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let smtp = match env_optional("SMTP_HOST") {
            Some(_) => Some(SmtpConfig::from_env()?),
            None => None,
        };

        Ok(Self {
            app: app_info!(),
            mongodb: MongoConfig::from_env()?,
            server: ServerConfig::from_env()?,
            environment: Environment::from_env(),
            jwt: JwtConfig::from_env()?,
            uploads: UploadConfig::from_env()?,
            smtp,
            super_admin: super_admin_seed()?,
        })
    }
}

/// All three `SUPER_ADMIN_*` variables, or none of them.
fn super_admin_seed() -> Result<Option<SuperAdminSeed>, ConfigError> {
    let [email, password, phone] = SEED_VARS.map(env_optional);
    match (email, password, phone) {
        (Some(email), Some(password), Some(mobile_phone)) => Ok(Some(SuperAdminSeed {
            email,
            password,
            mobile_phone,
        })),
        (None, None, None) => Ok(None),
        _ => {
            let missing = SEED_VARS
                .into_iter()
                .find(|key| env_optional(key).is_none())
                .unwrap_or(SEED_VARS[0]);
            Err(ConfigError::MissingEnvVar(missing.to_string()))
        }
    }
}
