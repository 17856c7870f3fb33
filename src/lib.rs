use std::{env, fs, net::SocketAddr, path::PathBuf, sync::Arc};

use ::anyhow::{bail, Context, Result};
use axum::{
    extract::FromRef,
    routing::{patch, post},
    Router,
};
use env_renderer::EnvRenderer;
use tracing::info;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

mod accounts;
mod anyhow;
mod config;
mod env_renderer;
mod handlers;
pub mod respond;
mod store;
#[cfg(test)]
mod test_helper;
mod user;
mod validation;

pub use accounts::{login, sign_up, update_profile, ContractError, LOGIN_FAILED};
pub use self::anyhow::AppError;
pub use store::{Authenticator, DatabaseUserStore, MemoryUserStore, StoreError, UserStore};
pub use user::UserRecord;
pub use validation::FieldErrors;

/// The account service: configuration plus the store every contract runs against.
pub struct ChatAccounts {
    pub config: Config,
    server: config::ServerConfig,
    store: Arc<dyn UserStore>,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Reads `WSCHAT_ENVIRONMENT`, defaulting to development.
    pub fn from_env() -> Result<Self> {
        match env::var("WSCHAT_ENVIRONMENT").ok().as_deref() {
            None | Some("development") => Ok(Self::Development),
            Some("production") => Ok(Self::Production),
            Some(other) => bail!("Unknown environment `{other}`"),
        }
    }

    /// May users be kept in memory only?
    pub fn allows_memory_store(&self) -> bool {
        match self {
            Environment::Development => true,
            Environment::Production => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub config_file: PathBuf,
    pub environment: Environment,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_file: "wschat-accounts.toml".into(),
            environment: Environment::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let mut config = Self {
            environment: Environment::from_env()?,
            ..Self::default()
        };
        if let Ok(file) = env::var("WSCHAT_CONFIG_FILE") {
            config.config_file = file.into();
        }
        Ok(config)
    }
}

impl ChatAccounts {
    pub async fn new(config: Config) -> Result<Self> {
        let env_renderer = EnvRenderer::from_env();

        let accounts_conf: config::Config = {
            let file = &config.config_file;
            let toml = fs::read_to_string(file)
                .with_context(|| format!("Failed to read configuration file from {:?}", file))?;
            let with_env = env_renderer.render(&toml)?;
            toml::from_str(&with_env)
                .with_context(|| format!("Failed to parse configuration file {:?}", file))?
        };

        let store = store::connect(config.environment, accounts_conf.database.as_ref()).await?;

        info!(
            environment = ?config.environment,
            address = %accounts_conf.server.address,
            "Account service configured"
        );

        Ok(Self {
            config,
            server: accounts_conf.server,
            store,
        })
    }

    /// Builds the service around an already constructed store.
    pub fn with_store(config: Config, store: Arc<dyn UserStore>) -> Self {
        Self {
            config,
            server: config::ServerConfig::default(),
            store,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.server.address
    }

    pub fn store(&self) -> &dyn UserStore {
        self.store.as_ref()
    }

    pub fn install_routes<State>(router: Router<State>) -> Router<State>
    where
        Arc<ChatAccounts>: FromRef<State>,
        State: Clone + Send + Sync + 'static,
    {
        router
            .route("/signup", post(handlers::sign_up))
            .route("/login", post(handlers::login))
            .route("/profile", patch(handlers::update_profile))
            .merge(Scalar::with_url("/api", handlers::Doc::openapi()))
    }
}
