//! CLI command implementations.

pub mod admin;
pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;
pub mod wishlist;

pub use admin::AdminAction;
pub use cart::CartAction;
pub use orders::OrderAction;
pub use products::ProductsAction;
pub use wishlist::WishlistAction;

use thiserror::Error;

use cartwheel_client::{
    AdminError, AuthError, CatalogClient, ClientConfig, ConfigError, IdentitySession, LedgerError,
    SessionCache, StoreError, UserDirectoryClient,
};
use cartwheel_core::EmailError;

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid email: {0}")]
    Email(#[from] EmailError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Admin(#[from] AdminError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0}")]
    Usage(String),
}

/// Shared wiring for every command: config, store clients, and the
/// identity session resumed from the session file.
pub struct Context {
    pub config: ClientConfig,
    pub directory: UserDirectoryClient,
    pub catalog: CatalogClient,
    pub session: IdentitySession,
}

impl Context {
    /// Load configuration from the environment and wire up the clients.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Config`] when the environment is incomplete.
    pub fn load() -> Result<Self, CliError> {
        let config = ClientConfig::from_env()?;
        let directory = UserDirectoryClient::new(&config);
        let catalog = CatalogClient::new(&config);
        let cache = SessionCache::new(config.session_file.clone());
        let session = IdentitySession::new(directory.clone(), cache, config.poll_interval);

        Ok(Self {
            config,
            directory,
            catalog,
            session,
        })
    }

    /// The signed-in user, or a usage error telling the caller to log in.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Usage`] when signed out.
    pub fn require_user(&self) -> Result<cartwheel_core::UserRecord, CliError> {
        self.session
            .current_user()
            .ok_or_else(|| CliError::Usage("not signed in; run `cw-cli login` first".to_owned()))
    }
}
