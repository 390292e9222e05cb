//! CLI command handlers

mod init;
mod register;
mod token;

pub use init::cmd_init;
pub use register::cmd_register;
pub use token::cmd_token;

use crate::config::Config;
use crate::db::Store;
use crate::services::SeaOrmAuthService;

async fn auth_service(config: &Config) -> anyhow::Result<SeaOrmAuthService> {
    let store = Store::new(&config.general.database_path).await?;
    Ok(SeaOrmAuthService::new(store, config.security.clone()))
}
