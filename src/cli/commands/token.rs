//! Token command handler

use crate::config::Config;
use crate::services::AuthService;

pub async fn cmd_token(config: &Config, email: &str, password: &str) -> anyhow::Result<()> {
    let service = super::auth_service(config).await?;
    let token = service.login(email, password).await?;
    println!("{}", token.as_str());
    Ok(())
}
