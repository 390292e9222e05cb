//! Register command handler

use crate::config::Config;
use crate::services::{AuthService, Registration};

pub async fn cmd_register(
    config: &Config,
    email: &str,
    password: &str,
    first_name: &str,
    last_name: &str,
) -> anyhow::Result<()> {
    let service = super::auth_service(config).await?;

    let identity = service
        .register(Registration {
            email: email.to_string(),
            password: password.to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        })
        .await?;

    println!("Registered {} (id {})", identity.email, identity.id);
    println!("Token: {}", identity.access_token.as_str());

    Ok(())
}
