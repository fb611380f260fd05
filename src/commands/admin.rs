//! Admin command - Administrator account management.

use crate::cli::args::{AdminAction, AdminArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::services::ServiceContainer;

/// Execute the admin command
pub async fn execute(args: AdminArgs, config: Config) -> AppResult<()> {
    let services = super::offline_services(config).await?;

    match args.action {
        AdminAction::Create {
            email,
            password,
            name,
        } => {
            let user = services.auth().create_admin(email, password, name).await?;
            tracing::info!(user_id = %user.id, email = %user.email, "Administrator created");
            println!("Created admin {} ({})", user.email, user.id);
        }
    }

    Ok(())
}
