//! Categories command - Category catalog maintenance.

use crate::cli::args::{CategoriesAction, CategoriesArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::services::ServiceContainer;

/// Execute the categories command
pub async fn execute(args: CategoriesArgs, config: Config) -> AppResult<()> {
    let services = super::offline_services(config).await?;

    match args.action {
        CategoriesAction::Seed => {
            let added = services.categories().seed_defaults().await?;
            tracing::info!(added, "Default categories seeded");
            println!("Added {} categories", added);
        }
    }

    Ok(())
}
