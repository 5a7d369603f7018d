//! Migrate command - world schema management.

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;

/// Execute the migrate command.
pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    // Schema changes are explicit here; skip the automatic migration run
    // the server does on connect.
    let db = Database::connect_unmigrated(&config).await?;

    match args.action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            println!("World schema is up to date.");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            println!("Rolled back the last migration.");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            let pending = status.iter().filter(|(_, applied)| !applied).count();
            for (name, applied) in &status {
                println!(
                    "{:<60} {}",
                    name,
                    if *applied { "applied" } else { "pending" }
                );
            }
            println!("{} migration(s), {} pending", status.len(), pending);
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping and rebuilding the world schema");
            db.fresh_migrations().await?;
            println!("World schema rebuilt from scratch.");
        }
    }

    Ok(())
}
