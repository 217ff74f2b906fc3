//! `sockshop migrate`: apply, roll back, inspect or rebuild the schema.

use sea_orm_migration::{MigrationStatus, MigratorTrait};

use crate::cli::args::{MigrateAction, MigrateArgs};
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Database, Migrator};

pub async fn execute(args: MigrateArgs, config: Config) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config)
        .await
        .map_err(|e| AppError::Database(e).context("connect database"))?
        .get_connection();

    match args.action {
        MigrateAction::Up => {
            Migrator::up(&db, None).await?;
            tracing::info!("Pending migrations applied");
        }
        MigrateAction::Down => {
            Migrator::down(&db, Some(1)).await?;
            tracing::info!("Last migration rolled back");
        }
        MigrateAction::Status => {
            for migration in Migrator::get_migration_with_status(&db).await? {
                let state = match migration.status() {
                    MigrationStatus::Applied => "applied",
                    MigrationStatus::Pending => "pending",
                };
                println!("{}: {}", migration.name(), state);
            }
        }
        MigrateAction::Fresh => {
            tracing::warn!("Dropping every table and re-running all migrations");
            Migrator::fresh(&db).await?;
        }
    }

    Ok(())
}
