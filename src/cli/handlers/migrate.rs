//! Migrate command handler

use crate::config::Settings;
use crate::db::{pending_migrations_blocking, prepare_database};
use crate::error::AppResult;

pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Prepares the database, or lists pending migrations when `dry_run` is set.
    ///
    /// # Errors
    /// - Invalid database configuration
    /// - Connection or migration failures
    pub async fn execute(&self, dry_run: bool) -> AppResult<()> {
        self.config.database.validate()?;

        if dry_run {
            let database = self.config.database.clone();
            let pending = tokio::task::spawn_blocking(move || pending_migrations_blocking(&database)).await??;
            if pending.is_empty() {
                println!("✓ No pending migrations - database is up to date");
            } else {
                println!("Found {} pending migration(s):", pending.len());
                for name in &pending {
                    println!("  - {name}");
                }
            }
            return Ok(());
        }

        let report = prepare_database(&self.config.database).await?;
        if report.created {
            println!("✓ Created database '{}'", report.database);
        }
        if report.applied_migrations.is_empty() {
            println!("✓ No migrations to apply - database is already up to date");
        } else {
            println!("✓ Applied {} migration(s):", report.applied_migrations.len());
            for version in &report.applied_migrations {
                println!("  - {version}");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[tokio::test]
    async fn test_invalid_database_config_fails_before_connecting() {
        let handler = MigrateCommandHandler::new(Settings::default());
        let result = handler.execute(true).await;
        assert!(matches!(result, Err(AppError::Configuration { .. })));
    }
}
