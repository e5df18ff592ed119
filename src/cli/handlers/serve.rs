//! Serve command handler

use crate::config::Settings;
use crate::error::AppResult;
use crate::server::Server;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Runs the server, or only validates the configuration when `dry_run` is set.
    pub async fn execute(self, dry_run: bool) -> anyhow::Result<()> {
        if dry_run {
            self.validate_only()?;
            return Ok(());
        }
        Server::new(self.config).run().await
    }

    pub fn validate_only(&self) -> AppResult<()> {
        self.config.validate()?;
        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!("✓ Order verification via: {}", self.config.factory.url);
        println!(
            "✓ Database auto-migrate: {}",
            if self.config.database.auto_migrate { "on" } else { "off" }
        );
        Ok(())
    }
}
