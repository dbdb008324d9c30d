//! Ephemeral PostgreSQL for integration tests.
//!
//! `LocalDbManager` runs a throwaway PostgreSQL instance by spawning
//! `initdb`, `pg_ctl`, and `pg_isready` child processes against a temporary
//! data directory. Binaries are discovered via `pg_config` on PATH; the data
//! directory is removed when the manager is dropped.

use std::net::TcpListener;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tokio::time::sleep;

/// Database name created for the test instance.
const DEFAULT_DATABASE: &str = "nikoo";

/// Maximum time to wait for PostgreSQL to become ready.
const PG_READY_TIMEOUT: Duration = Duration::from_secs(30);

/// Poll interval when waiting for PostgreSQL readiness.
const PG_READY_POLL: Duration = Duration::from_millis(200);

/// Errors that can occur during database lifecycle operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("PostgreSQL command failed: {0}")]
    Command(String),

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("pg_config not found on PATH")]
    PgConfigNotFound,

    #[error("PostgreSQL not ready after {0:?}")]
    ReadyTimeout(Duration),
}

/// Result type for database lifecycle operations.
pub type Result<T> = std::result::Result<T, DbError>;

/// An ephemeral local PostgreSQL instance.
pub struct LocalDbManager {
    bin_dir: PathBuf,
    data_dir: PathBuf,
    port: u16,
    started: bool,
    /// Holds the tempdir so it lives as long as the manager (dropped = cleaned up).
    _tempdir: tempfile::TempDir,
}

impl LocalDbManager {
    /// Creates a manager with temporary storage, discovering PG binaries
    /// via `pg_config --bindir`.
    pub async fn ephemeral() -> Result<Self> {
        let output = Command::new("pg_config")
            .arg("--bindir")
            .output()
            .await
            .map_err(|_| DbError::PgConfigNotFound)?;
        if !output.status.success() {
            return Err(DbError::PgConfigNotFound);
        }
        let bin_dir = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());

        let tempdir = tempfile::tempdir()?;
        let data_dir = tempdir.path().join("pgdata");

        Ok(Self {
            bin_dir,
            data_dir,
            port: 0,
            started: false,
            _tempdir: tempdir,
        })
    }

    /// Initializes the PostgreSQL data directory. Skips if already initialized.
    pub async fn setup(&mut self) -> Result<()> {
        if self.data_dir.join("PG_VERSION").exists() {
            tracing::info!("data directory already initialized, skipping initdb");
            return Ok(());
        }

        tracing::info!("initializing PostgreSQL data directory");
        let output = Command::new(self.bin_dir.join("initdb"))
            .arg("-D")
            .arg(&self.data_dir)
            .arg("--no-locale")
            .arg("--encoding=UTF8")
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DbError::Command(format!("initdb failed: {stderr}")));
        }

        Ok(())
    }

    /// Starts the server on a free port and creates the application database.
    pub async fn start(&mut self) -> Result<()> {
        if self.port == 0 {
            self.port = find_free_port()?;
        }

        tracing::info!(port = self.port, "starting PostgreSQL");

        // Socket dir pointed at PGDATA so no system-wide paths are touched.
        let port_opt = format!("-p {} -k {} -h localhost", self.port, self.data_dir.display());
        let output = Command::new(self.bin_dir.join("pg_ctl"))
            .arg("-D")
            .arg(&self.data_dir)
            .arg("-o")
            .arg(&port_opt)
            .arg("-l")
            .arg(self.data_dir.join("postgresql.log"))
            .arg("start")
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DbError::Command(format!("pg_ctl start failed: {stderr}")));
        }

        self.wait_for_ready().await?;
        self.started = true;

        self.create_database().await?;

        tracing::info!(url = %self.connection_url(), "database ready");
        Ok(())
    }

    /// Stops the server gracefully. No-op if not started.
    pub async fn stop(&mut self) -> Result<()> {
        if !self.started {
            return Ok(());
        }

        let output = Command::new(self.bin_dir.join("pg_ctl"))
            .arg("-D")
            .arg(&self.data_dir)
            .arg("-m")
            .arg("fast")
            .arg("stop")
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DbError::Command(format!("pg_ctl stop failed: {stderr}")));
        }

        self.started = false;
        tracing::info!("PostgreSQL stopped");
        Ok(())
    }

    /// Returns the connection URL for the application database.
    pub fn connection_url(&self) -> String {
        format!("postgresql://localhost:{}/{DEFAULT_DATABASE}", self.port)
    }

    /// Returns the port the server is listening on (0 if not yet assigned).
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns whether the server has been started.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Wait for PostgreSQL to become ready, polling `pg_isready`.
    async fn wait_for_ready(&self) -> Result<()> {
        let pg_isready = self.bin_dir.join("pg_isready");
        let deadline = tokio::time::Instant::now() + PG_READY_TIMEOUT;

        loop {
            let output = Command::new(&pg_isready)
                .arg("-p")
                .arg(self.port.to_string())
                .arg("-h")
                .arg("localhost")
                .output()
                .await?;

            if output.status.success() {
                return Ok(());
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(DbError::ReadyTimeout(PG_READY_TIMEOUT));
            }

            sleep(PG_READY_POLL).await;
        }
    }

    /// Create the application database in the fresh instance.
    async fn create_database(&self) -> Result<()> {
        // Connect to the default `postgres` database to create ours.
        let maintenance_url = format!("postgresql://localhost:{}/postgres", self.port);
        let pool = sqlx::PgPool::connect(&maintenance_url).await?;

        // CREATE DATABASE cannot use bind parameters
        sqlx::query(&format!("CREATE DATABASE \"{DEFAULT_DATABASE}\""))
            .execute(&pool)
            .await?;

        pool.close().await;
        Ok(())
    }
}

/// Find a free ephemeral port by binding to port 0.
fn find_free_port() -> Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let port = listener.local_addr()?.port();
    Ok(port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires PostgreSQL tools on PATH"]
    async fn lifecycle_setup_start_stop() -> Result<()> {
        let mut mgr = LocalDbManager::ephemeral().await?;

        mgr.setup().await?;
        assert!(!mgr.is_started());
        // A second setup on an initialized directory is a no-op.
        mgr.setup().await?;

        mgr.start().await?;
        assert!(mgr.is_started());
        assert_ne!(0, mgr.port());

        // Verify connection URL is well-formed
        let url = mgr.connection_url();
        assert!(url.starts_with("postgresql://"));
        assert!(url.contains("nikoo"));

        mgr.stop().await?;
        assert!(!mgr.is_started());

        Ok(())
    }
}
