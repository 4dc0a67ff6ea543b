//! Postgres test container.

use std::time::Duration;

use sqlx::postgres::{PgConnection, PgPoolOptions};
use sqlx::{Connection, PgPool};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use testkit_db::Database;
use tracing::{info, warn};

use crate::{Error, Result, TestkitConfig};

const SERVICE: &str = "postgres";

/// Port Postgres listens on inside the container.
pub const POSTGRES_PORT: u16 = 5432;

/// Database created in managed containers.
pub const DATABASE_NAME: &str = "testdb";

/// Template database holding the snapshot of [`DATABASE_NAME`].
pub const SNAPSHOT_NAME: &str = "testdb_snapshot";

const USER: &str = "postgres";
const PASSWORD: &str = "postgres";

/// A Postgres instance with a connected pool.
///
/// Either a container started by this process or, when `POSTGRES_HOST` is
/// set, an existing server.
pub struct PostgresContainer {
    container: Option<ContainerAsync<Postgres>>,
    address: String,
    database: String,
    dsn: String,
    db: Database,
}

impl PostgresContainer {
    /// Start Postgres (or attach to the configured server) and connect.
    pub async fn start(config: &TestkitConfig) -> Result<Self> {
        let (container, address, database) = match &config.postgres_host {
            Some(host) => {
                info!(address = %host, "Using existing postgres");
                (None, host.clone(), "postgres".to_string())
            }
            None => {
                let container = start_container(config).await?;
                let address = container_address(&container).await?;
                (Some(container), address, DATABASE_NAME.to_string())
            }
        };

        let dsn = connection_string(&address, &database);
        info!(address = %address, dsn = %dsn, "Postgres ready");

        let pool = connect(&dsn).await?;

        Ok(Self {
            container,
            address,
            database,
            dsn,
            db: Database::new(pool),
        })
    }

    /// `host:port` of the server.
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn dsn(&self) -> &str {
        &self.dsn
    }

    pub fn database_name(&self) -> &str {
        &self.database
    }

    pub fn pool(&self) -> &PgPool {
        self.db.pool()
    }

    /// Schema and SQL file helpers bound to this server.
    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Whether this process started the container.
    pub fn is_managed(&self) -> bool {
        self.container.is_some()
    }

    /// Copy the test database into the snapshot template, replacing any
    /// previous snapshot.
    ///
    /// Open connections to the test database are terminated; the pool
    /// reconnects on next use.
    pub async fn create_snapshot(&self) -> Result<()> {
        self.ensure_managed()?;
        info!(
            database = %self.database,
            snapshot = SNAPSHOT_NAME,
            "Creating postgres snapshot"
        );

        let snapshot_err = |source| Error::Snapshot {
            action: "create",
            source,
        };
        let mut admin = self.admin_connection().await?;

        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
                .bind(SNAPSHOT_NAME)
                .fetch_one(&mut admin)
                .await
                .map_err(snapshot_err)?;
        if exists {
            // Template databases cannot be dropped
            execute(&mut admin, &set_template(SNAPSHOT_NAME, false))
                .await
                .map_err(snapshot_err)?;
            execute(&mut admin, &format!(r#"DROP DATABASE "{}""#, SNAPSHOT_NAME))
                .await
                .map_err(snapshot_err)?;
        }

        terminate_connections(&mut admin, &self.database)
            .await
            .map_err(snapshot_err)?;
        execute(
            &mut admin,
            &format!(
                r#"CREATE DATABASE "{}" WITH TEMPLATE "{}" OWNER "{}""#,
                SNAPSHOT_NAME, self.database, USER
            ),
        )
        .await
        .map_err(snapshot_err)?;
        execute(&mut admin, &set_template(SNAPSHOT_NAME, true))
            .await
            .map_err(snapshot_err)?;

        close_admin(admin).await;
        Ok(())
    }

    /// Recreate the test database from the snapshot template.
    ///
    /// Open connections to the test database are terminated; the pool
    /// reconnects on next use.
    pub async fn restore_snapshot(&self) -> Result<()> {
        self.ensure_managed()?;
        info!(
            database = %self.database,
            snapshot = SNAPSHOT_NAME,
            "Restoring postgres snapshot"
        );

        let snapshot_err = |source| Error::Snapshot {
            action: "restore",
            source,
        };
        let mut admin = self.admin_connection().await?;

        terminate_connections(&mut admin, &self.database)
            .await
            .map_err(snapshot_err)?;
        execute(&mut admin, &format!(r#"DROP DATABASE "{}""#, self.database))
            .await
            .map_err(snapshot_err)?;
        execute(
            &mut admin,
            &format!(
                r#"CREATE DATABASE "{}" WITH TEMPLATE "{}" OWNER "{}""#,
                self.database, SNAPSHOT_NAME, USER
            ),
        )
        .await
        .map_err(snapshot_err)?;

        close_admin(admin).await;
        Ok(())
    }

    /// Close the pool, then stop and remove the container if this process
    /// started it.
    pub async fn stop(self) -> Result<()> {
        self.db.pool().close().await;

        if let Some(container) = self.container {
            info!(id = %container.id(), "Stopping postgres container");
            container.stop().await.map_err(|source| Error::Stop {
                service: SERVICE,
                source,
            })?;
            container.rm().await.map_err(|source| Error::Stop {
                service: SERVICE,
                source,
            })?;
        }

        Ok(())
    }

    fn ensure_managed(&self) -> Result<()> {
        if self.container.is_none() {
            return Err(Error::NotManaged(SERVICE));
        }
        Ok(())
    }

    /// Connection to the maintenance database, used for statements that
    /// cannot run while connected to the test database.
    async fn admin_connection(&self) -> Result<PgConnection> {
        PgConnection::connect(&connection_string(&self.address, "postgres"))
            .await
            .map_err(Error::Connect)
    }
}

impl std::fmt::Debug for PostgresContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresContainer")
            .field("address", &self.address)
            .field("database", &self.database)
            .field("managed", &self.is_managed())
            .finish_non_exhaustive()
    }
}

/// `postgres://postgres:postgres@{address}/{database}`
pub fn connection_string(address: &str, database: &str) -> String {
    format!("postgres://{}:{}@{}/{}", USER, PASSWORD, address, database)
}

async fn start_container(config: &TestkitConfig) -> Result<ContainerAsync<Postgres>> {
    info!(image = %config.postgres_image, "Starting postgres container");

    Postgres::default()
        .with_db_name(DATABASE_NAME)
        .with_host_auth()
        .with_name(config.postgres_image.name.clone())
        .with_tag(config.postgres_image.tag.clone())
        .with_labels(config.container_labels())
        .start()
        .await
        .map_err(|source| Error::Start {
            service: SERVICE,
            source,
        })
}

async fn container_address(container: &ContainerAsync<Postgres>) -> Result<String> {
    let address_err = |source| Error::Address {
        service: SERVICE,
        source,
    };
    let host = container.get_host().await.map_err(address_err)?;
    let port = container
        .get_host_port_ipv4(POSTGRES_PORT)
        .await
        .map_err(address_err)?;

    Ok(format!("{}:{}", host, port))
}

async fn connect(dsn: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect(dsn)
        .await
        .map_err(Error::Connect)?;

    let mut conn = pool.acquire().await.map_err(Error::Connect)?;
    conn.ping().await.map_err(Error::Connect)?;

    Ok(pool)
}

fn set_template(database: &str, is_template: bool) -> String {
    format!(
        r#"ALTER DATABASE "{}" WITH is_template = {}"#,
        database,
        if is_template { "TRUE" } else { "FALSE" }
    )
}

async fn execute(conn: &mut PgConnection, sql: &str) -> std::result::Result<(), sqlx::Error> {
    sqlx::query(sql).execute(conn).await?;
    Ok(())
}

async fn terminate_connections(
    conn: &mut PgConnection,
    database: &str,
) -> std::result::Result<(), sqlx::Error> {
    sqlx::query(
        "SELECT pg_terminate_backend(pid) FROM pg_stat_activity \
         WHERE datname = $1 AND pid <> pg_backend_pid()",
    )
    .bind(database)
    .execute(conn)
    .await?;
    Ok(())
}

async fn close_admin(admin: PgConnection) {
    if let Err(err) = admin.close().await {
        warn!(error = %err, "Failed to close postgres admin connection");
    }
}

#[cfg(test)]
#[path = "postgres_tests.rs"]
mod tests;
