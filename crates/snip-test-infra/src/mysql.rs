use crate::{Result, TestInfraError};
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::ImageExt;
use testcontainers::{ContainerAsync, GenericImage};

const IMAGE: &str = "mysql";
const PORT: u16 = 3306;

/// Database, user and password the container pre-creates for the app.
pub const APP_DATABASE: &str = "snip";
const APP_USER: &str = "snip";
const APP_PASSWORD: &str = "snip";
const ROOT_PASSWORD: &str = "root";

/// A throwaway MySQL 8.4 server.
///
/// Two kinds of DSN are handed out: [`app_url`](Self::app_url) for the
/// unprivileged user on the pre-created `snip` database, and
/// [`admin_url`](Self::admin_url) for root on any database name, so tests
/// can watch the store create a database that does not exist yet.
pub struct MySqlServer {
    container: ContainerAsync<GenericImage>,
}

impl MySqlServer {
    pub async fn start() -> Result<Self> {
        let container = GenericImage::new(IMAGE, "8.4")
            .with_exposed_port(PORT.tcp())
            .with_wait_for(WaitFor::message_on_stderr("ready for connections"))
            .with_env_var("MYSQL_DATABASE", APP_DATABASE)
            .with_env_var("MYSQL_USER", APP_USER)
            .with_env_var("MYSQL_PASSWORD", APP_PASSWORD)
            .with_env_var("MYSQL_ROOT_PASSWORD", ROOT_PASSWORD)
            .start()
            .await
            .map_err(TestInfraError::start(IMAGE))?;

        Ok(Self { container })
    }

    pub async fn app_url(&self) -> Result<String> {
        self.dsn(APP_USER, APP_PASSWORD, APP_DATABASE).await
    }

    pub async fn admin_url(&self, database: &str) -> Result<String> {
        self.dsn("root", ROOT_PASSWORD, database).await
    }

    async fn dsn(&self, user: &str, password: &str, database: &str) -> Result<String> {
        let host = self
            .container
            .get_host()
            .await
            .map_err(TestInfraError::endpoint(IMAGE))?;
        let port = self
            .container
            .get_host_port_ipv4(PORT)
            .await
            .map_err(TestInfraError::endpoint(IMAGE))?;

        Ok(format!("mysql://{user}:{password}@{host}:{port}/{database}"))
    }
}
