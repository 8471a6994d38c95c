use crate::{Result, TestInfraError};
use testcontainers::core::{IntoContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage};

const IMAGE: &str = "redis";
const PORT: u16 = 6379;

/// A throwaway single-node Redis server.
pub struct RedisServer {
    container: ContainerAsync<GenericImage>,
}

impl RedisServer {
    pub async fn start() -> Result<Self> {
        let container = GenericImage::new(IMAGE, "8.6.0")
            .with_exposed_port(PORT.tcp())
            .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"))
            .start()
            .await
            .map_err(TestInfraError::start(IMAGE))?;

        Ok(Self { container })
    }

    pub async fn url(&self) -> Result<String> {
        let host = self
            .container
            .get_host()
            .await
            .map_err(TestInfraError::endpoint(IMAGE))?
            .to_string();
        let port = self
            .container
            .get_host_port_ipv4(PORT)
            .await
            .map_err(TestInfraError::endpoint(IMAGE))?;

        // The redis client resolves `localhost` to ::1 first, where the port
        // is not published.
        let host = if host == "localhost" { "127.0.0.1".to_string() } else { host };
        Ok(format!("redis://{host}:{port}"))
    }

    /// Stops the server but keeps the fixture, so callers see an outage.
    pub async fn stop(&self) -> Result<()> {
        self.container
            .stop()
            .await
            .map_err(TestInfraError::stop(IMAGE))
    }
}
