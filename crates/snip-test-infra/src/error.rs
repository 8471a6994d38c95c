use testcontainers::TestcontainersError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TestInfraError>;

/// A fixture failed to come up or to report where it listens.
#[derive(Debug, Error)]
pub enum TestInfraError {
    #[error("{image} container did not start: {source}")]
    Start {
        image: &'static str,
        #[source]
        source: TestcontainersError,
    },
    #[error("{image} container has no reachable endpoint: {source}")]
    Endpoint {
        image: &'static str,
        #[source]
        source: TestcontainersError,
    },
    #[error("{image} container could not be stopped: {source}")]
    Stop {
        image: &'static str,
        #[source]
        source: TestcontainersError,
    },
}

impl TestInfraError {
    pub(crate) fn start(image: &'static str) -> impl FnOnce(TestcontainersError) -> Self {
        move |source| Self::Start { image, source }
    }

    pub(crate) fn endpoint(image: &'static str) -> impl FnOnce(TestcontainersError) -> Self {
        move |source| Self::Endpoint { image, source }
    }

    pub(crate) fn stop(image: &'static str) -> impl FnOnce(TestcontainersError) -> Self {
        move |source| Self::Stop { image, source }
    }
}
