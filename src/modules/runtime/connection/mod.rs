//! Vector database connection lifecycle
//!
//! This module provides the single connector to the remote vector database:
//! parameter validation, the readiness probe, and the handle exposed to
//! executors and advanced callers.

mod client;
mod transport;

pub use client::WeaviateClient;
pub use transport::QueryTransport;

use std::sync::Arc;
use tracing::{debug, warn};

use magicchat_core::{ConnectionParams, MagicChatError};

/// A live connection to the vector database.
///
/// `connect` returns a usable handle or fails with a connection error; it
/// never retries. The connection owns the underlying HTTP client, so the
/// network session is released on every exit path once the connection is
/// dropped or closed.
#[derive(Debug)]
pub struct WeaviateConnection {
    params: ConnectionParams,
    client: Arc<WeaviateClient>,
}

impl WeaviateConnection {
    /// Open a connection with the given parameters.
    ///
    /// Parameters are validated before any network call. Cloud targets must
    /// pass the readiness probe; local targets may skip it when
    /// `relaxed_startup` is set.
    pub async fn connect(params: ConnectionParams) -> Result<Self, MagicChatError> {
        params.validate()?;
        let client = Arc::new(WeaviateClient::new(&params)?);

        match client.is_ready().await {
            Ok(true) => {
                debug!("Vector database at {} is ready", params.url);
            }
            Ok(false) => {
                if params.is_local() && params.relaxed_startup {
                    warn!(
                        "Vector database at {} is not ready; continuing (relaxed startup)",
                        params.url
                    );
                } else {
                    return Err(MagicChatError::Connection(format!(
                        "Vector database at {} is not ready",
                        params.url
                    )));
                }
            }
            Err(e) => {
                if params.is_local() && params.relaxed_startup {
                    warn!(
                        "Readiness probe failed for {}; continuing (relaxed startup): {}",
                        params.url, e
                    );
                } else {
                    return Err(e);
                }
            }
        }

        Ok(Self { params, client })
    }

    /// The parameters this connection was opened with
    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    /// Expose the underlying connected handle for advanced use
    pub fn client(&self) -> Arc<WeaviateClient> {
        self.client.clone()
    }

    /// Close the connection and release the network session
    pub async fn close(self) -> Result<(), MagicChatError> {
        debug!("Closing connection to {}", self.params.url);
        // The HTTP client tears down its pooled sessions on drop
        drop(self.client);
        Ok(())
    }
}
