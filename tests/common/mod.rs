//! Shared utilities for integration tests.

use std::sync::Arc;

use tokio::net::TcpListener;

use highlight_service::highlight::PlainHighlighter;
use highlight_service::{bootstrap, AppConfig, HttpServer, Shutdown};

/// A server running on an ephemeral port.
pub struct TestServer {
    pub url: String,
    shutdown: Shutdown,
}

impl TestServer {
    /// Start the service with `config` on 127.0.0.1.
    pub async fn start(config: AppConfig) -> Self {
        let application = bootstrap(&config).unwrap();
        let server =
            HttpServer::new(&config, application, Arc::new(PlainHighlighter::new())).unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let shutdown = Shutdown::new();
        let receiver = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, receiver).await;
        });

        Self { url, shutdown }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}
