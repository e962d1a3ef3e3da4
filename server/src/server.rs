//! TCP accept loop

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::{error, info, info_span, warn, Instrument};

use crate::config::KiteConfig;
use crate::dispatcher::Dispatcher;
use crate::error::ServerResult;
use crate::mapping::RequestMapping;
use crate::processor::Http11Processor;

/// Kite server: one task per accepted connection, one request per connection
pub struct Server {
    config: KiteConfig,
    processor: Http11Processor,
}

impl Server {
    /// Build the server from its configuration and controller registry
    pub fn new(config: KiteConfig, mapping: RequestMapping) -> ServerResult<Self> {
        config.validate()?;

        let store = Arc::new(config.static_store());
        if !config.static_root.is_dir() {
            warn!(
                "Static root {} is not a directory; no static resources will be served",
                config.static_root.display()
            );
        }

        let dispatcher = Arc::new(Dispatcher::new(mapping, store));
        let processor = Http11Processor::from_config(dispatcher, &config);

        Ok(Self { config, processor })
    }

    pub fn config(&self) -> &KiteConfig {
        &self.config
    }

    /// Bind the configured address and serve until the task is dropped
    pub async fn listen(self) -> ServerResult<()> {
        let listener = TcpListener::bind(self.config.socket_addr()?).await?;
        self.serve(listener).await
    }

    /// Serve connections from an already bound listener
    pub async fn serve(self, listener: TcpListener) -> ServerResult<()> {
        info!("Kite server listening on http://{}", listener.local_addr()?);
        info!(
            "Serving {} controllers, static root {}",
            self.processor.dispatcher().mapping().len(),
            self.config.static_root.display()
        );

        loop {
            let (mut stream, remote_addr) = match listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    error!("Failed to accept connection: {}", e);
                    continue;
                }
            };
            let processor = self.processor.clone();
            let span = info_span!("connection", peer = %remote_addr);

            tokio::spawn(
                async move {
                    if let Err(e) = processor.process(&mut stream).await {
                        error!("Error serving connection: {}", e);
                    }
                }
                .instrument(span),
            );
        }
    }
}
