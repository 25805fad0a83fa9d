//! TCP accept loop and WebSocket upgrade.
//!
//! Every accepted socket gets its own task: upgrade (only on the configured
//! path, within the handshake timeout), then `handle_connection` until the
//! client goes away.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::http::StatusCode;
use tokio_tungstenite::WebSocketStream;

use chessmate_common::RelayError;
use chessmate_config::ServerConfig;

use crate::connection::handle_connection;
use crate::matchmaker::Matchmaker;

/// Bind the listener described by `config`.
pub async fn bind(config: &ServerConfig) -> std::io::Result<TcpListener> {
    TcpListener::bind(config.bind_addr()).await
}

/// Accept connections forever, one task per client.
pub async fn serve(listener: TcpListener, config: ServerConfig, matchmaker: Matchmaker) {
    let config = Arc::new(config);

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let config = Arc::clone(&config);
                let matchmaker = matchmaker.clone();
                tokio::spawn(async move {
                    match upgrade(stream, &config).await {
                        Ok(ws) => {
                            handle_connection(
                                ws,
                                addr,
                                matchmaker,
                                config.outbound_queue as usize,
                            )
                            .await
                        }
                        Err(e) => {
                            tracing::warn!(peer = %addr, error = %e, "WS handshake failed");
                        }
                    }
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "TCP accept error");
            }
        }
    }
}

/// Bind and serve on a background task, returning the bound address. Useful
/// with port 0.
pub async fn spawn(
    config: ServerConfig,
    matchmaker: Matchmaker,
) -> std::io::Result<(SocketAddr, tokio::task::JoinHandle<()>)> {
    let listener = bind(&config).await?;
    let addr = listener.local_addr()?;
    let task = tokio::spawn(serve(listener, config, matchmaker));
    Ok((addr, task))
}

async fn upgrade(
    stream: TcpStream,
    config: &ServerConfig,
) -> Result<WebSocketStream<TcpStream>, RelayError> {
    let expected = config.path.clone();
    let check_path = move |request: &Request, response: Response| {
        if request.uri().path() == expected {
            Ok(response)
        } else {
            let mut rejection = ErrorResponse::new(Some("unknown endpoint".to_string()));
            *rejection.status_mut() = StatusCode::NOT_FOUND;
            Err(rejection)
        }
    };

    match tokio::time::timeout(config.handshake_timeout(), accept_hdr_async(stream, check_path))
        .await
    {
        Ok(Ok(ws)) => Ok(ws),
        Ok(Err(e)) => Err(RelayError::Handshake(e.to_string())),
        Err(_) => Err(RelayError::Handshake(format!(
            "timed out after {}s",
            config.handshake_timeout_secs
        ))),
    }
}

#[cfg(test)]
mod tests;
