//! Dialing: DNS, TCP connect, TCP keepalive, optional TLS handshake.

use std::sync::Arc;
use std::time::Duration;

use socket2::{SockRef, TcpKeepalive};
use tokio::net::TcpStream;
use tokio_rustls::rustls;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::TlsConnector;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::transport::Transport;

/// Open a connection as described by `config`.
///
/// Failures are terminal for this attempt; nothing is retried here.
pub async fn dial(config: &ClientConfig) -> Result<Transport, ClientError> {
    let addr = config.address();
    let mode = if config.secure { "TLS" } else { "plain" };

    debug!("resolving {}", addr);
    let tcp = TcpStream::connect(&addr)
        .await
        .map_err(|source| ClientError::Connect {
            addr: addr.clone(),
            source,
        })?;
    debug!("TCP connected to {} ({})", addr, mode);

    if config.tcp_keepalive {
        if let Err(e) = enable_keepalive(&tcp) {
            warn!("failed to enable TCP keepalive: {}", e);
        }
    }

    if !config.secure {
        return Ok(Transport::tcp(tcp));
    }

    let server_name = ServerName::try_from(config.host.clone())
        .map_err(|_| ClientError::InvalidServerName(config.host.clone()))?;
    let connector = TlsConnector::from(Arc::new(tls_config()));
    let tls = connector
        .connect(server_name, tcp)
        .await
        .map_err(|source| {
            warn!(host = %config.host, error = %source, "TLS handshake failed");
            ClientError::Tls {
                host: config.host.clone(),
                source,
            }
        })?;
    debug!("TLS handshake complete");
    Ok(Transport::tls(tls))
}

fn enable_keepalive(stream: &TcpStream) -> std::io::Result<()> {
    let sock = SockRef::from(stream);
    let keepalive = TcpKeepalive::new()
        .with_time(Duration::from_secs(120))
        .with_interval(Duration::from_secs(30));

    sock.set_tcp_keepalive(&keepalive)
}

fn tls_config() -> rustls::ClientConfig {
    let root_store =
        rustls::RootCertStore::from_iter(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    rustls::ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_refused_connection_is_connect_error() {
        // Bind then drop to find a port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = ClientConfig::new("127.0.0.1", "engine")
            .secure(false)
            .with_port(port);
        let err = dial(&config).await.unwrap_err();
        assert!(matches!(err, ClientError::Connect { .. }));
    }

    #[tokio::test]
    async fn test_plain_dial() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let config = ClientConfig::new("127.0.0.1", "engine")
            .secure(false)
            .with_port(port);

        let (transport, accepted) = tokio::join!(dial(&config), listener.accept());
        assert!(!transport.unwrap().is_tls());
        assert!(accepted.is_ok());
    }
}
