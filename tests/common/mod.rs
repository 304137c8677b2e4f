//! Shared utilities for integration testing.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Start a programmable mock backend. The closure receives the raw
/// request text and decides status and body. Returns the bound address.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let mut buf = vec![0u8; 65536];
                        let n = socket.read(&mut buf).await.unwrap_or(0);
                        let request = String::from_utf8_lossy(&buf[..n]).into_owned();

                        let (status, body) = f(request).await;
                        let status_text = match status {
                            200 => "200 OK",
                            201 => "201 Created",
                            400 => "400 Bad Request",
                            401 => "401 Unauthorized",
                            403 => "403 Forbidden",
                            404 => "404 Not Found",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };

                        let response_str = format!(
                            "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response_str.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// Bearer token with the given subject, signed with a key the gateway
/// does not know. The gateway only reads the claimed subject.
pub fn caller_bearer_token(subject: &str) -> String {
    #[derive(serde::Serialize)]
    struct Claims<'a> {
        sub: &'a str,
        exp: i64,
    }
    jsonwebtoken::encode(
        &jsonwebtoken::Header::new(jsonwebtoken::Algorithm::HS256),
        &Claims {
            sub: subject,
            exp: chrono::Utc::now().timestamp() + 300,
        },
        &jsonwebtoken::EncodingKey::from_secret(b"caller-connector-key"),
    )
    .unwrap()
}
