//! Local HTTP responder for client tests.

use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use url::Url;

use crate::api::ApiClient;
use crate::config::ApiConfig;

/// One request as the responder saw it.
pub struct Recorded {
    pub request_line: String,
    pub body: String,
}

/// Answer one request per entry of `responses`, in order, then stop
/// listening. Each response closes its connection.
pub async fn serve(responses: Vec<(u16, &'static str)>) -> (ApiClient, JoinHandle<Vec<Recorded>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        let mut recorded = Vec::with_capacity(responses.len());
        for (status, body) in responses {
            let (socket, _) = listener.accept().await.unwrap();
            recorded.push(respond(socket, status, body).await);
        }
        recorded
    });

    let config = ApiConfig {
        base_url: Url::parse(&format!("http://{addr}/api/")).unwrap(),
        timeout: Duration::from_secs(5),
    };
    (ApiClient::new(&config).unwrap(), handle)
}

/// Answer exactly one request with `status` and `body`.
pub async fn serve_once(status: u16, body: &'static str) -> (ApiClient, JoinHandle<Recorded>) {
    let (client, all) = serve(vec![(status, body)]).await;
    let handle = tokio::spawn(async move { all.await.unwrap().remove(0) });
    (client, handle)
}

async fn respond(mut socket: TcpStream, status: u16, body: &str) -> Recorded {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let header_end = loop {
        let n = socket.read(&mut chunk).await.unwrap();
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        assert!(n > 0, "connection closed before headers finished");
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (name, value) = line.split_once(':')?;
            name.eq_ignore_ascii_case("content-length")
                .then(|| value.trim().parse::<usize>().ok())
                .flatten()
        })
        .unwrap_or(0);

    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.unwrap();
        assert!(n > 0, "connection closed before body finished");
        buf.extend_from_slice(&chunk[..n]);
    }

    let response = format!(
        "HTTP/1.1 {status} Test\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    socket.write_all(response.as_bytes()).await.unwrap();
    let _ = socket.shutdown().await;

    Recorded {
        request_line: head.lines().next().unwrap_or_default().to_string(),
        body: String::from_utf8_lossy(&buf[header_end..header_end + content_length]).to_string(),
    }
}
