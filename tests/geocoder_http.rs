//! Geocoder against a local one-shot HTTP server.

use std::time::Duration;

use rush_store::config::GeocoderConfig;
use rush_store::geocode::{GeocodeError, Geocoder};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve exactly one response and return the endpoint URL plus the raw request.
async fn serve_once(
    status: &'static str,
    body: &'static str,
) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let n = socket.read(&mut buf).await.unwrap();
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&buf[..n]).into_owned()
    });
    (format!("http://{addr}/search"), handle)
}

fn geocoder(endpoint: String) -> Geocoder {
    Geocoder::new(&GeocoderConfig {
        endpoint,
        user_agent: "rush-store-tests".into(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn first_match_is_returned() {
    let (url, server) = serve_once(
        "200 OK",
        r#"[{"lat":"37.8696","lon":"-122.2593","display_name":"Sproul Plaza, Berkeley"}]"#,
    )
    .await;

    let found = geocoder(url).search("sproul plaza").await.unwrap();
    assert_eq!(found.label, "Sproul Plaza, Berkeley");
    assert_eq!(found.point.lat, 37.8696);
    assert_eq!(found.point.lng, -122.2593);

    let request = server.await.unwrap();
    assert!(request.starts_with("GET /search?q=sproul+plaza&format=json&limit=1"));
    assert!(request.to_ascii_lowercase().contains("user-agent: rush-store-tests"));
}

#[tokio::test]
async fn empty_result_list_is_no_match() {
    let (url, server) = serve_once("200 OK", "[]").await;
    let err = geocoder(url).search("atlantis").await.unwrap_err();
    assert!(matches!(err, GeocodeError::NoMatch(_)));
    server.await.unwrap();
}

#[tokio::test]
async fn error_status_is_reported() {
    let (url, server) = serve_once("503 Service Unavailable", "{}").await;
    let err = geocoder(url).search("anywhere").await.unwrap_err();
    assert!(matches!(err, GeocodeError::Status(503)));
    assert_eq!(err.user_message(), "Address search is unavailable right now.");
    server.await.unwrap();
}
