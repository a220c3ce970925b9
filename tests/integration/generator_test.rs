// Generator + watermark flow against a local HTTP stub

use super::test_harness::*;
use genmark::generator::{GenerateOptions, GeneratorError, ImageGenerator, NanoBananaProvider};
use genmark::watermark::{self, Config, Format};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Accept one connection, drain the request, and reply with `response`.
async fn serve_once(response: Vec<u8>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.unwrap();
            request.extend_from_slice(&buf[..n]);
            if n == 0 || request_complete(&request) {
                break;
            }
        }
        socket.write_all(&response).await.unwrap();
        socket.shutdown().await.unwrap();
    });

    addr
}

fn request_complete(request: &[u8]) -> bool {
    let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
        return false;
    };
    let head = String::from_utf8_lossy(&request[..end]).to_lowercase();
    let length = head
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    request.len() >= end + 4 + length
}

fn ok_response(content_type: &str, body: &[u8]) -> Vec<u8> {
    let mut response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        content_type,
        body.len()
    )
    .into_bytes();
    response.extend_from_slice(body);
    response
}

#[tokio::test]
async fn test_generated_png_is_watermarked() {
    let png = solid_rgb(256, 128, RED, Format::Png);
    let addr = serve_once(ok_response("image/png", &png)).await;

    let provider = NanoBananaProvider::new("test-key")
        .unwrap()
        .with_endpoint(format!("http://{}/v1/generate", addr));
    let generated = provider
        .generate("a red banner", &GenerateOptions::new().with_size(256, 128))
        .await
        .unwrap();

    assert_eq!(generated.format().unwrap(), Format::Png);

    let output = watermark::apply(&generated.data, &Config::text("(c) genmark")).unwrap();
    let (format, image) = decode_rgba(&output);
    assert_eq!(format, Format::Png);
    assert_eq!(image.dimensions(), (256, 128));
    assert_ne!(output, png);
}

#[tokio::test]
async fn test_generated_format_sniffed_when_content_type_generic() {
    let jpeg = solid_rgb(64, 64, RED, Format::Jpeg);
    let addr = serve_once(ok_response("application/octet-stream", &jpeg)).await;

    let provider = NanoBananaProvider::new("test-key")
        .unwrap()
        .with_endpoint(format!("http://{}/", addr));
    let generated = provider
        .generate("anything", &GenerateOptions::default())
        .await
        .unwrap();

    assert_eq!(generated.content_type, "application/octet-stream");
    assert_eq!(generated.format().unwrap(), Format::Jpeg);
}

#[tokio::test]
async fn test_server_error_surfaces_status_and_body() {
    let body = b"quota exceeded";
    let response = format!(
        "HTTP/1.1 429 Too Many Requests\r\nContent-Length: {}\r\nConnection: close\r\n\r\nquota exceeded",
        body.len()
    );
    let addr = serve_once(response.into_bytes()).await;

    let provider = NanoBananaProvider::new("test-key")
        .unwrap()
        .with_endpoint(format!("http://{}/", addr));
    let err = provider
        .generate("anything", &GenerateOptions::default())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "api returned error 429: quota exceeded");
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (_socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
    });

    let provider = NanoBananaProvider::new("test-key")
        .unwrap()
        .with_endpoint(format!("http://{}/", addr))
        .with_timeout(Duration::from_millis(200))
        .unwrap();
    let err = provider
        .generate("anything", &GenerateOptions::default())
        .await
        .unwrap_err();

    match err {
        GeneratorError::Transport(source) => assert!(source.is_timeout()),
        other => panic!("unexpected error: {other}"),
    }
}
