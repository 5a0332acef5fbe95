//! Shared test helpers: mock registry mirrors and multipart bodies
#![allow(dead_code)]

use agrismart_common::config::{MirrorSpec, RegistryConfig};
use axum::{
    http::{header, HeaderMap, StatusCode, Uri},
    Router,
};
use image::{ImageBuffer, ImageFormat, Luma};
use rxing::{BarcodeFormat, MultiFormatWriter, Writer};
use serde_json::{json, Value};
use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One request received by a mock mirror
#[derive(Debug, Clone)]
pub struct Hit {
    pub label: String,
    pub path: String,
    pub user_agent: Option<String>,
}

/// Every request seen by any mock mirror, in arrival order
pub type HitLog = Arc<Mutex<Vec<Hit>>>;

pub fn new_hit_log() -> HitLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn hit_labels(log: &HitLog) -> Vec<String> {
    log.lock().unwrap().iter().map(|hit| hit.label.clone()).collect()
}

pub fn hit_paths(log: &HitLog) -> Vec<String> {
    log.lock().unwrap().iter().map(|hit| hit.path.clone()).collect()
}

pub fn hit_user_agents(log: &HitLog) -> Vec<Option<String>> {
    log.lock().unwrap().iter().map(|hit| hit.user_agent.clone()).collect()
}

/// How a mock mirror answers
#[derive(Clone)]
pub enum MirrorBehavior {
    /// Status code plus JSON body
    Json(u16, Value),
    /// Status code plus raw body text
    Raw(u16, String),
    /// Sleep before answering with a match
    Slow(Duration),
    /// Nothing listening on the port
    Unreachable,
}

/// `status: 1` payload with the given product object
pub fn found_payload(product: Value) -> MirrorBehavior {
    MirrorBehavior::Json(200, json!({"status": 1, "status_verbose": "product found", "product": product}))
}

/// `status: 0` payload, as the registries send for unknown barcodes
pub fn not_found_payload() -> MirrorBehavior {
    MirrorBehavior::Json(200, json!({"status": 0, "status_verbose": "product not found"}))
}

/// Start a mock mirror on an ephemeral port
pub async fn spawn_mirror(label: &str, behavior: MirrorBehavior, log: HitLog) -> MirrorSpec {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    if let MirrorBehavior::Unreachable = behavior {
        drop(listener);
        return MirrorSpec::new(base_url, label);
    }

    let label_owned = label.to_string();
    let app = Router::new().fallback(move |headers: HeaderMap, uri: Uri| {
        let log = log.clone();
        let label = label_owned.clone();
        let behavior = behavior.clone();
        async move {
            let user_agent = headers
                .get(header::USER_AGENT)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            log.lock().unwrap().push(Hit {
                label,
                path: uri.path().to_string(),
                user_agent,
            });
            match behavior {
                MirrorBehavior::Json(status, body) => (
                    StatusCode::from_u16(status).unwrap(),
                    [("content-type", "application/json")],
                    body.to_string(),
                ),
                MirrorBehavior::Raw(status, body) => (
                    StatusCode::from_u16(status).unwrap(),
                    [("content-type", "text/plain")],
                    body,
                ),
                MirrorBehavior::Slow(delay) => {
                    tokio::time::sleep(delay).await;
                    (
                        StatusCode::OK,
                        [("content-type", "application/json")],
                        json!({"status": 1, "product": {"product_name": "Too Late"}}).to_string(),
                    )
                }
                MirrorBehavior::Unreachable => unreachable!(),
            }
        }
    });

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MirrorSpec::new(base_url, label)
}

/// Spawn mirrors labelled MIRROR 1..N with the given behaviors
pub async fn spawn_mirrors(behaviors: Vec<MirrorBehavior>, log: &HitLog) -> Vec<MirrorSpec> {
    let mut mirrors = Vec::with_capacity(behaviors.len());
    for (i, behavior) in behaviors.into_iter().enumerate() {
        let label = format!("MIRROR {}", i + 1);
        mirrors.push(spawn_mirror(&label, behavior, log.clone()).await);
    }
    mirrors
}

pub fn registry_config(mirrors: Vec<MirrorSpec>) -> RegistryConfig {
    RegistryConfig {
        timeout_secs: 2,
        mirrors,
        ..Default::default()
    }
}

pub const BOUNDARY: &str = "agrismart-test-boundary";

/// One multipart part
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a [u8]),
}

/// Encode parts as multipart/form-data with [`BOUNDARY`]
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"upload.png\"\r\n\
                         Content-Type: image/png\r\n\r\n",
                        name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={}", BOUNDARY)
}

/// PNG of an EAN-13 symbol for `contents`, padded with a white quiet zone
pub fn ean13_png(contents: &str) -> Vec<u8> {
    const QUIET_ZONE: u32 = 20;
    let matrix = MultiFormatWriter::default()
        .encode(contents, &BarcodeFormat::EAN_13, 300, 120)
        .unwrap();
    let (w, h) = (matrix.getWidth(), matrix.getHeight());
    let mut img: ImageBuffer<Luma<u8>, Vec<u8>> =
        ImageBuffer::from_pixel(w + 2 * QUIET_ZONE, h + 2 * QUIET_ZONE, Luma([255u8]));
    for y in 0..h {
        for x in 0..w {
            if matrix.get(x, y) {
                img.put_pixel(x + QUIET_ZONE, y + QUIET_ZONE, Luma([0u8]));
            }
        }
    }
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .unwrap();
    bytes
}
