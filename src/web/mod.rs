//! Embedded web front-end.
//!
//! A lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - the single page whose elements mirror [`crate::dom::Document`]
//! - JSON endpoints that forward user events to one [`Controller`] and
//!   return the resulting document snapshot
//!
//! Launched via `sentimen serve` (default: `http://127.0.0.1:8765`).

mod api;
mod frontend;

use std::io::{Cursor, Read};

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::api::Transport;
use crate::controller::Controller;

pub use frontend::INDEX_HTML;

type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Serve the page for one controller on `addr`. The history list is
/// loaded once up front, as a page load would.
///
/// Blocks the current thread. Requests are handled one at a time, so only
/// one action runs against the controller at once. A failing request is
/// answered with a JSON error and the server keeps going.
pub fn serve<T: Transport>(mut controller: Controller<T>, addr: &str, open: bool) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    controller.load_history();

    println!("sentimen running at http://{addr}");
    println!("Press Ctrl+C to stop.\n");

    if open && let Err(e) = open_browser(&format!("http://{addr}")) {
        log::debug!("could not open browser: {e:#}");
    }

    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let mut body = Vec::new();
        if matches!(method, Method::Post | Method::Put)
            && let Err(e) = request.as_reader().read_to_end(&mut body)
        {
            log::warn!("failed to read request body for {url}: {e}");
        }

        let response = dispatch(&mut controller, &method, &url, &body)
            .unwrap_or_else(|e| error_response(500, &format!("{e:#}")));
        if let Err(e) = request.respond(response) {
            log::debug!("failed to send response for {url}: {e}");
        }

        log::info!("{method} {url} {}", chrono::Local::now().format("%H:%M:%S"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Route one request to its handler.
fn dispatch<T: Transport>(
    controller: &mut Controller<T>,
    method: &Method,
    url: &str,
    body: &[u8],
) -> Result<HttpResponse> {
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => serve_frontend(),

        (&Method::Get, "/ui/state") => api::get_state(controller),
        (&Method::Post, "/ui/event") => api::post_event(controller, body),
        (&Method::Post, "/ui/upload") => api::post_upload(controller, url, body),
        (&Method::Get, "/ui/export.csv") => api::get_export(controller),

        _ => Ok(error_response(404, "not found")),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn serve_frontend() -> Result<HttpResponse> {
    Ok(Response::from_data(INDEX_HTML.as_bytes().to_vec())
        .with_header(header("Content-Type", "text/html; charset=utf-8")?)
        .with_status_code(StatusCode(200)))
}

/// JSON `{"error": ...}` with the given status.
fn error_response(status: u16, message: &str) -> HttpResponse {
    let body = serde_json::json!({ "error": message }).to_string();
    let response = Response::from_data(body.into_bytes()).with_status_code(StatusCode(status));
    match header("Content-Type", "application/json; charset=utf-8") {
        Ok(h) => response.with_header(h),
        Err(_) => response,
    }
}

pub(crate) fn header(name: &str, value: &str) -> Result<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|()| anyhow::anyhow!("invalid header {name}: {value}"))
}

pub(crate) fn content_type_json() -> Result<Header> {
    header("Content-Type", "application/json; charset=utf-8")
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiRequest, ApiResponse, TransportError};
    use crate::auth::AuthClient;
    use crate::state::AppState;
    use crate::storage::MemoryStorage;

    struct NoBackend;

    impl Transport for NoBackend {
        fn send(&self, request: &ApiRequest) -> Result<ApiResponse, TransportError> {
            Err(TransportError::Network {
                method: request.method.as_str(),
                path: request.path.clone(),
                reason: "no backend in tests".to_string(),
            })
        }
    }

    fn controller() -> Controller<NoBackend> {
        let state = AppState::new(
            AuthClient::new(Box::new(MemoryStorage::new())),
            Box::new(MemoryStorage::new()),
        );
        Controller::new(NoBackend, state)
    }

    #[test]
    fn root_serves_page() {
        let mut c = controller();
        let response = dispatch(&mut c, &Method::Get, "/", &[]).unwrap();
        assert_eq!(response.status_code(), StatusCode(200));
    }

    #[test]
    fn unknown_path_is_404() {
        let mut c = controller();
        let response = dispatch(&mut c, &Method::Get, "/nope", &[]).unwrap();
        assert_eq!(response.status_code(), StatusCode(404));
        let response = dispatch(&mut c, &Method::Get, "/ui/event", &[]).unwrap();
        assert_eq!(response.status_code(), StatusCode(404));
    }

    #[test]
    fn header_helper_rejects_garbage() {
        assert!(header("Content-Type", "text/plain").is_ok());
        assert!(header("Content-Type", "tëxt/plain").is_err());
    }
}
