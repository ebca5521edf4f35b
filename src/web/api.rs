//! JSON handlers behind the page script.
//!
//! Every handler runs at most one controller step and answers with the
//! resulting [`Snapshot`]: the full element map plus the alerts raised by
//! that step, which the page shows as blocking dialogs.

use std::collections::BTreeMap;
use std::io::Cursor;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tiny_http::{Response, StatusCode};

use crate::api::Transport;
use crate::controller::{Controller, UiEvent};
use crate::dom::Element;
use crate::view::{Page, Tab};

use super::{content_type_json, error_response, header};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// What the page needs to mirror the document.
#[derive(Serialize)]
struct Snapshot<'a> {
    page: Page,
    tab: Option<Tab>,
    elements: &'a BTreeMap<String, Element>,
    alerts: Vec<String>,
}

/// `POST /ui/event` body: current form values, then the event to run.
#[derive(Debug, Deserialize)]
struct EventRequest {
    action: UiEvent,
    #[serde(default)]
    fields: BTreeMap<String, String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn json_response<S: Serialize>(data: &S) -> Result<Response<Cursor<Vec<u8>>>> {
    let body = serde_json::to_string(data).context("failed to serialize JSON response")?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json()?)
        .with_status_code(StatusCode(200)))
}

fn snapshot<T: Transport>(controller: &mut Controller<T>) -> Result<Response<Cursor<Vec<u8>>>> {
    let alerts = controller.take_alerts();
    json_response(&Snapshot {
        page: controller.page(),
        tab: controller.tab(),
        elements: controller.document().elements(),
        alerts,
    })
}

/// The `name` query parameter, percent-decoded.
fn parse_name_param(url: &str) -> Option<String> {
    url.split('?').nth(1)?.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k == "name" && !v.is_empty()).then(|| percent_decode(v))
    })
}

/// Decode `%XX` escapes as produced by `encodeURIComponent`. Malformed
/// escapes are kept literally, invalid UTF-8 is replaced.
fn percent_decode(raw: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes())).into_owned()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /ui/state`: current document.
pub fn get_state<T: Transport>(controller: &mut Controller<T>) -> Result<Response<Cursor<Vec<u8>>>> {
    snapshot(controller)
}

/// `POST /ui/event`: apply form values, run one event.
///
/// Expects `{"action": {"event": "switch_tab", "tab": "batch"}, "fields": {"inputText": "..."}}`.
pub fn post_event<T: Transport>(
    controller: &mut Controller<T>,
    body: &[u8],
) -> Result<Response<Cursor<Vec<u8>>>> {
    let request: EventRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => return Ok(error_response(400, &format!("invalid event: {e}"))),
    };

    controller.apply_fields(&request.fields);
    controller.dispatch(request.action);
    snapshot(controller)
}

/// `POST /ui/upload?name=<file>`: raw file bytes become the batch selection.
pub fn post_upload<T: Transport>(
    controller: &mut Controller<T>,
    url: &str,
    body: &[u8],
) -> Result<Response<Cursor<Vec<u8>>>> {
    let Some(name) = parse_name_param(url) else {
        return Ok(error_response(400, "missing name parameter"));
    };

    controller.select_file(&name, body.to_vec());
    snapshot(controller)
}

/// `GET /ui/export.csv`: the last batch as an attachment.
pub fn get_export<T: Transport>(controller: &mut Controller<T>) -> Result<Response<Cursor<Vec<u8>>>> {
    let Some(download) = controller.download_batch_csv() else {
        return Ok(error_response(404, "no batch to export"));
    };

    Ok(Response::from_data(download.content.into_bytes())
        .with_header(header("Content-Type", "text/csv; charset=utf-8")?)
        .with_header(header(
            "Content-Disposition",
            &format!("attachment; filename=\"{}\"", download.filename),
        )?)
        .with_status_code(StatusCode(200)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
