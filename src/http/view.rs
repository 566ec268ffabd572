//! Filtered browse view over stored records.

use crate::{
  app::AppState,
  models::{log::log_record::LogRecord, response::log_page::LogPage},
  util::{cache_token, format_message, html_escape, ipv4_sort_key},
};
use axum::{
  Json,
  extract::{Query, State},
  http::{HeaderMap, StatusCode, header},
  response::{Html, IntoResponse},
};
use serde::Deserialize;
use tracing::error;

/// Filter parameters. Absent, empty, and the literal sentinel "All" all mean
/// "no constraint applied".
#[derive(Debug, Default, Deserialize)]
pub struct ViewParams {
  pub ip: Option<String>,
  pub day: Option<String>,
}

fn active(filter: &Option<String>) -> Option<&str> {
  filter
    .as_deref()
    .map(str::trim)
    .filter(|v| !v.is_empty() && *v != "All")
}

pub async fn view_log(
  State(state): State<AppState>,
  Query(params): Query<ViewParams>,
  headers: HeaderMap,
) -> axum::response::Response {
  let ip = active(&params.ip);
  let day = active(&params.day);

  // The token covers the unfiltered row count, so inserts outside the
  // active filter still invalidate it.
  let total: i64 = match sqlx::query_scalar("SELECT COUNT(*) FROM logs")
    .fetch_one(&state.db)
    .await
  {
    Ok(n) => n,
    Err(e) => {
      error!("view_log count error: {e}");
      return (StatusCode::INTERNAL_SERVER_ERROR, "db error").into_response();
    }
  };
  let etag = format!(
    "\"{}\"",
    cache_token(ip.unwrap_or("All"), day.unwrap_or("All"), total)
  );

  let mut resp_headers = HeaderMap::new();
  resp_headers.insert(header::ETAG, etag.parse().unwrap());

  if headers
    .get(header::IF_NONE_MATCH)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|v| v.trim().trim_matches('"') == etag.trim_matches('"'))
  {
    return (StatusCode::NOT_MODIFIED, resp_headers).into_response();
  }

  let mut conds: Vec<&str> = Vec::new();
  if ip.is_some() {
    conds.push("ip = ?");
  }
  if day.is_some() {
    conds.push("date(time) = ?");
  }
  let sql = if conds.is_empty() {
    "SELECT id, time, ip, ref, message FROM logs ORDER BY id".to_string()
  } else {
    format!(
      "SELECT id, time, ip, ref, message FROM logs WHERE {} ORDER BY id",
      conds.join(" AND ")
    )
  };
  let mut query = sqlx::query_as::<_, LogRecord>(&sql);
  if let Some(ip_val) = ip {
    query = query.bind(ip_val);
  }
  if let Some(day_val) = day {
    query = query.bind(day_val);
  }
  let records = match query.fetch_all(&state.db).await {
    Ok(rows) => rows,
    Err(e) => {
      error!("view_log fetch error: {e}");
      return (StatusCode::INTERNAL_SERVER_ERROR, "db error").into_response();
    }
  };

  // Filter values come from the whole table, not the filtered subset, so
  // the selects always offer every choice.
  let mut ips: Vec<String> = match sqlx::query_scalar("SELECT DISTINCT ip FROM logs")
    .fetch_all(&state.db)
    .await
  {
    Ok(v) => v,
    Err(e) => {
      error!("view_log distinct ip error: {e}");
      return (StatusCode::INTERNAL_SERVER_ERROR, "db error").into_response();
    }
  };
  ips.sort_by_key(|v| ipv4_sort_key(v));

  let days: Vec<String> =
    match sqlx::query_scalar("SELECT DISTINCT date(time) FROM logs ORDER BY 1")
      .fetch_all(&state.db)
      .await
    {
      Ok(v) => v,
      Err(e) => {
        error!("view_log distinct day error: {e}");
        return (StatusCode::INTERNAL_SERVER_ERROR, "db error").into_response();
      }
    };

  let wants_json = headers
    .get(header::ACCEPT)
    .and_then(|v| v.to_str().ok())
    .is_some_and(|a| a.contains("application/json"));
  if wants_json {
    return (resp_headers, Json(LogPage { records, ips, days })).into_response();
  }

  (resp_headers, Html(render_page(&records, &ips, &days, ip, day))).into_response()
}

fn options_html(values: &[String], selected: Option<&str>) -> String {
  let mut out = String::from("<option>All</option>");
  for v in values {
    let sel = if selected == Some(v.as_str()) {
      " selected"
    } else {
      ""
    };
    out.push_str(&format!("<option{sel}>{}</option>", html_escape(v)));
  }
  out
}

fn render_page(
  records: &[LogRecord],
  ips: &[String],
  days: &[String],
  ip: Option<&str>,
  day: Option<&str>,
) -> String {
  let mut rows = String::new();
  for r in records {
    rows.push_str(&format!(
      "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
      r.time.format("%Y-%m-%d %H:%M:%S"),
      html_escape(&r.ip),
      html_escape(r.referrer.as_deref().unwrap_or("")),
      format_message(&r.message)
    ));
  }

  let template = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>logbox</title>
  <style>
    body { font-family: system-ui, sans-serif; margin: 2rem; }
    h1 { margin: 0 0 1rem 0; }
    form { margin: 1rem 0; }
    label { margin-right: 1rem; }
    table { width: 100%; border-collapse: collapse; }
    th, td { border-bottom: 1px solid #ddd; text-align: left; padding: .5rem; vertical-align: top; }
    td pre { background: #f6f8fa; padding: .5rem; border-radius: 4px; margin: .25rem 0 0 0; }
    details summary { cursor: pointer; }
  </style>
  <script>
    window.addEventListener("load", () => {
      function scrollToBottom() {
        setTimeout(() => window.scrollTo(0, document.body.scrollHeight), 100);
      }
      async function fetchTable() {
        const form = new FormData(document.querySelector("form"));
        const qs = new URLSearchParams(form).toString();
        const resp = await fetch(`/log?${qs}`);
        const html = await resp.text();
        const doc = new DOMParser().parseFromString(html, "text/html");
        const table = document.querySelector("table");
        table.parentNode.replaceChild(doc.querySelector("table"), table);
      }
      document.body.addEventListener("keydown", (ev) => {
        if (ev.key === "End") {
          ev.preventDefault();
          fetchTable().then(scrollToBottom);
        }
        if (ev.key === "PageDown" &&
            window.innerHeight + window.scrollY >= document.body.scrollHeight) {
          fetchTable();
        }
      });
      document.querySelector("form").addEventListener("change", fetchTable);
    });
  </script>
</head>
<body>
  <h1>logbox</h1>
  <form>
    <label>ip <select name="ip">__IP_OPTIONS__</select></label>
    <label>day <select name="day">__DAY_OPTIONS__</select></label>
  </form>
  <table>
    <thead><tr><th>Time</th><th>IP</th><th>Referrer</th><th>Message</th></tr></thead>
    <tbody>__ROWS__</tbody>
  </table>
</body>
</html>
"#;
  template
    .replace("__IP_OPTIONS__", &options_html(ips, ip))
    .replace("__DAY_OPTIONS__", &options_html(days, day))
    .replace("__ROWS__", &rows)
}
