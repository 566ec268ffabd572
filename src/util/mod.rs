//! Utility functions: tracing, HTML escape, message rendering, cache tokens.

use serde_json::Value;
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize pretty CLI logging.
pub fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  fmt()
    .with_env_filter(filter)
    .with_target(false)
    .pretty()
    .init();
}

/// Minimal HTML escaping for text display.
pub fn html_escape(s: &str) -> String {
  s.replace('&', "&amp;")
    .replace('<', "&lt;")
    .replace('>', "&gt;")
}

/// Digest identifying one browse result.
///
/// Derived from the active filters plus the unfiltered row count, so any
/// insert anywhere invalidates every outstanding token. Conservative but
/// never stale.
pub fn cache_token(filter_ip: &str, filter_day: &str, row_count: i64) -> String {
  blake3::hash(format!("{filter_ip}|{filter_day}|{row_count}").as_bytes())
    .to_hex()
    .to_string()
}

/// Sort key placing dotted-quad strings in numeric IPv4 order.
///
/// Values that do not parse as IPv4 sort after the ones that do,
/// lexicographically.
pub fn ipv4_sort_key(ip: &str) -> (u8, u32, String) {
  match ip.parse::<std::net::Ipv4Addr>() {
    Ok(addr) => (0, u32::from(addr), String::new()),
    Err(_) => (1, 0, ip.to_string()),
  }
}

/// Render a stored message for the browse table.
///
/// Messages are conventionally `JSON.stringify(args)` from the beacon
/// script, so a top-level array is shown as its elements separated by
/// spaces. Anything that does not parse as JSON is shown escaped, as-is.
pub fn format_message(raw: &str) -> String {
  match serde_json::from_str::<Value>(raw) {
    Ok(Value::Array(items)) => items.iter().map(render_value).collect::<Vec<_>>().join(" "),
    Ok(v) => render_value(&v),
    Err(_) => html_escape(raw),
  }
}

/// One leaf or nested structure. Numeric leaves are fixed to 3 decimal
/// places; nested structures collapse behind a `<details>` toggle.
fn render_value(v: &Value) -> String {
  match v {
    Value::Number(n) => match n.as_f64() {
      Some(f) => format!("{f:.3}"),
      None => n.to_string(),
    },
    Value::String(s) => html_escape(s),
    Value::Bool(b) => b.to_string(),
    Value::Null => "null".to_string(),
    Value::Array(_) | Value::Object(_) => {
      let summary = if v.is_array() { "[…]" } else { "{…}" };
      let pretty = serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string());
      format!(
        "<details><summary>{summary}</summary><pre>{}</pre></details>",
        html_escape(&pretty)
      )
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn numeric_leaves_render_with_three_decimals() {
    let out = format_message(r#"[1.5, {"a":2}]"#);
    assert!(out.contains("1.500"), "got: {out}");
    assert!(out.starts_with("1.500 <details>"));
  }

  #[test]
  fn nested_structures_are_collapsible_and_escaped() {
    let out = format_message(r#"[{"tag":"<b>"}]"#);
    assert!(out.contains("<details><summary>{…}</summary><pre>"));
    assert!(out.contains("&lt;b&gt;"));
    assert!(!out.contains("<b>"));
  }

  #[test]
  fn malformed_json_falls_back_to_escaped_text() {
    assert_eq!(format_message("not json {"), "not json {");
    assert_eq!(format_message("<script>"), "&lt;script&gt;");
  }

  #[test]
  fn scalars_render_literally() {
    assert_eq!(format_message(r#"["hi", true, null]"#), "hi true null");
  }

  #[test]
  fn ipv4_order_is_numeric_not_lexicographic() {
    let mut ips = vec![
      "10.0.0.1".to_string(),
      "9.0.0.1".to_string(),
      "not-an-ip".to_string(),
      "2.0.0.30".to_string(),
    ];
    ips.sort_by_key(|ip| ipv4_sort_key(ip));
    assert_eq!(ips, ["2.0.0.30", "9.0.0.1", "10.0.0.1", "not-an-ip"]);
  }

  #[test]
  fn cache_token_tracks_filters_and_row_count() {
    assert_eq!(cache_token("All", "All", 3), cache_token("All", "All", 3));
    assert_ne!(cache_token("All", "All", 3), cache_token("All", "All", 4));
    assert_ne!(
      cache_token("1.2.3.4", "All", 3),
      cache_token("All", "All", 3)
    );
  }
}
