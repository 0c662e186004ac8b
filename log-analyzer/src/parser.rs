use std::sync::LazyLock;

use regex::Regex;

use crate::{
    invariants::Endpoint,
    models::{ParseOutcome, ParsedRequest},
};

// nginx `ui_short` format:
// $remote_addr  $remote_user $http_x_real_ip [$time_local] "$request" $status
// $body_bytes_sent "$http_referer" "$http_user_agent" "$http_x_forwarded_for"
// "$http_X_REQUEST_ID" "$http_X_RB_USER" $request_time
static UI_SHORT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r#"^\S+ +\S+ +\S+ +\[[^\]]+\] +"(?P<request>[^"]*)" +\d{3} +\S+"#,
        r#" +"[^"]*" +"[^"]*" +"[^"]*" +"[^"]*" +"[^"]*" +(?P<request_time>\S+)$"#,
    ))
    .expect("valid ui_short pattern")
});

pub fn parse_line(line: &str) -> ParseOutcome {
    match parse_request(line) {
        Some(request) => ParseOutcome::Parsed(request),
        None => ParseOutcome::Failed(line.to_string()),
    }
}

fn parse_request(line: &str) -> Option<ParsedRequest> {
    let caps = UI_SHORT.captures(line.trim_end())?;

    let mut parts = caps.name("request")?.as_str().split(' ');
    let method = parts.next()?;
    let target = parts.next()?;
    let protocol = parts.next()?;
    if method.is_empty() || !protocol.starts_with("HTTP/") || parts.next().is_some() {
        return None;
    }
    let endpoint: Endpoint = target.parse().ok()?;

    let request_time: f64 = caps.name("request_time")?.as_str().parse().ok()?;
    if !request_time.is_finite() || request_time < 0.0 {
        return None;
    }

    Some(ParsedRequest {
        endpoint,
        request_time,
    })
}
