use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;
use super::{Backend, Query, Table};
use crate::error::{Error, Result};

/// Supabase PostgREST backend (`<url>/rest/v1/<table>`).
///
/// Row-level security on the server keeps users to their own records; the
/// client still filters every list by `user_id`.
#[derive(Debug, Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
    anon_key: String,
    access_token: String,
}

/// PostgREST and GoTrue error bodies use different field names.
#[derive(Deserialize, Default)]
pub(crate) struct ApiErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl RestBackend {
    pub fn new(base_url: &str, anon_key: &str, access_token: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            access_token: access_token.to_string(),
        }
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.name())
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.access_token))
            .header("Content-Type", "application/json")
    }

    fn single_row(table: Table, id: &str, rows: Vec<Value>) -> Result<Value> {
        rows.into_iter().next().ok_or_else(|| Error::NotFound {
            table: table.name().to_string(),
            id: id.to_string(),
        })
    }
}

/// Renders a filter value the way PostgREST expects it after `eq.`.
pub(crate) fn filter_literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Query-string pairs for a list query.
pub(crate) fn query_params(query: &Query) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = vec![("select".into(), "*".into())];
    for (column, value) in &query.filters {
        params.push((column.clone(), format!("eq.{}", filter_literal(value))));
    }
    if let Some(order) = &query.order {
        let dir = if order.descending { "desc" } else { "asc" };
        params.push(("order".into(), format!("{}.{}.nullslast", order.column, dir)));
    }
    if let Some(n) = query.limit {
        params.push(("limit".into(), n.to_string()));
    }
    params
}

/// Turns a non-success response into `Error::Api`, keeping the server's
/// message when it sent one.
pub(crate) fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().unwrap_or_default();
    let message = api_message(&text).unwrap_or(text);
    log::error!("backend returned {}: {}", status, message);
    Err(Error::Api { status: status.as_u16(), message })
}

pub(crate) fn api_message(body: &str) -> Option<String> {
    let parsed: ApiErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .or(parsed.msg)
        .or(parsed.error_description)
        .or(parsed.error)
}

impl Backend for RestBackend {
    fn select(&self, table: Table, query: &Query) -> Result<Vec<Value>> {
        log::debug!("GET {} {:?}", table, query.filters);
        let response = self
            .authorized(self.client.get(self.table_url(table)))
            .query(&query_params(query))
            .send()?;
        Ok(check(response)?.json::<Vec<Value>>()?)
    }

    fn insert(&self, table: Table, row: Value) -> Result<Value> {
        log::info!("insert into {}", table);
        let response = self
            .authorized(self.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(&row)
            .send()?;
        let rows = check(response)?.json::<Vec<Value>>()?;
        Self::single_row(table, "(new)", rows)
    }

    fn update(&self, table: Table, id: &str, patch: Value) -> Result<Value> {
        log::info!("update {} {}", table, id);
        let response = self
            .authorized(self.client.patch(self.table_url(table)))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .json(&patch)
            .send()?;
        let rows = check(response)?.json::<Vec<Value>>()?;
        Self::single_row(table, id, rows)
    }

    fn delete(&self, table: Table, id: &str) -> Result<()> {
        log::info!("delete {} {}", table, id);
        let response = self
            .authorized(self.client.delete(self.table_url(table)))
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=representation")
            .send()?;
        let rows = check(response)?.json::<Vec<Value>>()?;
        Self::single_row(table, id, rows).map(|_| ())
    }

    fn describe(&self) -> String {
        format!("supabase:{}", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn list_query_becomes_postgrest_params() {
        let q = Query::new()
            .eq("user_id", "abc")
            .eq("is_practiced", true)
            .order_desc("created_at")
            .limit(5);
        let params = query_params(&q);
        assert_eq!(
            params,
            vec![
                ("select".to_string(), "*".to_string()),
                ("user_id".to_string(), "eq.abc".to_string()),
                ("is_practiced".to_string(), "eq.true".to_string()),
                ("order".to_string(), "created_at.desc.nullslast".to_string()),
                ("limit".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn filter_literals_are_unquoted() {
        assert_eq!(filter_literal(&json!("2026-10-17")), "2026-10-17");
        assert_eq!(filter_literal(&json!(3)), "3");
        assert_eq!(filter_literal(&Value::Null), "null");
    }

    #[test]
    fn error_bodies_from_both_services_are_understood() {
        assert_eq!(
            api_message(r#"{"code":"42501","message":"permission denied"}"#).as_deref(),
            Some("permission denied")
        );
        assert_eq!(
            api_message(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#)
                .as_deref(),
            Some("Invalid login credentials")
        );
        assert_eq!(api_message("<html>"), None);
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let backend = RestBackend::new("https://example.supabase.co/", "anon", "token");
        assert_eq!(
            backend.table_url(Table::Tasks),
            "https://example.supabase.co/rest/v1/tasks"
        );
    }

    /// Answers one canned reply per connection on a loopback port and hands
    /// back each request it saw (request line, lowercased headers, body).
    fn serve(replies: Vec<(u16, &'static str)>) -> (String, thread::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let mut seen = Vec::new();
            for (status, body) in replies {
                let (stream, _) = listener.accept().unwrap();
                let mut reader = BufReader::new(stream);
                let mut request = String::new();
                let mut length = 0;
                loop {
                    let mut line = String::new();
                    reader.read_line(&mut line).unwrap();
                    if line == "\r\n" || line.is_empty() {
                        break;
                    }
                    let line = line.to_lowercase();
                    if let Some(v) = line.strip_prefix("content-length:") {
                        length = v.trim().parse().unwrap();
                    }
                    request.push_str(&line);
                }
                let mut payload = vec![0; length];
                reader.read_exact(&mut payload).unwrap();
                request.push_str(&String::from_utf8(payload).unwrap());
                seen.push(request);

                let reply = format!(
                    "HTTP/1.1 {} Reply\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                reader.get_mut().write_all(reply.as_bytes()).unwrap();
            }
            seen
        });
        (url, handle)
    }

    #[test]
    fn insert_sends_the_row_and_returns_the_stored_one() {
        let (url, server) = serve(vec![(201, r#"[{"id":"t1","title":"Morning yoga"}]"#)]);
        let backend = RestBackend::new(&url, "anon", "token");

        let row = backend.insert(Table::Tasks, json!({"title": "Morning yoga"})).unwrap();
        assert_eq!(row["id"], "t1");

        let seen = server.join().unwrap();
        assert!(seen[0].starts_with("post /rest/v1/tasks "));
        assert!(seen[0].contains("authorization: bearer token"));
        assert!(seen[0].contains("prefer: return=representation"));
        assert!(seen[0].contains("morning yoga"));
    }

    #[test]
    fn update_and_delete_of_a_missing_row_are_not_found() {
        let (url, server) = serve(vec![(200, "[]"), (200, "[]")]);
        let backend = RestBackend::new(&url, "anon", "token");

        let err = backend.update(Table::Inspirations, "gone", json!({"is_practiced": true})).unwrap_err();
        assert!(matches!(err, Error::NotFound { ref id, .. } if id == "gone"));
        let err = backend.delete(Table::DiaryEntries, "gone").unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));

        let seen = server.join().unwrap();
        assert!(seen[0].starts_with("patch /rest/v1/inspirations?id=eq.gone "));
        assert!(seen[1].starts_with("delete /rest/v1/diary_entries?id=eq.gone "));
    }

    #[test]
    fn failed_responses_carry_the_server_message() {
        let (url, server) = serve(vec![
            (403, r#"{"code":"42501","message":"permission denied for table tasks"}"#),
            (401, "unauthorized"),
        ]);
        let backend = RestBackend::new(&url, "anon", "expired");

        let err = backend.delete(Table::Tasks, "t1").unwrap_err();
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "permission denied for table tasks");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        let err = backend.select(Table::Tasks, &Query::new().eq("user_id", "u1")).unwrap_err();
        assert!(matches!(err, Error::Api { status: 401, ref message } if message == "unauthorized"));
        server.join().unwrap();
    }
}
