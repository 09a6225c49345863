//! Stateless HTTP request builder and response parser for the posts API.
//!
//! # Design
//! `PostsClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Executing the round-trip is left to a `Transport`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestOptions};
use crate::types::{NewPost, Post, PostChanges, PostEnvelope};

/// Headers sent with every request unless the caller overrides them.
const DEFAULT_HEADERS: [(&str, &str); 2] = [
    ("content-type", "application/json"),
    ("cache-control", "no-store"),
];

/// Synchronous, stateless client for the posts API.
#[derive(Debug, Clone)]
pub struct PostsClient {
    base_url: String,
}

impl PostsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a request for `path` (relative to the base URL).
    ///
    /// The default headers come first; a caller header with the same name
    /// replaces the default in place.
    pub fn build_request(&self, path: &str, options: RequestOptions) -> HttpRequest {
        let mut headers: Vec<(String, String)> = DEFAULT_HEADERS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for (name, value) in options.headers {
            match headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&name)) {
                Some(existing) => *existing = (name, value),
                None => headers.push((name, value)),
            }
        }
        HttpRequest {
            method: options.method,
            url: format!("{}{path}", self.base_url),
            headers,
            body: options.body,
        }
    }

    pub fn build_list_posts(&self) -> HttpRequest {
        self.build_request("/posts", RequestOptions::default())
    }

    pub fn build_get_post(&self, id: i64) -> HttpRequest {
        self.build_request(&format!("/posts/{id}"), RequestOptions::default())
    }

    pub fn build_create_post(&self, input: &NewPost) -> Result<HttpRequest, ApiError> {
        let body = envelope_body(input)?;
        Ok(self.build_request("/posts", RequestOptions::method(HttpMethod::Post).with_body(body)))
    }

    pub fn build_update_post(&self, id: i64, input: &PostChanges) -> Result<HttpRequest, ApiError> {
        let body = envelope_body(input)?;
        Ok(self.build_request(
            &format!("/posts/{id}"),
            RequestOptions::method(HttpMethod::Patch).with_body(body),
        ))
    }

    pub fn build_delete_post(&self, id: i64) -> HttpRequest {
        self.build_request(&format!("/posts/{id}"), RequestOptions::method(HttpMethod::Delete))
    }

    /// Parse any response.
    ///
    /// Non-2xx statuses become an `ApiError` via the error-body rules. A 204
    /// resolves to `None` without looking at the body; any other 2xx body is
    /// decoded as JSON into `T`.
    pub fn parse_response<T: DeserializeOwned>(
        &self,
        response: HttpResponse,
    ) -> Result<Option<T>, ApiError> {
        check_status(&response)?;
        if response.status == 204 {
            return Ok(None);
        }
        serde_json::from_str(&response.body)
            .map(Some)
            .map_err(|e| ApiError::new(format!("Invalid response body: {e}")))
    }

    pub fn parse_list_posts(&self, response: HttpResponse) -> Result<Vec<Post>, ApiError> {
        Ok(self.parse_response(response)?.unwrap_or_default())
    }

    pub fn parse_get_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        self.parse_response(response)?.ok_or_else(missing_post)
    }

    pub fn parse_create_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        self.parse_response(response)?.ok_or_else(missing_post)
    }

    pub fn parse_update_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        self.parse_response(response)?.ok_or_else(missing_post)
    }

    /// Any 2xx is accepted; a body, if present, is ignored.
    pub fn parse_delete_post(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

fn envelope_body<T: Serialize>(post: &T) -> Result<String, ApiError> {
    serde_json::to_string(&PostEnvelope { post })
        .map_err(|e| ApiError::new(format!("Invalid request body: {e}")))
}

fn missing_post() -> ApiError {
    ApiError::new("Request failed: 204 (expected a post)")
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::from_status(response.status, &response.body))
}

#[cfg(test)]
mod tests {
    use super::*;

    const POST_JSON: &str = r#"{"id":1,"title":"Hello","content":null,"created_at":"2024-01-01T00:00:00.000Z","updated_at":"2024-01-01T00:00:00.000Z"}"#;

    fn client() -> PostsClient {
        PostsClient::new("http://localhost:3001")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.to_string(),
        }
    }

    #[test]
    fn build_list_posts_produces_correct_request() {
        let req = client().build_list_posts();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3001/posts");
        assert!(req.body.is_none());
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert_eq!(req.header("cache-control"), Some("no-store"));
    }

    #[test]
    fn build_get_post_produces_correct_request() {
        let req = client().build_get_post(42);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3001/posts/42");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_create_post_wraps_payload_in_envelope() {
        let input = NewPost {
            title: "Hello".to_string(),
            content: Some("World".to_string()),
        };
        let req = client().build_create_post(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3001/posts");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"post": {"title": "Hello", "content": "World"}}));
    }

    #[test]
    fn build_create_post_omits_missing_content() {
        let input = NewPost {
            title: "Hello".to_string(),
            content: None,
        };
        let req = client().build_create_post(&input).unwrap();
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert!(body["post"].get("content").is_none());
    }

    #[test]
    fn build_update_post_sends_partial_payload() {
        let input = PostChanges {
            title: None,
            content: Some("Edited".to_string()),
        };
        let req = client().build_update_post(7, &input).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.url, "http://localhost:3001/posts/7");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"post": {"content": "Edited"}}));
    }

    #[test]
    fn build_delete_post_produces_correct_request() {
        let req = client().build_delete_post(7);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:3001/posts/7");
        assert!(req.body.is_none());
    }

    #[test]
    fn caller_headers_override_defaults() {
        let options = RequestOptions::default()
            .with_header("Content-Type", "text/plain")
            .with_header("x-request-id", "abc");
        let req = client().build_request("/posts", options);
        assert_eq!(req.headers.len(), 3);
        assert_eq!(req.header("content-type"), Some("text/plain"));
        assert_eq!(req.header("x-request-id"), Some("abc"));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = PostsClient::new("http://localhost:3001/");
        assert_eq!(client.build_list_posts().url, "http://localhost:3001/posts");
    }

    #[test]
    fn parse_list_posts_success() {
        let posts = client()
            .parse_list_posts(response(200, &format!("[{POST_JSON}]")))
            .unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Hello");
        assert_eq!(posts[0].content, None);
    }

    #[test]
    fn parse_create_post_accepts_201() {
        let post = client().parse_create_post(response(201, POST_JSON)).unwrap();
        assert_eq!(post.id, 1);
    }

    #[test]
    fn parse_get_post_not_found_uses_error_field() {
        let err = client()
            .parse_get_post(response(404, r#"{"error":"Post not found"}"#))
            .unwrap_err();
        assert_eq!(err.message(), "Post not found");
    }

    #[test]
    fn parse_create_post_validation_errors_are_joined() {
        let err = client()
            .parse_create_post(response(422, r#"{"errors":["Title can't be blank","Title is too short"]}"#))
            .unwrap_err();
        assert_eq!(err.message(), "Title can't be blank, Title is too short");
    }

    #[test]
    fn parse_response_204_skips_the_body() {
        // the body is not JSON; a 204 must never try to decode it
        let parsed: Option<Post> = client().parse_response(response(204, "not json")).unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn parse_delete_post_success() {
        assert!(client().parse_delete_post(response(204, "")).is_ok());
    }

    #[test]
    fn parse_delete_post_without_body_falls_back_to_status() {
        let err = client().parse_delete_post(response(500, "")).unwrap_err();
        assert_eq!(err.message(), "Request failed: 500");
    }

    #[test]
    fn parse_list_posts_bad_json() {
        let err = client().parse_list_posts(response(200, "not json")).unwrap_err();
        assert!(err.message().starts_with("Invalid response body"));
    }

    #[test]
    fn parse_get_post_204_is_an_error() {
        let err = client().parse_get_post(response(204, "")).unwrap_err();
        assert!(err.message().contains("204"));
    }
}
