//! `PostsApi`: the client and a transport glued together.
//!
//! Each call builds the request, executes it once, and parses the response.
//! A failure is returned as-is; retrying is the caller's business.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::client::PostsClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, RequestOptions};
use crate::transport::Transport;
use crate::types::{NewPost, Post, PostChanges};

#[derive(Debug, Clone)]
pub struct PostsApi<T> {
    client: PostsClient,
    transport: T,
}

impl<T: Transport> PostsApi<T> {
    pub fn new(client: PostsClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &PostsClient {
        &self.client
    }

    /// Issue an arbitrary request. Resolves to `None` on 204.
    pub fn request<R: DeserializeOwned>(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Option<R>, ApiError> {
        let request = self.client.build_request(path, options);
        let response = self.execute(&request)?;
        self.logged(&request, self.client.parse_response(response))
    }

    pub fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
        let request = self.client.build_list_posts();
        let response = self.execute(&request)?;
        self.logged(&request, self.client.parse_list_posts(response))
    }

    pub fn get_post(&self, id: i64) -> Result<Post, ApiError> {
        let request = self.client.build_get_post(id);
        let response = self.execute(&request)?;
        self.logged(&request, self.client.parse_get_post(response))
    }

    pub fn create_post(&self, input: &NewPost) -> Result<Post, ApiError> {
        let request = self.client.build_create_post(input)?;
        let response = self.execute(&request)?;
        self.logged(&request, self.client.parse_create_post(response))
    }

    pub fn update_post(&self, id: i64, input: &PostChanges) -> Result<Post, ApiError> {
        let request = self.client.build_update_post(id, input)?;
        let response = self.execute(&request)?;
        self.logged(&request, self.client.parse_update_post(response))
    }

    pub fn delete_post(&self, id: i64) -> Result<(), ApiError> {
        let request = self.client.build_delete_post(id);
        let response = self.execute(&request)?;
        self.logged(&request, self.client.parse_delete_post(response))
    }

    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        let response = self.transport.execute(request).inspect_err(|e| {
            warn!(method = request.method.as_str(), url = %request.url, error = %e, "transport failure");
        })?;
        debug!(status = response.status, "received response");
        Ok(response)
    }

    fn logged<R>(&self, request: &HttpRequest, result: Result<R, ApiError>) -> Result<R, ApiError> {
        if let Err(e) = &result {
            warn!(method = request.method.as_str(), url = %request.url, error = %e, "request failed");
        }
        result
    }
}
