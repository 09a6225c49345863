//! Listing/creation view as a headless state machine.
//!
//! # Design
//! `PostsView` keeps no authoritative copy of the data: after every
//! successful mutation it re-fetches the whole list. The only local state is
//! what a form needs (inputs, busy flag, last error message). Rendering is
//! plain text so any front-end can print it.

use std::fmt::Write;

use tracing::debug;

use crate::api::PostsApi;
use crate::error::ApiError;
use crate::transport::Transport;
use crate::types::{NewPost, Post};

/// Outcome of `PostsView::submit`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submit {
    /// Nothing was sent: the title is blank after trimming.
    Rejected,
    Created(Post),
    /// The create call failed; the message is in `PostsView::error`.
    Failed,
}

#[derive(Debug)]
pub struct PostsView<T> {
    api: PostsApi<T>,
    posts: Vec<Post>,
    title: String,
    content: String,
    busy: bool,
    error: Option<String>,
    mounted: bool,
}

impl<T: Transport> PostsView<T> {
    pub fn new(api: PostsApi<T>) -> Self {
        Self {
            api,
            posts: Vec::new(),
            title: String::new(),
            content: String::new(),
            busy: false,
            error: None,
            mounted: false,
        }
    }

    /// First display. Loads the list once; later calls do nothing.
    pub fn mount(&mut self) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.load();
    }

    /// Re-fetch the collection. On failure the previous collection is kept
    /// and the error message is stored.
    pub fn load(&mut self) {
        self.error = None;
        debug!("loading posts");
        match self.api.list_posts() {
            Ok(posts) => self.posts = posts,
            Err(e) => self.error = Some(display_message(&e)),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    /// Submit the creation form.
    pub fn submit(&mut self) -> Submit {
        let title = self.title.trim();
        if title.is_empty() {
            return Submit::Rejected;
        }
        let input = NewPost {
            title: title.to_string(),
            content: Some(self.content.clone()),
        };

        self.busy = true;
        self.error = None;
        debug!(title = %input.title, "creating post");
        let outcome = match self.api.create_post(&input) {
            Ok(post) => {
                self.title.clear();
                self.content.clear();
                self.load();
                Submit::Created(post)
            }
            Err(e) => {
                self.error = Some(display_message(&e));
                Submit::Failed
            }
        };
        self.busy = false;
        outcome
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Posts ({})", self.posts.len());
        if self.busy {
            let _ = writeln!(out, "Saving...");
        }
        if let Some(error) = &self.error {
            let _ = writeln!(out, "error: {error}");
        }
        for post in &self.posts {
            let _ = writeln!(out, "  #{} {}", post.id, post.title);
        }
        out
    }
}

/// The text shown for a failed action: the error's own message, or a
/// generic "Error" when it has none.
pub fn display_message(error: &ApiError) -> String {
    match error.message() {
        "" => "Error".to_string(),
        message => message.to_string(),
    }
}
