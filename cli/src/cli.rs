use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "posts", version, about = "Browse and edit posts on a posts API")]
pub struct Cli {
    /// Base URL of the posts API.
    #[arg(long, global = true, env = "POSTS_API_BASE_URL")]
    pub base_url: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the list of posts.
    List,
    /// Create a post, then show the refreshed list.
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    /// Show a single post.
    Show { id: i64 },
    /// Change the title and/or content of a post.
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a post.
    Delete { id: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn create_content_defaults_to_empty() {
        let cli = Cli::parse_from(["posts", "create", "--title", "Hi"]);
        match cli.command {
            Command::Create { title, content } => {
                assert_eq!(title, "Hi");
                assert_eq!(content, "");
            }
            _ => panic!("expected create"),
        }
    }

    #[test]
    fn base_url_flag_is_global() {
        let cli = Cli::parse_from(["posts", "show", "4", "--base-url", "http://api:9000"]);
        assert_eq!(cli.base_url.as_deref(), Some("http://api:9000"));
        assert!(matches!(cli.command, Command::Show { id: 4 }));
    }
}
