use std::io;

use anyhow::bail;
use clap::Parser;
use posts_core::{
    ClientConfig, Post, PostChanges, PostsApi, PostsClient, PostsView, Submit, UreqTransport,
};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};

mod cli;

fn main() -> Result<(), anyhow::Error> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    // an empty --base-url / env value means "use the configured default"
    let base_url = match cli.base_url.filter(|url| !url.trim().is_empty()) {
        Some(url) => url,
        None => ClientConfig::from_env().base_url,
    };
    tracing::debug!(%base_url, "using posts API");
    let api = PostsApi::new(PostsClient::new(&base_url), UreqTransport::new());

    match cli.command {
        Command::List => {
            let mut view = PostsView::new(api);
            view.mount();
            print!("{}", view.render());
            if let Some(error) = view.error() {
                bail!("{error}");
            }
        }
        Command::Create { title, content } => {
            let mut view = PostsView::new(api);
            view.mount();
            view.set_title(title);
            view.set_content(content);
            let outcome = view.submit();
            print!("{}", view.render());
            match outcome {
                Submit::Created(post) => println!("created #{}", post.id),
                Submit::Rejected => bail!("title must not be blank"),
                Submit::Failed => bail!("{}", view.error().unwrap_or("Error")),
            }
        }
        Command::Show { id } => print_post(&api.get_post(id)?),
        Command::Update { id, title, content } => {
            if title.is_none() && content.is_none() {
                bail!("nothing to update: pass --title and/or --content");
            }
            print_post(&api.update_post(id, &PostChanges { title, content })?);
        }
        Command::Delete { id } => {
            api.delete_post(id)?;
            println!("deleted #{id}");
        }
    }
    Ok(())
}

fn print_post(post: &Post) {
    println!("#{} {}", post.id, post.title);
    println!("created {}  updated {}", post.created_at, post.updated_at);
    if let Some(content) = post.content.as_deref().filter(|c| !c.is_empty()) {
        println!();
        println!("{content}");
    }
}
