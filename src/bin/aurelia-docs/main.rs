use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use spdlog::{info, warn};

use aurelia_docs::config::Config;
use aurelia_docs::draft::create_draft;
use aurelia_docs::logger::configure_logger;
use aurelia_docs::publish::publish_blog;

use crate::config::open_config;

mod config;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path. Defaults to aurelia-docs.toml in the current dir, the
    /// executable dir or the user config dir
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Blog posts
    #[command(subcommand)]
    Blog(BlogCommand),
}

#[derive(Subcommand, Debug)]
enum BlogCommand {
    /// Publishes drafts and rebuilds the index and the feed
    Publish(PublishArgs),
    /// Republishes already published posts and rebuilds the index and the feed
    Update(PublishArgs),
    /// Creates a new draft
    New(NewArgs),
}

#[derive(Parser, Debug)]
struct PublishArgs {
    /// File name of the post inside the source folder
    #[arg(required_unless_present = "all", conflicts_with = "all")]
    file: Option<String>,

    /// Publishes every post of the source folder
    #[arg(long)]
    all: bool,

    /// Keeps the stored update date instead of setting it to now
    #[arg(long)]
    no_date: bool,
}

impl PublishArgs {
    /// Positional form understood by `publish_blog`.
    fn to_args(&self) -> Vec<String> {
        let mut args = vec![];
        match self.file {
            Some(ref file) if !self.all => args.push(file.clone()),
            _ => args.push("--all".to_string()),
        }
        if self.no_date {
            args.push("--no-date".to_string());
        }
        args
    }
}

#[derive(Parser, Debug)]
struct NewArgs {
    /// Title of the post
    #[arg(short, long)]
    title: String,

    /// Name of the author. If empty, OS user real name is being used
    #[arg(short, long)]
    author: Option<String>,
}

async fn run_publish(config: &Config, update: bool, args: PublishArgs) -> Result<()> {
    let written = publish_blog(config, update, &args.to_args()).await?;
    for page in written {
        println!("{}", page.display());
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = open_config(args.config)?;

    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }

    info!("Starting aurelia-docs =-=-=-=-=-=-=-=-=-=-=-=-=-=-=-");

    match args.command {
        Command::Blog(BlogCommand::Publish(args)) => run_publish(&config, false, args).await,
        Command::Blog(BlogCommand::Update(args)) => run_publish(&config, true, args).await,
        Command::Blog(BlogCommand::New(args)) => {
            let path = create_draft(&config, &args.title, args.author.as_deref()).await?;
            println!("Created {}", path.display());
            Ok(())
        }
    }
}
