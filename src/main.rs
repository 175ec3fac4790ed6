mod config;
mod error;
mod images;
mod parser;
mod posts;
mod types;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::{
    config::{CheckOptions, Command},
    images::{ImageChecker, render_line},
    posts::PostsClient,
};

const HELP: &str = "
    posts-fetcher

    USAGE:
    posts-fetcher [posts] [--compact]
    posts-fetcher check-images [OPTIONS] FILE

    FLAGS:
    -h, --help            Prints help information
    --compact             Prints the posts JSON on a single line

    CHECK-IMAGES OPTIONS:
    --delay-ms NUMBER     Pause between image requests (default 100)
    --timeout-secs NUMBER Per-request timeout (default 5)
    --json                Prints the report as JSON

    FILE lists one image per line, either URL or PROPERTY_ID,IMAGE_ID,URL.

    ENVIRONMENT:
    API_URL               API base URL (read from the environment or .env)
    RUST_LOG              Log filter (default posts_fetcher=info)
";

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let mut arguments = pico_args::Arguments::from_env();
    if arguments.contains(["-h", "--help"]) {
        print!("{}", HELP);
        std::process::exit(0);
    }

    let app_config = parser::parse_arguments_and_env_vars(arguments)?;
    init_tracing();

    match &app_config.command {
        Command::Posts { compact } => {
            let client = PostsClient::from_config(&app_config);
            let posts = client
                .fetch_posts()
                .await
                .with_context(|| format!("Error while fetching posts from {}", client.endpoint()))?;

            let out = if *compact {
                serde_json::to_string(&posts)?
            } else {
                serde_json::to_string_pretty(&posts)?
            };
            println!("{out}");
        }
        Command::CheckImages(options) => check_images(options).await?,
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn check_images(options: &CheckOptions) -> Result<(), anyhow::Error> {
    let text = tokio::fs::read_to_string(&options.file)
        .await
        .with_context(|| format!("Error reading image list {}", options.file.display()))?;
    let images = images::parse_image_list(&text)?;

    if !options.json {
        println!("Checking all property images for 404 errors...\n");
    }

    let checker = ImageChecker::new(options.timeout, options.delay)?;
    let report = checker
        .check_images(images, |idx, image, status| {
            if !options.json {
                print!("{}", render_line(idx, image, status));
            }
        })
        .await;
    tracing::info!(
        total = report.total(),
        broken = report.broken().count(),
        "image check finished"
    );

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_summary());
    }

    Ok(())
}
