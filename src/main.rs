use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use webmark::{
    CrawlJob, PagePipeline, PageRecord,
    config::Config,
    fetcher::HttpFetcher,
};

const MAX_SLUG_LENGTH: usize = 60;

#[derive(Parser)]
#[command(name = "webmark", about = "Crawl a site and convert its articles to Markdown")]
struct Cli {
    /// Start URL; only pages on the same host are followed
    url: String,
    /// Stop after this many converted pages (default: WEBMARK_MAX_PAGES or 20)
    #[arg(short = 'n', long)]
    max_pages: Option<usize>,
    /// Write one .md file per page into this directory
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// Print the page records as JSON instead of a summary
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;

    let t0 = Instant::now();
    let max_pages = cli.max_pages.unwrap_or(config.crawl.max_pages);
    let mut job = CrawlJob::new(&cli.url, max_pages)?;
    let source = HttpFetcher::new(&config.fetch)?;
    let pipeline = PagePipeline::from_config(&config);

    job.run(&source, &pipeline).await;
    let visited = job.visited().len();
    let records = job.into_results();

    if let Some(dir) = &cli.out {
        write_pages(dir, &records)?;
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for record in &records {
            println!("{:>7} chars  {}  {}", record.length, record.url, record.title);
        }
        println!(
            "Converted {} of {} visited pages in {:.1}s",
            records.len(),
            visited,
            t0.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

fn write_pages(dir: &Path, records: &[PageRecord]) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    for (i, record) in records.iter().enumerate() {
        let path = dir.join(file_name(i + 1, &record.title));
        let contents = format!("<!-- {} -->\n\n{}\n", record.url, record.markdown);
        std::fs::write(&path, contents).with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

/// `NN-slug.md`, numbered in crawl order so names never collide.
fn file_name(index: usize, title: &str) -> String {
    let mut slug = String::new();
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug: String = slug.trim_end_matches('-').chars().take(MAX_SLUG_LENGTH).collect();
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        format!("{index:02}-page.md")
    } else {
        format!("{index:02}-{slug}.md")
    }
}
