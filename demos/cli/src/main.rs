use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use reader_core::ReaderConfig;
use reader_feed::FeedClient;

#[derive(Parser, Debug)]
#[command(
    name = "reader-cli",
    about = "Tải và tóm tắt các RSS feed như trang đọc tin."
)]
struct Args {
    /// URL của feed, lặp lại tham số để đọc nhiều nguồn.
    #[arg(short, long = "url", required = true)]
    urls: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mut client = FeedClient::new(ReaderConfig::default());

    let now = Utc::now();
    let mut fetched = 0usize;
    for url in &args.urls {
        // Feed hỏng chỉ bị bỏ qua, các feed còn lại vẫn hiển thị.
        let snapshot = match client.fetch(url).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::warn!("Bỏ qua feed {}: {}", url, err);
                continue;
            }
        };

        println!(
            "{} ({} entries, fetched {})",
            snapshot.title,
            snapshot.entries().len(),
            snapshot.last_updated.format("%Y-%m-%d %H:%M")
        );
        for entry in snapshot.entries() {
            println!("  - {} [{}]", entry.title, entry.published.relative_label(now));
        }
        fetched += 1;
    }

    if fetched == 0 {
        anyhow::bail!("Không đọc được feed nào");
    }

    Ok(())
}
