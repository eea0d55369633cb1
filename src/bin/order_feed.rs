//! Order Feed - writes synthetic orders as JSON lines to stdout
//!
//! Pipe it into the service to exercise the ingestion path:
//!
//! ```text
//! order_feed --count 100 --interval-ms 50 | order_cache
//! ```

use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use order_cache::models::generate_order;

#[derive(Parser, Debug)]
#[command(name = "order_feed")]
#[command(about = "Emit synthetic orders as newline-delimited JSON")]
struct Args {
    /// Number of orders to emit
    #[arg(long, default_value_t = 10)]
    count: usize,

    /// Pause between orders in milliseconds
    #[arg(long, default_value_t = 0)]
    interval_ms: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the orders
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "order_feed=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let mut out = BufWriter::new(tokio::io::stdout());

    for _ in 0..args.count {
        let order = generate_order();
        let mut line = serde_json::to_vec(&order).context("encoding order")?;
        line.push(b'\n');
        out.write_all(&line).await.context("writing order")?;

        if args.interval_ms > 0 {
            out.flush().await.context("flushing stdout")?;
            tokio::time::sleep(Duration::from_millis(args.interval_ms)).await;
        }
    }

    out.flush().await.context("flushing stdout")?;
    info!(count = args.count, "Orders emitted");
    Ok(())
}
