//! Interactive terminal client for the moonshot stock search
//!
//! Each plain input line is treated as the current search text (the debounce
//! still applies, so pasting quick successive lines coalesces); `/more`
//! stands in for the viewport sensor reporting that the last rendered item
//! became visible.
//!
//! # Usage
//!
//! ```bash
//! moonshot --base-url http://localhost:8080 --page-size 100
//! ```

mod ranking;
mod render;

use anyhow::Context;
use clap::Parser;
use moonshot_search::{
    CatalogClient, PredictionClient, SearchConfig, SearchController, SessionHandle,
    SessionSnapshot, StockItem,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::warn;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "moonshot")]
#[command(about = "Incremental stock search with surge prediction", long_about = None)]
struct Args {
    /// Base URL of the stock service
    #[arg(long, default_value = "http://localhost:8080")]
    base_url: String,

    /// Results requested per page
    #[arg(long, default_value_t = 100)]
    page_size: usize,

    /// Debounce quiet interval in milliseconds
    #[arg(long, default_value_t = 500)]
    debounce_ms: u64,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,
}

/// Initialize tracing subscriber with default configuration
fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn print_banner() {
    println!("🚀 떡상 — 주식 검색 & 예측");
    println!("검색어를 입력하면 종목을 찾습니다. /help 로 명령어를 확인하세요.");
}

fn print_help() {
    println!("  <검색어>     종목코드 또는 주식명으로 검색");
    println!("  /more        다음 페이지 불러오기");
    println!("  /select <n>  결과에서 n번째 종목 선택 (예측 표시)");
    println!("  /predict     선택한 종목의 예측 다시 보기");
    println!("  /clear       선택 해제");
    println!("  /rank        가장 많이 예측한 주식 순위");
    println!("  /quit        종료");
}

/// Wait until the session finishes reacting to the last input.
///
/// The controller publishes a snapshot after every event; a fetch shows up
/// as a `loading` snapshot followed by a settled one. `grace` bounds how
/// long we wait for the loading phase to begin at all (it never does for a
/// blank query, an exhausted list, or a duplicate trigger).
async fn settled_snapshot(
    snapshots: &mut watch::Receiver<SessionSnapshot>,
    grace: Duration,
) -> SessionSnapshot {
    let loading_seen = tokio::time::timeout(grace, async {
        loop {
            if snapshots.changed().await.is_err() {
                return false;
            }
            if snapshots.borrow().loading {
                return true;
            }
        }
    })
    .await
    .unwrap_or(false);

    if loading_seen {
        while snapshots.borrow().loading {
            if snapshots.changed().await.is_err() {
                break;
            }
        }
    }
    let snapshot = snapshots.borrow().clone();
    snapshots.mark_unchanged();
    snapshot
}

async fn show_prediction(prediction: &PredictionClient, stock: &StockItem) {
    println!("🔍 예측을 불러오는 중...");
    match prediction.fetch(stock).await {
        Ok(result) => render::print_prediction(stock, &result),
        Err(err) => {
            warn!(stock_id = %stock.stock_id, error = %err, "prediction fetch failed");
            println!("예측 결과를 불러올 수 없습니다.");
        },
    }
}

async fn select_index(
    index_arg: &str,
    snapshot: &SessionSnapshot,
    handle: &SessionHandle,
    prediction: &PredictionClient,
) {
    let Ok(index) = index_arg.trim().parse::<usize>() else {
        println!("사용법: /select <번호>");
        return;
    };
    let Some(stock) = index.checked_sub(1).and_then(|i| snapshot.results.get(i)) else {
        println!("{index}번 결과가 없습니다.");
        return;
    };

    handle.select(stock.clone());
    show_prediction(prediction, stock).await;
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();
    let config = SearchConfig::builder()
        .base_url(args.base_url)
        .page_size(args.page_size)
        .debounce(Duration::from_millis(args.debounce_ms))
        .request_timeout(Duration::from_secs(args.timeout_secs))
        .build();
    config.validate().context("invalid configuration")?;

    let catalog = Arc::new(CatalogClient::new(&config)?);
    let prediction = PredictionClient::new(&config)?;
    let (controller, handle, mut snapshots) = SearchController::new(&config, catalog);
    let controller_task = tokio::spawn(controller.run());

    print_banner();

    // Waiting for a fetch to start means waiting out the debounce first.
    let fetch_grace = config.debounce + Duration::from_millis(200);
    let trigger_grace = Duration::from_millis(200);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            // Emptying the search box clears the list right away, no
            // debounce wait and no fetch.
            "" => {
                handle.query_changed("");
                let snapshot = settled_snapshot(&mut snapshots, trigger_grace).await;
                render::print_results(&snapshot);
            },
            "/quit" | "/exit" => break,
            "/help" => print_help(),
            "/rank" => render::print_ranking(&ranking::most_predicted()),
            "/clear" => {
                handle.clear_selection();
                println!("선택을 해제했습니다.");
            },
            "/more" => {
                handle.end_of_list_visible();
                let snapshot = settled_snapshot(&mut snapshots, trigger_grace).await;
                render::print_results(&snapshot);
            },
            "/predict" => {
                let selection = snapshots.borrow().selection.clone();
                match selection {
                    Some(stock) => show_prediction(&prediction, &stock).await,
                    None => println!("먼저 /select 로 종목을 선택하세요."),
                }
            },
            _ if line.starts_with("/select") => {
                let snapshot = snapshots.borrow().clone();
                let index_arg = line.trim_start_matches("/select");
                select_index(index_arg, &snapshot, &handle, &prediction).await;
            },
            query => {
                handle.query_changed(query);
                let snapshot = settled_snapshot(&mut snapshots, fetch_grace).await;
                render::print_results(&snapshot);
            },
        }
    }

    handle.shutdown();
    controller_task.await?;
    Ok(())
}
