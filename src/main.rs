use anyhow::Result;
use colored::Colorize;
use signal_desk::{alerts, config, format, logging, proxy_server, watcher, VmClient};
use std::sync::Arc;

/// Run proxy server mode
async fn run_server(port: u16) -> Result<()> {
    println!("{}", "=".repeat(60).blue());
    println!("{}", "Signal Desk Proxy".green().bold());
    println!("{}", "=".repeat(60).blue());
    println!();

    proxy_server::start_server(port).await
}

/// Run watch mode: poll the VM feeds and print snapshots until Ctrl-C
async fn run_watch() -> Result<()> {
    println!("{}", "=".repeat(60).blue());
    println!("{}", "Signal Desk Watch".green().bold());
    println!("{}", "=".repeat(60).blue());
    println!();

    let client = Arc::new(VmClient::from_env()?);
    let every = config::poll_interval();

    println!(
        "{} Polling {} every {}s (Ctrl-C to stop)",
        "→".cyan(),
        client.base_url().yellow(),
        every.as_secs()
    );
    println!();

    let alerts_feed = watcher::alerts_feed(Arc::clone(&client), every);
    let watchlist_feed = watcher::watchlist_feed(Arc::clone(&client), every);
    let trades_feed = watcher::trades_feed(Arc::clone(&client), every);
    let performance_feed = watcher::performance_feed(client, every);

    let mut ticker = tokio::time::interval(every);
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                print_alerts(&alerts_feed).await;
                print_watchlist(&watchlist_feed).await;
                print_trades(&trades_feed).await;
                print_performance(&performance_feed).await;
                println!();
            }
        }
    }

    alerts_feed.shutdown();
    watchlist_feed.shutdown();
    trades_feed.shutdown();
    performance_feed.shutdown();

    println!();
    println!("{} Feeds stopped", "✓".green());
    Ok(())
}

async fn print_alerts(feed: &watcher::Feed<Vec<signal_desk::RawAlert>>) {
    let snap = feed.snapshot().await;
    match (&snap.data, &snap.error) {
        (Some(alerts_list), None) => {
            println!("{} Alerts: {}", "✓".green(), alerts_list.len());
            for raw in alerts_list.iter().take(5) {
                let card = alerts::map_raw_to_card(raw);
                let tone = match card.tone {
                    alerts::Tone::Up => "UP".green(),
                    alerts::Tone::Down => "DOWN".red(),
                    alerts::Tone::Flat => "NEUTRAL".yellow(),
                };
                println!(
                    "    {} {} {} · target {} · 7d success {}",
                    card.symbol.bold(),
                    tone,
                    card.direction_text,
                    format::fmt_percent(card.forecast_pct.map(|v| v / 100.0)),
                    format::fmt_pair(raw.success7d_low, raw.success7d_high, true),
                );
            }
        }
        (Some(alerts_list), Some(err)) => {
            println!(
                "{} Alerts: {} (stale; last error: {})",
                "⚠".yellow(),
                alerts_list.len(),
                err
            );
        }
        (None, Some(err)) => println!("{} Alerts error: {}", "✗".red(), err),
        (None, None) => println!("{} Alerts: waiting for first poll...", "ℹ".blue()),
    }
}

async fn print_watchlist(feed: &watcher::Feed<signal_desk::WatchlistResp>) {
    let snap = feed.snapshot().await;
    match (&snap.data, &snap.error) {
        (Some(resp), None) => println!("{} Watchlist: {} symbols", "✓".green(), resp.items.len()),
        (_, Some(err)) => println!("{} Watchlist error: {}", "✗".red(), err),
        (None, None) => println!("{} Watchlist: waiting for first poll...", "ℹ".blue()),
    }
}

async fn print_trades(feed: &watcher::Feed<Vec<signal_desk::VmTrade>>) {
    let snap = feed.snapshot().await;
    match (&snap.data, &snap.error) {
        (Some(trades), None) => println!("{} Active trades: {}", "✓".green(), trades.len()),
        (_, Some(err)) => println!("{} Active trades error: {}", "✗".red(), err),
        (None, None) => println!("{} Active trades: waiting for first poll...", "ℹ".blue()),
    }
}

async fn print_performance(feed: &watcher::Feed<serde_json::Value>) {
    let snap = feed.snapshot().await;
    match (&snap.data, &snap.error) {
        (Some(body), None) => {
            let summary = body.get("summary").cloned().unwrap_or_default();
            println!("{} Performance: {}", "✓".green(), summary);
        }
        (_, Some(err)) => println!("{} Performance error: {}", "✗".red(), err),
        (None, None) => println!("{} Performance: waiting for first poll...", "ℹ".blue()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();

    let mode = config::execution_mode();
    let port = config::port();

    match mode.as_str() {
        "server" => run_server(port).await?,
        "watch" => run_watch().await?,
        _ => {
            eprintln!("Invalid mode '{}'. Use 'server' or 'watch'", mode);
            eprintln!("Set S97_MODE environment variable to control execution mode");
            eprintln!("Examples:");
            eprintln!("  S97_MODE=server S97_PORT=3000 cargo run   # Start proxy on port 3000");
            eprintln!("  S97_MODE=watch S97_POLL_SECS=15 cargo run # Poll VM feeds to console");
            std::process::exit(1);
        }
    }

    Ok(())
}
