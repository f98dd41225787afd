/// Main entry point for the cricket scorer
///
/// This serves as a thin wrapper that delegates to the interfaces layer.
/// The actual application logic is implemented in `interfaces::cli`.

use cricket_scorer::interfaces::cli;

#[tokio::main]
async fn main() {
    if let Err(err) = cli::run().await {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}
