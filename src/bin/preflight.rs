use restaurant_board::infra::{config, telemetry};
use restaurant_board::transport::http::AppState;
use restaurant_board::{AppConfig, LoadOutcome};

fn usage_and_exit() -> ! {
    eprintln!(
        "Usage: cargo run --bin preflight -- [--init-if-missing]\n\
         \n\
         Reads env vars (all optional):\n\
           BIND_ADDR, DATA_DIR, PUBLIC_DIR, LOG_FORMAT\n\
         Checks that restaurants.json and comments.json under DATA_DIR parse.\n"
    );
    std::process::exit(2);
}

fn report(name: &str, location: &str, outcome: &LoadOutcome) {
    match outcome {
        LoadOutcome::Corrupt { reason } => println!("  {name}: CORRUPT ({location}): {reason}"),
        LoadOutcome::Partial { .. } => {
            println!("  {name}: {outcome} ({location})");
            eprintln!("  Warning: {name} has unreadable records; they are kept but not served.");
        }
        _ => println!("  {name}: {outcome} ({location})"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    telemetry::init_tracing(config::log_format());

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        usage_and_exit();
    }
    let init_if_missing = args.iter().any(|a| a == "--init-if-missing");

    let config = AppConfig::from_env()?;
    println!("> Preflight:");
    println!("  BIND_ADDR={}", config.bind_addr);
    println!("  DATA_DIR={}", config.data_dir.display());
    println!("  PUBLIC_DIR={}", config.public_dir.display());
    if !config.public_dir.is_dir() {
        eprintln!("  Warning: public dir does not exist; static files will 404.");
    }

    let state = AppState::from_config(&config);
    if init_if_missing {
        state.ensure_documents().await?;
    }

    let (_, restaurants) = state.restaurants.load_with_outcome().await;
    let (_, guestbook) = state.guestbook.load_with_outcome().await;
    report("restaurants", &state.restaurants.documents().describe(), &restaurants);
    report("guestbook", &state.guestbook.documents().describe(), &guestbook);

    if restaurants.is_corrupt() || guestbook.is_corrupt() {
        return Err(anyhow::anyhow!(
            "a document is corrupt; the server would serve it as empty and replace it on write"
        ));
    }
    let missing = restaurants == LoadOutcome::Missing || guestbook == LoadOutcome::Missing;
    if !init_if_missing && missing {
        println!("  Missing documents are created on startup, or re-run with --init-if-missing.");
    }

    println!("> Preflight OK.");
    Ok(())
}
