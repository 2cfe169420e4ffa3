use tokio::io::BufReader;
use tracing::info;

use tablebook::config::EngineConfig;
use tablebook::console::{Console, OutputFormat};
use tablebook::engine::BookingRegistry;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout belongs to the console
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let metrics_port: Option<u16> = std::env::var("TABLEBOOK_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse().ok());
    tablebook::observability::init(metrics_port)?;

    let format = std::env::var("TABLEBOOK_OUTPUT")
        .ok()
        .and_then(|s| OutputFormat::parse(&s))
        .unwrap_or_default();

    let config = EngineConfig::from_env();
    let registry = BookingRegistry::new(&config)?;
    info!("  window: {}", registry.window());
    info!("  tables: {} standard, {} premium", config.standard_tables, config.premium_tables);
    info!("  reservation cap: {}", registry.reservation_cap());
    info!("  output: {format:?}");
    let metrics = metrics_port.map_or("disabled".to_string(), |p| {
        format!("http://0.0.0.0:{p}/metrics")
    });
    info!("  metrics: {metrics}");

    let mut console = Console::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout(), format);
    tokio::select! {
        result = console.run(&registry) => result?,
        _ = tokio::signal::ctrl_c() => info!("interrupted"),
    }

    info!(
        "tablebook stopped with {} active reservations",
        registry.reservation_count().await
    );
    Ok(())
}
