use anyhow::{Context, Result};
use ca_admin_console::{
    config::Config,
    controller::{ApplyOutcome, RequestField},
    telemetry, AdminConsole,
};
use std::io::Read;
use tracing::{info, warn};

/// Request text as typed, without the line ending stdin adds
fn request_text(raw: &str) -> &str {
    raw.trim_end_matches(&['\r', '\n'][..])
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Pick up .env overrides before reading configuration
    dotenvy::dotenv().ok();

    // 2. Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // 3. Initialize telemetry
    telemetry::init_logging(&config)?;
    info!("Starting {} for instance {}", config.general.app_name, config.server.instance);

    // 4. Build the console over HTTP
    let console = AdminConsole::from_config(&config)?;

    // 5. Read the certificate request from stdin
    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read certificate request from stdin")?;

    // 6. Let the server parse it and fill the form
    match console.assistant().on_input_change(request_text(&input)).await? {
        ApplyOutcome::Applied(status) => info!("Parse result: {:?}", status),
        ApplyOutcome::ConnectionError => warn!("Server could not be reached"),
        ApplyOutcome::Superseded => warn!("Parse result superseded"),
    }

    let form = console.assistant().form();
    if form.message_visibility.is_shown() {
        println!("{}", form.message);
    }
    for field in RequestField::ALL {
        println!("{:<26}{}", field.label(), form.fields.get(field));
    }
    println!();

    // 7. Show what "send request" would present
    println!("{}", console.prepare_submission()?);

    if config.telemetry.enable_metrics {
        print!("\n{}", console.metrics().render()?);
    }

    Ok(())
}
