//! Invoice bot binary.
//!
//! Start the bot with:
//! ```bash
//! TELEGRAM_BOT_TOKEN=xxx MONGO_URI=mongodb://localhost:27017 cargo run -p invoice-telegram
//! ```

use clap::Parser;
use invoice_core::BotConfig;
use invoice_telegram::InvoiceBot;
use tracing_subscriber::EnvFilter;

/// Invoice bot - track client invoices posted in a Telegram group
#[derive(Parser, Debug)]
#[command(name = "invoice-telegram")]
#[command(about = "Telegram bot that tracks invoices and reports daily totals")]
struct Args {
    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());

    let filter = match args.verbose {
        0 => "invoice_telegram=info,invoice_core=info,invoice_store=info,teloxide=warn",
        1 => "invoice_telegram=debug,invoice_core=debug,invoice_store=debug,teloxide=info",
        2 => "invoice_telegram=trace,invoice_core=trace,invoice_store=trace,teloxide=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = BotConfig::from_env()?;
    tracing::info!(
        timezone = %config.timezone,
        privileged = config.privileged_users.len(),
        allowed_chat = ?config.allowed_chat_id,
        "Configuration loaded"
    );

    let bot = InvoiceBot::connect(config).await?;

    match bot.get_me().await {
        Ok(username) => {
            tracing::info!(username = %username, "Bot initialized successfully");
            println!("\n[robot] Invoice Bot");
            println!("   Bot: @{}", username);
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to get bot info");
            return Err(e.into());
        }
    }

    println!("   Press Ctrl+C to stop\n");

    bot.run().await?;

    Ok(())
}
