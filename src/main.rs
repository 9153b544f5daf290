use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use cryptex::core::log::init_logging;
use cryptex::core::record::PurchaseDraft;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct PurchaseArgs {
    /// Asset id, e.g. "bitcoin" (see `cryptex assets`)
    #[arg(short, long)]
    asset: String,

    /// Fiat amount invested
    #[arg(long)]
    amount: String,

    /// Target sell ceiling
    #[arg(long)]
    high: String,

    /// Target sell floor
    #[arg(long)]
    low: String,

    /// Estimated proximity to market, 0-100
    #[arg(long)]
    percent: String,

    /// Planned holding time in days
    #[arg(long)]
    days: String,

    /// Free-form notes
    #[arg(long, default_value = "")]
    notes: String,
}

impl From<PurchaseArgs> for PurchaseDraft {
    fn from(args: PurchaseArgs) -> PurchaseDraft {
        PurchaseDraft {
            asset_id: args.asset,
            investment_amount: args.amount,
            highest_selling_price: args.high,
            lowest_selling_price: args.low,
            percentage_to_market: args.percent,
            holding_time: args.days,
            notes: args.notes,
        }
    }
}

impl From<Commands> for cryptex::AppCommand {
    fn from(cmd: Commands) -> cryptex::AppCommand {
        match cmd {
            Commands::Assets { query } => cryptex::AppCommand::Assets { query },
            Commands::Quote { asset } => cryptex::AppCommand::Quote { asset_id: asset },
            Commands::Purchase(args) => cryptex::AppCommand::Purchase(args.into()),
            Commands::Review { query, values } => cryptex::AppCommand::Review {
                query,
                with_values: values,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List the assets that can be purchased
    Assets {
        /// Filter by name or id
        #[arg(default_value = "")]
        query: String,
    },
    /// Convert investment amounts typed on stdin into coin quantities
    Quote {
        /// Asset id, e.g. "bitcoin"
        asset: String,
    },
    /// Log a purchase at the current price
    Purchase(PurchaseArgs),
    /// List logged purchases
    Review {
        /// Only show purchases whose asset id contains this text
        #[arg(short, long, default_value = "")]
        query: String,

        /// Value each purchase at the current price
        #[arg(long)]
        values: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => cryptex::cli::setup::setup(),
        Some(cmd) => cryptex::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
