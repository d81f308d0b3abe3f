use anyhow::Result;
use clap::{Parser, Subcommand};
use mealdrop::config::Config;
use mealdrop_delivery::{Assigner, Cadence, Ledger, Query, calculate_end_date, extend_end_date};
use mealdrop_shared::date::{self, DateRange};
use sqlx::{SqlitePool, migrate::MigrateDatabase, sqlite::SqlitePoolOptions};

/// mealdrop - recurring meal-delivery subscriptions
#[derive(Parser)]
#[command(name = "mealdrop")]
#[command(about = "Delivery schedule and credit-day ledger", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Skip delivery days for a client, crediting one day per skip
    Cancel {
        #[arg(long)]
        client: String,
        #[arg(long)]
        order: String,
        /// Delivery dates (YYYY-MM-DD), comma separated
        #[arg(long, value_delimiter = ',')]
        dates: Vec<String>,
    },
    /// Restore a previously skipped delivery day
    Restore {
        #[arg(long)]
        client: String,
        #[arg(long)]
        order: String,
        /// Delivery date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
    },
    /// List a client's skipped delivery days
    Skipped {
        #[arg(long)]
        client: String,
    },
    /// List clients still missing a meal selection per delivery day
    Pending {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    /// Write the default meal selection for every pending client
    Autofill {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        /// Overrides the configured default meal
        #[arg(long)]
        meal: Option<String>,
    },
    /// Recompute a subscription end date from its parameters
    EndDate {
        /// Start date (YYYY-MM-DD, or legacy DD.MM.YYYY)
        #[arg(long)]
        start: String,
        /// Deliveries per week (5 or 6)
        #[arg(long)]
        cadence: i64,
        /// Number of purchased delivery days
        #[arg(long)]
        days: u32,
        /// Accrued credit days to add on top
        #[arg(long, default_value_t = 0)]
        credit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    init_tracing(&config.observability.log_level)?;

    match cli.command {
        Commands::Migrate => migrate_command(config).await,
        Commands::Reset => reset_command(config).await,
        Commands::Cancel {
            client,
            order,
            dates,
        } => cancel_command(config, client, order, dates).await,
        Commands::Restore {
            client,
            order,
            date,
        } => restore_command(config, client, order, date).await,
        Commands::Skipped { client } => skipped_command(config, client).await,
        Commands::Pending { from, to } => pending_command(config, from, to).await,
        Commands::Autofill { from, to, meal } => autofill_command(config, from, to, meal).await,
        Commands::EndDate {
            start,
            cadence,
            days,
            credit,
        } => end_date_command(start, cadence, days, credit),
    }
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))?;

    tracing_subscriber::fmt().with_env_filter(filter).init();

    Ok(())
}

fn parse_range(from: &str, to: &str) -> Result<DateRange> {
    Ok(DateRange::new(date::parse_iso(from)?, date::parse_iso(to)?))
}

async fn connect(config: &Config) -> Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await?;

    Ok(pool)
}

#[tracing::instrument(skip(config))]
async fn migrate_command(config: Config) -> Result<()> {
    if !sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::info!("Database does not exist, creating: {}", config.database.url);
        sqlx::Sqlite::create_database(&config.database.url).await?;
    }

    let pool = connect(&config).await?;
    mealdrop_db::migrate(&pool).await?;

    tracing::info!("Migrations completed successfully");

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn reset_command(config: Config) -> Result<()> {
    if sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::warn!("Dropping existing database: {}", config.database.url);
        sqlx::Sqlite::drop_database(&config.database.url).await?;
    }

    migrate_command(config).await
}

async fn cancel_command(
    config: Config,
    client: String,
    order: String,
    dates: Vec<String>,
) -> Result<()> {
    let pool = connect(&config).await?;
    let today = date::today_in(&config.delivery.timezone);

    let ledger = Ledger::new(pool);
    let outcome = ledger.cancel(&client, &order, &dates, today).await?;

    println!(
        "cancelled {} delivery days, subscription now ends {}",
        outcome.credit_days_added, outcome.end_date
    );

    Ok(())
}

async fn restore_command(
    config: Config,
    client: String,
    order: String,
    date_value: String,
) -> Result<()> {
    let pool = connect(&config).await?;
    let today = date::today_in(&config.delivery.timezone);

    let ledger = Ledger::new(pool);
    ledger.restore(&client, &order, &date_value, today).await?;

    println!("restored delivery on {date_value}");

    Ok(())
}

async fn skipped_command(config: Config, client: String) -> Result<()> {
    let pool = connect(&config).await?;

    let query = Query::new(pool);
    let records = query.cancellations(&client).await?;

    for record in &records {
        println!(
            "{}  credited={}  cancelled at {}",
            record.date, record.credit_applied, record.cancelled_at
        );
    }
    println!("{} days skipped", records.len());

    Ok(())
}

async fn pending_command(config: Config, from: String, to: String) -> Result<()> {
    let range = parse_range(&from, &to)?;
    let pool = connect(&config).await?;

    let assigner = Assigner::new(pool);
    let pending = assigner.pending(range).await?;

    for entry in &pending {
        println!(
            "{}  {}  {} ({})",
            entry.date, entry.client_name, entry.client_id, entry.order_id
        );
    }
    println!("{} selections pending", pending.len());

    Ok(())
}

async fn autofill_command(
    config: Config,
    from: String,
    to: String,
    meal: Option<String>,
) -> Result<()> {
    let range = parse_range(&from, &to)?;
    let meal = meal.unwrap_or_else(|| config.delivery.default_meal.clone());
    let pool = connect(&config).await?;

    let assigner = Assigner::new(pool);
    let written = assigner.auto_fill(range, &meal).await?;

    println!("auto-filled {written} selections with \"{meal}\"");

    Ok(())
}

fn end_date_command(start: String, cadence: i64, days: u32, credit: u32) -> Result<()> {
    let start = date::parse_client_date(&start)?;
    let Some(cadence) = Cadence::from_days(cadence) else {
        anyhow::bail!("cadence must be 5 or 6");
    };
    if days == 0 {
        anyhow::bail!("days must be at least 1");
    }

    let mut end = calculate_end_date(start, cadence, days);
    if credit > 0 {
        end = extend_end_date(end, cadence, credit);
    }

    println!("{end}");

    Ok(())
}
