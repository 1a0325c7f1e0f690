use clap::{Parser, Subcommand};

mod commands;

use commands::ConnectionArgs;

#[derive(Parser)]
#[command(
    name = "omni",
    about = "CRUD against the OMNIbus ObjectServer REST API",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Log requests and schema cache activity to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select rows (GET)
    Get {
        /// Table as database/table, e.g. alerts/status
        path: String,
        /// WHERE clause, e.g. "Severity > 3"
        #[arg(short, long, default_value = "")]
        filter: String,
        /// Columns to return, comma separated
        #[arg(short, long, value_delimiter = ',')]
        columns: Vec<String>,
    },
    /// Insert one row (POST).
    ///
    /// Column types are looked up in the catalog on first use of a table
    /// and cached under --cache-dir.
    Insert {
        path: String,
        /// Column value as COLUMN=VALUE; repeatable
        #[arg(short, long = "set", value_name = "COLUMN=VALUE")]
        set: Vec<String>,
        /// Column values as a JSON object, e.g. '{"Severity": 4}'
        #[arg(long)]
        json: Option<String>,
    },
    /// Update matching rows (PATCH)
    Update {
        path: String,
        #[arg(short, long)]
        filter: String,
        #[arg(short, long = "set", value_name = "COLUMN=VALUE")]
        set: Vec<String>,
        #[arg(long)]
        json: Option<String>,
    },
    /// Delete matching rows (DELETE)
    Delete {
        path: String,
        #[arg(short, long)]
        filter: String,
    },
    /// Inspect or clear the cached column types of a table
    Schema {
        #[command(subcommand)]
        action: SchemaAction,
    },
}

#[derive(Subcommand)]
enum SchemaAction {
    /// Print the column types, fetching them if not cached
    Show { path: String },
    /// Delete the cached column types so the next write refetches them
    Forget { path: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "omni=debug,omni_client=debug,omni_schema=debug"
    } else {
        "omni=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = cli.connection.resolve()?;

    match cli.command {
        Commands::Get { path, filter, columns } => {
            commands::query::get(&config, &path, &filter, columns).await
        }
        Commands::Insert { path, set, json } => {
            commands::query::insert(&config, &path, &set, json.as_deref()).await
        }
        Commands::Update { path, filter, set, json } => {
            commands::query::update(&config, &path, &filter, &set, json.as_deref()).await
        }
        Commands::Delete { path, filter } => {
            commands::query::delete(&config, &path, &filter).await
        }
        Commands::Schema { action } => match action {
            SchemaAction::Show { path } => commands::schema::show(&config, &path).await,
            SchemaAction::Forget { path } => commands::schema::forget(&config, &path),
        },
    }
}
