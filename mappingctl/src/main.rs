use std::process::ExitCode;

use clap::Parser;
use propmap::diag;
use propmap::schema::DataSourceSchema;
use tracing::error;
use tracing_subscriber::EnvFilter;

use process::{run, FilterArgs};

mod process;

/// Looks up authentik LDAP property mappings and prints the resulting data source
/// state as JSON. Connection settings come from the AUTHENTIK_* environment variables.
#[derive(Parser)]
struct CliArgs {
    /// YAML or JSON file holding the data source block
    #[clap(short = 'c', long, default_value = None)]
    config: Option<std::path::PathBuf>,
    /// Print the data source schema and exit
    #[clap(long)]
    schema: bool,
    #[clap(flatten)]
    filters: FilterArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = CliArgs::parse();

    if args.schema {
        return match serde_json::to_string_pretty(&DataSourceSchema::ldap_property_mapping()) {
            Ok(s) => {
                println!("{s}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("Unable to serialize schema: {e}");
                ExitCode::FAILURE
            }
        };
    }

    match run(args.config, args.filters).await {
        Ok(state) => {
            println!("{state:#}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Lookup failed: {e}");
            let diags = diag::from_error(&e);
            match serde_json::to_string_pretty(&diags) {
                Ok(s) => eprintln!("{s}"),
                Err(_) => eprintln!("{e}"),
            }
            ExitCode::FAILURE
        }
    }
}
