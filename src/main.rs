use clap::Parser;
use helmsman::cli::{self, Cli, Commands, ConfigCommands};

#[tokio::main]
async fn main() {
    // .env first: the config layer reads the process environment, and .env
    // values override inherited ones, matching operator expectations for a
    // daemon deployed next to its env file.
    dotenvy::dotenv_override().ok();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Monitor(args) => cli::monitor::run_monitor(args).await,
        Commands::Select(args) => cli::select::run_select(args).await,
        Commands::Delays(args) => cli::delays::run_delays(args).await,
        Commands::Current(args) => cli::current::run_current(args).await,
        Commands::Endpoints(args) => cli::endpoints::run_endpoints(args).await,
        Commands::Config(ConfigCommands::Init(args)) => cli::handle_config_init(args),
        Commands::Completions(args) => {
            cli::handle_completions(args);
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
