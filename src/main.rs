use clap::Parser;
use uzp::cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => uzp::cli::commands::init::execute(&cli),
        Commands::Add { ref name } => uzp::cli::commands::add::execute(&cli, name),
        Commands::Get { ref name } => uzp::cli::commands::get::execute(&cli, name),
        Commands::List => uzp::cli::commands::list::execute(&cli),
        Commands::Rm { ref name, force } => uzp::cli::commands::remove::execute(&cli, name, force),
    };

    if let Err(e) = result {
        uzp::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
