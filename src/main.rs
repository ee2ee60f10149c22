use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use git_version::{
    BuildIdentity, Config,
    cli::{Cli, Commands, ConfigCommands},
    output::{self, Format},
    verify,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // No subcommand = show embedded identity
    let command = cli.command.unwrap_or(Commands::Show {
        format: None,
        field: None,
    });

    match command {
        Commands::Show { format, field } => {
            let identity = git_version::current();
            if let Some(field) = field {
                println!("{}", field.value(identity));
                return Ok(());
            }

            let config = Config::load()?;
            let format = format.unwrap_or(config.output.format);
            if format == Format::Text {
                println!(
                    "{:<9} {}",
                    "version:",
                    identity.version_string_with_marker(&config.output.dirty_marker)
                );
            }
            print!("{}", output::render(identity, format)?);
        }

        Commands::Probe {
            dir,
            format,
            profile,
        } => {
            let config = Config::load()?;
            let profile = profile.as_deref().unwrap_or(git_version::build_info::BUILD_CONFIG);
            let generated = verify::probe_tree(&config.probe.git, &dir, profile);
            let format = format.unwrap_or(config.output.format);
            print!("{}", output::render(&BuildIdentity::from(&generated), format)?);
        }

        Commands::Verify { dir } => {
            let config = Config::load()?;
            let embedded = git_version::current();
            let generated =
                verify::probe_tree(&config.probe.git, &dir, embedded.build_config);
            verify::check(embedded, &BuildIdentity::from(&generated))?;
            println!("up to date: {embedded}");
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let config = Config::load()?;
                println!("{}", toml::to_string_pretty(&config)?);
            }
            ConfigCommands::Path => {
                let path = Config::config_path()?;
                println!("{}", path.display());
            }
        },
    }

    Ok(())
}
