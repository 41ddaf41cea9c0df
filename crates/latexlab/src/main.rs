mod cli;
mod commands;
mod context;
mod output;
mod prompt;

use clap::Parser;
use cli::{Cli, Commands};
use commands::generate::GenerateOptions;
use commands::workflow::WorkflowOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "latexlab=debug,latexlab_core=debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::ListTemplates { dir, json } => {
            commands::list_templates::run(dir, json, cli.verbose)
        }
        Commands::Info { name, dir, json } => commands::info::run(name, dir, json, cli.verbose),
        Commands::Generate {
            name,
            output,
            dir,
            variables,
            force,
            compile,
            engine,
        } => commands::generate::run(
            GenerateOptions {
                name,
                output,
                dir,
                variables,
                force,
                compile,
                engine,
            },
            cli.verbose,
        ),
        Commands::Init { dir, force } => commands::init::run(dir, force, cli.verbose),
        Commands::Interactive { dir } => commands::interactive::run(dir, cli.verbose),
        Commands::UccsWorkflow {
            dir,
            template,
            variables,
            project_dir,
            fonts,
            images,
            engine,
            no_compile,
            force,
        } => commands::workflow::run(
            WorkflowOptions {
                dir,
                template,
                variables,
                project_dir,
                fonts,
                images,
                engine,
                no_compile,
                force,
            },
            cli.verbose,
        ),
        Commands::Compile { path, engine, open } => {
            commands::compile::run(path, engine, open, cli.verbose)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
