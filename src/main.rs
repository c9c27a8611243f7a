// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use regauth::ConfigLoader;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(name = "regauth", version, about = "Inspect Docker registry credentials")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Split a repository name into its registry and path
    Resolve {
        /// Repository name, e.g. `ubuntu` or `myregistry.io/team/app`
        repository: String,
    },
    /// Show the stored credentials that apply to a registry
    Lookup {
        /// Registry hostname or URL (defaults to the public index)
        #[arg(conflicts_with = "repository")]
        registry: Option<String>,
        /// Look up the registry that serves this repository instead
        #[arg(long)]
        repository: Option<String>,
        /// Read credentials from this file instead of the default locations
        #[arg(long)]
        config: Option<PathBuf>,
        /// Include the password in the output
        #[arg(long)]
        show_password: bool,
        /// Print the base64 `X-Registry-Auth` header instead of JSON
        #[arg(long, conflicts_with = "show_password")]
        header: bool,
    },
    /// List the registries that have stored credentials
    List {
        /// Read credentials from this file instead of the default locations
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let loader = ConfigLoader::new();

    let output = match cli.command {
        Commands::Resolve { repository } => commands::resolve(loader.index(), &repository)?,
        Commands::Lookup {
            registry,
            repository,
            config,
            show_password,
            header,
        } => {
            let target = match repository {
                Some(repository) => commands::LookupTarget::Repository(repository),
                None => commands::LookupTarget::Registry(registry),
            };
            let options = commands::LookupOptions {
                show_password,
                header,
            };
            commands::lookup(&loader, config.as_deref(), &target, options)?
        }
        Commands::List { config } => commands::list(&loader, config.as_deref())?,
    };

    println!("{output}");
    Ok(())
}
