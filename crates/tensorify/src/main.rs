// SPDX-FileCopyrightText: 2026 Tensorify Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tensorify - plugin engine for visual ML workflow code generation.

mod plugin_cmds;
mod serve;
mod store_cmds;
mod wiring;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use tensorify_config::TensorifyConfig;
use tensorify_core::TensorifyError;

#[derive(Parser, Debug)]
#[command(name = "tensorify", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP gateway.
    Serve,
    /// Normalize a manifest file and report problems.
    Validate {
        manifest: PathBuf,
    },
    /// Generate code for a registered plugin.
    Render {
        /// Plugin slug, e.g. `@tensorify/dataloader:1.0.0` or `...:latest`.
        slug: String,
        /// Settings as a JSON object.
        #[arg(long, default_value = "{}")]
        settings: String,
        /// Upstream binding as `handle=variable`. Repeatable.
        #[arg(long = "input", value_name = "HANDLE=VAR")]
        inputs: Vec<String>,
        /// Code of a child node, in order. Repeatable.
        #[arg(long = "child", value_name = "CODE")]
        children: Vec<String>,
        /// Print the full artifact as JSON instead of just the code.
        #[arg(long)]
        json: bool,
    },
    /// List built-in plugins, optionally filtered.
    Catalog {
        query: Option<String>,
    },
    /// Upload a plugin to storage.
    Publish {
        slug: String,
        #[arg(long, value_name = "FILE")]
        code: PathBuf,
        #[arg(long, value_name = "FILE")]
        manifest: PathBuf,
        #[arg(long, value_name = "FILE")]
        icon: Option<PathBuf>,
    },
    /// List stored plugins.
    List {
        #[arg(long, default_value = "")]
        prefix: String,
        #[arg(long, default_value_t = 100)]
        limit: usize,
    },
}

fn load_config(path: Option<&PathBuf>) -> TensorifyConfig {
    let loaded = match path {
        Some(path) => tensorify_config::load_and_validate_path(path),
        None => tensorify_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            tensorify_config::render_errors(&errors);
            std::process::exit(2);
        }
    }
}

async fn run(cli: Cli, config: TensorifyConfig) -> Result<(), TensorifyError> {
    match cli.command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Validate { manifest } => {
            println!("{}", plugin_cmds::validate(&manifest)?);
            Ok(())
        }
        Commands::Render {
            slug,
            settings,
            inputs,
            children,
            json,
        } => {
            let request = plugin_cmds::RenderRequest {
                slug,
                settings,
                inputs,
                children,
                json,
            };
            println!("{}", plugin_cmds::render(&request)?);
            Ok(())
        }
        Commands::Catalog { query } => {
            print!("{}", plugin_cmds::catalog(query.as_deref().unwrap_or("")));
            Ok(())
        }
        Commands::Publish {
            slug,
            code,
            manifest,
            icon,
        } => {
            let report = store_cmds::publish(&config, slug, &code, &manifest, icon.as_deref()).await?;
            println!("{report}");
            Ok(())
        }
        Commands::List { prefix, limit } => {
            print!("{}", store_cmds::list(&config, &prefix, limit).await?);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());
    wiring::init_tracing(&config.log.level);

    if let Err(err) = run(cli, config).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn render_collects_repeated_flags() {
        let cli = Cli::parse_from([
            "tensorify",
            "render",
            "@tensorify/sequential:1.0.0",
            "--child",
            "nn.Linear(1, 2)",
            "--child",
            "nn.ReLU()",
            "--input",
            "prev=x",
        ]);
        match cli.command {
            Commands::Render {
                children, inputs, ..
            } => {
                assert_eq!(children, ["nn.Linear(1, 2)", "nn.ReLU()"]);
                assert_eq!(inputs, ["prev=x"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from(["tensorify", "catalog", "--config", "/tmp/t.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/t.toml")));
    }
}
