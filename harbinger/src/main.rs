use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod config;
mod context;
mod format;
mod logging;

/// Harbinger - container image change notifications
///
/// Manage the image inventory of a running Harbinger service and check
/// notification delivery.
#[derive(Parser, Debug)]
#[command(name = "harbinger")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Control colored output: auto, always, never
    #[arg(long, global = true, default_value = "auto")]
    color: String,

    /// Configuration file (YAML)
    #[arg(long, global = true, env = "HARBINGER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Display version information
    Version,
    /// Manage the image inventory
    Image {
        #[command(subcommand)]
        command: ImageCommands,
    },
    /// Inspect and test notifiers
    Notif {
        #[command(subcommand)]
        command: NotifCommands,
    },
    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
enum ImageCommands {
    /// List images in the database
    #[command(visible_alias = "ls")]
    List {
        /// Print the JSON response instead of a table (counts and sizes are JSON numbers, not strings)
        #[arg(long)]
        raw: bool,
        /// Inventory service address (host:port)
        #[arg(long, env = "HARBINGER_GRPC_AUTHORITY")]
        grpc_authority: Option<String>,
    },
    /// Display manifests of an image
    Inspect {
        /// Image to inspect
        #[arg(long)]
        image: String,
        /// Print the JSON response instead of a table (counts and sizes are JSON numbers, not strings)
        #[arg(long)]
        raw: bool,
        /// Inventory service address (host:port)
        #[arg(long, env = "HARBINGER_GRPC_AUTHORITY")]
        grpc_authority: Option<String>,
    },
    /// Remove an image and all its manifests
    #[command(visible_alias = "rm")]
    Remove {
        /// Image to remove
        #[arg(long)]
        image: String,
        /// Inventory service address (host:port)
        #[arg(long, env = "HARBINGER_GRPC_AUTHORITY")]
        grpc_authority: Option<String>,
    },
    /// Remove all manifests from the database
    Prune {
        /// Do not prompt for confirmation
        #[arg(short, long)]
        force: bool,
        /// Inventory service address (host:port)
        #[arg(long, env = "HARBINGER_GRPC_AUTHORITY")]
        grpc_authority: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum NotifCommands {
    /// List configured notifiers
    #[command(visible_alias = "ls")]
    List,
    /// Send a test notification through every configured notifier
    Test,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let verbosity = context::VerbosityLevel::from_count(cli.verbose);
    logging::init(verbosity);

    match &cli.command {
        Commands::Version => {
            commands::version::print_version();
            return;
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, bin_name, &mut std::io::stdout());
            return;
        }
        _ => {}
    }

    // Build context with precedence: defaults > config file > env vars > CLI flags
    let color = format::ColorChoice::from(cli.color.as_str());
    let ctx = match context::AppContext::build(cli.config.as_deref(), color, verbosity) {
        Ok(ctx) => ctx,
        Err(e) => {
            let ctx = context::AppContext::with_config(Default::default(), color, verbosity);
            format::error(&ctx, &e);
            std::process::exit(1);
        }
    };
    tracing::debug!(
        grpc_authority = %ctx.config.grpc.authority,
        webhook = ctx.config.notif.webhook.is_some(),
        "configuration loaded"
    );

    match cli.command {
        Commands::Image { command } => match command {
            ImageCommands::List {
                raw,
                grpc_authority,
            } => {
                commands::image::handlers::handle_image_list(&ctx, raw, grpc_authority.as_deref())
                    .await;
            }
            ImageCommands::Inspect {
                image,
                raw,
                grpc_authority,
            } => {
                commands::image::handlers::handle_image_inspect(
                    &ctx,
                    &image,
                    raw,
                    grpc_authority.as_deref(),
                )
                .await;
            }
            ImageCommands::Remove {
                image,
                grpc_authority,
            } => {
                commands::image::handlers::handle_image_remove(
                    &ctx,
                    &image,
                    grpc_authority.as_deref(),
                )
                .await;
            }
            ImageCommands::Prune {
                force,
                grpc_authority,
            } => {
                commands::image::handlers::handle_image_prune(
                    &ctx,
                    force,
                    grpc_authority.as_deref(),
                )
                .await;
            }
        },
        Commands::Notif { command } => match command {
            NotifCommands::List => commands::notif::handlers::handle_notif_list(&ctx),
            NotifCommands::Test => commands::notif::handlers::handle_notif_test(&ctx).await,
        },
        Commands::Version | Commands::Completion { .. } => {}
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
