//! observe CLI entry point

use clap::{Parser, Subcommand};
use observe::notify::NotifyLevel;
use observe::telemetry::{init_logging, LoggingConfig};

#[derive(Parser)]
#[command(name = "observe")]
#[command(author, version, about = "Check observe's collaborators from the command line", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Post a test notification to Slack
    Notify {
        /// Notification text
        text: String,
        /// Webhook URL
        #[arg(long, env = "SLACK_WEB_HOOK")]
        web_hook: Option<String>,
        /// Notification level (info, warning, error)
        #[arg(short, long, default_value = "info")]
        level: NotifyLevel,
        /// Author line of the attachment
        #[arg(long, default_value = "observe")]
        header: String,
        /// Attachment title
        #[arg(long, default_value = "Test notification")]
        title: String,
    },
    /// Send an observed no-op's metrics to the statsd agent
    Emit {
        /// Metric prefix
        metric: String,
        /// Agent host
        #[arg(long, env = "DD_AGENT_HOST")]
        host: Option<String>,
        /// Agent port
        #[arg(long, env = "DD_DOGSTATSD_PORT")]
        port: Option<u16>,
        /// Namespace prepended to the metric
        #[arg(long)]
        namespace: Option<String>,
        /// Tag to attach, repeatable
        #[arg(short, long = "tag")]
        tags: Vec<String>,
    },
    /// Print the observed SLI tag for an elapsed time
    Sli {
        /// Elapsed milliseconds
        elapsed_ms: u64,
        /// Also print the threshold table
        #[arg(long)]
        table: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let _logging = init_logging(&LoggingConfig::from_env())?;

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Notify {
            text,
            web_hook,
            level,
            header,
            title,
        }) => {
            observe::cli::commands::notify::run_notify(
                web_hook.as_deref(),
                level,
                &header,
                &title,
                &text,
            )?;
        }
        Some(Commands::Emit {
            metric,
            host,
            port,
            namespace,
            tags,
        }) => {
            observe::cli::commands::emit::run_emit(
                host.as_deref(),
                port,
                namespace.as_deref(),
                &metric,
                &tags,
            )?;
        }
        Some(Commands::Sli { elapsed_ms, table }) => {
            observe::cli::commands::sli::run_sli(elapsed_ms, table)?;
        }
        None => {
            println!("observe - logging, metrics and notifications around a call");
            println!("Run 'observe --help' for usage");
        }
    }

    Ok(())
}
