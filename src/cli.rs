use std::path::{Path, PathBuf};

mod list;
mod status;
mod terminal;

use clap::ArgAction;
use list::List;
use pickup::{
    storage::{load_session, save_session},
    AdminPanel, Completion, Credit, Directory, RandomSampler, Rejection, RequestId, SessionUser,
};
use status::Status;
use terminal::TerminalNotifier;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global=true)]
    verbose: u8,

    /// The directory holding the request and user collections
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::Status(Status::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Show request counters (default)
    Status(Status),

    /// Initialize a data directory
    Init(Init),

    /// List pickup requests
    List(List),

    /// Accept a pending request and award points to its user
    Accept(Accept),

    /// Reject a request, removing it permanently
    Reject(Reject),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Status(command) => command.run(root)?,
            Self::Init(command) => command.run(&root)?,
            Self::List(command) => command.run(root)?,
            Self::Accept(command) => command.run(root)?,
            Self::Reject(command) => command.run(root)?,
        }
        Ok(())
    }
}

/// Opens the dashboard for the session recorded in `root`.
fn open_panel(root: PathBuf) -> anyhow::Result<AdminPanel<Directory, TerminalNotifier>> {
    let store = Directory::new(root);
    let config = store.config().map_err(anyhow::Error::msg)?;
    let session = load_session(&store)?;

    Ok(AdminPanel::open(
        store,
        session.as_ref(),
        config,
        TerminalNotifier,
    )?)
}

/// Asks the user to confirm, unless `yes` was given.
fn confirm(prompt: &str, yes: bool) -> anyhow::Result<bool> {
    if yes {
        return Ok(true);
    }

    Ok(dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

#[derive(Debug, clap::Parser)]
pub struct Init {
    /// Record an administrator session in the new directory
    #[arg(long)]
    admin: bool,
}

impl Init {
    #[instrument]
    fn run(self, root: &Path) -> anyhow::Result<()> {
        let mut store = Directory::new(root.to_path_buf());

        let config_path = store.config_path();
        if config_path.exists() {
            anyhow::bail!(
                "Data directory already initialized (found {})",
                config_path.display()
            );
        }

        std::fs::create_dir_all(root)
            .map_err(|e| anyhow::anyhow!("Failed to create data directory: {e}"))?;
        pickup::Config::default()
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create config.toml: {e}"))?;

        println!("Initialized pickup data directory in {}", root.display());
        println!("  Created: config.toml");

        if self.admin {
            save_session(&mut store, &SessionUser::admin("admin"))?;
            println!("  Created: currentUser.json (administrator)");
        }

        println!();
        println!("Next steps:");
        println!("  pickup-admin list");

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Accept {
    /// The ID of the request to accept
    id: RequestId,

    /// Skip confirmation prompts
    #[arg(long, short)]
    yes: bool,
}

impl Accept {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        use terminal::Colorize;

        let mut panel = open_panel(root)?;

        let Some(request) = panel.find(self.id.as_str()) else {
            anyhow::bail!("Request {} not found", self.id);
        };

        if request.is_pending() {
            let prompt = format!(
                "Accept and complete the pickup request for {}? Points will be awarded based on \
                 their waste types.",
                request.user_name
            );
            if !confirm(&prompt, self.yes)? {
                println!("Cancelled");
                std::process::exit(130);
            }
        }

        match panel.complete(self.id.as_str(), &mut RandomSampler::thread_local())? {
            Completion::Completed(award) => {
                if award.credit == Credit::NoMatchingUser {
                    eprintln!(
                        "{}",
                        format!(
                            "⚠️  No registered user '{}'; {} points were not credited",
                            award.user_id, award.points
                        )
                        .warning()
                    );
                }
            }
            Completion::AlreadyCompleted => {
                println!("{}", format!("Request {} is already completed", self.id).dim());
            }
            Completion::NotFound => anyhow::bail!("Request {} not found", self.id),
        }

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Reject {
    /// The ID of the request to reject
    id: RequestId,

    /// Skip confirmation prompts
    #[arg(long, short)]
    yes: bool,
}

impl Reject {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut panel = open_panel(root)?;

        let Some(request) = panel.find(self.id.as_str()) else {
            anyhow::bail!("Request {} not found", self.id);
        };

        let prompt = format!(
            "Reject the pickup request for {}? This cannot be undone and the request will be \
             permanently removed.",
            request.user_name
        );
        if !confirm(&prompt, self.yes)? {
            println!("Cancelled");
            std::process::exit(130);
        }

        match panel.reject(self.id.as_str())? {
            Rejection::Removed(_) => Ok(()),
            Rejection::NotFound => anyhow::bail!("Request {} not found", self.id),
        }
    }
}
