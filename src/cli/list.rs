use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use pickup::PickupRequest;
use tracing::instrument;

use super::terminal::{is_narrow, Colorize};

/// Command arguments for `pickup-admin list`.
#[derive(Debug, Parser)]
#[command(about = "List pickup requests")]
pub struct List {
    /// Which requests to show (default: pending).
    #[arg(long, value_enum, default_value_t)]
    status: StatusFilter,

    /// Output format (default: table).
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

/// Which part of the request collection to show.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum StatusFilter {
    #[default]
    Pending,
    Completed,
    All,
}

impl StatusFilter {
    fn matches(self, request: &PickupRequest) -> bool {
        match self {
            Self::Pending => request.status == pickup::Status::Pending,
            Self::Completed => request.status == pickup::Status::Completed,
            Self::All => true,
        }
    }

    const fn empty_message(self) -> &'static str {
        match self {
            Self::Pending => "No pending requests",
            Self::Completed => "No completed requests",
            Self::All => "No pickup requests",
        }
    }
}

/// Supported output formats.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl List {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let panel = super::open_panel(root)?;
        let requests: Vec<&PickupRequest> = panel
            .requests()
            .iter()
            .filter(|request| self.status.matches(request))
            .collect();

        match self.output {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&requests)?);
            }
            OutputFormat::Table => {
                if requests.is_empty() {
                    println!("{}", self.status.empty_message().dim());
                    return Ok(());
                }

                let narrow = is_narrow();
                for (i, request) in requests.iter().enumerate() {
                    if i > 0 {
                        println!();
                    }
                    print_card(request, narrow);
                }
            }
        }

        Ok(())
    }
}

fn print_card(request: &PickupRequest, narrow: bool) {
    let badge = match request.status {
        pickup::Status::Pending => request.status.to_string().warning(),
        pickup::Status::Completed => request.status.to_string().success(),
    };
    let waste_types = request.waste_types.iter().collect::<Vec<_>>().join(", ");

    println!(
        "{} {} [{badge}]",
        request.id.as_str().dim(),
        request.user_name.info()
    );

    if narrow {
        println!("  {}", request.user_email);
        println!("  {}", request.user_phone);
        println!("  {}", request.date);
        println!("  {}", request.user_address);
        println!("  {waste_types}");
    } else {
        println!("  {:<12} {} · {}", "Contact:", request.user_email, request.user_phone);
        println!("  {:<12} {}", "Date:", request.date);
        println!("  {:<12} {}", "Address:", request.user_address);
        println!("  {:<12} {waste_types}", "Waste Types:");
    }
}
