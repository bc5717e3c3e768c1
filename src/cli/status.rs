use std::path::PathBuf;

use clap::Parser;
use pickup::Summary;
use tracing::instrument;

use super::terminal::{is_narrow, Colorize};

#[derive(Debug, Parser, Default)]
#[command(about = "Show pending, completed and total request counts")]
pub struct Status {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Status {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let panel = super::open_panel(root)?;
        let summary = panel.summary();

        match self.output {
            OutputFormat::Json => Self::output_json(&summary)?,
            OutputFormat::Table => {
                if self.quiet {
                    Self::output_quiet(&summary);
                } else {
                    Self::output_table(&summary);
                }
            }
        }

        Ok(())
    }

    fn output_json(summary: &Summary) -> anyhow::Result<()> {
        println!("{}", serde_json::to_string_pretty(summary)?);
        Ok(())
    }

    fn output_quiet(summary: &Summary) {
        println!(
            "pending={} completed={} total={} points={}",
            summary.pending, summary.completed, summary.total, summary.points_awarded
        );
    }

    fn output_table(summary: &Summary) {
        println!("Pickup requests");
        println!("{}", "───────────────".dim());

        let rows = [
            ("Pending", summary.pending.to_string().warning()),
            ("Completed", summary.completed.to_string().success()),
            ("Total", summary.total.to_string().info()),
            ("Points awarded", summary.points_awarded.to_string().info()),
        ];

        if is_narrow() {
            for (label, value) in rows {
                println!("{label}: {value}");
            }
        } else {
            for (label, value) in rows {
                println!("{label:<16} {value}");
            }
        }

        if summary.pending > 0 {
            println!();
            println!("{}", "Run 'pickup-admin list' to review pending requests.".dim());
        }
    }
}
