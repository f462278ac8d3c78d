// src/cli.rs
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;

use crate::api::ApiClient;
use crate::chart::score_profile;
use crate::config::Config;
use crate::pipeline::{save_report, ScorePipeline};
use crate::render;
use crate::session::SessionStore;
use crate::warehouse::{FilterState, SortKey, WarehouseViewModel, DEFAULT_EXPORT_FILE};

#[derive(Parser)]
#[command(name = "ucb-desk")]
#[command(about = "Score resumes against the UCB service and work the candidate warehouse")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Upload a resume, score it and show the result
    Score {
        /// Resume file (.pdf or .docx)
        file: PathBuf,
        /// Also download the UCB PDF report
        #[arg(long)]
        pdf: bool,
        /// Directory the PDF report is written to
        #[arg(long, default_value = ".")]
        out: PathBuf,
        /// Print the raw score payload as JSON
        #[arg(long)]
        json: bool,
    },
    /// Upload a resume and save its UCB PDF report
    Report {
        /// Resume file (.pdf or .docx)
        file: PathBuf,
        /// Directory the PDF report is written to
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// List stored candidates, filtered and sorted
    List {
        #[command(flatten)]
        filters: FilterArgs,
        /// Show summary statistics under the table
        #[arg(long)]
        stats: bool,
        /// Print matching records as JSON (contacts stay masked)
        #[arg(long)]
        json: bool,
    },
    /// Export the filtered candidate list to CSV
    Export {
        #[command(flatten)]
        filters: FilterArgs,
        /// Path of the CSV file to write
        #[arg(long, default_value = DEFAULT_EXPORT_FILE)]
        output: PathBuf,
    },
    /// Show stored details for one or two candidates
    Compare {
        id_a: String,
        id_b: Option<String>,
        /// Print the records as JSON (contacts stay masked)
        #[arg(long)]
        json: bool,
    },
    /// Delete a stored candidate and its resume data
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Store a session token for authenticated requests
    Login { token: String },
    /// Clear the stored session token
    Logout,
    /// Show the profile behind the stored session
    Whoami {
        /// Print the profile as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Warehouse view settings shared by `list` and `export`.
#[derive(Debug, Args)]
pub struct FilterArgs {
    /// Match against file name, headline, skills and gaps
    #[arg(long)]
    pub search: Option<String>,
    /// Lowest fit score to include (clamped to 0-100)
    #[arg(long = "min")]
    pub score_min: Option<f64>,
    /// Highest fit score to include (clamped to 0-100)
    #[arg(long = "max")]
    pub score_max: Option<f64>,
    /// Sort order of the results
    #[arg(long, value_enum, default_value = "score_desc")]
    pub sort: SortKey,
    /// Skill every listed candidate must carry (repeatable)
    #[arg(long = "must-have")]
    pub must_have: Vec<String>,
}

impl FilterArgs {
    fn to_filter(&self) -> FilterState {
        let mut filter = FilterState::default();
        if let Some(search) = &self.search {
            filter.search = search.clone();
        }
        if let Some(min) = self.score_min {
            filter.score_min = min;
        }
        if let Some(max) = self.score_max {
            filter.score_max = max;
        }
        filter.sort = self.sort;
        filter.must_have = self.must_have.clone();
        filter
    }
}

pub async fn handle_command(cli: Cli, config: Config) -> Result<()> {
    let client = ApiClient::new(config.base_url.clone())?;
    let session = SessionStore::new(config.token_path.clone());

    match cli.command {
        Command::Score {
            file,
            pdf,
            out,
            json,
        } => {
            let pipeline = ScorePipeline::new(&client);
            let scored = pipeline.run(&file).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&scored.report)?);
            } else {
                println!("✅ Scored {}", file.display());
                println!();
                let profile = score_profile(&scored.report.score_components);
                println!(
                    "{}",
                    render::score_report_text(&scored.report, profile.as_ref())
                );
            }

            if pdf {
                let path = save_report(&client, &scored.parsed, &out).await?;
                println!("✅ Saved UCB report to {}", path.display());
            }
        }

        Command::Report { file, out } => {
            let pipeline = ScorePipeline::new(&client);
            let parsed = pipeline.parse(&file).await?;
            let path = save_report(&client, &parsed, &out).await?;
            println!("✅ Saved UCB report to {}", path.display());
        }

        Command::List {
            filters,
            stats,
            json,
        } => {
            let mut view = WarehouseViewModel::new(client);
            view.load().await?;
            view.apply_filters(filters.to_filter());

            if json {
                let values: Vec<Value> = view
                    .projection()
                    .iter()
                    .map(|record| record.to_redacted_value())
                    .collect();
                println!("{}", serde_json::to_string_pretty(&values)?);
            } else {
                println!("{}", render::candidate_table(view.projection()));
                if stats {
                    println!();
                    println!("{}", render::stats_text(&view.stats()));
                }
            }
        }

        Command::Export { filters, output } => {
            let mut view = WarehouseViewModel::new(client);
            view.load().await?;
            view.apply_filters(filters.to_filter());

            match view.export_csv()? {
                Some(bytes) => {
                    tokio::fs::write(&output, &bytes).await.with_context(|| {
                        format!("Failed to write CSV export: {}", output.display())
                    })?;
                    println!(
                        "✅ Exported {} candidates to {}",
                        view.projection().len(),
                        output.display()
                    );
                }
                None => {
                    println!("⚠️  Nothing to export: no candidates match the current filters.");
                }
            }
        }

        Command::Compare { id_a, id_b, json } => {
            let mut view = WarehouseViewModel::new(client);
            view.load().await?;

            let mut ids = vec![id_a];
            ids.extend(id_b);

            // resolve against the authoritative list before printing
            // anything, so a typo in either id fails the whole command
            let mut records = Vec::new();
            for id in &ids {
                let record = view
                    .compare(id)
                    .with_context(|| format!("No candidate found for id: {id}"))?;
                records.push(record);
            }

            if json {
                let values: Vec<Value> = records
                    .iter()
                    .map(|record| record.to_redacted_value())
                    .collect();
                println!("{}", serde_json::to_string_pretty(&values)?);
            } else {
                for (index, record) in records.iter().enumerate() {
                    if index > 0 {
                        println!();
                    }
                    println!("{}", render::candidate_detail(record));
                }
            }
        }

        Command::Delete { id, yes } => {
            if !yes && !confirm_delete(&id)? {
                println!("Cancelled.");
                return Ok(());
            }

            let mut view = WarehouseViewModel::new(client);
            let remaining = view.remove(&id).await?;
            println!("✅ Deleted candidate {id}");
            println!("   Remaining candidates: {remaining}");
        }

        Command::Login { token } => {
            session.login(&token)?;
            println!("✅ Session token stored.");
        }

        Command::Logout => {
            if session.logout()? {
                println!("✅ Logged out.");
            } else {
                println!("No active session.");
            }
        }

        Command::Whoami { json } => match session.profile(&client).await {
            Ok(Some(profile)) => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&profile)?);
                } else {
                    println!("{}", render::profile_text(&profile));
                    if let Some(saved_at) = session.saved_at()? {
                        println!("Session since: {}", saved_at.format("%Y-%m-%d %H:%M UTC"));
                    }
                }
            }
            Ok(None) => println!("Not logged in."),
            Err(err) if is_session_expired(&err) => {
                println!("❌ Session expired. Log in again with: ucb-desk login <TOKEN>");
            }
            Err(err) => return Err(err),
        },
    }

    Ok(())
}

fn is_session_expired(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<crate::error::ApiError>(),
        Some(crate::error::ApiError::SessionExpired)
    )
}

fn confirm_delete(candidate_id: &str) -> Result<bool> {
    print!("Delete stored data for {candidate_id}? This cannot be undone. [y/N] ");
    std::io::stdout().flush().context("Failed to flush stdout")?;

    let mut answer = String::new();
    std::io::stdin()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    let answer = answer.trim().to_lowercase();
    Ok(answer == "y" || answer == "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_filter_args_map_to_filter_state() {
        let cli = Cli::try_parse_from([
            "ucb-desk",
            "list",
            "--search",
            "python",
            "--min",
            "70",
            "--sort",
            "file_asc",
            "--must-have",
            "sql",
            "--must-have",
            "go",
        ])
        .unwrap();

        let Command::List { filters, .. } = cli.command else {
            panic!("expected list command");
        };
        let filter = filters.to_filter();
        assert_eq!(filter.search, "python");
        assert_eq!(filter.score_min, 70.0);
        assert_eq!(filter.score_max, 100.0);
        assert_eq!(filter.sort, SortKey::FileAsc);
        assert_eq!(filter.must_have, ["sql", "go"]);
    }

    #[test]
    fn test_sort_defaults_to_score_desc() {
        let cli = Cli::try_parse_from(["ucb-desk", "list"]).unwrap();
        let Command::List { filters, .. } = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(filters.to_filter().sort, SortKey::ScoreDesc);
    }

    #[test]
    fn test_export_default_output_path() {
        let cli = Cli::try_parse_from(["ucb-desk", "export"]).unwrap();
        let Command::Export { output, .. } = cli.command else {
            panic!("expected export command");
        };
        assert_eq!(output, PathBuf::from(DEFAULT_EXPORT_FILE));
    }

    #[test]
    fn test_compare_second_id_is_optional() {
        let cli = Cli::try_parse_from(["ucb-desk", "compare", "a.pdf"]).unwrap();
        let Command::Compare { id_a, id_b, .. } = cli.command else {
            panic!("expected compare command");
        };
        assert_eq!(id_a, "a.pdf");
        assert_eq!(id_b, None);
    }
}
