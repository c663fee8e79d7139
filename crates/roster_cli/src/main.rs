//! Command-line roster host.
//!
//! # Responsibility
//! - Drive the core repository from a terminal against a SQLite file.
//! - Stand in for the list, form and dashboard views.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use log::error;
use roster_core::{
    AutoRefresh, Clock, KeyValueStore, Participant, ParticipantDraft, ParticipantListView,
    ParticipantRepository, ParticipantSnapshot, ParticipantStore, RosterConfig, SaveOutcome,
    Skill, SkillLevel, SqliteKeyValueStore, SystemClock,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::Duration;

type SqliteRepo = ParticipantRepository<SqliteKeyValueStore, SystemClock>;

const DEFAULT_DB_FILE_NAME: &str = "roster.sqlite3";

#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(version)]
#[command(about = "Manage a participant roster stored in a local SQLite file.", long_about = None)]
struct Args {
    /// Database file. Defaults to ROSTER_DB_PATH or ./roster.sqlite3.
    #[arg(long)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List participants, optionally filtered and paged.
    List {
        #[arg(short, long, default_value = "")]
        search: String,

        /// Zero-based page index.
        #[arg(short, long, default_value_t = 0)]
        page: usize,

        #[arg(long)]
        page_size: Option<usize>,

        /// Keep running and reprint on every auto refresh until Ctrl-C.
        #[arg(long)]
        watch: bool,
    },

    /// Add a participant.
    Add {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long, default_value = "")]
        phone: String,

        #[arg(long, default_value = "")]
        linkedin: String,

        #[arg(long, default_value = "")]
        github: String,

        /// Skill rating as `skill=rating`, e.g. `python=8`. Repeatable.
        #[arg(long = "skill", value_parser = parse_skill_rating)]
        skills: Vec<(Skill, String)>,

        #[arg(long, default_value = "")]
        outcome: String,
    },

    /// Edit a participant; only the given fields change.
    Edit {
        id: String,

        #[command(flatten)]
        edits: ParticipantEdits,
    },

    /// Delete a participant by id.
    Delete { id: String },

    /// Reload the roster from storage and report the refresh time.
    Refresh,

    /// Show per-skill averages and rating distributions.
    Stats,
}

/// Field overrides for `edit`. An empty string clears an optional field.
#[derive(clap::Args, Debug, Default)]
struct ParticipantEdits {
    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    phone: Option<String>,

    #[arg(long)]
    linkedin: Option<String>,

    #[arg(long)]
    github: Option<String>,

    /// Skill rating as `skill=rating`; `skill=` clears it. Repeatable.
    #[arg(long = "skill", value_parser = parse_skill_rating)]
    skills: Vec<(Skill, String)>,

    #[arg(long)]
    outcome: Option<String>,
}

impl ParticipantEdits {
    fn apply(self, draft: &mut ParticipantDraft) {
        let fields = [
            (self.name, &mut draft.name),
            (self.email, &mut draft.email),
            (self.phone, &mut draft.phone_number),
            (self.linkedin, &mut draft.linked_in_profile),
            (self.github, &mut draft.github_id),
            (self.outcome, &mut draft.training_outcome),
        ];
        for (value, field) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }
        for (skill, rating) in self.skills {
            draft.technical_skills.set_rating(skill, Some(rating));
        }
    }
}

fn parse_skill_rating(value: &str) -> Result<(Skill, String), String> {
    let (name, rating) = value
        .split_once('=')
        .ok_or_else(|| format!("expected skill=rating, got `{value}`"))?;
    let skill = Skill::parse(name).ok_or_else(|| {
        format!("unknown skill `{name}`; expected angular|python|css|html|mysql")
    })?;
    Ok((skill, rating.trim().to_string()))
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), String> {
    let config = RosterConfig::from_env()?;
    if let Some(log_dir) = args.log_dir.as_deref() {
        roster_core::init_logging(&config.log_level, log_dir)?;
    }

    let db_path = args
        .db
        .or_else(|| config.database_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_FILE_NAME));
    let kv = SqliteKeyValueStore::open(&db_path)
        .map_err(|err| format!("failed to open `{}`: {err}", db_path.display()))?;
    let repo: Arc<SqliteRepo> = Arc::new(ParticipantRepository::from_store(
        ParticipantStore::with_key(kv, config.storage_key.clone()),
        SystemClock,
    ));

    match args.command {
        Command::List {
            search,
            page,
            page_size,
            watch,
        } => {
            let mut view = ParticipantListView::from_config(&config);
            if let Some(size) = page_size {
                view.set_page_size(config.check_page_size(size)?);
            }
            let snapshot = repo.get_all();
            view.set_search_text(&snapshot, search);
            if page > 0 && !view.go_to_page(page) {
                return Err(format!(
                    "page {page} is out of range; {} page(s) available",
                    view.total_pages()
                ));
            }

            if watch {
                watch_list(repo, view, page, config.auto_refresh_interval)?;
            } else {
                print_page(&view, snapshot.len());
            }
        }
        Command::Add {
            name,
            email,
            phone,
            linkedin,
            github,
            skills,
            outcome,
        } => {
            let mut draft = ParticipantDraft {
                name,
                email,
                phone_number: phone,
                linked_in_profile: linkedin,
                github_id: github,
                training_outcome: outcome,
                ..ParticipantDraft::default()
            };
            for (skill, rating) in skills {
                draft.technical_skills.set_rating(skill, Some(rating));
            }
            draft.validate().map_err(describe_errors)?;

            let participant = draft.into_new_participant(Utc::now());
            let id = participant.id.clone();
            repo.save(participant).map_err(|err| {
                error!("event=cli_add module=cli status=error error={err}");
                format!("failed to save participant: {err}")
            })?;
            println!("added {id}");
        }
        Command::Edit { id, edits } => {
            let updated = edit_participant(repo.as_ref(), &id, edits, Utc::now())?;
            println!("updated {} ({})", updated.id, updated.name);
        }
        Command::Delete { id } => {
            let existed = repo.get_all().iter().any(|p| p.id == id);
            repo.delete(&id)
                .map_err(|err| format!("failed to delete participant: {err}"))?;
            if existed {
                println!("deleted {id}");
            } else {
                println!("no participant with id {id}");
            }
        }
        Command::Refresh => {
            let snapshot = current_thread_runtime()?.block_on(repo.refresh());
            let refreshed_at = repo
                .last_refresh()
                .map(|at| at.to_rfc3339())
                .unwrap_or_else(|| "never".to_string());
            println!(
                "refreshed {} participant(s) at {refreshed_at}",
                snapshot.len()
            );
        }
        Command::Stats => {
            let summary = roster_core::DashboardSummary::load(repo.as_ref());
            println!(
                "participants: {}  fully rated: {}",
                summary.participant_count(),
                summary.fully_rated_count()
            );
            for skill in Skill::ALL {
                let stats = summary.skill(skill);
                let histogram = stats
                    .distribution
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join(" ");
                print!(
                    "{:<8} avg {:>2} ({:>3.0}%)  [{}]",
                    skill.as_str(),
                    stats.average,
                    stats.progress_percentage(),
                    histogram
                );
                if stats.malformed_count > 0 {
                    print!("  {} unreadable", stats.malformed_count);
                }
                println!();
            }
        }
    }

    Ok(())
}

/// Runs the edit form flow: claim the record, pre-fill, apply edits, save.
fn edit_participant<S: KeyValueStore, C: Clock>(
    repo: &ParticipantRepository<S, C>,
    id: &str,
    edits: ParticipantEdits,
    now: DateTime<Utc>,
) -> Result<Participant, String> {
    repo.get_all();
    let existing = repo
        .find(id)
        .ok_or_else(|| format!("no participant with id {id}"))?;
    repo.set_editing_target(Some(&existing));

    let result = (|| -> Result<Participant, String> {
        let target = repo
            .editing_target()
            .ok_or_else(|| format!("participant {id} disappeared while editing"))?;
        let mut draft = ParticipantDraft::from_participant(&target);
        edits.apply(&mut draft);
        draft.validate().map_err(describe_errors)?;

        match repo.save(draft.apply_to(&target, now)) {
            Ok(SaveOutcome::Updated) => repo
                .find(id)
                .ok_or_else(|| format!("participant {id} missing after save")),
            Ok(SaveOutcome::Created) => Err(format!("participant {id} was removed before saving")),
            Err(err) => {
                error!("event=cli_edit module=cli status=error error={err}");
                Err(format!("failed to save participant: {err}"))
            }
        }
    })();

    repo.clear_editing_target();
    result
}

fn watch_list(
    repo: Arc<SqliteRepo>,
    view: ParticipantListView,
    page: usize,
    period: Duration,
) -> Result<(), String> {
    current_thread_runtime()?.block_on(async move {
        let view = Mutex::new(view);
        let subscription = repo.subscribe(move |snapshot: &ParticipantSnapshot| {
            let mut view = view.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            view.apply_snapshot(snapshot);
            view.go_to_page(page);
            println!("-- {} --", Utc::now().format("%H:%M:%S"));
            print_page(&view, snapshot.len());
        });

        let mut auto_refresh = match AutoRefresh::start(Arc::clone(&repo), period) {
            Ok(auto_refresh) => auto_refresh,
            Err(err) => {
                repo.unsubscribe(subscription);
                return Err(err);
            }
        };
        let stopped = tokio::signal::ctrl_c()
            .await
            .map_err(|err| format!("failed to wait for Ctrl-C: {err}"));
        auto_refresh.stop();
        repo.unsubscribe(subscription);
        stopped
    })
}

fn print_page(view: &ParticipantListView, total: usize) {
    for participant in view.current_page_items() {
        let skills = Skill::ALL
            .iter()
            .filter_map(|skill| {
                participant
                    .rating(*skill)
                    .filter(|rating| !rating.is_empty())
                    .map(|rating| {
                        format!("{skill}={rating}({})", SkillLevel::from_rating(rating).label())
                    })
            })
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "{}\t{}\t{}\t{}\t{}",
            participant.id,
            participant.name,
            participant.email,
            participant.github_id.as_deref().unwrap_or("-"),
            skills
        );
    }
    println!(
        "page {}/{} ({} matching, {} total)",
        view.page_index() + 1,
        view.total_pages().max(1),
        view.filtered_count(),
        total
    );
}

fn current_thread_runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("failed to start async runtime: {err}"))
}

fn describe_errors(errors: Vec<roster_core::ParticipantValidationError>) -> String {
    let details = errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    format!("invalid participant: {details}")
}

#[cfg(test)]
mod tests {
    use super::{edit_participant, parse_skill_rating, Args, Command, ParticipantEdits};
    use chrono::{Duration, TimeZone, Utc};
    use clap::Parser;
    use roster_core::{MemoryKeyValueStore, Participant, ParticipantRepository, Skill};

    #[test]
    fn parses_skill_rating_pairs() {
        assert_eq!(
            parse_skill_rating("Python=8").unwrap(),
            (Skill::Python, "8".to_string())
        );
        assert!(parse_skill_rating("rust=8").unwrap_err().contains("unknown skill"));
        assert!(parse_skill_rating("python").is_err());
    }

    #[test]
    fn parses_edit_and_watch_commands() {
        let args = Args::try_parse_from([
            "roster", "edit", "p-1", "--email", "ann@example.com", "--skill", "css=9",
        ])
        .unwrap();
        let Command::Edit { id, edits } = args.command else {
            panic!("expected edit command");
        };
        assert_eq!(id, "p-1");
        assert_eq!(edits.email.as_deref(), Some("ann@example.com"));
        assert!(edits.name.is_none());
        assert_eq!(edits.skills, vec![(Skill::Css, "9".to_string())]);

        let args = Args::try_parse_from(["roster", "list", "--watch"]).unwrap();
        assert!(matches!(args.command, Command::List { watch: true, .. }));
    }

    #[test]
    fn edit_updates_only_given_fields_and_releases_claim() {
        let repo = ParticipantRepository::new(MemoryKeyValueStore::new());
        let created = Utc.with_ymd_and_hms(2025, 3, 2, 9, 0, 0).unwrap();
        let mut ann = Participant::with_id("p-1", "Ann Lee", "ann@example.com", created);
        ann.github_id = Some("annlee".to_string());
        repo.save(ann).unwrap();

        let edits = ParticipantEdits {
            email: Some("ann.lee@example.com".to_string()),
            skills: vec![(Skill::Html, "7".to_string())],
            ..ParticipantEdits::default()
        };
        let later = created + Duration::hours(2);
        let updated = edit_participant(&repo, "p-1", edits, later).unwrap();

        assert_eq!(updated.created_at, created);
        assert!(updated.updated_at > created);
        let stored = repo.find("p-1").unwrap();
        assert_eq!(stored, updated);
        assert_eq!(stored.email, "ann.lee@example.com");
        assert_eq!(stored.name, "Ann Lee");
        assert_eq!(stored.github_id.as_deref(), Some("annlee"));
        assert_eq!(stored.rating(Skill::Html), Some("7"));
        assert!(repo.editing_target_id().is_none());
    }

    #[test]
    fn edit_rejects_unknown_id_and_invalid_fields() {
        let repo = ParticipantRepository::new(MemoryKeyValueStore::new());
        let now = Utc.with_ymd_and_hms(2025, 3, 2, 9, 0, 0).unwrap();
        repo.save(Participant::with_id("p-1", "Ann Lee", "ann@example.com", now))
            .unwrap();

        let err = edit_participant(&repo, "p-9", ParticipantEdits::default(), now).unwrap_err();
        assert!(err.contains("no participant"));

        let edits = ParticipantEdits {
            email: Some("not-an-email".to_string()),
            ..ParticipantEdits::default()
        };
        let err = edit_participant(&repo, "p-1", edits, now).unwrap_err();
        assert!(err.starts_with("invalid participant"));
        assert_eq!(repo.find("p-1").unwrap().email, "ann@example.com");
        assert!(repo.editing_target_id().is_none());
    }
}
