use anyhow::{bail, Context, Result};
use clap::Parser;
use navshell::fixture::Fixture;
use navshell::sidebar::CollapseKey;
use navshell::{BackendCall, Config, Publishers, RecordingBackend, Shell, ShellSnapshot};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "navshell",
    about = "Run the sidebar and toolbar composition against a JSON fixture"
)]
struct Args {
    /// Fixture with the upstream snapshots
    #[arg(value_name = "FIXTURE")]
    fixture: PathBuf,

    /// Config file (TOML)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Navigate to PATH after the fixture is loaded (repeatable)
    #[arg(long = "route", value_name = "PATH")]
    routes: Vec<String>,

    /// Run an action after navigating (repeatable): toggle-read,
    /// mark-all-read, older-first, unread-only, refresh, title, up,
    /// search:<query>, share:<target id>, collapse:<key>
    #[arg(long = "action", value_name = "NAME")]
    actions: Vec<String>,

    /// Time to let the composition settle after each step, in milliseconds
    #[arg(long, value_name = "N", default_value_t = 50)]
    settle_ms: u64,
}

/// Everything printed at the end of a run.
#[derive(Debug, Serialize)]
struct Report {
    snapshot: ShellSnapshot,
    calls: Vec<BackendCall>,
    events: Vec<String>,
}

/// A parsed `--action` value.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Action {
    ToggleRead,
    MarkAllRead,
    OlderFirst,
    UnreadOnly,
    Refresh,
    Title,
    Up,
    Search(String),
    Share(i64),
    Collapse(CollapseKey),
}

impl std::str::FromStr for Action {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };
        let action = match (name, arg) {
            ("toggle-read", None) => Self::ToggleRead,
            ("mark-all-read", None) => Self::MarkAllRead,
            ("older-first", None) => Self::OlderFirst,
            ("unread-only", None) => Self::UnreadOnly,
            ("refresh", None) => Self::Refresh,
            ("title", None) => Self::Title,
            ("up", None) => Self::Up,
            ("search", Some(query)) => Self::Search(query.to_string()),
            ("share", Some(id)) => Self::Share(
                id.parse()
                    .with_context(|| format!("Invalid share target id '{}'", id))?,
            ),
            ("collapse", Some(key)) => Self::Collapse(
                key.parse()
                    .map_err(|_| anyhow::anyhow!("Invalid collapse key '{}'", key))?,
            ),
            _ => bail!("Unknown action '{}'", s),
        };
        Ok(action)
    }
}

impl Action {
    fn run(&self, shell: &mut Shell<RecordingBackend>) {
        match self {
            Self::ToggleRead => shell.toggle_read_on_current_article(),
            Self::MarkAllRead => shell.mark_all_read(),
            Self::OlderFirst => shell.toggle_older_first(),
            Self::UnreadOnly => shell.toggle_unread_only(),
            Self::Refresh => shell.refresh(),
            Self::Title => shell.title_click(),
            Self::Up => shell.up(),
            Self::Search(query) => {
                shell.set_search_query(query.clone());
                shell.submit_search();
            }
            Self::Share(target) => shell.share_current_article(*target),
            Self::Collapse(key) => shell.toggle_collapse(*key),
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => Config::default(),
    };
    init_tracing(&config);

    // Reject bad actions before anything starts
    let actions = args
        .actions
        .iter()
        .map(|a| a.parse::<Action>())
        .collect::<Result<Vec<_>>>()?;

    let fixture = Fixture::load(&args.fixture)?;
    let publishers = Publishers::new();
    fixture.publish(&publishers, config.features);

    let backend = Arc::new(RecordingBackend::new());
    let (mut shell, mut events) =
        Shell::start(publishers.sources(), Arc::clone(&backend), &config);
    let settle = Duration::from_millis(args.settle_ms);
    tokio::time::sleep(settle).await;

    for route in &args.routes {
        publishers.navigate(route);
        tokio::time::sleep(settle).await;
    }
    for action in &actions {
        tracing::info!(?action, "Running action");
        action.run(&mut shell);
        tokio::time::sleep(settle).await;
    }

    let snapshot = shell.snapshot();
    let released = shell.dispose();
    tracing::debug!(released, "Run finished");

    let mut surfaced = Vec::new();
    while let Ok(event) = events.try_recv() {
        surfaced.push(event.to_string());
    }

    let report = Report {
        snapshot,
        calls: backend.calls(),
        events: surfaced,
    };
    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actions() {
        assert_eq!("toggle-read".parse::<Action>().unwrap(), Action::ToggleRead);
        assert_eq!(
            "search:rust lang".parse::<Action>().unwrap(),
            Action::Search("rust lang".into())
        );
        assert_eq!("share:3".parse::<Action>().unwrap(), Action::Share(3));
        assert_eq!(
            "collapse:__all".parse::<Action>().unwrap(),
            Action::Collapse(CollapseKey::All)
        );
        assert_eq!(
            "collapse:7".parse::<Action>().unwrap(),
            Action::Collapse(CollapseKey::Category(7))
        );
    }

    #[test]
    fn test_reject_bad_actions() {
        assert!("explode".parse::<Action>().is_err());
        assert!("share:abc".parse::<Action>().is_err());
        assert!("toggle-read:1".parse::<Action>().is_err());
        assert!("search".parse::<Action>().is_err());
    }

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from([
            "navshell",
            "fixture.json",
            "--route",
            "/feed/1",
            "--route",
            "/feed/1/article/2",
            "--action",
            "toggle-read",
        ])
        .unwrap();
        assert_eq!(args.routes, vec!["/feed/1", "/feed/1/article/2"]);
        assert_eq!(args.actions, vec!["toggle-read"]);
        assert_eq!(args.settle_ms, 50);
        assert!(args.config.is_none());
    }
}
