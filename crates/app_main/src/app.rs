//! Command-line driver over the catalog session

use anyhow::{bail, Context, Result};
use app_core::{
    CatalogConfig, CatalogSession, Command, CommandId, DisplayState, Outcome, PipelineEvent, PipelineHandle,
    TagFilter,
};
use std::path::PathBuf;

const USAGE: &str = "usage: candle [<catalog>] <create|import <paths..>|tags|tag <name>|apply <tag> <ids..>|remove <tag> <ids..>|filter [tags..]|show <id|name>|next <id>|prev <id>>";

/// Parsed command line
#[derive(Debug, PartialEq, Eq)]
struct Invocation {
    catalog: PathBuf,
    commands: Vec<Command>,
}

impl Invocation {
    /// `fallback` is used when the first argument is a verb
    fn parse(args: &[String], fallback: Option<PathBuf>) -> Result<Self> {
        let (catalog, rest) = match args.split_first() {
            Some((first, rest)) if !is_verb(first) => (PathBuf::from(first), rest),
            _ => (fallback.context(USAGE)?, args),
        };

        let Some((verb, params)) = rest.split_first() else {
            bail!(USAGE);
        };

        let open = Command::OpenDatabase(catalog.clone());
        let commands = match verb.as_str() {
            "create" => vec![Command::CreateDatabase(catalog.clone())],
            "import" => vec![open, Command::parse(CommandId::DB_IMPORT, params)?],
            "tags" => vec![open, Command::ListTags],
            "tag" => vec![open, Command::parse(CommandId::TAG_NEW, params)?],
            "apply" => vec![open, Command::parse(CommandId::TAG_APPLY, params)?],
            "remove" => vec![open, Command::parse(CommandId::TAG_REMOVE, params)?],
            "filter" => vec![open, Command::parse(CommandId::TAG_FILTER, params)?],
            "show" => match Command::parse(CommandId::NAV_SELECT, params) {
                Ok(select) => vec![open, select],
                Err(_) => vec![open, Command::parse(CommandId::NAV_SELECT_NAME, params)?],
            },
            "next" => vec![open, Command::parse(CommandId::NAV_SELECT, params)?, Command::NavigateNext],
            "prev" => vec![open, Command::parse(CommandId::NAV_SELECT, params)?, Command::NavigatePrev],
            other => bail!("unknown command '{}'\n{}", other, USAGE),
        };

        Ok(Self { catalog, commands })
    }
}

fn is_verb(arg: &str) -> bool {
    matches!(
        arg,
        "create" | "import" | "tags" | "tag" | "apply" | "remove" | "filter" | "show" | "next" | "prev"
    )
}

/// Run the application
pub fn run(config: CatalogConfig, args: &[String]) -> Result<()> {
    let invocation = Invocation::parse(args, config.general.auto_open.clone())?;
    tracing::info!("Catalog: {:?}", invocation.catalog);

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;

    let mut session = CatalogSession::new(config);
    runtime.block_on(async {
        for cmd in invocation.commands {
            let id = cmd.id();
            match session.dispatch(cmd).await {
                Ok(outcome) => report(&session, outcome),
                Err(e) if e.is_recoverable() => {
                    tracing::warn!("{} failed: {}", id, e);
                    println!("{}", e.user_message());
                }
                Err(e) => bail!("{}: {}", id, e.user_message()),
            }
        }
        Ok::<_, anyhow::Error>(())
    })?;

    if let Err(e) = session.config().save() {
        tracing::warn!("Failed to save config: {}", e);
    }
    Ok(())
}

fn report(session: &CatalogSession, outcome: Outcome) {
    match outcome {
        Outcome::Loading(run) => drain(run),
        Outcome::Imported(report) => {
            println!(
                "imported {}, skipped {} duplicates, {} missing",
                report.imported.len(),
                report.skipped(),
                report.missing.len()
            );
            for problem in report.problems() {
                println!("  {}", problem.user_message());
            }
            drain(report.refresh);
        }
        Outcome::TagCreated(tag) => println!("tag {} created ({})", tag.name, tag.id),
        Outcome::Tags(tags) => {
            for tag in tags {
                println!("{:>6}  {}", tag.id, tag.name);
            }
        }
        Outcome::Filtered(TagFilter::Unrestricted) => {
            for file in session.files() {
                println!("{:>6}  {}", file.id, file.path);
            }
        }
        Outcome::Filtered(TagFilter::Restricted(_)) => {
            for item in session.gallery_view() {
                println!("{:>6}  {}", item.file_id, item.name);
            }
        }
        Outcome::LinksChanged(n) => println!("{} links changed", n),
        Outcome::Display(Some(display)) => print_display(&display),
        Outcome::Display(None) => println!("nothing to show"),
    }
}

/// Wait for a thumbnail run, logging its progress
fn drain(run: PipelineHandle) {
    for event in run.events().iter() {
        match event {
            PipelineEvent::Progress { completed, total } => tracing::debug!("Thumbnails {}/{}", completed, total),
            PipelineEvent::ItemFailed { file_id, reason } => {
                tracing::warn!("Thumbnail for {} failed: {}", file_id, reason)
            }
            PipelineEvent::Finished { .. } => break,
        }
    }

    let report = run.wait();
    println!(
        "{} files, {} thumbnails ({} cached, {} placeholders)",
        report.total,
        report.completed,
        report.cache_hits,
        report.failures.len()
    );
}

fn print_display(display: &DisplayState) {
    let (width, height) = display.media.dimensions();
    println!("{:>6}  {}", display.file_id(), display.file.path);
    println!("        {}x{}, {} frame(s)", width, height, display.media.frame_count());
    if display.thumbnail.as_ref().is_some_and(|t| t.is_placeholder()) {
        println!("        thumbnail: placeholder");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_catalog_and_verb() {
        let inv = Invocation::parse(&args(&["pics.db", "next", "4"]), None).unwrap();
        assert_eq!(inv.catalog, PathBuf::from("pics.db"));
        assert_eq!(
            inv.commands,
            vec![
                Command::OpenDatabase(PathBuf::from("pics.db")),
                Command::SelectFile(4),
                Command::NavigateNext,
            ]
        );
    }

    #[test]
    fn test_parse_uses_fallback_catalog() {
        let inv = Invocation::parse(&args(&["tags"]), Some(PathBuf::from("auto.db"))).unwrap();
        assert_eq!(inv.catalog, PathBuf::from("auto.db"));
        assert_eq!(inv.commands.len(), 2);

        assert!(Invocation::parse(&args(&["tags"]), None).is_err());
    }

    #[test]
    fn test_parse_show_by_name() {
        let inv = Invocation::parse(&args(&["c.db", "show", "cat.png"]), None).unwrap();
        assert_eq!(inv.commands[1], Command::SelectFileByName("cat.png".into()));
    }

    #[test]
    fn test_parse_rejects_unknown_verb() {
        assert!(Invocation::parse(&args(&["c.db", "explode"]), None).is_err());
        assert!(Invocation::parse(&args(&["c.db"]), None).is_err());
    }
}
