//! Command system for catalog actions

use crate::session::{CatalogSession, DisplayState, ImportReport};
use crate::tag_filter::TagFilter;
use crate::thumbnail_pipeline::PipelineHandle;
use crate::AppError;
use anyhow::{bail, Context};
use app_db::{FileId, TagRecord};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// Command identifiers
pub struct CommandId;

impl CommandId {
    // Catalog commands
    pub const DB_OPEN: &'static str = "db.open";
    pub const DB_CREATE: &'static str = "db.create";
    pub const DB_IMPORT: &'static str = "db.import";

    // Tag commands
    pub const TAG_NEW: &'static str = "tag.new";
    pub const TAG_LIST: &'static str = "tag.list";
    pub const TAG_FILTER: &'static str = "tag.filter";
    pub const TAG_APPLY: &'static str = "tag.apply";
    pub const TAG_REMOVE: &'static str = "tag.remove";
    pub const TAG_OF_FILE: &'static str = "tag.of_file";

    // Navigation commands
    pub const NAV_SELECT: &'static str = "nav.select";
    pub const NAV_SELECT_NAME: &'static str = "nav.select_name";
    pub const NAV_NEXT_ITEM: &'static str = "nav.next_item";
    pub const NAV_PREV_ITEM: &'static str = "nav.prev_item";
}

/// A user action against the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    OpenDatabase(PathBuf),
    CreateDatabase(PathBuf),
    ImportFiles(Vec<PathBuf>),
    NewTag(String),
    ListTags,
    SetTagFilter(BTreeSet<String>),
    ApplyTag { tag: String, files: Vec<FileId> },
    RemoveTag { tag: String, files: Vec<FileId> },
    TagsOfFile(FileId),
    SelectFile(FileId),
    SelectFileByName(String),
    NavigateNext,
    NavigatePrev,
}

/// What a command produced
pub enum Outcome {
    /// Catalog (re)listed; thumbnails are being generated
    Loading(PipelineHandle),
    Imported(ImportReport),
    TagCreated(TagRecord),
    Tags(Vec<TagRecord>),
    Filtered(TagFilter),
    /// Number of links created or removed
    LinksChanged(usize),
    /// `None` when there was nothing to show (boundary or unknown file)
    Display(Option<DisplayState>),
}

impl Command {
    pub fn id(&self) -> &'static str {
        match self {
            Command::OpenDatabase(_) => CommandId::DB_OPEN,
            Command::CreateDatabase(_) => CommandId::DB_CREATE,
            Command::ImportFiles(_) => CommandId::DB_IMPORT,
            Command::NewTag(_) => CommandId::TAG_NEW,
            Command::ListTags => CommandId::TAG_LIST,
            Command::SetTagFilter(_) => CommandId::TAG_FILTER,
            Command::ApplyTag { .. } => CommandId::TAG_APPLY,
            Command::RemoveTag { .. } => CommandId::TAG_REMOVE,
            Command::TagsOfFile(_) => CommandId::TAG_OF_FILE,
            Command::SelectFile(_) => CommandId::NAV_SELECT,
            Command::SelectFileByName(_) => CommandId::NAV_SELECT_NAME,
            Command::NavigateNext => CommandId::NAV_NEXT_ITEM,
            Command::NavigatePrev => CommandId::NAV_PREV_ITEM,
        }
    }

    /// Whether the command needs an open catalog
    pub fn requires_store(&self) -> bool {
        !matches!(self, Command::OpenDatabase(_) | Command::CreateDatabase(_))
    }

    /// Build a command from a command id and its textual arguments
    pub fn parse(id: &str, args: &[String]) -> anyhow::Result<Self> {
        let cmd = match id {
            CommandId::DB_OPEN => Command::OpenDatabase(PathBuf::from(single(id, args)?)),
            CommandId::DB_CREATE => Command::CreateDatabase(PathBuf::from(single(id, args)?)),
            CommandId::DB_IMPORT => {
                if args.is_empty() {
                    bail!("{} needs at least one path", id);
                }
                Command::ImportFiles(args.iter().map(PathBuf::from).collect())
            }
            CommandId::TAG_NEW => Command::NewTag(single(id, args)?.to_string()),
            CommandId::TAG_LIST => Command::ListTags,
            CommandId::TAG_FILTER => Command::SetTagFilter(args.iter().cloned().collect()),
            CommandId::TAG_APPLY | CommandId::TAG_REMOVE => {
                let Some((tag, rest)) = args.split_first() else {
                    bail!("{} needs a tag name", id);
                };
                let files = rest.iter().map(|s| file_id(s)).collect::<anyhow::Result<Vec<_>>>()?;
                if id == CommandId::TAG_APPLY {
                    Command::ApplyTag { tag: tag.clone(), files }
                } else {
                    Command::RemoveTag { tag: tag.clone(), files }
                }
            }
            CommandId::TAG_OF_FILE => Command::TagsOfFile(file_id(single(id, args)?)?),
            CommandId::NAV_SELECT => Command::SelectFile(file_id(single(id, args)?)?),
            CommandId::NAV_SELECT_NAME => Command::SelectFileByName(single(id, args)?.to_string()),
            CommandId::NAV_NEXT_ITEM => Command::NavigateNext,
            CommandId::NAV_PREV_ITEM => Command::NavigatePrev,
            _ => bail!("Unknown command: {}", id),
        };
        Ok(cmd)
    }
}

fn single<'a>(id: &str, args: &'a [String]) -> anyhow::Result<&'a str> {
    match args {
        [one] => Ok(one.as_str()),
        _ => bail!("{} takes exactly one argument", id),
    }
}

fn file_id(s: &str) -> anyhow::Result<FileId> {
    s.parse().with_context(|| format!("invalid file id '{}'", s))
}

impl CatalogSession {
    /// Execute one command
    pub async fn dispatch(&mut self, cmd: Command) -> Result<Outcome, AppError> {
        tracing::debug!("Dispatch {}", cmd.id());
        if cmd.requires_store() && !self.is_open() {
            tracing::warn!("{} rejected: no catalog is open", cmd.id());
            return Err(AppError::StoreUnavailable);
        }

        let outcome = match cmd {
            Command::OpenDatabase(path) => Outcome::Loading(self.open_database(&path)?),
            Command::CreateDatabase(path) => Outcome::Loading(self.create_database(&path)?),
            Command::ImportFiles(paths) => Outcome::Imported(self.import_files(&paths)?),
            Command::NewTag(name) => Outcome::TagCreated(self.new_tag(&name)?),
            Command::ListTags => Outcome::Tags(self.tags()?),
            Command::SetTagFilter(tags) => Outcome::Filtered(self.set_tag_filter(tags)?.clone()),
            Command::ApplyTag { tag, files } => Outcome::LinksChanged(self.apply_tag(&tag, &files)?),
            Command::RemoveTag { tag, files } => Outcome::LinksChanged(self.remove_tag(&tag, &files)?),
            Command::TagsOfFile(id) => Outcome::Tags(self.tags_of_file(id)?),
            Command::SelectFile(id) => Outcome::Display(self.select_file(id).await?),
            Command::SelectFileByName(name) => Outcome::Display(self.select_file_by_name(&name).await?),
            Command::NavigateNext => Outcome::Display(self.navigate_next().await?),
            Command::NavigatePrev => Outcome::Display(self.navigate_prev().await?),
        };
        Ok(outcome)
    }
}
