//! Phase 2: Message assembly
//!
//! Picks exactly one source for the pull request title and body, optionally
//! hands it to the editor, and splits the result into title and body.

use crate::editor::Editor;
use crate::error::{Error, Result};
use crate::repo::LocalRepository;
use crate::submit::ResolvedRefs;
use regex::Regex;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::LazyLock;
use tracing::debug;

/// Name of the edit buffer inside the git directory
pub const MESSAGE_FILENAME: &str = "PULLREQ_EDITMSG";

/// `--file` value meaning standard input
pub const STDIN_FILENAME: &str = "-";

const COMMENT_CHAR: char = '#';

const PARAGRAPH_BREAK: &str = "\n\n";

static SIGNED_OFF_BY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\nSigned-off-by:\s.*$").expect("hardcoded regex is valid")
});

/// Message-related options
#[derive(Debug, Clone, Default)]
pub struct MessageOptions {
    /// `-m` values, one paragraph each
    pub messages: Vec<String>,
    /// `-F` path, or `-` for stdin
    pub file: Option<String>,
    /// Open the editor on `-m`/`-F` content
    pub edit: bool,
    /// Take the message from the first commit without editing
    pub no_edit: bool,
    /// Issue to convert
    pub issue: Option<u64>,
}

/// Where the title and body come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageSource {
    /// `-m` values joined by blank lines
    ExplicitText(String),
    /// Contents of a file (or stdin)
    File(String),
    /// Oldest commit between base and head, unedited
    SingleCommitNoEdit,
    /// Computed default, always edited
    Interactive,
    /// No message; an issue is converted
    IssueConversion,
}

impl MessageSource {
    /// Select the source for `options`; earlier variants win
    pub fn select(options: &MessageOptions) -> Self {
        if !options.messages.is_empty() {
            Self::ExplicitText(options.messages.join("\n\n"))
        } else if let Some(path) = &options.file {
            Self::File(path.clone())
        } else if options.no_edit {
            Self::SingleCommitNoEdit
        } else if options.issue.is_none() {
            Self::Interactive
        } else {
            Self::IssueConversion
        }
    }
}

/// Title and body ready for submission
#[derive(Debug, Clone)]
pub struct AssembledMessage {
    /// First paragraph
    pub title: String,
    /// Everything after the first paragraph
    pub body: String,
    message_file: Option<PathBuf>,
}

impl AssembledMessage {
    /// Message with no staged edit buffer
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            message_file: None,
        }
    }

    /// Remove the edit buffer kept for recovery
    pub fn cleanup(&self) -> Result<()> {
        match &self.message_file {
            Some(path) if path.exists() => Ok(fs::remove_file(path)?),
            _ => Ok(()),
        }
    }
}

/// Message content plus commented annotations
///
/// Annotations are shown in the editor but never become title or body.
#[derive(Debug, Default)]
pub struct MessageBuilder {
    /// Content that becomes title and body
    pub message: String,
    /// Open the editor before extracting
    pub edit: bool,
    annotations: Vec<String>,
    file: Option<PathBuf>,
}

impl MessageBuilder {
    /// New builder persisting edits to `file`
    pub fn new(file: Option<PathBuf>) -> Self {
        Self {
            file,
            ..Self::default()
        }
    }

    /// Add a commented section shown below the content
    pub fn add_annotation(&mut self, text: impl Into<String>) {
        self.annotations.push(text.into());
    }

    /// Text handed to the editor
    pub fn edit_buffer(&self) -> String {
        let comments: Vec<String> = self
            .annotations
            .iter()
            .map(|section| {
                section
                    .lines()
                    .map(|line| {
                        if line.is_empty() {
                            COMMENT_CHAR.to_string()
                        } else {
                            format!("{COMMENT_CHAR} {line}")
                        }
                    })
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .collect();

        format!("{}\n\n{}\n", self.message, comments.join("\n"))
    }

    /// Edit if requested, then split into (title, body)
    pub fn extract(&self, editor: &dyn Editor) -> Result<(String, String)> {
        if !self.edit {
            return Ok(split_title_body(&self.message));
        }

        let initial = match self.previous_edit()? {
            Some(previous) => {
                debug!("reusing message from a previous attempt");
                previous
            }
            None => self.edit_buffer(),
        };

        let edited = editor.edit(&initial)?.ok_or(Error::EditAborted)?;
        if let Some(path) = &self.file {
            fs::write(path, &edited)?;
        }

        Ok(split_title_body(&strip_comments(&edited)))
    }

    fn previous_edit(&self) -> Result<Option<String>> {
        match &self.file {
            Some(path) if path.is_file() => {
                let content = fs::read_to_string(path)?;
                Ok((!content.trim().is_empty()).then_some(content))
            }
            _ => Ok(None),
        }
    }

    fn into_message_file(self) -> Option<PathBuf> {
        self.file
    }
}

/// Drop `#` comment lines
pub fn strip_comments(text: &str) -> String {
    text.lines()
        .filter(|line| !line.starts_with(COMMENT_CHAR))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split text into title (first paragraph) and body (the rest)
///
/// The first paragraph ends at the first empty line. Its lines are trimmed
/// and joined with spaces; text that opens with an empty line has no title.
pub fn split_title_body(text: &str) -> (String, String) {
    let (head, body) = text.split_once(PARAGRAPH_BREAK).unwrap_or((text, ""));

    let title = head
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    (title, body.trim().to_string())
}

/// Remove a trailing `Signed-off-by:` line
pub fn strip_signoff(message: &str) -> String {
    SIGNED_OFF_BY.replace(message, "").into_owned()
}

/// Read a message file; `-` reads standard input
pub fn read_message_file(path: &str) -> Result<String> {
    let content = if path == STDIN_FILENAME {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(path)?
    };

    Ok(content.replace("\r\n", "\n"))
}

fn request_header(refs: &ResolvedRefs) -> String {
    format!(
        "Requesting a pull to {} from {}\n\n\
         Write a message for this pull request. The first block\n\
         of text is the title and the rest is the description.",
        refs.qualified_base(),
        refs.qualified_head()
    )
}

fn commits_between(repo: &dyn LocalRepository, base: &str, head: &str) -> Vec<String> {
    repo.ref_list(base, head).unwrap_or_else(|e| {
        debug!(base, head, error = %e, "cannot list commits");
        Vec::new()
    })
}

/// Assemble the title and body for `refs`
///
/// `push` selects which head revision the computed default looks at: the
/// local branch when it is about to be pushed, the remote one otherwise.
pub fn assemble_message(
    repo: &dyn LocalRepository,
    editor: &dyn Editor,
    refs: &ResolvedRefs,
    options: &MessageOptions,
    push: bool,
) -> Result<AssembledMessage> {
    let message_file = repo.git_dir().ok().map(|dir| dir.join(MESSAGE_FILENAME));
    let mut builder = MessageBuilder::new(message_file);
    builder.add_annotation(request_header(refs));

    match MessageSource::select(options) {
        MessageSource::ExplicitText(text) => {
            builder.message = text;
            builder.edit = options.edit;
        }
        MessageSource::File(path) => {
            builder.message = read_message_file(&path)?;
            builder.edit = options.edit;
        }
        MessageSource::SingleCommitNoEdit => {
            let commits = commits_between(repo, &refs.base_tracking, &refs.head_ref);
            let oldest = commits.last().ok_or_else(|| Error::NoCommitsFound {
                base: refs.base_tracking.clone(),
                head: refs.head_ref.clone(),
            })?;
            builder.message = repo.commit_message(oldest)?;
        }
        MessageSource::Interactive => {
            builder.edit = true;
            builder.message = default_message(repo, refs, push, &mut builder)?;
        }
        MessageSource::IssueConversion => {}
    }

    let (title, body) = builder.extract(editor)?;
    if title.is_empty() && options.issue.is_none() {
        return Err(Error::EmptyTitle);
    }

    Ok(AssembledMessage {
        title,
        body,
        message_file: builder.into_message_file(),
    })
}

/// Content proposed when the user gave no message
fn default_message(
    repo: &dyn LocalRepository,
    refs: &ResolvedRefs,
    push: bool,
    builder: &mut MessageBuilder,
) -> Result<String> {
    let head = if push { &refs.head_ref } else { &refs.head_tracking };
    let commits = commits_between(repo, &refs.base_tracking, head);

    let mut message = String::new();
    match commits.as_slice() {
        [only] => message = strip_signoff(&repo.commit_message(only)?),
        [] => {}
        _ => {
            let log = repo.log(&refs.base_tracking, head)?;
            builder.add_annotation(format!("\nChanges:\n\n{}", log.trim()));
        }
    }

    if message.is_empty() && repo.workdir()?.is_some() {
        if let Some(template) = repo.pull_request_template()? {
            message = format!("\n\n\n{template}");
        }
    }

    Ok(message)
}
