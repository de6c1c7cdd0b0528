//! View Rendering
//!
//! A renderer receives the full view of a resource every time its cache
//! changes and rebuilds the visible representation from scratch. There is
//! no incremental update: the collections are small (tens to low hundreds
//! of entries) and a rebuild is cheap.

mod terminal;

pub use terminal::TerminalRenderer;

use crate::resource::{Resource, ResourceKind};

/// Prefix the gossiper puts in front of every search match
pub const SHARED_FILES_PREFIX: &str = "_SharedFiles/";

/// Number of characters stripped from search matches by default
pub const DEFAULT_SEARCH_PREFIX_LEN: usize = SHARED_FILES_PREFIX.len();

/// One visible element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewNode {
    /// A plain line of text
    Line(String),
    /// A selectable entry
    Option { value: String, text: String },
}

impl ViewNode {
    /// Text shown to the user
    pub fn text(&self) -> &str {
        match self {
            ViewNode::Line(text) => text,
            ViewNode::Option { text, .. } => text,
        }
    }
}

/// Presentation settings shared by all views
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    /// Characters stripped from the start of each search match
    pub search_prefix_len: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            search_prefix_len: DEFAULT_SEARCH_PREFIX_LEN,
        }
    }
}

impl ViewOptions {
    /// Display and selection value of a search match
    pub fn strip_search_prefix(&self, entry: &str) -> String {
        entry.chars().skip(self.search_prefix_len).collect()
    }
}

/// Full visible representation of one resource, in collection order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    pub nodes: Vec<ViewNode>,
}

impl View {
    /// Build the view of `items` from scratch
    pub fn build<R: Resource>(items: &[R::Item], options: &ViewOptions) -> Self {
        Self {
            nodes: items.iter().map(|item| R::node(item, options)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Values of the selectable entries
    pub fn options(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|node| match node {
            ViewNode::Option { value, .. } => Some(value.as_str()),
            ViewNode::Line(_) => None,
        })
    }
}

/// Severity of a user-facing notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Failure,
}

/// Acknowledgement or failure shown after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }

    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Failure,
            text: text.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.level == NoticeLevel::Success
    }
}

/// Destination of rebuilt views.
///
/// Called from poller tasks, so implementations must be shareable across
/// threads.
pub trait Renderer: Send + Sync {
    /// Replace the visible representation of `kind` with `view`
    fn render(&self, kind: ResourceKind, view: &View);

    /// Show the gossiper's node id. Called at most once per session.
    fn identity(&self, _id: &str) {}

    /// Surface a command outcome
    fn notify(&self, _notice: &Notice) {}
}
