//! Terminal Renderer
//!
//! Prints every rebuilt view as a timestamped section.

use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};

use super::{Notice, NoticeLevel, Renderer, View, ViewNode};
use crate::resource::ResourceKind;

/// Renders views as plain text to any writer (stdout in the binary)
pub struct TerminalRenderer<W: Write + Send> {
    out: Mutex<W>,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, W> {
        match self.out.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_section(out: &mut W, kind: ResourceKind, view: &View) -> io::Result<()> {
        let stamp = chrono::Local::now().format("%H:%M:%S");
        writeln!(out, "[{}] {} ({})", stamp, kind.title(), view.len())?;

        // Console verbs take the option value, so options carry no index
        for node in &view.nodes {
            match node {
                ViewNode::Line(text) => writeln!(out, "  {}", text)?,
                ViewNode::Option { text, .. } => writeln!(out, "  * {}", text)?,
            }
        }

        out.flush()
    }
}

impl<W: Write + Send> Renderer for TerminalRenderer<W> {
    fn render(&self, kind: ResourceKind, view: &View) {
        let mut out = self.lock();
        if let Err(e) = Self::write_section(&mut out, kind, view) {
            tracing::warn!(resource = %kind, "Failed to render view: {}", e);
        }
    }

    fn identity(&self, id: &str) {
        let mut out = self.lock();
        if let Err(e) = writeln!(out, "Node ID: {}", id).and_then(|_| out.flush()) {
            tracing::warn!("Failed to render node id: {}", e);
        }
    }

    fn notify(&self, notice: &Notice) {
        let tag = match notice.level {
            NoticeLevel::Success => "OK",
            NoticeLevel::Failure => "ERROR",
        };

        let mut out = self.lock();
        if let Err(e) = writeln!(out, "{}: {}", tag, notice.text).and_then(|_| out.flush()) {
            tracing::warn!("Failed to render notice: {}", e);
        }
    }
}
