//! Line console for the `watch` mode.
//!
//! Each input line fills the matching form; the form is then emptied into a
//! command, so inputs are cleared before the request goes out.

use crate::commands::{Command, Form, Forms};

pub const USAGE: &str = "\
Commands:
  msg <text>                         broadcast a message
  peer <ip[:port]>                   add a peer
  pm <dest> <text>                   private message to a routable peer
  share <file>                       share a local file
  request <dest> <file> <metahash>   request a file from a peer
  search <keyword,keyword,...>       search for files
  download <name>                    download a search match
  help                               show this help
  quit                               stop the client";

/// What the caller should do with one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleAction {
    Submit(Command),
    Help,
    Quit,
    Nothing,
    Unknown(String),
}

/// Turns console lines into commands through the GUI forms
#[derive(Debug, Default)]
pub struct Console {
    forms: Forms,
}

impl Console {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn forms(&self) -> &Forms {
        &self.forms
    }

    pub fn interpret(&mut self, line: &str) -> ConsoleAction {
        let line = line.trim();
        if line.is_empty() {
            return ConsoleAction::Nothing;
        }

        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let forms = &mut self.forms;
        let command = match verb {
            "help" | "?" => return ConsoleAction::Help,
            "quit" | "exit" => return ConsoleAction::Quit,
            "msg" => {
                forms.message.text.set(rest);
                forms.message.take_command()
            }
            "peer" => {
                forms.peer.addr.set(rest);
                forms.peer.take_command()
            }
            "pm" => {
                let (dest, text) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                forms.private_message.dest = dest.to_string();
                forms.private_message.text.set(text.trim());
                forms.private_message.take_command()
            }
            "share" => {
                forms.share.file.set(rest);
                forms.share.take_command()
            }
            "request" => {
                let mut args = rest.split_whitespace();
                forms.request.dest.set(args.next().unwrap_or_default());
                forms.request.file_name.set(args.next().unwrap_or_default());
                forms.request.meta_hash.set(args.next().unwrap_or_default());
                forms.request.take_command()
            }
            "search" => {
                forms.search.keywords.set(rest);
                forms.search.take_command()
            }
            "download" => {
                forms.download.selected = rest.to_string();
                forms.download.take_command()
            }
            _ => return ConsoleAction::Unknown(verb.to_string()),
        };

        ConsoleAction::Submit(command)
    }
}
