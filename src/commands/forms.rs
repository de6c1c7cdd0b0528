//! Input forms
//!
//! Each command is built from the current values of its input fields.
//! Taking a command out of a form clears the text inputs at once, before
//! the request is sent; they are not restored if it later fails.
//! Selections (destination peer, search match) stay selected.

use super::Command;

/// A single text input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputField {
    value: String,
}

impl InputField {
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Read the value and clear the field
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.value)
    }
}

/// Something a command can be taken out of
pub trait Form {
    /// Build the command from the current values, clearing text inputs
    fn take_command(&mut self) -> Command;
}

#[derive(Debug, Clone, Default)]
pub struct MessageForm {
    pub text: InputField,
}

impl Form for MessageForm {
    fn take_command(&mut self) -> Command {
        Command::PostMessage {
            text: self.text.take(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PeerForm {
    pub addr: InputField,
}

impl Form for PeerForm {
    fn take_command(&mut self) -> Command {
        Command::AddPeer {
            addr: self.addr.take(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PrivateMessageForm {
    /// Selected routable peer
    pub dest: String,
    pub text: InputField,
}

impl Form for PrivateMessageForm {
    fn take_command(&mut self) -> Command {
        Command::PrivateMessage {
            dest: self.dest.clone(),
            text: self.text.take(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShareForm {
    pub file: InputField,
}

impl Form for ShareForm {
    fn take_command(&mut self) -> Command {
        Command::ShareFile {
            name: self.file.take(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RequestForm {
    pub dest: InputField,
    pub file_name: InputField,
    pub meta_hash: InputField,
}

impl Form for RequestForm {
    fn take_command(&mut self) -> Command {
        Command::RequestFile {
            dest: self.dest.take(),
            file_name: self.file_name.take(),
            meta_hash: self.meta_hash.take(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SearchForm {
    pub keywords: InputField,
}

impl Form for SearchForm {
    fn take_command(&mut self) -> Command {
        Command::Search {
            keywords: self.keywords.take(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct DownloadForm {
    /// Selected search match, prefix already stripped
    pub selected: String,
}

impl Form for DownloadForm {
    fn take_command(&mut self) -> Command {
        Command::Download {
            name: self.selected.clone(),
        }
    }
}

/// All forms of the GUI
#[derive(Debug, Clone, Default)]
pub struct Forms {
    pub message: MessageForm,
    pub peer: PeerForm,
    pub private_message: PrivateMessageForm,
    pub share: ShareForm,
    pub request: RequestForm,
    pub search: SearchForm,
    pub download: DownloadForm,
}
