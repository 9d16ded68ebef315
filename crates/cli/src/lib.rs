//! Back up the folders of a remote mailbox to the local file system.
//!
//! [`cli`] describes the command line and turns parsed values into
//! [`cli::Settings`]; [`backup::run`] drives a [`backup::MailClient`] over the
//! selected folders.

pub mod backup;
pub mod cli;
pub mod folders;
pub mod organise;
pub mod tls;
