//! Interactive shell over a [`UserStore`].
//!
//! A [`Session`] is either idle or editing one record through a draft copy.
//! `edit` loads the draft, `set` changes it, `save` commits it with
//! [`UserStore::update`] and `cancel` throws it away. Nothing touches the
//! stored record until `save` succeeds.

pub mod command;

use std::fmt::Write;

use colored::Colorize;
use thiserror::Error;

use crate::error::StoreError;
use crate::models::{Field, UserDraft, UserId};
use crate::output::OutputFormat;
use crate::store::UserStore;

pub use command::{parse_command, Command, CommandError};

/// Errors from running a shell line. Both kinds leave the session usable.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What the driver should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print the text (possibly empty) and read the next line.
    Continue(String),
    Quit,
}

/// Whether a draft is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditState {
    Idle,
    Editing { id: UserId, draft: UserDraft },
}

/// Shell state: the store plus the open draft, if any.
pub struct Session {
    store: UserStore,
    state: EditState,
    format: OutputFormat,
}

impl Session {
    pub fn new(store: UserStore, format: OutputFormat) -> Self {
        Self {
            store,
            state: EditState::Idle,
            format,
        }
    }

    pub fn store(&self) -> &UserStore {
        &self.store
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    /// Prompt reflecting the editing state.
    pub fn prompt(&self) -> String {
        match &self.state {
            EditState::Idle => format!("{}> ", crate::constants::APP_NAME),
            EditState::Editing { id, .. } => {
                format!("{} [edit {id}]> ", crate::constants::APP_NAME)
            }
        }
    }

    /// Parse and run one input line. Blank lines do nothing.
    pub async fn run_line(&mut self, line: &str) -> Result<Outcome, SessionError> {
        match parse_command(line)? {
            Some(command) => self.execute(command).await,
            None => Ok(Outcome::Continue(String::new())),
        }
    }

    pub async fn execute(&mut self, command: Command) -> Result<Outcome, SessionError> {
        let text = match command {
            Command::List => self.render(),
            Command::Refresh => {
                let count = self.store.refresh().await?.len();
                format!("{} Loaded {count} user(s).", "✔".green())
            }
            Command::Add(assignments) => {
                let mut draft = UserDraft {
                    gender: self.store.options().default_gender,
                    ..UserDraft::default()
                };
                apply(&mut draft, &assignments)?;
                let created = self.store.create(draft).await?;
                format!("{} Created user {} ({}).", "✔".green(), created.id, created.name)
            }
            Command::Edit(id) => {
                let draft = self.store.edit(&id)?;
                let text = describe(&id, &draft);
                self.state = EditState::Editing { id, draft };
                text
            }
            Command::Set(assignments) => {
                let EditState::Editing { id, draft } = &mut self.state else {
                    return Err(CommandError::NotEditing.into());
                };
                // Apply to a copy so a bad value leaves the draft as it was.
                let mut updated = draft.clone();
                apply(&mut updated, &assignments)?;
                *draft = updated;
                describe(id, draft)
            }
            Command::Show => match &self.state {
                EditState::Editing { id, draft } => describe(id, draft),
                EditState::Idle => return Err(CommandError::NotEditing.into()),
            },
            Command::Save => {
                let EditState::Editing { id, draft } = &self.state else {
                    return Err(CommandError::NotEditing.into());
                };
                let updated = self.store.update(id, draft.clone()).await?;
                self.state = EditState::Idle;
                format!("{} Updated user {} ({}).", "✔".green(), updated.id, updated.name)
            }
            Command::Cancel => {
                if self.state == EditState::Idle {
                    return Err(CommandError::NotEditing.into());
                }
                self.state = EditState::Idle;
                "Edit discarded.".to_string()
            }
            Command::Delete(id) => {
                self.store.delete(&id).await?;
                if matches!(&self.state, EditState::Editing { id: editing, .. } if editing.matches(&id)) {
                    self.state = EditState::Idle;
                }
                format!("{} Deleted user {id}.", "✔".green())
            }
            Command::Help => command::HELP.to_string(),
            Command::Quit => return Ok(Outcome::Quit),
        };
        Ok(Outcome::Continue(text))
    }

    fn render(&self) -> String {
        self.format.renderer().render(self.store.list())
    }
}

fn apply(draft: &mut UserDraft, assignments: &[(Field, String)]) -> Result<(), CommandError> {
    for (field, value) in assignments {
        draft
            .set(*field, value)
            .map_err(CommandError::BadValue)?;
    }
    Ok(())
}

/// Multi-line view of a draft being edited.
fn describe(id: &UserId, draft: &UserDraft) -> String {
    let mut out = format!("Editing user {}\n", id.to_string().bold());
    for field in Field::ALL {
        let label = field.as_str();
        let value = match field {
            Field::Name => draft.name.clone(),
            Field::Username => draft.username.clone(),
            Field::Email => draft.email.clone(),
            Field::Phone => draft.phone.clone(),
            Field::Website => draft.website.clone(),
            Field::Gender => draft.gender.to_string(),
        };
        // Writing to a String cannot fail.
        let _ = writeln!(out, "  {label}:{:pad$}{value}", "", pad = 8 - label.len());
    }
    let _ = write!(out, "{}", "`set k=v`, then `save` or `cancel`.".dimmed());
    out
}
