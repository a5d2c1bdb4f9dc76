// CommandManager - Manages the timeline undo/redo stacks

use crate::command::commands::TimelineCommand;
use crate::command::trait_def::{CommandError, CommandResult, UndoableCommand};
use crate::config::HistoryConfig;
use crate::messaging::notification::{Notification, NotificationCategory};
use crate::session::SharedSession;
use crate::session::mutator::{SessionHealth, SessionMutator};
use std::collections::VecDeque;

/// Default maximum number of commands to keep in history
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// Manages command execution and undo/redo functionality
///
/// The CommandManager maintains two stacks:
/// - Undo stack: Commands that have been executed and can be undone
/// - Redo stack: Commands that have been undone and can be redone
///
/// When a new command is pushed:
/// 1. Execute the command (honouring its first-apply lifecycle)
/// 2. Discard the redo stack (we're on a new branch)
/// 3. Merge it into the top of the undo stack if both address the same slot,
///    otherwise push it
/// 4. Trim history if needed
///
/// Only the current top is ever offered a merge.
pub struct CommandManager {
    /// Stack of commands that can be undone (most recent at the back)
    undo_stack: VecDeque<TimelineCommand>,

    /// Stack of commands that can be redone (most recent at the back)
    redo_stack: VecDeque<TimelineCommand>,

    /// Maximum number of commands to keep in history
    max_history: usize,

    /// Undo depth at which the session matched its saved state
    clean_index: Option<usize>,
}

impl CommandManager {
    /// Create a new CommandManager with default settings
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_HISTORY)
    }

    /// Create a new CommandManager with a custom history limit
    pub fn with_capacity(max_history: usize) -> Self {
        let max_history = max_history.max(1);
        Self {
            undo_stack: VecDeque::with_capacity(max_history),
            redo_stack: VecDeque::new(),
            max_history,
            clean_index: Some(0),
        }
    }

    pub fn with_config(config: &HistoryConfig) -> Self {
        Self::with_capacity(config.max_history)
    }

    /// Execute a command and record it
    ///
    /// # Errors
    /// Returns an error if the session is inconsistent or refuses the
    /// mutation. The log is left untouched in both cases.
    pub fn push(
        &mut self,
        command: impl Into<TimelineCommand>,
        session: &mut dyn SessionMutator,
    ) -> CommandResult<()> {
        ensure_consistent(session)?;

        let mut command = command.into();
        if let Err(err) = command.execute(session) {
            let description = command.description();
            report_failure(NotificationCategory::Edit, "apply", &description, &err, session);
            return Err(err);
        }

        self.discard_redo_branch();

        let depth = self.undo_stack.len();
        if let Some(top) = self.undo_stack.back_mut() {
            if top.kind() == command.kind() && top.merge_with(&command) {
                tracing::debug!(
                    command = %top.description(),
                    undo_depth = depth,
                    "Command merged into top of history"
                );
                // The top entry now ends somewhere else
                if self.clean_index == Some(depth) {
                    self.clean_index = None;
                }
                if top.is_noop() {
                    // Edits cancelled each other out: the session is back
                    // where it was before the top entry
                    self.undo_stack.pop_back();
                    tracing::debug!(undo_depth = depth - 1, "No-op command dropped from history");
                }
                return Ok(());
            }
        }

        tracing::debug!(
            command = %command.description(),
            undo_depth = depth + 1,
            "Command pushed"
        );
        self.undo_stack.push_back(command);

        if self.undo_stack.len() > self.max_history {
            self.undo_stack.pop_front();
            self.clean_index = match self.clean_index {
                Some(0) | None => None,
                Some(index) => Some(index - 1),
            };
        }

        Ok(())
    }

    /// Undo the last command
    ///
    /// Pops the last command from the undo stack, reverts it, and pushes it to
    /// the redo stack. If the session refuses the revert, the command goes
    /// back where it was and a warning is surfaced.
    ///
    /// # Errors
    /// Returns an error if:
    /// - There are no commands to undo
    /// - The session refuses the inverse mutation
    pub fn undo(&mut self, session: &mut dyn SessionMutator) -> CommandResult<String> {
        ensure_consistent(session)?;

        let mut command = self
            .undo_stack
            .pop_back()
            .ok_or(CommandError::NothingToUndo)?;

        let description = command.description();

        if let Err(err) = command.undo(session) {
            self.undo_stack.push_back(command);
            report_failure(NotificationCategory::History, "undo", &description, &err, session);
            return Err(err);
        }

        tracing::debug!(command = %description, undo_remaining = self.undo_stack.len(), "Undo");
        self.redo_stack.push_back(command);

        Ok(description)
    }

    /// Redo the last undone command
    ///
    /// # Errors
    /// Returns an error if:
    /// - There are no commands to redo
    /// - The session refuses the forward mutation
    pub fn redo(&mut self, session: &mut dyn SessionMutator) -> CommandResult<String> {
        ensure_consistent(session)?;

        let mut command = self
            .redo_stack
            .pop_back()
            .ok_or(CommandError::NothingToRedo)?;

        let description = command.description();

        if let Err(err) = command.execute(session) {
            self.redo_stack.push_back(command);
            report_failure(NotificationCategory::History, "redo", &description, &err, session);
            return Err(err);
        }

        tracing::debug!(command = %description, redo_remaining = self.redo_stack.len(), "Redo");
        self.undo_stack.push_back(command);

        Ok(description)
    }

    /// Push while holding the shared session lock for the whole mutation
    pub fn push_shared(
        &mut self,
        command: impl Into<TimelineCommand>,
        session: &SharedSession,
    ) -> CommandResult<()> {
        let mut guard = session.lock().map_err(|_| CommandError::LockPoisoned)?;
        self.push(command, &mut *guard)
    }

    pub fn undo_shared(&mut self, session: &SharedSession) -> CommandResult<String> {
        let mut guard = session.lock().map_err(|_| CommandError::LockPoisoned)?;
        self.undo(&mut *guard)
    }

    pub fn redo_shared(&mut self, session: &SharedSession) -> CommandResult<String> {
        let mut guard = session.lock().map_err(|_| CommandError::LockPoisoned)?;
        self.redo(&mut *guard)
    }

    /// Check if there are commands that can be undone
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if there are commands that can be redone
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get a description of the command that would be undone
    pub fn undo_description(&self) -> Option<String> {
        self.undo_stack.back().map(|cmd| cmd.description())
    }

    /// Get a description of the command that would be redone
    pub fn redo_description(&self) -> Option<String> {
        self.redo_stack.back().map(|cmd| cmd.description())
    }

    /// The command the next push would be offered to merge with
    pub fn top(&self) -> Option<&TimelineCommand> {
        self.undo_stack.back()
    }

    /// Clear all command history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.clean_index = Some(0);
    }

    /// Get the number of commands in the undo stack
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the number of commands in the redo stack
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Record the current position as matching the saved project
    pub fn mark_clean(&mut self) {
        self.clean_index = Some(self.undo_stack.len());
    }

    /// Whether the session is back at the position recorded by `mark_clean`
    pub fn is_clean(&self) -> bool {
        self.clean_index == Some(self.undo_stack.len())
    }

    fn discard_redo_branch(&mut self) {
        if self.redo_stack.is_empty() {
            return;
        }
        tracing::debug!(discarded = self.redo_stack.len(), "Redo branch discarded");
        self.redo_stack.clear();
        if self
            .clean_index
            .is_some_and(|index| index > self.undo_stack.len())
        {
            self.clean_index = None;
        }
    }
}

impl Default for CommandManager {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_consistent(session: &dyn SessionMutator) -> CommandResult<()> {
    match session.health() {
        SessionHealth::Consistent => Ok(()),
        SessionHealth::Inconsistent { reason } => Err(CommandError::SessionInconsistent(reason)),
    }
}

fn report_failure(
    category: NotificationCategory,
    action: &str,
    description: &str,
    err: &CommandError,
    session: &mut dyn SessionMutator,
) {
    tracing::warn!(action, command = %description, error = %err, "Command refused");
    session.notify(Notification::warning(
        category,
        format!("Cannot {} \"{}\": {}", action, description, err),
    ));
}
