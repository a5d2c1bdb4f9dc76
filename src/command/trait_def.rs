// UndoableCommand trait definition

use crate::session::mutator::{SessionError, SessionMutator};
use thiserror::Error;

/// Result type for command operations
pub type CommandResult<T> = Result<T, CommandError>;

/// Errors that can occur while applying or reverting a command
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    /// The session refused the mutation; nothing was written
    #[error("Session refused the edit: {0}")]
    Session(#[from] SessionError),

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Nothing to redo")]
    NothingToRedo,

    /// A previous composite edit left the session half-applied
    #[error("Session is inconsistent: {0}")]
    SessionInconsistent(String),

    #[error("Macro '{label}' failed at step {step}: {source}")]
    MacroFailed {
        label: String,
        step: usize,
        source: Box<CommandError>,
    },

    #[error("Session lock poisoned")]
    LockPoisoned,
}

impl CommandError {
    /// True when the addressed item no longer exists in the session
    pub fn is_invalid_target(&self) -> bool {
        match self {
            CommandError::Session(err) => err.is_invalid_target(),
            CommandError::MacroFailed { source, .. } => source.is_invalid_target(),
            _ => false,
        }
    }
}

/// First-application lifecycle of a command
///
/// Some edits are performed by the interactive widget before the command
/// object exists. Such commands are created `AppliedExternally` and skip the
/// mutation on their first forward execution only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyState {
    /// The mutation already took effect outside the log
    AppliedExternally,
    /// Not yet applied; the first forward execution applies it
    PendingFirstApply,
    /// Every forward execution applies the mutation
    Applied,
}

impl ApplyState {
    /// Map the legacy "do it on first run" flag onto the lifecycle
    pub fn from_do_it(do_it: bool) -> Self {
        if do_it {
            ApplyState::PendingFirstApply
        } else {
            ApplyState::AppliedExternally
        }
    }

    /// Whether the next forward execution must touch the session
    pub fn should_apply(self) -> bool {
        !matches!(self, ApplyState::AppliedExternally)
    }

    pub fn is_first_forward(self) -> bool {
        !matches!(self, ApplyState::Applied)
    }

    pub fn mark_applied(&mut self) {
        *self = ApplyState::Applied;
    }
}

/// Kind identity used by the log before offering a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    ResizeClip,
    EditEffectParameters,
    ChangeEffectEnabled,
    GroupClips,
    SetItemMetadata,
    RequestMonitorRefresh,
    AddEffect,
    AddClip,
    MoveClip,
    EditTransition,
    LockTrack,
    EditGuide,
    Macro,
}

/// Trait for reversible timeline edits
///
/// `execute` is the forward action and `undo` the inverse. Running `execute`
/// then `undo` must restore the session exactly.
///
/// # Example
/// ```no_run
/// use timeline_undo::command::trait_def::{CommandKind, CommandResult, UndoableCommand};
/// use timeline_undo::session::SessionMutator;
///
/// struct RefreshTwice;
///
/// impl UndoableCommand for RefreshTwice {
///     fn execute(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
///         session.refresh_monitor();
///         session.refresh_monitor();
///         Ok(())
///     }
///
///     fn undo(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
///         session.refresh_monitor();
///         Ok(())
///     }
///
///     fn description(&self) -> String {
///         "Refresh twice".into()
///     }
///
///     fn kind(&self) -> CommandKind {
///         CommandKind::RequestMonitorRefresh
///     }
/// }
/// ```
pub trait UndoableCommand: Send {
    /// Apply the command's "after" state to the session
    fn execute(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()>;

    /// Apply the command's "before" state to the session
    fn undo(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()>;

    /// Human-readable label, e.g. for "Undo Resize clip"
    fn description(&self) -> String;

    fn kind(&self) -> CommandKind;

    /// Fold a just-executed `candidate` of the same kind into this command
    ///
    /// Returns true when the candidate was absorbed and must be dropped.
    /// Default implementation never merges.
    fn merge_with(&mut self, _candidate: &Self) -> bool
    where
        Self: Sized,
    {
        false
    }
}
