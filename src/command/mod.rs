// Command Pattern for timeline Undo/Redo
//
// Every timeline edit that must be undoable goes through a command in this
// module.
//
// Architecture:
// - UndoableCommand trait: execute() (forward), undo() (inverse), description(),
//   kind() and merge_with()
// - TimelineCommand: sealed enum over the concrete commands
// - CommandManager: undo/redo stacks, merge-with-top, redo-branch discard
//
// Integration with the session:
// - Commands run on the control thread and call SessionMutator primitives
// - Targets are addressed by (track, position, stack index) and re-resolved
//   on every execution, so commands survive item deletion/recreation
// - The session reports refresh requests to the view over a ring buffer

pub mod commands;
pub mod manager;
pub mod trait_def;

pub use commands::{
    AddClipCommand, AddEffectCommand, AddExtraDataCommand, ChangeEffectStateCommand,
    EditEffectCommand, EditGuideCommand, EditTransitionCommand, GroupClipsCommand, ItemChange,
    LockTrackCommand, MacroCommand, MoveClipCommand, RefreshMonitorCommand, ResizeClipCommand,
    TimelineCommand,
};
pub use manager::CommandManager;
pub use trait_def::{ApplyState, CommandError, CommandKind, CommandResult, UndoableCommand};
