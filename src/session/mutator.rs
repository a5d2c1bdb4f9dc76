// Mutation interface between timeline commands and the edit session
//
// Commands never touch session internals directly. Every mutator resolves
// its target by address at call time and validates the whole payload before
// writing anything, so a refused call leaves the session untouched.

use crate::messaging::notification::Notification;
use crate::session::types::{
    Clip, EffectInstance, EffectParams, GroupId, Guide, ItemId, ItemInfo, Position,
};
use thiserror::Error;

pub type SessionResult<T> = Result<T, SessionError>;

/// Group membership of every item a grouping call changed, before the call
pub type GroupSnapshot = Vec<(ItemId, Option<GroupId>)>;

/// Errors reported by session mutators
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("Track {0} does not exist")]
    TrackNotFound(usize),

    #[error("No clip on track {track} at {position}")]
    ClipNotFound { track: usize, position: Position },

    #[error("No transition on track {track} at {position}")]
    TransitionNotFound { track: usize, position: Position },

    #[error("Clip on track {track} at {position} has no effect at stack index {index}")]
    EffectNotFound {
        track: usize,
        position: Position,
        index: usize,
    },

    #[error("Item {0} does not exist")]
    ItemNotFound(ItemId),

    #[error("Clip bounds changed: expected {expected}, found {actual}")]
    BoundsMismatch { expected: ItemInfo, actual: ItemInfo },

    #[error("Invalid bounds {info}: {reason}")]
    InvalidBounds { info: ItemInfo, reason: String },

    #[error("{info} overlaps an existing item")]
    Overlap { info: ItemInfo },

    #[error("Track {0} is locked")]
    TrackLocked(usize),

    #[error("Item {0} is already on the timeline")]
    DuplicateItem(ItemId),
}

impl SessionError {
    /// True when the addressed item/track/effect no longer resolves
    pub fn is_invalid_target(&self) -> bool {
        matches!(
            self,
            SessionError::TrackNotFound(_)
                | SessionError::ClipNotFound { .. }
                | SessionError::TransitionNotFound { .. }
                | SessionError::EffectNotFound { .. }
                | SessionError::ItemNotFound(_)
                | SessionError::BoundsMismatch { .. }
        )
    }
}

/// Whether the session state can still be trusted
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionHealth {
    #[default]
    Consistent,
    /// A composite mutation failed and could not be rolled back
    Inconsistent { reason: String },
}

impl SessionHealth {
    pub fn is_consistent(&self) -> bool {
        matches!(self, SessionHealth::Consistent)
    }
}

/// Mutation primitives the timeline commands call into
///
/// Implementations must be idempotent for the same payload: applying the
/// same resize, parameter snapshot, enable flag, grouping or metadata value
/// twice leaves the session as if it had been applied once.
pub trait SessionMutator {
    /// Move/trim the clip currently bounded by `from` to the bounds `to`
    ///
    /// `dont_worry` skips the overlap check when the caller already
    /// validated the bounds (interactive drag preview).
    fn resize_clip(&mut self, from: &ItemInfo, to: &ItemInfo, dont_worry: bool)
    -> SessionResult<()>;

    /// Replace the parameter snapshot of one effect in a clip's stack
    fn update_effect(
        &mut self,
        track: usize,
        position: Position,
        stack_index: usize,
        params: &EffectParams,
        refresh_stack: bool,
    ) -> SessionResult<()>;

    /// Set the enabled flag of every listed effect on one clip
    fn set_effects_enabled(
        &mut self,
        track: usize,
        position: Position,
        indexes: &[usize],
        enabled: bool,
        refresh_stack: bool,
    ) -> SessionResult<()>;

    /// Group (or ungroup) the listed clips and transitions
    ///
    /// Listed items leave whatever group they were in. Groups are keyed by
    /// their smallest member id and a group left with one member dissolves.
    /// Returns the previous membership of every item that changed.
    fn group_items(
        &mut self,
        clips: &[ItemInfo],
        transitions: &[ItemInfo],
        group: bool,
    ) -> SessionResult<GroupSnapshot>;

    /// Put items back into the groups recorded by `group_items`
    fn restore_groups(&mut self, snapshot: &[(ItemId, Option<GroupId>)]) -> SessionResult<()>;

    /// Set a metadata value on an item; an empty value deletes the key
    fn set_item_data(&mut self, item: ItemId, key: &str, value: &str) -> SessionResult<()>;

    /// Ask the viewer to re-render the current frame
    fn refresh_monitor(&mut self);

    /// Place a clip (with its id, effects and group) on the timeline
    fn insert_clip(&mut self, clip: &Clip) -> SessionResult<()>;

    /// Take the clip bounded by `info` off the timeline
    ///
    /// Returns `None` when nothing sits at `info.start` any more.
    fn remove_clip(&mut self, info: &ItemInfo) -> SessionResult<Option<Clip>>;

    /// Move a clip, possibly to another track, keeping its duration
    fn move_clip(&mut self, from: &ItemInfo, to: &ItemInfo, refresh_monitor: bool)
    -> SessionResult<()>;

    fn insert_effect(
        &mut self,
        track: usize,
        position: Position,
        stack_index: usize,
        effect: &EffectInstance,
    ) -> SessionResult<()>;

    fn remove_effect(
        &mut self,
        track: usize,
        position: Position,
        stack_index: usize,
    ) -> SessionResult<EffectInstance>;

    fn update_transition(
        &mut self,
        track: usize,
        position: Position,
        params: &EffectParams,
    ) -> SessionResult<()>;

    fn set_track_locked(&mut self, track: usize, locked: bool) -> SessionResult<()>;

    /// Remove the guide at `remove` (if any), then insert `insert` (if any)
    ///
    /// Returns the guide `insert` overwrote, if one was there.
    fn edit_guide(&mut self, remove: Option<Position>, insert: Option<&Guide>) -> Option<Guide>;

    /// Surface a user-visible warning
    fn notify(&mut self, notification: Notification);

    fn health(&self) -> SessionHealth;

    fn mark_inconsistent(&mut self, reason: String);
}
