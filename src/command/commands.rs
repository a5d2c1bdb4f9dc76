// Concrete timeline command implementations

use crate::command::trait_def::{
    ApplyState, CommandError, CommandKind, CommandResult, UndoableCommand,
};
use crate::session::mutator::{GroupSnapshot, SessionMutator};
use crate::session::types::{
    Clip, EffectInstance, EffectParams, Guide, ItemId, ItemInfo, Position,
};

/// Command to move/trim a clip to new bounds
///
/// Each committed resize is its own undo step: intermediate drag states are
/// never committed, so there is nothing to merge.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeClipCommand {
    from: ItemInfo,
    to: ItemInfo,
    dont_worry: bool,
    state: ApplyState,
}

impl ResizeClipCommand {
    /// Create a resize command
    ///
    /// # Arguments
    /// * `from` - Bounds before the resize
    /// * `to` - Bounds after the resize
    /// * `do_it` - False when the view already resized the clip
    /// * `dont_worry` - Skip overlap validation (bounds already checked)
    pub fn new(from: ItemInfo, to: ItemInfo, do_it: bool, dont_worry: bool) -> Self {
        Self {
            from,
            to,
            dont_worry,
            state: ApplyState::from_do_it(do_it),
        }
    }

    pub fn from_info(&self) -> ItemInfo {
        self.from
    }

    pub fn to_info(&self) -> ItemInfo {
        self.to
    }
}

impl UndoableCommand for ResizeClipCommand {
    fn execute(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        if self.state.should_apply() {
            session.resize_clip(&self.from, &self.to, self.dont_worry)?;
        }
        self.state.mark_applied();
        Ok(())
    }

    fn undo(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        session.resize_clip(&self.to, &self.from, self.dont_worry)?;
        Ok(())
    }

    fn description(&self) -> String {
        "Resize clip".to_string()
    }

    fn kind(&self) -> CommandKind {
        CommandKind::ResizeClip
    }
}

/// Command to replace the parameters of one effect in a clip's stack
///
/// Successive edits of the same effect slot merge, so a slider drag becomes
/// one undo step whose "before" stays pinned to the value at drag start.
#[derive(Debug, Clone, PartialEq)]
pub struct EditEffectCommand {
    track: usize,
    position: Position,
    stack_index: usize,
    before: EffectParams,
    after: EffectParams,
    refresh_stack: bool,
    state: ApplyState,
}

impl EditEffectCommand {
    pub fn new(
        track: usize,
        position: Position,
        stack_index: usize,
        before: EffectParams,
        after: EffectParams,
        refresh_stack: bool,
        do_it: bool,
    ) -> Self {
        Self {
            track,
            position,
            stack_index,
            before,
            after,
            refresh_stack,
            state: ApplyState::from_do_it(do_it),
        }
    }

    pub fn before(&self) -> &EffectParams {
        &self.before
    }

    pub fn after(&self) -> &EffectParams {
        &self.after
    }

    /// True when before and after are identical
    pub fn is_noop(&self) -> bool {
        self.before == self.after
    }
}

impl UndoableCommand for EditEffectCommand {
    fn execute(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        if self.state.should_apply() {
            session.update_effect(
                self.track,
                self.position,
                self.stack_index,
                &self.after,
                self.refresh_stack,
            )?;
        }
        self.state.mark_applied();
        self.refresh_stack = true;
        Ok(())
    }

    fn undo(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        session.update_effect(
            self.track,
            self.position,
            self.stack_index,
            &self.before,
            true,
        )?;
        Ok(())
    }

    fn description(&self) -> String {
        format!("Edit effect {}", effect_label(&self.after))
    }

    fn kind(&self) -> CommandKind {
        CommandKind::EditEffectParameters
    }

    fn merge_with(&mut self, candidate: &Self) -> bool {
        if self.track != candidate.track
            || self.stack_index != candidate.stack_index
            || self.position != candidate.position
        {
            return false;
        }
        self.after = candidate.after.clone();
        true
    }
}

/// Command to enable or disable a batch of effects on one clip
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEffectStateCommand {
    track: usize,
    position: Position,
    indexes: Vec<usize>,
    disable: bool,
    refresh_stack: bool,
    state: ApplyState,
}

impl ChangeEffectStateCommand {
    pub fn new(
        track: usize,
        position: Position,
        indexes: Vec<usize>,
        disable: bool,
        refresh_stack: bool,
        do_it: bool,
    ) -> Self {
        Self {
            track,
            position,
            indexes,
            disable,
            refresh_stack,
            state: ApplyState::from_do_it(do_it),
        }
    }

    pub fn indexes(&self) -> &[usize] {
        &self.indexes
    }
}

impl UndoableCommand for ChangeEffectStateCommand {
    fn execute(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        if self.state.should_apply() {
            session.set_effects_enabled(
                self.track,
                self.position,
                &self.indexes,
                !self.disable,
                self.refresh_stack,
            )?;
        }
        self.state.mark_applied();
        self.refresh_stack = true;
        Ok(())
    }

    fn undo(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        // Undo always refreshes the stack so the panel shows the reverted state
        session.set_effects_enabled(self.track, self.position, &self.indexes, self.disable, true)?;
        Ok(())
    }

    fn description(&self) -> String {
        let verb = if self.disable { "Disable" } else { "Enable" };
        if self.indexes.len() == 1 {
            format!("{} effect", verb)
        } else {
            format!("{} effects", verb)
        }
    }

    fn kind(&self) -> CommandKind {
        CommandKind::ChangeEffectEnabled
    }
}

/// Command to group or ungroup clips and transitions
#[derive(Debug, Clone, PartialEq)]
pub struct GroupClipsCommand {
    clips: Vec<ItemInfo>,
    transitions: Vec<ItemInfo>,
    group: bool,
    /// Membership replaced by the last forward, restored on undo
    previous: Option<GroupSnapshot>,
    state: ApplyState,
}

impl GroupClipsCommand {
    pub fn new(
        clips: Vec<ItemInfo>,
        transitions: Vec<ItemInfo>,
        group: bool,
        do_it: bool,
    ) -> Self {
        Self {
            clips,
            transitions,
            group,
            previous: None,
            state: ApplyState::from_do_it(do_it),
        }
    }
}

impl UndoableCommand for GroupClipsCommand {
    fn execute(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        if self.state.should_apply() {
            let previous = session.group_items(&self.clips, &self.transitions, self.group)?;
            self.previous = Some(previous);
        }
        self.state.mark_applied();
        Ok(())
    }

    fn undo(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        match &self.previous {
            Some(previous) => session.restore_groups(previous)?,
            // Grouped by the view before the command existed
            None => {
                session.group_items(&self.clips, &self.transitions, !self.group)?;
            }
        }
        Ok(())
    }

    fn description(&self) -> String {
        if self.group {
            "Group clips".to_string()
        } else {
            "Ungroup clips".to_string()
        }
    }

    fn kind(&self) -> CommandKind {
        CommandKind::GroupClips
    }
}

/// Command to set (or delete, with an empty value) a keyed annotation
#[derive(Debug, Clone, PartialEq)]
pub struct AddExtraDataCommand {
    item: ItemId,
    key: String,
    old_value: String,
    new_value: String,
}

impl AddExtraDataCommand {
    pub fn new(
        item: ItemId,
        key: impl Into<String>,
        old_value: impl Into<String>,
        new_value: impl Into<String>,
    ) -> Self {
        Self {
            item,
            key: key.into(),
            old_value: old_value.into(),
            new_value: new_value.into(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.old_value == self.new_value
    }
}

impl UndoableCommand for AddExtraDataCommand {
    fn execute(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        session.set_item_data(self.item, &self.key, &self.new_value)?;
        Ok(())
    }

    fn undo(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        session.set_item_data(self.item, &self.key, &self.old_value)?;
        Ok(())
    }

    fn description(&self) -> String {
        if self.new_value.is_empty() {
            "Delete data".to_string()
        } else {
            "Add data".to_string()
        }
    }

    fn kind(&self) -> CommandKind {
        CommandKind::SetItemMetadata
    }

    fn merge_with(&mut self, candidate: &Self) -> bool {
        if self.item != candidate.item || self.key != candidate.key {
            return false;
        }
        self.new_value = candidate.new_value.clone();
        true
    }
}

/// Command that only asks the monitor to re-render
///
/// Usually pushed as the last step of a macro so the monitor refreshes once
/// after the whole edit. Created `AppliedExternally` when the refresh already
/// happened synchronously.
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshMonitorCommand {
    state: ApplyState,
}

impl RefreshMonitorCommand {
    pub fn new(execute: bool) -> Self {
        Self {
            state: ApplyState::from_do_it(execute),
        }
    }
}

impl UndoableCommand for RefreshMonitorCommand {
    fn execute(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        if self.state.should_apply() {
            session.refresh_monitor();
        }
        self.state.mark_applied();
        Ok(())
    }

    fn undo(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        session.refresh_monitor();
        Ok(())
    }

    fn description(&self) -> String {
        "Refresh monitor".to_string()
    }

    fn kind(&self) -> CommandKind {
        CommandKind::RequestMonitorRefresh
    }
}

/// Whether a command inserts or deletes its item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemChange {
    Add,
    Remove,
}

/// Command to add an effect to a clip's stack, or delete one from it
#[derive(Debug, Clone, PartialEq)]
pub struct AddEffectCommand {
    track: usize,
    position: Position,
    stack_index: usize,
    effect: EffectInstance,
    change: ItemChange,
}

impl AddEffectCommand {
    pub fn add(
        track: usize,
        position: Position,
        stack_index: usize,
        effect: EffectInstance,
    ) -> Self {
        Self {
            track,
            position,
            stack_index,
            effect,
            change: ItemChange::Add,
        }
    }

    /// The removed effect is captured on execution so undo restores it exactly
    pub fn remove(
        track: usize,
        position: Position,
        stack_index: usize,
        effect: EffectInstance,
    ) -> Self {
        Self {
            change: ItemChange::Remove,
            ..Self::add(track, position, stack_index, effect)
        }
    }

    fn insert(&self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        session.insert_effect(self.track, self.position, self.stack_index, &self.effect)?;
        Ok(())
    }

    fn delete(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        self.effect = session.remove_effect(self.track, self.position, self.stack_index)?;
        Ok(())
    }
}

impl UndoableCommand for AddEffectCommand {
    fn execute(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        match self.change {
            ItemChange::Add => self.insert(session),
            ItemChange::Remove => self.delete(session),
        }
    }

    fn undo(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        match self.change {
            ItemChange::Add => self.delete(session),
            ItemChange::Remove => self.insert(session),
        }
    }

    fn description(&self) -> String {
        let name = effect_label(&self.effect.params);
        match self.change {
            ItemChange::Add => format!("Add {}", name),
            ItemChange::Remove => format!("Delete {}", name),
        }
    }

    fn kind(&self) -> CommandKind {
        CommandKind::AddEffect
    }
}

/// Command to put a clip on the timeline, or take one off it
///
/// The clip carries its id, so undoing a delete brings back the same item
/// with its effects and group.
#[derive(Debug, Clone, PartialEq)]
pub struct AddClipCommand {
    clip: Clip,
    change: ItemChange,
    state: ApplyState,
}

impl AddClipCommand {
    pub fn add(clip: Clip, do_it: bool) -> Self {
        Self {
            clip,
            change: ItemChange::Add,
            state: ApplyState::from_do_it(do_it),
        }
    }

    pub fn remove(clip: Clip, do_it: bool) -> Self {
        Self {
            change: ItemChange::Remove,
            ..Self::add(clip, do_it)
        }
    }

    fn insert(&self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        session.insert_clip(&self.clip)?;
        Ok(())
    }

    fn delete(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        if let Some(removed) = session.remove_clip(&self.clip.info)? {
            self.clip = removed;
        }
        Ok(())
    }

    fn forward(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        match self.change {
            ItemChange::Add => self.insert(session),
            ItemChange::Remove => self.delete(session),
        }
    }
}

impl UndoableCommand for AddClipCommand {
    fn execute(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        if self.state.should_apply() {
            self.forward(session)?;
        }
        self.state.mark_applied();
        Ok(())
    }

    fn undo(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        match self.change {
            ItemChange::Add => self.delete(session),
            ItemChange::Remove => self.insert(session),
        }
    }

    fn description(&self) -> String {
        match self.change {
            ItemChange::Add => "Add timeline clip".to_string(),
            ItemChange::Remove => "Delete timeline clip".to_string(),
        }
    }

    fn kind(&self) -> CommandKind {
        CommandKind::AddClip
    }
}

/// Command to move a clip along its track or onto another track
#[derive(Debug, Clone, PartialEq)]
pub struct MoveClipCommand {
    from: ItemInfo,
    to: ItemInfo,
    refresh_monitor: bool,
    state: ApplyState,
}

impl MoveClipCommand {
    pub fn new(from: ItemInfo, to: ItemInfo, do_it: bool) -> Self {
        Self {
            from,
            to,
            refresh_monitor: true,
            state: ApplyState::from_do_it(do_it),
        }
    }

    /// Leave the monitor alone; the enclosing macro refreshes once
    fn nest(&mut self) {
        self.refresh_monitor = false;
    }
}

impl UndoableCommand for MoveClipCommand {
    fn execute(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        if self.state.should_apply() {
            session.move_clip(&self.from, &self.to, self.refresh_monitor)?;
        }
        self.state.mark_applied();
        Ok(())
    }

    fn undo(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        session.move_clip(&self.to, &self.from, self.refresh_monitor)?;
        Ok(())
    }

    fn description(&self) -> String {
        "Move clip".to_string()
    }

    fn kind(&self) -> CommandKind {
        CommandKind::MoveClip
    }
}

/// Command to replace a transition's parameters
///
/// Merges with later edits of the transition at the same track and position.
#[derive(Debug, Clone, PartialEq)]
pub struct EditTransitionCommand {
    track: usize,
    position: Position,
    before: EffectParams,
    after: EffectParams,
    state: ApplyState,
}

impl EditTransitionCommand {
    pub fn new(
        track: usize,
        position: Position,
        before: EffectParams,
        after: EffectParams,
        do_it: bool,
    ) -> Self {
        Self {
            track,
            position,
            before,
            after,
            state: ApplyState::from_do_it(do_it),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.before == self.after
    }
}

impl UndoableCommand for EditTransitionCommand {
    fn execute(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        if self.state.should_apply() {
            session.update_transition(self.track, self.position, &self.after)?;
        }
        self.state.mark_applied();
        Ok(())
    }

    fn undo(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        session.update_transition(self.track, self.position, &self.before)?;
        Ok(())
    }

    fn description(&self) -> String {
        format!("Edit transition {}", effect_label(&self.after))
    }

    fn kind(&self) -> CommandKind {
        CommandKind::EditTransition
    }

    fn merge_with(&mut self, candidate: &Self) -> bool {
        if self.track != candidate.track || self.position != candidate.position {
            return false;
        }
        self.after = candidate.after.clone();
        true
    }
}

/// Command to lock or unlock a track
#[derive(Debug, Clone, PartialEq)]
pub struct LockTrackCommand {
    track: usize,
    lock: bool,
}

impl LockTrackCommand {
    pub fn new(track: usize, lock: bool) -> Self {
        Self { track, lock }
    }
}

impl UndoableCommand for LockTrackCommand {
    fn execute(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        session.set_track_locked(self.track, self.lock)?;
        Ok(())
    }

    fn undo(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        session.set_track_locked(self.track, !self.lock)?;
        Ok(())
    }

    fn description(&self) -> String {
        if self.lock {
            "Lock track".to_string()
        } else {
            "Unlock track".to_string()
        }
    }

    fn kind(&self) -> CommandKind {
        CommandKind::LockTrack
    }
}

/// Command to add, move, re-comment or delete a timeline guide
///
/// `None` on the before side means "add", `None` on the after side means
/// "delete".
#[derive(Debug, Clone, PartialEq)]
pub struct EditGuideCommand {
    before: Option<Guide>,
    after: Option<Guide>,
    /// Guide that sat where `after` landed, put back on undo
    displaced: Option<Guide>,
    state: ApplyState,
}

impl EditGuideCommand {
    pub fn new(before: Option<Guide>, after: Option<Guide>, do_it: bool) -> Self {
        Self {
            before,
            after,
            displaced: None,
            state: ApplyState::from_do_it(do_it),
        }
    }
}

impl UndoableCommand for EditGuideCommand {
    fn execute(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        if self.state.should_apply() {
            self.displaced = session.edit_guide(
                self.before.as_ref().map(|g| g.position),
                self.after.as_ref(),
            );
        }
        self.state.mark_applied();
        Ok(())
    }

    fn undo(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        session.edit_guide(
            self.after.as_ref().map(|g| g.position),
            self.before.as_ref(),
        );
        if self.displaced.is_some() {
            session.edit_guide(None, self.displaced.as_ref());
        }
        Ok(())
    }

    fn description(&self) -> String {
        match (&self.before, &self.after) {
            (None, _) => "Add guide".to_string(),
            (Some(_), None) => "Delete guide".to_string(),
            (Some(old), Some(new)) if old.position == new.position => "Edit guide".to_string(),
            (Some(_), Some(_)) => "Move guide".to_string(),
        }
    }

    fn kind(&self) -> CommandKind {
        CommandKind::EditGuide
    }
}

/// Ordered group of commands that undo and redo as one step
///
/// If a step fails, the steps already applied are reverted before the error
/// is returned. Should that revert fail too, the session is marked
/// inconsistent.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroCommand {
    label: String,
    steps: Vec<TimelineCommand>,
}

impl MacroCommand {
    pub fn new(label: impl Into<String>, steps: Vec<TimelineCommand>) -> Self {
        Self {
            label: label.into(),
            steps: steps.into_iter().map(TimelineCommand::nested).collect(),
        }
    }

    pub fn push(&mut self, step: impl Into<TimelineCommand>) {
        self.steps.push(step.into().nested());
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    fn failed(&self, step: usize, source: CommandError) -> CommandError {
        CommandError::MacroFailed {
            label: self.label.clone(),
            step,
            source: Box::new(source),
        }
    }
}

impl UndoableCommand for MacroCommand {
    fn execute(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        for index in 0..self.steps.len() {
            if let Err(err) = self.steps[index].execute(session) {
                for applied in self.steps[..index].iter_mut().rev() {
                    if let Err(rollback) = applied.undo(session) {
                        session.mark_inconsistent(format!(
                            "'{}' could not revert step after failure: {}",
                            self.label, rollback
                        ));
                        break;
                    }
                }
                return Err(self.failed(index, err));
            }
        }
        Ok(())
    }

    fn undo(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        for index in (0..self.steps.len()).rev() {
            if let Err(err) = self.steps[index].undo(session) {
                for reverted in self.steps[index + 1..].iter_mut() {
                    if let Err(rollback) = reverted.execute(session) {
                        session.mark_inconsistent(format!(
                            "'{}' could not re-apply step after failed undo: {}",
                            self.label, rollback
                        ));
                        break;
                    }
                }
                return Err(self.failed(index, err));
            }
        }
        Ok(())
    }

    fn description(&self) -> String {
        self.label.clone()
    }

    fn kind(&self) -> CommandKind {
        CommandKind::Macro
    }
}

/// The sealed set of timeline commands held by the log
#[derive(Debug, Clone, PartialEq)]
pub enum TimelineCommand {
    ResizeClip(ResizeClipCommand),
    EditEffect(EditEffectCommand),
    ChangeEffectState(ChangeEffectStateCommand),
    GroupClips(GroupClipsCommand),
    AddExtraData(AddExtraDataCommand),
    RefreshMonitor(RefreshMonitorCommand),
    AddEffect(AddEffectCommand),
    AddClip(AddClipCommand),
    MoveClip(MoveClipCommand),
    EditTransition(EditTransitionCommand),
    LockTrack(LockTrackCommand),
    EditGuide(EditGuideCommand),
    Macro(MacroCommand),
}

impl TimelineCommand {
    /// True when the command leaves the session as it found it
    ///
    /// A merge can cancel an edit out, such as a slider dragged back to its
    /// start value.
    pub fn is_noop(&self) -> bool {
        match self {
            TimelineCommand::EditEffect(cmd) => cmd.is_noop(),
            TimelineCommand::AddExtraData(cmd) => cmd.is_noop(),
            TimelineCommand::EditTransition(cmd) => cmd.is_noop(),
            _ => false,
        }
    }

    fn nested(mut self) -> Self {
        if let TimelineCommand::MoveClip(cmd) = &mut self {
            cmd.nest();
        }
        self
    }

    fn inner(&self) -> &dyn UndoableCommand {
        match self {
            TimelineCommand::ResizeClip(cmd) => cmd,
            TimelineCommand::EditEffect(cmd) => cmd,
            TimelineCommand::ChangeEffectState(cmd) => cmd,
            TimelineCommand::GroupClips(cmd) => cmd,
            TimelineCommand::AddExtraData(cmd) => cmd,
            TimelineCommand::RefreshMonitor(cmd) => cmd,
            TimelineCommand::AddEffect(cmd) => cmd,
            TimelineCommand::AddClip(cmd) => cmd,
            TimelineCommand::MoveClip(cmd) => cmd,
            TimelineCommand::EditTransition(cmd) => cmd,
            TimelineCommand::LockTrack(cmd) => cmd,
            TimelineCommand::EditGuide(cmd) => cmd,
            TimelineCommand::Macro(cmd) => cmd,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn UndoableCommand {
        match self {
            TimelineCommand::ResizeClip(cmd) => cmd,
            TimelineCommand::EditEffect(cmd) => cmd,
            TimelineCommand::ChangeEffectState(cmd) => cmd,
            TimelineCommand::GroupClips(cmd) => cmd,
            TimelineCommand::AddExtraData(cmd) => cmd,
            TimelineCommand::RefreshMonitor(cmd) => cmd,
            TimelineCommand::AddEffect(cmd) => cmd,
            TimelineCommand::AddClip(cmd) => cmd,
            TimelineCommand::MoveClip(cmd) => cmd,
            TimelineCommand::EditTransition(cmd) => cmd,
            TimelineCommand::LockTrack(cmd) => cmd,
            TimelineCommand::EditGuide(cmd) => cmd,
            TimelineCommand::Macro(cmd) => cmd,
        }
    }
}

impl UndoableCommand for TimelineCommand {
    fn execute(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        self.inner_mut().execute(session)
    }

    fn undo(&mut self, session: &mut dyn SessionMutator) -> CommandResult<()> {
        self.inner_mut().undo(session)
    }

    fn description(&self) -> String {
        self.inner().description()
    }

    fn kind(&self) -> CommandKind {
        self.inner().kind()
    }

    fn merge_with(&mut self, candidate: &Self) -> bool {
        match (self, candidate) {
            (TimelineCommand::EditEffect(top), TimelineCommand::EditEffect(new)) => {
                top.merge_with(new)
            }
            (TimelineCommand::AddExtraData(top), TimelineCommand::AddExtraData(new)) => {
                top.merge_with(new)
            }
            (TimelineCommand::EditTransition(top), TimelineCommand::EditTransition(new)) => {
                top.merge_with(new)
            }
            _ => false,
        }
    }
}

macro_rules! impl_from_command {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for TimelineCommand {
                fn from(cmd: $ty) -> Self {
                    TimelineCommand::$variant(cmd)
                }
            }
        )*
    };
}

impl_from_command! {
    ResizeClip => ResizeClipCommand,
    EditEffect => EditEffectCommand,
    ChangeEffectState => ChangeEffectStateCommand,
    GroupClips => GroupClipsCommand,
    AddExtraData => AddExtraDataCommand,
    RefreshMonitor => RefreshMonitorCommand,
    AddEffect => AddEffectCommand,
    AddClip => AddClipCommand,
    MoveClip => MoveClipCommand,
    EditTransition => EditTransitionCommand,
    LockTrack => LockTrackCommand,
    EditGuide => EditGuideCommand,
    Macro => MacroCommand,
}

fn effect_label(params: &EffectParams) -> &str {
    if params.effect_id.is_empty() {
        "effect"
    } else {
        &params.effect_id
    }
}
