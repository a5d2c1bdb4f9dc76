// EditSession - Authoritative mutable state of the editing project
//
// The session owns the timeline state that commands mutate, plus the
// producers used to tell the view what needs repainting. It carries no undo
// logic of its own; see crate::command for that.

pub mod mutator;
pub mod persistence;
pub mod types;

pub use mutator::{GroupSnapshot, SessionError, SessionHealth, SessionMutator, SessionResult};
pub use types::{
    Clip, EffectInstance, EffectParams, GroupId, Guide, ItemId, ItemInfo, ParamValue, Position,
    TimelineState, Track, TrackInfo, Transition,
};

use crate::messaging::channels::{NotificationProducer, ViewEventProducer};
use crate::messaging::event::ViewEvent;
use crate::messaging::notification::{Notification, NotificationCategory};
use ringbuf::traits::Producer;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

/// Session shared between the control thread and a render path
///
/// Structural mutation happens only on the control thread, under this lock.
pub type SharedSession = Arc<Mutex<EditSession>>;

/// Central state of the editing project that commands can modify
pub struct EditSession {
    state: TimelineState,
    health: SessionHealth,
    view_events: Option<ViewEventProducer>,
    notifications: Option<NotificationProducer>,
}

impl EditSession {
    /// Create an empty session without a view attached
    pub fn new() -> Self {
        Self::from_state(TimelineState::default())
    }

    pub fn from_state(state: TimelineState) -> Self {
        Self {
            state,
            health: SessionHealth::Consistent,
            view_events: None,
            notifications: None,
        }
    }

    /// Attach the producers the view drains refresh requests and warnings from
    pub fn with_channels(
        mut self,
        view_events: ViewEventProducer,
        notifications: NotificationProducer,
    ) -> Self {
        self.view_events = Some(view_events);
        self.notifications = Some(notifications);
        self
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    pub fn state(&self) -> &TimelineState {
        &self.state
    }

    pub fn into_state(self) -> TimelineState {
        self.state
    }

    pub fn add_track(&mut self, name: impl Into<String>) -> usize {
        self.state.tracks.push(Track::new(name));
        self.state.tracks.len() - 1
    }

    /// Place a new clip on the timeline; the clip starts with an empty effect stack
    pub fn add_clip(
        &mut self,
        info: ItemInfo,
        producer: impl Into<String>,
    ) -> SessionResult<ItemId> {
        validate_bounds(&info)?;
        let track = self.track(info.track)?;
        if track.clips.values().any(|clip| clip.info.overlaps(&info)) {
            return Err(SessionError::Overlap { info });
        }

        let clip = self.new_clip(info, producer);
        let id = clip.id;
        self.track_mut(info.track)?.clips.insert(info.start, clip);
        Ok(id)
    }

    /// Build a clip with a fresh id without placing it
    ///
    /// Hand the clip to an `AddClipCommand` to make the insertion undoable.
    pub fn new_clip(&mut self, info: ItemInfo, producer: impl Into<String>) -> Clip {
        Clip {
            id: self.allocate_id(),
            info,
            producer: producer.into(),
            effects: Vec::new(),
            group: None,
        }
    }

    pub fn add_transition(
        &mut self,
        info: ItemInfo,
        params: EffectParams,
    ) -> SessionResult<ItemId> {
        validate_bounds(&info)?;
        let track = self.track(info.track)?;
        if track.transitions.values().any(|t| t.info.overlaps(&info)) {
            return Err(SessionError::Overlap { info });
        }

        let id = self.allocate_id();
        self.track_mut(info.track)?.transitions.insert(
            info.start,
            Transition {
                id,
                info,
                params,
                group: None,
            },
        );
        Ok(id)
    }

    pub fn clip_at(&self, track: usize, position: Position) -> Option<&Clip> {
        self.state.tracks.get(track)?.clips.get(&position)
    }

    pub fn transition_at(&self, track: usize, position: Position) -> Option<&Transition> {
        self.state.tracks.get(track)?.transitions.get(&position)
    }

    /// Current bounds of a clip or transition
    pub fn find_item(&self, id: ItemId) -> Option<ItemInfo> {
        self.state.tracks.iter().find_map(|track| {
            track
                .clips
                .values()
                .find(|clip| clip.id == id)
                .map(|clip| clip.info)
                .or_else(|| {
                    track
                        .transitions
                        .values()
                        .find(|t| t.id == id)
                        .map(|t| t.info)
                })
        })
    }

    pub fn item_data(&self, item: ItemId, key: &str) -> Option<&str> {
        self.state
            .metadata
            .get(&item)
            .and_then(|entries| entries.get(key))
            .map(String::as_str)
    }

    /// Members of the group the item belongs to, if any
    pub fn group_members(&self, item: ItemId) -> Option<BTreeSet<ItemId>> {
        let group = self.group_of(item)?;
        let members = self
            .state
            .tracks
            .iter()
            .flat_map(|track| {
                let clips = track.clips.values().map(|c| (c.id, c.group));
                let transitions = track.transitions.values().map(|t| (t.id, t.group));
                clips.chain(transitions)
            })
            .filter(|(_, g)| *g == Some(group))
            .map(|(id, _)| id)
            .collect();
        Some(members)
    }

    pub fn group_of(&self, item: ItemId) -> Option<GroupId> {
        self.state.tracks.iter().find_map(|track| {
            track
                .clips
                .values()
                .find(|c| c.id == item)
                .map(|c| c.group)
                .or_else(|| track.transitions.values().find(|t| t.id == item).map(|t| t.group))
        })?
    }

    pub fn guide_at(&self, position: Position) -> Option<&str> {
        self.state.guides.get(&position).map(String::as_str)
    }

    fn allocate_id(&mut self) -> ItemId {
        self.state.next_item_id += 1;
        ItemId(self.state.next_item_id)
    }

    fn track(&self, index: usize) -> SessionResult<&Track> {
        self.state
            .tracks
            .get(index)
            .ok_or(SessionError::TrackNotFound(index))
    }

    fn track_mut(&mut self, index: usize) -> SessionResult<&mut Track> {
        self.state
            .tracks
            .get_mut(index)
            .ok_or(SessionError::TrackNotFound(index))
    }

    fn unlocked_track_mut(&mut self, index: usize) -> SessionResult<&mut Track> {
        let track = self.track_mut(index)?;
        if track.info.locked {
            return Err(SessionError::TrackLocked(index));
        }
        Ok(track)
    }

    fn clip_mut(&mut self, track: usize, position: Position) -> SessionResult<&mut Clip> {
        self.track_mut(track)?
            .clips
            .get_mut(&position)
            .ok_or(SessionError::ClipNotFound { track, position })
    }

    fn emit(&mut self, event: ViewEvent) {
        if let Some(producer) = self.view_events.as_mut() {
            if producer.try_push(event).is_err() {
                tracing::warn!(?event, "View event dropped: channel full");
            }
        }
    }

    /// Resolve a list of item infos to ids, refusing locked tracks
    fn resolve_items(&self, infos: &[ItemInfo], transitions: bool) -> SessionResult<Vec<ItemId>> {
        infos
            .iter()
            .map(|info| {
                let track = self.track(info.track)?;
                if track.info.locked {
                    return Err(SessionError::TrackLocked(info.track));
                }
                if transitions {
                    track
                        .transitions
                        .get(&info.start)
                        .map(|t| t.id)
                        .ok_or(SessionError::TransitionNotFound {
                            track: info.track,
                            position: info.start,
                        })
                } else {
                    track
                        .clips
                        .get(&info.start)
                        .map(|c| c.id)
                        .ok_or(SessionError::ClipNotFound {
                            track: info.track,
                            position: info.start,
                        })
                }
            })
            .collect()
    }

    /// Apply `f` to the group slot of every clip and transition
    fn for_each_group_slot(&mut self, mut f: impl FnMut(ItemId, &mut Option<GroupId>)) {
        for track in &mut self.state.tracks {
            for clip in track.clips.values_mut() {
                f(clip.id, &mut clip.group);
            }
            for transition in track.transitions.values_mut() {
                f(transition.id, &mut transition.group);
            }
        }
    }

    fn ensure_item_unlocked(&self, item: ItemId) -> SessionResult<()> {
        let info = self.find_item(item).ok_or(SessionError::ItemNotFound(item))?;
        if self.track(info.track)?.info.locked {
            return Err(SessionError::TrackLocked(info.track));
        }
        Ok(())
    }

    fn item_exists(&self, item: ItemId) -> bool {
        self.find_item(item).is_some()
    }
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Grouping bucket used while recomputing group keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum GroupBucket {
    Existing(GroupId),
    Listed,
}

fn validate_bounds(info: &ItemInfo) -> SessionResult<()> {
    if info.start.0 < 0 {
        return Err(SessionError::InvalidBounds {
            info: *info,
            reason: "start is before the timeline origin".into(),
        });
    }
    if info.end <= info.start {
        return Err(SessionError::InvalidBounds {
            info: *info,
            reason: "end must be after start".into(),
        });
    }
    Ok(())
}

impl SessionMutator for EditSession {
    fn resize_clip(
        &mut self,
        from: &ItemInfo,
        to: &ItemInfo,
        dont_worry: bool,
    ) -> SessionResult<()> {
        if from.track != to.track {
            return Err(SessionError::InvalidBounds {
                info: *to,
                reason: "resize cannot change track".into(),
            });
        }
        validate_bounds(to)?;
        let track = self.unlocked_track_mut(from.track)?;

        // Already at the requested bounds, unless the clip at `from` is
        // still there and the one at `to` is a different clip
        let from_present = track.clips.get(&from.start).is_some_and(|clip| clip.info == *from);
        if !from_present && track.clips.get(&to.start).is_some_and(|clip| clip.info == *to) {
            return Ok(());
        }

        let clip = track.clips.get(&from.start).ok_or(SessionError::ClipNotFound {
            track: from.track,
            position: from.start,
        })?;
        if clip.info != *from {
            return Err(SessionError::BoundsMismatch {
                expected: *from,
                actual: clip.info,
            });
        }
        let id = clip.id;

        if to.start != from.start && track.clips.contains_key(&to.start) {
            return Err(SessionError::Overlap { info: *to });
        }
        if !dont_worry {
            let overlapping = track
                .clips
                .values()
                .any(|other| other.id != id && other.info.overlaps(to));
            if overlapping {
                tracing::warn!(%from, %to, "Resize refused: clip would overlap a neighbour");
                return Err(SessionError::Overlap { info: *to });
            }
        }

        if let Some(mut clip) = track.clips.remove(&from.start) {
            clip.info = *to;
            track.clips.insert(to.start, clip);
        }
        self.emit(ViewEvent::ClipChanged { info: *to });
        Ok(())
    }

    fn update_effect(
        &mut self,
        track: usize,
        position: Position,
        stack_index: usize,
        params: &EffectParams,
        refresh_stack: bool,
    ) -> SessionResult<()> {
        let clip = self.clip_mut(track, position)?;
        let effect = clip
            .effects
            .get_mut(stack_index)
            .ok_or(SessionError::EffectNotFound {
                track,
                position,
                index: stack_index,
            })?;
        effect.params = params.clone();

        if refresh_stack {
            self.emit(ViewEvent::EffectStackChanged { track, position });
        }
        Ok(())
    }

    fn set_effects_enabled(
        &mut self,
        track: usize,
        position: Position,
        indexes: &[usize],
        enabled: bool,
        refresh_stack: bool,
    ) -> SessionResult<()> {
        let clip = self.clip_mut(track, position)?;
        if let Some(&index) = indexes.iter().find(|&&i| i >= clip.effects.len()) {
            return Err(SessionError::EffectNotFound {
                track,
                position,
                index,
            });
        }
        for &index in indexes {
            clip.effects[index].enabled = enabled;
        }

        if refresh_stack {
            self.emit(ViewEvent::EffectStackChanged { track, position });
        }
        Ok(())
    }

    fn group_items(
        &mut self,
        clips: &[ItemInfo],
        transitions: &[ItemInfo],
        group: bool,
    ) -> SessionResult<GroupSnapshot> {
        let mut members: BTreeSet<ItemId> =
            self.resolve_items(clips, false)?.into_iter().collect();
        members.extend(self.resolve_items(transitions, true)?);
        if members.is_empty() {
            return Ok(Vec::new());
        }

        // Listed items form one bucket (or none when ungrouping); everyone
        // else stays in the bucket of their current group
        let mut buckets: BTreeMap<GroupBucket, Vec<ItemId>> = BTreeMap::new();
        self.for_each_group_slot(|id, slot| {
            let bucket = if members.contains(&id) {
                group.then_some(GroupBucket::Listed)
            } else {
                slot.map(GroupBucket::Existing)
            };
            if let Some(bucket) = bucket {
                buckets.entry(bucket).or_default().push(id);
            }
        });

        let mut keys: BTreeMap<ItemId, GroupId> = BTreeMap::new();
        for ids in buckets.values().filter(|ids| ids.len() > 1) {
            if let Some(key) = ids.iter().min().map(|id| GroupId(id.0)) {
                keys.extend(ids.iter().map(|&id| (id, key)));
            }
        }

        let mut previous = GroupSnapshot::new();
        self.for_each_group_slot(|id, slot| {
            let wanted = keys.get(&id).copied();
            if *slot != wanted {
                previous.push((id, *slot));
                *slot = wanted;
            }
        });

        if !previous.is_empty() {
            self.emit(ViewEvent::GroupsChanged);
        }
        Ok(previous)
    }

    fn restore_groups(&mut self, snapshot: &[(ItemId, Option<GroupId>)]) -> SessionResult<()> {
        for &(item, _) in snapshot {
            self.ensure_item_unlocked(item)?;
        }
        let wanted: BTreeMap<ItemId, Option<GroupId>> = snapshot.iter().copied().collect();
        self.for_each_group_slot(|id, slot| {
            if let Some(group) = wanted.get(&id) {
                *slot = *group;
            }
        });

        self.emit(ViewEvent::GroupsChanged);
        Ok(())
    }

    fn set_item_data(&mut self, item: ItemId, key: &str, value: &str) -> SessionResult<()> {
        if !self.item_exists(item) {
            return Err(SessionError::ItemNotFound(item));
        }

        if value.is_empty() {
            if let Some(entries) = self.state.metadata.get_mut(&item) {
                entries.remove(key);
                if entries.is_empty() {
                    self.state.metadata.remove(&item);
                }
            }
        } else {
            self.state
                .metadata
                .entry(item)
                .or_default()
                .insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn refresh_monitor(&mut self) {
        self.emit(ViewEvent::MonitorRefresh);
    }

    fn insert_clip(&mut self, clip: &Clip) -> SessionResult<()> {
        let info = clip.info;
        validate_bounds(&info)?;
        let track = self.track(info.track)?;
        if track.info.locked {
            return Err(SessionError::TrackLocked(info.track));
        }
        if track.clips.get(&info.start) == Some(clip) {
            return Ok(());
        }
        if track.clips.values().any(|other| other.info.overlaps(&info)) {
            return Err(SessionError::Overlap { info });
        }
        if self.item_exists(clip.id) {
            return Err(SessionError::DuplicateItem(clip.id));
        }

        self.track_mut(info.track)?.clips.insert(info.start, clip.clone());
        self.state.next_item_id = self.state.next_item_id.max(clip.id.0);
        self.emit(ViewEvent::ClipChanged { info });
        Ok(())
    }

    fn remove_clip(&mut self, info: &ItemInfo) -> SessionResult<Option<Clip>> {
        let track = self.unlocked_track_mut(info.track)?;
        let Some(actual) = track.clips.get(&info.start).map(|clip| clip.info) else {
            // Already removed
            return Ok(None);
        };
        if actual != *info {
            return Err(SessionError::BoundsMismatch {
                expected: *info,
                actual,
            });
        }
        let removed = track.clips.remove(&info.start);

        self.emit(ViewEvent::ClipChanged { info: *info });
        Ok(removed)
    }

    fn move_clip(
        &mut self,
        from: &ItemInfo,
        to: &ItemInfo,
        refresh_monitor: bool,
    ) -> SessionResult<()> {
        if from.duration() != to.duration() {
            return Err(SessionError::InvalidBounds {
                info: *to,
                reason: "move cannot change the clip duration".into(),
            });
        }
        validate_bounds(to)?;
        for index in [from.track, to.track] {
            if self.track(index)?.info.locked {
                return Err(SessionError::TrackLocked(index));
            }
        }

        let source = self.track(from.track)?;
        let Some(id) = source
            .clips
            .get(&from.start)
            .filter(|clip| clip.info == *from)
            .map(|clip| clip.id)
        else {
            // Already moved
            let destination = self.track(to.track)?;
            if destination.clips.get(&to.start).is_some_and(|clip| clip.info == *to) {
                return Ok(());
            }
            return Err(match source.clips.get(&from.start) {
                Some(clip) => SessionError::BoundsMismatch {
                    expected: *from,
                    actual: clip.info,
                },
                None => SessionError::ClipNotFound {
                    track: from.track,
                    position: from.start,
                },
            });
        };

        let destination = self.track(to.track)?;
        if destination
            .clips
            .values()
            .any(|other| other.id != id && other.info.overlaps(to))
        {
            tracing::warn!(%from, %to, "Move refused: clip would overlap a neighbour");
            return Err(SessionError::Overlap { info: *to });
        }

        let mut clip = self
            .track_mut(from.track)?
            .clips
            .remove(&from.start)
            .ok_or(SessionError::ClipNotFound {
                track: from.track,
                position: from.start,
            })?;
        clip.info = *to;
        self.track_mut(to.track)?.clips.insert(to.start, clip);

        self.emit(ViewEvent::ClipChanged { info: *from });
        self.emit(ViewEvent::ClipChanged { info: *to });
        if refresh_monitor {
            self.emit(ViewEvent::MonitorRefresh);
        }
        Ok(())
    }

    fn insert_effect(
        &mut self,
        track: usize,
        position: Position,
        stack_index: usize,
        effect: &EffectInstance,
    ) -> SessionResult<()> {
        let clip = self.clip_mut(track, position)?;
        if stack_index > clip.effects.len() {
            return Err(SessionError::EffectNotFound {
                track,
                position,
                index: stack_index,
            });
        }
        clip.effects.insert(stack_index, effect.clone());

        self.emit(ViewEvent::EffectStackChanged { track, position });
        Ok(())
    }

    fn remove_effect(
        &mut self,
        track: usize,
        position: Position,
        stack_index: usize,
    ) -> SessionResult<EffectInstance> {
        let clip = self.clip_mut(track, position)?;
        if stack_index >= clip.effects.len() {
            return Err(SessionError::EffectNotFound {
                track,
                position,
                index: stack_index,
            });
        }
        let removed = clip.effects.remove(stack_index);

        self.emit(ViewEvent::EffectStackChanged { track, position });
        Ok(removed)
    }

    fn update_transition(
        &mut self,
        track: usize,
        position: Position,
        params: &EffectParams,
    ) -> SessionResult<()> {
        let transition = self
            .track_mut(track)?
            .transitions
            .get_mut(&position)
            .ok_or(SessionError::TransitionNotFound { track, position })?;
        transition.params = params.clone();

        self.emit(ViewEvent::TransitionChanged { track, position });
        Ok(())
    }

    fn set_track_locked(&mut self, track: usize, locked: bool) -> SessionResult<()> {
        self.track_mut(track)?.info.locked = locked;
        self.emit(ViewEvent::TrackChanged { track });
        Ok(())
    }

    fn edit_guide(&mut self, remove: Option<Position>, insert: Option<&Guide>) -> Option<Guide> {
        if let Some(position) = remove {
            self.state.guides.remove(&position);
        }
        let displaced = insert.and_then(|guide| {
            self.state
                .guides
                .insert(guide.position, guide.comment.clone())
                .map(|comment| Guide {
                    position: guide.position,
                    comment,
                })
        });
        self.emit(ViewEvent::GuidesChanged);
        displaced
    }

    fn notify(&mut self, notification: Notification) {
        if let Some(producer) = self.notifications.as_mut() {
            if producer.try_push(notification).is_err() {
                tracing::warn!("Notification dropped: channel full");
            }
        }
    }

    fn health(&self) -> SessionHealth {
        self.health.clone()
    }

    fn mark_inconsistent(&mut self, reason: String) {
        tracing::error!(%reason, "Session marked inconsistent");
        self.notify(Notification::error(NotificationCategory::Edit, reason.clone()));
        self.health = SessionHealth::Inconsistent { reason };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::channels::{create_notification_channel, create_view_event_channel};
    use crate::messaging::notification::NotificationLevel;
    use ringbuf::traits::Consumer;

    fn session_with_clip() -> (EditSession, ItemId) {
        let mut session = EditSession::new();
        session.add_track("V1");
        let id = session
            .add_clip(ItemInfo::new(0, 0, 100), "clip-a")
            .unwrap();
        (session, id)
    }

    #[test]
    fn test_add_clip_rejects_overlap() {
        let (mut session, _) = session_with_clip();
        let result = session.add_clip(ItemInfo::new(0, 50, 150), "clip-b");
        assert!(matches!(result, Err(SessionError::Overlap { .. })));
    }

    #[test]
    fn test_resize_moves_clip_key() {
        let (mut session, id) = session_with_clip();
        let from = ItemInfo::new(0, 0, 100);
        let to = ItemInfo::new(0, 10, 80);

        session.resize_clip(&from, &to, false).unwrap();

        assert!(session.clip_at(0, Position(0)).is_none());
        assert_eq!(session.clip_at(0, Position(10)).unwrap().id, id);
        assert_eq!(session.find_item(id), Some(to));
    }

    #[test]
    fn test_resize_is_idempotent() {
        let (mut session, _) = session_with_clip();
        let from = ItemInfo::new(0, 0, 100);
        let to = ItemInfo::new(0, 0, 60);

        session.resize_clip(&from, &to, false).unwrap();
        let once = session.state().clone();
        session.resize_clip(&from, &to, false).unwrap();

        assert_eq!(session.state(), &once);
    }

    #[test]
    fn test_resize_overlap_only_checked_when_worried() {
        let (mut session, _) = session_with_clip();
        session.add_clip(ItemInfo::new(0, 100, 200), "clip-b").unwrap();
        let from = ItemInfo::new(0, 0, 100);
        let to = ItemInfo::new(0, 0, 120);

        assert!(matches!(
            session.resize_clip(&from, &to, false),
            Err(SessionError::Overlap { .. })
        ));
        assert!(session.resize_clip(&from, &to, true).is_ok());
    }

    #[test]
    fn test_resize_on_locked_track_is_refused() {
        let (mut session, _) = session_with_clip();
        session.set_track_locked(0, true).unwrap();

        let result =
            session.resize_clip(&ItemInfo::new(0, 0, 100), &ItemInfo::new(0, 0, 50), false);
        assert_eq!(result, Err(SessionError::TrackLocked(0)));
    }

    #[test]
    fn test_set_effects_enabled_validates_before_mutating() {
        let (mut session, _) = session_with_clip();
        let effect = EffectInstance::new(EffectParams::new("blur"));
        session.insert_effect(0, Position(0), 0, &effect).unwrap();
        let before = session.state().clone();

        let result = session.set_effects_enabled(0, Position(0), &[0, 3], false, false);

        assert!(matches!(result, Err(SessionError::EffectNotFound { index: 3, .. })));
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_empty_metadata_value_deletes_key() {
        let (mut session, id) = session_with_clip();
        let pristine = session.state().clone();

        session.set_item_data(id, "comment", "hero shot").unwrap();
        assert_eq!(session.item_data(id, "comment"), Some("hero shot"));

        session.set_item_data(id, "comment", "").unwrap();
        assert_eq!(session.item_data(id, "comment"), None);
        assert_eq!(session.state(), &pristine);
    }

    #[test]
    fn test_group_and_ungroup() {
        let (mut session, a) = session_with_clip();
        let b = session.add_clip(ItemInfo::new(0, 200, 300), "clip-b").unwrap();
        let infos = [ItemInfo::new(0, 0, 100), ItemInfo::new(0, 200, 300)];

        session.group_items(&infos, &[], true).unwrap();
        let members = session.group_members(a).unwrap();
        assert!(members.contains(&a) && members.contains(&b));
        assert_eq!(session.group_of(b), Some(GroupId(a.0)));

        session.group_items(&infos[..1], &[], false).unwrap();
        assert_eq!(session.group_of(a), None);
        // b alone is no longer a group
        assert_eq!(session.group_of(b), None);
    }

    #[test]
    fn test_mutations_emit_view_events() {
        let (view_tx, mut view_rx) = create_view_event_channel(8);
        let (notif_tx, _notif_rx) = create_notification_channel(8);
        let mut session = EditSession::new().with_channels(view_tx, notif_tx);
        session.add_track("V1");

        session.refresh_monitor();
        session.set_track_locked(0, true).unwrap();

        assert_eq!(view_rx.try_pop(), Some(ViewEvent::MonitorRefresh));
        assert_eq!(view_rx.try_pop(), Some(ViewEvent::TrackChanged { track: 0 }));
        assert_eq!(view_rx.try_pop(), None);
    }

    #[test]
    fn test_inconsistent_session_raises_error_notification() {
        let (view_tx, _view_rx) = create_view_event_channel(8);
        let (notif_tx, mut notif_rx) = create_notification_channel(8);
        let mut session = EditSession::new().with_channels(view_tx, notif_tx);

        session.mark_inconsistent("rollback failed".into());

        let notification = notif_rx.try_pop().expect("error notification");
        assert_eq!(notification.level, NotificationLevel::Error);
        assert_eq!(notification.message, "rollback failed");
        assert!(!session.health().is_consistent());
    }

    #[test]
    fn test_resize_onto_other_clip_is_not_treated_as_done() {
        let (mut session, id) = session_with_clip();
        session.add_clip(ItemInfo::new(0, 150, 200), "clip-b").unwrap();
        let before = session.state().clone();

        let result =
            session.resize_clip(&ItemInfo::new(0, 0, 100), &ItemInfo::new(0, 150, 200), true);

        assert!(matches!(result, Err(SessionError::Overlap { .. })));
        assert_eq!(session.state(), &before);
        assert_eq!(session.clip_at(0, Position(0)).unwrap().id, id);
    }

    #[test]
    fn test_regroup_returns_previous_membership() {
        let (mut session, a) = session_with_clip();
        let b = session.add_clip(ItemInfo::new(0, 100, 200), "clip-b").unwrap();
        let c = session.add_clip(ItemInfo::new(0, 200, 300), "clip-c").unwrap();
        let (a_info, b_info, c_info) = (
            ItemInfo::new(0, 0, 100),
            ItemInfo::new(0, 100, 200),
            ItemInfo::new(0, 200, 300),
        );
        session.group_items(&[a_info, b_info], &[], true).unwrap();
        let grouped = session.state().clone();

        let previous = session.group_items(&[b_info, c_info], &[], true).unwrap();
        assert_eq!(session.group_of(b), Some(GroupId(b.0)));
        assert_eq!(session.group_of(c), Some(GroupId(b.0)));
        assert_eq!(session.group_of(a), None);
        assert!(previous.contains(&(a, Some(GroupId(a.0)))));
        assert!(previous.contains(&(c, None)));

        session.restore_groups(&previous).unwrap();
        assert_eq!(session.state(), &grouped);
    }

    #[test]
    fn test_insert_and_remove_clip_keep_identity() {
        let (mut session, id) = session_with_clip();
        let info = ItemInfo::new(0, 0, 100);

        let removed = session.remove_clip(&info).unwrap().expect("clip at 0");
        assert_eq!(removed.id, id);
        assert_eq!(session.remove_clip(&info).unwrap(), None);

        session.insert_clip(&removed).unwrap();
        session.insert_clip(&removed).unwrap();
        assert_eq!(session.clip_at(0, Position(0)), Some(&removed));

        let clash = Clip {
            info: ItemInfo::new(0, 300, 400),
            ..removed.clone()
        };
        assert_eq!(session.insert_clip(&clash), Err(SessionError::DuplicateItem(id)));
        let overlapping = session.new_clip(ItemInfo::new(0, 50, 150), "clip-b");
        assert!(matches!(
            session.insert_clip(&overlapping),
            Err(SessionError::Overlap { .. })
        ));
    }

    #[test]
    fn test_move_clip_across_tracks() {
        let (mut session, id) = session_with_clip();
        session.add_track("V2");
        let from = ItemInfo::new(0, 0, 100);
        let to = ItemInfo::new(1, 40, 140);

        session.move_clip(&from, &to, true).unwrap();
        assert!(session.clip_at(0, Position(0)).is_none());
        assert_eq!(session.find_item(id), Some(to));

        // Already moved
        session.move_clip(&from, &to, true).unwrap();
        assert_eq!(session.find_item(id), Some(to));

        let stretched = ItemInfo::new(1, 40, 200);
        assert!(matches!(
            session.move_clip(&to, &stretched, true),
            Err(SessionError::InvalidBounds { .. })
        ));

        session.set_track_locked(0, true).unwrap();
        assert_eq!(session.move_clip(&to, &from, true), Err(SessionError::TrackLocked(0)));
    }

    #[test]
    fn test_edit_guide_returns_overwritten_guide() {
        let mut session = EditSession::new();
        assert_eq!(session.edit_guide(None, Some(&Guide::new(30, "intro"))), None);

        let displaced = session.edit_guide(None, Some(&Guide::new(30, "chorus")));

        assert_eq!(displaced, Some(Guide::new(30, "intro")));
        assert_eq!(session.guide_at(Position(30)), Some("chorus"));
    }
}
