// Integration test: forward/inverse laws for every timeline command
//
// Each command is checked against a realistic session: applying it then
// reverting it must restore the exact previous state, and reverting a
// not-yet-applied command before applying it must land where a plain apply
// would.

use proptest::prelude::*;
use timeline_undo::command::{
    AddClipCommand, AddExtraDataCommand, ChangeEffectStateCommand, CommandKind,
    EditEffectCommand, EditGuideCommand, EditTransitionCommand, GroupClipsCommand,
    LockTrackCommand, MoveClipCommand, RefreshMonitorCommand, ResizeClipCommand, TimelineCommand,
};
use timeline_undo::session::{Clip, EffectInstance, GroupId, Guide, ParamValue};
use timeline_undo::{
    EditSession, EffectParams, ItemId, ItemInfo, Position, SessionMutator, UndoableCommand,
};

struct Fixture {
    session: EditSession,
    clip_a: ItemId,
    clip_b: Clip,
    /// Allocated but not yet on the timeline
    fresh: Clip,
}

fn fx(index: usize, level: f64) -> EffectParams {
    EffectParams::new(format!("fx{index}")).with("level", ParamValue::Number(level))
}

fn wipe(softness: f64) -> EffectParams {
    EffectParams::new("wipe").with("softness", ParamValue::Number(softness))
}

/// Track 0: clips A [0..50) and B [100..150) plus a wipe at [40..60)
/// Track 1: clip at [5..105) with a five-effect stack
fn fixture() -> Fixture {
    let mut session = EditSession::new();
    session.add_track("V1");
    session.add_track("V2");

    let clip_a = session
        .add_clip(ItemInfo::new(0, 0, 50), "a.mp4")
        .expect("empty track");
    session
        .add_clip(ItemInfo::new(0, 100, 150), "b.mp4")
        .expect("no overlap");
    session
        .add_transition(ItemInfo::new(0, 40, 60), wipe(0.0))
        .expect("no transitions yet");
    session
        .add_clip(ItemInfo::new(1, 5, 105), "c.mp4")
        .expect("empty track");
    for index in 0..5 {
        session
            .insert_effect(1, Position(5), index, &EffectInstance::new(fx(index, 0.0)))
            .expect("clip exists");
    }
    session.edit_guide(None, Some(&Guide::new(30, "intro")));
    let clip_b = session.clip_at(0, Position(100)).expect("clip B").clone();
    let fresh = session.new_clip(ItemInfo::new(1, 200, 260), "d.mp4");

    Fixture {
        session,
        clip_a,
        clip_b,
        fresh,
    }
}

fn sample_commands(fixture: &Fixture) -> Vec<TimelineCommand> {
    let clip_a = fixture.clip_a;
    vec![
        ResizeClipCommand::new(ItemInfo::new(0, 0, 50), ItemInfo::new(0, 0, 80), true, false)
            .into(),
        EditEffectCommand::new(1, Position(5), 0, fx(0, 0.0), fx(0, 1.0), true, true).into(),
        ChangeEffectStateCommand::new(1, Position(5), vec![0, 2, 4], true, true, true).into(),
        GroupClipsCommand::new(
            vec![ItemInfo::new(0, 0, 50), ItemInfo::new(0, 100, 150)],
            vec![ItemInfo::new(0, 40, 60)],
            true,
            true,
        )
        .into(),
        AddExtraDataCommand::new(clip_a, "comment", "", "keep").into(),
        RefreshMonitorCommand::new(true).into(),
        EditTransitionCommand::new(0, Position(40), wipe(0.0), wipe(0.8), true).into(),
        LockTrackCommand::new(1, true).into(),
        EditGuideCommand::new(
            Some(Guide::new(30, "intro")),
            Some(Guide::new(35, "intro")),
            true,
        )
        .into(),
        EditGuideCommand::new(None, Some(Guide::new(30, "chorus")), true).into(),
        AddClipCommand::add(fixture.fresh.clone(), true).into(),
        AddClipCommand::remove(fixture.clip_b.clone(), true).into(),
        MoveClipCommand::new(ItemInfo::new(0, 100, 150), ItemInfo::new(1, 200, 250), true).into(),
    ]
}

fn group_slots(session: &EditSession, items: &[ItemId]) -> Vec<Option<GroupId>> {
    items.iter().map(|&item| session.group_of(item)).collect()
}

#[test]
fn test_forward_then_inverse_restores_state() {
    let fixture = fixture();

    for mut command in sample_commands(&fixture) {
        let mut session = EditSession::from_state(fixture.session.state().clone());
        let before = session.state().clone();

        command.execute(&mut session).unwrap();
        if command.kind() != CommandKind::RequestMonitorRefresh {
            assert_ne!(
                session.state(),
                &before,
                "{} should change the session",
                command.description()
            );
        }

        command.undo(&mut session).unwrap();
        assert_eq!(
            session.state(),
            &before,
            "{} did not restore the session",
            command.description()
        );
    }
}

#[test]
fn test_inverse_then_forward_matches_forward() {
    let fixture = fixture();
    let session = &fixture.session;

    for command in sample_commands(&fixture) {
        let mut direct = EditSession::from_state(session.state().clone());
        command.clone().execute(&mut direct).unwrap();

        let mut roundtrip = EditSession::from_state(session.state().clone());
        let mut replayed = command.clone();
        replayed.undo(&mut roundtrip).unwrap();
        replayed.execute(&mut roundtrip).unwrap();

        assert_eq!(
            roundtrip.state(),
            direct.state(),
            "{} diverged after inverse-then-forward",
            command.description()
        );
    }
}

#[test]
fn test_repeated_cycles_are_stable() {
    let fixture = fixture();

    for mut command in sample_commands(&fixture) {
        let mut session = EditSession::from_state(fixture.session.state().clone());
        let before = session.state().clone();

        command.execute(&mut session).unwrap();
        let after = session.state().clone();

        for _ in 0..3 {
            command.undo(&mut session).unwrap();
            assert_eq!(session.state(), &before);
            command.execute(&mut session).unwrap();
            assert_eq!(session.state(), &after);
        }
    }
}

#[test]
fn test_commands_survive_item_recreation() {
    // The command addresses the effect by (track, position, index), so it
    // still applies after the clip is replaced by a new item at the same spot
    let Fixture { mut session, .. } = fixture();
    let mut command =
        EditEffectCommand::new(1, Position(5), 0, fx(0, 0.0), fx(0, 1.0), true, true);

    command.execute(&mut session).unwrap();
    command.undo(&mut session).unwrap();

    let mut state = session.into_state();
    let clip = state.tracks[1].clips.remove(&Position(5)).expect("clip at 5");
    let replacement = Clip {
        id: ItemId(999),
        ..clip
    };
    state.tracks[1].clips.insert(Position(5), replacement);
    let mut session = EditSession::from_state(state);

    command.execute(&mut session).unwrap();
    let effect = &session.clip_at(1, Position(5)).expect("clip").effects[0];
    assert_eq!(effect.params, fx(0, 1.0));
}

#[test]
fn test_regrouping_grouped_clips_restores_old_groups() {
    let mut session = EditSession::new();
    session.add_track("V1");
    let a = session.add_clip(ItemInfo::new(0, 0, 10), "a.mp4").unwrap();
    let b = session.add_clip(ItemInfo::new(0, 20, 30), "b.mp4").unwrap();
    let c = session.add_clip(ItemInfo::new(0, 40, 50), "c.mp4").unwrap();
    let (a_info, b_info, c_info) = (
        ItemInfo::new(0, 0, 10),
        ItemInfo::new(0, 20, 30),
        ItemInfo::new(0, 40, 50),
    );
    session.group_items(&[a_info, b_info], &[], true).unwrap();
    let before = session.state().clone();

    let mut command = GroupClipsCommand::new(vec![a_info, c_info], Vec::new(), true, true);
    command.execute(&mut session).unwrap();
    assert_eq!(group_slots(&session, &[a, b, c]), vec![Some(GroupId(1)), None, Some(GroupId(1))]);

    command.undo(&mut session).unwrap();
    assert_eq!(
        group_slots(&session, &[a, b, c]),
        vec![Some(GroupId(1)), Some(GroupId(1)), None]
    );
    assert_eq!(session.state(), &before);

    command.execute(&mut session).unwrap();
    command.undo(&mut session).unwrap();
    assert_eq!(session.state(), &before);
}

#[test]
fn test_guide_overwrite_is_reverted() {
    let Fixture { mut session, .. } = fixture();
    let before = session.state().clone();
    let mut command = EditGuideCommand::new(None, Some(Guide::new(30, "chorus")), true);

    command.execute(&mut session).unwrap();
    assert_eq!(session.guide_at(Position(30)), Some("chorus"));

    command.undo(&mut session).unwrap();
    assert_eq!(session.guide_at(Position(30)), Some("intro"));
    assert_eq!(session.state().guides.len(), 1);
    assert_eq!(session.state(), &before);
}

#[test]
fn test_deleted_clip_comes_back_with_identity() {
    let Fixture {
        mut session,
        clip_b,
        ..
    } = fixture();
    let mut command = AddClipCommand::remove(clip_b.clone(), true);

    command.execute(&mut session).unwrap();
    assert_eq!(session.find_item(clip_b.id), None);

    command.undo(&mut session).unwrap();
    assert_eq!(session.clip_at(0, Position(100)), Some(&clip_b));
}

proptest! {
    #[test]
    fn prop_resize_laws(start in 0i64..40, len in 1i64..60) {
        let Fixture { session, .. } = fixture();
        let from = ItemInfo::new(0, 0, 50);
        let to = ItemInfo::new(0, start, (start + len).min(100));
        prop_assume!(to.start < to.end);

        let before = session.state().clone();
        let mut session = EditSession::from_state(before.clone());
        let mut command = ResizeClipCommand::new(from, to, true, false);

        command.execute(&mut session).unwrap();
        let after = session.state().clone();
        command.undo(&mut session).unwrap();
        prop_assert_eq!(session.state(), &before);

        let mut replay = EditSession::from_state(before.clone());
        command.undo(&mut replay).unwrap();
        command.execute(&mut replay).unwrap();
        prop_assert_eq!(replay.state(), &after);
    }

    #[test]
    fn prop_batch_disable_touches_only_listed_indexes(
        mask in prop::collection::vec(any::<bool>(), 5),
    ) {
        let Fixture { mut session, .. } = fixture();
        let indexes: Vec<usize> = (0..5).filter(|&i| mask[i]).collect();
        prop_assume!(!indexes.is_empty());

        let mut command =
            ChangeEffectStateCommand::new(1, Position(5), indexes.clone(), true, false, true);
        command.execute(&mut session).unwrap();

        let clip = session.clip_at(1, Position(5)).unwrap();
        for (index, effect) in clip.effects.iter().enumerate() {
            prop_assert_eq!(effect.enabled, !indexes.contains(&index));
        }
    }
}
