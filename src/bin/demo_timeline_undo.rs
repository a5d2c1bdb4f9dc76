// Scripted walk through the timeline command log
// Run with: RUST_LOG=debug cargo run --bin demo_timeline_undo

use ringbuf::traits::Consumer;
use timeline_undo::command::{
    AddExtraDataCommand, ChangeEffectStateCommand, EditEffectCommand, GroupClipsCommand,
    ResizeClipCommand,
};
use timeline_undo::session::{EffectInstance, ParamValue};
use timeline_undo::{
    CommandManager, EditSession, EffectParams, HistoryConfig, ItemInfo, Position,
    SessionMutator, create_notification_channel, create_view_event_channel, save_session,
};
use tracing_subscriber::EnvFilter;

fn blur(radius: f64) -> EffectParams {
    EffectParams::new("blur").with("radius", ParamValue::Number(radius))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match HistoryConfig::default_path() {
        Some(path) => HistoryConfig::load_or_default(&path)?,
        None => HistoryConfig::default(),
    };
    tracing::info!(max_history = config.max_history, "History configuration");

    let (view_tx, mut view_rx) = create_view_event_channel(config.view_event_capacity);
    let (notif_tx, mut notif_rx) = create_notification_channel(config.notification_capacity);
    let mut session = EditSession::new().with_channels(view_tx, notif_tx);
    let mut history = CommandManager::with_config(&config);

    let video = session.add_track("V1");
    let clip_a = session.add_clip(ItemInfo::new(video, 0, 100), "interview.mp4")?;
    session.add_clip(ItemInfo::new(video, 150, 250), "broll.mp4")?;
    session.insert_effect(video, Position(0), 0, &EffectInstance::new(blur(0.0)))?;
    session.insert_effect(
        video,
        Position(0),
        1,
        &EffectInstance::new(EffectParams::new("grain")),
    )?;

    // A slider drag: three edits collapse into one undo step
    for (before, after) in [(0.0, 1.0), (1.0, 2.5), (2.5, 4.0)] {
        history.push(
            EditEffectCommand::new(
                video,
                Position(0),
                0,
                blur(before),
                blur(after),
                false,
                true,
            ),
            &mut session,
        )?;
    }
    println!("After drag: {} undo step(s)", history.undo_count());

    history.push(
        ChangeEffectStateCommand::new(video, Position(0), vec![0, 1], true, true, true),
        &mut session,
    )?;
    history.push(
        ResizeClipCommand::new(
            ItemInfo::new(video, 0, 100),
            ItemInfo::new(video, 0, 120),
            true,
            false,
        ),
        &mut session,
    )?;
    history.push(
        GroupClipsCommand::new(
            vec![ItemInfo::new(video, 0, 120), ItemInfo::new(video, 150, 250)],
            Vec::new(),
            true,
            true,
        ),
        &mut session,
    )?;
    history.push(
        AddExtraDataCommand::new(clip_a, "comment", "", "good take"),
        &mut session,
    )?;

    // Overlapping resize is refused and leaves the log alone
    let refused = history.push(
        ResizeClipCommand::new(
            ItemInfo::new(video, 150, 250),
            ItemInfo::new(video, 110, 250),
            true,
            false,
        ),
        &mut session,
    );
    if let Err(err) = refused {
        println!("Refused: {err}");
    }

    while history.can_undo() {
        let description = history.undo(&mut session)?;
        println!("Undo: {description}");
    }
    while history.can_redo() {
        let description = history.redo(&mut session)?;
        println!("Redo: {description}");
    }

    let path = std::env::temp_dir().join("demo_timeline_undo.json");
    save_session(&session, &path)?;
    history.mark_clean();
    println!("Saved session to {}", path.display());

    let drained = std::iter::from_fn(|| view_rx.try_pop()).count();
    println!("View refresh requests: {drained}");
    while let Some(notification) = notif_rx.try_pop() {
        println!("Notification: {notification}");
    }

    Ok(())
}
