// View events - Session → timeline view / monitor

use crate::session::types::{ItemInfo, Position};

/// Refresh requests emitted by the session after a mutation
///
/// The view drains these on its own schedule; they carry addresses only,
/// never session data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    /// Re-render the monitor at the current frame
    MonitorRefresh,
    /// Rebuild the effect stack panel of the clip at (track, position)
    EffectStackChanged { track: usize, position: Position },
    /// A clip's geometry changed
    ClipChanged { info: ItemInfo },
    TransitionChanged { track: usize, position: Position },
    GroupsChanged,
    TrackChanged { track: usize },
    GuidesChanged,
}
