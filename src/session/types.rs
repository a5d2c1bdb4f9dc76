// Value types shared by the edit session and the commands that mutate it

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A frame position on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Position(pub i64);

impl Position {
    pub const ZERO: Position = Position(0);

    pub fn frames(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}f", self.0)
    }
}

impl From<i64> for Position {
    fn from(frames: i64) -> Self {
        Position(frames)
    }
}

/// Stable identity of a clip or transition inside one session
///
/// Survives moves and resizes, unlike the (track, position) address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Group key: the smallest item id among the members
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(pub u64);

/// Bounds of a timeline item: track plus [start, end) in frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemInfo {
    pub track: usize,
    pub start: Position,
    pub end: Position,
}

impl ItemInfo {
    pub fn new(track: usize, start: i64, end: i64) -> Self {
        Self {
            track,
            start: Position(start),
            end: Position(end),
        }
    }

    pub fn duration(&self) -> i64 {
        self.end.0 - self.start.0
    }

    /// Whether the two half-open ranges share at least one frame
    pub fn overlaps(&self, other: &ItemInfo) -> bool {
        self.track == other.track && self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for ItemInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "track {} [{}..{})", self.track, self.start, self.end)
    }
}

/// A single effect parameter value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Number(f64),
    Text(String),
    Toggle(bool),
    /// Animated value: (frame offset, value) pairs sorted by frame
    Keyframes(Vec<(Position, f64)>),
}

/// Full parameter snapshot of one effect or transition instance
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EffectParams {
    pub effect_id: String,
    pub parameters: BTreeMap<String, ParamValue>,
}

impl EffectParams {
    pub fn new(effect_id: impl Into<String>) -> Self {
        Self {
            effect_id: effect_id.into(),
            parameters: BTreeMap::new(),
        }
    }

    /// Builder-style parameter setter
    pub fn with(mut self, name: impl Into<String>, value: ParamValue) -> Self {
        self.parameters.insert(name.into(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.parameters.get(name)
    }
}

/// An effect placed in a clip's effect stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectInstance {
    pub params: EffectParams,
    pub enabled: bool,
}

impl EffectInstance {
    pub fn new(params: EffectParams) -> Self {
        Self {
            params,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: ItemId,
    pub info: ItemInfo,
    /// Source media identifier (bin clip id)
    pub producer: String,
    pub effects: Vec<EffectInstance>,
    pub group: Option<GroupId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub id: ItemId,
    pub info: ItemInfo,
    pub params: EffectParams,
    pub group: Option<GroupId>,
}

/// Timeline marker with a comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guide {
    pub position: Position,
    pub comment: String,
}

impl Guide {
    pub fn new(position: i64, comment: impl Into<String>) -> Self {
        Self {
            position: Position(position),
            comment: comment.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrackInfo {
    pub name: String,
    pub locked: bool,
}

/// One timeline track; clips and transitions are keyed by their start
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Track {
    pub info: TrackInfo,
    pub clips: BTreeMap<Position, Clip>,
    pub transitions: BTreeMap<Position, Transition>,
}

impl Track {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            info: TrackInfo {
                name: name.into(),
                locked: false,
            },
            ..Default::default()
        }
    }
}

/// Everything timeline commands are allowed to mutate
///
/// Two states compare equal only if every field matches, which is what the
/// forward/inverse laws are checked against.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimelineState {
    pub tracks: Vec<Track>,
    pub guides: BTreeMap<Position, String>,
    /// Free-form per-item annotations
    pub metadata: BTreeMap<ItemId, BTreeMap<String, String>>,
    pub next_item_id: u64,
}
