//! The session value bag and the vocabulary used to address its fields.

use std::fmt;

use crate::error::{Result, StoreError};

/// Countdown value a fresh round starts from.
pub const INITIAL_TIME_COUNT: i64 = 59;

/// Names of the four session fields.
///
/// Displays as the name UI code uses (`mode`, `difficulty`, `points`,
/// `timeCount`). Parsing is case-insensitive and also accepts `time_count`.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[strum(ascii_case_insensitive)]
pub enum Field {
    #[strum(to_string = "mode")]
    Mode,
    #[strum(to_string = "difficulty")]
    Difficulty,
    #[strum(to_string = "points")]
    Points,
    #[strum(to_string = "timeCount", serialize = "time_count")]
    TimeCount,
}

impl Field {
    pub const COUNT: usize = 4;

    /// Every field, in declaration order.
    pub const ALL: [Field; Self::COUNT] = [
        Field::Mode,
        Field::Difficulty,
        Field::Points,
        Field::TimeCount,
    ];

    /// Resolves a field from its external name.
    pub fn from_name(name: &str) -> Result<Self> {
        name.parse()
            .map_err(|_| StoreError::UnknownField(name.to_string()))
    }

    /// The kind of value this field holds.
    pub const fn kind(self) -> FieldKind {
        match self {
            Field::Mode | Field::Difficulty => FieldKind::Text,
            Field::Points | Field::TimeCount => FieldKind::Integer,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

/// Value kind a field accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum FieldKind {
    Text,
    Integer,
}

/// An untyped field value, used by the name-addressed API and in change
/// notifications.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum FieldValue {
    Text(String),
    Integer(i64),
}

impl FieldValue {
    pub const fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Integer(_) => FieldKind::Integer,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Integer(_) => None,
        }
    }

    pub const fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(value) => Some(*value),
            FieldValue::Text(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => write!(f, "{:?}", text),
            FieldValue::Integer(value) => write!(f, "{}", value),
        }
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<GameMode> for FieldValue {
    fn from(mode: GameMode) -> Self {
        FieldValue::Text(mode.as_ref().to_string())
    }
}

/// Well-known mode tags.
///
/// The session stores the raw tag, so screens may use tags outside this
/// list; these are the ones the game flow itself moves through.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum GameMode {
    /// Start screen, before a round is running.
    #[default]
    Start,
    /// A round is in progress.
    Playing,
    /// The round ended and results are shown.
    Finished,
}

impl From<GameMode> for String {
    fn from(mode: GameMode) -> Self {
        mode.as_ref().to_string()
    }
}

/// State shared by every screen of one game session.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct GameSession {
    /// Current phase tag, see [`GameMode`].
    pub mode: String,
    /// Difficulty label, empty until the player picks one.
    pub difficulty: String,
    /// Accumulated score. Not range checked.
    pub points: i64,
    /// Remaining time units of the round. Not range checked.
    pub time_count: i64,
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            mode: GameMode::Start.into(),
            difficulty: String::new(),
            points: 0,
            time_count: INITIAL_TIME_COUNT,
        }
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current value of `field`.
    pub fn get(&self, field: Field) -> FieldValue {
        match field {
            Field::Mode => FieldValue::Text(self.mode.clone()),
            Field::Difficulty => FieldValue::Text(self.difficulty.clone()),
            Field::Points => FieldValue::Integer(self.points),
            Field::TimeCount => FieldValue::Integer(self.time_count),
        }
    }

    /// Assigns `value` to `field`, rejecting values of the wrong kind.
    ///
    /// On error the session is left untouched.
    pub fn set(&mut self, field: Field, value: FieldValue) -> Result<()> {
        match (field, value) {
            (Field::Mode, FieldValue::Text(text)) => self.mode = text,
            (Field::Difficulty, FieldValue::Text(text)) => self.difficulty = text,
            (Field::Points, FieldValue::Integer(value)) => self.points = value,
            (Field::TimeCount, FieldValue::Integer(value)) => self.time_count = value,
            (field, value) => {
                return Err(StoreError::KindMismatch {
                    field,
                    expected: field.kind(),
                    found: value.kind(),
                });
            }
        }
        Ok(())
    }

    /// Parses the mode tag, if it is one of the well-known ones.
    pub fn game_mode(&self) -> Option<GameMode> {
        self.mode.parse().ok()
    }
}
