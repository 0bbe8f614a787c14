//! The fixed Google Calendar event color palette.
//!
//! Google identifies event colors by a small-integer string ("1".."11").
//! Rules refer to them by name; unknown names are rejected when the rule or
//! config is built, never while rules are being evaluated.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Color {
    Lavender,
    Sage,
    Purple,
    Pink,
    Yellow,
    Orange,
    LightBlue,
    Gray,
    DarkBlue,
    Green,
    Red,
}

impl Color {
    pub const ALL: [Color; 11] = [
        Color::Lavender,
        Color::Sage,
        Color::Purple,
        Color::Pink,
        Color::Yellow,
        Color::Orange,
        Color::LightBlue,
        Color::Gray,
        Color::DarkBlue,
        Color::Green,
        Color::Red,
    ];

    /// The `colorId` Google uses on the wire.
    pub fn id(self) -> &'static str {
        match self {
            Color::Lavender => "1",
            Color::Sage => "2",
            Color::Purple => "3",
            Color::Pink => "4",
            Color::Yellow => "5",
            Color::Orange => "6",
            Color::LightBlue => "7",
            Color::Gray => "8",
            Color::DarkBlue => "9",
            Color::Green => "10",
            Color::Red => "11",
        }
    }

    pub fn from_id(id: &str) -> Option<Color> {
        Color::ALL.into_iter().find(|c| c.id() == id.trim())
    }

    /// Canonical name used in config files and logs.
    pub fn name(self) -> &'static str {
        match self {
            Color::Lavender => "lavender",
            Color::Sage => "sage",
            Color::Purple => "purple",
            Color::Pink => "pink",
            Color::Yellow => "yellow",
            Color::Orange => "orange",
            Color::LightBlue => "light blue",
            Color::Gray => "gray",
            Color::DarkBlue => "dark blue",
            Color::Green => "green",
            Color::Red => "red",
        }
    }

    /// Google's own label for the color.
    fn google_name(self) -> &'static str {
        match self {
            Color::Lavender => "lavender",
            Color::Sage => "sage",
            Color::Purple => "grape",
            Color::Pink => "flamingo",
            Color::Yellow => "banana",
            Color::Orange => "tangerine",
            Color::LightBlue => "peacock",
            Color::Gray => "graphite",
            Color::DarkBlue => "blueberry",
            Color::Green => "basil",
            Color::Red => "tomato",
        }
    }

    /// Look a color up by canonical name or Google label (case-insensitive).
    pub fn from_name(name: &str) -> Result<Color, CoreError> {
        let wanted = name.trim().to_lowercase();
        let wanted = match wanted.as_str() {
            "grey" => "gray".to_string(),
            _ => wanted.replace(['_', '-'], " "),
        };

        Color::ALL
            .into_iter()
            .find(|c| c.name() == wanted || c.google_name() == wanted)
            .ok_or_else(|| CoreError::UnknownColor(name.to_string()))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Color {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::from_name(s)
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(id: String) -> Result<Self, Self::Error> {
        Color::from_id(&id).ok_or_else(|| format!("unknown colorId '{}'", id))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.id().to_string()
    }
}
