//! Enumerations and field types for the task board.
//!
//! This module defines the three board columns and the colour theme,
//! along with the small conversions the board, the CLI and the TUI share.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Number of columns on the board.
pub const COLUMN_COUNT: usize = 3;

/// Lifecycle bucket a task card lives in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Column {
    #[serde(alias = "Pending")]
    Pending,
    #[serde(alias = "InProgress")]
    InProgress,
    #[serde(alias = "Done")]
    Done,
}

impl Column {
    pub const ALL: [Column; COLUMN_COUNT] = [Column::Pending, Column::InProgress, Column::Done];

    /// Position of the column on the board, left to right.
    pub fn index(self) -> usize {
        match self {
            Column::Pending => 0,
            Column::InProgress => 1,
            Column::Done => 2,
        }
    }

    /// Column at a board position.
    pub fn from_index(index: usize) -> Option<Column> {
        Column::ALL.get(index).copied()
    }

    /// Column reached by stepping `delta` positions, wrapping around both ends.
    pub fn shifted(self, delta: i64) -> Column {
        let target = (self.index() as i64 + delta).rem_euclid(COLUMN_COUNT as i64);
        Column::ALL[target as usize]
    }

    /// Language pack key of the column header.
    pub fn lang_key(self) -> &'static str {
        match self {
            Column::Pending => "gui.tasks.columns.awaits",
            Column::InProgress => "gui.tasks.columns.in_process",
            Column::Done => "gui.tasks.columns.finished",
        }
    }
}

/// Direction to move a card on the board.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn delta(self) -> i64 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// Colour theme of the terminal UI.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn from_light_flag(is_light: bool) -> Theme {
        if is_light { Theme::Light } else { Theme::Dark }
    }

    pub fn is_light(self) -> bool {
        self == Theme::Light
    }

    pub fn toggled(self) -> Theme {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}
