use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Pending,
    Completed,
}

impl Status {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            _ => anyhow::bail!("invalid status '{s}': must be pending or completed"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task category. Optional on a task; absent means uncategorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Homework,
    Cleaning,
    Work,
}

impl Kind {
    pub fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "homework" => Ok(Self::Homework),
            "cleaning" => Ok(Self::Cleaning),
            "work" => Ok(Self::Work),
            _ => anyhow::bail!("invalid kind '{s}': must be homework, cleaning, or work"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Homework => "homework",
            Self::Cleaning => "cleaning",
            Self::Work => "work",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single to-do record. Field renames match the stored JSON records.
///
/// `status` and `done` are deliberately independent: `status` is the
/// workflow state the status filter matches against, `done` is the quick
/// checkmark toggled from the list. Neither writes to the other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: Option<Kind>,
    #[serde(rename = "durationMinutes", default)]
    pub duration_minutes: u32,
    #[serde(default)]
    pub status: Status,
    #[serde(rename = "isDone", default)]
    pub done: bool,
}

impl Task {
    pub fn checkbox(&self) -> &'static str {
        if self.done {
            "[x]"
        } else {
            "[ ]"
        }
    }
}

/// Partial task used by create and update. Unset fields are left untouched
/// on update and take defaults on create.
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub name: Option<String>,
    pub kind: Option<Kind>,
    pub duration_minutes: Option<u32>,
    pub status: Option<Status>,
}
