use crate::shared::entity::{Entity, ID};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// A `Reminder` is a message payload a user wants sent back to them
/// at `due_date` + `due_time`. It is deleted after delivery.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    /// The chat identity of the user that owns this `Reminder` and
    /// will receive the payload at the due instant
    pub owner_id: i64,
    pub due_date: NaiveDate,
    pub due_time: NaiveTime,
    pub kind: PayloadKind,
    /// Message body, or caption when `kind` is a media kind
    pub text: Option<String>,
    /// Opaque media handle understood by the transmit collaborator.
    /// Required for every kind except `Text`
    pub file_ref: Option<String>,
}

impl Reminder {
    pub fn due_datetime(&self) -> NaiveDateTime {
        self.due_date.and_time(self.due_time)
    }

    pub fn is_due_on(&self, date: NaiveDate) -> bool {
        self.due_date == date
    }

    /// A reminder whose due instant has already passed, e.g. found in
    /// storage after a crash. It is treated as immediately due.
    pub fn is_stale(&self, now: NaiveDateTime) -> bool {
        self.due_datetime() < now
    }
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    Text,
    Photo,
    Video,
    Audio,
    Document,
    Voice,
    VideoNote,
}

impl PayloadKind {
    pub fn requires_file_ref(&self) -> bool {
        !matches!(self, PayloadKind::Text)
    }

    /// Voice messages and video notes cannot carry a caption on the
    /// transmit side, so their `text` is dropped at delivery.
    pub fn supports_caption(&self) -> bool {
        !matches!(self, PayloadKind::Voice | PayloadKind::VideoNote)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadKind::Text => "text",
            PayloadKind::Photo => "photo",
            PayloadKind::Video => "video",
            PayloadKind::Audio => "audio",
            PayloadKind::Document => "document",
            PayloadKind::Voice => "voice",
            PayloadKind::VideoNote => "video_note",
        }
    }
}

#[derive(Error, Debug)]
pub enum InvalidPayloadKind {
    #[error("Payload kind: {0} is not recognized")]
    Unrecognized(String),
}

impl FromStr for PayloadKind {
    type Err = InvalidPayloadKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(PayloadKind::Text),
            "photo" => Ok(PayloadKind::Photo),
            "video" => Ok(PayloadKind::Video),
            "audio" => Ok(PayloadKind::Audio),
            "document" => Ok(PayloadKind::Document),
            "voice" => Ok(PayloadKind::Voice),
            "video_note" => Ok(PayloadKind::VideoNote),
            _ => Err(InvalidPayloadKind::Unrecognized(s.to_string())),
        }
    }
}
