//! Records exchanged with the HTTP API and kept by the repositories.
//!
//! Field names are camelCase on the wire so the browser client can read
//! them unchanged.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::error::{GardenError, Result};
use crate::placement::Point2;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    pub date: String,
    pub title: String,
    pub content: String,
    pub created_at: String,
}

impl JournalEntry {
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("id", &self.id),
            ("title", &self.title),
            ("date", &self.date),
            ("content", &self.content),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(GardenError::InvalidJournalEntry { field });
            }
        }
        Ok(())
    }
}

/// What the journal form submits; id and timestamps are filled in here.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewJournalEntry {
    pub date: Option<String>,
    pub title: String,
    pub content: String,
}

impl NewJournalEntry {
    pub fn into_entry(self) -> Result<JournalEntry> {
        let entry = JournalEntry {
            id: new_id(),
            date: self.date.unwrap_or_else(today),
            title: self.title.trim().to_string(),
            content: self.content,
            created_at: now_rfc3339(),
        };
        entry.validate()?;
        Ok(entry)
    }
}

/// One questionnaire answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Answer {
    A,
    B,
    C,
    D,
}

impl Answer {
    pub const ALL: [Answer; 4] = [Answer::A, Answer::B, Answer::C, Answer::D];

    pub fn as_char(self) -> char {
        match self {
            Answer::A => 'A',
            Answer::B => 'B',
            Answer::C => 'C',
            Answer::D => 'D',
        }
    }
}

impl TryFrom<char> for Answer {
    type Error = GardenError;

    fn try_from(c: char) -> Result<Self> {
        match c.to_ascii_uppercase() {
            'A' => Ok(Answer::A),
            'B' => Ok(Answer::B),
            'C' => Ok(Answer::C),
            'D' => Ok(Answer::D),
            _ => Err(GardenError::InvalidAnswer(c)),
        }
    }
}

/// Compact storage form, e.g. `"ABCADCBDAC"`.
pub fn encode_answers(answers: &[Answer]) -> String {
    answers.iter().map(|a| a.as_char()).collect()
}

pub fn decode_answers(s: &str) -> Result<Vec<Answer>> {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .map(Answer::try_from)
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Flower {
    pub id: String,
    pub journal_id: String,
    pub answers: Vec<Answer>,
    /// `[x, 0, z]` on the ground plane.
    pub position: [f64; 3],
    pub journal_date: String,
    pub journal_title: String,
    pub created: String,
    pub stem_height: f64,
}

impl Flower {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(GardenError::InvalidFlower { field: "id" });
        }
        if self.journal_id.trim().is_empty() {
            return Err(GardenError::InvalidFlower { field: "journalId" });
        }
        if self.answers.is_empty() {
            return Err(GardenError::InvalidFlower { field: "answers" });
        }
        Ok(())
    }

    pub fn ground_position(&self) -> Point2 {
        Point2::from_ground(self.position)
    }
}

/// Request to grow a flower; the server picks the position and stem.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FlowerDraft {
    pub id: Option<String>,
    pub journal_id: String,
    pub answers: Vec<Answer>,
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

pub fn today() -> String {
    OffsetDateTime::now_utc().date().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> JournalEntry {
        JournalEntry {
            id: "j1".into(),
            date: "2024-03-01".into(),
            title: "Spring".into(),
            content: "First warm day.".into(),
            created_at: "2024-03-01T09:00:00Z".into(),
        }
    }

    #[test]
    fn journal_entry_requires_fields() {
        assert!(entry().validate().is_ok());

        let mut e = entry();
        e.title = "  ".into();
        assert!(matches!(
            e.validate(),
            Err(GardenError::InvalidJournalEntry { field: "title" })
        ));

        let mut e = entry();
        e.content.clear();
        assert!(matches!(
            e.validate(),
            Err(GardenError::InvalidJournalEntry { field: "content" })
        ));
    }

    #[test]
    fn flower_wire_shape_is_camel_case() {
        let flower = Flower {
            id: "f1".into(),
            journal_id: "j1".into(),
            answers: vec![Answer::A, Answer::C],
            position: [1.0, 0.0, -2.0],
            journal_date: "2024-03-01".into(),
            journal_title: "Spring".into(),
            created: "2024-03-01T09:05:00Z".into(),
            stem_height: 1.2,
        };
        let v = serde_json::to_value(&flower).unwrap();
        assert_eq!(v["journalId"], "j1");
        assert_eq!(v["answers"], serde_json::json!(["A", "C"]));
        assert_eq!(v["position"], serde_json::json!([1.0, 0.0, -2.0]));
        assert_eq!(v["stemHeight"], 1.2);
        assert!(v.get("journal_id").is_none());
    }

    #[test]
    fn partial_flower_body_fails_validation_not_parsing() {
        let f: Flower = serde_json::from_str(r#"{"id":"f1","journalId":"j1"}"#).unwrap();
        assert!(matches!(
            f.validate(),
            Err(GardenError::InvalidFlower { field: "answers" })
        ));
    }

    #[test]
    fn answers_string_encoding() {
        let answers = decode_answers("abcd DA").unwrap();
        assert_eq!(encode_answers(&answers), "ABCDDA");
        assert!(matches!(
            decode_answers("ABX"),
            Err(GardenError::InvalidAnswer('X'))
        ));
    }

    #[test]
    fn new_entry_gets_id_and_timestamps() {
        let e = NewJournalEntry {
            date: None,
            title: " Rainy ".into(),
            content: "Stayed in.".into(),
        }
        .into_entry()
        .unwrap();
        assert_eq!(e.title, "Rainy");
        assert_eq!(e.id.len(), 36);
        assert_eq!(e.date.len(), 10);
        assert!(e.created_at.contains('T'));
    }

    #[test]
    fn new_entry_without_content_is_rejected() {
        let err = NewJournalEntry {
            date: Some("2024-01-01".into()),
            title: "Empty".into(),
            content: String::new(),
        }
        .into_entry()
        .unwrap_err();
        assert!(err.is_client_error());
    }
}
