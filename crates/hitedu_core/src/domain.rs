//! crates/hitedu_core/src/domain.rs
//!
//! Defines the core data structures for the platform.
//! These structs double as the wire format of the JSON API, so every field
//! serializes under the camelCase name the original endpoints expose.

use serde::{Deserialize, Serialize};

/// The two account roles. The same username/password pair may exist once
/// under each role and resolves to distinct accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    /// Chinese display label used in user-facing auth messages.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Student => "学生",
            Role::Teacher => "教师",
        }
    }

    /// Background color of the generated default avatar.
    pub fn avatar_background(&self) -> &'static str {
        match self {
            Role::Student => "0ea5e9",
            Role::Teacher => "7c3aed",
        }
    }
}

/// Builds the ui-avatars.com URL assigned to freshly registered accounts.
pub fn default_avatar(username: &str, role: Role) -> String {
    format!(
        "https://ui-avatars.com/api/?name={}&background={}&color=fff",
        username,
        role.avatar_background()
    )
}

/// A user as exposed to callers: never carries the password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// A stored account record. Passwords are kept in plaintext, which is
/// observed behavior of the platform, preserved rather than repaired.
/// This shape lives inside store backends only; `to_user` strips it
/// before anything leaves the port boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: String,
    pub username: String,
    pub password: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl UserAccount {
    pub fn to_user(&self) -> User {
        User {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role,
            avatar: self.avatar.clone(),
        }
    }
}

/// A chapter marker inside a video.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoChapter {
    pub id: String,
    pub title: String,
    /// Offset from the start of the video, in seconds.
    pub start_time: u32,
    pub duration: u32,
}

/// A quiz embedded into a video, triggered at a fixed playback time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoQuiz {
    pub id: String,
    /// Trigger time in seconds.
    pub timestamp: u32,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: u32,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub url: String,
    /// Display string, e.g. "10:00".
    pub duration: String,
    /// Total length in seconds, for playback logic.
    pub duration_sec: u32,
    pub category: String,
    pub uploader_id: String,
    /// Upload time, epoch milliseconds.
    pub upload_date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapters: Option<Vec<VideoChapter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quizzes: Option<Vec<VideoQuiz>>,
}

/// The payload for adding a video: everything the caller supplies, i.e. a
/// `Video` minus the server-assigned id and upload date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDraft {
    pub title: String,
    pub description: String,
    pub thumbnail: String,
    pub url: String,
    pub duration: String,
    pub duration_sec: u32,
    pub category: String,
    pub uploader_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapters: Option<Vec<VideoChapter>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quizzes: Option<Vec<VideoQuiz>>,
}

impl VideoDraft {
    pub fn into_video(self, id: String, upload_date: i64) -> Video {
        Video {
            id,
            title: self.title,
            description: self.description,
            thumbnail: self.thumbnail,
            url: self.url,
            duration: self.duration,
            duration_sec: self.duration_sec,
            category: self.category,
            uploader_id: self.uploader_id,
            upload_date,
            chapters: self.chapters,
            quizzes: self.quizzes,
        }
    }
}

/// Playback progress for one (user, video) pair. Saves replace the whole
/// record; there is never more than one per key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoProgress {
    pub video_id: String,
    /// Last watched playback position, in seconds.
    pub timestamp: f64,
    pub completed: bool,
    /// Epoch milliseconds of the last save.
    pub last_updated: i64,
}

impl VideoProgress {
    /// The composite key both backends index progress records under.
    pub fn key(user_id: &str, video_id: &str) -> String {
        format!("{}_{}", user_id, video_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    MultipleChoice,
    Subjective,
}

/// A quiz question as snapshotted into a mistake record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<u32>,
    pub explanation: String,
}

/// A submitted answer: an option index for multiple choice, free text for
/// subjective questions. Serializes as a bare number or string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Choice(u32),
    Text(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MistakeRecord {
    pub id: String,
    pub question: QuizQuestion,
    pub wrong_answer: Answer,
    pub topic: String,
    /// Epoch milliseconds of when the mistake was recorded.
    pub timestamp: i64,
}

/// A mistake as submitted by the caller; id and timestamp are assigned by
/// whichever store accepts it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MistakeDraft {
    pub question: QuizQuestion,
    pub wrong_answer: Answer,
    pub topic: String,
}

impl MistakeDraft {
    pub fn into_record(self, id: String, timestamp: i64) -> MistakeRecord {
        MistakeRecord {
            id,
            question: self.question,
            wrong_answer: self.wrong_answer,
            topic: self.topic,
            timestamp,
        }
    }
}

/// One slot in a user's weekly schedule. Saves replace the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleItem {
    pub id: String,
    pub day: String,
    pub time_slot: String,
    pub course_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Aggregate learning analytics. Derived on every read, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningStats {
    pub total_study_hours: u32,
    pub completed_courses: u32,
    /// Percentage, 0-100.
    pub quiz_accuracy: u32,
    pub weak_points: Vec<String>,
    /// Study minutes per day over the last seven days.
    pub learning_trend: Vec<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_serializes_under_wire_names() {
        let video = Video {
            id: "v9".to_string(),
            title: "t".to_string(),
            description: "d".to_string(),
            thumbnail: "th".to_string(),
            url: "u".to_string(),
            duration: "01:00".to_string(),
            duration_sec: 60,
            category: "c".to_string(),
            uploader_id: "teacher_mock".to_string(),
            upload_date: 1714521600000,
            chapters: None,
            quizzes: None,
        };
        let json = serde_json::to_value(&video).unwrap();
        assert_eq!(json["durationSec"], 60);
        assert_eq!(json["uploaderId"], "teacher_mock");
        assert_eq!(json["uploadDate"], 1714521600000i64);
        assert!(json.get("chapters").is_none());
    }

    #[test]
    fn answer_round_trips_as_bare_number_or_string() {
        assert_eq!(serde_json::to_string(&Answer::Choice(2)).unwrap(), "2");
        assert_eq!(
            serde_json::to_string(&Answer::Text("光合作用".to_string())).unwrap(),
            "\"光合作用\""
        );
        let parsed: Answer = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, Answer::Choice(3));
    }

    #[test]
    fn question_kind_uses_the_type_key() {
        let q = QuizQuestion {
            id: "q1".to_string(),
            kind: QuestionType::MultipleChoice,
            question: "?".to_string(),
            options: Some(vec!["a".to_string()]),
            correct_answer: Some(0),
            explanation: "e".to_string(),
        };
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["type"], "multiple_choice");
        assert_eq!(json["correctAnswer"], 0);
    }
}
