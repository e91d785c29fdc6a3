//! crates/hitedu_client/src/adapters/local.rs
//!
//! The secondary store adapter: the full `StoreService` port implemented
//! over the local key-value files, with simulated latency so operations
//! feel like network calls to the UI. There is no network here, so this
//! backend never raises a transport-classified error; every failure it
//! produces is a business rule saying no.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use hitedu_core::{
    default_avatar, seed, LearningStats, MistakeDraft, MistakeRecord, Role, ScheduleItem,
    StoreError, StoreResult, StoreService, User, UserAccount, Video, VideoDraft, VideoProgress,
};

use crate::storage::{
    KvStore, MISTAKES_KEY, PROGRESS_KEY, SCHEDULE_KEY, SESSION_KEY, USERS_KEY, VIDEOS_KEY,
};

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

pub struct LocalBackend {
    kv: Arc<KvStore>,
    simulate_latency: bool,
}

impl LocalBackend {
    pub fn new(kv: Arc<KvStore>, simulate_latency: bool) -> Self {
        Self {
            kv,
            simulate_latency,
        }
    }

    async fn delay(&self, ms: u64) {
        if self.simulate_latency {
            tokio::time::sleep(Duration::from_millis(ms)).await;
        }
    }

    /// Installs the demo accounts on first touch. Idempotent: only writes
    /// when the key has never existed.
    fn ensure_users(&self) -> StoreResult<()> {
        if !self.kv.contains(USERS_KEY) {
            self.kv.set(USERS_KEY, &seed::demo_users())?;
        }
        Ok(())
    }

    /// Installs the demo videos on first touch, same idempotency rule.
    fn ensure_videos(&self) -> StoreResult<()> {
        if !self.kv.contains(VIDEOS_KEY) {
            self.kv.set(VIDEOS_KEY, &seed::demo_videos())?;
        }
        Ok(())
    }

    fn load_users(&self) -> StoreResult<Vec<UserAccount>> {
        Ok(self.kv.get(USERS_KEY)?.unwrap_or_default())
    }
}

#[async_trait]
impl StoreService for LocalBackend {
    async fn login(&self, username: &str, password: &str, role: Role) -> StoreResult<User> {
        self.ensure_users()?;
        self.delay(800).await;
        let users = self.load_users()?;

        // Username, password AND role must all match: the same credential
        // pair may resolve to different accounts under different roles.
        let account = users
            .iter()
            .find(|u| u.username == username && u.password == password && u.role == role);

        let Some(account) = account else {
            // Distinguish "right credentials, wrong role" for a clearer
            // message than a blanket credentials failure.
            if users
                .iter()
                .any(|u| u.username == username && u.password == password)
            {
                return Err(StoreError::RoleMismatch(role));
            }
            return Err(StoreError::InvalidCredentials);
        };

        let user = account.to_user();
        self.kv.set(SESSION_KEY, &user)?;
        Ok(user)
    }

    async fn register(
        &self,
        username: &str,
        password: &str,
        email: &str,
        role: Role,
    ) -> StoreResult<User> {
        self.ensure_users()?;
        self.delay(1000).await;
        let mut users = self.load_users()?;

        // Uniqueness is scoped to (username, role), not username alone.
        if users.iter().any(|u| u.username == username && u.role == role) {
            return Err(StoreError::DuplicateUser);
        }

        let account = UserAccount {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password: password.to_string(),
            email: email.to_string(),
            role,
            avatar: Some(default_avatar(username, role)),
        };
        users.push(account.clone());
        self.kv.set(USERS_KEY, &users)?;

        let user = account.to_user();
        self.kv.set(SESSION_KEY, &user)?;
        Ok(user)
    }

    async fn update_avatar(&self, user_id: &str, avatar: &str) -> StoreResult<User> {
        self.delay(500).await;
        let mut users = self.load_users()?;
        let index = users
            .iter()
            .position(|u| u.id == user_id)
            .ok_or(StoreError::UserNotFound)?;

        users[index].avatar = Some(avatar.to_string());
        let updated = users[index].to_user();
        self.kv.set(USERS_KEY, &users)?;

        // Keep the persisted session in step when it is this account.
        if let Some(session) = self.kv.get::<User>(SESSION_KEY)? {
            if session.id == user_id {
                self.kv.set(SESSION_KEY, &updated)?;
            }
        }
        Ok(updated)
    }

    async fn get_videos(&self) -> StoreResult<Vec<Video>> {
        self.ensure_videos()?;
        self.delay(500).await;
        Ok(self.kv.get(VIDEOS_KEY)?.unwrap_or_default())
    }

    async fn add_video(&self, draft: VideoDraft) -> StoreResult<Video> {
        self.ensure_videos()?;
        self.delay(800).await;
        let mut videos: Vec<Video> = self.kv.get(VIDEOS_KEY)?.unwrap_or_default();
        let video = draft.into_video(Uuid::new_v4().to_string(), now_ms());
        // Newest uploads surface first.
        videos.insert(0, video.clone());
        self.kv.set(VIDEOS_KEY, &videos)?;
        Ok(video)
    }

    async fn save_video_progress(
        &self,
        user_id: &str,
        video_id: &str,
        position: f64,
    ) -> StoreResult<()> {
        let mut progress: HashMap<String, VideoProgress> =
            self.kv.get(PROGRESS_KEY)?.unwrap_or_default();
        progress.insert(
            VideoProgress::key(user_id, video_id),
            VideoProgress {
                video_id: video_id.to_string(),
                timestamp: position,
                completed: false,
                last_updated: now_ms(),
            },
        );
        self.kv.set(PROGRESS_KEY, &progress)
    }

    async fn get_video_progress(&self, user_id: &str, video_id: &str) -> StoreResult<f64> {
        self.delay(300).await;
        let progress: HashMap<String, VideoProgress> =
            self.kv.get(PROGRESS_KEY)?.unwrap_or_default();
        Ok(progress
            .get(&VideoProgress::key(user_id, video_id))
            .map(|p| p.timestamp)
            .unwrap_or(0.0))
    }

    async fn save_mistake(
        &self,
        user_id: &str,
        draft: MistakeDraft,
    ) -> StoreResult<MistakeRecord> {
        let mut mistakes: HashMap<String, Vec<MistakeRecord>> =
            self.kv.get(MISTAKES_KEY)?.unwrap_or_default();
        let record = draft.into_record(Uuid::new_v4().to_string(), now_ms());
        mistakes
            .entry(user_id.to_string())
            .or_default()
            .insert(0, record.clone());
        self.kv.set(MISTAKES_KEY, &mistakes)?;
        Ok(record)
    }

    async fn get_mistakes(&self, user_id: &str) -> StoreResult<Vec<MistakeRecord>> {
        self.delay(300).await;
        let mistakes: HashMap<String, Vec<MistakeRecord>> =
            self.kv.get(MISTAKES_KEY)?.unwrap_or_default();
        Ok(mistakes.get(user_id).cloned().unwrap_or_default())
    }

    async fn save_schedule(&self, user_id: &str, items: Vec<ScheduleItem>) -> StoreResult<()> {
        let mut schedules: HashMap<String, Vec<ScheduleItem>> =
            self.kv.get(SCHEDULE_KEY)?.unwrap_or_default();
        schedules.insert(user_id.to_string(), items);
        self.kv.set(SCHEDULE_KEY, &schedules)
    }

    async fn get_schedule(&self, user_id: &str) -> StoreResult<Vec<ScheduleItem>> {
        self.delay(300).await;
        let schedules: HashMap<String, Vec<ScheduleItem>> =
            self.kv.get(SCHEDULE_KEY)?.unwrap_or_default();
        Ok(schedules.get(user_id).cloned().unwrap_or_default())
    }

    async fn get_user_stats(&self, _user_id: &str) -> StoreResult<LearningStats> {
        self.delay(600).await;
        Ok(seed::random_stats())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hitedu_core::{Answer, QuestionType, QuizQuestion};

    fn backend() -> (tempfile::TempDir, LocalBackend) {
        let dir = tempfile::tempdir().unwrap();
        let kv = Arc::new(KvStore::open(dir.path()).unwrap());
        (dir, LocalBackend::new(kv, false))
    }

    fn question(text: &str) -> QuizQuestion {
        QuizQuestion {
            id: Uuid::new_v4().to_string(),
            kind: QuestionType::MultipleChoice,
            question: text.to_string(),
            options: Some(vec!["甲".to_string(), "乙".to_string()]),
            correct_answer: Some(0),
            explanation: "略".to_string(),
        }
    }

    fn schedule_item(course: &str) -> ScheduleItem {
        ScheduleItem {
            id: Uuid::new_v4().to_string(),
            day: "周一".to_string(),
            time_slot: "08:00-09:40".to_string(),
            course_name: course.to_string(),
            location: None,
        }
    }

    #[tokio::test]
    async fn seeded_student_can_log_in() {
        let (_dir, store) = backend();
        let user = store.login("123456", "123456", Role::Student).await.unwrap();
        assert_eq!(user.id, "student_123456");
        assert_eq!(user.role, Role::Student);
    }

    #[tokio::test]
    async fn wrong_role_gets_a_role_specific_message() {
        let (_dir, store) = backend();
        store
            .register("xiaoli", "pw", "xiaoli@hitedu.com", Role::Student)
            .await
            .unwrap();

        let err = store.login("xiaoli", "pw", Role::Teacher).await.unwrap_err();
        assert_eq!(err.to_string(), "该账号不能以教师身份登录");

        let err = store.login("xiaoli", "nope", Role::Student).await.unwrap_err();
        assert_eq!(err.to_string(), "用户名或密码错误");
    }

    #[tokio::test]
    async fn registration_is_unique_per_username_and_role() {
        let (_dir, store) = backend();
        let student = store
            .register("xiaoli", "pw", "s@hitedu.com", Role::Student)
            .await
            .unwrap();
        let teacher = store
            .register("xiaoli", "pw", "t@hitedu.com", Role::Teacher)
            .await
            .unwrap();
        assert_ne!(student.id, teacher.id);

        let err = store
            .register("xiaoli", "other", "x@hitedu.com", Role::Student)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "该角色下的用户名已存在");
    }

    #[tokio::test]
    async fn video_seeding_is_idempotent() {
        let (_dir, store) = backend();
        let first = store.get_videos().await.unwrap();
        let second = store.get_videos().await.unwrap();
        assert_eq!(first.len(), 4);
        assert_eq!(second.len(), 4);
        let ids: Vec<&str> = first.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["v1", "v2", "v3", "v4"]);
    }

    #[tokio::test]
    async fn added_videos_surface_first_and_persist() {
        let (_dir, store) = backend();
        let draft = VideoDraft {
            title: "数据库系统".to_string(),
            description: "d".to_string(),
            thumbnail: "t".to_string(),
            url: "u".to_string(),
            duration: "05:00".to_string(),
            duration_sec: 300,
            category: "计算机科学".to_string(),
            uploader_id: "teacher_123456".to_string(),
            chapters: None,
            quizzes: None,
        };
        let added = store.add_video(draft).await.unwrap();
        let videos = store.get_videos().await.unwrap();
        assert_eq!(videos.len(), 5);
        assert_eq!(videos[0].id, added.id);
    }

    #[tokio::test]
    async fn progress_saves_replace_the_record_for_the_key() {
        let (dir, store) = backend();
        store.save_video_progress("u1", "v1", 30.0).await.unwrap();
        store.save_video_progress("u1", "v1", 45.0).await.unwrap();

        assert_eq!(store.get_video_progress("u1", "v1").await.unwrap(), 45.0);
        assert_eq!(store.get_video_progress("u1", "v2").await.unwrap(), 0.0);

        // Exactly one stored record for the key, the earlier value gone.
        let raw = std::fs::read_to_string(dir.path().join("hitedu_progress.json")).unwrap();
        let map: HashMap<String, VideoProgress> = serde_json::from_str(&raw).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["u1_v1"].timestamp, 45.0);
    }

    #[tokio::test]
    async fn schedule_saves_replace_not_merge() {
        let (_dir, store) = backend();
        store
            .save_schedule("u1", vec![schedule_item("高等数学")])
            .await
            .unwrap();
        store
            .save_schedule("u1", vec![schedule_item("大学物理")])
            .await
            .unwrap();

        let schedule = store.get_schedule("u1").await.unwrap();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].course_name, "大学物理");
    }

    #[tokio::test]
    async fn mistakes_append_newest_first() {
        let (_dir, store) = backend();
        let first = store
            .save_mistake(
                "u1",
                MistakeDraft {
                    question: question("第一题"),
                    wrong_answer: Answer::Choice(1),
                    topic: "数学".to_string(),
                },
            )
            .await
            .unwrap();
        let second = store
            .save_mistake(
                "u1",
                MistakeDraft {
                    question: question("第二题"),
                    wrong_answer: Answer::Text("答错了".to_string()),
                    topic: "物理".to_string(),
                },
            )
            .await
            .unwrap();

        let mistakes = store.get_mistakes("u1").await.unwrap();
        assert_eq!(mistakes.len(), 2);
        assert_eq!(mistakes[0].id, second.id);
        assert_eq!(mistakes[1].id, first.id);
    }

    #[tokio::test]
    async fn avatar_update_keeps_the_session_in_step() {
        let (_dir, store) = backend();
        let user = store.login("123456", "123456", Role::Student).await.unwrap();

        let updated = store
            .update_avatar(&user.id, "https://example.com/new.png")
            .await
            .unwrap();
        assert_eq!(updated.avatar.as_deref(), Some("https://example.com/new.png"));

        let session: Option<User> = store.kv.get(SESSION_KEY).unwrap();
        assert_eq!(
            session.unwrap().avatar.as_deref(),
            Some("https://example.com/new.png")
        );

        let err = store
            .update_avatar("ghost", "https://example.com/x.png")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User not found");
    }
}
