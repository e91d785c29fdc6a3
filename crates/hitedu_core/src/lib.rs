pub mod domain;
pub mod ports;
pub mod seed;

pub use domain::{
    default_avatar, Answer, LearningStats, MistakeDraft, MistakeRecord, QuestionType,
    QuizQuestion, Role, ScheduleItem, User, UserAccount, Video, VideoChapter, VideoDraft,
    VideoProgress, VideoQuiz,
};
pub use ports::{StoreError, StoreResult, StoreService};
