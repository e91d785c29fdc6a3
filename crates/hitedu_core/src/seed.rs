//! crates/hitedu_core/src/seed.rs
//!
//! The fixed demo dataset both store backends install on first touch, and
//! the mock analytics generator both serve from. Keeping these here means
//! the HTTP server and the local fallback store cannot drift apart.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{
    LearningStats, Role, UserAccount, Video, VideoChapter, VideoQuiz,
};

/// The two demo accounts. Both use the credential pair 123456/123456; the
/// shared username is deliberate, it exercises the per-role identity rule.
pub fn demo_users() -> Vec<UserAccount> {
    vec![
        UserAccount {
            id: "student_123456".to_string(),
            username: "123456".to_string(),
            password: "123456".to_string(),
            email: "student@hitedu.com".to_string(),
            role: Role::Student,
            avatar: Some(
                "https://ui-avatars.com/api/?name=123456&background=0ea5e9&color=fff".to_string(),
            ),
        },
        UserAccount {
            id: "teacher_123456".to_string(),
            username: "123456".to_string(),
            password: "123456".to_string(),
            email: "teacher@hitedu.com".to_string(),
            role: Role::Teacher,
            avatar: Some(
                "https://ui-avatars.com/api/?name=Teacher&background=7c3aed&color=fff".to_string(),
            ),
        },
    ]
}

/// The four demo videos, chapters and an embedded quiz on the first one.
pub fn demo_videos() -> Vec<Video> {
    vec![
        Video {
            id: "v1".to_string(),
            title: "计算机科学导论".to_string(),
            description: "全面概述计算机科学基础、算法和数据结构。适合初学者的入门课程。"
                .to_string(),
            thumbnail: "https://picsum.photos/id/1/800/450".to_string(),
            url: "http://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4"
                .to_string(),
            duration: "10:00".to_string(),
            duration_sec: 600,
            category: "计算机科学".to_string(),
            uploader_id: "teacher_mock".to_string(),
            upload_date: 1714521600000,
            chapters: Some(vec![
                VideoChapter {
                    id: "c1".to_string(),
                    title: "片头与背景介绍".to_string(),
                    start_time: 0,
                    duration: 60,
                },
                VideoChapter {
                    id: "c2".to_string(),
                    title: "核心冲突展开".to_string(),
                    start_time: 60,
                    duration: 300,
                },
                VideoChapter {
                    id: "c3".to_string(),
                    title: "高潮与结局".to_string(),
                    start_time: 360,
                    duration: 236,
                },
            ]),
            quizzes: Some(vec![VideoQuiz {
                id: "q1".to_string(),
                timestamp: 10,
                question: "计算机的核心部件是什么？".to_string(),
                options: vec![
                    "CPU".to_string(),
                    "显示器".to_string(),
                    "键盘".to_string(),
                    "鼠标".to_string(),
                ],
                correct_answer: 0,
                explanation: "CPU（中央处理器）是计算机的大脑，负责执行指令。".to_string(),
            }]),
        },
        Video {
            id: "v2".to_string(),
            title: "进阶机器学习".to_string(),
            description: "深入探讨神经网络、反向传播和现代人工智能架构。".to_string(),
            thumbnail: "https://picsum.photos/id/20/800/450".to_string(),
            url: "http://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ElephantsDream.mp4"
                .to_string(),
            duration: "15:30".to_string(),
            duration_sec: 930,
            category: "人工智能".to_string(),
            uploader_id: "teacher_mock".to_string(),
            upload_date: 1714608000000,
            chapters: Some(Vec::new()),
            quizzes: Some(Vec::new()),
        },
        Video {
            id: "v3".to_string(),
            title: "现代艺术史".to_string(),
            description: "探索从19世纪末至今的艺术运动演变。".to_string(),
            thumbnail: "https://picsum.photos/id/26/800/450".to_string(),
            url: "http://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerBlazes.mp4"
                .to_string(),
            duration: "08:45".to_string(),
            duration_sec: 525,
            category: "人文艺术".to_string(),
            uploader_id: "teacher_mock".to_string(),
            upload_date: 1714694400000,
            chapters: Some(Vec::new()),
            quizzes: Some(Vec::new()),
        },
        Video {
            id: "v4".to_string(),
            title: "量子物理基础".to_string(),
            description: "了解量子力学和粒子物理的奇妙世界。".to_string(),
            thumbnail: "https://picsum.photos/id/119/800/450".to_string(),
            url: "http://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ForBiggerJoyrides.mp4"
                .to_string(),
            duration: "12:20".to_string(),
            duration_sec: 740,
            category: "物理学".to_string(),
            uploader_id: "teacher_mock".to_string(),
            upload_date: 1714780800000,
            chapters: Some(Vec::new()),
            quizzes: Some(Vec::new()),
        },
    ]
}

/// Mock analytics. Regenerated on every read; the numbers are noise by
/// contract, only the shape and value ranges are fixed.
pub fn random_stats() -> LearningStats {
    let mut rng = rand::thread_rng();
    let mut weak_pool = ["量子物理", "高阶函数", "现代艺术流派"];
    weak_pool.shuffle(&mut rng);

    LearningStats {
        total_study_hours: rng.gen_range(10..60),
        completed_courses: rng.gen_range(0..8),
        quiz_accuracy: rng.gen_range(60..90),
        weak_points: weak_pool.iter().take(2).map(|s| s.to_string()).collect(),
        learning_trend: (0..7).map(|_| rng.gen_range(0..120)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_accounts_share_credentials_across_roles() {
        let users = demo_users();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].username, users[1].username);
        assert_eq!(users[0].password, users[1].password);
        assert_ne!(users[0].role, users[1].role);
        assert_ne!(users[0].id, users[1].id);
    }

    #[test]
    fn stats_stay_within_contracted_ranges() {
        for _ in 0..50 {
            let stats = random_stats();
            assert!((10..60).contains(&stats.total_study_hours));
            assert!(stats.completed_courses < 8);
            assert!((60..90).contains(&stats.quiz_accuracy));
            assert_eq!(stats.weak_points.len(), 2);
            assert_eq!(stats.learning_trend.len(), 7);
            assert!(stats.learning_trend.iter().all(|m| *m < 120));
        }
    }
}
