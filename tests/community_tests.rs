use std::sync::Arc;

use aula::domain::{LessonId, UserId, LESSON_COMPLETION_POINTS};
use aula::service::{LeaderboardService, ProgressService};
use aula::testkit::domain::{lesson, module, post, profile, topic};
use aula::testkit::store::InMemoryStore;

#[tokio::test]
async fn first_completion_awards_points_once() {
    let store = Arc::new(InMemoryStore::new().with_profiles(vec![profile("ana", "Ana", 0)]));
    let svc = ProgressService::new(store.clone());
    let user = UserId::new("ana");
    let lesson_id = LessonId::new("l1");

    assert!(svc.mark_complete(&user, &lesson_id).await.expect("first"));
    assert_eq!(store.points_of(&user), LESSON_COMPLETION_POINTS);

    // Completing again is a no-op, not an error
    assert!(!svc.mark_complete(&user, &lesson_id).await.expect("second"));
    assert_eq!(store.points_of(&user), LESSON_COMPLETION_POINTS);

    let awards = store
        .mutations()
        .into_iter()
        .filter(|m| *m == "add_points")
        .count();
    assert_eq!(awards, 1);
}

#[tokio::test]
async fn module_progress_counts_completed_lessons() {
    let mut m1 = module("m1", 1);
    let mut t1 = topic("t1", "m1", 1);
    t1.lessons = vec![lesson("l1", "t1", 1), lesson("l2", "t1", 2), lesson("l3", "t1", 3)];
    m1.topics = vec![t1];
    let m2 = module("m2", 2);

    let user = UserId::new("ana");
    let store = Arc::new(InMemoryStore::new().with_progress(vec![
        (user.clone(), LessonId::new("l1")),
        (user.clone(), LessonId::new("l3")),
    ]));
    let svc = ProgressService::new(store.clone());

    let progress = svc.module_progress(&user, &[m1, m2]).await.expect("progress");

    assert_eq!(progress.len(), 2);
    assert_eq!((progress[0].completed, progress[0].total), (2, 3));
    assert_eq!(progress[0].percent(), 66);
    assert_eq!((progress[1].completed, progress[1].total), (0, 0));
    assert_eq!(progress[1].percent(), 0);
}

#[tokio::test]
async fn leaderboard_orders_by_points_and_joins_counts() {
    let store = Arc::new(
        InMemoryStore::new()
            .with_profiles(vec![
                profile("ana", "Ana", 50),
                profile("bob", "Bob", 200),
                profile("carol", "Carol", 100),
            ])
            .with_posts(vec![
                post("p1", "bob", "one"),
                post("p2", "bob", "two"),
                post("p3", "ana", "three"),
            ])
            .with_progress(vec![(UserId::new("carol"), LessonId::new("l1"))]),
    );
    let svc = LeaderboardService::new(store);

    let entries = svc.top(2).await.expect("leaderboard");

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].profile.display_name(), "Bob");
    assert_eq!(entries[0].post_count, 2);
    assert_eq!(entries[0].progress_count, 0);
    assert_eq!(entries[1].profile.display_name(), "Carol");
    assert_eq!(entries[1].progress_count, 1);
}

#[tokio::test]
async fn community_stats_totals_and_activity_estimate() {
    let store = Arc::new(
        InMemoryStore::new()
            .with_profiles(vec![
                profile("a", "A", 0),
                profile("b", "B", 0),
                profile("c", "C", 0),
                profile("d", "D", 0),
                profile("e", "E", 0),
            ])
            .with_posts(vec![post("p1", "a", "one")])
            .with_progress(vec![
                (UserId::new("a"), LessonId::new("l1")),
                (UserId::new("b"), LessonId::new("l1")),
            ]),
    );
    let svc = LeaderboardService::new(store);

    let stats = svc.community_stats().await.expect("stats");

    assert_eq!(stats.total_members, 5);
    assert_eq!(stats.total_posts, 1);
    assert_eq!(stats.completed_lessons, 2);
    assert_eq!(stats.active_this_week, 3);
}
