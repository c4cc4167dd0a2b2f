mod common;

use std::sync::Arc;

use batchmaster_core::{
    storage::{keys, MemoryStore},
    CookingSession, KeyValueStore, SessionBuilder, SessionEvent,
};
use common::{CountingProvider, TestEnv};

#[tokio::test]
async fn test_fresh_activation() {
    let env = TestEnv::new();
    let session = env.session().await;

    session.activate_plan("P1").await.expect("activate");

    assert_eq!(session.get_all_phases().len(), 2);
    assert_eq!(session.current_phase_id().as_deref(), Some("1"));
    assert_eq!(session.calculate_progress(), 0);
    assert_eq!(session.get_current_phase_tasks().len(), 2);
    assert!(!session.is_loading());
    assert!(session.error().is_none());
}

#[tokio::test]
async fn test_full_completion_reaches_100() {
    let env = TestEnv::new();
    let session = env.session().await;
    session.activate_plan("P1").await.expect("activate");

    for id in ["1/0/0", "1/0/1"] {
        session.complete_task(id).await;
    }
    assert!(session.calculate_progress() < 100);

    session.complete_task("2/0/0").await;
    assert_eq!(session.calculate_progress(), 100);
}

#[tokio::test]
async fn test_complete_and_uncomplete_are_idempotent() {
    let env = TestEnv::new();
    let session = env.session().await;
    session.activate_plan("P1").await.expect("activate");

    assert!(session.complete_task("1/0/0").await);
    let once = session.completed_task_ids();
    assert!(!session.complete_task("1/0/0").await);
    assert_eq!(session.completed_task_ids(), once);

    assert!(session.uncomplete_task("1/0/0").await);
    let removed = session.completed_task_ids();
    assert!(!session.uncomplete_task("1/0/0").await);
    assert_eq!(session.completed_task_ids(), removed);
    assert!(removed.is_empty());
}

#[tokio::test]
async fn test_progress_is_monotonic() {
    let env = TestEnv::new();
    let session = env.session().await;
    session.activate_plan("P1").await.expect("activate");

    let ids: Vec<String> = session
        .get_all_phases()
        .iter()
        .flat_map(|phase| phase.tasks())
        .map(|task| task.id.into_string())
        .collect();
    assert_eq!(ids.len(), 3);

    let mut last = session.calculate_progress();
    assert_eq!(last, 0);
    for id in &ids {
        session.complete_task(id).await;
        let now = session.calculate_progress();
        assert!(now >= last && now <= 100);
        last = now;
    }
    assert_eq!(last, 100);

    for id in &ids {
        session.uncomplete_task(id).await;
        let now = session.calculate_progress();
        assert!(now <= last);
        last = now;
    }
    assert_eq!(last, 0);
}

#[tokio::test]
async fn test_progress_round_trip_through_sqlite() {
    let env = TestEnv::new();
    let (running, paused, before_running, before_paused) = {
        let session = env.session().await;
        session.activate_plan("P1").await.expect("activate");
        session.complete_task("1/0/1").await;
        session.set_phase("2").await;

        let running = session.start_timer("Boil water", 600, None).await;
        let paused = session.start_timer("Rest dough", 300, Some("recipe_1")).await;
        env.clock.advance_secs(60);
        session.pause_timer(&paused).await;

        (
            running.clone(),
            paused.clone(),
            session.get_timer_remaining_seconds(&running),
            session.get_timer_remaining_seconds(&paused),
        )
    };

    let restored = env.session().await;

    assert_eq!(restored.active_plan_id().as_deref(), Some("P1"));
    assert_eq!(restored.current_phase_id().as_deref(), Some("2"));
    assert!(restored.is_task_completed("1/0/1"));
    assert_eq!(restored.timers().len(), 2);
    assert_eq!(restored.get_timer_remaining_seconds(&running), before_running);
    assert_eq!(restored.get_timer_remaining_seconds(&paused), before_paused);
    assert_eq!(before_running, 540);
    assert_eq!(before_paused, 240);

    // Plan data comes back too, without resetting progress
    assert!(restored.plan_data().is_some());
    assert_eq!(restored.calculate_progress(), 33);

    // A paused timer stays frozen across restarts while time passes
    env.clock.advance_secs(100);
    assert_eq!(restored.get_timer_remaining_seconds(&paused), 240);
    assert_eq!(restored.get_timer_remaining_seconds(&running), 440);
}

#[tokio::test]
async fn test_timer_lifecycle() {
    let env = TestEnv::new();
    let session = env.session().await;

    let id = session.start_timer("Boil water", 600, None).await;
    assert_eq!(session.get_timer_remaining_seconds(&id), 600);

    env.clock.advance_secs(60);
    assert_eq!(session.get_timer_remaining_seconds(&id), 540);

    assert!(session.pause_timer(&id).await);
    env.clock.advance_secs(30);
    assert_eq!(session.get_timer_remaining_seconds(&id), 540);

    assert!(session.resume_timer(&id).await);
    assert_eq!(session.get_timer_remaining_seconds(&id), 540);

    assert!(session.cancel_timer(&id).await);
    assert!(session.timers().iter().all(|timer| timer.id != id));
    assert_eq!(session.get_timer_remaining_seconds(&id), 0);
}

#[tokio::test]
async fn test_pause_resume_without_elapsed_time_is_lossless() {
    let env = TestEnv::new();
    let session = env.session().await;
    let id = session.start_timer("Simmer sauce", 1_234, None).await;
    env.clock.advance_secs(17);

    let before = session.get_timer_remaining_seconds(&id);
    session.pause_timer(&id).await;
    session.resume_timer(&id).await;

    assert_eq!(session.get_timer_remaining_seconds(&id), before);
}

#[tokio::test]
async fn test_add_time_to_running_and_paused_timers() {
    let env = TestEnv::new();
    let session = env.session().await;
    let running = session.start_timer("Roast", 60, None).await;
    let paused = session.start_timer("Chill", 60, None).await;
    session.pause_timer(&paused).await;

    assert!(session.add_time_to_timer(&running, 30).await);
    assert!(session.add_time_to_timer(&paused, 30).await);
    assert!(!session.add_time_to_timer("timer_missing", 30).await);

    assert_eq!(session.get_timer_remaining_seconds(&running), 90);
    assert_eq!(session.get_timer_remaining_seconds(&paused), 90);
}

#[tokio::test]
async fn test_unknown_timer_operations_are_noops() {
    let env = TestEnv::new();
    let session = env.session().await;
    let id = session.start_timer("Boil water", 600, None).await;

    assert!(!session.pause_timer("nope").await);
    assert!(!session.resume_timer(&id).await);
    assert!(!session.cancel_timer("nope").await);
    assert_eq!(session.timers().len(), 1);
}

#[tokio::test]
async fn test_activation_resets_session() {
    let env = TestEnv::new();
    let session = env.session().await;
    session.activate_plan("P1").await.expect("activate P1");
    session.complete_task("1/0/0").await;
    session.start_timer("Boil water", 600, None).await;

    session.activate_plan("P2").await.expect("activate P2");

    assert!(session.completed_task_ids().is_empty());
    assert!(session.timers().is_empty());
    assert_eq!(session.current_phase_id().as_deref(), Some("A"));
    assert_eq!(session.active_plan_id().as_deref(), Some("P2"));
}

#[tokio::test]
async fn test_numeric_ids_fetch_by_week() {
    let env = TestEnv::new();
    let session = env.session().await;

    session.activate_plan("1").await.expect("activate week 1");

    assert_eq!(session.active_plan_id().as_deref(), Some("1"));
    assert_eq!(session.get_all_phases().len(), 2);
}

#[tokio::test]
async fn test_deactivation_clears_storage() {
    let env = TestEnv::new();
    {
        let session = env.session().await;
        session.activate_plan("P1").await.expect("activate");
        session.complete_task("1/0/0").await;
        session.start_timer("Boil water", 600, None).await;
        session.clear_active_plan().await.expect("clear");

        assert_eq!(session.active_plan_id(), None);
        assert!(session.plan_data().is_none());
        assert!(session.is_initialized());
    }

    let restarted = env.session().await;
    assert_eq!(restarted.active_plan_id(), None);
    assert!(restarted.completed_task_ids().is_empty());
    assert!(restarted.timers().is_empty());
    assert_eq!(restarted.current_phase_id(), None);

    let store = env.store().await;
    for key in keys::SESSION_KEYS {
        assert_eq!(store.get(key).await.expect("read"), None);
    }
}

#[tokio::test]
async fn test_clear_without_saved_state_succeeds() {
    let env = TestEnv::new();
    let session = env.session().await;
    session.clear_active_plan().await.expect("clear on empty storage");
}

#[tokio::test]
async fn test_events_for_activation_and_clear() {
    let env = TestEnv::new();
    let session = env.session().await;
    let mut events = session.subscribe();

    session.activate_plan("P1").await.expect("activate");
    session.clear_active_plan().await.expect("clear");

    assert_eq!(
        events.recv().await.expect("event"),
        SessionEvent::PlanActivated {
            plan_id: "P1".to_string()
        }
    );
    assert_eq!(events.recv().await.expect("event"), SessionEvent::PlanCleared);
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let provider = Arc::new(CountingProvider::new());
    let build = |store: MemoryStore| {
        SessionBuilder::new()
            .with_store(Arc::new(store))
            .with_provider(provider.clone())
            .build()
    };
    let first: CookingSession = build(MemoryStore::new()).await.expect("first");
    let second: CookingSession = build(MemoryStore::new()).await.expect("second");

    first.activate_plan("P1").await.expect("activate");

    assert_eq!(second.active_plan_id(), None);
}

#[tokio::test]
async fn test_restored_plan_without_phase_picks_first() {
    let store = MemoryStore::new();
    store.set(keys::ACTIVE_PLAN, "P2").await.expect("seed");

    let session = SessionBuilder::new()
        .with_store(Arc::new(store.clone()))
        .with_provider(Arc::new(CountingProvider::new()))
        .build()
        .await
        .expect("session");

    assert_eq!(session.current_phase_id().as_deref(), Some("A"));
    assert_eq!(store.snapshot(keys::CURRENT_PHASE).as_deref(), Some("A"));
}
