use std::time::Duration;

use game_client::{Client, ClientConfig, RoundSummary};
use game_store::{Field, GameMode, StoreConfig, StoreRegistry};

fn fast_config() -> ClientConfig {
    ClientConfig::default()
        .with_tick_interval(Duration::from_millis(10))
        .with_difficulty("hard")
}

#[tokio::test(start_paused = true)]
async fn round_ends_finished_with_countdown_at_zero() {
    let registry = StoreRegistry::new(StoreConfig::default());
    let client = Client::builder()
        .config(fast_config())
        .registry(registry.clone())
        .build()
        .unwrap();

    let summary = client.run().await.unwrap();
    assert_eq!(
        summary,
        RoundSummary {
            difficulty: "hard".to_string(),
            points: 59,
            ticks: 59,
            // difficulty + playing + 59 * (tick + point) + finished
            changes_observed: 121,
        }
    );

    let store = registry.default_store();
    assert_eq!(store.time_count(), 0);
    assert_eq!(store.game_mode(), Some(GameMode::Finished));
}

#[tokio::test(start_paused = true)]
async fn round_resets_a_store_left_over_from_a_previous_round() {
    let registry = StoreRegistry::default();
    let store = registry.store("arcade");
    store.set_points(500);
    store.set_time_count(3);

    let client = Client::builder()
        .config(fast_config().with_store_name("arcade"))
        .registry(registry.clone())
        .build()
        .unwrap();
    let summary = client.run().await.unwrap();

    assert_eq!(summary.points, 59);
    // reset() publishes the restored points and countdown before the
    // observer subscribes, so only the round's own writes are counted.
    assert_eq!(summary.changes_observed, 121);
    assert!(registry.get("arcade").unwrap().ptr_eq(&store));
    assert!(registry.get("game-store").is_none());
}

#[tokio::test(start_paused = true)]
async fn screens_observe_the_round_through_their_own_handle() {
    let registry = StoreRegistry::default();
    let mut mode_changes = registry.default_store().subscribe(Field::Mode);

    let client = Client::builder()
        .config(fast_config())
        .registry(registry.clone())
        .build()
        .unwrap();
    client.run().await.unwrap();

    let mut modes = Vec::new();
    while let Ok(change) = mode_changes.try_recv() {
        modes.push(change.value.as_text().unwrap().to_string());
    }
    // reset() leaves an unchanged mode alone, so only two writes are seen.
    assert_eq!(modes, ["playing", "finished"]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn observer_count_includes_final_mode_change() {
    for _ in 0..10 {
        let registry = StoreRegistry::default();
        let mut modes = registry.default_store().subscribe(Field::Mode);
        let client = Client::builder()
            .config(fast_config().with_tick_interval(Duration::from_millis(1)))
            .registry(registry)
            .build()
            .unwrap();

        let summary = client.run().await.unwrap();
        assert_eq!(summary.changes_observed, 121);

        let mut last_mode = None;
        while let Ok(change) = modes.try_recv() {
            last_mode = Some(change.value);
        }
        assert_eq!(last_mode.as_ref().and_then(|v| v.as_text()), Some("finished"));
    }
}
