    use super::*;
    use std::sync::atomic::Ordering;

    use racketeer_config::{LiveSettings, ThrottlingConfig};
    use racketeer_protocols::ApiError;

    use crate::testing::{FakeGame, character};

    struct Harness {
        game: Arc<FakeGame>,
        settings: Arc<LiveSettings>,
        timers: Arc<TimerService>,
        trainer: Arc<AutoTrainer>,
    }

    fn harness_with_retry(energy: f64, retry_after: Duration) -> Harness {
        let game = Arc::new(FakeGame::new(character(energy, 0.0, 0.0, 0.0)));
        let settings = Arc::new(LiveSettings::default());
        let timers = Arc::new(TimerService::new());
        let cache = CharacterCache::new(game.clone(), ThrottlingConfig::default());
        let trainer = AutoTrainer::new(
            cache,
            game.clone(),
            settings.clone(),
            timers.clone(),
            retry_after,
        );
        Harness {
            game,
            settings,
            timers,
            trainer,
        }
    }

    fn harness(energy: f64) -> Harness {
        harness_with_retry(energy, Duration::from_secs(60))
    }

    fn trained(h: &Harness) -> Vec<TrainingStat> {
        h.game.trained.lock().clone()
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_trains_immediately() {
        let h = harness(50.0);

        assert!(h.trainer.start().await);
        assert_eq!(trained(&h), vec![TrainingStat::Health]);
        assert_eq!(
            h.trainer.last_message().as_deref(),
            Some("Trained health successfully!\nEnergy used: 10\nExp gained: 3")
        );
        assert_eq!(h.timers.usage().intervals, 1);

        let status = h.trainer.status();
        assert_eq!(status.label(), "ACTIVE");
        assert!(status.last_run.is_some());
        assert!(status.next_run.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_twice_is_noop() {
        let h = harness(50.0);
        assert!(h.trainer.start().await);
        assert!(!h.trainer.start().await);
        assert_eq!(trained(&h).len(), 1);
        assert_eq!(h.timers.usage().intervals, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_energy() {
        let h = harness(4.0);

        h.trainer.start().await;
        assert!(trained(&h).is_empty());
        assert_eq!(
            h.trainer.last_message().as_deref(),
            Some("Waiting for energy (4/10)")
        );
        assert_eq!(h.trainer.last_energy(), 4.0);
        assert!(h.trainer.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_trains_every_interval() {
        let h = harness(50.0);
        h.trainer.start().await;

        tokio::time::sleep(Duration::from_millis(60_100)).await;
        assert_eq!(trained(&h).len(), 2);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(trained(&h).len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_retries_sooner() {
        let h = harness_with_retry(50.0, Duration::from_secs(20));
        *h.game.train_result.lock() = Err(ApiError::Rejected("Gym closed".to_string()));

        h.trainer.start().await;
        assert_eq!(
            h.trainer.last_message().as_deref(),
            Some("Training failed: Gym closed")
        );
        assert_eq!(h.timers.usage().intervals, 1);

        *h.game.train_result.lock() = Ok(serde_json::json!({ "exp_gained": 1 }));
        tokio::time::sleep(Duration::from_millis(20_100)).await;
        assert_eq!(trained(&h).len(), 2);

        // Back on the normal interval after the retry succeeded
        tokio::time::sleep(Duration::from_secs(59)).await;
        assert_eq!(trained(&h).len(), 2);
        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(trained(&h).len(), 3);
        assert_eq!(h.timers.usage().intervals, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_edit_applies_after_next_run() {
        let h = harness(50.0);
        h.trainer.start().await;
        h.settings.set_train_interval_minutes(2);

        tokio::time::sleep(Duration::from_millis(60_100)).await;
        assert_eq!(trained(&h).len(), 2);

        tokio::time::sleep(Duration::from_secs(110)).await;
        assert_eq!(trained(&h).len(), 2);

        tokio::time::sleep(Duration::from_millis(10_100)).await;
        assert_eq!(trained(&h).len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_keeps_running() {
        let h = harness(50.0);
        h.game.fail_updates.store(true, Ordering::SeqCst);

        h.trainer.start().await;
        assert!(trained(&h).is_empty());
        assert_eq!(
            h.trainer.last_message().as_deref(),
            Some("Failed to fetch character updates")
        );
        assert!(h.trainer.is_running());
        assert_eq!(h.timers.usage().intervals, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_clears_schedule() {
        let h = harness(50.0);
        h.trainer.start().await;

        assert!(h.trainer.stop());
        assert!(!h.trainer.stop());

        let status = h.trainer.status();
        assert_eq!(status.label(), "INACTIVE");
        assert!(status.next_run.is_none());
        assert_eq!(h.timers.usage().total(), 0);
        assert_eq!(
            h.trainer.last_message().as_deref(),
            Some("Auto-trainer deactivated")
        );

        tokio::time::sleep(Duration::from_secs(180)).await;
        assert_eq!(trained(&h).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_train_refuses_low_energy() {
        let h = harness(4.0);

        let err = h.trainer.manual_train(None).await.unwrap_err();
        assert_eq!(
            err,
            AutomationError::NotEnoughEnergy {
                current: "4".to_string(),
                required: 10
            }
        );
        assert!(trained(&h).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_train_uses_explicit_stat() {
        let h = harness(50.0);

        h.trainer.manual_train(Some(TrainingStat::Speed)).await.unwrap();
        assert_eq!(trained(&h), vec![TrainingStat::Speed]);
        assert!(h.trainer.last_message().unwrap().starts_with("Trained speed"));
        // Not running, so the schedule is untouched
        assert!(h.trainer.status().last_run.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_train_moves_schedule_when_running() {
        let h = harness(4.0);
        h.trainer.start().await;
        assert!(h.trainer.status().last_run.is_none());

        h.game.set_state(character(50.0, 0.0, 0.0, 0.0));
        tokio::time::sleep(Duration::from_secs(3)).await;

        h.trainer.manual_train(None).await.unwrap();
        let status = h.trainer.status();
        assert!(status.last_run.is_some());
        assert!(status.next_run.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_train_reports_api_failure() {
        let h = harness(50.0);
        *h.game.train_result.lock() = Err(ApiError::Network("reset".to_string()));

        let err = h.trainer.manual_train(None).await.unwrap_err();
        assert_eq!(err.to_string(), "Training failed: Network error: reset");
    }
