    use super::*;
    use wiremock::{Mock, MockServer, ResponseTemplate, matchers};

    async fn gateway_for(server: &MockServer) -> ApiGateway {
        ApiGateway::with_url(server.uri(), "test-token")
    }

    #[test]
    fn test_strips_bearer_prefix_and_trailing_slash() {
        let gateway = ApiGateway::with_url("http://localhost/api/", "Bearer abc");
        assert_eq!(gateway.base_url(), "http://localhost/api");
        assert_eq!(gateway.auth_token, "abc");
    }

    #[tokio::test]
    async fn test_character_updates_success() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/character-updates"))
            .and(matchers::header("Authorization", "Bearer test-token"))
            .and(matchers::header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resources": { "energy": { "current": "42" } },
                "jail": { "isInJail": false }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let state = gateway.character_updates().await.unwrap();
        assert_eq!(state.energy(), Some(42.0));
        assert!(!state.in_jail());
    }

    #[tokio::test]
    async fn test_train_posts_stat() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::path("/fight-club/train"))
            .and(matchers::body_json(json!({ "stat": "strength" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "energy_cost": 10, "exp_gained": 4 })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let outcome = gateway.train(TrainingStat::Strength).await.unwrap();
        assert_eq!(outcome.energy_cost, Some(json!(10)));
        assert_eq!(outcome.exp_gained, Some(json!(4)));
    }

    #[tokio::test]
    async fn test_perform_hits_action_endpoint() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::path("/heists/3/start"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "reward": 500,
                "exp_gained": 12,
                "cooldown_remaining": 30
            })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let outcome = gateway.perform(ActionKind::Heist, 3).await.unwrap();
        assert_eq!(outcome.cooldown_remaining, Some(30));
        assert_eq!(outcome.reward, Some(json!(500)));
    }

    #[tokio::test]
    async fn test_status_error_sentinel_is_rejected() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("POST"))
            .and(matchers::path("/crimes/2/commit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "error",
                "message": "Not enough nerve"
            })))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let err = gateway.perform(ActionKind::Crime, 2).await.unwrap_err();
        assert_eq!(err, ApiError::Rejected("Not enough nerve".to_string()));
    }

    #[tokio::test]
    async fn test_non_success_uses_server_message() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/character-updates"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid token" })),
            )
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let err = gateway.character_updates().await.unwrap_err();
        assert_eq!(
            err,
            ApiError::Status {
                status: 401,
                message: "Invalid token".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_non_success_plain_text_body() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/character-updates"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let err = gateway.character_updates().await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 503, ref message } if message == "maintenance"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/character-updates"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let err = gateway.character_updates().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        // Nothing listens on port 9 in the test environment
        let gateway = ApiGateway::with_url("http://127.0.0.1:9", "t");
        let err = gateway.character_updates().await.unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[tokio::test]
    async fn test_get_never_sends_body() {
        let server = MockServer::start().await;

        Mock::given(matchers::method("GET"))
            .and(matchers::path("/ping"))
            .and(matchers::body_string(""))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = gateway_for(&server).await;
        let body = json!({ "ignored": true });
        let value = gateway.call("/ping", Method::GET, Some(&body)).await.unwrap();
        assert_eq!(value, json!({ "ok": true }));
    }
