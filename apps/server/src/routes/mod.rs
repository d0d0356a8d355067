pub mod config;
pub mod health;
pub mod logs;
pub mod results;
pub mod status;

use actix_web::web::ServiceConfig;

pub fn routes(cfg: &mut ServiceConfig) {
    health::routes(cfg);
    status::routes(cfg);
    results::routes(cfg);
    logs::routes(cfg);
    config::routes(cfg);
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test, web};
    use pingdeck::monitoring::DEFAULT_PROBE_TIMEOUT_SECONDS;
    use pingdeck::store::DEFAULT_RETENTION;
    use pingdeck::{Control, HttpChecker, JsonFileStore, Scheduler};

    use crate::state::AppState;

    async fn state(dir: &tempfile::TempDir) -> web::Data<AppState> {
        let store = Arc::new(
            JsonFileStore::load(dir.path().join("results.json"), DEFAULT_RETENTION).await,
        );
        let checker = Arc::new(HttpChecker::new(DEFAULT_PROBE_TIMEOUT_SECONDS).expect("client"));
        let scheduler = Arc::new(Scheduler::new(checker, store.clone()));
        let control = Control::new(dir.path().join("config.toml"), scheduler, store);
        web::Data::new(AppState { control, event_log: dir.path().join("events.log") })
    }

    #[actix_web::test]
    async fn status_reports_not_running_with_default_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app =
            test::init_service(App::new().app_data(state(&dir).await).configure(super::routes))
                .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/status").to_request(),
        )
        .await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["running"], false);
        assert!(body["config"]["urls"].is_array());
    }

    #[actix_web::test]
    async fn duplicate_add_maps_to_conflict() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app =
            test::init_service(App::new().app_data(state(&dir).await).configure(super::routes))
                .await;

        let add = || {
            test::TestRequest::post()
                .uri("/api/add_url")
                .set_json(serde_json::json!({"url": "https://a.example", "interval": 60}))
                .to_request()
        };

        let resp = test::call_service(&app, add()).await;
        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["new_url_index"], 1, "appended after the default entry");

        let resp = test::call_service(&app, add()).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::CONFLICT);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "URL_ALREADY_EXISTS");
    }

    #[actix_web::test]
    async fn empty_url_maps_to_bad_request() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app =
            test::init_service(App::new().app_data(state(&dir).await).configure(super::routes))
                .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/add_url")
                .set_json(serde_json::json!({"url": ""}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "EMPTY_URL");
    }

    #[actix_web::test]
    async fn logs_endpoint_is_empty_before_any_events() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app =
            test::init_service(App::new().app_data(state(&dir).await).configure(super::routes))
                .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::get().uri("/api/logs").to_request(),
        )
        .await;
        assert!(resp.status().is_success());
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["logs"], serde_json::json!([]));
    }

    #[actix_web::test]
    async fn remove_unknown_url_maps_to_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app =
            test::init_service(App::new().app_data(state(&dir).await).configure(super::routes))
                .await;

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/remove_url")
                .set_json(serde_json::json!({"url": "https://missing.example"}))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::NOT_FOUND);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "URL_NOT_FOUND");
    }
}
