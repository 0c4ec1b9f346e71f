//! HTTP front door for the itinerary engine. A `#[tokio::main]` that loads
//! its dataset once, wraps it in an `Arc`, wires up `warp` routes and a
//! request log filter, and serves on a configured port.

use std::sync::Arc;

use warp::Filter;

mod config;
mod error;
mod logging;
mod routes;
mod state;

use config::Config;
use state::AppState;

/// Process exit code for a startup data-load failure. `0` is success.
const EXIT_DATA_LOAD_ERROR: i32 = 2;

#[tokio::main]
async fn main() {
    logging::init();

    let config = Config::from_env();
    let port = config.port;
    let schedule_bytes = match std::fs::read(&config.schedule_path) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!(path = %config.schedule_path, %err, "failed to read schedule file");
            std::process::exit(EXIT_DATA_LOAD_ERROR);
        }
    };
    let snapshot =
        match itinerary_engine::Snapshot::build(&schedule_bytes, config.transfer_policy) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                tracing::error!(%err, "schedule file failed to load");
                std::process::exit(EXIT_DATA_LOAD_ERROR);
            }
        };

    tracing::info!(port, schedule_path = %config.schedule_path, "starting server");

    let state = Arc::new(AppState::new(snapshot, config));
    let log = warp::log("itinerary_server");
    let routes = routes::all(state).recover(error::recover).with(log);

    warp::serve(routes).run(([0, 0, 0, 0], port)).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{"train": [
        {"id": "T1", "is_fast": true, "stops": [
            {"station": "Alpha", "time": "08:00"},
            {"station": "Beta", "time": "08:30"}
        ]},
        {"id": "T2", "is_fast": false, "stops": [
            {"station": "Beta", "time": "08:40"},
            {"station": "Gamma", "time": "09:10"}
        ]}
    ]}"#;

    fn test_state() -> Arc<AppState> {
        let snapshot =
            itinerary_engine::Snapshot::build(SAMPLE.as_bytes(), Default::default()).unwrap();
        let config = Config {
            port: 0,
            schedule_path: "unused".to_owned(),
            transfer_policy: Default::default(),
            request_timeout_secs: 5,
        };
        Arc::new(AppState::new(snapshot, config))
    }

    fn app(
    ) -> impl warp::Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone
    {
        routes::all(test_state()).recover(error::recover)
    }

    #[tokio::test]
    async fn health_reports_loaded_graph_stats() {
        let response = warp::test::request().path("/health").reply(&app()).await;
        assert_eq!(response.status(), 200);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["data_loaded"]["graph"], true);
        assert_eq!(body["data_loaded"]["stations_list"], true);
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn stations_lists_every_station_sorted() {
        let response = warp::test::request().path("/stations").reply(&app()).await;
        assert_eq!(response.status(), 200);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["stations"], serde_json::json!(["Alpha", "Beta", "Gamma"]));
        assert_eq!(body["count"], 3);
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn path_finds_a_one_transfer_itinerary() {
        let response = warp::test::request()
            .method("POST")
            .path("/path")
            .json(&serde_json::json!({
                "start_station": "Alpha",
                "end_station": "Gamma",
            }))
            .reply(&app())
            .await;
        assert_eq!(response.status(), 200);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["start_station"], "Alpha");
        assert_eq!(body["end_station"], "Gamma");
        let paths = body["paths"].as_array().unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0]["type"], "Transfer");
        assert_eq!(paths[0]["total_minutes"], 70);
        assert_eq!(paths[0]["transfer_details"].as_array().unwrap().len(), 1);
        assert_eq!(paths[0]["transfer_options"].as_array().unwrap().len(), 1);
        assert_eq!(paths[0]["transfer_options"][0]["step"], 1);
        assert_eq!(body["summary"]["total_paths"], 1);
        assert_eq!(body["summary"]["merged_paths"], 1);
        assert_eq!(body["metadata"]["max_transfers"], 2);
        assert!(body["metadata"]["generated_at"].is_string());
    }

    #[tokio::test]
    async fn path_rejects_unknown_station_with_404() {
        let response = warp::test::request()
            .method("POST")
            .path("/path")
            .json(&serde_json::json!({
                "start_station": "Alpha",
                "end_station": "Nowhere",
            }))
            .reply(&app())
            .await;
        assert_eq!(response.status(), 404);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["error"], "unknown_station");
    }

    #[tokio::test]
    async fn path_rejects_empty_station_with_400() {
        let response = warp::test::request()
            .method("POST")
            .path("/path")
            .json(&serde_json::json!({
                "start_station": "",
                "end_station": "Gamma",
            }))
            .reply(&app())
            .await;
        assert_eq!(response.status(), 400);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["error"], "bad_request");
    }

    #[tokio::test]
    async fn admin_reload_rereads_the_configured_schedule_file() {
        let dir = std::env::temp_dir().join(format!(
            "itinerary-server-test-{:?}",
            std::thread::current().id()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("schedule.json");
        std::fs::write(&path, SAMPLE).unwrap();

        let snapshot =
            itinerary_engine::Snapshot::build(SAMPLE.as_bytes(), Default::default()).unwrap();
        let config = Config {
            port: 0,
            schedule_path: path.to_string_lossy().into_owned(),
            transfer_policy: Default::default(),
            request_timeout_secs: 5,
        };
        let state = Arc::new(AppState::new(snapshot, config));
        let routes = routes::all(state).recover(error::recover);

        let response = warp::test::request()
            .method("POST")
            .path("/admin/reload")
            .reply(&routes)
            .await;
        assert_eq!(response.status(), 200);
    }
}
