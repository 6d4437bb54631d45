use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::Router;
use configs::AppConfig;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

use server::startup;

struct TestApp {
    base_url: String,
    data_file: PathBuf,
}

fn config_for(data_file: &Path) -> AppConfig {
    let mut cfg = AppConfig::default();
    cfg.storage.data_file = data_file.to_string_lossy().into_owned();
    cfg
}

async fn start_server(data_file: &Path) -> anyhow::Result<TestApp> {
    let app: Router = startup::build_app(&config_for(data_file)).await?;
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url, data_file: data_file.to_path_buf() })
}

fn fresh_data_file() -> PathBuf {
    // absolute, so it is not anchored at the test binary's directory
    std::env::temp_dir()
        .join(format!("e2e-{}", Uuid::new_v4()))
        .join("data.db")
}

async fn cleanup(app: &TestApp) {
    if let Some(dir) = app.data_file.parent() {
        let _ = tokio::fs::remove_dir_all(dir).await;
    }
}

#[tokio::test]
async fn e2e_create_list_and_restart_round_trip() -> anyhow::Result<()> {
    let data_file = fresh_data_file();
    let app = start_server(&data_file).await?;
    let c = reqwest::Client::new();

    // empty-state startup
    let res = c.get(format!("{}/api/data", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!([]));

    let res = c.post(format!("{}/api/data", app.base_url))
        .json(&json!({"name": "widget", "tags": ["a", "b"], "nested": {"x": 1}}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<Value>().await?;
    assert_eq!(created["id"], 1);

    let listed = c.get(format!("{}/api/data", app.base_url)).send().await?.json::<Value>().await?;
    assert_eq!(listed, json!([created.clone()]));

    // the file mirrors the collection
    let on_disk: Value = serde_json::from_slice(&tokio::fs::read(&app.data_file).await?)?;
    assert_eq!(on_disk, listed);

    // a second instance over the same file sees the same collection
    let restarted = start_server(&data_file).await?;
    let relisted = c.get(format!("{}/api/data", restarted.base_url)).send().await?.json::<Value>().await?;
    assert_eq!(relisted, listed);

    let res = c.post(format!("{}/api/data", restarted.base_url)).json(&json!({})).send().await?;
    assert_eq!(res.json::<Value>().await?["id"], 2);

    cleanup(&app).await;
    Ok(())
}

#[tokio::test]
async fn e2e_counter_continues_after_highest_persisted_id() -> anyhow::Result<()> {
    let data_file = fresh_data_file();
    tokio::fs::create_dir_all(data_file.parent().unwrap()).await?;
    tokio::fs::write(&data_file, r#"[{"id": 4, "a": 1}, {"id": 9, "b": 2}]"#).await?;

    let app = start_server(&data_file).await?;
    let c = reqwest::Client::new();
    let res = c.post(format!("{}/api/data", app.base_url))
        .json(&json!({"c": 3, "id": 1}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    assert_eq!(res.json::<Value>().await?, json!({"c": 3, "id": 10}));

    cleanup(&app).await;
    Ok(())
}

#[tokio::test]
async fn e2e_update_and_delete_contract() -> anyhow::Result<()> {
    let data_file = fresh_data_file();
    let app = start_server(&data_file).await?;
    let c = reqwest::Client::new();

    c.post(format!("{}/api/data", app.base_url)).json(&json!({"a": 1, "b": 2})).send().await?;
    c.post(format!("{}/api/data", app.base_url)).json(&json!({"keep": true})).send().await?;

    let res = c.put(format!("{}/api/data/1", app.base_url)).json(&json!({"b": 3, "c": 4})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"id": 1, "a": 1, "b": 3, "c": 4}));

    let res = c.put(format!("{}/api/data/77", app.base_url)).json(&json!({"b": 0})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?, json!({"error": "Entry not found"}));

    let res = c.delete(format!("{}/api/data/77", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"message": "Entry deleted"}));

    let res = c.delete(format!("{}/api/data/1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let expected = json!([{"keep": true, "id": 2}]);
    let listed = c.get(format!("{}/api/data", app.base_url)).send().await?.json::<Value>().await?;
    assert_eq!(listed, expected);
    let on_disk: Value = serde_json::from_slice(&tokio::fs::read(&app.data_file).await?)?;
    assert_eq!(on_disk, expected);

    cleanup(&app).await;
    Ok(())
}

#[tokio::test]
async fn e2e_malformed_body_is_client_error() -> anyhow::Result<()> {
    let data_file = fresh_data_file();
    let app = start_server(&data_file).await?;
    let c = reqwest::Client::new();

    let res = c.post(format!("{}/api/data", app.base_url))
        .header("content-type", "application/json")
        .body("not json")
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert!(res.json::<Value>().await?["error"].is_string());

    // server is still up and nothing was stored
    let listed = c.get(format!("{}/api/data", app.base_url)).send().await?.json::<Value>().await?;
    assert_eq!(listed, json!([]));

    cleanup(&app).await;
    Ok(())
}

#[tokio::test]
async fn e2e_cors_headers_present() -> anyhow::Result<()> {
    let data_file = fresh_data_file();
    let app = start_server(&data_file).await?;
    let res = reqwest::Client::new()
        .get(format!("{}/api/data", app.base_url))
        .header("Origin", "http://frontend.local")
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(res.headers().get("access-control-allow-origin").is_some());

    cleanup(&app).await;
    Ok(())
}
