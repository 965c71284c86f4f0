use std::sync::Arc;

use server::store::{DatasetStore, MemoryDatasetStore};

use crate::common::{TestApp, pump_csv, routes, test_config};

fn ids(body: &serde_json::Value) -> Vec<i64> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|d| d["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn sixth_upload_evicts_the_oldest() {
    let app = TestApp::spawn().await;

    let mut uploaded = Vec::new();
    for i in 0..5 {
        uploaded.push(app.upload_ok(&format!("{i}.csv"), &pump_csv(2)).await);
    }
    let res = app.upload("5.csv", &pump_csv(2)).await;
    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["retention"]["evicted_ids"], serde_json::json!([uploaded[0]]));
    uploaded.push(res.id());

    let history = app.get(routes::HISTORY).await;
    assert_eq!(history.status, 200);
    let expected: Vec<i64> = uploaded[1..].iter().rev().map(|&id| i64::from(id)).collect();
    assert_eq!(ids(&history.body), expected);

    assert_eq!(app.get(&routes::summary(uploaded[0])).await.status, 404);
    assert!(
        app.store
            .list_items(uploaded[0], 0, None)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn history_limit_is_clamped() {
    let app = TestApp::spawn().await;
    for i in 0..3 {
        app.upload_ok(&format!("{i}.csv"), &pump_csv(1)).await;
    }

    let res = app.get(&format!("{}?limit=2", routes::HISTORY)).await;
    assert_eq!(ids(&res.body).len(), 2);
    assert_eq!(res.body[0]["file_name"], "2.csv");

    let res = app.get(&format!("{}?limit=0", routes::HISTORY)).await;
    assert_eq!(ids(&res.body).len(), 1);

    let res = app.get(&format!("{}?limit=1000", routes::HISTORY)).await;
    assert_eq!(ids(&res.body).len(), 3);
}

#[tokio::test]
async fn retention_limit_is_configurable() {
    let mut config = test_config();
    config.retention.limit = 2;
    let app = TestApp::spawn_with(config, Arc::new(MemoryDatasetStore::new())).await;

    for i in 0..4 {
        app.upload_ok(&format!("{i}.csv"), &pump_csv(1)).await;
    }

    let res = app.get(routes::HISTORY).await;
    let names: Vec<&str> = res
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["file_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["3.csv", "2.csv"]);
}
