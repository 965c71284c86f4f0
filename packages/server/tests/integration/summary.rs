use serde_json::json;
use server::store::DatasetStore;

use crate::common::{CSV_HEADER, TestApp, pump_csv, routes};

#[tokio::test]
async fn pump_valve_summary() {
    let app = TestApp::spawn().await;
    let csv = format!("{CSV_HEADER}P-1,Pump,10,1,100\nV-1,Valve,20,2,200\nP-2,Pump,30,3,300\n");
    let id = app.upload_ok("plant.csv", &csv).await;

    let res = app.get(&routes::summary(id)).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["id"], id);
    assert_eq!(res.body["file_name"], "plant.csv");
    assert_eq!(res.body["total_count"], 3);
    assert_eq!(
        res.body["averages"],
        json!({"flowrate": 20.0, "pressure": 2.0, "temperature": 200.0})
    );
    assert_eq!(res.body["type_distribution"], json!({"Pump": 2, "Valve": 1}));

    let names: Vec<&str> = res.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["P-1", "V-1", "P-2"]);
}

#[tokio::test]
async fn summary_without_id_uses_latest_dataset() {
    let app = TestApp::spawn().await;
    app.upload_ok("first.csv", &pump_csv(1)).await;
    let latest = app.upload_ok("second.csv", &pump_csv(2)).await;

    let res = app.get(routes::SUMMARY).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["id"], latest);
    assert_eq!(res.body["file_name"], "second.csv");
}

#[tokio::test]
async fn summary_of_empty_store_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::SUMMARY).await;

    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn unknown_dataset_is_not_found() {
    let app = TestApp::spawn().await;

    for path in [
        routes::summary(4242),
        routes::items(4242),
        routes::pdf(4242),
    ] {
        let res = app.get(&path).await;
        assert_eq!(res.status, 404, "{path}");
        assert_eq!(res.body["code"], "NOT_FOUND", "{path}");
    }

    let res = app.delete(&routes::dataset(4242)).await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn items_are_paged_in_row_order() {
    let app = TestApp::spawn().await;
    let id = app.upload_ok("big.csv", &pump_csv(12)).await;

    let res = app
        .get(&format!("{}?offset=10&limit=5", routes::items(id)))
        .await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["dataset_id"], id);
    assert_eq!(res.body["total"], 12);
    assert_eq!(res.body["offset"], 10);
    let names: Vec<&str> = res.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["E-10", "E-11"]);
}

#[tokio::test]
async fn deleted_dataset_is_gone() {
    let app = TestApp::spawn().await;
    let id = app.upload_ok("a.csv", &pump_csv(3)).await;

    let res = app.delete(&routes::dataset(id)).await;
    assert_eq!(res.status, 204);

    assert_eq!(app.get(&routes::summary(id)).await.status, 404);
    assert_eq!(app.get(&routes::items(id)).await.status, 404);
    assert!(app.store.list_items(id, 0, None).await.unwrap().is_empty());
}
