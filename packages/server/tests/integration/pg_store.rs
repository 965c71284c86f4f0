//! Store behavior against PostgreSQL in the shared test container.

use std::sync::Arc;
use std::time::Duration;

use common::{RawTable, validate};
use sea_orm::{ConnectionTrait, DbBackend, Statement};
use server::store::{DatasetStore, NewDataset};

use crate::common::{TestApp, postgres_store, pump_csv, routes};

fn dataset(file_name: &str, rows: usize) -> NewDataset {
    let rows = validate(&RawTable::from_csv(pump_csv(rows).as_bytes()).unwrap()).unwrap();
    NewDataset::new(file_name, rows)
}

#[tokio::test]
async fn create_persists_header_and_items_in_order() {
    let store = postgres_store().await;

    let header = store.create(dataset("a.csv", 25)).await.unwrap().dataset;

    assert_eq!(header.total_count, 25);
    assert_eq!(header.avg_pressure, Some(2.5));
    assert_eq!(store.count_items(header.id).await.unwrap(), 25);
    let page = store.list_items(header.id, 20, Some(10)).await.unwrap();
    let positions: Vec<i32> = page.iter().map(|i| i.position).collect();
    assert_eq!(positions, [20, 21, 22, 23, 24]);
    assert_eq!(page[0].name, "E-20");
}

#[tokio::test]
async fn history_and_victims_follow_upload_order() {
    let store = postgres_store().await;

    let mut ids = Vec::new();
    for i in 0..4 {
        ids.push(store.create(dataset(&format!("{i}.csv"), 1)).await.unwrap().dataset.id);
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let recent: Vec<i32> = store.list_recent(2).await.unwrap().iter().map(|d| d.id).collect();
    assert_eq!(recent, [ids[3], ids[2]]);
    assert_eq!(store.latest().await.unwrap().map(|d| d.id), Some(ids[3]));

    let mut victims = store.ids_beyond(2).await.unwrap();
    victims.sort();
    assert_eq!(victims, [ids[0], ids[1]]);
}

#[tokio::test]
async fn equal_upload_times_order_by_id() {
    let store = postgres_store().await;

    let mut ids = Vec::new();
    for i in 0..3 {
        ids.push(store.create(dataset(&format!("{i}.csv"), 1)).await.unwrap().dataset.id);
    }
    store
        .connection()
        .execute_raw(Statement::from_string(
            DbBackend::Postgres,
            "UPDATE equipment_dataset SET uploaded_at = '2024-01-01T00:00:00Z'".to_string(),
        ))
        .await
        .unwrap();

    let recent: Vec<i32> = store.list_recent(3).await.unwrap().iter().map(|d| d.id).collect();
    assert_eq!(recent, [ids[2], ids[1], ids[0]]);
    assert_eq!(store.ids_beyond(2).await.unwrap(), [ids[0]]);
}

#[tokio::test]
async fn create_returns_the_stored_items() {
    let store = postgres_store().await;

    let stored = store.create(dataset("a.csv", 4)).await.unwrap();

    assert_eq!(stored.items.len(), 4);
    assert_eq!(
        stored.items,
        store.list_items(stored.dataset.id, 0, None).await.unwrap()
    );
}

#[tokio::test]
async fn delete_removes_items() {
    let store = postgres_store().await;
    let header = store.create(dataset("a.csv", 3)).await.unwrap().dataset;

    assert!(store.delete(header.id).await.unwrap());
    assert!(store.get(header.id).await.unwrap().is_none());
    assert_eq!(store.count_items(header.id).await.unwrap(), 0);
    let orphans = store
        .connection()
        .query_one_raw(Statement::from_string(
            DbBackend::Postgres,
            "SELECT COUNT(*) AS n FROM equipment_item".to_string(),
        ))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(orphans.try_get::<i64>("", "n").unwrap(), 0);
    assert!(!store.delete(header.id).await.unwrap());
}

#[tokio::test]
async fn retention_over_http() {
    let app = TestApp::spawn_postgres().await;

    let mut uploaded = Vec::new();
    for i in 0..6 {
        uploaded.push(app.upload_ok(&format!("{i}.csv"), &pump_csv(2)).await);
    }

    let history = app.get(routes::HISTORY).await;
    assert_eq!(history.body.as_array().unwrap().len(), 5);
    assert_eq!(app.get(&routes::summary(uploaded[0])).await.status, 404);
    assert_eq!(app.get(&routes::pdf(uploaded[5])).await.status, 200);

    let store: &Arc<dyn DatasetStore> = &app.store;
    assert!(store.get(uploaded[0]).await.unwrap().is_none());
}
