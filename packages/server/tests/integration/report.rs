use std::sync::Arc;

use lopdf::Document;
use server::store::MemoryDatasetStore;

use crate::common::{TestApp, pump_csv, routes, test_config};

#[tokio::test]
async fn report_is_a_pdf_attachment() {
    let app = TestApp::spawn().await;
    let id = app.upload_ok("plant.csv", &pump_csv(12)).await;

    let res = app.get(&routes::pdf(id)).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.header("content-type"), Some("application/pdf"));
    assert_eq!(
        res.header("content-disposition"),
        Some(format!("attachment; filename=\"report_{id}.pdf\"").as_str())
    );
    assert!(res.bytes.starts_with(b"%PDF-"));

    let doc = Document::load_mem(&res.bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[tokio::test]
async fn report_lists_only_the_first_ten_items() {
    let app = TestApp::spawn().await;
    let id = app.upload_ok("plant.csv", &pump_csv(12)).await;

    let res = app.get(&routes::pdf(id)).await;

    assert!(res.text.contains("Equipment Parameter Report: plant.csv"));
    assert!(res.text.contains("Total Equipment: 12"));
    assert!(res.text.contains("(E-9 - Pump: 9.0 F, 2.5 P, 300.0 T)"));
    assert!(!res.text.contains("(E-10 - Pump"));
}

#[tokio::test]
async fn larger_detail_limit_spills_onto_a_second_page() {
    let mut config = test_config();
    config.report.detail_limit = 40;
    let app = TestApp::spawn_with(config, Arc::new(MemoryDatasetStore::new())).await;
    let id = app.upload_ok("plant.csv", &pump_csv(40)).await;

    let res = app.get(&routes::pdf(id)).await;

    assert_eq!(res.status, 200);
    let doc = Document::load_mem(&res.bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 2);
}
