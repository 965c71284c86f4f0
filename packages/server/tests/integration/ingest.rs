use serde_json::json;

use crate::common::{CSV_HEADER, TestApp, pump_csv, routes};

mod csv_upload {
    use super::*;

    #[tokio::test]
    async fn upload_returns_header_items_and_retention() {
        let app = TestApp::spawn().await;
        let csv = format!("{CSV_HEADER}P-1,Pump,10,1,100\nV-1,Valve,20,2,200\nP-2,Pump,30,3,300\n");

        let res = app.upload("plant.csv", &csv).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["id"].is_number());
        assert_eq!(res.body["file_name"], "plant.csv");
        assert_eq!(res.body["total_count"], 3);
        assert_eq!(res.body["avg_flowrate"], 20.0);
        assert_eq!(res.body["avg_pressure"], 2.0);
        assert_eq!(res.body["avg_temperature"], 200.0);
        assert!(res.body["uploaded_at"].is_string());

        let items = res.body["items"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0]["name"], "P-1");
        assert_eq!(items[1]["type"], "Valve");
        assert_eq!(items[2]["position"], 2);
        assert_eq!(items[0]["dataset"], res.body["id"]);

        assert_eq!(res.body["retention"]["evicted_ids"], json!([]));
        assert_eq!(res.body["retention"]["failed_ids"], json!([]));
    }

    #[tokio::test]
    async fn extra_columns_are_ignored() {
        let app = TestApp::spawn().await;
        let csv = "Notes,Equipment Name,Type,Flowrate,Pressure,Temperature\nspare,P-1,Pump,1,2,3\n";

        let res = app.upload("extra.csv", csv).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert!(res.body["items"][0].get("Notes").is_none());
    }

    #[tokio::test]
    async fn missing_columns_are_all_reported() {
        let app = TestApp::spawn().await;

        let res = app
            .upload("bad.csv", "Equipment Name,Type,Flowrate\nP-1,Pump,1\n")
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "SCHEMA_ERROR");
        let message = res.body["message"].as_str().unwrap();
        assert!(message.contains("Pressure"));
        assert!(message.contains("Temperature"));
    }

    #[tokio::test]
    async fn header_only_file_is_empty() {
        let app = TestApp::spawn().await;

        let res = app.upload("empty.csv", CSV_HEADER).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "EMPTY_PAYLOAD");
    }

    #[tokio::test]
    async fn non_numeric_reading_names_row_and_column() {
        let app = TestApp::spawn().await;
        let csv = format!("{CSV_HEADER}P-1,Pump,1,2,3\nP-2,Pump,1,high,3\n");

        let res = app.upload("bad.csv", &csv).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "TYPE_COERCION_ERROR");
        let message = res.body["message"].as_str().unwrap();
        assert!(message.contains("row 2"), "{message}");
        assert!(message.contains("Pressure"), "{message}");

        let history = app.get(routes::HISTORY).await;
        assert_eq!(history.body, json!([]));
    }

    #[tokio::test]
    async fn short_row_reports_the_missing_reading() {
        let app = TestApp::spawn().await;
        let csv = format!("{CSV_HEADER}P-1,Pump,1,2\n");

        let res = app.upload("short.csv", &csv).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "TYPE_COERCION_ERROR");
        let message = res.body["message"].as_str().unwrap();
        assert!(message.contains("Temperature"), "{message}");
    }

    #[tokio::test]
    async fn rows_longer_than_header_are_malformed() {
        let app = TestApp::spawn().await;
        let csv = format!("{CSV_HEADER}P-1,Pump,1,2,3,4\n");

        let res = app.upload("long.csv", &csv).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "MALFORMED_PAYLOAD");
    }

    #[tokio::test]
    async fn missing_file_field_is_rejected() {
        let app = TestApp::spawn().await;
        let form = reqwest::multipart::Form::new().text("other", "value");

        let res = app
            .client
            .post(format!("http://{}{}", app.addr, routes::UPLOAD))
            .multipart(form)
            .send()
            .await
            .unwrap();

        assert_eq!(res.status().as_u16(), 400);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn blank_file_name_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app.upload("   ", &pump_csv(1)).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod json_rows {
    use super::*;

    #[tokio::test]
    async fn numbers_and_numeric_strings_are_accepted() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::DATASETS,
                &json!({
                    "file_name": "api.json",
                    "rows": [
                        {"Equipment Name": "P-1", "Type": "Pump", "Flowrate": 10, "Pressure": "1.5", "Temperature": 300},
                        {"Equipment Name": "C-1", "Type": "Compressor", "Flowrate": 30.0, "Pressure": 2.5, "Temperature": "320"}
                    ]
                }),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["file_name"], "api.json");
        assert_eq!(res.body["total_count"], 2);
        assert_eq!(res.body["avg_flowrate"], 20.0);
        assert_eq!(res.body["items"][1]["type"], "Compressor");
    }

    #[tokio::test]
    async fn null_reading_is_a_coercion_error() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(
                routes::DATASETS,
                &json!({
                    "file_name": "api.json",
                    "rows": [
                        {"Equipment Name": "P-1", "Type": "Pump", "Flowrate": null, "Pressure": 1, "Temperature": 300}
                    ]
                }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "TYPE_COERCION_ERROR");
    }

    #[tokio::test]
    async fn empty_rows_are_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(routes::DATASETS, &json!({"file_name": "api.json", "rows": []}))
            .await;

        // No rows means no columns either.
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "SCHEMA_ERROR");
    }

    #[tokio::test]
    async fn undecodable_body_is_malformed() {
        let app = TestApp::spawn().await;

        let res = app
            .post_json(routes::DATASETS, &json!({"file_name": "api.json"}))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "MALFORMED_PAYLOAD");
    }
}

#[tokio::test]
async fn openapi_document_lists_dataset_routes() {
    let app = TestApp::spawn().await;

    let res = app.get(routes::OPENAPI).await;

    assert_eq!(res.status, 200);
    let paths = res.body["paths"].as_object().unwrap();
    for path in [
        "/api/v1/upload",
        "/api/v1/datasets",
        "/api/v1/summary",
        "/api/v1/summary/{id}",
        "/api/v1/history",
        "/api/v1/datasets/{id}/items",
        "/api/v1/datasets/{id}",
        "/api/v1/pdf/{id}",
    ] {
        assert!(paths.contains_key(path), "missing {path}");
    }
}
