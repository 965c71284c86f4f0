use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::config::AppConfig;
use crate::handlers;
use crate::state::AppState;

pub fn routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(ingest_routes(config))
        .merge(dataset_routes())
        .merge(report_routes())
}

fn ingest_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::dataset::upload_dataset))
        .routes(routes!(handlers::dataset::create_dataset))
        .layer(handlers::dataset::upload_body_limit(&config.upload))
}

fn dataset_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::dataset::get_latest_summary))
        .routes(routes!(handlers::dataset::get_summary))
        .routes(routes!(handlers::dataset::list_history))
        .routes(routes!(handlers::dataset::list_items))
        .routes(routes!(handlers::dataset::delete_dataset))
}

fn report_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::report::download_report))
}
