use utoipa_axum::{router::OpenApiRouter, routes};

use crate::config::AppConfig;
use crate::handlers::{automobile, download, upload};
use crate::state::AppState;

pub fn api_routes(config: &AppConfig) -> OpenApiRouter<AppState> {
    let upload_routes = OpenApiRouter::new()
        .routes(routes!(upload::upload_form, upload::upload_file))
        .layer(upload::upload_body_limit(config.storage.max_file_size));

    OpenApiRouter::new()
        .routes(routes!(automobile::list_automobiles))
        .routes(routes!(automobile::get_automobile))
        .routes(routes!(automobile::list_parts))
        .routes(routes!(download::download_automobile_files))
        .routes(routes!(download::download_file))
        .routes(routes!(download::download_part_files))
        .merge(upload_routes)
}
