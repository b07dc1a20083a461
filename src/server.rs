use crate::config::DashboardConfig;
use crate::dashboard::Pipeline;
use crate::render::html::{escape, page, HtmlRenderer};
use crate::render::Renderer;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tracing::{info, warn};

pub const UPLOAD_FIELD: &str = "file";
const WAITING_MESSAGE: &str = "Please upload a dataset to proceed.";

#[derive(Clone)]
struct ServerState {
    config: Arc<DashboardConfig>,
}

pub fn router(config: DashboardConfig) -> Router {
    let body_limit = match config.server.max_upload_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };
    let state = ServerState {
        config: Arc::new(config),
    };

    Router::new()
        .route("/", get(index_handler))
        .route("/upload", post(upload_handler))
        .route("/health", get(|| async { "ok" }))
        .layer(body_limit)
        .with_state(state)
}

pub async fn serve(config: DashboardConfig) -> std::io::Result<()> {
    let bind = config.server.bind.clone();
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("Dashboard listening on http://{}", bind);
    axum::serve(listener, router(config)).await
}

/// True for a `.csv` file name or a CSV content type
pub fn is_csv_upload(file_name: Option<&str>, content_type: Option<&str>) -> bool {
    let by_name = file_name.is_some_and(|name| name.to_ascii_lowercase().ends_with(".csv"));
    let by_type = content_type.is_some_and(|ct| {
        let ct = ct.to_ascii_lowercase();
        ct.starts_with("text/csv") || ct.starts_with("application/csv")
    });
    by_name || by_type
}

fn upload_form(config: &DashboardConfig, message: &str) -> String {
    format!(
        "<h1>{title}</h1>\n<p>{intro}</p>\n\
         <form action=\"/upload\" method=\"post\" enctype=\"multipart/form-data\">\n\
         <label>Upload the {company} dataset (CSV) \
         <input type=\"file\" name=\"{field}\" accept=\".csv,text/csv\"></label>\n\
         <button type=\"submit\">Analyze</button>\n</form>\n<p>{message}</p>\n",
        title = escape(&config.title),
        intro = escape(&config.intro),
        company = escape(&config.company),
        field = UPLOAD_FIELD,
        message = escape(message),
    )
}

async fn index_handler(State(state): State<ServerState>) -> Html<String> {
    Html(page(
        &state.config.title,
        &upload_form(&state.config, WAITING_MESSAGE),
    ))
}

async fn upload_handler(State(state): State<ServerState>, mut multipart: Multipart) -> Response {
    let mut upload = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                warn!(error = %err, "malformed upload");
                return (StatusCode::BAD_REQUEST, err.body_text()).into_response();
            }
        };
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        if !is_csv_upload(file_name.as_deref(), content_type.as_deref()) {
            return (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                Html(page(
                    &state.config.title,
                    &upload_form(&state.config, "Only CSV files are accepted."),
                )),
            )
                .into_response();
        }

        match field.bytes().await {
            Ok(bytes) => upload = Some((file_name, bytes)),
            Err(err) => {
                warn!(error = %err, "failed to read upload");
                return (StatusCode::BAD_REQUEST, err.body_text()).into_response();
            }
        }
        break;
    }

    let Some((file_name, bytes)) = upload else {
        return (
            StatusCode::BAD_REQUEST,
            Html(page(
                &state.config.title,
                &upload_form(&state.config, WAITING_MESSAGE),
            )),
        )
            .into_response();
    };

    info!(
        file = file_name.as_deref().unwrap_or("<unnamed>"),
        bytes = bytes.len(),
        "upload received"
    );
    let dashboard = Pipeline::new(&state.config).run(&bytes);
    match HtmlRenderer.render_to_string(&dashboard) {
        Ok(html) => Html(html).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}
