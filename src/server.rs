/// HTTP server exposing rendered stat-table windows
///
/// `GET /api/skaters` and `GET /api/goalies` take the table-state query
/// parameters (`sort`, `pos`, `team`, `minGP`, `cols`, `filters`) plus
/// `season`, `offset`, `viewport` and `width`, and answer with one rendered
/// window of the table.
use actix_web::{http::StatusCode, middleware, web, App, HttpRequest, HttpResponse, HttpServer};
use log::{error, info};

use crate::config::ServerConfig;
use crate::messages::{ErrorResponse, RequestParams, TableResponse};
use crate::mock::{mock_goalie_rows, mock_skater_rows};
use crate::render::render_window;
use crate::rows::{GoalieRow, SkaterRow, StatRow};
use crate::source::{cached_fetch, with_fallback, FetchError, JsonFileSource, MemoryCache, RowSource, StaticSource};
use crate::table::Table;
use crate::virtualizer::Virtualizer;

type SharedSource<R> = Box<dyn RowSource<R> + Send + Sync>;

/// Row sources and caches shared by every worker
pub struct AppState {
    config: ServerConfig,
    skaters: SharedSource<SkaterRow>,
    goalies: SharedSource<GoalieRow>,
    skater_cache: MemoryCache<Vec<SkaterRow>>,
    goalie_cache: MemoryCache<Vec<GoalieRow>>,
}

impl AppState {
    /// JSON files from `data_dir` when configured, otherwise the built-in rows.
    pub fn new(config: ServerConfig) -> Self {
        let (skaters, goalies): (SharedSource<SkaterRow>, SharedSource<GoalieRow>) = match &config.data_dir {
            Some(dir) => (
                Box::new(JsonFileSource::new(dir, "skaters.json")),
                Box::new(JsonFileSource::new(dir, "goalies.json")),
            ),
            None => (
                Box::new(StaticSource::new(mock_skater_rows())),
                Box::new(StaticSource::new(mock_goalie_rows())),
            ),
        };
        Self::with_sources(config, skaters, goalies)
    }

    pub fn with_sources(
        config: ServerConfig,
        skaters: SharedSource<SkaterRow>,
        goalies: SharedSource<GoalieRow>,
    ) -> Self {
        AppState {
            skater_cache: MemoryCache::with_capacity(config.cache_capacity),
            goalie_cache: MemoryCache::with_capacity(config.cache_capacity),
            config,
            skaters,
            goalies,
        }
    }

    pub fn skater_rows(&self, season: &str) -> Result<Vec<SkaterRow>, FetchError> {
        let key = format!("skaters:{}", season);
        with_fallback("getSkaterRows", self.config.environment, || {
            cached_fetch(&self.skater_cache, &key, self.config.cache_ttl, || {
                self.skaters.fetch_rows(season)
            })
        }, mock_skater_rows)
    }

    pub fn goalie_rows(&self, season: &str) -> Result<Vec<GoalieRow>, FetchError> {
        let key = format!("goalies:{}", season);
        with_fallback("getGoalieRows", self.config.environment, || {
            cached_fetch(&self.goalie_cache, &key, self.config.cache_ttl, || {
                self.goalies.fetch_rows(season)
            })
        }, mock_goalie_rows)
    }
}

fn status_for(err: &FetchError) -> StatusCode {
    match err {
        FetchError::NotFound(_) => StatusCode::NOT_FOUND,
        FetchError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        FetchError::Transport(_) => StatusCode::BAD_GATEWAY,
        FetchError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(status: StatusCode, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse { error: message })
}

/// Build the table from the query string and render the requested window.
fn render_response<R: StatRow>(rows: Vec<R>, query: &str, params: &RequestParams) -> TableResponse {
    let table = Table::from_query(rows, query);
    let virtualizer = Virtualizer::new(table.len());
    let window = render_window(&table, &virtualizer, params.viewport());
    TableResponse::new(&table, window)
}

async fn respond<R, F>(
    req: HttpRequest,
    params: RequestParams,
    state: web::Data<AppState>,
    load: F,
) -> HttpResponse
where
    R: StatRow + Send + 'static,
    F: FnOnce(&AppState, &str) -> Result<Vec<R>, FetchError> + Send + 'static,
{
    let season = params.season().to_string();
    let rows = web::block(move || load(state.get_ref(), &season)).await;

    match rows {
        Ok(Ok(rows)) => HttpResponse::Ok().json(render_response(rows, req.query_string(), &params)),
        Ok(Err(err)) => error_response(status_for(&err), err.to_string()),
        Err(err) => {
            error!("row loading task failed: {}", err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "row loading failed".to_string())
        }
    }
}

/// Skater table endpoint
async fn skaters(
    req: HttpRequest,
    params: web::Query<RequestParams>,
    state: web::Data<AppState>,
) -> HttpResponse {
    respond(req, params.into_inner(), state, |state, season| state.skater_rows(season)).await
}

/// Goalie table endpoint
async fn goalies(
    req: HttpRequest,
    params: web::Query<RequestParams>,
    state: web::Data<AppState>,
) -> HttpResponse {
    respond(req, params.into_inner(), state, |state, season| state.goalie_rows(season)).await
}

/// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "message": "StatTable server is running"
    }))
}

/// Register the table routes on an app
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/skaters", web::get().to(skaters))
        .route("/api/goalies", web::get().to(goalies))
        .route("/health", web::get().to(health_check));
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> std::io::Result<()> {
    let host = config.host.clone();
    let port = config.port;
    let state = web::Data::new(AppState::new(config));

    info!("StatTable server listening on http://{}:{}", host, port);
    info!("skaters: http://{}:{}/api/skaters", host, port);
    info!("goalies: http://{}:{}/api/goalies", host, port);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            // Enable logger
            .wrap(middleware::Logger::default())
            // CORS for development
            .wrap(
                actix_cors::Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .configure(configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::CURRENT_SEASON;
    use crate::source::{Environment, TtlCache};
    use actix_web::test;
    use serde_json::Value as JsonValue;

    struct FailingSource;

    impl<R> RowSource<R> for FailingSource {
        fn fetch_rows(&self, _season: &str) -> Result<Vec<R>, FetchError> {
            Err(FetchError::Transport("db unavailable".to_string()))
        }
    }

    fn failing_state(environment: Environment) -> web::Data<AppState> {
        let config = ServerConfig {
            environment,
            ..ServerConfig::default()
        };
        web::Data::new(AppState::with_sources(config, Box::new(FailingSource), Box::new(FailingSource)))
    }

    #[actix_web::test]
    async fn test_skaters_endpoint() {
        let state = web::Data::new(AppState::new(ServerConfig::default()));
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = test::TestRequest::get()
            .uri("/api/skaters?pos=C&sort=%5B%7B%22id%22%3A%22points%22%2C%22desc%22%3Atrue%7D%5D&width=1440")
            .to_request();
        let body: JsonValue = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["kind"], "skater");
        assert_eq!(body["window"]["rowCount"], 4);
        assert_eq!(body["window"]["rows"][0]["cells"][0]["text"], "Connor McDavid");
        assert_eq!(body["filters"][0]["label"], "Position: C");
        assert!(body["query"].as_str().unwrap().contains("pos=C"));
    }

    #[actix_web::test]
    async fn test_goalies_endpoint() {
        let state = web::Data::new(AppState::new(ServerConfig::default()));
        let app = test::init_service(App::new().app_data(state).configure(configure)).await;

        let req = test::TestRequest::get().uri("/api/goalies?team=NYR").to_request();
        let body: JsonValue = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["window"]["rowCount"], 1);
        assert_eq!(body["teams"].as_array().unwrap().len(), 4);
    }

    #[actix_web::test]
    async fn test_development_falls_back_to_mock_rows() {
        let app = test::init_service(
            App::new().app_data(failing_state(Environment::Development)).configure(configure),
        )
        .await;
        let req = test::TestRequest::get().uri("/api/skaters").to_request();
        let body: JsonValue = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["window"]["rowCount"], 8);
    }

    #[actix_web::test]
    async fn test_production_reports_failure() {
        let app = test::init_service(
            App::new().app_data(failing_state(Environment::Production)).configure(configure),
        )
        .await;
        let req = test::TestRequest::get().uri("/api/goalies").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }

    #[actix_web::test]
    async fn test_junk_seasons_share_the_current_season() {
        let state = web::Data::new(AppState::new(ServerConfig::default()));
        let app = test::init_service(App::new().app_data(state.clone()).configure(configure)).await;

        for season in ["%2Ftmp%2Foutside", "..", "junk-1", "junk-2", "20232024"] {
            let uri = format!("/api/skaters?season={}", season);
            let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
            assert!(resp.status().is_success());
        }
        assert_eq!(state.skater_cache.len(), 2);
        assert!(state.skater_cache.get(&format!("skaters:{}", CURRENT_SEASON)).is_some());
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(App::new().configure(configure)).await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: JsonValue = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "ok");
    }
}
