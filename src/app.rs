use crate::config::Config;
use crate::handler;
use crate::twilio::TwilioClient;
use anyhow::Result;
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::info;

pub struct AppStateInner {
    pub config: Arc<Config>,
    pub twilio: Arc<TwilioClient>,
}

pub type AppState = Arc<AppStateInner>;

pub struct AppBuilder {
    config: Option<Config>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self { config: None }
    }

    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the app state, constructing the Twilio client once from
    /// validated configuration. Missing credentials abort startup here.
    pub fn build(self) -> Result<App> {
        let config = Arc::new(self.config.unwrap_or_default());
        let twilio = Arc::new(TwilioClient::new(&config.twilio)?);
        Ok(App {
            state: Arc::new(AppStateInner { config, twilio }),
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct App {
    pub state: AppState,
}

impl App {
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(index))
            .nest("/api/voice", handler::router(self.state.clone()))
            .layer(CorsLayer::new().allow_origin(AllowOrigin::any()))
            .with_state(self.state.clone())
    }

    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(&self.state.config.http_addr).await?;
        info!("Listening on {}", listener.local_addr()?);
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

async fn index() -> &'static str {
    "Twilio Voice API backend is running!"
}
