#![allow(dead_code)]

use std::path::Path;
use std::sync::Once;
use study_assistant_server::config::{
    AuthConfig, Config, CorsConfig, DatabaseConfig, Environment, LogFormat, ServerConfig, TelemetryConfig,
};
use study_assistant_server::services::token_service::TokenService;
use study_assistant_server::storage::{self, DbPool};
use study_assistant_server::{AppBuilder, api};
use tempfile::TempDir;
use tokio::net::TcpListener;

pub const TEST_JWT_SECRET: &str = "test_secret";
pub const INDEX_HTML: &str = "<!doctype html><html><body><div id=\"root\"></div></body></html>";
pub const MAIN_JS: &str = "console.log('study assistant');";

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("study_assistant_server=debug".parse().unwrap())
            .add_directive("sqlx=warn".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).init();
    });
}

pub fn get_test_config(root: &Path) -> Config {
    Config {
        environment: Environment::Development,
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            frontend_dir: root.join("frontend"),
            shutdown_timeout_secs: 1,
        },
        database: DatabaseConfig {
            url: format!("sqlite://{}", root.join("app.db").display()),
            max_connections: 5,
            acquire_timeout_secs: 5,
        },
        auth: AuthConfig { jwt_secret: Some(TEST_JWT_SECRET.to_string()) },
        cors: CorsConfig { allowed_origins: vec!["*".to_string()] },
        telemetry: TelemetryConfig { log_format: LogFormat::Text, otlp_endpoint: None },
    }
}

fn write_frontend(dir: &Path) {
    std::fs::create_dir_all(dir.join("static").join("js")).unwrap();
    std::fs::write(dir.join("index.html"), INDEX_HTML).unwrap();
    std::fs::write(dir.join("static").join("js").join("main.js"), MAIN_JS).unwrap();
}

pub struct TestApp {
    pub server_url: String,
    pub client: reqwest::Client,
    pub pool: DbPool,
    pub config: Config,
    _root: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        setup_tracing();

        let root = tempfile::tempdir().unwrap();
        let config = get_test_config(root.path());
        write_frontend(&config.server.frontend_dir);

        let pool = storage::init_pool(&config.database).await.expect("Failed to open the test database");
        study_assistant_server::run_migrations(&pool).await.expect("Failed to run migrations");

        let services = AppBuilder::new(config.clone()).with_database(pool.clone()).build().unwrap();
        let router = api::app_router(&config, services);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            server_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            pool,
            config,
            _root: root,
        }
    }

    pub async fn register(&self, username: &str, password: &str, email: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/api/auth/register", self.server_url))
            .json(&serde_json::json!({
                "username": username,
                "password": password,
                "email": email,
            }))
            .send()
            .await
            .unwrap()
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(format!("{}/api/auth/login", self.server_url))
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await
            .unwrap()
    }

    pub async fn user_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM users").fetch_one(&self.pool).await.unwrap()
    }

    pub fn token_service(&self) -> TokenService {
        TokenService::new(TEST_JWT_SECRET)
    }
}
