use certificate_service::config::AppConfig;
use certificate_service::services::MongoDb;
use certificate_service::startup::Application;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: MongoDb,
    pub db_name: String,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let db_name = format!("certificate_test_{}", Uuid::new_v4());
        Self::spawn_with_database(&db_name).await
    }

    /// Spawns an application against a named database; used by the seeding
    /// tests to restart against a database that already has data.
    pub async fn spawn_with_database(db_name: &str) -> Self {
        std::env::set_var("MONGODB_URI", "mongodb://localhost:27017");

        let mut config = AppConfig::load().expect("Failed to load configuration");
        config.http.port = 0; // Random port for testing
        config.mongodb.database = db_name.to_string();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            db_name: db_name.to_string(),
        }
    }

    /// Saves a certificate through the HTTP API and returns the response body.
    pub async fn save_certificate(&self, body: &serde_json::Value) -> serde_json::Value {
        let client = reqwest::Client::new();
        let response = client
            .post(format!("{}/api/certificates/save", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute save request");
        assert!(
            response.status().is_success(),
            "Save failed with status {}",
            response.status()
        );
        response.json().await.expect("Failed to parse save response")
    }

    /// Cleanup test resources (drops the test database).
    pub async fn cleanup(&self) {
        let _ = self.db.client().database(&self.db_name).drop(None).await;
    }
}
