#![allow(dead_code)]

use std::sync::Arc;

use auth::Authenticator;
use auth::TokenCodec;
use auth::TokenSettings;
use auth_service::config::GoogleConfig;
use auth_service::domain::identity::models::MissingIdentityPolicy;
use auth_service::domain::identity::ports::AuthServicePort;
use auth_service::domain::identity::service::AuthService;
use auth_service::inbound::grpc::AuthGrpcService;
use auth_service::inbound::http::router::create_router;
use auth_service::outbound::oauth::GoogleOAuthProvider;
use auth_service::outbound::repositories::InMemoryIdentityRepository;
use auth_service::proto::auth_service_client::AuthServiceClient;
use auth_service::proto::auth_service_server::AuthServiceServer;
use serde_json::json;
use tonic::transport::server::TcpIncoming;
use tonic::transport::Channel;
use tonic::transport::Server;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ACCESS_TOKEN_TTL_SECS: i64 = 3600;
pub const REFRESH_TOKEN_TTL_SECS: i64 = 604_800;

/// Test application that spawns real HTTP and gRPC servers over an
/// in-memory identity store
pub struct TestApp {
    pub address: String,
    pub grpc_address: String,
    pub repository: InMemoryIdentityRepository,
    pub api_client: reqwest::Client,
    pub codec: TokenCodec,
}

impl TestApp {
    /// Spawn the application with the default fail-closed policy
    pub async fn spawn() -> Self {
        Self::spawn_with_policy(MissingIdentityPolicy::FailClosed).await
    }

    pub async fn spawn_with_policy(policy: MissingIdentityPolicy) -> Self {
        let repository = InMemoryIdentityRepository::new();

        let authenticator = Arc::new(
            Authenticator::new(
                TEST_SECRET,
                TokenSettings::from_secs(ACCESS_TOKEN_TTL_SECS, REFRESH_TOKEN_TTL_SECS),
            )
            .expect("Failed to create authenticator"),
        );
        let google_provider = Arc::new(GoogleOAuthProvider::new(&GoogleConfig::default()));

        let auth_service: Arc<dyn AuthServicePort> = Arc::new(
            AuthService::new(Arc::new(repository.clone()), google_provider, authenticator)
                .with_missing_identity_policy(policy),
        );

        // Use random ports (0 = OS assigns)
        let http_listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let http_port = http_listener.local_addr().unwrap().port();

        let router = create_router(Arc::clone(&auth_service));
        tokio::spawn(async move {
            axum::serve(http_listener, router).await.expect("Server error");
        });

        let grpc_listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let grpc_port = grpc_listener.local_addr().unwrap().port();
        let incoming =
            TcpIncoming::from_listener(grpc_listener, true, None).expect("Failed to accept");

        let grpc_service = AuthGrpcService::new(Arc::clone(&auth_service));
        tokio::spawn(async move {
            Server::builder()
                .add_service(AuthServiceServer::new(grpc_service))
                .serve_with_incoming(incoming)
                .await
                .expect("gRPC server error");
        });

        Self {
            address: format!("http://127.0.0.1:{}", http_port),
            grpc_address: format!("http://127.0.0.1:{}", grpc_port),
            repository,
            api_client: reqwest::Client::new(),
            codec: TokenCodec::new(TEST_SECRET).expect("Failed to create token codec"),
        }
    }

    /// Connect a generated gRPC client to the running server
    pub async fn grpc_client(&self) -> AuthServiceClient<Channel> {
        AuthServiceClient::connect(self.grpc_address.clone())
            .await
            .expect("Failed to connect gRPC client")
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register an identity over HTTP and return the response body
    pub async fn register(&self, username: &str, password: &str) -> serde_json::Value {
        let response = self
            .post("/api/auth/register")
            .json(&json!({
                "username": username,
                "password": password,
                "age": 30,
                "profession": "Engineer",
                "education": "BSc"
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }
}
