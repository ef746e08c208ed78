//! A live server on an ephemeral port for route tests.

use std::sync::Arc;

use assistant::Assistant;
use database::lawyer::{self, NewLawyer};
use database::registration::{self, Registration};
use database::user::{self, NewUser};
use database::{Client, Database, LawyerProfile, Role, User};
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;

use crate::extract::USER_HEADER;
use crate::routes;
use crate::state::AppState;

pub struct TestApp {
    pub addr: std::net::SocketAddr,
    pub state: AppState,
    http: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(None).await
    }

    pub async fn spawn_with(assistant: Option<Arc<dyn Assistant>>) -> Self {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();

        let state = AppState::new(db, assistant);
        let app = routes::router().with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            http: reqwest::Client::new(),
        }
    }

    fn request(&self, method: Method, path: &str, user: Option<i64>) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("http://{}{}", self.addr, path));
        match user {
            Some(id) => builder.header(USER_HEADER, id.to_string()),
            None => builder,
        }
    }

    pub async fn get(&self, path: &str, user: Option<i64>) -> Response {
        self.request(Method::GET, path, user).send().await.unwrap()
    }

    pub async fn post(&self, path: &str, user: Option<i64>, body: Value) -> Response {
        self.request(Method::POST, path, user)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn put(&self, path: &str, user: Option<i64>, body: Value) -> Response {
        self.request(Method::PUT, path, user)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn delete(&self, path: &str, user: Option<i64>) -> Response {
        self.request(Method::DELETE, path, user).send().await.unwrap()
    }

    pub async fn admin(&self) -> User {
        user::create_user(
            self.state.db.pool(),
            &NewUser {
                username: "admin".to_string(),
                email: "admin@firm.example".to_string(),
                first_name: "Site".to_string(),
                last_name: "Admin".to_string(),
                role: Role::Admin,
                is_active: true,
            },
        )
        .await
        .unwrap()
    }

    pub async fn lawyer(&self, username: &str) -> (User, LawyerProfile) {
        lawyer::create_lawyer(
            self.state.db.pool(),
            &NewLawyer {
                username: username.to_string(),
                email: format!("{}@firm.example", username),
                first_name: "Ngozi".to_string(),
                last_name: "Eze".to_string(),
                bio: "Land and property disputes".to_string(),
                photo: None,
            },
        )
        .await
        .unwrap()
    }

    /// A registered client whose account an admin has already approved.
    pub async fn client(&self, username: &str) -> (User, Client) {
        let pool = self.state.db.pool();
        let (account, profile) = registration::register(
            pool,
            &Registration {
                username: username.to_string(),
                email: format!("{}@mail.example", username),
                name: "amina njoya".to_string(),
                phone: "+237 677 000 000".to_string(),
                date_of_birth: None,
            },
            self.state.today(),
        )
        .await
        .unwrap();
        let account = user::activate_user(pool, account.id).await.unwrap();
        (account, profile)
    }
}
