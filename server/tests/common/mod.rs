#![allow(dead_code)]

use axum_test::TestServer;
use daycare_mail::auth::{Claims, JwtSettings};
use daycare_mail::core::AppState;
use daycare_mail::dtos::MessageSentEvent;
use daycare_mail::entities::{Role, User};
use daycare_mail::mail::{EventPublisher, Mailbox};
use daycare_mail::repositories::{InMemoryMessageStore, InMemoryUserDirectory};
use std::sync::{Arc, Mutex};

pub const JWT_SECRET: &str = "ilmiobellissimosegretochevaassolutamentecambiato";

pub const ADMIN: &str = "admin-1";
pub const SECOND_ADMIN: &str = "admin-2";
pub const PARENT: &str = "parent-1";
pub const OTHER_PARENT: &str = "parent-2";
pub const TEACHER: &str = "teacher-1";

fn user(id: &str, first_name: &str, last_name: &str) -> User {
    User {
        user_id: id.to_string(),
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        email: format!("{id}@daycare.test"),
    }
}

/// Directory con due admin, due genitori e un'insegnante
pub fn seeded_directory() -> Arc<InMemoryUserDirectory> {
    let directory = InMemoryUserDirectory::new();
    // registered out of order on purpose: the first admin is picked by id
    directory.register(user(SECOND_ADMIN, "Alan", "Office"), vec![Role::Admin]);
    directory.register(user(ADMIN, "Ada", "Admin"), vec![Role::Admin]);
    directory.register(user(PARENT, "Paula", "Parent"), vec![Role::Parent]);
    directory.register(user(OTHER_PARENT, "Peter", "Parent"), vec![Role::Parent]);
    directory.register(user(TEACHER, "Tina", "Teacher"), vec![Role::Teacher]);
    Arc::new(directory)
}

pub fn jwt_settings() -> JwtSettings {
    JwtSettings {
        secret: JWT_SECRET.to_string(),
        issuer: None,
        audience: None,
    }
}

/// Crea un AppState per i test, interamente in memoria
pub fn create_test_state() -> Arc<AppState> {
    create_test_state_with(seeded_directory())
}

pub fn create_test_state_with(directory: Arc<InMemoryUserDirectory>) -> Arc<AppState> {
    Arc::new(AppState::new(
        Arc::new(InMemoryMessageStore::new()),
        directory,
        jwt_settings(),
    ))
}

/// Crea un TestServer per i test
pub fn create_test_server(state: Arc<AppState>) -> TestServer {
    let app = daycare_mail::create_router(state);
    TestServer::new(app).expect("Failed to create test server")
}

/// Genera un JWT token per testing, valido per 24 ore
pub fn create_test_jwt(user_id: &str, roles: Vec<Role>, jwt_secret: &str) -> String {
    use chrono::{Duration, Utc};
    use jsonwebtoken::{EncodingKey, Header, encode};

    let now = Utc::now();
    let claims = Claims {
        exp: (now + Duration::hours(24)).timestamp() as usize,
        iat: now.timestamp() as usize,
        sub: user_id.to_string(),
        roles,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .expect("Failed to create JWT")
}

pub fn bearer(user_id: &str, roles: Vec<Role>) -> String {
    format!("Bearer {}", create_test_jwt(user_id, roles, JWT_SECRET))
}

/// Publisher che registra gli eventi emessi
#[derive(Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<MessageSentEvent>>,
}

impl RecordingPublisher {
    pub fn events(&self) -> Vec<MessageSentEvent> {
        self.events.lock().expect("poisoned").clone()
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish(&self, event: MessageSentEvent) {
        self.events.lock().expect("poisoned").push(event);
    }
}

/// Mailbox in memoria con il publisher di test
pub fn create_test_mailbox() -> (Mailbox, Arc<RecordingPublisher>) {
    let publisher = Arc::new(RecordingPublisher::default());
    let mailbox = Mailbox::new(
        Arc::new(InMemoryMessageStore::new()),
        seeded_directory(),
        publisher.clone(),
    );
    (mailbox, publisher)
}
