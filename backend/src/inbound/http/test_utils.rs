//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::web;
use chrono::Duration;
use mockable::DefaultClock;
use rust_decimal::Decimal;

use crate::domain::ports::{MenuRepository, TokenCodec, UserRepository};
use crate::domain::{
    Email, Identity, MenuItem, NewMenuItem, NewUser, Price, Role, RollNumber, Username,
};
use crate::inbound::http::state::{HttpState, Repositories};
use crate::outbound::memory::MemoryStore;
use crate::outbound::security::{Argon2Hasher, JwtCodec};

const TEST_SECRET: &[u8] = b"canteen-http-tests-signing-secret-000";

/// HTTP state wired over a fresh in-memory store.
pub struct TestHarness {
    pub state: web::Data<HttpState>,
    pub store: Arc<MemoryStore>,
    tokens: Arc<JwtCodec>,
}

impl TestHarness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(DefaultClock);
        let tokens = Arc::new(JwtCodec::new(TEST_SECRET, Duration::hours(1), clock.clone()));
        let state = HttpState::from_repositories(
            Repositories {
                users: store.clone(),
                menu: store.clone(),
                orders: store.clone(),
                audit: store.clone(),
            },
            Arc::new(Argon2Hasher::default()),
            tokens.clone(),
            clock,
        );
        Self {
            state: web::Data::new(state),
            store,
            tokens,
        }
    }

    /// `Authorization` header value for `identity`.
    pub fn bearer(&self, identity: &Identity) -> String {
        let token = self.tokens.issue(identity).expect("issue test token");
        format!("Bearer {token}")
    }

    /// Insert a password-less account. Usernames shaped like roll numbers
    /// get the matching roll number and student email.
    pub async fn seed_user(&self, username: &str, role: Role) -> Identity {
        let roll_number = RollNumber::matches(username)
            .then(|| RollNumber::new(username).expect("roll number"));
        let email = match &roll_number {
            Some(roll) => Email::for_roll_number(roll),
            None => Email::new(format!("{username}@x.com")).expect("email"),
        };
        let user = UserRepository::insert(
            self.store.as_ref(),
            &NewUser {
                roll_number,
                username: Username::new(username).expect("username"),
                email,
                password_hash: None,
                role,
            },
        )
        .await
        .expect("seed user");
        Identity::from(&user)
    }

    pub async fn seed_menu_item(&self, name: &str, category: &str, price: i64) -> MenuItem {
        MenuRepository::insert(
            self.store.as_ref(),
            &NewMenuItem {
                name: name.to_owned(),
                description: None,
                price: Price::new(Decimal::from(price)).expect("price"),
                category: category.to_owned(),
                image_url: None,
            },
        )
        .await
        .expect("seed menu item")
    }
}
