//! HS256 JSON Web Token implementation of [`TokenCodec`].
//!
//! Claims: `{id, username, role, roll_number, iat, exp}`. Expiry is checked
//! against the injected clock rather than the system time so tests can pin
//! "now".

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{TokenCodec, TokenCodecError};
use crate::domain::{Identity, Role, UserId};

/// Token lifetime used when configuration does not override it.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    id: i32,
    username: String,
    role: Role,
    roll_number: Option<String>,
    iat: i64,
    exp: i64,
}

/// Signs and verifies bearer tokens with a shared secret.
pub struct JwtCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtCodec {
    /// Codec signing with `secret`; tokens live for `ttl`.
    #[must_use]
    pub fn new(secret: &[u8], ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
            clock,
        }
    }
}

impl TokenCodec for JwtCodec {
    fn issue(&self, identity: &Identity) -> Result<String, TokenCodecError> {
        let issued_at = self.clock.utc();
        let claims = Claims {
            id: identity.id.as_i32(),
            username: identity.username.clone(),
            role: identity.role,
            roll_number: identity.roll_number.clone(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| TokenCodecError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Identity, TokenCodecError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => TokenCodecError::Expired,
                _ => TokenCodecError::invalid(err.to_string()),
            }
        })?;
        let claims = data.claims;
        if claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenCodecError::Expired);
        }
        Ok(Identity {
            id: UserId::new(claims.id),
            username: claims.username,
            role: claims.role,
            roll_number: claims.roll_number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::{fixture, rstest};
    use std::sync::Mutex;

    struct FixtureClock(Mutex<DateTime<Utc>>);

    impl FixtureClock {
        fn advance(&self, by: Duration) {
            let mut now = self.0.lock().expect("clock lock");
            *now += by;
        }
    }

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.0.lock().expect("clock lock")
        }
    }

    #[fixture]
    fn clock() -> Arc<FixtureClock> {
        Arc::new(FixtureClock(Mutex::new(
            Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0)
                .single()
                .expect("valid timestamp"),
        )))
    }

    fn codec(secret: &[u8], clock: Arc<FixtureClock>) -> JwtCodec {
        JwtCodec::new(secret, Duration::hours(DEFAULT_TOKEN_TTL_HOURS), clock)
    }

    fn student() -> Identity {
        Identity {
            id: UserId::new(7),
            username: "23101A0001".to_owned(),
            role: Role::User,
            roll_number: Some("23101A0001".to_owned()),
        }
    }

    #[rstest]
    fn issued_tokens_carry_the_identity(clock: Arc<FixtureClock>) {
        let codec = codec(b"test-secret", clock);
        let token = codec.issue(&student()).expect("issued");

        assert_eq!(codec.verify(&token).expect("verified"), student());
    }

    #[rstest]
    fn tokens_expire_after_the_ttl(clock: Arc<FixtureClock>) {
        let codec = codec(b"test-secret", Arc::clone(&clock));
        let token = codec.issue(&student()).expect("issued");

        clock.advance(Duration::hours(DEFAULT_TOKEN_TTL_HOURS) - Duration::seconds(1));
        assert!(codec.verify(&token).is_ok());

        clock.advance(Duration::seconds(1));
        assert_eq!(codec.verify(&token), Err(TokenCodecError::Expired));
    }

    #[rstest]
    fn tokens_signed_with_another_secret_are_invalid(clock: Arc<FixtureClock>) {
        let token = codec(b"other-secret", Arc::clone(&clock))
            .issue(&student())
            .expect("issued");

        let err = codec(b"test-secret", clock)
            .verify(&token)
            .expect_err("rejected");
        assert!(matches!(err, TokenCodecError::Invalid { .. }));
    }

    #[rstest]
    #[case("")]
    #[case("not-a-token")]
    #[case("a.b.c")]
    fn malformed_tokens_are_invalid(clock: Arc<FixtureClock>, #[case] token: &str) {
        let err = codec(b"test-secret", clock)
            .verify(token)
            .expect_err("rejected");
        assert!(matches!(err, TokenCodecError::Invalid { .. }));
    }
}
