//! Unit tests for token secret loading.

use super::*;
use mockable::MockEnv;
use rstest::rstest;
use rstest_bdd_macros::{given, then, when};
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn secret_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temporary secret file");
    file.write_all(&vec![b'k'; len]).expect("write secret");
    file
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

fn env_for(file: &NamedTempFile) -> MockEnv {
    let path = file.path().to_string_lossy().into_owned();
    mock_env(HashMap::from([(SECRET_FILE_ENV, path)]))
}

fn missing_secret_env(allow_ephemeral: Option<&str>) -> MockEnv {
    let mut vars = HashMap::from([(
        SECRET_FILE_ENV,
        "/nonexistent/canteen/token_secret".to_owned(),
    )]);
    if let Some(value) = allow_ephemeral {
        vars.insert(ALLOW_EPHEMERAL_ENV, value.to_owned());
    }
    mock_env(vars)
}

#[given("a release build without a readable secret")]
fn a_release_build_without_a_readable_secret() -> MockEnv {
    missing_secret_env(None)
}

#[when("token settings are loaded for release")]
fn token_settings_are_loaded_for_release(env: &MockEnv) -> Option<TokenConfigError> {
    token_settings_from_env(env, BuildMode::Release).err()
}

#[then("startup is refused with a read error")]
fn startup_is_refused_with_a_read_error(error: &Option<TokenConfigError>) {
    assert!(matches!(error, Some(TokenConfigError::SecretRead { .. })));
}

#[rstest]
fn release_builds_need_a_secret_file() {
    let env = a_release_build_without_a_readable_secret();
    let error = token_settings_are_loaded_for_release(&env);
    startup_is_refused_with_a_read_error(&error);
}

#[rstest]
#[case(BuildMode::Release)]
#[case(BuildMode::Debug)]
fn secrets_are_read_from_the_configured_file(#[case] mode: BuildMode) {
    let file = secret_file(SECRET_MIN_LEN);

    let settings = token_settings_from_env(&env_for(&file), mode).expect("settings load");

    assert_eq!(settings.secret.as_slice(), vec![b'k'; SECRET_MIN_LEN].as_slice());
    assert!(!settings.ephemeral);
}

#[rstest]
fn release_rejects_short_secrets() {
    let file = secret_file(SECRET_MIN_LEN - 1);

    let err = token_settings_from_env(&env_for(&file), BuildMode::Release)
        .err()
        .expect("short secret rejected");

    assert!(matches!(
        err,
        TokenConfigError::SecretTooShort {
            length: 31,
            min_len: SECRET_MIN_LEN,
            ..
        }
    ));
}

#[rstest]
fn debug_accepts_short_secrets() {
    let file = secret_file(4);

    let settings = token_settings_from_env(&env_for(&file), BuildMode::Debug).expect("settings");

    assert_eq!(settings.secret.len(), 4);
}

#[rstest]
#[case(None)]
#[case(Some("0"))]
#[case(Some("maybe"))]
fn debug_falls_back_to_an_ephemeral_secret(#[case] allow: Option<&str>) {
    let settings =
        token_settings_from_env(&missing_secret_env(allow), BuildMode::Debug).expect("fallback");

    assert!(settings.ephemeral);
    assert_eq!(settings.secret.len(), EPHEMERAL_SECRET_LEN);
}

#[rstest]
#[case("1")]
#[case("yes")]
fn release_refuses_ephemeral_secrets(#[case] allow: &str) {
    let err = token_settings_from_env(&missing_secret_env(Some(allow)), BuildMode::Release)
        .err()
        .expect("ephemeral refused");

    assert!(matches!(err, TokenConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_rejects_unparseable_toggles() {
    let err = token_settings_from_env(&missing_secret_env(Some("maybe")), BuildMode::Release)
        .err()
        .expect("invalid toggle");

    assert!(matches!(
        err,
        TokenConfigError::InvalidEnv {
            name: ALLOW_EPHEMERAL_ENV,
            ..
        }
    ));
}

#[rstest]
fn fingerprints_are_stable_and_distinct() {
    let first = fingerprint(&[b'a'; 32]);

    assert_eq!(first, fingerprint(&[b'a'; 32]));
    assert_ne!(first, fingerprint(&[b'b'; 32]));
    assert_eq!(first.len(), FINGERPRINT_BYTES * 2);
    assert_eq!(first, first.to_lowercase());
}
