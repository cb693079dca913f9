//! Tests for user value types.

use super::*;
use rstest::rstest;

#[rstest]
#[case("23101A0001", true)]
#[case("23101A9999", true)]
#[case("23101a0001", false)]
#[case("23101A001", false)]
#[case("23101A00011", false)]
#[case(" 23101A0001", false)]
#[case("alice", false)]
#[case("23101A\u{0661}\u{0662}\u{0663}\u{0664}", false)]
#[case("23101A０００１", false)]
fn roll_number_shape(#[case] input: &str, #[case] valid: bool) {
    assert_eq!(RollNumber::matches(input), valid);
    assert_eq!(RollNumber::new(input).is_ok(), valid);
}

#[rstest]
#[case("user", Role::User)]
#[case("ADMIN", Role::Admin)]
#[case(" admin ", Role::Admin)]
fn role_parses_case_insensitively(#[case] input: &str, #[case] expected: Role) {
    assert_eq!(input.parse::<Role>(), Ok(expected));
}

#[rstest]
#[case("kitchen")]
#[case("")]
fn unknown_roles_are_rejected(#[case] input: &str) {
    assert_eq!(input.parse::<Role>(), Err(UserValidationError::UnknownRole));
}

#[rstest]
fn username_is_trimmed_and_bounded() {
    assert_eq!(Username::new("  alice ").map(|u| u.as_str().to_owned()), Ok("alice".to_owned()));
    assert_eq!(Username::new("   "), Err(UserValidationError::EmptyUsername));
    let long = "a".repeat(USERNAME_MAX + 1);
    assert_eq!(
        Username::new(long),
        Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX })
    );
}

#[rstest]
#[case("alice@x.com", true)]
#[case("a@b", true)]
#[case("alice", false)]
#[case("@x.com", false)]
#[case("alice@", false)]
#[case("al ice@x.com", false)]
#[case("a@b@c", false)]
fn email_shape(#[case] input: &str, #[case] valid: bool) {
    assert_eq!(Email::new(input).is_ok(), valid);
}

#[rstest]
fn provisioned_students_derive_username_and_email() {
    let roll = RollNumber::new("23101A0099").expect("valid roll number");
    let new_user = NewUser::provisioned_student(roll.clone());

    assert_eq!(new_user.username.as_str(), "23101A0099");
    assert_eq!(new_user.email.as_str(), "23101A0099@student.com");
    assert_eq!(new_user.roll_number, Some(roll));
    assert_eq!(new_user.role, Role::User);
    assert!(new_user.password_hash.is_none());
}

#[rstest]
fn password_hash_debug_output_is_redacted() {
    let hash = PasswordHash::new("$argon2id$v=19$secret".to_owned());
    assert_eq!(format!("{hash:?}"), "PasswordHash(<redacted>)");
}

#[rstest]
fn user_serialises_with_snake_case_fields() {
    let user = User {
        id: UserId::new(7),
        roll_number: None,
        username: Username::new("alice").expect("username"),
        email: Email::new("alice@x.com").expect("email"),
        role: Role::Admin,
        created_at: DateTime::<Utc>::UNIX_EPOCH,
    };
    let value = serde_json::to_value(&user).expect("serialise user");
    assert_eq!(value["id"], 7);
    assert_eq!(value["role"], "admin");
    assert!(value["roll_number"].is_null());
    assert!(value.get("password_hash").is_none());
}
