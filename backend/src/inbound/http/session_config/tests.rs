//! Unit tests for session configuration parsing.

use super::*;
use mockable::MockEnv;
use rstest::{fixture, rstest};
use std::collections::HashMap;
use std::io::Write;
use tempfile::NamedTempFile;

fn key_file(len: usize) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temporary key file");
    file.write_all(&vec![b'a'; len]).expect("write key bytes");
    file
}

fn path_of(file: &NamedTempFile) -> String {
    file.path().to_string_lossy().into_owned()
}

fn mock_env(vars: HashMap<&'static str, String>) -> MockEnv {
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |key| vars.get(key).cloned());
    env
}

struct ReleaseEnv {
    // Held so the key file outlives the test.
    _key: NamedTempFile,
    vars: HashMap<&'static str, String>,
}

impl ReleaseEnv {
    fn with(mut self, name: &'static str, value: &str) -> Self {
        self.vars.insert(name, value.to_owned());
        self
    }

    fn without(mut self, name: &'static str) -> Self {
        self.vars.remove(name);
        self
    }

    fn settings(self, mode: BuildMode) -> Result<SessionSettings, SessionConfigError> {
        session_settings_from_env(&mock_env(self.vars), mode)
    }
}

#[fixture]
fn release_env() -> ReleaseEnv {
    let key = key_file(SESSION_KEY_MIN_LEN);
    let vars = HashMap::from([
        (KEY_FILE_ENV, path_of(&key)),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ]);
    ReleaseEnv { _key: key, vars }
}

fn expect_error(result: Result<SessionSettings, SessionConfigError>) -> SessionConfigError {
    match result {
        Ok(_) => panic!("expected session configuration to be rejected"),
        Err(error) => error,
    }
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_requires_every_toggle(release_env: ReleaseEnv, #[case] name: &'static str) {
    let err = expect_error(release_env.without(name).settings(BuildMode::Release));
    assert!(matches!(err, SessionConfigError::MissingEnv { name: missing } if missing == name));
}

#[rstest]
#[case(COOKIE_SECURE_ENV, "maybe")]
#[case(COOKIE_SECURE_ENV, "")]
#[case(SAMESITE_ENV, "sometimes")]
#[case(TTL_HOURS_ENV, "0")]
#[case(TTL_HOURS_ENV, "721")]
#[case(TTL_HOURS_ENV, "a day")]
fn release_rejects_malformed_values(
    release_env: ReleaseEnv,
    #[case] name: &'static str,
    #[case] value: &str,
) {
    let err = expect_error(release_env.with(name, value).settings(BuildMode::Release));
    assert!(matches!(err, SessionConfigError::InvalidEnv { name: bad, .. } if bad == name));
}

#[rstest]
fn release_ephemeral_enabled_is_rejected(release_env: ReleaseEnv) {
    let err = expect_error(
        release_env
            .with(ALLOW_EPHEMERAL_ENV, "yes")
            .settings(BuildMode::Release),
    );
    assert!(matches!(err, SessionConfigError::EphemeralNotAllowed));
}

#[rstest]
fn release_missing_key_file_is_rejected(release_env: ReleaseEnv) {
    let err = expect_error(
        release_env
            .with(KEY_FILE_ENV, "/nonexistent/notekeeper/session_key")
            .settings(BuildMode::Release),
    );
    assert!(matches!(err, SessionConfigError::KeyRead { .. }));
}

#[rstest]
fn release_short_key_is_rejected(release_env: ReleaseEnv) {
    let short = key_file(32);
    let err = expect_error(
        release_env
            .with(KEY_FILE_ENV, &path_of(&short))
            .settings(BuildMode::Release),
    );
    assert!(matches!(
        err,
        SessionConfigError::KeyTooShort { length: 32, .. }
    ));
}

#[rstest]
fn release_insecure_none_same_site_is_rejected(release_env: ReleaseEnv) {
    let err = expect_error(
        release_env
            .with(COOKIE_SECURE_ENV, "0")
            .with(SAMESITE_ENV, "None")
            .settings(BuildMode::Release),
    );
    assert!(matches!(err, SessionConfigError::InsecureSameSiteNone));
}

#[rstest]
fn release_valid_settings_succeed(release_env: ReleaseEnv) {
    let settings = release_env
        .with(TTL_HOURS_ENV, " 8 ")
        .settings(BuildMode::Release)
        .expect("valid settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
    assert_eq!(settings.ttl_hours, 8);
}

#[rstest]
fn release_same_key_file_gives_same_key(release_env: ReleaseEnv) {
    let path = release_env.vars[KEY_FILE_ENV].clone();
    let first = release_env.settings(BuildMode::Release).expect("first load");
    let again = mock_env(HashMap::from([
        (KEY_FILE_ENV, path),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Lax".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ]));
    let second = session_settings_from_env(&again, BuildMode::Release).expect("second load");
    assert_eq!(first.key.signing(), second.key.signing());
}

#[rstest]
fn debug_defaults_allow_ephemeral_key() {
    let settings = session_settings_from_env(&mock_env(HashMap::new()), BuildMode::Debug)
        .expect("debug defaults should succeed");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
    assert_eq!(settings.ttl_hours, TTL_HOURS_DEFAULT);
}

#[rstest]
#[case(SAMESITE_ENV, "unexpected")]
#[case(TTL_HOURS_ENV, "-3")]
#[case(COOKIE_SECURE_ENV, "perhaps")]
fn debug_falls_back_on_malformed_values(
    release_env: ReleaseEnv,
    #[case] name: &'static str,
    #[case] value: &str,
) {
    let settings = release_env
        .with(name, value)
        .settings(BuildMode::Debug)
        .expect("debug should fall back to defaults");
    assert!(settings.cookie_secure);
    assert_eq!(settings.ttl_hours, TTL_HOURS_DEFAULT);
    if name == SAMESITE_ENV {
        assert_eq!(settings.same_site, SameSite::Lax);
    }
}

#[rstest]
fn key_fingerprint_tracks_the_key_file(release_env: ReleaseEnv) {
    let path = release_env.vars[KEY_FILE_ENV].clone();
    let first = release_env.settings(BuildMode::Release).expect("first load");
    let fingerprint = first.key_fingerprint();
    assert_eq!(fingerprint.len(), FINGERPRINT_BYTES * 2);
    assert!(
        fingerprint
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
    );

    let same = expect_settings(HashMap::from([(KEY_FILE_ENV, path)]));
    assert_eq!(same.key_fingerprint(), fingerprint);

    let other_key = key_file(SESSION_KEY_MIN_LEN + 1);
    let other = expect_settings(HashMap::from([(KEY_FILE_ENV, path_of(&other_key))]));
    assert_ne!(other.key_fingerprint(), fingerprint);
}

fn expect_settings(vars: HashMap<&'static str, String>) -> SessionSettings {
    session_settings_from_env(&mock_env(vars), BuildMode::Debug).expect("debug settings")
}
