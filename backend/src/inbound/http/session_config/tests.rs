//! Tests for session toggle validation.

use std::collections::HashMap;

use mockable::MockEnv;
use rstest::{fixture, rstest};
use uuid::Uuid;

use super::*;

/// Key file removed when dropped.
struct KeyFile(PathBuf);

impl KeyFile {
    fn with_len(len: usize) -> Self {
        let path = std::env::temp_dir().join(format!("folio-session-key-{}", Uuid::new_v4()));
        std::fs::write(&path, vec![b'k'; len]).expect("write key file");
        Self(path)
    }

    fn path(&self) -> String {
        self.0.to_string_lossy().into_owned()
    }
}

impl Drop for KeyFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

fn env_from(vars: &[(&str, String)]) -> MockEnv {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(name, value)| ((*name).to_owned(), value.clone()))
        .collect();
    let mut env = MockEnv::new();
    env.expect_string()
        .times(0..)
        .returning(move |name| vars.get(name).cloned());
    env
}

type Vars = Vec<(&'static str, String)>;

#[fixture]
fn key_file() -> KeyFile {
    KeyFile::with_len(SESSION_KEY_MIN_LEN)
}

fn release_vars(key: &KeyFile) -> Vars {
    vec![
        (KEY_FILE_ENV, key.path()),
        (COOKIE_SECURE_ENV, "1".to_owned()),
        (SAMESITE_ENV, "Strict".to_owned()),
        (ALLOW_EPHEMERAL_ENV, "0".to_owned()),
    ]
}

fn with(mut vars: Vars, name: &'static str, value: &str) -> Vars {
    vars.retain(|(existing, _)| *existing != name);
    vars.push((name, value.to_owned()));
    vars
}

fn without(mut vars: Vars, name: &'static str) -> Vars {
    vars.retain(|(existing, _)| *existing != name);
    vars
}

#[rstest]
fn release_accepts_a_complete_configuration(key_file: KeyFile) {
    let env = env_from(&release_vars(&key_file));
    let settings = session_settings_from_env(&env, BuildMode::Release).expect("valid settings");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Strict);
    assert_eq!(settings.key_fingerprint().len(), 16);
}

#[rstest]
#[case(COOKIE_SECURE_ENV)]
#[case(SAMESITE_ENV)]
#[case(ALLOW_EPHEMERAL_ENV)]
fn release_requires_every_toggle(key_file: KeyFile, #[case] missing: &'static str) {
    let env = env_from(&without(release_vars(&key_file), missing));
    let Err(error) = session_settings_from_env(&env, BuildMode::Release) else {
        panic!("missing {missing} should fail");
    };
    assert!(matches!(error, SessionConfigError::MissingEnv { name } if name == missing));
}

#[rstest]
#[case(COOKIE_SECURE_ENV, "maybe")]
#[case(SAMESITE_ENV, "sideways")]
fn release_rejects_invalid_values(
    key_file: KeyFile,
    #[case] name: &'static str,
    #[case] value: &str,
) {
    let env = env_from(&with(release_vars(&key_file), name, value));
    let Err(error) = session_settings_from_env(&env, BuildMode::Release) else {
        panic!("{name}={value} should fail");
    };
    assert!(matches!(error, SessionConfigError::InvalidEnv { name: got, .. } if got == name));
}

#[rstest]
fn release_rejects_same_site_none_without_secure(key_file: KeyFile) {
    let vars = with(release_vars(&key_file), SAMESITE_ENV, "None");
    let env = env_from(&with(vars, COOKIE_SECURE_ENV, "0"));
    assert!(matches!(
        session_settings_from_env(&env, BuildMode::Release),
        Err(SessionConfigError::InsecureSameSiteNone)
    ));
}

#[rstest]
fn release_rejects_ephemeral_keys(key_file: KeyFile) {
    let env = env_from(&with(release_vars(&key_file), ALLOW_EPHEMERAL_ENV, "1"));
    assert!(matches!(
        session_settings_from_env(&env, BuildMode::Release),
        Err(SessionConfigError::EphemeralNotAllowed)
    ));
}

#[rstest]
fn release_rejects_short_keys() {
    let short = KeyFile::with_len(SESSION_KEY_MIN_LEN - 1);
    let env = env_from(&release_vars(&short));
    assert!(matches!(
        session_settings_from_env(&env, BuildMode::Release),
        Err(SessionConfigError::KeyTooShort { length, .. }) if length == SESSION_KEY_MIN_LEN - 1
    ));
}

#[rstest]
fn release_requires_a_readable_key(key_file: KeyFile) {
    let missing = std::env::temp_dir().join(format!("folio-missing-{}", Uuid::new_v4()));
    let vars = with(
        release_vars(&key_file),
        KEY_FILE_ENV,
        &missing.to_string_lossy(),
    );
    assert!(matches!(
        session_settings_from_env(&env_from(&vars), BuildMode::Release),
        Err(SessionConfigError::KeyRead { .. })
    ));
}

#[rstest]
fn debug_falls_back_to_defaults() {
    let missing = std::env::temp_dir().join(format!("folio-missing-{}", Uuid::new_v4()));
    let env = env_from(&[
        (KEY_FILE_ENV, missing.to_string_lossy().into_owned()),
        (SAMESITE_ENV, "sideways".to_owned()),
    ]);
    let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug defaults");
    assert!(settings.cookie_secure);
    assert_eq!(settings.same_site, SameSite::Lax);
}

#[rstest]
fn same_keys_share_a_fingerprint(key_file: KeyFile) {
    let env = env_from(&release_vars(&key_file));
    let first = session_settings_from_env(&env, BuildMode::Release).expect("settings");
    let second = session_settings_from_env(&env, BuildMode::Release).expect("settings");
    assert_eq!(first.key_fingerprint(), second.key_fingerprint());
}
