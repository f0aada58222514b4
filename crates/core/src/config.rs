use serde::{Deserialize, Serialize};
use std::{
    fmt,
    path::{Path, PathBuf},
};

pub const ENV_DEEPL_API_KEY: &str = "DEEPL_API_KEY";
pub const ENV_DEEPL_API_URL: &str = "DEEPL_API_URL";
pub const DEFAULT_DEEPL_API_URL: &str = "https://api-free.deepl.com";
pub const DEFAULT_GOOGLE_API_URL: &str = "https://translate.googleapis.com";

/// Destination language, normalised to lower case so `FR` and `fr` name the same output file.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub struct TargetLang(String);

impl TargetLang {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, ConfigError> {
        let v = value.into();
        let v = v.trim();
        if v.is_empty() {
            return Err(ConfigError::EmptyTargetLang);
        }
        Ok(Self(v.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TargetLang {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TargetLang> for String {
    fn from(lang: TargetLang) -> Self {
        lang.0
    }
}

impl fmt::Display for TargetLang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, ConfigError> {
        let v = value.into();
        if v.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }
        Ok(Self(v))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(**redacted**)")
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiKeys {
    pub deepl: Option<ApiKey>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum BackendKind {
    DeepL,
    Google,
}

impl BackendKind {
    pub fn from_free_flag(free_mode: bool) -> Self {
        if free_mode {
            Self::Google
        } else {
            Self::DeepL
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::DeepL => "deepl",
            Self::Google => "google",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Base URLs of the translation services; overridable for DeepL Pro accounts and tests.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Endpoints {
    pub deepl: String,
    pub google: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            deepl: DEFAULT_DEEPL_API_URL.to_owned(),
            google: DEFAULT_GOOGLE_API_URL.to_owned(),
        }
    }
}

/// Options that vary between invocations of the same pipeline.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunConfig {
    pub free_mode: bool,
    pub output_dir: PathBuf,
    pub verbose: bool,
    pub show_progress: bool,
}

impl RunConfig {
    pub fn backend(&self) -> BackendKind {
        BackendKind::from_free_flag(self.free_mode)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub source: PathBuf,
    pub target_lang: TargetLang,
    pub api_keys: ApiKeys,
    pub endpoints: Endpoints,
    pub run: RunConfig,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("target language must not be empty")]
    EmptyTargetLang,
    #[error("api key must not be empty")]
    EmptyApiKey,
}

pub trait Env {
    fn var(&self, key: &str) -> Option<String>;
}

#[derive(Clone, Debug, Default)]
pub struct StdEnv;

impl Env for StdEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MapEnv {
    vars: std::collections::BTreeMap<String, String>,
}

impl MapEnv {
    pub fn with_var(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Env for MapEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn resolve_api_key(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
) -> Result<Option<ApiKey>, ConfigError> {
    // Blank values (e.g. `DEEPL_API_KEY=` in a .env template) count as unset.
    let value = cli_value
        .filter(|v| !v.trim().is_empty())
        .or_else(|| env.var(env_key).filter(|v| !v.trim().is_empty()));
    value.map(ApiKey::new).transpose()
}

pub fn resolve_string_with_default(
    cli_value: Option<String>,
    env_key: &str,
    env: &impl Env,
    default: &str,
) -> String {
    match cli_value {
        Some(v) => v,
        None => env.var(env_key).unwrap_or_else(|| default.to_owned()),
    }
}

/// Output directory used when none is given: next to the source document.
pub fn default_output_dir(source: &Path) -> PathBuf {
    match source.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_cli_takes_precedence_over_env() {
        let env = MapEnv::default().with_var(ENV_DEEPL_API_KEY, "env-key");
        let key = resolve_api_key(Some("cli-key".to_owned()), ENV_DEEPL_API_KEY, &env)
            .expect("valid key")
            .expect("present");
        assert_eq!(key.expose(), "cli-key");
    }

    #[test]
    fn api_key_env_used_when_cli_missing() {
        let env = MapEnv::default().with_var(ENV_DEEPL_API_KEY, "env-key");
        let key = resolve_api_key(None, ENV_DEEPL_API_KEY, &env)
            .expect("valid key")
            .expect("present");
        assert_eq!(key.expose(), "env-key");
    }

    #[test]
    fn api_key_absent_everywhere_is_none() {
        let env = MapEnv::default();
        let key = resolve_api_key(None, ENV_DEEPL_API_KEY, &env).expect("no error");
        assert!(key.is_none());
    }

    #[test]
    fn resolve_string_with_default_cli_takes_precedence() {
        let env = MapEnv::default().with_var(ENV_DEEPL_API_URL, "env");
        let v = resolve_string_with_default(Some("cli".to_owned()), ENV_DEEPL_API_URL, &env, "def");
        assert_eq!(v, "cli");
    }

    #[test]
    fn resolve_string_with_default_env_used_when_cli_missing() {
        let env = MapEnv::default().with_var(ENV_DEEPL_API_URL, "env");
        let v = resolve_string_with_default(None, ENV_DEEPL_API_URL, &env, "def");
        assert_eq!(v, "env");
    }

    #[test]
    fn resolve_string_with_default_default_used_when_both_missing() {
        let env = MapEnv::default();
        let v = resolve_string_with_default(None, ENV_DEEPL_API_URL, &env, "def");
        assert_eq!(v, "def");
    }

    #[test]
    fn blank_api_key_resolves_to_none() {
        let env = MapEnv::default().with_var(ENV_DEEPL_API_KEY, "  ");
        let key = resolve_api_key(None, ENV_DEEPL_API_KEY, &env).expect("no error");
        assert!(key.is_none());

        let env = MapEnv::default().with_var(ENV_DEEPL_API_KEY, "");
        let key = resolve_api_key(Some(String::new()), ENV_DEEPL_API_KEY, &env).expect("no error");
        assert!(key.is_none());
    }

    #[test]
    fn blank_cli_api_key_falls_through_to_env() {
        let env = MapEnv::default().with_var(ENV_DEEPL_API_KEY, "env-key");
        let key = resolve_api_key(Some(" ".to_owned()), ENV_DEEPL_API_KEY, &env)
            .expect("no error")
            .expect("present");
        assert_eq!(key.expose(), "env-key");
    }

    #[test]
    fn api_key_new_still_rejects_blank() {
        assert_eq!(ApiKey::new(" "), Err(ConfigError::EmptyApiKey));
    }

    #[test]
    fn api_key_debug_is_redacted() {
        let key = ApiKey::new("secret:fx").unwrap();
        assert_eq!(format!("{key:?}"), "ApiKey(**redacted**)");
    }

    #[test]
    fn target_lang_is_lowercased_and_trimmed() {
        let lang = TargetLang::new(" FR ").unwrap();
        assert_eq!(lang.as_str(), "fr");
        assert_eq!(TargetLang::new("pt-BR").unwrap().as_str(), "pt-br");
    }

    #[test]
    fn empty_target_lang_is_rejected() {
        assert_eq!(TargetLang::new("   "), Err(ConfigError::EmptyTargetLang));
    }

    #[test]
    fn deserialized_target_lang_is_normalised() {
        let lang: TargetLang = serde_json::from_str("\" FR \"").unwrap();
        assert_eq!(lang.as_str(), "fr");
        assert_eq!(serde_json::to_string(&lang).unwrap(), "\"fr\"");

        let err = serde_json::from_str::<TargetLang>("\"  \"").unwrap_err();
        assert!(err.to_string().contains("target language must not be empty"));
    }

    #[test]
    fn free_flag_selects_backend() {
        assert_eq!(BackendKind::from_free_flag(false), BackendKind::DeepL);
        assert_eq!(BackendKind::from_free_flag(true), BackendKind::Google);
    }

    #[test]
    fn default_output_dir_is_source_parent() {
        assert_eq!(
            default_output_dir(Path::new("locales/en.json")),
            PathBuf::from("locales")
        );
        assert_eq!(default_output_dir(Path::new("en.json")), PathBuf::from("."));
    }
}
