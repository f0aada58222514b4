mod deepl;
mod google;

use crate::config::{ApiKeys, BackendKind, Endpoints, TargetLang};
use futures::future::BoxFuture;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use deepl::DeepLTranslator;
pub use google::GoogleTranslator;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub detected_source_lang: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum TranslateError {
    #[error("no DeepL API key configured")]
    MissingApiKey,

    #[error("http error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("http error {0}: {1}")]
    HttpStatus(u16, String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

pub trait Translator: Send + Sync {
    fn translate(
        &self,
        text: String,
        target: TargetLang,
    ) -> BoxFuture<'_, Result<Translation, TranslateError>>;
}

/// Both translation backends; exactly one is used per run.
pub struct Backends<D, G> {
    pub deepl: D,
    pub google: G,
}

impl<D, G> Backends<D, G>
where
    D: Translator,
    G: Translator,
{
    pub fn new(deepl: D, google: G) -> Self {
        Self { deepl, google }
    }

    pub fn select(&self, kind: BackendKind) -> &dyn Translator {
        match kind {
            BackendKind::DeepL => &self.deepl,
            BackendKind::Google => &self.google,
        }
    }
}

impl Backends<DeepLTranslator, GoogleTranslator> {
    /// Builds both HTTP backends on one shared client.
    pub fn from_config(api_keys: &ApiKeys, endpoints: &Endpoints) -> Result<Self, TranslateError> {
        let client = http_client()?;
        Ok(Self::new(
            DeepLTranslator::new(client.clone(), api_keys.deepl.clone())
                .with_base_url(endpoints.deepl.clone()),
            GoogleTranslator::new(client).with_base_url(endpoints.google.clone()),
        ))
    }
}

pub fn http_client() -> Result<Client, TranslateError> {
    Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(TranslateError::Network)
}
