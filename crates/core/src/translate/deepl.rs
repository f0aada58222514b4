use crate::config::{ApiKey, TargetLang, DEFAULT_DEEPL_API_URL};
use crate::translate::{TranslateError, Translation, Translator};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

#[derive(Clone)]
pub struct DeepLTranslator {
    client: Client,
    api_key: Option<ApiKey>,
    base_url: String,
}

impl DeepLTranslator {
    pub fn new(client: Client, api_key: Option<ApiKey>) -> Self {
        Self {
            client,
            api_key,
            base_url: DEFAULT_DEEPL_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[derive(Serialize)]
struct DeepLRequest<'a> {
    auth_key: &'a str,
    text: &'a str,
    target_lang: &'a str,
}

#[derive(Deserialize)]
struct DeepLResponse {
    translations: Vec<DeepLTranslation>,
}

#[derive(Deserialize)]
struct DeepLTranslation {
    #[serde(default)]
    detected_source_language: Option<String>,
    text: String,
}

impl Translator for DeepLTranslator {
    fn translate(
        &self,
        text: String,
        target: TargetLang,
    ) -> BoxFuture<'_, Result<Translation, TranslateError>> {
        async move {
            let api_key = self.api_key.as_ref().ok_or(TranslateError::MissingApiKey)?;

            // The language code goes out exactly as configured (already lower-cased).
            let request = DeepLRequest {
                auth_key: api_key.expose(),
                text: &text,
                target_lang: target.as_str(),
            };

            let url = format!("{}/v2/translate", self.base_url.trim_end_matches('/'));
            let response = self
                .client
                .post(&url)
                .form(&request)
                .send()
                .await
                .map_err(TranslateError::Network)?;

            if !response.status().is_success() {
                let status = response.status();
                let error_text = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown error".to_string());
                return Err(TranslateError::HttpStatus(status.as_u16(), error_text));
            }

            let deepl_response: DeepLResponse = response.json().await.map_err(|e| {
                TranslateError::InvalidResponse(format!("Failed to parse JSON: {e}"))
            })?;

            let translation = deepl_response
                .translations
                .into_iter()
                .next()
                .ok_or_else(|| {
                    TranslateError::InvalidResponse("No translations in response".to_string())
                })?;

            Ok(Translation {
                text: translation.text,
                detected_source_lang: translation.detected_source_language,
            })
        }
        .boxed()
    }
}
