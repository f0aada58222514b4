use crate::config::{TargetLang, DEFAULT_GOOGLE_API_URL};
use crate::translate::{TranslateError, Translation, Translator};
use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;
use serde_json::Value;

/// Unofficial keyless Google Translate endpoint (`client=gtx`).
#[derive(Clone)]
pub struct GoogleTranslator {
    client: Client,
    base_url: String,
}

impl GoogleTranslator {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: DEFAULT_GOOGLE_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

impl Translator for GoogleTranslator {
    fn translate(
        &self,
        text: String,
        target: TargetLang,
    ) -> BoxFuture<'_, Result<Translation, TranslateError>> {
        async move {
            let url = format!(
                "{}/translate_a/single",
                self.base_url.trim_end_matches('/')
            );
            let params = [
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target.as_str()),
                ("dt", "t"),
                ("q", text.as_str()),
            ];

            let response = self
                .client
                .get(&url)
                .query(&params)
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

            let raw: Value = response.json().await.map_err(|e| {
                TranslateError::InvalidResponse(format!("Failed to parse JSON: {e}"))
            })?;

            parse_response(&raw)
        }
        .boxed()
    }
}

// Shape: [[["<translated>", "<source>", ...], ...], null, "<detected lang>", ...]
fn parse_response(raw: &Value) -> Result<Translation, TranslateError> {
    let sentences = raw
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::InvalidResponse("missing sentence array".to_string()))?;

    let text: String = sentences
        .iter()
        .filter_map(|sentence| sentence.get(0).and_then(Value::as_str))
        .collect();

    if text.is_empty() {
        return Err(TranslateError::InvalidResponse(
            "no translated text in response".to_string(),
        ));
    }

    Ok(Translation {
        text,
        detected_source_lang: raw.get(2).and_then(Value::as_str).map(str::to_owned),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn joins_sentence_fragments() {
        let raw = json!([
            [["Bonjour ", "Hello ", null, null, 10], ["le monde", "world", null, null, 10]],
            null,
            "en"
        ]);
        let out = parse_response(&raw).unwrap();
        assert_eq!(out.text, "Bonjour le monde");
        assert_eq!(out.detected_source_lang.as_deref(), Some("en"));
    }

    #[test]
    fn unexpected_shape_is_invalid_response() {
        let err = parse_response(&json!({ "error": "nope" })).unwrap_err();
        assert!(matches!(err, TranslateError::InvalidResponse(_)));

        let err = parse_response(&json!([[], null, "en"])).unwrap_err();
        assert!(matches!(err, TranslateError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn sends_gtx_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .and(query_param("client", "gtx"))
            .and(query_param("sl", "auto"))
            .and(query_param("tl", "es"))
            .and(query_param("dt", "t"))
            .and(query_param("q", "Goodbye"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([[["Adiós", "Goodbye"]], null, "en"])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let translator = GoogleTranslator::new(Client::new()).with_base_url(server.uri());
        let out = translator
            .translate("Goodbye".into(), TargetLang::new("es").unwrap())
            .await
            .unwrap();

        assert_eq!(out.text, "Adiós");
    }

    #[tokio::test]
    async fn rate_limited_is_http_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
            .mount(&server)
            .await;

        let translator = GoogleTranslator::new(Client::new()).with_base_url(server.uri());
        let err = translator
            .translate("Hello".into(), TargetLang::new("fr").unwrap())
            .await
            .unwrap_err();

        assert!(matches!(err, TranslateError::HttpStatus(429, _)));
    }
}
