use crate::{
    config::TargetLang,
    document::Document,
    progress::ProgressReporter,
    translate::{TranslateError, Translator},
};
use futures::future::BoxFuture;
use futures::{FutureExt, Stream, StreamExt};

const LOG_TARGET: &str = "pipeline::run";

#[derive(Debug)]
pub enum TranslationOutcome {
    Translated(String),
    /// The backend failed; the source text is carried through unchanged.
    Fallback {
        original: String,
        error: TranslateError,
    },
}

impl TranslationOutcome {
    pub fn text(&self) -> &str {
        match self {
            Self::Translated(text) => text,
            Self::Fallback { original, .. } => original,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Translated(text) => text,
            Self::Fallback { original, .. } => original,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

#[derive(Debug)]
pub struct KeyResult {
    pub key: String,
    pub outcome: TranslationOutcome,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub translated: usize,
    pub fallback: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &TranslationOutcome) {
        if outcome.is_fallback() {
            self.fallback += 1;
        } else {
            self.translated += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.translated + self.fallback
    }
}

#[derive(Debug)]
pub struct TranslationReport {
    pub document: Document,
    pub summary: RunSummary,
}

/// One document translated into one language by one backend.
///
/// `results` can be called any number of times; each call starts a fresh pass
/// over the keys in document order, issuing one backend call at a time.
pub struct TranslationRun<'a> {
    source: &'a Document,
    translator: &'a dyn Translator,
    target: TargetLang,
}

impl<'a> TranslationRun<'a> {
    pub fn new(source: &'a Document, translator: &'a dyn Translator, target: TargetLang) -> Self {
        Self {
            source,
            translator,
            target,
        }
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn results(&self) -> impl Stream<Item = KeyResult> + '_ {
        let translator: &dyn Translator = self.translator;
        let target = &self.target;
        futures::stream::iter(self.source.iter())
            .then(move |(key, value)| translate_key(translator, target, key, value))
    }

    /// Drains `results` into a document with the source's keys and order.
    pub async fn translate_document(&self, progress: &dyn ProgressReporter) -> TranslationReport {
        let mut document = Document::with_capacity(self.len());
        let mut summary = RunSummary::default();

        progress.start(self.len() as u64);
        let mut results = std::pin::pin!(self.results());
        while let Some(result) = results.next().await {
            summary.record(&result.outcome);
            document.insert(result.key, result.outcome.into_text());
            progress.advance();
        }
        progress.finish();

        tracing::debug!(
            target: LOG_TARGET,
            translated = summary.translated,
            fallback = summary.fallback,
            "translation pass complete"
        );

        TranslationReport { document, summary }
    }
}

fn translate_key<'s>(
    translator: &'s dyn Translator,
    target: &'s TargetLang,
    key: &'s str,
    value: &'s str,
) -> BoxFuture<'s, KeyResult> {
    async move {
        let outcome = match translator.translate(value.to_owned(), target.clone()).await {
            Ok(translation) => TranslationOutcome::Translated(translation.text),
            Err(error) => {
                tracing::warn!(
                    target: LOG_TARGET,
                    key,
                    lang = %target,
                    error = %error,
                    "translation failed, keeping original text"
                );
                TranslationOutcome::Fallback {
                    original: value.to_owned(),
                    error,
                }
            }
        };

        KeyResult {
            key: key.to_owned(),
            outcome,
        }
    }
    .boxed()
}
