mod run;

use crate::{
    config::{AppConfig, TargetLang},
    document::{self, Document, DocumentError},
    progress::ProgressReporter,
    translate::Translator,
};
use std::path::PathBuf;

pub use run::{KeyResult, RunSummary, TranslationOutcome, TranslationReport, TranslationRun};

const LOG_TARGET: &str = "pipeline";

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Document(#[from] DocumentError),
}

#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub source: PathBuf,
    pub target_lang: TargetLang,
    pub output_dir: PathBuf,
}

impl PipelineConfig {
    pub fn from_app(app: &AppConfig) -> Self {
        Self {
            source: app.source.clone(),
            target_lang: app.target_lang.clone(),
            output_dir: app.run.output_dir.clone(),
        }
    }
}

#[derive(Debug)]
pub struct PipelineOutput {
    pub path: PathBuf,
    pub summary: RunSummary,
}

/// load -> translate every key -> write `<output_dir>/<lang>.json`.
pub struct Pipeline<'a> {
    pub translate: &'a dyn Translator,
    pub progress: &'a dyn ProgressReporter,
    pub config: PipelineConfig,
}

impl<'a> Pipeline<'a> {
    pub fn load(&self) -> Result<Document, PipelineError> {
        Ok(document::load_document(&self.config.source)?)
    }

    pub async fn translate(&self, source: &Document) -> TranslationReport {
        let report = TranslationRun::new(source, self.translate, self.config.target_lang.clone())
            .translate_document(self.progress)
            .await;

        if report.summary.fallback > 0 {
            tracing::warn!(
                target: LOG_TARGET,
                fallback = report.summary.fallback,
                total = report.summary.total(),
                "some keys kept their original text"
            );
        }
        report
    }

    pub fn write(&self, translated: &Document) -> Result<PathBuf, PipelineError> {
        Ok(document::write_document(
            translated,
            &self.config.output_dir,
            &self.config.target_lang,
        )?)
    }

    pub async fn run(&self) -> Result<PipelineOutput, PipelineError> {
        let source = self.load()?;
        let report = self.translate(&source).await;
        let path = self.write(&report.document)?;

        Ok(PipelineOutput {
            path,
            summary: report.summary,
        })
    }
}
