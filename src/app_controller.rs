use anyhow::{Context, Result, anyhow};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::document::model::DocumentTree;
use crate::document::{docx, plain, web};
use crate::errors::AppError;
use crate::file_utils::{DocumentKind, FileManager};
use crate::pipeline::{CancelToken, Orchestrator, PipelineOptions, PipelineOutcome, ProgressUpdate};
use crate::providers::{TranslationBackend, create_backend};

// @module: Application controller for document translation

/// Main application controller for document translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.source_language.is_empty() && !self.config.target_language.is_empty()
    }

    /// Run the main workflow for a file path, directory, or URL
    pub async fn run(&self, input: &str, output: Option<PathBuf>, force_overwrite: bool) -> Result<()> {
        let cancel = CancelToken::new();
        {
            // first Ctrl-C stops dispatching new batches; in-flight ones drain
            let cancel = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Cancellation requested, finishing in-flight requests");
                    cancel.cancel();
                }
            });
        }

        if input.starts_with("http://") || input.starts_with("https://") {
            return self.run_url(input, output, force_overwrite, &cancel).await;
        }

        let path = Path::new(input);
        if path.is_dir() {
            self.run_folder(path, force_overwrite, &cancel).await
        } else if path.is_file() {
            let multi_progress = MultiProgress::new();
            self.run_file(path, output, force_overwrite, &multi_progress, &cancel)
                .await
        } else {
            Err(anyhow!("Input path does not exist: {:?}", path))
        }
    }

    /// Translate a raw string and return the translated string
    pub async fn translate_text(&self, text: &str) -> Result<String> {
        let mut tree = plain::parse_str(text);
        let cancel = CancelToken::new();
        let _outcome = self
            .translate_tree(&mut tree, |_| {}, &cancel)
            .await
            .map_err(|e| anyhow!(e))?;
        Ok(plain::serialize(&tree))
    }

    /// Translate one document file
    async fn run_file(
        &self,
        input_file: &Path,
        output: Option<PathBuf>,
        force_overwrite: bool,
        multi_progress: &MultiProgress,
        cancel: &CancelToken,
    ) -> Result<()> {
        let start_time = std::time::Instant::now();

        let kind = FileManager::detect_document_kind(input_file)?;
        if kind == DocumentKind::Unknown {
            return Err(anyhow!(
                "Unsupported document format: {:?} (expected .docx or text)",
                input_file
            ));
        }

        let output_path = output.unwrap_or_else(|| {
            FileManager::generate_output_path(input_file, &self.config.target_language)
        });
        if output_path.exists() && !force_overwrite {
            warn!("Skipping file, translation already exists (use -f to force overwrite)");
            return Ok(());
        }
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                FileManager::ensure_dir(parent)?;
            }
        }

        info!("Translating {:?}", input_file);

        match kind {
            DocumentKind::Docx => {
                let (mut tree, package) = docx::parse_file(input_file).map_err(AppError::from)?;
                let outcome = self
                    .translate_with_progress(&mut tree, multi_progress, cancel)
                    .await?;

                // only runs the reassembler touched are rewritten in the body XML
                let mut replacements: HashMap<usize, String> = HashMap::new();
                for path in &outcome.applied {
                    if let Some(run) = tree.resolve(path) {
                        replacements.insert(run.source_index, run.text.clone());
                    }
                }
                docx::write_file(&package, &replacements, &output_path).map_err(AppError::from)?;

                self.finish_run(&outcome, &output_path, start_time.elapsed())?;
            }
            DocumentKind::Text => {
                let mut tree = plain::parse_file(input_file).map_err(AppError::from)?;
                let outcome = self
                    .translate_with_progress(&mut tree, multi_progress, cancel)
                    .await?;

                plain::write_file(&tree, &output_path).map_err(AppError::from)?;

                self.finish_run(&outcome, &output_path, start_time.elapsed())?;
            }
            DocumentKind::Unknown => unreachable!("rejected above"),
        }

        Ok(())
    }

    /// Fetch a URL and translate its text content to a plain-text file
    async fn run_url(
        &self,
        url: &str,
        output: Option<PathBuf>,
        force_overwrite: bool,
        cancel: &CancelToken,
    ) -> Result<()> {
        let start_time = std::time::Instant::now();

        let timeout_secs = self.config.translation.get_timeout_secs();
        let mut tree = web::fetch_url(url, timeout_secs).await.map_err(AppError::from)?;
        info!("Fetched {} ({} paragraphs)", url, tree.blocks.len());

        let output_path = output.unwrap_or_else(|| self.url_output_path(url));
        if output_path.exists() && !force_overwrite {
            warn!("Skipping URL, translation already exists (use -f to force overwrite)");
            return Ok(());
        }

        let multi_progress = MultiProgress::new();
        let outcome = self
            .translate_with_progress(&mut tree, &multi_progress, cancel)
            .await?;

        plain::write_file(&tree, &output_path).map_err(AppError::from)?;
        self.finish_run(&outcome, &output_path, start_time.elapsed())?;

        Ok(())
    }

    /// Run the workflow in folder mode, processing all supported documents
    /// in a directory. Files that already have a translation are skipped.
    async fn run_folder(&self, input_dir: &Path, force_overwrite: bool, cancel: &CancelToken) -> Result<()> {
        let start_time = std::time::Instant::now();

        let mut document_files = Vec::new();
        for ext in &["docx", "txt"] {
            let mut files = FileManager::find_files(input_dir, ext)?;
            document_files.append(&mut files);
        }
        document_files.sort();

        if document_files.is_empty() {
            return Err(anyhow!("No documents found in directory: {:?}", input_dir));
        }

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(document_files.len() as u64));
        folder_pb.set_style(Self::progress_style("files"));
        folder_pb.set_message("Processing files");

        let mut success_count = 0;
        let mut error_count = 0;

        for document_file in document_files.iter() {
            if cancel.is_cancelled() {
                warn!("Folder run cancelled");
                break;
            }

            match self
                .run_file(document_file, None, force_overwrite, &multi_progress, cancel)
                .await
            {
                Ok(()) => success_count += 1,
                Err(e) => {
                    error!("Failed to translate {:?}: {}", document_file, e);
                    error_count += 1;
                }
            }
            folder_pb.inc(1);
        }
        folder_pb.finish_and_clear();

        info!(
            "Folder run complete in {}: {} translated, {} failed",
            Self::format_duration(start_time.elapsed()),
            success_count,
            error_count
        );

        if error_count > 0 && success_count == 0 {
            return Err(anyhow!("All {} documents failed to translate", error_count));
        }
        Ok(())
    }

    /// Translate one tree behind a progress bar
    async fn translate_with_progress(
        &self,
        tree: &mut DocumentTree,
        multi_progress: &MultiProgress,
        cancel: &CancelToken,
    ) -> Result<PipelineOutcome, AppError> {
        let progress_bar = multi_progress.add(ProgressBar::new(0));
        progress_bar.set_style(Self::progress_style("spans"));
        progress_bar.set_message("Translating");

        info!(
            "doctran: {} - {}",
            self.config.translation.provider.display_name(),
            self.config.translation.get_model()
        );

        let pb = progress_bar.clone();
        let outcome = self
            .translate_tree(
                tree,
                move |update: ProgressUpdate| {
                    pb.set_length(update.spans_total as u64);
                    pb.set_position(update.spans_done as u64);
                },
                cancel,
            )
            .await;

        progress_bar.finish_and_clear();
        outcome
    }

    /// Build the backend and orchestrator from config and run the pipeline
    async fn translate_tree(
        &self,
        tree: &mut DocumentTree,
        progress: impl Fn(ProgressUpdate) + Send + Sync + 'static,
        cancel: &CancelToken,
    ) -> Result<PipelineOutcome, AppError> {
        let backend: Arc<dyn TranslationBackend> = create_backend(&self.config.translation)?;
        let orchestrator = Orchestrator::new(backend, self.pipeline_options());

        let mut outcome = orchestrator
            .translate_tree(
                tree,
                &self.config.source_language,
                &self.config.target_language,
                progress,
                cancel,
            )
            .await?;

        outcome.report.provider = self.config.translation.provider.to_lowercase_string();
        outcome.report.model = self.config.translation.get_model();
        Ok(outcome)
    }

    fn pipeline_options(&self) -> PipelineOptions {
        let translation = &self.config.translation;
        PipelineOptions {
            max_chars_per_batch: translation.get_max_chars_per_request(),
            max_concurrent_requests: translation.optimal_concurrent_requests(),
            retry_count: translation.common.retry_count,
            retry_backoff_ms: translation.common.retry_backoff_ms,
            timeout_secs: translation.get_timeout_secs(),
        }
    }

    /// Log the outcome and persist the report next to the output when
    /// anything did not translate cleanly
    fn finish_run(
        &self,
        outcome: &PipelineOutcome,
        output_path: &Path,
        elapsed: std::time::Duration,
    ) -> Result<()> {
        let report = &outcome.report;

        if report.is_complete() {
            info!(
                "Success: {} ({} spans in {})",
                output_path.display(),
                report.spans_translated,
                Self::format_duration(elapsed)
            );
        } else {
            warn!(
                "Partial translation: {}/{} spans translated, {} batch(es) failed",
                report.spans_translated,
                report.spans_total,
                report.failed_batches.len()
            );
            let report_path = PathBuf::from(format!("{}.report.json", output_path.display()));
            report
                .write_to_file(&report_path)
                .with_context(|| format!("Failed to write report: {:?}", report_path))?;
            info!("Report written to {}", report_path.display());
        }

        debug!("{}", report.summary());
        Ok(())
    }

    fn url_output_path(&self, url: &str) -> PathBuf {
        let stem = url::Url::parse(url)
            .ok()
            .and_then(|parsed| {
                parsed
                    .path_segments()
                    .and_then(|segments| segments.filter(|s| !s.is_empty()).next_back().map(String::from))
                    .or_else(|| parsed.host_str().map(String::from))
            })
            .unwrap_or_else(|| "page".to_string());
        let stem = stem.replace(['/', '\\', ':'], "_");

        PathBuf::from(format!("{}.{}.txt", stem, self.config.target_language))
    }

    fn progress_style(unit: &str) -> ProgressStyle {
        let template = format!(
            "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}} {{eta}}",
            unit
        );
        ProgressStyle::default_bar()
            .template(&template)
            .or_else(|_| ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
