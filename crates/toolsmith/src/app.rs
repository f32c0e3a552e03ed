//! Wiring of configuration, session and pipeline.

use crate::{JsonFileStore, ToolsmithConfig, remote_driver};
use std::sync::Arc;
use toolsmith_core::{
    Dispatch, FailureReason, GenerationOutcome, GenerationRequest, ImagePayload, RemoteCall,
    RemoteMode, ToolInputs,
};
use toolsmith_error::ToolsmithResult;
use toolsmith_interface::{CreditLedger, GenerationDriver, KeyValueStore};
use toolsmith_pipeline::{
    DayClock, GenerationPipeline, InMemoryCreditLedger, LocalClock, OutputFormat, Session,
    SessionState, Submission, ToolCatalog, UsageRecorder, finish_payload,
};
use toolsmith_retry::{RetryConfig, retry_default};
use tracing::{info, instrument};

/// A ready-to-use session: pipeline, ledger and persisted state.
pub struct Toolsmith {
    pipeline: GenerationPipeline,
    driver: Arc<dyn GenerationDriver>,
    ledger: Arc<InMemoryCreditLedger>,
    session: Session,
    retry: RetryConfig,
}

impl std::fmt::Debug for Toolsmith {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toolsmith")
            .field("pipeline", &self.pipeline)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl Toolsmith {
    /// Opens the default state file and remote driver for `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the state file cannot be read.
    pub async fn from_config(config: &ToolsmithConfig, account: &str) -> ToolsmithResult<Self> {
        let store = Arc::new(JsonFileStore::open(JsonFileStore::default_path()).await?);
        let driver = remote_driver(config.remote());
        Self::open(config, account, store, driver, Arc::new(LocalClock)).await
    }

    /// Builds a session from explicit collaborators.
    ///
    /// Usage markers left by earlier sessions are cleared from `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if session state cannot be loaded from or pruned in
    /// `store`.
    #[instrument(skip(config, store, driver, clock))]
    pub async fn open(
        config: &ToolsmithConfig,
        account: &str,
        store: Arc<dyn KeyValueStore>,
        driver: Arc<dyn GenerationDriver>,
        clock: Arc<dyn DayClock>,
    ) -> ToolsmithResult<Self> {
        let state =
            SessionState::init(Arc::clone(&store), clock, *config.quota().daily_limit()).await?;
        let usage = UsageRecorder::new(store);
        usage.clear_markers().await?;
        let ledger = Arc::new(InMemoryCreditLedger::with_starting_balance(
            *config.credits().starting_balance(),
        ));
        let session = Session::new(uuid::Uuid::new_v4().to_string(), account)
            .with_state(Arc::new(state));

        let pipeline = GenerationPipeline::builder()
            .driver(Arc::clone(&driver))
            .catalog(Arc::new(ToolCatalog::builtin()))
            .ledger(ledger.clone())
            .usage(usage)
            .config(config.pipeline_config())
            .build();

        info!(
            provider = driver.provider_name(),
            model = driver.model_name(),
            session = session.id(),
            "Toolsmith session opened"
        );

        Ok(Self {
            pipeline,
            driver,
            ledger,
            session,
            retry: config.retry().clone(),
        })
    }

    /// Bundled tools.
    pub fn catalog(&self) -> &ToolCatalog {
        self.pipeline.catalog()
    }

    /// The active session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns true the first time it is called for this state store.
    ///
    /// The flag is persisted, so later sessions see it as already shown.
    ///
    /// # Errors
    ///
    /// Returns an error if the flag cannot be written.
    pub async fn take_welcome(&self) -> ToolsmithResult<bool> {
        let Some(state) = self.session.state() else {
            return Ok(false);
        };
        if state.welcome_seen() {
            return Ok(false);
        }
        state.mark_welcome_seen().await?;
        Ok(true)
    }

    /// Remaining credits for the session's account.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger rejects the account.
    pub async fn balance(&self) -> ToolsmithResult<u32> {
        Ok(self.ledger.balance(self.session.account()).await?)
    }

    /// Runs a catalog tool.
    ///
    /// The request's output kind is taken from the tool, so callers only
    /// supply inputs and an optional image.
    pub async fn run_tool(
        &self,
        tool_id: &str,
        inputs: ToolInputs,
        image: Option<ImagePayload>,
    ) -> Submission {
        let mut request = GenerationRequest::new(tool_id, inputs);
        if let Some(tool) = self.catalog().get(tool_id) {
            request = request.with_output_kind(tool.output_kind());
        }
        if let Some(image) = image {
            request = request.with_image(image);
        }
        self.pipeline.submit(&self.session, request).await
    }

    /// Runs a raw prompt that may carry the legacy routing prefixes.
    ///
    /// Local prompts run the transform engine; anything else goes to the
    /// remote driver under the retry policy. Raw prompts are not charged.
    #[instrument(skip(self, prompt), fields(len = prompt.len()))]
    pub async fn run_prompt(&self, prompt: &str, mode: RemoteMode) -> GenerationOutcome {
        let dispatch = match Dispatch::from_sentinel_prompt(prompt, mode) {
            Ok(dispatch) => dispatch,
            Err(e) => return GenerationOutcome::failure(FailureReason::Config, e.message),
        };
        match dispatch {
            Dispatch::Local { command, params } => {
                GenerationOutcome::success(toolsmith_transform::execute(&command, &params))
            }
            Dispatch::Remote { prompt, mode } => {
                let call = RemoteCall::new(prompt, mode, None);
                let call = &call;
                let driver = &self.driver;
                let format = match mode {
                    RemoteMode::Image => OutputFormat::Image,
                    RemoteMode::Text | RemoteMode::AnalyzeImage => OutputFormat::Markdown,
                };
                match retry_default(&self.retry, || driver.generate(call)).await {
                    Ok(raw) => match finish_payload(format, &raw) {
                        Some(payload) => GenerationOutcome::success(payload),
                        None => GenerationOutcome::failure(
                            FailureReason::Remote,
                            "Generation failed, please retry.",
                        ),
                    },
                    Err(e) => {
                        GenerationOutcome::failure(FailureReason::Remote, e.kind.user_message())
                    }
                }
            }
        }
    }
}
