//! Generation request pipeline.
//!
//! A submission moves through validation, prompt building, a daily quota
//! slot, an optional credit reservation and either a local transform or a
//! remote call wrapped in the retry policy. Quota and credits taken up front
//! are handed back when the submission fails. Every submission ends in exactly one
//! [`GenerationOutcome`]; `submit` itself never fails.

use crate::{
    Session, SubmissionTracker, ToolCatalog, ToolSpec, UsageRecorder, finish_payload,
    validate_request,
};
use derive_getters::Getters;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use toolsmith_core::{
    Dispatch, FailureReason, GenerationOutcome, GenerationRequest, ImagePayload, RemoteCall,
    RemoteMode,
};
use toolsmith_error::{RemoteError, RetryableError};
use toolsmith_interface::{CreditLedger, GenerationDriver};
use toolsmith_retry::{RetryConfig, Sleeper, TokioSleeper, retry_with_sleeper};
use tracing::{Span, debug, error, info, instrument, warn};
use typed_builder::TypedBuilder;

/// Stage a submission passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
pub enum PipelineStage {
    /// Inputs checked against the tool's fields.
    Validating,
    /// Template turned inputs into a dispatch.
    PromptBuilding,
    /// Local transform running.
    LocalExecuting,
    /// Remote generation running, including retries.
    RemoteExecuting,
    /// Terminal success.
    Succeeded,
    /// Terminal failure.
    Failed,
}

/// Result of one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct Submission {
    /// Position in submission order, starting at 1
    sequence: u64,
    /// Tool the request targeted
    tool_id: String,
    /// Terminal outcome
    outcome: GenerationOutcome,
    /// Stages visited, in order
    stages: Vec<PipelineStage>,
}

impl Submission {
    /// Consumes the submission, returning its outcome.
    pub fn into_outcome(self) -> GenerationOutcome {
        self.outcome
    }
}

/// Pipeline tuning.
#[derive(Debug, Clone, Default, TypedBuilder)]
pub struct PipelineConfig {
    /// Backoff for remote calls
    #[builder(default)]
    pub retry: RetryConfig,
    /// Pause before running a local transform
    #[builder(default)]
    pub local_ux_delay: Duration,
}

/// Runs generation requests against a tool catalog.
///
/// Shareable across tasks; concurrent submissions are ordered by the
/// [`SubmissionTracker`].
#[derive(TypedBuilder)]
pub struct GenerationPipeline {
    driver: Arc<dyn GenerationDriver>,
    #[builder(default = Arc::new(ToolCatalog::builtin()))]
    catalog: Arc<ToolCatalog>,
    #[builder(default, setter(strip_option))]
    ledger: Option<Arc<dyn CreditLedger>>,
    #[builder(default, setter(strip_option))]
    usage: Option<UsageRecorder>,
    #[builder(default = Arc::new(TokioSleeper))]
    sleeper: Arc<dyn Sleeper>,
    #[builder(default)]
    tracker: Arc<SubmissionTracker>,
    #[builder(default)]
    config: PipelineConfig,
}

impl std::fmt::Debug for GenerationPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationPipeline")
            .field("provider", &self.driver.provider_name())
            .field("model", &self.driver.model_name())
            .field("tools", &self.catalog.len())
            .field("charges_credits", &self.ledger.is_some())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

struct Reservation<'a> {
    account: &'a str,
    amount: u32,
}

impl GenerationPipeline {
    /// Tools this pipeline serves.
    pub fn catalog(&self) -> &ToolCatalog {
        &self.catalog
    }

    /// Sequence tracker; share it with a [`crate::LatestResult`].
    pub fn tracker(&self) -> Arc<SubmissionTracker> {
        Arc::clone(&self.tracker)
    }

    /// Usage recorder, if configured.
    pub fn usage(&self) -> Option<&UsageRecorder> {
        self.usage.as_ref()
    }

    /// Runs one request to its terminal outcome.
    #[instrument(
        skip_all,
        fields(tool = %request.tool_id(), session = %session.id(), sequence = tracing::field::Empty)
    )]
    pub async fn submit(&self, session: &Session, request: GenerationRequest) -> Submission {
        let sequence = self.tracker.next();
        Span::current().record("sequence", sequence);

        let mut stages = Vec::with_capacity(4);
        let outcome = self.run(session, &request, sequence, &mut stages).await;

        match &outcome {
            GenerationOutcome::Success { .. } => {
                stages.push(PipelineStage::Succeeded);
                info!("Submission succeeded");
            }
            GenerationOutcome::Failure { reason, message } => {
                stages.push(PipelineStage::Failed);
                info!(%reason, message = %message, "Submission failed");
            }
        }

        Submission {
            sequence,
            tool_id: request.tool_id().to_string(),
            outcome,
            stages,
        }
    }

    async fn run(
        &self,
        session: &Session,
        request: &GenerationRequest,
        sequence: u64,
        stages: &mut Vec<PipelineStage>,
    ) -> GenerationOutcome {
        stages.push(PipelineStage::Validating);
        let Some(tool) = self.catalog.get(request.tool_id()) else {
            return GenerationOutcome::failure(
                FailureReason::Validation,
                format!("Unknown tool: {}", request.tool_id()),
            );
        };
        if let Err(e) = validate_request(tool, request) {
            debug!(error = %e, "Validation failed");
            return GenerationOutcome::failure(FailureReason::Validation, e.message);
        }

        stages.push(PipelineStage::PromptBuilding);
        let dispatch = match tool.build(request.inputs(), request.image().as_ref()) {
            Ok(dispatch) => dispatch,
            Err(e) => {
                warn!(error = %e, "Template rejected inputs");
                return GenerationOutcome::failure(FailureReason::Config, e.message);
            }
        };

        let quota = match session.state() {
            Some(state) => match state.reserve_use().await {
                Ok(slot) => {
                    debug!(used_today = slot.used, "Quota slot reserved");
                    Some((state, slot))
                }
                Err(e) => {
                    debug!(error = %e, "Daily quota exhausted");
                    return GenerationOutcome::failure(
                        FailureReason::Credits,
                        e.kind().user_message(),
                    );
                }
            },
            None => None,
        };

        let reservation = match self.reserve(session.account(), *tool.credit_cost()).await {
            Ok(reservation) => reservation,
            Err(message) => {
                if let Some((state, slot)) = quota {
                    state.release_use(slot).await;
                }
                return GenerationOutcome::failure(FailureReason::Credits, message);
            }
        };

        let outcome = match dispatch {
            Dispatch::Local { command, params } => {
                stages.push(PipelineStage::LocalExecuting);
                self.run_local(&command, &params).await
            }
            Dispatch::Remote { prompt, mode } => {
                stages.push(PipelineStage::RemoteExecuting);
                self.run_remote(tool, prompt, mode, request.image().as_ref())
                    .await
            }
        };

        match &outcome {
            GenerationOutcome::Success { .. } => {
                if let Some(usage) = &self.usage {
                    usage.record(session.id(), sequence, tool.id()).await;
                }
            }
            GenerationOutcome::Failure { .. } => {
                if let Some((state, slot)) = quota {
                    state.release_use(slot).await;
                }
                if let Some(reservation) = reservation {
                    self.refund(reservation).await;
                }
            }
        }
        outcome
    }

    async fn reserve<'a>(
        &self,
        account: &'a str,
        cost: u32,
    ) -> Result<Option<Reservation<'a>>, String> {
        let Some(ledger) = self.ledger.as_ref().filter(|_| cost > 0) else {
            return Ok(None);
        };
        match ledger.reserve(account, cost).await {
            Ok(remaining) => {
                debug!(account, cost, remaining, "Credits reserved");
                Ok(Some(Reservation {
                    account,
                    amount: cost,
                }))
            }
            Err(e) => {
                warn!(account, cost, error = %e, "Credit reservation failed");
                Err(e.kind().user_message())
            }
        }
    }

    async fn refund(&self, reservation: Reservation<'_>) {
        let Some(ledger) = self.ledger.as_ref() else {
            return;
        };
        match ledger.refund(reservation.account, reservation.amount).await {
            Ok(balance) => debug!(
                account = reservation.account,
                amount = reservation.amount,
                balance,
                "Credits refunded"
            ),
            Err(e) => error!(
                account = reservation.account,
                amount = reservation.amount,
                error = %e,
                "Credit refund failed"
            ),
        }
    }

    async fn run_local(&self, command: &str, params: &[String]) -> GenerationOutcome {
        if !self.config.local_ux_delay.is_zero() {
            tokio::time::sleep(self.config.local_ux_delay).await;
        }
        debug!(command, params = params.len(), "Running local transform");
        GenerationOutcome::success(toolsmith_transform::execute(command, params))
    }

    async fn run_remote(
        &self,
        tool: &ToolSpec,
        prompt: String,
        mode: RemoteMode,
        image: Option<&ImagePayload>,
    ) -> GenerationOutcome {
        let image = match mode {
            RemoteMode::AnalyzeImage => image.cloned(),
            _ => None,
        };
        let call = RemoteCall::new(prompt, mode, image);
        let call = &call;
        let driver = &self.driver;
        debug!(
            provider = driver.provider_name(),
            model = driver.model_name(),
            %mode,
            "Calling remote generation"
        );

        let result = retry_with_sleeper(
            &self.config.retry,
            self.sleeper.as_ref(),
            |e: &RemoteError| e.is_retryable(),
            || driver.generate(call),
        )
        .await;

        match result {
            Ok(raw) => match finish_payload(*tool.output_format(), &raw) {
                Some(payload) => GenerationOutcome::success(payload),
                None => {
                    warn!("Remote generation returned an empty payload");
                    GenerationOutcome::failure(
                        FailureReason::Remote,
                        "Generation failed, please retry.",
                    )
                }
            },
            Err(e) => {
                error!(error = %e, "Remote generation failed");
                GenerationOutcome::failure(FailureReason::Remote, e.kind.user_message())
            }
        }
    }
}
