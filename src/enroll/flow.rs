//! Enrollment flow
//!
//! Load the trust store, run one capturing handshake, and if the server is
//! not yet trusted let the operator pick a certificate from the captured
//! chain to add to the store.

use crate::checks::{strict_verifier, HandshakeChecker, HandshakeStatus};
use crate::config::Settings;
use crate::enroll::selection::{parse_selection, Selection};
use crate::models::ConnectionTarget;
use crate::output::{format_certificate_details, format_chain_listing, Operator};
use crate::store::{self, TrustStore};
use crate::utils::{Result, ToolkitError};
use rustls::client::danger::ServerCertVerifier;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

const SELECTION_PROMPT: &str = "Enter certificate to add to trusted keystore or 'q' to quit";
const NOT_CHANGED: &str = "KeyStore not changed";

/// Stage of an enrollment run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    LoadingStore,
    Connecting,
    AlreadyTrusted,
    AwaitingSelection,
    Persisting,
    Done,
    Failed,
}

impl Stage {
    /// Whether the flow may move from `self` to `next`
    pub fn can_advance_to(self, next: Stage) -> bool {
        use Stage::*;
        match (self, next) {
            (Done | Failed, _) => false,
            (_, Failed) => true,
            (LoadingStore, Connecting) => true,
            (Connecting, AlreadyTrusted | AwaitingSelection | Done) => true,
            (AlreadyTrusted, Done) => true,
            (AwaitingSelection, Persisting | Done) => true,
            (Persisting, Done) => true,
            _ => false,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::LoadingStore => "loading store",
            Stage::Connecting => "connecting",
            Stage::AlreadyTrusted => "already trusted",
            Stage::AwaitingSelection => "awaiting selection",
            Stage::Persisting => "persisting",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// How a successful run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentOutcome {
    /// The strict verifier already accepts the server; nothing written
    AlreadyTrusted,
    /// The handshake failed before the server presented a chain
    NoChainCaptured,
    /// The operator quit or gave an unusable answer; nothing written
    NotChanged { reason: String },
    /// A certificate was added and the store written to `path`
    Enrolled {
        alias: String,
        path: PathBuf,
        replaced: bool,
    },
}

impl EnrollmentOutcome {
    pub fn store_changed(&self) -> bool {
        matches!(self, EnrollmentOutcome::Enrolled { .. })
    }
}

/// One enrollment run against a single target
pub struct EnrollmentFlow<O> {
    settings: Settings,
    target: ConnectionTarget,
    operator: O,
    checker: HandshakeChecker,
    stage: Stage,
}

impl<O: Operator> EnrollmentFlow<O> {
    pub fn new(settings: Settings, target: ConnectionTarget, operator: O) -> Self {
        let checker = HandshakeChecker::new(settings.tls.clone());
        Self {
            settings,
            target,
            operator,
            checker,
            stage: Stage::LoadingStore,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn operator(&self) -> &O {
        &self.operator
    }

    /// Locate and load the configured store, then enroll against it
    pub async fn run(&mut self) -> Result<EnrollmentOutcome> {
        let result = self.load_and_enroll().await;
        self.finish(result)
    }

    /// Enroll into an already loaded `store`, trusting what `strict` trusts
    pub async fn run_with(
        &mut self,
        store: &mut TrustStore,
        strict: Arc<dyn ServerCertVerifier>,
    ) -> Result<EnrollmentOutcome> {
        let result = self.enroll(store, strict).await;
        self.finish(result)
    }

    fn finish(&mut self, result: Result<EnrollmentOutcome>) -> Result<EnrollmentOutcome> {
        match &result {
            Ok(outcome) => tracing::debug!("Enrollment finished: {:?}", outcome),
            Err(e) => {
                tracing::debug!("Enrollment failed in stage {}: {}", self.stage, e);
                self.stage = Stage::Failed;
            }
        }
        result
    }

    fn advance(&mut self, next: Stage) -> Result<()> {
        if !self.stage.can_advance_to(next) {
            tracing::error!("Invalid enrollment transition {} -> {}", self.stage, next);
            return Err(ToolkitError::InvalidTransition {
                from: self.stage.to_string(),
                to: next.to_string(),
            });
        }
        tracing::debug!("Enrollment stage {} -> {}", self.stage, next);
        self.stage = next;
        Ok(())
    }

    async fn load_and_enroll(&mut self) -> Result<EnrollmentOutcome> {
        if self.stage != Stage::LoadingStore {
            return Err(ToolkitError::InvalidTransition {
                from: self.stage.to_string(),
                to: Stage::LoadingStore.to_string(),
            });
        }

        let path = store::locate(&self.settings.store)?;
        self.operator
            .progress(&format!("Loading KeyStore {}...", path.display()));
        let mut store = TrustStore::load(&path, &self.settings.store.passphrase)?;
        let strict = strict_verifier(&store, self.checker.provider())?;

        self.enroll(&mut store, strict).await
    }

    async fn enroll(
        &mut self,
        store: &mut TrustStore,
        strict: Arc<dyn ServerCertVerifier>,
    ) -> Result<EnrollmentOutcome> {
        self.advance(Stage::Connecting)?;
        self.operator
            .progress(&format!("Opening connection to {}...", self.target));
        self.operator.progress("Starting SSL handshake...");

        let report = self.checker.check(&self.target, strict).await?;

        if let HandshakeStatus::NeedsEnrollment { error } = &report.status {
            self.operator.warning(&error.to_string());
        } else {
            self.advance(Stage::AlreadyTrusted)?;
            self.operator
                .success("No errors, certificate is already trusted");
            self.advance(Stage::Done)?;
            return Ok(EnrollmentOutcome::AlreadyTrusted);
        }

        let chain = report.chain;
        if chain.is_empty() {
            self.operator
                .failure("Could not obtain server certificate chain");
            self.advance(Stage::Done)?;
            return Ok(EnrollmentOutcome::NoChainCaptured);
        }

        self.advance(Stage::AwaitingSelection)?;
        self.operator.line("");
        self.operator
            .line(&format!("Server sent {} certificate(s):", chain.len()));
        self.operator.line("");
        for line in format_chain_listing(&chain, &self.settings.fingerprint.algorithms) {
            self.operator.line(&line);
        }

        let answer = self.operator.ask(SELECTION_PROMPT, "1")?;
        let index = match parse_selection(answer.as_deref(), chain.len()) {
            Selection::Index(index) => index,
            Selection::Quit => {
                self.operator.line(NOT_CHANGED);
                self.advance(Stage::Done)?;
                return Ok(EnrollmentOutcome::NotChanged {
                    reason: "aborted by operator".to_string(),
                });
            }
            Selection::Invalid { reason } => {
                self.operator.warning(&reason);
                self.operator.line(NOT_CHANGED);
                self.advance(Stage::Done)?;
                return Ok(EnrollmentOutcome::NotChanged { reason });
            }
        };
        let Some(cert) = chain.get(index) else {
            self.operator.line(NOT_CHANGED);
            self.advance(Stage::Done)?;
            return Ok(EnrollmentOutcome::NotChanged {
                reason: format!("no certificate at position {}", index + 1),
            });
        };

        self.advance(Stage::Persisting)?;
        let alias = self.target.alias_for(index);
        let previous = store.insert(&alias, cert)?;
        if previous.as_deref().is_some_and(|old| old != cert.der()) {
            self.operator.warning(&format!(
                "Replacing a different certificate stored under alias '{}'",
                alias
            ));
        }

        let output = self.settings.store.output.clone();
        store.persist(&output, &self.settings.store.passphrase)?;

        self.operator.line("");
        for line in format_certificate_details(cert) {
            self.operator.line(&line);
        }
        self.operator.line("");
        self.operator.success(&format!(
            "Added certificate to keystore '{}' using alias '{}'",
            output.display(),
            alias
        ));
        tracing::info!("Enrolled {} as '{}' in {}", cert.subject, alias, output.display());

        self.advance(Stage::Done)?;
        Ok(EnrollmentOutcome::Enrolled {
            alias,
            path: output,
            replaced: previous.is_some(),
        })
    }
}
