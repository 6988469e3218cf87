//! Validation orchestration
//!
//! Fans one job out per (host, protocol) pair, resolves the credential,
//! drives the matching authenticator with the retry policy, and funnels
//! every completed attempt into the aggregator. Jobs run independently
//! under a concurrency bound; one host's failure never touches another's.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};

use crate::credentials::{AuthMethod, CredentialMode, CredentialResolver};
use crate::scope::{Category, Host};
use crate::validation::aggregator::ResultAggregator;
use crate::validation::authenticator::Authenticator;
use crate::validation::results::{Outcome, Protocol, ValidationAttempt, ValidationResult};
use crate::validation::MISSING_CREDENTIALS_DETAIL;

/// Upfront configuration for one validation run
#[derive(Debug, Clone)]
pub struct ValidationPlan {
    pub auth_method: AuthMethod,
    pub cred_mode: CredentialMode,
    pub timeout: Duration,
    pub max_concurrency: usize,
    /// Extra attempts after a transient failure (timeout/refused/unreachable)
    pub retry_limit: u32,
}

impl Default for ValidationPlan {
    fn default() -> Self {
        Self {
            auth_method: AuthMethod::Password,
            cred_mode: CredentialMode::SharedPerCategory,
            timeout: Duration::from_secs(5),
            max_concurrency: 10,
            retry_limit: 1,
        }
    }
}

/// Cooperative cancellation: stops new dispatches, lets in-flight attempts
/// finish (each is already bounded by the per-attempt timeout).
#[derive(Debug, Default, Clone)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Protocols attempted for a category: Linux -> SSH, Windows -> SMB,
/// Others -> both, independently of each other's outcome.
pub fn protocols_for(category: Category) -> &'static [Protocol] {
    match category {
        Category::Linux => &[Protocol::Ssh],
        Category::Windows => &[Protocol::Smb],
        Category::Other => &[Protocol::Ssh, Protocol::Smb],
    }
}

pub struct Orchestrator {
    resolver: CredentialResolver,
    ssh: Arc<dyn Authenticator>,
    smb: Arc<dyn Authenticator>,
}

impl Orchestrator {
    pub fn new(
        resolver: CredentialResolver,
        ssh: Arc<dyn Authenticator>,
        smb: Arc<dyn Authenticator>,
    ) -> Self {
        Self { resolver, ssh, smb }
    }

    /// Run the whole scope. Always completes and always returns exactly one
    /// result per dispatched (host, protocol) pair.
    pub async fn run(
        &self,
        hosts: &[Host],
        plan: &ValidationPlan,
        cancel: &CancelToken,
    ) -> Vec<ValidationResult> {
        let aggregator = ResultAggregator::new();
        let pairs: Vec<(&Host, Protocol)> = hosts
            .iter()
            .flat_map(|host| {
                protocols_for(host.category)
                    .iter()
                    .map(move |&protocol| (host, protocol))
            })
            .collect();

        info!(
            "Validating {} (host, protocol) pairs across {} hosts \
             ({} auth, {} credentials, timeout {:?}, {} workers)",
            pairs.len(),
            hosts.len(),
            plan.auth_method,
            plan.cred_mode,
            plan.timeout,
            plan.max_concurrency
        );

        stream::iter(pairs)
            .map(|(host, protocol)| {
                let aggregator = aggregator.clone();
                async move {
                    self.validate_pair(host, protocol, plan, cancel, &aggregator)
                        .await;
                }
            })
            .buffer_unordered(plan.max_concurrency.max(1))
            .collect::<Vec<()>>()
            .await;

        if cancel.is_cancelled() {
            warn!("Run cancelled; reporting results recorded so far");
        }

        aggregator.into_results().await
    }

    /// One (host, protocol) pair: resolve, attempt, retry transients, record.
    async fn validate_pair(
        &self,
        host: &Host,
        protocol: Protocol,
        plan: &ValidationPlan,
        cancel: &CancelToken,
        aggregator: &ResultAggregator,
    ) {
        if cancel.is_cancelled() {
            debug!("Skipping {} {} (run cancelled)", protocol, host.address);
            return;
        }

        let credential = match self.resolver.resolve(host, protocol, plan.cred_mode) {
            Ok(credential) => credential,
            Err(e) => {
                warn!("[!] {}: {}", host.address, e);
                let attempt = ValidationAttempt::new(
                    Outcome::UnknownError,
                    MISSING_CREDENTIALS_DETAIL,
                    Duration::ZERO,
                );
                aggregator
                    .record(ValidationResult::from_attempt(host, protocol, attempt))
                    .await;
                return;
            }
        };

        let authenticator = match protocol {
            Protocol::Ssh => &self.ssh,
            Protocol::Smb => &self.smb,
        };

        debug!("Testing {} connection to {}...", protocol, host.address);
        let mut attempt = authenticator.attempt(host, credential, plan.timeout).await;

        // Retries are sequential within the pair and only chase transient
        // failures; AuthFailed/KeyError verdicts would not change.
        let mut retries = 0;
        while attempt.outcome.is_retryable() && retries < plan.retry_limit {
            if cancel.is_cancelled() {
                break;
            }
            retries += 1;
            debug!(
                "Retrying {} {} ({}/{})",
                protocol, host.address, retries, plan.retry_limit
            );
            attempt = authenticator.attempt(host, credential, plan.timeout).await;
        }

        match attempt.outcome {
            Outcome::Success => info!(
                "[✓] {}: {} validation successful",
                host.address, protocol
            ),
            _ => info!(
                "[✗] {}: {} validation failed - {}",
                host.address, protocol, attempt.detail
            ),
        }

        aggregator
            .record(ValidationResult::from_attempt(host, protocol, attempt))
            .await;
    }
}
