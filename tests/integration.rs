//! End-to-end runs: scope + credential files on disk, through the
//! orchestrator with scripted authenticators, out to the CSV report.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use credsweep::credentials::{
    self, Credential, CredentialMode, CredentialResolver, Secret,
};
use credsweep::report;
use credsweep::scope::{self, Category, Host};
use credsweep::validation::{
    Authenticator, CancelToken, Orchestrator, Outcome, Protocol, ValidationAttempt,
    ValidationPlan,
};

/// Accepts exactly one username/password pair, rejects everything else
struct FixedCredentialAuthenticator {
    protocol: Protocol,
    accept_user: &'static str,
    accept_pass: &'static str,
}

impl FixedCredentialAuthenticator {
    fn new(protocol: Protocol, accept_user: &'static str, accept_pass: &'static str) -> Arc<Self> {
        Arc::new(Self {
            protocol,
            accept_user,
            accept_pass,
        })
    }
}

#[async_trait]
impl Authenticator for FixedCredentialAuthenticator {
    fn protocol(&self) -> Protocol {
        self.protocol
    }

    async fn attempt(
        &self,
        _host: &Host,
        credential: &Credential,
        _timeout: Duration,
    ) -> ValidationAttempt {
        let accepted = credential.username == self.accept_user
            && credential.secret == Secret::Password(self.accept_pass.to_string());
        if accepted {
            ValidationAttempt::success(Duration::from_millis(1))
        } else {
            ValidationAttempt::new(
                Outcome::AuthFailed,
                "Authentication failed (wrong credentials)",
                Duration::from_millis(1),
            )
        }
    }
}

/// Every host is down: both protocols report unreachable
struct UnreachableAuthenticator {
    protocol: Protocol,
}

#[async_trait]
impl Authenticator for UnreachableAuthenticator {
    fn protocol(&self) -> Protocol {
        self.protocol
    }

    async fn attempt(
        &self,
        _host: &Host,
        _credential: &Credential,
        _timeout: Duration,
    ) -> ValidationAttempt {
        ValidationAttempt::new(
            Outcome::NetworkUnreachable,
            "Network error: No route to host",
            Duration::from_millis(1),
        )
    }
}

fn write_file(dir: &tempfile::TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[tokio::test]
async fn shared_credentials_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let scope_path = write_file(
        &dir,
        "scope.txt",
        "Linux:\n10.0.0.1\nWindows:\n10.0.0.2\n",
    );
    let creds_path = write_file(
        &dir,
        "credentials.txt",
        "Linux:\n\"username\" \"root\"\n\"password\" \"correct\"\n\
         Windows:\n\"username\" \"admin\"\n\"password\" \"wrong\"\n",
    );
    let csv_path = dir.path().join("validation_results.csv");

    let hosts = scope::load_scope(&scope_path).unwrap();
    assert_eq!(hosts.len(), 2);

    let shared = credentials::load_shared(&creds_path).unwrap();
    let orchestrator = Orchestrator::new(
        CredentialResolver::from_shared(shared),
        FixedCredentialAuthenticator::new(Protocol::Ssh, "root", "correct"),
        FixedCredentialAuthenticator::new(Protocol::Smb, "admin", "right"),
    );

    let results = orchestrator
        .run(&hosts, &ValidationPlan::default(), &CancelToken::new())
        .await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].category, Category::Linux);
    assert_eq!(results[0].address, "10.0.0.1");
    assert_eq!(results[0].protocol, Protocol::Ssh);
    assert_eq!(results[0].outcome, Outcome::Success);

    assert_eq!(results[1].category, Category::Windows);
    assert_eq!(results[1].address, "10.0.0.2");
    assert_eq!(results[1].protocol, Protocol::Smb);
    assert_eq!(results[1].outcome, Outcome::AuthFailed);

    report::write_results(&csv_path, &results).unwrap();
    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "System Type,IP Address,Protocol,Status,Details");
    assert_eq!(lines[1], "Linux,10.0.0.1,SSH,Success,Success");
    assert_eq!(
        lines[2],
        "Windows,10.0.0.2,SMB,Failed,Authentication failed (wrong credentials)"
    );
}

#[tokio::test]
async fn unreachable_other_host_produces_two_failed_results_after_retries() {
    let dir = tempfile::tempdir().unwrap();
    let scope_path = write_file(&dir, "scope.txt", "Others:\n10.0.0.3\n");
    let creds_path = write_file(
        &dir,
        "credentials.txt",
        "Others:\n\"username\" \"svc\"\n\"password\" \"pw\"\n",
    );

    let hosts = scope::load_scope(&scope_path).unwrap();
    let shared = credentials::load_shared(&creds_path).unwrap();
    let orchestrator = Orchestrator::new(
        CredentialResolver::from_shared(shared),
        Arc::new(UnreachableAuthenticator {
            protocol: Protocol::Ssh,
        }),
        Arc::new(UnreachableAuthenticator {
            protocol: Protocol::Smb,
        }),
    );

    let results = orchestrator
        .run(&hosts, &ValidationPlan::default(), &CancelToken::new())
        .await;

    assert_eq!(results.len(), 2);
    assert!(results
        .iter()
        .all(|r| r.outcome == Outcome::NetworkUnreachable));
    let protocols: Vec<Protocol> = results.iter().map(|r| r.protocol).collect();
    assert_eq!(protocols, vec![Protocol::Ssh, Protocol::Smb]);
}

#[tokio::test]
async fn per_host_mode_records_missing_credentials_without_dispatch() {
    let dir = tempfile::tempdir().unwrap();
    let scope_path = write_file(
        &dir,
        "scope.txt",
        "Linux:\n10.0.0.1\n10.0.0.9\n",
    );
    let ssh_creds_path = write_file(&dir, "ssh_creds.txt", "10.0.0.1:\"root\":\"correct\"\n");

    let hosts = scope::load_scope(&scope_path).unwrap();
    let per_host_ssh = credentials::load_per_host(&ssh_creds_path).unwrap();
    let orchestrator = Orchestrator::new(
        CredentialResolver::from_per_host(per_host_ssh, Default::default()),
        FixedCredentialAuthenticator::new(Protocol::Ssh, "root", "correct"),
        FixedCredentialAuthenticator::new(Protocol::Smb, "admin", "pw"),
    );

    let plan = ValidationPlan {
        cred_mode: CredentialMode::PerHostOverride,
        ..Default::default()
    };
    let results = orchestrator.run(&hosts, &plan, &CancelToken::new()).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].address, "10.0.0.1");
    assert_eq!(results[0].outcome, Outcome::Success);
    assert_eq!(results[1].address, "10.0.0.9");
    assert_eq!(results[1].outcome, Outcome::UnknownError);
    assert_eq!(results[1].detail, "Missing credentials");
}
