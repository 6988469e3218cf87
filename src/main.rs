//! credsweep - Entry Point
//!
//! Pre-scan credential validator: checks SSH and SMB credentials against a
//! categorized scope and writes a console + CSV report.

use std::process;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};

use credsweep::cli::Args;
use credsweep::config::Settings;
use credsweep::credentials::{
    self, AuthMethod, CredentialMode, CredentialResolver, HostCredentials,
};
use credsweep::error::ValidatorError;
use credsweep::protocol::{SmbAuthenticator, SshAuthenticator};
use credsweep::report;
use credsweep::scope;
use credsweep::validation::{CancelToken, Orchestrator, ValidationPlan};

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        error!("{}", e);
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), ValidatorError> {
    let settings = Settings::load()?;

    let auth_method = AuthMethod::from(args.auth_method);
    let cred_mode = CredentialMode::from(args.cred_mode);
    let scope_file = args.scope.unwrap_or_else(|| settings.scope_file.clone());
    let results_file = args.output.unwrap_or_else(|| settings.results_file.clone());

    info!("Parsing configuration files");
    let hosts = scope::load_scope(&scope_file)?;

    let resolver = match cred_mode {
        CredentialMode::SharedPerCategory => {
            let credentials_file = args
                .credentials
                .unwrap_or_else(|| settings.credentials_file.clone());
            let mut shared = credentials::load_shared(&credentials_file)?;
            if auth_method == AuthMethod::Key {
                let key_dir = args.key_dir.unwrap_or_else(|| settings.key_dir.clone());
                credentials::apply_key_directory(&mut shared, &key_dir)?;
            }
            CredentialResolver::from_shared(shared)
        }
        CredentialMode::PerHostOverride => {
            let ssh_creds_file = args
                .ssh_creds
                .unwrap_or_else(|| settings.ssh_creds_file.clone());
            let smb_creds_file = args
                .smb_creds
                .unwrap_or_else(|| settings.smb_creds_file.clone());
            let per_host_ssh = credentials::load_per_host(&ssh_creds_file)?;
            // SMB overrides are optional: SSH-only scopes are common
            let per_host_smb = match credentials::load_per_host(&smb_creds_file) {
                Ok(creds) => creds,
                Err(credsweep::error::CredentialError::FileNotFound(_)) => {
                    HostCredentials::new()
                }
                Err(e) => return Err(e.into()),
            };
            CredentialResolver::from_per_host(per_host_ssh, per_host_smb)
        }
    };

    let plan = ValidationPlan {
        auth_method,
        cred_mode,
        timeout: args
            .timeout
            .map(std::time::Duration::from_secs)
            .unwrap_or_else(|| settings.timeout()),
        max_concurrency: args.concurrency.unwrap_or(settings.max_concurrency),
        retry_limit: settings.retry_limit,
    };

    let cancel = CancelToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received, finishing in-flight attempts");
            ctrl_c_cancel.cancel();
        }
    });

    let orchestrator = Orchestrator::new(
        resolver,
        Arc::new(SshAuthenticator::new(settings.ssh_port)),
        Arc::new(SmbAuthenticator::new(settings.smb_port)),
    );
    let results = orchestrator.run(&hosts, &plan, &cancel).await;

    report::print_results(&results);
    report::print_statistics(&results);
    report::write_results(&results_file, &results)?;

    println!(
        "\nValidation complete! Results saved to {}",
        results_file.display()
    );
    Ok(())
}
