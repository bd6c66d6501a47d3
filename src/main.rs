//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `dns_diagnostic` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - JSON output on stdout
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use dns_diagnostic::config::Opt;
use dns_diagnostic::initialization::init_logger_with;
use dns_diagnostic::security::check_whois_name;
use dns_diagnostic::{diagnose, trace, DiagnosticRequest, ResolverClient, Rules};

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();
    let config = opt.config();

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    if let Err(e) = run(&opt).await {
        eprintln!("dns_diagnostic error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}

async fn run(opt: &Opt) -> Result<()> {
    let config = opt.config();
    let client = ResolverClient::from_settings(config.resolver.clone())
        .context("Failed to initialize DNS resolver")?;

    let output = match opt.trace {
        Some(record_type) => {
            let domain = dns_diagnostic::domain::normalize_domain(&opt.domain);
            let domain = check_whois_name(&domain)
                .with_context(|| format!("Invalid target domain: {}", opt.domain))?;
            let report = trace(&client, &domain, record_type).await;
            serde_json::to_string_pretty(&report)?
        }
        None => {
            let rules = Rules::load(config.rules_path.as_deref()).context("Failed to load rules")?;
            let request = DiagnosticRequest {
                include_www: config.include_www,
                ..DiagnosticRequest::new(opt.domain.clone(), opt.platform.clone())
            }
            .with_intent(opt.intent());
            let plan = diagnose(&client, &rules, &request).await?;
            serde_json::to_string_pretty(&plan)?
        }
    };

    println!("{}", output);
    Ok(())
}
