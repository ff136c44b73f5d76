//! `gatecheck` - CLI for the vehicle inspection capture engine
//!
//! This binary answers and submits inspection questionnaires against the
//! backend, and lists previously submitted records.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context as _};
use chrono::NaiveDate;
use clap::Parser;

use gatecheck::cli::{
    CatalogCommand, Cli, Command, ConfigCommand, RecordsCommand, SubmitCommand, ValidateCommand,
};
use gatecheck::context::FixedLocation;
use gatecheck::notify::{LogNavigator, TracingNotifier};
use gatecheck::records::{by_date, by_staff_number, RecordsClient};
use gatecheck::submit::{Collaborators, HttpTransport};
use gatecheck::validate::{missing_answers, remarks_valid, MIN_REMARKS_CHARS};
use gatecheck::{
    init_logging, security_catalog, AnswerStore, Config, FormSession, StaffIdentity,
    SubmitOutcome, SubmitPipeline, SystemClock,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Catalog(catalog_cmd) => {
            handle_catalog(&catalog_cmd);
            Ok(())
        }
        Command::Validate(validate_cmd) => handle_validate(&validate_cmd),
        Command::Submit(submit_cmd) => handle_submit(&config, submit_cmd).await,
        Command::Records(records_cmd) => handle_records(&config, &records_cmd).await,
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

/// Load a draft answer file: a JSON object mapping question keys to answers.
fn load_answers(path: &Path) -> anyhow::Result<BTreeMap<String, String>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answer file {}", path.display()))?;
    let answers: BTreeMap<String, String> = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse answer file {}", path.display()))?;
    Ok(answers)
}

/// Apply a draft answer map to a store, in catalog order so prerequisites
/// land before their dependents.
fn apply_answers(store: &mut AnswerStore, answers: &BTreeMap<String, String>) -> anyhow::Result<()> {
    for key in answers.keys() {
        if store.catalog().get(key).is_none() {
            bail!("unknown question key '{key}' in answer file");
        }
    }
    let keys: Vec<String> = store
        .catalog()
        .questions()
        .iter()
        .map(|q| q.key.clone())
        .collect();
    for key in keys {
        if let Some(value) = answers.get(&key) {
            store.set(&key, value.clone())?;
        }
    }
    Ok(())
}

fn handle_catalog(cmd: &CatalogCommand) {
    let catalog = security_catalog();
    if cmd.json {
        let questions: Vec<serde_json::Value> = catalog
            .questions()
            .iter()
            .map(|q| {
                serde_json::json!({
                    "key": q.key,
                    "label": q.label,
                    "domain": q.domain.values(),
                    "dependsOn": q.depends_on,
                })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&questions).unwrap_or_default()
        );
    } else {
        println!("Security inspection questionnaire");
        println!("---------------------------------");
        for question in catalog.questions() {
            let domain = question.domain.values().join(" | ");
            match &question.depends_on {
                Some(prerequisite) => println!(
                    "{:24} {} [{domain}] (after {prerequisite})",
                    question.key, question.label
                ),
                None => println!("{:24} {} [{domain}]", question.key, question.label),
            }
        }
    }
}

fn handle_validate(cmd: &ValidateCommand) -> anyhow::Result<()> {
    let answers = load_answers(&cmd.file)?;
    let mut store = AnswerStore::new(Arc::new(security_catalog()));
    apply_answers(&mut store, &answers)?;

    let missing = missing_answers(&store);
    let remarks_ok = remarks_valid(&cmd.remarks);

    if missing.is_empty() && remarks_ok {
        println!("Form is valid and ready to submit.");
        return Ok(());
    }

    if !missing.is_empty() {
        println!("Unanswered questions:");
        for key in &missing {
            println!("  {key}");
        }
    }
    if !remarks_ok {
        println!("Remarks must exceed {MIN_REMARKS_CHARS} characters.");
    }
    bail!("form is not valid");
}

async fn handle_submit(config: &Config, cmd: SubmitCommand) -> anyhow::Result<()> {
    let answers = load_answers(&cmd.file)?;
    let mut store = AnswerStore::new(Arc::new(security_catalog()));
    apply_answers(&mut store, &answers)?;

    let client = reqwest::Client::builder()
        .timeout(config.timeout())
        .build()
        .context("failed to build HTTP client")?;
    let transport = Arc::new(HttpTransport::new(client, config.submit_url()));
    let pipeline = Arc::new(SubmitPipeline::new(transport));
    let collaborators = Collaborators {
        clock: Arc::new(SystemClock),
        location: Arc::new(FixedLocation::new(cmd.latitude, cmd.longitude)),
        notifier: Arc::new(TracingNotifier),
        navigator: Arc::new(LogNavigator),
    };

    let mut session = FormSession::with_store(
        store,
        cmd.fleet_number,
        pipeline,
        collaborators,
        config.submit.success_target.clone(),
    );
    session.set_remarks(cmd.remarks);

    if !session.can_submit() {
        let missing = missing_answers(session.answers());
        if missing.is_empty() {
            bail!("remarks must exceed {MIN_REMARKS_CHARS} characters");
        }
        bail!("unanswered questions: {}", missing.join(", "));
    }

    let identity = StaffIdentity::new(cmd.staff_number, cmd.staff_name);
    match session.submit(&identity, &cmd.token).await? {
        SubmitOutcome::Accepted => {
            println!("Form successfully submitted.");
            Ok(())
        }
        SubmitOutcome::Rejected => bail!("submission rejected by backend"),
        SubmitOutcome::Failed => bail!("submission failed, please try again later"),
        SubmitOutcome::AlreadyInFlight => bail!("a submission is already in flight"),
    }
}

async fn handle_records(config: &Config, cmd: &RecordsCommand) -> anyhow::Result<()> {
    let client = reqwest::Client::builder()
        .timeout(config.timeout())
        .build()
        .context("failed to build HTTP client")?;
    let records_client = RecordsClient::new(client, config.records_url());

    let mut records = records_client.fetch(&cmd.token).await?;
    if let Some(staff) = &cmd.staff {
        records = by_staff_number(&records, staff);
    }
    if let Some(date) = &cmd.date {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .context("date must be formatted YYYY-MM-DD")?;
        records = by_date(&records, date);
    }

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("No inspection records found.");
        return Ok(());
    }
    for record in &records {
        println!(
            "{}  {}  {}  {}",
            record.submitted_at, record.staff_number, record.fleet_number, record.remarks
        );
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Backend]");
                println!("  Base URL:       {}", config.backend.base_url);
                println!("  Submit path:    {}", config.backend.submit_path);
                println!("  Records path:   {}", config.backend.records_path);
                println!("  Timeout (s):    {}", config.backend.timeout_secs);
                println!();
                println!("[Submit]");
                println!("  Success target: {}", config.submit.success_target);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
