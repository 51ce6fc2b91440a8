use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use mediquery::utils::{logger, validation::Validate};
use mediquery::{
    render, AskEngine, CliConfig, HttpAnswerService, MediqueryError, QueryStatus, Session,
    Settings,
};
use std::io::Write;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Searching medical sources...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Submit the session's question and print the settled outcome.
/// Returns false when the backend call failed.
async fn ask_and_print(
    engine: &AskEngine<HttpAnswerService>,
    session: &mut Session,
    settings: &Settings,
) -> Result<bool, MediqueryError> {
    let pb = spinner();
    let status = engine.submit(session).await;
    pb.finish_and_clear();

    match status? {
        QueryStatus::Success(result) => match render(result, &settings.render) {
            Ok(out) => {
                println!("{}", out);
                Ok(true)
            }
            Err(e) => {
                tracing::error!("❌ Render failed: {}", e);
                eprintln!("❌ {}", e.user_friendly_message().red());
                eprintln!("💡 {}", e.recovery_suggestion());
                Ok(false)
            }
        },
        QueryStatus::Failure(message) => {
            eprintln!("❌ {}", message.red());
            Ok(false)
        }
        QueryStatus::Idle | QueryStatus::Pending { .. } => Ok(false),
    }
}

async fn interactive(
    engine: &AskEngine<HttpAnswerService>,
    settings: &Settings,
) -> Result<(), MediqueryError> {
    let mut session = Session::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        eprint!("{} ", "question>".green().bold());
        std::io::stderr().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        session.set_question(line);
        if !session.can_submit() {
            continue;
        }
        ask_and_print(engine, &mut session, settings).await?;
    }

    Ok(())
}

fn fail(e: &MediqueryError) -> ! {
    tracing::error!("❌ {} (Severity: {:?})", e, e.severity());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    let settings = match cli.to_settings() {
        Ok(settings) => settings,
        Err(e) => fail(&e),
    };

    if settings.log_json {
        logger::init_json_logger(settings.verbose);
    } else {
        logger::init_cli_logger(settings.verbose);
    }
    if !settings.color {
        colored::control::set_override(false);
    }

    tracing::debug!("Effective settings: {:?}", settings);

    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }

    let service = match HttpAnswerService::new(&settings) {
        Ok(service) => service,
        Err(e) => fail(&e),
    };
    tracing::info!("Using answer service at {}", service.endpoint());
    let engine = AskEngine::new(service);

    let question = cli.question_text();
    if cli.interactive || question.is_none() {
        if let Err(e) = interactive(&engine, &settings).await {
            fail(&e);
        }
        return Ok(());
    }

    let mut session = Session::new();
    session.set_question(question.unwrap_or_default());
    match ask_and_print(&engine, &mut session, &settings).await {
        Ok(true) => Ok(()),
        Ok(false) => std::process::exit(2),
        Err(e) => fail(&e),
    }
}
