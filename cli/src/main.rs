//! CLI entrypoint for podium
//!
//! Wires the layers together with dependency injection and drives a
//! debate session from the terminal.

mod console;

use anyhow::{Result, bail};
use clap::Parser;
use console::ConsoleObserver;
use podium_application::{
    AudioOutput, AudioSequencer, DebateOrchestrator, NullAudioOutput, ResumeCache, RoleAssignment,
    StepOutcome, try_resume,
};
use podium_domain::{Role, SessionId, Stage};
use podium_infrastructure::config::file_config::DebateConfig;
use podium_infrastructure::{ConfigLoader, FileResumeCache, HttpDebateBackend, RodioAudioOutput};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "podium", about = "Turn-based multi-agent debate orchestrator")]
struct Cli {
    /// Topic for a new debate session
    #[arg(short, long)]
    topic: Option<String>,

    /// Load a specific session id
    #[arg(long)]
    session: Option<String>,

    /// Resume the most recent session
    #[arg(long)]
    resume: bool,

    /// Backend base URL (overrides config)
    #[arg(long)]
    backend_url: Option<String>,

    /// Speech language (overrides config)
    #[arg(long)]
    language: Option<String>,

    /// Disable audio playback
    #[arg(long)]
    no_audio: bool,

    /// Print the models' reasoning stream as well
    #[arg(long)]
    show_thinking: bool,

    /// Path to a config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?;
    let backend_url = cli.backend_url.unwrap_or(config.backend.url);
    let language = cli.language.unwrap_or(config.debate.language.clone());

    // === Dependency injection ===
    let backend = Arc::new(HttpDebateBackend::new(&backend_url));

    let output: Arc<dyn AudioOutput> = if cli.no_audio || !config.audio.enabled {
        Arc::new(NullAudioOutput)
    } else {
        match RodioAudioOutput::new() {
            Ok(output) => Arc::new(output),
            Err(e) => {
                warn!("Audio unavailable, continuing silent: {}", e);
                Arc::new(NullAudioOutput)
            }
        }
    };
    let sequencer = Arc::new(AudioSequencer::new(output));

    let cache: Option<Arc<dyn ResumeCache>> = FileResumeCache::at_default_path().map(|cache| {
        Arc::new(
            cache
                .with_max_entries(config.resume.max_entries)
                .with_horizons(
                    chrono::Duration::days(config.resume.recent_horizon_days),
                    chrono::Duration::hours(config.resume.current_horizon_hours),
                ),
        ) as Arc<dyn ResumeCache>
    });

    let token = CancellationToken::new();
    let observer = Arc::new(ConsoleObserver::new().with_thinking(cli.show_thinking));
    let mut orchestrator = DebateOrchestrator::new(backend, sequencer)
        .with_observer(observer)
        .with_language(language)
        .with_cancellation(token.clone());
    if let Some(cache) = &cache {
        orchestrator = orchestrator.with_resume_cache(Arc::clone(cache));
    }
    let orchestrator = Arc::new(orchestrator);

    // Ctrl-C tears down streams and audio, then the run loop stops at
    // its next cancellation check.
    {
        let orchestrator = Arc::clone(&orchestrator);
        let token = token.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt: aborting streams");
                token.cancel();
                orchestrator.abort_all_streams();
            }
        });
    }

    // === Session establishment ===
    if let Some(id) = &cli.session {
        orchestrator.load_session(&SessionId::from(id.as_str())).await?;
    } else if cli.resume {
        let Some(cache) = &cache else {
            bail!("No cache directory available on this platform");
        };
        if try_resume(&orchestrator, cache.as_ref()).await.is_none() {
            bail!("Nothing to resume. Start a new debate with --topic.");
        }
    } else if let Some(topic) = &cli.topic {
        let assignments = default_assignments(&config.debate);
        let id = orchestrator.create_session(topic, &assignments).await?;
        println!("Session {} created.", id);
    } else {
        bail!("Provide --topic to start a debate, --resume, or --session <id>.");
    }

    println!("Topic: {}", orchestrator.topic().unwrap_or_default());

    // === Run loop ===
    // The scheduler drives everything except the coin toss, which is an
    // explicit client operation once the session reaches that stage.
    loop {
        if let Some(session) = orchestrator.session()
            && session.current_stage == Stage::CoinToss
            && session.coin_toss.is_none()
        {
            orchestrator.coin_toss().await?;
            if let Some(result) = orchestrator.session().and_then(|s| s.coin_toss) {
                println!("Coin toss: {:?} side speaks first.", result.first_side);
            }
        }

        match orchestrator.step().await {
            Ok(StepOutcome::Complete) => break,
            Ok(StepOutcome::Cancelled) => {
                println!("\nInterrupted.");
                break;
            }
            Ok(_) => {}
            Err(e) if token.is_cancelled() => {
                info!("Stopped after interrupt: {}", e);
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    orchestrator.abort_all_streams();
    Ok(())
}

fn default_assignments(debate: &DebateConfig) -> Vec<RoleAssignment> {
    vec![
        RoleAssignment::ai(Role::Affirmative1, "Affirmative Lead", &debate.affirmative_model),
        RoleAssignment::ai(Role::Affirmative2, "Affirmative Second", &debate.affirmative_model),
        RoleAssignment::ai(Role::Negative1, "Negative Lead", &debate.negative_model),
        RoleAssignment::ai(Role::Negative2, "Negative Second", &debate.negative_model),
        RoleAssignment::ai(Role::Judge, "Judge", &debate.judge_model),
    ]
}
