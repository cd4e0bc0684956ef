//! worldsim - run the simulation for the configured number of rounds.

use std::sync::Arc;

use worldsim_engine::app::{App, Collaborators, Repositories};
use worldsim_engine::infrastructure::{
    clock::{SystemClock, SystemRandom},
    config::EngineConfig,
    journal::MarkdownJournal,
    json_files::JsonRepositories,
    openai::ChatCompletionsClient,
    ports::{ClockPort, JournalPort, LlmPort},
    telemetry,
};
use worldsim_engine::use_cases::RoundSettings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root so the binary works from any crate dir.
    telemetry::load_dotenv_from_repo_root();
    telemetry::init_tracing("worldsim_engine=info");

    let config = EngineConfig::from_env()?;
    tracing::info!(
        data_dir = %config.data_dir.display(),
        rounds = config.rounds,
        characters_per_round = config.characters_per_round,
        director_model = %config.llm.director_model,
        archivist_model = %config.llm.archivist_model,
        "Starting worldsim"
    );

    let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
    let journal: Arc<dyn JournalPort> = Arc::new(
        MarkdownJournal::create(&config.log_dir, clock)?.with_min_level(config.journal_level),
    );

    let repos = JsonRepositories::open(&config.data_dir).await?;

    let llm = &config.llm;
    let director: Arc<dyn LlmPort> = Arc::new(ChatCompletionsClient::new(
        &llm.base_url,
        &llm.director_model,
        llm.api_key.clone(),
        llm.timeout_secs,
    ));
    let archivist: Arc<dyn LlmPort> = if llm.archivist_model == llm.director_model {
        director.clone()
    } else {
        Arc::new(ChatCompletionsClient::new(
            &llm.base_url,
            &llm.archivist_model,
            llm.api_key.clone(),
            llm.timeout_secs,
        ))
    };

    let app = App::new(
        Repositories::json(repos),
        Collaborators {
            director,
            archivist,
        },
        Arc::new(SystemRandom::new()),
        journal.clone(),
        RoundSettings {
            rounds: config.rounds,
            characters_per_round: config.characters_per_round,
        },
    );

    journal.info("# START!");
    let outcome = async {
        app.use_cases.rounds.dump_world().await?;
        app.use_cases.rounds.play_rounds().await
    }
    .await;
    journal.flush();

    let summaries = outcome?;
    tracing::info!(rounds = summaries.len(), "Run complete");
    Ok(())
}
