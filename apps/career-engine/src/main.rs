use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use career_engine::augment::{AnthropicAugmenter, Augmenter};
use career_engine::dialogue::follow_up::phase_opening;
use career_engine::models::Phase;
use career_engine::store::InMemorySessionStore;
use career_engine::{Config, ConversationService, Engine, EngineError};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("career_engine={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting career-engine v{}", env!("CARGO_PKG_VERSION"));

    let augmenter: Option<Arc<dyn Augmenter>> = match &config.anthropic_api_key {
        Some(key) => {
            let client = AnthropicAugmenter::new(key.clone(), config.augment_model.clone())
                .context("Failed to build augmentation client")?;
            info!("Augmentation enabled (model: {})", client.model());
            Some(Arc::new(client))
        }
        None => {
            info!("ANTHROPIC_API_KEY not set, using rule-based wording only");
            None
        }
    };

    let service = ConversationService::new(
        Engine::new(config.engine.clone()),
        Arc::new(InMemorySessionStore::new()),
        augmenter,
        Duration::from_millis(config.augment_timeout_ms),
    );

    let (session, _) = service
        .start_session()
        .await
        .context("Failed to start session")?;

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print(&mut stdout, &format!("{}\n", phase_opening(Phase::Introduction))).await?;
    print(&mut stdout, "(type /summary for a preview, /quit to stop)\n").await?;

    loop {
        print(&mut stdout, "> ").await?;
        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };

        match line.trim() {
            "/quit" | "/exit" => break,
            "/summary" => {
                let summary = service.summary(session.id).await?;
                print(&mut stdout, &summary.to_markdown()).await?;
                continue;
            }
            _ => {}
        }

        match service.submit_turn(session.id, &line).await {
            Ok(reply) => {
                let ctx = &reply.context;
                print(
                    &mut stdout,
                    &format!(
                        "[{} · {}% · quality {:.2}]\n{}\n",
                        ctx.phase,
                        ctx.progress_percentage,
                        ctx.quality_metrics.overall,
                        reply.message
                    ),
                )
                .await?;
                if let Some(summary) = reply.summary {
                    print(&mut stdout, &summary.to_markdown()).await?;
                    break;
                }
            }
            Err(EngineError::InvalidInput(msg)) => {
                print(&mut stdout, &format!("({msg})\n")).await?;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

async fn print(stdout: &mut tokio::io::Stdout, text: &str) -> Result<()> {
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}
