//! Application entry point — console front end for the dialogue router.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] (from the path given as the first argument, or the
//!    platform settings file).
//! 3. Create the [`tokio`] runtime.
//! 4. Build the HTTP clients, the cache and the [`LookupPipeline`].
//! 5. Read lines from stdin as messages of a single session and print every
//!    reply.
//!
//! Besides commands and plain text, the console understands
//! `/voice <file> <seconds>`, which sends the file's bytes as a voice
//! message of the given duration.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use wiki_voice_bot::{
    cache::MemoryCache,
    config::AppConfig,
    dialogue::{DialogueRouter, Incoming, SessionId},
    llm::ApiChat,
    pipeline::LookupPipeline,
    speller::YandexSpeller,
    stt::SpeechKitRecognizer,
    wiki::MediaWikiClient,
};

const CONSOLE_SESSION: SessionId = 0;

// ---------------------------------------------------------------------------
// Console input
// ---------------------------------------------------------------------------

/// Turn one console line into a message.  `/voice` lines read the clip
/// from disk; everything else goes through [`Incoming::from_text`].
async fn parse_line(line: &str) -> Result<Incoming> {
    let Some(args) = line.strip_prefix("/voice ") else {
        return Ok(Incoming::from_text(line));
    };

    let mut parts = args.split_whitespace();
    let (Some(file), Some(secs), None) = (parts.next(), parts.next(), parts.next()) else {
        bail!("usage: /voice <file> <seconds>");
    };
    let duration_secs: u32 = secs
        .parse()
        .with_context(|| format!("invalid duration {secs:?}"))?;
    let audio = tokio::fs::read(Path::new(file))
        .await
        .with_context(|| format!("cannot read {file}"))?;

    Ok(Incoming::Voice {
        audio,
        duration_secs,
    })
}

async fn run_console(router: DialogueRouter) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let incoming = match parse_line(&line).await {
            Ok(incoming) => incoming,
            Err(e) => {
                eprintln!("{e:#}");
                continue;
            }
        };

        if let Some(reply) = router.handle(CONSOLE_SESSION, incoming).await {
            println!("{reply}\n");
        }
    }

    log::info!("stdin closed, shutting down");
    Ok(())
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn load_config() -> AppConfig {
    let result = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => AppConfig::load_from(&path),
        None => AppConfig::load(),
    };
    result.unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    })
}

fn main() -> Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("wiki-voice-bot starting up");

    // 2. Configuration
    let config = load_config();

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Services
    let pipeline = Arc::new(LookupPipeline::new(
        Arc::new(MemoryCache::new()),
        Arc::new(MediaWikiClient::from_config(&config.wiki)),
        Arc::new(YandexSpeller::from_config(&config.speller)),
        &config,
    ));
    let router = DialogueRouter::new(
        pipeline,
        Arc::new(SpeechKitRecognizer::from_config(&config.stt)),
        Arc::new(ApiChat::from_config(&config.llm)),
        &config,
    );

    // 5. Console loop
    println!("Type /start to begin, Ctrl-D to quit.");
    rt.block_on(run_console(router))
}
