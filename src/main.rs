use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use turnloop::config::EngineConfig;
use turnloop::error::SpeechError;
use turnloop::games::{Dialogue, EchoTest, WordGuessGame, WordList};
use turnloop::kernel::reactor::Reactor;
use turnloop::kernel::time::Tick;
use turnloop::kernel::turn::TurnManager;
use turnloop::speech::{
    spawn_stdin_reader, CommandSpeaker, ConsoleSpeaker, SpeechOutput, SpeechSignal, TranscriptRecognizer,
};

/// Console printout plus an optional external voice.
enum Voice {
    Console(ConsoleSpeaker),
    Command(CommandSpeaker),
}

impl SpeechOutput for Voice {
    fn speak(&mut self, text: &str, now: Tick) -> Result<(), SpeechError> {
        match self {
            Voice::Console(speaker) => speaker.speak(text, now),
            Voice::Command(speaker) => {
                println!("[SAY] {}", text);
                speaker.speak(text, now)
            }
        }
    }

    fn stop(&mut self) {
        match self {
            Voice::Console(speaker) => speaker.stop(),
            Voice::Command(speaker) => speaker.stop(),
        }
    }

    fn poll(&mut self, now: Tick) -> Option<SpeechSignal> {
        match self {
            Voice::Console(speaker) => speaker.poll(now),
            Voice::Command(speaker) => speaker.poll(now),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("turnloop=info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    let config = EngineConfig::from_env().context("loading configuration")?;
    config.validate()?;

    // 2. Pick the dialogue
    let mode = std::env::args().nth(1).unwrap_or_else(|| "word".to_string());
    let dialogue: Box<dyn Dialogue> = match mode.as_str() {
        "word" => {
            let words = match &config.game.answers_path {
                Some(path) => WordList::from_files(path, config.game.allowed_path.as_deref())?,
                None => WordList::builtin(),
            };
            Box::new(WordGuessGame::new(words, config.game.max_guesses))
        }
        "echo" => Box::new(EchoTest::new()),
        other => anyhow::bail!("unknown mode '{}' (expected 'word' or 'echo')", other),
    };

    // 3. Providers: stdin lines stand in for recognized speech
    let (fragments, recognizer) = TranscriptRecognizer::channel(config.silence_policy());
    spawn_stdin_reader(fragments);

    let voice = match &config.voice.command {
        Some(program) => {
            tracing::info!("Speaking through '{}'", program);
            Voice::Command(CommandSpeaker::new(program.clone(), config.voice.args.clone()))
        }
        None => Voice::Console(ConsoleSpeaker::new(config.voice.words_per_minute)),
    };

    let manager = TurnManager::new(config.turn_config());

    // 4. Presentation: follow the turn state
    let mut state_rx = manager.subscribe();
    tokio::spawn(async move {
        while state_rx.changed().await.is_ok() {
            let state = *state_rx.borrow_and_update();
            tracing::info!("[{}]", state.label());
        }
    });

    // 5. Ctrl+C cancels the turn and ends the session
    let shutdown = CancellationToken::new();
    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    println!("Type your replies and press Enter. Typing while a prompt plays interrupts it.");

    let mut reactor = Reactor::new(manager, voice, recognizer, dialogue);
    let snapshot = reactor.run(shutdown).await?;

    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}
