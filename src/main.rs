use anyhow::{Context, Result};
use clap::Parser;
use playme::app::cli::Args;
use playme::app::commands::Command;
use playme::app::config::AppConfig;
use playme::app::events::{AppEvent, TICK_INTERVAL};
use playme::app::{logging, App};
use playme::audio::{AudioOutput, HttpStreamBackend, RodioBackend, StreamSettings};
use playme::metadata::LoftyMetadataReader;
use playme::player::PlaybackController;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

// Everything touching playback runs on this one thread.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    human_panic::setup_panic!();
    let args = Args::parse();

    let (config, mut state) = AppConfig::load();
    let _log_guards = logging::init(&AppConfig::log_dir(&config))?;
    info!("Starting PlayMe");

    match std::env::set_current_dir(&config.music_directory) {
        Ok(()) => debug!("cd to {}", config.music_directory),
        Err(e) => warn!("Could not change to {}: {}", config.music_directory, e),
    }

    // 1. Audio output + backends
    let output = AudioOutput::open().context("Failed to open audio output")?;
    let stream_settings = StreamSettings {
        network_caching: Duration::from_millis(config.network_caching_ms),
        ..Default::default()
    };
    let mut controller = PlaybackController::new(
        Box::new(RodioBackend::new(output.handle())),
        Box::new(HttpStreamBackend::new(output.handle(), stream_settings)),
        Box::new(LoftyMetadataReader),
    );
    controller.set_volume(state.volume);

    // 2. Preload from the command line: files first, then the stream
    if !args.files.is_empty() {
        debug!("Command-line arguments: {:?}", args.files);
        let added = controller.add_paths(&args.files);
        println!("Added {} of {} files", added, args.files.len());
    }
    let mut app = App::new(controller);
    if let Some(url) = args.stream_url {
        debug!("Stream URL: {}", url);
        if let Some(message) = app.handle(Command::Stream(url)) {
            println!("{}", message);
        }
    }

    // 3. Status printer: show the display line whenever it changes
    let mut status_rx = app.controller.subscribe();
    tokio::spawn(async move {
        let mut last_display = String::new();
        while status_rx.changed().await.is_ok() {
            let display = status_rx.borrow_and_update().display.clone();
            if display != last_display && !display.is_empty() {
                println!("{}", display);
            }
            last_display = display;
        }
    });

    // 4. Input task
    let (tx, mut rx) = mpsc::channel(100);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let event = match lines.next_line().await {
                Ok(Some(line)) => match line.parse::<Command>() {
                    Ok(command) => AppEvent::Command(command),
                    Err(e) => AppEvent::InvalidInput(e),
                },
                Ok(None) | Err(_) => AppEvent::InputClosed,
            };
            let closed = event == AppEvent::InputClosed;
            if tx.send(event).await.is_err() || closed {
                break;
            }
        }
    });

    println!("Type 'help' for commands.");

    // The next tick is only awaited once the current event is fully handled.
    let mut ticker = tokio::time::interval(TICK_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    while app.is_running {
        let event = tokio::select! {
            _ = ticker.tick() => AppEvent::Tick,
            Some(event) = rx.recv() => event,
            _ = tokio::signal::ctrl_c() => AppEvent::Interrupt,
        };
        if let Some(message) = app.on_event(event) {
            println!("{}", message);
        }
    }

    // Save state on exit
    app.controller.shutdown();
    state.volume = app.controller.volume();
    state.save();
    info!("Shutting down PlayMe");

    drop(app);
    drop(output);
    Ok(())
}
