use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use guitarfx::audio::manager::Manager;
use guitarfx::control::{ControlEvent, Controller, StdinSource};
use guitarfx::fx::Registry;
use guitarfx::offline::render_wav;
use guitarfx::settings::Settings;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

#[derive(Parser, Debug)]
#[command(name = "guitarfx")]
#[command(version)]
#[command(about = "Live guitar effects over JACK, switchable while playing.")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process live audio and switch effects from the keyboard (default)
    Run {
        #[arg(
            long,
            env = "GUITARFX_EFFECT",
            help = "Effect index or name to start with"
        )]
        effect: Option<String>,
    },
    /// List the available effects
    List,
    /// Run a WAV file through an effect
    Render {
        #[arg(long, help = "WAV file to read")]
        input: PathBuf,
        #[arg(long, help = "WAV file to write")]
        output: PathBuf,
        #[arg(long, default_value = "0", help = "Effect index or name")]
        effect: String,
    },
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let args = Args::parse();
    let registry = Arc::new(Registry::catalog());

    match args.command.unwrap_or(Command::Run { effect: None }) {
        Command::Run { effect } => run(registry, effect.as_deref()),
        Command::List => {
            print!("{}", menu(&registry));
            Ok(())
        }
        Command::Render {
            input,
            output,
            effect,
        } => {
            let index = resolve_effect(&registry, &effect)?;
            let summary = render_wav(&input, &output, &registry, index)?;
            println!(
                "{}: {} frames x {} channel(s), {} sample(s) clipped",
                summary.effect, summary.frames, summary.channels, summary.clipped
            );
            Ok(())
        }
    }
}

fn run(registry: Arc<Registry>, effect: Option<&str>) -> Result<()> {
    info!("guitarfx v{}", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load().context("failed to load settings")?;
    info!("Settings:\n{settings}");
    settings.apply_to_environment();

    let initial = match effect {
        Some(key) => resolve_effect(&registry, key)?,
        None => settings.control.initial_effect,
    };

    let manager = Manager::new(&settings, Arc::clone(&registry))
        .context("failed to start audio session")?;
    let engine = manager.engine();
    info!(
        "Running at {} Hz with {} frame buffers",
        manager.sample_rate(),
        manager.buffer_size()
    );

    if initial != 0 && !engine.select(initial)? {
        warn!("Initial effect {initial} does not exist, starting with Identity");
    }

    let running = Arc::new(AtomicBool::new(true));
    let shutdown_flag = Arc::clone(&running);

    ctrlc::set_handler(move || {
        info!("Ctrl+C received, shutting down...");
        shutdown_flag.store(false, Ordering::SeqCst);
    })
    .context("error setting Ctrl+C handler")?;

    println!("{}", menu(&registry));
    print_prompt(engine.selected_name());

    let mut controller = Controller::new(
        StdinSource::spawn(),
        engine,
        settings.control.poll_interval(),
    );
    controller.run(&running, |event| match event {
        ControlEvent::Selected(_) => {
            println!("{}", menu(&registry));
            print_prompt(engine.selected_name());
        }
        ControlEvent::Ignored(index) => {
            println!("No effect {index}");
            print_prompt(engine.selected_name());
        }
        ControlEvent::Quit => {}
    })?;

    manager.disconnect_all();
    info!("Session ended");
    Ok(())
}

/// Accept either a registry index or a case-insensitive effect name.
fn resolve_effect(registry: &Registry, key: &str) -> Result<usize> {
    let index = key
        .parse::<usize>()
        .ok()
        .or_else(|| registry.index_of(key))
        .ok_or_else(|| anyhow!("unknown effect '{key}'"))?;

    if index >= registry.count() {
        anyhow::bail!(
            "effect index {index} out of range (0..{})",
            registry.count()
        );
    }
    Ok(index)
}

fn menu(registry: &Registry) -> String {
    (0..registry.count())
        .filter_map(|i| Some((i, registry.name(i)?, registry.priority(i)?)))
        .map(|(i, name, priority)| format!("{i}) {name} ({priority})\n"))
        .collect()
}

fn print_prompt(active: &str) {
    println!("Active: {active}. Enter an effect number, or q to quit:");
}
