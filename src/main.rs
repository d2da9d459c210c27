// src/main.rs
use std::{
    io::{self, stdout},
    path::{Path, PathBuf},
    time::Duration,
};
use crossterm::{
    event::{self, Event},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use clap::Parser;

use vimkeys::config::EngineConfig;
use vimkeys::editor::{Engine, MemoryHost};
use vimkeys::input::{Key, MemoryRouter};
use vimkeys::ui::Renderer;

type App = Engine<MemoryHost, MemoryRouter>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to open
    #[arg(name = "FILE")]
    file: Option<PathBuf>,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    if let Ok(log_path) = std::env::var("VIMKEYS_LOG") {
        if let Err(e) = simple_logging::log_to_file(&log_path, log::LevelFilter::Debug) {
            eprintln!("Warning: Failed to log to {}: {}", log_path, e);
        }
    } else {
        let _ = env_logger::Builder::from_default_env().try_init();
    }

    // Load configuration
    let config = match &args.config {
        Some(path) => EngineConfig::load_from_file(path),
        None => EngineConfig::load(),
    }
    .unwrap_or_else(|e| {
        eprintln!("Warning: Failed to load config: {}", e);
        EngineConfig::default()
    });

    let host = match &args.file {
        Some(path) => open_file(path)?,
        None => MemoryHost::new(),
    };
    let mut engine = Engine::new(host, MemoryRouter::new(), config);
    let mut renderer = Renderer::new()?;

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;

    let result = run_event_loop(&mut engine, &mut renderer);

    cleanup()?;
    result
}

fn open_file(path: &Path) -> io::Result<MemoryHost> {
    let mut host = if path.exists() {
        let contents = std::fs::read_to_string(path)?;
        MemoryHost::from_text(contents.strip_suffix('\n').unwrap_or(&contents))
    } else {
        MemoryHost::new()
    };
    host.set_path(path.to_path_buf());
    Ok(host)
}

fn run_event_loop(engine: &mut App, renderer: &mut Renderer) -> io::Result<()> {
    engine.host_mut().set_page_height(renderer.text_rows());
    renderer.render(&mut stdout(), engine.host())?;
    engine.host_mut().clear_logs();

    while !engine.host().should_quit() {
        if !event::poll(Duration::from_millis(250))? {
            continue;
        }
        match event::read()? {
            Event::Key(event) => {
                if let Some(key) = Key::from_event(&event) {
                    handle_key(engine, key);
                }
            }
            Event::Resize(width, height) => {
                renderer.resize(width, height);
                engine.host_mut().set_page_height(renderer.text_rows());
            }
            _ => continue,
        }

        if engine.host().is_suspended() {
            suspend()?;
            engine.host_mut().resume();
        }
        renderer.render(&mut stdout(), engine.host())?;
        // Messages show until the next key
        engine.host_mut().clear_logs();
    }

    Ok(())
}

fn handle_key(engine: &mut App, key: Key) {
    for invocation in engine.router_mut().resolve(key) {
        // Failures are reported on the command line by the engine
        let _ = engine.run_command(&invocation.command, &invocation.args);
    }
}

fn suspend() -> io::Result<()> {
    cleanup()?;
    #[cfg(unix)]
    {
        let pid = std::process::id().to_string();
        std::process::Command::new("kill").args(["-TSTP", &pid]).status()?;
    }
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    Ok(())
}

fn cleanup() -> io::Result<()> {
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::parse_from(["vimkeys", "notes.txt", "--config", "keys.toml"]);
        assert_eq!(args.file, Some(PathBuf::from("notes.txt")));
        assert_eq!(args.config, Some(PathBuf::from("keys.toml")));
    }

    #[test]
    fn test_routed_keys_drive_engine() {
        let mut engine = Engine::new(
            MemoryHost::from_text("abc"),
            MemoryRouter::new(),
            EngineConfig::default(),
        );
        for key in [Key::Char('x'), Key::Char('i'), Key::Char('z'), Key::Esc] {
            handle_key(&mut engine, key);
        }
        assert_eq!(engine.host().text(), "zabc");
    }
}
