use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use gdl_core::{update, AppState, Msg};
use gdl_logging::{gdl_info, gdl_warn};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::logging;
use super::persistence::SettingsStore;
use super::ui;

/// Everything the control thread reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    Msg(Msg),
    Help,
    Invalid(String),
    Quit,
}

pub fn run_app() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    logging::initialize(config.log_destination);
    gdl_info!("Starting gdl with {:?}", config);

    let settings = SettingsStore::locate();
    let initial = settings.load();

    let (control_tx, control_rx) = mpsc::channel::<ControlEvent>();
    let runner = EffectRunner::new(&config, settings, control_tx.clone())?;

    spawn_input_reader(control_tx.clone());

    // Background tick to throttle rendering.
    thread::spawn(move || {
        let interval = Duration::from_millis(100);
        while control_tx.send(ControlEvent::Msg(Msg::Tick)).is_ok() {
            thread::sleep(interval);
        }
    });

    let mut state = AppState::with_output_dir(initial.output_dir);
    print_screen(&ui::render::render(&state.view()));
    println!("{}", ui::commands::HELP);

    let mut needs_render = false;
    while let Ok(event) = control_rx.recv() {
        match event {
            ControlEvent::Quit => break,
            ControlEvent::Help => println!("{}", ui::commands::HELP),
            ControlEvent::Invalid(reason) => println!("?? {reason}"),
            ControlEvent::Msg(Msg::Tick) => {
                if std::mem::take(&mut needs_render) {
                    print_screen(&ui::render::render(&state.view()));
                }
            }
            ControlEvent::Msg(msg) => {
                let (next, effects) = update(std::mem::take(&mut state), msg);
                state = next;
                runner.run(effects);
                needs_render |= state.consume_dirty();
            }
        }
    }

    if state.task_count() > 0 {
        gdl_warn!("Exiting with {} downloads still running", state.task_count());
    }
    gdl_info!("gdl stopped");
    Ok(())
}

fn spawn_input_reader(control_tx: mpsc::Sender<ControlEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if let Some(event) = ui::commands::parse_line(&line) {
                if control_tx.send(event).is_err() {
                    return;
                }
            }
        }
        let _ = control_tx.send(ControlEvent::Quit);
    });
}

fn print_screen(text: &str) {
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout);
    let _ = write!(stdout, "{text}");
    let _ = stdout.flush();
}
