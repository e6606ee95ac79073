use std::path::Path;
use std::process::ExitCode;

use midiviz::{Settings, assign, midi};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: inspect <file.mid> [settings.ron]");
        return ExitCode::from(2);
    };

    let settings = match args.next() {
        Some(settings_path) => match Settings::load(Path::new(&settings_path)) {
            Ok(settings) => settings,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };

    let events = match midi::load_events(Path::new(&path)) {
        Ok(events) => events,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let instruments = assign(&events, settings.visibility);
    println!("{} channel events, {} instruments", events.len(), instruments.len());
    for instrument in &instruments {
        let periods = instrument.note_periods().len();
        if periods > 0 {
            println!(
                "  {:?}: {} events, {} note periods",
                instrument.kind(),
                instrument.events().len(),
                periods,
            );
        } else {
            println!(
                "  {:?}: {} hits",
                instrument.kind(),
                instrument.events().len(),
            );
        }
    }

    ExitCode::SUCCESS
}
