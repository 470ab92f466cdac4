use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
};

use fokus::app::{App, AppConfig, Control};
use fokus::runtime::{CrosstermEventSource, EventSource, InputEvent};
use fokus::stimulus::RandomSymbols;

/// terminal focus assessment with printable reports and a class dashboard
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Runs a target-match focus assessment for one student at a time, scores accuracy, \
reaction time and focus level, writes a printable PDF report, and keeps a running class dashboard."
)]
struct Cli {
    /// number of trials per assessment
    #[clap(short = 't', long, default_value_t = 20, value_parser = clap::value_parser!(usize))]
    trials: usize,

    /// directory where PDF reports and CSV exports are written
    #[clap(short = 'r', long, default_value = ".")]
    report_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(
        AppConfig {
            trials: cli.trials.max(1),
            report_dir: cli.report_dir,
        },
        Box::new(RandomSymbols::from_entropy()),
    );

    let result = run(&mut terminal, &mut app, &CrosstermEventSource::new());

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Strictly synchronous loop: draw, block for one user action, apply it,
/// draw again.
fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    events: &impl EventSource,
) -> Result<(), Box<dyn Error>> {
    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        match events.next() {
            Some(InputEvent::Key(key)) => {
                if app.on_key(key) == Control::Quit {
                    return Ok(());
                }
            }
            Some(InputEvent::Resize) => {}
            None => return Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["fokus"]);

        assert_eq!(cli.trials, 20);
        assert_eq!(cli.report_dir, PathBuf::from("."));
    }

    #[test]
    fn test_cli_trials_flag() {
        let cli = Cli::parse_from(["fokus", "-t", "5"]);
        assert_eq!(cli.trials, 5);

        let cli = Cli::parse_from(["fokus", "--trials", "40"]);
        assert_eq!(cli.trials, 40);
    }

    #[test]
    fn test_cli_report_dir_flag() {
        let cli = Cli::parse_from(["fokus", "-r", "/tmp/reports"]);
        assert_eq!(cli.report_dir, PathBuf::from("/tmp/reports"));
    }
}
