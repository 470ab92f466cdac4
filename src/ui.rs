use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, FormField, Screen};
use crate::trial::Phase;
use crate::util::round_to;

const HORIZONTAL_MARGIN: u16 = 4;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Every screen carries the class dashboard at the bottom
        let dashboard_height = if self.roster.is_empty() {
            3
        } else {
            (self.roster.records().len() as u16 + 4).min(12)
        };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([Constraint::Min(10), Constraint::Length(dashboard_height)])
            .split(area);

        match self.screen {
            Screen::Intake => render_intake(self, chunks[0], buf),
            Screen::Trial => render_trial(self, chunks[0], buf),
            Screen::Results => render_results(self, chunks[0], buf),
        }

        render_dashboard(self, chunks[1], buf);
    }
}

fn title_lines() -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            "Sishya School, Hosur",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Focus Assessment - Social Emotional Learning",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        Line::from(""),
    ]
}

fn field_line(label: &str, value: &str, active: bool) -> Line<'static> {
    let marker = if active { "> " } else { "  " };
    let cursor = if active { "_" } else { "" };
    let style = if active {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Line::from(vec![
        Span::raw(marker.to_string()),
        Span::styled(format!("{label}: "), style),
        Span::raw(format!("{value}{cursor}")),
    ])
}

fn render_intake(app: &App, area: Rect, buf: &mut Buffer) {
    let mut lines = title_lines();
    lines.push(Line::from(Span::styled(
        "Student Information",
        Style::default().add_modifier(Modifier::UNDERLINED),
    )));
    lines.push(Line::from(""));
    lines.push(field_line(
        "Student Name",
        &app.form.name,
        app.form.active() == FormField::Name,
    ));
    lines.push(field_line(
        "Class / Section",
        &app.form.class_name,
        app.form.active() == FormField::Class,
    ));
    lines.push(Line::from(""));

    if let Some(error) = app.form.error {
        lines.push(Line::from(Span::styled(
            error,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }

    lines.push(hint_line("(tab) switch field  (enter) start  (esc) quit"));

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

fn render_trial(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(session) = app.session() else {
        return;
    };

    let header = format!(
        "Trial {} / {}",
        session.trial_index(),
        session.total_trials()
    );

    let (prompt, letter, letter_style, hint) = match session.phase() {
        Phase::Target => (
            "Remember this target",
            session.target(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            "(space) show letter",
        ),
        Phase::Stimulus => (
            "Focus on the letter",
            session.stimulus().unwrap_or(' '),
            Style::default().add_modifier(Modifier::BOLD),
            "(t) it's the target  (s) skip",
        ),
        // Advancing and Complete are transient: the app either re-enters
        // Target or switches to the results screen before the next draw
        _ => return,
    };

    let lines = vec![
        Line::from(Span::styled(
            header,
            Style::default().add_modifier(Modifier::DIM),
        )),
        Line::from(""),
        Line::from(prompt),
        Line::from(""),
        Line::from(Span::styled(letter.to_string(), letter_style)),
        Line::from(""),
        hint_line(hint),
    ];

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(centered_band(area, 9), buf);
}

fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(record) = &app.last_result else {
        return;
    };

    let mut lines = title_lines();
    lines.push(Line::from(Span::styled(
        "Assessment Completed",
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));

    for (label, value) in crate::report::report_fields(record) {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{label}: "),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(value),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(hint_line(
        "(d) save pdf report  (c) export dashboard csv  (n) new student  (esc) quit",
    ));

    if let Some(notice) = &app.notice {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Yellow),
        )));
    }

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

fn render_dashboard(app: &App, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Class-wise Focus Dashboard");

    if app.roster.is_empty() {
        Paragraph::new("No class data recorded yet.")
            .block(block)
            .style(Style::default().add_modifier(Modifier::DIM))
            .alignment(Alignment::Center)
            .render(area, buf);
        return;
    }

    let name_width = app
        .roster
        .records()
        .iter()
        .map(|r| r.student_name.width())
        .max()
        .unwrap_or(4)
        .max("Name".len()) as u16;

    let header = Row::new(vec!["Name", "Class", "Accuracy (%)", "Reaction (sec)", "Focus Level"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .roster
        .records()
        .iter()
        .map(|r| {
            Row::new(vec![
                Cell::from(r.student_name.clone()),
                Cell::from(r.student_class.clone()),
                Cell::from(format!("{:.1}", r.accuracy_pct)),
                Cell::from(format!("{:.2}", r.avg_reaction_secs)),
                Cell::from(r.focus_level.to_string()),
            ])
        })
        .collect();

    let title = match app.roster.summary() {
        Some(summary) => format!(
            "Class-wise Focus Dashboard | avg focus {} % | avg reaction {:.2} sec",
            round_to(summary.avg_accuracy_pct, 1),
            summary.avg_reaction_secs
        ),
        None => "Class-wise Focus Dashboard".to_string(),
    };

    Table::new(
        rows,
        [
            Constraint::Length(name_width + 2),
            Constraint::Length(12),
            Constraint::Length(14),
            Constraint::Length(15),
            Constraint::Length(12),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title))
    .render(area, buf);
}

fn hint_line(hint: &str) -> Line<'static> {
    Line::from(Span::styled(
        hint.to_string(),
        Style::default()
            .add_modifier(Modifier::ITALIC)
            .add_modifier(Modifier::DIM),
    ))
}

// Vertically centers a band of `height` rows inside `area`
fn centered_band(area: Rect, height: u16) -> Rect {
    let top = area.height.saturating_sub(height) / 2;
    Rect {
        x: area.x,
        y: area.y + top,
        width: area.width,
        height: height.min(area.height),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::{AppConfig, AppEvent};
    use crate::stimulus::ScriptedSymbols;
    use crate::trial::ResponseKind;
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::{Duration, Instant};

    fn app_with_script(trials: usize, script: Vec<char>) -> App {
        App::new(
            AppConfig {
                trials,
                report_dir: std::env::temp_dir(),
            },
            Box::new(ScriptedSymbols::new(script)),
        )
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_intake_screen_renders_form_and_empty_dashboard() {
        let app = app_with_script(20, vec!['A']);
        let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();

        terminal.draw(|f| f.render_widget(&app, f.area())).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Student Information"));
        assert!(text.contains("Student Name"));
        assert!(text.contains("No class data recorded yet."));
    }

    #[test]
    fn test_target_phase_shows_target_letter() {
        let mut app = app_with_script(20, vec!['A', 'X']);
        app.apply(
            AppEvent::Start {
                name: "Asha".to_string(),
                class_name: "6B".to_string(),
            },
            Instant::now(),
        )
        .unwrap();

        let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();
        terminal.draw(|f| f.render_widget(&app, f.area())).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Trial 1 / 20"));
        assert!(text.contains("Remember this target"));
    }

    #[test]
    fn test_stimulus_phase_shows_response_hints() {
        let mut app = app_with_script(20, vec!['A', 'X']);
        let t0 = Instant::now();
        app.apply(
            AppEvent::Start {
                name: "Asha".to_string(),
                class_name: "6B".to_string(),
            },
            t0,
        )
        .unwrap();
        app.apply(AppEvent::AdvanceToStimulus, t0).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(90, 30)).unwrap();
        terminal.draw(|f| f.render_widget(&app, f.area())).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Focus on the letter"));
        assert!(text.contains("(t) it's the target"));
    }

    #[test]
    fn test_results_screen_shows_report_and_dashboard_row() {
        let mut app = app_with_script(1, vec!['A', 'A']);
        let t0 = Instant::now();
        app.apply(
            AppEvent::Start {
                name: "Asha".to_string(),
                class_name: "6B".to_string(),
            },
            t0,
        )
        .unwrap();
        app.apply(AppEvent::AdvanceToStimulus, t0).unwrap();
        app.apply(
            AppEvent::Respond(ResponseKind::MatchClaim),
            t0 + Duration::from_millis(500),
        )
        .unwrap();

        let mut terminal = Terminal::new(TestBackend::new(100, 34)).unwrap();
        terminal.draw(|f| f.render_widget(&app, f.area())).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Assessment Completed"));
        assert!(text.contains("Focus Accuracy (%): 100.0"));
        assert!(text.contains("SEL Remark"));
        assert!(text.contains("avg focus 100 %"));
        assert!(text.contains("Asha"));
    }
}
