//! Ratatui-based terminal UI.
//!
//! The TUI provides a slider panel for the five mix parameters, then renders the
//! strength estimate, the maturity curve and the calibration table.

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Cell, Clear, LineGauge, Paragraph, Row, Table, Tabs, Wrap},
};
use tracing::{info, warn};

use crate::app::session::{Session, SessionConfig, Tab};
use crate::cli::{TuiArgs, parse_field_value};
use crate::data::{REFERENCE_FOOTNOTE, reference_samples};
use crate::domain::{MaturityPoint, MixField, StrengthGrade};
use crate::engine::{Jitter, step_after};
use crate::error::AppError;
use crate::report::fmt_param;

mod plotters_chart;

use plotters_chart::MaturityChart;

const TICK: Duration = Duration::from_millis(50);
const COARSE_STEPS: i32 = 10;
const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];
const EXPORT_DIR: &str = "exports";

const GUIDE_TEXT: &str = "Estimates follow a modified Abrams law on the water-cement ratio, \
scaled by a logarithmic age factor and an aggregate packing factor. Values indicate potential \
performance under standard curing (20°C, 95% RH) and vary with aggregate mineralogy and \
cement type (OPC/PPC). Not a substitute for cylinder testing (ASTM C39/C39M).";

/// Start the TUI.
pub fn run(args: TuiArgs) -> Result<(), AppError> {
    let config = SessionConfig {
        delay: Duration::from_millis(args.delay_ms),
        show_guide: args.guide,
    };
    let jitter = Jitter::from_flags(args.jitter.seed, args.jitter.no_jitter);

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal =
        Terminal::new(backend).map_err(|e| AppError::runtime(format!("Failed to initialize terminal: {e}")))?;

    info!(delay_ms = args.delay_ms, guide = args.guide, "starting tui");
    let mut app = App::new(config, jitter);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::runtime(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::runtime(format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    session: Session<Jitter>,
    selected_field: usize,
    editing: bool,
    edit_input: String,
    status: String,
    export_dir: PathBuf,
    ticks: usize,
}

impl App {
    fn new(config: SessionConfig, jitter: Jitter) -> Self {
        Self {
            session: Session::new(config, jitter, Instant::now()),
            selected_field: 0,
            editing: false,
            edit_input: String::new(),
            status: "Ready.".to_string(),
            export_dir: PathBuf::from(EXPORT_DIR),
            ticks: 0,
        }
    }

    fn selected(&self) -> MixField {
        MixField::ALL[self.selected_field]
    }

    fn event_loop<B: ratatui::backend::Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            match self.session.poll(Instant::now()) {
                Ok(true) => needs_redraw = true,
                Ok(false) => {}
                Err(err) => {
                    warn!(%err, "estimate failed");
                    self.status = format!("Estimate failed: {err}");
                    needs_redraw = true;
                }
            }
            if self.session.is_computing() {
                // Keep the spinner moving.
                needs_redraw = true;
            }

            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::runtime(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(TICK).map_err(|e| AppError::runtime(format!("Event poll error: {e}")))? {
                self.ticks = self.ticks.wrapping_add(1);
                continue;
            }

            match event::read().map_err(|e| AppError::runtime(format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the user asked to quit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing {
            self.handle_value_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Tab | KeyCode::BackTab => self.session.next_tab(),
            KeyCode::Char('1') => self.session.set_tab(Tab::Analysis),
            KeyCode::Char('2') => self.session.set_tab(Tab::Reference),
            KeyCode::Char('g') => {
                let on = self.session.toggle_guide();
                self.status = format!("guide: {}", if on { "on" } else { "off" });
            }
            KeyCode::Char('e') => self.export_reference(),
            _ if self.session.tab() == Tab::Analysis => self.handle_slider_key(code),
            _ => {}
        }

        false
    }

    fn handle_slider_key(&mut self, code: KeyCode) {
        let field = self.selected();
        let now = Instant::now();
        match code {
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field + 1 < MixField::ALL.len() {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust(field, -1, now),
            KeyCode::Right => self.adjust(field, 1, now),
            KeyCode::PageDown => self.adjust(field, -COARSE_STEPS, now),
            KeyCode::PageUp => self.adjust(field, COARSE_STEPS, now),
            KeyCode::Home => {
                let v = self.session.set_param(field, field.range().min, now);
                self.status = format!("{}: {}", field.label(), fmt_param(field, v));
            }
            KeyCode::End => {
                let v = self.session.set_param(field, field.range().max, now);
                self.status = format!("{}: {}", field.label(), fmt_param(field, v));
            }
            KeyCode::Enter => {
                self.editing = true;
                self.edit_input.clear();
                self.status = format!(
                    "Editing {} ({}..={}). Enter to apply, Esc to cancel.",
                    field.label(),
                    field.range().min,
                    field.range().max
                );
            }
            _ => {}
        }
    }

    fn adjust(&mut self, field: MixField, steps: i32, now: Instant) {
        let v = self.session.step_param(field, steps, now);
        self.status = format!("{}: {} {}", field.label(), fmt_param(field, v), field.unit());
    }

    fn handle_value_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing = false;
                self.status = "Edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing = false;
                self.apply_value_input();
            }
            KeyCode::Backspace => {
                self.edit_input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '.' || c == '-' {
                    self.edit_input.push(c);
                }
            }
            _ => {}
        }
    }

    fn apply_value_input(&mut self) {
        let field = self.selected();
        match parse_field_value(field, &self.edit_input) {
            Ok(v) => {
                let stored = self.session.set_param(field, v, Instant::now());
                self.status = format!("{}: {} {}", field.label(), fmt_param(field, stored), field.unit());
            }
            Err(err) => {
                warn!(field = field.label(), input = %self.edit_input, "rejected typed value");
                self.status = format!("Invalid value: {err}");
            }
        }
    }

    fn export_reference(&mut self) {
        match crate::io::export_reference_timestamped(&self.export_dir, reference_samples()) {
            Ok(path) => self.status = format!("Exported: {}", path.display()),
            Err(err) => {
                warn!(%err, dir = %self.export_dir.display(), "reference export failed");
                self.status = format!("Export failed: {err}");
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        match self.session.tab() {
            Tab::Analysis => self.draw_analysis(frame, chunks[1]),
            Tab::Reference => self.draw_reference(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(inner);

        let title = Line::from(vec![
            Span::styled("StructCore Labs", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(" | concrete strength estimation"),
        ]);
        frame.render_widget(Paragraph::new(title), rows[0]);

        let tabs = Tabs::new(Tab::ALL.iter().map(|t| t.title()))
            .select(self.session.tab().index())
            .style(Style::default().fg(Color::Gray))
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
            .divider(" | ");
        frame.render_widget(tabs, rows[1]);
    }

    fn draw_analysis(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(MixField::ALL.len() as u16 * 2 + 2), Constraint::Min(0)])
            .split(cols[0]);
        self.draw_sliders(frame, left[0]);
        self.draw_chart(frame, left[1]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(7), Constraint::Length(4), Constraint::Min(0)])
            .split(cols[1]);
        self.draw_result(frame, right[0]);
        self.draw_metrics(frame, right[1]);
        self.draw_guide(frame, right[2]);
    }

    fn draw_sliders(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("Mix Proportioning (SSD Basis)")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(MixField::ALL.map(|_| Constraint::Length(2)))
            .split(inner);

        let params = self.session.params();
        for (i, field) in MixField::ALL.into_iter().enumerate() {
            let selected = i == self.selected_field;
            let value = params.get(field);
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Length(1)])
                .split(rows[i]);

            let label_style = if selected {
                Style::default().fg(Color::Black).bg(Color::White)
            } else {
                Style::default().fg(Color::Gray)
            };
            let shown = if selected && self.editing {
                format!("{}_", self.edit_input)
            } else {
                fmt_param(field, value)
            };
            let line = Line::from(vec![
                Span::styled(
                    format!("{}{}", if selected { "» " } else { "  " }, field.label()),
                    label_style,
                ),
                Span::raw("  "),
                Span::styled(shown, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
                Span::styled(format!(" {}", field.unit()), Style::default().fg(Color::DarkGray)),
            ]);
            frame.render_widget(Paragraph::new(line), parts[0]);

            let gauge = LineGauge::default()
                .filled_style(Style::default().fg(Color::Blue))
                .unfilled_style(Style::default().fg(Color::DarkGray))
                .line_set(symbols::line::THICK)
                .label(format!("{:>5}", field.range().min))
                .ratio(field.range().ratio(value));
            frame.render_widget(gauge, parts[1]);
        }
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default().title("Maturity Curve Projection").borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        let Some(maturity) = self.session.maturity() else {
            let msg = Paragraph::new("Waiting for estimate...").style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        };

        let (line, points, x_bounds, y_bounds) = chart_series(&maturity);
        let widget = MaturityChart {
            line: &line,
            points: &points,
            x_bounds,
            y_bounds,
            x_label: "age (days)",
            y_label: "f'c (MPa)",
        };
        frame.render_widget(widget, inner);
    }

    fn draw_result(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("Estimated Compressive Strength")
            .borders(Borders::ALL);

        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::raw(""));
        if self.session.is_computing() {
            let frame_idx = self.ticks % SPINNER.len();
            lines.push(Line::from(Span::styled(
                format!("{} calculating…", SPINNER[frame_idx]),
                Style::default().fg(Color::Yellow),
            )));
        } else {
            match self.session.result() {
                Some(r) => lines.push(Line::from(vec![
                    Span::styled(
                        format!("{:.2}", r.strength_mpa),
                        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(" MPa", Style::default().fg(Color::Blue).add_modifier(Modifier::ITALIC)),
                ])),
                None => lines.push(Line::raw("-")),
            }
        }
        lines.push(Line::raw(""));

        let (grade_label, grade_color) = match self.session.result() {
            Some(r) => (r.grade_label(), grade_color(r.grade)),
            None => ("N/A", Color::Gray),
        };
        lines.push(Line::from(Span::styled("Classification Tag", Style::default().fg(Color::DarkGray))));
        lines.push(Line::from(Span::styled(
            grade_label,
            Style::default().fg(grade_color).add_modifier(Modifier::BOLD),
        )));

        let p = Paragraph::new(Text::from(lines))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(p, area);
    }

    fn draw_metrics(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);

        let params = self.session.params();
        let cards = [
            ("w/c ratio", format!("{:.3}", params.wc_ratio())),
            ("Est. Density", format!("{:.0} kg", params.estimated_density())),
        ];
        for (rect, (title, value)) in cols.iter().zip(cards) {
            let p = Paragraph::new(Line::from(Span::styled(
                value,
                Style::default().add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .block(Block::default().title(title).borders(Borders::ALL));
            frame.render_widget(p, *rect);
        }
    }

    fn draw_guide(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        if !self.session.show_guide() {
            let hint = Paragraph::new("g: show technical guide").style(Style::default().fg(Color::DarkGray));
            frame.render_widget(hint, area);
            return;
        }
        let p = Paragraph::new(GUIDE_TEXT)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().title("Technical Compliance").borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_reference(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        let header = Row::new(
            ["Sample_ID", "Cmt (kg)", "Wtr (kg)", "Coarse (kg)", "Sand (kg)", "Age (d)", "f'c (MPa)"]
                .map(Cell::from),
        )
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

        let rows = reference_samples().iter().map(|r| {
            Row::new(vec![
                Cell::from(r.label()).style(Style::default().fg(Color::DarkGray)),
                Cell::from(format!("{}", r.cement)),
                Cell::from(format!("{}", r.water)),
                Cell::from(format!("{}", r.coarse_aggregate)),
                Cell::from(format!("{}", r.sand)),
                Cell::from(r.age_days.to_string()),
                Cell::from(format!("{:.2}", r.actual_strength_mpa))
                    .style(Style::default().add_modifier(Modifier::BOLD)),
            ])
        });

        let table = Table::new(rows, [Constraint::Length(12); 7])
            .header(header)
            .block(
                Block::default()
                    .title("Validation Dataset (e: export .csv)")
                    .borders(Borders::ALL),
            );
        frame.render_widget(table, chunks[0]);

        let note = Paragraph::new(REFERENCE_FOOTNOTE)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(note, chunks[1]);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = if self.editing {
            "type value  Enter apply  Esc cancel"
        } else {
            "Tab view  ↑/↓ select  ←/→ ±1  PgUp/PgDn ±10  Enter type  g guide  e export  q quit"
        };
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

fn grade_color(grade: StrengthGrade) -> Color {
    match grade {
        StrengthGrade::HighPerformance => Color::Green,
        StrengthGrade::StandardStructural => Color::Cyan,
        StrengthGrade::SubStructural => Color::Yellow,
    }
}

/// Build chart series for Plotters.
fn chart_series(maturity: &[MaturityPoint]) -> (Vec<(f64, f64)>, Vec<(f64, f64)>, [f64; 2], [f64; 2]) {
    let line = step_after(maturity);
    let points: Vec<(f64, f64)> = maturity.iter().map(|p| (f64::from(p.day), p.fc)).collect();

    let y_max = points.iter().map(|&(_, y)| y).fold(f64::NEG_INFINITY, f64::max);
    let y_max = if y_max.is_finite() && y_max > 0.0 { y_max * 1.15 } else { 1.0 };

    (line, points, [0.0, 30.0], [0.0, y_max])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::maturity_curve;

    #[test]
    fn chart_series_spans_the_projection() {
        let (line, points, x, y) = chart_series(&maturity_curve(40.0));
        assert_eq!(points.len(), 4);
        assert_eq!(line.len(), 7);
        assert!(x[0] <= 3.0 && x[1] >= 28.0);
        assert_eq!(y[0], 0.0);
        assert!(y[1] > 40.0);
    }

    #[test]
    fn key_handling_drives_the_session() {
        let mut app = App::new(
            SessionConfig {
                delay: Duration::ZERO,
                show_guide: false,
            },
            Jitter::from_flags(None, true),
        );

        app.handle_key(KeyCode::Down);
        assert_eq!(app.selected(), MixField::Water);
        app.handle_key(KeyCode::PageUp);
        assert_eq!(app.session.params().water, 190.0);

        app.handle_key(KeyCode::Enter);
        for c in "abc".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        assert!(app.edit_input.is_empty());
        for c in "999".chars() {
            app.handle_key(KeyCode::Char(c));
        }
        app.handle_key(KeyCode::Enter);
        assert!(!app.editing);
        assert_eq!(app.session.params().water, 280.0);

        app.handle_key(KeyCode::Tab);
        assert_eq!(app.session.tab(), Tab::Reference);
        // Slider keys are inert on the reference tab.
        app.handle_key(KeyCode::Left);
        assert_eq!(app.session.params().water, 280.0);

        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn failed_export_reports_in_status_line() {
        let mut app = App::new(
            SessionConfig {
                delay: Duration::ZERO,
                show_guide: false,
            },
            Jitter::from_flags(None, true),
        );
        let blocker = std::env::temp_dir().join(format!("mix-strength-blocker-{}", std::process::id()));
        std::fs::write(&blocker, b"not a directory").unwrap();
        app.export_dir = blocker.join("exports");

        app.export_reference();
        assert!(app.status.starts_with("Export failed:"), "status: {}", app.status);

        std::fs::remove_file(&blocker).unwrap();
    }
}
