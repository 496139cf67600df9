//! Drawing
//!
//! Pure render functions: state in, widgets out. Nothing here mutates the
//! app.

use std::time::Instant;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::canvas::{Canvas, Points};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, Gauge, GraphType, Paragraph};
use ratatui::Frame;

use crate::auth::{confirm_state, password_strength, FlashLevel, MatchState};
use crate::poller::ConnectionStatus;
use crate::vitals::{Reading, VitalKind};

use super::app::{App, Screen};
use super::particles::{ParticleField, FIELD_SIZE};

/// Dashboard palette
mod palette {
    use ratatui::style::Color;

    pub const HEART: Color = Color::Rgb(76, 175, 80);
    pub const SPO2: Color = Color::Rgb(3, 169, 244);
    pub const RESP: Color = Color::Rgb(96, 125, 139);
    pub const ACCENT: Color = Color::Rgb(79, 172, 254);
    pub const OK: Color = Color::Rgb(46, 213, 115);
    pub const WARN: Color = Color::Rgb(255, 165, 2);
    pub const DANGER: Color = Color::Rgb(255, 71, 87);
    pub const DIM: Color = Color::Rgb(136, 136, 136);
    pub const PARTICLE: Color = Color::Rgb(60, 70, 90);
}

/// Draw the active screen.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.size();
    draw_particles(frame, area, &app.particles);

    match app.screen {
        Screen::Login => draw_login(frame, area, app),
        Screen::Register => draw_register(frame, area, app),
        Screen::Verify => draw_verify(frame, area, app),
        Screen::Dashboard => draw_dashboard(frame, area, app),
    }
}

fn draw_particles(frame: &mut Frame, area: Rect, field: &ParticleField) {
    let coords = field.points();
    let canvas = Canvas::default()
        .x_bounds([0.0, FIELD_SIZE])
        .y_bounds([0.0, FIELD_SIZE])
        .paint(|ctx| {
            ctx.draw(&Points {
                coords: &coords,
                color: palette::PARTICLE,
            });
        });
    frame.render_widget(canvas, area);
}

/// A centered box of fixed size, clamped to the frame.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn input_field<'a>(title: &'a str, value: &'a str, focused: bool, masked: bool) -> Paragraph<'a> {
    let shown = if masked {
        "\u{2022}".repeat(value.chars().count())
    } else {
        value.to_string()
    };
    let border = if focused { palette::ACCENT } else { palette::DIM };

    Paragraph::new(shown).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(Span::styled(
                format!(" {title} "),
                Style::default().fg(border),
            )),
    )
}

fn flash_line(app: &App) -> Line<'static> {
    match app.flash.current(Instant::now()) {
        Some(flash) => {
            let color = match flash.level {
                FlashLevel::Success => palette::OK,
                FlashLevel::Info => palette::ACCENT,
                FlashLevel::Warning => palette::WARN,
                FlashLevel::Danger => palette::DANGER,
            };
            Line::styled(flash.message.clone(), Style::default().fg(color))
        }
        None => Line::raw(""),
    }
}

fn hint_line(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(Style::default().fg(palette::DIM))
        .alignment(Alignment::Center)
}

// ============================================
// Auth screens
// ============================================

fn draw_login(frame: &mut Frame, area: Rect, app: &App) {
    let frame_box = centered_rect(56, 14, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette::ACCENT))
        .title(" VitaScope \u{00b7} Sign in ");
    let inner = block.inner(frame_box);
    frame.render_widget(block, frame_box);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(
        input_field("Username", &app.login.username, app.focus == 0, false),
        rows[0],
    );
    frame.render_widget(
        input_field("Password", &app.login.password, app.focus == 1, true),
        rows[1],
    );
    frame.render_widget(Paragraph::new(flash_line(app)), rows[2]);
    frame.render_widget(
        hint_line("Enter sign in \u{00b7} F2 register \u{00b7} Tab next field \u{00b7} Esc quit"),
        rows[3],
    );
}

fn draw_register(frame: &mut Frame, area: Rect, app: &App) {
    let frame_box = centered_rect(56, 22, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette::ACCENT))
        .title(" VitaScope \u{00b7} Create account ");
    let inner = block.inner(frame_box);
    frame.render_widget(block, frame_box);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(
        input_field("Username", &app.register.username, app.focus == 0, false),
        rows[0],
    );
    frame.render_widget(
        input_field("Email", &app.register.email, app.focus == 1, false),
        rows[1],
    );
    frame.render_widget(
        input_field("Password", &app.register.password, app.focus == 2, true),
        rows[2],
    );

    // Confirm-field border reflects the match state as the user types.
    let confirm_border = match confirm_state(&app.register.password, &app.register.confirm_password)
    {
        MatchState::Match => palette::OK,
        MatchState::Mismatch => palette::DANGER,
        MatchState::Empty => {
            if app.focus == 3 {
                palette::ACCENT
            } else {
                palette::DIM
            }
        }
    };
    let shown = "\u{2022}".repeat(app.register.confirm_password.chars().count());
    frame.render_widget(
        Paragraph::new(shown).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(confirm_border))
                .title(Span::styled(
                    " Confirm password ",
                    Style::default().fg(confirm_border),
                )),
        ),
        rows[3],
    );

    draw_strength_meter(frame, rows[4], &app.register.password);
    frame.render_widget(Paragraph::new(flash_line(app)), rows[5]);
    frame.render_widget(
        hint_line("Enter create account \u{00b7} Tab next field \u{00b7} Esc back"),
        rows[6],
    );
}

fn draw_strength_meter(frame: &mut Frame, area: Rect, password: &str) {
    let report = password_strength(password);
    let color = if report.score < 30 {
        palette::DANGER
    } else if report.score < 70 {
        palette::WARN
    } else {
        palette::OK
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette::DIM))
                .title(" Password strength "),
        )
        .gauge_style(Style::default().fg(color))
        .percent(u16::from(report.score))
        .label(Span::styled(
            report.label.text(),
            Style::default().fg(Color::White),
        ));
    frame.render_widget(gauge, area);
}

fn draw_verify(frame: &mut Frame, area: Rect, app: &App) {
    let frame_box = centered_rect(56, 13, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette::ACCENT))
        .title(" VitaScope \u{00b7} Verify ");
    let inner = block.inner(frame_box);
    frame.render_widget(block, frame_box);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new("Enter the 6-digit code sent to your email")
            .alignment(Alignment::Center),
        rows[0],
    );

    // Typed digits, remaining positions as underscores.
    let code: String = app
        .otp
        .as_str()
        .chars()
        .chain(std::iter::repeat('_'))
        .take(crate::auth::OTP_LEN)
        .flat_map(|c| [c, ' '])
        .collect();
    frame.render_widget(
        Paragraph::new(code.trim_end().to_string())
            .style(
                Style::default()
                    .fg(palette::ACCENT)
                    .add_modifier(Modifier::BOLD),
            )
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        rows[1],
    );

    let countdown = match app.cooldown.remaining_secs(Instant::now()) {
        Some(secs) => Line::styled(
            format!("Resend available in {secs}s"),
            Style::default().fg(palette::WARN),
        ),
        None => Line::styled(
            "Ctrl+R to resend the code".to_string(),
            Style::default().fg(palette::DIM),
        ),
    };
    frame.render_widget(
        Paragraph::new(countdown).alignment(Alignment::Center),
        rows[2],
    );
    frame.render_widget(Paragraph::new(flash_line(app)), rows[3]);
    frame.render_widget(hint_line("Enter verify \u{00b7} Esc back"), rows[4]);
}

// ============================================
// Dashboard
// ============================================

fn draw_dashboard(frame: &mut Frame, area: Rect, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Min(9),
            Constraint::Length(1),
        ])
        .split(area);

    draw_status(frame, rows[0], app);
    draw_cards(frame, rows[1], app);
    draw_charts(frame, rows[2], app);

    let footer = format!(
        "q quit \u{00b7} refreshing every {}s",
        app.poll_interval_secs()
    );
    frame.render_widget(hint_line(&footer), rows[3]);
}

fn status_style(status: ConnectionStatus) -> (&'static str, Color) {
    match status {
        ConnectionStatus::Connected => ("\u{25cf}", palette::OK),
        ConnectionStatus::Partial => ("\u{25cf}", palette::WARN),
        ConnectionStatus::Disconnected => ("\u{25cf}", palette::DANGER),
        ConnectionStatus::Failed => ("\u{2716}", palette::DANGER),
    }
}

fn draw_status(frame: &mut Frame, area: Rect, app: &App) {
    let snapshot = &app.snapshot;
    let (symbol, color) = status_style(snapshot.status);

    let mut spans = vec![
        Span::styled(format!("{symbol} "), Style::default().fg(color)),
        Span::styled(
            snapshot.status.message(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(updated) = &snapshot.last_updated {
        spans.push(Span::styled(
            format!("  \u{00b7}  last reading {updated}"),
            Style::default().fg(palette::DIM),
        ));
    }
    if snapshot.status == ConnectionStatus::Disconnected && snapshot.consecutive_failures > 0 {
        spans.push(Span::styled(
            format!(
                "  \u{00b7}  reconnecting {}/{}",
                snapshot.consecutive_failures,
                app.max_failures()
            ),
            Style::default().fg(palette::WARN),
        ));
    }

    let title = match &app.profile {
        Some(profile) => format!(" VitaScope \u{00b7} {} ", profile.username),
        None => " VitaScope ".to_string(),
    };

    frame.render_widget(
        Paragraph::new(vec![Line::from(spans), flash_line(app)]).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette::ACCENT))
                .title(title),
        ),
        area,
    );
}

fn draw_cards(frame: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for (column, (kind, reading)) in columns.iter().zip(app.snapshot.readings()) {
        draw_card(frame, *column, kind, reading);
    }
}

fn metric_color(kind: VitalKind) -> Color {
    match kind {
        VitalKind::HeartRate => palette::HEART,
        VitalKind::Spo2 => palette::SPO2,
        VitalKind::RespRate => palette::RESP,
    }
}

fn draw_card(frame: &mut Frame, area: Rect, kind: VitalKind, reading: Reading) {
    let color = metric_color(kind);
    let (indicator, indicator_color, value_color) = if reading.is_valid() {
        ("\u{25cf} live", color, color)
    } else {
        ("\u{25cb} no signal", palette::DIM, palette::DIM)
    };

    let lines = vec![
        Line::styled(
            reading.display(),
            Style::default()
                .fg(value_color)
                .add_modifier(Modifier::BOLD),
        ),
        Line::styled(indicator, Style::default().fg(indicator_color)),
    ];

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(format!(" {} ", kind)),
        ),
        area,
    );
}

fn draw_charts(frame: &mut Frame, area: Rect, app: &App) {
    let series = &app.snapshot.history;
    if series.is_empty() {
        frame.render_widget(
            Paragraph::new("Waiting for live data\u{2026}")
                .style(Style::default().fg(palette::DIM))
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    // Display windows match the web dashboard's fixed axes.
    draw_metric_chart(
        frame,
        rows[0],
        VitalKind::HeartRate,
        &series.heart_rate,
        &series.labels,
        [50.0, 120.0],
    );
    draw_metric_chart(
        frame,
        rows[1],
        VitalKind::Spo2,
        &series.spo2,
        &series.labels,
        [85.0, 100.0],
    );
    draw_metric_chart(
        frame,
        rows[2],
        VitalKind::RespRate,
        &series.resp_rate,
        &series.labels,
        [5.0, 40.0],
    );
}

fn draw_metric_chart(
    frame: &mut Frame,
    area: Rect,
    kind: VitalKind,
    values: &[f64],
    labels: &[String],
    y_bounds: [f64; 2],
) {
    let color = metric_color(kind);
    let data: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .map(|(i, v)| (i as f64, *v))
        .collect();
    let x_max = (data.len().saturating_sub(1)).max(1) as f64;

    let datasets = vec![Dataset::default()
        .name(kind.label())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(color))
        .data(&data)];

    let x_labels = vec![
        Span::styled(
            labels.first().cloned().unwrap_or_default(),
            Style::default().fg(palette::DIM),
        ),
        Span::styled(
            labels.last().cloned().unwrap_or_default(),
            Style::default().fg(palette::DIM),
        ),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette::DIM))
                .title(Span::styled(
                    format!(" {} ", kind),
                    Style::default().fg(color),
                )),
        )
        .x_axis(
            Axis::default()
                .style(Style::default().fg(palette::DIM))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(palette::DIM))
                .bounds(y_bounds)
                .labels(vec![
                    Span::styled(
                        format!("{:.0}", y_bounds[0]),
                        Style::default().fg(palette::DIM),
                    ),
                    Span::styled(
                        format!("{:.0}", y_bounds[1]),
                        Style::default().fg(palette::DIM),
                    ),
                ]),
        );

    frame.render_widget(chart, area);
}
