use crate::sequencer::Mode;
use crate::shared::{DisplayState, Rgb};
use super::grid::{draw_step_row, rgb_color};
use super::mode::TuiState;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};
use ratatui::Frame;

const HELP: &str = "[ ] tempo   - = pitch   , . select   tab edit/view   space step   h help   esc quit";

pub fn render(frame: &mut Frame, area: Rect, state: &DisplayState, ts: &TuiState, blink_on: bool) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // lcd screen
            Constraint::Length(6), // step row
            Constraint::Length(3), // leds + knobs
            Constraint::Min(1),    // footer
        ])
        .split(area);

    draw_screen(frame, sections[0], state);
    draw_step_row(frame, sections[1], state);
    draw_panel_row(frame, sections[2], state);
    draw_footer(frame, sections[3], state, ts, blink_on);
}

fn draw_screen(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let mode_style = match state.mode {
        Mode::Edit => Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        Mode::View => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    };
    let tracked = if state.tracked_hz > 0.0 {
        format!("{:.1} Hz", state.tracked_hz)
    } else {
        "--".to_string()
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(state.mode.label(), mode_style),
            Span::raw(format!("   {:.1} BPM", state.tempo_bpm)),
            Span::raw(format!("   step {}", state.current_step + 1)),
        ]),
        Line::from(format!("in  {tracked}")),
        Line::from(format!("cv  {:+.3} V   gate {}", state.cv_volts, if state.gate { "HI" } else { "lo" })),
    ];
    let para = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("stepcv"));
    frame.render_widget(para, area);
}

fn led(label: &str, color: Rgb) -> Span<'static> {
    let lit = color != Rgb::OFF;
    let style = if lit {
        Style::default().fg(rgb_color(color))
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(format!("{} {label}  ", if lit { "●" } else { "○" }), style)
}

fn draw_panel_row(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let ind = &state.indicators;
    let gate_in = if ind.gate_in { Rgb::WHITE } else { Rgb::OFF };
    let leds = Line::from(vec![led("step", ind.step), led("status", ind.status), led("gate in", gate_in)]);
    frame.render_widget(
        Paragraph::new(leds).block(Block::default().borders(Borders::ALL).title("leds")),
        cols[0],
    );

    frame.render_widget(knob("tempo", state.tempo_knob), cols[1]);
    frame.render_widget(knob("pitch", state.pitch_knob), cols[2]);
}

fn knob(title: &str, value: f32) -> Gauge<'_> {
    Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(title))
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(value.clamp(0.0, 1.0) as f64)
}

fn draw_footer(frame: &mut Frame, area: Rect, state: &DisplayState, ts: &TuiState, blink_on: bool) {
    let mut spans = Vec::new();
    if state.overruns > 0 && blink_on {
        spans.push(Span::styled(format!("XRUN {}  ", state.overruns), Style::default().fg(Color::Red)));
    }
    if state.starved > 0 {
        spans.push(Span::styled(
            format!("starved {}  ", state.starved),
            Style::default().fg(Color::DarkGray),
        ));
    }
    if ts.show_help {
        spans.push(Span::styled(HELP, Style::default().fg(Color::DarkGray)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
