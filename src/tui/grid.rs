use crate::sequencer::{Mode, StepSlot};
use crate::shared::{DisplayState, NUM_STEPS, Rgb, STEP_COLORS};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn rgb_color(c: Rgb) -> Color {
    let (r, g, b) = c.to_u8();
    Color::Rgb(r, g, b)
}

pub fn interval_label(interval: i32) -> String {
    match interval {
        0 => "root".to_string(),
        i => format!("{i:+}"),
    }
}

pub fn draw_step_row(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, NUM_STEPS as u32); NUM_STEPS])
        .split(area);

    for (idx, cell_area) in cols.iter().enumerate() {
        draw_step(frame, *cell_area, idx, &state.steps[idx], state);
    }
}

fn draw_step(frame: &mut Frame, area: Rect, idx: usize, step: &StepSlot, state: &DisplayState) {
    let playing = idx == state.current_step;
    let selected = state.mode == Mode::Edit && idx == state.edit_cursor;

    let border = if selected {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else if playing {
        Style::default().fg(rgb_color(STEP_COLORS[idx]))
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let body = if step.active {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    // playhead marker under the number, lit while the gate is high
    let marker = match (playing, playing && state.gate) {
        (true, true) => "▶ ●",
        (true, false) => "▶",
        _ => "",
    };

    let lines = vec![
        Line::from(if step.active { "■" } else { "□" }),
        Line::from(interval_label(step.interval)),
        Line::from(format!("{:.0}", step.frequency)),
        Line::from(marker),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!("{}", idx + 1));
    let para = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .style(body)
        .block(block);
    frame.render_widget(para, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_labels() {
        assert_eq!(interval_label(0), "root");
        assert_eq!(interval_label(3), "+3");
        assert_eq!(interval_label(-6), "-6");
    }

    #[test]
    fn led_colors_are_scaled_to_bytes() {
        assert_eq!(rgb_color(Rgb::ORANGE), Color::Rgb(255, 204, 0));
        assert_eq!(rgb_color(Rgb::OFF), Color::Rgb(0, 0, 0));
    }
}
