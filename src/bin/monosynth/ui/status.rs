//! Voice status: sounding note, envelope stage and level

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use monosynth::{dsp::EnvelopeStage, SynthSnapshot};

fn stage_name(stage: EnvelopeStage) -> &'static str {
    match stage {
        EnvelopeStage::Idle => "idle",
        EnvelopeStage::Attack => "attack",
        EnvelopeStage::Decay => "decay",
        EnvelopeStage::Sustain => "sustain",
        EnvelopeStage::Release => "release",
    }
}

pub fn render_status(frame: &mut Frame, area: Rect, snapshot: &SynthSnapshot, octave: i32, latch: bool) {
    let block = Block::default().title(" Voice ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Length(1)])
        .split(inner);

    let note = snapshot
        .sounding
        .map(|n| n.to_string())
        .unwrap_or_else(|| "-".to_string());
    let mode = if latch { "latch (space releases)" } else { "hold" };

    let text = vec![
        Line::from(format!("Note      {note:<5} {:>8.2} Hz", snapshot.frequency)),
        Line::from(format!("Held      {}", snapshot.held)),
        Line::from(format!("Envelope  {}", stage_name(snapshot.stage))),
        Line::from(format!("Keys      C{octave}  {mode}")),
    ];
    frame.render_widget(Paragraph::new(text), rows[0]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(snapshot.level.clamp(0.0, 1.0) as f64)
        .label(format!("{:.2}", snapshot.level));
    frame.render_widget(gauge, rows[1]);
}
