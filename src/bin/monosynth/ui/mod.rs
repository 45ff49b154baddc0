//! TUI for monosynth
//!
//! A parameter panel, the voice status and an oscilloscope. The computer
//! keyboard plays notes.

mod keyboard;
mod panel;
mod status;
mod waveform;

use std::{io, time::Duration};

use color_eyre::eyre::Result as EyreResult;
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::supports_keyboard_enhancement,
};
use log::{info, warn};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

use monosynth::{Note, SynthConfig, SynthError, SynthHandle, SynthSnapshot};

use keyboard::{note_for_key, MAX_OCTAVE, MIN_OCTAVE};
use panel::Panel;
use status::render_status;
use waveform::render_waveform;

/// Samples shown in the oscilloscope.
const SCOPE_SIZE: usize = 1024;

pub struct UiApp {
    handle: SynthHandle,
    scope_rx: Consumer<f32>,
    scope: Vec<f32>,
    snapshot: SynthSnapshot,
    panel: Panel,
    /// Lower keyboard row starts at C of this octave.
    octave: i32,
    /// Keys currently down (or latched), with the note each one started.
    held: Vec<(char, Note)>,
    /// No key-release events from this terminal: keys toggle instead.
    latch: bool,
    message: Option<String>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(handle: SynthHandle, scope_rx: Consumer<f32>, config: SynthConfig, sample_rate: f32) -> Self {
        info!("ui up at {sample_rate} Hz");
        Self {
            handle,
            scope_rx,
            scope: vec![0.0; SCOPE_SIZE],
            snapshot: SynthSnapshot::default(),
            panel: Panel::new(&config),
            octave: 4,
            held: Vec::new(),
            latch: true,
            message: None,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        self.latch = !supports_keyboard_enhancement().unwrap_or(false);
        if !self.latch {
            execute!(
                io::stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        info!("keyboard mode: {}", if self.latch { "latch" } else { "hold" });

        let result = self.event_loop(terminal);

        if !self.latch {
            execute!(io::stdout(), PopKeyboardEnhancementFlags)?;
        }
        result
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.snapshot = self.handle.snapshot();

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    self.handle_key(key);
                }
            }
        }

        // Don't leave a note hanging
        let _ = self.handle.all_notes_off();
        Ok(())
    }

    fn poll_audio(&mut self) {
        while let Ok(sample) = self.scope_rx.pop() {
            self.scope.push(sample);
        }
        if self.scope.len() > SCOPE_SIZE {
            let excess = self.scope.len() - SCOPE_SIZE;
            self.scope.drain(0..excess);
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let result = match (key.code, key.kind) {
            (KeyCode::Esc, KeyEventKind::Press) => {
                self.should_quit = true;
                Ok(())
            }
            (KeyCode::Char(c), kind) if note_for_key(c, self.octave).is_some() => self.play_key(c, kind),
            (KeyCode::Char(' '), KeyEventKind::Press) => {
                self.handle.all_notes_off().map(|()| self.held.clear())
            }
            (KeyCode::Char('['), KeyEventKind::Press) => {
                self.octave = (self.octave - 1).max(MIN_OCTAVE);
                Ok(())
            }
            (KeyCode::Char(']'), KeyEventKind::Press) => {
                self.octave = (self.octave + 1).min(MAX_OCTAVE);
                Ok(())
            }
            (KeyCode::Up, KeyEventKind::Press | KeyEventKind::Repeat) => {
                self.panel.adjust(1.0, &mut self.handle)
            }
            (KeyCode::Down, KeyEventKind::Press | KeyEventKind::Repeat) => {
                self.panel.adjust(-1.0, &mut self.handle)
            }
            (KeyCode::Right | KeyCode::Tab, KeyEventKind::Press) => {
                self.panel.select_next();
                Ok(())
            }
            (KeyCode::Left | KeyCode::BackTab, KeyEventKind::Press) => {
                self.panel.select_previous();
                Ok(())
            }
            _ => Ok(()),
        };

        if let Err(err) = result {
            warn!("{err}");
            self.message = Some(err.to_string());
        }
    }

    fn play_key(&mut self, key: char, kind: KeyEventKind) -> Result<(), SynthError> {
        let key = key.to_ascii_lowercase();
        let down = self.held.iter().position(|&(k, _)| k == key);

        match (kind, down) {
            // Hold mode: press and release map straight to note on/off
            (KeyEventKind::Press, None) => {
                let Some(note) = note_for_key(key, self.octave) else {
                    return Ok(());
                };
                self.handle.note_on(note)?;
                self.held.push((key, note));
            }
            (KeyEventKind::Press, Some(index)) if self.latch => {
                release_held(&mut self.held, index, |note| self.handle.note_off(note))?;
            }
            (KeyEventKind::Release, Some(index)) => {
                release_held(&mut self.held, index, |note| self.handle.note_off(note))?;
            }
            _ => {}
        }
        self.message = None;
        Ok(())
    }

    fn render(&self, frame: &mut Frame) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(12),   // Panel + status
                Constraint::Length(8), // Oscilloscope
                Constraint::Length(1), // Help / message
            ])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[0]);

        self.panel.render(frame, columns[0]);
        render_status(frame, columns[1], &self.snapshot, self.octave, self.latch);
        render_waveform(frame, rows[1], &self.scope);

        let (text, color) = match &self.message {
            Some(message) => (format!(" {message}"), Color::Red),
            None => (
                " [Esc] Quit  [z..m q..p] Play  [Space] Release all  [ [ ] ] Octave  [←→] Select  [↑↓] Adjust"
                    .to_string(),
                Color::DarkGray,
            ),
        };
        frame.render_widget(Paragraph::new(text).style(Style::default().fg(color)), rows[2]);
    }
}

/// Send the note-off for `held[index]` and forget the key only once it is queued,
/// so a release dropped by a full queue can be retried.
fn release_held<F>(held: &mut Vec<(char, Note)>, index: usize, note_off: F) -> Result<(), SynthError>
where
    F: FnOnce(Note) -> Result<(), SynthError>,
{
    note_off(held[index].1)?;
    held.remove(index);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_stays_held_when_release_is_not_queued() {
        let mut held = vec![('a', Note::C4), ('k', Note::A4)];

        let result = release_held(&mut held, 1, |_| Err(SynthError::QueueFull));
        assert_eq!(result, Err(SynthError::QueueFull));
        assert_eq!(held.len(), 2);

        let mut sent = None;
        release_held(&mut held, 1, |note| {
            sent = Some(note);
            Ok(())
        })
        .unwrap();
        assert_eq!(sent, Some(Note::A4));
        assert_eq!(held, vec![('a', Note::C4)]);
    }
}
