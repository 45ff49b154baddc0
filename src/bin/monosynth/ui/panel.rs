//! Parameter panel: a control-side mirror of the patch
//!
//! Edits are made on a copy, sent through the handle, and only kept if the
//! engine accepted them, so the panel never shows a value the synth refused.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

use monosynth::{
    dsp::{NoiseColor, Waveform},
    graph::ModulationSource,
    SynthConfig, SynthError, SynthHandle, OSCILLATOR_COUNT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Param {
    MasterVolume,
    Waveform,
    Detune,
    Cutoff,
    Resonance,
    Attack,
    Decay,
    Sustain,
    Release,
    EchoDelay,
    EchoFeedback,
    Modulation,
    ModSource,
    ModRate,
    ModDepth,
    Noise,
    NoiseColor,
    NoiseVolume,
    PitchBend,
}

const PARAMS: [Param; 19] = [
    Param::MasterVolume,
    Param::Waveform,
    Param::Detune,
    Param::Cutoff,
    Param::Resonance,
    Param::Attack,
    Param::Decay,
    Param::Sustain,
    Param::Release,
    Param::EchoDelay,
    Param::EchoFeedback,
    Param::Modulation,
    Param::ModSource,
    Param::ModRate,
    Param::ModDepth,
    Param::Noise,
    Param::NoiseColor,
    Param::NoiseVolume,
    Param::PitchBend,
];

#[derive(Debug, Clone)]
pub struct Panel {
    selected: usize,
    master_volume: f32,
    waveform: Waveform,
    /// Spread in cents: voice 1 goes up by this much, voice 2 down.
    detune: f32,
    cutoff: f32,
    q: f32,
    attack: f32,
    decay: f32,
    sustain: f32,
    release: f32,
    echo_delay: f32,
    echo_feedback: f32,
    mod_enabled: bool,
    mod_source: ModulationSource,
    mod_rate: f32,
    mod_depth: f32,
    noise_enabled: bool,
    noise_color: NoiseColor,
    noise_volume: f32,
    pitch_bend: f32,
}

impl Panel {
    pub fn new(config: &SynthConfig) -> Self {
        Self {
            selected: 0,
            master_volume: config.master_volume,
            waveform: config.oscillators[0].waveform,
            detune: config.oscillators[1].detune_cents,
            cutoff: config.filter.cutoff_fraction,
            q: config.filter.q,
            attack: config.envelope.attack,
            decay: config.envelope.decay,
            sustain: config.envelope.sustain,
            release: config.envelope.release,
            echo_delay: config.echo.delay_seconds,
            echo_feedback: config.echo.feedback,
            mod_enabled: config.modulation.enabled,
            mod_source: config.modulation.source,
            mod_rate: config.modulation.frequency_hz,
            mod_depth: config.modulation.amount,
            noise_enabled: config.noise.enabled,
            noise_color: config.noise.color,
            noise_volume: config.noise.volume,
            pitch_bend: 0.0,
        }
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % PARAMS.len();
    }

    pub fn select_previous(&mut self) {
        self.selected = (self.selected + PARAMS.len() - 1) % PARAMS.len();
    }

    /// Step the selected parameter up (`+1`) or down (`-1`) and send it.
    pub fn adjust(&mut self, direction: f32, handle: &mut SynthHandle) -> Result<(), SynthError> {
        let param = PARAMS[self.selected];
        let mut next = self.clone();
        next.step(param, direction);
        next.send(param, handle)?;
        *self = next;
        Ok(())
    }

    fn step(&mut self, param: Param, direction: f32) {
        fn nudge(value: &mut f32, by: f32, lo: f32, hi: f32) {
            *value = (*value + by).clamp(lo, hi);
        }

        match param {
            Param::MasterVolume => nudge(&mut self.master_volume, 0.05 * direction, 0.0, 1.0),
            Param::Waveform => {
                let index = Waveform::ALL
                    .iter()
                    .position(|&w| w == self.waveform)
                    .unwrap_or(0) as i32;
                let next = (index + direction as i32).rem_euclid(Waveform::ALL.len() as i32);
                self.waveform = Waveform::from_index(next as usize).unwrap_or(self.waveform);
            }
            Param::Detune => nudge(&mut self.detune, 1.0 * direction, 0.0, 100.0),
            Param::Cutoff => nudge(&mut self.cutoff, 0.01 * direction, 0.01, 1.0),
            Param::Resonance => nudge(&mut self.q, 0.25 * direction, 0.25, 30.0),
            Param::Attack => nudge(&mut self.attack, 0.01 * direction, 0.0, 1.0),
            Param::Decay => nudge(&mut self.decay, 0.01 * direction, 0.0, 1.0),
            Param::Sustain => nudge(&mut self.sustain, 0.05 * direction, 0.0, 1.0),
            Param::Release => nudge(&mut self.release, 0.01 * direction, 0.0, 1.0),
            Param::EchoDelay => nudge(&mut self.echo_delay, 0.01 * direction, 0.0, 1.0),
            Param::EchoFeedback => nudge(&mut self.echo_feedback, 0.05 * direction, 0.0, 0.95),
            Param::Modulation => self.mod_enabled = direction > 0.0,
            Param::ModSource => {
                self.mod_source = match self.mod_source {
                    ModulationSource::Lfo => ModulationSource::Noise,
                    ModulationSource::Noise => ModulationSource::Lfo,
                }
            }
            Param::ModRate => nudge(&mut self.mod_rate, 0.5 * direction, 0.5, 50.0),
            Param::ModDepth => nudge(&mut self.mod_depth, 1.0 * direction, 0.0, 200.0),
            Param::Noise => self.noise_enabled = direction > 0.0,
            Param::NoiseColor => {
                self.noise_color = match self.noise_color {
                    NoiseColor::White => NoiseColor::Pink,
                    NoiseColor::Pink => NoiseColor::White,
                }
            }
            Param::NoiseVolume => nudge(&mut self.noise_volume, 0.05 * direction, 0.0, 1.0),
            Param::PitchBend => nudge(&mut self.pitch_bend, 1.0 * direction, -12.0, 12.0),
        }
    }

    fn send(&self, param: Param, handle: &mut SynthHandle) -> Result<(), SynthError> {
        match param {
            Param::MasterVolume => handle.set_master_volume(self.master_volume),
            Param::Waveform => {
                for index in 0..OSCILLATOR_COUNT {
                    handle.set_waveform(index, self.waveform)?;
                }
                Ok(())
            }
            Param::Detune => {
                handle.set_detune(1, self.detune)?;
                handle.set_detune(2, -self.detune)
            }
            Param::Cutoff | Param::Resonance => handle.set_filter(self.cutoff, self.q),
            Param::Attack | Param::Decay | Param::Sustain | Param::Release => {
                handle.set_envelope(self.attack, self.decay, self.sustain, self.release)
            }
            Param::EchoDelay | Param::EchoFeedback => handle.set_echo(self.echo_delay, self.echo_feedback),
            Param::Modulation | Param::ModSource | Param::ModRate | Param::ModDepth => {
                handle.set_modulation(self.mod_depth, self.mod_rate, self.mod_enabled, self.mod_source)
            }
            Param::Noise | Param::NoiseColor | Param::NoiseVolume => {
                handle.set_noise(self.noise_enabled, self.noise_color, self.noise_volume)
            }
            Param::PitchBend => handle.set_pitch_bend(self.pitch_bend),
        }
    }

    fn label(&self, param: Param) -> (&'static str, String) {
        let on_off = |on: bool| String::from(if on { "on" } else { "off" });
        match param {
            Param::MasterVolume => ("Volume", format!("{:.2}", self.master_volume)),
            Param::Waveform => ("Waveform", self.waveform.name().to_string()),
            Param::Detune => ("Detune", format!("±{:.0} ct", self.detune)),
            Param::Cutoff => ("Cutoff", format!("{:.2} × Nyquist", self.cutoff)),
            Param::Resonance => ("Resonance", format!("Q {:.2}", self.q)),
            Param::Attack => ("Attack", format!("{:.2}", self.attack)),
            Param::Decay => ("Decay", format!("{:.2}", self.decay)),
            Param::Sustain => ("Sustain", format!("{:.2}", self.sustain)),
            Param::Release => ("Release", format!("{:.2}", self.release)),
            Param::EchoDelay => ("Echo time", format!("{:.2} s", self.echo_delay)),
            Param::EchoFeedback => ("Echo feedback", format!("{:.2}", self.echo_feedback)),
            Param::Modulation => ("Modulation", on_off(self.mod_enabled)),
            Param::ModSource => ("Mod source", self.mod_source.name().to_string()),
            Param::ModRate => ("Mod rate", format!("{:.1} Hz", self.mod_rate)),
            Param::ModDepth => ("Mod depth", format!("{:.0} Hz", self.mod_depth)),
            Param::Noise => ("Noise", on_off(self.noise_enabled)),
            Param::NoiseColor => ("Noise color", self.noise_color.name().to_string()),
            Param::NoiseVolume => ("Noise volume", format!("{:.2}", self.noise_volume)),
            Param::PitchBend => ("Pitch bend", format!("{:+.0} st", self.pitch_bend)),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = PARAMS
            .iter()
            .map(|&param| {
                let (name, value) = self.label(param);
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{name:<14}")),
                    Span::styled(value, Style::default().fg(Color::Cyan)),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title(" Patch ").borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        let mut state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);
    }
}
