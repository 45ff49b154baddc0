use fastrand::Rng;
use log::{debug, info};
use rtrb::{Consumer, Producer, RingBuffer};

use crate::{
    dsp::{
        noise::{NoiseBuffer, NoiseColor, NOISE_BUFFER_SECONDS},
        oscillator::Waveform,
    },
    graph::{
        echo::EchoNode,
        envelope::EnvNode,
        filter::FilterNode,
        modulator::{ModulationSource, ModulatorNode},
        node::{GraphNode, RenderCtx},
        noise::NoiseNode,
        oscillator::OscNode,
    },
    synth::{
        config::SynthConfig,
        handle::SynthHandle,
        message::{SynthMessage, SynthSnapshot},
        note::Note,
        params,
        voice::VoiceController,
    },
    SynthError, MAX_BLOCK_SIZE,
};

/*
Signal Path
===========

    oscillators ─┐
    (x3, routed) ├─(+)─→ [ envelope ] ─┬──────────────(+)─→ [ lowpass ] ─→ [ master ] ─→ out
    noise ───────┘                     └─→ [ echo ] ───┘
                                             ↺ feedback
    modulator ─→ oscillator frequency (never audio)

Every node is created once, here, and never destroyed. Enabling or
disabling a source flips its routed flag; nothing is reconnected while
audio runs.

Two Ways In
-----------

  Owned:   call the setters on MonoSynth directly. Changes are stamped with
           the engine clock (the start of the next block). Used for offline
           rendering and tests.

  Shared:  with_handle() splits off a SynthHandle for the control thread.
           Commands travel over an rtrb ring and are applied at the start
           of the next render_block, stamped with that block's time.

Both paths validate with the same rules and reject a bad value before
touching anything.
*/

/// Depth of the audio → control snapshot ring.
const SNAPSHOT_QUEUE_SIZE: usize = 16;

pub struct MonoSynth {
    sample_rate: f32,
    master_volume: f32,
    voice: VoiceController,
    modulator: ModulatorNode,
    noise: NoiseNode,
    echo: EchoNode,
    filter: FilterNode,
    rng: Rng,
    /// Clock time of the next sample to render.
    clock: f64,

    mod_buffer: Vec<f32>,
    gain_buffer: Vec<f32>,

    rx: Option<Consumer<SynthMessage>>,
    retired: Option<Producer<NoiseBuffer>>,
    snapshots: Option<Producer<SynthSnapshot>>,
}

impl MonoSynth {
    pub fn new(config: &SynthConfig, sample_rate: f32) -> Result<Self, SynthError> {
        let sample_rate = params::sample_rate(sample_rate)?;
        config.validate()?;

        let oscillators = config.oscillators.map(|osc| {
            let mut node = OscNode::new(osc.waveform)
                .with_octave(osc.octave)
                .with_detune(osc.detune_cents)
                .with_gain(osc.volume);
            node.set_routed(osc.enabled);
            node
        });

        let env = &config.envelope;
        let envelope = EnvNode::with_params(
            env.attack,
            env.decay,
            env.sustain,
            env.release,
            env.max_duration,
        );

        let mut rng = Rng::with_seed(config.noise_seed);

        let mod_noise = NoiseBuffer::generate(NoiseColor::White, sample_rate, &mut rng);
        let m = &config.modulation;
        let mut modulator = ModulatorNode::new(mod_noise, m.frequency_hz, m.amount);
        modulator.set(m.amount, m.frequency_hz, m.enabled, m.source);

        let n = &config.noise;
        let noise = NoiseNode::new(
            NoiseBuffer::generate(n.color, sample_rate, &mut rng),
            n.enabled,
            n.volume,
        );

        info!(
            "monosynth ready: {} Hz, {} oscillators, noise loop {} samples",
            sample_rate,
            oscillators.len(),
            (NOISE_BUFFER_SECONDS * sample_rate) as usize
        );

        Ok(Self {
            sample_rate,
            master_volume: config.master_volume,
            voice: VoiceController::new(oscillators, envelope),
            modulator,
            noise,
            echo: EchoNode::new(sample_rate, config.echo.delay_seconds, config.echo.feedback),
            filter: FilterNode::lowpass(config.filter.cutoff_fraction, config.filter.q),
            rng,
            clock: 0.0,
            mod_buffer: vec![0.0; MAX_BLOCK_SIZE],
            gain_buffer: vec![0.0; MAX_BLOCK_SIZE],
            rx: None,
            retired: None,
            snapshots: None,
        })
    }

    /// Build an engine for the audio thread and a handle for the control thread.
    pub fn with_handle(
        config: &SynthConfig,
        sample_rate: f32,
    ) -> Result<(Self, SynthHandle), SynthError> {
        let mut synth = Self::new(config, sample_rate)?;

        let (tx, rx) = RingBuffer::<SynthMessage>::new(config.queue_capacity);
        // Every retired buffer was once a queued command, so the return ring
        // can never hold more than the command ring.
        let (retired_tx, retired_rx) = RingBuffer::<NoiseBuffer>::new(config.queue_capacity);
        let (snapshot_tx, snapshot_rx) = RingBuffer::<SynthSnapshot>::new(SNAPSHOT_QUEUE_SIZE);

        synth.rx = Some(rx);
        synth.retired = Some(retired_tx);
        synth.snapshots = Some(snapshot_tx);

        debug!("control queue: {} commands", config.queue_capacity);
        let handle = SynthHandle::new(tx, retired_rx, snapshot_rx, config, sample_rate);
        Ok((synth, handle))
    }

    /// Render one block of mono samples starting at `ctx.time`.
    ///
    /// Pending commands are applied first, all stamped with `ctx.time`.
    /// Blocks longer than `MAX_BLOCK_SIZE` are split internally.
    pub fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.drain_queue(ctx.time);

        let mut ctx = *ctx;
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_chunk(chunk, &ctx);
            ctx = ctx.advanced(chunk.len());
        }
        self.clock = ctx.time;

        let snapshot = self.snapshot();
        if let Some(snapshots) = self.snapshots.as_mut() {
            // A UI that stopped reading just misses updates
            let _ = snapshots.push(snapshot);
        }
    }

    fn render_chunk(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let len = out.len();
        let modulation = &mut self.mod_buffer[..len];
        let gain = &mut self.gain_buffer[..len];

        self.modulator.render_block(modulation, ctx);

        out.fill(0.0);
        for osc in self.voice.oscillators_mut().iter_mut() {
            osc.mix_into(out, modulation, ctx);
        }
        self.noise.mix_into(out);

        self.voice.envelope_mut().render_block(gain, ctx);
        for (sample, g) in out.iter_mut().zip(gain.iter()) {
            *sample *= g;
        }

        // x + echo, then lowpass
        self.echo.render_block(out, ctx);
        self.filter.render_block(out, ctx);

        for sample in out.iter_mut() {
            *sample *= self.master_volume;
        }
    }

    fn drain_queue(&mut self, now: f64) {
        let Some(mut rx) = self.rx.take() else {
            return;
        };
        while let Ok(msg) = rx.pop() {
            self.apply(msg, now);
        }
        self.rx = Some(rx);
    }

    /// Apply an already validated command.
    fn apply(&mut self, msg: SynthMessage, now: f64) {
        match msg {
            SynthMessage::NoteOn(note) => {
                self.voice.note_on(note, now);
            }
            SynthMessage::NoteOff(note) => {
                self.voice.note_off(note, now);
            }
            SynthMessage::AllNotesOff => self.voice.all_notes_off(now),
            SynthMessage::PitchBend { semitones } => self.voice.set_pitch_bend(semitones),
            SynthMessage::MasterVolume(volume) => self.master_volume = volume,
            SynthMessage::Waveform { index, waveform } => {
                if let Some(osc) = self.voice.oscillators_mut().get_mut(index) {
                    osc.set_waveform(waveform);
                }
            }
            SynthMessage::Detune { index, cents } => {
                if let Some(osc) = self.voice.oscillators_mut().get_mut(index) {
                    osc.set_detune(cents);
                }
            }
            SynthMessage::Octave { index, octave } => self.voice.set_octave(index, octave),
            SynthMessage::OscillatorVolume { index, volume } => {
                if let Some(osc) = self.voice.oscillators_mut().get_mut(index) {
                    osc.set_gain(volume);
                }
            }
            SynthMessage::OscillatorEnabled { index, enabled } => {
                if let Some(osc) = self.voice.oscillators_mut().get_mut(index) {
                    osc.set_routed(enabled);
                }
            }
            SynthMessage::Modulation {
                amount,
                frequency_hz,
                enabled,
                source,
            } => self.modulator.set(amount, frequency_hz, enabled, source),
            SynthMessage::Noise {
                enabled,
                volume,
                buffer,
            } => {
                if let Some(buffer) = buffer {
                    let old = self.noise.swap_buffer(buffer);
                    self.retire(old);
                }
                self.noise.set_enabled(enabled);
                self.noise.set_volume(volume);
            }
            SynthMessage::Filter { cutoff_fraction, q } => self.filter.set(cutoff_fraction, q),
            SynthMessage::Envelope {
                attack,
                decay,
                sustain,
                release,
            } => self
                .voice
                .envelope_mut()
                .set_adsr(attack, decay, sustain, release),
            SynthMessage::Echo {
                delay_seconds,
                feedback,
            } => self.echo.set(delay_seconds, feedback),
        }
    }

    /// Hand a swapped-out noise loop back to the control thread for disposal.
    fn retire(&mut self, buffer: NoiseBuffer) {
        if let Some(retired) = self.retired.as_mut() {
            // Sized so this cannot fail; if it ever does the buffer drops here.
            let _ = retired.push(buffer);
        }
    }

    /* Direct control surface ========================================== */

    pub fn note_on(&mut self, note: Note) -> Result<(), SynthError> {
        let note = params::note(note)?;
        self.apply(SynthMessage::NoteOn(note), self.clock);
        Ok(())
    }

    pub fn note_off(&mut self, note: Note) -> Result<(), SynthError> {
        let note = params::note(note)?;
        self.apply(SynthMessage::NoteOff(note), self.clock);
        Ok(())
    }

    pub fn all_notes_off(&mut self) -> Result<(), SynthError> {
        self.apply(SynthMessage::AllNotesOff, self.clock);
        Ok(())
    }

    pub fn set_pitch_bend(&mut self, semitones: f32) -> Result<(), SynthError> {
        let semitones = params::pitch_bend(semitones)?;
        self.apply(SynthMessage::PitchBend { semitones }, self.clock);
        Ok(())
    }

    pub fn set_master_volume(&mut self, volume: f32) -> Result<(), SynthError> {
        let volume = params::volume("master_volume", volume)?;
        self.apply(SynthMessage::MasterVolume(volume), self.clock);
        Ok(())
    }

    pub fn set_waveform(&mut self, index: usize, waveform: Waveform) -> Result<(), SynthError> {
        let index = params::oscillator_index(index)?;
        self.apply(SynthMessage::Waveform { index, waveform }, self.clock);
        Ok(())
    }

    pub fn set_detune(&mut self, index: usize, cents: f32) -> Result<(), SynthError> {
        let index = params::oscillator_index(index)?;
        let cents = params::detune(cents)?;
        self.apply(SynthMessage::Detune { index, cents }, self.clock);
        Ok(())
    }

    pub fn set_octave(&mut self, index: usize, octave: i32) -> Result<(), SynthError> {
        let index = params::oscillator_index(index)?;
        let octave = params::octave(octave)?;
        self.apply(SynthMessage::Octave { index, octave }, self.clock);
        Ok(())
    }

    pub fn set_oscillator_volume(&mut self, index: usize, volume: f32) -> Result<(), SynthError> {
        let index = params::oscillator_index(index)?;
        let volume = params::volume("oscillator_volume", volume)?;
        self.apply(SynthMessage::OscillatorVolume { index, volume }, self.clock);
        Ok(())
    }

    pub fn set_oscillator_enabled(&mut self, index: usize, enabled: bool) -> Result<(), SynthError> {
        let index = params::oscillator_index(index)?;
        self.apply(SynthMessage::OscillatorEnabled { index, enabled }, self.clock);
        Ok(())
    }

    pub fn set_modulation(
        &mut self,
        amount: f32,
        frequency_hz: f32,
        enabled: bool,
        source: ModulationSource,
    ) -> Result<(), SynthError> {
        params::modulation(amount, frequency_hz)?;
        let msg = SynthMessage::Modulation {
            amount,
            frequency_hz,
            enabled,
            source,
        };
        self.apply(msg, self.clock);
        Ok(())
    }

    /// Switching color regenerates the loop; enabled and volume carry over.
    pub fn set_noise(&mut self, enabled: bool, color: NoiseColor, volume: f32) -> Result<(), SynthError> {
        let volume = params::volume("noise_volume", volume)?;

        let buffer = if color != self.noise.color() {
            debug!("regenerating {} noise", color.name());
            Some(NoiseBuffer::generate(color, self.sample_rate, &mut self.rng))
        } else {
            None
        };

        let msg = SynthMessage::Noise {
            enabled,
            volume,
            buffer,
        };
        self.apply(msg, self.clock);
        Ok(())
    }

    pub fn set_filter(&mut self, cutoff_fraction: f32, q: f32) -> Result<(), SynthError> {
        let (cutoff_fraction, q) = params::filter(cutoff_fraction, q)?;
        self.apply(SynthMessage::Filter { cutoff_fraction, q }, self.clock);
        Ok(())
    }

    /// New shape applies from the next note-on or note-off.
    pub fn set_envelope(
        &mut self,
        attack: f32,
        decay: f32,
        sustain: f32,
        release: f32,
    ) -> Result<(), SynthError> {
        params::envelope(attack, decay, sustain, release)?;
        let msg = SynthMessage::Envelope {
            attack,
            decay,
            sustain,
            release,
        };
        self.apply(msg, self.clock);
        Ok(())
    }

    pub fn set_echo(&mut self, delay_seconds: f32, feedback: f32) -> Result<(), SynthError> {
        params::echo(delay_seconds, feedback)?;
        let msg = SynthMessage::Echo {
            delay_seconds,
            feedback,
        };
        self.apply(msg, self.clock);
        Ok(())
    }

    /* Inspection ======================================================= */

    pub fn snapshot(&self) -> SynthSnapshot {
        SynthSnapshot {
            time: self.clock,
            sounding: self.voice.sounding(),
            frequency: self.voice.oscillators()[0].frequency(),
            stage: self.voice.stage_at(self.clock),
            level: self.voice.level_at(self.clock),
            held: self.voice.held(),
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Clock time of the next sample to render.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    pub fn voice(&self) -> &VoiceController {
        &self.voice
    }

    pub fn oscillator(&self, index: usize) -> Option<&OscNode> {
        self.voice.oscillators().get(index)
    }

    pub fn modulator(&self) -> &ModulatorNode {
        &self.modulator
    }

    pub fn noise(&self) -> &NoiseNode {
        &self.noise
    }

    pub fn filter(&self) -> &FilterNode {
        &self.filter
    }

    pub fn echo(&self) -> &EchoNode {
        &self.echo
    }

    /// Silence everything and rewind the clock. Settings are kept.
    pub fn reset(&mut self) {
        self.voice.all_notes_off(self.clock);
        for osc in self.voice.oscillators_mut().iter_mut() {
            osc.reset();
        }
        self.voice.envelope_mut().reset();
        self.modulator.reset();
        self.echo.reset();
        self.filter.reset();
        self.clock = 0.0;
    }
}
