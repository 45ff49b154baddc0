//! Audio device setup and the audio-thread side of the demo

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{error, info};
use rtrb::{Producer, RingBuffer};

use monosynth::{
    io::{render_frames, Renderer},
    MonoSynth, SynthConfig, SynthError,
};

use super::ui::UiApp;

/// Samples kept for the oscilloscope.
const SCOPE_QUEUE_SIZE: usize = 8_192;

pub struct App {
    config: SynthConfig,
}

impl App {
    pub fn new(config: SynthConfig) -> Self {
        Self { config }
    }

    /// Open the default device, start the engine on it and hand the terminal to the UI.
    pub fn run(self) -> EyreResult<()> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| SynthError::RendererUnavailable("no default output device".into()))?;
        let stream_config = device
            .default_output_config()
            .map_err(|e| SynthError::RendererUnavailable(e.to_string()))
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = stream_config.sample_rate().0 as f32;
        let channels = stream_config.channels() as usize;
        info!(
            "output device {:?}: {} Hz, {} channels",
            device.name().unwrap_or_default(),
            sample_rate,
            channels
        );

        let (synth, handle) = MonoSynth::with_handle(&self.config, sample_rate)?;
        let (scope_tx, scope_rx) = RingBuffer::<f32>::new(SCOPE_QUEUE_SIZE);

        // The engine moves into the callback; the audio thread is its only owner.
        let mut audio = AudioState {
            synth,
            scope: scope_tx,
            frames: 0,
            sample_rate,
            channels,
        };

        let stream = device
            .build_output_stream(
                &stream_config.into(),
                move |data: &mut [f32], _| audio.fill(data),
                |err| error!("audio stream error: {err}"),
                None,
            )
            .map_err(|e| SynthError::RendererUnavailable(e.to_string()))?;
        stream
            .play()
            .map_err(|e| SynthError::RendererUnavailable(e.to_string()))?;

        let mut terminal = ratatui::init();
        let result = UiApp::new(handle, scope_rx, self.config, sample_rate).run(&mut terminal);
        ratatui::restore();

        drop(stream);
        result
    }
}

/// Everything the audio callback owns.
struct AudioState {
    synth: MonoSynth,
    scope: Producer<f32>,
    /// Frames delivered to the device so far: the engine clock.
    frames: u64,
    sample_rate: f32,
    channels: usize,
}

impl AudioState {
    fn fill(&mut self, data: &mut [f32]) {
        let frames = data.len() / self.channels;
        let mut device = DeviceBuffer {
            data,
            channels: self.channels,
            cursor: 0,
            start_frame: self.frames,
            sample_rate: self.sample_rate,
            scope: &mut self.scope,
        };

        render_frames(&mut self.synth, &mut device, frames);
        self.frames += frames as u64;
    }
}

/// One device callback's interleaved buffer, seen as a `Renderer`.
///
/// Mono samples are copied to every channel; a copy also goes to the scope
/// ring when the UI keeps up.
struct DeviceBuffer<'a> {
    data: &'a mut [f32],
    channels: usize,
    cursor: usize,
    start_frame: u64,
    sample_rate: f32,
    scope: &'a mut Producer<f32>,
}

impl Renderer for DeviceBuffer<'_> {
    fn current_time(&self) -> f64 {
        (self.start_frame + self.cursor as u64) as f64 / self.sample_rate as f64
    }

    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn output(&mut self, samples: &[f32]) {
        for &sample in samples {
            let offset = self.cursor * self.channels;
            if let Some(frame) = self.data.get_mut(offset..offset + self.channels) {
                frame.fill(sample);
            }
            let _ = self.scope.push(sample);
            self.cursor += 1;
        }
    }
}
