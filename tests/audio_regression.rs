use monosynth::{
    dsp::{EnvelopeStage, NoiseColor, Waveform},
    graph::{ModulationSource, RenderCtx},
    io::{render_frames, OfflineRenderer},
    MonoSynth, Note, SynthConfig, SynthError, OSCILLATOR_COUNT,
};

const SAMPLE_RATE: f32 = 48_000.0;

fn engine() -> MonoSynth {
    MonoSynth::new(&SynthConfig::default(), SAMPLE_RATE).unwrap()
}

/// One plain sine voice, filter wide open, no echo.
fn bare_sine() -> MonoSynth {
    let mut config = SynthConfig::default();
    config.oscillators[0].waveform = Waveform::Sine;
    config.oscillators[0].volume = 1.0;
    config.oscillators[1].enabled = false;
    config.oscillators[2].enabled = false;
    config.filter.cutoff_fraction = 1.0;
    config.filter.q = 0.707;
    config.echo.feedback = 0.0;
    config.envelope.attack = 0.0;
    config.envelope.sustain = 1.0;
    config.master_volume = 1.0;
    MonoSynth::new(&config, SAMPLE_RATE).unwrap()
}

fn render(synth: &mut MonoSynth, renderer: &mut OfflineRenderer, seconds: f32) -> Vec<f32> {
    let start = renderer.samples().len();
    render_frames(synth, renderer, (seconds * SAMPLE_RATE) as usize);
    renderer.samples()[start..].to_vec()
}

fn rms(samples: &[f32]) -> f32 {
    (samples.iter().map(|s| s * s).sum::<f32>() / samples.len().max(1) as f32).sqrt()
}

/// Rising zero crossings per second.
fn estimate_frequency(samples: &[f32]) -> f32 {
    let crossings = samples
        .windows(2)
        .filter(|pair| pair[0] < 0.0 && pair[1] >= 0.0)
        .count();
    crossings as f32 * SAMPLE_RATE / samples.len() as f32
}

#[test]
fn a4_renders_at_440_hz() {
    let mut synth = bare_sine();
    let mut renderer = OfflineRenderer::new(SAMPLE_RATE);

    synth.note_on(Note::A4).unwrap();
    render(&mut synth, &mut renderer, 0.1);
    let steady = render(&mut synth, &mut renderer, 1.0);

    let frequency = estimate_frequency(&steady);
    assert!((frequency - 440.0).abs() <= 2.0, "measured {frequency} Hz");
}

#[test]
fn highest_note_wins_then_falls_back() {
    let mut synth = bare_sine();
    let mut renderer = OfflineRenderer::new(SAMPLE_RATE);

    // on 0, on 12, off 0, off 12
    synth.note_on(Note(0)).unwrap();
    let low = render(&mut synth, &mut renderer, 0.5);
    assert!((estimate_frequency(&low[4_800..]) - 440.0).abs() <= 3.0);

    synth.note_on(Note(12)).unwrap();
    let high = render(&mut synth, &mut renderer, 0.5);
    assert!((estimate_frequency(&high[4_800..]) - 880.0).abs() <= 3.0);

    // Releasing the lower note leaves the upper one sounding, no release
    synth.note_off(Note(0)).unwrap();
    let still_high = render(&mut synth, &mut renderer, 0.5);
    assert!((estimate_frequency(&still_high[4_800..]) - 880.0).abs() <= 3.0);
    assert_ne!(synth.snapshot().stage, EnvelopeStage::Release);

    synth.note_off(Note(12)).unwrap();
    assert_eq!(synth.snapshot().held, 0);
    render(&mut synth, &mut renderer, 0.1);
    assert_eq!(synth.snapshot().stage, EnvelopeStage::Release);
}

#[test]
fn release_returns_to_silence() {
    let mut synth = engine();
    let mut renderer = OfflineRenderer::new(SAMPLE_RATE);

    synth.note_on(Note::C4).unwrap();
    let sustained = render(&mut synth, &mut renderer, 1.0);
    assert!(rms(&sustained[24_000..]) > 0.01);

    synth.note_off(Note::C4).unwrap();
    // 0.8 s release, then the echo dies away
    render(&mut synth, &mut renderer, 3.0);
    let silence = render(&mut synth, &mut renderer, 0.1);

    assert!(rms(&silence) < 1e-4, "tail rms {}", rms(&silence));
    assert_eq!(synth.snapshot().stage, EnvelopeStage::Idle);
}

#[test]
fn output_stays_bounded_with_everything_on() {
    let mut synth = engine();
    let mut renderer = OfflineRenderer::new(SAMPLE_RATE);

    synth.set_noise(true, NoiseColor::Pink, 1.0).unwrap();
    synth
        .set_modulation(50.0, 7.0, true, ModulationSource::Lfo)
        .unwrap();
    synth.set_echo(0.25, 0.9).unwrap();

    for note in [Note(-12), Note(0), Note(7), Note(12)] {
        synth.note_on(note).unwrap();
        render(&mut synth, &mut renderer, 0.2);
    }

    let samples = renderer.samples();
    assert!(samples.iter().all(|s| s.is_finite()));
    assert!(samples.iter().any(|&s| s != 0.0));
}

#[test]
fn render_is_deterministic_for_a_seed() {
    let play = || {
        let mut synth = engine();
        let mut renderer = OfflineRenderer::new(SAMPLE_RATE);
        synth.set_noise(true, NoiseColor::White, 0.5).unwrap();
        synth
            .set_modulation(20.0, 5.0, true, ModulationSource::Noise)
            .unwrap();
        synth.note_on(Note::A4).unwrap();
        render(&mut synth, &mut renderer, 0.25)
    };

    assert_eq!(play(), play());
}

#[test]
fn handle_commands_take_effect_at_block_boundary() {
    let (mut synth, mut handle) = MonoSynth::with_handle(&SynthConfig::default(), SAMPLE_RATE).unwrap();
    let mut block = vec![0.0f32; 512];

    handle.note_on(Note::A4).unwrap();
    handle.set_filter(0.25, 2.0).unwrap();
    assert_eq!(synth.snapshot().held, 0, "nothing applies before the next block");

    synth.render_block(&mut block, &RenderCtx::new(SAMPLE_RATE, 0.0));
    assert_eq!(synth.snapshot().held, 1);
    assert_eq!(synth.filter().cutoff_fraction(), 0.25);

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.sounding, Some(Note::A4));
    assert_eq!(snapshot.stage, EnvelopeStage::Attack);
}

#[test]
fn handle_noise_switch_reaches_engine() {
    let (mut synth, mut handle) = MonoSynth::with_handle(&SynthConfig::default(), SAMPLE_RATE).unwrap();
    let mut block = vec![0.0f32; 256];

    handle.set_noise(true, NoiseColor::Pink, 0.4).unwrap();
    synth.render_block(&mut block, &RenderCtx::new(SAMPLE_RATE, 0.0));

    assert_eq!(synth.noise().color(), NoiseColor::Pink);
    assert!(synth.noise().is_enabled());
    assert_eq!(synth.noise().volume(), 0.4);
    assert_eq!(handle.collect_retired(), 1);
}

#[test]
fn queue_overflow_is_an_error_not_a_block() {
    let config = SynthConfig {
        queue_capacity: 4,
        ..SynthConfig::default()
    };
    let (_synth, mut handle) = MonoSynth::with_handle(&config, SAMPLE_RATE).unwrap();

    for n in 0..4 {
        handle.note_on(Note(n)).unwrap();
    }
    assert_eq!(handle.note_on(Note(4)), Err(SynthError::QueueFull));
}

#[test]
fn rejected_parameters_change_nothing() {
    let mut synth = engine();

    assert!(synth.set_echo(0.1, 1.0).is_err());
    assert!(synth.set_echo(1.5, 0.5).is_err());
    assert!(synth.set_filter(0.0, 5.0).is_err());
    assert!(synth.set_envelope(0.1, 0.2, 1.5, 0.4).is_err());
    assert!(synth.set_master_volume(-0.1).is_err());
    assert!(synth.set_pitch_bend(f32::NAN).is_err());
    assert_eq!(
        synth.set_waveform(OSCILLATOR_COUNT, Waveform::Square),
        Err(SynthError::InvalidIndex {
            index: OSCILLATOR_COUNT,
            count: OSCILLATOR_COUNT
        })
    );

    assert_eq!(synth.echo().delay_seconds(), 0.1);
    assert_eq!(synth.echo().feedback(), 0.5);
    assert_eq!(synth.filter().cutoff_fraction(), 0.5);
    assert_eq!(synth.master_volume(), 0.8);
    assert_eq!(synth.voice().pitch_bend(), 0.0);
    assert!(synth
        .voice()
        .oscillators()
        .iter()
        .all(|osc| osc.waveform() == Waveform::Sawtooth));
}

#[test]
fn extreme_pitch_input_never_poisons_the_output() {
    let mut synth = engine();
    let mut renderer = OfflineRenderer::new(SAMPLE_RATE);

    synth.note_on(Note::A4).unwrap();
    assert!(synth.set_pitch_bend(2_000.0).is_err());
    assert!(synth.note_on(Note(3_000)).is_err());
    synth.set_octave(1, 8).unwrap();
    assert!(synth.note_on(Note(i32::MAX)).is_err());

    // Every accepted extreme at once still renders finite samples
    synth.set_pitch_bend(48.0).unwrap();
    synth.note_on("G9".parse().unwrap()).unwrap();
    synth.set_modulation(2_000.0, 100.0, true, ModulationSource::Noise).unwrap();
    let loud = render(&mut synth, &mut renderer, 0.1);
    assert!(loud.iter().all(|s| s.is_finite()));

    synth.set_pitch_bend(0.0).unwrap();
    synth.set_modulation(0.0, 5.0, false, ModulationSource::Lfo).unwrap();
    synth.set_octave(1, 4).unwrap();
    synth.all_notes_off().unwrap();
    render(&mut synth, &mut renderer, 0.1);
    synth.note_on(Note::A4).unwrap();
    let after = render(&mut synth, &mut renderer, 0.1);

    assert!(after.iter().all(|s| s.is_finite()));
    assert!(rms(&after) > 0.01);
    assert_eq!(synth.snapshot().frequency, 440.0);
}

#[test]
fn handle_rejects_notes_outside_the_keyboard() {
    let (_synth, mut handle) = MonoSynth::with_handle(&SynthConfig::default(), SAMPLE_RATE).unwrap();

    assert!(matches!(handle.note_on(Note(3_000)), Err(SynthError::InvalidNote(_))));
    assert!(handle.note_off(Note(-70)).is_err());
    assert!(handle.set_pitch_bend(-49.0).is_err());
    assert_eq!(handle.pending(), 0);
}

#[test]
fn disabled_oscillator_rejoins_in_phase() {
    let mut toggled = bare_sine();
    let mut reference = bare_sine();
    let mut r1 = OfflineRenderer::new(SAMPLE_RATE);
    let mut r2 = OfflineRenderer::new(SAMPLE_RATE);

    toggled.note_on(Note::A4).unwrap();
    reference.note_on(Note::A4).unwrap();
    render(&mut toggled, &mut r1, 0.1);
    render(&mut reference, &mut r2, 0.1);

    toggled.set_oscillator_enabled(0, false).unwrap();
    render(&mut toggled, &mut r1, 0.0123);
    render(&mut reference, &mut r2, 0.0123);

    toggled.set_oscillator_enabled(0, true).unwrap();
    let a = render(&mut toggled, &mut r1, 0.01);
    let b = render(&mut reference, &mut r2, 0.01);

    // Once the filter settles the two renders line up sample for sample
    for (x, y) in a[100..].iter().zip(&b[100..]) {
        assert!((x - y).abs() < 1e-3, "{x} vs {y}");
    }
    assert!(rms(&a) > 0.1);
}

#[test]
fn parses_note_names_like_the_keyboard() {
    assert_eq!("A4".parse::<Note>().unwrap(), Note::A4);
    assert_eq!("C4".parse::<Note>().unwrap(), Note::C4);
    assert!(matches!("X9".parse::<Note>(), Err(SynthError::InvalidNote(_))));
}
