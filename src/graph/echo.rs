use crate::{
    dsp::delay::DelayLine,
    graph::node::{GraphNode, RenderCtx},
};

/*
Feedback Echo
=============

A delay line whose output is fed back into its own input:

            ┌──────────────── x ─────────────────┐
            │                                    ▼
    x ──→ (+) ──→ [ delay d ] ──┬── delayed ──→ (+) ──→ out
            ▲                   │
            └──── feedback ─────┘

Per sample:

    delayed = line[t - d]
    line[t] = x + feedback · delayed
    out     = x + delayed

Each repeat is `feedback` times the previous one, so an impulse produces

    1, fb, fb², fb³, ...   at   d, 2d, 3d, 4d, ...

Feedback must stay below 1.0 or the repeats never die out. With feedback 0
there is exactly one repeat.

The line is allocated once for MAX_ECHO_SECONDS at the construction sample
rate; changing the delay time never reallocates.
*/

/// Longest echo time in seconds.
pub const MAX_ECHO_SECONDS: f32 = 1.0;

pub struct EchoNode {
    line: DelayLine,
    delay_seconds: f32,
    feedback: f32,
}

impl EchoNode {
    pub fn new(sample_rate: f32, delay_seconds: f32, feedback: f32) -> Self {
        let capacity = (MAX_ECHO_SECONDS * sample_rate).ceil() as usize;
        Self {
            line: DelayLine::new(capacity),
            delay_seconds,
            feedback,
        }
    }

    pub fn delay_seconds(&self) -> f32 {
        self.delay_seconds
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Takes effect on the next block.
    pub fn set(&mut self, delay_seconds: f32, feedback: f32) {
        self.delay_seconds = delay_seconds;
        self.feedback = feedback;
    }

    /// Delay in whole samples, never less than one.
    pub fn delay_samples(&self, sample_rate: f32) -> usize {
        ((self.delay_seconds * sample_rate).round() as usize).clamp(1, self.line.max_delay_samples())
    }
}

impl GraphNode for EchoNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        let delay = self.delay_samples(ctx.sample_rate);
        let feedback = self.feedback;

        for sample in out.iter_mut() {
            let x = *sample;
            let delayed = self.line.read(delay);
            self.line.write(x + feedback * delayed);
            *sample = x + delayed;
        }
    }

    fn reset(&mut self) {
        self.line.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 1_000.0;

    fn impulse_response(delay_seconds: f32, feedback: f32, len: usize) -> Vec<f32> {
        let mut echo = EchoNode::new(SAMPLE_RATE, delay_seconds, feedback);
        let mut buffer = vec![0.0; len];
        buffer[0] = 1.0;
        echo.render_block(&mut buffer, &RenderCtx::new(SAMPLE_RATE, 0.0));
        buffer
    }

    fn last_audible(buffer: &[f32]) -> usize {
        buffer.iter().rposition(|s| s.abs() > 1e-3).unwrap_or(0)
    }

    #[test]
    fn zero_feedback_gives_single_repeat() {
        let out = impulse_response(0.01, 0.0, 100);

        assert_eq!(out[0], 1.0, "dry signal passes through");
        assert_eq!(out[10], 1.0, "one repeat after the delay");
        assert_eq!(out.iter().filter(|&&s| s != 0.0).count(), 2);
    }

    #[test]
    fn repeats_decay_geometrically() {
        let out = impulse_response(0.01, 0.5, 100);

        assert!((out[10] - 1.0).abs() < 1e-6);
        assert!((out[20] - 0.5).abs() < 1e-6);
        assert!((out[30] - 0.25).abs() < 1e-6);
        assert!((out[40] - 0.125).abs() < 1e-6);
    }

    #[test]
    fn tail_grows_with_feedback() {
        let tails: Vec<usize> = [0.2, 0.5, 0.8, 0.95]
            .iter()
            .map(|&fb| last_audible(&impulse_response(0.01, fb, 2_000)))
            .collect();

        assert!(
            tails.windows(2).all(|pair| pair[0] < pair[1]),
            "tail length must grow with feedback: {tails:?}"
        );
    }

    #[test]
    fn delay_is_floored_to_one_sample() {
        let echo = EchoNode::new(SAMPLE_RATE, 0.0, 0.0);
        assert_eq!(echo.delay_samples(SAMPLE_RATE), 1);

        let out = impulse_response(0.0, 0.0, 4);
        assert_eq!(&out[..3], &[1.0, 1.0, 0.0]);
    }

    #[test]
    fn longest_delay_fits_the_line() {
        let echo = EchoNode::new(SAMPLE_RATE, MAX_ECHO_SECONDS, 0.5);
        assert_eq!(echo.delay_samples(SAMPLE_RATE), 1_000);
    }
}
