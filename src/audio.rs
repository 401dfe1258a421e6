use crate::core::{AudioCue, AudioError, AudioSink};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use web_sys as web;

// Drone: two detuned sines beating through a slowly swept lowpass
const DRONE_HZ: f32 = 55.0;
const DRONE_DETUNED_HZ: f32 = 58.27;
const DRONE_GAIN: f32 = 0.1;
const DRONE_CUTOFF_HZ: f32 = 150.0;
const DRONE_SWEEP_HZ: f32 = 50.0;
const DRONE_SWEEP_RATE_HZ: f32 = 0.053;

struct Drone {
    oscillators: [web::OscillatorNode; 3],
    gain: web::GainNode,
}

/// WebAudio synthesis for the drone and the one-shot cues.
/// Every node is built lazily; nothing exists until [`AudioSink::init`].
pub struct HorrorAudio {
    ctx: Option<web::AudioContext>,
    master: Option<web::GainNode>,
    drone: Option<Drone>,
    volume: f32,
    rng: StdRng,
}

impl HorrorAudio {
    pub fn new(seed: u64) -> Self {
        Self {
            ctx: None,
            master: None,
            drone: None,
            volume: 0.5,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn graph(&self) -> Option<(&web::AudioContext, &web::GainNode)> {
        Some((self.ctx.as_ref()?, self.master.as_ref()?))
    }

    fn build_drone(
        ctx: &web::AudioContext,
        master: &web::GainNode,
    ) -> Result<Drone, AudioError> {
        let filter = create_filter(ctx, web::BiquadFilterType::Lowpass, DRONE_CUTOFF_HZ)?;
        let gain = create_gain(ctx, DRONE_GAIN, "drone")?;
        let low = create_oscillator(ctx, web::OscillatorType::Sine, DRONE_HZ)?;
        let beat = create_oscillator(ctx, web::OscillatorType::Sine, DRONE_DETUNED_HZ)?;

        // LFO sweeps the cutoff around its base value
        let lfo = create_oscillator(ctx, web::OscillatorType::Sine, DRONE_SWEEP_RATE_HZ)?;
        let depth = create_gain(ctx, DRONE_SWEEP_HZ, "drone sweep")?;
        _ = lfo.connect_with_audio_node(&depth);
        _ = depth.connect_with_audio_param(&filter.frequency());

        _ = low.connect_with_audio_node(&filter);
        _ = beat.connect_with_audio_node(&filter);
        _ = filter.connect_with_audio_node(&gain);
        _ = gain.connect_with_audio_node(master);

        for osc in [&low, &beat, &lfo] {
            osc.start().map_err(graph_err)?;
        }
        Ok(Drone {
            oscillators: [low, beat, lfo],
            gain,
        })
    }

    fn whisper(&mut self) -> Result<(), AudioError> {
        let duration = self.rng.gen_range(0.5..1.5_f64);
        let cutoff = self.rng.gen_range(1000.0..3000.0_f32);
        let sr = self.ctx.as_ref().ok_or_else(not_ready)?.sample_rate();
        let len = ((sr as f64 * duration) as u32).max(1);
        let mut data = pink_noise(len as usize, &mut self.rng);
        let (ctx, master) = self.graph().ok_or_else(not_ready)?;

        let buffer = ctx.create_buffer(1, len, sr).map_err(graph_err)?;
        _ = buffer.copy_to_channel(&mut data, 0);
        let source = web::AudioBufferSourceNode::new(ctx).map_err(graph_err)?;
        source.set_buffer(Some(&buffer));
        let filter = create_filter(ctx, web::BiquadFilterType::Bandpass, cutoff)?;
        filter.q().set_value(5.0);
        let gain = create_gain(ctx, 0.0, "whisper")?;

        let t0 = ctx.current_time();
        _ = gain.gain().set_value_at_time(0.0, t0);
        _ = gain.gain().linear_ramp_to_value_at_time(0.15, t0 + 0.1);
        _ = gain.gain().linear_ramp_to_value_at_time(0.0, t0 + duration);

        _ = source.connect_with_audio_node(&filter);
        _ = filter.connect_with_audio_node(&gain);
        _ = gain.connect_with_audio_node(master);
        source.start().map_err(graph_err)?;
        _ = source.stop_with_when(t0 + duration);
        Ok(())
    }

    fn heartbeat(&self) -> Result<(), AudioError> {
        let (ctx, master) = self.graph().ok_or_else(not_ready)?;
        let t0 = ctx.current_time();
        for delay in [0.0, 0.15] {
            let osc = create_oscillator(ctx, web::OscillatorType::Sine, 60.0)?;
            let gain = create_gain(ctx, 0.0, "heartbeat")?;
            let at = t0 + delay;
            _ = gain.gain().set_value_at_time(0.0, at);
            _ = gain.gain().linear_ramp_to_value_at_time(0.3, at + 0.05);
            _ = gain.gain().exponential_ramp_to_value_at_time(0.01, at + 0.3);
            _ = osc.connect_with_audio_node(&gain);
            _ = gain.connect_with_audio_node(master);
            _ = osc.start_with_when(at);
            _ = osc.stop_with_when(at + 0.3);
        }
        Ok(())
    }

    fn crawling(&mut self) -> Result<(), AudioError> {
        let duration = self.rng.gen_range(1.0..3.0_f64);
        let ticks: u32 = self.rng.gen_range(10..30);
        let jitter: Vec<(f64, f32)> = (0..ticks)
            .map(|_| (self.rng.gen_range(0.0..0.1), self.rng.gen_range(100.0..600.0)))
            .collect();
        let (ctx, master) = self.graph().ok_or_else(not_ready)?;
        let t0 = ctx.current_time();
        for (i, (offset, hz)) in jitter.into_iter().enumerate() {
            let at = t0 + duration / ticks as f64 * i as f64 + offset;
            let osc = create_oscillator(ctx, web::OscillatorType::Square, hz)?;
            let filter = create_filter(ctx, web::BiquadFilterType::Highpass, 2000.0)?;
            let gain = create_gain(ctx, 0.0, "crawl tick")?;
            _ = gain.gain().set_value_at_time(0.0, at);
            _ = gain.gain().linear_ramp_to_value_at_time(0.05, at + 0.01);
            _ = gain.gain().exponential_ramp_to_value_at_time(0.01, at + 0.05);
            _ = osc.connect_with_audio_node(&filter);
            _ = filter.connect_with_audio_node(&gain);
            _ = gain.connect_with_audio_node(master);
            _ = osc.start_with_when(at);
            _ = osc.stop_with_when(at + 0.05);
        }
        Ok(())
    }
}

impl AudioSink for HorrorAudio {
    fn init(&mut self) -> Result<(), AudioError> {
        if self.ctx.is_some() {
            return Ok(());
        }
        let ctx = web::AudioContext::new()
            .map_err(|e| AudioError::ContextUnavailable(format!("{:?}", e)))?;
        _ = ctx.resume();
        let master = create_gain(&ctx, self.volume, "master")?;
        _ = master.connect_with_audio_node(&ctx.destination());
        self.ctx = Some(ctx);
        self.master = Some(master);
        log::info!("[audio] context ready");
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        if let Some(master) = &self.master {
            master.gain().set_value(self.volume);
        }
    }

    fn start_drone(&mut self) {
        if self.drone.is_some() {
            return;
        }
        let Some((ctx, master)) = self.graph() else {
            return;
        };
        match Self::build_drone(ctx, master) {
            Ok(drone) => self.drone = Some(drone),
            Err(e) => log::warn!("[audio] drone: {}", e),
        }
    }

    fn stop_drone(&mut self) {
        if let Some(drone) = self.drone.take() {
            for osc in &drone.oscillators {
                _ = osc.stop();
            }
            _ = drone.gain.disconnect();
        }
    }

    fn play(&mut self, cue: AudioCue) {
        let res = match cue {
            AudioCue::Whisper => self.whisper(),
            AudioCue::Heartbeat => self.heartbeat(),
            AudioCue::Crawling => self.crawling(),
        };
        if let Err(e) = res {
            log::debug!("[audio] {:?} skipped: {}", cue, e);
        }
    }

    fn teardown(&mut self) {
        self.stop_drone();
        self.master = None;
        if let Some(ctx) = self.ctx.take() {
            _ = ctx.close();
        }
    }
}

// Paul Kellet's economy pink noise filter over white noise
fn pink_noise(len: usize, rng: &mut StdRng) -> Vec<f32> {
    let mut b = [0.0_f32; 7];
    let mut out = Vec::with_capacity(len);
    for _ in 0..len {
        let white: f32 = rng.gen_range(-1.0..1.0);
        b[0] = 0.99886 * b[0] + white * 0.0555179;
        b[1] = 0.99332 * b[1] + white * 0.0750759;
        b[2] = 0.96900 * b[2] + white * 0.1538520;
        b[3] = 0.86650 * b[3] + white * 0.3104856;
        b[4] = 0.55000 * b[4] + white * 0.5329522;
        b[5] = -0.7616 * b[5] - white * 0.0168980;
        out.push((b.iter().sum::<f32>() + white * 0.5362) * 0.11);
        b[6] = white * 0.115926;
    }
    out
}

fn create_gain(
    audio_ctx: &web::AudioContext,
    value: f32,
    label: &str,
) -> Result<web::GainNode, AudioError> {
    let g = web::GainNode::new(audio_ctx)
        .map_err(|e| AudioError::Graph(format!("{} GainNode: {:?}", label, e)))?;
    g.gain().set_value(value);
    Ok(g)
}

fn create_oscillator(
    audio_ctx: &web::AudioContext,
    kind: web::OscillatorType,
    hz: f32,
) -> Result<web::OscillatorNode, AudioError> {
    let osc = web::OscillatorNode::new(audio_ctx).map_err(graph_err)?;
    osc.set_type(kind);
    osc.frequency().set_value(hz);
    Ok(osc)
}

fn create_filter(
    audio_ctx: &web::AudioContext,
    kind: web::BiquadFilterType,
    hz: f32,
) -> Result<web::BiquadFilterNode, AudioError> {
    let filter = web::BiquadFilterNode::new(audio_ctx).map_err(graph_err)?;
    filter.set_type(kind);
    filter.frequency().set_value(hz);
    Ok(filter)
}

fn graph_err(e: wasm_bindgen::JsValue) -> AudioError {
    AudioError::Graph(format!("{:?}", e))
}

fn not_ready() -> AudioError {
    AudioError::ContextUnavailable("audio not initialized".into())
}
