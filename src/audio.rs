use crate::constants::*;
use fnv::FnvHashMap;
use puckpad_core::constants::BEAT_REPEAT_SEC;
use puckpad_core::{db_to_gain, AudioEngine, LoadTicket, Smoothing, SourceRef, Voice};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

use crate::inbox::Inbox;

pub type BufferCache = Rc<RefCell<FnvHashMap<String, web::AudioBuffer>>>;

fn js_err(e: wasm_bindgen::JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

fn create_gain(audio_ctx: &web::AudioContext, value: f32, label: &str) -> anyhow::Result<web::GainNode> {
    match web::GainNode::new(audio_ctx) {
        Ok(g) => {
            g.gain().set_value(value);
            Ok(g)
        }
        Err(e) => {
            log::error!("{} GainNode error: {:?}", label, e);
            Err(js_err(e))
        }
    }
}

/// Move an `AudioParam` to `value`, either at once or as a linear ramp from
/// its current value.
fn set_param(param: &web::AudioParam, value: f32, smoothing: Smoothing, now: f64) {
    match smoothing {
        Smoothing::Immediate => {
            _ = param.cancel_scheduled_values(0.0);
            param.set_value(value);
        }
        Smoothing::Ramp(sec) => {
            _ = param.cancel_scheduled_values(now);
            _ = param.set_value_at_time(param.value(), now);
            _ = param.linear_ramp_to_value_at_time(value, now + sec);
        }
    }
}

/// Equal-sum wet/dry crossfade around one effect:
/// input -> dry -> out, input -> effect -> wet -> out.
struct WetDry {
    dry: web::GainNode,
    wet: web::GainNode,
    out: web::GainNode,
}

impl WetDry {
    fn build(
        audio_ctx: &web::AudioContext,
        input: &web::AudioNode,
        effect_in: &web::AudioNode,
        effect_out: &web::AudioNode,
        label: &str,
    ) -> anyhow::Result<Self> {
        let dry = create_gain(audio_ctx, 1.0, label)?;
        let wet = create_gain(audio_ctx, 0.0, label)?;
        let out = create_gain(audio_ctx, 1.0, label)?;
        input.connect_with_audio_node(&dry).map_err(js_err)?;
        input.connect_with_audio_node(effect_in).map_err(js_err)?;
        effect_out.connect_with_audio_node(&wet).map_err(js_err)?;
        dry.connect_with_audio_node(&out).map_err(js_err)?;
        wet.connect_with_audio_node(&out).map_err(js_err)?;
        Ok(Self { dry, wet, out })
    }

    fn set_wet(&self, wet: f32, smoothing: Smoothing, now: f64) {
        let wet = wet.clamp(0.0, 1.0);
        set_param(&self.wet.gain(), wet, smoothing, now);
        set_param(&self.dry.gain(), 1.0 - wet, smoothing, now);
    }

    fn disconnect(&self) {
        _ = self.dry.disconnect();
        _ = self.wet.disconnect();
        _ = self.out.disconnect();
    }
}

/// Per-puck graph: input -> delay -> reverb -> distortion -> low shelf ->
/// volume -> destination.
struct EffectChain {
    input: web::GainNode,
    delay: web::DelayNode,
    delay_feedback: web::GainNode,
    delay_mix: WetDry,
    reverb: web::ConvolverNode,
    reverb_mix: WetDry,
    shaper: web::WaveShaperNode,
    distortion_mix: WetDry,
    low_shelf: web::BiquadFilterNode,
    volume: web::GainNode,
}

impl EffectChain {
    fn build(audio_ctx: &web::AudioContext, reverb_ir: Option<&web::AudioBuffer>) -> anyhow::Result<Self> {
        let input = create_gain(audio_ctx, 1.0, "Voice in")?;

        // Feedback delay
        let delay = audio_ctx
            .create_delay_with_max_delay_time(DELAY_MAX_SEC)
            .map_err(|e| {
                log::error!("DelayNode error: {:?}", e);
                js_err(e)
            })?;
        delay.delay_time().set_value(DELAY_TIME_SEC);
        let delay_feedback = create_gain(audio_ctx, DELAY_FEEDBACK, "Delay feedback")?;
        delay.connect_with_audio_node(&delay_feedback).map_err(js_err)?;
        delay_feedback.connect_with_audio_node(&delay).map_err(js_err)?;
        let delay_mix = WetDry::build(audio_ctx, &input, &delay, &delay, "Delay mix")?;

        // Reverb
        let reverb = web::ConvolverNode::new(audio_ctx).map_err(|e| {
            log::error!("ConvolverNode error: {:?}", e);
            js_err(e)
        })?;
        reverb.set_normalize(true);
        reverb.set_buffer(reverb_ir);
        let reverb_mix = WetDry::build(audio_ctx, &delay_mix.out, &reverb, &reverb, "Reverb mix")?;

        // Distortion
        #[allow(deprecated)]
        let shaper = web::WaveShaperNode::new(audio_ctx).map_err(|e| {
            log::error!("WaveShaperNode error: {:?}", e);
            js_err(e)
        })?;
        let mut curve = arctan_curve(DISTORTION_CURVE_LEN, DISTORTION_DRIVE);
        #[allow(deprecated)]
        shaper.set_curve(Some(curve.as_mut_slice()));
        let distortion_mix =
            WetDry::build(audio_ctx, &reverb_mix.out, &shaper, &shaper, "Distortion mix")?;

        // EQ low band
        let low_shelf = web::BiquadFilterNode::new(audio_ctx).map_err(|e| {
            log::error!("BiquadFilterNode error: {:?}", e);
            js_err(e)
        })?;
        low_shelf.set_type(web::BiquadFilterType::Lowshelf);
        low_shelf.frequency().set_value(EQ_LOW_SHELF_HZ);
        low_shelf.gain().set_value(0.0);
        distortion_mix
            .out
            .connect_with_audio_node(&low_shelf)
            .map_err(js_err)?;

        let volume = create_gain(audio_ctx, 1.0, "Volume")?;
        low_shelf.connect_with_audio_node(&volume).map_err(js_err)?;
        volume
            .connect_with_audio_node(&audio_ctx.destination())
            .map_err(js_err)?;

        Ok(Self {
            input,
            delay,
            delay_feedback,
            delay_mix,
            reverb,
            reverb_mix,
            shaper,
            distortion_mix,
            low_shelf,
            volume,
        })
    }

    fn disconnect(&self) {
        _ = self.input.disconnect();
        _ = self.delay.disconnect();
        _ = self.delay_feedback.disconnect();
        self.delay_mix.disconnect();
        _ = self.reverb.disconnect();
        self.reverb_mix.disconnect();
        _ = self.shaper.disconnect();
        self.distortion_mix.disconnect();
        _ = self.low_shelf.disconnect();
        _ = self.volume.disconnect();
    }
}

fn arctan_curve(len: u32, drive: f32) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let x = (i as f32 / (len - 1) as f32) * 2.0 - 1.0;
            (2.0 / std::f32::consts::PI) * (drive * x).atan()
        })
        .collect()
}

/// Decaying stereo noise, used as the shared reverb impulse response.
fn build_impulse_response(audio_ctx: &web::AudioContext, seconds: f32) -> Option<web::AudioBuffer> {
    let sr = audio_ctx.sample_rate();
    let len = (sr * seconds) as u32;
    let ir = audio_ctx.create_buffer(2, len.max(1), sr).ok()?;
    // xorshift32 per channel for deterministic noise
    let mut seeds: [u32; 2] = [0x1234_ABCD, 0x7890_FEDC];
    for (ch, seed) in seeds.iter_mut().enumerate() {
        let mut buf: Vec<f32> = Vec::with_capacity(len as usize);
        for i in 0..len {
            let mut x = *seed;
            x ^= x << 13;
            x ^= x >> 17;
            x ^= x << 5;
            *seed = x;
            let n = (x as f32 / u32::MAX as f32) * 2.0 - 1.0;
            let t = i as f32 / sr;
            let envelope = (1.0 - t / seconds).max(0.0).powi(2);
            buf.push(n * envelope);
        }
        _ = ir.copy_to_channel(&mut buf, ch as i32);
    }
    Some(ir)
}

/// Position inside the loop region after `offset_sec` of transport time.
fn loop_offset(offset_sec: f64, duration: f64, beat_repeat: bool) -> f64 {
    let loop_len = if beat_repeat {
        BEAT_REPEAT_SEC.min(duration)
    } else {
        duration
    };
    if loop_len <= 0.0 || offset_sec <= 0.0 {
        return 0.0;
    }
    offset_sec % loop_len
}

/// Web Audio voice: one looping `AudioBufferSourceNode` per start, feeding a
/// long-lived effect chain.
pub struct WebVoice {
    audio_ctx: web::AudioContext,
    chain: Option<EffectChain>,
    buffer: Rc<RefCell<Option<web::AudioBuffer>>>,
    source: Option<web::AudioBufferSourceNode>,
    beat_repeat: bool,
}

impl WebVoice {
    fn now(&self) -> f64 {
        self.audio_ctx.current_time()
    }

    fn apply_loop_region(&self, source: &web::AudioBufferSourceNode) {
        source.set_loop_start(0.0);
        // a loop end of 0 means "end of buffer"
        source.set_loop_end(if self.beat_repeat { BEAT_REPEAT_SEC } else { 0.0 });
    }
}

impl Voice for WebVoice {
    fn set_delay_wet(&mut self, wet: f32, smoothing: Smoothing) {
        let now = self.now();
        if let Some(c) = &self.chain {
            c.delay_mix.set_wet(wet, smoothing, now);
        }
    }

    fn set_reverb_wet(&mut self, wet: f32, smoothing: Smoothing) {
        let now = self.now();
        if let Some(c) = &self.chain {
            c.reverb_mix.set_wet(wet, smoothing, now);
        }
    }

    fn set_distortion_wet(&mut self, wet: f32, smoothing: Smoothing) {
        let now = self.now();
        if let Some(c) = &self.chain {
            c.distortion_mix.set_wet(wet, smoothing, now);
        }
    }

    fn set_eq_low_gain_db(&mut self, gain_db: f32, smoothing: Smoothing) {
        let now = self.now();
        if let Some(c) = &self.chain {
            set_param(&c.low_shelf.gain(), gain_db, smoothing, now);
        }
    }

    fn set_volume_db(&mut self, volume_db: f32, smoothing: Smoothing) {
        let now = self.now();
        if let Some(c) = &self.chain {
            set_param(&c.volume.gain(), db_to_gain(volume_db), smoothing, now);
        }
    }

    fn set_beat_repeat(&mut self, enabled: bool) {
        self.beat_repeat = enabled;
        if let Some(src) = &self.source {
            self.apply_loop_region(src);
        }
    }

    fn start(&mut self, at_time: f64, offset_sec: f64) {
        self.stop();
        let (Some(chain), Some(buffer)) = (&self.chain, self.buffer.borrow().clone()) else {
            log::warn!("start requested before audio was ready");
            return;
        };
        let src = match web::AudioBufferSourceNode::new(&self.audio_ctx) {
            Ok(s) => s,
            Err(e) => {
                log::error!("AudioBufferSourceNode error: {:?}", e);
                return;
            }
        };
        src.set_buffer(Some(&buffer));
        src.set_loop(true);
        self.apply_loop_region(&src);
        _ = src.connect_with_audio_node(&chain.input);
        let offset = loop_offset(offset_sec, buffer.duration(), self.beat_repeat);
        #[allow(deprecated)]
        let _ = src.start_with_when_and_grain_offset(at_time, offset);
        self.source = Some(src);
    }

    fn stop(&mut self) {
        if let Some(src) = self.source.take() {
            #[allow(deprecated)]
            let _ = src.stop();
            _ = src.disconnect();
        }
    }

    fn dispose(&mut self) {
        self.stop();
        if let Some(chain) = self.chain.take() {
            chain.disconnect();
        }
        self.buffer.borrow_mut().take();
    }
}

/// [`AudioEngine`] over a browser `AudioContext`.
///
/// Decoded buffers are cached per source URL so a voice rebuilt by undo
/// skips fetching and decoding. Load outcomes go to the shared [`Inbox`] and
/// are delivered to the controller by the frame loop.
pub struct WebAudioEngine {
    audio_ctx: web::AudioContext,
    reverb_ir: Option<web::AudioBuffer>,
    buffers: BufferCache,
    inbox: Rc<RefCell<Inbox>>,
    transport_started_at: Option<f64>,
}

impl WebAudioEngine {
    pub fn new(audio_ctx: web::AudioContext, inbox: Rc<RefCell<Inbox>>) -> Self {
        let reverb_ir = build_impulse_response(&audio_ctx, REVERB_DECAY_SEC);
        if reverb_ir.is_none() {
            log::warn!("reverb impulse response unavailable; reverb will be silent");
        }
        Self {
            audio_ctx,
            reverb_ir,
            buffers: Rc::new(RefCell::new(FnvHashMap::default())),
            inbox,
            transport_started_at: None,
        }
    }

    pub fn audio_ctx(&self) -> &web::AudioContext {
        &self.audio_ctx
    }
}

async fn fetch_and_decode(audio_ctx: &web::AudioContext, url: &str) -> anyhow::Result<web::AudioBuffer> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let resp: web::Response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(js_err)?
        .dyn_into()
        .map_err(js_err)?;
    if !resp.ok() {
        anyhow::bail!("HTTP {}", resp.status());
    }
    let bytes = JsFuture::from(resp.array_buffer().map_err(js_err)?)
        .await
        .map_err(js_err)?;
    let bytes: js_sys::ArrayBuffer = bytes.dyn_into().map_err(js_err)?;
    let decoded = JsFuture::from(audio_ctx.decode_audio_data(&bytes).map_err(js_err)?)
        .await
        .map_err(|e| anyhow::anyhow!("unsupported format or corrupt data ({:?})", e))?;
    decoded.dyn_into().map_err(js_err)
}

impl AudioEngine for WebAudioEngine {
    type Voice = WebVoice;

    fn create_voice(&mut self, ticket: LoadTicket, source: &SourceRef) -> WebVoice {
        let buffer: Rc<RefCell<Option<web::AudioBuffer>>> = Rc::new(RefCell::new(None));
        let chain = match EffectChain::build(&self.audio_ctx, self.reverb_ir.as_ref()) {
            Ok(c) => Some(c),
            Err(e) => {
                self.inbox
                    .borrow_mut()
                    .push_load(ticket, Err(format!("failed to initialise audio components: {e}")));
                None
            }
        };
        let voice = WebVoice {
            audio_ctx: self.audio_ctx.clone(),
            chain,
            buffer: buffer.clone(),
            source: None,
            beat_repeat: false,
        };
        if voice.chain.is_none() {
            return voice;
        }

        let url = source.as_str().to_string();
        if let Some(cached) = self.buffers.borrow().get(&url).cloned() {
            *buffer.borrow_mut() = Some(cached);
            self.inbox.borrow_mut().push_load(ticket, Ok(()));
            return voice;
        }

        let audio_ctx = self.audio_ctx.clone();
        let cache = self.buffers.clone();
        let inbox = self.inbox.clone();
        spawn_local(async move {
            let result = match fetch_and_decode(&audio_ctx, &url).await {
                Ok(decoded) => {
                    cache.borrow_mut().insert(url, decoded.clone());
                    *buffer.borrow_mut() = Some(decoded);
                    Ok(())
                }
                Err(e) => Err(e.to_string()),
            };
            inbox.borrow_mut().push_load(ticket, result);
        });
        voice
    }

    fn now(&self) -> f64 {
        self.audio_ctx.current_time()
    }

    fn is_running(&self) -> bool {
        self.audio_ctx.state() == web::AudioContextState::Running
    }

    fn transport_started_at(&self) -> Option<f64> {
        self.transport_started_at
    }

    fn start_transport(&mut self, at_time: f64) {
        log::info!("[transport] start at {:.3}", at_time);
        self.transport_started_at = Some(at_time);
    }

    fn stop_transport(&mut self) {
        self.transport_started_at = None;
    }
}
