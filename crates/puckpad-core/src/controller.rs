use crate::audio::{apply_levels, AudioEngine, LoadTicket, Smoothing, SourceRef, Voice};
use crate::constants::*;
use crate::effects::{self, EffectLevels, PadSize};
use crate::error::{PadError, Result};
use crate::puck::{LoadState, Origin, PlayState, Puck, PuckId};
use fnv::FnvHashMap;
use glam::Vec2;
use rand::prelude::*;

/// Runtime tuning for a [`PadController`].
///
/// - `ramp_sec`: smoothing applied to effect and volume changes
/// - `volume_step_db`: volume change per wheel event
/// - `spawn_jitter_px`: half-width of the random offset for new pucks
/// - `transport_lead_sec`: delay between pressing play and audible start
/// - `seed`: seed for spawn placement
#[derive(Clone, Debug)]
pub struct PadParams {
    pub ramp_sec: f64,
    pub volume_step_db: f32,
    pub spawn_jitter_px: f32,
    pub transport_lead_sec: f64,
    pub seed: u64,
}

impl Default for PadParams {
    fn default() -> Self {
        Self {
            ramp_sec: PARAM_RAMP_SEC,
            volume_step_db: VOLUME_STEP_DB,
            spawn_jitter_px: SPAWN_JITTER_PX,
            transport_lead_sec: TRANSPORT_START_LEAD_SEC,
            seed: 42,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
}

/// Identifies one recording session. Outcomes carry it so a late result from
/// an abandoned session cannot end the one that is live now.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RecordingSession(pub u64);

/// Terminal event of one recording session.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordingOutcome {
    Complete(SourceRef),
    Failed(String),
}

/// What a pointer press on the pad did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressOutcome {
    Deleted(PuckId),
    DragStarted(PuckId),
    Missed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportState {
    Started,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
    Crosshair,
    Grab,
    Grabbing,
    Pointer,
}

impl Cursor {
    pub fn css(self) -> &'static str {
        match self {
            Cursor::Crosshair => "crosshair",
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
            Cursor::Pointer => "pointer",
        }
    }
}

/// Owns every live puck and turns pointer, wheel and button events into
/// state transitions.
///
/// `ordering` is the display stack: index 0 is drawn first, the last puck is
/// topmost and wins hit-tests. Each live puck that is loading or ready owns
/// one engine voice keyed by its id.
///
/// Typical usage:
/// - Construct with `PadController::new(engine, params, pad)`
/// - Feed `pointer_down`/`pointer_move`/`pointer_up`/`pointer_leave`/`wheel`
///   from the input layer
/// - Deliver engine completions with `on_load_complete` and recorder events
///   with `finish_recording`, outside of any controller call
/// - Paint `draw_commands()` every frame
pub struct PadController<E: AudioEngine> {
    engine: E,
    params: PadParams,
    pad: PadSize,
    ordering: Vec<Puck>,
    voices: FnvHashMap<PuckId, E::Voice>,
    dragging: Option<PuckId>,
    hovered: Option<PuckId>,
    pending_undo: Option<Puck>,
    recorder: RecorderState,
    live_session: Option<RecordingSession>,
    pointer: Option<Vec2>,
    rng: StdRng,
    next_id: u64,
    next_ticket: u64,
    next_session: u64,
}

impl<E: AudioEngine> PadController<E> {
    pub fn new(engine: E, params: PadParams, pad: PadSize) -> Self {
        let rng = StdRng::seed_from_u64(params.seed);
        Self {
            engine,
            params,
            pad,
            ordering: Vec::new(),
            voices: FnvHashMap::default(),
            dragging: None,
            hovered: None,
            pending_undo: None,
            recorder: RecorderState::Idle,
            live_session: None,
            pointer: None,
            rng,
            next_id: 1,
            next_ticket: 1,
            next_session: 1,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn params(&self) -> &PadParams {
        &self.params
    }

    pub fn pad_size(&self) -> PadSize {
        self.pad
    }

    /// Track the rendering surface's current size. Effect levels are refreshed
    /// on the next move of each puck.
    pub fn set_pad_size(&mut self, pad: PadSize) {
        self.pad = pad;
    }

    /// Live pucks in display order, bottom first.
    pub fn pucks(&self) -> &[Puck] {
        &self.ordering
    }

    pub fn puck(&self, id: PuckId) -> Option<&Puck> {
        self.ordering.iter().find(|p| p.id == id)
    }

    fn index_of(&self, id: PuckId) -> Option<usize> {
        self.ordering.iter().position(|p| p.id == id)
    }

    /// 1-based number shown on the puck, derived from its current slot.
    pub fn display_number(&self, id: PuckId) -> Option<usize> {
        self.index_of(id).map(|i| i + 1)
    }

    pub fn hovered(&self) -> Option<PuckId> {
        self.hovered
    }

    pub fn dragging(&self) -> Option<PuckId> {
        self.dragging
    }

    /// The most recently deleted puck, if it can still be restored.
    pub fn pending_undo(&self) -> Option<&Puck> {
        self.pending_undo.as_ref()
    }

    pub fn recorder_state(&self) -> RecorderState {
        self.recorder
    }

    /// The session currently recording, if any.
    pub fn live_session(&self) -> Option<RecordingSession> {
        self.live_session
    }

    // ---------------- Creation and loading ----------------

    /// Create a puck for a selected file and start loading it.
    pub fn add_file(&mut self, name: impl Into<String>, source: SourceRef) -> PuckId {
        self.spawn(name.into(), source, Origin::FileImport)
    }

    fn spawn(&mut self, name: String, source: SourceRef, origin: Origin) -> PuckId {
        let id = PuckId(self.next_id);
        self.next_id += 1;
        let position = self.spawn_position();
        let mut puck = Puck::new(id, name, source, origin, position);
        self.attach_voice(&mut puck);
        log::info!(
            "puck {} ({}) created at ({:.1},{:.1}); loading",
            id,
            puck.name,
            position.x,
            position.y
        );
        self.ordering.push(puck);
        id
    }

    fn spawn_position(&mut self) -> Vec2 {
        let center = if self.pad.width > 0.0 && self.pad.height > 0.0 {
            self.pad.center()
        } else {
            Vec2::from(FALLBACK_PAD_CENTER)
        };
        let j = self.params.spawn_jitter_px;
        if j <= 0.0 {
            return center;
        }
        center + Vec2::new(self.rng.gen_range(-j..j), self.rng.gen_range(-j..j))
    }

    /// Ask the engine for a fresh voice and put the puck back into `Loading`.
    fn attach_voice(&mut self, puck: &mut Puck) {
        let ticket = LoadTicket(self.next_ticket);
        self.next_ticket += 1;
        let mut voice = self.engine.create_voice(ticket, &puck.source);
        puck.load_state = LoadState::Loading;
        puck.play_state = PlayState::Stopped;
        puck.ticket = Some(ticket);
        let levels = puck.recompute_effects(self.pad);
        apply_levels(&mut voice, &levels, Smoothing::Immediate);
        voice.set_volume_db(puck.volume_db, Smoothing::Immediate);
        self.voices.insert(puck.id, voice);
    }

    /// Stop and release a puck's voice, if it has one.
    fn release_voice(&mut self, puck: &mut Puck) {
        if let Some(mut voice) = self.voices.remove(&puck.id) {
            voice.stop();
            voice.dispose();
        }
        puck.ticket = None;
        puck.play_state = PlayState::Stopped;
    }

    /// Deliver the engine's completion for a load request.
    ///
    /// Returns `Ok(Some(id))` when the puck became ready, `Ok(None)` when the
    /// ticket no longer belongs to a live puck, and `Err(LoadFailure)` when
    /// the puck failed (it is flagged `Failed` and stays on the pad).
    pub fn on_load_complete(
        &mut self,
        ticket: LoadTicket,
        result: std::result::Result<(), String>,
    ) -> Result<Option<PuckId>> {
        let Some(idx) = self.ordering.iter().position(|p| p.ticket == Some(ticket)) else {
            log::debug!("ignoring stale load completion {:?}", ticket);
            return Ok(None);
        };
        let id = self.ordering[idx].id;
        match result {
            Ok(()) => {
                let origin = self.engine.transport_started_at();
                let now = self.engine.now();
                let smoothing = Smoothing::Ramp(self.params.ramp_sec);
                let puck = &mut self.ordering[idx];
                puck.load_state = LoadState::Ready;
                let levels = puck.recompute_effects(self.pad);
                if let Some(voice) = self.voices.get_mut(&id) {
                    apply_levels(voice, &levels, smoothing);
                    if puck.beat_repeat {
                        voice.set_beat_repeat(true);
                    }
                    if let Some(origin) = origin {
                        let (at, offset) = transport_entry(origin, now);
                        voice.start(at, offset);
                        puck.play_state = PlayState::Playing;
                    }
                }
                log::info!("puck {} ({}) loaded", id, puck.name);
                Ok(Some(id))
            }
            Err(reason) => {
                let mut puck = self.ordering.remove(idx);
                self.release_voice(&mut puck);
                puck.load_state = LoadState::Failed;
                puck.recompute_effects(self.pad);
                let err = PadError::LoadFailure {
                    name: puck.name.clone(),
                    reason,
                };
                log::error!("puck {}: {}", id, err);
                self.ordering.insert(idx, puck);
                Err(err)
            }
        }
    }

    // ---------------- Recording ----------------

    pub fn begin_recording(&mut self) -> Result<RecordingSession> {
        if self.recorder == RecorderState::Recording {
            return Err(PadError::AlreadyRecording);
        }
        let session = RecordingSession(self.next_session);
        self.next_session += 1;
        self.recorder = RecorderState::Recording;
        self.live_session = Some(session);
        log::info!("recording session {} started", session.0);
        Ok(session)
    }

    /// The user asked to stop; the terminal outcome arrives later through
    /// [`finish_recording`](Self::finish_recording).
    pub fn end_recording(&mut self) -> Result<RecordingSession> {
        let Some(session) = self.live_session.take() else {
            return Err(PadError::NotRecording);
        };
        self.recorder = RecorderState::Idle;
        Ok(session)
    }

    /// Consume the recorder's terminal event for `session`. Only the live
    /// session's outcome returns the recorder to `Idle`; a clip from an
    /// earlier, already stopped session still becomes a puck.
    pub fn finish_recording(
        &mut self,
        session: RecordingSession,
        outcome: RecordingOutcome,
    ) -> Result<PuckId> {
        if self.live_session == Some(session) {
            self.live_session = None;
            self.recorder = RecorderState::Idle;
        } else {
            log::debug!("outcome for recording session {} arrived after it ended", session.0);
        }
        match outcome {
            RecordingOutcome::Complete(source) => {
                let name = format!("Mic Recording {}", self.ordering.len() + 1);
                Ok(self.spawn(name, source, Origin::MicRecording))
            }
            RecordingOutcome::Failed(reason) => {
                log::error!("recording session {} failed: {}", session.0, reason);
                Err(PadError::RecordingFailure(reason))
            }
        }
    }

    // ---------------- Hit-testing and pointer input ----------------

    /// Topmost live puck whose body contains `point`.
    pub fn hit_test(&self, point: Vec2) -> Option<PuckId> {
        self.ordering
            .iter()
            .rev()
            .find(|p| p.contains(point))
            .map(|p| p.id)
    }

    fn hovered_delete_hit(&self, point: Vec2) -> Option<PuckId> {
        let id = self.hovered?;
        let puck = self.puck(id)?;
        puck.delete_control_contains(point).then_some(id)
    }

    /// Press: the hovered puck's delete control takes priority over a drag.
    pub fn pointer_down(&mut self, point: Vec2) -> PressOutcome {
        self.pointer = Some(point);
        if let Some(id) = self.hovered_delete_hit(point) {
            if self.delete(id).is_ok() {
                self.dragging = None;
                self.hovered = None;
                return PressOutcome::Deleted(id);
            }
        }
        match self.hit_test(point) {
            Some(id) => {
                self.dragging = Some(id);
                log::debug!("begin drag on puck {}", id);
                PressOutcome::DragStarted(id)
            }
            None => {
                self.dragging = None;
                PressOutcome::Missed
            }
        }
    }

    /// Move: refresh hover, then move the dragged puck (if any) to `point`.
    pub fn pointer_move(&mut self, point: Vec2) {
        self.pointer = Some(point);
        self.hovered = self.hit_test(point);
        let Some(id) = self.dragging else {
            return;
        };
        let Some(idx) = self.index_of(id) else {
            self.dragging = None;
            return;
        };
        let smoothing = Smoothing::Ramp(self.params.ramp_sec);
        let puck = &mut self.ordering[idx];
        puck.position = point;
        let levels = puck.recompute_effects(self.pad);
        if let Some(voice) = self.voices.get_mut(&id) {
            apply_levels(voice, &levels, smoothing);
        }
    }

    pub fn pointer_up(&mut self) {
        if let Some(id) = self.dragging.take() {
            log::debug!("end drag on puck {}", id);
        }
    }

    /// Pointer left the pad: abandon any drag where it is and clear hover.
    pub fn pointer_leave(&mut self) {
        self.dragging = None;
        self.hovered = None;
        self.pointer = None;
    }

    /// Wheel over the pad adjusts the hovered puck's volume. Returns the new
    /// volume, or `None` when nothing is hovered.
    pub fn wheel(&mut self, delta_y: f64) -> Option<f32> {
        let id = self.hovered?;
        let idx = self.index_of(id)?;
        let smoothing = if self.engine.is_running() && self.ordering[idx].is_ready() {
            Smoothing::Ramp(self.params.ramp_sec)
        } else {
            Smoothing::Immediate
        };
        let puck = &mut self.ordering[idx];
        puck.volume_db = effects::step_volume_db(puck.volume_db, delta_y, self.params.volume_step_db);
        let volume_db = puck.volume_db;
        if let Some(voice) = self.voices.get_mut(&id) {
            voice.set_volume_db(volume_db, smoothing);
        }
        Some(volume_db)
    }

    pub fn cursor(&self) -> Cursor {
        if self.dragging.is_some() {
            return Cursor::Grabbing;
        }
        match (self.hovered, self.pointer) {
            (Some(_), Some(p)) if self.hovered_delete_hit(p).is_some() => Cursor::Pointer,
            (Some(_), _) => Cursor::Grab,
            _ => Cursor::Crosshair,
        }
    }

    // ---------------- Delete / undo ----------------

    /// Remove a live puck, release its audio and keep it as the single undo
    /// candidate. Any earlier candidate is discarded for good.
    pub fn delete(&mut self, id: PuckId) -> Result<()> {
        let idx = self.index_of(id).ok_or(PadError::UnknownPuck(id))?;
        let mut puck = self.ordering.remove(idx);
        self.release_voice(&mut puck);
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        if self.dragging == Some(id) {
            self.dragging = None;
        }
        if let Some(old) = self.pending_undo.replace(puck) {
            log::info!("discarding undo for puck {} ({})", old.id, old.name);
        }
        log::info!("puck {} deleted; undo available", id);
        Ok(())
    }

    /// Restore the last deleted puck on top of the stack. No-op when nothing
    /// is pending.
    pub fn undo_delete(&mut self) -> Option<PuckId> {
        let mut puck = self.pending_undo.take()?;
        if puck.load_state != LoadState::Failed {
            self.attach_voice(&mut puck);
            if puck.beat_repeat {
                if let Some(voice) = self.voices.get_mut(&puck.id) {
                    voice.set_beat_repeat(true);
                }
            }
        }
        let id = puck.id;
        log::info!("puck {} ({}) restored", id, puck.name);
        self.ordering.push(puck);
        Some(id)
    }

    // ---------------- Transport ----------------

    /// Start every ready puck on the shared transport, or stop everything.
    pub fn toggle_transport(&mut self) -> Result<TransportState> {
        if self.engine.transport_running() {
            self.engine.stop_transport();
            for puck in &mut self.ordering {
                if let Some(voice) = self.voices.get_mut(&puck.id) {
                    voice.stop();
                }
                puck.play_state = PlayState::Stopped;
            }
            log::info!("transport stopped");
            return Ok(TransportState::Stopped);
        }
        if self.ordering.is_empty() {
            return Err(PadError::NothingToPlay);
        }
        if !self.ordering.iter().any(Puck::is_ready) {
            return Err(PadError::TracksNotReady);
        }
        let at = self.engine.now() + self.params.transport_lead_sec;
        let mut started = 0usize;
        for puck in self.ordering.iter_mut().filter(|p| p.is_ready()) {
            if let Some(voice) = self.voices.get_mut(&puck.id) {
                voice.start(at, 0.0);
                puck.play_state = PlayState::Playing;
                started += 1;
            }
        }
        self.engine.start_transport(at);
        log::info!("transport started with {} pucks", started);
        Ok(TransportState::Started)
    }

    /// Flip the beat-repeat loop on every ready puck. Returns how many pucks
    /// were toggled.
    pub fn toggle_beat_repeat(&mut self) -> usize {
        let mut toggled = 0usize;
        for puck in self.ordering.iter_mut().filter(|p| p.is_ready()) {
            puck.beat_repeat = !puck.beat_repeat;
            if let Some(voice) = self.voices.get_mut(&puck.id) {
                voice.set_beat_repeat(puck.beat_repeat);
            }
            log::info!(
                "puck {}: beat repeat {}",
                puck.id,
                if puck.beat_repeat { "on" } else { "off" }
            );
            toggled += 1;
        }
        toggled
    }

    /// Effect levels of a live puck.
    pub fn effect_levels(&self, id: PuckId) -> Option<EffectLevels> {
        self.puck(id).map(Puck::effects)
    }

    /// Release every voice. Called when the session ends.
    pub fn shutdown(&mut self) {
        if self.engine.transport_running() {
            self.engine.stop_transport();
        }
        for (_, mut voice) in self.voices.drain() {
            voice.stop();
            voice.dispose();
        }
        for puck in &mut self.ordering {
            puck.ticket = None;
            puck.play_state = PlayState::Stopped;
        }
        self.pending_undo = None;
        self.dragging = None;
        self.hovered = None;
    }
}

/// When and where a voice joining a transport that started at `origin`
/// enters the loop: at the origin itself if it is still ahead, otherwise
/// right now at the elapsed offset.
fn transport_entry(origin: f64, now: f64) -> (f64, f64) {
    if now <= origin {
        (origin, 0.0)
    } else {
        (now, now - origin)
    }
}

impl<E: AudioEngine> Drop for PadController<E> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
