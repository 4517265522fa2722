// Recording mock of the audio engine shared by the host-side tests.

#![allow(dead_code)]

use puckpad_core::*;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Create(LoadTicket, SourceRef),
    DelayWet(LoadTicket, f32, Smoothing),
    ReverbWet(LoadTicket, f32, Smoothing),
    DistortionWet(LoadTicket, f32, Smoothing),
    EqLow(LoadTicket, f32, Smoothing),
    Volume(LoadTicket, f32, Smoothing),
    BeatRepeat(LoadTicket, bool),
    Start(LoadTicket, f64, f64),
    Stop(LoadTicket),
    Dispose(LoadTicket),
    TransportStart(f64),
    TransportStop,
}

pub type Log = Rc<RefCell<Vec<Call>>>;

pub struct MockVoice {
    ticket: LoadTicket,
    log: Log,
}

impl Voice for MockVoice {
    fn set_delay_wet(&mut self, wet: f32, s: Smoothing) {
        self.log.borrow_mut().push(Call::DelayWet(self.ticket, wet, s));
    }
    fn set_reverb_wet(&mut self, wet: f32, s: Smoothing) {
        self.log.borrow_mut().push(Call::ReverbWet(self.ticket, wet, s));
    }
    fn set_distortion_wet(&mut self, wet: f32, s: Smoothing) {
        self.log.borrow_mut().push(Call::DistortionWet(self.ticket, wet, s));
    }
    fn set_eq_low_gain_db(&mut self, db: f32, s: Smoothing) {
        self.log.borrow_mut().push(Call::EqLow(self.ticket, db, s));
    }
    fn set_volume_db(&mut self, db: f32, s: Smoothing) {
        self.log.borrow_mut().push(Call::Volume(self.ticket, db, s));
    }
    fn set_beat_repeat(&mut self, enabled: bool) {
        self.log.borrow_mut().push(Call::BeatRepeat(self.ticket, enabled));
    }
    fn start(&mut self, at_time: f64, offset_sec: f64) {
        self.log
            .borrow_mut()
            .push(Call::Start(self.ticket, at_time, offset_sec));
    }
    fn stop(&mut self) {
        self.log.borrow_mut().push(Call::Stop(self.ticket));
    }
    fn dispose(&mut self) {
        self.log.borrow_mut().push(Call::Dispose(self.ticket));
    }
}

pub struct MockEngine {
    pub log: Log,
    pub now: f64,
    pub running: bool,
    pub transport: Option<f64>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(Vec::new())),
            now: 10.0,
            running: true,
            transport: None,
        }
    }
}

impl AudioEngine for MockEngine {
    type Voice = MockVoice;

    fn create_voice(&mut self, ticket: LoadTicket, source: &SourceRef) -> MockVoice {
        self.log.borrow_mut().push(Call::Create(ticket, source.clone()));
        MockVoice {
            ticket,
            log: self.log.clone(),
        }
    }
    fn now(&self) -> f64 {
        self.now
    }
    fn is_running(&self) -> bool {
        self.running
    }
    fn transport_started_at(&self) -> Option<f64> {
        self.transport
    }
    fn start_transport(&mut self, at_time: f64) {
        self.transport = Some(at_time);
        self.log.borrow_mut().push(Call::TransportStart(at_time));
    }
    fn stop_transport(&mut self) {
        self.transport = None;
        self.log.borrow_mut().push(Call::TransportStop);
    }
}

pub fn pad_600() -> PadSize {
    PadSize::new(600.0, 600.0)
}

/// Controller over a 600x600 pad with spawn jitter disabled, so new pucks
/// land exactly at the centre.
pub fn controller() -> (PadController<MockEngine>, Log) {
    let engine = MockEngine::new();
    let log = engine.log.clone();
    let params = PadParams {
        spawn_jitter_px: 0.0,
        ..PadParams::default()
    };
    (PadController::new(engine, params, pad_600()), log)
}

/// The ticket most recently handed to the engine.
pub fn last_ticket(log: &Log) -> LoadTicket {
    log.borrow()
        .iter()
        .rev()
        .find_map(|c| match c {
            Call::Create(t, _) => Some(*t),
            _ => None,
        })
        .expect("no voice created")
}

/// Add a file puck and complete its load successfully.
pub fn add_ready(ctl: &mut PadController<MockEngine>, log: &Log, name: &str) -> PuckId {
    let id = ctl.add_file(name, SourceRef::new(format!("blob:{name}")));
    let ticket = last_ticket(log);
    assert_eq!(ctl.on_load_complete(ticket, Ok(())), Ok(Some(id)));
    id
}

pub fn move_to(ctl: &mut PadController<MockEngine>, id: PuckId, x: f32, y: f32) {
    let at = ctl.puck(id).expect("live puck").position();
    ctl.pointer_move(at);
    assert_eq!(ctl.pointer_down(at), PressOutcome::DragStarted(id));
    ctl.pointer_move(glam::Vec2::new(x, y));
    ctl.pointer_up();
}
