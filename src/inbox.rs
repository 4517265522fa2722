use puckpad_core::{LoadTicket, RecordingOutcome, RecordingSession};

/// Completions from async browser work (decoding, recording), queued until
/// the next frame hands them to the controller. Nothing calls into the
/// controller from inside a browser callback.
#[derive(Default)]
pub struct Inbox {
    loads: Vec<(LoadTicket, Result<(), String>)>,
    recordings: Vec<(RecordingSession, RecordingOutcome)>,
}

impl Inbox {
    pub fn push_load(&mut self, ticket: LoadTicket, result: Result<(), String>) {
        self.loads.push((ticket, result));
    }

    pub fn push_recording(&mut self, session: RecordingSession, outcome: RecordingOutcome) {
        self.recordings.push((session, outcome));
    }

    pub fn take_loads(&mut self) -> Vec<(LoadTicket, Result<(), String>)> {
        std::mem::take(&mut self.loads)
    }

    pub fn take_recordings(&mut self) -> Vec<(RecordingSession, RecordingOutcome)> {
        std::mem::take(&mut self.recordings)
    }
}
