//! View state of the processing page: a start call owed for comparison
//! jobs, a status poll on a fixed cadence, a rotating tip, and the
//! terminal completed/failed outcomes.
//!
//! The state is a pure observer of the backend. Every poll response is a
//! full snapshot, so applying one is idempotent; the only ordering rule is
//! that a response older than one already applied is dropped.

use crate::models::{JobStatus, Mode, ResultsBundle, StatusResponse};
use crate::status::StatusLine;

/// Fixed error text when the one-shot start call is rejected.
pub const START_FAILED_MESSAGE: &str = "ไม่สามารถเริ่มการวิเคราะห์ได้";
/// Used when the backend reports `failed` without saying why.
pub const FAILED_FALLBACK_MESSAGE: &str = "การวิเคราะห์ล้มเหลว";

pub const TIPS: [&str; 5] = [
    "เคล็ดลับ: ภาพที่มีแสงสว่างดีและเห็นใบหน้าชัดเจนให้ผลลัพธ์ที่ดีที่สุด",
    "รู้หรือไม่? โมเดล VGG-Face ถูกฝึกฝนด้วยภาพใบหน้ากว่า 2.6 ล้านภาพ",
    "การวิเคราะห์ฉากหลังช่วยให้รู้ว่าภาพถูกถ่ายในสถานที่เดียวกันหรือไม่",
    "โมเดล SFace เป็นหนึ่งในโมเดลวิเคราะห์ใบหน้าที่เร็วและทันสมัยที่สุด",
    "ระบบกำลังเปรียบเทียบคุณลักษณะหลายพันจุดบนใบหน้าและฉากหลัง",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting on the one-shot start call; no polling yet.
    Starting,
    Polling,
    Completed,
    Failed,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed)
    }
}

/// Issue order of a status request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PollTicket(u64);

/// What a poll tick came back with.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Status(StatusResponse),
    /// The request itself failed; the backend said nothing.
    Unreachable(String),
}

/// Effect of feeding an event into [`ProcessingState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Stale, late or after teardown; nothing changed.
    Ignored,
    Updated,
    /// A terminal phase was reached; timers must stop.
    Finished,
}

#[derive(Debug, Clone)]
pub struct ProcessingState {
    phase: Phase,
    status: StatusLine,
    tip_index: usize,
    results: Option<ResultsBundle>,
    active_tab: Option<String>,
    error: Option<String>,
    live: bool,
    issued: u64,
    last_applied: Option<PollTicket>,
}

impl ProcessingState {
    /// Comparison jobs owe a start call before polling; quick-analysis jobs
    /// were started by the model-selection page.
    pub fn new(mode: Option<Mode>) -> Self {
        let phase = match mode {
            Some(Mode::Comparison) => Phase::Starting,
            _ => Phase::Polling,
        };
        Self {
            phase,
            status: StatusLine::initial(),
            tip_index: 0,
            results: None,
            active_tab: None,
            error: None,
            live: true,
            issued: 0,
            last_applied: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn tip(&self) -> &'static str {
        TIPS[self.tip_index % TIPS.len()]
    }

    pub fn results(&self) -> Option<&ResultsBundle> {
        self.results.as_ref()
    }

    pub fn active_tab(&self) -> Option<&str> {
        self.active_tab.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn owes_start_call(&self) -> bool {
        self.live && self.phase == Phase::Starting
    }

    /// Whether poll and tip timers should be running right now.
    pub fn wants_timers(&self) -> bool {
        self.live && !self.phase.is_terminal()
    }

    pub fn start_succeeded(&mut self) -> Applied {
        if !self.owes_start_call() {
            return Applied::Ignored;
        }
        log::info!("Start call accepted, polling begins");
        self.phase = Phase::Polling;
        Applied::Updated
    }

    pub fn start_failed(&mut self, reason: &str) -> Applied {
        if !self.owes_start_call() {
            return Applied::Ignored;
        }
        log::error!("Start call rejected: {}", reason);
        self.error = Some(START_FAILED_MESSAGE.to_string());
        self.phase = Phase::Failed;
        Applied::Finished
    }

    /// A ticket for the next status request, if one should be sent at all.
    pub fn issue_ticket(&mut self) -> Option<PollTicket> {
        if !self.live || self.phase != Phase::Polling {
            return None;
        }
        self.issued += 1;
        Some(PollTicket(self.issued))
    }

    fn accepts(&self, ticket: PollTicket) -> bool {
        self.live
            && self.phase == Phase::Polling
            && self.last_applied.is_none_or(|last| ticket > last)
    }

    pub fn apply_poll(&mut self, ticket: PollTicket, outcome: PollOutcome) -> Applied {
        if !self.accepts(ticket) {
            log::debug!("Dropping poll response {:?} in phase {:?}", ticket, self.phase);
            return Applied::Ignored;
        }
        self.last_applied = Some(ticket);

        let response = match outcome {
            PollOutcome::Unreachable(reason) => {
                log::warn!("Status poll failed, will retry: {}", reason);
                self.status = StatusLine::reconnecting();
                return Applied::Updated;
            }
            PollOutcome::Status(response) => response,
        };

        let message = response.message.unwrap_or_default();
        self.status = StatusLine::for_display(&message);

        match response.status {
            JobStatus::Completed => {
                let results = response.results.unwrap_or_default();
                self.active_tab = results.first_key().map(str::to_string);
                log::info!("Job completed with {} model result(s)", results.len());
                self.results = Some(results);
                self.phase = Phase::Completed;
                Applied::Finished
            }
            JobStatus::Failed => {
                log::info!("Job failed: {}", message);
                self.error = Some(if message.is_empty() {
                    FAILED_FALLBACK_MESSAGE.to_string()
                } else {
                    message
                });
                self.phase = Phase::Failed;
                Applied::Finished
            }
            JobStatus::Pending | JobStatus::Processing | JobStatus::Unknown => Applied::Updated,
        }
    }

    /// Advances the waiting-screen tip, wrapping around.
    pub fn rotate_tip(&mut self) -> Applied {
        if !self.wants_timers() {
            return Applied::Ignored;
        }
        self.tip_index = (self.tip_index + 1) % TIPS.len();
        Applied::Updated
    }

    pub fn select_tab(&mut self, model_name: &str) -> Applied {
        let known = self
            .results
            .as_ref()
            .is_some_and(|results| results.contains_key(model_name));
        if !self.live || !known || self.active_tab.as_deref() == Some(model_name) {
            return Applied::Ignored;
        }
        self.active_tab = Some(model_name.to_string());
        Applied::Updated
    }

    /// The page is gone; nothing applies after this.
    pub fn teardown(&mut self) {
        if self.live {
            log::debug!("Processing view torn down in phase {:?}", self.phase);
        }
        self.live = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{INITIAL_MESSAGE, RECONNECTING_DETAIL, RECONNECTING_MESSAGE};
    use rstest::rstest;

    fn status(raw: &str) -> PollOutcome {
        PollOutcome::Status(serde_json::from_str(raw).unwrap())
    }

    fn polling() -> ProcessingState {
        ProcessingState::new(Some(Mode::QuickAnalysis))
    }

    #[rstest]
    #[case(Some(Mode::Comparison), Phase::Starting, true)]
    #[case(Some(Mode::QuickAnalysis), Phase::Polling, false)]
    #[case(None, Phase::Polling, false)]
    fn entry_phase_depends_on_mode(#[case] mode: Option<Mode>, #[case] phase: Phase, #[case] owes: bool) {
        let state = ProcessingState::new(mode);
        assert_eq!(state.phase(), phase);
        assert_eq!(state.owes_start_call(), owes);
        assert_eq!(state.status().message, INITIAL_MESSAGE);
        assert!(state.wants_timers());
    }

    #[test]
    fn no_polling_until_start_call_succeeds() {
        let mut state = ProcessingState::new(Some(Mode::Comparison));
        assert_eq!(state.issue_ticket(), None);
        assert_eq!(state.start_succeeded(), Applied::Updated);
        assert_eq!(state.phase(), Phase::Polling);
        assert!(state.issue_ticket().is_some());
        assert_eq!(state.start_succeeded(), Applied::Ignored);
    }

    #[test]
    fn failed_start_call_is_terminal() {
        let mut state = ProcessingState::new(Some(Mode::Comparison));
        assert_eq!(state.start_failed("HTTP 500"), Applied::Finished);
        assert_eq!(state.phase(), Phase::Failed);
        assert_eq!(state.error(), Some(START_FAILED_MESSAGE));
        assert!(!state.wants_timers());
        assert_eq!(state.issue_ticket(), None);
        assert_eq!(state.rotate_tip(), Applied::Ignored);
    }

    #[test]
    fn progress_updates_message_and_detail() {
        let mut state = polling();
        let ticket = state.issue_ticket().unwrap();
        let applied = state.apply_poll(
            ticket,
            status(r#"{ "status": "processing", "message": "Detecting faces (12/50)" }"#),
        );
        assert_eq!(applied, Applied::Updated);
        assert_eq!(state.status().message, "Detecting faces");
        assert_eq!(state.status().detail, "(12/50)");
        assert_eq!(state.phase(), Phase::Polling);
    }

    #[test]
    fn completion_selects_first_model() {
        let mut state = polling();
        let ticket = state.issue_ticket().unwrap();
        let applied = state.apply_poll(
            ticket,
            status(
                r#"{ "status": "completed", "message": "Done", "results": {
                    "SFace": { "image_count": 2, "processing_time": 0.5, "face_groups": {}, "avg_face_scores": {} },
                    "DeepLab": { "image_count": 2, "processing_time": 0.7, "background_groups": {}, "avg_background_scores": {} }
                } }"#,
            ),
        );
        assert_eq!(applied, Applied::Finished);
        assert_eq!(state.phase(), Phase::Completed);
        assert_eq!(state.active_tab(), Some("SFace"));
        assert_eq!(state.results().map(|r| r.len()), Some(2));
        assert!(!state.wants_timers());

        assert_eq!(state.select_tab("DeepLab"), Applied::Updated);
        assert_eq!(state.active_tab(), Some("DeepLab"));
        assert_eq!(state.select_tab("missing"), Applied::Ignored);
    }

    #[test]
    fn empty_results_leave_no_active_tab() {
        let mut state = polling();
        let ticket = state.issue_ticket().unwrap();
        state.apply_poll(ticket, status(r#"{ "status": "completed", "message": "", "results": {} }"#));
        assert_eq!(state.phase(), Phase::Completed);
        assert!(state.results().is_some_and(|r| r.is_empty()));
        assert_eq!(state.active_tab(), None);
    }

    #[rstest]
    #[case(r#"{ "status": "failed", "message": "No faces found" }"#, "No faces found")]
    #[case(r#"{ "status": "failed" }"#, FAILED_FALLBACK_MESSAGE)]
    fn backend_failure_is_terminal(#[case] raw: &str, #[case] error: &str) {
        let mut state = polling();
        let ticket = state.issue_ticket().unwrap();
        assert_eq!(state.apply_poll(ticket, status(raw)), Applied::Finished);
        assert_eq!(state.phase(), Phase::Failed);
        assert_eq!(state.error(), Some(error));
        assert_eq!(state.issue_ticket(), None);
    }

    #[test]
    fn body_without_status_is_progress_not_reconnecting() {
        let mut state = polling();
        let ticket = state.issue_ticket().unwrap();
        let applied = state.apply_poll(ticket, status(r#"{ "message": "Queued (1/3)" }"#));
        assert_eq!(applied, Applied::Updated);
        assert_eq!(state.status().message, "Queued");
        assert_eq!(state.status().detail, "(1/3)");
        assert_ne!(state.status().message, RECONNECTING_MESSAGE);
        assert_eq!(state.phase(), Phase::Polling);
        assert!(state.issue_ticket().is_some());
    }

    #[test]
    fn transport_error_keeps_polling() {
        let mut state = polling();
        let first = state.issue_ticket().unwrap();
        state.apply_poll(first, status(r#"{ "status": "processing", "message": "Clustering (2/3)" }"#));

        let second = state.issue_ticket().unwrap();
        let applied = state.apply_poll(second, PollOutcome::Unreachable("connection refused".into()));
        assert_eq!(applied, Applied::Updated);
        assert_eq!(state.status().message, RECONNECTING_MESSAGE);
        assert_eq!(state.status().detail, RECONNECTING_DETAIL);
        assert_eq!(state.phase(), Phase::Polling);
        assert!(state.error().is_none());
        assert!(state.wants_timers());

        let third = state.issue_ticket().unwrap();
        state.apply_poll(third, status(r#"{ "status": "processing", "message": "Clustering (3/3)" }"#));
        assert_eq!(state.status().detail, "(3/3)");
    }

    #[test]
    fn stale_response_is_dropped() {
        let mut state = polling();
        let slow = state.issue_ticket().unwrap();
        let fast = state.issue_ticket().unwrap();

        state.apply_poll(fast, status(r#"{ "status": "processing", "message": "Scoring (9/10)" }"#));
        let applied = state.apply_poll(slow, status(r#"{ "status": "pending", "message": "Queued" }"#));

        assert_eq!(applied, Applied::Ignored);
        assert_eq!(state.status().message, "Scoring");
    }

    #[test]
    fn nothing_applies_after_completion() {
        let mut state = polling();
        let late = state.issue_ticket().unwrap();
        let done = state.issue_ticket().unwrap();
        state.apply_poll(done, status(r#"{ "status": "completed", "message": "Done", "results": {} }"#));

        assert_eq!(state.apply_poll(late, PollOutcome::Unreachable("timeout".into())), Applied::Ignored);
        assert_eq!(state.status().message, "Done");
    }

    #[test]
    fn nothing_applies_after_teardown() {
        let mut state = polling();
        let in_flight = state.issue_ticket().unwrap();
        let tip = state.tip();
        state.teardown();

        assert!(!state.is_live());
        assert!(!state.wants_timers());
        assert_eq!(state.issue_ticket(), None);
        assert_eq!(state.rotate_tip(), Applied::Ignored);
        assert_eq!(state.tip(), tip);
        let applied = state.apply_poll(
            in_flight,
            status(r#"{ "status": "completed", "message": "Done", "results": {} }"#),
        );
        assert_eq!(applied, Applied::Ignored);
        assert!(state.results().is_none());
        assert_eq!(state.status().message, INITIAL_MESSAGE);
    }

    #[test]
    fn tips_wrap_around() {
        let mut state = polling();
        let first = state.tip();
        for _ in 0..TIPS.len() - 1 {
            assert_eq!(state.rotate_tip(), Applied::Updated);
            assert_ne!(state.tip(), first);
        }
        state.rotate_tip();
        assert_eq!(state.tip(), first);
    }
}
