use shared::AnalysisResult;

pub const NO_IMAGE_MESSAGE: &str = "Please upload or capture an image first.";

/// Image/result pairing for the single-image page.
///
/// Each selected image gets an id. An analysis request carries the id it was
/// started for, and its outcome is dropped if that image is no longer current.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ViewState {
    image_id: Option<u64>,
    pending: Option<u64>,
    result: Option<AnalysisResult>,
    error: Option<String>,
}

impl ViewState {
    pub fn image_id(&self) -> Option<u64> {
        self.image_id
    }

    pub fn has_image(&self) -> bool {
        self.image_id.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn select_image(&mut self, id: u64) {
        self.image_id = Some(id);
        self.pending = None;
        self.result = None;
        self.error = None;
    }

    pub fn retake(&mut self) {
        self.image_id = None;
        self.pending = None;
        self.result = None;
        self.error = None;
    }

    /// Starts a request for the current image and returns its ticket.
    ///
    /// Returns `None` while another request is outstanding, or when there is
    /// no image (which also sets the error message).
    pub fn begin_analysis(&mut self) -> Option<u64> {
        if self.pending.is_some() {
            return None;
        }
        let Some(id) = self.image_id else {
            self.error = Some(NO_IMAGE_MESSAGE.to_string());
            return None;
        };
        self.pending = Some(id);
        self.result = None;
        self.error = None;
        Some(id)
    }

    /// Applies an outcome if `ticket` still belongs to the pending request.
    /// Returns whether the state changed.
    pub fn finish_analysis(&mut self, ticket: u64, outcome: Result<AnalysisResult, String>) -> bool {
        if self.pending != Some(ticket) || self.image_id != Some(ticket) {
            log::debug!("Ignoring stale analysis result for image {}", ticket);
            return false;
        }
        self.pending = None;
        match outcome {
            Ok(result) => self.result = Some(result),
            Err(message) => self.error = Some(message),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str) -> AnalysisResult {
        AnalysisResult::Structured {
            name: name.to_string(),
            description: "desc".to_string(),
        }
    }

    #[test]
    fn analyze_without_image_sets_error() {
        let mut state = ViewState::default();
        assert_eq!(state.begin_analysis(), None);
        assert_eq!(state.error(), Some(NO_IMAGE_MESSAGE));
        assert!(!state.is_loading());
    }

    #[test]
    fn successful_analysis_is_shown_for_current_image() {
        let mut state = ViewState::default();
        state.select_image(7);
        let ticket = state.begin_analysis().unwrap();
        assert!(state.is_loading());
        assert!(state.finish_analysis(ticket, Ok(result("Mug"))));
        assert_eq!(state.result(), Some(&result("Mug")));
        assert!(!state.is_loading());
    }

    #[test]
    fn second_request_is_refused_while_loading() {
        let mut state = ViewState::default();
        state.select_image(1);
        assert_eq!(state.begin_analysis(), Some(1));
        assert_eq!(state.begin_analysis(), None);
    }

    #[test]
    fn new_image_clears_previous_result() {
        let mut state = ViewState::default();
        state.select_image(1);
        let ticket = state.begin_analysis().unwrap();
        state.finish_analysis(ticket, Ok(result("Old")));

        state.select_image(2);
        assert_eq!(state.result(), None);
        assert_eq!(state.error(), None);
    }

    #[test]
    fn reanalyze_after_retake_clears_result_before_it_resolves() {
        let mut state = ViewState::default();
        state.select_image(1);
        let first = state.begin_analysis().unwrap();
        state.finish_analysis(first, Ok(result("Old")));

        state.retake();
        assert!(!state.has_image());
        assert_eq!(state.result(), None);

        state.select_image(2);
        let second = state.begin_analysis().unwrap();
        assert_eq!(state.result(), None);
        assert!(state.is_loading());

        assert!(state.finish_analysis(second, Ok(result("New"))));
        assert_eq!(state.result(), Some(&result("New")));
    }

    #[test]
    fn result_of_superseded_request_is_ignored() {
        let mut state = ViewState::default();
        state.select_image(1);
        let stale = state.begin_analysis().unwrap();

        state.retake();
        state.select_image(2);

        assert!(!state.finish_analysis(stale, Ok(result("Stale"))));
        assert_eq!(state.result(), None);
        assert!(!state.is_loading());
        assert_eq!(state.image_id(), Some(2));
    }

    #[test]
    fn failure_is_reported_as_error() {
        let mut state = ViewState::default();
        state.select_image(3);
        let ticket = state.begin_analysis().unwrap();
        assert!(state.finish_analysis(ticket, Err("Failed to analyze image".into())));
        assert_eq!(state.error(), Some("Failed to analyze image"));
        assert_eq!(state.result(), None);
    }
}
