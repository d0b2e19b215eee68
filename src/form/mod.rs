use crate::record::{Mood, Score, SubmissionPayload};

pub const SUBMIT_LABEL: &str = "기록하기";
pub const SUBMIT_BUSY_LABEL: &str = "저장 중...";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreOption {
    pub value: u8,
    pub label: String,
}

/// Choices for the score dropdown, ascending.
pub fn score_options() -> Vec<ScoreOption> {
    Score::all()
        .map(|s| ScoreOption {
            value: s.value(),
            label: s.label(),
        })
        .collect()
}

/// The submit button. While a request is in flight it is disabled and
/// further submits from it are refused.
#[derive(Clone, Debug)]
pub struct SubmitControl {
    disabled: bool,
    label: &'static str,
}

impl Default for SubmitControl {
    fn default() -> Self {
        Self {
            disabled: false,
            label: SUBMIT_LABEL,
        }
    }
}

impl SubmitControl {
    pub fn try_begin(&mut self) -> bool {
        if self.disabled {
            return false;
        }
        self.disabled = true;
        self.label = SUBMIT_BUSY_LABEL;
        true
    }

    pub fn finish(&mut self) {
        self.disabled = false;
        self.label = SUBMIT_LABEL;
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

/// Form state a submission is built from.
#[derive(Clone, Debug, Default)]
pub struct RecordForm {
    pub score: Score,
    pub mood: Mood,
    pub word: String,
    pub summary: String,
    pub praise: String,
    pub helpful: String,
    pub nickname: String,
    pub control: SubmitControl,
}

impl RecordForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn payload(&self) -> SubmissionPayload {
        SubmissionPayload {
            score: self.score,
            mood: self.mood.label().to_string(),
            word: self.word.clone(),
            summary: self.summary.clone(),
            praise: self.praise.clone(),
            helpful: self.helpful.clone(),
            nickname: self.nickname.clone(),
        }
    }

    /// Back to the first score option and the default mood, texts cleared.
    /// The submit control is left alone.
    pub fn reset(&mut self) {
        self.score = Score::default();
        self.mood = Mood::default();
        self.word.clear();
        self.summary.clear();
        self.praise.clear();
        self.helpful.clear();
        self.nickname.clear();
    }
}
