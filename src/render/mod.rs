pub mod terminal;

use crate::record::{mood_glyph, Field, Record};
use crate::store::StoreError;

pub const LOADING_NOTICE: &str = "데이터를 불러오는 중...";
pub const EMPTY_NOTICE: &str = "아직 기록된 내용이 없습니다.";
pub const SHEET_UNAVAILABLE_NOTICE: &str =
    "⚠️ 시트 이름을 확인하거나 스프레드시트 접근 권한을 확인하세요.";
pub const INVALID_DATA_NOTICE: &str =
    "유효하지 않은 데이터가 수신되었습니다. 시트/헤더 설정을 확인하세요.";

/// Notice shown in place of the list when a load fails.
pub fn load_failure_notice(err: &StoreError) -> String {
    if err.is_sheet_unavailable() {
        return SHEET_UNAVAILABLE_NOTICE.to_string();
    }
    match err {
        StoreError::NotAList { .. } => format!("데이터 로드 실패: {INVALID_DATA_NOTICE}"),
        other => format!("데이터 로드 실패: {other}"),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Nickname,
    Score,
    Mood,
    Word,
    Summary,
    Praise,
    Helpful,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::Nickname,
        Column::Score,
        Column::Mood,
        Column::Word,
        Column::Summary,
        Column::Praise,
        Column::Helpful,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Column::Nickname => "닉네임",
            Column::Score => "점수",
            Column::Mood => "기분",
            Column::Word => "단어",
            Column::Summary => "요약",
            Column::Praise => "칭찬/격려",
            Column::Helpful => "도움된점",
        }
    }

    /// Free-text columns that a surface may shorten for display.
    pub fn is_long_text(self) -> bool {
        matches!(
            self,
            Column::Word | Column::Summary | Column::Praise | Column::Helpful
        )
    }
}

/// One display row. Values are always stored in full.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordRow {
    pub nickname: String,
    pub score: String,
    pub mood: String,
    pub word: String,
    pub summary: String,
    pub praise: String,
    pub helpful: String,
}

impl RecordRow {
    pub fn from_record(record: &Record) -> Self {
        Self {
            nickname: record.text(Field::Nickname),
            score: record.text(Field::Score),
            mood: mood_glyph(&record.text(Field::Mood)),
            word: record.text(Field::Word),
            summary: record.text(Field::Summary),
            praise: record.text(Field::Praise),
            helpful: record.text(Field::Helpful),
        }
    }

    /// Untruncated value of a column.
    pub fn full_text(&self, column: Column) -> &str {
        match column {
            Column::Nickname => &self.nickname,
            Column::Score => &self.score,
            Column::Mood => &self.mood,
            Column::Word => &self.word,
            Column::Summary => &self.summary,
            Column::Praise => &self.praise,
            Column::Helpful => &self.helpful,
        }
    }
}

/// Contents of the display region.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ListView {
    Loading,
    Empty,
    Rows(Vec<RecordRow>),
    Error(String),
}

impl ListView {
    pub fn notice(&self) -> Option<&str> {
        match self {
            ListView::Loading => Some(LOADING_NOTICE),
            ListView::Empty => Some(EMPTY_NOTICE),
            ListView::Error(message) => Some(message),
            ListView::Rows(_) => None,
        }
    }
}

/// Where a [`Renderer`] presents its view.
pub trait Surface {
    fn present(&mut self, view: &ListView);
}

/// Keeps every presented view, oldest first.
#[derive(Clone, Debug, Default)]
pub struct MemorySurface {
    pub presented: Vec<ListView>,
}

impl Surface for MemorySurface {
    fn present(&mut self, view: &ListView) {
        self.presented.push(view.clone());
    }
}

/// Owns the display region. Every call replaces the whole view; rows are
/// drawn in the order given, with no sorting or filtering.
#[derive(Debug)]
pub struct Renderer<S: Surface> {
    view: ListView,
    surface: S,
}

impl<S: Surface> Renderer<S> {
    pub fn new(surface: S) -> Self {
        Self {
            view: ListView::Empty,
            surface,
        }
    }

    pub fn render_loading(&mut self) {
        self.show(ListView::Loading);
    }

    pub fn render_all(&mut self, records: &[Record]) {
        if records.is_empty() {
            self.render_empty();
            return;
        }
        let rows = records.iter().map(RecordRow::from_record).collect();
        self.show(ListView::Rows(rows));
    }

    pub fn render_empty(&mut self) {
        self.show(ListView::Empty);
    }

    pub fn render_error(&mut self, message: impl Into<String>) {
        self.show(ListView::Error(message.into()));
    }

    pub fn view(&self) -> &ListView {
        &self.view
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    fn show(&mut self, view: ListView) {
        self.view = view;
        self.surface.present(&self.view);
    }
}
