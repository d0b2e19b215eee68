use std::io::Write;
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::{Column, ListView, RecordRow, Surface, LOADING_NOTICE};

pub const DEFAULT_COLUMN_WIDTH: usize = 40;

#[derive(Clone, Copy, Debug)]
pub struct TerminalOptions {
    /// Print long texts untruncated.
    pub full_text: bool,
    pub column_width: usize,
}

impl Default for TerminalOptions {
    fn default() -> Self {
        Self {
            full_text: false,
            column_width: DEFAULT_COLUMN_WIDTH,
        }
    }
}

/// Prints views to stdout. The loading notice is a spinner on stderr that
/// is cleared once the next view arrives.
pub struct TerminalSurface {
    options: TerminalOptions,
    spinner: Option<ProgressBar>,
}

impl TerminalSurface {
    pub fn new(options: TerminalOptions) -> Self {
        Self {
            options,
            spinner: None,
        }
    }

    fn start_spinner(&mut self) {
        let pb = ProgressBar::new_spinner();
        pb.set_draw_target(ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::with_template(":: {spinner} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(LOADING_NOTICE);
        pb.enable_steady_tick(Duration::from_millis(120));
        self.spinner = Some(pb);
    }

    fn stop_spinner(&mut self) {
        if let Some(pb) = self.spinner.take() {
            pb.finish_and_clear();
        }
    }
}

impl Surface for TerminalSurface {
    fn present(&mut self, view: &ListView) {
        if let ListView::Loading = view {
            self.start_spinner();
            return;
        }
        self.stop_spinner();
        let rendered = format_view(view, &self.options);
        if let Err(e) = write_rendered(&mut std::io::stdout().lock(), &rendered) {
            tracing::warn!(error = %e, "failed to write list to stdout");
        }
    }
}

fn write_rendered<W: Write>(out: &mut W, rendered: &str) -> std::io::Result<()> {
    out.write_all(rendered.as_bytes())?;
    out.flush()
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        self.stop_spinner();
    }
}

pub fn format_view(view: &ListView, options: &TerminalOptions) -> String {
    match view {
        ListView::Loading => format!(":: {}\n", LOADING_NOTICE),
        ListView::Empty => format!(":: {}\n", super::EMPTY_NOTICE.dimmed()),
        ListView::Error(message) => format!(":: {}\n", message.bold().red()),
        ListView::Rows(rows) => {
            let mut out = String::new();
            for (i, row) in rows.iter().enumerate() {
                format_row(&mut out, i + 1, row, options);
            }
            out
        }
    }
}

fn format_row(out: &mut String, position: usize, row: &RecordRow, options: &TerminalOptions) {
    out.push_str(&format!(
        "{}{}{} {}  {}  {}\n",
        "(".bold().white(),
        position.to_string().bold().blue(),
        ")".bold().white(),
        row.nickname.bold(),
        row.score.yellow(),
        row.mood
    ));
    for column in Column::ALL.into_iter().filter(|c| c.is_long_text()) {
        let text = display_text(row.full_text(column), options);
        out.push_str(&format!("    {:<8}: {}\n", column.label(), text));
    }
    out.push('\n');
}

/// Shortens `text` to the column width unless full text is requested.
pub fn display_text(text: &str, options: &TerminalOptions) -> String {
    if options.full_text {
        return text.to_string();
    }
    let flat = text.replace(['\r', '\n'], " ");
    truncate(&flat, options.column_width)
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let keep = width.saturating_sub(1);
    let mut out: String = text.chars().take(keep).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_by_characters_not_bytes() {
        let options = TerminalOptions {
            full_text: false,
            column_width: 5,
        };
        assert_eq!(display_text("가나다라마바사", &options), "가나다라…");
        assert_eq!(display_text("가나다", &options), "가나다");
    }

    #[test]
    fn full_text_mode_keeps_everything() {
        let options = TerminalOptions {
            full_text: true,
            column_width: 5,
        };
        let text = "line one\nline two is long";
        assert_eq!(display_text(text, &options), text);
    }

    #[test]
    fn rows_show_labels_and_values() {
        let row = RecordRow {
            nickname: "minsu".to_string(),
            score: "90".to_string(),
            mood: "😌".to_string(),
            word: "성실".to_string(),
            ..RecordRow::default()
        };
        let out = format_view(&ListView::Rows(vec![row]), &TerminalOptions::default());
        assert!(out.contains("minsu"));
        assert!(out.contains("90"));
        assert!(out.contains("😌"));
        assert!(out.contains("단어"));
        assert!(out.contains("성실"));
        assert!(out.contains("도움된점"));
    }

    #[test]
    fn notices_render_their_text() {
        let out = format_view(&ListView::Empty, &TerminalOptions::default());
        assert!(out.contains(super::super::EMPTY_NOTICE));
        let out = format_view(
            &ListView::Error("데이터 로드 실패: x".to_string()),
            &TerminalOptions::default(),
        );
        assert!(out.contains("데이터 로드 실패: x"));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_errors_are_reported_not_swallowed() {
        let mut buf = Vec::new();
        write_rendered(&mut buf, ":: ok\n").unwrap();
        assert_eq!(buf, b":: ok\n");

        let err = write_rendered(&mut BrokenPipe, ":: ok\n").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
    }
}
