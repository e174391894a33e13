//! Paints chat and upload state onto the terminal.

use colored::Colorize;
use contextqa_application::upload_initiator::SUCCESS_MESSAGE;
use contextqa_application::UploadStatus;
use contextqa_core::chat::ChatState;
use contextqa_core::render::RenderedTurn;
use contextqa_core::SessionId;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::theme::Palette;

pub const EMPTY_TRANSCRIPT_PROMPT: &str = "Ask a question about your uploaded documents";
const TYPING_INDICATOR: &str = "…";

static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#{1,6}\s+(.+)$").expect("heading pattern is valid"));
static LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[([^\]]+)\]\((https?://[^)\s]+)\)").expect("link pattern is valid")
});
static INLINE_MATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$[^$\n]+\$").expect("inline math pattern is valid"));
static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^*]+)\*\*").expect("bold pattern is valid"));

/// Escapes control characters so text cannot drive the terminal.
///
/// Newlines and tabs are kept.
pub fn escape_control(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_control() && c != '\n' && c != '\t' {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    out
}

/// Headings, links as `text <url>`, inline math and bold.
fn style_line(line: &str, palette: &Palette) -> String {
    if let Some(caps) = HEADING.captures(line) {
        return palette.heading(&caps[1]).to_string();
    }
    let line = LINK.replace_all(line, |caps: &Captures| {
        format!("{} {}", &caps[1], palette.link(&format!("<{}>", &caps[2])))
    });
    let line = INLINE_MATH.replace_all(&line, |caps: &Captures| palette.math(&caps[0]).to_string());
    BOLD.replace_all(&line, |caps: &Captures| caps[1].bold().to_string())
        .into_owned()
}

/// Terminal rendering of assistant markdown.
pub fn render_markdown(source: &str, palette: &Palette) -> String {
    escape_control(source)
        .lines()
        .map(|line| style_line(line, palette))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Incrementally prints a chat transcript as state snapshots arrive.
pub struct TranscriptView {
    palette: Palette,
    printed: usize,
    placeholder_shown: bool,
    indicator_shown: bool,
}

impl TranscriptView {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            printed: 0,
            placeholder_shown: false,
            indicator_shown: false,
        }
    }

    pub fn banner(&self, session_id: &SessionId) {
        println!("{}", self.palette.banner());
        println!(
            "{}",
            self.palette
                .notice(&format!("Session {}. Type /help for commands.", session_id))
        );
        println!();
    }

    pub fn help(&self) {
        println!("{}", self.palette.notice("/new   upload new documents (ends this session)"));
        println!("{}", self.palette.notice("/help  show this help"));
        println!("{}", self.palette.notice("quit   exit"));
    }

    pub fn notice(&self, text: &str) {
        println!("{}", self.palette.notice(text));
    }

    /// Prints whatever `state` has that was not printed yet.
    pub fn sync(&mut self, state: &ChatState) {
        let turns = state.transcript().turns();

        if turns.is_empty() && !self.placeholder_shown {
            println!("{}", self.palette.notice(EMPTY_TRANSCRIPT_PROMPT));
            self.placeholder_shown = true;
        }

        for turn in turns.iter().skip(self.printed) {
            match RenderedTurn::from_turn(turn) {
                RenderedTurn::Literal { text } => {
                    println!("{}", self.palette.user(&format!("> {}", escape_control(text))));
                }
                RenderedTurn::Markdown { source, .. } => {
                    println!("{}", self.palette.assistant_label());
                    println!("{}", render_markdown(source, &self.palette));
                    println!();
                }
            }
        }
        self.printed = turns.len();

        if state.is_sending() && !self.indicator_shown {
            println!("{}", self.palette.notice(TYPING_INDICATOR));
        }
        self.indicator_shown = state.is_sending();
    }
}

pub fn print_upload_status(palette: &Palette, status: &UploadStatus) {
    match status {
        UploadStatus::Idle => {}
        UploadStatus::Uploading => println!("{}", palette.notice("Uploading and indexing…")),
        UploadStatus::Succeeded { .. } => println!("{}", palette.success(SUCCESS_MESSAGE)),
        UploadStatus::Failed { message } => println!("{}", palette.error(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_control_neutralizes_escape_sequences() {
        assert_eq!(escape_control("\x1b[2Jgone"), "\\u{1b}[2Jgone");
        assert_eq!(escape_control("line one\nline\ttwo"), "line one\nline\ttwo");
        assert_eq!(escape_control("bell\x07"), "bell\\u{7}");
    }

    #[test]
    fn test_render_markdown_plain_output() {
        colored::control::set_override(false);
        let palette = Palette::new(Default::default());

        assert_eq!(
            render_markdown("# Summary\nRefunds within **30 days**, cost $x+1$.", &palette),
            "Summary\nRefunds within 30 days, cost $x+1$."
        );
        assert_eq!(
            render_markdown("See [the policy](https://example.com/refunds).", &palette),
            "See the policy <https://example.com/refunds>."
        );
        assert_eq!(render_markdown("[local](file.md)", &palette), "[local](file.md)");
    }
}
