use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use regex::Regex;

/// Translates the backend's Merriam-Webster style inline markup
/// (`{bc}`, `{it}...{/it}`, `{sx}...{/sx}`, `{dxt|word|...}` and friends)
/// into plain terminal text or styled lines. Unrecognized tags are
/// stripped.
pub struct TextFormatter {
    paired: Regex,
    cross_ref: Regex,
    leftover: Regex,
}

impl TextFormatter {
    pub fn new() -> Self {
        Self {
            // Innermost pairs only; plain() loops until nothing matches so
            // nested tags unwind from the inside out.
            paired: Regex::new(
                r"\{(it|b|bold|it_old|inf|sup|sc|dx|sx|phrase|wi|gloss|qword|parahw|mat|a_link|d_link|i_link|et_link|ma|dx_def|dx_ety|ptr|accent)\}([^{}]*)\{/[a-z_]+\}",
            )
            .expect("paired tag pattern"),
            cross_ref: Regex::new(r"\{dxt\|([^|}]*)[^}]*\}").expect("cross reference pattern"),
            leftover: Regex::new(r"\{[^}]*\}").expect("leftover tag pattern"),
        }
    }

    /// All markup resolved or stripped, keeping only the readable text.
    pub fn plain(&self, text: &str) -> String {
        let mut out = self.normalize_entities(text);
        while self.paired.is_match(&out) {
            out = self.paired.replace_all(&out, "$2").into_owned();
        }
        let out = self.cross_ref.replace_all(&out, "$1");
        self.leftover.replace_all(&out, "").trim().to_string()
    }

    /// One styled line: italics, bold, and link-like tags keep a visual
    /// treatment, everything else renders as plain text.
    pub fn styled(&self, text: &str) -> Line<'static> {
        let source = self
            .cross_ref
            .replace_all(&self.normalize_entities(text), "$1")
            .into_owned();
        let mut spans: Vec<Span<'static>> = Vec::new();
        let mut cursor = 0;
        for captures in self.paired.captures_iter(&source) {
            let whole = captures.get(0).expect("whole match");
            if whole.start() > cursor {
                self.push_plain(&mut spans, &source[cursor..whole.start()]);
            }
            spans.push(Span::styled(
                self.plain(&captures[2]),
                tag_style(&captures[1]),
            ));
            cursor = whole.end();
        }
        if cursor < source.len() {
            self.push_plain(&mut spans, &source[cursor..]);
        }
        Line::from(spans)
    }

    fn push_plain(&self, spans: &mut Vec<Span<'static>>, chunk: &str) {
        let cleaned = self.leftover.replace_all(chunk, "").into_owned();
        if !cleaned.is_empty() {
            spans.push(Span::raw(cleaned));
        }
    }

    fn normalize_entities(&self, text: &str) -> String {
        text.replace("{bc}", ": ")
            .replace("{ldquo}", "\u{201c}")
            .replace("{rdquo}", "\u{201d}")
            .replace("{nbsp}", " ")
            .replace("{ds}", "\u{2014}")
            .replace("{sds}", "\u{2014}")
            .replace("{p_br}", " ")
            .replace("{sxn}", "")
            .replace("{qdate}", "")
    }
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn tag_style(tag: &str) -> Style {
    match tag {
        "it" | "it_old" | "qword" | "wi" | "gloss" => {
            Style::default().add_modifier(Modifier::ITALIC)
        }
        "b" | "bold" | "parahw" => Style::default().add_modifier(Modifier::BOLD),
        "phrase" => Style::default().add_modifier(Modifier::BOLD | Modifier::ITALIC),
        "sx" | "dx" | "dx_def" | "dx_ety" | "ma" | "a_link" | "d_link" | "i_link" | "et_link" => {
            Style::default().fg(Color::Cyan)
        }
        "sc" => Style::default().fg(Color::Gray),
        _ => Style::default(),
    }
}
