//! HTML fragment normalization
//!
//! `HtmlMinifier` tidies card text before it is stored on the graph.
//! `HtmlToLatex` turns the same fragments into LaTeX for the printable deck.

use regex::Regex;
use std::sync::OnceLock;

use crate::wrap::fill;

/// Text normalization collaborator: `normalize(html) -> html`.
pub trait Normalizer {
    fn normalize(&self, html: &str) -> String;
}

fn comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment pattern"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

fn inter_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r">\s+<").expect("valid inter-tag pattern"))
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<\s*(/?)\s*([A-Za-z][A-Za-z0-9]*)[^>]*>").expect("valid tag pattern")
    })
}

fn blank_lines_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("valid blank line pattern"))
}

/// Drops comments and whitespace-only text between tags, collapses other
/// whitespace runs to one space.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlMinifier;

impl Normalizer for HtmlMinifier {
    fn normalize(&self, html: &str) -> String {
        let html = comment_re().replace_all(html, "");
        let html = whitespace_re().replace_all(&html, " ");
        let html = inter_tag_re().replace_all(&html, "><");
        html.trim().to_string()
    }
}

/// Leaves text as it is.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Normalizer for Passthrough {
    fn normalize(&self, html: &str) -> String {
        html.to_string()
    }
}

/// Column width of converted LaTeX paragraphs.
pub const LATEX_FILL_WIDTH: usize = 100;

/// Converts the small HTML subset used in card texts to LaTeX.
///
/// Known tags: `ul`, `li`, `sup`, `sub`, `em`, `p`. Any other tag is dropped,
/// its text kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlToLatex;

impl HtmlToLatex {
    fn open(tag: &str) -> &'static str {
        match tag {
            "ul" => "\n\\begin{itemize}\n",
            "li" => "\\item ",
            "sup" => "\\textsuperscript{",
            "sub" => "\\textsubscript{",
            "em" => " \\emph{",
            "p" => "\n\n",
            _ => "",
        }
    }

    fn close(tag: &str) -> &'static str {
        match tag {
            "ul" => "\\end{itemize}\n\n",
            "li" => "\n",
            "sup" | "sub" => "}",
            "em" => "} ",
            "p" => "\n\n",
            _ => "",
        }
    }

    fn push_text(out: &mut String, raw: &str) {
        let text = html_escape::decode_html_entities(raw).replace('\n', " ");
        let mut last_space = false;
        for c in text.chars() {
            if c == ' ' {
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }
    }

    pub fn convert(&self, html: &str) -> String {
        let html = comment_re().replace_all(html, "");
        let mut latex = String::with_capacity(html.len());
        let mut cursor = 0;

        for caps in tag_re().captures_iter(&html) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(2)) else {
                continue;
            };
            Self::push_text(&mut latex, &html[cursor..whole.start()]);
            cursor = whole.end();

            let tag = name.as_str().to_ascii_lowercase();
            let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
            if closing {
                latex.push_str(Self::close(&tag));
            } else {
                latex.push_str(Self::open(&tag));
                if whole.as_str().ends_with("/>") {
                    latex.push_str(Self::close(&tag));
                }
            }
        }
        Self::push_text(&mut latex, &html[cursor..]);

        let filled = latex
            .split('\n')
            .map(|line| fill(line.trim(), LATEX_FILL_WIDTH))
            .collect::<Vec<_>>()
            .join("\n");
        blank_lines_re()
            .replace_all(&filled, "\n\n")
            .replace('%', "\\%")
    }
}

impl Normalizer for HtmlToLatex {
    fn normalize(&self, html: &str) -> String {
        self.convert(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minifier_drops_inter_tag_space() {
        let html = "<p>\n  Hi   there\n</p>\n<!-- note -->\n<ul>\n  <li>a</li>\n</ul>\n";
        assert_eq!(
            HtmlMinifier.normalize(html),
            "<p> Hi there </p><ul><li>a</li></ul>"
        );
    }

    #[test]
    fn minifier_keeps_compact_html() {
        assert_eq!(HtmlMinifier.normalize("<p>Hi</p>"), "<p>Hi</p>");
    }

    #[test]
    fn latex_paragraph_and_emphasis() {
        let latex = HtmlToLatex.convert("<p>CO<sub>2</sub> is <em>key</em></p>");
        assert_eq!(latex.trim(), "CO\\textsubscript{2} is  \\emph{key}");
    }

    #[test]
    fn latex_list() {
        let latex = HtmlToLatex.convert("<ul><li>one</li><li>two</li></ul>");
        assert!(latex.contains("\\begin{itemize}"));
        assert!(latex.contains("\\item one\n\\item two"));
        assert!(latex.contains("\\end{itemize}"));
    }

    #[test]
    fn latex_escapes_percent_and_decodes_entities() {
        let latex = HtmlToLatex.convert("<p>50% &amp; more</p>");
        assert_eq!(latex.trim(), "50\\% & more");
    }

    #[test]
    fn latex_decodes_named_and_numeric_references() {
        let latex =
            HtmlToLatex.convert("<p>For&ecirc;t &eacute;t&eacute; &#233; &#x2019; d&rsquo;eau</p>");
        assert_eq!(latex.trim(), "Forêt été é ’ d’eau");
        assert!(!latex.contains("&eacute;"));
        assert!(!latex.contains("&#"));
    }

    #[test]
    fn latex_never_has_three_newlines() {
        let latex = HtmlToLatex.convert("<p>a</p><p></p><p>b</p>");
        assert!(!latex.contains("\n\n\n"));
    }

    #[test]
    fn latex_fills_long_lines() {
        let text = "word ".repeat(60);
        let latex = HtmlToLatex.convert(&format!("<p>{}</p>", text));
        assert!(latex.lines().all(|l| l.chars().count() <= LATEX_FILL_WIDTH));
    }
}
