//! Plain text backend.
//!
//! Knows a single lexer, `text`, which yields the whole input as one
//! unstyled token. The formatters render that token the way the usual
//! HTML, LaTeX, RTF and terminal formatters render plain text.

use std::fmt::Write;

use serde_json::Value;

use crate::highlight::{FormatterOptions, HighlightError, Highlighter};

const LEXERS: &[&str] = &["text"];

/// Style rules emitted for HTML style definitions, as (class, declarations).
const HTML_STYLES: &[(&str, &str)] = &[
    (".hll", "background-color: #ffffcc"),
    ("", "background: #f8f8f8"),
    (".c", "color: #408080; font-style: italic"),
    (".err", "border: 1px solid #FF0000"),
    (".k", "color: #008000; font-weight: bold"),
    (".o", "color: #666666"),
    (".s", "color: #BA2121"),
    (".m", "color: #666666"),
    (".nb", "color: #008000"),
    (".s2", "color: #BA2121"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Html,
    Latex,
    Rtf,
    Terminal,
    Text,
}

impl Format {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "html" | "htm" => Some(Format::Html),
            "latex" | "tex" => Some(Format::Latex),
            "rtf" => Some(Format::Rtf),
            "terminal" | "console" => Some(Format::Terminal),
            "text" | "null" => Some(Format::Text),
            _ => None,
        }
    }
}

/// Backend rendering unhighlighted text.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainHighlighter;

impl PlainHighlighter {
    pub fn new() -> Self {
        Self
    }
}

impl Highlighter for PlainHighlighter {
    fn has_lexer(&self, name: &str) -> bool {
        LEXERS.contains(&name)
    }

    fn has_formatter(&self, name: &str) -> bool {
        Format::from_name(name).is_some()
    }

    fn highlight(
        &self,
        code: &str,
        lexer: &str,
        formatter: &str,
        options: &FormatterOptions,
    ) -> Result<String, HighlightError> {
        if !self.has_lexer(lexer) {
            return Err(HighlightError::UnknownLexer(lexer.to_string()));
        }
        let format = Format::from_name(formatter)
            .ok_or_else(|| HighlightError::UnknownFormatter(formatter.to_string()))?;

        let mut text = code.to_string();
        if !text.ends_with('\n') {
            text.push('\n');
        }

        match format {
            Format::Html => format_html(&text, options),
            Format::Latex => format_latex(&text, options),
            Format::Rtf => format_rtf(&text, options),
            Format::Terminal | Format::Text => Ok(text),
        }
    }

    fn style_defs(
        &self,
        formatter: &str,
        selectors: &[String],
        options: &FormatterOptions,
    ) -> Result<String, HighlightError> {
        match Format::from_name(formatter) {
            Some(Format::Html) => {
                let cssclass = string_option(options, "cssclass", "highlight")?;
                let default_selector = [format!(".{}", cssclass)];
                let selectors = if selectors.is_empty() {
                    &default_selector[..]
                } else {
                    selectors
                };
                Ok(html_style_defs(selectors))
            }
            Some(_) => Err(HighlightError::NoStyleDefs(formatter.to_string())),
            None => Err(HighlightError::UnknownFormatter(formatter.to_string())),
        }
    }
}

fn string_option(options: &FormatterOptions, name: &str, default: &str) -> Result<String, HighlightError> {
    match options.get(name) {
        None | Some(Value::Null) => Ok(default.to_string()),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(other) => Err(HighlightError::InvalidOption {
            option: name.to_string(),
            reason: format!("expected a string, got {}", other),
        }),
    }
}

fn bool_option(options: &FormatterOptions, name: &str, default: bool) -> Result<bool, HighlightError> {
    match options.get(name) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(value)) => Ok(*value),
        Some(other) => Err(HighlightError::InvalidOption {
            option: name.to_string(),
            reason: format!("expected a boolean, got {}", other),
        }),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn format_html(text: &str, options: &FormatterOptions) -> Result<String, HighlightError> {
    let cssclass = string_option(options, "cssclass", "highlight")?;
    let escaped = escape_html(text);

    if bool_option(options, "nowrap", false)? {
        return Ok(escaped);
    }

    Ok(format!(
        "<div class=\"{}\"><pre>{}</pre></div>\n",
        escape_html(&cssclass),
        escaped
    ))
}

fn html_style_defs(selectors: &[String]) -> String {
    let mut defs = String::new();
    for (class, declarations) in HTML_STYLES {
        let scoped: Vec<String> = selectors
            .iter()
            .map(|selector| {
                if class.is_empty() {
                    selector.clone()
                } else {
                    format!("{} {}", selector, class)
                }
            })
            .collect();
        let _ = writeln!(defs, "{} {{ {} }}", scoped.join(", "), declarations);
    }
    defs
}

fn format_latex(text: &str, options: &FormatterOptions) -> Result<String, HighlightError> {
    let prefix = string_option(options, "commandprefix", "PY")?;
    let verboptions = string_option(options, "verboptions", "")?;

    let mut body = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => {
                let _ = write!(body, "\\{}Zbs{{}}", prefix);
            }
            '{' => {
                let _ = write!(body, "\\{}Zob{{}}", prefix);
            }
            '}' => {
                let _ = write!(body, "\\{}Zcb{{}}", prefix);
            }
            _ => body.push(c),
        }
    }

    let mut verbatim_options = String::from("commandchars=\\\\\\{\\}");
    if !verboptions.is_empty() {
        verbatim_options.push(',');
        verbatim_options.push_str(&verboptions);
    }

    Ok(format!(
        "\\begin{{Verbatim}}[{}]\n{}\\end{{Verbatim}}\n",
        verbatim_options, body
    ))
}

fn format_rtf(text: &str, options: &FormatterOptions) -> Result<String, HighlightError> {
    let fontface = string_option(options, "fontface", "")?;

    let mut out = String::from("{\\rtf1\\ansi\\deff0{\\fonttbl{\\f0\\fmodern\\fprq1\\fcharset0");
    if !fontface.is_empty() {
        out.push(' ');
        out.push_str(&fontface);
    }
    out.push_str(";}}{\\colortbl;}\\f0 ");

    let mut units = [0u16; 2];
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '\n' => out.push_str("\\par\n"),
            c if c.is_ascii() => out.push(c),
            c => {
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{}?", *unit as i16);
                }
            }
        }
    }

    out.push('}');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(value: Value) -> FormatterOptions {
        match value {
            Value::Object(map) => map,
            _ => FormatterOptions::new(),
        }
    }

    fn highlight(code: &str, formatter: &str, opts: Value) -> Result<String, HighlightError> {
        PlainHighlighter::new().highlight(code, "text", formatter, &options(opts))
    }

    #[test]
    fn test_html_output() {
        let out = highlight("puts \"Hi\" < 3", "html", json!({})).unwrap();
        assert_eq!(
            out,
            "<div class=\"highlight\"><pre>puts &quot;Hi&quot; &lt; 3\n</pre></div>\n"
        );
    }

    #[test]
    fn test_html_cssclass_and_nowrap() {
        let out = highlight("pass", "html", json!({"cssclass": "syntax"})).unwrap();
        assert!(out.contains("class=\"syntax\""));

        let out = highlight("pass", "htm", json!({"nowrap": true})).unwrap();
        assert_eq!(out, "pass\n");
    }

    #[test]
    fn test_invalid_option_type() {
        let err = highlight("pass", "html", json!({"cssclass": 3})).unwrap_err();
        assert!(matches!(err, HighlightError::InvalidOption { ref option, .. } if option == "cssclass"));
    }

    #[test]
    fn test_latex_output() {
        let out = highlight("f{x}\\", "latex", json!({})).unwrap();
        assert_eq!(
            out,
            "\\begin{Verbatim}[commandchars=\\\\\\{\\}]\nf\\PYZob{}x\\PYZcb{}\\PYZbs{}\n\\end{Verbatim}\n"
        );
    }

    #[test]
    fn test_rtf_output() {
        let out = highlight("a{b}\nc", "rtf", json!({})).unwrap();
        assert_eq!(
            out,
            "{\\rtf1\\ansi\\deff0{\\fonttbl{\\f0\\fmodern\\fprq1\\fcharset0;}}{\\colortbl;}\\f0 a\\{b\\}\\par\nc\\par\n}"
        );
    }

    #[test]
    fn test_rtf_escapes_non_ascii() {
        let out = highlight("é", "rtf", json!({})).unwrap();
        assert!(out.contains("\\u233?"));
    }

    #[test]
    fn test_terminal_passthrough() {
        assert_eq!(highlight("pass", "terminal", json!({})).unwrap(), "pass\n");
        assert_eq!(highlight("pass\n", "console", json!({})).unwrap(), "pass\n");
    }

    #[test]
    fn test_unknown_lexer_and_formatter() {
        let highlighter = PlainHighlighter::new();
        let empty = FormatterOptions::new();

        assert_eq!(
            highlighter.highlight("x", "ruby", "html", &empty),
            Err(HighlightError::UnknownLexer("ruby".into()))
        );
        assert_eq!(
            highlighter.highlight("x", "text", "svg", &empty),
            Err(HighlightError::UnknownFormatter("svg".into()))
        );
    }

    #[test]
    fn test_style_defs_scoped_to_selectors() {
        let highlighter = PlainHighlighter::new();
        let selectors = vec!["div.syntax pre".to_string(), "pre.syntax".to_string()];
        let defs = highlighter
            .style_defs("html", &selectors, &FormatterOptions::new())
            .unwrap();

        assert!(defs.contains("div.syntax pre .hll, pre.syntax .hll { background-color: #ffffcc }"));
        assert!(defs.lines().count() == HTML_STYLES.len());
    }

    #[test]
    fn test_style_defs_default_selector() {
        let highlighter = PlainHighlighter::new();
        let defs = highlighter
            .style_defs("html", &[], &options(json!({"cssclass": "code"})))
            .unwrap();

        assert!(defs.starts_with(".code .hll"));
    }

    #[test]
    fn test_style_defs_unsupported() {
        let highlighter = PlainHighlighter::new();
        let err = highlighter
            .style_defs("latex", &[], &FormatterOptions::new())
            .unwrap_err();

        assert_eq!(err, HighlightError::NoStyleDefs("latex".into()));
    }
}
