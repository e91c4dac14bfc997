//! Ordered, fail-soft extraction strategies over a parsed profile page.
//!
//! Each strategy reports `Found`, `Absent` or `Failed`. The runner treats a
//! failure exactly like absence and moves on, so markup drift in one place
//! never prevents a later strategy from answering.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

/// A fetched profile document, parsed once and shared by every strategy.
pub struct ProfilePage {
    document: Html,
    text: String,
}

impl ProfilePage {
    pub fn parse(html: &str) -> Self {
        let document = Html::parse_document(html);
        let text = visible_text(&document);
        ProfilePage { document, text }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// All elements matching `css`, in document order.
    pub fn select(&self, css: &str) -> Result<Vec<ElementRef<'_>>, String> {
        let selector = Selector::parse(css).map_err(|e| format!("bad selector {css:?}: {e}"))?;
        Ok(self.document.select(&selector).collect())
    }

    pub fn select_first(&self, css: &str) -> Result<Option<ElementRef<'_>>, String> {
        Ok(self.select(css)?.into_iter().next())
    }
}

const INVISIBLE: [&str; 3] = ["script", "style", "template"];

/// Concatenated text nodes of the document, minus anything inside
/// `script`, `style` or `template`.
fn visible_text(document: &Html) -> String {
    let mut text = String::new();
    for node in document.root_element().descendants() {
        let Some(chunk) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|parent| {
            parent
                .value()
                .as_element()
                .map_or(false, |e| INVISIBLE.contains(&e.name()))
        });
        if !hidden {
            text.push_str(chunk);
        }
    }
    text
}

pub fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyOutcome<T> {
    Found(T),
    Absent,
    Failed(String),
}

pub trait Strategy {
    type Output;

    fn name(&self) -> &'static str;

    fn extract(&self, page: &ProfilePage) -> StrategyOutcome<Self::Output>;
}

/// Try `strategies` in order and return the first value found.
pub fn run_strategies<T>(strategies: &[&dyn Strategy<Output = T>], page: &ProfilePage) -> Option<T> {
    for strategy in strategies {
        match strategy.extract(page) {
            StrategyOutcome::Found(value) => {
                debug!("Strategy '{}' matched", strategy.name());
                return Some(value);
            }
            StrategyOutcome::Absent => {}
            StrategyOutcome::Failed(reason) => {
                debug!("Strategy '{}' failed: {}", strategy.name(), reason);
            }
        }
    }
    None
}

/// A lazily compiled, ordered regex list.
///
/// A pattern that does not compile turns into a strategy failure rather
/// than a panic.
pub type PatternSet = Lazy<Result<Vec<Regex>, regex::Error>>;

pub fn compile_all(patterns: &[&str]) -> Result<Vec<Regex>, regex::Error> {
    patterns.iter().map(|p| Regex::new(p)).collect()
}

pub fn patterns(set: &'static PatternSet) -> Result<&'static [Regex], String> {
    match Lazy::force(set) {
        Ok(regexes) => Ok(regexes.as_slice()),
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(StrategyOutcome<u32>, &'static str);

    impl Strategy for Fixed {
        type Output = u32;

        fn name(&self) -> &'static str {
            self.1
        }

        fn extract(&self, _page: &ProfilePage) -> StrategyOutcome<u32> {
            self.0.clone()
        }
    }

    #[test]
    fn test_first_found_wins_and_failures_are_skipped() {
        let page = ProfilePage::parse("<html><body></body></html>");
        let failed = Fixed(StrategyOutcome::Failed("broken".to_string()), "failed");
        let absent = Fixed(StrategyOutcome::Absent, "absent");
        let first = Fixed(StrategyOutcome::Found(1), "first");
        let second = Fixed(StrategyOutcome::Found(2), "second");

        let strategies: [&dyn Strategy<Output = u32>; 4] = [&failed, &absent, &first, &second];
        assert_eq!(run_strategies(&strategies, &page), Some(1));

        let none: [&dyn Strategy<Output = u32>; 2] = [&failed, &absent];
        assert_eq!(run_strategies(&none, &page), None);
    }

    #[test]
    fn test_page_text_skips_script_and_style() {
        let page = ProfilePage::parse(
            "<html><head><title>T</title><script>var a = 1;</script><style>p { color: red }</style></head>\
             <body><p>Hello <b>there</b></p><script>track(2)</script><template><p>later</p></template></body></html>",
        );
        assert!(page.text().contains("Hello there"));
        assert!(!page.text().contains("var a"));
        assert!(!page.text().contains("color"));
        assert!(!page.text().contains("track"));
        assert!(!page.text().contains("later"));
        // scripts stay reachable through selectors
        assert_eq!(page.select("script").unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_selector_is_an_error() {
        let page = ProfilePage::parse("<p>x</p>");
        assert!(page.select("p[").is_err());
        assert_eq!(page.select("p").unwrap().len(), 1);
    }

    static BROKEN: PatternSet = Lazy::new(|| compile_all(&[r"(unclosed"]));

    #[test]
    fn test_bad_pattern_reports_failure() {
        assert!(patterns(&BROKEN).is_err());
    }
}
