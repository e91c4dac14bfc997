use crate::extractor::{element_text, run_strategies, ProfilePage, Strategy, StrategyOutcome};

pub const UNKNOWN_USERNAME: &str = "Unknown";

const MAX_USERNAME_CHARS: usize = 50;

const DISPLAY_NAME_SELECTORS: [&str; 7] = [
    r#"h1[data-testid="profile-display-name"]"#,
    ".profile-display-name",
    ".profile-name h1",
    "h1.profile-name",
    ".header-title h1",
    ".profile-header h1",
    ".profile-card h1",
];

const HEADING_STOP_WORDS: [&str; 4] = ["roblox", "profile", "error", "not found"];

/// Best-effort display name from a profile page, or `"Unknown"`.
pub fn extract_username(page: &ProfilePage) -> String {
    let strategies: [&dyn Strategy<Output = String>; 5] = [
        &PageTitle,
        &MetaDescription,
        &OpenGraphTitle,
        &DisplayNameSelectors,
        &PlainHeading,
    ];
    run_strategies(&strategies, page).unwrap_or_else(|| UNKNOWN_USERNAME.to_string())
}

fn plausible(candidate: &str) -> Option<String> {
    let candidate = candidate.trim();
    if candidate.is_empty() || candidate.chars().count() >= MAX_USERNAME_CHARS {
        return None;
    }
    Some(candidate.to_string())
}

fn found_or_absent(candidate: Option<String>) -> StrategyOutcome<String> {
    match candidate {
        Some(name) => StrategyOutcome::Found(name),
        None => StrategyOutcome::Absent,
    }
}

/// `<title>Name - Roblox</title>`
struct PageTitle;

impl Strategy for PageTitle {
    type Output = String;

    fn name(&self) -> &'static str {
        "page title"
    }

    fn extract(&self, page: &ProfilePage) -> StrategyOutcome<String> {
        let title = match page.select_first("title") {
            Ok(Some(el)) => element_text(&el),
            Ok(None) => return StrategyOutcome::Absent,
            Err(e) => return StrategyOutcome::Failed(e),
        };
        if !title.contains(" - Roblox") {
            return StrategyOutcome::Absent;
        }
        found_or_absent(plausible(&title.replace(" - Roblox", "")))
    }
}

/// `<meta name="description" content="Name is one of the millions ...">`
struct MetaDescription;

impl Strategy for MetaDescription {
    type Output = String;

    fn name(&self) -> &'static str {
        "meta description"
    }

    fn extract(&self, page: &ProfilePage) -> StrategyOutcome<String> {
        let content = match page.select_first(r#"meta[name="description"]"#) {
            Ok(Some(el)) => el.value().attr("content").unwrap_or_default().to_string(),
            Ok(None) => return StrategyOutcome::Absent,
            Err(e) => return StrategyOutcome::Failed(e),
        };
        match content.split_once(" is one of the millions") {
            Some((name, _)) => found_or_absent(plausible(name)),
            None => StrategyOutcome::Absent,
        }
    }
}

/// `<meta property="og:title" content="Name's Profile">`
struct OpenGraphTitle;

impl Strategy for OpenGraphTitle {
    type Output = String;

    fn name(&self) -> &'static str {
        "og:title"
    }

    fn extract(&self, page: &ProfilePage) -> StrategyOutcome<String> {
        let content = match page.select_first(r#"meta[property="og:title"]"#) {
            Ok(Some(el)) => el.value().attr("content").unwrap_or_default().to_string(),
            Ok(None) => return StrategyOutcome::Absent,
            Err(e) => return StrategyOutcome::Failed(e),
        };
        if !content.contains("'s Profile") {
            return StrategyOutcome::Absent;
        }
        found_or_absent(plausible(&content.replace("'s Profile", "")))
    }
}

struct DisplayNameSelectors;

impl Strategy for DisplayNameSelectors {
    type Output = String;

    fn name(&self) -> &'static str {
        "display name selectors"
    }

    fn extract(&self, page: &ProfilePage) -> StrategyOutcome<String> {
        for css in DISPLAY_NAME_SELECTORS {
            // a selector that fails to parse is skipped like one that matches nothing
            if let Ok(Some(el)) = page.select_first(css) {
                if let Some(name) = plausible(&element_text(&el)) {
                    return StrategyOutcome::Found(name);
                }
            }
        }
        StrategyOutcome::Absent
    }
}

/// Any short `h1` that is not site chrome.
struct PlainHeading;

impl Strategy for PlainHeading {
    type Output = String;

    fn name(&self) -> &'static str {
        "plain heading"
    }

    fn extract(&self, page: &ProfilePage) -> StrategyOutcome<String> {
        let headings = match page.select("h1") {
            Ok(headings) => headings,
            Err(e) => return StrategyOutcome::Failed(e),
        };
        let name = headings.iter().find_map(|h1| {
            let text = element_text(h1);
            let lowered = text.to_lowercase();
            if HEADING_STOP_WORDS.iter().any(|word| lowered.contains(word)) {
                return None;
            }
            plausible(&text)
        });
        found_or_absent(name)
    }
}
