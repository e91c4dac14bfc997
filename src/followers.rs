use log::warn;
use once_cell::sync::Lazy;

use crate::extractor::{
    compile_all, element_text, patterns, run_strategies, PatternSet, ProfilePage, Strategy,
    StrategyOutcome,
};
use crate::number::parse_count;

/// Upper bound for the last-resort heuristic.
pub const MAX_PLAUSIBLE_FOLLOWERS: u64 = 100_000_000;

// JSON-ish keys in inline scripts
static SCRIPT_PATTERNS: PatternSet = Lazy::new(|| {
    compile_all(&[
        r#""[Ff]ollowersCount":\s*(\d+)"#,
        r#""[Ff]ollowers":\s*(\d+)"#,
        r#""[Ff]ollowerCount":\s*(\d+)"#,
        r#"followersCount["']:\s*(\d+)"#,
        r#"followers["']:\s*(\d+)"#,
        r#"FollowersCount["']:\s*(\d+)"#,
    ])
});

const COUNT_SELECTORS: [&str; 10] = [
    r#"[data-testid="followers-count"]"#,
    r#"[data-testid="follower-count"]"#,
    ".followers-count",
    ".follower-count",
    ".profile-stats-followers",
    ".followers .stat-value",
    ".stat-followers .stat-value",
    ".profile-stat-followers",
    r#"[class*="follower"] .text-label"#,
    r#"[class*="follower"] .font-header-2"#,
];

static PHRASE_PATTERNS: PatternSet = Lazy::new(|| {
    compile_all(&[
        r"(\d+(?:,\d+)*)\s*[Ff]ollowers?",
        r"[Ff]ollowers?:\s*(\d+(?:,\d+)*)",
        r"(\d+(?:,\d+)*)\s*people\s+follow",
        r"(\d+(?:,\d+)*)\s*[Ff]ollowing\s+you",
        r"(\d+(?:\.\d*)?[KkMmBb]?)\s*[Ff]ollowers?",
    ])
});

static CONTEXT_PATTERNS: PatternSet = Lazy::new(|| {
    compile_all(&[
        r"(?i:followers?|following)[^\d]*(\d+(?:,\d+)*|\d+(?:\.\d+)?[kmb]?)",
        r"(\d+(?:,\d+)*|\d+(?:\.\d+)?[kmb]?)[^\d]*(?i:followers?|following)",
    ])
});

static LOOSE_NUMBER_PATTERNS: PatternSet = Lazy::new(|| {
    compile_all(&[
        r"\b(\d{1,3}(?:,\d{3})+)\b",
        r"\b(\d+(?:\.\d+)?[KkMmBb])\b",
    ])
});

/// Best-effort follower count from a profile page.
pub fn extract_followers(page: &ProfilePage) -> Option<u64> {
    let strategies: [&dyn Strategy<Output = u64>; 5] = [
        &ScriptData,
        &CountSelectors,
        &TextPatterns { name: "follower phrases", set: &PHRASE_PATTERNS },
        &TextPatterns { name: "follower context", set: &CONTEXT_PATTERNS },
        &LargestPlausibleNumber,
    ];
    run_strategies(&strategies, page)
}

/// Follower counts embedded in inline script state.
struct ScriptData;

impl Strategy for ScriptData {
    type Output = u64;

    fn name(&self) -> &'static str {
        "script data"
    }

    fn extract(&self, page: &ProfilePage) -> StrategyOutcome<u64> {
        let regexes = match patterns(&SCRIPT_PATTERNS) {
            Ok(regexes) => regexes,
            Err(e) => return StrategyOutcome::Failed(e),
        };
        let scripts = match page.select("script") {
            Ok(scripts) => scripts,
            Err(e) => return StrategyOutcome::Failed(e),
        };

        for script in &scripts {
            let source = script.text().collect::<String>();
            if source.is_empty() {
                continue;
            }
            for re in regexes {
                if let Some(caps) = re.captures(&source) {
                    return StrategyOutcome::Found(parse_count(&caps[1]));
                }
            }
        }
        StrategyOutcome::Absent
    }
}

/// Dedicated follower-count elements.
struct CountSelectors;

impl Strategy for CountSelectors {
    type Output = u64;

    fn name(&self) -> &'static str {
        "count selectors"
    }

    fn extract(&self, page: &ProfilePage) -> StrategyOutcome<u64> {
        for css in COUNT_SELECTORS {
            let elements = match page.select(css) {
                Ok(elements) => elements,
                Err(e) => return StrategyOutcome::Failed(e),
            };
            for el in &elements {
                let text = element_text(el);
                if text.chars().any(|c| c.is_ascii_digit()) {
                    return StrategyOutcome::Found(parse_count(&text));
                }
            }
        }
        StrategyOutcome::Absent
    }
}

/// First capture of the first matching pattern over the visible page text.
struct TextPatterns {
    name: &'static str,
    set: &'static PatternSet,
}

impl Strategy for TextPatterns {
    type Output = u64;

    fn name(&self) -> &'static str {
        self.name
    }

    fn extract(&self, page: &ProfilePage) -> StrategyOutcome<u64> {
        let regexes = match patterns(self.set) {
            Ok(regexes) => regexes,
            Err(e) => return StrategyOutcome::Failed(e),
        };
        for re in regexes {
            if let Some(caps) = re.captures(page.text()) {
                return StrategyOutcome::Found(parse_count(&caps[1]));
            }
        }
        StrategyOutcome::Absent
    }
}

/// Largest comma-grouped or k/m/b-suffixed number on a page that looks like
/// a Roblox profile.
///
/// The largest plausible number is assumed to be the follower count. This
/// can misfire on pages carrying bigger unrelated numbers.
struct LargestPlausibleNumber;

impl Strategy for LargestPlausibleNumber {
    type Output = u64;

    fn name(&self) -> &'static str {
        "largest plausible number"
    }

    fn extract(&self, page: &ProfilePage) -> StrategyOutcome<u64> {
        let lowered = page.text().to_lowercase();
        if !(lowered.contains("profile") && lowered.contains("roblox")) {
            return StrategyOutcome::Absent;
        }
        let regexes = match patterns(&LOOSE_NUMBER_PATTERNS) {
            Ok(regexes) => regexes,
            Err(e) => return StrategyOutcome::Failed(e),
        };

        let mut candidates: Vec<u64> = regexes
            .iter()
            .flat_map(|re| re.captures_iter(page.text()))
            .map(|caps| parse_count(&caps[1]))
            .filter(|count| *count <= MAX_PLAUSIBLE_FOLLOWERS)
            .collect();
        candidates.sort_unstable_by(|a, b| b.cmp(a));

        match candidates.first() {
            Some(&count) => {
                warn!("Using heuristic follower count detection");
                StrategyOutcome::Found(count)
            }
            None => StrategyOutcome::Absent,
        }
    }
}
