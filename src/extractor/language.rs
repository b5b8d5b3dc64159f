//! Language classification.
//!
//! Explicit tags (```` ```py ````, `class="language-rust"`, `<<SQL`) are
//! normalized through an alias table and always win. Untagged content is
//! scored against a table of per-language rules; each rule is a pure function
//! of the content that contributes its weight when it matches. The highest
//! total wins, ties go to the language listed first in [`PRECEDENCE`].

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

/// Language reported when nothing matched.
pub const UNKNOWN: &str = "unknown";

/// Tie-break order for equal non-zero scores. Earlier wins.
pub const PRECEDENCE: &[&str] = &[
    "python",
    "typescript",
    "javascript",
    "java",
    "csharp",
    "go",
    "rust",
    "cpp",
    "c",
    "kotlin",
    "swift",
    "scala",
    "php",
    "ruby",
    "perl",
    "lua",
    "r",
    "matlab",
    "sql",
    "html",
    "svg",
    "xml",
    "css",
    "json",
    "yaml",
    "toml",
    "dockerfile",
    "makefile",
    "bash",
    "powershell",
];

/// Signals needed before a heuristic match counts as strong.
pub const STRONG_SIGNALS: usize = 3;

/// Maximum number of runner-up languages reported.
const MAX_ALTERNATES: usize = 3;

const ALIASES: &[(&str, &str)] = &[
    ("py", "python"),
    ("py3", "python"),
    ("python3", "python"),
    ("ipython", "python"),
    ("js", "javascript"),
    ("jsx", "javascript"),
    ("mjs", "javascript"),
    ("cjs", "javascript"),
    ("node", "javascript"),
    ("ecmascript", "javascript"),
    ("ts", "typescript"),
    ("tsx", "typescript"),
    ("sh", "bash"),
    ("shell", "bash"),
    ("zsh", "bash"),
    ("console", "bash"),
    ("shell-session", "bash"),
    ("shellscript", "bash"),
    ("ps", "powershell"),
    ("ps1", "powershell"),
    ("pwsh", "powershell"),
    ("c++", "cpp"),
    ("cc", "cpp"),
    ("cxx", "cpp"),
    ("hpp", "cpp"),
    ("h", "c"),
    ("c#", "csharp"),
    ("cs", "csharp"),
    ("dotnet", "csharp"),
    ("golang", "go"),
    ("rs", "rust"),
    ("rb", "ruby"),
    ("pl", "perl"),
    ("kt", "kotlin"),
    ("kts", "kotlin"),
    ("yml", "yaml"),
    ("htm", "html"),
    ("xhtml", "html"),
    ("xsl", "xml"),
    ("docker", "dockerfile"),
    ("make", "makefile"),
    ("mk", "makefile"),
    ("psql", "sql"),
    ("mysql", "sql"),
    ("postgresql", "sql"),
    ("postgres", "sql"),
    ("sqlite", "sql"),
    ("plsql", "sql"),
    ("jsonc", "json"),
    ("json5", "json"),
    ("rscript", "r"),
    ("octave", "matlab"),
];

/// One heuristic: a pure check over the content plus the score it adds.
pub struct Rule {
    check: Check,
    weight: u32,
}

enum Check {
    Pattern(Regex),
    Predicate(fn(&str) -> bool),
}

impl Rule {
    fn pattern(pattern: &str, weight: u32) -> Self {
        Self {
            check: Check::Pattern(Regex::new(pattern).expect("valid language rule")),
            weight,
        }
    }

    fn predicate(check: fn(&str) -> bool, weight: u32) -> Self {
        Self {
            check: Check::Predicate(check),
            weight,
        }
    }

    /// Score contribution for `content`.
    pub fn score(&self, content: &str) -> u32 {
        let matched = match &self.check {
            Check::Pattern(re) => re.is_match(content),
            Check::Predicate(check) => check(content),
        };
        if matched {
            self.weight
        } else {
            0
        }
    }
}

/// Rules for one language.
pub struct LanguageRules {
    pub name: &'static str,
    rules: Vec<Rule>,
}

impl LanguageRules {
    fn new(name: &'static str, rules: Vec<Rule>) -> Self {
        Self { name, rules }
    }

    /// Total score and number of matching rules.
    pub fn evaluate(&self, content: &str) -> (u32, usize) {
        self.rules.iter().fold((0, 0), |(score, signals), rule| {
            match rule.score(content) {
                0 => (score, signals),
                w => (score + w, signals + 1),
            }
        })
    }
}

/// Result of classifying one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Canonical lowercase language, or [`UNKNOWN`]
    pub language: String,
    /// An explicit tag was present
    pub explicit: bool,
    /// The language is one the classifier knows
    pub recognized: bool,
    /// Heuristic score of `language`
    pub score: u32,
    /// Heuristic signals supporting `language`
    pub signals: usize,
    /// Other languages with non-zero scores, best first
    pub alternates: Vec<String>,
}

/// Classifies code content by explicit tag or syntax heuristics.
pub struct LanguageClassifier {
    table: Vec<LanguageRules>,
}

impl Default for LanguageClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageClassifier {
    /// Build the classifier with the built-in rule table, in [`PRECEDENCE`] order.
    pub fn new() -> Self {
        Self {
            table: builtin_rules(),
        }
    }

    /// The process-wide classifier.
    pub fn shared() -> &'static LanguageClassifier {
        static SHARED: Lazy<LanguageClassifier> = Lazy::new(LanguageClassifier::new);
        &SHARED
    }

    /// Names of all languages with heuristics, in precedence order.
    pub fn languages(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.table.iter().map(|l| l.name)
    }

    pub fn is_known(&self, language: &str) -> bool {
        self.table.iter().any(|l| l.name == language)
    }

    /// Classify `content`, honoring `explicit_tag` when present.
    pub fn classify(&self, content: &str, explicit_tag: Option<&str>) -> Classification {
        let scores = self.score_all(content);

        if let Some(tag) = explicit_tag.and_then(normalize_tag) {
            let (score, signals) = scores
                .iter()
                .find(|(name, _, _)| *name == tag)
                .map(|&(_, score, signals)| (score, signals))
                .unwrap_or((0, 0));
            let recognized = self.is_known(&tag);
            let alternates = ranked(&scores)
                .into_iter()
                .map(|(name, _, _)| name)
                .filter(|name| *name != tag)
                .take(MAX_ALTERNATES)
                .map(str::to_string)
                .collect();
            return Classification {
                language: tag,
                explicit: true,
                recognized,
                score,
                signals,
                alternates,
            };
        }

        let mut ranking = ranked(&scores).into_iter();
        match ranking.next() {
            Some((best, score, signals)) => {
                trace!(language = best, score, signals, "Detected language");
                Classification {
                    language: best.to_string(),
                    explicit: false,
                    recognized: true,
                    score,
                    signals,
                    alternates: ranking
                        .take(MAX_ALTERNATES)
                        .map(|(name, _, _)| name.to_string())
                        .collect(),
                }
            }
            None => Classification {
                language: UNKNOWN.to_string(),
                explicit: false,
                recognized: false,
                score: 0,
                signals: 0,
                alternates: Vec::new(),
            },
        }
    }

    /// Non-zero scores in precedence order.
    fn score_all(&self, content: &str) -> Vec<(&'static str, u32, usize)> {
        self.table
            .iter()
            .filter_map(|lang| match lang.evaluate(content) {
                (0, _) => None,
                (score, signals) => Some((lang.name, score, signals)),
            })
            .collect()
    }
}

/// Languages ordered by score, ties broken by precedence.
///
/// `scores` is already in precedence order and the sort is stable.
fn ranked(scores: &[(&'static str, u32, usize)]) -> Vec<(&'static str, u32, usize)> {
    let mut order = scores.to_vec();
    order.sort_by(|a, b| b.1.cmp(&a.1));
    order
}

/// Normalize an explicit language tag to its canonical name.
///
/// Returns `None` when nothing usable remains after cleaning.
pub fn normalize_tag(tag: &str) -> Option<String> {
    let lowered: String = tag
        .trim()
        .trim_start_matches('.')
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '#' | '.' | '-'))
        .collect();
    let lowered = lowered
        .strip_prefix("language-")
        .or_else(|| lowered.strip_prefix("lang-"))
        .unwrap_or(&lowered)
        .to_string();
    if lowered.is_empty() {
        return None;
    }
    let canonical = ALIASES
        .iter()
        .find(|(alias, _)| *alias == lowered)
        .map(|(_, name)| name.to_string())
        .unwrap_or(lowered);
    Some(canonical)
}

fn parses_as_json(content: &str) -> bool {
    let trimmed = content.trim();
    (trimmed.starts_with('{') || trimmed.starts_with('['))
        && serde_json::from_str::<serde_json::Value>(trimmed).is_ok()
}

fn mostly_key_value_lines(content: &str) -> bool {
    static KEY_VALUE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^\s*(?:-\s+)?[\w.-]+:(?:\s+\S.*)?$").expect("valid regex"));
    let lines: Vec<_> = content
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty() && !l.trim_start().starts_with('#'))
        .collect();
    lines.len() >= 2
        && !content.contains(';')
        && !content.contains('{')
        && lines.iter().all(|l| KEY_VALUE.is_match(l) || l.trim_start().starts_with("- "))
}

fn builtin_rules() -> Vec<LanguageRules> {
    let p = Rule::pattern;
    vec![
        LanguageRules::new(
            "python",
            vec![
                p(r"(?m)^#!.*\bpython[0-9.]*\b", 3),
                p(r"(?m)^\s*def\s+\w+\s*\(.*\)\s*(?:->\s*[^:]+)?:\s*$", 1),
                p(r"(?m)^\s*from\s+[\w.]+\s+import\s+\w", 1),
                p(r"(?m)^\s*import\s+[\w.]+(?:\s+as\s+\w+)?\s*$", 1),
                p(r"(?m)^\s*class\s+\w+(?:\(.*\))?:\s*$", 1),
                p(r"(?m)^\s*(?:if|elif|for|while|with|try|except|else)\b[^{};]*:\s*$", 1),
                p(r"\bself\.\w+", 1),
                p(r"\bprint\(", 1),
                p(r"\b(?:None|True|False)\b", 1),
                p(r#"if\s+__name__\s*==\s*['"]__main__['"]"#, 3),
            ],
        ),
        LanguageRules::new(
            "typescript",
            vec![
                p(r"\binterface\s+\w+(?:<[^>]*>)?\s*(?:extends\s+[\w<>, ]+)?\{", 1),
                p(r"(?m)^\s*(?:export\s+)?type\s+\w+(?:<[^>]*>)?\s*=", 1),
                p(r"[\w)]\s*:\s*(?:string|number|boolean|any|void|unknown|never)\b", 2),
                p(r"\b(?:public|private|protected|readonly)\s+\w+\s*[:?]", 1),
                p(r"\bas\s+(?:const|string|number|any)\b", 1),
                p(r"(?m)^\s*import\s+type\s", 2),
                p(r"<\w+(?:\[\])?>\s*\(", 1),
            ],
        ),
        LanguageRules::new(
            "javascript",
            vec![
                p(r"\bconsole\.(?:log|error|warn|info)\(", 1),
                p(r"\bfunction\s*\w*\s*\([^)]*\)\s*\{", 1),
                p(r"\b(?:const|let|var)\s+\w+\s*=", 1),
                p(r"=>", 1),
                p(r#"\brequire\(\s*['"]"#, 1),
                p(r#"(?m)^\s*import\s.+\sfrom\s+['"]"#, 1),
                p(r"\b(?:document|window)\.\w+", 1),
                p(r"\bmodule\.exports\b|(?m)^\s*export\s+(?:default|const|function|class)\b", 1),
                p(r"===|!==", 1),
            ],
        ),
        LanguageRules::new(
            "java",
            vec![
                p(r"\bpublic\s+(?:static\s+)?(?:final\s+)?(?:abstract\s+)?class\s+\w+", 1),
                p(r"\bpublic\s+static\s+void\s+main\s*\(\s*String", 3),
                p(r"\bSystem\.out\.print", 2),
                p(r"(?m)^\s*import\s+java\.", 2),
                p(r"(?m)^\s*package\s+[\w.]+;", 1),
                p(r"@Override\b", 1),
                p(r"\b(?:private|protected|public)\s+(?:static\s+)?(?:final\s+)?[A-Z]\w*(?:<[^>]+>)?\s+\w+\s*[;=(]", 1),
                p(r"\bnew\s+[A-Z]\w*(?:<[^>]*>)?\([^)]*\);", 1),
            ],
        ),
        LanguageRules::new(
            "csharp",
            vec![
                p(r"(?m)^\s*using\s+System(?:\.\w+)*;", 3),
                p(r"(?m)^\s*namespace\s+[\w.]+", 1),
                p(r"\bConsole\.Write(?:Line)?\(", 2),
                p(r"\{\s*get;\s*(?:private\s+)?set;\s*\}", 2),
                p(r"\bvar\s+\w+\s*=\s*new\b", 1),
                p(r"\basync\s+Task\b", 1),
                p(r"\bstring\[\]\s+args\b", 1),
            ],
        ),
        LanguageRules::new(
            "go",
            vec![
                p(r"(?m)^\s*package\s+\w+\s*$", 1),
                p(r"\bfunc\s+(?:\(\w+\s+\*?\w+\)\s*)?\w+\s*\(", 1),
                p(r":=", 1),
                p(r"\bfmt\.\w+\(", 2),
                p(r"(?m)^\s*import\s*\(", 1),
                p(r"\berr\s*!=\s*nil\b", 2),
                p(r"\bgo\s+func\b|\bchan\s+\w+|\bdefer\s+\w+", 1),
            ],
        ),
        LanguageRules::new(
            "rust",
            vec![
                p(r"\bfn\s+\w+\s*(?:<[^>]*>)?\s*\(", 1),
                p(r"\blet\s+mut\s+\w+", 2),
                p(r"(?m)^\s*use\s+\w+(?:::\w+|::\{)", 1),
                p(r"\bimpl(?:<[^>]*>)?\s+\w+", 1),
                p(r"\b(?:println|format|vec|panic|assert_eq|assert)!\(", 2),
                p(r"\bpub\s+(?:fn|struct|enum|mod|trait|crate)\b", 1),
                p(r"&mut\s|&self\b", 1),
                p(r"#\[derive\(", 2),
                p(r"\bmatch\s+[\w.&*]+\s*\{", 1),
            ],
        ),
        LanguageRules::new(
            "cpp",
            vec![
                p(r"(?m)^\s*#include\s*<\w+(?:\.h(?:pp)?)?>", 1),
                p(r"\bstd::\w+", 2),
                p(r"\b(?:cout|cerr)\s*<<|\bcin\s*>>", 2),
                p(r"\btemplate\s*<", 1),
                p(r"\bnullptr\b", 1),
                p(r"\bauto\s+\w+\s*=", 1),
                p(r"\w+::\w+\s*\(", 1),
            ],
        ),
        LanguageRules::new(
            "c",
            vec![
                p(r"(?m)^\s*#include\s*<(?:stdio|stdlib|string|math|unistd|stdint)\.h>", 2),
                p(r"\bprintf\s*\(", 1),
                p(r"\b(?:malloc|calloc|free)\s*\(", 1),
                p(r"\bint\s+main\s*\(", 1),
                p(r"\bstruct\s+\w+\s*\{", 1),
                p(r"\w->\w+", 1),
            ],
        ),
        LanguageRules::new(
            "kotlin",
            vec![
                p(r"\bfun\s+\w+\s*\(", 2),
                p(r"\bval\s+\w+\s*(?::\s*\w+)?\s*=", 1),
                p(r"\bdata\s+class\b", 2),
                p(r"\bwhen\s*(?:\([^)]*\))?\s*\{", 1),
                p(r"\bprintln\(", 1),
            ],
        ),
        LanguageRules::new(
            "swift",
            vec![
                p(r"\bfunc\s+\w+\s*\([^)]*\)\s*(?:->\s*\w+\??)?\s*\{", 1),
                p(r"(?m)^\s*import\s+(?:UIKit|Foundation|SwiftUI)\b", 3),
                p(r"\b(?:var|let)\s+\w+\s*:\s*[A-Z]\w*\??", 1),
                p(r"\bguard\s+let\b|\bif\s+let\b", 2),
                p(r"@(?:State|Published|IBOutlet|objc)\b", 2),
            ],
        ),
        LanguageRules::new(
            "scala",
            vec![
                p(r"\bobject\s+\w+", 1),
                p(r"\bdef\s+\w+(?:\[[^\]]*\])?\([^)]*\)\s*(?::\s*[\w\[\]]+)?\s*=", 2),
                p(r"\bcase\s+class\b", 2),
                p(r"\bextends\s+App\b", 2),
                p(r"(?m)^\s*import\s+scala\.", 3),
            ],
        ),
        LanguageRules::new(
            "php",
            vec![
                p(r"<\?php", 3),
                p(r"\becho\s+\$\w+", 1),
                p(r"\$\w+->\w+", 1),
                p(r"\bfunction\s+\w+\s*\(\s*\$", 2),
                p(r"(?m)^\s*namespace\s+[\w\\]+;", 1),
                p(r"\barray\s*\(", 1),
            ],
        ),
        LanguageRules::new(
            "ruby",
            vec![
                p(r"(?m)^\s*def\s+\w+[?!]?(?:\([^)]*\))?\s*$", 1),
                p(r"(?m)^\s*end\s*$", 1),
                p(r"(?m)^\s*puts\s", 1),
                p(r#"(?m)^\s*require(?:_relative)?\s+['"]"#, 1),
                p(r"\battr_(?:accessor|reader|writer)\b", 2),
                p(r"\bdo\s*\|\w+(?:,\s*\w+)*\|", 2),
                p(r"(?m)^\s*module\s+[A-Z]\w*\s*$", 1),
            ],
        ),
        LanguageRules::new(
            "perl",
            vec![
                p(r"(?m)^#!.*\bperl\b", 3),
                p(r"\bmy\s+[$@%]\w+", 2),
                p(r"(?m)^\s*use\s+(?:strict|warnings);", 2),
                p(r"\bsub\s+\w+\s*\{", 1),
                p(r"=~\s*[ms]?/", 1),
            ],
        ),
        LanguageRules::new(
            "lua",
            vec![
                p(r"\blocal\s+\w+\s*=", 2),
                p(r"(?m)^\s*(?:local\s+)?function\s+[\w.:]+\s*\([^)]*\)\s*$", 1),
                p(r"\bthen\b", 1),
                p(r"~=", 1),
                p(r#"\brequire\s*\(?\s*["']"#, 1),
                p(r"(?m)^\s*end\s*$", 1),
            ],
        ),
        LanguageRules::new(
            "r",
            vec![
                p(r"\w\s*<-\s*", 1),
                p(r"\blibrary\(\w+\)", 2),
                p(r"\bdata\.frame\(", 2),
                p(r"\bc\(\s*[\w'\x22]", 1),
                p(r"\bggplot\(", 2),
            ],
        ),
        LanguageRules::new(
            "matlab",
            vec![
                p(r"(?m)^\s*function\s+(?:\[[^\]]*\]|\w+)\s*=\s*\w+\s*\(", 3),
                p(r"(?m)^\s*%[ %{]", 1),
                p(r"(?m)^\s*disp\(", 1),
                p(r"\s\.(?:\*|\^|/)\s", 1),
                p(r"\bend(?:function|if|for|while)\b", 2),
            ],
        ),
        LanguageRules::new(
            "sql",
            vec![
                p(r"(?is)\bSELECT\b.+\bFROM\b", 2),
                p(r"(?i)\bINSERT\s+INTO\b", 2),
                p(r"(?i)\bUPDATE\s+\w+\s+SET\b", 2),
                p(r"(?i)\bDELETE\s+FROM\b", 2),
                p(r"(?i)\bCREATE\s+(?:TABLE|INDEX|VIEW|DATABASE)\b", 2),
                p(r"(?i)\bWHERE\b", 1),
                p(r"(?i)\b(?:INNER|LEFT|RIGHT|OUTER)?\s*JOIN\b", 1),
                p(r"(?i)\b(?:GROUP|ORDER)\s+BY\b", 1),
            ],
        ),
        LanguageRules::new(
            "html",
            vec![
                p(r"(?i)<!DOCTYPE\s+html", 3),
                p(r"(?i)<html\b", 2),
                p(r"(?i)<(?:div|span|p|a|body|head|ul|ol|li|table|form|input|button|h[1-6])\b[^>]*>", 1),
                p(r"</\w+>", 1),
                p(r#"\bclass="[^"]*""#, 1),
                p(r"(?i)<(?:meta|link)\b", 1),
            ],
        ),
        LanguageRules::new(
            "svg",
            vec![
                p(r"(?i)<svg\b", 3),
                p(r#"xmlns="http://www\.w3\.org/2000/svg""#, 2),
                p(r"\bviewBox=", 2),
                p(r"<(?:path|circle|rect|polygon|polyline|ellipse|line)\b[^>]*/?>", 1),
            ],
        ),
        LanguageRules::new(
            "xml",
            vec![
                p(r"<\?xml\b", 3),
                p(r"<(?:\w+:)?\w+[^>]*/>", 1),
                p(r"</(?:\w+:)?\w+>", 1),
                p(r"\bxmlns(?::\w+)?=", 2),
                p(r"<!\[CDATA\[", 2),
            ],
        ),
        LanguageRules::new(
            "css",
            vec![
                p(r"(?m)^\s*[.#]?[\w-]+(?:\s*[,>+~]?\s*[.#:]?[\w-]+)*\s*\{", 1),
                p(r"(?m)^\s*[\w-]+\s*:\s*[^;{}]+;\s*$", 1),
                p(r"@(?:media|import|keyframes|font-face)\b", 2),
                p(r"\b\d+(?:px|em|rem|vh|vw)\b", 1),
                p(r"#[0-9a-fA-F]{3,6}\b", 1),
                p(r"!important", 1),
            ],
        ),
        LanguageRules::new(
            "json",
            vec![
                Rule::predicate(parses_as_json, 3),
                p(r#""[\w\s.-]+"\s*:\s*"#, 1),
            ],
        ),
        LanguageRules::new(
            "yaml",
            vec![
                Rule::predicate(mostly_key_value_lines, 2),
                p(r"(?m)^---\s*$", 1),
                p(r"(?m)^\s*-\s+[\w\x22']", 1),
                p(r"(?m)^\s*[\w-]+:\s*$", 1),
            ],
        ),
        LanguageRules::new(
            "toml",
            vec![
                p(r"(?m)^\s*\[[\w.-]+\]\s*$", 2),
                p(r#"(?m)^\s*[\w-]+\s*=\s*(?:"|\d|true\b|false\b|\[|\{)"#, 1),
                p(r"(?m)^\s*\[\[[\w.-]+\]\]\s*$", 2),
            ],
        ),
        LanguageRules::new(
            "dockerfile",
            vec![
                p(r"(?m)^\s*FROM\s+[\w./-]+(?::[\w.-]+)?(?:\s+AS\s+\w+)?\s*$", 3),
                p(r"(?m)^\s*RUN\s+\S", 1),
                p(r"(?m)^\s*(?:COPY|ADD)\s+\S+\s+\S+", 1),
                p(r"(?m)^\s*(?:CMD|ENTRYPOINT)\s+\[", 1),
                p(r"(?m)^\s*(?:WORKDIR|EXPOSE|ENV|ARG|LABEL|USER|VOLUME)\s+\S", 1),
            ],
        ),
        LanguageRules::new(
            "makefile",
            vec![
                p(r"(?m)^\.PHONY\s*:", 3),
                p(r"(?m)^[\w./-]+\s*:(?:\s+[\w./%-]+)*\s*$", 1),
                p(r"(?m)^\t\S", 1),
                p(r"\$\([\w@<^ ]+\)", 1),
                p(r"(?m)^\w+\s*[:?+]?=", 1),
            ],
        ),
        LanguageRules::new(
            "bash",
            vec![
                p(r"(?m)^#!\s*/(?:usr/)?bin/(?:env\s+)?(?:ba|z)?sh\b", 3),
                p(r"(?m)^\s*(?:\$\s+)?(?:sudo\s+)?(?:apt(?:-get)?|yum|brew|pip3?|npm|npx|yarn|cargo|git|docker|kubectl|curl|wget|cd|ls|mkdir|rm|cp|mv|chmod|echo|export|source|cat|grep|make|python3?)\s", 1),
                p(r"\$\{\w+\}|\$[A-Z_]{2,}\b", 1),
                p(r"(?m)^\s*(?:fi|done|esac)\s*$", 2),
                p(r"\|\s*(?:grep|awk|sed|xargs|sort|uniq|head|tail|wc)\b", 1),
                p(r"\s&&\s", 1),
                p(r"(?m)^\s*export\s+\w+=", 1),
                p(r"\[\[?\s+[^\]]+\s+\]\]?;?\s*then\b", 2),
            ],
        ),
        LanguageRules::new(
            "powershell",
            vec![
                p(r"\b(?:Get|Set|New|Remove|Write|Invoke|Start|Stop|Import|Test|Add|Out)-[A-Z][A-Za-z]+", 2),
                p(r"(?m)^\s*\$\w+\s*=", 1),
                p(r"\s-(?:eq|ne|gt|lt|ge|le|like|match)\s", 1),
                p(r"(?i)\bparam\s*\(", 1),
                p(r"\$env:\w+|\$PSVersionTable", 2),
                p(r"\|\s*(?:Where|Select|ForEach)-Object\b", 2),
            ],
        ),
    ]
}
