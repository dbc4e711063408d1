use model::TokenKind;
use regex_lite::Regex;
use std::sync::LazyLock;

/// What the scanner does with a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rule {
    Emit(TokenKind),
    Spaces,
    Tabs,
    Newline,
}

pub(crate) struct Pattern {
    pub(crate) name: &'static str,
    pub(crate) rule: Rule,
    pub(crate) regex: Regex,
}

// Order matters: the first pattern matching at the cursor wins, so keywords
// come before NAME and the two-character comparisons before EQ.
const TABLE: &[(&str, Rule, &str)] = &[
    ("IF", Rule::Emit(TokenKind::If), r"if\b"),
    ("VAL", Rule::Emit(TokenKind::Val), r"val\b"),
    ("COND", Rule::Emit(TokenKind::Cond), r"==|>=|<=|>|<|!="),
    ("EQ", Rule::Emit(TokenKind::Eq), r"="),
    ("LBRACE", Rule::Emit(TokenKind::LBrace), r"\{"),
    ("RBRACE", Rule::Emit(TokenKind::RBrace), r"\}"),
    ("LPARENS", Rule::Emit(TokenKind::LParens), r"\("),
    ("RPARENS", Rule::Emit(TokenKind::RParens), r"\)"),
    ("NUMBER", Rule::Emit(TokenKind::Number), r"[0-9]+"),
    ("NAME", Rule::Emit(TokenKind::Name), r"[a-z]+"),
    ("WHITESPACE", Rule::Spaces, r"[ \r]+"),
    ("WHITESPACE_TAB", Rule::Tabs, r"\t+"),
    ("NEWLINE", Rule::Newline, r"\n"),
];

static PATTERNS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    TABLE
        .iter()
        .map(|&(name, rule, source)| Pattern {
            name,
            rule,
            // Anchored so a pattern only ever matches at the cursor
            regex: Regex::new(&format!("^(?:{})", source))
                .expect("built-in token pattern must compile"),
        })
        .collect()
});

pub(crate) fn patterns() -> &'static [Pattern] {
    &PATTERNS
}
