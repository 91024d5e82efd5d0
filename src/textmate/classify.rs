//! Scope classification tables.
//!
//! Classification is data, not code: each table is an ordered sequence of
//! (predicate, scope stem) rules evaluated top to bottom, first match wins.
//! Stems get the language key appended at emission time, so the tables stay
//! independent of any particular grammar.

/// Scope stem assigned to preprocessor-like spans. Spans carrying this stem
/// with a begin marker but no end marker are emitted as to-end-of-line
/// matches rather than begin/end regions.
pub const PREPROCESSOR_STEM: &str = "meta.preprocessor";

/// Fallback stem for keyword categories no rule claims.
const KEYWORD_FALLBACK: &str = "keyword.other";

/// Rules over a lowercased keyword category label.
const KEYWORD_RULES: &[(fn(&str) -> bool, &str)] = &[
    (|label| label.contains("constant"), "constant.language"),
    (
        |label| builtin_like(label) && (label.contains("function") || label == "builtins"),
        "support.function.builtin",
    ),
    (
        |label| builtin_like(label) && label.contains("type"),
        "support.type",
    ),
    (
        |label| builtin_like(label) && label.contains("class"),
        "support.class.builtin",
    ),
    (builtin_like, "keyword.language"),
    (
        |label| keyword_like(label) && label.contains("user"),
        "keyword.other",
    ),
    (
        |label| keyword_like(label) && label.contains("operator"),
        "keyword.operator",
    ),
    (keyword_like, "keyword.control"),
];

fn builtin_like(label: &str) -> bool {
    label.contains("builtin") || label.contains("predefined")
}

fn keyword_like(label: &str) -> bool {
    label.contains("keyword") || label.contains("control")
}

/// Choose the scope stem for a keyword category label.
pub fn keyword_scope(category: &str) -> &'static str {
    let label = category.to_lowercase();
    KEYWORD_RULES
        .iter()
        .find(|(applies, _)| applies(&label))
        .map(|(_, stem)| *stem)
        .unwrap_or(KEYWORD_FALLBACK)
}

/// Classification result for a generic span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanScope {
    /// A fixed stem from the rule table.
    Stem(&'static str),
    /// No rule claimed the span; its scope is derived from its own name
    /// (`meta.<name>.<language>`).
    Meta,
}

/// Rules over the lowercased span name and rule label. The original format
/// consults the rule label only for function, type and preprocessor spans.
const SPAN_RULES: &[(fn(&str, &str) -> bool, &str)] = &[
    (
        |name, rule| name.contains("function") || rule.contains("function"),
        "entity.name.function",
    ),
    (
        |name, rule| name.contains("class") || rule.contains("type") || name.contains("struct"),
        "entity.name.type",
    ),
    (
        |name, rule| {
            name.contains("preprocessor")
                || rule.contains("preprocessor")
                || name.contains("directive")
        },
        PREPROCESSOR_STEM,
    ),
    (
        |name, _| name.contains("variable") || name.contains("identifier"),
        "variable.other",
    ),
    (|name, _| name.contains("namespace"), "entity.name.namespace"),
];

/// Choose the scope for a generic span from its name and rule label.
pub fn span_scope(name: &str, rule: &str) -> SpanScope {
    let name = name.to_lowercase();
    let rule = rule.to_lowercase();
    SPAN_RULES
        .iter()
        .find(|(applies, _)| applies(&name, &rule))
        .map(|(_, stem)| SpanScope::Stem(stem))
        .unwrap_or(SpanScope::Meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Constants", "constant.language")]
    #[case("LanguageConstants", "constant.language")]
    #[case("Builtins", "support.function.builtin")]
    #[case("BuiltinFunctions", "support.function.builtin")]
    #[case("PredefinedTypes", "support.type")]
    #[case("BuiltinClasses", "support.class.builtin")]
    #[case("Predefined", "keyword.language")]
    #[case("UserKeywords", "keyword.other")]
    #[case("OperatorKeywords", "keyword.operator")]
    #[case("Keywords", "keyword.control")]
    #[case("ControlFlow", "keyword.control")]
    #[case("SomethingElse", "keyword.other")]
    #[case("default", "keyword.other")]
    fn test_keyword_scope(#[case] category: &str, #[case] expected: &str) {
        assert_eq!(keyword_scope(category), expected);
    }

    #[test]
    fn test_constant_wins_over_keyword() {
        // "constant" is tried before the keyword/control rules.
        assert_eq!(keyword_scope("ConstantKeywords"), "constant.language");
    }

    #[rstest]
    #[case("FunctionDef", "", "entity.name.function")]
    #[case("Call", "Function", "entity.name.function")]
    #[case("ClassName", "", "entity.name.type")]
    #[case("StructBody", "", "entity.name.type")]
    #[case("Decl", "TypeRule", "entity.name.type")]
    #[case("Preprocessor", "", "meta.preprocessor")]
    #[case("Include", "Preprocessor", "meta.preprocessor")]
    #[case("CompilerDirective", "", "meta.preprocessor")]
    #[case("VariableRef", "", "variable.other")]
    #[case("Identifier", "", "variable.other")]
    #[case("NamespaceDecl", "", "entity.name.namespace")]
    fn test_span_scope_stems(#[case] name: &str, #[case] rule: &str, #[case] expected: &'static str) {
        assert_eq!(span_scope(name, rule), SpanScope::Stem(expected));
    }

    #[test]
    fn test_unclaimed_span_falls_back_to_meta() {
        assert_eq!(span_scope("Interpolation", "Embedded"), SpanScope::Meta);
    }

    #[test]
    fn test_function_outranks_type() {
        // first match wins on the ordered table
        assert_eq!(
            span_scope("FunctionType", ""),
            SpanScope::Stem("entity.name.function")
        );
    }
}
