//! The closed registry of template variables.
//!
//! One declarative table defines every legal variable name together with
//! its kind. The table generates the [`Variable`] enum that types
//! [`PromptContext`](super::PromptContext) and backs the parse-time checks
//! ([`is_valid_variable`], [`get_enum_values`]), so the two cannot drift.

/// The kind of value a variable holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// Free text.
    Text,
    /// A decimal number (integer or fractional).
    Number,
    /// One of a fixed set of literal members.
    Enum(&'static [&'static str]),
}

impl VariableKind {
    /// Check that `value` is acceptable for this kind.
    ///
    /// Returns a short reason on rejection.
    pub fn check(self, value: &str) -> Result<(), String> {
        match self {
            VariableKind::Text => Ok(()),
            VariableKind::Number => match value.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => Ok(()),
                _ => Err(format!("'{}' is not a number", value)),
            },
            VariableKind::Enum(members) => {
                if members.contains(&value) {
                    Ok(())
                } else {
                    Err(format!(
                        "'{}' is not one of: {}",
                        value,
                        members.join(", ")
                    ))
                }
            }
        }
    }

    /// Short label used in listings.
    pub fn label(self) -> &'static str {
        match self {
            VariableKind::Text => "text",
            VariableKind::Number => "number",
            VariableKind::Enum(_) => "enum",
        }
    }
}

pub const CLAIM_TYPES: &[&str] = &["causal", "associative", "comparative", "descriptive"];
pub const CLAIM_DIRECTIONS: &[&str] = &["harms", "helps", "neutral", "mixed"];
pub const RESEARCH_DEPTHS: &[&str] = &["quick", "standard", "deep"];
pub const EVIDENCE_LEVELS: &[&str] = &[
    "meta-analysis",
    "systematic-review",
    "rct",
    "cohort",
    "case-control",
    "expert-opinion",
];
pub const FLAGS: &[&str] = &["true", "false"];
pub const TONES: &[&str] = &[
    "neutral",
    "authoritative",
    "conversational",
    "academic",
    "empathetic",
];
pub const CITATION_STYLES: &[&str] = &["apa", "mla", "chicago", "vancouver", "inline"];
pub const PERSPECTIVES: &[&str] = &["first-person", "second-person", "third-person"];

macro_rules! variables {
    ($($(#[$doc:meta])* $variant:ident => $name:literal : $kind:expr),+ $(,)?) => {
        /// A legal template variable.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Variable {
            $($(#[$doc])* $variant,)+
        }

        impl Variable {
            /// Every variable, in registry order.
            pub const ALL: &'static [Variable] = &[$(Variable::$variant,)+];

            /// The dotted name used in templates and context files.
            pub fn name(self) -> &'static str {
                match self {
                    $(Variable::$variant => $name,)+
                }
            }

            /// The kind of value this variable holds.
            pub fn kind(self) -> VariableKind {
                match self {
                    $(Variable::$variant => $kind,)+
                }
            }
        }
    };
}

variables! {
    // Topic identity and claim
    /// Stable topic identifier (snake_case).
    TopicId => "topic.id": VariableKind::Text,
    /// The food, substance or practice under study.
    TopicEntity => "topic.entity": VariableKind::Text,
    /// The claim being researched.
    TopicClaim => "topic.claim": VariableKind::Text,
    TopicClaimType => "topic.claimType": VariableKind::Enum(CLAIM_TYPES),
    TopicClaimDirection => "topic.claimDirection": VariableKind::Enum(CLAIM_DIRECTIONS),
    TopicCategory => "topic.category": VariableKind::Text,
    TopicOutcome => "topic.outcome": VariableKind::Text,
    TopicPopulation => "topic.population": VariableKind::Text,
    TopicTitle => "topic.title": VariableKind::Text,
    TopicKeywords => "topic.keywords": VariableKind::Text,

    // Run metadata
    ResearchRunId => "research.runId": VariableKind::Text,
    ResearchDate => "research.date": VariableKind::Text,
    ResearchModel => "research.model": VariableKind::Text,
    ResearchDepth => "research.depth": VariableKind::Enum(RESEARCH_DEPTHS),
    ResearchTemplateName => "research.templateName": VariableKind::Text,
    ResearchTemplateVersion => "research.templateVersion": VariableKind::Text,
    ResearchMaxSources => "research.maxSources": VariableKind::Number,
    ResearchTimeframe => "research.timeframe": VariableKind::Text,
    ResearchLanguage => "research.language": VariableKind::Text,

    // Quality requirements
    QualityMinSources => "quality.minSources": VariableKind::Number,
    QualityMinPeerReviewed => "quality.minPeerReviewed": VariableKind::Number,
    QualityMaxSourceAgeYears => "quality.maxSourceAgeYears": VariableKind::Number,
    QualityMinEvidenceLevel => "quality.minEvidenceLevel": VariableKind::Enum(EVIDENCE_LEVELS),
    QualityRequireCitations => "quality.requireCitations": VariableKind::Enum(FLAGS),
    QualityIncludeCounterEvidence => "quality.includeCounterEvidence": VariableKind::Enum(FLAGS),
    QualityConfidenceThreshold => "quality.confidenceThreshold": VariableKind::Number,

    // Content standards
    StandardsTone => "standards.tone": VariableKind::Enum(TONES),
    StandardsReadingLevel => "standards.readingLevel": VariableKind::Text,
    StandardsCitationStyle => "standards.citationStyle": VariableKind::Enum(CITATION_STYLES),
    StandardsBrandName => "standards.brandName": VariableKind::Text,
    StandardsBrandVoice => "standards.brandVoice": VariableKind::Text,
    StandardsAudience => "standards.audience": VariableKind::Text,
    StandardsPerspective => "standards.perspective": VariableKind::Enum(PERSPECTIVES),
    StandardsProhibitedTerms => "standards.prohibitedTerms": VariableKind::Text,
    StandardsDisclaimer => "standards.disclaimer": VariableKind::Text,

    // SEO guidelines
    SeoPrimaryKeyword => "seo.primaryKeyword": VariableKind::Text,
    SeoSecondaryKeywords => "seo.secondaryKeywords": VariableKind::Text,
    SeoWordCountMin => "seo.wordCountMin": VariableKind::Number,
    SeoWordCountMax => "seo.wordCountMax": VariableKind::Number,
    SeoTitleLengthMin => "seo.titleLengthMin": VariableKind::Number,
    SeoTitleLengthMax => "seo.titleLengthMax": VariableKind::Number,
    SeoMetaDescriptionMin => "seo.metaDescriptionMin": VariableKind::Number,
    SeoMetaDescriptionMax => "seo.metaDescriptionMax": VariableKind::Number,
    SeoHeadingCountMin => "seo.headingCountMin": VariableKind::Number,
    SeoHeadingCountMax => "seo.headingCountMax": VariableKind::Number,
    SeoKeywordDensityMin => "seo.keywordDensityMin": VariableKind::Number,
    SeoKeywordDensityMax => "seo.keywordDensityMax": VariableKind::Number,
}

impl Variable {
    /// Look up a variable by its dotted name.
    pub fn from_name(name: &str) -> Option<Variable> {
        Variable::ALL.iter().copied().find(|v| v.name() == name)
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether `name` is a legal template variable.
pub fn is_valid_variable(name: &str) -> bool {
    Variable::from_name(name).is_some()
}

/// All legal variable names, sorted.
pub fn get_valid_variables() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Variable::ALL.iter().map(|v| v.name()).collect();
    names.sort_unstable();
    names
}

/// The legal literal set for an enum-typed variable.
///
/// Returns `None` for unknown names and for non-enum variables.
pub fn get_enum_values(name: &str) -> Option<&'static [&'static str]> {
    match Variable::from_name(name)?.kind() {
        VariableKind::Enum(members) => Some(members),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique() {
        let names: HashSet<&str> = Variable::ALL.iter().map(|v| v.name()).collect();
        assert_eq!(names.len(), Variable::ALL.len());
    }

    #[test]
    fn test_registry_size() {
        assert_eq!(Variable::ALL.len(), 47);
    }

    #[test]
    fn test_from_name_round_trips() {
        for var in Variable::ALL {
            assert_eq!(Variable::from_name(var.name()), Some(*var));
        }
        assert_eq!(Variable::from_name("bogus.var"), None);
    }

    #[test]
    fn test_is_valid_variable() {
        assert!(is_valid_variable("topic.entity"));
        assert!(is_valid_variable("research.runId"));
        assert!(is_valid_variable("seo.wordCountMin"));
        assert!(!is_valid_variable("bogus.var"));
        assert!(!is_valid_variable("topic"));
        assert!(!is_valid_variable(""));
    }

    #[test]
    fn test_get_valid_variables_is_sorted() {
        let names = get_valid_variables();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(names.contains(&"standards.tone"));
    }

    #[test]
    fn test_get_enum_values() {
        assert_eq!(
            get_enum_values("research.depth"),
            Some(&["quick", "standard", "deep"][..])
        );
        assert_eq!(get_enum_values("topic.entity"), None);
        assert_eq!(get_enum_values("bogus.var"), None);
    }

    #[test]
    fn test_kind_check_number() {
        assert!(VariableKind::Number.check("1500").is_ok());
        assert!(VariableKind::Number.check("0.02").is_ok());
        assert!(VariableKind::Number.check(" 7 ").is_ok());
        assert!(VariableKind::Number.check("many").is_err());
        assert!(VariableKind::Number.check("NaN").is_err());
    }

    #[test]
    fn test_kind_check_enum() {
        let kind = VariableKind::Enum(TONES);
        assert!(kind.check("academic").is_ok());
        let err = kind.check("snarky").unwrap_err();
        assert!(err.contains("snarky"));
        assert!(err.contains("academic"));
    }

    #[test]
    fn test_display_uses_dotted_name() {
        assert_eq!(Variable::SeoWordCountMin.to_string(), "seo.wordCountMin");
    }
}
