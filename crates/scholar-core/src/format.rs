//! Layout check for generated answers.

use std::sync::LazyLock;

use regex::Regex;

/// Section headings an answer must contain, in this order.
pub const SECTIONS: [&str; 6] = [
    "Education",
    "User Query",
    "Answer",
    "Study Plan",
    "Practice Problems",
    "Citations",
];

static HEADINGS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    SECTIONS
        .iter()
        .map(|name| {
            // optional markdown heading marks or bold around the name
            Regex::new(&format!(
                r"(?mi)^\s*(?:#+\s*)?(?:\*\*)?{}(?:\*\*)?\s*:",
                regex::escape(name)
            ))
            .expect("valid heading regex")
        })
        .collect()
});

static CITATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[source:[^\]\n]+::\d+\]").expect("valid citation regex"));

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormatReport {
    pub missing_sections: Vec<&'static str>,
    pub out_of_order: bool,
    pub has_citation: bool,
}

impl FormatReport {
    #[must_use]
    pub fn is_compliant(&self, require_citation: bool) -> bool {
        self.missing_sections.is_empty()
            && !self.out_of_order
            && (self.has_citation || !require_citation)
    }
}

/// Inspect `text` for the six answer sections and at least one citation tag.
#[must_use]
pub fn check_format(text: &str) -> FormatReport {
    let mut missing_sections = Vec::new();
    let mut positions = Vec::with_capacity(SECTIONS.len());

    for (name, re) in SECTIONS.iter().zip(HEADINGS.iter()) {
        match re.find(text) {
            Some(m) => positions.push(m.start()),
            None => missing_sections.push(*name),
        }
    }

    FormatReport {
        missing_sections,
        out_of_order: positions.windows(2).any(|w| w[0] > w[1]),
        has_citation: CITATION_RE.is_match(text),
    }
}

/// Follow-up message asking the model to fix the layout problems in `report`.
#[must_use]
pub fn reminder(report: &FormatReport, require_citation: bool) -> String {
    let mut out = String::from(
        "Your previous answer did not follow the required format. \
         Rewrite it using exactly these sections in order: ",
    );
    out.push_str(&SECTIONS.join(", "));
    out.push('.');
    if !report.missing_sections.is_empty() {
        out.push_str(" Missing: ");
        out.push_str(&report.missing_sections.join(", "));
        out.push('.');
    }
    if require_citation && !report.has_citation {
        out.push_str(" Cite the course material as [source:<file_path>::<chunk_index>].");
    }
    out.push_str(" Plain text only, no JSON or metadata.");
    out
}
