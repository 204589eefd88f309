//! Template matching over the text of a note page.
//!
//! A template is a regex spanning several lines of the page, with named
//! groups for the fields of one record. Matching is done independently per
//! record kind, so a record kind with no matches just yields an empty list.

use std::borrow::Cow;
use std::fmt::Display;

use regex::Regex;

#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
pub enum RecordKind {
    Trade,
    BusinessSummary,
    FeeSummary,
    NoteNumber,
    TradeDate,
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RecordKind::Trade => "trade",
            RecordKind::BusinessSummary => "business summary",
            RecordKind::FeeSummary => "fee summary",
            RecordKind::NoteNumber => "note number",
            RecordKind::TradeDate => "trade date",
        };
        write!(f, "{s}")
    }
}

/// The text captured by one template match, by group name.
/// Groups which did not participate in the match read as "".
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct CaptureTuple {
    groups: Vec<(String, String)>,
}

impl CaptureTuple {
    fn from_captures(re: &Regex, m: &regex::Captures) -> CaptureTuple {
        let groups = re
            .capture_names()
            .flatten()
            .map(|name| {
                let val = m.name(name).map(|v| v.as_str()).unwrap_or("");
                (name.to_string(), val.to_string())
            })
            .collect();
        CaptureTuple { groups }
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> CaptureTuple {
        CaptureTuple {
            groups: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn opt_group(&self, name: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn group(&self, name: &str) -> &str {
        self.opt_group(name).unwrap_or("")
    }
}

pub struct Template {
    kind: RecordKind,
    re: Regex,
}

impl Template {
    pub fn new(kind: RecordKind, pattern: &str) -> Result<Template, regex::Error> {
        Ok(Template {
            kind,
            re: Regex::new(pattern)?,
        })
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// All non-overlapping matches, in order of appearance.
    pub fn find_all(&self, text: &str) -> Vec<CaptureTuple> {
        let matches: Vec<CaptureTuple> = self
            .re
            .captures_iter(text)
            .map(|m| CaptureTuple::from_captures(&self.re, &m))
            .collect();
        tracing::trace!("Template {} matched {} times", self.kind, matches.len());
        matches
    }
}

/// The full set of templates for one note layout.
pub struct TemplateSet {
    pub trade: Template,
    pub business_summary: Template,
    pub fee_summary: Template,
    pub note_number: Template,
    pub trade_date: Template,
    /// Amounts like " R$1.234,56", which would otherwise be picked up as
    /// fee values.
    pub currency_strip: Regex,
}

/// Raw template matches for one page, per record kind.
#[derive(PartialEq, Eq, Clone, Debug, Default)]
pub struct Extraction {
    pub trades: Vec<CaptureTuple>,
    pub business_summary: Vec<CaptureTuple>,
    pub fee_summary: Vec<CaptureTuple>,
    pub note_number: Vec<CaptureTuple>,
    pub trade_date: Vec<CaptureTuple>,
}

impl Extraction {
    pub fn matches(&self, kind: RecordKind) -> &Vec<CaptureTuple> {
        match kind {
            RecordKind::Trade => &self.trades,
            RecordKind::BusinessSummary => &self.business_summary,
            RecordKind::FeeSummary => &self.fee_summary,
            RecordKind::NoteNumber => &self.note_number,
            RecordKind::TradeDate => &self.trade_date,
        }
    }
}

impl TemplateSet {
    /// In extraction order.
    pub fn templates(&self) -> [&Template; 5] {
        [
            &self.note_number,
            &self.trade_date,
            &self.trade,
            &self.business_summary,
            &self.fee_summary,
        ]
    }

    pub fn strip_currency<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.currency_strip.replace_all(text, "")
    }

    pub fn extract(&self, text: &str) -> Extraction {
        let mut ex = Extraction::default();
        for template in self.templates() {
            match template.kind() {
                RecordKind::Trade => ex.trades = template.find_all(text),
                RecordKind::BusinessSummary => {
                    ex.business_summary = template.find_all(text)
                }
                RecordKind::FeeSummary => {
                    let clean_text = self.strip_currency(text);
                    ex.fee_summary = template.find_all(&clean_text);
                }
                RecordKind::NoteNumber => ex.note_number = template.find_all(text),
                RecordKind::TradeDate => ex.trade_date = template.find_all(text),
            }
        }
        ex
    }
}
