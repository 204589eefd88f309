use std::fmt::Display;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use super::template::{Extraction, RecordKind, Template, TemplateSet};

/// Broker-specific note layouts. They all produce the same records, but from
/// different templates.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    Clear,
    Easynvest,
    Inter,
}

impl Layout {
    /// Used when no layout marker is present on the page.
    pub const FALLBACK: Layout = Layout::Inter;

    /// In the order they are checked.
    pub const MARKED: [Layout; 2] = [Layout::Clear, Layout::Easynvest];

    pub fn marker(&self) -> Option<&'static str> {
        match self {
            Layout::Clear => Some("CLEAR CORRETORA - GRUPO XP"),
            Layout::Easynvest => Some("Easynvest - Título Corretora de Valores SA"),
            Layout::Inter => None,
        }
    }

    /// Picks the layout by the broker marker present in the text.
    pub fn select(text: &str) -> Layout {
        let layout = Layout::MARKED
            .into_iter()
            .find(|l| l.marker().map(|m| text.contains(m)).unwrap_or(false))
            .unwrap_or(Layout::FALLBACK);
        tracing::debug!("Layout::select: {layout}");
        layout
    }

    pub fn templates(&self) -> &'static TemplateSet {
        match self {
            Layout::Clear => &CLEAR_TEMPLATES,
            Layout::Easynvest => &EASYNVEST_TEMPLATES,
            Layout::Inter => &INTER_TEMPLATES,
        }
    }

    pub fn extract(&self, text: &str) -> Extraction {
        self.templates().extract(text)
    }
}

impl Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layout::Clear => write!(f, "clear"),
            Layout::Easynvest => write!(f, "easynvest"),
            Layout::Inter => write!(f, "inter"),
        }
    }
}

// All layouts are SINACOR-generated notes, so apart from the market column
// of the trade table, the blocks read the same.

const BUSINESS_SUMMARY_PATTERN: &str =
    r"(?P<values>(?:[0-9.]+,[0-9]{2}\s){8})Resumo dos Negócios";

// Value, then its label on the next line, then an optional D/C line.
const FEE_SUMMARY_PATTERN: &str =
    r"(?P<value>[0-9.]+,[0-9]{2})\n(?P<label>[A-Za-z0-9 íóçõã.,/]+\n)(?P<dc>[CD]\n)?";

const NOTE_NUMBER_PATTERN: &str = r"Nr\. nota\n(?P<number>[0-9]+)";

const TRADE_DATE_PATTERN: &str = r"Data pregão\n(?P<date>[0-9/]+)";

const CURRENCY_STRIP_PATTERN: &str = r" R\$[0-9.]+,[0-9]{2}";

// Everything after the market column of a trade row.
const TRADE_ROW_PATTERN: &str = concat!(
    r"(?P<side>[CV])\s(?P<market>VISTA|FRACIONARIO)\s",
    r"(?P<title>[A-Z0-9 ]+)(?P<annotation>\n#\n|\n)",
    r"(?P<quantity>[0-9]+)\n",
    r"(?P<price>[0-9.]+,[0-9]{2})\n",
    r"(?P<value>[0-9.]+,[0-9]{2})\n",
    r"(?P<dc>[CD])\n",
);

fn trade_pattern(market_prefix: &str) -> String {
    format!(r"(?:{market_prefix})\n{TRADE_ROW_PATTERN}")
}

fn sinacor_templates(market_prefix: &str) -> Result<TemplateSet, regex::Error> {
    Ok(TemplateSet {
        trade: Template::new(RecordKind::Trade, &trade_pattern(market_prefix))?,
        business_summary: Template::new(
            RecordKind::BusinessSummary,
            BUSINESS_SUMMARY_PATTERN,
        )?,
        fee_summary: Template::new(RecordKind::FeeSummary, FEE_SUMMARY_PATTERN)?,
        note_number: Template::new(RecordKind::NoteNumber, NOTE_NUMBER_PATTERN)?,
        trade_date: Template::new(RecordKind::TradeDate, TRADE_DATE_PATTERN)?,
        currency_strip: Regex::new(CURRENCY_STRIP_PATTERN)?,
    })
}

lazy_static! {
    static ref CLEAR_TEMPLATES: TemplateSet = sinacor_templates("1-BOVESPA").unwrap();
    static ref EASYNVEST_TEMPLATES: TemplateSet =
        sinacor_templates("1-BOVESPA|B3 RV LISTADO").unwrap();
    static ref INTER_TEMPLATES: TemplateSet = sinacor_templates("B3 RV LISTADO").unwrap();
}
