//! Sequence annotation: citations, cross-references, genes and dates

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use itertools::Itertools;

const MONTHS: [&str; 12] = [
    "JAN", "FEB", "MAR", "APR", "MAY", "JUN", "JUL", "AUG", "SEP", "OCT", "NOV", "DEC",
];

/// Calendar date as used in flat file headers (`21-JUN-1999`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl Date {
    pub fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// The current UTC date
    pub fn today() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self::from_unix_days((secs / 86400) as i64)
    }

    /// Converts days since 1970-01-01 to a civil date
    /// (http://howardhinnant.github.io/date_algorithms.html)
    pub fn from_unix_days(days: i64) -> Self {
        let z = days + 719468;
        let era = (if z >= 0 { z } else { z - 146096 }) / 146097;
        let doe = z - era * 146097;
        let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146096) / 365;
        let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
        let mp = (5 * doy + 2) / 153;
        let day = doy - (153 * mp + 2) / 5 + 1;
        let month = if mp < 10 { mp + 3 } else { mp - 9 };
        let year = yoe + era * 400 + i64::from(month <= 2);
        Self::new(year as u16, month as u8, day as u8)
    }

    /// `YYYY-MM-DD`, as in GFF headers
    pub fn iso(&self) -> String {
        format!("{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }

    pub fn month_name(&self) -> &'static str {
        MONTHS[(self.month.clamp(1, 12) - 1) as usize]
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}-{}-{:04}", self.day, self.month_name(), self.year)
    }
}

/// Entry history: creation, last annotation update and last sequence update,
/// with the database release and version strings that go with them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeqDate {
    pub created: Option<Date>,
    pub modified: Option<Date>,
    pub seq_modified: Option<Date>,
    pub created_rel: Option<String>,
    pub modified_rel: Option<String>,
    pub modified_ver: Option<String>,
    pub seq_ver: Option<String>,
}

impl SeqDate {
    /// The most recent date available, used on GenBank `LOCUS` lines
    pub fn latest(&self) -> Option<Date> {
        [self.modified, self.seq_modified, self.created]
            .into_iter()
            .flatten()
            .max()
    }
}

/// Literature citation (EMBL `RN`..`RL` block, GenBank `REFERENCE`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeqRef {
    pub number: u32,
    /// Sequence positions covered, e.g. "1-1859" or "1-100, 200-300"
    pub position: String,
    pub group: String,
    pub authors: String,
    pub title: String,
    pub comment: String,
    /// Cross-reference of the citation, e.g. "PUBMED; 1907511."
    pub xref: String,
    pub location: String,
    pub loctype: String,
}

impl SeqRef {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            ..Default::default()
        }
    }

    /// Converts an EMBL author list ("Oxtoby E., Dunn M.A.") into
    /// GenBank style ("Oxtoby,E. and Dunn,M.A.")
    pub fn authors_genbank(&self) -> String {
        let authors: Vec<String> = self
            .authors
            .trim_end_matches(';')
            .split(", ")
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(|a| match a.rsplit_once(' ') {
                Some((surname, initials)) if initials.ends_with('.') => {
                    format!("{surname},{initials}")
                }
                _ => a.to_string(),
            })
            .collect();
        match authors.split_last() {
            None => String::new(),
            Some((last, [])) => last.clone(),
            Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
        }
    }

    /// Converts an EMBL journal location ("Plant Mol. Biol. 17(2):209-219(1991).")
    /// into GenBank style ("Plant Mol. Biol. 17 (2), 209-219 (1991)").
    /// Other locations are returned without the trailing period.
    pub fn location_genbank(&self) -> String {
        let loc = self.location.trim().trim_end_matches('.');
        self.convert_journal(loc).unwrap_or_else(|| loc.to_string())
    }

    fn convert_journal(&self, loc: &str) -> Option<String> {
        if loc.starts_with("Submitted") || loc.starts_with("Unpublished") {
            return None;
        }
        let rest = loc.strip_suffix(')')?;
        let (rest, year) = rest.rsplit_once('(')?;
        let (journal_vol, pages) = rest.rsplit_once(':')?;
        let (journal_vol, issue) = match journal_vol.strip_suffix(')') {
            Some(jv) => {
                let (jv, issue) = jv.rsplit_once('(')?;
                (jv, Some(issue))
            }
            None => (journal_vol, None),
        };
        let (journal, volume) = journal_vol.rsplit_once(' ')?;
        let mut out = format!("{journal} {volume}");
        if let Some(issue) = issue {
            out.push_str(&format!(" ({issue})"));
        }
        out.push_str(&format!(", {pages} ({year})"));
        Some(out)
    }

    /// Position ranges in GenBank style: "(bases 1 to 100; 200 to 300)"
    pub fn position_genbank(&self, unit: &str) -> Option<String> {
        if self.position.trim().is_empty() {
            return None;
        }
        let ranges = self
            .position
            .split(',')
            .map(|r| r.trim().replacen('-', " to ", 1))
            .join("; ");
        Some(format!("({unit} {ranges})"))
    }
}

/// Source of a cross-reference, matching the line or qualifier it comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum XrefType {
    /// EMBL / Swiss-Prot `DR` line
    #[default]
    Dr,
    /// `/db_xref` feature qualifier
    DbXref,
    /// Enzyme commission number
    Ec,
    /// Tag in a description line
    DescTag,
    /// NCBI taxonomy id
    TaxId,
    /// Citation cross-reference (`RX`)
    Rx,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeqXref {
    pub xref_type: XrefType,
    pub db: String,
    pub id: String,
    /// Up to three secondary identifiers
    pub secid: Vec<String>,
    pub range: Option<(usize, usize)>,
}

impl SeqXref {
    pub fn new(xref_type: XrefType, db: &str, id: &str) -> Self {
        Self {
            xref_type,
            db: db.to_string(),
            id: id.to_string(),
            secid: Vec::new(),
            range: None,
        }
    }

    pub fn with_secid(mut self, secid: &str) -> Self {
        if self.secid.len() < 3 {
            self.secid.push(secid.to_string());
        }
        self
    }

    /// `DR` line body: "EMBL; X56734; CAA40040.1; -; mRNA."
    pub fn dr_line(&self) -> String {
        let mut out = format!("{}; {}", self.db, self.id);
        for s in &self.secid {
            out.push_str("; ");
            out.push_str(s);
        }
        out.push('.');
        out
    }
}

/// Gene names (Swiss-Prot `GN` line)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeqGene {
    pub name: String,
    pub synonyms: Vec<String>,
    pub ordered_locus: Vec<String>,
    pub orf: Vec<String>,
}

impl SeqGene {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// New style `GN` text: "Name=X; Synonyms=a, b; ORFNames=c;"
    pub fn gn_text(&self) -> String {
        let mut parts = vec![];
        if !self.name.is_empty() {
            parts.push(format!("Name={};", self.name));
        }
        let lists = [
            ("Synonyms", &self.synonyms),
            ("OrderedLocusNames", &self.ordered_locus),
            ("ORFNames", &self.orf),
        ];
        for (tag, list) in lists {
            if !list.is_empty() {
                parts.push(format!("{}={};", tag, list.join(", ")));
            }
        }
        parts.join(" ")
    }
}
