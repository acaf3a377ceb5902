//! Document info: display fields derived from the bibliographic metadata.
//!
//! These are the values substituted for `{{ key }}` placeholders in cover
//! pages, intro pages and the colophon.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use roxmltree::Node;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_STATUS, HTML_LOGO, WORD_LOGO};
use crate::error::Result;
use crate::xml::{element_children, find_child, has_tag, text_at};

/// Display fields of a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentInfo {
    pub doctitle: String,
    /// Identifier, with the stage abbreviation appended for drafts.
    pub docnumber: String,
    /// Leading digits of the identifier.
    pub docnumeric: Option<String>,
    pub doctype: String,
    pub docyear: Option<String>,
    pub edition: Option<String>,
    pub draft: Option<String>,
    pub revdate: Option<String>,
    pub revdate_monthyear: Option<String>,
    pub draftinfo: String,
    pub stage: String,
    pub stageabbr: Option<String>,
    pub unpublished: bool,
    pub tc: Option<String>,
    pub url: Option<String>,
    pub agency: Option<String>,
    pub publisher: Option<String>,
    pub scope: Option<String>,
    pub logo_html: String,
    pub logo_word: String,
}

/// `best-practices` → `Best Practices`.
fn title_case(value: &str) -> String {
    value
        .split(['-', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars
                .next()
                .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                .unwrap_or_default()
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn stage_abbreviation(stage: &str) -> Option<&'static str> {
    match stage {
        "working-draft" => Some("wd"),
        "committee-draft" => Some("cd"),
        "draft-standard" => Some("d"),
        _ => None,
    }
}

/// `2000-01-01` → `January 2000`.
fn month_year(date: &str) -> Option<String> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%B %Y").to_string())
}

fn draft_info(draft: Option<&str>, revdate: Option<&str>) -> String {
    match (draft, revdate) {
        (Some(draft), Some(date)) => format!(" (draft {draft}, {date})"),
        (Some(draft), None) => format!(" (draft {draft})"),
        (None, _) => String::new(),
    }
}

/// Organization name of the contributor with the given role.
fn contributor(bibdata: Node<'_, '_>, role: &str) -> Option<String> {
    element_children(bibdata)
        .filter(|n| has_tag(*n, "contributor"))
        .find(|c| find_child(*c, "role").and_then(|r| r.attribute("type")) == Some(role))
        .and_then(|c| text_at(c, "organization/name"))
}

impl DocumentInfo {
    /// Derive display fields from an assembled document.
    #[must_use]
    pub fn from_xml(root: Node<'_, '_>) -> Self {
        let Some(bibdata) = find_child(root, "bibdata") else {
            return Self {
                stage: title_case(DEFAULT_STATUS),
                logo_html: HTML_LOGO.to_string(),
                logo_word: WORD_LOGO.to_string(),
                ..Self::default()
            };
        };

        let docidentifier = text_at(bibdata, "docidentifier").unwrap_or_default();
        let stage = text_at(bibdata, "status/stage").unwrap_or_else(|| DEFAULT_STATUS.to_string());
        let stageabbr = stage_abbreviation(&stage).map(String::from);
        let draft = text_at(bibdata, "version/draft");
        let revdate = text_at(bibdata, "version/revision-date");

        let docnumber = match &stageabbr {
            Some(abbr)
                if !docidentifier.is_empty() && !docidentifier.ends_with(&format!("({abbr})")) =>
            {
                format!("{docidentifier}({abbr})")
            }
            _ => docidentifier.clone(),
        };
        let docnumeric: String = docidentifier
            .chars()
            .take_while(char::is_ascii_digit)
            .collect();
        let publisher = contributor(bibdata, "publisher");

        Self {
            doctitle: text_at(bibdata, "title").unwrap_or_default(),
            docnumber,
            docnumeric: (!docnumeric.is_empty()).then_some(docnumeric),
            doctype: bibdata.attribute("type").map(title_case).unwrap_or_default(),
            docyear: text_at(bibdata, "copyright/from"),
            edition: text_at(bibdata, "edition"),
            revdate_monthyear: revdate.as_deref().and_then(month_year),
            draftinfo: draft_info(draft.as_deref(), revdate.as_deref()),
            draft,
            revdate,
            unpublished: stage != DEFAULT_STATUS,
            stage: title_case(&stage),
            stageabbr,
            tc: text_at(bibdata, "editorialgroup/committee"),
            url: text_at(bibdata, "source"),
            agency: publisher.clone(),
            publisher,
            scope: None,
            logo_html: HTML_LOGO.to_string(),
            logo_word: WORD_LOGO.to_string(),
        }
    }

    /// Derive display fields from serialized XML.
    ///
    /// # Errors
    /// Returns [`ConverterError::MalformedXml`](crate::error::ConverterError::MalformedXml)
    /// if the text is not well-formed.
    pub fn from_xml_str(xml: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(xml)?;
        Ok(Self::from_xml(doc.root_element()))
    }

    /// Set the document scope shown on the intro page.
    #[must_use]
    pub fn with_scope(mut self, scope: Option<String>) -> Self {
        self.scope = scope;
        self
    }

    /// Placeholder values. Absent fields map to an empty string.
    #[must_use]
    pub fn to_map(&self) -> BTreeMap<&'static str, String> {
        let opt = |v: &Option<String>| v.clone().unwrap_or_default();
        BTreeMap::from([
            ("doctitle", self.doctitle.clone()),
            ("docnumber", self.docnumber.clone()),
            ("docnumeric", opt(&self.docnumeric)),
            ("doctype", self.doctype.clone()),
            ("docyear", opt(&self.docyear)),
            ("edition", opt(&self.edition)),
            ("draft", opt(&self.draft)),
            ("revdate", opt(&self.revdate)),
            ("revdate_monthyear", opt(&self.revdate_monthyear)),
            ("draftinfo", self.draftinfo.clone()),
            ("stage", self.stage.clone()),
            ("stageabbr", opt(&self.stageabbr)),
            ("unpublished", self.unpublished.to_string()),
            ("tc", opt(&self.tc)),
            ("url", opt(&self.url)),
            ("agency", opt(&self.agency)),
            ("publisher", opt(&self.publisher)),
            ("scope", opt(&self.scope)),
            ("logo_html", self.logo_html.clone()),
            ("logo_word", self.logo_word.clone()),
        ])
    }
}
