//! Metadata mapper.
//!
//! Builds the `bibdata` fragment from resolved front matter. Child order is
//! fixed and does not depend on the order attributes were given in.

use crate::config::{ResolvedFrontMatter, TITLE_LANGUAGE};
use crate::xml::XmlBuilder;

/// Build the `bibdata` element.
#[must_use]
pub fn build_bibdata(front: &ResolvedFrontMatter) -> String {
    let mut xml = XmlBuilder::new();
    xml.open("bibdata", &[("type", front.doctype.value.as_str())])
        .newline();

    write_title(&mut xml, front);
    if let Some(url) = &front.url {
        xml.element("source", &[], url).newline();
    }
    xml.element("docidentifier", &[], &front.docidentifier)
        .newline();
    write_version(&mut xml, front);
    write_contributor(&mut xml, "author", &front.organization);
    write_contributor(&mut xml, "publisher", &front.organization);
    xml.element("language", &[], &front.language.value)
        .newline()
        .element("script", &[], &front.script.value)
        .newline();
    xml.open("status", &[])
        .element("stage", &[], &front.status.value)
        .close("status")
        .newline();
    write_copyright(&mut xml, front);
    write_committee(&mut xml, front);
    write_ics(&mut xml, front);

    xml.close("bibdata");
    xml.finish()
}

fn write_title(xml: &mut XmlBuilder, front: &ResolvedFrontMatter) {
    xml.element(
        "title",
        &[("language", TITLE_LANGUAGE), ("format", "plain")],
        &front.title,
    )
    .newline();
}

fn write_version(xml: &mut XmlBuilder, front: &ResolvedFrontMatter) {
    if let Some(edition) = &front.edition {
        xml.element("edition", &[], edition).newline();
    }
    if front.revdate.is_none() && front.draft.is_none() {
        return;
    }
    xml.open("version", &[]);
    if let Some(revdate) = &front.revdate {
        xml.element("revision-date", &[], revdate);
    }
    if let Some(draft) = &front.draft {
        xml.element("draft", &[], draft);
    }
    xml.close("version").newline();
}

fn write_contributor(xml: &mut XmlBuilder, role: &str, organization: &str) {
    xml.open("contributor", &[])
        .empty("role", &[("type", role)])
        .open("organization", &[])
        .element("name", &[], organization)
        .close("organization")
        .close("contributor")
        .newline();
}

fn write_copyright(xml: &mut XmlBuilder, front: &ResolvedFrontMatter) {
    xml.open("copyright", &[])
        .element("from", &[], &front.copyright_year.value)
        .open("owner", &[])
        .open("organization", &[])
        .element("name", &[], &front.organization)
        .close("organization")
        .close("owner")
        .close("copyright")
        .newline();
}

fn write_committee(xml: &mut XmlBuilder, front: &ResolvedFrontMatter) {
    let Some(committee) = &front.committee else {
        return;
    };
    let attrs: Vec<(&str, &str)> = committee
        .kind
        .as_deref()
        .map(|kind| vec![("type", kind)])
        .unwrap_or_default();
    xml.open("editorialgroup", &[])
        .element("committee", &attrs, &committee.name)
        .close("editorialgroup")
        .newline();
}

fn write_ics(xml: &mut XmlBuilder, front: &ResolvedFrontMatter) {
    for code in &front.ics {
        xml.open("ics", &[])
            .element("code", &[], code)
            .close("ics")
            .newline();
    }
}
