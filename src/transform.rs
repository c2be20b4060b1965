//! Text substitutions that turn a repository README into a docs page.
//!
//! Everything here is pure. [`render_document`] applies the steps in a
//! fixed order; the individual steps are public so `pmirror render` and the
//! tests can exercise them alone.

use regex::{NoExpand, Regex};
use std::sync::LazyLock;

use crate::config::{Config, Fixup};
use crate::models::ItemId;
use crate::source::join_url;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<([^>]+)>").expect("Invalid regex"));

/// Run the full substitution pipeline over one item's markdown.
///
/// Asset links must already be rewritten by the caller.
pub fn render_document(text: &str, item: &ItemId, config: &Config) -> String {
    let render = &config.render;

    let mut out = strip_html(text);
    out = rewrite_relative_links(&out, &config.source.raw_base_url, item);
    out = fix_parent_links(&out, &render.item_link_prefix);
    out = drop_empty_links(&out);
    out = strip_backslashes(&out);
    for keyword in &render.demote_headings {
        out = demote_heading(&out, keyword);
    }
    out = inject_front_matter(&out, &render.number_tag, &render.title_tag);
    out = inject_generated_notice(&out, item, config);
    apply_fixups(&out, item, &render.fixups)
}

/// Remove every `<...>` tag; the target site expects plain markdown.
pub fn strip_html(text: &str) -> String {
    HTML_TAG.replace_all(text, "").into_owned()
}

/// `](./X)` becomes `](<raw_base>/<item>/X)`.
pub fn rewrite_relative_links(text: &str, raw_base_url: &str, item: &ItemId) -> String {
    let absolute = join_url(raw_base_url, item.as_str());
    text.replace("](./", &format!("]({}/", absolute))
}

/// Sibling links `](../CIP-...` point at pages in the same docs directory.
pub fn fix_parent_links(text: &str, item_link_prefix: &str) -> String {
    if item_link_prefix.is_empty() {
        return text.to_string();
    }
    text.replace(
        &format!("](../{}", item_link_prefix),
        &format!("](./{}", item_link_prefix),
    )
}

/// Placeholder links with no target (`[CIP-YET-TO-COME]()`) keep only their text.
pub fn drop_empty_links(text: &str) -> String {
    text.replace("]()", "]")
}

pub fn strip_backslashes(text: &str) -> String {
    text.replace('\\', "")
}

/// Turn a level-1 `# <keyword>` heading into `## <keyword>`.
///
/// Only headings starting with exactly one `#` and the whole keyword are
/// touched. The keyword must end on a word boundary, so `Specification`
/// leaves `# Specifications` at level one.
pub fn demote_heading(text: &str, keyword: &str) -> String {
    let pattern = format!(r"(?m)^#[ \t]+{}\b", regex::escape(keyword));
    match Regex::new(&pattern) {
        Ok(re) => re
            .replace_all(text, NoExpand(&format!("## {}", keyword)))
            .into_owned(),
        Err(_) => text.to_string(),
    }
}

/// Value after the first `Key: ` occurrence, up to the end of that line.
///
/// The key is not anchored to the line start, so list-style headers
/// (`* CIP: 49`) resolve too.
pub fn doc_tag<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    let prefix = format!("{}: ", key);
    let start = text.find(&prefix)? + prefix.len();
    let rest = &text[start..];
    let value = rest.split('\n').next().unwrap_or_default();
    Some(value.trim_end_matches('\r'))
}

/// Prepend Docusaurus front matter with a `sidebar_label` of `(<number>) <title>`.
///
/// A leading `---` is dropped so the document's own header block continues
/// the injected one.
pub fn inject_front_matter(text: &str, number_tag: &str, title_tag: &str) -> String {
    let body = text.strip_prefix("---").unwrap_or(text);
    let number = doc_tag(body, number_tag).unwrap_or_default();
    let title = doc_tag(body, title_tag).unwrap_or_default();
    format!("--- \nsidebar_label: ({}) {}{}", number, title, body)
}

/// Append the "generated automatically" section with status and origin.
pub fn inject_generated_notice(text: &str, item: &ItemId, config: &Config) -> String {
    let render = &config.render;
    let kind = doc_tag(text, &render.type_tag).unwrap_or_default();
    let status = doc_tag(text, &render.status_tag).unwrap_or_default();
    let created = doc_tag(text, &render.created_tag).unwrap_or_default();
    let origin = join_url(
        &config.source.web_base_url,
        &format!("{}/{}", item, config.source.document_name),
    );

    format!(
        "{text}\n## {label} Information  \nThis [{kind}]({format_link}) {item} created on **{created}** has the status: [{status}]({workflow_link}).  \nThis page was generated automatically from: [{repo}]({origin}).",
        label = render.label,
        format_link = render.format_link,
        workflow_link = render.workflow_link,
        repo = config.source.repo_name,
    )
}

/// Apply literal replacements, skipping fixups scoped to other items.
pub fn apply_fixups(text: &str, item: &ItemId, fixups: &[Fixup]) -> String {
    fixups
        .iter()
        .filter(|f| !f.find.is_empty())
        .filter(|f| f.item.as_deref().map_or(true, |scope| scope == item.as_str()))
        .fold(text.to_string(), |acc, f| acc.replace(&f.find, &f.replace))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "https://raw.githubusercontent.com/cardano-foundation/CIPs/master";

    fn item(id: &str) -> ItemId {
        ItemId::new(id)
    }

    #[test]
    fn strips_html_tags() {
        assert_eq!(
            strip_html("<p align=\"center\">Hello <b>world</b></p>"),
            "Hello world"
        );
    }

    #[test]
    fn rewrites_relative_links_to_absolute() {
        let out = rewrite_relative_links("See [Byron](./Byron.md).", RAW, &item("CIP-0005"));
        assert_eq!(
            out,
            format!("See [Byron]({}/CIP-0005/Byron.md).", RAW)
        );
    }

    #[test]
    fn relative_link_rewrite_ignores_parent_links() {
        let text = "[a](../CIP-0001) [b](https://x.org)";
        assert_eq!(rewrite_relative_links(text, RAW, &item("CIP-0005")), text);
    }

    #[test]
    fn fixes_parent_links() {
        assert_eq!(
            fix_parent_links("[CIP-1](../CIP-0001/README.md)", "CIP-"),
            "[CIP-1](./CIP-0001/README.md)"
        );
        assert_eq!(fix_parent_links("[x](../other)", "CIP-"), "[x](../other)");
    }

    #[test]
    fn drops_empty_links_and_backslashes() {
        assert_eq!(drop_empty_links("[CIP-YET-TO-COME]() and [b]()"), "[CIP-YET-TO-COME] and [b]");
        assert_eq!(strip_backslashes(r#"say \"hi\""#), r#"say "hi""#);
    }

    #[test]
    fn demotes_level_one_keyword_heading() {
        let text = "# Abstract\nbody\n## Abstract\n### Abstract\n# Motivation: why\n";
        let out = demote_heading(&demote_heading(text, "Abstract"), "Motivation");
        assert_eq!(
            out,
            "## Abstract\nbody\n## Abstract\n### Abstract\n## Motivation: why\n"
        );
    }

    #[test]
    fn demote_requires_whole_keyword() {
        let text = "# Specifications overview\n# Rationale\n";
        assert_eq!(demote_heading(text, "Specification"), text);
        assert_eq!(
            demote_heading(text, "Rationale"),
            "# Specifications overview\n## Rationale\n"
        );
    }

    #[test]
    fn doc_tag_is_verbatim() {
        let text = "---\nCIP: 30\nTitle: \"Cardano dApp-Wallet Web Bridge\"\nStatus: Active\r\n---";
        assert_eq!(doc_tag(text, "CIP"), Some("30"));
        assert_eq!(doc_tag(text, "Title"), Some("\"Cardano dApp-Wallet Web Bridge\""));
        assert_eq!(doc_tag(text, "Status"), Some("Active"));
        assert_eq!(doc_tag(text, "Created"), None);
    }

    #[test]
    fn doc_tag_reads_list_style_headers() {
        let text = "---\n* CIP: 49\n* Title: ECDSA\n* Status: Proposed\n---";
        assert_eq!(doc_tag(text, "CIP"), Some("49"));
        assert_eq!(doc_tag(text, "Status"), Some("Proposed"));
        assert!(inject_front_matter(text, "CIP", "Title").contains("sidebar_label: (49) ECDSA\n"));
    }

    #[test]
    fn front_matter_continues_existing_header() {
        let text = "---\nCIP: 1\nTitle: CIP process\n---\n## Abstract";
        assert_eq!(
            inject_front_matter(text, "CIP", "Title"),
            "--- \nsidebar_label: (1) CIP process\nCIP: 1\nTitle: CIP process\n---\n## Abstract"
        );
    }

    #[test]
    fn notice_names_status_type_and_origin() {
        let config = Config::minimal();
        let text = "Type: Process\nStatus: Active\nCreated: 2016-06-15";
        let out = inject_generated_notice(text, &item("CIP-0001"), &config);
        assert!(out.starts_with(text));
        assert!(out.contains("\n## CIP Information  \n"));
        assert!(out.contains(
            "This [Process](CIP-0001#cip-format-and-structure) CIP-0001 created on **2016-06-15** has the status: [Active](CIP-0001#cip-workflow)."
        ));
        assert!(out.ends_with(
            "[cardano-foundation/CIPs](https://github.com/cardano-foundation/CIPs/tree/master/CIP-0001/README.md)."
        ));
    }

    #[test]
    fn fixups_respect_item_scope() {
        let fixups = vec![
            Fixup {
                item: Some("CIP-0060".into()),
                find: "cddl/version-1.cddl".into(),
                replace: "https://example.org/version-1.cddl".into(),
            },
            Fixup {
                item: None,
                find: "DRAFT".into(),
                replace: "".into(),
            },
        ];
        assert_eq!(
            apply_fixups("see cddl/version-1.cddl DRAFT", &item("CIP-0060"), &fixups),
            "see https://example.org/version-1.cddl "
        );
        assert_eq!(
            apply_fixups("see cddl/version-1.cddl DRAFT", &item("CIP-0001"), &fixups),
            "see cddl/version-1.cddl "
        );
    }

    #[test]
    fn render_document_full_pipeline() {
        let config = Config::minimal();
        let text = "---\nCIP: 49\nTitle: ECDSA and Schnorr signatures\nStatus: Proposed\nType: Standards Track\nCreated: 2022-04-27\n* License: \n* License-Code:\n* Post-History:\n* Requires:\n* Replaces:\n* Superseded-By:\n---\n\n# Abstract\n<br/>See [design](./design.md) and [CIP-1](../CIP-0001) and [next]().\n# Copyright\n";
        let out = render_document(text, &item("CIP-0049"), &config);

        assert!(out.starts_with("--- \nsidebar_label: (49) ECDSA and Schnorr signatures\nCIP: 49\n"));
        assert!(!out.contains("License-Code"));
        assert!(!out.contains("<br/>"));
        assert!(out.contains("\n## Abstract\n"));
        assert!(out.contains("\n## Copyright\n"));
        assert!(out.contains(&format!("[design]({}/CIP-0049/design.md)", RAW)));
        assert!(out.contains("[CIP-1](./CIP-0001)"));
        assert!(out.contains("[next]."));
        assert!(out.contains("This [Standards Track](CIP-0001#cip-format-and-structure) CIP-0049 created on **2022-04-27** has the status: [Proposed](CIP-0001#cip-workflow)."));
    }

    #[test]
    fn render_document_without_header_leaves_tags_empty() {
        let config = Config::minimal();
        let out = render_document("Plain body\n", &item("CIP-0099"), &config);
        assert_eq!(
            out,
            "--- \nsidebar_label: () Plain body\n\n## CIP Information  \nThis [](CIP-0001#cip-format-and-structure) CIP-0099 created on **** has the status: [](CIP-0001#cip-workflow).  \nThis page was generated automatically from: [cardano-foundation/CIPs](https://github.com/cardano-foundation/CIPs/tree/master/CIP-0099/README.md)."
        );
    }
}
