use metadata_validator::frontmatter::{
    first_heading, parse_metadata_block, render_metadata_block, rewrite_metadata_block,
    title_from_filename,
};

const DOC: &str = "---\n# Metadata\n- **Document Title:** Release Process\n- **Author:** Docs Team\n- **Created:** Jul 5, 2025\n- **Description:**\n---\n\n# Release Process\n\nBody text.\n";

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[test]
fn parses_bold_fields() {
    let block = parse_metadata_block(DOC).unwrap();
    assert_eq!(block.start, 0);
    assert_eq!(block.end, 6);
    assert_eq!(
        block.fields,
        [
            ("Document Title".to_string(), "Release Process".to_string()),
            ("Author".to_string(), "Docs Team".to_string()),
            ("Created".to_string(), "Jul 5, 2025".to_string()),
            ("Description".to_string(), String::new()),
        ]
    );
}

#[test]
fn caption_line_is_ignored() {
    let block = parse_metadata_block(DOC).unwrap();
    assert!(block.fields.iter().all(|(k, _)| !k.contains("Metadata")));
}

#[test]
fn plain_key_value_lines_are_accepted() {
    let doc = "---\nAuthor: Ada\nCreated: 2025-07-05\n---\n";
    let map = parse_metadata_block(doc).unwrap().to_map();
    assert_eq!(map["Author"], "Ada");
    assert_eq!(map["Created"], "2025-07-05");
}

#[test]
fn value_may_contain_colons() {
    let doc = "---\n- **Description:** Steps: build, tag, publish\n---\n";
    let map = parse_metadata_block(doc).unwrap().to_map();
    assert_eq!(map["Description"], "Steps: build, tag, publish");
}

#[test]
fn last_duplicate_wins_in_map() {
    let doc = "---\n- **Author:** First\n- **Author:** Second\n---\n";
    let block = parse_metadata_block(doc).unwrap();
    assert_eq!(block.fields.len(), 2);
    assert_eq!(block.to_map()["Author"], "Second");
}

#[test]
fn block_after_leading_text() {
    let doc = "Intro line\n---\n- **Author:** Ada\n---\n";
    let block = parse_metadata_block(doc).unwrap();
    assert_eq!((block.start, block.end), (1, 3));
}

#[test]
fn horizontal_rules_around_prose_are_not_a_block() {
    let doc = "# Guide\n\nIntro.\n\n---\n\nNote: restart the service first.\n\n---\n\nMore text.\n";
    assert!(parse_metadata_block(doc).is_none());
}

#[test]
fn plain_lines_below_the_top_are_not_fields() {
    let doc = "Intro line\n---\nNote: x\n- **Author:** Ada\n---\n";
    let block = parse_metadata_block(doc).unwrap();
    assert_eq!(block.fields, [("Author".to_string(), "Ada".to_string())]);
}

#[test]
fn top_block_after_blank_lines_accepts_plain_lines() {
    let doc = "\n\n---\nAuthor: Ada\n---\n";
    let block = parse_metadata_block(doc).unwrap();
    assert_eq!(block.start, 2);
    assert_eq!(block.to_map()["Author"], "Ada");
}

#[test]
fn no_block_returns_none() {
    assert!(parse_metadata_block("# Just a heading\n\nText.\n").is_none());
}

#[test]
fn unterminated_block_returns_none() {
    assert!(parse_metadata_block("---\n- **Author:** Ada\n").is_none());
}

// ---------------------------------------------------------------------------
// Rendering and rewriting
// ---------------------------------------------------------------------------

#[test]
fn render_writes_empty_values_without_trailing_space() {
    let rendered = render_metadata_block(&[
        ("Author".to_string(), "Ada".to_string()),
        ("Description".to_string(), String::new()),
    ]);
    assert_eq!(
        rendered,
        "---\n# Metadata\n- **Author:** Ada\n- **Description:**\n---\n"
    );
}

#[test]
fn rewrite_applies_updates_in_order() {
    let order = ["Document Title", "Author", "Created", "Version", "Description"];
    let out = rewrite_metadata_block(DOC, &order, &[("Created", "2025-07-05"), ("Version", "0.1.0")]);

    let block = parse_metadata_block(&out).unwrap();
    let keys: Vec<&str> = block.fields.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, order);
    let map = block.to_map();
    assert_eq!(map["Created"], "2025-07-05");
    assert_eq!(map["Version"], "0.1.0");
    assert_eq!(map["Author"], "Docs Team");
}

#[test]
fn rewrite_keeps_body_intact() {
    let out = rewrite_metadata_block(DOC, &["Author"], &[("Author", "Ada")]);
    assert!(out.ends_with("\n# Release Process\n\nBody text.\n"));
}

#[test]
fn rewrite_keeps_fields_outside_the_order() {
    let doc = "---\n- **Author:** Ada\n- **Reviewer:** Grace\n---\n";
    let out = rewrite_metadata_block(doc, &["Author"], &[]);
    let map = parse_metadata_block(&out).unwrap().to_map();
    assert_eq!(map["Reviewer"], "Grace");
}

#[test]
fn rewrite_prepends_block_when_missing() {
    let doc = "# Title\n\nText.\n";
    let out = rewrite_metadata_block(doc, &["Author"], &[("Author", "Unknown")]);
    assert!(out.starts_with("---\n# Metadata\n- **Author:** Unknown\n---\n"));
    assert!(out.ends_with("# Title\n\nText.\n"));
}

#[test]
fn rewrite_prepends_block_above_horizontal_rules() {
    let doc = "# Guide\n\n---\n\nNote: restart first.\n\n---\n";
    let out = rewrite_metadata_block(doc, &["Author"], &[("Author", "Unknown")]);
    assert!(out.starts_with("---\n# Metadata\n- **Author:** Unknown\n---\n"));
    assert!(out.ends_with(doc));
}

#[test]
fn rewrite_keeps_crlf_line_endings() {
    let doc = DOC.replace('\n', "\r\n");
    let out = rewrite_metadata_block(&doc, &["Created"], &[("Created", "2025-07-05")]);
    assert!(out.contains("- **Created:** 2025-07-05\r\n"));
    assert!(out.ends_with("Body text.\r\n"));
    assert_eq!(out.matches('\n').count(), out.matches("\r\n").count());
}

#[test]
fn rewrite_keeps_crlf_when_prepending() {
    let doc = "# Title\r\n\r\nText.\r\n";
    let out = rewrite_metadata_block(doc, &["Author"], &[("Author", "Unknown")]);
    assert!(out.starts_with("---\r\n# Metadata\r\n"));
    assert!(out.ends_with(doc));
    assert_eq!(out.matches('\n').count(), out.matches("\r\n").count());
}

#[test]
fn rewrite_preserves_missing_final_newline() {
    let doc = "---\n- **Author:** Ada\n---\nText";
    let out = rewrite_metadata_block(doc, &["Author"], &[("Author", "Grace")]);
    assert!(out.ends_with("\nText"));
}

// ---------------------------------------------------------------------------
// Titles
// ---------------------------------------------------------------------------

#[test]
fn first_heading_after_block() {
    let block = parse_metadata_block(DOC).unwrap();
    assert_eq!(
        first_heading(DOC, Some(block.end)).as_deref(),
        Some("Release Process")
    );
}

#[test]
fn first_heading_absent() {
    assert!(first_heading("plain text\n", None).is_none());
}

#[test]
fn title_from_path() {
    assert_eq!(title_from_filename("docs/release_process.md"), "Release Process");
    assert_eq!(title_from_filename("API-guide.md"), "Api Guide");
}
