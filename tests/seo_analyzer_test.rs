use scraper::Html;
use siteaudit::seo_analyzer::SeoAnalyzer;

const CANONICAL: &str = r#"<link rel="canonical" href="https://example.com/">"#;

fn description(len: usize) -> String {
    format!(r#"<meta name="description" content="{}">"#, "a".repeat(len))
}

fn analyze(head: &str, body: &str) -> Vec<String> {
    let html = format!(
        "<!DOCTYPE html><html><head>{}</head><body>{}</body></html>",
        head, body
    );
    SeoAnalyzer::analyze(&Html::parse_document(&html))
}

#[test]
fn test_compliant_page_has_no_issues() {
    let head = format!("{}{}", description(140), CANONICAL);
    let body = r#"<h1>Title</h1><img src="/a.png" alt="A"><img src="/b.png" alt="B">"#;

    assert!(analyze(&head, body).is_empty());
}

#[test]
fn test_meta_description_boundaries() {
    let body = "<h1>Title</h1>";

    for len in [120, 150, 160] {
        let head = format!("{}{}", description(len), CANONICAL);
        assert!(analyze(&head, body).is_empty(), "length {} should pass", len);
    }

    let head = format!("{}{}", description(100), CANONICAL);
    assert_eq!(
        analyze(&head, body),
        vec!["Short meta description (100/150 chars)"]
    );

    let head = format!("{}{}", description(119), CANONICAL);
    assert_eq!(
        analyze(&head, body),
        vec!["Short meta description (119/150 chars)"]
    );

    let head = format!("{}{}", description(161), CANONICAL);
    assert_eq!(
        analyze(&head, body),
        vec!["Long meta description (161/150 chars)"]
    );
}

#[test]
fn test_meta_description_counts_characters_not_bytes() {
    let head = format!(
        r#"<meta name="description" content="{}">{}"#,
        "é".repeat(130),
        CANONICAL
    );
    assert!(analyze(&head, "<h1>Title</h1>").is_empty());
}

#[test]
fn test_missing_or_empty_meta_description() {
    let issues = analyze(CANONICAL, "<h1>Title</h1>");
    assert_eq!(issues, vec!["Missing meta description"]);

    let head = format!(r#"<meta name="description" content="">{}"#, CANONICAL);
    assert_eq!(analyze(&head, "<h1>Title</h1>"), vec!["Missing meta description"]);

    let head = format!(r#"<meta name="description">{}"#, CANONICAL);
    assert_eq!(analyze(&head, "<h1>Title</h1>"), vec!["Missing meta description"]);
}

#[test]
fn test_h1_count() {
    let head = format!("{}{}", description(140), CANONICAL);

    assert_eq!(
        analyze(&head, "<h1>One</h1><h1>Two</h1>"),
        vec!["Found 2 H1 tags (should be 1)"]
    );
    assert_eq!(
        analyze(&head, "<h2>Only a subheading</h2>"),
        vec!["Found 0 H1 tags (should be 1)"]
    );
}

#[test]
fn test_one_issue_per_image_without_alt() {
    let head = format!("{}{}", description(140), CANONICAL);
    let long_src = format!("/images/{}.png", "x".repeat(80));
    let body = format!(
        r#"<h1>Title</h1>
        <img src="/with-alt.png" alt="Described">
        <img src="/no-alt.png">
        <img src="/empty-alt.png" alt="">
        <img alt="">
        <img src="{}">"#,
        long_src
    );

    let issues = analyze(&head, &body);
    let alt_issues: Vec<_> = issues
        .iter()
        .filter(|issue| issue.starts_with("Missing alt text"))
        .collect();

    assert_eq!(alt_issues.len(), 4);
    assert_eq!(alt_issues[0], "Missing alt text: /no-alt.png...");
    assert_eq!(alt_issues[1], "Missing alt text: /empty-alt.png...");
    assert_eq!(alt_issues[2], "Missing alt text: ...");
    assert_eq!(
        alt_issues[3],
        &format!("Missing alt text: {}...", &long_src[..50])
    );
}

#[test]
fn test_canonical_checks() {
    let body = "<h1>Title</h1>";

    assert_eq!(analyze(&description(140), body), vec!["Missing canonical URL"]);

    let head = format!(
        r#"{}<link rel="canonical" href="http://example.com/page">"#,
        description(140)
    );
    assert_eq!(
        analyze(&head, body),
        vec!["Non-HTTPS canonical: http://example.com/page..."]
    );

    let long_href = format!("http://example.com/{}", "p".repeat(60));
    let head = format!(
        r#"{}<link rel="canonical" href="{}">"#,
        description(140),
        long_href
    );
    assert_eq!(
        analyze(&head, body),
        vec![format!("Non-HTTPS canonical: {}...", &long_href[..50])]
    );

    let head = format!(r#"{}<link rel="canonical">"#, description(140));
    assert_eq!(analyze(&head, body), vec!["Non-HTTPS canonical: ..."]);
}

#[test]
fn test_issues_follow_checklist_order() {
    let body = r#"<h1>A</h1><h1>B</h1><img src="/x.png">"#;
    let head = r#"<link rel="canonical" href="http://example.com/">"#;

    assert_eq!(
        analyze(head, body),
        vec![
            "Missing meta description",
            "Found 2 H1 tags (should be 1)",
            "Missing alt text: /x.png...",
            "Non-HTTPS canonical: http://example.com/...",
        ]
    );
}
