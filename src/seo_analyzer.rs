use once_cell::sync::Lazy;
use scraper::{Html, Selector};

/// Meta descriptions shorter than this are reported as short
pub const META_DESCRIPTION_MIN: usize = 120;

/// Meta descriptions longer than this are reported as long
pub const META_DESCRIPTION_MAX: usize = 160;

/// Length shown as the target in meta description messages
const META_DESCRIPTION_IDEAL: usize = 150;

/// Number of characters of an image src or canonical href kept in messages
const SNIPPET_LEN: usize = 50;

static META_DESC_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("meta[name='description']").expect("meta description selector should be valid")
});
static H1_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1").expect("h1 selector should be valid"));
static IMG_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("img selector should be valid"));
static CANONICAL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("link[rel~='canonical']").expect("canonical selector should be valid")
});

pub struct SeoAnalyzer;

impl SeoAnalyzer {
    /// Runs the SEO checklist against a parsed page.
    ///
    /// Issues come back in a fixed order: meta description, H1 count,
    /// image alt text (one per image), canonical link.
    pub fn analyze(document: &Html) -> Vec<String> {
        let mut issues = Vec::new();

        if let Some(issue) = Self::check_meta_description(document) {
            issues.push(issue);
        }

        if let Some(issue) = Self::check_h1_count(document) {
            issues.push(issue);
        }

        issues.extend(Self::check_image_alts(document));

        if let Some(issue) = Self::check_canonical(document) {
            issues.push(issue);
        }

        issues
    }

    fn check_meta_description(document: &Html) -> Option<String> {
        let content = document
            .select(&META_DESC_SELECTOR)
            .next()
            .and_then(|el| el.value().attr("content"))
            .unwrap_or_default();

        if content.is_empty() {
            return Some("Missing meta description".to_string());
        }

        let length = content.chars().count();
        if length < META_DESCRIPTION_MIN {
            Some(format!(
                "Short meta description ({}/{} chars)",
                length, META_DESCRIPTION_IDEAL
            ))
        } else if length > META_DESCRIPTION_MAX {
            Some(format!(
                "Long meta description ({}/{} chars)",
                length, META_DESCRIPTION_IDEAL
            ))
        } else {
            None
        }
    }

    fn check_h1_count(document: &Html) -> Option<String> {
        let count = document.select(&H1_SELECTOR).count();
        (count != 1).then(|| format!("Found {} H1 tags (should be 1)", count))
    }

    fn check_image_alts(document: &Html) -> Vec<String> {
        document
            .select(&IMG_SELECTOR)
            .filter(|img| img.value().attr("alt").is_none_or(str::is_empty))
            .map(|img| {
                let src = img.value().attr("src").unwrap_or_default();
                format!("Missing alt text: {}...", truncate(src, SNIPPET_LEN))
            })
            .collect()
    }

    fn check_canonical(document: &Html) -> Option<String> {
        let Some(canonical) = document.select(&CANONICAL_SELECTOR).next() else {
            return Some("Missing canonical URL".to_string());
        };

        let href = canonical.value().attr("href").unwrap_or_default();
        (!href.starts_with("https://"))
            .then(|| format!("Non-HTTPS canonical: {}...", truncate(href, SNIPPET_LEN)))
    }
}

/// Returns at most `max_chars` characters of `value`
pub(crate) fn truncate(value: &str, max_chars: usize) -> &str {
    match value.char_indices().nth(max_chars) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}
