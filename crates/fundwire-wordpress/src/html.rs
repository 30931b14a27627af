//! HTML-to-text cleanup for post content

use scraper::Html;

/// Strip tags and entities from rendered HTML, collapsing whitespace.
///
/// WordPress serves rendered HTML; the extraction pipeline wants plain
/// article text.
pub fn plain_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let text: Vec<&str> = document.root_element().text().collect();
    let joined = text.join(" ");
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags() {
        let html = "<p>Acme a levé <strong>5M€</strong> en série A.</p>";
        assert_eq!(plain_text(html), "Acme a levé 5M€ en série A.");
    }

    #[test]
    fn test_decodes_entities() {
        let html = "<p>Montant&nbsp;: 5M&euro; &amp; plus</p>";
        let text = plain_text(html);
        assert!(text.contains("5M€ & plus"), "got: {}", text);
    }

    #[test]
    fn test_collapses_whitespace() {
        let html = "<div>\n  <p>Un   montant</p>\n  <p>record</p>\n</div>";
        assert_eq!(plain_text(html), "Un montant record");
    }

    #[test]
    fn test_plain_input_passes_through() {
        assert_eq!(plain_text("déjà du texte brut"), "déjà du texte brut");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(plain_text(""), "");
    }
}
