//! Comprehensive tests for morph-html
//!
//! Widget markup as the server renders it.

use morph_dom::SimpleSelector;
use morph_html::{parse, HtmlParser};

#[test]
fn test_parse_minimal_html() {
    let doc = parse("").unwrap();
    assert!(doc.tree().len() >= 1, "Even empty HTML should have root");
    assert!(doc.body().is_valid());
}

#[test]
fn test_parse_with_url() {
    let doc = HtmlParser::new()
        .parse_with_url("<p>x</p>", "https://morph.test/page")
        .unwrap();
    assert_eq!(doc.url(), "https://morph.test/page");
}

#[test]
fn test_attributes_survive() {
    let html = r#"
        <div data-accordion="collapse" class="accordion">
            <div class="accordion__item">
                <button class="accordion__item-trigger" aria-expanded="true">One</button>
                <div class="accordion__item-content">Body</div>
            </div>
        </div>
    "#;
    let doc = parse(html).unwrap();
    let container = doc
        .tree()
        .query_first(doc.root(), &SimpleSelector::parse("[data-accordion]").unwrap())
        .unwrap();
    assert_eq!(doc.attr(container, "data-accordion"), Some("collapse"));

    let trigger = doc
        .tree()
        .query_first(container, &SimpleSelector::parse(".accordion__item-trigger").unwrap())
        .unwrap();
    assert_eq!(doc.attr(trigger, "aria-expanded"), Some("true"));
    assert_eq!(doc.tree().text_content(trigger), "One");
}

#[test]
fn test_boolean_attributes_are_empty_strings() {
    let doc = parse(r#"<div class="modal" id="m" hidden></div>"#).unwrap();
    let modal = doc.get_element_by_id("m").unwrap();
    assert!(doc.is_hidden(modal));
    assert_eq!(doc.attr(modal, "hidden"), Some(""));
}

#[test]
fn test_whitespace_text_dropped() {
    let doc = parse("<ul>\n  <li>a</li>\n  <li>b</li>\n</ul>").unwrap();
    let ul = doc
        .tree()
        .query_first(doc.root(), &SimpleSelector::parse("ul").unwrap())
        .unwrap();
    assert_eq!(doc.tree().children(ul).count(), 2);
}

#[test]
fn test_parse_malformed_html() {
    let html = "<div><p>Unclosed paragraph<span>Unclosed span</div><p>Another";
    let doc = parse(html).unwrap();
    assert!(doc.tree().len() > 1);
}

#[test]
fn test_tag_names_lowercased() {
    let doc = parse("<BUTTON ID=\"b\">x</BUTTON>").unwrap();
    let b = doc.get_element_by_id("b").unwrap();
    assert_eq!(doc.element(b).unwrap().tag, "button");
}
