use crate::parsers::extract::PageKind;

#[test]
fn test_url_path_signals() {
    let kind = PageKind::classify("https://site.com/about-us", None, &[]);
    assert!(kind.about);
    assert!(!kind.pricing);

    let kind = PageKind::classify("https://site.com/pricing?plan=pro", None, &[]);
    assert!(kind.pricing);
    assert!(!kind.about);
}

#[test]
fn test_host_is_not_a_signal() {
    let kind = PageKind::classify("https://aboutface-pricing.com/", None, &[]);
    assert_eq!(kind, PageKind::default());
}

#[test]
fn test_title_and_heading_signals() {
    let kind = PageKind::classify("https://site.com/x", Some("Our Story | Acme"), &[]);
    assert!(kind.about);

    let headings = vec!["Subscription options".to_string()];
    let kind = PageKind::classify("https://site.com/x", None, &headings);
    assert!(kind.pricing);
}
