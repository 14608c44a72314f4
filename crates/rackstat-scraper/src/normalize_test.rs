use super::*;

// -----------------------------------------------------------------------
// normalize
// -----------------------------------------------------------------------

#[test]
fn bare_host_gets_scheme_www_and_resume_rewrite() {
    let result = normalize("  skillrack.com/profile/123/abc ");
    assert_eq!(
        result.canonical_url,
        "https://www.skillrack.com/faces/resume.xhtml?id=123&key=abc"
    );
    assert!(result.was_modified);
    assert_eq!(
        result.change_log,
        vec![
            "Removed extra whitespace",
            "Added https:// protocol",
            "Added www subdomain",
            "Converted profile URL to resume format",
        ]
    );
}

#[test]
fn http_is_upgraded_before_rewrite() {
    let result = normalize("http://www.skillrack.com/profile/440943/bf966a469d73");
    assert_eq!(
        result.canonical_url,
        "https://www.skillrack.com/faces/resume.xhtml?id=440943&key=bf966a469d73"
    );
    assert_eq!(result.change_log[0], "Upgraded http:// to https://");
}

#[test]
fn internal_whitespace_is_removed() {
    let result = normalize_with(
        "https://www.skillrack.com/profile/123 456/abc\tdef",
        NormalizeOptions::cosmetic(),
    );
    assert_eq!(
        result.canonical_url,
        "https://www.skillrack.com/profile/123456/abcdef"
    );
    assert_eq!(result.change_log, vec!["Removed spaces within URL"]);
}

#[test]
fn resume_url_is_left_alone() {
    let url = "https://www.skillrack.com/faces/resume.xhtml?id=1&key=k";
    let result = normalize(url);
    assert_eq!(result.canonical_url, url);
    assert!(!result.was_modified);
    assert!(result.change_log.is_empty());
}

#[test]
fn cosmetic_options_keep_http_and_profile_path() {
    let url = "http://www.skillrack.com/profile/123456/abcdef";
    let result = normalize_with(url, NormalizeOptions::cosmetic());
    assert_eq!(result.canonical_url, url);
    assert!(!result.was_modified);
}

#[test]
fn unrelated_host_is_not_given_a_scheme() {
    let result = normalize("example.com/profile/1/a");
    assert_eq!(result.canonical_url, "example.com/profile/1/a");
    assert!(!result.was_modified);
}

#[test]
fn empty_input_stays_empty() {
    let result = normalize("   ");
    assert_eq!(result.canonical_url, "");
    assert_eq!(result.change_log, vec!["Removed extra whitespace"]);
}

#[test]
fn normalization_is_idempotent() {
    let inputs = [
        "  skillrack.com/profile/123/abc ",
        "http://skillrack.com/faces/resume.xhtml?id=1&key=k",
        "https://www.skillrack.com/profile/9/Z",
        "not a url",
    ];
    for input in inputs {
        let once = normalize(input);
        let twice = normalize(&once.canonical_url);
        assert_eq!(twice.canonical_url, once.canonical_url, "input: {input}");
        assert!(!twice.was_modified, "input: {input}");
    }
}

// -----------------------------------------------------------------------
// feedback
// -----------------------------------------------------------------------

#[test]
fn feedback_joins_change_log() {
    let result = normalize_with("skillrack.com/profile/1/a", NormalizeOptions::cosmetic());
    assert_eq!(
        feedback(&result).as_deref(),
        Some("URL automatically cleaned: Added https:// protocol, Added www subdomain")
    );
}

#[test]
fn feedback_is_none_for_clean_input() {
    let result = normalize("https://www.skillrack.com/faces/resume.xhtml?id=1&key=k");
    assert!(feedback(&result).is_none());
}

// -----------------------------------------------------------------------
// validate_profile_url
// -----------------------------------------------------------------------

#[test]
fn accepts_profile_and_resume_urls() {
    for url in [
        "https://www.skillrack.com/profile/440943/bf966a469d73bfb792f4d2a72a4762937ba3fc48",
        "http://www.skillrack.com/profile/123456/abcdef",
        "https://www.skillrack.com/faces/resume.xhtml?id=123&key=abc",
        "https://www.skillrack.com/faces/resume.xhtml?key=abc&id=123",
    ] {
        assert!(validate_profile_url(url), "expected valid: {url}");
    }
}

#[test]
fn rejects_wrong_host_path_or_params() {
    for url in [
        "https://skillrack.com/profile/123456/abcdef",
        "https://www.google.com",
        "https://www.skillrack.com",
        "https://www.skillrack.com/profile/abc/def",
        "https://www.skillrack.com/profile/123/",
        "https://www.skillrack.com/profile/123/abc/extra",
        "https://www.skillrack.com/faces/resume.xhtml?id=123",
        "ftp://www.skillrack.com/profile/1/a",
        "not a url",
        "",
    ] {
        assert!(!validate_profile_url(url), "expected invalid: {url}");
    }
}

#[test]
fn normalized_profile_url_validates() {
    let result = normalize("skillrack.com/profile/123/abc");
    assert!(validate_profile_url(&result.canonical_url));
}

#[test]
fn profile_path_with_extra_characters_is_not_rewritten() {
    for url in [
        "https://www.skillrack.com/profile/123/abc-def",
        "https://www.skillrack.com/profile/123/abc/extra",
        "https://www.skillrack.com/profile/123/abc.evil",
    ] {
        let result = normalize(url);
        assert_eq!(result.canonical_url, url);
        assert!(!result.was_modified);
        assert!(!validate_profile_url(&result.canonical_url), "expected invalid: {url}");
    }
}

#[test]
fn profile_path_with_trailing_slash_or_query_is_rewritten() {
    for url in [
        "https://www.skillrack.com/profile/123/abc/",
        "https://www.skillrack.com/profile/123/abc?ref=share",
    ] {
        assert_eq!(
            normalize(url).canonical_url,
            "https://www.skillrack.com/faces/resume.xhtml?id=123&key=abc"
        );
    }
}
