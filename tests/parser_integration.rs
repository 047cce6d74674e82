//! Integration tests for input list parsing through the public API.

use std::path::Path;

use imgpull_core::parser::{IdentifierStrategy, ParseError, Platform, parse_task_list};

const OUT: &str = "/srv/img";

#[test]
fn test_platform_names_select_strategy() {
    for name in ["xhs", "Weibo", " XHS "] {
        let platform: Platform = name.parse().unwrap();
        assert_eq!(platform.identifier_strategy(), IdentifierStrategy::UrlTail);
    }
    for name in ["pexels", "unsplash", "huaban"] {
        let platform: Platform = name.parse().unwrap();
        assert_eq!(platform.identifier_strategy(), IdentifierStrategy::ExplicitId);
    }
    assert!(matches!(
        "instagram".parse::<Platform>(),
        Err(ParseError::UnknownPlatform { .. })
    ));
}

#[test]
fn test_xhs_list_with_mixed_lines() {
    let list = "\
https://sns-webpic.example.com/notes_pre_post/1040g00830abc!nd_dft_wlteh_webp_3

https://sns-webpic.example.com/notes_pre_post/
https://sns-webpic.example.com/spectrum/1040g0k031def?imageView2&format=webp
";
    let platform: Platform = "xhs".parse().unwrap();
    let result = parse_task_list(list, platform.identifier_strategy(), Path::new(OUT));

    assert_eq!(result.len(), 2);
    assert_eq!(result.skipped.len(), 1);
    assert!(matches!(
        result.skipped[0].error,
        ParseError::EmptyIdentifier { line: 3, .. }
    ));
    assert_eq!(
        result.tasks[0].destination(),
        Path::new("/srv/img/1040g00830abc!nd_dft_wlteh_webp_3.png")
    );
    assert_eq!(
        result.tasks[1].identifier(),
        "1040g0k031def?imageView2&format=webp"
    );
    assert_eq!(
        result.tasks[1].destination(),
        Path::new("/srv/img/1040g0k031def_imageView2&format=webp.png")
    );
}

#[test]
fn test_pexels_list_requires_url_and_id() {
    let list = "\
https://images.example.com/photos/1181244/a.jpeg 1181244
https://images.example.com/photos/2/b.jpeg
https://images.example.com/photos/3/c.jpeg 3 extra
https://images.example.com/photos/1181244/other.jpeg 1181244
";
    let result = parse_task_list(list, IdentifierStrategy::ExplicitId, Path::new(OUT));

    assert_eq!(result.len(), 1);
    assert_eq!(result.tasks[0].identifier(), "1181244");
    assert_eq!(
        result.tasks[0].url(),
        "https://images.example.com/photos/1181244/a.jpeg"
    );
    assert_eq!(result.skipped.len(), 2);
    assert_eq!(result.duplicates, 1);
}

#[test]
fn test_identifiers_with_path_characters_stay_in_output_dir() {
    let result = parse_task_list(
        "https://img.example/x ../../etc/passwd\n",
        IdentifierStrategy::ExplicitId,
        Path::new(OUT),
    );

    let destination = result.tasks[0].destination();
    assert_eq!(destination.parent(), Some(Path::new(OUT)));
}
