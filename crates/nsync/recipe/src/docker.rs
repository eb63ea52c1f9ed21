//! Docker image references as root filesystem URIs

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

pub const DOCKER_SCHEME: &str = "docker";

const FRAGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

const PATH: &AsciiSet = &FRAGMENT.add(b'?');

/// Split an image reference into repository and tag.
///
/// The tag is whatever follows the last `:`, unless that suffix contains a
/// `/` (then the colon belongs to a registry host and there is no tag).
pub fn parse_repository_tag(reference: &str) -> (&str, Option<&str>) {
    match reference.rfind(':') {
        Some(n) if !reference[n + 1..].contains('/') => {
            (&reference[..n], Some(&reference[n + 1..]))
        }
        _ => (reference, None),
    }
}

/// `user/repo:tag` -> `docker:///user/repo#tag`
pub fn root_fs_uri(image: &str) -> String {
    let (repository, tag) = parse_repository_tag(image);

    let mut uri = format!(
        "{DOCKER_SCHEME}:///{}",
        utf8_percent_encode(repository.trim_start_matches('/'), PATH)
    );
    if let Some(tag) = tag.filter(|t| !t.is_empty()) {
        uri.push('#');
        uri.extend(utf8_percent_encode(tag, FRAGMENT));
    }
    uri
}
