use lectern_domain::reading::{MAX_PROGRESS, ReadlistStatus};

/// Readlist status implied by saving `progress` on an entry in `current`.
///
/// Returns `None` when the entry stays as it is. Finishing wins over
/// starting; entries never move backwards.
pub fn advance_readlist(current: ReadlistStatus, progress: f64) -> Option<ReadlistStatus> {
    if progress >= MAX_PROGRESS {
        return (current != ReadlistStatus::Finished).then_some(ReadlistStatus::Finished);
    }
    if progress > 0.0 && current == ReadlistStatus::WantToRead {
        return Some(ReadlistStatus::Reading);
    }
    None
}

/// Required text fields must contain a non-whitespace character.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Category slugs: lowercase ASCII letters, digits and single inner hyphens.
pub fn validate_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= 64
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
