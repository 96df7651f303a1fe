use std::collections::HashSet;

use crate::page::VideoRecord;

/// Drop records whose uploader is on the blacklist.
///
/// Both sides are trimmed; comparison is exact and case-sensitive. Order of
/// the surviving records is preserved, so filtering twice changes nothing.
pub fn filter_blacklisted(videos: Vec<VideoRecord>, blacklist: &[String]) -> (Vec<VideoRecord>, Vec<VideoRecord>) {
    let blocked: HashSet<&str> = blacklist.iter().map(|s| s.trim()).filter(|s| !s.is_empty()).collect();
    if blocked.is_empty() {
        return (videos, Vec::new());
    }
    videos.into_iter().partition(|v| !blocked.contains(v.uploader.trim()))
}

/// Split free-form input (newlines, commas, semicolons, whitespace) into a
/// trimmed, de-duplicated list, keeping first-seen order.
pub fn parse_blacklist(text: &str) -> Vec<String> {
    let names = text
        .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty());
    normalize(names)
}

/// Trim, drop blanks and de-duplicate (first occurrence wins).
pub fn normalize<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for name in names {
        let name = name.trim();
        if !name.is_empty() && seen.insert(name) {
            out.push(name.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(uploader: &str, aid: u64) -> VideoRecord {
        VideoRecord {
            title: format!("video {aid}"),
            link: format!("https://www.bilibili.com/video/av{aid}"),
            uploader: uploader.to_string(),
            bvid: String::new(),
            aid,
        }
    }

    fn uploaders(v: &[VideoRecord]) -> Vec<&str> { v.iter().map(|r| r.uploader.as_str()).collect() }

    #[test]
    fn removes_exact_matches_after_trim() {
        let videos = vec![video("Alice", 1), video(" Alice ", 2), video("Alicia", 3), video("alice", 4)];
        let (kept, dropped) = filter_blacklisted(videos, &["Alice".to_string()]);
        assert_eq!(uploaders(&kept), vec!["Alicia", "alice"]);
        assert_eq!(dropped.len(), 2);
    }

    #[test]
    fn blacklist_entries_are_trimmed_too() {
        let videos = vec![video("Bob", 1), video("Carol", 2)];
        let (kept, _) = filter_blacklisted(videos, &["  Bob\t".to_string()]);
        assert_eq!(uploaders(&kept), vec!["Carol"]);
    }

    #[test]
    fn empty_blacklist_is_identity() {
        let videos = vec![video("Bob", 1), video("Carol", 2)];
        let (kept, dropped) = filter_blacklisted(videos.clone(), &[]);
        assert_eq!(kept, videos);
        assert!(dropped.is_empty());

        let (kept, _) = filter_blacklisted(videos.clone(), &["   ".to_string()]);
        assert_eq!(kept, videos);
    }

    #[test]
    fn filtering_is_idempotent() {
        let blacklist = vec!["Alice".to_string(), "Dave".to_string()];
        let videos = vec![video("Alice", 1), video("Bob", 2), video("Dave ", 3), video("Carol", 4)];
        let (once, _) = filter_blacklisted(videos, &blacklist);
        let (twice, dropped) = filter_blacklisted(once.clone(), &blacklist);
        assert_eq!(once, twice);
        assert!(dropped.is_empty());
        assert_eq!(uploaders(&twice), vec!["Bob", "Carol"]);
    }

    #[test]
    fn parses_mixed_separators() {
        let got = parse_blacklist("Alice\nBob, Carol;Dave  Alice\n\n ,Eve");
        assert_eq!(got, vec!["Alice", "Bob", "Carol", "Dave", "Eve"]);
        assert!(parse_blacklist("  \n ; , ").is_empty());
    }
}
