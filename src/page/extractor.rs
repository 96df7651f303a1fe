use scraper::{ElementRef, Html, Selector};
use url::Url;

use super::bvid::{bv_to_av, extract_bvid};
use super::types::{Extraction, VideoRecord};
use super::PageError;

pub const WEEKLY_PAGE_URL: &str = "https://www.bilibili.com/v/popular/weekly";

const CARD_SELECTOR: &str = ".video-card";
const TITLE_SELECTOR: &str = ".video-name";
const UPLOADER_SELECTOR: &str = ".up-name__text";
const LINK_SELECTOR: &str = "a";

struct CardSelectors {
    title: Selector,
    uploader: Selector,
    link: Selector,
}

/// Pull every video card off a rendered weekly page.
///
/// Cards with a missing field or an unusable BV id are reported in
/// `Extraction::skipped` (1-based index) and do not abort the scrape.
/// A page with no cards at all is `PageError::ContentNotFound`.
pub fn extract_videos(html: &str) -> Result<Extraction, PageError> {
    let doc = Html::parse_document(html);
    let base = Url::parse(WEEKLY_PAGE_URL).ok();

    let card_sel = selector(CARD_SELECTOR);
    let sels = CardSelectors {
        title: selector(TITLE_SELECTOR),
        uploader: selector(UPLOADER_SELECTOR),
        link: selector(LINK_SELECTOR),
    };

    let cards: Vec<ElementRef<'_>> = doc.select(&card_sel).collect();
    if cards.is_empty() {
        return Err(PageError::ContentNotFound);
    }

    let mut videos = Vec::with_capacity(cards.len());
    let mut skipped = Vec::new();
    for (i, card) in cards.into_iter().enumerate() {
        match parse_card(card, i + 1, &sels, base.as_ref()) {
            Ok(v) => videos.push(v),
            Err(e) => skipped.push(e),
        }
    }
    Ok(Extraction { videos, skipped })
}

fn parse_card(card: ElementRef<'_>, index: usize, sels: &CardSelectors, base: Option<&Url>) -> Result<VideoRecord, PageError> {
    let link = card
        .select(&sels.link)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|href| absolutize(href, base));
    let title = first_text(card, &sels.title);
    let uploader = first_text(card, &sels.uploader);

    let (Some(link), Some(title), Some(uploader)) = (link, title, uploader) else {
        return Err(PageError::RecordIncomplete { index });
    };

    let Some(bvid) = extract_bvid(&link).map(str::to_string) else {
        return Err(PageError::BvidExtractFailed { index });
    };
    let aid = bv_to_av(&bvid).ok_or(PageError::BvidExtractFailed { index })?;

    Ok(VideoRecord { title, link, uploader, bvid, aid })
}

fn first_text(card: ElementRef<'_>, sel: &Selector) -> Option<String> {
    let node = card.select(sel).next()?;
    let text = node.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() { None } else { Some(text.to_string()) }
}

fn absolutize(href: &str, base: Option<&Url>) -> String {
    match base.and_then(|b| b.join(href).ok()) {
        Some(u) => u.to_string(),
        None => href.to_string(),
    }
}

fn selector(s: &str) -> Selector {
    // constant selectors; a parse failure is a programming error
    Selector::parse(s).expect("static css selector")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(href: Option<&str>, title: Option<&str>, up: Option<&str>) -> String {
        let mut s = String::from(r#"<div class="video-card">"#);
        if let Some(h) = href { s.push_str(&format!(r#"<a href="{}"><img/></a>"#, h)); }
        if let Some(t) = title { s.push_str(&format!(r#"<p class="video-name">{}</p>"#, t)); }
        if let Some(u) = up { s.push_str(&format!(r#"<span class="up-name__text">{}</span>"#, u)); }
        s.push_str("</div>");
        s
    }

    fn page(cards: &[String]) -> String {
        format!("<html><body><div class=\"video-list\">{}</div></body></html>", cards.concat())
    }

    #[test]
    fn extracts_complete_cards() {
        let html = page(&[
            card(Some("//www.bilibili.com/video/BV17x411w7KC"), Some(" First video "), Some("Alice")),
            card(Some("https://www.bilibili.com/video/BV1xx411c7mD/?p=1"), Some("Second"), Some("Bob")),
        ]);
        let got = extract_videos(&html).unwrap();
        assert!(got.skipped.is_empty());
        assert_eq!(got.videos.len(), 2);
        assert_eq!(got.videos[0].title, "First video");
        assert_eq!(got.videos[0].link, "https://www.bilibili.com/video/BV17x411w7KC");
        assert_eq!(got.videos[0].bvid, "BV17x411w7KC");
        assert_eq!(got.videos[0].aid, 170001);
        assert_eq!(got.videos[1].uploader, "Bob");
        assert_eq!(got.videos[1].aid, 2);
    }

    #[test]
    fn no_cards_is_content_not_found() {
        let html = "<html><body><div class=\"empty\">loading…</div></body></html>";
        assert!(matches!(extract_videos(html), Err(PageError::ContentNotFound)));
    }

    #[test]
    fn card_without_uploader_is_skipped() {
        let html = page(&[
            card(Some("/video/BV17x411w7KC"), Some("One"), Some("Alice")),
            card(Some("/video/BV1xx411c7mD"), Some("Two"), None),
            card(Some("/video/BV1Q541167Qg"), Some("Three"), Some("Carol")),
        ]);
        let got = extract_videos(&html).unwrap();
        let titles: Vec<&str> = got.videos.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Three"]);
        assert_eq!(got.skipped.len(), 1);
        assert!(matches!(got.skipped[0], PageError::RecordIncomplete { index: 2 }));
        assert_eq!(got.candidates(), 3);
    }

    #[test]
    fn card_without_bvid_is_skipped() {
        let html = page(&[
            card(Some("https://www.bilibili.com/bangumi/play/ep1"), Some("Episode"), Some("Studio")),
            card(Some("/video/BV17x411w7KC"), Some("One"), Some("Alice")),
        ]);
        let got = extract_videos(&html).unwrap();
        assert_eq!(got.videos.len(), 1);
        assert!(matches!(got.skipped[0], PageError::BvidExtractFailed { index: 1 }));
    }

    #[test]
    fn blank_title_counts_as_missing() {
        let html = page(&[card(Some("/video/BV17x411w7KC"), Some("   "), Some("Alice"))]);
        let got = extract_videos(&html).unwrap();
        assert!(got.videos.is_empty());
        assert!(matches!(got.skipped[0], PageError::RecordIncomplete { index: 1 }));
    }
}
