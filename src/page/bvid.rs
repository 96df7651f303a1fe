use std::sync::LazyLock;

use regex::Regex;

// Current BV scheme (covers aids past 2^30 as well as the legacy range).
const ALPHABET: &str = "FcwAPNKTMug3GV5Lj7EJnHpWsx4tb8haYeviqBz6rkCy12mUSDQX9RdoZf";
const XOR_CODE: u64 = 23_442_827_791_579;
const MASK_CODE: u64 = 2_251_799_813_685_247;
const BASE: u64 = 58;
const BVID_LEN: usize = 12;

static BVID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"BV[0-9A-Za-z]{10}").expect("bvid pattern compiles"));

/// First `BV…` token found in `link`, if any.
pub fn extract_bvid(link: &str) -> Option<&str> {
    BVID_RE.find(link).map(|m| m.as_str())
}

/// Convert a 12-character `BV1…` id into the numeric aid.
///
/// Returns `None` for anything that is not a well-formed id: wrong length or
/// prefix, or a character outside the encoding alphabet.
pub fn bv_to_av(bvid: &str) -> Option<u64> {
    if bvid.len() != BVID_LEN || !bvid.starts_with("BV1") {
        return None;
    }
    let mut chars: Vec<u8> = bvid.bytes().collect();
    chars.swap(3, 9);
    chars.swap(4, 7);

    let mut tmp: u64 = 0;
    for &c in &chars[3..] {
        let idx = ALPHABET.find(c as char)? as u64;
        tmp = tmp * BASE + idx;
    }
    Some((tmp & MASK_CODE) ^ XOR_CODE)
}

/// Accepts `BV1…`, `av123` / `AV123`, or a bare number.
pub fn parse_video_id(input: &str) -> Option<u64> {
    let s = input.trim();
    if let Some(bvid) = extract_bvid(s) {
        return bv_to_av(bvid);
    }
    let digits = s.strip_prefix("av").or_else(|| s.strip_prefix("AV")).unwrap_or(s);
    digits.parse::<u64>().ok().filter(|aid| *aid > 0)
}
