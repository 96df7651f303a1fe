use serde::Serialize;

/// One entry scraped from the weekly page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoRecord {
    pub title: String,
    pub link: String,
    pub uploader: String,
    pub bvid: String,
    pub aid: u64,
}

#[derive(Debug)]
pub struct Extraction {
    pub videos: Vec<VideoRecord>,
    /// Cards that were present but could not be turned into a record.
    pub skipped: Vec<super::PageError>,
}

impl Extraction {
    pub fn candidates(&self) -> usize { self.videos.len() + self.skipped.len() }
}

#[derive(Serialize)]
pub struct ExtractResult {
    pub candidates: usize,
    pub skipped: usize,
    pub videos: Vec<VideoRecord>,
}
