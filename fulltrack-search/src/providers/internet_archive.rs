//! Internet Archive adapter
//!
//! The archive has no streaming API. The advanced search endpoint returns
//! item identifiers, and the stream URL is derived from the conventional
//! download path `<download base>/<id>/<id>.mp3`.

use super::lenient::{opt_string, opt_text};
use super::{get_json, ProviderAdapter, ProviderError};
use async_trait::async_trait;
use fulltrack_common::{ProviderName, Track, TrackSource};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

/// Archive site root
const ARCHIVE_BASE_URL: &str = "https://archive.org";

/// Fields requested from advanced search
const FIELDS: [&str; 4] = ["identifier", "title", "creator", "licenseurl"];

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    #[serde(default)]
    response: ArchiveResults,
}

#[derive(Debug, Default, Deserialize)]
struct ArchiveResults {
    #[serde(default)]
    docs: Vec<ArchiveDoc>,
}

#[derive(Debug, Deserialize)]
struct ArchiveDoc {
    #[serde(default, deserialize_with = "opt_string")]
    identifier: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    title: Option<String>,
    #[serde(default, deserialize_with = "opt_text")]
    creator: Option<String>,
    #[serde(default, deserialize_with = "opt_string")]
    licenseurl: Option<String>,
}

impl ArchiveDoc {
    fn into_track(self, download_base: &str) -> Option<Track> {
        let identifier = self.identifier?;
        let stream_url = format!("{}/{id}/{id}.mp3", download_base, id = identifier);
        let title = self.title.unwrap_or_else(|| identifier.clone());

        let mut source = TrackSource::new(ProviderName::InternetArchive, identifier);
        source.stream_url = Some(stream_url);
        source.streamable = Some(true);
        source.playable = Some(true);
        source.license = self.licenseurl;
        source.cors_support = Some(true);

        let mut track = Track::new(title).with_source(source);
        track.artist = self.creator;
        Some(track)
    }
}

/// Internet Archive adapter
pub struct InternetArchiveAdapter {
    http_client: Client,
    base_url: String,
    limit: u32,
}

impl InternetArchiveAdapter {
    pub fn new(http_client: Client, limit: u32) -> Self {
        Self {
            http_client,
            base_url: ARCHIVE_BASE_URL.to_string(),
            limit,
        }
    }

    /// Point the adapter at another site root (tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn download_base(&self) -> String {
        format!("{}/download", self.base_url)
    }
}

#[async_trait]
impl ProviderAdapter for InternetArchiveAdapter {
    fn provider(&self) -> ProviderName {
        ProviderName::InternetArchive
    }

    async fn fetch(&self, query: &str) -> Result<Vec<Track>, ProviderError> {
        debug!(query = %query, "Querying Internet Archive");

        let q = format!("{} AND mediatype:(audio)", query);
        let rows = self.limit.to_string();
        let mut params: Vec<(&str, &str)> = vec![("q", q.as_str())];
        params.extend(FIELDS.iter().map(|f| ("fl[]", *f)));
        params.push(("rows", rows.as_str()));
        params.push(("output", "json"));

        let request = self
            .http_client
            .get(format!("{}/advancedsearch.php", self.base_url))
            .query(&params);

        let response: ArchiveResponse = get_json(request).await?;
        let download_base = self.download_base();

        Ok(response
            .response
            .docs
            .into_iter()
            .filter_map(|doc| doc.into_track(&download_base))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn parse(value: Value) -> Option<Track> {
        serde_json::from_value::<ArchiveDoc>(value)
            .unwrap()
            .into_track("https://archive.org/download")
    }

    #[test]
    fn test_derives_stream_url_from_identifier() {
        let track = parse(json!({
            "identifier": "gd1977-05-08",
            "title": "Grateful Dead Live at Barton Hall",
            "creator": "Grateful Dead",
            "licenseurl": "http://creativecommons.org/licenses/by-nc-sa/3.0/"
        }))
        .unwrap();

        assert_eq!(track.title, "Grateful Dead Live at Barton Hall");
        assert_eq!(track.artist.as_deref(), Some("Grateful Dead"));
        assert_eq!(track.cover_url, None);
        assert_eq!(track.duration, None);

        let source = &track.sources[0];
        assert_eq!(
            source.stream_url.as_deref(),
            Some("https://archive.org/download/gd1977-05-08/gd1977-05-08.mp3")
        );
        assert_eq!(source.source_id.as_deref(), Some("gd1977-05-08"));
        assert_eq!(source.streamable, Some(true));
        assert_eq!(
            source.license.as_deref(),
            Some("http://creativecommons.org/licenses/by-nc-sa/3.0/")
        );
    }

    #[test]
    fn test_creator_list_joined() {
        let track = parse(json!({
            "identifier": "split-ep",
            "title": "Split EP",
            "creator": ["Band One", "Band Two"]
        }))
        .unwrap();
        assert_eq!(track.artist.as_deref(), Some("Band One, Band Two"));
    }

    #[test]
    fn test_title_falls_back_to_identifier() {
        let track = parse(json!({"identifier": "untitled-tape"})).unwrap();
        assert_eq!(track.title, "untitled-tape");
    }

    #[test]
    fn test_doc_without_identifier_skipped() {
        assert!(parse(json!({"title": "Orphan"})).is_none());
    }
}
