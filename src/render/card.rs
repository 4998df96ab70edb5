//! Card view models.

use std::time::{Duration, Instant};

use serde::Serialize;

use super::cover::CoverUrls;
use super::Profile;
use crate::catalogue::{genres, GameRecord};
use crate::config::ImageConfig;

pub const NO_GAMES_MESSAGE: &str = "No games found.";

/// Text the app-id badge shows right after a copy.
pub const COPIED_LABEL: &str = "Copied!";

pub const COPY_FEEDBACK_DURATION: Duration = Duration::from_millis(1000);

/// Corner badge on a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Badge {
    Genre(String),
    Online,
    Bypass,
    New,
    Size(String),
    Downloads(u64),
}

impl Badge {
    pub fn text(&self) -> String {
        match self {
            Badge::Genre(label) => label.clone(),
            Badge::Online => "Online Supported".to_string(),
            Badge::Bypass => "Bypass Supported".to_string(),
            Badge::New => "NEW".to_string(),
            Badge::Size(size) => size.clone(),
            Badge::Downloads(count) => format!("⬇ {count}"),
        }
    }
}

/// Everything a front-end needs to draw one card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub appid: String,
    pub title: String,
    pub cover: CoverUrls,
    pub badges: Vec<Badge>,
    /// "DENUVO" overlay marker
    pub denuvo: bool,
    /// "Downloaded: N" overlay line, only when N > 0
    pub downloaded: Option<String>,
}

impl CardView {
    pub fn project(record: &GameRecord, profile: Profile, images: &ImageConfig) -> Self {
        let mut badges = Vec::new();

        if profile.shows_genres() {
            if let Some(label) = genres::record_label(record) {
                badges.push(Badge::Genre(label.to_string()));
            }
        }
        if record.is_online_supported() {
            badges.push(Badge::Online);
        }
        if record.is_bypass_supported() {
            badges.push(Badge::Bypass);
        }
        if record.new {
            badges.push(Badge::New);
        }

        let size = record.size_label().filter(|_| profile.shows_size());
        match size {
            Some(size) => badges.push(Badge::Size(size.to_string())),
            None if record.downloads > 0 => badges.push(Badge::Downloads(record.downloads)),
            None => {}
        }

        CardView {
            appid: record.appid.clone(),
            title: record.name.clone(),
            cover: CoverUrls::for_appid(images, &record.appid),
            badges,
            denuvo: record.requires_membership,
            downloaded: (record.downloads > 0).then(|| format!("Downloaded: {}", record.downloads)),
        }
    }

    pub fn project_page(records: &[&GameRecord], profile: Profile, images: &ImageConfig) -> Vec<Self> {
        records
            .iter()
            .map(|record| Self::project(record, profile, images))
            .collect()
    }
}

/// Transient "Copied!" state of the last copied card.
#[derive(Debug, Clone, Default)]
pub struct CopyFeedback {
    last: Option<(String, Instant)>,
}

impl CopyFeedback {
    pub fn record_copy(&mut self, appid: &str, now: Instant) {
        self.last = Some((appid.to_string(), now));
    }

    pub fn is_showing(&self, appid: &str, now: Instant) -> bool {
        matches!(&self.last, Some((copied, at))
            if copied == appid && now.saturating_duration_since(*at) < COPY_FEEDBACK_DURATION)
    }

    /// Label for the app-id badge of `appid` at `now`.
    pub fn badge_label<'a>(&self, appid: &'a str, now: Instant) -> &'a str {
        if self.is_showing(appid, now) {
            COPIED_LABEL
        } else {
            appid
        }
    }

    /// Drop expired feedback; returns true when something changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match &self.last {
            Some((_, at)) if now.saturating_duration_since(*at) >= COPY_FEEDBACK_DURATION => {
                self.last = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> GameRecord {
        let mut record = GameRecord::sample("1091500", "Cyberpunk 2077");
        record.downloads = 42;
        record.requires_membership = true;
        record.online_supported = "Yes".to_string();
        record.new = true;
        record.primary_genre = Some("1".to_string());
        record.size_gb = Some("70 GB".to_string());
        record
    }

    #[test]
    fn full_profile_shows_genre_and_size() {
        let card = CardView::project(&record(), Profile::Full, &ImageConfig::default());
        assert_eq!(
            card.badges,
            vec![
                Badge::Genre("Action".to_string()),
                Badge::Online,
                Badge::New,
                Badge::Size("70 GB".to_string()),
            ]
        );
        assert!(card.denuvo);
        assert_eq!(card.downloaded.as_deref(), Some("Downloaded: 42"));
        assert!(card.cover.primary.contains("/1091500/"));
    }

    #[test]
    fn compact_profile_shows_download_count_only() {
        let card = CardView::project(&record(), Profile::Compact, &ImageConfig::default());
        assert_eq!(
            card.badges,
            vec![Badge::Online, Badge::New, Badge::Downloads(42)]
        );
    }

    #[test]
    fn zero_downloads_and_no_size_render_no_count() {
        let plain = GameRecord::sample("10", "Counter-Strike");
        let card = CardView::project(&plain, Profile::Full, &ImageConfig::default());
        assert_eq!(card.badges, vec![Badge::Genre("Unknown Genre".to_string())]);
        assert!(card.downloaded.is_none());
        assert!(!card.denuvo);
    }

    #[test]
    fn null_and_zero_genre_get_the_same_badge() {
        let null_genre = GameRecord::sample("1", "A");
        let mut zero_genre = GameRecord::sample("2", "B");
        zero_genre.primary_genre = Some("0".to_string());

        let images = ImageConfig::default();
        assert_eq!(
            CardView::project(&null_genre, Profile::Full, &images).badges,
            CardView::project(&zero_genre, Profile::Full, &images).badges
        );
    }

    #[test]
    fn copy_feedback_reverts_after_a_second() {
        let start = Instant::now();
        let mut feedback = CopyFeedback::default();
        feedback.record_copy("570", start);

        assert_eq!(feedback.badge_label("570", start), COPIED_LABEL);
        assert_eq!(feedback.badge_label("730", start), "730");
        assert_eq!(
            feedback.badge_label("570", start + Duration::from_millis(999)),
            COPIED_LABEL
        );
        assert_eq!(feedback.badge_label("570", start + COPY_FEEDBACK_DURATION), "570");

        assert!(!feedback.tick(start + Duration::from_millis(500)));
        assert!(feedback.tick(start + COPY_FEEDBACK_DURATION));
        assert!(!feedback.is_showing("570", start));
    }
}
