use crate::model::WeatherSnapshot;

/// Backdrop chosen for the current conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Background {
    #[default]
    Default,
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    Atmosphere,
    ClearDay,
    ClearNight,
    CloudsDay,
    CloudsNight,
}

impl Background {
    /// Classify a provider condition id. Ids outside the documented groups
    /// (including the unused 400 range) fall through to clouds.
    pub fn from_condition(id: u32, is_day: bool) -> Self {
        match id {
            200..=299 => Background::Thunderstorm,
            300..=399 => Background::Drizzle,
            500..=599 => Background::Rain,
            600..=699 => Background::Snow,
            700..=799 => Background::Atmosphere,
            800 if is_day => Background::ClearDay,
            800 => Background::ClearNight,
            _ if is_day => Background::CloudsDay,
            _ => Background::CloudsNight,
        }
    }

    pub fn for_snapshot(snapshot: Option<&WeatherSnapshot>) -> Self {
        snapshot
            .and_then(|s| {
                s.primary_condition()
                    .map(|c| Self::from_condition(c.id, c.is_day()))
            })
            .unwrap_or_default()
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            Background::Default => "default-bg",
            Background::Thunderstorm => "thunderstorm-bg",
            Background::Drizzle => "drizzle-bg",
            Background::Rain => "rain-bg",
            Background::Snow => "snow-bg",
            Background::Atmosphere => "atmosphere-bg",
            Background::ClearDay => "clear-day-bg",
            Background::ClearNight => "clear-night-bg",
            Background::CloudsDay => "clouds-day-bg",
            Background::CloudsNight => "clouds-night-bg",
        }
    }
}

impl std::fmt::Display for Background {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.css_class())
    }
}
