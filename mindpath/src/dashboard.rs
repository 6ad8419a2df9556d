//! Wellness dashboard: session statistics, chart series, personality
//! traits and achievement filtering.

use mindpath_model::profile::{Achievement, Trait, UserPersonality};
use mindpath_model::therapy::TherapySession;

/// Chart label format, e.g. `Aug 10`.
const CHART_DATE_FORMAT: &str = "%b %-d";

/// Headline numbers for past therapy sessions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionStats {
    pub total_sessions: usize,
    pub total_minutes: u64,
    /// Mean of `after - before` across sessions; `0.0` with no sessions.
    pub average_mood_improvement: f64,
}

impl SessionStats {
    #[must_use]
    pub fn compute(sessions: &[TherapySession]) -> Self {
        let total_minutes = sessions.iter().map(|s| u64::from(s.duration)).sum();
        let improvement: i32 = sessions.iter().map(|s| s.mood.improvement()).sum();
        let average_mood_improvement = match u32::try_from(sessions.len()) {
            Ok(0) | Err(_) => 0.0,
            Ok(n) => f64::from(improvement) / f64::from(n),
        };
        Self {
            total_sessions: sessions.len(),
            total_minutes,
            average_mood_improvement,
        }
    }
}

/// One point of the mood chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodPoint {
    pub date: String,
    pub before: u8,
    pub after: u8,
    pub topic: String,
}

/// One bar of the session-duration chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationPoint {
    pub date: String,
    pub minutes: u32,
    pub topic: String,
}

/// Mood before/after each session, in session order.
#[must_use]
pub fn mood_series(sessions: &[TherapySession]) -> Vec<MoodPoint> {
    sessions
        .iter()
        .map(|s| MoodPoint {
            date: s.date.format(CHART_DATE_FORMAT).to_string(),
            before: s.mood.before,
            after: s.mood.after,
            topic: s.topic.clone(),
        })
        .collect()
}

/// Duration of each session, in session order.
#[must_use]
pub fn duration_series(sessions: &[TherapySession]) -> Vec<DurationPoint> {
    sessions
        .iter()
        .map(|s| DurationPoint {
            date: s.date.format(CHART_DATE_FORMAT).to_string(),
            minutes: s.duration,
            topic: s.topic.clone(),
        })
        .collect()
}

/// Trait scores in trait order.
#[must_use]
pub fn trait_scores(personality: &UserPersonality) -> Vec<(Trait, u8)> {
    personality.traits.iter().map(|(t, s)| (*t, *s)).collect()
}

/// Which achievements to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AchievementFilter {
    #[default]
    All,
    Completed,
    InProgress,
}

impl AchievementFilter {
    /// Parses `all`, `completed` or `in-progress`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "completed" => Some(Self::Completed),
            "in-progress" => Some(Self::InProgress),
            _ => None,
        }
    }

    const fn accepts(self, achievement: &Achievement) -> bool {
        match self {
            Self::All => true,
            Self::Completed => achievement.completed,
            Self::InProgress => !achievement.completed,
        }
    }
}

/// Achievements matching `filter`, in their original order.
#[must_use]
pub fn filter_achievements(
    achievements: &[Achievement],
    filter: AchievementFilter,
) -> Vec<&Achievement> {
    achievements.iter().filter(|a| filter.accepts(a)).collect()
}
