//! Quest recommendation engine.
//!
//! Pure functions of (profile, completion history, now) over the read-only
//! catalog, plus a private randomness source for the paths that pick
//! uniformly among candidates. The engine holds no other state and never
//! memoizes across calls.

pub mod scoring;

use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use rand::{Rng, RngCore, SeedableRng};
use rand_pcg::Pcg64;

use crate::profile::UserProfile;
use crate::quest::{Catalog, Quest, QuestCategory};
use crate::storage::CompletedQuests;
use scoring::score_quest;

/// What the engine suggests doing next.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    /// The suggested quest; `None` only for an empty catalog.
    pub quest: Option<Quest>,
    /// The suggestion is a missed earlier-in-the-week weekly quest.
    pub is_catch_up: bool,
    /// Everything in today's ideal set is already done.
    pub today_complete: bool,
}

/// Recommendation engine over a fixed catalog.
pub struct RecommendationEngine {
    catalog: Arc<Catalog>,
    rng: Box<dyn RngCore + Send>,
}

impl RecommendationEngine {
    /// Engine with an entropy-seeded randomness source.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self::with_rng(catalog, Pcg64::from_entropy())
    }

    /// Engine with an injected randomness source (deterministic tests).
    pub fn with_rng(catalog: Arc<Catalog>, rng: impl RngCore + Send + 'static) -> Self {
        Self {
            catalog,
            rng: Box::new(rng),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Pick the next quest to surface.
    ///
    /// Today's ideal set is every daily quest plus the weekly quests whose
    /// title names today's weekday (Monday-Friday). Incomplete members of
    /// the set are scored and the best one returned. Once the set is done,
    /// missed weekly quests from earlier in the week are offered as
    /// catch-up (uniformly at random), then everything not yet done today,
    /// and finally -- with the whole catalog completed today -- a random
    /// quest so the user is never left without a suggestion.
    pub fn recommend(
        &mut self,
        profile: &UserProfile,
        completed: &CompletedQuests,
        now: DateTime<Utc>,
    ) -> Recommendation {
        let catalog = Arc::clone(&self.catalog);
        let today = now.date_naive();
        let weekday = now.weekday();
        let done_today = completed.ids_completed_today(today);

        let ideal: Vec<&Quest> = catalog
            .iter()
            .filter(|quest| match quest.category {
                QuestCategory::Daily => true,
                QuestCategory::Weekly => quest.targets_weekday(weekday),
                _ => false,
            })
            .collect();

        // An empty ideal set with zero completions is not "complete".
        let today_complete = !done_today.is_empty()
            && ideal.iter().all(|quest| done_today.contains(&quest.id));

        let pending: Vec<&Quest> = ideal
            .iter()
            .copied()
            .filter(|quest| !done_today.contains(&quest.id))
            .collect();
        if !pending.is_empty() {
            return Recommendation {
                quest: best_scored(&pending, profile, now).cloned(),
                is_catch_up: false,
                today_complete,
            };
        }

        // Ideal set done: offer a weekly quest missed earlier this week.
        // Only Monday-Thursday slots can be "missed", and only once today
        // is strictly past them.
        let today_index = weekday.num_days_from_monday();
        let missed: Vec<&Quest> = catalog
            .iter()
            .filter(|quest| quest.category == QuestCategory::Weekly)
            .filter(|quest| !done_today.contains(&quest.id))
            .filter(|quest| {
                quest.referenced_weekday().is_some_and(|day| {
                    let index = day.num_days_from_monday();
                    index <= 3 && index < today_index
                })
            })
            .collect();
        if !missed.is_empty() {
            return Recommendation {
                quest: self.pick(&missed).cloned(),
                is_catch_up: true,
                today_complete,
            };
        }

        let remaining: Vec<&Quest> = catalog
            .iter()
            .filter(|quest| !done_today.contains(&quest.id))
            .collect();
        if remaining.is_empty() {
            let everything: Vec<&Quest> = catalog.iter().collect();
            return Recommendation {
                quest: self.pick(&everything).cloned(),
                is_catch_up: false,
                today_complete,
            };
        }

        Recommendation {
            quest: best_scored(&remaining, profile, now).cloned(),
            is_catch_up: false,
            today_complete,
        }
    }

    /// A quick win: something short that isn't done yet today.
    ///
    /// Prefers ≤5-minute quests, then speed cleans, among the ≤10-minute
    /// candidates.
    pub fn quick_win(&mut self, completed: &CompletedQuests, now: DateTime<Utc>) -> Option<Quest> {
        let catalog = Arc::clone(&self.catalog);
        let today = now.date_naive();
        let candidates: Vec<&Quest> = catalog
            .iter()
            .filter(|quest| !completed.completed_today(&quest.id, today))
            .filter(|quest| quest.duration_min <= 10)
            .collect();

        let five: Vec<&Quest> = candidates
            .iter()
            .copied()
            .filter(|quest| quest.duration_min <= 5)
            .collect();
        if !five.is_empty() {
            return self.pick(&five).cloned();
        }

        let speed: Vec<&Quest> = candidates
            .iter()
            .copied()
            .filter(|quest| quest.category == QuestCategory::SpeedClean)
            .collect();
        if !speed.is_empty() {
            return self.pick(&speed).cloned();
        }

        self.pick(&candidates).cloned()
    }

    /// The lowest-effort thing left today: a ≤5-minute speed clean or
    /// daily, then anything ≤10 minutes, then anything at all not done
    /// today.
    pub fn easiest(&mut self, completed: &CompletedQuests, now: DateTime<Utc>) -> Option<Quest> {
        let catalog = Arc::clone(&self.catalog);
        let today = now.date_naive();
        let not_done: Vec<&Quest> = catalog
            .iter()
            .filter(|quest| !completed.completed_today(&quest.id, today))
            .collect();

        let tiny: Vec<&Quest> = not_done
            .iter()
            .copied()
            .filter(|quest| {
                quest.duration_min <= 5
                    && matches!(
                        quest.category,
                        QuestCategory::SpeedClean | QuestCategory::Daily
                    )
            })
            .collect();
        if !tiny.is_empty() {
            return self.pick(&tiny).cloned();
        }

        let short: Vec<&Quest> = not_done
            .iter()
            .copied()
            .filter(|quest| quest.duration_min <= 10)
            .collect();
        if !short.is_empty() {
            return self.pick(&short).cloned();
        }

        self.pick(&not_done).cloned()
    }

    /// Something to do right now in at most `max_duration_min` minutes,
    /// optionally bound to a room. Speed cleans and dailies are preferred.
    pub fn ad_hoc(
        &mut self,
        room: Option<crate::quest::RoomType>,
        max_duration_min: u32,
    ) -> Option<Quest> {
        let catalog = Arc::clone(&self.catalog);
        let candidates: Vec<&Quest> = catalog
            .iter()
            .filter(|quest| quest.duration_min <= max_duration_min)
            .filter(|quest| room.map_or(true, |target| quest.room == Some(target)))
            .collect();

        let preferred: Vec<&Quest> = candidates
            .iter()
            .copied()
            .filter(|quest| {
                matches!(
                    quest.category,
                    QuestCategory::SpeedClean | QuestCategory::Daily
                )
            })
            .collect();
        if !preferred.is_empty() {
            return self.pick(&preferred).cloned();
        }

        self.pick(&candidates).cloned()
    }

    /// Uniform draw over the candidate list at call time.
    fn pick<'a>(&mut self, candidates: &[&'a Quest]) -> Option<&'a Quest> {
        if candidates.is_empty() {
            return None;
        }
        let index = self.rng.gen_range(0..candidates.len());
        Some(candidates[index])
    }
}

/// Highest-scoring quest; the first maximum wins so catalog order breaks
/// ties deterministically.
fn best_scored<'a>(
    candidates: &[&'a Quest],
    profile: &UserProfile,
    now: DateTime<Utc>,
) -> Option<&'a Quest> {
    let mut best: Option<(&'a Quest, i32)> = None;
    for &quest in candidates {
        let score = score_quest(quest, profile, now);
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((quest, score)),
        }
    }
    best.map(|(quest, _)| quest)
}
