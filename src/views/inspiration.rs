use std::collections::HashMap;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use crate::error::{Error, Result};
use crate::models::{Category, Inspiration, NewInspiration};
use super::layout::{rng_for, Placement};

pub const QUICK_TAGS: [&str; 4] = ["#urgent", "#weekend", "#creative", "#relaxing"];

/// The capture form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureDraft {
    pub category: Option<Category>,
    pub content: String,
    pub tags: Vec<String>,
}

/// First three words of the idea.
pub fn title_from(content: &str) -> String {
    content.split_whitespace().take(3).collect::<Vec<_>>().join(" ")
}

impl CaptureDraft {
    pub fn toggle_tag(&mut self, tag: &str) {
        if let Some(i) = self.tags.iter().position(|t| t == tag) {
            self.tags.remove(i);
        } else {
            self.tags.push(tag.to_string());
        }
    }

    /// Adds a user tag as `#tag`; duplicates and blanks are ignored.
    pub fn add_custom_tag(&mut self, raw: &str) {
        let word = raw.trim().trim_start_matches('#').trim();
        if word.is_empty() {
            return;
        }
        let tag = format!("#{}", word);
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Next category in the picker, passing through "none" after the last.
    pub fn cycle_category(&mut self) {
        self.category = match self.category {
            None => Some(Category::ALL[0]),
            Some(c) => {
                let i = Category::ALL.iter().position(|x| *x == c).unwrap_or(0);
                Category::ALL.get(i + 1).copied()
            }
        };
    }

    pub fn clear(&mut self) {
        *self = CaptureDraft::default();
    }

    /// Builds the insert payload; blank ideas are rejected.
    pub fn to_new(&self, user_id: &str) -> Result<NewInspiration> {
        let content = self.content.trim();
        if content.is_empty() {
            return Err(Error::validation("Please enter your idea"));
        }
        Ok(NewInspiration {
            user_id: user_id.to_string(),
            title: Some(title_from(content)),
            content: content.to_string(),
            category: self.category,
            is_practiced: false,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PracticeFilter {
    #[default]
    All,
    Practiced,
    Unpracticed,
}

impl PracticeFilter {
    pub fn cycle(self) -> Self {
        match self {
            PracticeFilter::All => PracticeFilter::Practiced,
            PracticeFilter::Practiced => PracticeFilter::Unpracticed,
            PracticeFilter::Unpracticed => PracticeFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PracticeFilter::All => "Show All",
            PracticeFilter::Practiced => "Practiced",
            PracticeFilter::Unpracticed => "Unpracticed",
        }
    }

    pub fn matches(&self, idea: &Inspiration) -> bool {
        match self {
            PracticeFilter::All => true,
            PracticeFilter::Practiced => idea.is_practiced,
            PracticeFilter::Unpracticed => !idea.is_practiced,
        }
    }
}

pub const MAP_WIDTH: u16 = 110;
pub const MAP_HEIGHT: u16 = 32;
const MIN_SIZE: u16 = 70;
const MAX_SIZE: u16 = 100;
const PLACEMENT_ATTEMPTS: usize = 24;

/// Longer ideas get bigger bubbles.
pub fn bubble_size(content: &str) -> u16 {
    let len = content.chars().count().min(usize::from(MAX_SIZE - MIN_SIZE)) as u16;
    MIN_SIZE + len
}

/// Bubble extent in cells for a nominal size.
fn cells(size: u16) -> (u16, u16) {
    (size / 5, size / 20)
}

pub fn is_new(idea: &Inspiration, now: DateTime<Utc>) -> bool {
    now - idea.created_at < Duration::hours(24)
}

#[derive(Debug, Clone)]
pub struct Bubble {
    pub idea: Inspiration,
    pub size: u16,
    pub place: Placement,
    pub is_new: bool,
}

fn seeded_spot(idea: &Inspiration, width: u16, height: u16, taken: &[Placement]) -> Placement {
    let mut rng = rng_for(&idea.id);
    let candidate = |rng: &mut rand::rngs::StdRng| Placement {
        x: rng.gen_range(0..=MAP_WIDTH - width),
        y: rng.gen_range(0..=MAP_HEIGHT - height),
        width,
        height,
    };
    let first = candidate(&mut rng);
    let mut place = first;
    let mut attempts = 0;
    while taken.iter().any(|p| p.overlaps(&place)) {
        attempts += 1;
        if attempts == PLACEMENT_ATTEMPTS {
            return first;
        }
        place = candidate(&mut rng);
    }
    place
}

/// Bubble spots remembered across refetches. An idea keeps its spot while it
/// exists and its size is unchanged; new ideas are placed around the others,
/// oldest first, so adding, removing or filtering ideas never moves the rest.
#[derive(Debug, Clone, Default)]
pub struct BubbleMap {
    places: HashMap<String, Placement>,
}

impl BubbleMap {
    /// Places every idea and returns the bubbles oldest first. Filter the
    /// result, not the input, to keep positions stable.
    pub fn layout(&mut self, ideas: &[Inspiration], now: DateTime<Utc>) -> Vec<Bubble> {
        let mut ordered: Vec<&Inspiration> = ideas.iter().collect();
        ordered.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        self.places.retain(|id, place| {
            ordered.iter().any(|i| {
                let (w, h) = cells(bubble_size(&i.content));
                i.id == *id && place.width == w && place.height == h
            })
        });

        ordered
            .into_iter()
            .map(|idea| {
                let size = bubble_size(&idea.content);
                let place = match self.places.get(&idea.id) {
                    Some(p) => *p,
                    None => {
                        let (width, height) = cells(size);
                        let taken: Vec<Placement> = self.places.values().copied().collect();
                        let p = seeded_spot(idea, width, height, &taken);
                        self.places.insert(idea.id.clone(), p);
                        p
                    }
                };
                Bubble { idea: idea.clone(), size, place, is_new: is_new(idea, now) }
            })
            .collect()
    }
}

/// Lays ideas out as bubbles from scratch. Each bubble tries a few seeded
/// spots and takes the first one clear of older bubbles; on a crowded map it
/// keeps its first spot.
pub fn layout_bubbles(ideas: &[Inspiration], now: DateTime<Utc>) -> Vec<Bubble> {
    BubbleMap::default().layout(ideas, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn idea(id: &str, practiced: bool, created_at: DateTime<Utc>) -> Inspiration {
        Inspiration {
            id: id.into(),
            user_id: "u".into(),
            title: None,
            content: format!("idea number {}", id),
            category: None,
            is_practiced: practiced,
            created_at,
        }
    }

    #[test]
    fn title_is_first_three_words() {
        assert_eq!(title_from("Learn  watercolor painting this spring"), "Learn watercolor painting");
        assert_eq!(title_from("Yoga"), "Yoga");
    }

    #[test]
    fn blank_idea_is_rejected() {
        let draft = CaptureDraft { content: " ".into(), ..Default::default() };
        assert_eq!(draft.to_new("u").unwrap_err().to_string(), "Please enter your idea");

        let draft = CaptureDraft {
            category: Some(Category::Art),
            content: "Try sourdough starter at home".into(),
            tags: vec![],
        };
        let new = draft.to_new("u").unwrap();
        assert_eq!(new.title.as_deref(), Some("Try sourdough starter"));
        assert!(!new.is_practiced);
        assert_eq!(new.category, Some(Category::Art));
    }

    #[test]
    fn tags_toggle_and_custom_tags_dedupe() {
        let mut draft = CaptureDraft::default();
        draft.toggle_tag("#weekend");
        draft.toggle_tag("#urgent");
        draft.toggle_tag("#weekend");
        assert_eq!(draft.tags, vec!["#urgent"]);

        draft.add_custom_tag("cozy");
        draft.add_custom_tag("#cozy");
        draft.add_custom_tag("  ");
        assert_eq!(draft.tags, vec!["#urgent", "#cozy"]);
    }

    #[test]
    fn category_cycle_wraps_through_none() {
        let mut draft = CaptureDraft::default();
        for _ in 0..Category::ALL.len() {
            draft.cycle_category();
            assert!(draft.category.is_some());
        }
        assert_eq!(draft.category, Some(Category::Language));
        draft.cycle_category();
        assert_eq!(draft.category, None);
    }

    #[test]
    fn practiced_filter_shows_only_matching_ideas() {
        let now = Utc::now();
        let ideas = vec![idea("1", true, now), idea("2", false, now), idea("3", false, now)];
        let practiced: Vec<_> = ideas.iter().filter(|i| PracticeFilter::Practiced.matches(i)).collect();
        let open: Vec<_> = ideas.iter().filter(|i| PracticeFilter::Unpracticed.matches(i)).collect();
        assert_eq!(practiced.len(), 1);
        assert!(practiced.iter().all(|i| i.is_practiced));
        assert_eq!(open.len(), 2);
        assert!(open.iter().all(|i| !i.is_practiced));
    }

    #[test]
    fn bubbles_stay_in_bounds_without_overlap_when_room_allows() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();
        let ideas: Vec<_> = (0..6).map(|i| idea(&i.to_string(), false, now)).collect();
        let bubbles = layout_bubbles(&ideas, now);
        assert_eq!(bubbles.len(), 6);
        for (i, a) in bubbles.iter().enumerate() {
            assert!(a.place.right() <= MAP_WIDTH && a.place.bottom() <= MAP_HEIGHT);
            assert!((MIN_SIZE..=MAX_SIZE).contains(&a.size));
            for b in &bubbles[i + 1..] {
                assert!(!a.place.overlaps(&b.place), "{} overlaps {}", a.idea.id, b.idea.id);
            }
        }
        let again = layout_bubbles(&ideas, now);
        assert_eq!(again[3].place, bubbles[3].place);
    }

    fn spots(bubbles: &[Bubble]) -> HashMap<String, Placement> {
        bubbles.iter().map(|b| (b.idea.id.clone(), b.place)).collect()
    }

    fn twelve_ideas(now: DateTime<Utc>) -> Vec<Inspiration> {
        // newest first, the way the journal lists them
        (0..12).rev().map(|i| idea(&format!("idea-{}", i), i % 3 == 0, now - Duration::minutes(i64::from(12 - i)))).collect()
    }

    #[test]
    fn fresh_layout_ignores_input_order_and_newer_ideas() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();
        let all = twelve_ideas(now);
        let before = spots(&layout_bubbles(&all, now));

        let mut reversed = all.clone();
        reversed.reverse();
        assert_eq!(spots(&layout_bubbles(&reversed, now)), before);

        let without_newest = spots(&layout_bubbles(&all[1..], now));
        for (id, place) in &without_newest {
            assert_eq!(before[id], *place, "{} moved", id);
        }
    }

    #[test]
    fn remembered_spots_survive_removal_capture_and_filtering() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();
        let mut all = twelve_ideas(now);
        let mut map = BubbleMap::default();
        let before = spots(&map.layout(&all, now));

        let removed = all.remove(5);
        let after = spots(&map.layout(&all, now));
        assert!(!after.contains_key(&removed.id));
        for (id, place) in &after {
            assert_eq!(before[id], *place, "{} moved after a removal", id);
        }

        all.insert(0, idea("fresh", false, now));
        let with_new = map.layout(&all, now);
        for b in with_new.iter().filter(|b| b.idea.id != "fresh") {
            assert_eq!(before[&b.idea.id], b.place, "{} moved after a capture", b.idea.id);
        }

        let practiced: Vec<_> = with_new.iter().filter(|b| PracticeFilter::Practiced.matches(&b.idea)).collect();
        assert!(!practiced.is_empty());
        for b in practiced {
            assert_eq!(before[&b.idea.id], b.place);
        }
    }

    #[test]
    fn new_badge_lasts_a_day() {
        let now = Utc.with_ymd_and_hms(2026, 10, 17, 12, 0, 0).unwrap();
        assert!(is_new(&idea("a", false, now - Duration::hours(3)), now));
        assert!(!is_new(&idea("b", false, now - Duration::hours(30)), now));
    }
}
