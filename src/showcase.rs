//! Showcase state: filter predicate, sort order, visible set and the detail modal.
//!
//! Everything here is pure state. Rendering lives in `ui`, input wiring in `main`.

use crate::project::{LoadError, ProjectRecord};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Tag filter: the "all" sentinel or a single tag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagFilter {
    #[default]
    All,
    Tag(String),
}

impl TagFilter {
    /// Only the exact sentinel `"all"` selects everything. Any other value is
    /// taken as-is, including tags no project carries.
    pub fn parse(raw: &str) -> Self {
        if raw == "all" {
            Self::All
        } else {
            Self::Tag(raw.to_string())
        }
    }

    /// Lenient parse for typed input (tag entry box, `--tag`): trims, and
    /// treats blank input or `all` in any case as the sentinel.
    pub fn from_input(raw: &str) -> Self {
        let tag = raw.trim();
        if tag.is_empty() || tag.eq_ignore_ascii_case("all") {
            Self::All
        } else {
            Self::Tag(tag.to_string())
        }
    }

    pub fn matches(&self, tags: &[String]) -> bool {
        match self {
            Self::All => true,
            Self::Tag(wanted) => {
                let wanted = wanted.to_lowercase();
                tags.iter().any(|t| t.to_lowercase() == wanted)
            }
        }
    }
}

impl fmt::Display for TagFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Tag(tag) => f.write_str(tag),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    DateDesc,
    DateAsc,
    TitleAsc,
    TitleDesc,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] = [
        Self::DateDesc,
        Self::DateAsc,
        Self::TitleAsc,
        Self::TitleDesc,
    ];

    pub fn next(self) -> Self {
        match self {
            Self::DateDesc => Self::DateAsc,
            Self::DateAsc => Self::TitleAsc,
            Self::TitleAsc => Self::TitleDesc,
            Self::TitleDesc => Self::DateDesc,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::DateDesc => "Newest first",
            Self::DateAsc => "Oldest first",
            Self::TitleAsc => "Title A-Z",
            Self::TitleDesc => "Title Z-A",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DateDesc => "date-desc",
            Self::DateAsc => "date-asc",
            Self::TitleAsc => "title-asc",
            Self::TitleDesc => "title-desc",
        }
    }

    pub fn compare(self, a: &ProjectRecord, b: &ProjectRecord) -> Ordering {
        match self {
            Self::DateDesc => b.date_completed.cmp(&a.date_completed),
            Self::DateAsc => a.date_completed.cmp(&b.date_completed),
            Self::TitleAsc => title_cmp(&a.title, &b.title),
            Self::TitleDesc => title_cmp(&b.title, &a.title),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|o| o.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown sort order {s:?} (expected date-desc, date-asc, title-asc or title-desc)")
            })
    }
}

/// Human-ordered title comparison. Accents and case are ignored first, so
/// "Élevage" sorts between "Apple" and "Zebra". Ties fall back to unaccented
/// before accented, then lowercase before uppercase.
pub fn title_cmp(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| accent_key(a).cmp(&accent_key(b)))
        .then_with(|| b.cmp(a))
}

/// Base letters only: decomposed, combining marks stripped, lowercased.
fn collation_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

fn accent_key(s: &str) -> String {
    s.nfd().collect::<String>().to_lowercase()
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub active_tag: TagFilter,
    pub featured_only: bool,
    pub sort_order: SortOrder,
}

impl FilterState {
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    pub fn matches(&self, record: &ProjectRecord) -> bool {
        self.active_tag.matches(&record.tags) && (!self.featured_only || record.featured)
    }
}

/// Indices of the records passing `filter`, ordered by its sort order.
/// `sort_by` is stable, so ties keep source order.
pub fn visible_set(projects: &[ProjectRecord], filter: &FilterState) -> Vec<usize> {
    let mut visible: Vec<usize> = projects
        .iter()
        .enumerate()
        .filter(|(_, p)| filter.matches(p))
        .map(|(i, _)| i)
        .collect();
    visible.sort_by(|&a, &b| filter.sort_order.compare(&projects[a], &projects[b]));
    visible
}

pub fn count_label(visible: usize, total: usize) -> String {
    if visible == total {
        format!("{} projects", total)
    } else {
        format!("{} of {} projects", visible, total)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    Demo,
    Source,
    CaseStudyPdf,
}

impl LinkKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Demo => "Live demo",
            Self::Source => "Source code",
            Self::CaseStudyPdf => "Case study (PDF)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkAffordance {
    pub kind: LinkKind,
    pub url: String,
}

/// Content of the shared detail overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub id: String,
    pub title: String,
    pub image: String,
    pub image_alt: String,
    pub problem: String,
    pub solution: String,
    pub outcome: String,
    pub improvement: String,
    pub timeline: String,
    pub scale: String,
    pub technologies: Vec<String>,
    pub links: Vec<LinkAffordance>,
}

impl DetailView {
    pub fn from_record(record: &ProjectRecord) -> Self {
        let links = [
            (LinkKind::Demo, record.links.demo.as_ref()),
            (LinkKind::Source, record.links.github.as_ref()),
            (LinkKind::CaseStudyPdf, record.case_study.pdf_download.as_ref()),
        ]
        .into_iter()
        .filter_map(|(kind, url)| {
            url.filter(|u| !u.trim().is_empty()).map(|u| LinkAffordance {
                kind,
                url: u.clone(),
            })
        })
        .collect();

        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            image: record.image.clone(),
            image_alt: record.image_alt_text().to_string(),
            problem: record.case_study.problem.clone(),
            solution: record.case_study.solution.clone(),
            outcome: record.case_study.outcome.clone(),
            improvement: record.metrics.improvement.clone(),
            timeline: record.metrics.timeline.clone(),
            scale: record.metrics.scale.clone(),
            technologies: record.technologies.clone(),
            links,
        }
    }

    pub fn link(&self, kind: LinkKind) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.kind == kind)
            .map(|l| l.url.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModalState {
    #[default]
    Closed,
    Open(DetailView),
}

/// What dismissed the detail overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    Explicit,
    OutsideClick,
    Cancel,
}

/// Every operation the controller accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetFilter(String),
    SetTagFilter(TagFilter),
    SetFeaturedOnly(bool),
    ToggleFeaturedOnly,
    SetSort(SortOrder),
    CycleSort,
    ClearFilters,
    OpenDetail(String),
    CloseDetail(CloseReason),
}

/// Observable result of dispatching a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Filter state changed and the visible set was recomputed.
    Recomputed,
    ModalOpened,
    /// The overlay closed; focus should return to this card if it still exists.
    ModalClosed { focus: Option<String> },
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSummary {
    pub chips: Vec<String>,
    pub show_clear: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct CardView<'a> {
    pub record: &'a ProjectRecord,
    pub visible: bool,
}

/// Everything the rendering adapter needs for one frame.
#[derive(Debug, Clone)]
pub struct ShowcaseView<'a> {
    /// One entry per source record, in source order.
    pub cards: Vec<CardView<'a>>,
    /// Visible records in sort order.
    pub ordered: Vec<&'a ProjectRecord>,
    pub count_label: String,
    pub summary: FilterSummary,
    pub no_results: bool,
}

/// The showcase controller.
#[derive(Debug, Clone, Default)]
pub struct Showcase {
    projects: Vec<ProjectRecord>,
    filter: FilterState,
    visible: Vec<usize>,
    modal: ModalState,
    focus_anchor: Option<String>,
    load_error: Option<String>,
}

impl Showcase {
    pub fn new(projects: Vec<ProjectRecord>) -> Self {
        let mut showcase = Self {
            projects,
            ..Self::default()
        };
        showcase.recompute();
        showcase
    }

    /// Build from the outcome of the one-shot load. A failed load leaves the
    /// source list empty and keeps the error for diagnostics.
    pub fn from_load_result(result: Result<Vec<ProjectRecord>, LoadError>) -> Self {
        let mut showcase = Self::default();
        showcase.install(result);
        showcase
    }

    /// Install the loaded project list, keeping the current filter state.
    pub fn install(&mut self, result: Result<Vec<ProjectRecord>, LoadError>) {
        match result {
            Ok(projects) => {
                self.projects = projects;
                self.load_error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "project list unavailable, showing empty showcase");
                self.projects.clear();
                self.load_error = Some(e.user_message());
            }
        }
        self.recompute();
    }

    pub fn projects(&self) -> &[ProjectRecord] {
        &self.projects
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    pub fn modal(&self) -> &ModalState {
        &self.modal
    }

    pub fn detail(&self) -> Option<&DetailView> {
        match &self.modal {
            ModalState::Open(detail) => Some(detail),
            ModalState::Closed => None,
        }
    }

    pub fn is_modal_open(&self) -> bool {
        matches!(self.modal, ModalState::Open(_))
    }

    /// Background scrolling is locked while the overlay is open.
    pub fn scroll_locked(&self) -> bool {
        self.is_modal_open()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn find(&self, id: &str) -> Option<&ProjectRecord> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn dispatch(&mut self, command: Command) -> Effect {
        tracing::trace!(?command, "dispatch");
        match command {
            Command::SetFilter(tag) => self.set_filter(&tag),
            Command::SetTagFilter(filter) => self.set_tag_filter(filter),
            Command::SetFeaturedOnly(on) => self.set_featured_only(on),
            Command::ToggleFeaturedOnly => self.toggle_featured_only(),
            Command::SetSort(order) => self.set_sort(order),
            Command::CycleSort => self.cycle_sort(),
            Command::ClearFilters => self.clear_all_filters(),
            Command::OpenDetail(id) => self.open_detail(&id),
            Command::CloseDetail(reason) => self.close_detail(reason),
        }
    }

    pub fn set_filter(&mut self, tag: &str) -> Effect {
        self.set_tag_filter(TagFilter::parse(tag))
    }

    /// Install an already-resolved filter; a tag spelled "All" stays a tag.
    pub fn set_tag_filter(&mut self, filter: TagFilter) -> Effect {
        self.filter.active_tag = filter;
        self.recompute()
    }

    pub fn set_featured_only(&mut self, featured_only: bool) -> Effect {
        self.filter.featured_only = featured_only;
        self.recompute()
    }

    pub fn toggle_featured_only(&mut self) -> Effect {
        self.set_featured_only(!self.filter.featured_only)
    }

    pub fn set_sort(&mut self, order: SortOrder) -> Effect {
        self.filter.sort_order = order;
        self.recompute()
    }

    pub fn cycle_sort(&mut self) -> Effect {
        self.set_sort(self.filter.sort_order.next())
    }

    pub fn clear_all_filters(&mut self) -> Effect {
        self.filter = FilterState::default();
        self.recompute()
    }

    pub fn open_detail(&mut self, id: &str) -> Effect {
        let Some(record) = self.find(id) else {
            tracing::debug!(id, "detail requested for unknown project");
            return Effect::Unchanged;
        };
        self.modal = ModalState::Open(DetailView::from_record(record));
        self.focus_anchor = Some(id.to_string());
        Effect::ModalOpened
    }

    pub fn close_detail(&mut self, reason: CloseReason) -> Effect {
        if !self.is_modal_open() {
            return Effect::Unchanged;
        }
        tracing::debug!(?reason, "detail closed");
        self.modal = ModalState::Closed;
        let focus = self
            .focus_anchor
            .clone()
            .filter(|id| self.find(id).is_some());
        Effect::ModalClosed { focus }
    }

    fn recompute(&mut self) -> Effect {
        self.visible = visible_set(&self.projects, &self.filter);
        Effect::Recomputed
    }

    pub fn summary(&self) -> FilterSummary {
        let mut chips = Vec::new();
        if let TagFilter::Tag(tag) = &self.filter.active_tag {
            chips.push(format!("Tag: {}", tag));
        }
        if self.filter.featured_only {
            chips.push("Featured only".to_string());
        }
        if self.filter.sort_order != SortOrder::default() {
            chips.push(format!("Sort: {}", self.filter.sort_order.label()));
        }
        if chips.is_empty() {
            FilterSummary {
                chips: vec!["All projects".to_string()],
                show_clear: false,
            }
        } else {
            FilterSummary {
                chips,
                show_clear: true,
            }
        }
    }

    pub fn view(&self) -> ShowcaseView<'_> {
        let mut shown = vec![false; self.projects.len()];
        for &i in &self.visible {
            shown[i] = true;
        }
        let cards = self
            .projects
            .iter()
            .zip(shown)
            .map(|(record, visible)| CardView { record, visible })
            .collect();
        let ordered: Vec<&ProjectRecord> =
            self.visible.iter().map(|&i| &self.projects[i]).collect();

        ShowcaseView {
            cards,
            count_label: count_label(ordered.len(), self.projects.len()),
            no_results: ordered.is_empty(),
            ordered,
            summary: self.summary(),
        }
    }

    /// Known tags, de-duplicated case-insensitively and sorted.
    pub fn known_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for tag in self.projects.iter().flat_map(|p| p.tags.iter()) {
            let key = tag.to_lowercase();
            if !tags.iter().any(|t| t.to_lowercase() == key) {
                tags.push(tag.clone());
            }
        }
        tags.sort_by(|a, b| title_cmp(a, b));
        tags
    }

    /// The tag filter following the active one when cycling: all, then each
    /// known tag in order, then back to all.
    pub fn next_tag(&self) -> TagFilter {
        let tags = self.known_tags();
        match &self.filter.active_tag {
            TagFilter::All => tags.first().cloned().map_or(TagFilter::All, TagFilter::Tag),
            TagFilter::Tag(current) => {
                let current = current.to_lowercase();
                match tags.iter().position(|t| t.to_lowercase() == current) {
                    Some(i) if i + 1 < tags.len() => TagFilter::Tag(tags[i + 1].clone()),
                    Some(_) => TagFilter::All,
                    None => tags.first().cloned().map_or(TagFilter::All, TagFilter::Tag),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::{CaseStudy, Links, Metrics};
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn record(id: &str, title: &str, tags: &[&str], featured: bool, date: (i32, u32)) -> ProjectRecord {
        ProjectRecord {
            id: id.to_string(),
            title: title.to_string(),
            summary: String::new(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            featured,
            date_completed: NaiveDate::from_ymd_opt(date.0, date.1, 1).unwrap(),
            image: format!("/images/{id}.jpg"),
            image_alt: None,
            technologies: vec!["Rust".to_string(), "MQTT".to_string()],
            metrics: Metrics {
                improvement: "20%".to_string(),
                timeline: "3 months".to_string(),
                scale: "50 farms".to_string(),
            },
            case_study: CaseStudy {
                problem: "p".to_string(),
                solution: "s".to_string(),
                outcome: "o".to_string(),
                pdf_download: None,
            },
            links: Links::default(),
        }
    }

    fn abc() -> Showcase {
        Showcase::new(vec![
            record("A", "Alpha", &["IoT"], true, (2024, 1)),
            record("B", "Bravo", &["Mobile"], false, (2024, 6)),
            record("C", "Charlie", &["IoT", "Mobile"], true, (2024, 3)),
        ])
    }

    fn visible_ids(showcase: &Showcase) -> Vec<String> {
        showcase.view().ordered.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_default_view_is_date_descending() {
        let showcase = abc();
        assert_eq!(visible_ids(&showcase), vec!["B", "C", "A"]);
        assert_eq!(showcase.view().count_label, "3 projects");
    }

    #[test]
    fn test_tag_filter_is_case_insensitive() {
        let mut showcase = abc();
        showcase.set_filter("iot");
        assert_eq!(visible_ids(&showcase), vec!["C", "A"]);
        assert_eq!(showcase.view().count_label, "2 of 3 projects");
    }

    #[test]
    fn test_featured_only_with_tag() {
        let mut showcase = abc();
        showcase.set_filter("iot");
        showcase.set_featured_only(true);
        assert_eq!(visible_ids(&showcase), vec!["C", "A"]);

        showcase.set_filter("mobile");
        assert_eq!(visible_ids(&showcase), vec!["C"]);
    }

    #[test]
    fn test_cards_keep_source_order_and_toggle_visibility() {
        let mut showcase = abc();
        showcase.set_filter("mobile");
        let view = showcase.view();
        let cards: Vec<(&str, bool)> = view
            .cards
            .iter()
            .map(|c| (c.record.id.as_str(), c.visible))
            .collect();
        assert_eq!(cards, vec![("A", false), ("B", true), ("C", true)]);
    }

    #[test]
    fn test_unknown_tag_yields_no_results() {
        let mut showcase = abc();
        showcase.set_filter("blockchain");
        let view = showcase.view();
        assert!(view.no_results);
        assert_eq!(view.count_label, "0 of 3 projects");
        assert!(view.summary.show_clear);
    }

    #[test]
    fn test_empty_source_list() {
        let showcase = Showcase::new(Vec::new());
        let view = showcase.view();
        assert_eq!(view.count_label, "0 projects");
        assert!(view.no_results);
        assert_eq!(view.summary.chips, vec!["All projects"]);
        assert!(!view.summary.show_clear);
    }

    #[test]
    fn test_failed_load_renders_empty_state() {
        let err = LoadError::Interrupted("boom".to_string());
        let showcase = Showcase::from_load_result(Err(err));
        assert!(showcase.projects().is_empty());
        assert!(showcase.view().no_results);
        assert!(showcase.load_error().unwrap().contains("boom"));
    }

    #[test]
    fn test_title_sort() {
        let mut showcase = Showcase::new(vec![
            record("z", "Zebra", &[], false, (2024, 1)),
            record("a", "Apple", &[], false, (2024, 2)),
        ]);
        showcase.set_sort(SortOrder::TitleAsc);
        let titles: Vec<&str> = showcase.view().ordered.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Apple", "Zebra"]);

        showcase.set_sort(SortOrder::TitleDesc);
        let titles: Vec<&str> = showcase.view().ordered.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Zebra", "Apple"]);
    }

    #[test]
    fn test_title_cmp_ignores_case() {
        assert_eq!(title_cmp("apple", "Banana"), Ordering::Less);
        assert_eq!(title_cmp("Zebra", "apple"), Ordering::Greater);
        assert_eq!(title_cmp("apple", "Apple"), Ordering::Less);
    }

    #[test]
    fn test_title_sort_places_accented_titles_by_base_letter() {
        let mut showcase = Showcase::new(vec![
            record("z", "Zebra", &[], false, (2024, 1)),
            record("e", "Élevage connecté", &[], false, (2024, 2)),
            record("a", "Apple", &[], false, (2024, 3)),
        ]);
        showcase.set_sort(SortOrder::TitleAsc);
        let titles: Vec<&str> = showcase.view().ordered.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Apple", "Élevage connecté", "Zebra"]);

        showcase.set_sort(SortOrder::TitleDesc);
        let titles: Vec<&str> = showcase.view().ordered.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Zebra", "Élevage connecté", "Apple"]);
    }

    #[test]
    fn test_title_cmp_ignores_accents_before_breaking_ties() {
        assert_eq!(title_cmp("émile", "Eric"), Ordering::Less);
        assert_eq!(title_cmp("Öko", "Zaun"), Ordering::Less);
        assert_eq!(title_cmp("cote", "côte"), Ordering::Less);
        assert_eq!(title_cmp("côte", "Côte"), Ordering::Less);
    }

    #[test]
    fn test_date_sort_is_stable_on_ties() {
        let mut showcase = Showcase::new(vec![
            record("first", "One", &[], false, (2024, 5)),
            record("second", "Two", &[], false, (2024, 5)),
            record("third", "Three", &[], false, (2023, 1)),
        ]);
        assert_eq!(visible_ids(&showcase), vec!["first", "second", "third"]);
        showcase.set_sort(SortOrder::DateAsc);
        assert_eq!(visible_ids(&showcase), vec!["third", "first", "second"]);
    }

    #[test]
    fn test_summary_chips() {
        let mut showcase = abc();
        showcase.set_filter("IoT");
        showcase.set_featured_only(true);
        showcase.set_sort(SortOrder::TitleAsc);
        let summary = showcase.summary();
        assert_eq!(
            summary.chips,
            vec!["Tag: IoT", "Featured only", "Sort: Title A-Z"]
        );
        assert!(summary.show_clear);
    }

    #[test]
    fn test_clear_filters_resets_everything() {
        let mut showcase = abc();
        showcase.dispatch(Command::SetFilter("mobile".to_string()));
        showcase.dispatch(Command::SetFeaturedOnly(true));
        showcase.dispatch(Command::SetSort(SortOrder::TitleDesc));
        showcase.dispatch(Command::ClearFilters);
        assert!(showcase.filter().is_default());
        assert_eq!(visible_ids(&showcase), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("title-asc".parse::<SortOrder>(), Ok(SortOrder::TitleAsc));
        assert_eq!("DATE-DESC".parse::<SortOrder>(), Ok(SortOrder::DateDesc));
        assert!("newest".parse::<SortOrder>().is_err());
        assert_eq!(SortOrder::TitleDesc.next(), SortOrder::DateDesc);
    }

    #[test]
    fn test_tag_filter_parse_only_accepts_exact_sentinel() {
        assert_eq!(TagFilter::parse("all"), TagFilter::All);
        assert_eq!(TagFilter::parse("All"), TagFilter::Tag("All".to_string()));
        assert_eq!(TagFilter::parse("ALL"), TagFilter::Tag("ALL".to_string()));
        assert_eq!(TagFilter::parse(""), TagFilter::Tag(String::new()));
        assert_eq!(TagFilter::parse(" IoT "), TagFilter::Tag(" IoT ".to_string()));
    }

    #[test]
    fn test_tag_filter_from_input_is_lenient() {
        assert_eq!(TagFilter::from_input("ALL"), TagFilter::All);
        assert_eq!(TagFilter::from_input("  "), TagFilter::All);
        assert_eq!(TagFilter::from_input(" IoT "), TagFilter::Tag("IoT".to_string()));
    }

    #[test]
    fn test_set_filter_with_capitalised_all_is_a_tag() {
        let mut showcase = Showcase::new(vec![
            record("a", "A", &["All"], false, (2024, 1)),
            record("b", "B", &["IoT"], false, (2024, 2)),
        ]);
        showcase.set_filter("All");
        assert_eq!(showcase.filter().active_tag, TagFilter::Tag("All".to_string()));
        assert_eq!(showcase.view().count_label, "1 of 2 projects");

        showcase.set_filter("");
        assert!(showcase.view().no_results);

        showcase.set_filter("all");
        assert!(showcase.filter().is_default());
    }

    #[test]
    fn test_open_missing_detail_is_noop() {
        let mut showcase = abc();
        let effect = showcase.dispatch(Command::OpenDetail("missing-id".to_string()));
        assert_eq!(effect, Effect::Unchanged);
        assert_eq!(*showcase.modal(), ModalState::Closed);
        assert!(!showcase.scroll_locked());
    }

    #[test]
    fn test_open_and_close_detail() {
        let mut showcase = abc();
        assert_eq!(showcase.open_detail("C"), Effect::ModalOpened);
        assert!(showcase.scroll_locked());
        let detail = showcase.detail().unwrap();
        assert_eq!(detail.title, "Charlie");
        assert_eq!(detail.image_alt, "Charlie");
        assert_eq!(detail.technologies, vec!["Rust", "MQTT"]);
        assert!(detail.links.is_empty());

        let effect = showcase.close_detail(CloseReason::OutsideClick);
        assert_eq!(
            effect,
            Effect::ModalClosed {
                focus: Some("C".to_string())
            }
        );
        assert!(!showcase.scroll_locked());
        assert_eq!(showcase.close_detail(CloseReason::Cancel), Effect::Unchanged);
    }

    #[test]
    fn test_open_while_open_replaces_content() {
        let mut showcase = abc();
        showcase.open_detail("A");
        showcase.open_detail("B");
        assert_eq!(showcase.detail().unwrap().id, "B");
        assert_eq!(
            showcase.close_detail(CloseReason::Explicit),
            Effect::ModalClosed {
                focus: Some("B".to_string())
            }
        );
        assert!(!showcase.is_modal_open());
    }

    #[test]
    fn test_detail_links_only_when_present() {
        let mut r = record("x", "X", &[], false, (2024, 1));
        r.links.github = Some("https://github.com/example/x".to_string());
        r.case_study.pdf_download = Some("/pdf/x.pdf".to_string());
        r.links.demo = Some("   ".to_string());
        let detail = DetailView::from_record(&r);
        let kinds: Vec<LinkKind> = detail.links.iter().map(|l| l.kind).collect();
        assert_eq!(kinds, vec![LinkKind::Source, LinkKind::CaseStudyPdf]);
        assert_eq!(detail.link(LinkKind::Demo), None);
        assert_eq!(detail.link(LinkKind::CaseStudyPdf), Some("/pdf/x.pdf"));
    }

    #[test]
    fn test_known_tags_and_cycling() {
        let mut showcase = Showcase::new(vec![
            record("a", "A", &["Mobile", "iot"], false, (2024, 1)),
            record("b", "B", &["IoT", "Drones"], false, (2024, 1)),
        ]);
        assert_eq!(showcase.known_tags(), vec!["Drones", "iot", "Mobile"]);

        assert_eq!(showcase.next_tag(), TagFilter::Tag("Drones".to_string()));
        showcase.set_filter("drones");
        assert_eq!(showcase.next_tag(), TagFilter::Tag("iot".to_string()));
        showcase.set_filter("Mobile");
        assert_eq!(showcase.next_tag(), TagFilter::All);
    }

    #[test]
    fn test_cycling_reaches_tag_after_one_named_all() {
        let mut showcase = Showcase::new(vec![
            record("a", "A", &["All"], false, (2024, 1)),
            record("b", "B", &["IoT"], false, (2024, 2)),
        ]);
        let mut seen = Vec::new();
        for _ in 0..3 {
            let next = showcase.next_tag();
            seen.push(next.clone());
            showcase.dispatch(Command::SetTagFilter(next));
        }
        assert_eq!(
            seen,
            vec![
                TagFilter::Tag("All".to_string()),
                TagFilter::Tag("IoT".to_string()),
                TagFilter::All,
            ]
        );
    }

    const TAG_POOL: [&str; 5] = ["IoT", "iot", "Mobile", "Drones", "Soil"];
    const TITLE_POOL: [&str; 6] = ["Apple", "apple", "Zebra", "Mango", "banana", "Kiwi"];

    fn arb_record(index: usize) -> impl Strategy<Value = ProjectRecord> {
        (
            proptest::sample::subsequence(TAG_POOL.to_vec(), 0..=3),
            any::<bool>(),
            0u32..6,
            0usize..TITLE_POOL.len(),
        )
            .prop_map(move |(tags, featured, month, title)| {
                record(
                    &format!("p{index}"),
                    TITLE_POOL[title],
                    &tags,
                    featured,
                    (2024, month + 1),
                )
            })
    }

    fn arb_projects() -> impl Strategy<Value = Vec<ProjectRecord>> {
        (0usize..12).prop_flat_map(|n| (0..n).map(arb_record).collect::<Vec<_>>())
    }

    fn arb_filter() -> impl Strategy<Value = FilterState> {
        (
            prop_oneof![
                Just(TagFilter::All),
                proptest::sample::select(vec!["iot", "MOBILE", "drones", "unknown"])
                    .prop_map(|t| TagFilter::Tag(t.to_string())),
            ],
            any::<bool>(),
            proptest::sample::select(SortOrder::ALL.to_vec()),
        )
            .prop_map(|(active_tag, featured_only, sort_order)| FilterState {
                active_tag,
                featured_only,
                sort_order,
            })
    }

    proptest! {
        #[test]
        fn prop_visible_set_is_exact_and_ordered(projects in arb_projects(), filter in arb_filter()) {
            let visible = visible_set(&projects, &filter);

            let expected = projects.iter().filter(|p| filter.matches(p)).count();
            prop_assert_eq!(visible.len(), expected);

            let mut seen = std::collections::HashSet::new();
            for &i in &visible {
                prop_assert!(i < projects.len());
                prop_assert!(seen.insert(i));
                prop_assert!(filter.matches(&projects[i]));
            }

            for pair in visible.windows(2) {
                let ord = filter.sort_order.compare(&projects[pair[0]], &projects[pair[1]]);
                prop_assert_ne!(ord, Ordering::Greater);
                if ord == Ordering::Equal {
                    prop_assert!(pair[0] < pair[1]);
                }
            }
        }

        #[test]
        fn prop_clear_is_idempotent(projects in arb_projects(), filter in arb_filter()) {
            let mut showcase = Showcase::new(projects);
            showcase.set_tag_filter(filter.active_tag.clone());
            showcase.set_featured_only(filter.featured_only);
            showcase.set_sort(filter.sort_order);

            showcase.clear_all_filters();
            let once = (showcase.filter().clone(), showcase.visible().to_vec());
            showcase.clear_all_filters();
            let twice = (showcase.filter().clone(), showcase.visible().to_vec());
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn prop_filter_round_trip(projects in arb_projects(), tag in "[A-Za-z]{1,8}") {
            let mut showcase = Showcase::new(projects);
            let original = showcase.visible().to_vec();
            showcase.set_filter(&tag);
            showcase.set_filter("all");
            prop_assert_eq!(showcase.visible().to_vec(), original);
            prop_assert!(showcase.filter().is_default());
        }
    }
}
