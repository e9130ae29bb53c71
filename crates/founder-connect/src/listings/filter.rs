use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{Founder, Job, Listing};

/// Decides whether one selected option applies to a record.
pub type OptionMatcher<R> = fn(&R, &str) -> bool;

/// Named category of checkbox options. Selected options inside a group are OR-ed.
#[derive(Clone)]
pub struct FilterGroup<R> {
    pub key: &'static str,
    pub label: &'static str,
    pub options: Vec<&'static str>,
    matcher: OptionMatcher<R>,
}

impl<R> FilterGroup<R> {
    pub fn new(
        key: &'static str,
        label: &'static str,
        options: Vec<&'static str>,
        matcher: OptionMatcher<R>,
    ) -> Self {
        Self {
            key,
            label,
            options,
            matcher,
        }
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|known| *known == option)
    }

    /// True when any of `selected` applies to `record`.
    pub fn matches_any<'s>(&self, record: &R, selected: impl IntoIterator<Item = &'s str>) -> bool {
        selected
            .into_iter()
            .any(|option| (self.matcher)(record, option))
    }

    pub fn view(&self) -> FilterGroupView {
        FilterGroupView {
            key: self.key,
            label: self.label,
            options: self.options.clone(),
        }
    }
}

impl<R> fmt::Debug for FilterGroup<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterGroup")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("options", &self.options)
            .finish()
    }
}

/// Serializable description of a filter group for rendering the sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterGroupView {
    pub key: &'static str,
    pub label: &'static str,
    pub options: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("unknown filter group '{0}'")]
    UnknownGroup(String),
    #[error("'{option}' is not an option of filter group '{group}'")]
    UnknownOption { group: String, option: String },
}

/// The filter groups defined for one kind of listing.
#[derive(Debug, Clone)]
pub struct FilterCatalog<R> {
    groups: Vec<FilterGroup<R>>,
}

impl<R: Listing> FilterCatalog<R> {
    pub fn new(groups: Vec<FilterGroup<R>>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[FilterGroup<R>] {
        &self.groups
    }

    pub fn group(&self, key: &str) -> Option<&FilterGroup<R>> {
        self.groups.iter().find(|group| group.key == key)
    }

    pub fn views(&self) -> Vec<FilterGroupView> {
        self.groups.iter().map(FilterGroup::view).collect()
    }

    /// Validates raw `group -> options` input into a selection.
    pub fn selection_from(
        &self,
        raw: &BTreeMap<String, Vec<String>>,
    ) -> Result<FilterSelection, FilterError> {
        let mut selection = FilterSelection::default();
        for (group, options) in raw {
            for option in options {
                selection.select(self, group, option)?;
            }
        }
        Ok(selection)
    }

    /// Computes the visible subset of `records` for `query`, preserving input order.
    pub fn apply<'a>(&self, records: &'a [R], query: &ListingQuery) -> Vec<&'a R> {
        let needle = query.text.trim().to_lowercase();

        records
            .iter()
            .filter(|record| !query.toggles.bookmarked_only || record.is_bookmarked())
            .filter(|record| needle.is_empty() || matches_text(*record, &needle))
            .filter(|record| self.matches_selection(record, &query.selection))
            .collect()
    }

    fn matches_selection(&self, record: &R, selection: &FilterSelection) -> bool {
        self.groups.iter().all(|group| {
            let selected = selection.selected(group.key);
            selected.is_empty() || group.matches_any(record, selected.iter().copied())
        })
    }
}

fn matches_text<R: Listing>(record: &R, needle: &str) -> bool {
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Convenience wrapper over [`FilterCatalog::apply`].
pub fn filter_records<'a, R: Listing>(
    catalog: &FilterCatalog<R>,
    records: &'a [R],
    query: &ListingQuery,
) -> Vec<&'a R> {
    catalog.apply(records, query)
}

/// Selected options per group. Only constructed through a catalog, so every option is part of
/// its group's vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterSelection {
    groups: BTreeMap<String, BTreeSet<String>>,
}

impl FilterSelection {
    pub fn select<R: Listing>(
        &mut self,
        catalog: &FilterCatalog<R>,
        group: &str,
        option: &str,
    ) -> Result<(), FilterError> {
        let definition = catalog
            .group(group)
            .ok_or_else(|| FilterError::UnknownGroup(group.to_string()))?;
        if !definition.has_option(option) {
            return Err(FilterError::UnknownOption {
                group: group.to_string(),
                option: option.to_string(),
            });
        }

        self.groups
            .entry(group.to_string())
            .or_default()
            .insert(option.to_string());
        Ok(())
    }

    /// Flips a checkbox, returning whether the option is now selected.
    pub fn toggle<R: Listing>(
        &mut self,
        catalog: &FilterCatalog<R>,
        group: &str,
        option: &str,
    ) -> Result<bool, FilterError> {
        if self.deselect(group, option) {
            return Ok(false);
        }
        self.select(catalog, group, option)?;
        Ok(true)
    }

    pub fn deselect(&mut self, group: &str, option: &str) -> bool {
        let Some(options) = self.groups.get_mut(group) else {
            return false;
        };
        let removed = options.remove(option);
        if options.is_empty() {
            self.groups.remove(group);
        }
        removed
    }

    pub fn selected(&self, group: &str) -> Vec<&str> {
        self.groups
            .get(group)
            .map(|options| options.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn active_groups(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn clear_group(&mut self, group: &str) {
        self.groups.remove(group);
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

/// Auxiliary switches shown next to the filter groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterToggles {
    #[serde(default)]
    pub bookmarked_only: bool,
}

/// Everything that determines a listing page's visible records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    pub text: String,
    pub selection: FilterSelection,
    pub toggles: FilterToggles,
}

impl ListingQuery {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Wildcard options such as "Any Location" match every record.
pub fn location_matches(location: &str, option: &str) -> bool {
    if option.starts_with("Any ") {
        return true;
    }
    location.to_lowercase().contains(&option.to_lowercase())
}

fn contains_ignore_case(values: &[String], option: &str) -> bool {
    values.iter().any(|value| value.eq_ignore_ascii_case(option))
}

const STAGE_OPTIONS: [&str; 5] = ["Idea", "MVP", "Pre-seed", "Seed", "Series A"];
const LOCATION_OPTIONS: [&str; 6] = [
    "Any Location",
    "Remote",
    "Boston",
    "Cambridge",
    "New York",
    "San Francisco",
];

/// Filter groups of the jobs board.
pub fn job_filters() -> FilterCatalog<Job> {
    FilterCatalog::new(vec![
        FilterGroup::new(
            "job_type",
            "Job Type",
            vec!["Full-time", "Part-time", "Internship", "Contract"],
            |job: &Job, option: &str| job.job_type.eq_ignore_ascii_case(option),
        ),
        FilterGroup::new(
            "location",
            "Location",
            LOCATION_OPTIONS.to_vec(),
            |job: &Job, option: &str| location_matches(&job.location, option),
        ),
        FilterGroup::new(
            "stage",
            "Startup Stage",
            STAGE_OPTIONS.to_vec(),
            |job: &Job, option: &str| job.stage.eq_ignore_ascii_case(option),
        ),
        FilterGroup::new(
            "compensation",
            "Compensation",
            vec!["Paid", "Equity", "Paid + Equity", "Unpaid"],
            |job: &Job, option: &str| job.compensation.eq_ignore_ascii_case(option),
        ),
    ])
}

/// Filter groups of the co-founder matches page.
pub fn founder_filters() -> FilterCatalog<Founder> {
    FilterCatalog::new(vec![
        FilterGroup::new(
            "commitment",
            "Time Commitment",
            vec!["Full-time", "Part-time", "Weekends", "Flexible"],
            |founder: &Founder, option: &str| contains_ignore_case(&founder.availability, option),
        ),
        FilterGroup::new(
            "interests",
            "Industry",
            vec![
                "AI/ML",
                "Fintech",
                "Healthtech",
                "Edtech",
                "Climate",
                "Consumer",
                "Developer Tools",
            ],
            |founder: &Founder, option: &str| contains_ignore_case(&founder.interests, option),
        ),
        FilterGroup::new(
            "looking_for",
            "Looking For",
            vec![
                "Technical Co-founder",
                "Business Co-founder",
                "Design Co-founder",
                "Advisor",
            ],
            |founder: &Founder, option: &str| contains_ignore_case(&founder.looking_for, option),
        ),
        FilterGroup::new(
            "skills",
            "Skills",
            vec![
                "React",
                "Python",
                "Rust",
                "Machine Learning",
                "UI Design",
                "Product Management",
                "Digital Marketing",
                "Sales",
                "Fundraising",
            ],
            |founder: &Founder, option: &str| contains_ignore_case(&founder.skills, option),
        ),
        FilterGroup::new(
            "stage",
            "Startup Stage",
            STAGE_OPTIONS.to_vec(),
            |founder: &Founder, option: &str| founder.stage.eq_ignore_ascii_case(option),
        ),
        FilterGroup::new(
            "location",
            "Location",
            LOCATION_OPTIONS.to_vec(),
            |founder: &Founder, option: &str| location_matches(&founder.location, option),
        ),
    ])
}
