use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use super::rank_matches;

/// Nested skill catalog: category -> subcategory -> canonical skill names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillVocabulary {
    categories: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VocabularyError {
    #[error("unknown skill category '{0}'")]
    UnknownCategory(String),
}

impl SkillVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_skills<I, S>(mut self, category: &str, subcategory: &str, skills: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories
            .entry(category.to_string())
            .or_default()
            .entry(subcategory.to_string())
            .or_default()
            .extend(skills.into_iter().map(Into::into));
        self
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn subcategories(&self, category: &str) -> Result<Vec<&str>, VocabularyError> {
        let subcategories = self.category(category)?;
        Ok(subcategories.keys().map(String::as_str).collect())
    }

    /// Every skill across all categories, deduplicated by value (first occurrence wins).
    pub fn flatten(&self) -> Vec<&str> {
        dedup(
            self.categories
                .values()
                .flat_map(|subcategories| subcategories.values())
                .flatten(),
        )
    }

    pub fn skills_in(&self, category: &str) -> Result<Vec<&str>, VocabularyError> {
        let subcategories = self.category(category)?;
        Ok(dedup(subcategories.values().flatten()))
    }

    pub fn contains(&self, skill: &str) -> bool {
        self.flatten()
            .iter()
            .any(|known| known.eq_ignore_ascii_case(skill))
    }

    /// Ranked skill suggestions for `query`, optionally scoped to one category.
    ///
    /// A blank query browses the whole (scoped) vocabulary instead of returning nothing.
    pub fn search(
        &self,
        query: &str,
        category: Option<&str>,
        limit: Option<usize>,
    ) -> Result<Vec<String>, VocabularyError> {
        let candidates = match category {
            Some(category) => self.skills_in(category)?,
            None => self.flatten(),
        };

        let mut ranked = rank_matches(query, candidates);
        if let Some(limit) = limit {
            ranked.truncate(limit);
        }
        Ok(ranked)
    }

    fn category(
        &self,
        category: &str,
    ) -> Result<&BTreeMap<String, Vec<String>>, VocabularyError> {
        self.categories
            .get(category)
            .ok_or_else(|| VocabularyError::UnknownCategory(category.to_string()))
    }
}

fn dedup<'a>(skills: impl Iterator<Item = &'a String>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    skills
        .map(String::as_str)
        .filter(|skill| seen.insert(*skill))
        .collect()
}

/// Skill catalog offered by the profile and job-posting forms.
pub fn default_vocabulary() -> SkillVocabulary {
    SkillVocabulary::new()
        .with_skills(
            "Engineering",
            "Frontend",
            ["React", "TypeScript", "JavaScript", "Next.js", "HTML", "CSS"],
        )
        .with_skills(
            "Engineering",
            "Backend",
            ["Rust", "Go", "Python", "Node.js", "PostgreSQL", "GraphQL"],
        )
        .with_skills(
            "Engineering",
            "Mobile",
            ["Swift", "Kotlin", "React Native", "Flutter"],
        )
        .with_skills(
            "Engineering",
            "Data & AI",
            [
                "Machine Learning",
                "Natural Language Processing",
                "Computer Vision",
                "Data Analysis",
                "Python",
            ],
        )
        .with_skills(
            "Design",
            "Product Design",
            ["UI Design", "UX Research", "Figma", "Prototyping"],
        )
        .with_skills(
            "Design",
            "Brand",
            ["Brand Strategy", "Illustration", "Motion Design"],
        )
        .with_skills(
            "Business",
            "Growth",
            [
                "Digital Marketing",
                "Search Engine Optimization",
                "Content Strategy",
                "Community Building",
            ],
        )
        .with_skills(
            "Business",
            "Operations",
            [
                "Product Management",
                "Financial Modeling",
                "Fundraising",
                "Business Development",
                "Sales",
            ],
        )
}
