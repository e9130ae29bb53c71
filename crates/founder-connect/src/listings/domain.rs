use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for job postings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(pub String);

/// Identifier wrapper for founder profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FounderId(pub String);

/// Role posted by a student startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: String,
    pub job_type: String,
    pub stage: String,
    pub compensation: String,
    pub skills: Vec<String>,
    pub posted_on: NaiveDate,
    #[serde(default)]
    pub is_bookmarked: bool,
}

/// Student founder looking for collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Founder {
    pub id: FounderId,
    pub name: String,
    pub role: String,
    pub university: String,
    pub one_liner: String,
    pub location: String,
    pub stage: String,
    pub skills: Vec<String>,
    pub interests: Vec<String>,
    pub availability: Vec<String>,
    pub looking_for: Vec<String>,
    pub match_score: u8,
    #[serde(default)]
    pub is_bookmarked: bool,
}

/// Common surface the search engine and repositories need from a listing record.
pub trait Listing: Clone + Send + Sync + 'static {
    /// Prefix of generated ids, e.g. `job` for `job-013`.
    const ID_PREFIX: &'static str;

    fn listing_id(&self) -> &str;

    fn assign_id(&mut self, id: String);

    /// Fields scanned by free-text search: name/title, role/company, skills, interests and
    /// the description or one-liner.
    fn search_fields(&self) -> Vec<&str>;

    fn is_bookmarked(&self) -> bool;

    fn set_bookmarked(&mut self, bookmarked: bool);
}

impl Listing for Job {
    const ID_PREFIX: &'static str = "job";

    fn listing_id(&self) -> &str {
        &self.id.0
    }

    fn assign_id(&mut self, id: String) {
        self.id = JobId(id);
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.company.as_str()];
        fields.extend(self.skills.iter().map(String::as_str));
        fields.push(self.description.as_str());
        fields
    }

    fn is_bookmarked(&self) -> bool {
        self.is_bookmarked
    }

    fn set_bookmarked(&mut self, bookmarked: bool) {
        self.is_bookmarked = bookmarked;
    }
}

impl Listing for Founder {
    const ID_PREFIX: &'static str = "founder";

    fn listing_id(&self) -> &str {
        &self.id.0
    }

    fn assign_id(&mut self, id: String) {
        self.id = FounderId(id);
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.role.as_str()];
        fields.extend(self.skills.iter().map(String::as_str));
        fields.extend(self.interests.iter().map(String::as_str));
        fields.push(self.one_liner.as_str());
        fields
    }

    fn is_bookmarked(&self) -> bool {
        self.is_bookmarked
    }

    fn set_bookmarked(&mut self, bookmarked: bool) {
        self.is_bookmarked = bookmarked;
    }
}

/// Orderings offered on the jobs page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobSort {
    #[default]
    Newest,
    Oldest,
    Title,
}

/// Orderings offered on the co-founder page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FounderSort {
    #[default]
    BestMatch,
    Name,
}

/// Stable ordering applied after filtering; ties keep their catalog order.
pub trait SortOrder<R>: Copy + Send + Sync + 'static {
    fn sort(self, records: &mut [R]);
}

impl SortOrder<Job> for JobSort {
    fn sort(self, records: &mut [Job]) {
        match self {
            JobSort::Newest => records.sort_by(|a, b| b.posted_on.cmp(&a.posted_on)),
            JobSort::Oldest => records.sort_by(|a, b| a.posted_on.cmp(&b.posted_on)),
            JobSort::Title => {
                records.sort_by(|a, b| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
            }
        }
    }
}

impl SortOrder<Founder> for FounderSort {
    fn sort(self, records: &mut [Founder]) {
        match self {
            FounderSort::BestMatch => records.sort_by(|a, b| b.match_score.cmp(&a.match_score)),
            FounderSort::Name => {
                records.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            }
        }
    }
}
