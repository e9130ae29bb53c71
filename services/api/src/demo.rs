use crate::infra::Services;
use clap::{Args, ValueEnum};
use founder_connect::config::AppConfig;
use founder_connect::error::AppError;
use founder_connect::listings::{Founder, FounderSort, Job, JobSort, SearchPage, SearchRequest};
use founder_connect::pagination::PageMarker;
use founder_connect::wizard::{CompletionReceipt, FlowKind, FormData, ReplyKind, WizardService};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Args, Debug, Default)]
pub(crate) struct JobsArgs {
    /// Free-text query matched against title, company, skills and description
    pub(crate) query: Option<String>,
    /// Filter as GROUP=OPTION (e.g. location=Boston); repeat to combine
    #[arg(long = "filter", value_parser = parse_filter)]
    pub(crate) filters: Vec<(String, String)>,
    /// Only show bookmarked jobs
    #[arg(long)]
    pub(crate) bookmarked: bool,
    /// Sort order
    #[arg(long, value_enum, default_value_t = JobSortArg::Newest)]
    pub(crate) sort: JobSortArg,
    /// Page to show (1-based)
    #[arg(long, default_value_t = 1)]
    pub(crate) page: usize,
}

#[derive(Args, Debug, Default)]
pub(crate) struct FoundersArgs {
    /// Free-text query matched against name, role, skills, interests and one-liner
    pub(crate) query: Option<String>,
    /// Filter as GROUP=OPTION (e.g. looking_for=Technical Co-founder); repeat to combine
    #[arg(long = "filter", value_parser = parse_filter)]
    pub(crate) filters: Vec<(String, String)>,
    /// Only show bookmarked founders
    #[arg(long)]
    pub(crate) bookmarked: bool,
    /// Sort order
    #[arg(long, value_enum, default_value_t = FounderSortArg::BestMatch)]
    pub(crate) sort: FounderSortArg,
    /// Page to show (1-based)
    #[arg(long, default_value_t = 1)]
    pub(crate) page: usize,
}

#[derive(Args, Debug, Default)]
pub(crate) struct SkillsArgs {
    /// Partial skill name or acronym; omit to browse
    pub(crate) query: Option<String>,
    /// Restrict suggestions to one category
    #[arg(long)]
    pub(crate) category: Option<String>,
    /// Maximum number of suggestions
    #[arg(long)]
    pub(crate) limit: Option<usize>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Override the wizard transition delay in milliseconds
    #[arg(long)]
    pub(crate) delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum JobSortArg {
    #[default]
    Newest,
    Oldest,
    Title,
}

impl From<JobSortArg> for JobSort {
    fn from(value: JobSortArg) -> Self {
        match value {
            JobSortArg::Newest => JobSort::Newest,
            JobSortArg::Oldest => JobSort::Oldest,
            JobSortArg::Title => JobSort::Title,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum FounderSortArg {
    #[default]
    BestMatch,
    Name,
}

impl From<FounderSortArg> for FounderSort {
    fn from(value: FounderSortArg) -> Self {
        match value {
            FounderSortArg::BestMatch => FounderSort::BestMatch,
            FounderSortArg::Name => FounderSort::Name,
        }
    }
}

pub(crate) fn parse_filter(value: &str) -> Result<(String, String), String> {
    let (group, option) = value
        .split_once('=')
        .ok_or_else(|| format!("expected GROUP=OPTION, got '{value}'"))?;
    let (group, option) = (group.trim(), option.trim());
    if group.is_empty() || option.is_empty() {
        return Err(format!("expected GROUP=OPTION, got '{value}'"));
    }
    Ok((group.to_string(), option.to_string()))
}

fn group_filters(filters: Vec<(String, String)>) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (group, option) in filters {
        grouped.entry(group).or_default().push(option);
    }
    grouped
}

fn load_services() -> Result<(AppConfig, Services), AppError> {
    let config = AppConfig::load()?;
    let services = Services::seeded(
        config.listings.items_per_page,
        config.wizard.transition_delay(),
    );
    Ok((config, services))
}

pub(crate) fn run_jobs(args: JobsArgs) -> Result<(), AppError> {
    let (_, services) = load_services()?;
    let page = services.jobs.search(SearchRequest {
        query: args.query.unwrap_or_default(),
        filters: group_filters(args.filters),
        bookmarked_only: args.bookmarked,
        sort: JobSort::from(args.sort),
        page: args.page,
    })?;

    render_page("Jobs", &page, render_job);
    Ok(())
}

pub(crate) fn run_founders(args: FoundersArgs) -> Result<(), AppError> {
    let (_, services) = load_services()?;
    let page = services.founders.search(SearchRequest {
        query: args.query.unwrap_or_default(),
        filters: group_filters(args.filters),
        bookmarked_only: args.bookmarked,
        sort: FounderSort::from(args.sort),
        page: args.page,
    })?;

    render_page("Co-founder matches", &page, render_founder);
    Ok(())
}

pub(crate) fn run_skills(args: SkillsArgs) -> Result<(), AppError> {
    let (_, services) = load_services()?;
    let vocabulary = &services.vocabulary;

    if args.query.is_none() && args.category.is_none() {
        println!("Skill categories");
        for category in vocabulary.categories() {
            println!("- {category}");
            for subcategory in vocabulary.subcategories(category)? {
                println!("    {subcategory}");
            }
        }
        return Ok(());
    }

    let query = args.query.unwrap_or_default();
    let suggestions = vocabulary.search(&query, args.category.as_deref(), args.limit)?;
    if suggestions.is_empty() {
        println!("No skills match '{query}'.");
    }
    for skill in suggestions {
        println!("- {skill}");
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let delay = args
        .delay_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.wizard.transition_delay());
    let services = Services::seeded(config.listings.items_per_page, delay);

    println!("FounderConnect demo (transition delay {} ms)", delay.as_millis());

    let landing = complete_flow(
        &services.wizards,
        FlowKind::Landing,
        FormData::new(),
        vec![
            FormData::new().with("looking_for", vec!["A co-founder", "Talent for my team"]),
            FormData::new().with("email", "maya.chen@northeastern.edu"),
        ],
    )
    .await?;
    let prefill = landing.map(|receipt| receipt.prefill).unwrap_or_default();

    complete_flow(
        &services.wizards,
        FlowKind::SignUp,
        prefill,
        vec![
            FormData::new().with("full_name", "Maya Chen"),
            FormData::new(),
            FormData::new().with("password", "founders-unite"),
            FormData::new().with("university", "Northeastern University"),
            FormData::new().with("looking_for", vec!["Find a co-founder", "Hire for my startup"]),
            FormData::new().with("skills", vec!["Product Management", "Figma"]),
            FormData::new().with(
                "bio",
                "Second-year business student building a meal-planning app for dorms.",
            ),
        ],
    )
    .await?;

    complete_flow(
        &services.wizards,
        FlowKind::CreateJob,
        FormData::new(),
        vec![
            FormData::new().with("title", "Founding Mobile Engineer"),
            FormData::new().with("company", "DormDish"),
            FormData::new().with("job_type", "Part-time"),
            FormData::new().with("location", "Boston, MA"),
            FormData::new().with("stage", "MVP"),
            FormData::new().with("skills", vec!["React Native", "Swift"]),
            FormData::new().with(
                "description",
                "Ship the first iOS and Android release and own the app's architecture.",
            ),
            FormData::new().with("compensation", "Equity"),
        ],
    )
    .await?;

    let boston = services.jobs.search(SearchRequest {
        filters: group_filters(vec![("location".to_string(), "Boston".to_string())]),
        ..SearchRequest::<JobSort>::default()
    })?;
    println!();
    render_page("Jobs in Boston", &boston, render_job);

    let business = services.founders.search(SearchRequest {
        filters: group_filters(vec![(
            "looking_for".to_string(),
            "Business Co-founder".to_string(),
        )]),
        ..SearchRequest::<FounderSort>::default()
    })?;
    println!();
    render_page("Founders looking for a business co-founder", &business, render_founder);

    let suggestions = services.vocabulary.search("ml", None, Some(3))?;
    println!("\nSkill suggestions for 'ml': {}", suggestions.join(", "));
    Ok(())
}

async fn complete_flow(
    wizards: &WizardService,
    kind: FlowKind,
    prefill: FormData,
    answers: Vec<FormData>,
) -> Result<Option<CompletionReceipt>, AppError> {
    let mut view = wizards.start(kind, prefill).await?;
    let id = view.id.clone();
    println!("\n{} wizard {} ({} steps)", kind.label(), id, view.total_steps);

    for answer in answers {
        println!("  [{:>3.0}%] {}", view.progress, view.step.title);
        wizards.answer(&id, answer).await?;
        let reply = wizards.next(&id).await?;
        match reply.outcome {
            ReplyKind::Completed => {
                if let Some(receipt) = &reply.receipt {
                    println!("  done -> {}", receipt.redirect);
                    if let Some(message) = &receipt.message {
                        println!("  {message}");
                    }
                }
                return Ok(reply.receipt);
            }
            ReplyKind::SubmissionFailed => {
                println!(
                    "  submission failed: {}",
                    reply.wizard.error.unwrap_or_default()
                );
                return Ok(None);
            }
            ReplyKind::Moved | ReplyKind::Stayed => view = reply.wizard,
        }
    }
    Ok(None)
}

fn render_page<R>(title: &str, page: &SearchPage<R>, render: fn(&R) -> String) {
    println!(
        "{title} (page {} of {}, {} matches)",
        page.current_page, page.total_pages, page.total_items
    );
    if page.empty {
        println!("  Nothing matches. Clear a filter or try a different search.");
        return;
    }
    for item in &page.items {
        println!("  {}", render(item));
    }
    if page.total_pages > 1 {
        println!("  Pages: {}", render_markers(&page.page_numbers));
    }
}

fn render_markers(markers: &[PageMarker]) -> String {
    markers
        .iter()
        .map(|marker| match marker {
            PageMarker::Page(number) => number.to_string(),
            PageMarker::Ellipsis => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_job(job: &Job) -> String {
    let bookmark = if job.is_bookmarked { "*" } else { " " };
    format!(
        "{bookmark} {} | {} at {} | {} | {} | {} | posted {}",
        job.id.0,
        job.title,
        job.company,
        job.location,
        job.job_type,
        job.compensation,
        job.posted_on
    )
}

fn render_founder(founder: &Founder) -> String {
    let bookmark = if founder.is_bookmarked { "*" } else { " " };
    format!(
        "{bookmark} {} | {} ({}) | {} | {}% match | {}",
        founder.id.0,
        founder.name,
        founder.role,
        founder.university,
        founder.match_score,
        founder.skills.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_split_on_the_first_equals_sign() {
        assert_eq!(
            parse_filter("looking_for = Technical Co-founder"),
            Ok((
                "looking_for".to_string(),
                "Technical Co-founder".to_string()
            ))
        );
        assert!(parse_filter("location").is_err());
        assert!(parse_filter("=Boston").is_err());
    }

    #[test]
    fn repeated_groups_are_combined() {
        let grouped = group_filters(vec![
            ("location".to_string(), "Boston".to_string()),
            ("location".to_string(), "Remote".to_string()),
            ("stage".to_string(), "Seed".to_string()),
        ]);
        assert_eq!(grouped["location"], vec!["Boston", "Remote"]);
        assert_eq!(grouped["stage"], vec!["Seed"]);
    }

    #[test]
    fn markers_render_with_ellipses() {
        let markers = founder_connect::pagination::page_numbers(4, 10);
        assert_eq!(render_markers(&markers), "1 ... 3 4 5 ... 10");
    }

    #[tokio::test]
    async fn scripted_flows_complete() {
        let services = Services::seeded(10, Duration::ZERO);
        let receipt = complete_flow(
            &services.wizards,
            FlowKind::Landing,
            FormData::new(),
            vec![
                FormData::new().with("looking_for", vec!["A co-founder"]),
                FormData::new().with("email", "maya@northeastern.edu"),
            ],
        )
        .await
        .expect("flow runs")
        .expect("flow completes");

        assert_eq!(receipt.redirect, "/signup");
        assert_eq!(receipt.prefill.text("email"), "maya@northeastern.edu");
    }
}
