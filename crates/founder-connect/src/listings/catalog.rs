//! Seed listings served until a persistent store replaces the in-memory repositories.

use chrono::NaiveDate;

use super::domain::{Founder, FounderId, Job, JobId};

fn posted(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

struct JobSeed {
    id: &'static str,
    title: &'static str,
    company: &'static str,
    description: &'static str,
    location: &'static str,
    job_type: &'static str,
    stage: &'static str,
    compensation: &'static str,
    skills: &'static [&'static str],
    posted_on: (i32, u32, u32),
    bookmarked: bool,
}

impl JobSeed {
    fn build(&self) -> Job {
        let (year, month, day) = self.posted_on;
        Job {
            id: JobId(self.id.to_string()),
            title: self.title.to_string(),
            company: self.company.to_string(),
            description: self.description.to_string(),
            location: self.location.to_string(),
            job_type: self.job_type.to_string(),
            stage: self.stage.to_string(),
            compensation: self.compensation.to_string(),
            skills: tags(self.skills),
            posted_on: posted(year, month, day),
            is_bookmarked: self.bookmarked,
        }
    }
}

const JOB_SEEDS: [JobSeed; 12] = [
    JobSeed {
        id: "job-001",
        title: "Founding Frontend Engineer",
        company: "StudyStack",
        description: "Own the React web app that helps students share course notes.",
        location: "Boston, MA",
        job_type: "Full-time",
        stage: "Seed",
        compensation: "Paid + Equity",
        skills: &["React", "TypeScript", "CSS"],
        posted_on: (2024, 9, 2),
        bookmarked: true,
    },
    JobSeed {
        id: "job-002",
        title: "Machine Learning Intern",
        company: "CarbonLens",
        description: "Build models that estimate campus building emissions from sensor data.",
        location: "Cambridge, MA",
        job_type: "Internship",
        stage: "Pre-seed",
        compensation: "Paid",
        skills: &["Python", "Machine Learning", "Data Analysis"],
        posted_on: (2024, 9, 5),
        bookmarked: false,
    },
    JobSeed {
        id: "job-003",
        title: "Product Designer",
        company: "MealMate",
        description: "Design the ordering flow for a student meal-sharing marketplace.",
        location: "Remote",
        job_type: "Part-time",
        stage: "MVP",
        compensation: "Equity",
        skills: &["Figma", "UI Design", "Prototyping"],
        posted_on: (2024, 8, 28),
        bookmarked: false,
    },
    JobSeed {
        id: "job-004",
        title: "Backend Engineer (Rust)",
        company: "LedgerLoop",
        description: "Scale the payments ledger behind peer-to-peer tuition splitting.",
        location: "New York, NY",
        job_type: "Full-time",
        stage: "Series A",
        compensation: "Paid + Equity",
        skills: &["Rust", "PostgreSQL", "GraphQL"],
        posted_on: (2024, 9, 10),
        bookmarked: false,
    },
    JobSeed {
        id: "job-005",
        title: "Growth Marketing Lead",
        company: "StudyStack",
        description: "Run campus ambassador programs and paid acquisition experiments.",
        location: "Boston, MA",
        job_type: "Part-time",
        stage: "Seed",
        compensation: "Paid",
        skills: &["Digital Marketing", "Content Strategy", "Community Building"],
        posted_on: (2024, 8, 19),
        bookmarked: true,
    },
    JobSeed {
        id: "job-006",
        title: "iOS Developer",
        company: "PulseCheck",
        description: "Ship the SwiftUI app that tracks student athlete recovery.",
        location: "San Francisco, CA",
        job_type: "Contract",
        stage: "MVP",
        compensation: "Paid",
        skills: &["Swift", "React Native"],
        posted_on: (2024, 9, 1),
        bookmarked: false,
    },
    JobSeed {
        id: "job-007",
        title: "Data Analyst",
        company: "CarbonLens",
        description: "Turn building telemetry into dashboards for facilities teams.",
        location: "Remote",
        job_type: "Part-time",
        stage: "Pre-seed",
        compensation: "Paid",
        skills: &["Python", "Data Analysis", "PostgreSQL"],
        posted_on: (2024, 7, 30),
        bookmarked: false,
    },
    JobSeed {
        id: "job-008",
        title: "Founding Full-Stack Engineer",
        company: "TutorTrack",
        description: "Build scheduling and payments for peer tutoring from zero to one.",
        location: "Cambridge, MA",
        job_type: "Full-time",
        stage: "Idea",
        compensation: "Equity",
        skills: &["Next.js", "Node.js", "PostgreSQL"],
        posted_on: (2024, 9, 12),
        bookmarked: false,
    },
    JobSeed {
        id: "job-009",
        title: "Business Development Associate",
        company: "LedgerLoop",
        description: "Close partnerships with university bursar offices.",
        location: "New York, NY",
        job_type: "Internship",
        stage: "Series A",
        compensation: "Paid",
        skills: &["Business Development", "Sales"],
        posted_on: (2024, 8, 22),
        bookmarked: false,
    },
    JobSeed {
        id: "job-010",
        title: "NLP Research Assistant",
        company: "LexiLearn",
        description: "Prototype language models that give feedback on student essays.",
        location: "Boston, MA",
        job_type: "Internship",
        stage: "Idea",
        compensation: "Unpaid",
        skills: &["Natural Language Processing", "Python", "Machine Learning"],
        posted_on: (2024, 9, 8),
        bookmarked: false,
    },
    JobSeed {
        id: "job-011",
        title: "Brand Designer",
        company: "MealMate",
        description: "Create the visual identity and launch assets for our campus rollout.",
        location: "Remote",
        job_type: "Contract",
        stage: "MVP",
        compensation: "Paid",
        skills: &["Brand Strategy", "Illustration", "Motion Design"],
        posted_on: (2024, 8, 15),
        bookmarked: false,
    },
    JobSeed {
        id: "job-012",
        title: "Finance & Fundraising Intern",
        company: "TutorTrack",
        description: "Build the financial model and prepare our pre-seed raise.",
        location: "Cambridge, MA",
        job_type: "Internship",
        stage: "Idea",
        compensation: "Equity",
        skills: &["Financial Modeling", "Fundraising"],
        posted_on: (2024, 9, 3),
        bookmarked: false,
    },
];

/// The twelve seed job postings, in catalog order.
pub fn seed_jobs() -> Vec<Job> {
    JOB_SEEDS.iter().map(JobSeed::build).collect()
}

struct FounderSeed {
    id: &'static str,
    name: &'static str,
    role: &'static str,
    university: &'static str,
    one_liner: &'static str,
    location: &'static str,
    stage: &'static str,
    skills: &'static [&'static str],
    interests: &'static [&'static str],
    availability: &'static [&'static str],
    looking_for: &'static [&'static str],
    match_score: u8,
    bookmarked: bool,
}

impl FounderSeed {
    fn build(&self) -> Founder {
        Founder {
            id: FounderId(self.id.to_string()),
            name: self.name.to_string(),
            role: self.role.to_string(),
            university: self.university.to_string(),
            one_liner: self.one_liner.to_string(),
            location: self.location.to_string(),
            stage: self.stage.to_string(),
            skills: tags(self.skills),
            interests: tags(self.interests),
            availability: tags(self.availability),
            looking_for: tags(self.looking_for),
            match_score: self.match_score,
            is_bookmarked: self.bookmarked,
        }
    }
}

const FOUNDER_SEEDS: [FounderSeed; 8] = [
    FounderSeed {
        id: "founder-001",
        name: "Maya Chen",
        role: "Technical Founder",
        university: "Northeastern University",
        one_liner: "Building AI study tools that adapt to how each student learns.",
        location: "Boston, MA",
        stage: "MVP",
        skills: &["Python", "Machine Learning", "React"],
        interests: &["AI/ML", "Edtech"],
        availability: &["Full-time"],
        looking_for: &["Business Co-founder"],
        match_score: 92,
        bookmarked: true,
    },
    FounderSeed {
        id: "founder-002",
        name: "Jordan Okafor",
        role: "Business Founder",
        university: "Boston University",
        one_liner: "Former campus club treasurer turning student budgeting into a fintech app.",
        location: "Boston, MA",
        stage: "Idea",
        skills: &["Financial Modeling", "Sales", "Fundraising"],
        interests: &["Fintech", "Consumer"],
        availability: &["Part-time", "Weekends"],
        looking_for: &["Technical Co-founder"],
        match_score: 87,
        bookmarked: false,
    },
    FounderSeed {
        id: "founder-003",
        name: "Priya Raman",
        role: "Design Founder",
        university: "Harvard University",
        one_liner: "Designing calmer health tracking for students managing chronic illness.",
        location: "Cambridge, MA",
        stage: "Pre-seed",
        skills: &["UI Design", "UX Research", "Figma"],
        interests: &["Healthtech", "Consumer"],
        availability: &["Flexible"],
        looking_for: &["Technical Co-founder", "Advisor"],
        match_score: 78,
        bookmarked: false,
    },
    FounderSeed {
        id: "founder-004",
        name: "Sam Alvarez",
        role: "Technical Founder",
        university: "MIT",
        one_liner: "Systems engineer writing Rust infrastructure for grid-scale battery data.",
        location: "Cambridge, MA",
        stage: "Seed",
        skills: &["Rust", "Go", "PostgreSQL"],
        interests: &["Climate", "Developer Tools"],
        availability: &["Full-time"],
        looking_for: &["Business Co-founder", "Design Co-founder"],
        match_score: 95,
        bookmarked: false,
    },
    FounderSeed {
        id: "founder-005",
        name: "Leah Goldberg",
        role: "Product Founder",
        university: "Columbia University",
        one_liner: "Product manager connecting alumni mentors with first-generation students.",
        location: "New York, NY",
        stage: "MVP",
        skills: &["Product Management", "Digital Marketing"],
        interests: &["Edtech", "Consumer"],
        availability: &["Part-time"],
        looking_for: &["Technical Co-founder"],
        match_score: 87,
        bookmarked: true,
    },
    FounderSeed {
        id: "founder-006",
        name: "Marcus Reed",
        role: "Technical Founder",
        university: "Stanford University",
        one_liner: "Shipping developer tooling that makes ML experiments reproducible.",
        location: "San Francisco, CA",
        stage: "Series A",
        skills: &["Python", "Machine Learning", "Rust"],
        interests: &["AI/ML", "Developer Tools"],
        availability: &["Full-time", "Flexible"],
        looking_for: &["Advisor"],
        match_score: 81,
        bookmarked: false,
    },
    FounderSeed {
        id: "founder-007",
        name: "Aisha Bello",
        role: "Business Founder",
        university: "Northeastern University",
        one_liner: "Growth marketer launching a campus marketplace for used lab gear.",
        location: "Remote",
        stage: "Idea",
        skills: &["Digital Marketing", "Sales", "Community Building"],
        interests: &["Climate", "Consumer"],
        availability: &["Weekends", "Flexible"],
        looking_for: &["Technical Co-founder", "Design Co-founder"],
        match_score: 73,
        bookmarked: false,
    },
    FounderSeed {
        id: "founder-008",
        name: "Ethan Park",
        role: "Technical Founder",
        university: "Boston University",
        one_liner: "Full-stack React developer prototyping insurance tools for gig workers.",
        location: "Boston, MA",
        stage: "Pre-seed",
        skills: &["React", "Node.js", "TypeScript"],
        interests: &["Fintech"],
        availability: &["Part-time"],
        looking_for: &["Business Co-founder"],
        match_score: 69,
        bookmarked: false,
    },
];

/// Seed founder profiles, in catalog order.
pub fn seed_founders() -> Vec<Founder> {
    FOUNDER_SEEDS.iter().map(FounderSeed::build).collect()
}
