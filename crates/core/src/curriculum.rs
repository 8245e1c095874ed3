//! The fixed 48-week program: stages, week ranges, and daily hour targets.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::StageId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CurriculumError {
    #[error("program has no stages")]
    NoStages,

    #[error("stage {stage} has an inverted week range {start}..={end}")]
    InvertedRange { stage: StageId, start: u32, end: u32 },

    #[error("stage {stage} starts at week {found}, expected week {expected}")]
    Discontiguous {
        stage: StageId,
        expected: u32,
        found: u32,
    },

    #[error("stages cover weeks 1..={covered} but the program has {total_weeks} weeks")]
    Coverage { covered: u32, total_weeks: u32 },
}

/// Inclusive range of program weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRange {
    pub start: u32,
    pub end: u32,
}

impl WeekRange {
    #[must_use]
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn contains(&self, week: u32) -> bool {
        (self.start..=self.end).contains(&week)
    }
}

/// One curriculum phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    id: StageId,
    name: String,
    description: String,
    weeks: WeekRange,
    target_hours: f64,
    topics: Vec<String>,
    projects: Vec<String>,
}

impl Stage {
    #[must_use]
    pub fn new(
        id: StageId,
        name: impl Into<String>,
        description: impl Into<String>,
        weeks: WeekRange,
        target_hours: f64,
        topics: Vec<String>,
        projects: Vec<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            weeks,
            target_hours,
            topics,
            projects,
        }
    }

    #[must_use]
    pub fn id(&self) -> StageId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn weeks(&self) -> WeekRange {
        self.weeks
    }

    #[must_use]
    pub fn target_hours(&self) -> f64 {
        self.target_hours
    }

    #[must_use]
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    #[must_use]
    pub fn projects(&self) -> &[String] {
        &self.projects
    }
}

/// Program schedule parameters plus the ordered stage table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramPlan {
    start_date: NaiveDate,
    total_weeks: u32,
    total_hours: f64,
    weekly_target: f64,
    weekday_target: f64,
    weekend_target: f64,
    stages: Vec<Stage>,
}

impl ProgramPlan {
    /// First day of the built-in program (a Tuesday).
    #[must_use]
    pub fn default_start_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 15).unwrap_or(NaiveDate::MIN)
    }

    /// The built-in eight-stage, 48-week program.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            start_date: Self::default_start_date(),
            total_weeks: 48,
            total_hours: 1600.0,
            weekly_target: 36.0,
            weekday_target: 4.0,
            weekend_target: 8.0,
            stages: standard_stages(),
        }
    }

    #[must_use]
    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self
    }

    /// Check that stage week ranges are ordered, disjoint, and cover the whole program.
    ///
    /// # Errors
    ///
    /// Returns `CurriculumError` describing the first gap, overlap, or coverage mismatch.
    pub fn validate(&self) -> Result<(), CurriculumError> {
        if self.stages.is_empty() {
            return Err(CurriculumError::NoStages);
        }

        let mut expected = 1;
        for stage in &self.stages {
            let WeekRange { start, end } = stage.weeks;
            if start > end {
                return Err(CurriculumError::InvertedRange {
                    stage: stage.id,
                    start,
                    end,
                });
            }
            if start != expected {
                return Err(CurriculumError::Discontiguous {
                    stage: stage.id,
                    expected,
                    found: start,
                });
            }
            expected = end + 1;
        }

        let covered = expected - 1;
        if covered != self.total_weeks {
            return Err(CurriculumError::Coverage {
                covered,
                total_weeks: self.total_weeks,
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    #[must_use]
    pub fn total_weeks(&self) -> u32 {
        self.total_weeks
    }

    #[must_use]
    pub fn total_hours(&self) -> f64 {
        self.total_hours
    }

    #[must_use]
    pub fn weekly_target(&self) -> f64 {
        self.weekly_target
    }

    #[must_use]
    pub fn weekday_target(&self) -> f64 {
        self.weekday_target
    }

    #[must_use]
    pub fn weekend_target(&self) -> f64 {
        self.weekend_target
    }

    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    #[must_use]
    pub fn stage(&self, id: StageId) -> Option<&Stage> {
        self.stages.iter().find(|stage| stage.id == id)
    }

    /// Stage whose range contains `week`; anything outside every range maps to the last stage.
    #[must_use]
    pub fn stage_for_week(&self, week: u32) -> StageId {
        self.stages
            .iter()
            .find(|stage| stage.weeks.contains(week))
            .or_else(|| self.stages.last())
            .map_or(StageId::new(1), Stage::id)
    }

    /// Program week for `date`, clamped to `1..=total_weeks`.
    #[must_use]
    pub fn week_for_date(&self, date: NaiveDate) -> u32 {
        let week = self.raw_week(date).clamp(1, i64::from(self.total_weeks.max(1)));
        u32::try_from(week).unwrap_or(1)
    }

    /// Program week for `date`, or `None` when the date falls outside the program.
    #[must_use]
    pub fn program_week(&self, date: NaiveDate) -> Option<u32> {
        let week = self.raw_week(date);
        if week < 1 || week > i64::from(self.total_weeks) {
            return None;
        }
        u32::try_from(week).ok()
    }

    /// First and last calendar day of a program week.
    #[must_use]
    pub fn week_bounds(&self, week: u32) -> (NaiveDate, NaiveDate) {
        let first = self.start_date + Duration::weeks(i64::from(week.saturating_sub(1)));
        (first, first + Duration::days(6))
    }

    /// Target hours for a single calendar day.
    #[must_use]
    pub fn daily_target(&self, date: NaiveDate) -> f64 {
        if is_weekend(date) {
            self.weekend_target
        } else {
            self.weekday_target
        }
    }

    fn raw_week(&self, date: NaiveDate) -> i64 {
        (date - self.start_date).num_days().div_euclid(7) + 1
    }
}

impl Default for ProgramPlan {
    fn default() -> Self {
        Self::standard()
    }
}

#[must_use]
pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn stage(
    id: u8,
    name: &str,
    description: &str,
    weeks: (u32, u32),
    target_hours: f64,
    topics: [&str; 8],
    projects: [&str; 3],
) -> Stage {
    Stage::new(
        StageId::new(id),
        name,
        description,
        WeekRange::new(weeks.0, weeks.1),
        target_hours,
        topics.iter().map(|t| (*t).to_owned()).collect(),
        projects.iter().map(|p| (*p).to_owned()).collect(),
    )
}

fn standard_stages() -> Vec<Stage> {
    vec![
        stage(
            1,
            "Core Programming + Data Foundations",
            "Build strong programming fundamentals and data manipulation skills",
            (1, 8),
            288.0,
            [
                "Python Advanced Features (decorators, generators, context managers)",
                "Data Structures & Algorithms (Arrays, Linked Lists, Trees, Graphs)",
                "Object-Oriented Programming (inheritance, polymorphism, design patterns)",
                "Database Fundamentals (SQL, normalization, indexing)",
                "pandas & NumPy for Data Manipulation",
                "Data Cleaning & Preprocessing Techniques",
                "Basic Statistics for Data Analysis",
                "Git Version Control & Collaboration",
            ],
            [
                "Build a data analysis library",
                "Create a personal finance tracker",
                "Develop a simple web scraper",
            ],
        ),
        stage(
            2,
            "Backend Engineering Foundation",
            "Master backend development and API design principles",
            (9, 16),
            288.0,
            [
                "RESTful API Design & Implementation",
                "Flask/Django Web Framework Mastery",
                "Database Design & ORM (SQLAlchemy)",
                "Authentication & Authorization Systems",
                "Testing (Unit, Integration, API Testing)",
                "Error Handling & Logging",
                "Performance Optimization & Caching",
                "API Documentation (OpenAPI/Swagger)",
            ],
            [
                "Build a complete REST API with authentication",
                "Create a blog platform with user management",
                "Develop a task management system",
            ],
        ),
        stage(
            3,
            "Data Engineering Essentials",
            "Learn to build scalable data pipelines and processing systems",
            (17, 24),
            288.0,
            [
                "ETL Pipeline Design & Implementation",
                "Apache Airflow for Workflow Management",
                "Data Warehousing Concepts",
                "Big Data Tools (Spark, Kafka)",
                "Data Quality & Validation",
                "Stream Processing & Real-time Data",
                "Data Lake Architecture",
                "SQL Advanced Queries & Optimization",
            ],
            [
                "Build an automated data pipeline",
                "Create a real-time analytics dashboard",
                "Develop a data validation framework",
            ],
        ),
        stage(
            4,
            "DevOps + Cloud Engineering",
            "Master cloud infrastructure and deployment automation",
            (25, 32),
            288.0,
            [
                "Containerization (Docker, Docker Compose)",
                "Container Orchestration (Kubernetes)",
                "Cloud Platforms (AWS/Azure/GCP)",
                "Infrastructure as Code (Terraform)",
                "CI/CD Pipelines (GitHub Actions, Jenkins)",
                "Monitoring & Logging (Prometheus, Grafana)",
                "Security Best Practices",
                "Microservices Architecture",
            ],
            [
                "Deploy a multi-container application",
                "Set up a complete CI/CD pipeline",
                "Build a monitoring dashboard",
            ],
        ),
        stage(
            5,
            "Machine Learning & Data Science",
            "Develop machine learning models and data science skills",
            (33, 36),
            144.0,
            [
                "Supervised Learning (Classification, Regression)",
                "Unsupervised Learning (Clustering, Dimensionality Reduction)",
                "Feature Engineering & Selection",
                "Model Evaluation & Validation",
                "scikit-learn & Advanced Libraries",
                "Statistical Analysis & Hypothesis Testing",
                "Data Visualization (matplotlib, seaborn, plotly)",
                "Time Series Analysis",
            ],
            [
                "Build a predictive model for business metrics",
                "Create a recommendation system",
                "Develop a time series forecasting model",
            ],
        ),
        stage(
            6,
            "MLOps (Production ML Systems)",
            "Learn to deploy and maintain ML models in production",
            (37, 40),
            144.0,
            [
                "Model Deployment Strategies",
                "ML Pipeline Automation",
                "Model Monitoring & Drift Detection",
                "A/B Testing for ML Models",
                "MLflow for Experiment Tracking",
                "Model Versioning & Registry",
                "Scalable ML Infrastructure",
                "Production ML Best Practices",
            ],
            [
                "Deploy an ML model as a web service",
                "Build an automated ML pipeline",
                "Create a model monitoring system",
            ],
        ),
        stage(
            7,
            "Generative AI / LLMs",
            "Explore large language models and generative AI applications",
            (41, 44),
            144.0,
            [
                "Large Language Model Fundamentals",
                "Prompt Engineering & Fine-tuning",
                "OpenAI API & GPT Integration",
                "Retrieval Augmented Generation (RAG)",
                "Vector Databases & Embeddings",
                "LangChain for LLM Applications",
                "AI Safety & Ethical Considerations",
                "Building AI-Powered Applications",
            ],
            [
                "Build a chatbot with context awareness",
                "Create a document Q&A system",
                "Develop an AI writing assistant",
            ],
        ),
        stage(
            8,
            "Cloud Integration & Capstone",
            "Integrate all skills into a comprehensive capstone project",
            (45, 48),
            144.0,
            [
                "System Architecture Design",
                "Scalability & Performance Optimization",
                "Security Implementation",
                "Cost Optimization Strategies",
                "Technical Documentation",
                "Project Management & Agile Practices",
                "Code Review & Quality Assurance",
                "Portfolio Development",
            ],
            [
                "Build a full-stack data platform",
                "Create an AI-powered SaaS application",
                "Develop a comprehensive portfolio showcase",
            ],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn standard_plan_is_contiguous_and_complete() {
        let plan = ProgramPlan::standard();
        plan.validate().unwrap();
        assert_eq!(plan.stages().len(), 8);
        let stage_hours: f64 = plan.stages().iter().map(Stage::target_hours).sum();
        assert!((stage_hours - 1728.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stage_for_week_maps_boundaries_and_clamps() {
        let plan = ProgramPlan::standard();
        assert_eq!(plan.stage_for_week(1), StageId::new(1));
        assert_eq!(plan.stage_for_week(8), StageId::new(1));
        assert_eq!(plan.stage_for_week(9), StageId::new(2));
        assert_eq!(plan.stage_for_week(36), StageId::new(5));
        assert_eq!(plan.stage_for_week(48), StageId::new(8));
        assert_eq!(plan.stage_for_week(60), StageId::new(8));
    }

    #[test]
    fn week_for_date_clamps_to_program() {
        let plan = ProgramPlan::standard();
        assert_eq!(plan.week_for_date(date(2025, 7, 15)), 1);
        assert_eq!(plan.week_for_date(date(2025, 7, 21)), 1);
        assert_eq!(plan.week_for_date(date(2025, 7, 22)), 2);
        assert_eq!(plan.week_for_date(date(2025, 1, 1)), 1);
        assert_eq!(plan.week_for_date(date(2030, 1, 1)), 48);
    }

    #[test]
    fn program_week_is_none_outside_program() {
        let plan = ProgramPlan::standard();
        assert_eq!(plan.program_week(date(2025, 7, 14)), None);
        assert_eq!(plan.program_week(date(2025, 7, 29)), Some(3));
        assert_eq!(plan.program_week(date(2030, 1, 1)), None);
    }

    #[test]
    fn week_bounds_span_seven_days() {
        let plan = ProgramPlan::standard();
        assert_eq!(plan.week_bounds(1), (date(2025, 7, 15), date(2025, 7, 21)));
        assert_eq!(plan.week_bounds(2), (date(2025, 7, 22), date(2025, 7, 28)));
    }

    #[test]
    fn weekend_days_have_the_larger_target() {
        let plan = ProgramPlan::standard();
        assert!((plan.daily_target(date(2025, 7, 19)) - 8.0).abs() < f64::EPSILON);
        assert!((plan.daily_target(date(2025, 7, 21)) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn validate_rejects_gaps() {
        let mut plan = ProgramPlan::standard();
        plan.stages[1].weeks = WeekRange::new(10, 16);
        assert_eq!(
            plan.validate().unwrap_err(),
            CurriculumError::Discontiguous {
                stage: StageId::new(2),
                expected: 9,
                found: 10,
            }
        );
    }

    #[test]
    fn validate_rejects_short_coverage() {
        let mut plan = ProgramPlan::standard();
        plan.stages.pop();
        assert_eq!(
            plan.validate().unwrap_err(),
            CurriculumError::Coverage {
                covered: 44,
                total_weeks: 48,
            }
        );
    }
}
