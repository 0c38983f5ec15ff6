//! Portfolio content: profile copy, projects, skills, links and the tech catalog.
//! Bundled default via include_str!; a JSON file on disk overrides it when present.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::orbital::TechItem;

const DEFAULT_CONTENT: &str = include_str!("../content/portfolio.json");

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("read content file: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse content: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    /// Logo text in the header and loading screen.
    pub brand: String,
    pub headline: String,
    pub tagline: String,
    #[serde(default)]
    pub bio: Vec<String>,
    #[serde(default)]
    pub cv_url: Option<String>,
    pub contact_heading: String,
    pub contact_blurb: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: u32,
    pub title: String,
    pub category: String,
    pub image: String,
    pub url: String,
    pub year: String,
    #[serde(default)]
    pub featured: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGroup {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialLink {
    pub label: String,
    pub url: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    pub label: String,
    /// Fragment id on the landing page.
    pub section: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub profile: Profile,
    #[serde(default)]
    pub nav: Vec<NavItem>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub skills: Vec<SkillGroup>,
    #[serde(default)]
    pub social: Vec<SocialLink>,
    #[serde(default)]
    pub tech: Vec<TechItem>,
}

impl Portfolio {
    /// The content compiled into the binary.
    pub fn bundled() -> Result<Self, ContentError> {
        Self::from_json(DEFAULT_CONTENT)
    }

    pub fn from_json(s: &str) -> Result<Self, ContentError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ContentError> {
        let s = std::fs::read_to_string(path)?;
        Self::from_json(&s)
    }

    /// Override file if given and readable, else bundled content. A broken override is logged and skipped.
    pub fn load(path: Option<&Path>) -> Result<Self, ContentError> {
        if let Some(p) = path {
            match Self::from_path(p) {
                Ok(portfolio) => {
                    tracing::info!(path = %p.display(), "loaded portfolio content");
                    return Ok(portfolio);
                }
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "content override ignored, using bundled content");
                }
            }
        }
        Self::bundled()
    }

    pub fn featured_projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter().filter(|p| p.featured)
    }

    /// Distinct project years, newest first.
    pub fn project_years(&self) -> Vec<&str> {
        let mut years: Vec<&str> = self.projects.iter().map(|p| p.year.as_str()).collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        years
    }

    /// Projects for a year chip; `None` or `"all"` keeps everything.
    pub fn projects_for_year<'a>(&'a self, year: Option<&'a str>) -> impl Iterator<Item = &'a Project> + 'a {
        let year = year.map(str::trim).filter(|y| !y.is_empty() && !y.eq_ignore_ascii_case("all"));
        self.projects
            .iter()
            .filter(move |p| year.map_or(true, |y| p.year == y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn bundled_content_parses() {
        let portfolio = Portfolio::bundled().unwrap();
        assert!(!portfolio.tech.is_empty());
        assert!(portfolio.featured_projects().count() >= 1);
        assert!(portfolio.nav.iter().any(|n| n.section == "contact"));
    }

    #[test]
    fn years_are_distinct_and_newest_first() {
        let portfolio = Portfolio::bundled().unwrap();
        assert_eq!(portfolio.project_years(), vec!["2023", "2022", "2021", "2020"]);
    }

    #[test]
    fn year_filter() {
        let portfolio = Portfolio::bundled().unwrap();
        let all = portfolio.projects_for_year(None).count();
        assert_eq!(portfolio.projects_for_year(Some("all")).count(), all);
        assert!(portfolio.projects_for_year(Some("2021")).all(|p| p.year == "2021"));
        assert_eq!(portfolio.projects_for_year(Some("1999")).count(), 0);
    }

    #[test]
    fn broken_override_falls_back_to_bundled() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        let portfolio = Portfolio::load(Some(file.path())).unwrap();
        assert_eq!(portfolio, Portfolio::bundled().unwrap());
    }

    #[test]
    fn override_file_wins() {
        let mut bundled = Portfolio::bundled().unwrap();
        bundled.profile.headline = "Systems Engineer".to_string();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&bundled).unwrap()).unwrap();
        let loaded = Portfolio::load(Some(file.path())).unwrap();
        assert_eq!(loaded.profile.headline, "Systems Engineer");
    }
}
