//! Profile timeline: experiences turned into display markers.
//!
//! Pure formatting, no I/O. Entries are sorted newest start first and each
//! becomes one [`TimelineMarker`] whose icon, title and subtitle depend on the
//! entry's [`ExperienceKind`].

use chrono::{Datelike, NaiveDate};
use store::{Experience, ExperienceKind};

const MONTHS_ES: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
];

/// Label for an ongoing period.
pub const PRESENT: &str = "Actualidad";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimelineIcon {
    Briefcase,
    GraduationCap,
    Code,
    HandHeart,
    Certificate,
}

impl TimelineIcon {
    pub fn for_kind(kind: ExperienceKind) -> Self {
        match kind {
            ExperienceKind::Work => TimelineIcon::Briefcase,
            ExperienceKind::Education => TimelineIcon::GraduationCap,
            ExperienceKind::Project => TimelineIcon::Code,
            ExperienceKind::Volunteer => TimelineIcon::HandHeart,
            ExperienceKind::Certification => TimelineIcon::Certificate,
        }
    }

    /// CSS modifier for the marker dot.
    pub fn css_class(self) -> &'static str {
        match self {
            TimelineIcon::Briefcase => "timeline-icon--work",
            TimelineIcon::GraduationCap => "timeline-icon--education",
            TimelineIcon::Code => "timeline-icon--project",
            TimelineIcon::HandHeart => "timeline-icon--volunteer",
            TimelineIcon::Certificate => "timeline-icon--certification",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimelineMarker {
    pub id: String,
    pub kind: ExperienceKind,
    pub icon: TimelineIcon,
    pub title: String,
    pub subtitle: Option<String>,
    pub period: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub achievements: Vec<String>,
    pub technologies: Vec<String>,
    pub link: Option<String>,
}

/// `"ene 2021"`.
pub fn month_label(date: NaiveDate) -> String {
    let month = MONTHS_ES[date.month0() as usize];
    format!("{month} {}", date.year())
}

/// `"ene 2021 – Actualidad"`, `"ene 2021 – jun 2023"` or just the start.
pub fn format_period(start: NaiveDate, end: Option<NaiveDate>, is_current: bool) -> String {
    let from = month_label(start);
    if is_current {
        return format!("{from} – {PRESENT}");
    }
    match end {
        Some(end) => format!("{from} – {}", month_label(end)),
        None => from,
    }
}

fn headline(exp: &Experience) -> (String, Option<String>) {
    let org = exp.organization.trim();
    let title = exp.title.trim().to_string();
    match exp.kind {
        ExperienceKind::Project => (title, (!org.is_empty()).then(|| org.to_string())),
        _ if org.is_empty() => (title, None),
        _ => (format!("{title} @ {org}"), None),
    }
}

pub fn marker(exp: &Experience) -> TimelineMarker {
    let (title, subtitle) = headline(exp);
    TimelineMarker {
        id: exp.id.clone(),
        kind: exp.kind,
        icon: TimelineIcon::for_kind(exp.kind),
        title,
        subtitle,
        period: format_period(exp.start_date, exp.end_date, exp.is_current),
        location: exp.location.clone().filter(|l| !l.trim().is_empty()),
        description: exp.description.clone().filter(|d| !d.trim().is_empty()),
        achievements: exp.achievements.clone(),
        technologies: exp.technologies.clone(),
        link: exp.link.clone().filter(|l| !l.trim().is_empty()),
    }
}

/// Markers sorted newest start first. Ties keep input order.
pub fn build_timeline(experiences: &[Experience]) -> Vec<TimelineMarker> {
    let mut sorted: Vec<&Experience> = experiences.iter().collect();
    sorted.sort_by(|a, b| b.start_date.cmp(&a.start_date));
    sorted.into_iter().map(marker).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exp(id: &str, kind: ExperienceKind, title: &str, org: &str, start: &str) -> Experience {
        Experience {
            id: id.into(),
            user_id: "u1".into(),
            kind,
            title: title.into(),
            organization: org.into(),
            location: None,
            start_date: start.parse().unwrap(),
            end_date: None,
            is_current: false,
            description: None,
            achievements: vec![],
            technologies: vec![],
            link: None,
        }
    }

    #[test]
    fn test_period_labels() {
        let start = NaiveDate::from_ymd_opt(2021, 1, 15).unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 6, 30).unwrap();
        assert_eq!(format_period(start, None, true), "ene 2021 – Actualidad");
        assert_eq!(format_period(start, Some(end), false), "ene 2021 – jun 2023");
        assert_eq!(format_period(start, Some(end), true), "ene 2021 – Actualidad");
        assert_eq!(format_period(start, None, false), "ene 2021");
        assert_eq!(
            month_label(NaiveDate::from_ymd_opt(1999, 12, 1).unwrap()),
            "dic 1999"
        );
    }

    #[test]
    fn test_sorted_newest_first_with_kind_titles() {
        let items = vec![
            exp("edu", ExperienceKind::Education, "Grado en Informática", "UPM", "2014-09-01"),
            exp("work", ExperienceKind::Work, "Backend Dev", "Acme", "2020-02-01"),
            exp("proj", ExperienceKind::Project, "Proyecto 301", "", "2022-05-01"),
            exp("cert", ExperienceKind::Certification, "CKA", "CNCF", "2021-03-01"),
        ];
        let markers = build_timeline(&items);
        let ids: Vec<_> = markers.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["proj", "cert", "work", "edu"]);

        assert_eq!(markers[0].title, "Proyecto 301");
        assert_eq!(markers[0].icon, TimelineIcon::Code);
        assert_eq!(markers[1].title, "CKA @ CNCF");
        assert_eq!(markers[2].title, "Backend Dev @ Acme");
        assert_eq!(markers[3].icon, TimelineIcon::GraduationCap);
    }

    #[test]
    fn test_optional_sections_drop_blanks() {
        let mut e = exp("v", ExperienceKind::Volunteer, "Mentora", "Cruz Roja", "2019-01-01");
        e.link = Some("  ".into());
        e.location = Some("Madrid".into());
        let m = marker(&e);
        assert_eq!(m.link, None);
        assert_eq!(m.location.as_deref(), Some("Madrid"));
        assert_eq!(m.title, "Mentora @ Cruz Roja");
    }
}
