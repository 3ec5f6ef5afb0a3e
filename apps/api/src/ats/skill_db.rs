use serde::Serialize;

/// A job role and the skills an ATS screen for it expects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRole {
    pub title: &'static str,
    pub required_skills: &'static [&'static str],
}

static SKILL_DB: &[JobRole] = &[
    JobRole {
        title: "Frontend Developer",
        required_skills: &[
            "HTML",
            "CSS",
            "JavaScript",
            "React",
            "TypeScript",
            "Git",
            "REST APIs",
            "Responsive Design",
        ],
    },
    JobRole {
        title: "Backend Developer",
        required_skills: &[
            "Node.js",
            "Python",
            "SQL",
            "Database Design",
            "REST APIs",
            "Git",
            "Authentication",
            "System Design",
        ],
    },
    JobRole {
        title: "Data Analyst",
        required_skills: &[
            "SQL",
            "Python",
            "Data Visualization",
            "Excel",
            "Statistics",
            "Power BI",
            "Tableau",
            "Data Cleaning",
        ],
    },
];

pub fn skill_db() -> &'static [JobRole] {
    SKILL_DB
}

/// Case- and whitespace-insensitive lookup by title.
pub fn find_role(title: &str) -> Option<&'static JobRole> {
    let wanted = title.trim();
    SKILL_DB.iter().find(|r| r.title.eq_ignore_ascii_case(wanted))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_has_three_roles_with_eight_skills() {
        assert_eq!(skill_db().len(), 3);
        assert!(skill_db().iter().all(|r| r.required_skills.len() == 8));
    }

    #[test]
    fn test_find_role_ignores_case_and_padding() {
        let role = find_role("  data analyst ").unwrap();
        assert_eq!(role.title, "Data Analyst");
        assert!(role.required_skills.contains(&"Tableau"));
    }

    #[test]
    fn test_find_role_unknown() {
        assert!(find_role("Astronaut").is_none());
    }
}
