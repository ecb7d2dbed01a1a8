use crate::offer::Offer;

pub const DEFAULT_INTERVIEW_LIMIT: usize = 20;

pub const TECH_STACK_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "DSA",
        &["algorithm", "data structure", "leetcode", "coding", "array", "tree", "graph"],
    ),
    (
        "System Design",
        &["system design", "architecture", "scalability", "distributed", "microservice"],
    ),
    ("Java", &["java", "spring", "hibernate", "maven", "gradle"]),
    ("Python", &["python", "django", "flask", "pandas", "numpy"]),
    (
        "JavaScript",
        &["javascript", "js", "node", "react", "angular", "vue"],
    ),
    ("React", &["react", "jsx", "redux", "hooks"]),
    ("Node.js", &["node", "express", "npm", "yarn"]),
];

/// Tech-stack tags suggested by the offer's role text.
pub fn tech_tags(offer: &Offer) -> Vec<&'static str> {
    let text = format!("{} {}", offer.role, offer.mapped_role).to_lowercase();
    TECH_STACK_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(tag, _)| *tag)
        .collect()
}

/// The first `limit` offers that link an interview write-up, in master order.
pub fn interview_offers(master: &[Offer], limit: usize) -> Vec<&Offer> {
    master
        .iter()
        .filter(|o| o.has_interview_experience())
        .take(limit)
        .collect()
}
