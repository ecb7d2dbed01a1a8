use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const INTERVIEW_NOT_AVAILABLE: &str = "N/A";
pub const UNKNOWN_EXPERIENCE: &str = "Unknown";

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OfferId(pub String);

impl OfferId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    // numeric and string ids from the feed compare equal when they print the same
    fn from_value(value: Option<&Value>, position: usize) -> Self {
        match value {
            Some(Value::String(s)) if !s.is_empty() => Self(s.clone()),
            Some(Value::Number(n)) => Self(n.to_string()),
            _ => Self(format!("#{position}")),
        }
    }
}

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OfferId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for OfferId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

/// A single compensation record. Field names are the wire names of the data feed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Offer {
    pub id: OfferId,
    pub company: String,
    pub role: String,
    pub mapped_role: String,
    pub location: String,
    pub yoe: f64,
    /// Total compensation in LPA.
    pub total: f64,
    pub base: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapped_yoe: Option<String>,
    pub creation_date: String,
    pub interview_exp: String,
}

impl Offer {
    pub fn experience_level(&self) -> &str {
        self.mapped_yoe.as_deref().unwrap_or(UNKNOWN_EXPERIENCE)
    }

    pub fn interview_link(&self) -> Option<&str> {
        if self.interview_exp == INTERVIEW_NOT_AVAILABLE {
            None
        } else {
            Some(self.interview_exp.as_str())
        }
    }

    pub fn has_interview_experience(&self) -> bool {
        self.interview_link().is_some()
    }
}

/// How `yoe` is checked. The published dashboard tested the field for truthiness
/// before checking its type, so a zero was rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YoePolicy {
    #[default]
    Truthy,
    Numeric,
}

impl YoePolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "truthy" => Some(Self::Truthy),
            "numeric" => Some(Self::Numeric),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Truthy => "truthy",
            Self::Numeric => "numeric",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidationPolicy {
    pub yoe: YoePolicy,
    pub require_mapped_role: bool,
}

impl Default for ValidationPolicy {
    fn default() -> Self {
        Self {
            yoe: YoePolicy::Truthy,
            require_mapped_role: true,
        }
    }
}

/// The first check a raw entry failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rejection {
    NotAnObject,
    Total,
    Company,
    Role,
    Location,
    Yoe,
    CreationDate,
    MappedRole,
}

impl Rejection {
    pub fn field(&self) -> &'static str {
        match self {
            Self::NotAnObject => "<entry>",
            Self::Total => "total",
            Self::Company => "company",
            Self::Role => "role",
            Self::Location => "location",
            Self::Yoe => "yoe",
            Self::CreationDate => "creation_date",
            Self::MappedRole => "mapped_role",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => f.write_str("entry is not an object"),
            other => write!(f, "missing or malformed '{}'", other.field()),
        }
    }
}

fn finite_number(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_f64).filter(|v| v.is_finite())
}

fn non_empty_text<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// Validates one raw entry. `position` is the entry's index in the raw payload and
/// only serves as a fallback identifier when the entry has none.
pub fn validate_entry(
    raw: &Value,
    position: usize,
    policy: &ValidationPolicy,
) -> Result<Offer, Rejection> {
    let obj = raw.as_object().ok_or(Rejection::NotAnObject)?;

    let total = finite_number(obj, "total").ok_or(Rejection::Total)?;
    let company = non_empty_text(obj, "company").ok_or(Rejection::Company)?;
    let role = non_empty_text(obj, "role").ok_or(Rejection::Role)?;
    let location = non_empty_text(obj, "location").ok_or(Rejection::Location)?;
    let yoe = finite_number(obj, "yoe")
        .filter(|v| *v >= 0.0)
        .filter(|v| policy.yoe == YoePolicy::Numeric || *v != 0.0)
        .ok_or(Rejection::Yoe)?;
    let creation_date = non_empty_text(obj, "creation_date").ok_or(Rejection::CreationDate)?;

    let mapped_role = if policy.require_mapped_role {
        non_empty_text(obj, "mapped_role")
            .ok_or(Rejection::MappedRole)?
            .to_string()
    } else {
        obj.get("mapped_role")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    let mapped_yoe = non_empty_text(obj, "mapped_yoe").map(str::to_string);
    let interview_exp = non_empty_text(obj, "interview_exp")
        .unwrap_or(INTERVIEW_NOT_AVAILABLE)
        .to_string();

    Ok(Offer {
        id: OfferId::from_value(obj.get("id"), position),
        company: company.to_string(),
        role: role.to_string(),
        mapped_role,
        location: location.to_string(),
        yoe,
        total,
        base: finite_number(obj, "base").unwrap_or(0.0),
        mapped_yoe,
        creation_date: creation_date.to_string(),
        interview_exp,
    })
}

#[derive(Clone, Debug, Default)]
pub struct Validated {
    pub offers: Vec<Offer>,
    pub rejected: Vec<(usize, Rejection)>,
}

/// Keeps every entry that passes all checks, in input order. Nothing is repaired.
pub fn validate_entries(raw: &[Value], policy: &ValidationPolicy) -> Validated {
    let mut out = Validated::default();
    for (position, entry) in raw.iter().enumerate() {
        match validate_entry(entry, position, policy) {
            Ok(offer) => out.offers.push(offer),
            Err(reason) => out.rejected.push((position, reason)),
        }
    }
    out
}

#[cfg(test)]
pub(crate) fn sample_offer(id: i64, company: &str, total: f64, yoe: f64) -> Offer {
    Offer {
        id: OfferId::from(id),
        company: company.to_string(),
        role: "SDE".to_string(),
        mapped_role: "Software Engineer".to_string(),
        location: "Bangalore".to_string(),
        yoe,
        total,
        base: total * 0.8,
        mapped_yoe: Some("Mid (2-6)".to_string()),
        creation_date: "2024-01-01".to_string(),
        interview_exp: INTERVIEW_NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_entry() -> Value {
        json!({
            "id": 7,
            "company": "Acme",
            "role": "SWE",
            "mapped_role": "Software Engineer",
            "location": "Bangalore",
            "yoe": 2,
            "total": 25.5,
            "base": 20,
            "mapped_yoe": "Mid (2-6)",
            "creation_date": "2024-01-01",
            "interview_exp": "N/A"
        })
    }

    #[test]
    fn accepts_well_formed_entry() {
        let offer = validate_entry(&full_entry(), 0, &ValidationPolicy::default()).unwrap();
        assert_eq!(offer.id, OfferId::from(7));
        assert_eq!(offer.total, 25.5);
        assert_eq!(offer.base, 20.0);
        assert_eq!(offer.experience_level(), "Mid (2-6)");
        assert!(!offer.has_interview_experience());
    }

    #[test]
    fn rejects_scalars_and_arrays() {
        let policy = ValidationPolicy::default();
        assert_eq!(
            validate_entry(&json!(3), 0, &policy),
            Err(Rejection::NotAnObject)
        );
        assert_eq!(
            validate_entry(&json!([1, 2]), 0, &policy),
            Err(Rejection::NotAnObject)
        );
        assert_eq!(
            validate_entry(&Value::Null, 0, &policy),
            Err(Rejection::NotAnObject)
        );
    }

    #[test]
    fn rejects_missing_or_mistyped_fields() {
        let policy = ValidationPolicy::default();
        for (key, value, reason) in [
            ("total", json!("25"), Rejection::Total),
            ("company", json!(""), Rejection::Company),
            ("role", Value::Null, Rejection::Role),
            ("location", json!(12), Rejection::Location),
            ("yoe", json!(-1), Rejection::Yoe),
            ("creation_date", json!(""), Rejection::CreationDate),
            ("mapped_role", json!(null), Rejection::MappedRole),
            ("mapped_role", json!(""), Rejection::MappedRole),
        ] {
            let mut entry = full_entry();
            entry[key] = value;
            assert_eq!(validate_entry(&entry, 0, &policy), Err(reason), "{key}");
        }
    }

    #[test]
    fn numeric_and_string_ids_share_identity() {
        let mut quoted = full_entry();
        quoted["id"] = json!("7");
        let policy = ValidationPolicy::default();
        let a = validate_entry(&full_entry(), 0, &policy).unwrap();
        let b = validate_entry(&quoted, 1, &policy).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(b.id, OfferId::from(7));
    }

    #[test]
    fn yoe_policy_spellings() {
        assert_eq!(YoePolicy::parse("truthy"), Some(YoePolicy::Truthy));
        assert_eq!(YoePolicy::parse(" Numeric "), Some(YoePolicy::Numeric));
        assert_eq!(YoePolicy::parse("strict"), None);
        assert_eq!(YoePolicy::parse("lenient"), None);
        assert_eq!(YoePolicy::parse(""), None);
    }

    #[test]
    fn zero_yoe_depends_on_policy() {
        let mut entry = full_entry();
        entry["yoe"] = json!(0);
        let strict = ValidationPolicy::default();
        assert_eq!(validate_entry(&entry, 0, &strict), Err(Rejection::Yoe));

        let lenient = ValidationPolicy {
            yoe: YoePolicy::Numeric,
            ..ValidationPolicy::default()
        };
        let offer = validate_entry(&entry, 0, &lenient).unwrap();
        assert_eq!(offer.yoe, 0.0);
    }

    #[test]
    fn optional_fields_fall_back() {
        let mut entry = full_entry();
        let obj = entry.as_object_mut().unwrap();
        obj.remove("id");
        obj.remove("base");
        obj.remove("mapped_yoe");
        obj.remove("interview_exp");
        let offer = validate_entry(&entry, 4, &ValidationPolicy::default()).unwrap();
        assert_eq!(offer.id.as_str(), "#4");
        assert_eq!(offer.base, 0.0);
        assert_eq!(offer.experience_level(), UNKNOWN_EXPERIENCE);
        assert_eq!(offer.interview_exp, INTERVIEW_NOT_AVAILABLE);
    }

    #[test]
    fn mapped_role_can_be_optional() {
        let mut entry = full_entry();
        entry.as_object_mut().unwrap().remove("mapped_role");
        let policy = ValidationPolicy {
            require_mapped_role: false,
            ..ValidationPolicy::default()
        };
        let offer = validate_entry(&entry, 0, &policy).unwrap();
        assert_eq!(offer.mapped_role, "");
    }

    #[test]
    fn validate_entries_reports_positions() {
        let raw = vec![full_entry(), json!("junk"), full_entry()];
        let out = validate_entries(&raw, &ValidationPolicy::default());
        assert_eq!(out.offers.len(), 2);
        assert_eq!(out.rejected, vec![(1, Rejection::NotAnObject)]);
    }

    #[test]
    fn interview_link_is_exposed() {
        let mut entry = full_entry();
        entry["interview_exp"] = json!("https://leetcode.com/discuss/123");
        let offer = validate_entry(&entry, 0, &ValidationPolicy::default()).unwrap();
        assert_eq!(offer.interview_link(), Some("https://leetcode.com/discuss/123"));
    }
}
