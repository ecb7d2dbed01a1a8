use crate::cli::args::CliArgs;
use crate::offer::YoePolicy;
use crate::suggest::SuggestField;

/// Splits "FIELD:QUERY". The query may itself contain ':'.
pub fn parse_suggest_arg(raw: &str) -> Result<(SuggestField, String), String> {
    let (field, query) = raw
        .split_once(':')
        .ok_or_else(|| "expected FIELD:QUERY".to_string())?;
    let field = SuggestField::parse(field).ok_or_else(|| format!("unknown field '{field}'"))?;
    Ok((field, query.to_string()))
}

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.yoe.as_deref() {
        crate::utils::parse_numeric_range(raw).map_err(|e| format!("invalid --yoe '{raw}': {e}"))?;
    }
    if let Some(raw) = args.salary.as_deref() {
        crate::utils::parse_numeric_range(raw)
            .map_err(|e| format!("invalid --salary '{raw}': {e}"))?;
    }
    if let Some(raw) = args.compare.as_deref() {
        crate::utils::parse_csv_list(raw).map_err(|e| format!("invalid --compare '{raw}': {e}"))?;
    }
    if let Some(raw) = args.yoe_policy.as_deref() {
        if YoePolicy::parse(raw).is_none() {
            return Err(format!(
                "invalid --yoe-policy '{raw}', expected truthy or numeric"
            ));
        }
    }
    if let Some(raw) = args.suggest.as_deref() {
        parse_suggest_arg(raw).map_err(|e| format!("invalid --suggest '{raw}': {e}"))?;
    }
    if let Some(page_size) = args.page_size {
        if page_size == 0 {
            return Err("invalid page-size, expected positive integer".to_string());
        }
    }
    if let Some(page) = args.page {
        if page == 0 {
            return Err("invalid page, expected positive integer".to_string());
        }
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected positive number of seconds".to_string());
        }
    }
    Ok(())
}
