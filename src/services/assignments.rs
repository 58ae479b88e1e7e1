use crate::domain::models::ProposedChange;
use crate::settings::SettingsValue;

/// A `set` argument the CLI could not turn into a proposed change.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct AssignmentError(pub String);

/// Parse `--dotted.path=value` arguments into proposed changes.
///
/// The leading `--` is optional. Path segments written in kebab-case are
/// folded to the camelCase field names of the settings tree, so
/// `--container-engine.allowed-images.enabled=false` addresses
/// `containerEngine.allowedImages.enabled`. Values parse as JSON scalars or
/// arrays of scalars, falling back to a plain string (`1.26.3` stays a
/// string); object values are outside the assignment contract.
pub fn parse_assignments(raw: &[String]) -> Result<Vec<ProposedChange>, AssignmentError> {
    raw.iter().map(|arg| parse_assignment(arg)).collect()
}

fn parse_assignment(raw: &str) -> Result<ProposedChange, AssignmentError> {
    let trimmed = raw.strip_prefix("--").unwrap_or(raw);
    let (path, value) = trimmed.split_once('=').ok_or_else(|| {
        AssignmentError(format!("assignment \"{raw}\" must look like --dotted.path=value"))
    })?;
    let path = normalize_path(path)
        .ok_or_else(|| AssignmentError(format!("assignment \"{raw}\" has an empty settings path")))?;
    let value = parse_value(&path, value)?;
    Ok(ProposedChange { path, value })
}

/// Fold each kebab-case dot segment to camelCase; segments already in
/// camelCase pass through unchanged. Returns None for empty paths/segments.
fn normalize_path(path: &str) -> Option<String> {
    if path.is_empty() {
        return None;
    }
    let mut segments = Vec::new();
    for segment in path.split('.') {
        if segment.is_empty() {
            return None;
        }
        segments.push(camel_segment(segment)?);
    }
    Some(segments.join("."))
}

fn camel_segment(segment: &str) -> Option<String> {
    if !segment.contains('-') {
        return Some(segment.to_string());
    }
    let mut words = segment.split('-');
    let mut out = String::from(words.next()?);
    if out.is_empty() {
        return None;
    }
    for word in words {
        let mut chars = word.chars();
        let first = chars.next()?;
        out.extend(first.to_uppercase());
        out.push_str(chars.as_str());
    }
    Some(out)
}

fn parse_value(path: &str, raw: &str) -> Result<SettingsValue, AssignmentError> {
    let value = match serde_json::from_str::<SettingsValue>(raw) {
        Ok(value) => value,
        Err(_) => SettingsValue::String(raw.to_string()),
    };
    match &value {
        SettingsValue::Object(_) => Err(AssignmentError(format!(
            "field \"{path}\" cannot be assigned an object value"
        ))),
        SettingsValue::Array(items)
            if items
                .iter()
                .any(|item| matches!(item, SettingsValue::Array(_) | SettingsValue::Object(_))) =>
        {
            Err(AssignmentError(format!(
                "field \"{path}\" arrays may contain only scalar values"
            )))
        }
        _ => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(raw: &str) -> ProposedChange {
        parse_assignments(&[raw.to_string()]).expect("valid assignment").remove(0)
    }

    #[test]
    fn kebab_case_segments_fold_to_camel_case() {
        let change = one("--container-engine.allowed-images.enabled=false");
        assert_eq!(change.path, "containerEngine.allowedImages.enabled");
        assert_eq!(change.value, SettingsValue::Bool(false));
    }

    #[test]
    fn camel_case_and_single_word_segments_pass_through() {
        let change = one("--kubernetes.version=1.26.1");
        assert_eq!(change.path, "kubernetes.version");
        assert_eq!(change.value, SettingsValue::String("1.26.1".into()));

        assert_eq!(one("containerEngine.name=moby").path, "containerEngine.name");
    }

    #[test]
    fn values_parse_as_json_with_string_fallback() {
        assert_eq!(one("a.b=true").value, SettingsValue::Bool(true));
        assert_eq!(one("a.b=6443").value, SettingsValue::Int(6443));
        assert_eq!(
            one(r#"a.b=["c","d"]"#).value,
            SettingsValue::Array(vec![
                SettingsValue::String("c".into()),
                SettingsValue::String("d".into())
            ])
        );
        assert_eq!(one("a.b=plain text").value, SettingsValue::String("plain text".into()));
    }

    #[test]
    fn object_values_are_rejected() {
        let err = parse_assignments(&[r#"--a.b={"c":1}"#.to_string()]).unwrap_err();
        assert!(err.to_string().contains("cannot be assigned an object value"));
    }

    #[test]
    fn missing_equals_and_empty_paths_are_rejected() {
        assert!(parse_assignments(&["--kubernetes.version".to_string()]).is_err());
        assert!(parse_assignments(&["=value".to_string()]).is_err());
        assert!(parse_assignments(&["a..b=1".to_string()]).is_err());
    }
}
