use crate::{Result, SourceError};
use serde_json::Value;

const ENTRY_KEYS: [&str; 4] = ["phonenumber", "phone_number", "phone", "number"];

/// Extracts raw blocklist entries from a response body.
///
/// Accepted shapes:
/// - provider envelope `{"status": 0, "message": "...", "details": [{"phonenumber": "..."}]}`;
///   a non-zero status is an error
/// - a JSON array of strings, numbers, or objects carrying a phone field
/// - plain text with one number per line (`,` and `;` also separate)
///
/// A blank body, or a non-empty list in which no record carries a number, is a
/// parse error. Only an explicit empty JSON list yields an empty blocklist.
pub fn parse_payload(body: &str) -> Result<Vec<String>> {
    let trimmed = body.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Err(SourceError::Parse("blocklist payload is empty".to_string()));
    }
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        let value: Value = serde_json::from_str(trimmed)
            .map_err(|err| SourceError::Parse(format!("invalid json payload: {err}")))?;
        return entries_from_json(value);
    }
    entries_from_text(trimmed)
}

fn entries_from_json(value: Value) -> Result<Vec<String>> {
    match value {
        Value::Array(items) => entries_from_items(items),
        Value::Object(mut map) => {
            if let Some(status) = map.get("status") {
                if !is_ok_status(status) {
                    let message = map
                        .get("message")
                        .and_then(Value::as_str)
                        .unwrap_or("unknown error")
                        .to_string();
                    return Err(SourceError::Provider {
                        status: status.to_string(),
                        message,
                    });
                }
            }
            match map.remove("details") {
                Some(Value::Array(items)) => entries_from_items(items),
                Some(Value::Null) => Ok(Vec::new()),
                Some(_) => Err(SourceError::Parse("details is not a list".to_string())),
                None => Err(SourceError::Parse(
                    "payload object has no details list".to_string(),
                )),
            }
        }
        _ => Err(SourceError::Parse("payload is not a list".to_string())),
    }
}

fn is_ok_status(status: &Value) -> bool {
    match status {
        Value::Number(number) => number.as_i64() == Some(0),
        Value::String(text) => text.trim() == "0",
        _ => false,
    }
}

fn entries_from_items(items: Vec<Value>) -> Result<Vec<String>> {
    let records = items.len();
    let mut entries = Vec::with_capacity(records);
    for item in items {
        match item {
            Value::Object(map) => {
                // Records without a phone field are skipped.
                if let Some(entry) = ENTRY_KEYS
                    .iter()
                    .find_map(|key| map.get(*key))
                    .and_then(scalar_text)
                {
                    entries.push(entry);
                }
            }
            Value::Null => {}
            other => match scalar_text(&other) {
                Some(entry) => entries.push(entry),
                None => {
                    return Err(SourceError::Parse(format!(
                        "unsupported blocklist entry: {other}"
                    )))
                }
            },
        }
    }
    if records > 0 && entries.is_empty() {
        return Err(SourceError::Parse(format!(
            "none of {records} blocklist records carries a phone number"
        )));
    }
    Ok(entries)
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => {
            let text = text.trim();
            (!text.is_empty()).then(|| text.to_string())
        }
        Value::Number(number) => {
            if let Some(int) = number.as_u64() {
                Some(int.to_string())
            } else {
                number
                    .as_f64()
                    .filter(|float| float.fract() == 0.0 && *float >= 0.0)
                    .map(|float| format!("{}", float as u64))
            }
        }
        _ => None,
    }
}

fn entries_from_text(body: &str) -> Result<Vec<String>> {
    let mut entries = Vec::new();
    for entry in body.split(['\n', ',', ';']) {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        if !entry.chars().all(is_phone_char) {
            return Err(SourceError::Parse(format!(
                "unexpected text in blocklist payload near '{}'",
                entry.chars().take(32).collect::<String>()
            )));
        }
        entries.push(entry.to_string());
    }
    if entries.is_empty() {
        return Err(SourceError::Parse(
            "blocklist payload contains no numbers".to_string(),
        ));
    }
    Ok(entries)
}

fn is_phone_char(ch: char) -> bool {
    ch.is_ascii_digit() || matches!(ch, '+' | ' ' | '-' | '(' | ')' | '.' | '/' | '\t' | '\r')
}

#[cfg(test)]
mod tests {
    use super::parse_payload;
    use crate::SourceError;

    #[test]
    fn parses_provider_envelope() {
        let body = r#"{"status":0,"message":"ok","details":[
            {"phonenumber":"0723456789","added":"2024-01-01"},
            {"phonenumber":40744111222},
            {"other":"x"}
        ]}"#;
        let entries = parse_payload(body).expect("parse");
        assert_eq!(entries, vec!["0723456789", "40744111222"]);
    }

    #[test]
    fn provider_error_status_is_reported() {
        let body = r#"{"status":-1,"message":"invalid credentials"}"#;
        let err = parse_payload(body).unwrap_err();
        match err {
            SourceError::Provider { message, .. } => assert_eq!(message, "invalid credentials"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn parses_json_array() {
        let entries = parse_payload(r#"["+40723456789", 744111222, null]"#).expect("parse");
        assert_eq!(entries, vec!["+40723456789", "744111222"]);
    }

    #[test]
    fn parses_plain_text_with_bom_and_mixed_separators() {
        let entries = parse_payload("\u{feff}0723 456 789\r\n+40744111222;0755000111\n\n")
            .expect("parse");
        assert_eq!(entries, vec!["0723 456 789", "+40744111222", "0755000111"]);
    }

    #[test]
    fn blank_body_is_rejected() {
        for body in ["", "  \n", "\u{feff}", ",;\n"] {
            assert!(
                matches!(parse_payload(body), Err(SourceError::Parse(_))),
                "{body:?}"
            );
        }
    }

    #[test]
    fn records_without_phone_fields_are_rejected() {
        assert!(matches!(
            parse_payload(r#"[{"msisdn":"0723456789"}]"#),
            Err(SourceError::Parse(_))
        ));
        assert!(matches!(
            parse_payload(r#"{"status":0,"details":[{"msisdn":"0723456789"}, null]}"#),
            Err(SourceError::Parse(_))
        ));
    }

    #[test]
    fn explicit_empty_lists_are_accepted() {
        assert!(parse_payload("[]").expect("parse").is_empty());
        assert!(parse_payload(r#"{"status":0,"details":[]}"#)
            .expect("parse")
            .is_empty());
        assert!(parse_payload(r#"{"status":0,"details":null}"#)
            .expect("parse")
            .is_empty());
    }

    #[test]
    fn rejects_html_and_broken_json() {
        assert!(matches!(
            parse_payload("<html><body>Bad Gateway</body></html>"),
            Err(SourceError::Parse(_))
        ));
        assert!(matches!(
            parse_payload("{\"status\":0,"),
            Err(SourceError::Parse(_))
        ));
        assert!(matches!(
            parse_payload("{\"status\":0}"),
            Err(SourceError::Parse(_))
        ));
    }
}
