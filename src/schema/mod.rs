//! Payload validation driven by explicit rule tables.
//!
//! A [`Schema`] lists field rules in evaluation order plus object-level rules.
//! Validation stops at the first violation and reports it as a single
//! human-readable message naming the offending field(s). Unknown fields are
//! stripped; recognised string fields are trimmed when the rule asks for it
//! and dates are normalised to RFC 3339.

pub mod tables;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub enum FieldKind {
    Text {
        min: Option<usize>,
        max: Option<usize>,
        trim: bool,
        email: bool,
        allowed: Option<&'static [&'static str]>,
    },
    Boolean,
    Date,
}

#[derive(Debug, Clone)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Replaces every message this field would produce
    pub message: Option<&'static str>,
}

impl FieldRule {
    pub fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text {
                min: None,
                max: None,
                trim: false,
                email: false,
                allowed: None,
            },
            required: false,
            message: None,
        }
    }

    pub fn boolean(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Boolean,
            required: false,
            message: None,
        }
    }

    pub fn date(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Date,
            required: false,
            message: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }

    pub fn min(mut self, n: usize) -> Self {
        if let FieldKind::Text { min, .. } = &mut self.kind {
            *min = Some(n);
        }
        self
    }

    pub fn max(mut self, n: usize) -> Self {
        if let FieldKind::Text { max, .. } = &mut self.kind {
            *max = Some(n);
        }
        self
    }

    pub fn trim(mut self) -> Self {
        if let FieldKind::Text { trim, .. } = &mut self.kind {
            *trim = true;
        }
        self
    }

    pub fn email(mut self) -> Self {
        if let FieldKind::Text { email, .. } = &mut self.kind {
            *email = true;
        }
        self
    }

    pub fn one_of(mut self, values: &'static [&'static str]) -> Self {
        if let FieldKind::Text { allowed, .. } = &mut self.kind {
            *allowed = Some(values);
        }
        self
    }

    fn fail(&self, default: String) -> String {
        self.message.map(str::to_string).unwrap_or(default)
    }

    /// Check one present value, returning its coerced form
    fn check(&self, value: &Value) -> Result<Value, String> {
        let name = self.name;
        match &self.kind {
            FieldKind::Text { min, max, trim, email, allowed } => {
                let raw = value
                    .as_str()
                    .ok_or_else(|| self.fail(format!("\"{}\" must be a string", name)))?;
                let text = if *trim { raw.trim() } else { raw };

                if text.is_empty() {
                    return Err(self.fail(format!("\"{}\" is not allowed to be empty", name)));
                }
                if let Some(values) = allowed {
                    if !values.iter().any(|v| *v == text) {
                        return Err(self.fail(format!("\"{}\" must be one of [{}]", name, values.join(", "))));
                    }
                }
                let len = text.chars().count();
                if let Some(min) = min {
                    if len < *min {
                        return Err(self.fail(format!(
                            "\"{}\" length must be at least {} characters long",
                            name, min
                        )));
                    }
                }
                if let Some(max) = max {
                    if len > *max {
                        return Err(self.fail(format!(
                            "\"{}\" length must be less than or equal to {} characters long",
                            name, max
                        )));
                    }
                }
                if *email && !is_email(text) {
                    return Err(self.fail(format!("\"{}\" must be a valid email", name)));
                }
                Ok(Value::String(text.to_string()))
            }
            FieldKind::Boolean => match value {
                Value::Bool(_) => Ok(value.clone()),
                _ => Err(self.fail(format!("\"{}\" must be a boolean", name))),
            },
            FieldKind::Date => parse_date(value)
                .map(|dt| Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)))
                .ok_or_else(|| self.fail(format!("\"{}\" must be a valid date", name))),
        }
    }
}

#[derive(Debug, Clone)]
pub enum CrossRule {
    /// Exactly one of the listed fields must be present
    ExactlyOneOf(&'static [&'static str]),
}

impl CrossRule {
    fn check(&self, payload: &Map<String, Value>) -> Result<(), String> {
        match self {
            CrossRule::ExactlyOneOf(fields) => {
                let present = fields.iter().filter(|f| payload.contains_key(**f)).count();
                match present {
                    1 => Ok(()),
                    0 => Err(format!("\"value\" must contain at least one of [{}]", fields.join(", "))),
                    _ => Err(format!(
                        "\"value\" contains a conflict between exclusive peers [{}]",
                        fields.join(", ")
                    )),
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Schema {
    pub name: &'static str,
    pub fields: Vec<FieldRule>,
    /// Minimum number of recognised fields; update schemas use 1
    pub min_fields: usize,
    pub cross: Vec<CrossRule>,
}

impl Schema {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            min_fields: 0,
            cross: Vec::new(),
        }
    }

    pub fn field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    pub fn at_least_one(mut self) -> Self {
        self.min_fields = 1;
        self
    }

    pub fn rule(mut self, rule: CrossRule) -> Self {
        self.cross.push(rule);
        self
    }

    /// Every field optional, at least one required
    pub fn as_update(&self, name: &'static str) -> Self {
        Self {
            name,
            fields: self
                .fields
                .iter()
                .cloned()
                .map(|mut f| {
                    f.required = false;
                    f
                })
                .collect(),
            min_fields: 1,
            cross: Vec::new(),
        }
    }

    pub fn validate(&self, body: &Value) -> Result<Map<String, Value>, String> {
        let object = body
            .as_object()
            .ok_or_else(|| "\"value\" must be of type object".to_string())?;

        let mut payload = Map::new();
        for rule in &self.fields {
            match object.get(rule.name) {
                Some(value) => {
                    payload.insert(rule.name.to_string(), rule.check(value)?);
                }
                None if rule.required => {
                    return Err(rule.fail(format!("\"{}\" is required", rule.name)));
                }
                None => {}
            }
        }

        if payload.len() < self.min_fields {
            return Err(format!("\"value\" must have at least {} key", self.min_fields));
        }

        for rule in &self.cross {
            rule.check(&payload)?;
        }

        Ok(payload)
    }
}

fn is_email(text: &str) -> bool {
    if text.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = text.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    if local.is_empty() || domain.starts_with('.') || domain.ends_with('.') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}

/// Accepts RFC 3339, plain dates with `-` or `/`, naive date-times and epoch millis
fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
                if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                    return Some(Utc.from_utc_datetime(&naive));
                }
            }
            for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
                if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                    return date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
                }
            }
            None
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Schema {
        Schema::new("sample")
            .field(FieldRule::text("name").min(2).max(5).trim().required())
            .field(FieldRule::text("kind").one_of(&["a", "b"]))
            .field(FieldRule::date("when"))
    }

    #[test]
    fn body_must_be_an_object() {
        assert_eq!(sample().validate(&json!([1, 2])).unwrap_err(), "\"value\" must be of type object");
    }

    #[test]
    fn first_violation_is_reported_in_field_order() {
        let err = sample().validate(&json!({ "kind": "zzz" })).unwrap_err();
        assert_eq!(err, "\"name\" is required");

        let err = sample().validate(&json!({ "name": "ok", "kind": "zzz" })).unwrap_err();
        assert_eq!(err, "\"kind\" must be one of [a, b]");
    }

    #[test]
    fn length_is_checked_after_trimming() {
        let payload = sample().validate(&json!({ "name": "  abc  " })).unwrap();
        assert_eq!(payload["name"], "abc");

        let err = sample().validate(&json!({ "name": "  a  " })).unwrap_err();
        assert!(err.contains("\"name\" length must be at least 2"));

        let err = sample().validate(&json!({ "name": "abcdef" })).unwrap_err();
        assert!(err.contains("less than or equal to 5"));
    }

    #[test]
    fn unknown_fields_are_stripped() {
        let payload = sample()
            .validate(&json!({ "name": "abc", "user": { "userId": "someone-else" } }))
            .unwrap();
        assert_eq!(payload.len(), 1);
        assert!(payload.get("user").is_none());
    }

    #[test]
    fn update_schema_needs_one_recognised_field() {
        let update = sample().as_update("sample update");
        assert_eq!(update.validate(&json!({})).unwrap_err(), "\"value\" must have at least 1 key");
        assert_eq!(
            update.validate(&json!({ "unrelated": 1 })).unwrap_err(),
            "\"value\" must have at least 1 key"
        );
        assert!(update.validate(&json!({ "kind": "a" })).is_ok());
    }

    #[test]
    fn dates_are_normalised() {
        let payload = sample().validate(&json!({ "name": "abc", "when": "2025/10/10" })).unwrap();
        assert_eq!(payload["when"], "2025-10-10T00:00:00.000Z");

        let payload = sample()
            .validate(&json!({ "name": "abc", "when": "2025-10-10T12:30:00+02:00" }))
            .unwrap();
        assert_eq!(payload["when"], "2025-10-10T10:30:00.000Z");

        let err = sample().validate(&json!({ "name": "abc", "when": "next tuesday" })).unwrap_err();
        assert_eq!(err, "\"when\" must be a valid date");
    }

    #[test]
    fn exactly_one_of() {
        let schema = Schema::new("login")
            .field(FieldRule::text("a"))
            .field(FieldRule::text("b"))
            .rule(CrossRule::ExactlyOneOf(&["a", "b"]));

        assert!(schema.validate(&json!({ "a": "x" })).is_ok());
        assert!(schema.validate(&json!({})).unwrap_err().contains("at least one of [a, b]"));
        assert!(schema
            .validate(&json!({ "a": "x", "b": "y" }))
            .unwrap_err()
            .contains("exclusive peers [a, b]"));
    }

    #[test]
    fn custom_message_replaces_defaults() {
        let schema = Schema::new("flag").field(FieldRule::boolean("on").required().message("on must be boolean"));
        assert_eq!(schema.validate(&json!({})).unwrap_err(), "on must be boolean");
        assert_eq!(schema.validate(&json!({ "on": "yes" })).unwrap_err(), "on must be boolean");
        assert_eq!(schema.validate(&json!({ "on": false })).unwrap()["on"], false);
    }

    #[test]
    fn email_shapes() {
        assert!(is_email("a@b.co"));
        assert!(!is_email("a@b"));
        assert!(!is_email("@b.co"));
        assert!(!is_email("a b@c.de"));
        assert!(!is_email("a@@c.de"));
        assert!(!is_email("a@c..de"));
    }
}
