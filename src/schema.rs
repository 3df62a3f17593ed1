//! Declarative input schemas for tool arguments.
//!
//! Validates argument objects before any client is touched, supporting the
//! shapes the backends actually need: typed fields (string, integer, number,
//! boolean, id), required flags, numeric bounds, enumerated string values and
//! defaults. Extra unknown fields are accepted and ignored, matching the
//! permissive contract of the upstream APIs. Each schema also serializes to
//! JSON Schema for the model's tool declarations.

use serde_json::{json, Map, Value};

use crate::error::Error;

#[derive(Debug, Clone, Default)]
pub struct InputSchema {
    fields: Vec<Field>,
}

#[derive(Debug, Clone)]
pub struct Field {
    name: &'static str,
    kind: FieldKind,
    required: bool,
    description: &'static str,
    default: Option<Value>,
}

#[derive(Debug, Clone)]
enum FieldKind {
    Str {
        choices: Option<&'static [&'static str]>,
    },
    Int {
        min: Option<i64>,
        max: Option<i64>,
    },
    Num,
    Bool,
    /// Chat/user identifier: an integer id or a username string. The bridge
    /// accepts both and resolves the entity itself.
    Id,
}

impl Field {
    pub fn string(name: &'static str) -> Self {
        Self::new(name, FieldKind::Str { choices: None })
    }

    pub fn integer(name: &'static str) -> Self {
        Self::new(name, FieldKind::Int { min: None, max: None })
    }

    pub fn number(name: &'static str) -> Self {
        Self::new(name, FieldKind::Num)
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldKind::Bool)
    }

    pub fn id(name: &'static str) -> Self {
        Self::new(name, FieldKind::Id)
    }

    fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
            description: "",
            default: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn one_of(mut self, choices: &'static [&'static str]) -> Self {
        if let FieldKind::Str { choices: c } = &mut self.kind {
            *c = Some(choices);
        }
        self
    }

    pub fn min(mut self, bound: i64) -> Self {
        if let FieldKind::Int { min, .. } = &mut self.kind {
            *min = Some(bound);
        }
        self
    }

    pub fn max(mut self, bound: i64) -> Self {
        if let FieldKind::Int { max, .. } = &mut self.kind {
            *max = Some(bound);
        }
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    fn check(&self, value: &Value) -> Result<(), String> {
        match &self.kind {
            FieldKind::Str { choices } => {
                let s = value
                    .as_str()
                    .ok_or_else(|| format!("'{}' must be a string", self.name))?;
                if let Some(choices) = choices {
                    if !choices.contains(&s) {
                        return Err(format!(
                            "'{}' must be one of [{}], got '{}'",
                            self.name,
                            choices.join(", "),
                            s
                        ));
                    }
                }
                Ok(())
            }
            FieldKind::Int { min, max } => {
                let n = value
                    .as_i64()
                    .ok_or_else(|| format!("'{}' must be an integer", self.name))?;
                if let Some(min) = min {
                    if n < *min {
                        return Err(format!("'{}' must be >= {}, got {}", self.name, min, n));
                    }
                }
                if let Some(max) = max {
                    if n > *max {
                        return Err(format!("'{}' must be <= {}, got {}", self.name, max, n));
                    }
                }
                Ok(())
            }
            FieldKind::Num => {
                if value.as_f64().is_none() {
                    return Err(format!("'{}' must be a number", self.name));
                }
                Ok(())
            }
            FieldKind::Bool => {
                if !value.is_boolean() {
                    return Err(format!("'{}' must be a boolean", self.name));
                }
                Ok(())
            }
            FieldKind::Id => {
                if value.as_i64().is_some() {
                    return Ok(());
                }
                match value.as_str() {
                    Some(s) if !s.trim().is_empty() => Ok(()),
                    _ => Err(format!(
                        "'{}' must be an integer id or a username string",
                        self.name
                    )),
                }
            }
        }
    }

    fn json_schema(&self) -> Value {
        let mut schema = match &self.kind {
            FieldKind::Str { choices } => {
                let mut s = json!({ "type": "string" });
                if let Some(choices) = choices {
                    s["enum"] = json!(choices);
                }
                s
            }
            FieldKind::Int { min, max } => {
                let mut s = json!({ "type": "integer" });
                if let Some(min) = min {
                    s["minimum"] = json!(min);
                }
                if let Some(max) = max {
                    s["maximum"] = json!(max);
                }
                s
            }
            FieldKind::Num => json!({ "type": "number" }),
            FieldKind::Bool => json!({ "type": "boolean" }),
            FieldKind::Id => json!({ "type": ["integer", "string"] }),
        };
        if !self.description.is_empty() {
            schema["description"] = json!(self.description);
        }
        if let Some(default) = &self.default {
            schema["default"] = default.clone();
        }
        schema
    }
}

impl InputSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Validate raw arguments and return the normalized object with defaults
    /// applied. Every violation is reported in one message.
    pub fn validate(&self, raw: &Value) -> Result<Map<String, Value>, Error> {
        let obj = match raw {
            Value::Object(obj) => obj.clone(),
            Value::Null => Map::new(),
            other => {
                return Err(Error::validation(format!(
                    "arguments must be an object, got {}",
                    type_name(other)
                )))
            }
        };

        let mut normalized = obj.clone();
        let mut problems = Vec::new();

        for field in &self.fields {
            match obj.get(field.name) {
                Some(Value::Null) | None => {
                    if field.required {
                        problems.push(format!("missing required field '{}'", field.name));
                    } else if let Some(default) = &field.default {
                        normalized.insert(field.name.to_string(), default.clone());
                    }
                }
                Some(value) => {
                    if let Err(problem) = field.check(value) {
                        problems.push(problem);
                    }
                }
            }
        }

        if problems.is_empty() {
            Ok(normalized)
        } else {
            Err(Error::validation(problems.join("; ")))
        }
    }

    /// Serialize to the JSON Schema object declared to the model.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in &self.fields {
            properties.insert(field.name.to_string(), field.json_schema());
            if field.required {
                required.push(field.name);
            }
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chats_schema() -> InputSchema {
        InputSchema::new()
            .field(
                Field::integer("limit")
                    .min(1)
                    .max(200)
                    .default_value(json!(30)),
            )
            .field(Field::string("chat_type").one_of(&["user", "chat", "channel"]))
    }

    #[test]
    fn defaults_applied_for_absent_optional_fields() {
        let args = chats_schema().validate(&json!({})).unwrap();
        assert_eq!(args["limit"], json!(30));
        assert!(!args.contains_key("chat_type"));
    }

    #[test]
    fn wrong_type_is_rejected() {
        let err = chats_schema()
            .validate(&json!({ "limit": "thirty" }))
            .unwrap_err();
        assert!(err.to_string().contains("must be an integer"));
    }

    #[test]
    fn out_of_range_is_rejected() {
        let err = chats_schema().validate(&json!({ "limit": 500 })).unwrap_err();
        assert!(err.to_string().contains("<= 200"));
    }

    #[test]
    fn unrecognized_enum_value_is_rejected() {
        let err = chats_schema()
            .validate(&json!({ "chat_type": "group" }))
            .unwrap_err();
        assert!(err.to_string().contains("must be one of"));
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let schema = InputSchema::new().field(Field::string("query").required());
        let err = schema.validate(&json!({})).unwrap_err();
        assert!(err.to_string().contains("missing required field 'query'"));
    }

    #[test]
    fn multiple_problems_reported_together() {
        let schema = InputSchema::new()
            .field(Field::string("query").required())
            .field(Field::integer("limit").min(1));
        let err = schema.validate(&json!({ "limit": 0 })).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("query"));
        assert!(msg.contains(">= 1"));
    }

    #[test]
    fn id_accepts_integer_and_username() {
        let schema = InputSchema::new().field(Field::id("chat_id").required());
        assert!(schema.validate(&json!({ "chat_id": -100123 })).is_ok());
        assert!(schema.validate(&json!({ "chat_id": "durov" })).is_ok());
        assert!(schema.validate(&json!({ "chat_id": true })).is_err());
    }

    #[test]
    fn unknown_extra_fields_pass_through() {
        let args = chats_schema()
            .validate(&json!({ "limit": 5, "extra": "ignored" }))
            .unwrap();
        assert_eq!(args["extra"], json!("ignored"));
    }

    #[test]
    fn json_schema_shape() {
        let schema = chats_schema().to_json_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["limit"]["maximum"], json!(200));
        assert_eq!(
            schema["properties"]["chat_type"]["enum"],
            json!(["user", "chat", "channel"])
        );
        assert_eq!(schema["required"], json!([]));
    }
}
