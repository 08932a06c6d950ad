//! Binding of typed prepared-statement parameters into a SQL template.

use serde::{Deserialize, Serialize};

use crate::error::BindError;

/// A single prepared-statement parameter. The value is always carried as
/// text and coerced to the declared type at bind time.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Parameter {
    #[serde(rename = "type")]
    pub type_: ParameterType,
    pub value: String,
}

impl Parameter {
    pub fn new(type_: ParameterType, value: &str) -> Parameter {
        Parameter {
            type_,
            value: value.to_string(),
        }
    }
}

/// The declared type of a parameter, driving both validation and rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    Byte,
    Short,
    Integer,
    Long,
    Float,
    Double,
    Boolean,
    String,
    Keyword,
}

impl std::fmt::Display for ParameterType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            ParameterType::Byte => "byte",
            ParameterType::Short => "short",
            ParameterType::Integer => "integer",
            ParameterType::Long => "long",
            ParameterType::Float => "float",
            ParameterType::Double => "double",
            ParameterType::Boolean => "boolean",
            ParameterType::String => "string",
            ParameterType::Keyword => "keyword",
        };
        write!(f, "{name}")
    }
}

/// Substitute parameters for `?` placeholders in the template, left to right.
///
/// The placeholder count must match the parameter count exactly, in either
/// direction; on any failure no partially substituted text is returned.
pub fn bind(template: &str, parameters: &[Parameter]) -> Result<String, BindError> {
    let placeholders = template.chars().filter(|c| *c == '?').count();
    if placeholders != parameters.len() {
        return Err(BindError::Mismatch {
            placeholders,
            parameters: parameters.len(),
        });
    }

    let mut pieces = template.split('?');
    let mut bound = String::with_capacity(template.len());
    if let Some(head) = pieces.next() {
        bound.push_str(head);
    }
    for (parameter, piece) in parameters.iter().zip(pieces) {
        bound.push_str(&render_literal(parameter)?);
        bound.push_str(piece);
    }
    Ok(bound)
}

/// Render one parameter as a SQL literal according to its declared type.
fn render_literal(parameter: &Parameter) -> Result<String, BindError> {
    let value = parameter.value.as_str();
    match parameter.type_ {
        ParameterType::Byte => numeric_literal::<i8>(value, parameter.type_),
        ParameterType::Short => numeric_literal::<i16>(value, parameter.type_),
        ParameterType::Integer => numeric_literal::<i32>(value, parameter.type_),
        ParameterType::Long => numeric_literal::<i64>(value, parameter.type_),
        ParameterType::Float => numeric_literal::<f32>(value, parameter.type_),
        ParameterType::Double => numeric_literal::<f64>(value, parameter.type_),
        ParameterType::Boolean => match value.parse::<bool>() {
            Ok(flag) => Ok(flag.to_string()),
            Err(_) => Err(coercion_failure(value, parameter.type_)),
        },
        ParameterType::String | ParameterType::Keyword => {
            // embedded quotes are escaped with a backslash
            Ok(format!("'{}'", value.replace('\'', "\\'")))
        }
    }
}

/// Validate that the text parses as the numeric kind, then render it verbatim.
fn numeric_literal<N: std::str::FromStr>(
    value: &str,
    expected: ParameterType,
) -> Result<String, BindError> {
    match value.trim().parse::<N>() {
        Ok(_) => Ok(value.trim().to_string()),
        Err(_) => Err(coercion_failure(value, expected)),
    }
}

fn coercion_failure(value: &str, expected: ParameterType) -> BindError {
    BindError::TypeCoercion {
        value: value.to_string(),
        expected,
    }
}
