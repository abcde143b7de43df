//! Kiro 凭证文件格式互转
//!
//! - `aiclient`: camelCase 字段 (`accessToken`, `authMethod`, ...)
//! - `cliproxy`: snake_case 字段 (`access_token`, `auth_method`, ...)

use std::str::FromStr;

use serde_json::{Map, Value};

use crate::error::{CoreError, CoreResult};

/// 字段映射关系：aiclient -> cliproxy
const FIELD_MAPPING: [(&str, &str); 8] = [
    ("accessToken", "access_token"),
    ("refreshToken", "refresh_token"),
    ("expiresAt", "expires_at"),
    ("authMethod", "auth_method"),
    ("clientId", "client_id"),
    ("clientSecret", "client_secret"),
    ("idcRegion", "region"),
    ("lastRefreshed", "last_refresh"),
];

/// authMethod 值映射：aiclient -> cliproxy
const AUTH_METHOD_MAPPING: [(&str, &str); 2] = [("IdC", "idc"), ("Social", "social")];

/// Layout of a Kiro credential file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialFormat {
    AiClient,
    CliProxy,
}

impl CredentialFormat {
    #[must_use]
    pub fn other(self) -> Self {
        match self {
            Self::AiClient => Self::CliProxy,
            Self::CliProxy => Self::AiClient,
        }
    }
}

impl std::fmt::Display for CredentialFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::AiClient => "aiclient",
            Self::CliProxy => "cliproxy",
        })
    }
}

impl FromStr for CredentialFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aiclient" => Ok(Self::AiClient),
            "cliproxy" => Ok(Self::CliProxy),
            _ => Err(CoreError::UnknownCredentialFormat),
        }
    }
}

/// Result of [`convert`].
#[derive(Debug, Clone, PartialEq)]
pub struct Conversion {
    pub source: CredentialFormat,
    pub target: CredentialFormat,
    pub data: Value,
}

impl Conversion {
    /// Source and target were the same; `data` is the input unchanged.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.source == self.target
    }
}

/// Detects the layout from the presence of the token or auth-method keys.
#[must_use]
pub fn detect_format(data: &Map<String, Value>) -> Option<CredentialFormat> {
    if data.contains_key("accessToken") || data.contains_key("authMethod") {
        Some(CredentialFormat::AiClient)
    } else if data.contains_key("access_token") || data.contains_key("auth_method") {
        Some(CredentialFormat::CliProxy)
    } else {
        None
    }
}

/// camelCase -> snake_case, adding the fields the panel expects.
#[must_use]
pub fn aiclient_to_cliproxy(data: &Map<String, Value>) -> Map<String, Value> {
    let mut result = Map::new();

    for (aiclient_key, cliproxy_key) in FIELD_MAPPING {
        if let Some(value) = data.get(aiclient_key) {
            let value = if aiclient_key == "authMethod" {
                map_auth_method(value, |m| {
                    AUTH_METHOD_MAPPING
                        .iter()
                        .find(|(from, _)| *from == m)
                        .map_or_else(|| m.to_lowercase(), |(_, to)| (*to).to_string())
                })
            } else {
                value.clone()
            };
            result.insert(cliproxy_key.to_string(), value);
        }
    }

    // cliproxy 格式的默认字段
    let defaults = [
        ("disabled", Value::Bool(false)),
        ("email", Value::String(String::new())),
        ("profile_arn", Value::String(String::new())),
        ("provider", Value::String("AWS".to_string())),
        ("type", Value::String("kiro".to_string())),
    ];
    for (key, default) in defaults {
        result.entry(key).or_insert(default);
    }

    result
}

/// snake_case -> camelCase; panel-only fields are dropped.
#[must_use]
pub fn cliproxy_to_aiclient(data: &Map<String, Value>) -> Map<String, Value> {
    let mut result = Map::new();

    for (aiclient_key, cliproxy_key) in FIELD_MAPPING {
        if let Some(value) = data.get(cliproxy_key) {
            let value = if cliproxy_key == "auth_method" {
                map_auth_method(value, |m| {
                    AUTH_METHOD_MAPPING
                        .iter()
                        .find(|(_, from)| *from == m)
                        .map_or_else(|| capitalize(m), |(to, _)| (*to).to_string())
                })
            } else {
                value.clone()
            };
            result.insert(aiclient_key.to_string(), value);
        }
    }

    result
}

/// Converts a credential document; `target` defaults to the other layout.
pub fn convert(data: Value, target: Option<CredentialFormat>) -> CoreResult<Conversion> {
    let Value::Object(map) = data else {
        return Err(CoreError::UnknownCredentialFormat);
    };
    let source = detect_format(&map).ok_or(CoreError::UnknownCredentialFormat)?;
    let target = target.unwrap_or_else(|| source.other());

    let converted = match (source, target) {
        (s, t) if s == t => map,
        (_, CredentialFormat::CliProxy) => aiclient_to_cliproxy(&map),
        (_, CredentialFormat::AiClient) => cliproxy_to_aiclient(&map),
    };

    Ok(Conversion {
        source,
        target,
        data: Value::Object(converted),
    })
}

/// Only string values are remapped.
fn map_auth_method(value: &Value, f: impl Fn(&str) -> String) -> Value {
    match value {
        Value::String(method) => Value::String(f(method)),
        other => other.clone(),
    }
}

/// `social` -> `Social`, `IDC` -> `Idc`
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect()
    })
}
