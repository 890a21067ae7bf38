use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use thiserror::Error;

use crate::sync::{DataPayload, PanelOptions};
use crate::track::LatLngBounds;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("step {0}: {1}")]
    Step(usize, String),
}

/// A recorded sequence of host events to replay against a panel.
#[derive(Debug, Clone)]
pub struct Script {
    pub steps: Vec<Step>,
}

#[derive(Debug, Clone)]
pub enum Step {
    Data(DataPayload),
    Hover(TimeExpr),
    Clear,
    BoxSelect(LatLngBounds),
    Options(PanelOptions),
    Teardown,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Data(_) => "data",
            Step::Hover(_) => "hover",
            Step::Clear => "clear",
            Step::BoxSelect(_) => "box_select",
            Step::Options(_) => "options",
            Step::Teardown => "teardown",
        }
    }
}

/// Cursor position of a hover step.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeExpr {
    Millis(f64),
    /// Offset from the first position sample.
    Relative(Duration),
    Absolute(DateTime<Utc>),
}

impl TimeExpr {
    pub fn resolve(&self, track_start_ms: Option<f64>) -> Option<f64> {
        match self {
            TimeExpr::Millis(ms) => Some(*ms),
            TimeExpr::Relative(d) => {
                track_start_ms.map(|start| start + d.num_milliseconds() as f64)
            }
            TimeExpr::Absolute(dt) => Some(dt.timestamp_millis() as f64),
        }
    }
}

impl Script {
    pub fn from_str(yaml: &str) -> Result<Self, ParseError> {
        let root: serde_yaml::Value = serde_yaml::from_str(yaml)?;

        let variables: HashMap<String, serde_yaml::Value> = root
            .get("variables")
            .map(|v| serde_yaml::from_value(v.clone()))
            .transpose()?
            .unwrap_or_default();

        let steps = root
            .get("steps")
            .and_then(|v| v.as_sequence())
            .ok_or_else(|| ParseError::Step(0, "missing 'steps'".into()))?
            .iter()
            .enumerate()
            .map(|(i, v)| parse_step(i, v, &variables))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Script { steps })
    }
}

fn parse_step(
    i: usize,
    value: &serde_yaml::Value,
    vars: &HashMap<String, serde_yaml::Value>,
) -> Result<Step, ParseError> {
    let err = |msg: &str| ParseError::Step(i, msg.into());
    let map = value.as_mapping().ok_or_else(|| err("expected mapping"))?;
    if map.len() != 1 {
        return Err(err("expected exactly one event per step"));
    }

    let (event, value) = map.iter().next().ok_or_else(|| err("no event found"))?;
    let event = event.as_str().ok_or_else(|| err("event must be string"))?;
    let value = resolve_value(value, vars);

    let step = match event {
        "data" => Step::Data(serde_yaml::from_value(value).map_err(|e| err(&e.to_string()))?),
        "hover" => {
            let x = value
                .get("x")
                .ok_or_else(|| err("hover needs 'x'"))?;
            Step::Hover(parse_cursor(x).map_err(|e| err(&e))?)
        }
        "clear" => Step::Clear,
        "box_select" => {
            Step::BoxSelect(serde_yaml::from_value(value).map_err(|e| err(&e.to_string()))?)
        }
        "options" => Step::Options(if value.is_null() {
            PanelOptions::default()
        } else {
            serde_yaml::from_value(value).map_err(|e| err(&e.to_string()))?
        }),
        "teardown" => Step::Teardown,
        _ => return Err(err(&format!("unknown event: {}", event))),
    };

    Ok(step)
}

fn parse_cursor(value: &serde_yaml::Value) -> Result<TimeExpr, String> {
    match value {
        serde_yaml::Value::Number(n) => n
            .as_f64()
            .map(TimeExpr::Millis)
            .ok_or_else(|| format!("invalid cursor position: {}", n)),
        serde_yaml::Value::String(s) => parse_time(s),
        _ => Err("cursor position must be a number or time expression".into()),
    }
}

fn parse_time(s: &str) -> Result<TimeExpr, String> {
    let s = s.trim();

    // Relative to track start: T+90s, T-5m
    if s.to_lowercase().starts_with('t') {
        let rest = &s[1..];
        let (neg, rest) = match rest.strip_prefix('-') {
            Some(r) => (true, r),
            None => (false, rest.strip_prefix('+').unwrap_or(rest)),
        };
        let dur = parse_duration(rest)?;
        return Ok(TimeExpr::Relative(if neg { -dur } else { dur }));
    }

    // Absolute with offset: 2026-01-12T10:00:00Z + 10s
    if let Some(idx) = s.rfind(['+', '-']) {
        if idx > 10 {
            if let Ok(base) = DateTime::parse_from_rfc3339(s[..idx].trim()) {
                let offset = &s[idx..];
                let (neg, rest) = match offset.strip_prefix('-') {
                    Some(r) => (true, r),
                    None => (false, offset.strip_prefix('+').unwrap_or(offset)),
                };
                let dur = parse_duration(rest)?;
                return Ok(TimeExpr::Absolute(
                    base.with_timezone(&Utc) + if neg { -dur } else { dur },
                ));
            }
        }
    }

    DateTime::parse_from_rfc3339(s)
        .map(|dt| TimeExpr::Absolute(dt.with_timezone(&Utc)))
        .map_err(|e| e.to_string())
}

fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s.trim())
        .map_err(|e| e.to_string())
        .and_then(|d| Duration::from_std(d).map_err(|e| e.to_string()))
}

fn resolve_value(
    value: &serde_yaml::Value,
    vars: &HashMap<String, serde_yaml::Value>,
) -> serde_yaml::Value {
    match value {
        serde_yaml::Value::String(s) => {
            // Direct reference: "$var"
            let t = s.trim();
            if let Some(name) = t.strip_prefix('$').filter(|n| !n.contains(' ')) {
                if let Some(v) = vars.get(name) {
                    return v.clone();
                }
            }
            let mut result = s.clone();
            for (name, val) in vars {
                let pattern = format!("${}", name);
                if let Some(rep) = scalar_to_string(val) {
                    result = result.replace(&pattern, &rep);
                }
            }
            serde_yaml::Value::String(result)
        }
        serde_yaml::Value::Mapping(m) => serde_yaml::Value::Mapping(
            m.iter()
                .map(|(k, v)| (k.clone(), resolve_value(v, vars)))
                .collect(),
        ),
        serde_yaml::Value::Sequence(s) => {
            serde_yaml::Value::Sequence(s.iter().map(|v| resolve_value(v, vars)).collect())
        }
        other => other.clone(),
    }
}

fn scalar_to_string(v: &serde_yaml::Value) -> Option<String> {
    match v {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
