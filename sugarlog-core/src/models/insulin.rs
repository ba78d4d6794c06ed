use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InsulinKind {
    Rapid,
    Short,
    LongActing,
    Mixed,
}

impl fmt::Display for InsulinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsulinKind::Rapid => write!(f, "rapid"),
            InsulinKind::Short => write!(f, "short"),
            InsulinKind::LongActing => write!(f, "long-acting"),
            InsulinKind::Mixed => write!(f, "mixed"),
        }
    }
}

impl FromStr for InsulinKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "rapid" => Ok(InsulinKind::Rapid),
            "short" => Ok(InsulinKind::Short),
            "long-acting" | "long_acting" | "long" => Ok(InsulinKind::LongActing),
            "mixed" => Ok(InsulinKind::Mixed),
            _ => Err(format!(
                "Invalid insulin type '{}'. Valid options: rapid, short, long-acting, mixed",
                s
            )),
        }
    }
}

/// One insulin injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insulin {
    #[serde(rename = "type")]
    pub kind: InsulinKind,
    pub units: u8,
}

impl Insulin {
    pub fn new(kind: InsulinKind, units: u8) -> Self {
        Self { kind, units }
    }
}

impl fmt::Display for Insulin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} u {}", self.units, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insulin_kind_display() {
        assert_eq!(format!("{}", InsulinKind::Rapid), "rapid");
        assert_eq!(format!("{}", InsulinKind::LongActing), "long-acting");
    }

    #[test]
    fn test_insulin_kind_from_str() {
        assert_eq!(InsulinKind::from_str("RAPID").unwrap(), InsulinKind::Rapid);
        assert_eq!(
            InsulinKind::from_str("long_acting").unwrap(),
            InsulinKind::LongActing
        );
        assert_eq!(InsulinKind::from_str("long").unwrap(), InsulinKind::LongActing);
        assert_eq!(InsulinKind::from_str("Mixed").unwrap(), InsulinKind::Mixed);
    }

    #[test]
    fn test_insulin_kind_from_str_invalid() {
        assert!(InsulinKind::from_str("basal-bolus").is_err());
        assert!(InsulinKind::from_str("").is_err());
    }

    #[test]
    fn test_insulin_json_shape() {
        let insulin = Insulin::new(InsulinKind::LongActing, 12);
        let json = serde_json::to_string(&insulin).unwrap();
        assert_eq!(json, r#"{"type":"long-acting","units":12}"#);
    }

    #[test]
    fn test_insulin_display() {
        assert_eq!(Insulin::new(InsulinKind::Rapid, 4).to_string(), "4 u rapid");
    }
}
