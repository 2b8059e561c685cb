//! Onboarding value types.
//!
//! Every enum here is persisted as text (draft, variant slot, analytics log),
//! so each one carries a fixed wire name and a strict parser.
//!
//! 引导流程的值类型，均以文本形式持久化。

use serde::{Deserialize, Serialize};

/// Error returned when persisted or user-supplied text is not a legal value.
///
/// 持久化或用户输入的文本不是合法取值时返回的错误。
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} value: {value:?}")]
pub struct ParseOnboardingValueError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! wire_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            /// All values in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire name of this value.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseOnboardingValueError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($wire => Ok($name::$variant),)+
                    other => Err(ParseOnboardingValueError {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

/// A/B bucket controlling which onboarding flow shape a user sees.
///
/// 决定用户看到哪种引导流程的 A/B 分组。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Control,
    Streamlined,
}

wire_enum!(Variant, "variant", {
    Control => "control",
    Streamlined => "streamlined",
});

/// User-declared primary motivation for using the product.
///
/// 用户声明的主要使用动机。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    #[default]
    Journaling,
    Therapy,
    Legacy,
}

wire_enum!(Intent, "intent", {
    Journaling => "journaling",
    Therapy => "therapy",
    Legacy => "legacy",
});

/// Setup depth.
///
/// 设置深度。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Full,
    Quick,
}

wire_enum!(Mode, "mode", {
    Full => "full",
    Quick => "quick",
});

/// Identifier of one wizard screen.
///
/// 向导页面标识。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StepId {
    Welcome,
    Intent,
    Privacy,
    Passcode,
    DataReclamation,
    Extension,
    Summary,
}

wire_enum!(StepId, "step", {
    Welcome => "welcome",
    Intent => "intent",
    Privacy => "privacy",
    Passcode => "passcode",
    DataReclamation => "dataReclamation",
    Extension => "extension",
    Summary => "summary",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_accepts_wire_names() {
        assert_eq!(
            "streamlined".parse::<Variant>().unwrap(),
            Variant::Streamlined
        );
        assert_eq!("legacy".parse::<Intent>().unwrap(), Intent::Legacy);
        assert_eq!("quick".parse::<Mode>().unwrap(), Mode::Quick);
        assert_eq!(
            "dataReclamation".parse::<StepId>().unwrap(),
            StepId::DataReclamation
        );
    }

    #[test]
    fn test_from_str_rejects_unknown_and_wrong_case() {
        let err = "Control".parse::<Variant>().unwrap_err();
        assert_eq!(err.kind, "variant");
        assert_eq!(err.value, "Control");
        assert!("data_reclamation".parse::<StepId>().is_err());
        assert!("".parse::<Mode>().is_err());
    }

    #[test]
    fn test_serde_names_match_display() {
        for step in StepId::ALL {
            let json = serde_json::to_string(step).unwrap();
            assert_eq!(json, format!("\"{}\"", step));
        }
        for variant in Variant::ALL {
            let json = serde_json::to_string(variant).unwrap();
            assert_eq!(json, format!("\"{}\"", variant));
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(Intent::default(), Intent::Journaling);
        assert_eq!(Mode::default(), Mode::Full);
    }
}
