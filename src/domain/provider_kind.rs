use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The closed set of transcription backends. Submission resolves a caller
/// string key into one of these variants; an unknown key never makes it
/// past the submission boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    ElevenLabs,
    Google,
    Aws,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::OpenAi,
        ProviderKind::ElevenLabs,
        ProviderKind::Google,
        ProviderKind::Aws,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::ElevenLabs => "elevenlabs",
            ProviderKind::Google => "google",
            ProviderKind::Aws => "aws",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(ProviderKind::OpenAi),
            "elevenlabs" => Ok(ProviderKind::ElevenLabs),
            "google" => Ok(ProviderKind::Google),
            "aws" => Ok(ProviderKind::Aws),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_known_keys_when_parsing_then_round_trips() {
        for kind in ProviderKind::ALL {
            assert_eq!(kind.as_str().parse::<ProviderKind>(), Ok(kind));
        }
    }

    #[test]
    fn given_unknown_key_when_parsing_then_fails() {
        assert!("whispercpp".parse::<ProviderKind>().is_err());
        assert!("OPENAI".parse::<ProviderKind>().is_err());
    }
}
