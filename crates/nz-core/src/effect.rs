//! Capability tiers attached to struct types.

use std::fmt;

/// What the holder of a value may do with it.
///
/// Effects are totally ordered: `Get < Set < Io < Own`. A value satisfies a
/// context when its effect is at least the one the context requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Effect {
    Get,
    Set,
    #[default]
    Io,
    Own,
}

impl Effect {
    /// The effect with the fewest capabilities.
    pub const WEAKEST: Effect = Effect::Get;

    /// Parse an effect keyword as written in source.
    pub fn from_keyword(word: &str) -> Option<Effect> {
        match word {
            "get" => Some(Effect::Get),
            "set" => Some(Effect::Set),
            "io" => Some(Effect::Io),
            "own" => Some(Effect::Own),
            _ => None,
        }
    }

    /// The source keyword for this effect.
    pub fn keyword(self) -> &'static str {
        match self {
            Effect::Get => "get",
            Effect::Set => "set",
            Effect::Io => "io",
            Effect::Own => "own",
        }
    }

    /// Whether a value with this effect may be used where `required` is demanded.
    #[inline]
    pub fn satisfies(self, required: Effect) -> bool {
        self >= required
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effects_are_ordered() {
        assert!(Effect::Get < Effect::Set);
        assert!(Effect::Set < Effect::Io);
        assert!(Effect::Io < Effect::Own);
    }

    #[test]
    fn satisfies_means_at_least() {
        assert!(Effect::Io.satisfies(Effect::Get));
        assert!(Effect::Io.satisfies(Effect::Io));
        assert!(!Effect::Get.satisfies(Effect::Set));
    }

    #[test]
    fn keywords_round_trip() {
        for effect in [Effect::Get, Effect::Set, Effect::Io, Effect::Own] {
            assert_eq!(Effect::from_keyword(effect.keyword()), Some(effect));
        }
        assert_eq!(Effect::from_keyword("pure"), None);
    }
}
