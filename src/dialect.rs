//! Lua versions, lexical feature flags, and lexer options.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::token::Keyword;

/// The Lua dialect whose lexical grammar is followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LuaVersion {
    #[default]
    Lua51,
    Lua52,
    Lua53,
    LuaJit,
}

impl LuaVersion {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lua51 => "5.1",
            Self::Lua52 => "5.2",
            Self::Lua53 => "5.3",
            Self::LuaJit => "JIT",
        }
    }

    /// Feature set enabled by default for this version.
    #[must_use]
    pub const fn features(self) -> Features {
        const LUA52: Features = Features::LABELS
            .union(Features::HEX_ESCAPES)
            .union(Features::SKIP_WHITESPACE_ESCAPE)
            .union(Features::STRICT_ESCAPES);
        match self {
            Self::Lua51 => Features::empty(),
            Self::Lua52 => LUA52,
            Self::Lua53 => LUA52
                .union(Features::UNICODE_ESCAPES)
                .union(Features::BITWISE_OPERATORS)
                .union(Features::INTEGER_DIVISION),
            Self::LuaJit => LUA52
                .union(Features::CONTEXTUAL_GOTO)
                .union(Features::UNICODE_ESCAPES),
        }
    }
}

impl fmt::Display for LuaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A version string that names no supported dialect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown Lua version '{0}', expected one of 5.1, 5.2, 5.3, JIT")]
pub struct UnknownVersion(pub String);

impl FromStr for LuaVersion {
    type Err = UnknownVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "5.1" => Ok(Self::Lua51),
            "5.2" => Ok(Self::Lua52),
            "5.3" => Ok(Self::Lua53),
            _ if s.eq_ignore_ascii_case("jit") || s.eq_ignore_ascii_case("luajit") => {
                Ok(Self::LuaJit)
            }
            _ => Err(UnknownVersion(s.to_string())),
        }
    }
}

bitflags! {
    /// Lexical features that differ between dialects.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Features: u16 {
        /// `::` punctuator and the `goto` keyword.
        const LABELS = 1 << 0;
        /// `goto` stays an identifier even with labels (`LuaJIT`).
        const CONTEXTUAL_GOTO = 1 << 1;
        /// `\xXX` escapes.
        const HEX_ESCAPES = 1 << 2;
        /// `\z` escapes.
        const SKIP_WHITESPACE_ESCAPE = 1 << 3;
        /// Unknown escapes are errors instead of literal characters.
        const STRICT_ESCAPES = 1 << 4;
        /// `\u{XXX}` escapes.
        const UNICODE_ESCAPES = 1 << 5;
        /// `&`, `~`, `<<` and `>>`.
        const BITWISE_OPERATORS = 1 << 6;
        /// `//`.
        const INTEGER_DIVISION = 1 << 7;
        /// `const` keyword.
        const CONST = 1 << 8;
        /// `declare` keyword.
        const TYPE_CHECK = 1 << 9;
    }
}

/// Explicit feature changes layered on top of a version's defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FeatureOverrides {
    pub enable: Features,
    pub disable: Features,
}

impl FeatureOverrides {
    #[must_use]
    pub const fn apply(self, base: Features) -> Features {
        base.union(self.enable).difference(self.disable)
    }
}

/// Immutable set of live keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeywordSet(u32);

impl KeywordSet {
    const fn bit(keyword: Keyword) -> u32 {
        1 << keyword as u32
    }

    /// Keywords of the given feature set.
    #[must_use]
    pub fn for_features(features: Features) -> Self {
        let mut bits = Keyword::ALL
            .into_iter()
            .filter(|&kw| kw.is_base())
            .fold(0, |acc, kw| acc | Self::bit(kw));
        if features.contains(Features::LABELS) && !features.contains(Features::CONTEXTUAL_GOTO) {
            bits |= Self::bit(Keyword::Goto);
        }
        if features.contains(Features::CONST) {
            bits |= Self::bit(Keyword::Const);
        }
        if features.contains(Features::TYPE_CHECK) {
            bits |= Self::bit(Keyword::Declare);
        }
        Self(bits)
    }

    #[must_use]
    pub const fn contains(self, keyword: Keyword) -> bool {
        self.0 & Self::bit(keyword) != 0
    }

    /// The live keyword spelled `word`, if any.
    #[must_use]
    pub fn lookup(self, word: &[u8]) -> Option<Keyword> {
        Keyword::from_bytes(word).filter(|&kw| self.contains(kw))
    }

    pub fn iter(self) -> impl Iterator<Item = Keyword> {
        Keyword::ALL
            .into_iter()
            .filter(move |&kw| self.contains(kw))
    }
}

/// Lexer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Dialect whose defaults are used.
    pub lua_version: LuaVersion,
    /// Adjustments to the version's feature set.
    pub features: FeatureOverrides,
    /// Collect comments instead of discarding them.
    pub comments: bool,
    /// Skip a leading `#!` line.
    pub ignore_shebang: bool,
    /// Allow code units ≥ 128 in identifiers.
    pub extended_identifiers: bool,
    /// Chunk name reported in error messages.
    pub chunk_name: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            lua_version: LuaVersion::Lua51,
            features: FeatureOverrides::default(),
            comments: false,
            ignore_shebang: true,
            extended_identifiers: false,
            chunk_name: None,
        }
    }
}

impl Options {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn lua_version(mut self, version: LuaVersion) -> Self {
        self.lua_version = version;
        self
    }

    #[must_use]
    pub const fn enable(mut self, features: Features) -> Self {
        self.features.enable = self.features.enable.union(features);
        self.features.disable = self.features.disable.difference(features);
        self
    }

    #[must_use]
    pub const fn disable(mut self, features: Features) -> Self {
        self.features.disable = self.features.disable.union(features);
        self.features.enable = self.features.enable.difference(features);
        self
    }

    #[must_use]
    pub const fn comments(mut self, capture: bool) -> Self {
        self.comments = capture;
        self
    }

    #[must_use]
    pub const fn ignore_shebang(mut self, ignore: bool) -> Self {
        self.ignore_shebang = ignore;
        self
    }

    #[must_use]
    pub const fn extended_identifiers(mut self, allow: bool) -> Self {
        self.extended_identifiers = allow;
        self
    }

    #[must_use]
    pub fn chunk_name(mut self, name: impl Into<String>) -> Self {
        self.chunk_name = Some(name.into());
        self
    }
}

/// Version, features, and keywords resolved for one lexing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dialect {
    version: LuaVersion,
    features: Features,
    keywords: KeywordSet,
}

impl Dialect {
    #[must_use]
    pub fn new(version: LuaVersion, overrides: FeatureOverrides) -> Self {
        let features = overrides.apply(version.features());
        Self {
            version,
            features,
            keywords: KeywordSet::for_features(features),
        }
    }

    #[must_use]
    pub fn from_options(options: &Options) -> Self {
        Self::new(options.lua_version, options.features)
    }

    #[must_use]
    pub const fn version(&self) -> LuaVersion {
        self.version
    }

    #[must_use]
    pub const fn features(&self) -> Features {
        self.features
    }

    #[must_use]
    pub const fn keywords(&self) -> KeywordSet {
        self.keywords
    }

    #[must_use]
    pub const fn has(&self, feature: Features) -> bool {
        self.features.contains(feature)
    }
}
