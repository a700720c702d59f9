//! Component references: `name[:version|latest][:flag]`

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Which version of a component is wanted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionSelector {
    /// The highest version in the catalog. Written as `latest` or left empty.
    Latest,
    Exact(String),
}

/// Limits how far an update goes after the checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Flag {
    #[default]
    None,
    NoInstall,
    NoActivate,
    NoSetTheme,
}

impl Flag {
    pub fn installs(self) -> bool {
        self != Self::NoInstall
    }

    pub fn activates(self) -> bool {
        matches!(self, Self::None | Self::NoSetTheme)
    }

    pub fn sets_theme(self) -> bool {
        self == Self::None
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::NoInstall => "noinstall",
            Self::NoActivate => "noactivate",
            Self::NoSetTheme => "nosettheme",
        }
    }
}

impl FromStr for Flag {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" => Ok(Self::None),
            "noinstall" => Ok(Self::NoInstall),
            "noactivate" => Ok(Self::NoActivate),
            "nosettheme" => Ok(Self::NoSetTheme),
            other => Err(format!("unknown flag '{other}'")),
        }
    }
}

/// One entry of a desired manifest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentReference {
    pub name: String,
    pub selector: VersionSelector,
    pub flag: Flag,
}

impl ComponentReference {
    pub fn new(name: impl Into<String>, selector: VersionSelector, flag: Flag) -> Self {
        Self {
            name: name.into(),
            selector,
            flag,
        }
    }

    /// Parse a manifest token.
    pub fn parse(token: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidReference {
            token: token.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = token.trim().split(':').map(str::trim).collect();
        if parts.len() > 3 {
            return Err(invalid("expected name[:version][:flag]"));
        }

        let name = parts[0];
        if name.is_empty() {
            return Err(invalid("name must not be empty"));
        }

        let selector = match parts.get(1).copied() {
            None | Some("") => VersionSelector::Latest,
            Some(v) if v.eq_ignore_ascii_case("latest") => VersionSelector::Latest,
            Some(v) => VersionSelector::Exact(v.to_string()),
        };

        let flag = match parts.get(2) {
            Some(f) => f.parse::<Flag>().map_err(|reason| invalid(&reason))?,
            None => Flag::None,
        };

        Ok(Self {
            name: name.to_string(),
            selector,
            flag,
        })
    }
}

impl FromStr for ComponentReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ComponentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        let version = match &self.selector {
            VersionSelector::Latest => "latest",
            VersionSelector::Exact(v) => v.as_str(),
        };
        match self.flag {
            Flag::None if self.selector == VersionSelector::Latest => Ok(()),
            Flag::None => write!(f, ":{version}"),
            flag => write!(f, ":{version}:{}", flag.as_str()),
        }
    }
}
