//! Version ordering for the conflict tie-break.
//!
//! Maven-style ordering rather than strict semver: versions split on
//! `.` and `-`, numeric tokens compare as numbers, and pre-release
//! qualifiers sort below the release they precede
//! (`alpha < beta < milestone < rc < snapshot < release < sp`).

use std::cmp::Ordering;
use std::fmt;

/// A version string parsed into comparable tokens.
///
/// Comparison pads the shorter token list with the implicit release
/// token, so `1.0` equals `1.0.0` and `1.0` sorts above `1.0-rc`.
#[derive(Debug, Clone)]
pub struct MavenVersion {
    original: String,
    tokens: Vec<Token>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Token {
    Number(u64),
    Qualifier(Qualifier),
    Word(String),
}

/// Well-known qualifiers, in sort order.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
enum Qualifier {
    Alpha,
    Beta,
    Milestone,
    Rc,
    Snapshot,
    Release,
    ServicePack,
}

impl MavenVersion {
    pub fn parse(version: &str) -> Self {
        let tokens = version
            .split(['.', '-'])
            .filter(|t| !t.is_empty())
            .map(Token::classify)
            .collect();
        Self {
            original: version.to_string(),
            tokens,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }
}

impl Token {
    fn classify(raw: &str) -> Self {
        if let Ok(n) = raw.parse::<u64>() {
            return Token::Number(n);
        }
        match raw.to_ascii_lowercase().as_str() {
            "alpha" | "a" => Token::Qualifier(Qualifier::Alpha),
            "beta" | "b" => Token::Qualifier(Qualifier::Beta),
            "milestone" | "m" => Token::Qualifier(Qualifier::Milestone),
            "rc" | "cr" => Token::Qualifier(Qualifier::Rc),
            "snapshot" => Token::Qualifier(Qualifier::Snapshot),
            "ga" | "final" | "release" => Token::Qualifier(Qualifier::Release),
            "sp" => Token::Qualifier(Qualifier::ServicePack),
            _ => Token::Word(raw.to_string()),
        }
    }

    /// Ordering of a token against the implicit release padding.
    fn cmp_to_release(&self) -> Ordering {
        match self {
            Token::Number(0) => Ordering::Equal,
            Token::Number(_) => Ordering::Greater,
            Token::Qualifier(q) => q.cmp(&Qualifier::Release),
            Token::Word(_) => Ordering::Less,
        }
    }
}

fn cmp_tokens(a: &Token, b: &Token) -> Ordering {
    match (a, b) {
        (Token::Number(x), Token::Number(y)) => x.cmp(y),
        (Token::Qualifier(x), Token::Qualifier(y)) => x.cmp(y),
        // Numbers outrank everything non-numeric.
        (Token::Number(_), _) => Ordering::Greater,
        (_, Token::Number(_)) => Ordering::Less,
        (Token::Word(x), Token::Word(y)) => x.to_ascii_lowercase().cmp(&y.to_ascii_lowercase()),
        // Unknown words sort with pre-release qualifiers, below release.
        (Token::Qualifier(q), Token::Word(_)) => {
            if *q >= Qualifier::Release {
                Ordering::Greater
            } else {
                Ordering::Less
            }
        }
        (Token::Word(_), Token::Qualifier(q)) => {
            if *q >= Qualifier::Release {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.tokens.len().max(other.tokens.len());
        for i in 0..len {
            let ord = match (self.tokens.get(i), other.tokens.get(i)) {
                (Some(a), Some(b)) => cmp_tokens(a, b),
                (Some(a), None) => a.cmp_to_release(),
                (None, Some(b)) => b.cmp_to_release().reverse(),
                (None, None) => Ordering::Equal,
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for MavenVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for MavenVersion {}

impl fmt::Display for MavenVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> MavenVersion {
        MavenVersion::parse(s)
    }

    #[test]
    fn numeric_ordering() {
        assert!(v("1.0") < v("2.0"));
        assert!(v("1.0.1") < v("1.1.0"));
        assert!(v("1.9") < v("1.10"));
    }

    #[test]
    fn qualifier_ladder() {
        assert!(v("1.0-alpha") < v("1.0-beta"));
        assert!(v("1.0-beta") < v("1.0-milestone"));
        assert!(v("1.0-milestone") < v("1.0-rc"));
        assert!(v("1.0-rc") < v("1.0"));
        assert!(v("1.0") < v("1.0-sp"));
    }

    #[test]
    fn qualifier_aliases() {
        assert_eq!(v("1.0-ga"), v("1.0"));
        assert_eq!(v("1.0-final"), v("1.0"));
        assert!(v("1.0-a") < v("1.0-b"));
        assert!(v("1.0-cr") < v("1.0"));
    }

    #[test]
    fn snapshot_sorts_below_release() {
        assert!(v("1.0-SNAPSHOT") < v("1.0"));
        assert!(v("1.0-rc") < v("1.0-SNAPSHOT"));
    }

    #[test]
    fn trailing_zeros_equal() {
        assert_eq!(v("1.0"), v("1.0.0"));
        assert_eq!(v("1"), v("1.0.0.0"));
    }

    #[test]
    fn unknown_word_sorts_below_release() {
        // 1.0.0 > 1.0.0-jre: the word qualifier marks a pre-release-like variant
        assert!(v("1.0.0") > v("1.0.0-jre"));
        assert!(v("31.0-jre") < v("32.0-jre"));
    }

    #[test]
    fn display_keeps_original() {
        assert_eq!(v("1.8.0").to_string(), "1.8.0");
        assert_eq!(v("1.0-SNAPSHOT").as_str(), "1.0-SNAPSHOT");
    }
}
