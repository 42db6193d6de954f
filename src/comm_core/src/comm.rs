//! Comm notation: parsing bracketed commutator/conjugate text into a tree of
//! components and expanding that tree into plain moves.
//!
//! The grammar is tried in this order on every (sub)string:
//!
//! 1. Outer brackets are stripped while what's left is still balanced
//! 2. Text with none of `, : [ ] ( ) /` is a plain move sequence
//! 3. `(X)2` is `X` done twice
//! 4. The first `:` outside of brackets splits a conjugate
//! 5. The first `,` outside of brackets splits a commutator
//! 6. The first `/` outside of brackets splits a slash comm
//! 7. Two or more bracketed groups or move runs side by side are done in order
//!
//! Only square brackets count towards nesting.

use std::{fmt, str::FromStr};

use log::trace;
use thiserror::Error;

use crate::moves::{IllegalMove, Sequence};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommError {
    #[error("Comm string '{0}' has unbalanced brackets")]
    UnbalancedBrackets(String),
    #[error("Comm string '{0}' isn't a sequence, commutator, conjugate, double, or slash comm")]
    MalformedComm(String),
    #[error(transparent)]
    IllegalMove(#[from] IllegalMove),
}

/// One node of a parsed comm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    /// Plain moves
    Sequential(Sequence),
    /// `[A, B]` = A B A' B'
    Commutator {
        first: Box<Component>,
        second: Box<Component>,
    },
    /// `[A: B]` = A B A'
    Conjugate {
        setup: Box<Component>,
        nested: Box<Component>,
    },
    /// `(A)2` = A A
    Double(Box<Component>),
    /// `A / B` = A B A2 B' A
    Slash {
        setup: Box<Component>,
        slice: Box<Component>,
    },
    /// Siblings done one after another
    Multi(Vec<Component>),
}

impl Component {
    /// Expand into plain moves.
    pub fn to_sequence(&self) -> Sequence {
        match self {
            Component::Sequential(seq) => seq.clone(),
            Component::Commutator { first, second } => {
                let a = first.to_sequence();
                let b = second.to_sequence();

                let mut out = Sequence::default();
                out.extend(&a);
                out.extend(&b);
                out.extend(a.inverse());
                out.extend(b.inverse());
                out
            }
            Component::Conjugate { setup, nested } => {
                let a = setup.to_sequence();

                let mut out = a.clone();
                out.extend(nested.to_sequence());
                out.extend(a.inverse());
                out
            }
            Component::Double(nested) => {
                let x = nested.to_sequence();

                let mut out = x.clone();
                out.extend(x);
                out
            }
            Component::Slash { setup, slice } => {
                let a = setup.to_sequence();
                let b = slice.to_sequence();

                let mut out = Sequence::default();
                out.extend(&a);
                out.extend(&b);
                out.extend(&a);
                out.extend(&a);
                out.extend(b.inverse());
                out.extend(&a);
                out
            }
            Component::Multi(components) => {
                components.iter().flat_map(Component::to_sequence).collect()
            }
        }
    }

    /// Parse one (sub)string of comm notation.
    ///
    /// # Errors
    ///
    /// Fails on unbalanced square brackets, on text that fits none of the
    /// notation forms, and on move tokens that aren't moves.
    pub fn parse(text: &str) -> Result<Component, CommError> {
        if !balanced(text) {
            return Err(CommError::UnbalancedBrackets(text.to_owned()));
        }

        let text = strip_brackets(text);

        if is_sequential(text) {
            return Ok(Component::Sequential(text.parse()?));
        }

        if let Some(inner) = double_body(text) {
            return Ok(Component::Double(Box::new(Component::parse(inner)?)));
        }

        if let Some((setup, nested)) = split_top_level(text, ':') {
            return Ok(Component::Conjugate {
                setup: Box::new(Component::parse(setup)?),
                nested: Box::new(Component::parse(nested)?),
            });
        }

        if let Some((first, second)) = split_top_level(text, ',') {
            return Ok(Component::Commutator {
                first: Box::new(Component::parse(first)?),
                second: Box::new(Component::parse(second)?),
            });
        }

        if let Some((setup, slice)) = split_top_level(text, '/') {
            return Ok(Component::Slash {
                setup: Box::new(Component::parse(setup)?),
                slice: Box::new(Component::parse(slice)?),
            });
        }

        let segments = segments(text);
        // A turn suffix can't apply to a bracketed group
        let dangling_suffix = segments
            .iter()
            .any(|segment| segment.trim_start().starts_with(['2', '\'']));

        if segments.len() >= 2 && !dangling_suffix {
            return segments
                .into_iter()
                .map(Component::parse)
                .collect::<Result<Vec<_>, _>>()
                .map(Component::Multi);
        }

        Err(CommError::MalformedComm(text.to_owned()))
    }
}

/// Every prefix has at least as many `[` as `]`, and the whole string has
/// equally many.
fn balanced(text: &str) -> bool {
    let mut depth = 0_i32;

    for c in text.chars() {
        match c {
            '[' => depth += 1,
            ']' => depth -= 1,
            _ => {}
        }

        if depth < 0 {
            return false;
        }
    }

    depth == 0
}

fn strip_brackets(text: &str) -> &str {
    let mut text = text.trim();

    while let Some(inner) = text.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        // `[A] [B]` would strip to `A] [B`
        if !balanced(inner) {
            break;
        }
        text = inner.trim();
    }

    text
}

fn is_sequential(text: &str) -> bool {
    !text.contains([',', ':', '[', ']', '(', ')', '/'])
}

/// The `X` of `(X)2`
fn double_body(text: &str) -> Option<&str> {
    text.strip_prefix('(')?.strip_suffix(")2")
}

/// Split around the first `delimiter` that isn't inside square brackets.
fn split_top_level(text: &str, delimiter: char) -> Option<(&str, &str)> {
    let mut depth = 0_i32;

    for (i, c) in text.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth -= 1,
            c if c == delimiter && depth == 0 => {
                return Some((&text[..i], &text[i + c.len_utf8()..]));
            }
            _ => {}
        }
    }

    None
}

/// Bracketed groups and the runs of text between them, in order. Blank runs
/// are dropped.
fn segments(text: &str) -> Vec<&str> {
    fn push<'a>(out: &mut Vec<&'a str>, segment: &'a str) {
        if !segment.trim().is_empty() {
            out.push(segment);
        }
    }

    let mut out = Vec::new();
    let mut depth = 0_i32;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match c {
            '[' => {
                if depth == 0 {
                    push(&mut out, &text[start..i]);
                    start = i;
                }
                depth += 1;
            }
            ']' => {
                depth -= 1;
                if depth == 0 {
                    push(&mut out, &text[start..=i]);
                    start = i + 1;
                }
            }
            _ => {}
        }
    }
    push(&mut out, &text[start..]);

    out
}

/// A parsed comm along with the text it was written as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comm {
    notation: String,
    root: Component,
}

impl Comm {
    /// # Errors
    ///
    /// See `Component::parse`.
    pub fn parse(notation: &str) -> Result<Comm, CommError> {
        let root = Component::parse(notation)?;
        trace!(target: "comm_parse", "Parsed comm: notation={notation:?} root={root:?}");

        Ok(Comm {
            notation: notation.to_owned(),
            root,
        })
    }

    pub fn notation(&self) -> &str {
        &self.notation
    }

    pub fn root(&self) -> &Component {
        &self.root
    }

    pub fn to_sequence(&self) -> Sequence {
        self.root.to_sequence()
    }
}

impl FromStr for Comm {
    type Err = CommError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Comm::parse(s)
    }
}

impl fmt::Display for Comm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.notation)
    }
}

#[cfg(test)]
mod tests {
    use super::{Comm, CommError, Component, segments, strip_brackets};
    use crate::moves::{IllegalMove, Sequence};

    fn expand(notation: &str) -> String {
        notation.parse::<Comm>().unwrap().to_sequence().to_string()
    }

    #[test]
    fn commutator() {
        assert_eq!(expand("[R,U]"), "R U R' U'");
        assert_eq!(expand("[R U R', D]"), "R U R' D R U' R' D'");
        assert_eq!(expand("L F' L' , S"), "L F' L' S L F L' S'");
    }

    #[test]
    fn plain_sequences() {
        assert_eq!(expand("R U R' U'"), "R U R' U'");
        assert_eq!(expand("  [ R2 ]  "), "R2");
        assert_eq!(expand(""), "");

        let comm = "R U".parse::<Comm>().unwrap();
        assert!(matches!(comm.root(), Component::Sequential(_)));
    }

    #[test]
    fn conjugates_ignore_wrapping_brackets() {
        let expected = "U S R' B R S' R' B' R U'";
        assert_eq!(expand("[U: [S, R' B R]]"), expected);
        assert_eq!(expand("U : [S, R' B R]"), expected);
        assert_eq!(expand("[[U: [S, R' B R]]]"), expected);

        assert_eq!(expand("R' : [U' R' U , M]"), expand("[R' : [U' R' U , M]]"));
    }

    #[test]
    fn conjugate_binds_looser_than_commutator() {
        assert_eq!(expand("R' : U' R' U , M"), expand("R' : [U' R' U , M]"));
    }

    #[test]
    fn doubles() {
        let seq = "(U M U M')2".parse::<Comm>().unwrap().to_sequence();
        assert_eq!(seq.len(), 8);
        assert_eq!(seq[..4], seq[4..]);
        assert_eq!(seq.to_string(), "U M U M' U M U M'");

        assert_eq!(expand("M2' : (U M U M')2"), "M2 U M U M' U M U M' M2");
    }

    #[test]
    fn slashes() {
        assert_eq!(expand("U / M'"), "U M' U U M U");
        assert_eq!(expand("M: U / M'"), "M U M' U U M U M'");
    }

    #[test]
    fn side_by_side_groups() {
        assert_eq!(
            expand("[R' E R : U'] [R E2 R' : U]"),
            "R' E R U' R' E' R R E2 R' U R E2 R'"
        );
        assert_eq!(expand("[R][U]"), "R U");
        assert_eq!(expand("[R, U] D"), "R U R' U' D");

        let comm = "[R' E R : U'] [R E2 R' : U]".parse::<Comm>().unwrap();
        assert!(matches!(comm.root(), Component::Multi(parts) if parts.len() == 2));
    }

    #[test]
    fn unbalanced_brackets() {
        assert_eq!(
            "[R,U".parse::<Comm>(),
            Err(CommError::UnbalancedBrackets("[R,U".to_owned()))
        );
        assert_eq!(
            "]R,U[".parse::<Comm>(),
            Err(CommError::UnbalancedBrackets("]R,U[".to_owned()))
        );
        assert!(matches!(
            "[R, [U, D]".parse::<Comm>(),
            Err(CommError::UnbalancedBrackets(_))
        ));
    }

    #[test]
    fn malformed() {
        let cases = [
            "R U ) D",
            "(R U)3",
            "(R U",
            "R)2",
            "[R U: D]2",
            "[R, U]'",
            "[R, U] 2 D",
            "D [R' D R, U2]2'",
        ];

        for bad in cases {
            assert!(
                matches!(bad.parse::<Comm>(), Err(CommError::MalformedComm(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn illegal_moves_propagate() {
        assert_eq!(
            "[R, [U: K]]".parse::<Comm>(),
            Err(CommError::IllegalMove(IllegalMove("K".to_owned())))
        );
    }

    #[test]
    fn expansion_is_deterministic() {
        let comm = "[D: [R U R', D2]]".parse::<Comm>().unwrap();
        assert_eq!(comm.to_sequence(), comm.to_sequence());
        assert_eq!(comm.to_string(), "[D: [R U R', D2]]");
    }

    #[test]
    fn commutator_inverse_is_swapped_commutator() {
        let forward = "[R U R', D]".parse::<Comm>().unwrap().to_sequence();
        let backward = "[D, R U R']".parse::<Comm>().unwrap().to_sequence();
        assert_eq!(forward.inverse(), backward);
        assert_eq!(forward.inverse().inverse(), forward);
        assert_ne!(forward, Sequence::default());
    }

    #[test]
    fn bracket_stripping() {
        assert_eq!(strip_brackets(" [[R, U]] "), "R, U");
        assert_eq!(strip_brackets("[R] [U]"), "[R] [U]");
        assert_eq!(segments("[A: B] C D [E, F]"), ["[A: B]", " C D ", "[E, F]"]);
    }
}
