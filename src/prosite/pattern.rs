//! PROSITE pattern grammar: compilation and matching.
//!
//! ```text
//! <M-x(2)-[ST]-{P}-C(2,3)-[G>].
//! ```
//!
//! Elements are separated by `-`. An element is `x` (any residue), a single
//! uppercase residue, `[..]` (one of; may contain `>` for the C-terminus) or
//! `{..}` (none of), optionally followed by `(n)` or `(n,m)`. A leading `<`
//! anchors at the N-terminus, a trailing `>` at the C-terminus, and a trailing
//! `.` is ignored.

use std::fmt;

/// Why a pattern string failed to compile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternError(pub String);

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ResidueClass {
    Any,
    OneOf { residues: Vec<u8>, c_term: bool },
    NoneOf(Vec<u8>),
}

impl ResidueClass {
    fn matches(&self, residue: u8) -> bool {
        match self {
            Self::Any => true,
            Self::OneOf { residues, .. } => residues.contains(&residue),
            Self::NoneOf(residues) => !residues.contains(&residue),
        }
    }

    fn allows_c_term(&self) -> bool {
        matches!(self, Self::OneOf { c_term: true, .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Element {
    class: ResidueClass,
    min: usize,
    max: usize,
}

/// A compiled PROSITE pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    elements: Vec<Element>,
    n_term: bool,
    c_term: bool,
}

impl Pattern {
    /// Compile a pattern string.
    pub fn compile(source: &str) -> Result<Self, PatternError> {
        let mut body = source.trim();
        body = body.strip_suffix('.').unwrap_or(body).trim_end();
        if body.is_empty() {
            return Err(PatternError("empty pattern".to_string()));
        }

        let n_term = body.starts_with('<');
        if n_term {
            body = &body[1..];
        }
        // '[..>]' ends with ']', so a final '>' is always the anchor.
        let c_term = body.ends_with('>');
        if c_term {
            body = &body[..body.len() - 1];
        }

        let elements = body
            .split('-')
            .map(parse_element)
            .collect::<Result<Vec<_>, _>>()?;

        if elements.iter().all(|e| e.min == 0) {
            return Err(PatternError("pattern can match an empty sequence".to_string()));
        }
        if let Some(pos) = elements
            .iter()
            .take(elements.len() - 1)
            .position(|e| e.class.allows_c_term())
        {
            return Err(PatternError(format!(
                "C-terminal '>' only allowed in the last element (element {})",
                pos + 1
            )));
        }

        Ok(Self {
            source: source.trim().to_string(),
            elements,
            n_term,
            c_term,
        })
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// 1-based start positions of every match, overlapping matches included.
    #[must_use]
    pub fn find_all(&self, peptide: &[u8]) -> Vec<usize> {
        let last_start = if self.n_term {
            peptide.len().min(1)
        } else {
            peptide.len()
        };
        (0..last_start)
            .filter(|&start| self.matches_at(peptide, 0, start))
            .map(|start| start + 1)
            .collect()
    }

    fn matches_at(&self, peptide: &[u8], index: usize, pos: usize) -> bool {
        let Some(element) = self.elements.get(index) else {
            return !self.c_term || pos == peptide.len();
        };

        let mut run = 0;
        while run < element.max
            && pos + run < peptide.len()
            && element.class.matches(peptide[pos + run])
        {
            run += 1;
        }

        if run < element.min {
            // '[..>]' lets the C-terminus stand in for the remaining residues.
            return element.class.allows_c_term()
                && pos + run == peptide.len()
                && self.matches_at(peptide, index + 1, peptide.len());
        }

        (element.min..=run).any(|count| self.matches_at(peptide, index + 1, pos + count))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl std::str::FromStr for Pattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

fn parse_element(token: &str) -> Result<Element, PatternError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(PatternError("empty element".to_string()));
    }

    let (class_str, repeat_str) = match token.find('(') {
        Some(pos) => (&token[..pos], Some(&token[pos..])),
        None => (token, None),
    };

    let class = parse_class(class_str)?;
    let (min, max) = match repeat_str {
        Some(r) => parse_repeat(r)?,
        None => (1, 1),
    };

    Ok(Element { class, min, max })
}

fn parse_class(s: &str) -> Result<ResidueClass, PatternError> {
    if s == "x" {
        return Ok(ResidueClass::Any);
    }
    if let Some(inner) = s.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        let c_term = inner.ends_with('>');
        let residues = parse_residues(inner.strip_suffix('>').unwrap_or(inner), s)?;
        if residues.is_empty() && !c_term {
            return Err(PatternError(format!("empty residue group '{s}'")));
        }
        return Ok(ResidueClass::OneOf { residues, c_term });
    }
    if let Some(inner) = s.strip_prefix('{').and_then(|r| r.strip_suffix('}')) {
        let residues = parse_residues(inner, s)?;
        if residues.is_empty() {
            return Err(PatternError(format!("empty residue group '{s}'")));
        }
        return Ok(ResidueClass::NoneOf(residues));
    }
    match s.as_bytes() {
        [r] if r.is_ascii_uppercase() => Ok(ResidueClass::OneOf {
            residues: vec![*r],
            c_term: false,
        }),
        _ => Err(PatternError(format!("unrecognized element '{s}'"))),
    }
}

fn parse_residues(inner: &str, group: &str) -> Result<Vec<u8>, PatternError> {
    inner
        .bytes()
        .map(|b| {
            if b.is_ascii_uppercase() {
                Ok(b)
            } else {
                Err(PatternError(format!(
                    "invalid residue '{}' in group '{group}'",
                    char::from(b)
                )))
            }
        })
        .collect()
}

fn parse_repeat(s: &str) -> Result<(usize, usize), PatternError> {
    let inner = s
        .strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .ok_or_else(|| PatternError(format!("malformed repeat '{s}'")))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<usize>()
            .map_err(|_| PatternError(format!("invalid repeat count '{v}' in '{s}'")))
    };
    let (min, max) = match inner.split_once(',') {
        Some((lo, hi)) => (parse(lo)?, parse(hi)?),
        None => {
            let n = parse(inner)?;
            (n, n)
        }
    };
    if min > max {
        return Err(PatternError(format!("repeat lower bound exceeds upper bound in '{s}'")));
    }
    Ok((min, max))
}
