//! Parser for the requirement expression language:
//!
//! ```text
//! expr := disj
//! disj := conj ( "|" conj )*
//! conj := atom ( "&" atom )*
//! atom := "(" disj ")" | TEXT
//! TEXT := [^|&()]+   (trimmed)
//! ```
//!
//! `TEXT` is `Nothing`, `Impossible`, `NAME x N` (at least N copies), or a
//! bare `NAME` that must resolve to a single bit. Resolution is delegated
//! to a `BitResolver` so this module stays ignorant of areas/events/items —
//! the world builder supplies the resolver.

use itertools::Itertools;
use regex::Regex;
use std::sync::OnceLock;

use crate::graph_logic::bits::inventory::Inventory;
use crate::graph_logic::bits::registry::BitId;
use crate::graph_logic::requirement::dnf::DnfRequirement;
use crate::utils::prelude::*;

/// What the parser needs from the world builder to turn a `NAME` into
/// bits: a single-bit lookup, and (for multi-copy items) the ordered list
/// of that item's copy bits.
pub trait BitResolver {
    fn resolve_single(&self, name: &str) -> Result<BitId>;
    fn copy_bits(&self, item_name: &str) -> Option<&[BitId]>;
    fn n_bits(&self) -> usize;
}

fn at_least_n_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?P<name>.+?)\s+x\s*(?P<count>[0-9]+)$").unwrap())
}

/// Parses a full requirement expression against `resolver`.
pub fn parse_requirement(source: &str, resolver: &dyn BitResolver) -> Result<DnfRequirement> {
    parse_disj(source.trim(), resolver)
}

fn parse_disj(s: &str, resolver: &dyn BitResolver) -> Result<DnfRequirement> {
    let parts = split_top_level(s, '|');
    let mut acc = DnfRequirement::impossible();
    for part in parts {
        acc = acc.or(&parse_conj(part, resolver)?);
    }
    Ok(acc)
}

fn parse_conj(s: &str, resolver: &dyn BitResolver) -> Result<DnfRequirement> {
    let parts = split_top_level(s, '&');
    let mut acc = DnfRequirement::trivial(resolver.n_bits());
    for part in parts {
        acc = acc.and(&parse_atom(part, resolver)?);
    }
    Ok(acc)
}

fn parse_atom(s: &str, resolver: &dyn BitResolver) -> Result<DnfRequirement> {
    let s = s.trim();
    if let Some(inner) = strip_matching_parens(s) {
        return parse_disj(inner, resolver);
    }
    parse_text(s, resolver)
}

fn parse_text(text: &str, resolver: &dyn BitResolver) -> Result<DnfRequirement> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("nothing") {
        return Ok(DnfRequirement::trivial(resolver.n_bits()));
    }
    if text.eq_ignore_ascii_case("impossible") {
        return Ok(DnfRequirement::impossible());
    }
    if let Some(captures) = at_least_n_pattern().captures(text) {
        let name = captures.name("name").unwrap().as_str().trim();
        let count: usize = captures.name("count").unwrap().as_str().parse()?;
        return parse_at_least_n(name, count, resolver);
    }
    let bit = resolver.resolve_single(text)?;
    Ok(DnfRequirement::single(bit, resolver.n_bits()))
}

/// "at least N copies" compiles to the union of every N-subset of the
/// item's copy bits — a forced-distinct-copies semantics that keeps
/// placement from assigning two bits to the same location.
fn parse_at_least_n(name: &str, count: usize, resolver: &dyn BitResolver) -> Result<DnfRequirement> {
    let Some(copies) = resolver.copy_bits(name) else {
        return Err(anyhow!("'{name}' is not a multi-copy item"));
    };
    if count == 0 {
        return Ok(DnfRequirement::trivial(resolver.n_bits()));
    }
    if count > copies.len() {
        return Ok(DnfRequirement::impossible());
    }
    let mut acc = DnfRequirement::impossible();
    for subset in copies.iter().copied().combinations(count) {
        let mut conjunct = Inventory::empty(resolver.n_bits());
        for bit in subset {
            conjunct.insert(bit);
        }
        acc = acc.or(&DnfRequirement::from_conjunct(conjunct));
    }
    Ok(acc)
}

/// Splits `s` on top-level occurrences of `op`, respecting parenthesis
/// nesting so that `"(a | b) & c"` does not split inside the group.
fn split_top_level(s: &str, op: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0usize;
    for (i, ch) in s.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            c if c == op && depth == 0 => {
                parts.push(s[start..i].trim());
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(s[start..].trim());
    parts
}

fn strip_matching_parens(s: &str) -> Option<&str> {
    if !s.starts_with('(') || !s.ends_with(')') {
        return None;
    }
    let inner = &s[1..s.len() - 1];
    let mut depth = 0i32;
    for (i, ch) in inner.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 && i != inner.len() - 1 {
                    return None;
                }
            }
            _ => {}
        }
    }
    if depth == 0 {
        Some(inner)
    } else {
        None
    }
}
