//! `search_area`: resolves a partial address like `"Deep Woods"` or
//! `"Faron Woods - Deep Woods"` to its full dash-joined path from the
//! world root, starting the search from a given base address.

use crate::error::RandoError;
use crate::graph_logic::world::area::Area;
use crate::utils::prelude::*;

pub const SEP: &str = " - ";

/// One addressable thing under an area: either the area itself or one of
/// its local locations/exits, carrying its full dash-joined path.
struct Candidate {
    full_path: Vec<String>,
}

/// `path` is already `area`'s own full address (the caller passes
/// `base_path`, which by construction already addresses `start`), so
/// `area` itself is never re-pushed as a candidate here — only its
/// locations, exits, and descendants are.
fn collect_candidates(area: &Area, path: &[String], out: &mut Vec<Candidate>) {
    for loc in area.locations.keys() {
        let mut p = path.to_vec();
        p.push(loc.clone());
        out.push(Candidate { full_path: p });
    }
    for exit in area.exits.keys() {
        let mut p = path.to_vec();
        p.push(exit.clone());
        out.push(Candidate { full_path: p });
    }
    for sub in area.sub_areas.values() {
        let mut sub_path = path.to_vec();
        sub_path.push(sub.name.clone());
        out.push(Candidate { full_path: sub_path.clone() });
        collect_candidates(sub, &sub_path, out);
    }
}

fn descend<'a>(root: &'a Area, base_path: &[String]) -> Result<&'a Area> {
    let mut node = root;
    for segment in base_path {
        node = node
            .sub_areas
            .get(segment)
            .ok_or_else(|| RandoError::name_resolution(segment.clone(), base_path.join(SEP)))?;
    }
    Ok(node)
}

/// Resolves `partial` (a dash-joined suffix of a full address) starting
/// the breadth-first search from the area addressed by `base`. On
/// ambiguity the first match in declaration order wins; later matches are
/// returned as synonyms the caller may record for normalization.
pub fn search_area(root: &Area, base: &str, partial: &str) -> Result<(String, Vec<String>)> {
    let base_path: Vec<String> = if base.is_empty() {
        Vec::new()
    } else {
        base.split(SEP).map(str::to_string).collect()
    };
    let start = descend(root, &base_path)?;

    let mut candidates = Vec::new();
    collect_candidates(start, &base_path, &mut candidates);

    let wanted: Vec<&str> = partial.split(SEP).map(str::trim).collect();
    let mut hits: Vec<String> = candidates
        .into_iter()
        .filter(|c| ends_with(&c.full_path, &wanted))
        .map(|c| c.full_path.join(SEP))
        .collect();

    if hits.is_empty() {
        return Err(RandoError::name_resolution(partial.to_string(), base.to_string()));
    }
    let canonical = hits.remove(0);
    Ok((canonical, hits))
}

fn ends_with(full: &[String], wanted: &[&str]) -> bool {
    if wanted.len() > full.len() {
        return false;
    }
    let offset = full.len() - wanted.len();
    full[offset..].iter().zip(wanted.iter()).all(|(a, b)| a == b)
}
