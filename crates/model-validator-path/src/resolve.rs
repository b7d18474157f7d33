//! Address resolution against JSON data.

use serde_json::Value;

use crate::types::{render_segments, Address, Segment};

/// A location that resolved to a value.
#[derive(Debug, Clone, PartialEq)]
pub struct Target<'a> {
    /// Concrete address, with wildcards replaced by element indices.
    pub address: String,
    pub value: &'a Value,
}

/// A location that could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Miss {
    /// Concrete address of the branch that failed.
    pub address: String,
    /// The first segment that does not exist on the traversed structure.
    pub segment: String,
}

/// Outcome of resolving one address.
///
/// A plain address yields exactly one target or one miss. A wildcard address
/// yields one entry per expanded element; an empty array yields nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolution<'a> {
    pub targets: Vec<Target<'a>>,
    pub misses: Vec<Miss>,
}

impl<'a> Resolution<'a> {
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty() && self.misses.is_empty()
    }

    /// The value when resolution produced exactly one target and no misses.
    pub fn single(&self) -> Option<&'a Value> {
        match (self.targets.as_slice(), self.misses.is_empty()) {
            ([target], true) => Some(target.value),
            _ => None,
        }
    }
}

/// Resolve `address` against `data`.
pub fn resolve<'a>(address: &Address, data: &'a Value) -> Resolution<'a> {
    let mut resolution = Resolution::default();
    let mut trail = Vec::with_capacity(address.segments().len());
    walk(address.segments(), data, &mut trail, &mut resolution);
    resolution
}

fn walk<'a>(
    rest: &[Segment],
    value: &'a Value,
    trail: &mut Vec<Segment>,
    out: &mut Resolution<'a>,
) {
    let Some((segment, tail)) = rest.split_first() else {
        out.targets.push(Target {
            address: render_segments(trail),
            value,
        });
        return;
    };

    let next = match segment {
        Segment::Field(name) => value.as_object().and_then(|map| map.get(name)),
        Segment::Index(index) => value.as_array().and_then(|items| items.get(*index)),
        Segment::Whole => value.is_array().then_some(value),
        Segment::Each => {
            let Some(items) = value.as_array() else {
                miss(rest, trail, out);
                return;
            };
            for (index, item) in items.iter().enumerate() {
                trail.push(Segment::Index(index));
                walk(tail, item, trail, out);
                trail.pop();
            }
            return;
        }
    };

    match next {
        Some(child) => {
            trail.push(segment.clone());
            walk(tail, child, trail, out);
            trail.pop();
        }
        None => miss(rest, trail, out),
    }
}

fn miss(rest: &[Segment], trail: &[Segment], out: &mut Resolution<'_>) {
    let mut full = trail.to_vec();
    full.extend_from_slice(rest);
    out.misses.push(Miss {
        address: render_segments(&full),
        segment: rest[0].to_string(),
    });
}
