use crate::model::node::Node;

/// removes consecutive duplicate nodes in place; returns the count removed
/// (Ingest emits one debug point per removal, §4.1).
pub fn remove_consecutive_duplicates(coords: &mut Vec<Node>) -> usize {
    let mut out = Vec::with_capacity(coords.len());
    let mut removed = 0;
    for n in coords.drain(..) {
        if out.last() == Some(&n) {
            removed += 1;
        } else {
            out.push(n);
        }
    }
    *coords = out;
    removed
}

/// removes `A, B, A` artefact spikes: whenever `coords[i] == coords[i-2]`,
/// positions `i` and `i-1` are deleted. repeats until no spike remains,
/// since a deletion can expose a new spike at the same position (§4.1).
pub fn remove_artefact_spikes(coords: &mut Vec<Node>) -> usize {
    let mut removed = 0;
    let mut i = 2;
    while i < coords.len() {
        if coords[i] == coords[i - 2] {
            coords.remove(i);
            coords.remove(i - 1);
            removed += 1;
            i = 2;
        } else {
            i += 1;
        }
    }
    removed
}

/// if the ring wraps identically at both ends (`coords[0]==coords[-1]` and
/// `coords[1]==coords[-2]`), trims both endpoints (§4.1, §8 boundary case).
pub fn trim_duplicate_wrap(coords: &mut Vec<Node>) {
    if coords.len() < 4 {
        return;
    }
    let last = coords.len() - 1;
    if coords[0] == coords[last] && coords[1] == coords[last - 1] {
        coords.remove(last);
        coords.remove(0);
    }
}

/// runs the full §4.1 inline-cleanup sequence on one coordinate sequence.
pub fn clean(coords: &mut Vec<Node>) {
    let removed = remove_consecutive_duplicates(coords);
    if removed > 0 {
        log::debug!("removed {removed} consecutive duplicate node(s)");
    }
    let spikes = remove_artefact_spikes(coords);
    if spikes > 0 {
        log::debug!("removed {spikes} artefact spike(s)");
    }
    trim_duplicate_wrap(coords);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_consecutive_duplicates() {
        let mut c = vec![Node::new(0.0, 0.0), Node::new(0.0, 0.0), Node::new(1.0, 1.0)];
        assert_eq!(remove_consecutive_duplicates(&mut c), 1);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn removes_a_b_a_spike() {
        let a = Node::new(0.0, 0.0);
        let b = Node::new(1.0, 1.0);
        let c = Node::new(2.0, 2.0);
        let mut coords = vec![a, b, a, c];
        assert_eq!(remove_artefact_spikes(&mut coords), 1);
        assert_eq!(coords, vec![a, c]);
    }

    #[test]
    fn trims_identical_double_wrap() {
        let a = Node::new(0.0, 0.0);
        let b = Node::new(1.0, 1.0);
        let m = Node::new(5.0, 5.0);
        let mut coords = vec![a, b, m, b, a];
        trim_duplicate_wrap(&mut coords);
        assert_eq!(coords, vec![b, m, b]);
    }

    #[test]
    fn leaves_non_wrapping_ring_untouched() {
        let mut coords = vec![Node::new(0.0, 0.0), Node::new(1.0, 0.0), Node::new(1.0, 1.0), Node::new(0.0, 0.0)];
        let before = coords.clone();
        trim_duplicate_wrap(&mut coords);
        assert_eq!(coords, before);
    }
}
