//! Equivalence classes under a symmetric predicate.

/// Path-halving root lookup.
fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

/// Partition `n` items into the transitive closure of `similar`.
///
/// Returns one label per item plus the number of classes. Labels are dense
/// and numbered in order of each class's first item, so the grouping (not
/// the numbering) is independent of the input order.
pub fn partition<F>(n: usize, mut similar: F) -> (Vec<usize>, usize)
where
    F: FnMut(usize, usize) -> bool,
{
    let mut parent: Vec<usize> = (0..n).collect();
    for i in 0..n {
        for j in (i + 1)..n {
            if !similar(i, j) {
                continue;
            }
            let ri = find(&mut parent, i);
            let rj = find(&mut parent, j);
            if ri != rj {
                // Keep the smaller index as root.
                let (lo, hi) = if ri < rj { (ri, rj) } else { (rj, ri) };
                parent[hi] = lo;
            }
        }
    }

    let mut root_label = vec![usize::MAX; n];
    let mut labels = Vec::with_capacity(n);
    let mut classes = 0;
    for i in 0..n {
        let root = find(&mut parent, i);
        if root_label[root] == usize::MAX {
            root_label[root] = classes;
            classes += 1;
        }
        labels.push(root_label[root]);
    }
    (labels, classes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chains_are_merged_transitively() {
        // 0~1, 1~2 and 3 alone; 4~0.
        let pairs = [(0, 1), (1, 2), (0, 4)];
        let (labels, classes) = partition(5, |i, j| pairs.contains(&(i, j)));
        assert_eq!(classes, 2);
        assert_eq!(labels, vec![0, 0, 0, 1, 0]);
    }

    #[test]
    fn empty_input_has_no_classes() {
        let (labels, classes) = partition(0, |_, _| true);
        assert!(labels.is_empty());
        assert_eq!(classes, 0);
    }

    #[test]
    fn labels_follow_first_appearance() {
        let values = [5, 1, 5, 2, 1];
        let (labels, classes) = partition(values.len(), |i, j| values[i] == values[j]);
        assert_eq!(classes, 3);
        assert_eq!(labels, vec![0, 1, 0, 2, 1]);
    }
}
