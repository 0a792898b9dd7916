//! Order-preserving grouping
//!
//! Output order must follow first appearance in the intent, so grouping uses
//! an insertion-ordered list with a side index rather than iterating a hash map.

use std::collections::HashMap;
use std::hash::Hash;

/// Group `items` by `key`, keeping groups in first-seen order and items in
/// their original order within each group.
pub(crate) fn group_stable<'a, T, K, F>(items: &'a [T], key: F) -> Vec<(K, Vec<&'a T>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&'a T) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a T>)> = Vec::new();

    for item in items {
        let k = key(item);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(item),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![item]));
            }
        }
    }

    groups
}
