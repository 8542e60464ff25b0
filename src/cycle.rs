use std::{collections::BTreeMap, sync::Arc};

use crate::module::Module;

/// Follows dependency edges depth-first from the last name of `path`.
///
/// Returns `true` if a dependency is already on the path, in which case `path` ends with the repeated name.
/// There is no visited set shared between branches, the same module may be reached by several non-cyclic ones.
/// Dependencies that aren't registered are not followed.
pub(crate) fn detect_cycle(modules: &BTreeMap<Box<str>, Arc<Module>>, path: &mut Vec<Box<str>>) -> bool {
    let Some(module) = path.last().and_then(|name| modules.get(name)) else {
        return false;
    };

    for dependency in &*module.dependencies {
        let on_path = path.contains(dependency);
        path.push(dependency.clone());
        if on_path || detect_cycle(modules, path) {
            return true;
        }
        path.pop();
    }
    false
}
