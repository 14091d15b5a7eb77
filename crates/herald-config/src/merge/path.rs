use tracing::warn;

/// Navigate into a nested `toml::Value` by dotted path segments.
pub(super) fn get_nested<'a>(val: &'a toml::Value, path: &[&str]) -> Option<&'a toml::Value> {
    let mut current = val;
    for segment in path {
        current = current.as_table()?.get(*segment)?;
    }
    Some(current)
}

/// Set a value at a nested path. Intermediate tables must already exist.
pub(super) fn set_nested(val: &mut toml::Value, path: &[&str], new_val: toml::Value) {
    let Some((leaf, parents)) = path.split_last() else {
        return;
    };

    let mut current = val;
    for segment in parents {
        let Some(next) = current.as_table_mut().and_then(|t| t.get_mut(*segment)) else {
            warn!("set_nested: missing intermediate table at '{segment}'; skipping");
            return;
        };
        current = next;
    }

    if let Some(table) = current.as_table_mut() {
        table.insert((*leaf).to_owned(), new_val);
    }
}
