//! # Keys Subcommand
//!
//! List every dispatch key with its accessor name and shape.

use anyhow::Result;

use uecall_dispatch::Dispatcher;

/// One output line per registered key: key, accessor, shape filename.
pub fn key_table(dispatcher: &Dispatcher<'_>) -> Vec<String> {
    dispatcher
        .keys()
        .map(|key| {
            let shape = dispatcher
                .route(key)
                .map(|route| route.endpoint().shape_name())
                .unwrap_or("-");
            format!("{key}\t{}\t{shape}", key.accessor_name())
        })
        .collect()
}

/// Execute the keys subcommand.
pub fn run_keys(dispatcher: &Dispatcher<'_>) -> Result<u8> {
    for line in key_table(dispatcher) {
        println!("{line}");
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_poi_add() {
        let dispatcher = Dispatcher::builtin().unwrap();
        assert_eq!(
            key_table(&dispatcher),
            ["POI.Add\tPOI_Add\tpoi.add.schema.json"]
        );
    }
}
